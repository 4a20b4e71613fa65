//! Link admission filtering
//!
//! Candidate links pass through three allow-lists in a fixed order: URL glob
//! pattern, domain, content type. The first failing check rejects the link.
//! Admission requires a match in every list; an empty list therefore rejects
//! every candidate. The chain never performs network I/O.

use regex::Regex;
use url::Url;

use crate::crawler::error::CrawlError;

/// Allow-lists for link admission
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    /// URL glob patterns (`*` wildcard), matched case-sensitively against
    /// the full URL string
    pub url_patterns: Vec<String>,

    /// Domains whose pages may be crawled; subdomains of an entry match
    pub allowed_domains: Vec<String>,

    /// MIME types that may be crawled; compared without parameters
    pub allowed_content_types: Vec<String>,
}

/// A compiled filter chain
///
/// Built once per run from a `FilterSpec`; glob patterns are compiled to
/// anchored regexes up front so admission checks stay allocation-free.
#[derive(Debug, Clone)]
pub struct FilterChain {
    patterns: Vec<Regex>,
    allowed_domains: Vec<String>,
    allowed_content_types: Vec<String>,
}

impl FilterChain {
    /// Compile a filter specification into a chain
    pub fn new(spec: &FilterSpec) -> Result<Self, CrawlError> {
        let patterns = spec
            .url_patterns
            .iter()
            .map(|p| compile_glob(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns,
            allowed_domains: spec.allowed_domains.clone(),
            allowed_content_types: spec.allowed_content_types.clone(),
        })
    }

    /// Decide whether a candidate link may be crawled
    ///
    /// Checks run pattern -> domain -> content type and short-circuit on the
    /// first failure.
    pub fn admit(&self, url: &Url, content_type: &str) -> bool {
        self.matches_pattern(url)
            && self.matches_domain(url)
            && self.matches_content_type(content_type)
    }

    fn matches_pattern(&self, url: &Url) -> bool {
        self.patterns.iter().any(|re| re.is_match(url.as_str()))
    }

    fn matches_domain(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        self.allowed_domains
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")))
    }

    fn matches_content_type(&self, content_type: &str) -> bool {
        // Compare the declared MIME type only, ignoring parameters such as
        // "; charset=utf-8".
        let mime = content_type.split(';').next().unwrap_or("").trim();
        self.allowed_content_types.iter().any(|t| t == mime)
    }
}

/// Compile a `*` glob pattern into an anchored regex
fn compile_glob(pattern: &str) -> Result<Regex, CrawlError> {
    let mut regex = String::with_capacity(pattern.len() + 4);
    regex.push('^');
    for (i, literal) in pattern.split('*').enumerate() {
        if i > 0 {
            regex.push_str(".*");
        }
        regex.push_str(&regex::escape(literal));
    }
    regex.push('$');

    Regex::new(&regex).map_err(|e| CrawlError::InvalidPattern(format!("{pattern}: {e}")))
}
