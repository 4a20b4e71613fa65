//! Default crawl engine over plain HTTP
//!
//! Breadth-first traversal with a FIFO frontier and an exact-match visited
//! set. Fetching is delegated to reqwest, link extraction to scraper and
//! HTML-to-Markdown conversion to htmd. Discovered links pass through the
//! filter chain before they are enqueued; after the fetch the declared
//! Content-Type is checked through the chain again, since the pre-enqueue
//! check can only guess the type from the URL.

use std::collections::{HashSet, VecDeque};

use htmd::HtmlToMarkdown;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use crate::crawler::config::EngineConfig;
use crate::crawler::error::CrawlError;
use crate::crawler::{CrawlEngine, CrawlTarget, CrawledPage, FilterChain};

/// One fetched response, decoded far enough for the traversal to use
struct FetchedPage {
    status: u16,
    content_type: String,
    body: String,
}

/// Crawl engine backed by plain HTTP fetches
pub struct HttpCrawlEngine {
    client: Client,
    converter: HtmlToMarkdown,
    config: EngineConfig,
}

impl HttpCrawlEngine {
    /// Create an engine with the given fetch configuration
    pub fn new(config: EngineConfig) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(CrawlError::Http)?;

        let converter = HtmlToMarkdown::builder()
            .skip_tags(vec!["script", "style", "noscript", "iframe", "svg"])
            .build();

        Ok(Self {
            client,
            converter,
            config,
        })
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, CrawlError> {
        debug!("Fetching {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();
        let body = response.text().await?;

        Ok(FetchedPage {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

impl CrawlEngine for HttpCrawlEngine {
    async fn crawl(
        &self,
        target: &CrawlTarget,
        chain: &FilterChain,
    ) -> Result<Vec<CrawledPage>, CrawlError> {
        info!("Starting crawl of {}", target.root_url);

        let root = strip_fragment(target.root_url.clone());
        let root_host = root.host_str().map(str::to_string);

        let mut visited: HashSet<String> = HashSet::new();
        let mut frontier: VecDeque<(Url, u32)> = VecDeque::new();
        let mut pages: Vec<CrawledPage> = Vec::new();

        visited.insert(root.as_str().to_string());
        frontier.push_back((root, 0));

        let mut root_pending = true;
        while let Some((url, depth)) = frontier.pop_front() {
            if pages.len() >= self.config.max_pages {
                info!("Reached page limit of {}, stopping", self.config.max_pages);
                break;
            }

            if !root_pending && self.config.delay_ms > 0 {
                tokio::time::sleep(self.config.delay()).await;
            }

            let fetched = match self.fetch(&url).await {
                Ok(fetched) => fetched,
                Err(e) if root_pending => {
                    return Err(CrawlError::RootUnreachable {
                        url: url.to_string(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    warn!("Skipping {}: {}", url, e);
                    continue;
                }
            };
            root_pending = false;

            // The pre-enqueue check had to guess the content type from the
            // URL; re-check with the declared one. The root is exempt, it
            // was never a filtered candidate.
            if depth > 0 && !chain.admit(&url, &fetched.content_type) {
                debug!(
                    "Dropping {} after fetch: content type {} not admitted",
                    url, fetched.content_type
                );
                continue;
            }

            let markdown = match self.converter.convert(&fetched.body) {
                Ok(markdown) => markdown,
                Err(e) => {
                    warn!("Markdown conversion failed for {}, skipping: {}", url, e);
                    continue;
                }
            };

            if depth < target.max_depth {
                let candidates = admitted_links(
                    &fetched.body,
                    &url,
                    root_host.as_deref(),
                    target,
                    chain,
                    &visited,
                );
                for candidate in candidates {
                    visited.insert(candidate.as_str().to_string());
                    frontier.push_back((candidate, depth + 1));
                }
            }

            debug!("Crawled {} at depth {}", url, depth);
            pages.push(CrawledPage {
                url: url.to_string(),
                depth,
                markdown,
                status_code: Some(fetched.status),
            });
        }

        info!("Crawl finished, {} pages", pages.len());
        Ok(pages)
    }
}

/// Decide which of a page's links may enter the frontier
///
/// Applies, in order: the visited set (fragments stripped), the cross-host
/// gate (external links are dropped unless `include_external` is set) and
/// the filter chain with a content type guessed from the URL. Links that
/// survive are returned deduplicated, in document order.
fn admitted_links(
    html: &str,
    base: &Url,
    root_host: Option<&str>,
    target: &CrawlTarget,
    chain: &FilterChain,
    visited: &HashSet<String>,
) -> Vec<Url> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut admitted = Vec::new();

    for link in extract_links(html, base) {
        let candidate = strip_fragment(link);
        if visited.contains(candidate.as_str()) || seen.contains(candidate.as_str()) {
            continue;
        }

        let external = candidate.host_str() != root_host;
        if external && !target.include_external {
            debug!("Skipping external link {}", candidate);
            continue;
        }
        if !chain.admit(&candidate, guess_content_type(&candidate)) {
            debug!("Filter chain rejected {}", candidate);
            continue;
        }

        seen.insert(candidate.as_str().to_string());
        admitted.push(candidate);
    }

    admitted
}

/// Extract absolute http(s) links from a page, in document order
fn extract_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .collect()
}

fn strip_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

/// Guess a candidate's MIME type from its path extension
///
/// Used for the pre-enqueue filter pass, before any response headers exist.
/// Unknown and missing extensions are treated as HTML, which is what
/// documentation sites overwhelmingly serve for extensionless routes.
fn guess_content_type(url: &Url) -> &'static str {
    let extension = url
        .path()
        .rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, ext)| ext);

    match extension {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("txt") => "text/plain",
        Some("zip") => "application/zip",
        _ => "text/html",
    }
}
