//! # Crawl Configuration Module
//!
//! This module describes one bounded traversal and the fetch-level knobs of
//! the default HTTP engine.
//!
//! ## Key Components
//!
//! - `CrawlTarget`: where a traversal starts, how deep it may go and whether
//!   cross-host links are eligible at all. Immutable once a run starts.
//! - `EngineConfig`: page cap, request pacing, timeout and user agent for
//!   the HTTP engine.

use std::time::Duration;

use url::Url;

/// Description of one bounded traversal
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    /// URL the traversal starts from
    pub root_url: Url,

    /// Maximum depth to expand; the root page is depth 0
    pub max_depth: u32,

    /// Whether links leaving the root host may be followed at all.
    /// Admitted external links still go through the full filter chain.
    pub include_external: bool,
}

impl CrawlTarget {
    /// Create a target with default bounds (depth 1, same-host only)
    pub fn new(root_url: Url) -> Self {
        Self {
            root_url,
            max_depth: 1,
            include_external: false,
        }
    }

    /// Set the maximum traversal depth
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set whether cross-host links may be followed
    pub fn with_include_external(mut self, include_external: bool) -> Self {
        self.include_external = include_external;
        self
    }
}

/// Fetch-level configuration for the HTTP engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of pages to fetch in one traversal
    pub max_pages: usize,

    /// Delay in milliseconds between successive requests
    pub delay_ms: u64,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// User agent to use for requests
    pub user_agent: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_pages: 100,
            delay_ms: 500,
            request_timeout_secs: 30,
            user_agent: format!("vapourizer/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl EngineConfig {
    /// Get the inter-request delay as a Duration
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Get the per-request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_defaults() {
        let url = Url::parse("https://example.com/docs/").unwrap();
        let target = CrawlTarget::new(url);

        assert_eq!(target.max_depth, 1);
        assert!(!target.include_external);
    }

    #[test]
    fn test_target_setters() {
        let url = Url::parse("https://example.com/").unwrap();
        let target = CrawlTarget::new(url)
            .with_max_depth(3)
            .with_include_external(true);

        assert_eq!(target.max_depth, 3);
        assert!(target.include_external);
    }

    #[test]
    fn test_engine_config_durations() {
        let config = EngineConfig {
            delay_ms: 250,
            request_timeout_secs: 5,
            ..EngineConfig::default()
        };

        assert_eq!(config.delay(), Duration::from_millis(250));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }
}
