//! Deep-crawl module
//!
//! This module provides the crawl target description, the link admission
//! filter chain, the `CrawlEngine` capability trait and the default
//! breadth-first HTTP engine.

mod config;
mod engine;
mod error;
mod filter;
mod http_engine;

pub use config::{CrawlTarget, EngineConfig};
pub use engine::CrawlEngine;
pub use error::CrawlError;
pub use filter::{FilterChain, FilterSpec};
pub use http_engine::HttpCrawlEngine;

use serde::{Deserialize, Serialize};

/// A page produced by the crawl engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawledPage {
    /// URL the page was fetched from
    pub url: String,

    /// Depth at which the page was reached; the root is depth 0
    pub depth: u32,

    /// Page content converted to Markdown
    pub markdown: String,

    /// HTTP status code, when known
    pub status_code: Option<u16>,
}
