//! # Vapourizer - Deep-crawl to LLM-distilled markdown
//!
//! This crate crawls a documentation site breadth-first, runs every admitted
//! page through a remote LLM extraction provider, and streams the distilled
//! output into a single append-only markdown digest.
//!
//! ## Features
//!
//! - Bounded breadth-first crawling with a conjunctive link filter chain
//!   (URL glob patterns, domain allow-list, content-type allow-list)
//! - Per-page LLM extraction with isolated failure handling: a failed page
//!   is logged and skipped, the run continues
//! - Streaming markdown output, flushed after every section, so interrupted
//!   runs still leave a readable partial digest
//! - Capability traits at the crawl and extraction seams, so both can be
//!   replaced by fakes in tests
//! - Async API with Tokio
//!
//! ## Example
//!
//! ```rust,no_run
//! use url::Url;
//! use vapourizer::crawler::{
//!     CrawlTarget, EngineConfig, FilterChain, FilterSpec, HttpCrawlEngine,
//! };
//! use vapourizer::extractor::{LlmConfig, LlmExtractor};
//! use vapourizer::runner::Runner;
//! use vapourizer::writer::MarkdownWriter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LlmConfig::load("/etc/secrets/vapourizer.json".as_ref())?;
//!     let provider = LlmExtractor::from_config(&config)?;
//!
//!     let root = Url::parse("https://example.com/docs/")?;
//!     let target = CrawlTarget::new(root).with_max_depth(2);
//!     let chain = FilterChain::new(&FilterSpec {
//!         url_patterns: vec!["*docs*".to_string()],
//!         allowed_domains: vec!["example.com".to_string()],
//!         allowed_content_types: vec!["text/html".to_string()],
//!     })?;
//!
//!     let engine = HttpCrawlEngine::new(EngineConfig::default())?;
//!     let writer = MarkdownWriter::new("out");
//!     let runner = Runner::new(engine, provider, writer, target, chain, "docs");
//!
//!     let summary = runner.run().await?;
//!     println!("{} sections written", summary.sections_written);
//!     Ok(())
//! }
//! ```

mod error;

pub mod crawler;
pub mod extractor;
pub mod runner;
pub mod writer;

pub use error::Error;

/// Re-export of common types for public use
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::runner::{RunSummary, Runner};
}
