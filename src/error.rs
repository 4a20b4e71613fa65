//! Error types for the vapourizer crate

use thiserror::Error;

/// Result type for vapourizer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for vapourizer operations
///
/// Module-level errors funnel into this enum at the run boundary. Only
/// fatal failures appear here; per-page extraction failures are handled
/// inside the run loop and never surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Provider configuration error (fatal, pre-run)
    #[error("Configuration error: {0}")]
    Config(#[from] crate::extractor::ConfigError),

    /// Crawl failure (fatal, run-level)
    #[error("Crawl error: {0}")]
    Crawl(#[from] crate::crawler::CrawlError),

    /// Output artifact error (fatal, run-level)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
