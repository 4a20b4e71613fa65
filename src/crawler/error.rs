//! Error types for the crawler module

use thiserror::Error;

/// Error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The root URL could not be fetched at all; fatal for the run
    #[error("Root URL unreachable: {url}: {reason}")]
    RootUnreachable { url: String, reason: String },

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A fetch came back with a non-success status
    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    /// A filter glob pattern failed to compile
    #[error("Invalid filter pattern: {0}")]
    InvalidPattern(String),
}
