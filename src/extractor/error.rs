//! Error types for the extractor module

use std::path::PathBuf;

use thiserror::Error;

/// Error type for provider configuration
///
/// Always fatal: configuration is loaded once, before any crawl work.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Cannot read configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON or lacks required fields
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field is absent or empty
    #[error("Missing or empty configuration field: {0}")]
    MissingField(&'static str),

    /// A configured header name or value is not valid HTTP
    #[error("Invalid header in configuration: {0}")]
    InvalidHeader(String),

    /// The configured CA bundle is not valid PEM
    #[error("Invalid CA bundle: {0}")]
    InvalidCaBundle(String),

    /// The HTTP client could not be constructed
    #[error("Cannot build HTTP client: {0}")]
    HttpClient(String),
}

/// Error type for a single extraction call
///
/// Page-local: the run controller logs it and moves on to the next page.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider did not answer within the client timeout
    #[error("Request timed out")]
    Timeout,

    /// The provider reported too many requests
    #[error("Provider rate limit exceeded")]
    RateLimited,

    /// The provider rejected the request
    #[error("Provider error {status}: {message}")]
    Api { status: u16, message: String },

    /// The provider answered with something the client cannot use
    #[error("Unexpected provider response: {0}")]
    UnexpectedResponse(String),
}

impl ExtractError {
    /// Whether a retry of the same request could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ExtractError::Timeout | ExtractError::RateLimited => true,
            ExtractError::Api { status, .. } => *status >= 500,
            ExtractError::Http(e) => e.is_connect() || e.is_timeout(),
            ExtractError::UnexpectedResponse(_) => false,
        }
    }
}
