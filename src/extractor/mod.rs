//! LLM content extraction module
//!
//! This module wraps the remote extraction provider: configuration loading
//! from a trusted file, the `ExtractionProvider` capability trait and the
//! HTTP messages client with bounded provider-level retries.

mod client;
mod config;
mod error;
mod prompts;

pub use client::LlmExtractor;
pub use config::{DEFAULT_CONFIG_PATH, LlmConfig};
pub use error::{ConfigError, ExtractError};
pub use prompts::EXTRACTION_PROMPT;

use std::future::Future;

/// A per-page extraction provider
///
/// Each call is independent; no conversation state is shared across pages.
/// Implementations report failures as values so the caller can isolate them
/// to a single page.
pub trait ExtractionProvider: Send + Sync {
    /// Distill one page of markdown into extracted markdown
    fn extract(
        &self,
        markdown: &str,
    ) -> impl Future<Output = Result<String, ExtractError>> + Send;
}
