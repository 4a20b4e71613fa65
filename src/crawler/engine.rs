//! Crawl engine capability
//!
//! The engine is modeled as a capability trait so any implementation that
//! satisfies the contract is substitutable: the default HTTP engine, a
//! remote service, or a fake returning fixed page sequences in tests.

use std::future::Future;

use crate::crawler::error::CrawlError;
use crate::crawler::{CrawlTarget, CrawledPage, FilterChain};

/// A deep-crawl engine
///
/// Consumes a target and a filter chain and produces the reachable pages,
/// fully materialized, in breadth-first discovery order. Failing to reach
/// the root at all is the only fatal outcome; unreachable inner pages are
/// an engine-internal concern.
pub trait CrawlEngine: Send + Sync {
    /// Run one bounded traversal
    fn crawl(
        &self,
        target: &CrawlTarget,
        chain: &FilterChain,
    ) -> impl Future<Output = Result<Vec<CrawledPage>, CrawlError>> + Send;
}
