//! Run controller
//!
//! Sequences one run: a single materialized crawl, then strictly sequential
//! per-page extraction and streaming writes. Extraction failures are
//! page-local; they are logged and the page is skipped for the rest of the
//! run. Crawl, artifact-initialize and write failures are fatal.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::crawler::{CrawlEngine, CrawlTarget, FilterChain};
use crate::error::Result;
use crate::extractor::ExtractionProvider;
use crate::writer::MarkdownWriter;

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Pages returned by the crawl
    pub pages_crawled: usize,

    /// Sections actually written; skipped pages are excluded
    pub sections_written: usize,

    /// Path of the artifact file
    pub output_path: PathBuf,
}

/// Drives one crawl-extract-write run
///
/// The engine and provider are capability parameters so tests can swap in
/// fakes with fixed page sequences and fixed extraction outcomes.
pub struct Runner<E, P> {
    engine: E,
    provider: P,
    writer: MarkdownWriter,
    target: CrawlTarget,
    chain: FilterChain,
    base_filename: String,
}

impl<E: CrawlEngine, P: ExtractionProvider> Runner<E, P> {
    /// Assemble a runner for one configured target
    pub fn new(
        engine: E,
        provider: P,
        writer: MarkdownWriter,
        target: CrawlTarget,
        chain: FilterChain,
        base_filename: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            provider,
            writer,
            target,
            chain,
            base_filename: base_filename.into(),
        }
    }

    /// Run to completion
    ///
    /// Returns a summary on completion, even when some pages were skipped.
    /// Per-page extraction failures never fail the run; no artifact is
    /// touched if the crawl itself fails.
    pub async fn run(&self) -> Result<RunSummary> {
        let pages = self.engine.crawl(&self.target, &self.chain).await?;
        info!("Crawled {} pages from {}", pages.len(), self.target.root_url);

        let title = format!("Web Crawl Results - {} pages", pages.len());
        let mut artifact = self.writer.initialize(&self.base_filename, &title)?;
        info!("Streaming results to {}", artifact.path().display());

        let total = pages.len();
        let mut sections_written = 0;
        for (i, page) in pages.iter().enumerate() {
            let index = i + 1;
            info!("Extracting {}/{}: {}", index, total, page.url);

            match self.provider.extract(&page.markdown).await {
                Ok(output) => {
                    let section_title = format!("Page {index}: {}", page.url);
                    artifact.append_section(&section_title, &output)?;
                    sections_written += 1;
                    info!("Appended results for {}", page.url);
                }
                Err(e) => {
                    warn!("Extraction failed for {}, page skipped: {}", page.url, e);
                }
            }
        }

        Ok(RunSummary {
            pages_crawled: total,
            sections_written,
            output_path: artifact.path().to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{CrawlError, CrawledPage, FilterSpec};
    use crate::error::Error;
    use crate::extractor::ExtractError;
    // Shadow the crate-level Result alias; fakes return module error types.
    use std::fs;
    use std::result::Result;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;
    use url::Url;

    struct FakeEngine {
        pages: Result<Vec<CrawledPage>, String>,
    }

    impl FakeEngine {
        fn with_pages(urls: &[&str]) -> Self {
            let pages = urls
                .iter()
                .enumerate()
                .map(|(i, url)| CrawledPage {
                    url: url.to_string(),
                    depth: i.min(1) as u32,
                    markdown: format!("# Raw content of {url}"),
                    status_code: Some(200),
                })
                .collect();
            Self { pages: Ok(pages) }
        }

        fn failing(reason: &str) -> Self {
            Self {
                pages: Err(reason.to_string()),
            }
        }
    }

    impl CrawlEngine for FakeEngine {
        async fn crawl(
            &self,
            _target: &CrawlTarget,
            _chain: &FilterChain,
        ) -> Result<Vec<CrawledPage>, CrawlError> {
            match &self.pages {
                Ok(pages) => Ok(pages.clone()),
                Err(reason) => Err(CrawlError::RootUnreachable {
                    url: "https://example.com/docs/".to_string(),
                    reason: reason.clone(),
                }),
            }
        }
    }

    /// Succeeds for every page except the 1-based call indexes in `fail_on`
    struct FakeProvider {
        fail_on: Vec<usize>,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn always_ok() -> Self {
            Self {
                fail_on: Vec::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing_on(indexes: &[usize]) -> Self {
            Self {
                fail_on: indexes.to_vec(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ExtractionProvider for FakeProvider {
        async fn extract(&self, markdown: &str) -> Result<String, ExtractError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on.contains(&call) {
                return Err(ExtractError::Api {
                    status: 400,
                    message: "input exceeds provider limits".to_string(),
                });
            }
            Ok(format!("distilled: {}", markdown.lines().next().unwrap_or("")))
        }
    }

    fn runner_in<P: ExtractionProvider>(
        dir: &std::path::Path,
        engine: FakeEngine,
        provider: P,
    ) -> Runner<FakeEngine, P> {
        let target = CrawlTarget::new(Url::parse("https://example.com/docs/").unwrap())
            .with_max_depth(1);
        let chain = FilterChain::new(&FilterSpec {
            url_patterns: vec!["*docs*".to_string()],
            allowed_domains: vec!["example.com".to_string()],
            allowed_content_types: vec!["text/html".to_string()],
        })
        .unwrap();

        Runner::new(
            engine,
            provider,
            MarkdownWriter::new(dir),
            target,
            chain,
            "crawl_results",
        )
    }

    #[tokio::test]
    async fn test_successful_run_writes_all_sections_in_order() {
        let dir = tempdir().unwrap();
        let runner = runner_in(
            dir.path(),
            FakeEngine::with_pages(&["https://example.com/docs/", "https://example.com/docs/a"]),
            FakeProvider::always_ok(),
        );

        let summary = runner.run().await.unwrap();

        assert_eq!(summary.pages_crawled, 2);
        assert_eq!(summary.sections_written, 2);

        let content = fs::read_to_string(&summary.output_path).unwrap();
        assert!(content.starts_with("# Web Crawl Results - 2 pages"));

        let first = content.find("## Page 1: https://example.com/docs/").unwrap();
        let second = content.find("## Page 2: https://example.com/docs/a").unwrap();
        assert!(first < second);
        assert_eq!(content.matches("## Page ").count(), 2);
    }

    #[tokio::test]
    async fn test_failed_page_is_skipped_and_run_completes() {
        let dir = tempdir().unwrap();
        let runner = runner_in(
            dir.path(),
            FakeEngine::with_pages(&[
                "https://example.com/docs/",
                "https://example.com/docs/huge",
                "https://example.com/docs/b",
            ]),
            FakeProvider::failing_on(&[2]),
        );

        let summary = runner.run().await.unwrap();

        assert_eq!(summary.pages_crawled, 3);
        assert_eq!(summary.sections_written, 2);

        let content = fs::read_to_string(&summary.output_path).unwrap();
        assert!(content.contains("## Page 1: https://example.com/docs/"));
        assert!(!content.contains("## Page 2:"));
        assert!(content.contains("## Page 3: https://example.com/docs/b"));
    }

    #[tokio::test]
    async fn test_crawl_failure_aborts_without_artifact() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let runner = runner_in(
            &out,
            FakeEngine::failing("connection refused"),
            FakeProvider::always_ok(),
        );

        let result = runner.run().await;

        assert!(matches!(result, Err(Error::Crawl(_))));
        // No output directory side effects before the crawl succeeds.
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_empty_crawl_still_produces_header_only_artifact() {
        let dir = tempdir().unwrap();
        let runner = runner_in(
            dir.path(),
            FakeEngine::with_pages(&[]),
            FakeProvider::always_ok(),
        );

        let summary = runner.run().await.unwrap();

        assert_eq!(summary.pages_crawled, 0);
        assert_eq!(summary.sections_written, 0);

        let content = fs::read_to_string(&summary.output_path).unwrap();
        assert!(content.starts_with("# Web Crawl Results - 0 pages"));
        assert!(!content.contains("## Page"));
    }
}
