//! # Vapourizer CLI
//!
//! Crawls a documentation site breadth-first, distills every admitted page
//! through the configured LLM provider and streams the results into a
//! single markdown digest.
//!
//! Provider configuration (base URL, API key, optional headers and CA
//! bundle) is loaded from a trusted JSON file before any crawl work starts;
//! a bad configuration aborts the process with no filesystem side effects.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

use vapourizer::crawler::{
    CrawlTarget, EngineConfig, FilterChain, FilterSpec, HttpCrawlEngine,
};
use vapourizer::extractor::{DEFAULT_CONFIG_PATH, LlmConfig, LlmExtractor};
use vapourizer::runner::Runner;
use vapourizer::writer::MarkdownWriter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Deep-crawl a site and distill each page into one markdown digest", long_about = None)]
struct Cli {
    /// URL to crawl
    #[arg(required = true)]
    url: Url,

    /// Crawl depth; the root page is depth 0
    #[arg(short, long, default_value = "2")]
    depth: u32,

    /// Follow links that leave the root host
    #[arg(long)]
    include_external: bool,

    /// URL glob pattern a link must match (repeatable; default "*")
    #[arg(long = "pattern")]
    patterns: Vec<String>,

    /// Domain links may point at (repeatable; defaults to the root host)
    #[arg(long = "domain")]
    domains: Vec<String>,

    /// Content type that may be crawled (repeatable)
    #[arg(long = "content-type", default_values_t = vec!["text/html".to_string()])]
    content_types: Vec<String>,

    /// Provider configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory the digest is written into
    #[arg(short, long, default_value = "out")]
    output_dir: PathBuf,

    /// Base name of the digest file
    #[arg(short, long, default_value = "crawl_results")]
    name: String,

    /// Maximum number of pages to fetch
    #[arg(short = 'p', long, default_value = "100")]
    max_pages: usize,

    /// Delay between requests in milliseconds
    #[arg(short, long, default_value = "500")]
    rate: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Provider configuration comes first; nothing else may run on a bad one.
    let llm_config = LlmConfig::load(&cli.config).with_context(|| {
        format!(
            "failed to load provider configuration from {}",
            cli.config.display()
        )
    })?;
    let provider = LlmExtractor::from_config(&llm_config)?;

    let spec = FilterSpec {
        url_patterns: if cli.patterns.is_empty() {
            vec!["*".to_string()]
        } else {
            cli.patterns.clone()
        },
        allowed_domains: if cli.domains.is_empty() {
            cli.url
                .host_str()
                .map(|host| vec![host.to_string()])
                .unwrap_or_default()
        } else {
            cli.domains.clone()
        },
        allowed_content_types: cli.content_types.clone(),
    };
    let chain = FilterChain::new(&spec)?;

    let target = CrawlTarget::new(cli.url.clone())
        .with_max_depth(cli.depth)
        .with_include_external(cli.include_external);

    let engine = HttpCrawlEngine::new(EngineConfig {
        max_pages: cli.max_pages,
        delay_ms: cli.rate,
        ..EngineConfig::default()
    })?;

    let writer = MarkdownWriter::new(&cli.output_dir);
    let runner = Runner::new(engine, provider, writer, target, chain, cli.name.as_str());

    let summary = runner.run().await?;

    println!(
        "Crawl completed: {} pages crawled, {} sections written",
        summary.pages_crawled, summary.sections_written
    );
    if summary.sections_written < summary.pages_crawled {
        println!(
            "{} pages skipped due to extraction failures",
            summary.pages_crawled - summary.sections_written
        );
    }
    println!("Results saved to {}", summary.output_path.display());

    Ok(())
}
