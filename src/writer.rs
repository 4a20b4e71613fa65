//! Streaming markdown artifact
//!
//! One run produces one append-only markdown file. The file stays readable
//! after every successful call: `initialize` writes the header and flushes,
//! `append_section` writes one complete section and flushes. Nothing is
//! buffered across calls, so an interrupted run leaves a valid file up to
//! the last completed section.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info};

/// Writes streaming markdown artifacts into an output directory
#[derive(Debug, Clone)]
pub struct MarkdownWriter {
    output_dir: PathBuf,
}

/// Handle to one initialized artifact; sections can only be appended
#[derive(Debug)]
pub struct Artifact {
    file: File,
    path: PathBuf,
}

impl MarkdownWriter {
    /// Create a writer targeting the given directory
    ///
    /// The directory itself is created lazily by `initialize`, so a run
    /// that fails before writing leaves no filesystem trace.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Start a new artifact under a generated, timestamped filename
    pub fn initialize(&self, base_filename: &str, title: &str) -> io::Result<Artifact> {
        let path = self.output_dir.join(generate_filename(base_filename));
        self.initialize_at(&path, title)
    }

    /// Start a new artifact at an exact path, truncating any prior content
    pub fn initialize_at(&self, path: &Path, title: &str) -> io::Result<Artifact> {
        fs::create_dir_all(&self.output_dir)?;

        let mut file = File::create(path)?;
        write!(file, "# {title}\n\n")?;
        write!(
            file,
            "*Generated on: {}*\n\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        write!(file, "---\n\n")?;
        file.flush()?;

        info!("Initialized artifact at {}", path.display());
        Ok(Artifact {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Artifact {
    /// Append one titled section and flush before returning
    ///
    /// Failures are not retryable for this section; the content is not
    /// buffered anywhere else.
    pub fn append_section(&mut self, title: &str, content: &str) -> io::Result<()> {
        write!(self.file, "## {title}\n\n{content}\n\n")?;
        self.file.flush()?;

        debug!("Appended section '{}'", title);
        Ok(())
    }

    /// Path of the artifact file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Build `<sanitized>_<timestamp>.md` from a base name
///
/// Sanitization keeps alphanumerics, spaces, hyphens and underscores,
/// replaces spaces with underscores and lowercases the result.
fn generate_filename(base_name: &str) -> String {
    let sanitized: String = base_name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let sanitized = sanitized.trim_end().replace(' ', "_").to_lowercase();

    format!("{}_{}.md", sanitized, Local::now().format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_initialize_writes_header() {
        let dir = tempdir().unwrap();
        let writer = MarkdownWriter::new(dir.path());

        let artifact = writer.initialize("docs", "Web Crawl Results - 2 pages").unwrap();
        let content = fs::read_to_string(artifact.path()).unwrap();

        assert!(content.starts_with("# Web Crawl Results - 2 pages\n\n"));
        assert!(content.contains("*Generated on: "));
        assert!(content.contains("---\n\n"));
    }

    #[test]
    fn test_sections_appear_in_append_order() {
        let dir = tempdir().unwrap();
        let writer = MarkdownWriter::new(dir.path());

        let mut artifact = writer.initialize("docs", "Results").unwrap();
        artifact.append_section("Page 1: https://a", "first").unwrap();
        artifact.append_section("Page 2: https://b", "second").unwrap();

        let content = fs::read_to_string(artifact.path()).unwrap();
        let first = content.find("## Page 1: https://a").unwrap();
        let second = content.find("## Page 2: https://b").unwrap();

        assert!(first < second);
        assert!(content.contains("first\n\n"));
        assert!(content.contains("second\n\n"));
    }

    #[test]
    fn test_reinitialize_truncates_previous_content() {
        let dir = tempdir().unwrap();
        let writer = MarkdownWriter::new(dir.path());
        let path = dir.path().join("fixed.md");

        let mut artifact = writer.initialize_at(&path, "First run").unwrap();
        artifact.append_section("Page 1: https://a", "stale").unwrap();
        drop(artifact);

        writer.initialize_at(&path, "Second run").unwrap();
        let content = fs::read_to_string(&path).unwrap();

        assert!(content.starts_with("# Second run"));
        assert!(!content.contains("First run"));
        assert!(!content.contains("stale"));
    }

    #[test]
    fn test_initialize_creates_output_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("out").join("digests");
        let writer = MarkdownWriter::new(&nested);

        let artifact = writer.initialize("docs", "Results").unwrap();

        assert!(nested.is_dir());
        assert!(artifact.path().starts_with(&nested));
    }

    #[test]
    fn test_generate_filename_sanitizes_base_name() {
        let name = generate_filename("My Crawl: Results! (v2)");

        assert!(name.starts_with("my_crawl_results_v2_"));
        assert!(name.ends_with(".md"));
        assert!(!name.contains(':'));
        assert!(!name.contains('!'));
    }
}
