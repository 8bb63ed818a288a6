//! PDF text extraction using poppler's pdftotext and pdfinfo.

use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::{debug, warn};

use super::{Document, TextProvider};

/// Errors from the external poppler tools.
#[derive(Debug, Error)]
pub enum PdfToolError {
    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle command output, extracting stdout on success or returning appropriate error.
fn handle_cmd_output(
    result: std::io::Result<std::process::Output>,
    tool_name: &str,
    error_prefix: &str,
) -> Result<String, PdfToolError> {
    match result {
        Ok(output) if output.status.success() => {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(PdfToolError::ExtractionFailed(format!(
                "{}: {}",
                error_prefix, stderr
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(PdfToolError::ToolNotFound(tool_name.to_string()))
        }
        Err(e) => Err(PdfToolError::Io(e)),
    }
}

/// Collapse layout whitespace the way the full text is built, so excerpts
/// quoted from the full text can be found again in page text.
pub fn normalize_page_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Per-page PDF text extraction.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextProvider;

impl PdfTextProvider {
    pub fn new() -> Self {
        Self
    }

    /// Get the page count of a PDF.
    pub fn page_count(&self, file_path: &Path) -> Option<u32> {
        let output = Command::new("pdfinfo").arg(file_path).output().ok()?;
        if !output.status.success() {
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .lines()
            .find(|line| line.starts_with("Pages:"))
            .and_then(|line| line.split_whitespace().nth(1))
            .and_then(|s| s.parse().ok())
    }

    /// Run pdftotext on a single page of a PDF file.
    pub fn page_text(&self, file_path: &Path, page: u32) -> Result<String, PdfToolError> {
        let page_str = page.to_string();
        let output = Command::new("pdftotext")
            .args(["-layout", "-enc", "UTF-8", "-f", &page_str, "-l", &page_str])
            .arg(file_path)
            .arg("-")
            .output();

        handle_cmd_output(
            output,
            "pdftotext (install poppler-utils)",
            &format!("pdftotext failed on page {}", page),
        )
    }

    /// Run pdftotext on the whole file; pages come back separated by form feeds.
    fn whole_text(&self, file_path: &Path) -> Result<String, PdfToolError> {
        let output = Command::new("pdftotext")
            .args(["-layout", "-enc", "UTF-8"])
            .arg(file_path)
            .arg("-")
            .output();

        handle_cmd_output(output, "pdftotext (install poppler-utils)", "pdftotext failed")
    }

    fn pages_or_err(&self, file_path: &Path) -> Result<Vec<String>, PdfToolError> {
        match self.page_count(file_path) {
            Some(count) => {
                let mut pages = Vec::with_capacity(count as usize);
                for page in 1..=count {
                    let text = match self.page_text(file_path, page) {
                        Ok(text) => text,
                        Err(PdfToolError::ToolNotFound(tool)) => {
                            return Err(PdfToolError::ToolNotFound(tool))
                        }
                        Err(e) => {
                            debug!("Page {} of {}: {}", page, file_path.display(), e);
                            String::new()
                        }
                    };
                    pages.push(normalize_page_text(&text));
                }
                Ok(pages)
            }
            None => {
                // pdfinfo unavailable; fall back to form-feed splitting
                let text = self.whole_text(file_path)?;
                Ok(text
                    .split('\u{000C}')
                    .map(normalize_page_text)
                    .collect::<Vec<_>>())
            }
        }
    }

    /// Check which poppler tools are installed.
    pub fn check_tools() -> Vec<(String, bool)> {
        ["pdftotext", "pdfinfo"]
            .iter()
            .map(|tool| (tool.to_string(), check_binary(tool)))
            .collect()
    }
}

/// Check if a binary is on PATH.
pub fn check_binary(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

impl TextProvider for PdfTextProvider {
    fn extract_full_text(&self, path: &Path) -> String {
        self.load(path).text
    }

    fn extract_pages(&self, path: &Path) -> Vec<String> {
        match self.pages_or_err(path) {
            Ok(pages) => pages,
            Err(e) => {
                warn!("PDF text extraction failed for {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    fn load(&self, path: &Path) -> Document {
        Document::from_pages(self.extract_pages(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_page_text() {
        assert_eq!(
            normalize_page_text("  Revenue grew\nstrongly  in Q3\n"),
            "Revenue grew strongly in Q3"
        );
    }

    #[test]
    fn test_layout_runs_collapse_for_citations() {
        let page = normalize_page_text("Revenue    grew 12%   in   the year");
        assert_eq!(page, "Revenue grew 12% in the year");
        assert_eq!(
            crate::analysis::citation::find_page("Revenue grew 12% in the year", &[page]),
            Some(1)
        );
    }

    #[test]
    fn test_check_tools_lists_poppler() {
        let tools = PdfTextProvider::check_tools();
        let names: Vec<_> = tools.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["pdftotext", "pdfinfo"]);
    }

    #[test]
    fn test_unreadable_pdf_folds_to_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf").unwrap();

        let provider = PdfTextProvider::new();
        assert!(provider.extract_full_text(&path).is_empty());
    }
}
