//! Document text providers.
//!
//! Providers never fail into the analysis core: extraction problems are
//! logged and folded into an empty string or an empty page list.

mod pdf;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use pdf::{normalize_page_text, PdfTextProvider};

/// Extracted text of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Whole-document text.
    #[serde(alias = "full_text")]
    pub text: String,
    /// Per-page text in physical page order (page 1 first).
    #[serde(default)]
    pub pages: Vec<String>,
}

impl Document {
    pub fn new(text: impl Into<String>, pages: Vec<String>) -> Self {
        Self {
            text: text.into(),
            pages,
        }
    }

    /// Build a document from pages; the full text joins non-empty pages.
    pub fn from_pages(pages: Vec<String>) -> Self {
        let text = pages
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
        Self { text, pages }
    }

    /// True when there is no usable text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Supplies a document's full text and per-page text.
pub trait TextProvider {
    /// Full text, or an empty string when nothing could be extracted.
    fn extract_full_text(&self, path: &Path) -> String;

    /// Per-page text, or an empty list when extraction failed.
    fn extract_pages(&self, path: &Path) -> Vec<String>;

    /// Load both views of a document.
    fn load(&self, path: &Path) -> Document {
        Document::new(self.extract_full_text(path), self.extract_pages(path))
    }
}

/// Reads UTF-8 text files; form feeds separate pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextProvider;

impl PlainTextProvider {
    fn read(&self, path: &Path) -> Option<String> {
        match std::fs::read(path) {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl TextProvider for PlainTextProvider {
    fn extract_full_text(&self, path: &Path) -> String {
        self.read(path)
            .map(|text| text.replace('\u{000C}', "\n\n").trim().to_string())
            .unwrap_or_default()
    }

    fn extract_pages(&self, path: &Path) -> Vec<String> {
        match self.read(path) {
            Some(text) => text
                .split('\u{000C}')
                .map(|p| p.trim().to_string())
                .collect(),
            None => Vec::new(),
        }
    }

    fn load(&self, path: &Path) -> Document {
        let pages = self.extract_pages(path);
        Document::from_pages(pages)
    }
}

/// Load a document from disk, picking a provider by sniffed content type.
pub fn load_document(path: &Path) -> Document {
    let mime = infer::get_from_path(path)
        .ok()
        .flatten()
        .map(|kind| kind.mime_type());
    debug!("Detected content type for {}: {:?}", path.display(), mime);

    let is_pdf = mime == Some("application/pdf")
        || path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        PdfTextProvider::new().load(path)
    } else {
        PlainTextProvider.load(path)
    }
}
