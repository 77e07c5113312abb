//! Document text extraction.

mod extractor;

pub use extractor::{join_pages, PdfExtractor};

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::DocumentReadError;

/// Result type for document reading.
pub type Result<T> = std::result::Result<T, DocumentReadError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text page by page, in page order.
    fn extract_pages(&self) -> Result<Vec<String>>;

    /// Extract text from the entire PDF, pages joined by newlines.
    fn extract_text(&self) -> Result<String> {
        self.extract_pages().map(join_pages)
    }
}

/// Anything that can turn a document on disk into text.
pub trait TextSource {
    fn read_text(&self, path: &Path) -> Result<String>;
}

/// Kind of document, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// PDF with embedded text.
    Pdf,
    /// Text that was already extracted.
    Text,
    /// Zip container of documents.
    Archive,
}

impl DocumentKind {
    /// Detect the kind from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Text),
            "zip" => Some(Self::Archive),
            _ => None,
        }
    }

    /// Whether this kind is a document (as opposed to a container).
    pub fn is_document(&self) -> bool {
        matches!(self, Self::Pdf | Self::Text)
    }
}

/// Reads documents from disk, dispatching on extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextSource;

impl TextSource for FileTextSource {
    fn read_text(&self, path: &Path) -> Result<String> {
        match DocumentKind::from_path(path) {
            Some(DocumentKind::Pdf) => {
                let data = fs::read(path)?;
                let mut extractor = PdfExtractor::new();
                extractor.load(&data)?;
                let text = extractor.extract_text()?;
                debug!("Read {} chars from {}", text.len(), path.display());
                Ok(text)
            }
            Some(DocumentKind::Text) => Ok(fs::read_to_string(path)?),
            _ => Err(DocumentReadError::Unsupported(path.display().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_document_kind() {
        assert_eq!(DocumentKind::from_path(Path::new("a/B.PDF")), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_path(Path::new("a.txt")), Some(DocumentKind::Text));
        assert_eq!(DocumentKind::from_path(Path::new("a.Zip")), Some(DocumentKind::Archive));
        assert_eq!(DocumentKind::from_path(Path::new("a.docx")), None);
        assert_eq!(DocumentKind::from_path(Path::new("README")), None);
        assert!(!DocumentKind::Archive.is_document());
    }

    #[test]
    fn test_read_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.txt");
        fs::write(&path, "Invoice Number #A1\n").unwrap();

        assert_eq!(FileTextSource.read_text(&path).unwrap(), "Invoice Number #A1\n");
    }

    #[test]
    fn test_unsupported_and_missing() {
        let err = FileTextSource.read_text(Path::new("scan.png")).unwrap_err();
        assert!(matches!(err, DocumentReadError::Unsupported(_)));

        let err = FileTextSource
            .read_text(&PathBuf::from("/nonexistent/invoice.pdf"))
            .unwrap_err();
        assert!(matches!(err, DocumentReadError::Io(_)));
    }

    #[test]
    fn test_corrupt_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, b"not a pdf at all").unwrap();

        let err = FileTextSource.read_text(&path).unwrap_err();
        assert!(matches!(err, DocumentReadError::Parse(_)));
    }
}
