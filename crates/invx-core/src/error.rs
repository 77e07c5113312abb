//! Error types for the invx-core library.
//!
//! A missing field is never an error: extraction reports it as an empty
//! string. Errors here describe documents or containers that could not be
//! read at all, and rule sets that could not be built.

use thiserror::Error;

/// Main error type for the invx library.
#[derive(Error, Debug)]
pub enum InvxError {
    /// Text could not be extracted from a document.
    #[error("document error: {0}")]
    Document(#[from] DocumentReadError),

    /// An archive could not be opened or expanded.
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Rule set construction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed or written.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning a document into text.
#[derive(Error, Debug)]
pub enum DocumentReadError {
    /// Failed to open/parse the document.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// Failed to extract text from the document.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The file type has no text extractor.
    #[error("unsupported document type: {0}")]
    Unsupported(String),

    /// The file could not be read from disk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while expanding a compressed container.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("failed to open archive: {0}")]
    OpenFailed(String),

    #[error("failed to read archive entry: {0}")]
    ReadEntry(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "native")]
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Errors related to building an extraction rule set.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A rule pattern failed to compile.
    #[error("invalid pattern for rule {rule}: {reason}")]
    InvalidPattern { rule: String, reason: String },

    /// A rule refers to a capture group its pattern does not have.
    #[error("rule {rule} captures group {group} but pattern has {available}")]
    MissingGroup {
        rule: String,
        group: usize,
        available: usize,
    },
}

/// Result type for the invx library.
pub type Result<T> = std::result::Result<T, InvxError>;
