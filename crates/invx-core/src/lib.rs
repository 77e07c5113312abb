//! Core library for invoice field extraction.
//!
//! This crate provides:
//! - Anchor-based field extraction (date, invoice number, order, model, total)
//! - Model-string cleanup for noisy line-item blocks
//! - Batch aggregation with invoice-number deduplication
//! - PDF text extraction, archive expansion and input staging (`native` feature)

pub mod batch;
pub mod error;
pub mod invoice;
pub mod models;
#[cfg(feature = "native")]
pub mod pdf;
#[cfg(feature = "native")]
pub mod staging;

pub use batch::{Admission, BatchAggregator, BatchReport, DocumentFailure};
pub use error::{ArchiveError, DocumentReadError, ExtractionError, InvxError, Result};
pub use invoice::{extract_fields, ExtractionResult, InvoiceParser, TemplateParser};
pub use models::fields::{ExtractedFields, Field};

#[cfg(feature = "native")]
pub use batch::process_all;
#[cfg(feature = "native")]
pub use pdf::{DocumentKind, FileTextSource, PdfExtractor, PdfProcessor, TextSource};
#[cfg(feature = "native")]
pub use staging::{StagedDocument, StagingSession};
