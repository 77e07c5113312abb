//! Invoice field extraction module.

mod parser;
pub mod rules;

pub use parser::{extract_fields, ExtractionResult, InvoiceParser, TemplateParser};
