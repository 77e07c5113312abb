//! Template parser applying a rule set to document text.

use std::time::Instant;

use lazy_static::lazy_static;
use tracing::debug;

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::fields::{ExtractedFields, Field};

use super::rules::{normalize_text, RuleSet};

lazy_static! {
    static ref DEFAULT_PARSER: TemplateParser = TemplateParser::new();
}

/// Result of invoice extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted fields.
    pub fields: ExtractedFields,
    /// Extraction warnings, one per field left empty.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for invoice parsing.
///
/// Parsing never fails: a field whose anchor is missing is left empty.
pub trait InvoiceParser {
    /// Parse invoice fields from extracted document text.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Parser for a single invoice template described by a [`RuleSet`].
#[derive(Debug, Clone, Default)]
pub struct TemplateParser {
    rules: RuleSet,
}

impl TemplateParser {
    /// Create a parser for the built-in template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with a custom rule set.
    pub fn with_rules(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        let rules = match &config.rules {
            Some(specs) => {
                RuleSet::from_specs(specs, &config.model_start_marker, &config.model_end_marker)?
            }
            None => RuleSet::default().with_markers(
                Field::Model,
                &config.model_start_marker,
                &config.model_end_marker,
            ),
        };

        Ok(Self::with_rules(rules))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl InvoiceParser for TemplateParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();

        let normalized = normalize_text(text);
        let fields = self.rules.apply(&normalized);

        let warnings: Vec<String> = fields
            .missing()
            .into_iter()
            .map(|f| format!("Could not extract {}", f.column().to_lowercase()))
            .collect();

        debug!(
            "Extracted invoice {:?} with {} empty fields",
            fields.invoice_number,
            warnings.len()
        );

        ExtractionResult {
            fields,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Extract fields from text with the built-in template.
pub fn extract_fields(text: &str) -> ExtractedFields {
    DEFAULT_PARSER.parse(text).fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "Tax Invoice\n\
        Order Date: 2024-01-05\n\
        Invoice Number #ABC123\n\
        Order ID: OD998877 Blue Shirt Blue Shirt\n\
        Description Qty Gross Amount Value ₹ Blue Shirt\nFSN:ABC\n1\n-100.00\n Warranty 6 months\n\
        Grand Total ₹1,234.56";

    #[test]
    fn test_end_to_end_sample() {
        let fields = extract_fields(SAMPLE);

        assert_eq!(
            fields,
            ExtractedFields {
                date: "2024-01-05".to_string(),
                invoice_number: "ABC123".to_string(),
                order_id: "OD998877".to_string(),
                order_name: "Blue Shirt".to_string(),
                model: "Blue Shirt".to_string(),
                grand_total: "1,234.56".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let result = TemplateParser::new().parse("Just some unrelated text\nwith two lines");

        assert_eq!(result.fields, ExtractedFields::default());
        assert_eq!(result.warnings.len(), 6);
        assert_eq!(result.warnings[1], "Could not extract invoice number");
    }

    #[test]
    fn test_fields_are_independent() {
        let fields = extract_fields("Grand Total ₹ 499\nInvoice Number # FAB0001");

        assert_eq!(fields.invoice_number, "FAB0001");
        assert_eq!(fields.grand_total, "499");
        assert_eq!(fields.date, "");
        assert_eq!(fields.model, "");
    }

    #[test]
    fn test_invoice_number_uppercase_only() {
        assert_eq!(extract_fields("Invoice Number #abc").invoice_number, "");
        assert_eq!(extract_fields("Invoice Number #AB12cd").invoice_number, "AB12");
    }

    #[test]
    fn test_order_name_is_rest_of_line() {
        let fields = extract_fields("OD12345 Blue Shirt Red Pants\nNext line");
        assert_eq!(fields.order_id, "OD12345");
        assert_eq!(fields.order_name, "Blue Shirt Red Pants");

        let fields = extract_fields("OD12345\nBlue Shirt");
        assert_eq!(fields.order_id, "OD12345");
        assert_eq!(fields.order_name, "");
    }

    #[test]
    fn test_order_absent() {
        let fields = extract_fields("Order pending");
        assert_eq!(fields.order_id, "");
        assert_eq!(fields.order_name, "");
    }

    #[test]
    fn test_whitespace_normalized_before_matching() {
        let fields = extract_fields("Order Date:\t05-01-2024\r\nValue\u{00a0}₹ Phone X\r\nWarranty");
        assert_eq!(fields.date, "05-01-2024");
        assert_eq!(fields.model, "Phone X");
    }

    #[test]
    fn test_from_config_custom_markers() {
        let config = ExtractionConfig {
            model_start_marker: "Items".to_string(),
            model_end_marker: "End".to_string(),
            rules: None,
        };
        let parser = TemplateParser::from_config(&config).unwrap();

        let fields = parser.parse("Invoice Number #X1\nItems\nPhone Y\nIMEI 1\nEnd").fields;
        assert_eq!(fields.invoice_number, "X1");
        assert_eq!(fields.model, "Phone Y");
    }
}
