//! WASM bindings for invoice field extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! PDF reading happens on the JavaScript side; these functions work on the
//! extracted text.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use invx_core::invoice::rules;
use invx_core::{Admission, BatchAggregator, ExtractedFields, InvoiceParser, TemplateParser};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract the six invoice fields from document text.
///
/// Returns `{ fields, warnings, processing_time_ms }`, where `fields` holds
/// `date`, `invoice_number`, `order_id`, `order_name`, `model` and
/// `grand_total`, and `warnings` names the fields left empty.
#[wasm_bindgen]
pub fn extract_fields_from_text(text: &str) -> Result<JsValue, JsValue> {
    #[derive(Serialize)]
    struct Output {
        fields: ExtractedFields,
        warnings: Vec<String>,
        processing_time_ms: u64,
    }

    let result = TemplateParser::new().parse(text);

    to_js(&Output {
        fields: result.fields,
        warnings: result.warnings,
        processing_time_ms: result.processing_time_ms,
    })
}

/// Clean a raw line-item block into a model string.
#[wasm_bindgen]
pub fn clean_model(block: &str) -> String {
    rules::clean_model(block)
}

/// Text strictly between the first `start` marker and the next `end` marker.
#[wasm_bindgen]
pub fn segment(text: &str, start: &str, end: &str) -> String {
    rules::segment(text, start, end).to_string()
}

/// CSV column names, in output order.
#[wasm_bindgen]
pub fn columns() -> Vec<String> {
    ExtractedFields::columns().iter().map(|c| c.to_string()).collect()
}

/// Deduplicating batch for documents whose text is extracted in the browser.
#[wasm_bindgen]
pub struct BatchSession {
    parser: TemplateParser,
    aggregator: BatchAggregator,
}

#[wasm_bindgen]
impl BatchSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: TemplateParser::new(),
            aggregator: BatchAggregator::new(),
        }
    }

    /// Extract `text` and offer the row.
    ///
    /// Returns `"added"`, `"missing_invoice_number"` or `"duplicate"`.
    pub fn add(&mut self, id: &str, text: &str) -> String {
        let fields = self.parser.parse(text).fields;
        match self.aggregator.accept(id, fields) {
            Admission::Added => "added",
            Admission::MissingInvoiceNumber => "missing_invoice_number",
            Admission::Duplicate => "duplicate",
        }
        .to_string()
    }

    /// Record a document the caller could not read.
    pub fn add_failure(&mut self, id: &str, reason: &str) {
        self.aggregator.fail(id, reason);
    }

    /// Rows kept so far, in the order they were added.
    pub fn rows(&self) -> Result<JsValue, JsValue> {
        to_js(&self.aggregator.rows())
    }

    /// Failures recorded so far.
    pub fn failures(&self) -> Result<JsValue, JsValue> {
        to_js(&self.aggregator.failures())
    }

    #[wasm_bindgen(getter)]
    pub fn row_count(&self) -> usize {
        self.aggregator.rows().len()
    }

    #[wasm_bindgen(getter)]
    pub fn failure_count(&self) -> usize {
        self.aggregator.failures().len()
    }
}

impl Default for BatchSession {
    fn default() -> Self {
        Self::new()
    }
}
