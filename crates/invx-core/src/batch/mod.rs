//! Batch aggregation over many documents.
//!
//! The aggregator consumes per-document outcomes in a fixed order, keeps the
//! first row seen for each invoice number, and records failures without
//! stopping. Callers that extract documents in parallel must still feed the
//! aggregator in input order so that "first seen wins" is deterministic.

use std::collections::HashSet;
use std::fmt::Display;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::invoice::rules::parse_amount;
use crate::models::fields::ExtractedFields;

#[cfg(feature = "native")]
use crate::invoice::InvoiceParser;
#[cfg(feature = "native")]
use crate::pdf::TextSource;
#[cfg(feature = "native")]
use crate::staging::StagedDocument;

/// A document that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    /// Document identifier.
    pub id: String,
    /// Human-readable reason.
    pub reason: String,
}

/// What happened to an extracted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Appended to the output rows.
    Added,
    /// Dropped: no invoice number.
    MissingInvoiceNumber,
    /// Dropped: invoice number already seen.
    Duplicate,
}

/// Accumulates rows and failures for one run.
#[derive(Debug, Default)]
pub struct BatchAggregator {
    rows: Vec<ExtractedFields>,
    failures: Vec<DocumentFailure>,
    seen: HashSet<String>,
    documents: usize,
    missing_invoice_number: usize,
    duplicates: usize,
}

impl BatchAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one document.
    pub fn record<E: Display>(
        &mut self,
        id: impl Into<String>,
        outcome: Result<ExtractedFields, E>,
    ) -> Option<Admission> {
        match outcome {
            Ok(fields) => Some(self.accept(id, fields)),
            Err(e) => {
                self.fail(id, e.to_string());
                None
            }
        }
    }

    /// Offer an extracted row.
    pub fn accept(&mut self, id: impl Into<String>, fields: ExtractedFields) -> Admission {
        self.documents += 1;
        let id = id.into();

        if fields.invoice_number.is_empty() {
            debug!("{}: no invoice number, row dropped", id);
            self.missing_invoice_number += 1;
            return Admission::MissingInvoiceNumber;
        }

        if !self.seen.insert(fields.invoice_number.clone()) {
            debug!("{}: invoice {} already seen", id, fields.invoice_number);
            self.duplicates += 1;
            return Admission::Duplicate;
        }

        self.rows.push(fields);
        Admission::Added
    }

    /// Record a failed document.
    pub fn fail(&mut self, id: impl Into<String>, reason: impl Into<String>) {
        self.documents += 1;
        let failure = DocumentFailure {
            id: id.into(),
            reason: reason.into(),
        };
        warn!("Failed: {} ({})", failure.id, failure.reason);
        self.failures.push(failure);
    }

    pub fn rows(&self) -> &[ExtractedFields] {
        &self.rows
    }

    pub fn failures(&self) -> &[DocumentFailure] {
        &self.failures
    }

    /// Close the run.
    pub fn finish(self) -> BatchReport {
        info!(
            "Batch finished: {} documents, {} rows, {} failures",
            self.documents,
            self.rows.len(),
            self.failures.len()
        );

        BatchReport {
            rows: self.rows,
            failures: self.failures,
            documents: self.documents,
            missing_invoice_number: self.missing_invoice_number,
            duplicates: self.duplicates,
        }
    }
}

/// Final result of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Deduplicated rows, in input order.
    pub rows: Vec<ExtractedFields>,
    /// Documents that could not be processed, in input order.
    pub failures: Vec<DocumentFailure>,
    /// Documents offered to the aggregator.
    pub documents: usize,
    /// Rows dropped for lacking an invoice number.
    pub missing_invoice_number: usize,
    /// Rows dropped as repeated invoice numbers.
    pub duplicates: usize,
}

impl BatchReport {
    /// True when nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of every row's grand total that parses as an amount.
    pub fn grand_total_sum(&self) -> Decimal {
        self.rows
            .iter()
            .filter_map(|r| parse_amount(&r.grand_total))
            .sum()
    }
}

/// Extract and aggregate documents sequentially, in the given order.
#[cfg(feature = "native")]
pub fn process_all<S, P>(documents: &[StagedDocument], source: &S, parser: &P) -> BatchReport
where
    S: TextSource,
    P: InvoiceParser,
{
    let mut aggregator = BatchAggregator::new();

    for doc in documents {
        let outcome = source
            .read_text(&doc.path)
            .map(|text| parser.parse(&text).fields);
        aggregator.record(doc.label.as_str(), outcome);
    }

    aggregator.finish()
}
