//! Rule-based field extraction for the invoice template.
//!
//! A [`RuleSet`] is an ordered list of named pattern rules plus the anchor
//! segments used for block fields. The built-in template is
//! [`RuleSet::default`]; alternate templates can be described with
//! [`RuleSpec`]s without touching the extraction code.

pub mod amounts;
pub mod model;
pub mod normalize;
pub mod order;
pub mod patterns;
pub mod segment;

pub use amounts::parse_amount;
pub use model::clean_model;
pub use normalize::{collapse_whitespace, normalize_text};
pub use order::collapse_duplicated;
pub use segment::segment;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;
use crate::models::fields::{ExtractedFields, Field};
use patterns::{GRAND_TOTAL, INVOICE_NUMBER, ORDER_DATE, ORDER_LINE};

/// Marker opening the line-item block.
pub const MODEL_START_MARKER: &str = "Value ₹";

/// Marker closing the line-item block.
pub const MODEL_END_MARKER: &str = "Warranty";

/// How a rule turns a regex match into a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// The capture group, trimmed.
    Group(usize),
    /// The capture group, trimmed, with duplicated halves collapsed.
    Collapsed(usize),
}

impl Capture {
    fn group(&self) -> usize {
        match self {
            Capture::Group(g) | Capture::Collapsed(g) => *g,
        }
    }
}

/// A named pattern rule producing one field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: String,
    pub field: Field,
    pub pattern: Regex,
    pub capture: Capture,
}

impl FieldRule {
    /// Build a rule, checking that the pattern has the captured group.
    pub fn new(
        name: impl Into<String>,
        field: Field,
        pattern: Regex,
        capture: Capture,
    ) -> Result<Self, ExtractionError> {
        let name = name.into();
        let available = pattern.captures_len() - 1;
        if capture.group() > available {
            return Err(ExtractionError::MissingGroup {
                rule: name,
                group: capture.group(),
                available,
            });
        }

        Ok(Self {
            name,
            field,
            pattern,
            capture,
        })
    }

    /// Apply the rule to the first match in `text`.
    pub fn apply(&self, text: &str) -> Option<String> {
        let caps = self.pattern.captures(text)?;
        let value = caps.get(self.capture.group())?.as_str().trim();

        let value = match self.capture {
            Capture::Group(_) => value.to_string(),
            Capture::Collapsed(_) => collapse_duplicated(value),
        };

        (!value.is_empty()).then_some(value)
    }
}

/// A field carved out between two anchor markers and cleaned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRule {
    pub field: Field,
    pub start_marker: String,
    pub end_marker: String,
}

impl SegmentRule {
    pub fn apply(&self, text: &str) -> Option<String> {
        let block = segment(text, &self.start_marker, &self.end_marker);
        let value = clean_model(block);
        (!value.is_empty()).then_some(value)
    }
}

/// Serializable description of a pattern rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    pub field: Field,
    pub pattern: String,
    #[serde(default = "default_group")]
    pub group: usize,
    #[serde(default)]
    pub collapse_duplicates: bool,
}

fn default_group() -> usize {
    1
}

impl RuleSpec {
    /// Compile into a [`FieldRule`].
    pub fn compile(&self) -> Result<FieldRule, ExtractionError> {
        let pattern = Regex::new(&self.pattern).map_err(|e| ExtractionError::InvalidPattern {
            rule: self.name.clone(),
            reason: e.to_string(),
        })?;

        let capture = if self.collapse_duplicates {
            Capture::Collapsed(self.group)
        } else {
            Capture::Group(self.group)
        };

        FieldRule::new(self.name.clone(), self.field, pattern, capture)
    }
}

/// Ordered set of extraction rules for one invoice template.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
    segments: Vec<SegmentRule>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// Build a rule set from specs plus the model anchors.
    pub fn from_specs(
        specs: &[RuleSpec],
        start_marker: &str,
        end_marker: &str,
    ) -> Result<Self, ExtractionError> {
        let rules = specs
            .iter()
            .map(RuleSpec::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::empty()
            .with_rules(rules)
            .with_segment(Field::Model, start_marker, end_marker))
    }

    /// Append pattern rules.
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = FieldRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Append an anchor segment rule.
    pub fn with_segment(mut self, field: Field, start_marker: &str, end_marker: &str) -> Self {
        self.segments.push(SegmentRule {
            field,
            start_marker: start_marker.to_string(),
            end_marker: end_marker.to_string(),
        });
        self
    }

    /// Replace the anchors of every segment rule for `field`.
    pub fn with_markers(mut self, field: Field, start_marker: &str, end_marker: &str) -> Self {
        for seg in self.segments.iter_mut().filter(|s| s.field == field) {
            seg.start_marker = start_marker.to_string();
            seg.end_marker = end_marker.to_string();
        }
        self
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn segments(&self) -> &[SegmentRule] {
        &self.segments
    }

    /// Run every rule over normalized text.
    ///
    /// Rules are independent; for each field the first rule that yields a
    /// non-empty value wins and later rules for that field are skipped.
    pub fn apply(&self, text: &str) -> ExtractedFields {
        let mut fields = ExtractedFields::default();

        for rule in &self.rules {
            if !fields.get(rule.field).is_empty() {
                continue;
            }
            if let Some(value) = rule.apply(text) {
                fields.set(rule.field, value);
            }
        }

        for seg in &self.segments {
            if !fields.get(seg.field).is_empty() {
                continue;
            }
            if let Some(value) = seg.apply(text) {
                fields.set(seg.field, value);
            }
        }

        fields
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        let builtin = [
            ("order_date", Field::Date, &*ORDER_DATE, Capture::Group(1)),
            ("invoice_number", Field::InvoiceNumber, &*INVOICE_NUMBER, Capture::Group(1)),
            ("order_id", Field::OrderId, &*ORDER_LINE, Capture::Group(1)),
            ("order_name", Field::OrderName, &*ORDER_LINE, Capture::Collapsed(2)),
            ("grand_total", Field::GrandTotal, &*GRAND_TOTAL, Capture::Group(1)),
        ];

        let rules = builtin.into_iter().map(|(name, field, pattern, capture)| FieldRule {
            name: name.to_string(),
            field,
            pattern: pattern.clone(),
            capture,
        });

        Self::empty()
            .with_rules(rules)
            .with_segment(Field::Model, MODEL_START_MARKER, MODEL_END_MARKER)
    }
}
