//! Extracted invoice fields and the fixed output column order.

use serde::{Deserialize, Serialize};

/// One invoice's extracted fields.
///
/// Every field defaults to an empty string; an empty value means the
/// corresponding anchor was not found in the document text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    /// Order date, verbatim (digits and hyphens).
    pub date: String,

    /// Invoice number; the batch deduplication key.
    pub invoice_number: String,

    /// Order identifier (`OD` followed by digits).
    pub order_id: String,

    /// Line-item description following the order identifier.
    pub order_name: String,

    /// Cleaned product model string.
    pub model: String,

    /// Grand total amount, verbatim (digits, commas and periods).
    pub grand_total: String,
}

/// A single extractable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Date,
    InvoiceNumber,
    OrderId,
    OrderName,
    Model,
    GrandTotal,
}

impl Field {
    /// All fields, in output column order.
    pub const ALL: [Field; 6] = [
        Field::Date,
        Field::InvoiceNumber,
        Field::OrderId,
        Field::OrderName,
        Field::Model,
        Field::GrandTotal,
    ];

    /// Column header used in tabular output.
    pub fn column(&self) -> &'static str {
        match self {
            Field::Date => "Date",
            Field::InvoiceNumber => "Invoice number",
            Field::OrderId => "Order ID",
            Field::OrderName => "Order name",
            Field::Model => "Model",
            Field::GrandTotal => "Grand total amount",
        }
    }
}

impl ExtractedFields {
    /// Header row for tabular output.
    pub fn columns() -> [&'static str; 6] {
        Field::ALL.map(|f| f.column())
    }

    /// Get a field value.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Date => &self.date,
            Field::InvoiceNumber => &self.invoice_number,
            Field::OrderId => &self.order_id,
            Field::OrderName => &self.order_name,
            Field::Model => &self.model,
            Field::GrandTotal => &self.grand_total,
        }
    }

    /// Set a field value.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Date => &mut self.date,
            Field::InvoiceNumber => &mut self.invoice_number,
            Field::OrderId => &mut self.order_id,
            Field::OrderName => &mut self.order_name,
            Field::Model => &mut self.model,
            Field::GrandTotal => &mut self.grand_total,
        };
        *slot = value.into();
    }

    /// Values in output column order.
    pub fn record(&self) -> [&str; 6] {
        Field::ALL.map(|f| self.get(f))
    }

    /// Fields that came back empty.
    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_order() {
        assert_eq!(
            ExtractedFields::columns(),
            [
                "Date",
                "Invoice number",
                "Order ID",
                "Order name",
                "Model",
                "Grand total amount"
            ]
        );
    }

    #[test]
    fn test_set_and_record() {
        let mut fields = ExtractedFields::default();
        fields.set(Field::InvoiceNumber, "INV100");
        fields.set(Field::GrandTotal, "1,234.56");

        assert_eq!(fields.record(), ["", "INV100", "", "", "", "1,234.56"]);
        assert_eq!(
            fields.missing(),
            vec![Field::Date, Field::OrderId, Field::OrderName, Field::Model]
        );
    }

    #[test]
    fn test_field_serde_name() {
        let json = serde_json::to_string(&Field::GrandTotal).unwrap();
        assert_eq!(json, "\"grand_total\"");
    }
}
