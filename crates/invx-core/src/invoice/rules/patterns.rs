//! Common regex patterns for the invoice template.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Labeled fields
    pub static ref ORDER_DATE: Regex = Regex::new(
        r"Order Date:\s*([\d-]+)"
    ).unwrap();

    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"Invoice Number\s*#\s*([A-Z0-9]+)"
    ).unwrap();

    pub static ref GRAND_TOTAL: Regex = Regex::new(
        r"Grand Total\s*₹\s*([\d,.]+)"
    ).unwrap();

    // Order id plus the rest of its line
    pub static ref ORDER_LINE: Regex = Regex::new(
        r"(OD\d+)[^\S\n]*([^\n]*)"
    ).unwrap();

    // Model block noise
    pub static ref HSN_SAC: Regex = Regex::new(
        r"HSN/SAC:\s*\d+"
    ).unwrap();

    pub static ref DECIMAL_AMOUNT: Regex = Regex::new(
        r"-?\d+\.\d{2}"
    ).unwrap();

    pub static ref STRAY_QUANTITY: Regex = Regex::new(
        r"\b1\b"
    ).unwrap();

    pub static ref LEADING_HANDSETS: Regex = Regex::new(
        r"(?i)^Handsets\s+"
    ).unwrap();

    // Whitespace
    pub static ref WHITESPACE_RUN: Regex = Regex::new(
        r"\s+"
    ).unwrap();

    pub static ref HORIZONTAL_SPACE_RUN: Regex = Regex::new(
        r"[^\S\n]+"
    ).unwrap();

    // Extraction artifacts around anchors
    pub static ref INVISIBLE_CHAR: Regex = Regex::new(
        r"[\x{00AD}\x{200B}-\x{200D}\x{2060}\x{FEFF}]"
    ).unwrap();

    pub static ref PAGE_MARKER: Regex = Regex::new(
        r"(?i)^page\s+\d+\s*(of|/)\s*\d+$"
    ).unwrap();
}
