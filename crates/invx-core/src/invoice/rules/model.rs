//! Product model cleanup for the line-item block.
//!
//! The block between the model anchors carries the product description mixed
//! with catalogue identifiers, tax codes, quantities and per-line amounts.
//! Cleanup works line by line: identifier lines are dropped, the remaining
//! lines lose their codes and amounts, and what is left is joined into one
//! string.

use super::normalize::collapse_whitespace;
use super::patterns::{DECIMAL_AMOUNT, HSN_SAC, LEADING_HANDSETS, STRAY_QUANTITY};

/// Substrings marking a line as an identifier line.
const NOISE_MARKERS: [&str; 2] = ["FSN:", "IMEI"];

/// Clean a segmented line-item block into a single model string.
pub fn clean_model(block: &str) -> String {
    let lines: Vec<String> = block
        .split('\n')
        .map(str::trim)
        .filter(|line| !is_noise_line(line))
        .map(strip_line_noise)
        .collect();

    let joined = collapse_whitespace(&lines.join(" "));
    LEADING_HANDSETS.replace(&joined, "").into_owned()
}

fn is_noise_line(line: &str) -> bool {
    line.is_empty() || NOISE_MARKERS.iter().any(|marker| line.contains(marker))
}

fn strip_line_noise(line: &str) -> String {
    let line = HSN_SAC.replace_all(line, "");
    let line = DECIMAL_AMOUNT.replace_all(&line, "");
    STRAY_QUANTITY.replace_all(&line, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_lines_dropped() {
        assert_eq!(clean_model("Widget A\nFSN:XYZ123\nIMEI 12345"), "Widget A");
    }

    #[test]
    fn test_noise_marker_is_substring_match() {
        assert_eq!(clean_model("Phone X\nSerial IMEI/2: 99\nCode FSN:AB"), "Phone X");
    }

    #[test]
    fn test_decimal_amounts_stripped() {
        assert_eq!(clean_model("Item -12.50 extra"), "Item extra");
        assert_eq!(clean_model("Item 499.00 199.50"), "Item");
    }

    #[test]
    fn test_standalone_one_stripped() {
        assert_eq!(clean_model("Model 1 Pro"), "Model Pro");
        assert_eq!(clean_model("Model 10 Pro"), "Model 10 Pro");
        assert_eq!(clean_model("Model 21 Pro"), "Model 21 Pro");
    }

    #[test]
    fn test_hsn_code_stripped() {
        assert_eq!(clean_model("Phone X HSN/SAC: 85171300"), "Phone X");
        assert_eq!(clean_model("HSN/SAC:8517 Phone X"), "Phone X");
    }

    #[test]
    fn test_leading_handsets_stripped() {
        assert_eq!(clean_model("Handsets Phone X"), "Phone X");
        assert_eq!(clean_model("HANDSETS\nPhone X"), "Phone X");
        assert_eq!(clean_model("Phone X Handsets"), "Phone X Handsets");
    }

    #[test]
    fn test_realistic_block() {
        let block = " \nHandsets Galaxy M34 5G (Blue, 128 GB) 1 16999.00 -1000.00 13558.47\n\
                     HSN/SAC: 85171300\n\
                     FSN: MOBGQFX6\n\
                     IMEI/SrNo: [[350123456789012]]\n ";

        assert_eq!(clean_model(block), "Galaxy M34 5G (Blue, 128 GB)");
    }

    #[test]
    fn test_empty_block() {
        assert_eq!(clean_model(""), "");
        assert_eq!(clean_model("FSN:ABC\n1\n-100.00"), "");
    }
}
