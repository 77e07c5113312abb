//! Text normalization ahead of anchor matching.

use super::patterns::{HORIZONTAL_SPACE_RUN, INVISIBLE_CHAR, PAGE_MARKER, WHITESPACE_RUN};

/// Normalize extracted document text while keeping its line structure.
///
/// Line endings become `\n`, runs of horizontal whitespace (tabs, NBSP,
/// repeated spaces) become one space, and each line is trimmed.
///
/// Two kinds of extraction boilerplate are stripped as well:
/// - invisible characters (soft hyphen, zero-width space/joiners, BOM) that
///   split anchors such as `Invoice Number #`;
/// - page markers (`Page 1 of 2`) that a page break drops between the
///   `Value ₹` and `Warranty` anchors of the line-item block.
pub fn normalize_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let visible = INVISIBLE_CHAR.replace_all(&unified, "");

    visible
        .split('\n')
        .map(|line| HORIZONTAL_SPACE_RUN.replace_all(line, " ").trim().to_string())
        .filter(|line| !PAGE_MARKER.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse every whitespace run (newlines included) to one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_lines() {
        let text = "Order Date:\t 2024-01-05\r\n  Invoice Number\u{00a0}#ABC123  \n\nGrand Total ₹  10.00";

        assert_eq!(
            normalize_text(text),
            "Order Date: 2024-01-05\nInvoice Number #ABC123\n\nGrand Total ₹ 10.00"
        );
    }

    #[test]
    fn test_invisible_chars_removed_from_anchors() {
        let text = "Invoice\u{200B} Number #\u{FEFF}ABC123\nGrand To\u{00AD}tal ₹ 10.00";

        assert_eq!(
            normalize_text(text),
            "Invoice Number #ABC123\nGrand Total ₹ 10.00"
        );
    }

    #[test]
    fn test_page_markers_dropped() {
        let text = "Value ₹\nBlue Shirt\n  Page 1 of 2 \nPAGE 2/2\nWarranty\nPage one";

        assert_eq!(
            normalize_text(text),
            "Value ₹\nBlue Shirt\nWarranty\nPage one"
        );
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Blue \n\t Shirt  "), "Blue Shirt");
        assert_eq!(collapse_whitespace(" \n "), "");
    }
}
