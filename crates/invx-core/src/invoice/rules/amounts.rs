//! Amount parsing for rupee totals.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a rupee amount as printed on the invoice.
///
/// Grouping commas are dropped, so both western ("1,234.56") and Indian
/// ("1,23,456.78") grouping parse. Returns `None` for anything that is not a
/// plain decimal number afterwards.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .trim()
        .trim_start_matches('₹')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    let cleaned = cleaned.trim_end_matches('.');

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(cleaned).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), Some(Decimal::from_str("1234.56").unwrap()));
        assert_eq!(parse_amount("1,23,456.78"), Some(Decimal::from_str("123456.78").unwrap()));
        assert_eq!(parse_amount("₹ 999"), Some(Decimal::from(999)));
        assert_eq!(parse_amount("15999."), Some(Decimal::from(15999)));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount(",,."), None);
        assert_eq!(parse_amount("1.2.3"), None);
    }
}
