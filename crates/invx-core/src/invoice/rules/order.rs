//! Order line handling.

/// Collapse a line-item description that was emitted twice in a row.
///
/// With an even word count of at least two whose halves match word for word,
/// only the first half is kept. Anything else comes back unchanged.
pub fn collapse_duplicated(raw: &str) -> String {
    let words: Vec<&str> = raw.split_whitespace().collect();
    let count = words.len();

    if count >= 2 && count % 2 == 0 {
        let (first, second) = words.split_at(count / 2);
        if first == second {
            return first.join(" ");
        }
    }

    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_halves_collapse() {
        assert_eq!(collapse_duplicated("Blue Shirt Blue Shirt"), "Blue Shirt");
        assert_eq!(collapse_duplicated("Phone Phone"), "Phone");
    }

    #[test]
    fn test_unequal_halves_unchanged() {
        assert_eq!(collapse_duplicated("Blue Shirt Red Pants"), "Blue Shirt Red Pants");
    }

    #[test]
    fn test_odd_word_count_unchanged() {
        assert_eq!(collapse_duplicated("Blue Shirt X"), "Blue Shirt X");
        assert_eq!(collapse_duplicated("Phone"), "Phone");
    }

    #[test]
    fn test_partial_duplication_unchanged() {
        assert_eq!(
            collapse_duplicated("Blue Shirt (L) Blue Shirt"),
            "Blue Shirt (L) Blue Shirt"
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(collapse_duplicated(""), "");
    }
}
