/// Parses an arbitrary source token into a non-negative amount.
///
/// Currency symbols, thousands separators, percent signs, and any other
/// locale noise are stripped before parsing; anything that still fails to
/// parse (including "N/A", "--", and the empty string) resolves to 0.0.
/// Absorbing bad tokens locally is deliberate: a missing or mangled figure
/// is a defaulted line item, never an error surfaced to the caller.
pub fn normalize_amount(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Whether a table cell looks like an amount rather than a label.
///
/// Requires at least one digit, and tolerates only the characters that
/// appear in formatted figures: grouping commas, a decimal point, percent,
/// accounting-style parentheses and minus, whitespace, and the common
/// currency symbols.
pub fn is_numeric_token(cell: &str) -> bool {
    let trimmed = cell.trim();
    if trimmed.is_empty() || !trimmed.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    trimmed.chars().all(|c| {
        c.is_ascii_digit()
            || c.is_whitespace()
            || matches!(c, '.' | ',' | '%' | '-' | '(' | ')' | '₹' | '$' | '€' | '£')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_currency_and_grouping() {
        assert_eq!(normalize_amount("₹1,23,456.00"), 123456.0);
        assert_eq!(normalize_amount("$2,500,000"), 2500000.0);
        assert_eq!(normalize_amount("  7,000,000.50 "), 7000000.5);
    }

    #[test]
    fn test_normalize_absorbs_unparseable_tokens() {
        assert_eq!(normalize_amount("N/A"), 0.0);
        assert_eq!(normalize_amount(""), 0.0);
        assert_eq!(normalize_amount("--"), 0.0);
        assert_eq!(normalize_amount("1.2.3"), 0.0);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let first = normalize_amount("₹5,250,000.00");
        let second = normalize_amount(&first.to_string());
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_never_negative() {
        assert_eq!(normalize_amount("-500.00"), 500.0);
        assert_eq!(normalize_amount("(1,000.00)"), 1000.0);
    }

    #[test]
    fn test_numeric_token_classification() {
        assert!(is_numeric_token("3,500,000.00"));
        assert!(is_numeric_token("₹1,23,456.00"));
        assert!(is_numeric_token("(2,000)"));
        assert!(is_numeric_token("30%"));
        assert!(!is_numeric_token("Opening"));
        assert!(!is_numeric_token("FY2023"));
        assert!(!is_numeric_token(""));
        assert!(!is_numeric_token("  "));
    }
}
