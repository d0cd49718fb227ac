use crate::aliases::{compiled_patterns, AMOUNT_TOKEN};
use crate::numeric::normalize_amount;
use crate::policy::{ResolutionPolicy, TextLookahead};
use crate::schema::{
    CanonicalItem, Extraction, FinancialStatement, LineItem, Provenance, SourceWarning,
};
use log::debug;
use std::collections::BTreeMap;

/// Free-text adapter: resolves canonical items out of a document's extracted
/// text by proximity search.
///
/// For each item the label patterns are tried in table order; a pattern
/// resolves at its earliest occurrence that is followed, within the
/// lookahead window, by an amount token. The first pattern that resolves
/// wins the item. A document with no extractable text yields a fully
/// defaulted statement plus a soft warning rather than an error.
pub struct TextAdapter {
    policy: ResolutionPolicy,
}

impl TextAdapter {
    pub fn new() -> Self {
        Self {
            policy: ResolutionPolicy::default(),
        }
    }

    pub fn with_policy(policy: ResolutionPolicy) -> Self {
        Self { policy }
    }

    pub fn extract(&self, text: &str) -> Extraction {
        if text.trim().is_empty() {
            return Extraction {
                statement: FinancialStatement::fully_defaulted(),
                warning: Some(SourceWarning::EmptyDocument),
            };
        }

        let mut resolved = BTreeMap::new();
        for item in CanonicalItem::ALL {
            if let Some(line) = self.resolve_item(item, text) {
                resolved.insert(item, line);
            }
        }

        Extraction {
            statement: FinancialStatement::from_resolutions(resolved),
            warning: None,
        }
    }

    fn resolve_item(&self, item: CanonicalItem, text: &str) -> Option<LineItem> {
        for pattern in compiled_patterns(item) {
            for label_hit in pattern.regex.find_iter(text) {
                let window = self.window_after(text, label_hit.end());
                if let Some(amount) = AMOUNT_TOKEN.find(window) {
                    let raw = amount.as_str().to_string();
                    let value = normalize_amount(&raw);
                    debug!(
                        "Resolved {:?} via pattern '{}' from token '{}' -> {}",
                        item, pattern.source, raw, value
                    );
                    return Some(LineItem {
                        value,
                        provenance: Provenance::Matched {
                            pattern: pattern.source.to_string(),
                            raw,
                        },
                    });
                }
            }
        }
        None
    }

    fn window_after<'a>(&self, text: &'a str, start: usize) -> &'a str {
        let rest = &text[start..];
        match self.policy.lookahead {
            TextLookahead::SameLine => match rest.find('\n') {
                Some(newline) => &rest[..newline],
                None => rest,
            },
            TextLookahead::Chars { limit } => match rest.char_indices().nth(limit) {
                Some((end, _)) => &rest[..end],
                None => rest,
            },
        }
    }
}

impl Default for TextAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_labelled_amounts() {
        let text = "\
            Balance Sheet as at 31 March\n\
            Cash and bank balances                    2,000,000.00\n\
            Sundry Debtors                            6,000,000.00\n\
            Inventory at cost                         5,000,000.00\n";

        let extraction = TextAdapter::new().extract(text);
        assert!(extraction.warning.is_none());

        let statement = &extraction.statement;
        assert_eq!(statement.value(CanonicalItem::CashAndBank), 2_000_000.0);
        assert_eq!(statement.value(CanonicalItem::Debtors), 6_000_000.0);
        assert_eq!(statement.value(CanonicalItem::Inventory), 5_000_000.0);
        assert_eq!(statement.value(CanonicalItem::Ebitda), 0.0);
    }

    #[test]
    fn test_first_listed_pattern_wins() {
        // Both Debtors patterns appear with different figures; the value
        // attached to the first-listed pattern must be chosen even though
        // "Receivables" occurs earlier in the document.
        let text = "\
            Trade Receivables                         9,999,999.00\n\
            Sundry Debtors                            6,000,000.00\n";

        let extraction = TextAdapter::new().extract(text);
        let line = extraction.statement.line(CanonicalItem::Debtors);
        assert_eq!(line.value, 6_000_000.0);
        match &line.provenance {
            Provenance::Matched { pattern, raw } => {
                assert_eq!(pattern, "Debtors");
                assert_eq!(raw, "6,000,000.00");
            }
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn test_same_line_lookahead_stops_at_newline() {
        let text = "EBITDA\n6,500,000.00\n";

        let default_scan = TextAdapter::new().extract(text);
        assert_eq!(default_scan.statement.value(CanonicalItem::Ebitda), 0.0);

        let windowed = TextAdapter::with_policy(ResolutionPolicy {
            lookahead: TextLookahead::Chars { limit: 40 },
            ..ResolutionPolicy::default()
        })
        .extract(text);
        assert_eq!(windowed.statement.value(CanonicalItem::Ebitda), 6_500_000.0);
    }

    #[test]
    fn test_label_without_amount_falls_through_to_later_occurrence() {
        let text = "\
            EBITDA margin improved during the year.\n\
            EBITDA for the year stood at 6,500,000.00 against prior period.\n";

        let extraction = TextAdapter::new().extract(text);
        assert_eq!(extraction.statement.value(CanonicalItem::Ebitda), 6_500_000.0);
    }

    #[test]
    fn test_empty_document_soft_fails() {
        let extraction = TextAdapter::new().extract("   \n  ");
        assert_eq!(extraction.warning, Some(SourceWarning::EmptyDocument));
        assert!(extraction.statement.is_fully_defaulted());
    }

    #[test]
    fn test_bare_years_are_not_amounts() {
        let text = "Inventory turnover improved in 2023 across divisions\n";
        let extraction = TextAdapter::new().extract(text);
        assert_eq!(extraction.statement.value(CanonicalItem::Inventory), 0.0);
    }
}
