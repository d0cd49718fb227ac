use crate::aliases::compiled_patterns;
use crate::numeric::{is_numeric_token, normalize_amount};
use crate::policy::{ResolutionPolicy, RowValuePolicy};
use crate::schema::{
    CanonicalItem, Extraction, FinancialStatement, LineItem, Provenance, SourceWarning,
};
use log::debug;
use std::collections::BTreeMap;

/// Tabular adapter: resolves canonical items from row-oriented data with no
/// assumed schema beyond "cells in a row".
///
/// A pattern matches when any cell in a row matches it; the first matching
/// row wins for that pattern, and the value is taken from the row's
/// numeric-looking cells per `RowValuePolicy`. A matching row that carries
/// no numeric-looking cell still settles the item (as defaulted) — later,
/// looser patterns do not get a second chance at it.
pub struct TableAdapter {
    policy: ResolutionPolicy,
}

impl TableAdapter {
    pub fn new() -> Self {
        Self {
            policy: ResolutionPolicy::default(),
        }
    }

    pub fn with_policy(policy: ResolutionPolicy) -> Self {
        Self { policy }
    }

    pub fn extract(&self, rows: &[Vec<String>]) -> Extraction {
        if rows.is_empty() {
            return Extraction {
                statement: FinancialStatement::fully_defaulted(),
                warning: Some(SourceWarning::EmptyTable),
            };
        }

        let mut resolved = BTreeMap::new();
        for item in CanonicalItem::ALL {
            if let Some(line) = self.resolve_item(item, rows) {
                resolved.insert(item, line);
            }
        }

        Extraction {
            statement: FinancialStatement::from_resolutions(resolved),
            warning: None,
        }
    }

    fn resolve_item(&self, item: CanonicalItem, rows: &[Vec<String>]) -> Option<LineItem> {
        for pattern in compiled_patterns(item) {
            let matched_row = rows
                .iter()
                .find(|row| row.iter().any(|cell| pattern.regex.is_match(cell)));

            if let Some(row) = matched_row {
                let value_cell = match self.policy.row_value {
                    RowValuePolicy::LastNumericCell => {
                        row.iter().rev().find(|cell| is_numeric_token(cell))
                    }
                    RowValuePolicy::FirstNumericCell => {
                        row.iter().find(|cell| is_numeric_token(cell))
                    }
                };

                return value_cell.map(|cell| {
                    let raw = cell.trim().to_string();
                    let value = normalize_amount(&raw);
                    debug!(
                        "Resolved {:?} via pattern '{}' from cell '{}' -> {}",
                        item, pattern.source, raw, value
                    );
                    LineItem {
                        value,
                        provenance: Provenance::Matched {
                            pattern: pattern.source.to_string(),
                            raw,
                        },
                    }
                });
            }
        }
        None
    }
}

impl Default for TableAdapter {
    fn default() -> Self {
        Self::new()
    }
}
