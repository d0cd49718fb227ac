use crate::aliases::feed_keys;
use crate::numeric::normalize_amount;
use crate::schema::{
    CanonicalItem, FinancialStatement, LineItem, Provenance, SourceWarning,
};
use chrono::NaiveDate;
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One reporting period from a structured statement feed: the period end
/// date and the provider's named fields as raw JSON scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FeedPeriod {
    pub period_end: NaiveDate,
    pub fields: BTreeMap<String, serde_json::Value>,
}

/// Company metadata returned by a feed lookup. Adapter-local side output:
/// it travels beside the statement, never inside it, so display concerns
/// (currency symbol, company name) cannot leak into the limit engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct CompanyProfile {
    pub name: Option<String>,
    pub currency: Option<String>,
    pub sector: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FeedExtraction {
    pub statement: FinancialStatement,
    pub company: Option<CompanyProfile>,
    pub warning: Option<SourceWarning>,
}

/// External-feed adapter: reads the most recent reporting period out of a
/// chronologically ordered feed snapshot.
///
/// Feeds deliver periods newest-first, so "most recent" is the first
/// element; the adapter never sorts — ordering is the feed's contract. Per
/// item the feed key synonyms are tried in order against that period's
/// fields; numbers are taken directly (magnitudes only — some providers
/// sign expense lines), strings go through the numeric normalizer, and
/// anything else is treated as absent.
pub struct FeedAdapter;

impl FeedAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(
        &self,
        periods: &[FeedPeriod],
        company: Option<CompanyProfile>,
    ) -> FeedExtraction {
        let latest = match periods.first() {
            Some(period) => period,
            None => {
                return FeedExtraction {
                    statement: FinancialStatement::fully_defaulted(),
                    company,
                    warning: Some(SourceWarning::EmptyFeed),
                }
            }
        };

        let mut resolved = BTreeMap::new();
        for item in CanonicalItem::ALL {
            if let Some(line) = resolve_item(item, latest) {
                resolved.insert(item, line);
            }
        }

        FeedExtraction {
            statement: FinancialStatement::from_resolutions(resolved),
            company,
            warning: None,
        }
    }
}

impl Default for FeedAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_item(item: CanonicalItem, period: &FeedPeriod) -> Option<LineItem> {
    for key in feed_keys(item) {
        let Some(raw_value) = period.fields.get(*key) else {
            continue;
        };

        let parsed = match raw_value {
            serde_json::Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).map(f64::abs),
            serde_json::Value::String(s) => Some(normalize_amount(s)),
            _ => None,
        };

        if let Some(value) = parsed {
            debug!(
                "Resolved {:?} via feed key '{}' for period ending {} -> {}",
                item, key, period.period_end, value
            );
            return Some(LineItem {
                value,
                provenance: Provenance::Matched {
                    pattern: (*key).to_string(),
                    raw: raw_value.to_string(),
                },
            });
        }
    }
    None
}
