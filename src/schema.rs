use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// The fixed set of credit-relevant line items every statement resolves to.
///
/// The set is total: a `FinancialStatement` always carries one entry per
/// item, defaulting to 0.0 where the source had nothing to offer.
/// Declaration order is the canonical display order for audit output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "PascalCase")]
pub enum CanonicalItem {
    #[schemars(description = "Cash in hand and balances with banks (Balance Sheet, current asset)")]
    CashAndBank,

    #[schemars(description = "Trade receivables owed by customers (Balance Sheet, current asset)")]
    Debtors,

    #[schemars(description = "Raw material, work-in-progress and finished stock (Balance Sheet, current asset)")]
    Inventory,

    #[schemars(description = "Trade payables owed to suppliers (Balance Sheet, current liability)")]
    Creditors,

    #[schemars(description = "Current liabilities other than trade creditors: accrued expenses, statutory dues (Balance Sheet)")]
    OtherCurrentLiabilities,

    #[schemars(description = "Working-capital borrowings from banks repayable within a year (Balance Sheet)")]
    ShortTermBorrowings,

    #[schemars(description = "Term borrowings repayable beyond a year (Balance Sheet)")]
    LongTermLoans,

    #[schemars(description = "Net worth excluding intangibles; the promoter's stake the lender leans on")]
    TangibleNetWorth,

    #[schemars(description = "Earnings before interest, taxes, depreciation and amortization; proxy for operating cash generation")]
    Ebitda,

    #[schemars(description = "Annual turnover from operations (Income Statement)")]
    Revenue,

    #[schemars(description = "Annual raw material purchases; drives import-linked non-fund facilities")]
    Purchases,

    #[schemars(description = "Interest and finance charges for the year (Income Statement)")]
    InterestExpense,

    #[schemars(description = "Share of purchases sourced from imports, as a percentage (0-100)")]
    ImportContentPct,
}

impl CanonicalItem {
    /// Every canonical item, in display order.
    pub const ALL: [CanonicalItem; 13] = [
        CanonicalItem::CashAndBank,
        CanonicalItem::Debtors,
        CanonicalItem::Inventory,
        CanonicalItem::Creditors,
        CanonicalItem::OtherCurrentLiabilities,
        CanonicalItem::ShortTermBorrowings,
        CanonicalItem::LongTermLoans,
        CanonicalItem::TangibleNetWorth,
        CanonicalItem::Ebitda,
        CanonicalItem::Revenue,
        CanonicalItem::Purchases,
        CanonicalItem::InterestExpense,
        CanonicalItem::ImportContentPct,
    ];

    /// The label used when presenting the statement to a human.
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalItem::CashAndBank => "Cash & Bank Balances",
            CanonicalItem::Debtors => "Sundry Debtors (Receivables)",
            CanonicalItem::Inventory => "Inventory (Stock)",
            CanonicalItem::Creditors => "Sundry Creditors (Trade)",
            CanonicalItem::OtherCurrentLiabilities => "Other Current Liabilities",
            CanonicalItem::ShortTermBorrowings => "Short Term Bank Borrowings",
            CanonicalItem::LongTermLoans => "Long Term Loans",
            CanonicalItem::TangibleNetWorth => "Tangible Net Worth",
            CanonicalItem::Ebitda => "EBITDA",
            CanonicalItem::Revenue => "Annual Turnover (Revenue)",
            CanonicalItem::Purchases => "Total Raw Material Purchases",
            CanonicalItem::InterestExpense => "Interest & Finance Charges",
            CanonicalItem::ImportContentPct => "Import Content (%)",
        }
    }
}

/// Where a resolved value came from.
///
/// `Matched` keeps the winning pattern and the raw token so a reviewer can
/// trace every figure back to the source. A matched token that normalizes
/// to 0.0 is distinct from `Defaulted`: the first is "the filing reported
/// zero (or something unreadable)", the second is "the filing said nothing".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase", tag = "origin")]
pub enum Provenance {
    /// A label pattern matched and a value token was located.
    Matched { pattern: String, raw: String },
    /// The value was handed to the core directly (demo fixtures, manual entry).
    Supplied,
    /// No pattern matched; the item silently defaulted to 0.0.
    Defaulted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LineItem {
    pub value: f64,
    pub provenance: Provenance,
}

impl LineItem {
    pub fn defaulted() -> Self {
        Self {
            value: 0.0,
            provenance: Provenance::Defaulted,
        }
    }
}

/// A fully-populated canonical statement: one entry per `CanonicalItem`.
///
/// Constructed once per analysis request from exactly one source and
/// immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FinancialStatement {
    items: BTreeMap<CanonicalItem, LineItem>,
}

impl FinancialStatement {
    /// Builds a statement from whatever an adapter managed to resolve.
    /// Items absent from `resolved` are filled in as defaulted, so the
    /// result is total over `CanonicalItem::ALL` by construction.
    pub fn from_resolutions(resolved: BTreeMap<CanonicalItem, LineItem>) -> Self {
        let mut items = resolved;
        for item in CanonicalItem::ALL {
            items.entry(item).or_insert_with(LineItem::defaulted);
        }
        Self { items }
    }

    /// A statement with every item defaulted to 0.0.
    pub fn fully_defaulted() -> Self {
        Self::from_resolutions(BTreeMap::new())
    }

    /// Builds a statement from caller-supplied values; unlisted items default.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (CanonicalItem, f64)>,
    {
        let resolved = values
            .into_iter()
            .map(|(item, value)| {
                // Statement values are non-negative finite floats; anything
                // else a caller hands in is clamped the way the adapters
                // would have clamped it.
                let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
                (
                    item,
                    LineItem {
                        value,
                        provenance: Provenance::Supplied,
                    },
                )
            })
            .collect();
        Self::from_resolutions(resolved)
    }

    /// The placeholder statement used by demo mode.
    pub fn demo() -> Self {
        Self::from_values([(CanonicalItem::Ebitda, 2_412_793_000.0)])
    }

    pub fn value(&self, item: CanonicalItem) -> f64 {
        self.items[&item].value
    }

    pub fn line(&self, item: CanonicalItem) -> &LineItem {
        &self.items[&item]
    }

    /// Iterates entries in canonical display order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalItem, &LineItem)> {
        CanonicalItem::ALL.iter().map(|item| (*item, &self.items[item]))
    }

    /// How many items were actually located in the source.
    pub fn resolved_count(&self) -> usize {
        self.iter()
            .filter(|(_, line)| !matches!(line.provenance, Provenance::Defaulted))
            .count()
    }

    pub fn is_fully_defaulted(&self) -> bool {
        self.resolved_count() == 0
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str("Financial Item,Amount,Origin\n");

        for (item, line) in self.iter() {
            let origin = match &line.provenance {
                Provenance::Matched { pattern, .. } => format!("matched '{}'", pattern),
                Provenance::Supplied => "supplied".to_string(),
                Provenance::Defaulted => "defaulted".to_string(),
            };
            output.push_str(&format!("{},{:.2},{}\n", item.label(), line.value, origin));
        }

        output
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# Canonical Financial Statement\n\n");
        output.push_str("| Financial Item | Amount | Origin |\n");
        output.push_str("|---|---:|---|\n");

        for (item, line) in self.iter() {
            let origin = match &line.provenance {
                Provenance::Matched { pattern, raw } => {
                    format!("matched `{}` on \"{}\"", pattern, raw)
                }
                Provenance::Supplied => "supplied".to_string(),
                Provenance::Defaulted => "defaulted".to_string(),
            };
            output.push_str(&format!(
                "| {} | {:.2} | {} |\n",
                item.label(),
                line.value,
                origin
            ));
        }

        output
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(FinancialStatement)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// A readable-but-empty source. Reported as a value beside a fully
/// defaulted statement so the collaborator decides whether to continue.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum SourceWarning {
    #[error("document contained no extractable text")]
    EmptyDocument,

    #[error("table contained no rows")]
    EmptyTable,

    #[error("feed returned no reporting periods")]
    EmptyFeed,
}

/// What an adapter hands back: a total statement plus an optional soft
/// failure. There is no hard-error branch; an unreadable source degrades to
/// all-zero defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Extraction {
    pub statement: FinancialStatement,
    pub warning: Option<SourceWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_is_total_over_canonical_items() {
        let statement = FinancialStatement::fully_defaulted();
        for item in CanonicalItem::ALL {
            assert_eq!(statement.value(item), 0.0);
            assert_eq!(statement.line(item).provenance, Provenance::Defaulted);
        }
        assert_eq!(statement.iter().count(), CanonicalItem::ALL.len());
    }

    #[test]
    fn test_from_values_fills_missing_items() {
        let statement = FinancialStatement::from_values([
            (CanonicalItem::Ebitda, 6_500_000.0),
            (CanonicalItem::Revenue, 20_000_000.0),
        ]);

        assert_eq!(statement.value(CanonicalItem::Ebitda), 6_500_000.0);
        assert_eq!(statement.value(CanonicalItem::Inventory), 0.0);
        assert_eq!(statement.resolved_count(), 2);
        assert_eq!(
            statement.line(CanonicalItem::Inventory).provenance,
            Provenance::Defaulted
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let statement = FinancialStatement::from_values([(CanonicalItem::Debtors, 6_000_000.0)]);
        let json = statement.to_json().unwrap();
        let back: FinancialStatement = serde_json::from_str(&json).unwrap();
        assert_eq!(statement, back);
    }

    #[test]
    fn test_schema_generation() {
        let schema_json = FinancialStatement::schema_as_json().unwrap();
        assert!(schema_json.contains("items"));
        assert!(schema_json.contains("provenance"));

        let item_schema =
            serde_json::to_string(&schemars::schema_for!(CanonicalItem)).unwrap();
        assert!(item_schema.contains("CashAndBank"));
        assert!(item_schema.contains("ImportContentPct"));
    }

    #[test]
    fn test_audit_renderings_cover_every_label() {
        let statement = FinancialStatement::demo();
        let csv = statement.to_csv();
        let markdown = statement.to_markdown();

        for item in CanonicalItem::ALL {
            assert!(csv.contains(item.label()), "csv missing {}", item.label());
            assert!(
                markdown.contains(item.label()),
                "markdown missing {}",
                item.label()
            );
        }
        assert!(csv.contains("supplied"));
        assert!(csv.contains("defaulted"));
    }

    #[test]
    fn test_demo_statement_matches_placeholder() {
        let statement = FinancialStatement::demo();
        assert_eq!(statement.value(CanonicalItem::Ebitda), 2_412_793_000.0);
        assert_eq!(statement.resolved_count(), 1);
    }
}
