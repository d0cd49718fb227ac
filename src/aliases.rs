use crate::schema::CanonicalItem;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

/// Label patterns per canonical item, tried strictly in order: the first
/// pattern that matches wins for that item, independent of the others.
/// Specificity is expressed by ordering, not by scoring, so "Debtors" is
/// listed before the looser "Receivables".
///
/// Immutable, process-wide configuration; never derived from input.
pub fn label_patterns(item: CanonicalItem) -> &'static [&'static str] {
    match item {
        CanonicalItem::CashAndBank => &["Cash"],
        CanonicalItem::Debtors => &["Debtors", "Receivables"],
        CanonicalItem::Inventory => &["Inventory", "Stock"],
        CanonicalItem::Creditors => &["Creditors", "Payables"],
        CanonicalItem::OtherCurrentLiabilities => &["Other Current Liab"],
        CanonicalItem::ShortTermBorrowings => &["Short Term Borrowing", "Bank Borrowings"],
        CanonicalItem::LongTermLoans => &["Long Term"],
        CanonicalItem::TangibleNetWorth => &["Net Worth"],
        CanonicalItem::Ebitda => &["EBITDA"],
        CanonicalItem::Revenue => &["Turnover", "Revenue"],
        CanonicalItem::Purchases => &["Purchases"],
        CanonicalItem::InterestExpense => &["Interest"],
        CanonicalItem::ImportContentPct => &["Import"],
    }
}

/// Field-name synonyms for structured statement feeds, tried in order.
///
/// A separate table from `label_patterns` because the feed schema is itself
/// foreign: these are exact field names from the provider's vocabulary, not
/// label fragments found in filings. `ImportContentPct` has no synonyms —
/// no feed carries it, so it always defaults and the limit engine supplies
/// its fallback.
pub fn feed_keys(item: CanonicalItem) -> &'static [&'static str] {
    match item {
        CanonicalItem::CashAndBank => &[
            "Cash And Cash Equivalents",
            "Cash Cash Equivalents And Short Term Investments",
            "Cash",
        ],
        CanonicalItem::Debtors => &["Accounts Receivable", "Net Receivables", "Receivables"],
        CanonicalItem::Inventory => &["Inventory"],
        CanonicalItem::Creditors => &["Accounts Payable", "Payables"],
        CanonicalItem::OtherCurrentLiabilities => {
            &["Other Current Liabilities", "Current Accrued Expenses"]
        }
        CanonicalItem::ShortTermBorrowings => &[
            "Current Debt",
            "Short Term Debt",
            "Current Debt And Capital Lease Obligation",
        ],
        CanonicalItem::LongTermLoans => &[
            "Long Term Debt",
            "Long Term Debt And Capital Lease Obligation",
        ],
        CanonicalItem::TangibleNetWorth => &[
            "Tangible Book Value",
            "Stockholders Equity",
            "Total Stockholder Equity",
        ],
        CanonicalItem::Ebitda => &["EBITDA", "Normalized EBITDA"],
        CanonicalItem::Revenue => &["Total Revenue", "Operating Revenue"],
        CanonicalItem::Purchases => &["Cost Of Revenue", "Reconciled Cost Of Revenue"],
        CanonicalItem::InterestExpense => &["Interest Expense", "Interest Expense Non Operating"],
        CanonicalItem::ImportContentPct => &[],
    }
}

/// A label pattern compiled for matching against source content.
pub struct CompiledPattern {
    /// The pattern as written in the alias table, kept for the audit trail.
    pub source: &'static str,
    /// Case-insensitive regex over the label text.
    pub regex: Regex,
}

lazy_static! {
    /// Amounts in filings carry grouping commas and two decimal places;
    /// requiring the decimals keeps years and note references in narrative
    /// text from being read as figures.
    pub static ref AMOUNT_TOKEN: Regex =
        Regex::new(r"\d[\d,]*\.\d{2}").expect("Invalid regex pattern");

    static ref COMPILED: BTreeMap<CanonicalItem, Vec<CompiledPattern>> = CanonicalItem::ALL
        .iter()
        .map(|item| {
            let patterns = label_patterns(*item)
                .iter()
                .map(|source| CompiledPattern {
                    source,
                    regex: Regex::new(&format!("(?i){}", source))
                        .expect("Invalid regex pattern"),
                })
                .collect();
            (*item, patterns)
        })
        .collect();
}

/// The compiled alias table for an item, in priority order.
pub fn compiled_patterns(item: CanonicalItem) -> &'static [CompiledPattern] {
    &COMPILED[&item]
}
