//! # Credit Limit Engine
//!
//! A library for normalizing heterogeneous financial statements into a fixed
//! canonical schema of credit-relevant line items and deriving bank
//! credit-facility limits from them via deterministic underwriting formulas,
//! with a reproducible audit trail.
//!
//! ## Core Concepts
//!
//! - **Canonical Item**: one of the fixed, named line items the engine
//!   operates on, regardless of source vocabulary
//! - **Alias Table**: ordered label patterns per item; first match wins,
//!   specificity is expressed by ordering
//! - **Source Adapters**: free-text, tabular, and external-feed front ends
//!   that share the alias table and numeric normalizer
//! - **Financial Statement**: total over the canonical items — unresolved
//!   items default to 0.0 silently, with the default recorded in the audit
//!   trail
//! - **Credit Limit Result**: clamped facility amounts and
//!   zero-denominator-safe ratios, each paired with its derivation
//!
//! The core performs no network or file I/O; collaborators hand it raw
//! extracted text, raw rows, or raw feed snapshots, and take back a
//! statement and a limit result.
//!
//! ## Example
//!
//! ```rust,ignore
//! use credit_limit_engine::*;
//!
//! let rows = vec![
//!     vec!["Sundry Creditors".to_string(), "Opening".to_string(), "3,500,000.00".to_string()],
//!     vec!["EBITDA".to_string(), "6,500,000.00".to_string()],
//! ];
//!
//! let extraction = extract_from_table(&rows);
//! let result = compute_limits(&extraction.statement);
//! for line in result.audit_lines() {
//!     println!("{}", line);
//! }
//! ```

pub mod aliases;
pub mod document;
pub mod error;
pub mod feed;
pub mod limits;
pub mod numeric;
pub mod policy;
pub mod schema;
pub mod tabular;
pub mod utils;

pub use document::TextAdapter;
pub use error::{Result, UnderwritingError};
pub use feed::{CompanyProfile, FeedAdapter, FeedExtraction, FeedPeriod};
pub use limits::{
    compute_limits, CreditLimitResult, FacilityLimit, LimitPolicy, RatioObservation,
};
pub use numeric::{is_numeric_token, normalize_amount};
pub use policy::{ResolutionPolicy, RowValuePolicy, TextLookahead};
pub use schema::{
    CanonicalItem, Extraction, FinancialStatement, LineItem, Provenance, SourceWarning,
};
pub use tabular::TableAdapter;
pub use utils::format_amount;

use log::{debug, info};

/// Facade tying the adapters and the limit engine together under one pair
/// of policies. Stateless between requests; the alias table it reads is
/// immutable, so concurrent analyses need no synchronization.
pub struct Underwriter {
    resolution: ResolutionPolicy,
    limits: LimitPolicy,
}

impl Underwriter {
    pub fn new() -> Self {
        Self {
            resolution: ResolutionPolicy::default(),
            limits: LimitPolicy::default(),
        }
    }

    /// Builds a facade with custom policies, rejecting out-of-range
    /// underwriting constants up front so computation can stay infallible.
    pub fn with_policies(resolution: ResolutionPolicy, limits: LimitPolicy) -> Result<Self> {
        limits.validate()?;
        Ok(Self { resolution, limits })
    }

    pub fn analyze_text(&self, text: &str) -> (Extraction, CreditLimitResult) {
        let extraction = TextAdapter::with_policy(self.resolution).extract(text);
        self.finish("document", extraction)
    }

    pub fn analyze_table(&self, rows: &[Vec<String>]) -> (Extraction, CreditLimitResult) {
        let extraction = TableAdapter::with_policy(self.resolution).extract(rows);
        self.finish("table", extraction)
    }

    pub fn analyze_feed(
        &self,
        periods: &[FeedPeriod],
        company: Option<CompanyProfile>,
    ) -> (FeedExtraction, CreditLimitResult) {
        let extraction = FeedAdapter::new().extract(periods, company);
        info!(
            "Analyzed feed source: {}/{} items resolved{}",
            extraction.statement.resolved_count(),
            CanonicalItem::ALL.len(),
            extraction
                .warning
                .as_ref()
                .map(|w| format!(" ({})", w))
                .unwrap_or_default()
        );
        let result = self.limits.compute(&extraction.statement);
        debug!("Working capital limit: {:.2}", result.working_capital.amount);
        (extraction, result)
    }

    pub fn limits_for(&self, statement: &FinancialStatement) -> CreditLimitResult {
        self.limits.compute(statement)
    }

    fn finish(&self, source: &str, extraction: Extraction) -> (Extraction, CreditLimitResult) {
        info!(
            "Analyzed {} source: {}/{} items resolved{}",
            source,
            extraction.statement.resolved_count(),
            CanonicalItem::ALL.len(),
            extraction
                .warning
                .as_ref()
                .map(|w| format!(" ({})", w))
                .unwrap_or_default()
        );
        let result = self.limits.compute(&extraction.statement);
        debug!("Working capital limit: {:.2}", result.working_capital.amount);
        (extraction, result)
    }
}

impl Default for Underwriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts a canonical statement from a document's text under default
/// policies.
pub fn extract_from_text(text: &str) -> Extraction {
    TextAdapter::new().extract(text)
}

/// Extracts a canonical statement from row-oriented data under default
/// policies.
pub fn extract_from_table(rows: &[Vec<String>]) -> Extraction {
    TableAdapter::new().extract(rows)
}

/// Extracts a canonical statement from a structured feed snapshot; company
/// metadata passes through beside the statement.
pub fn extract_from_feed(
    periods: &[FeedPeriod],
    company: Option<CompanyProfile>,
) -> FeedExtraction {
    FeedAdapter::new().extract(periods, company)
}
