use crate::error::{Result, UnderwritingError};
use crate::schema::{CanonicalItem, FinancialStatement};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The underwriting constants. Defaults reflect house policy: MPBF Method
/// II with a 25% margin on current assets, a 3.5x EBITDA leverage cap,
/// 4-month usance letters of credit assuming 30% import content where the
/// statement is silent, guarantees at 10% of turnover, bills discounted at
/// an 80% advance rate, and debt serviced over 5 years for the DSCR proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LimitPolicy {
    /// Fraction of current assets the borrower must fund itself; in [0, 1).
    pub current_asset_margin: f64,
    /// Sustainable debt as a multiple of EBITDA.
    pub ebitda_leverage_cap: f64,
    /// Exposure window for import letters of credit, in months.
    pub lc_usance_months: f64,
    /// Assumed import share of purchases (%) when the statement is silent.
    pub default_import_content_pct: f64,
    /// Bank guarantee capacity as a fraction of annual turnover.
    pub bg_turnover_fraction: f64,
    /// Advance rate against receivables for bill discounting; in [0, 1].
    pub bill_advance_rate: f64,
    /// Assumed repayment horizon for the DSCR principal component, in years.
    pub debt_amortisation_years: f64,
}

impl Default for LimitPolicy {
    fn default() -> Self {
        Self {
            current_asset_margin: 0.25,
            ebitda_leverage_cap: 3.5,
            lc_usance_months: 4.0,
            default_import_content_pct: 30.0,
            bg_turnover_fraction: 0.10,
            bill_advance_rate: 0.80,
            debt_amortisation_years: 5.0,
        }
    }
}

impl LimitPolicy {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.current_asset_margin) {
            return Err(UnderwritingError::InvalidMarginFraction(
                self.current_asset_margin,
            ));
        }
        if !(0.0..=1.0).contains(&self.bill_advance_rate) {
            return Err(UnderwritingError::InvalidAdvanceRate(self.bill_advance_rate));
        }
        if !(0.0..=1.0).contains(&self.bg_turnover_fraction) {
            return Err(UnderwritingError::InvalidAdvanceRate(
                self.bg_turnover_fraction,
            ));
        }
        if self.lc_usance_months <= 0.0 {
            return Err(UnderwritingError::InvalidUsanceMonths(self.lc_usance_months));
        }
        if self.ebitda_leverage_cap <= 0.0 {
            return Err(UnderwritingError::InvalidLeverageCap(
                self.ebitda_leverage_cap,
            ));
        }
        if self.debt_amortisation_years <= 0.0 {
            return Err(UnderwritingError::InvalidAmortisationYears(
                self.debt_amortisation_years,
            ));
        }
        Ok(())
    }

    /// Derives the facility limits and diagnostic ratios from a statement.
    ///
    /// Pure and infallible: every input is already a defaulted, clamped
    /// float, every facility is independently floored at zero, and ratios
    /// with a non-positive denominator come back as 0 rather than
    /// infinite. No facility reads another facility's output.
    pub fn compute(&self, statement: &FinancialStatement) -> CreditLimitResult {
        let cash = statement.value(CanonicalItem::CashAndBank);
        let debtors = statement.value(CanonicalItem::Debtors);
        let inventory = statement.value(CanonicalItem::Inventory);
        let creditors = statement.value(CanonicalItem::Creditors);
        let other_cl = statement.value(CanonicalItem::OtherCurrentLiabilities);
        let short_term = statement.value(CanonicalItem::ShortTermBorrowings);
        let long_term = statement.value(CanonicalItem::LongTermLoans);
        let ebitda = statement.value(CanonicalItem::Ebitda);
        let revenue = statement.value(CanonicalItem::Revenue);
        let purchases = statement.value(CanonicalItem::Purchases);
        let interest = statement.value(CanonicalItem::InterestExpense);

        let current_assets = cash + debtors + inventory;
        let other_current_liabilities = creditors + other_cl;
        let total_debt = short_term + long_term;

        let working_capital = {
            let amount = (current_assets * (1.0 - self.current_asset_margin)
                - other_current_liabilities)
                .max(0.0);
            FacilityLimit {
                amount,
                derivation: format!(
                    "max(0, current assets {:.2} x (1 - margin {:.2}) - other current liabilities {:.2}) = {:.2}",
                    current_assets, self.current_asset_margin, other_current_liabilities, amount
                ),
            }
        };

        let term_loan_headroom = {
            let amount = (ebitda * self.ebitda_leverage_cap - total_debt).max(0.0);
            FacilityLimit {
                amount,
                derivation: format!(
                    "max(0, EBITDA {:.2} x leverage cap {:.2} - total debt {:.2}) = {:.2}",
                    ebitda, self.ebitda_leverage_cap, total_debt, amount
                ),
            }
        };

        let letter_of_credit = {
            // 0 means the import share never resolved; the statement stays
            // faithful to the source and the fallback lives here.
            let reported = statement.value(CanonicalItem::ImportContentPct);
            let (import_pct, import_note) = if reported > 0.0 {
                (reported, "reported")
            } else {
                (self.default_import_content_pct, "assumed")
            };
            let amount = ((purchases * import_pct / 100.0 / 12.0) * self.lc_usance_months).max(0.0);
            FacilityLimit {
                amount,
                derivation: format!(
                    "max(0, purchases {:.2} x import content {:.2}% ({}) / 12 x usance {:.2} months) = {:.2}",
                    purchases, import_pct, import_note, self.lc_usance_months, amount
                ),
            }
        };

        let bank_guarantee = {
            let amount = (revenue * self.bg_turnover_fraction).max(0.0);
            FacilityLimit {
                amount,
                derivation: format!(
                    "max(0, turnover {:.2} x {:.2}) = {:.2}",
                    revenue, self.bg_turnover_fraction, amount
                ),
            }
        };

        let bill_discounting = {
            let amount = (debtors * self.bill_advance_rate).max(0.0);
            FacilityLimit {
                amount,
                derivation: format!(
                    "max(0, debtors {:.2} x advance rate {:.2}) = {:.2}",
                    debtors, self.bill_advance_rate, amount
                ),
            }
        };

        let leverage = if ebitda > 0.0 {
            let value = total_debt / ebitda;
            RatioObservation {
                value,
                derivation: format!(
                    "total debt {:.2} / EBITDA {:.2} = {:.2}x",
                    total_debt, ebitda, value
                ),
            }
        } else {
            RatioObservation {
                value: 0.0,
                derivation: format!("EBITDA {:.2} is not positive; leverage reported as 0", ebitda),
            }
        };

        let debt_service_coverage = {
            let annual_obligation = interest + total_debt / self.debt_amortisation_years;
            if annual_obligation > 0.0 {
                let value = ebitda / annual_obligation;
                RatioObservation {
                    value,
                    derivation: format!(
                        "EBITDA {:.2} / (interest {:.2} + total debt {:.2} / {:.2} years) = {:.2}x",
                        ebitda, interest, total_debt, self.debt_amortisation_years, value
                    ),
                }
            } else {
                RatioObservation {
                    value: 0.0,
                    derivation: format!(
                        "debt service obligation {:.2} is not positive; DSCR reported as 0",
                        annual_obligation
                    ),
                }
            }
        };

        CreditLimitResult {
            working_capital,
            term_loan_headroom,
            letter_of_credit,
            bank_guarantee,
            bill_discounting,
            leverage,
            debt_service_coverage,
            current_assets,
            other_current_liabilities,
            total_debt,
        }
    }
}

/// A named facility amount with the derivation that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FacilityLimit {
    pub amount: f64,
    pub derivation: String,
}

/// A diagnostic ratio; 0 when its denominator is not positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RatioObservation {
    pub value: f64,
    pub derivation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CreditLimitResult {
    pub working_capital: FacilityLimit,
    pub term_loan_headroom: FacilityLimit,
    pub letter_of_credit: FacilityLimit,
    pub bank_guarantee: FacilityLimit,
    pub bill_discounting: FacilityLimit,
    pub leverage: RatioObservation,
    pub debt_service_coverage: RatioObservation,
    pub current_assets: f64,
    pub other_current_liabilities: f64,
    pub total_debt: f64,
}

impl CreditLimitResult {
    /// The derivation trail in fixed display order.
    pub fn audit_lines(&self) -> Vec<String> {
        vec![
            format!("Working Capital Limit (MPBF II): {}", self.working_capital.derivation),
            format!("Term Loan Headroom: {}", self.term_loan_headroom.derivation),
            format!("Letter of Credit Limit: {}", self.letter_of_credit.derivation),
            format!("Bank Guarantee Limit: {}", self.bank_guarantee.derivation),
            format!("Bill Discounting Limit: {}", self.bill_discounting.derivation),
            format!("Leverage: {}", self.leverage.derivation),
            format!("DSCR: {}", self.debt_service_coverage.derivation),
        ]
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Derives limits under the default house policy.
pub fn compute_limits(statement: &FinancialStatement) -> CreditLimitResult {
    LimitPolicy::default().compute(statement)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement(values: &[(CanonicalItem, f64)]) -> FinancialStatement {
        FinancialStatement::from_values(values.iter().copied())
    }

    #[test]
    fn test_working_capital_limit_mpbf() {
        let result = compute_limits(&statement(&[
            (CanonicalItem::CashAndBank, 2_000_000.0),
            (CanonicalItem::Debtors, 6_000_000.0),
            (CanonicalItem::Inventory, 5_000_000.0),
            (CanonicalItem::Creditors, 3_500_000.0),
            (CanonicalItem::OtherCurrentLiabilities, 1_000_000.0),
        ]));

        assert_eq!(result.current_assets, 13_000_000.0);
        assert_eq!(result.other_current_liabilities, 4_500_000.0);
        assert_eq!(result.working_capital.amount, 5_250_000.0);
    }

    #[test]
    fn test_margin_form_agrees_with_fraction_form() {
        // max(0, CA - margin*CA - OCL) and max(0, CA*0.75 - OCL) are the
        // same expression at the default margin; pin that down.
        let ca = 13_000_000.0;
        let ocl = 4_500_000.0;
        let result = compute_limits(&statement(&[
            (CanonicalItem::Debtors, ca),
            (CanonicalItem::Creditors, ocl),
        ]));
        assert!((result.working_capital.amount - (ca * 0.75 - ocl).max(0.0)).abs() < 1e-9);
        assert!((result.working_capital.amount - (ca - 0.25 * ca - ocl).max(0.0)).abs() < 1e-9);
    }

    #[test]
    fn test_term_loan_headroom() {
        let result = compute_limits(&statement(&[
            (CanonicalItem::Ebitda, 6_500_000.0),
            (CanonicalItem::ShortTermBorrowings, 2_500_000.0),
            (CanonicalItem::LongTermLoans, 7_000_000.0),
        ]));

        assert_eq!(result.total_debt, 9_500_000.0);
        assert_eq!(result.term_loan_headroom.amount, 13_250_000.0);
    }

    #[test]
    fn test_letter_of_credit_assumes_import_content_when_silent() {
        let result = compute_limits(&statement(&[(CanonicalItem::Purchases, 12_000_000.0)]));
        // 12,000,000 x 30% / 12 x 4
        assert_eq!(result.letter_of_credit.amount, 1_200_000.0);
        assert!(result.letter_of_credit.derivation.contains("assumed"));

        let reported = compute_limits(&statement(&[
            (CanonicalItem::Purchases, 12_000_000.0),
            (CanonicalItem::ImportContentPct, 50.0),
        ]));
        assert_eq!(reported.letter_of_credit.amount, 2_000_000.0);
        assert!(reported.letter_of_credit.derivation.contains("reported"));
    }

    #[test]
    fn test_non_fund_facilities() {
        let result = compute_limits(&statement(&[
            (CanonicalItem::Revenue, 20_000_000.0),
            (CanonicalItem::Debtors, 6_000_000.0),
        ]));

        assert_eq!(result.bank_guarantee.amount, 2_000_000.0);
        assert_eq!(result.bill_discounting.amount, 4_800_000.0);
    }

    #[test]
    fn test_ratios() {
        let result = compute_limits(&statement(&[
            (CanonicalItem::Ebitda, 6_500_000.0),
            (CanonicalItem::ShortTermBorrowings, 2_500_000.0),
            (CanonicalItem::LongTermLoans, 7_000_000.0),
            (CanonicalItem::InterestExpense, 750_000.0),
        ]));

        assert!((result.leverage.value - 9_500_000.0 / 6_500_000.0).abs() < 1e-9);
        let obligation = 750_000.0 + 9_500_000.0 / 5.0;
        assert!((result.debt_service_coverage.value - 6_500_000.0 / obligation).abs() < 1e-9);
    }

    #[test]
    fn test_all_zero_statement_yields_zeros_not_nans() {
        let result = compute_limits(&FinancialStatement::fully_defaulted());

        assert_eq!(result.working_capital.amount, 0.0);
        assert_eq!(result.term_loan_headroom.amount, 0.0);
        assert_eq!(result.letter_of_credit.amount, 0.0);
        assert_eq!(result.bank_guarantee.amount, 0.0);
        assert_eq!(result.bill_discounting.amount, 0.0);
        assert_eq!(result.leverage.value, 0.0);
        assert_eq!(result.debt_service_coverage.value, 0.0);

        for line in result.audit_lines() {
            assert!(!line.contains("NaN") && !line.contains("inf"), "{}", line);
        }
    }

    #[test]
    fn test_deep_liabilities_clamp_to_zero() {
        let result = compute_limits(&statement(&[
            (CanonicalItem::Debtors, 1_000_000.0),
            (CanonicalItem::Creditors, 5_000_000.0),
            (CanonicalItem::Ebitda, 100_000.0),
            (CanonicalItem::LongTermLoans, 9_000_000.0),
        ]));

        assert_eq!(result.working_capital.amount, 0.0);
        assert_eq!(result.term_loan_headroom.amount, 0.0);
        assert!(result.leverage.value > 0.0);
    }

    #[test]
    fn test_policy_validation() {
        assert!(LimitPolicy::default().validate().is_ok());

        let bad_margin = LimitPolicy {
            current_asset_margin: 1.0,
            ..LimitPolicy::default()
        };
        assert!(matches!(
            bad_margin.validate(),
            Err(UnderwritingError::InvalidMarginFraction(_))
        ));

        let bad_rate = LimitPolicy {
            bill_advance_rate: 1.5,
            ..LimitPolicy::default()
        };
        assert!(matches!(
            bad_rate.validate(),
            Err(UnderwritingError::InvalidAdvanceRate(_))
        ));

        let bad_usance = LimitPolicy {
            lc_usance_months: 0.0,
            ..LimitPolicy::default()
        };
        assert!(matches!(
            bad_usance.validate(),
            Err(UnderwritingError::InvalidUsanceMonths(_))
        ));
    }

    #[test]
    fn test_derivations_cite_inputs() {
        let result = compute_limits(&statement(&[
            (CanonicalItem::CashAndBank, 2_000_000.0),
            (CanonicalItem::Debtors, 6_000_000.0),
            (CanonicalItem::Inventory, 5_000_000.0),
            (CanonicalItem::Creditors, 3_500_000.0),
            (CanonicalItem::OtherCurrentLiabilities, 1_000_000.0),
        ]));

        assert!(result.working_capital.derivation.contains("13000000.00"));
        assert!(result.working_capital.derivation.contains("0.25"));
        assert!(result.working_capital.derivation.contains("4500000.00"));
        assert_eq!(result.audit_lines().len(), 7);
    }
}
