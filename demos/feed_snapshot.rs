use chrono::NaiveDate;
use credit_limit_engine::{format_amount, CompanyProfile, FeedPeriod, Underwriter};

fn main() {
    // A snapshot the way a market-data collaborator would hand it over:
    // newest reporting period first, provider field names as-is.
    let periods = vec![
        FeedPeriod {
            period_end: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            fields: [
                ("Cash And Cash Equivalents", serde_json::json!(2_412_000_000.0)),
                ("Accounts Receivable", serde_json::json!(1_130_000_000.0)),
                ("Inventory", serde_json::json!(1_510_000_000.0)),
                ("Accounts Payable", serde_json::json!(980_000_000.0)),
                ("Current Debt", serde_json::json!(540_000_000.0)),
                ("Long Term Debt", serde_json::json!(2_100_000_000.0)),
                ("EBITDA", serde_json::json!(2_412_793_000.0)),
                ("Total Revenue", serde_json::json!(63_000_000_000.0)),
                ("Interest Expense", serde_json::json!(-310_000_000.0)),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        },
        FeedPeriod {
            period_end: NaiveDate::from_ymd_opt(2023, 3, 31).unwrap(),
            fields: [("EBITDA", serde_json::json!(1_890_000_000.0))]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        },
    ];

    let company = CompanyProfile {
        name: Some("FSN E-Commerce Ventures (NYKAA.NS)".to_string()),
        currency: Some("INR".to_string()),
        sector: Some("Consumer Retail".to_string()),
    };

    let (extraction, result) = Underwriter::new().analyze_feed(&periods, Some(company));

    if let Some(profile) = &extraction.company {
        println!(
            "Company: {} | Currency: {} | Sector: {}",
            profile.name.as_deref().unwrap_or("-"),
            profile.currency.as_deref().unwrap_or("-"),
            profile.sector.as_deref().unwrap_or("-"),
        );
    }

    println!("\n{}", extraction.statement.to_csv());

    println!(
        "Working Capital Limit: {}",
        format_amount(result.working_capital.amount, "₹")
    );
    println!(
        "Term Loan Headroom: {}",
        format_amount(result.term_loan_headroom.amount, "₹")
    );
    println!(
        "Leverage: {:.2}x | DSCR: {:.2}x",
        result.leverage.value, result.debt_service_coverage.value
    );

    println!("\nDecision trail:");
    for line in result.audit_lines() {
        println!("  {}", line);
    }
}
