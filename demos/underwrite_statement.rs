use credit_limit_engine::{format_amount, CanonicalItem, Underwriter};

fn main() {
    let rows: Vec<Vec<String>> = vec![
        vec!["Cash & Bank Balances", "2,000,000.00"],
        vec!["Sundry Debtors", "6,000,000.00"],
        vec!["Inventory (Stock)", "5,000,000.00"],
        vec!["Sundry Creditors", "Opening", "3,500,000.00"],
        vec!["Other Current Liabilities", "1,000,000.00"],
        vec!["Short Term Bank Borrowings", "2,500,000.00"],
        vec!["Long Term Loans", "7,000,000.00"],
        vec!["EBITDA", "6,500,000.00"],
        vec!["Annual Turnover (Revenue)", "20,000,000.00"],
        vec!["Total Raw Material Purchases", "12,000,000.00"],
        vec!["Interest & Finance Charges", "750,000.00"],
    ]
    .into_iter()
    .map(|row| row.into_iter().map(String::from).collect())
    .collect();

    let underwriter = Underwriter::new();
    let (extraction, result) = underwriter.analyze_table(&rows);

    println!("{}", extraction.statement.to_markdown());

    println!("## Credit Structure\n");
    println!(
        "Working Capital Limit (MPBF II): {}",
        format_amount(result.working_capital.amount, "₹")
    );
    println!(
        "Term Loan Headroom: {}",
        format_amount(result.term_loan_headroom.amount, "₹")
    );
    println!(
        "LC Limit (non-fund): {}",
        format_amount(result.letter_of_credit.amount, "₹")
    );
    println!(
        "BG Limit (non-fund): {}",
        format_amount(result.bank_guarantee.amount, "₹")
    );
    println!(
        "Bill Discounting Limit: {}",
        format_amount(result.bill_discounting.amount, "₹")
    );

    println!("\n## Decision Trail\n");
    for line in result.audit_lines() {
        println!("{}", line);
    }

    let tnw = extraction.statement.value(CanonicalItem::TangibleNetWorth);
    if tnw == 0.0 {
        println!("\nNote: Tangible Net Worth did not resolve from this upload.");
    }
}
