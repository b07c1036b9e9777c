/// filtering, sorting and paging the loan book
use loan_portfolio_rs::{query, Decimal, Loan, LoanQuery, SortField, SortOrder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loans: Vec<Loan> = serde_json::from_str(include_str!("../data/loans.json"))?;

    // residential loans between 300k and 700k, lowest rate first
    let residential = LoanQuery {
        property_type: Some("residential".to_string()),
        min_loan_amount: Some(Decimal::from(300_000)),
        max_loan_amount: Some(Decimal::from(700_000)),
        sort_by: Some(SortField::InterestPerc),
        sort_order: Some(SortOrder::Asc),
        ..LoanQuery::default()
    };
    print_page("residential 300k-700k", &loans, &residential);

    // everything above 70% ltv originated in 2024
    let risky: LoanQuery = serde_json::from_str(
        r#"{"minLtv": 70, "fromDate": "2024-01-01", "toDate": "2024-12-31", "sortBy": "ltv"}"#,
    )?;
    print_page("high ltv, 2024", &loans, &risky);

    // borrower name search; bad values are ignored rather than rejected
    let by_name: LoanQuery = serde_json::from_str(r#"{"borrowerName": "son", "count": "lots"}"#)?;
    print_page("borrowers matching 'son'", &loans, &by_name);

    Ok(())
}

fn print_page(title: &str, loans: &[Loan], criteria: &LoanQuery) {
    let page = query(loans, criteria);
    println!(
        "{} ({} of {} match, filtered: {})",
        title, page.total_matching, page.total_in_collection, page.was_filtered
    );
    for loan in &page.results {
        println!(
            "  {} {:<15} {:>12} ltv {:>5}% rate {} {}",
            loan.id, loan.borrower, loan.loan_amount, loan.ltv, loan.interest_perc, loan.status
        );
    }
}
