/// quick start - load a loan book, search it and analyze it
use loan_portfolio_rs::{
    AnalysisOptions, InterestRequest, Loan, LoanPortfolio, LoanQuery, SafeTimeProvider, TimeSource,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let time = SafeTimeProvider::new(TimeSource::System);
    let loans: Vec<Loan> = serde_json::from_str(include_str!("../data/loans.json"))?;
    let portfolio = LoanPortfolio::in_memory(loans);

    // funded loans, largest first
    let criteria: LoanQuery = serde_json::from_str(r#"{"status": "funded", "sortBy": "loanAmount", "sortOrder": "desc"}"#)?;
    let funded = portfolio.find_loans(&criteria);
    println!("{}", serde_json::to_string_pretty(&funded)?);

    // interest accrued so far on the first loan
    let interest = portfolio.calculate_interest(&InterestRequest::for_loan("L001"), &time)?;
    println!("{}", serde_json::to_string_pretty(&interest)?);

    // headline numbers
    let analytics = portfolio.analyze(&AnalysisOptions::default().with_interest(), &time)?;
    println!("{}", serde_json::to_string_pretty(&analytics)?);

    Ok(())
}
