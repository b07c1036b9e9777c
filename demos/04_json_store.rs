/// json-backed portfolio with creation, updates and tool calls
use loan_portfolio_rs::{
    dispatch, Decimal, LoanId, LoanPatch, LoanPortfolio, Money, NewLoan, PortfolioConfig, Rate,
    SafeTimeProvider, TimeSource,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let time = SafeTimeProvider::new(TimeSource::System);
    let path = std::env::temp_dir().join("loan-portfolio-demo.json");
    let _ = std::fs::remove_file(&path);

    let mut portfolio = LoanPortfolio::open(PortfolioConfig::with_data_path(&path))?;

    let created = portfolio.create_loan(
        NewLoan {
            borrower: Some("Grace Liu".to_string()),
            property_type: Some("Office".to_string()),
            location: Some("Oregon".to_string()),
            loan_amount: Some(Money::from_major(820_000)),
            ltv: Some(Decimal::from(62)),
            interest_perc: Some(Rate::from_percentage(7)),
            ..NewLoan::default()
        },
        &time,
    )?;
    println!("created {} for {}", created.id, created.borrower);

    portfolio.update_status(&created.id, "Approved")?;
    portfolio.update_loan(
        &created.id,
        LoanPatch {
            loan_amount: Some(Money::from_major(800_000)),
            ..LoanPatch::default()
        },
    )?;

    // validation errors come back as values, never panics
    if let Err(e) = portfolio.update_status(&created.id, "Closed") {
        println!("rejected: {}", e.public_message());
    }
    if let Err(e) = portfolio.remove_loan(&LoanId::new("L999")) {
        println!("rejected: {}", e.public_message());
    }

    let details = dispatch(&portfolio, "getLoanDetails", json!({"location": "oreg"}), &time);
    println!("{}", serde_json::to_string_pretty(&details)?);

    let summary = portfolio.borrower_summary();
    println!("{} borrower(s), {} outstanding", summary.len(), portfolio.total_loan_amount()?);
    println!("stored at {}", path.display());

    Ok(())
}
