/// portfolio analytics with custom risk bands
use chrono::NaiveDate;
use loan_portfolio_rs::{aggregate, aggregate_with_bands, AnalysisOptions, Decimal, GroupBy, Loan, RiskBands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loans: Vec<Loan> = serde_json::from_str(include_str!("../data/loans.json"))?;
    let as_of = NaiveDate::from_ymd_opt(2024, 6, 30).ok_or("bad date")?;

    let options = AnalysisOptions::default().with_interest().grouped_by(GroupBy::Year);
    let analytics = aggregate(&loans, &options, as_of)?;

    println!("loans: {}", analytics.total_loans);
    println!("volume: {}", analytics.total_loan_amount);
    println!("average: {}", analytics.average_loan_amount.round_cents());
    println!("average ltv: {}%", analytics.average_ltv.round_dp(2));
    for (status, totals) in analytics.status_breakdown.iter() {
        println!("  {:<10} {:>2} loans {:>14}", status, totals.count, totals.total_amount);
    }
    if let Some(insights) = &analytics.insights {
        println!("{}", serde_json::to_string_pretty(insights)?);
    }

    // a stricter book: anything above 70% counts as high risk
    let strict = RiskBands {
        low_max_ltv: Decimal::from(50),
        medium_max_ltv: Decimal::from(70),
        high_risk_share: Decimal::new(2, 1),
    };
    strict.validate()?;
    let analytics = aggregate_with_bands(&loans, &AnalysisOptions::default(), &strict, as_of)?;
    println!("{}", serde_json::to_string_pretty(&analytics.ltv_ranges)?);
    println!("{}", serde_json::to_string_pretty(&analytics.insights)?);

    Ok(())
}
