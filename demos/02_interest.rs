/// simple vs compound accrual on explicit terms and on a stored loan
use chrono::NaiveDate;
use loan_portfolio_rs::{
    calculate, calculate_request, CalculationType, InterestRequest, Loan, Money, Rate,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).ok_or("bad date")?;
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).ok_or("bad date")?;
    let principal = Money::from_major(100_000);
    let rate = Rate::from_percentage(5);

    for mode in [CalculationType::Simple, CalculationType::Compound] {
        let result = calculate(principal, rate, start, Some(end), mode, end)?;
        println!(
            "{:?}: {} days ({} years) interest {} total {}",
            mode, result.days_elapsed, result.years, result.accrued_interest, result.total_amount
        );
    }

    // lookup mode with a rate override
    let loans: Vec<Loan> = serde_json::from_str(include_str!("../data/loans.json"))?;
    let request = InterestRequest::for_loan("L004")
        .with_rate(Rate::from_percentage(7))
        .until(end)
        .compound();
    let result = calculate_request(&request, &loans, end)?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    // an end date before the start accrues negative interest
    let backwards = calculate(principal, rate, end, Some(start), CalculationType::Simple, end)?;
    println!("backwards: {} days, interest {}", backwards.days_elapsed, backwards.accrued_interest);

    Ok(())
}
