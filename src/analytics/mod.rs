pub mod breakdown;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::RiskBands;
use crate::decimal::{checked_total, Money};
use crate::errors::Result;
use crate::interest::AccrualEngine;
use crate::types::Loan;

pub use breakdown::{Breakdown, BucketTotals, LtvRanges};

/// requested analysis; echoed back in the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisType {
    #[default]
    Summary,
    ByStatus,
    ByProperty,
    ByLocation,
    #[serde(rename = "byLTV")]
    ByLtv,
    ByInterestRate,
    Trends,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupBy {
    Status,
    PropertyType,
    Location,
    Month,
    Year,
}

/// analysis options
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisOptions {
    pub analysis_type: AnalysisType,
    pub group_by: Option<GroupBy>,
    pub include_interest: bool,
}

impl AnalysisOptions {
    pub fn with_interest(mut self) -> Self {
        self.include_interest = true;
        self
    }

    pub fn grouped_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = Some(group_by);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskProfile {
    #[serde(rename = "High Risk Portfolio")]
    HighRisk,
    #[serde(rename = "Balanced Portfolio")]
    Balanced,
}

/// headline observations about the book
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub most_common_status: String,
    pub most_common_property_type: String,
    pub top_location_by_volume: String,
    pub risk_profile: RiskProfile,
}

/// portfolio statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAnalytics {
    pub analysis_type: AnalysisType,
    pub total_loans: usize,
    pub total_loan_amount: Money,
    pub average_loan_amount: Money,
    #[serde(rename = "averageLTV", with = "rust_decimal::serde::float")]
    pub average_ltv: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_interest_rate: Decimal,
    pub status_breakdown: Breakdown,
    pub property_type_breakdown: Breakdown,
    pub location_breakdown: Breakdown,
    pub ltv_ranges: LtvRanges,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_breakdown: Option<Breakdown>,
    /// null unless interest was requested
    pub total_accrued_interest: Option<Money>,
    /// null for an empty portfolio
    pub insights: Option<Insights>,
}

/// aggregate with the stock risk bands
pub fn aggregate(loans: &[Loan], options: &AnalysisOptions, as_of: NaiveDate) -> Result<PortfolioAnalytics> {
    aggregate_with_bands(loans, options, &RiskBands::default(), as_of)
}

pub fn aggregate_with_bands(
    loans: &[Loan],
    options: &AnalysisOptions,
    bands: &RiskBands,
    as_of: NaiveDate,
) -> Result<PortfolioAnalytics> {
    let total_loans = loans.len();
    let total_loan_amount = Money::checked_sum(loans.iter().map(|l| l.loan_amount))?;

    let (average_loan_amount, average_ltv, average_interest_rate) = if total_loans == 0 {
        (Money::ZERO, Decimal::ZERO, Decimal::ZERO)
    } else {
        let n = Decimal::from(total_loans);
        let ltv_sum = checked_total(loans.iter().map(|l| l.ltv), "ltv")?;
        let rate_sum = checked_total(loans.iter().map(|l| l.interest_perc.as_percent()), "interest rate")?;
        (total_loan_amount / n, ltv_sum / n, rate_sum / n)
    };

    let status_breakdown = Breakdown::from_loans(loans, |l| l.status.to_string())?;
    let property_type_breakdown = Breakdown::from_loans(loans, |l| l.property_type.clone())?;
    let location_breakdown = Breakdown::from_loans(loans, |l| l.location.clone())?;
    let ltv_ranges = LtvRanges::from_loans(loans, bands);

    let period_breakdown = match options.group_by {
        Some(GroupBy::Month) => Some(Breakdown::from_loans(loans, |l| {
            l.loan_date.format("%Y-%m").to_string()
        })?),
        Some(GroupBy::Year) => Some(Breakdown::from_loans(loans, |l| {
            l.loan_date.format("%Y").to_string()
        })?),
        _ => None,
    };

    let accrued = if options.include_interest {
        Some(total_accrued_interest(loans, as_of)?)
    } else {
        None
    };

    let insights = derive_insights(
        &status_breakdown,
        &property_type_breakdown,
        &location_breakdown,
        &ltv_ranges,
        total_loans,
    );

    Ok(PortfolioAnalytics {
        analysis_type: options.analysis_type,
        total_loans,
        total_loan_amount,
        average_loan_amount,
        average_ltv,
        average_interest_rate,
        status_breakdown,
        property_type_breakdown,
        location_breakdown,
        ltv_ranges,
        period_breakdown,
        total_accrued_interest: accrued,
        insights,
    })
}

/// simple interest on every loan from its loan date to `as_of`, rounded once
/// after summing
pub fn total_accrued_interest(loans: &[Loan], as_of: NaiveDate) -> Result<Money> {
    let engine = AccrualEngine::new();
    let total = loans.iter().try_fold(Money::ZERO, |acc, l| {
        let interest = engine.accrue_between(l.loan_amount, l.interest_perc, l.loan_date, as_of)?;
        acc.checked_add(interest)
    })?;
    Ok(total.round_cents())
}

fn derive_insights(
    by_status: &Breakdown,
    by_property: &Breakdown,
    by_location: &Breakdown,
    ltv_ranges: &LtvRanges,
    total_loans: usize,
) -> Option<Insights> {
    let risk_profile = if ltv_ranges.is_high_risk(total_loans) {
        RiskProfile::HighRisk
    } else {
        RiskProfile::Balanced
    };

    Some(Insights {
        most_common_status: by_status.most_common()?.to_string(),
        most_common_property_type: by_property.most_common()?.to_string(),
        top_location_by_volume: by_location.largest_by_amount()?.to_string(),
        risk_profile,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::types::LoanStatus;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan(
        id: &str,
        status: LoanStatus,
        property_type: &str,
        location: &str,
        amount: i64,
        ltv: Decimal,
    ) -> Loan {
        Loan::builder(id)
            .borrower(format!("Borrower {}", id))
            .property_type(property_type)
            .location(location)
            .amount(Money::from_major(amount))
            .ltv(ltv)
            .rate(Rate::from_percentage(6))
            .status(status)
            .loan_date(date(2024, 1, 1))
            .build()
    }

    fn book() -> Vec<Loan> {
        vec![
            loan("L001", LoanStatus::Funded, "Residential", "California", 300_000, dec!(70)),
            loan("L002", LoanStatus::Pending, "Commercial", "Texas", 900_000, dec!(80)),
            loan("L003", LoanStatus::Funded, "Residential", "Texas", 200_000, dec!(55)),
            loan("L004", LoanStatus::Approved, "Office", "California", 600_000, dec!(65)),
        ]
    }

    #[test]
    fn test_totals_and_averages() {
        let analytics = aggregate(&book(), &AnalysisOptions::default(), date(2024, 6, 1)).unwrap();
        assert_eq!(analytics.total_loans, 4);
        assert_eq!(analytics.total_loan_amount, Money::from_major(2_000_000));
        assert_eq!(analytics.average_loan_amount, Money::from_major(500_000));
        assert_eq!(analytics.average_ltv, dec!(67.5));
        assert_eq!(analytics.average_interest_rate, dec!(6));
        assert_eq!(analytics.total_accrued_interest, None);
        assert_eq!(analytics.period_breakdown, None);
    }

    #[test]
    fn test_breakdowns_and_insights() {
        let analytics = aggregate(&book(), &AnalysisOptions::default(), date(2024, 6, 1)).unwrap();

        let funded = analytics.status_breakdown.get("Funded").unwrap();
        assert_eq!(funded.count, 2);
        assert_eq!(funded.total_amount, Money::from_major(500_000));
        assert_eq!(analytics.property_type_breakdown.len(), 3);
        assert_eq!(analytics.ltv_ranges.low_risk, 1);
        assert_eq!(analytics.ltv_ranges.medium_risk, 2);
        assert_eq!(analytics.ltv_ranges.high_risk, 1);

        let insights = analytics.insights.unwrap();
        assert_eq!(insights.most_common_status, "Funded");
        assert_eq!(insights.most_common_property_type, "Residential");
        // texas 1.1m vs california 0.9m
        assert_eq!(insights.top_location_by_volume, "Texas");
        // one of four above 75% is 25%
        assert_eq!(insights.risk_profile, RiskProfile::Balanced);
    }

    #[test]
    fn test_single_status_collection() {
        let loans = vec![
            loan("L001", LoanStatus::InReview, "Retail", "Ohio", 150_000, dec!(50)),
            loan("L002", LoanStatus::InReview, "Retail", "Ohio", 250_000, dec!(50)),
            loan("L003", LoanStatus::InReview, "Office", "Iowa", 100_000, dec!(50)),
        ];
        let analytics = aggregate(&loans, &AnalysisOptions::default(), date(2024, 6, 1)).unwrap();
        assert_eq!(analytics.status_breakdown.len(), 1);
        let bucket = analytics.status_breakdown.get("In Review").unwrap();
        assert_eq!(bucket.count, loans.len());
        assert_eq!(bucket.total_amount, Money::from_major(500_000));
    }

    #[test]
    fn test_risk_profile() {
        let risky = vec![
            loan("L001", LoanStatus::Funded, "Residential", "Ohio", 100_000, dec!(90)),
            loan("L002", LoanStatus::Funded, "Residential", "Ohio", 100_000, dec!(50)),
            loan("L003", LoanStatus::Funded, "Residential", "Ohio", 100_000, dec!(50)),
        ];
        let analytics = aggregate(&risky, &AnalysisOptions::default(), date(2024, 6, 1)).unwrap();
        assert_eq!(analytics.insights.unwrap().risk_profile, RiskProfile::HighRisk);

        let safe = vec![
            loan("L001", LoanStatus::Funded, "Residential", "Ohio", 100_000, dec!(40)),
            loan("L002", LoanStatus::Funded, "Residential", "Ohio", 100_000, dec!(75)),
        ];
        let analytics = aggregate(&safe, &AnalysisOptions::default(), date(2024, 6, 1)).unwrap();
        assert_eq!(analytics.insights.unwrap().risk_profile, RiskProfile::Balanced);
    }

    #[test]
    fn test_custom_bands() {
        let bands = RiskBands {
            low_max_ltv: dec!(50),
            medium_max_ltv: dec!(60),
            high_risk_share: dec!(0.5),
        };
        let analytics =
            aggregate_with_bands(&book(), &AnalysisOptions::default(), &bands, date(2024, 6, 1)).unwrap();
        assert_eq!(analytics.ltv_ranges.high_risk, 3);
        assert_eq!(analytics.insights.unwrap().risk_profile, RiskProfile::HighRisk);
    }

    #[test]
    fn test_accrued_interest_against_as_of() {
        let loans = vec![
            loan("L001", LoanStatus::Funded, "Residential", "Ohio", 100_000, dec!(50)),
            loan("L002", LoanStatus::Funded, "Residential", "Ohio", 50_000, dec!(50)),
        ];
        // 2024-01-01 to 2024-12-31 is 365 days at 6%
        let analytics = aggregate(
            &loans,
            &AnalysisOptions::default().with_interest(),
            date(2024, 12, 31),
        ).unwrap();
        assert_eq!(analytics.total_accrued_interest, Some(Money::from_major(9_000)));
    }

    #[test]
    fn test_period_breakdown() {
        let mut loans = book();
        loans[1].loan_date = date(2023, 5, 20);
        loans[3].loan_date = date(2024, 1, 31);

        let by_month = aggregate(
            &loans,
            &AnalysisOptions::default().grouped_by(GroupBy::Month),
            date(2024, 6, 1),
        ).unwrap();
        let periods = by_month.period_breakdown.unwrap();
        assert_eq!(periods.get("2024-01").unwrap().count, 3);
        assert_eq!(periods.get("2023-05").unwrap().count, 1);

        let by_year = aggregate(
            &loans,
            &AnalysisOptions::default().grouped_by(GroupBy::Year),
            date(2024, 6, 1),
        ).unwrap();
        let periods = by_year.period_breakdown.unwrap();
        assert_eq!(periods.get("2024").unwrap().total_amount, Money::from_major(1_100_000));

        let by_status = aggregate(
            &loans,
            &AnalysisOptions::default().grouped_by(GroupBy::Status),
            date(2024, 6, 1),
        ).unwrap();
        assert!(by_status.period_breakdown.is_none());
    }

    #[test]
    fn test_empty_portfolio() {
        let analytics = aggregate(&[], &AnalysisOptions::default().with_interest(), date(2024, 6, 1)).unwrap();
        assert_eq!(analytics.total_loans, 0);
        assert_eq!(analytics.average_loan_amount, Money::ZERO);
        assert_eq!(analytics.total_accrued_interest, Some(Money::ZERO));
        assert!(analytics.insights.is_none());
    }

    #[test]
    fn test_json_shape() {
        let options: AnalysisOptions =
            serde_json::from_str(r#"{"analysisType": "byLTV", "includeInterest": false}"#).unwrap();
        let analytics = aggregate(&book(), &options, date(2024, 6, 1)).unwrap();
        let value = serde_json::to_value(&analytics).unwrap();
        assert_eq!(value["analysisType"], "byLTV");
        assert_eq!(value["totalLoans"], 4);
        assert_eq!(value["averageLTV"], 67.5);
        assert!(value["totalAccruedInterest"].is_null());
        assert_eq!(value["ltvRanges"]["High Risk (>75%)"], 1);
        assert_eq!(value["statusBreakdown"]["Funded"]["count"], 2);
        assert_eq!(value["insights"]["riskProfile"], "Balanced Portfolio");
        assert!(value.get("periodBreakdown").is_none());
    }

    #[test]
    fn test_out_of_range_totals_are_errors() {
        let big = Money::from_decimal(Decimal::from_i128_with_scale(5 * 10i128.pow(28), 0));
        let mut loans = book();
        loans.truncate(2);
        for l in &mut loans {
            l.loan_amount = big;
        }
        let err = aggregate(&loans, &AnalysisOptions::default(), date(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, crate::errors::PortfolioError::Calculation { .. }));

        // a single large loan totals fine but its accrued interest does not fit
        loans.truncate(1);
        loans[0].interest_perc = Rate::from_percentage(500);
        loans[0].loan_date = date(2020, 1, 1);
        assert!(aggregate(&loans, &AnalysisOptions::default(), date(2024, 6, 1)).is_ok());
        assert!(aggregate(&loans, &AnalysisOptions::default().with_interest(), date(2024, 6, 1)).is_err());
    }
}
