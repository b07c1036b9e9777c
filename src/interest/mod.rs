pub mod accrual;
pub mod compound;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{round_half_up, Money, Rate};
use crate::errors::{PortfolioError, Result};
use crate::types::{Loan, LoanId};

pub use accrual::{elapsed_days, year_fraction, AccrualEngine, DAYS_PER_YEAR};
pub use compound::CompoundingEngine;

/// how accrued interest is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationType {
    #[default]
    Simple,
    Compound,
}

/// trait for interest calculations
pub trait InterestCalculator {
    /// interest accrued on `principal` over `years` (may be negative)
    fn accrued_interest(&self, principal: Money, rate: Rate, years: Decimal) -> Result<Money>;

    fn calculation_type(&self) -> CalculationType;
}

impl CalculationType {
    pub fn calculator(&self) -> Box<dyn InterestCalculator> {
        match self {
            CalculationType::Simple => Box::new(AccrualEngine::new()),
            CalculationType::Compound => Box::new(CompoundingEngine::new()),
        }
    }
}

/// interest calculation result. amounts are rounded to cents and years to
/// four places; neither rounding feeds back into the computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestCalculation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_id: Option<LoanId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrower: Option<String>,
    pub loan_amount: Money,
    pub interest_rate: Rate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days_elapsed: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub years: Decimal,
    pub calculation_type: CalculationType,
    pub accrued_interest: Money,
    pub total_amount: Money,
}

/// accrue interest on explicit terms. `end` defaults to `as_of`.
pub fn calculate(
    principal: Money,
    rate: Rate,
    start: NaiveDate,
    end: Option<NaiveDate>,
    mode: CalculationType,
    as_of: NaiveDate,
) -> Result<InterestCalculation> {
    let end = end.unwrap_or(as_of);
    let days = elapsed_days(start, end);
    let years = year_fraction(days);
    let interest = mode.calculator().accrued_interest(principal, rate, years)?;

    Ok(InterestCalculation {
        loan_id: None,
        borrower: None,
        loan_amount: principal,
        interest_rate: rate,
        start_date: start,
        end_date: end,
        days_elapsed: days,
        years: round_half_up(years, 4),
        calculation_type: mode,
        accrued_interest: interest.round_cents(),
        total_amount: principal.checked_add(interest)?.round_cents(),
    })
}

/// request for an interest calculation: either a loan id (lookup mode) or an
/// explicit principal, rate and start date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterestRequest {
    pub loan_id: Option<LoanId>,
    pub loan_amount: Option<Money>,
    pub interest_rate: Option<Rate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub calculation_type: CalculationType,
}

impl InterestRequest {
    /// lookup mode for a stored loan
    pub fn for_loan(id: impl Into<LoanId>) -> Self {
        Self {
            loan_id: Some(id.into()),
            ..Self::default()
        }
    }

    /// explicit terms
    pub fn custom(principal: Money, rate: Rate, start: NaiveDate) -> Self {
        Self {
            loan_amount: Some(principal),
            interest_rate: Some(rate),
            start_date: Some(start),
            ..Self::default()
        }
    }

    pub fn until(mut self, end: NaiveDate) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn compound(mut self) -> Self {
        self.calculation_type = CalculationType::Compound;
        self
    }

    pub fn with_rate(mut self, rate: Rate) -> Self {
        self.interest_rate = Some(rate);
        self
    }
}

/// resolve a request against the loan collection and accrue
pub fn calculate_request(
    request: &InterestRequest,
    loans: &[Loan],
    as_of: NaiveDate,
) -> Result<InterestCalculation> {
    if let Some(id) = &request.loan_id {
        let loan = loans
            .iter()
            .find(|l| &l.id == id)
            .ok_or_else(|| PortfolioError::NotFound { id: id.clone() })?;
        return calculate_for_loan(loan, request.interest_rate, request.end_date, request.calculation_type, as_of);
    }

    match (request.loan_amount, request.interest_rate, request.start_date) {
        (Some(principal), Some(rate), Some(start)) if !principal.is_zero() && !rate.as_percent().is_zero() => {
            calculate(principal, rate, start, request.end_date, request.calculation_type, as_of)
        }
        _ => Err(PortfolioError::invalid_parameters(
            "Please provide either a loan ID or loan amount, interest rate, and start date",
        )),
    }
}

/// accrue on a stored loan from its loan date; an explicit rate replaces the
/// stored one and must be positive
pub fn calculate_for_loan(
    loan: &Loan,
    rate_override: Option<Rate>,
    end: Option<NaiveDate>,
    mode: CalculationType,
    as_of: NaiveDate,
) -> Result<InterestCalculation> {
    let rate = match rate_override {
        Some(rate) if !rate.is_positive() => {
            return Err(PortfolioError::invalid_parameters(
                "Valid interestPerc is required (query param or stored on loan)",
            ))
        }
        Some(rate) => rate,
        None => loan.interest_perc,
    };

    let mut result = calculate(loan.loan_amount, rate, loan.loan_date, end, mode, as_of)?;
    result.loan_id = Some(loan.id.clone());
    result.borrower = Some(loan.borrower.clone());
    Ok(result)
}
