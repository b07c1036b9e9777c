use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::interest::{CalculationType, InterestCalculator};

/// fixed year basis; leap years are not adjusted for
pub const DAYS_PER_YEAR: i64 = 365;

/// whole days from `start` to `end`, negative when `end` comes first
pub fn elapsed_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// fraction of a year covered by `days` on the actual/365 basis
pub fn year_fraction(days: i64) -> Decimal {
    Decimal::from(days) / Decimal::from(DAYS_PER_YEAR)
}

/// engine for simple (non-compounding) interest on an actual/365 basis
#[derive(Debug, Clone, Copy, Default)]
pub struct AccrualEngine;

impl AccrualEngine {
    pub fn new() -> Self {
        Self
    }

    /// principal * rate * years
    pub fn calculate_simple_interest(&self, principal: Money, annual_rate: Rate, years: Decimal) -> Result<Money> {
        principal.simple_interest(annual_rate, years)
    }

    /// simple interest accrued between two dates
    pub fn accrue_between(
        &self,
        principal: Money,
        annual_rate: Rate,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Money> {
        let years = year_fraction(elapsed_days(start, end));
        self.calculate_simple_interest(principal, annual_rate, years)
    }
}

impl InterestCalculator for AccrualEngine {
    fn accrued_interest(&self, principal: Money, rate: Rate, years: Decimal) -> Result<Money> {
        self.calculate_simple_interest(principal, rate, years)
    }

    fn calculation_type(&self) -> CalculationType {
        CalculationType::Simple
    }
}
