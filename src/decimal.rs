use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Div;
use std::str::FromStr;

use crate::errors::{PortfolioError, Result as PortfolioResult};

/// round half away from zero, the way amounts are shown to borrowers
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// money amount, serialized as a plain json number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// create from decimal, keeping full precision
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d)
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s)?))
    }

    /// create from whole currency units
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round to cents for output
    pub fn round_cents(&self) -> Self {
        Money(round_half_up(self.0, 2))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// apply an annual percentage rate over a fraction of a year
    pub fn simple_interest(&self, rate: Rate, years: Decimal) -> PortfolioResult<Self> {
        self.0
            .checked_mul(rate.as_fraction())
            .and_then(|d| d.checked_mul(years))
            .map(Money)
            .ok_or_else(|| overflow("interest"))
    }

    pub fn checked_add(self, other: Money) -> PortfolioResult<Self> {
        self.0.checked_add(other.0).map(Money).ok_or_else(|| overflow("amount"))
    }

    pub fn checked_mul(self, factor: Decimal) -> PortfolioResult<Self> {
        self.0.checked_mul(factor).map(Money).ok_or_else(|| overflow("amount"))
    }

    /// total of all amounts; errors instead of overflowing
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> PortfolioResult<Self> {
        checked_total(amounts.into_iter().map(|m| m.0), "amount").map(Money)
    }
}

/// sum of decimals, failing with a calculation error on overflow
pub fn checked_total<I: IntoIterator<Item = Decimal>>(values: I, what: &str) -> PortfolioResult<Decimal> {
    values.into_iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).ok_or_else(|| overflow(what))
    })
}

fn overflow(what: &str) -> PortfolioError {
    PortfolioError::Calculation {
        message: format!("{} is out of range", what),
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i64> for Money {
    fn from(i: i64) -> Self {
        Money::from_major(i)
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, other: Decimal) -> Money {
        Money(self.0 / other)
    }
}

/// annual interest rate held as a percentage (5 means 5%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Rate(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from percentage (e.g., 7.5 for 7.5%)
    pub fn from_percent(p: Decimal) -> Self {
        Rate(p)
    }

    /// create from whole percentage points
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p))
    }

    /// create from basis points (e.g., 500 for 5%)
    pub fn from_bps(bps: u32) -> Self {
        Rate(Decimal::from(bps) / Decimal::from(100))
    }

    /// get as percentage
    pub fn as_percent(&self) -> Decimal {
        self.0
    }

    /// get as fraction (0.05 for 5%)
    pub fn as_fraction(&self) -> Decimal {
        self.0 / Decimal::from(100)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_percent(d)
    }
}
