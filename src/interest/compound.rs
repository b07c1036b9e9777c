use rust_decimal::{Decimal, MathematicalOps};

use crate::decimal::{Money, Rate};
use crate::errors::{PortfolioError, Result};
use crate::interest::{CalculationType, InterestCalculator};

/// engine for annually compounded interest. fractional years compound
/// continuously within the year: principal * ((1 + r)^years - 1)
#[derive(Debug, Clone, Copy, Default)]
pub struct CompoundingEngine;

impl CompoundingEngine {
    pub fn new() -> Self {
        Self
    }

    /// growth factor (1 + r)^years
    pub fn growth_factor(&self, annual_rate: Rate, years: Decimal) -> Result<Decimal> {
        let base = Decimal::ONE + annual_rate.as_fraction();
        base.checked_powd(years).ok_or_else(|| PortfolioError::Calculation {
            message: format!("cannot compound {} over {} years", annual_rate, years),
        })
    }

    /// compound interest earned over `years`
    pub fn calculate_compound(&self, principal: Money, annual_rate: Rate, years: Decimal) -> Result<Money> {
        let factor = self.growth_factor(annual_rate, years)?;
        principal.checked_mul(factor - Decimal::ONE)
    }
}

impl InterestCalculator for CompoundingEngine {
    fn accrued_interest(&self, principal: Money, rate: Rate, years: Decimal) -> Result<Money> {
        self.calculate_compound(principal, rate, years)
    }

    fn calculation_type(&self) -> CalculationType {
        CalculationType::Compound
    }
}
