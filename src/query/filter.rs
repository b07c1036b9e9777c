use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::query::LoanQuery;
use crate::types::Loan;

/// decode an optional value, treating anything of the wrong shape as absent
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// zero and empty values carry no constraint
fn bound(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| !v.is_zero())
}

fn needle(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

fn contains_ignore_case(haystack: &str, needle: &Option<String>) -> bool {
    match needle {
        Some(n) => haystack.to_lowercase().contains(n.as_str()),
        None => true,
    }
}

fn within<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
}

/// criteria normalised once per query
pub(crate) struct LoanFilter {
    status: Option<String>,
    property_type: Option<String>,
    location: Option<String>,
    borrower_name: Option<String>,
    min_loan_amount: Option<Decimal>,
    max_loan_amount: Option<Decimal>,
    min_ltv: Option<Decimal>,
    max_ltv: Option<Decimal>,
    min_interest_rate: Option<Decimal>,
    max_interest_rate: Option<Decimal>,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
}

impl LoanFilter {
    pub(crate) fn new(criteria: &LoanQuery) -> Self {
        Self {
            status: needle(&criteria.status),
            property_type: needle(&criteria.property_type),
            location: needle(&criteria.location),
            borrower_name: needle(&criteria.borrower_name),
            min_loan_amount: bound(criteria.min_loan_amount),
            max_loan_amount: bound(criteria.max_loan_amount),
            min_ltv: bound(criteria.min_ltv),
            max_ltv: bound(criteria.max_ltv),
            min_interest_rate: bound(criteria.min_interest_rate),
            max_interest_rate: bound(criteria.max_interest_rate),
            from_date: criteria.from_date,
            to_date: criteria.to_date,
        }
    }

    pub(crate) fn matches(&self, loan: &Loan) -> bool {
        contains_ignore_case(loan.status.as_str(), &self.status)
            && contains_ignore_case(&loan.property_type, &self.property_type)
            && contains_ignore_case(&loan.location, &self.location)
            && contains_ignore_case(&loan.borrower, &self.borrower_name)
            && within(
                loan.loan_amount.as_decimal(),
                self.min_loan_amount,
                self.max_loan_amount,
            )
            && within(loan.ltv, self.min_ltv, self.max_ltv)
            && within(
                loan.interest_perc.as_percent(),
                self.min_interest_rate,
                self.max_interest_rate,
            )
            && within(loan.loan_date, self.from_date, self.to_date)
    }
}
