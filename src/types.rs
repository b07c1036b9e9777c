use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::decimal::{Money, Rate};
use crate::errors::{PortfolioError, Result};

/// loan identifier, e.g. "L0012"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(String);

impl LoanId {
    pub fn new(id: impl Into<String>) -> Self {
        LoanId(id.into())
    }

    /// id for the next appended loan. gaps left by deletions are not
    /// considered, so this can repeat an id that is still in use.
    pub fn sequential(existing: usize) -> Self {
        LoanId(format!("L00{}", existing + 1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LoanId {
    fn from(s: &str) -> Self {
        LoanId::new(s)
    }
}

impl From<String> for LoanId {
    fn from(s: String) -> Self {
        LoanId(s)
    }
}

/// loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoanStatus {
    #[default]
    Pending,
    Approved,
    Declined,
    Funded,
    #[serde(rename = "All Paid")]
    AllPaid,
    #[serde(rename = "In Review")]
    InReview,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 6] = [
        LoanStatus::Pending,
        LoanStatus::Approved,
        LoanStatus::Declined,
        LoanStatus::Funded,
        LoanStatus::AllPaid,
        LoanStatus::InReview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "Pending",
            LoanStatus::Approved => "Approved",
            LoanStatus::Declined => "Declined",
            LoanStatus::Funded => "Funded",
            LoanStatus::AllPaid => "All Paid",
            LoanStatus::InReview => "In Review",
        }
    }

    fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = PortfolioError;

    /// exact match against the allowed set
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                PortfolioError::validation(format!(
                    "status must be one of: {}",
                    Self::allowed_list()
                ))
            })
    }
}

/// a loan record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: LoanId,
    pub borrower: String,
    pub property_type: String,
    pub location: String,
    pub loan_amount: Money,
    #[serde(with = "rust_decimal::serde::float", default)]
    pub ltv: Decimal,
    pub interest_perc: Rate,
    pub status: LoanStatus,
    pub loan_date: NaiveDate,
}

impl Loan {
    pub fn builder(id: impl Into<String>) -> LoanBuilder {
        LoanBuilder::new(id)
    }

    /// check the stored-loan invariants
    pub fn validate(&self) -> Result<()> {
        if self.borrower.trim().is_empty() {
            return Err(PortfolioError::validation("borrower is required"));
        }
        if !self.loan_amount.is_positive() {
            return Err(PortfolioError::validation("loanAmount must be a positive number"));
        }
        if !self.interest_perc.is_positive() {
            return Err(PortfolioError::validation("interestPerc must be a positive number"));
        }
        Ok(())
    }
}

/// builder for loan records
pub struct LoanBuilder {
    loan: Loan,
}

impl LoanBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            loan: Loan {
                id: LoanId::new(id),
                borrower: String::new(),
                property_type: String::new(),
                location: String::new(),
                loan_amount: Money::ZERO,
                ltv: Decimal::ZERO,
                interest_perc: Rate::ZERO,
                status: LoanStatus::Pending,
                loan_date: NaiveDate::default(),
            },
        }
    }

    pub fn borrower(mut self, borrower: impl Into<String>) -> Self {
        self.loan.borrower = borrower.into();
        self
    }

    pub fn property_type(mut self, property_type: impl Into<String>) -> Self {
        self.loan.property_type = property_type.into();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.loan.location = location.into();
        self
    }

    pub fn amount(mut self, amount: Money) -> Self {
        self.loan.loan_amount = amount;
        self
    }

    pub fn ltv(mut self, ltv: Decimal) -> Self {
        self.loan.ltv = ltv;
        self
    }

    pub fn rate(mut self, rate: Rate) -> Self {
        self.loan.interest_perc = rate;
        self
    }

    pub fn status(mut self, status: LoanStatus) -> Self {
        self.loan.status = status;
        self
    }

    pub fn loan_date(mut self, date: NaiveDate) -> Self {
        self.loan.loan_date = date;
        self
    }

    pub fn build(self) -> Loan {
        self.loan
    }
}

/// creation input. fields are optional so missing values surface as
/// validation errors rather than decode errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewLoan {
    pub borrower: Option<String>,
    pub property_type: Option<String>,
    pub location: Option<String>,
    pub loan_amount: Option<Money>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub ltv: Option<Decimal>,
    pub interest_perc: Option<Rate>,
    pub status: Option<String>,
    pub loan_date: Option<NaiveDate>,
}

impl NewLoan {
    /// validate and turn into a stored loan. a missing loan date falls back
    /// to `today`.
    pub fn into_loan(self, id: LoanId, today: NaiveDate) -> Result<Loan> {
        let borrower = self.borrower.filter(|b| !b.trim().is_empty());
        let (borrower, loan_amount, interest_perc) =
            match (borrower, self.loan_amount, self.interest_perc) {
                (Some(b), Some(a), Some(r)) if !a.is_zero() => (b, a, r),
                _ => {
                    return Err(PortfolioError::validation(
                        "Missing required fields (borrower, loanAmount, interestPerc)",
                    ))
                }
            };

        let status = match self.status.as_deref() {
            None | Some("") => LoanStatus::Pending,
            Some(s) => s.parse()?,
        };

        let loan = Loan {
            id,
            borrower,
            property_type: self.property_type.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            loan_amount,
            ltv: self.ltv.unwrap_or_default(),
            interest_perc,
            status,
            loan_date: self.loan_date.unwrap_or(today),
        };
        loan.validate()?;
        Ok(loan)
    }
}

/// partial update. absent fields keep their stored values; the id is fixed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoanPatch {
    pub borrower: Option<String>,
    pub property_type: Option<String>,
    pub location: Option<String>,
    pub loan_amount: Option<Money>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub ltv: Option<Decimal>,
    pub interest_perc: Option<Rate>,
    pub status: Option<String>,
    pub loan_date: Option<NaiveDate>,
}

impl LoanPatch {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    /// merge onto an existing loan, validating the result
    pub fn apply(self, existing: &Loan) -> Result<Loan> {
        let mut updated = existing.clone();
        if let Some(borrower) = self.borrower {
            updated.borrower = borrower;
        }
        if let Some(property_type) = self.property_type {
            updated.property_type = property_type;
        }
        if let Some(location) = self.location {
            updated.location = location;
        }
        if let Some(amount) = self.loan_amount {
            updated.loan_amount = amount;
        }
        if let Some(ltv) = self.ltv {
            updated.ltv = ltv;
        }
        if let Some(rate) = self.interest_perc {
            updated.interest_perc = rate;
        }
        if let Some(status) = self.status.as_deref() {
            updated.status = status.parse()?;
        }
        if let Some(date) = self.loan_date {
            updated.loan_date = date;
        }
        updated.validate()?;
        Ok(updated)
    }
}

/// borrower and amount pair for the summary listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerSummary {
    pub borrower: String,
    pub loan_amount: Money,
}

impl From<&Loan> for BorrowerSummary {
    fn from(loan: &Loan) -> Self {
        Self {
            borrower: loan.borrower.clone(),
            loan_amount: loan.loan_amount,
        }
    }
}
