use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::Loan;

/// field a query result is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    LoanAmount,
    #[default]
    LoanDate,
    Ltv,
    InterestPerc,
    Borrower,
}

/// sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortField {
    /// ascending comparison of two loans on this field
    pub fn compare(&self, a: &Loan, b: &Loan) -> Ordering {
        match self {
            SortField::LoanAmount => a.loan_amount.cmp(&b.loan_amount),
            SortField::LoanDate => a.loan_date.cmp(&b.loan_date),
            SortField::Ltv => a.ltv.cmp(&b.ltv),
            SortField::InterestPerc => a.interest_perc.cmp(&b.interest_perc),
            SortField::Borrower => a.borrower.to_lowercase().cmp(&b.borrower.to_lowercase()),
        }
    }
}

/// stable in-place sort; loans with equal keys keep their relative order in
/// either direction
pub fn sort_loans(loans: &mut [Loan], field: SortField, order: SortOrder) {
    match order {
        SortOrder::Asc => loans.sort_by(|a, b| field.compare(a, b)),
        SortOrder::Desc => loans.sort_by(|a, b| field.compare(b, a)),
    }
}
