use crate::errors::{PortfolioError, Result};
use crate::repository::{position, LoanRepository};
use crate::types::{Loan, LoanId};

/// loan collection held in memory only
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoanRepository {
    loans: Vec<Loan>,
}

impl InMemoryLoanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_loans(loans: Vec<Loan>) -> Self {
        Self { loans }
    }
}

impl LoanRepository for InMemoryLoanRepository {
    fn list(&self) -> &[Loan] {
        &self.loans
    }

    fn append(&mut self, loan: Loan) -> Result<()> {
        self.loans.push(loan);
        Ok(())
    }

    fn update(&mut self, loan: Loan) -> Result<()> {
        let slot = position(&self.loans, &loan.id)
            .ok_or_else(|| PortfolioError::NotFound { id: loan.id.clone() })?;
        self.loans[slot] = loan;
        Ok(())
    }

    fn remove(&mut self, id: &LoanId) -> Result<Loan> {
        let slot = position(&self.loans, id).ok_or_else(|| PortfolioError::NotFound { id: id.clone() })?;
        Ok(self.loans.remove(slot))
    }
}
