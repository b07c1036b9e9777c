pub mod json_file;
pub mod memory;

use crate::errors::Result;
use crate::types::{Loan, LoanId};

pub use json_file::JsonFileLoanRepository;
pub use memory::InMemoryLoanRepository;

/// ordered loan collection. records keep insertion order; ids are not
/// checked for uniqueness, lookups return the first match.
pub trait LoanRepository {
    fn list(&self) -> &[Loan];

    fn find(&self, id: &LoanId) -> Option<&Loan> {
        self.list().iter().find(|loan| &loan.id == id)
    }

    fn append(&mut self, loan: Loan) -> Result<()>;

    /// replace the first record with the same id
    fn update(&mut self, loan: Loan) -> Result<()>;

    /// remove the first record with the given id, returning it
    fn remove(&mut self, id: &LoanId) -> Result<Loan>;
}

pub(crate) fn position(loans: &[Loan], id: &LoanId) -> Option<usize> {
    loans.iter().position(|loan| &loan.id == id)
}
