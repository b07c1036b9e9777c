use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{PortfolioError, Result};
use crate::repository::{position, LoanRepository};
use crate::types::{Loan, LoanId};

/// loan collection persisted as a pretty-printed json array. the whole file
/// is rewritten after every mutation; a failed write leaves memory untouched.
#[derive(Debug)]
pub struct JsonFileLoanRepository {
    path: PathBuf,
    loans: Vec<Loan>,
}

impl JsonFileLoanRepository {
    /// open the collection at `path`. a missing file is an empty collection
    /// and is not created until the first mutation.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let loans = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => Vec::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(PortfolioError::Storage { path, source }),
        };
        debug!(path = %path.display(), loans = loans.len(), "loaded loan collection");
        Ok(Self { path, loans })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, loans: &[Loan]) -> Result<()> {
        let body = serde_json::to_string_pretty(loans)?;
        fs::write(&self.path, body).map_err(|source| PortfolioError::Storage {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), loans = loans.len(), "flushed loan collection");
        Ok(())
    }

    /// apply `change` to a copy, persist it, then swap it in
    fn commit<T>(&mut self, change: impl FnOnce(&mut Vec<Loan>) -> Result<T>) -> Result<T> {
        let mut next = self.loans.clone();
        let out = change(&mut next)?;
        self.flush(&next)?;
        self.loans = next;
        Ok(out)
    }
}

impl LoanRepository for JsonFileLoanRepository {
    fn list(&self) -> &[Loan] {
        &self.loans
    }

    fn append(&mut self, loan: Loan) -> Result<()> {
        self.commit(|loans| {
            loans.push(loan);
            Ok(())
        })
    }

    fn update(&mut self, loan: Loan) -> Result<()> {
        self.commit(|loans| {
            let slot = position(loans, &loan.id).ok_or_else(|| PortfolioError::NotFound { id: loan.id.clone() })?;
            loans[slot] = loan;
            Ok(())
        })
    }

    fn remove(&mut self, id: &LoanId) -> Result<Loan> {
        self.commit(|loans| {
            let slot = position(loans, id).ok_or_else(|| PortfolioError::NotFound { id: id.clone() })?;
            Ok(loans.remove(slot))
        })
    }
}
