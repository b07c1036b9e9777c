use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use tracing::{debug, info, warn};

use crate::analytics::{aggregate_with_bands, AnalysisOptions, PortfolioAnalytics};
use crate::config::PortfolioConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{PortfolioError, Result};
use crate::interest::{calculate_for_loan, calculate_request, CalculationType, InterestCalculation, InterestRequest};
use crate::query::{query_with_defaults, LoanQuery, QueryResult};
use crate::repository::{InMemoryLoanRepository, JsonFileLoanRepository, LoanRepository};
use crate::types::{BorrowerSummary, Loan, LoanId, LoanPatch, LoanStatus, NewLoan};

/// loan book service: owns the repository and routes reads through the
/// query, interest and analytics functions
pub struct LoanPortfolio<R: LoanRepository> {
    repository: R,
    config: PortfolioConfig,
}

impl LoanPortfolio<InMemoryLoanRepository> {
    pub fn in_memory(loans: Vec<Loan>) -> Self {
        Self::new(InMemoryLoanRepository::with_loans(loans), PortfolioConfig::default())
    }
}

impl LoanPortfolio<JsonFileLoanRepository> {
    /// open the json collection named by `config.storage.data_path`
    pub fn open(config: PortfolioConfig) -> Result<Self> {
        config.validate()?;
        let repository = JsonFileLoanRepository::open(&config.storage.data_path)?;
        Ok(Self::new(repository, config))
    }
}

impl<R: LoanRepository> LoanPortfolio<R> {
    pub fn new(repository: R, config: PortfolioConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &PortfolioConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn loans(&self) -> &[Loan] {
        self.repository.list()
    }

    pub fn find_loan(&self, id: &LoanId) -> Result<&Loan> {
        self.repository
            .find(id)
            .ok_or_else(|| PortfolioError::NotFound { id: id.clone() })
    }

    pub fn find_loans(&self, criteria: &LoanQuery) -> QueryResult {
        let result = query_with_defaults(self.loans(), criteria, &self.config.query);
        debug!(
            matching = result.total_matching,
            returned = result.results.len(),
            total = result.total_in_collection,
            "loan query"
        );
        result
    }

    pub fn calculate_interest(
        &self,
        request: &InterestRequest,
        time: &SafeTimeProvider,
    ) -> Result<InterestCalculation> {
        let result = calculate_request(request, self.loans(), today(time))?;
        log_calculation(&result);
        Ok(result)
    }

    /// simple interest on a stored loan up to today
    pub fn accrued_interest(
        &self,
        id: &LoanId,
        rate_override: Option<Rate>,
        time: &SafeTimeProvider,
    ) -> Result<InterestCalculation> {
        let loan = self.find_loan(id)?;
        let result = calculate_for_loan(loan, rate_override, None, CalculationType::Simple, today(time))?;
        log_calculation(&result);
        Ok(result)
    }

    pub fn analyze(&self, options: &AnalysisOptions, time: &SafeTimeProvider) -> Result<PortfolioAnalytics> {
        debug!(analysis_type = ?options.analysis_type, loans = self.loans().len(), "portfolio analysis");
        aggregate_with_bands(self.loans(), options, &self.config.risk, today(time))
    }

    pub fn total_loan_amount(&self) -> Result<Money> {
        Money::checked_sum(self.loans().iter().map(|l| l.loan_amount))
    }

    pub fn borrower_summary(&self) -> Vec<BorrowerSummary> {
        self.loans().iter().map(BorrowerSummary::from).collect()
    }

    /// validate and append a new loan. the id is derived from the current
    /// collection size.
    pub fn create_loan(&mut self, input: NewLoan, time: &SafeTimeProvider) -> Result<Loan> {
        let id = LoanId::sequential(self.loans().len());
        let loan = input.into_loan(id, today(time)).map_err(rejected)?;
        self.repository.append(loan.clone())?;
        info!(id = %loan.id, borrower = %loan.borrower, amount = %loan.loan_amount, "loan created");
        Ok(loan)
    }

    pub fn update_loan(&mut self, id: &LoanId, patch: LoanPatch) -> Result<Loan> {
        let existing = self.find_loan(id)?;
        let updated = patch.apply(existing).map_err(rejected)?;
        self.repository.update(updated.clone())?;
        info!(id = %updated.id, status = %updated.status, "loan updated");
        Ok(updated)
    }

    /// change only the status; the value is checked before the loan is looked up
    pub fn update_status(&mut self, id: &LoanId, status: &str) -> Result<Loan> {
        if status.is_empty() {
            return Err(rejected(PortfolioError::validation("status is required")));
        }
        let status: LoanStatus = status.parse().map_err(rejected)?;

        let mut loan = self.find_loan(id)?.clone();
        let previous = loan.status;
        loan.status = status;
        self.repository.update(loan.clone())?;
        info!(id = %loan.id, from = %previous, to = %status, "loan status changed");
        Ok(loan)
    }

    pub fn remove_loan(&mut self, id: &LoanId) -> Result<Loan> {
        let removed = self.repository.remove(id)?;
        info!(id = %removed.id, borrower = %removed.borrower, "loan removed");
        Ok(removed)
    }
}

fn today(time: &SafeTimeProvider) -> NaiveDate {
    time.now().date_naive()
}

fn rejected(err: PortfolioError) -> PortfolioError {
    warn!(error = %err, "loan rejected");
    err
}

fn log_calculation(result: &InterestCalculation) {
    if result.days_elapsed < 0 {
        warn!(
            start = %result.start_date,
            end = %result.end_date,
            days = result.days_elapsed,
            "end date precedes start date, accrued interest is negative"
        );
    }
    debug!(
        days = result.days_elapsed,
        interest = %result.accrued_interest,
        calculation_type = ?result.calculation_type,
        "interest calculated"
    );
}
