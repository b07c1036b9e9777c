pub mod analytics;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod interest;
pub mod portfolio;
pub mod query;
pub mod repository;
pub mod tools;
pub mod types;

// re-export key types
pub use analytics::{
    aggregate, aggregate_with_bands, AnalysisOptions, AnalysisType, Breakdown, BucketTotals,
    GroupBy, Insights, LtvRanges, PortfolioAnalytics, RiskProfile,
};
pub use config::{PortfolioConfig, QueryDefaults, RiskBands, StorageConfig};
pub use decimal::{Money, Rate};
pub use errors::{PortfolioError, Result};
pub use interest::{
    calculate, calculate_request, AccrualEngine, CalculationType, CompoundingEngine,
    InterestCalculation, InterestCalculator, InterestRequest,
};
pub use portfolio::LoanPortfolio;
pub use query::{query, query_with_defaults, LoanQuery, QueryResult, SortField, SortOrder};
pub use repository::{InMemoryLoanRepository, JsonFileLoanRepository, LoanRepository};
pub use tools::{dispatch, execute, ToolCall};
pub use types::{BorrowerSummary, Loan, LoanBuilder, LoanId, LoanPatch, LoanStatus, NewLoan};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
