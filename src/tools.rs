use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::analytics::AnalysisOptions;
use crate::errors::{PortfolioError, Result};
use crate::interest::InterestRequest;
use crate::portfolio::LoanPortfolio;
use crate::query::LoanQuery;
use crate::repository::LoanRepository;

/// a named tool invocation, as `{"name": ..., "arguments": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "camelCase")]
pub enum ToolCall {
    GetLoanDetails(LoanQuery),
    CalculateInterest(InterestRequest),
    AnalyzePortfolio(AnalysisOptions),
}

impl ToolCall {
    /// decode from a tool name and its raw arguments; null arguments are
    /// treated as an empty object
    pub fn decode(name: &str, arguments: Value) -> Result<Self> {
        let arguments = match arguments {
            Value::Null => json!({}),
            other => other,
        };
        let call = match name {
            "getLoanDetails" => ToolCall::GetLoanDetails(serde_json::from_value(arguments)?),
            "calculateInterest" => ToolCall::CalculateInterest(serde_json::from_value(arguments)?),
            "analyzePortfolio" => ToolCall::AnalyzePortfolio(serde_json::from_value(arguments)?),
            other => return Err(PortfolioError::invalid_parameters(format!("Unknown tool: {}", other))),
        };
        Ok(call)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::GetLoanDetails(_) => "getLoanDetails",
            ToolCall::CalculateInterest(_) => "calculateInterest",
            ToolCall::AnalyzePortfolio(_) => "analyzePortfolio",
        }
    }
}

/// run a tool call against the portfolio. failures come back as
/// `{"error": message}` rather than as `Err`.
pub fn execute<R: LoanRepository>(portfolio: &LoanPortfolio<R>, call: &ToolCall, time: &SafeTimeProvider) -> Value {
    debug!(tool = call.name(), "executing tool call");
    match call {
        ToolCall::GetLoanDetails(criteria) => respond(Ok(portfolio.find_loans(criteria))),
        ToolCall::CalculateInterest(request) => respond(portfolio.calculate_interest(request, time)),
        ToolCall::AnalyzePortfolio(options) => respond(portfolio.analyze(options, time)),
    }
}

/// decode and run in one step
pub fn dispatch<R: LoanRepository>(
    portfolio: &LoanPortfolio<R>,
    name: &str,
    arguments: Value,
    time: &SafeTimeProvider,
) -> Value {
    match ToolCall::decode(name, arguments) {
        Ok(call) => execute(portfolio, &call, time),
        Err(err) => error_payload(&err),
    }
}

fn respond<T: Serialize>(result: Result<T>) -> Value {
    match result.and_then(|value| serde_json::to_value(value).map_err(PortfolioError::from)) {
        Ok(value) => value,
        Err(err) => error_payload(&err),
    }
}

fn error_payload(err: &PortfolioError) -> Value {
    warn!(error = %err, "tool call failed");
    json!({ "error": err.public_message() })
}
