use std::path::PathBuf;

use thiserror::Error;

use crate::types::LoanId;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("loan not found: {id}")]
    NotFound {
        id: LoanId,
    },

    #[error("invalid parameters: {message}")]
    InvalidParameters {
        message: String,
    },

    #[error("validation failed: {message}")]
    Validation {
        message: String,
    },

    #[error("calculation error: {message}")]
    Calculation {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("storage error at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PortfolioError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        PortfolioError::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_parameters(message: impl Into<String>) -> Self {
        PortfolioError::InvalidParameters {
            message: message.into(),
        }
    }

    /// short user-facing text, as returned in tool error payloads
    pub fn public_message(&self) -> String {
        match self {
            PortfolioError::NotFound { .. } => "Loan not found".to_string(),
            PortfolioError::InvalidParameters { message }
            | PortfolioError::Validation { message }
            | PortfolioError::Calculation { message }
            | PortfolioError::InvalidConfiguration { message } => message.clone(),
            PortfolioError::Storage { .. } => "Failed to save loan".to_string(),
            PortfolioError::Serialization(e) => e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
