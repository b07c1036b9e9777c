use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::{PortfolioError, Result};
use crate::query::{SortField, SortOrder};

/// portfolio configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioConfig {
    pub storage: StorageConfig,
    pub query: QueryDefaults,
    pub risk: RiskBands,
}

/// where the loan collection lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    pub data_path: PathBuf,
}

/// defaults applied when a query leaves paging or sorting open
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryDefaults {
    pub count: usize,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

/// ltv band bounds (percent) and the high-risk share that flips the
/// portfolio risk label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskBands {
    #[serde(with = "rust_decimal::serde::float")]
    pub low_max_ltv: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub medium_max_ltv: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub high_risk_share: Decimal,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            query: QueryDefaults::default(),
            risk: RiskBands::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("loan.json"),
        }
    }
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            count: 10,
            sort_by: SortField::LoanDate,
            sort_order: SortOrder::Desc,
        }
    }
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            low_max_ltv: dec!(60),
            medium_max_ltv: dec!(75),
            high_risk_share: dec!(0.3),
        }
    }
}

impl PortfolioConfig {
    /// configuration backed by the given data file, everything else default
    pub fn with_data_path(path: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageConfig {
                data_path: path.into(),
            },
            ..Self::default()
        }
    }

    /// load from a json file; missing sections fall back to defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| PortfolioError::Storage {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PortfolioConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.query.count == 0 {
            return Err(PortfolioError::InvalidConfiguration {
                message: "query.count must be positive".to_string(),
            });
        }
        self.risk.validate()
    }
}

impl RiskBands {
    pub fn validate(&self) -> Result<()> {
        if self.low_max_ltv >= self.medium_max_ltv {
            return Err(PortfolioError::InvalidConfiguration {
                message: format!(
                    "risk.lowMaxLtv ({}) must be below risk.mediumMaxLtv ({})",
                    self.low_max_ltv, self.medium_max_ltv
                ),
            });
        }
        if self.high_risk_share < Decimal::ZERO || self.high_risk_share > Decimal::ONE {
            return Err(PortfolioError::InvalidConfiguration {
                message: format!(
                    "risk.highRiskShare ({}) must be between 0 and 1",
                    self.high_risk_share
                ),
            });
        }
        Ok(())
    }
}
