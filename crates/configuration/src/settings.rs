use crate::error::ConfigError;
use analytics::RankingLimits;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSettings,
    pub analysis: AnalysisSettings,
    pub logging: LoggingSettings,
}

impl Config {
    /// Checks cross-field rules that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.source == DataSourceKind::Csv {
            if self.data.prices_csv.is_none() {
                return Err(ConfigError::ValidationError(
                    "data.prices_csv is required when data.source = \"csv\"".to_string(),
                ));
            }
            if self.data.sectors_csv.is_none() {
                return Err(ConfigError::ValidationError(
                    "data.sectors_csv is required when data.source = \"csv\"".to_string(),
                ));
            }
        }

        self.analysis
            .ranking_limits()
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::ValidationError("logging.level must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Where the price and sector snapshots come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum DataSourceKind {
    /// Two CSV exports with a header row.
    #[default]
    Csv,
    /// The `stock_data` and `sector_data` tables; `DATABASE_URL` comes from the environment.
    Database,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub source: DataSourceKind,
    pub prices_csv: Option<PathBuf>,
    pub sectors_csv: Option<PathBuf>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            source: DataSourceKind::Csv,
            prices_csv: Some(PathBuf::from("data/stock_data.csv")),
            sectors_csv: Some(PathBuf::from("data/sector_data.csv")),
        }
    }
}

/// Sizes of the ranked views.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub volatility_top_n: usize,
    pub cumulative_top_n: usize,
    pub movers_per_side: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        let limits = RankingLimits::default();
        Self {
            volatility_top_n: limits.volatility_top_n,
            cumulative_top_n: limits.cumulative_top_n,
            movers_per_side: limits.movers_per_side,
        }
    }
}

impl AnalysisSettings {
    pub fn ranking_limits(&self) -> RankingLimits {
        RankingLimits {
            volatility_top_n: self.volatility_top_n,
            cumulative_top_n: self.cumulative_top_n,
            movers_per_side: self.movers_per_side,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Directory for the daily rolling log file. No file is written when absent.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: Some(PathBuf::from("logs")),
            file_prefix: "stock-insights.log".to_string(),
        }
    }
}
