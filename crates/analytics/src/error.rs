use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Malformed input table: {0}")]
    MalformedInput(#[from] CoreError),

    #[error("Ranking limit '{0}' must be greater than zero")]
    InvalidLimits(String),
}
