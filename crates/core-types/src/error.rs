use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("The {table} table is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("Invalid value in {table}.{column} at row {row}: {reason}")]
    InvalidCell {
        table: String,
        column: String,
        row: usize,
        reason: String,
    },

    #[error("Column {table}.{column} cannot be read as text: {reason}")]
    UnreadableColumn {
        table: String,
        column: String,
        reason: String,
    },
}
