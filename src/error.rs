//! Error types for the spreadsheet

use thiserror::Error;

/// Result type alias using [`SpreadsheetError`]
pub type Result<T> = std::result::Result<T, SpreadsheetError>;

/// Errors reported by cell reads and writes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpreadsheetError {
    /// Malformed or empty cell identifier
    #[error("invalid cell id: '{0}'")]
    InvalidCellId(String),

    /// Formula that does not evaluate as arithmetic
    #[error("invalid arithmetic expression: {0}")]
    InvalidArithmeticExpression(String),

    /// Literal that is not a non-negative decimal numeral
    #[error("invalid number: '{0}'")]
    InvalidNumber(String),
}

impl SpreadsheetError {
    pub(crate) fn arithmetic<S: Into<String>>(msg: S) -> Self {
        SpreadsheetError::InvalidArithmeticExpression(msg.into())
    }
}
