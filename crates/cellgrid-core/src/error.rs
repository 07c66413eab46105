//! Mutation-time errors for Cellgrid sheets.

use thiserror::Error;

/// Errors a `Sheet` mutation can fail with. These are raised synchronously
/// from the call that triggered them and leave the sheet unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error("invalid position: ({row}, {col})")]
    InvalidPosition { row: i64, col: i64 },

    #[error("formula error: {0}")]
    FormulaException(String),

    #[error("circular dependency detected")]
    CircularDependency,
}

pub type Result<T> = std::result::Result<T, SheetError>;
