//! Error types for the formula engine.

use thiserror::Error;

use crate::engine::CellRef;

/// Errors that can surface from tokenizing or evaluating a formula.
///
/// Everyday spreadsheet mistakes (division by zero, blank or text references)
/// never reach this type: they evaluate to `0`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Circular reference: {}", format_path(.path))]
    CircularReference { path: Vec<CellRef> },

    #[error("Malformed formula: {0}")]
    Malformed(String),

    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Invalid cell reference: {0}")]
    InvalidCellRef(String),
}

impl EngineError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        EngineError::Malformed(message.into())
    }
}

fn format_path(path: &[CellRef]) -> String {
    path.iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, EngineError>;
