//! Error types for Cellcalc core.

use cellcalc_engine::EngineError;
use cellcalc_engine::engine::CellRef;
use thiserror::Error;

/// Errors that can occur while editing, loading or saving a document.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Circular dependency detected: {}", format_path(.0))]
    CircularDependency(Vec<CellRef>),

    #[error("No file path set")]
    NoFilePath,

    #[error("Formula error: {0}")]
    Engine(#[from] EngineError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn format_path(path: &[CellRef]) -> String {
    path.iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, CoreError>;
