use crate::error::{EngineError, Result};

/// Format an evaluation result for display.
pub fn format_result(value: &Result<f64>) -> String {
    match value {
        Ok(n) => format_number(*n),
        Err(EngineError::CircularReference { .. }) => "#CYCLE!".to_string(),
        Err(_) => "#ERR!".to_string(),
    }
}

/// Format a number for display.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e10 {
        format!("{:.0}", n)
    } else {
        format!("{:.2}", n)
    }
}
