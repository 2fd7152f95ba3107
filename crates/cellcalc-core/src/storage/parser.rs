//! Reader for the `.grd` text format.
//!
//! One `CELLREF: VALUE` entry per line. `#` starts a comment line. Values are
//! `=formula`, `"quoted text"` (with `\"` and `\\` escapes) or a number; an
//! empty value is an empty cell.

use crate::error::{CoreError, Result};
use cellcalc_engine::engine::{Cell, CellRef, Grid};
use std::fs;
use std::path::Path;

type LineResult<T> = std::result::Result<T, String>;

pub fn parse_grd(path: &Path) -> Result<Grid> {
    parse_grd_content(&fs::read_to_string(path)?)
}

/// Parse `.grd` text. Errors report the 1-based line they occurred on.
pub fn parse_grd_content(content: &str) -> Result<Grid> {
    let grid = Grid::new();
    for (idx, raw) in content.lines().enumerate() {
        let entry = parse_line(raw.trim()).map_err(|message| CoreError::Parse {
            line: idx + 1,
            message,
        })?;
        if let Some((cell_ref, cell)) = entry {
            grid.insert(cell_ref, cell);
        }
    }
    Ok(grid)
}

fn parse_line(line: &str) -> LineResult<Option<(CellRef, Cell)>> {
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (id, value) = line
        .split_once(':')
        .ok_or("Expected 'CELLREF: VALUE' format")?;

    // Ids are case-insensitive on disk.
    let id = id.trim().to_ascii_uppercase();
    let cell_ref = CellRef::parse(&id).ok_or_else(|| format!("Invalid cell reference: {}", id))?;
    Ok(Some((cell_ref, parse_value(value.trim())?)))
}

fn parse_value(value: &str) -> LineResult<Cell> {
    if value.is_empty() {
        return Ok(Cell::new_empty());
    }
    if let Some(formula) = value.strip_prefix('=') {
        return Ok(Cell::new_formula(formula));
    }
    if let Some(quoted) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        return Ok(Cell::new_text(&unquote(quoted)));
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Cell::new_number(n)),
        _ => Err(format!("Invalid value: {}. Use quotes for text.", value)),
    }
}

/// Undo the writer's escaping. Unknown escapes are kept literally.
fn unquote(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some(c @ ('\\' | '"')) => out.push(c),
            Some(c) => {
                out.push('\\');
                out.push(c);
            }
            None => out.push('\\'),
        }
    }
    out
}
