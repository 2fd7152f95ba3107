//! Writer for the `.grd` text format. See `parser` for the grammar.

use crate::error::Result;
use cellcalc_engine::engine::{CellStore, CellType};
use std::fs;
use std::path::Path;

const HEADER: &str = "# Cellcalc Spreadsheet";

pub fn write_grd(path: &Path, store: &CellStore) -> Result<()> {
    fs::write(path, write_grd_content(store))?;
    Ok(())
}

/// Render the store, one line per non-empty cell in row then column order.
pub fn write_grd_content(store: &CellStore) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for (cell_ref, cell) in store.cells() {
        if let Some(value) = render_value(&cell.contents) {
            out.push_str(&format!("{}: {}\n", cell_ref, value));
        }
    }
    out
}

fn render_value(contents: &CellType) -> Option<String> {
    match contents {
        CellType::Empty => None,
        CellType::Number(n) => Some(n.to_string()),
        CellType::Text(s) => Some(format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))),
        CellType::Formula(f) => Some(format!("={}", f.source)),
    }
}
