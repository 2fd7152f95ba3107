//! JSON snapshot format.
//!
//! Unlike `.grd`, a snapshot stores each formula's token sequence next to
//! its source text. Tokens are written as `{"kind", "value"}` pairs and
//! restored through the operator/function tables, never by re-lexing.

use crate::error::Result;
use cellcalc_engine::engine::{Cell, CellRef, CellStore, CellType, Formula, Grid, Token};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub cells: Vec<SnapshotCell>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotCell {
    pub cell: CellRef,
    pub entry: SnapshotEntry,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SnapshotEntry {
    Number { value: f64 },
    Text { value: String },
    Formula { source: String, tokens: Vec<Token> },
}

impl Snapshot {
    /// Capture every non-empty cell, sorted by row then column.
    pub fn capture(store: &CellStore) -> Snapshot {
        let cells = store
            .cells()
            .into_iter()
            .filter_map(|(cell, contents)| {
                let entry = match contents.contents {
                    CellType::Empty => return None,
                    CellType::Number(value) => SnapshotEntry::Number { value },
                    CellType::Text(value) => SnapshotEntry::Text { value },
                    CellType::Formula(f) => SnapshotEntry::Formula {
                        source: f.source,
                        tokens: f.tokens,
                    },
                };
                Some(SnapshotCell { cell, entry })
            })
            .collect();
        Snapshot { cells }
    }

    pub fn into_grid(self) -> Grid {
        let grid = Grid::new();
        for SnapshotCell { cell, entry } in self.cells {
            let contents = match entry {
                SnapshotEntry::Number { value } => Cell::new_number(value),
                SnapshotEntry::Text { value } => Cell::new_text(&value),
                SnapshotEntry::Formula { source, tokens } => {
                    Cell::from_formula(Formula { source, tokens })
                }
            };
            grid.insert(cell, contents);
        }
        grid
    }
}

/// Parse a JSON snapshot file and return a Grid
pub fn parse_json(path: &Path) -> Result<Grid> {
    let content = fs::read_to_string(path)?;
    parse_json_content(&content)
}

pub fn parse_json_content(content: &str) -> Result<Grid> {
    let snapshot: Snapshot = serde_json::from_str(content)?;
    Ok(snapshot.into_grid())
}

/// Write the store to a JSON snapshot file
pub fn write_json(path: &Path, store: &CellStore) -> Result<()> {
    fs::write(path, write_json_content(store)?)?;
    Ok(())
}

pub fn write_json_content(store: &CellStore) -> Result<String> {
    Ok(serde_json::to_string_pretty(&Snapshot::capture(store))? + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(id: &str) -> CellRef {
        CellRef::parse(id).unwrap()
    }

    #[test]
    fn test_formula_tokens_are_serialized_as_kind_and_value() {
        let mut store = CellStore::new();
        store.set_formula(cell("A1"), "2*B1");
        let json = write_json_content(&store).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["cells"][0]["cell"], "A1");
        let entry = &value["cells"][0]["entry"];
        assert_eq!(entry["type"], "formula");
        assert_eq!(entry["source"], "2*B1");
        assert_eq!(
            entry["tokens"],
            serde_json::json!([
                {"kind": "Number", "value": 2.0},
                {"kind": "Operator", "value": "*"},
                {"kind": "CellRef", "value": "B1"},
            ])
        );
    }

    #[test]
    fn test_snapshot_reload_evaluates_identically() {
        let mut store = CellStore::new();
        store.set_number(cell("A1"), 3.0);
        store.set_string(cell("A2"), "note");
        store.set_formula(cell("B1"), "=max(A1 * 2; 5) - (-1)");
        store.set_formula(cell("B2"), "=if(A2; 1; round(A1 / 7; 3))");

        let json = write_json_content(&store).unwrap();
        let reloaded = CellStore::from_grid(parse_json_content(&json).unwrap());

        for id in ["A1", "A2", "B1", "B2"] {
            assert_eq!(
                reloaded.resolve_numeric(&cell(id)).unwrap(),
                store.resolve_numeric(&cell(id)).unwrap(),
                "{}",
                id
            );
            assert_eq!(reloaded.inspect(&cell(id)), store.inspect(&cell(id)));
        }
    }

    #[test]
    fn test_typed_non_finite_values_survive_reload() {
        let mut store = CellStore::new();
        store.set_cell(cell("A1"), Cell::from_input("inf"));
        store.set_cell(cell("A2"), Cell::from_input("nan"));
        store.set_formula(cell("B1"), "A1+1");

        let json = write_json_content(&store).unwrap();
        let reloaded = CellStore::from_grid(parse_json_content(&json).unwrap());
        assert_eq!(reloaded.inspect(&cell("A1")), CellType::Text("inf".into()));
        assert_eq!(reloaded.inspect(&cell("A2")), CellType::Text("nan".into()));
        assert_eq!(reloaded.resolve_numeric(&cell("B1")).unwrap(), 1.0);
    }

    #[test]
    fn test_unknown_function_in_snapshot_is_an_error() {
        let json = r#"{"cells":[{"cell":"A1","entry":{"type":"formula","source":"x",
            "tokens":[{"kind":"Function","value":"median"}]}}]}"#;
        assert!(parse_json_content(json).is_err());
    }
}
