//! Cell data structures for the spreadsheet grid.
//!
//! This module provides the core data types for representing cells:
//! - [`CellType`] - The content of a cell (empty, number, text, or formula)
//! - [`Formula`] - Formula source text plus its cached token sequence
//! - [`Cell`] - A cell with content and the cells its formula references
//! - [`Grid`] - Sparse storage for cells (backed by `DashMap`)

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use super::cell_ref::CellRef;
use super::deps::extract_dependencies;
use super::lexer::tokenize;
use super::token::{Token, tokens_to_source};

/// A formula as typed (without the leading `=`) and as tokenized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    pub source: String,
    pub tokens: Vec<Token>,
}

impl Formula {
    pub fn parse(source: &str) -> Formula {
        Formula {
            source: source.to_string(),
            tokens: tokenize(source),
        }
    }

    /// Build a formula from an already tokenized sequence.
    pub fn from_tokens(tokens: Vec<Token>) -> Formula {
        Formula {
            source: tokens_to_source(&tokens),
            tokens,
        }
    }
}

/// The content stored in a cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellType {
    Empty,
    Number(f64),
    Text(String),
    Formula(Formula),
}

/// A cell in the spreadsheet grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub contents: CellType,
    pub depends_on: Vec<CellRef>,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell {
            contents: CellType::Empty,
            depends_on: vec![],
        }
    }

    pub fn new_text(text: &str) -> Cell {
        Cell {
            contents: CellType::Text(text.to_string()),
            depends_on: vec![],
        }
    }

    pub fn new_number(n: f64) -> Cell {
        Cell {
            contents: CellType::Number(n),
            depends_on: vec![],
        }
    }

    /// Create a new cell containing a formula (text without the leading `=`).
    /// Dependencies are extracted from the tokens.
    pub fn new_formula(source: &str) -> Cell {
        Self::from_formula(Formula::parse(source))
    }

    pub fn from_formula(formula: Formula) -> Cell {
        Cell {
            depends_on: extract_dependencies(&formula.tokens),
            contents: CellType::Formula(formula),
        }
    }

    /// Parse user input and create appropriate cell type.
    /// - Empty string or whitespace -> Empty
    /// - Starts with '=' -> Formula (without the '=')
    /// - Quoted string -> Text (without quotes)
    /// - Finite number -> Number (`inf` and `nan` stay text)
    /// - Otherwise -> Text
    pub fn from_input(input: &str) -> Cell {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Cell::new_empty();
        }

        if let Some(formula) = trimmed.strip_prefix('=') {
            return Cell::new_formula(formula);
        }

        if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
            let text = &trimmed[1..trimmed.len() - 1];
            return Cell::new_text(text);
        }

        if let Ok(n) = trimmed.parse::<f64>()
            && n.is_finite()
        {
            return Cell::new_number(n);
        }

        Cell::new_text(trimmed)
    }

    /// Get a display string for the cell content (for editing).
    pub fn to_input_string(&self) -> String {
        match &self.contents {
            CellType::Empty => String::new(),
            CellType::Text(s) => s.clone(),
            CellType::Number(n) => n.to_string(),
            CellType::Formula(f) => format!("={}", f.source),
        }
    }

    pub fn is_formula(&self) -> bool {
        matches!(self.contents, CellType::Formula(_))
    }
}

/// Sparse grid storage.
pub type Grid = DashMap<CellRef, Cell>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input_classifies_raw_values() {
        assert_eq!(Cell::from_input("   ").contents, CellType::Empty);
        assert_eq!(Cell::from_input("42").contents, CellType::Number(42.0));
        assert_eq!(Cell::from_input("-1.5").contents, CellType::Number(-1.5));
        assert_eq!(
            Cell::from_input("\"42\"").contents,
            CellType::Text("42".into())
        );
        assert_eq!(
            Cell::from_input("hello").contents,
            CellType::Text("hello".into())
        );
        assert!(Cell::from_input("=A1*2").is_formula());
    }

    #[test]
    fn test_non_finite_input_is_text() {
        for raw in ["inf", "-infinity", "NaN"] {
            assert_eq!(Cell::from_input(raw).contents, CellType::Text(raw.into()));
        }
    }

    #[test]
    fn test_formula_keeps_source_verbatim() {
        let cell = Cell::from_input("= A1 * 2 ");
        match &cell.contents {
            CellType::Formula(f) => {
                assert_eq!(f.source, " A1 * 2");
                assert_eq!(f.tokens.len(), 3);
            }
            other => panic!("Expected formula, got {:?}", other),
        }
        assert_eq!(cell.depends_on, vec![CellRef::new(0, 0)]);
        assert_eq!(cell.to_input_string(), "= A1 * 2");
    }

    #[test]
    fn test_formula_from_tokens_renders_source() {
        let formula = Formula::from_tokens(tokenize("sum(A1; 2)"));
        assert_eq!(formula.source, "sum(A1;2)");
    }
}
