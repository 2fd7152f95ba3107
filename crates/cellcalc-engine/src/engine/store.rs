//! The cell store: the only mutable state in the engine.
//!
//! Every cell holds exactly one of empty, number, text or formula. Writes
//! replace the whole entry and need `&mut self`; reads and evaluation only
//! need `&self`, so a host sharing the store across threads puts it behind an
//! `RwLock` and every evaluation sees one consistent snapshot.
//!
//! Resolution policy for a referenced cell:
//! - number: its value (a non-finite value reads as `0`);
//! - formula: the value of its tokens, evaluated recursively;
//! - empty, text, or never set: `0`.
//!
//! Recursive resolution threads a [`ResolveStack`], so a formula that reaches
//! itself again yields [`EngineError::CircularReference`] instead of
//! recursing forever. Acyclic sheets evaluate exactly as without the guard.

use std::collections::HashMap;

use super::cell::{Cell, CellType, Formula, Grid};
use super::cell_ref::CellRef;
use super::cycle::ResolveStack;
use super::eval::{CellResolver, evaluate, evaluate_formula};
use super::token::Token;
use crate::builtins::coerce_finite;
use crate::error::{EngineError, Result};

/// Receives the refreshed value of each formula cell during a recalculation.
pub trait RecalcObserver {
    fn cell_recalculated(&mut self, cell_ref: &CellRef, value: &Result<f64>);
}

impl<F> RecalcObserver for F
where
    F: FnMut(&CellRef, &Result<f64>),
{
    fn cell_recalculated(&mut self, cell_ref: &CellRef, value: &Result<f64>) {
        self(cell_ref, value)
    }
}

#[derive(Debug, Default)]
pub struct CellStore {
    grid: Grid,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_grid(grid: Grid) -> Self {
        CellStore { grid }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Replace the entry at `cell_ref`.
    pub fn set_cell(&mut self, cell_ref: CellRef, cell: Cell) {
        self.grid.insert(cell_ref, cell);
    }

    pub fn set_number(&mut self, cell_ref: CellRef, value: f64) {
        self.set_cell(cell_ref, Cell::new_number(value));
    }

    pub fn set_string(&mut self, cell_ref: CellRef, text: &str) {
        self.set_cell(cell_ref, Cell::new_text(text));
    }

    /// Store formula text. A leading `=` is accepted and dropped.
    pub fn set_formula(&mut self, cell_ref: CellRef, source: &str) {
        let source = source.strip_prefix('=').unwrap_or(source);
        self.set_cell(cell_ref, Cell::new_formula(source));
    }

    /// Store an already tokenized formula, e.g. one restored from disk.
    pub fn set_formula_tokens(&mut self, cell_ref: CellRef, tokens: Vec<Token>) {
        self.set_cell(cell_ref, Cell::from_formula(Formula::from_tokens(tokens)));
    }

    /// Reset a cell to empty. The entry itself stays in the store.
    pub fn clear(&mut self, cell_ref: CellRef) {
        self.set_cell(cell_ref, Cell::new_empty());
    }

    pub fn get(&self, cell_ref: &CellRef) -> Option<Cell> {
        self.grid.get(cell_ref).map(|c| c.clone())
    }

    /// Current content of a cell; never-set cells are empty.
    pub fn inspect(&self, cell_ref: &CellRef) -> CellType {
        self.grid
            .get(cell_ref)
            .map(|c| c.contents.clone())
            .unwrap_or(CellType::Empty)
    }

    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// All entries, sorted by row then column.
    pub fn cells(&self) -> Vec<(CellRef, Cell)> {
        let mut cells: Vec<_> = self
            .grid
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        cells.sort_by(|a, b| a.0.cmp(&b.0));
        cells
    }

    /// Numeric value of a cell under the resolution policy.
    pub fn resolve_numeric(&self, cell_ref: &CellRef) -> Result<f64> {
        Resolution::new(self).resolve_cell(cell_ref)
    }

    /// Evaluate formula text against the current cells.
    pub fn evaluate(&self, formula: &str) -> Result<f64> {
        evaluate_formula(formula, &mut Resolution::new(self))
    }

    pub fn evaluate_tokens(&self, tokens: &[Token]) -> Result<f64> {
        evaluate(tokens, &mut Resolution::new(self))
    }

    /// Re-evaluate every formula cell, reporting each to `observer` in row
    /// then column order. Values are memoized for the duration of the pass.
    /// Returns the number of formula cells visited.
    pub fn recalculate_all(&self, observer: &mut impl RecalcObserver) -> usize {
        let mut formula_cells: Vec<CellRef> = self
            .grid
            .iter()
            .filter(|entry| entry.value().is_formula())
            .map(|entry| entry.key().clone())
            .collect();
        formula_cells.sort();

        let mut resolution = Resolution::with_memo(self);
        for cell_ref in &formula_cells {
            let value = resolution.resolve_cell(cell_ref);
            log::trace!("recalculated {}: {:?}", cell_ref, value);
            observer.cell_recalculated(cell_ref, &value);
        }
        formula_cells.len()
    }
}

/// One logical resolution over a store: the cycle guard plus an optional
/// memo of values already computed in this pass.
struct Resolution<'a> {
    store: &'a CellStore,
    stack: ResolveStack,
    memo: Option<HashMap<CellRef, f64>>,
}

impl<'a> Resolution<'a> {
    fn new(store: &'a CellStore) -> Self {
        Resolution {
            store,
            stack: ResolveStack::new(),
            memo: None,
        }
    }

    fn with_memo(store: &'a CellStore) -> Self {
        Resolution {
            memo: Some(HashMap::new()),
            ..Self::new(store)
        }
    }

    fn resolve_cell(&mut self, cell_ref: &CellRef) -> Result<f64> {
        if let Some(value) = self.memo.as_ref().and_then(|m| m.get(cell_ref)) {
            return Ok(*value);
        }

        // Copy the tokens out so no map guard is held while recursing.
        let tokens = match self.store.grid.get(cell_ref) {
            None => return Ok(0.0),
            Some(cell) => match &cell.contents {
                CellType::Number(n) => return Ok(coerce_finite(*n)),
                CellType::Empty | CellType::Text(_) => return Ok(0.0),
                CellType::Formula(f) => f.tokens.clone(),
            },
        };

        self.stack.enter(cell_ref)?;
        let result = evaluate(&tokens, self);
        self.stack.leave(cell_ref);

        if let (Ok(value), Some(memo)) = (&result, self.memo.as_mut()) {
            memo.insert(cell_ref.clone(), *value);
        }
        result
    }
}

impl CellResolver for Resolution<'_> {
    fn resolve(&mut self, id: &str) -> Result<f64> {
        match CellRef::parse(id) {
            Some(cell_ref) => self.resolve_cell(&cell_ref),
            None => {
                log::debug!("{}", EngineError::InvalidCellRef(id.to_string()));
                Ok(0.0)
            }
        }
    }
}
