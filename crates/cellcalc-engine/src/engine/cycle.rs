//! Circular reference handling for formula cells.
//!
//! Two tools live here:
//!
//! - [`ResolveStack`] tracks the cells currently being resolved. Resolution
//!   pushes a cell before evaluating its formula and pops it afterwards, so
//!   re-entering a cell that is still on the stack is a cycle. This turns
//!   what would otherwise be unbounded recursion into
//!   [`EngineError::CircularReference`].
//! - [`detect_cycle`] walks the static `depends_on` lists with a depth-first
//!   search so a host can refuse a cyclic edit before it is stored.

use std::collections::HashSet;

use super::{CellRef, Grid};
use crate::error::{EngineError, Result};

/// Cells on the current resolution path, outermost first.
#[derive(Debug, Default)]
pub struct ResolveStack {
    path: Vec<CellRef>,
    on_path: HashSet<CellRef>,
}

impl ResolveStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `cell` as being resolved.
    ///
    /// Fails with the full cycle (ending in `cell` again) if it already is.
    pub fn enter(&mut self, cell: &CellRef) -> Result<()> {
        if let Some(path) = self.cycle_at(cell) {
            log::warn!(
                "circular reference while resolving {}: {}",
                cell,
                path.iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(" -> ")
            );
            return Err(EngineError::CircularReference { path });
        }
        self.push(cell);
        Ok(())
    }

    /// The cycle closed by visiting `cell` now, if it is already on the path.
    fn cycle_at(&self, cell: &CellRef) -> Option<Vec<CellRef>> {
        if !self.on_path.contains(cell) {
            return None;
        }
        let start = self.path.iter().position(|c| c == cell).unwrap_or(0);
        let mut path = self.path[start..].to_vec();
        path.push(cell.clone());
        Some(path)
    }

    fn push(&mut self, cell: &CellRef) {
        self.on_path.insert(cell.clone());
        self.path.push(cell.clone());
    }

    /// Pop `cell` after its formula has been evaluated.
    pub fn leave(&mut self, cell: &CellRef) {
        if self.path.last() == Some(cell) {
            self.path.pop();
            self.on_path.remove(cell);
        }
    }
}

/// Search the static dependency graph for a cycle through `start`.
///
/// Returns the cycle path (beginning and ending with `start`) or `None`.
/// Cycles reachable from `start` that do not pass through it are not
/// reported: an edit to `start` neither created nor can break them.
pub fn detect_cycle(start: &CellRef, grid: &Grid) -> Option<Vec<CellRef>> {
    let mut cleared = HashSet::new();
    walk(start, start, grid, &mut ResolveStack::new(), &mut cleared)
}

fn walk(
    current: &CellRef,
    start: &CellRef,
    grid: &Grid,
    stack: &mut ResolveStack,
    cleared: &mut HashSet<CellRef>,
) -> Option<Vec<CellRef>> {
    if current == start && stack.on_path.contains(start) {
        return stack.cycle_at(current);
    }
    if stack.on_path.contains(current) || cleared.contains(current) {
        return None;
    }
    // Never-set cells have no dependencies.
    let deps = grid.get(current)?.depends_on.clone();

    stack.push(current);
    let found = deps
        .iter()
        .find_map(|dep| walk(dep, start, grid, stack, cleared));
    stack.leave(current);
    if found.is_none() {
        cleared.insert(current.clone());
    }
    found
}
