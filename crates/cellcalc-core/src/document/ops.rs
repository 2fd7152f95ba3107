use super::Document;
use crate::error::{CoreError, Result};
use cellcalc_engine::engine::{
    Cell, CellRef, CellType, Formula, RecalcObserver, detect_cycle, format_number, format_result,
    tokenize_strict,
};

impl Document {
    /// Build a cell from raw input, honouring strict mode for formulas.
    fn cell_from_input(&self, input: &str) -> Result<Cell> {
        let trimmed = input.trim();
        if self.strict
            && let Some(source) = trimmed.strip_prefix('=')
        {
            let tokens = tokenize_strict(source)?;
            return Ok(Cell::from_formula(Formula {
                source: source.to_string(),
                tokens,
            }));
        }
        Ok(Cell::from_input(input))
    }

    /// Set cell contents from input string.
    ///
    /// A formula that would make the cell depend on itself is rejected and
    /// the previous contents are kept.
    pub fn set_cell_from_input(&mut self, cell_ref: CellRef, input: &str) -> Result<()> {
        let cell = self.cell_from_input(input)?;

        if cell.is_formula() {
            // Temporarily insert to check for cycles
            let old_cell = self.store.get(&cell_ref);
            self.store.set_cell(cell_ref.clone(), cell);
            if let Some(path) = detect_cycle(&cell_ref, self.store.grid()) {
                // Restore old state
                match old_cell {
                    Some(c) => self.store.set_cell(cell_ref, c),
                    None => self.store.clear(cell_ref),
                }
                return Err(CoreError::CircularDependency(path));
            }
        } else {
            self.store.set_cell(cell_ref, cell);
        }

        self.modified = true;
        Ok(())
    }

    /// Clear the specified cell
    pub fn clear_cell(&mut self, cell_ref: &CellRef) {
        let had_value = self
            .store
            .get(cell_ref)
            .is_some_and(|c| !matches!(c.contents, CellType::Empty));
        if had_value {
            self.store.clear(cell_ref.clone());
            self.modified = true;
        }
    }

    /// Get the display value for a cell
    pub fn cell_display(&self, cell_ref: &CellRef) -> String {
        match self.store.inspect(cell_ref) {
            CellType::Empty => String::new(),
            CellType::Text(s) => s,
            CellType::Number(n) => format_number(n),
            CellType::Formula(_) => format_result(&self.store.resolve_numeric(cell_ref)),
        }
    }

    /// Evaluate a formula against the document without storing it.
    pub fn evaluate(&self, formula: &str) -> Result<f64> {
        let formula = formula.trim();
        let formula = formula.strip_prefix('=').unwrap_or(formula);
        if self.strict {
            let tokens = tokenize_strict(formula)?;
            return Ok(self.store.evaluate_tokens(&tokens)?);
        }
        Ok(self.store.evaluate(formula)?)
    }

    /// Recalculate every formula cell, notifying `observer` of each value.
    pub fn recalculate(&self, observer: &mut impl RecalcObserver) -> usize {
        let count = self.store.recalculate_all(observer);
        log::debug!("recalculated {} formula cells", count);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellcalc_engine::EngineError;

    fn cell(id: &str) -> CellRef {
        CellRef::parse(id).unwrap()
    }

    #[test]
    fn test_set_cell_from_input_and_display() {
        let mut doc = Document::new();
        doc.set_cell_from_input(cell("A1"), "5").unwrap();
        doc.set_cell_from_input(cell("A2"), "=A1*2").unwrap();
        doc.set_cell_from_input(cell("A3"), "\"label\"").unwrap();
        doc.set_cell_from_input(cell("A4"), "=A1/3").unwrap();

        assert!(doc.modified);
        assert_eq!(doc.cell_display(&cell("A1")), "5");
        assert_eq!(doc.cell_display(&cell("A2")), "10");
        assert_eq!(doc.cell_display(&cell("A3")), "label");
        assert_eq!(doc.cell_display(&cell("A4")), "1.67");
        assert_eq!(doc.cell_display(&cell("B9")), "");
    }

    #[test]
    fn test_cyclic_edit_is_rejected_and_previous_value_kept() {
        let mut doc = Document::new();
        doc.set_cell_from_input(cell("A1"), "=B1+1").unwrap();
        doc.set_cell_from_input(cell("B1"), "3").unwrap();

        let err = doc.set_cell_from_input(cell("B1"), "=A1").unwrap_err();
        assert!(matches!(err, CoreError::CircularDependency(_)));
        assert_eq!(doc.cell_display(&cell("B1")), "3");
        assert_eq!(doc.cell_display(&cell("A1")), "4");
    }

    #[test]
    fn test_edit_reading_an_existing_cycle_is_accepted() {
        // Sheets loaded from disk are not checked for cycles.
        let mut doc = Document::new();
        doc.store.set_formula(cell("B1"), "=C1");
        doc.store.set_formula(cell("C1"), "=B1");

        doc.set_cell_from_input(cell("A1"), "=B1+1").unwrap();
        assert_eq!(doc.cell_display(&cell("A1")), "#CYCLE!");

        // A new cycle through the edited cell is still refused.
        doc.set_cell_from_input(cell("D1"), "=E1").unwrap();
        let err = doc.set_cell_from_input(cell("E1"), "=B1+D1").unwrap_err();
        match err {
            CoreError::CircularDependency(path) => {
                assert_eq!(path, vec![cell("E1"), cell("D1"), cell("E1")]);
            }
            other => panic!("Expected circular dependency, got {:?}", other),
        }
    }

    #[test]
    fn test_self_reference_on_new_cell_leaves_it_empty() {
        let mut doc = Document::new();
        assert!(doc.set_cell_from_input(cell("C3"), "=C3").is_err());
        assert_eq!(doc.store.inspect(&cell("C3")), CellType::Empty);
    }

    #[test]
    fn test_strict_mode_rejects_unknown_names() {
        let mut doc = Document::new();
        doc.strict = true;
        let err = doc.set_cell_from_input(cell("A1"), "=avg(1;2)").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Engine(EngineError::UnknownToken(ref t)) if t == "avg"
        ));
        assert!(doc.evaluate("1+avg").is_err());
        assert_eq!(doc.evaluate("=sum(1;2)").unwrap(), 3.0);
    }

    #[test]
    fn test_clear_cell() {
        let mut doc = Document::new();
        doc.set_cell_from_input(cell("A1"), "5").unwrap();
        doc.modified = false;
        doc.clear_cell(&cell("A1"));
        assert!(doc.modified);
        assert_eq!(doc.cell_display(&cell("A1")), "");

        doc.modified = false;
        doc.clear_cell(&cell("Q7"));
        assert!(!doc.modified);
    }

    #[test]
    fn test_recalculate_notifies_each_formula() {
        let mut doc = Document::new();
        doc.set_cell_from_input(cell("A1"), "2").unwrap();
        doc.set_cell_from_input(cell("B1"), "=A1^2").unwrap();
        doc.set_cell_from_input(cell("C1"), "=B1+A1").unwrap();

        let mut shown = Vec::new();
        let count = doc.recalculate(&mut |c: &CellRef, v: &cellcalc_engine::Result<f64>| {
            shown.push(format!("{}={}", c, format_result(v)));
        });
        assert_eq!(count, 2);
        assert_eq!(shown, vec!["B1=4", "C1=6"]);
    }
}
