//! Dependency extraction from token sequences.
//!
//! A formula depends on every cell named by one of its `CellRef` tokens.
//! The list feeds [`super::detect_cycle`]; evaluation itself never needs it.

use super::cell_ref::CellRef;
use super::token::Token;

/// Cells referenced by a formula, in first-appearance order, without repeats.
pub fn extract_dependencies(tokens: &[Token]) -> Vec<CellRef> {
    let mut deps: Vec<CellRef> = Vec::new();
    for token in tokens {
        if let Token::CellRef(id) = token
            && let Some(cell) = CellRef::parse(id)
            && !deps.contains(&cell)
        {
            deps.push(cell);
        }
    }
    deps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tokenize;

    #[test]
    fn test_extract_dependencies_empty() {
        assert!(extract_dependencies(&tokenize("")).is_empty());
        assert!(extract_dependencies(&tokenize("10 + 20")).is_empty());
    }

    #[test]
    fn test_extract_dependencies_dedups_in_order() {
        let deps = extract_dependencies(&tokenize("B2 + A1 * B2 + sum(C3; A1)"));
        assert_eq!(
            deps,
            vec![CellRef::new(1, 1), CellRef::new(0, 0), CellRef::new(2, 2)]
        );
    }
}
