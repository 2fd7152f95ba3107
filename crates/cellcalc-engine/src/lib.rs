//! cellcalc_engine - Spreadsheet formula engine.

pub mod builtins;
pub mod engine;
pub mod error;

pub use error::{EngineError, Result};

#[cfg(test)]
mod tests {
    use crate::engine::*;

    fn cell(id: &str) -> CellRef {
        CellRef::parse(id).unwrap()
    }

    #[test]
    fn test_parse_single_letter_columns() {
        let a1 = cell("A1");
        assert_eq!(a1.row, 0);
        assert_eq!(a1.col, 0);

        assert_eq!(cell("B1").col, 1);
        assert_eq!(cell("Z1").col, 25);
    }

    #[test]
    fn test_parse_multi_letter_columns() {
        assert_eq!(cell("AA1").col, 26);
        assert_eq!(cell("AB1").col, 27);
        assert_eq!(cell("AZ1").col, 51);
        assert_eq!(cell("BA1").col, 52);
        assert_eq!(cell("ZZ1").col, 701);
    }

    #[test]
    fn test_parse_row_numbers() {
        assert_eq!(cell("A1").row, 0);
        assert_eq!(cell("A10").row, 9);
        assert_eq!(cell("A100").row, 99);
    }

    #[test]
    fn test_parse_invalid_inputs() {
        assert!(CellRef::parse("").is_none());
        assert!(CellRef::parse("123").is_none());
        assert!(CellRef::parse("ABC").is_none());
        assert!(CellRef::parse("A0").is_none());
        assert!(CellRef::parse("A01").is_none());
        assert!(CellRef::parse("1A").is_none());
        assert!(CellRef::parse("A 1").is_none());
        assert!(CellRef::parse("a1").is_none());
    }

    #[test]
    fn test_display_round_trip() {
        for id in ["A1", "Z9", "AA10", "ZZ676", "BC23"] {
            assert_eq!(cell(id).to_string(), id);
        }
    }

    #[test]
    fn test_column_conversion_round_trips() {
        for n in 1..=676 {
            assert_eq!(column_number(&column_letter(n)), Some(n));
        }
    }

    #[test]
    fn test_evaluate_spreadsheet_properties() {
        let store = CellStore::new();
        assert_eq!(store.evaluate("2+3*4").unwrap(), 14.0);
        assert_eq!(store.evaluate("(2+3)*4").unwrap(), 20.0);
        assert_eq!(store.evaluate("2^3^2").unwrap(), 64.0);
        assert_eq!(store.evaluate("5/0").unwrap(), 0.0);
        assert_eq!(store.evaluate("sum(1;2;3)").unwrap(), 6.0);
        assert_eq!(store.evaluate("if(1;10;20)").unwrap(), 10.0);
        assert_eq!(store.evaluate("if(0;10;20)").unwrap(), 20.0);
        assert_eq!(store.evaluate("max(2*3;10;1)").unwrap(), 10.0);
        assert_eq!(store.evaluate("-5+3").unwrap(), -2.0);
        assert_eq!(store.evaluate("(-5+3)").unwrap(), -2.0);
        assert_eq!(store.evaluate("if(1;-5;0)").unwrap(), -5.0);
    }

    #[test]
    fn test_formula_chain_through_store() {
        let mut store = CellStore::new();
        store.set_number(cell("A1"), 5.0);
        store.set_formula(cell("A2"), "=A1*2");
        store.set_formula(cell("A3"), "=round(A2 / 3; 1) + sum(A1; A2)");
        assert_eq!(store.resolve_numeric(&cell("A3")).unwrap(), 3.3 + 15.0);

        store.set_number(cell("A1"), 7.0);
        assert_eq!(store.resolve_numeric(&cell("A2")).unwrap(), 14.0);
    }

    #[test]
    fn test_serialized_tokens_evaluate_identically() {
        let mut store = CellStore::new();
        store.set_number(cell("B1"), 4.0);

        for formula in [
            "2+3*4",
            "(B1 - 1,5) ^ 2",
            "max(2*3;B1;1) / round2(1/3)",
            "if(B1;-5;0)",
            "sum()",
        ] {
            let tokens = tokenize(formula);
            let json = serde_json::to_string(&tokens).unwrap();
            let restored: Vec<Token> = serde_json::from_str(&json).unwrap();
            assert_eq!(restored, tokens, "{}", formula);
            assert_eq!(
                store.evaluate_tokens(&restored).unwrap(),
                store.evaluate_tokens(&tokens).unwrap(),
                "{}",
                formula
            );
        }
    }

    #[test]
    fn test_unknown_function_names_are_dropped_by_default() {
        let store = CellStore::new();
        // Dropping `nope` leaves a dangling `+`.
        assert!(store.evaluate("1 + 2 + nope").is_err());
        assert_eq!(store.evaluate("nope(3) * 2").unwrap(), 6.0);
        assert!(tokenize_strict("nope(3) * 2").is_err());
    }
}
