//! Cell identifier parsing and formatting.
//!
//! Converts between spreadsheet-style identifiers (e.g., "A1", "B12", "AA100")
//! and zero-indexed column/row coordinates. Column letters are bijective
//! base-26: `A`..`Z` are 1..26, `AA` is 27, and there is no zero digit.
//!
//! # Examples
//!
//! ```
//! use cellcalc_engine::engine::CellRef;
//!
//! let cell = CellRef::parse("B3").unwrap();
//! assert_eq!(cell.col, 1); // 0-indexed
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// A reference to a cell by column and row indices (0-indexed).
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

fn cell_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Z]+)(?<numbers>[1-9][0-9]*)$")
            .expect("cell identifier regex must compile")
    })
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse an identifier such as "A1" or "AA10".
    ///
    /// Only uppercase letters are accepted; folding case is the caller's job.
    /// Returns None for anything else, including row 0 and coordinates that
    /// overflow `usize`.
    pub fn parse(name: &str) -> Option<CellRef> {
        let caps = cell_id_re().captures(name)?;
        let col = column_number(&caps["letters"])?.checked_sub(1)?;
        let row = caps["numbers"].parse::<usize>().ok()?.checked_sub(1)?;
        Some(CellRef::new(col, row))
    }

    /// Column letters for this reference ("A" for column 0).
    pub fn col_letters(&self) -> String {
        letters_for(self.col as u128 + 1)
    }
}

/// Convert a 1-indexed column number to letters (1 -> A, 26 -> Z, 27 -> AA).
///
/// Returns an empty string for 0, which has no letter form.
pub fn column_letter(n: usize) -> String {
    letters_for(n as u128)
}

fn letters_for(mut n: u128) -> String {
    let mut result = String::new();
    while n > 0 {
        n -= 1;
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    result
}

/// Convert column letters to a 1-indexed column number (A -> 1, AA -> 27).
///
/// Returns None for an empty string, non-uppercase input, or overflow.
pub fn column_number(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut acc = 0usize;
    for c in letters.bytes() {
        if !c.is_ascii_uppercase() {
            return None;
        }
        let digit = (c - b'A') as usize + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    Some(acc)
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl TryFrom<String> for CellRef {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellRef> for String {
    fn from(value: CellRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.col_letters(), self.row + 1)
    }
}
