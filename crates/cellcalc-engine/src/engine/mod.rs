//! Formula engine API.
//!
//! This module provides the core computation engine for the spreadsheet:
//!
//! - [`Token`], [`tokenize`] - Lexing formula text into tokens
//! - [`evaluate`], [`CellResolver`] - Operator-precedence evaluation
//! - [`Cell`], [`CellType`], [`Grid`], [`CellStore`] - Cell storage and resolution
//! - [`CellRef`] - Cell identifiers (A1 notation <-> row/col indices)
//! - [`ResolveStack`], [`detect_cycle`] - Circular reference handling
//! - [`format_number`], [`format_result`] - Format values for display

mod cell;
mod cell_ref;
mod cycle;
mod deps;
mod eval;
mod format;
mod lexer;
mod store;
mod token;

pub use cell::{Cell, CellType, Formula, Grid};
pub use cell_ref::{CellRef, column_letter, column_number};
pub use cycle::{ResolveStack, detect_cycle};
pub use deps::extract_dependencies;
pub use eval::{BlankCells, CellResolver, evaluate, evaluate_formula};
pub use format::{format_number, format_result};
pub use lexer::{tokenize, tokenize_strict};
pub use store::{CellStore, RecalcObserver};
pub use token::{Token, TokenKind, tokens_to_source};
