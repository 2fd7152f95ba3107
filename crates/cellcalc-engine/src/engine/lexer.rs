//! Formula lexer.
//!
//! Turns formula text (without the leading `=`) into a flat token sequence:
//!
//! 1. whitespace is removed;
//! 2. a comma between two digits becomes a decimal point (`1,5` -> `1.5`);
//! 3. a `-` at the start, after `(` or after `;` gets an explicit `0` in front,
//!    since the grammar only knows binary minus;
//! 4. the text is split around every separator in `+-*/^();`;
//! 5. each fragment is classified: operator, bracket, argument separator,
//!    function name (any case), number prefix, cell reference prefix.
//!
//! Fragments that match none of these are dropped by [`tokenize`] and
//! rejected by [`tokenize_strict`].

use regex::Regex;
use std::sync::OnceLock;

use super::token::Token;
use crate::builtins::{Function, Operator};
use crate::error::{EngineError, Result};

const SEPARATORS: &[char] = &['+', '-', '*', '/', '^', '(', ')', ';'];

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+(\.[0-9]*)?").expect("number regex must compile"))
}

fn cell_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]+[1-9][0-9]*").expect("cell reference regex must compile"))
}

/// Tokenize a formula, silently dropping fragments that are not recognized.
pub fn tokenize(formula: &str) -> Vec<Token> {
    fragments(formula)
        .into_iter()
        .filter_map(|fragment| {
            let token = classify(&fragment);
            if token.is_none() {
                log::debug!("dropping unrecognized formula fragment {:?}", fragment);
            }
            token
        })
        .collect()
}

/// Tokenize a formula, failing on the first fragment that is not recognized.
pub fn tokenize_strict(formula: &str) -> Result<Vec<Token>> {
    fragments(formula)
        .into_iter()
        .map(|fragment| classify(&fragment).ok_or(EngineError::UnknownToken(fragment)))
        .collect()
}

/// Steps 1-4: normalize the text and split it into raw fragments.
fn fragments(formula: &str) -> Vec<String> {
    let normalized = normalize(formula);

    let mut out = Vec::new();
    let mut current = String::new();
    for c in normalized.chars() {
        if SEPARATORS.contains(&c) {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            out.push(c.to_string());
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn normalize(formula: &str) -> String {
    let chars: Vec<char> = formula.chars().filter(|c| !c.is_whitespace()).collect();
    let mut out = String::with_capacity(chars.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();
        match c {
            ',' if prev.is_some_and(|p| p.is_ascii_digit())
                && next.is_some_and(|n| n.is_ascii_digit()) =>
            {
                out.push('.');
            }
            '-' if matches!(prev, None | Some('(') | Some(';')) => {
                out.push('0');
                out.push('-');
            }
            _ => out.push(c),
        }
    }
    out
}

/// Classify one fragment, in priority order.
fn classify(fragment: &str) -> Option<Token> {
    if let Some(op) = Operator::from_symbol(fragment) {
        return Some(Token::Operator(op));
    }
    match fragment {
        "(" => return Some(Token::LeftBracket),
        ")" => return Some(Token::RightBracket),
        ";" => return Some(Token::ArgSeparator),
        _ => {}
    }
    if let Some(func) = Function::from_name(fragment) {
        return Some(Token::Function(func));
    }
    if let Some(m) = number_re().find(fragment) {
        return m.as_str().parse::<f64>().ok().map(Token::Number);
    }
    if let Some(m) = cell_ref_re().find(fragment) {
        return Some(Token::CellRef(m.as_str().to_string()));
    }
    None
}
