//! Lexical tokens produced by the lexer and consumed by the evaluator.
//!
//! Operators and functions carry only their identity; precedence and the
//! reducer are looked up in the static tables in [`crate::builtins`].
//!
//! On the wire a token is `{"kind": ..., "value": ...}`. Reducers and
//! precedence are never written; loading looks the symbol or name up again.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::builtins::{Function, Operator};
use crate::error::EngineError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "RawToken", try_from = "RawToken")]
pub enum Token {
    Number(f64),
    CellRef(String),
    Operator(Operator),
    Function(Function),
    LeftBracket,
    RightBracket,
    ArgSeparator,
    Text(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Number,
    CellRef,
    Operator,
    Function,
    LeftBracket,
    RightBracket,
    ArgSeparator,
    Text,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Number(_) => TokenKind::Number,
            Token::CellRef(_) => TokenKind::CellRef,
            Token::Operator(_) => TokenKind::Operator,
            Token::Function(_) => TokenKind::Function,
            Token::LeftBracket => TokenKind::LeftBracket,
            Token::RightBracket => TokenKind::RightBracket,
            Token::ArgSeparator => TokenKind::ArgSeparator,
            Token::Text(_) => TokenKind::Text,
        }
    }

    /// Evaluation rank; present only for operators and functions.
    pub fn precedence(&self) -> Option<u8> {
        match self {
            Token::Operator(op) => Some(op.precedence()),
            Token::Function(func) => Some(func.precedence()),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::CellRef(id) => f.write_str(id),
            Token::Operator(op) => write!(f, "{}", op),
            Token::Function(func) => write!(f, "{}", func),
            Token::LeftBracket => f.write_str("("),
            Token::RightBracket => f.write_str(")"),
            Token::ArgSeparator => f.write_str(";"),
            Token::Text(s) => f.write_str(s),
        }
    }
}

/// Render a token sequence back to formula text (without a leading `=`).
pub fn tokens_to_source(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.to_string()).collect()
}

#[derive(Serialize, Deserialize)]
struct RawToken {
    kind: TokenKind,
    #[serde(default)]
    value: Option<RawValue>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
}

impl From<Token> for RawToken {
    fn from(token: Token) -> Self {
        let kind = token.kind();
        let value = match token {
            Token::Number(n) => RawValue::Number(n),
            Token::CellRef(s) | Token::Text(s) => RawValue::Text(s),
            other => RawValue::Text(other.to_string()),
        };
        RawToken {
            kind,
            value: Some(value),
        }
    }
}

impl TryFrom<RawToken> for Token {
    type Error = EngineError;

    fn try_from(raw: RawToken) -> Result<Self, Self::Error> {
        let kind = raw.kind;
        let text = |value: Option<RawValue>| match value {
            Some(RawValue::Text(s)) => Ok(s),
            Some(RawValue::Number(n)) => Ok(n.to_string()),
            None => Err(EngineError::InvalidToken(format!(
                "{:?} token without a value",
                kind
            ))),
        };

        match kind {
            TokenKind::Number => match raw.value {
                Some(RawValue::Number(n)) => Ok(Token::Number(n)),
                Some(RawValue::Text(s)) => s
                    .parse::<f64>()
                    .map(Token::Number)
                    .map_err(|_| EngineError::InvalidToken(format!("not a number: {}", s))),
                None => Err(EngineError::InvalidToken("number without a value".into())),
            },
            TokenKind::CellRef => Ok(Token::CellRef(text(raw.value)?)),
            TokenKind::Text => Ok(Token::Text(text(raw.value)?)),
            TokenKind::Operator => {
                let symbol = text(raw.value)?;
                Operator::from_symbol(&symbol)
                    .map(Token::Operator)
                    .ok_or_else(|| EngineError::InvalidToken(format!("unknown operator: {}", symbol)))
            }
            TokenKind::Function => {
                let name = text(raw.value)?;
                Function::from_name(&name)
                    .map(Token::Function)
                    .ok_or_else(|| EngineError::InvalidToken(format!("unknown function: {}", name)))
            }
            TokenKind::LeftBracket => Ok(Token::LeftBracket),
            TokenKind::RightBracket => Ok(Token::RightBracket),
            TokenKind::ArgSeparator => Ok(Token::ArgSeparator),
        }
    }
}
