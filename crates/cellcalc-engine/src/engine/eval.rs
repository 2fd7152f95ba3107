//! Operator-precedence evaluation of token sequences.
//!
//! The evaluator keeps an operand stack of numbers and a stack of pending
//! entries (operators, open brackets and open function calls). Each open
//! call carries the arguments collected so far, so `sum(1; 2; 3)` collects
//! `[1, 2, 3]` before the closing bracket invokes the reducer.
//!
//! Reduction is strictly left to right: an incoming operator first applies
//! every pending operator of greater or equal precedence. That makes `^`
//! left-associative as well, so `2^3^2` is `(2^3)^2 = 64`.
//!
//! Non-finite results (division by zero, domain errors) are replaced by `0`
//! at every reduction step. Only structurally broken input is an error.

use super::lexer::tokenize;
use super::token::Token;
use crate::builtins::{FUNCTION_PRECEDENCE, Function, Operator};
use crate::error::{EngineError, Result};

/// Supplies numeric values for cell references met during evaluation.
pub trait CellResolver {
    fn resolve(&mut self, id: &str) -> Result<f64>;
}

/// Resolver for evaluation without a sheet: every reference is blank (0).
#[derive(Debug, Default, Clone, Copy)]
pub struct BlankCells;

impl CellResolver for BlankCells {
    fn resolve(&mut self, _id: &str) -> Result<f64> {
        Ok(0.0)
    }
}

/// Tokenize and evaluate formula text. A leading `=` is ignored.
pub fn evaluate_formula(formula: &str, resolver: &mut dyn CellResolver) -> Result<f64> {
    let formula = formula.trim_start();
    let formula = formula.strip_prefix('=').unwrap_or(formula);
    evaluate(&tokenize(formula), resolver)
}

/// Evaluate a token sequence to a single number.
pub fn evaluate(tokens: &[Token], resolver: &mut dyn CellResolver) -> Result<f64> {
    let mut machine = Machine::default();

    for token in tokens {
        match token {
            Token::Number(n) => machine.operands.push(*n),
            // Text used as a number is blank.
            Token::Text(_) => machine.operands.push(0.0),
            Token::CellRef(id) => {
                let value = resolver.resolve(id)?;
                machine.operands.push(value);
            }
            Token::Function(func) => machine.pending.push(Pending::Call {
                func: *func,
                args: Vec::new(),
            }),
            Token::ArgSeparator => machine.separate()?,
            Token::Operator(op) => {
                machine.reduce(op.precedence())?;
                machine.pending.push(Pending::Operator(*op));
            }
            Token::LeftBracket => {
                let base = machine.operands.len();
                machine.pending.push(Pending::Bracket { base });
            }
            Token::RightBracket => machine.close()?,
        }
    }

    machine.finish()
}

enum Pending {
    Operator(Operator),
    Call { func: Function, args: Vec<f64> },
    /// `base` is the operand stack depth when the bracket opened.
    Bracket { base: usize },
}

impl Pending {
    fn precedence(&self) -> u8 {
        match self {
            Pending::Operator(op) => op.precedence(),
            Pending::Call { .. } => FUNCTION_PRECEDENCE,
            Pending::Bracket { .. } => 0,
        }
    }
}

#[derive(Default)]
struct Machine {
    operands: Vec<f64>,
    pending: Vec<Pending>,
}

impl Machine {
    /// Apply pending operators while the top ranks at least `min`.
    fn reduce(&mut self, min: u8) -> Result<()> {
        while self.pending.last().is_some_and(|top| top.precedence() >= min) {
            match self.pending.pop() {
                Some(Pending::Operator(op)) => {
                    let right = self.pop_operand(op)?;
                    let left = self.pop_operand(op)?;
                    self.operands.push(op.apply(left, right));
                }
                Some(Pending::Call { func, .. }) => {
                    return Err(EngineError::malformed(format!(
                        "function {} is not followed by '('",
                        func
                    )));
                }
                Some(Pending::Bracket { .. }) => {
                    return Err(EngineError::malformed("unclosed '('"));
                }
                None => break,
            }
        }
        Ok(())
    }

    /// Operand depth of the innermost open bracket (0 at top level).
    fn floor(&self) -> usize {
        self.pending
            .iter()
            .rev()
            .find_map(|p| match p {
                Pending::Bracket { base } => Some(*base),
                _ => None,
            })
            .unwrap_or(0)
    }

    fn pop_operand(&mut self, op: Operator) -> Result<f64> {
        if self.operands.len() <= self.floor() {
            return Err(EngineError::malformed(format!(
                "operator {} is missing an operand",
                op
            )));
        }
        self.operands
            .pop()
            .ok_or_else(|| EngineError::malformed(format!("operator {} is missing an operand", op)))
    }

    /// Number of operands produced since the bracket at `base` opened.
    fn produced_since(&self, base: usize) -> usize {
        self.operands.len().saturating_sub(base)
    }

    /// `;` finishes one argument of the innermost open call.
    fn separate(&mut self) -> Result<()> {
        self.reduce(1)?;

        let len = self.pending.len();
        let base = match self.pending.last() {
            Some(Pending::Bracket { base }) if len >= 2 => *base,
            _ => return Err(EngineError::malformed("';' outside of a function call")),
        };
        if !matches!(self.pending[len - 2], Pending::Call { .. }) {
            return Err(EngineError::malformed("';' outside of a function call"));
        }

        let value = match self.produced_since(base) {
            1 => self.operands.pop(),
            0 => None,
            _ => return Err(EngineError::malformed("missing operator in function argument")),
        }
        .ok_or_else(|| EngineError::malformed("empty function argument"))?;

        if let Pending::Call { args, .. } = &mut self.pending[len - 2] {
            args.push(value);
        }
        Ok(())
    }

    /// `)` closes a bracket and, when it belongs to a call, invokes it.
    fn close(&mut self) -> Result<()> {
        self.reduce(1)?;

        let base = match self.pending.pop() {
            Some(Pending::Bracket { base }) => base,
            _ => return Err(EngineError::malformed("unmatched ')'")),
        };
        let produced = self.produced_since(base);
        if produced > 1 {
            return Err(EngineError::malformed("missing operator inside brackets"));
        }

        if matches!(self.pending.last(), Some(Pending::Call { .. })) {
            if let Some(Pending::Call { func, mut args }) = self.pending.pop() {
                if produced == 1
                    && let Some(last) = self.operands.pop()
                {
                    args.push(last);
                }
                self.operands.push(func.apply(&args));
            }
        } else if produced == 0 {
            return Err(EngineError::malformed("empty brackets"));
        }
        Ok(())
    }

    fn finish(mut self) -> Result<f64> {
        self.reduce(0)?;
        match self.operands.as_slice() {
            [value] => Ok(*value),
            [] => Err(EngineError::malformed("empty formula")),
            _ => Err(EngineError::malformed("missing operator between operands")),
        }
    }
}
