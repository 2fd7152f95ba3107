//! Built-in operators and functions and their metadata.
//!
//! Conventions:
//! - Operators are single ASCII symbols and always binary.
//! - Function names are matched case-insensitively and stored lowercase.
//! - Every function ranks at [`FUNCTION_PRECEDENCE`], above every operator,
//!   so a call is fully resolved before it meets surrounding arithmetic.
//! - If you add a new built-in, add a variant to [`Operator`]/[`Function`] and
//!   a matching row to [`OPERATORS`]/[`FUNCTIONS`].

use rand::Rng;
use std::fmt;

/// Precedence shared by every function call.
pub const FUNCTION_PRECEDENCE: u8 = 4;

pub struct OperatorSpec {
    pub op: Operator,
    pub symbol: &'static str,
    pub precedence: u8,
    pub reducer: fn(f64, f64) -> f64,
    pub description: &'static str,
}

pub struct FunctionSpec {
    pub function: Function,
    pub name: &'static str,
    pub reducer: fn(&[f64]) -> f64,
    pub description: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Function {
    Random,
    Round,
    Round1,
    Round2,
    Round3,
    Round4,
    Sum,
    Min,
    Max,
    If,
}

pub const OPERATORS: &[OperatorSpec] = &[
    OperatorSpec {
        op: Operator::Add,
        symbol: "+",
        precedence: 1,
        reducer: |l, r| l + r,
        description: "Sum of two values",
    },
    OperatorSpec {
        op: Operator::Subtract,
        symbol: "-",
        precedence: 1,
        reducer: |l, r| l - r,
        description: "Difference of two values",
    },
    OperatorSpec {
        op: Operator::Multiply,
        symbol: "*",
        precedence: 2,
        reducer: |l, r| l * r,
        description: "Product of two values",
    },
    OperatorSpec {
        op: Operator::Divide,
        symbol: "/",
        precedence: 2,
        reducer: |l, r| l / r,
        description: "Quotient of two values",
    },
    OperatorSpec {
        op: Operator::Power,
        symbol: "^",
        precedence: 3,
        reducer: f64::powf,
        description: "Left value raised to the right value",
    },
];

pub const FUNCTIONS: &[FunctionSpec] = &[
    FunctionSpec {
        function: Function::Random,
        name: "random",
        reducer: random,
        description: "Uniform random number in [0, 1)",
    },
    FunctionSpec {
        function: Function::Round,
        name: "round",
        reducer: |args| round_to(arg(args, 0), arg(args, 1)),
        description: "Round to n decimal digits (default 0)",
    },
    FunctionSpec {
        function: Function::Round1,
        name: "round1",
        reducer: |args| round_to(arg(args, 0), 1.0),
        description: "Round to 1 decimal digit",
    },
    FunctionSpec {
        function: Function::Round2,
        name: "round2",
        reducer: |args| round_to(arg(args, 0), 2.0),
        description: "Round to 2 decimal digits",
    },
    FunctionSpec {
        function: Function::Round3,
        name: "round3",
        reducer: |args| round_to(arg(args, 0), 3.0),
        description: "Round to 3 decimal digits",
    },
    FunctionSpec {
        function: Function::Round4,
        name: "round4",
        reducer: |args| round_to(arg(args, 0), 4.0),
        description: "Round to 4 decimal digits",
    },
    FunctionSpec {
        function: Function::Sum,
        name: "sum",
        reducer: |args| args.iter().fold(0.0, |acc, v| acc + v),
        description: "Sum of all arguments",
    },
    FunctionSpec {
        function: Function::Min,
        name: "min",
        reducer: |args| args.iter().copied().fold(f64::INFINITY, f64::min),
        description: "Smallest argument",
    },
    FunctionSpec {
        function: Function::Max,
        name: "max",
        reducer: |args| args.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        description: "Largest argument",
    },
    FunctionSpec {
        function: Function::If,
        name: "if",
        reducer: |args| {
            if arg(args, 0) != 0.0 {
                arg(args, 1)
            } else {
                arg(args, 2)
            }
        },
        description: "Second argument when the first is non-zero, else the third (or 0)",
    },
];

/// Positional argument, or 0 when the call supplied fewer.
fn arg(args: &[f64], index: usize) -> f64 {
    args.get(index).copied().unwrap_or(0.0)
}

fn random(_args: &[f64]) -> f64 {
    rand::thread_rng().r#gen::<f64>()
}

fn round_to(value: f64, digits: f64) -> f64 {
    let factor = 10f64.powf(digits.trunc());
    (value * factor).round() / factor
}

/// Replace NaN and infinities with 0.
pub fn coerce_finite(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

impl Operator {
    pub fn spec(self) -> &'static OperatorSpec {
        // OPERATORS lists one row per variant in declaration order.
        &OPERATORS[self as usize]
    }

    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        OPERATORS.iter().find(|s| s.symbol == symbol).map(|s| s.op)
    }

    pub fn symbol(self) -> &'static str {
        self.spec().symbol
    }

    pub fn precedence(self) -> u8 {
        self.spec().precedence
    }

    /// Apply the operator, coercing a non-finite result to 0.
    pub fn apply(self, left: f64, right: f64) -> f64 {
        coerce_finite((self.spec().reducer)(left, right))
    }
}

impl Function {
    pub fn spec(self) -> &'static FunctionSpec {
        // FUNCTIONS lists one row per variant in declaration order.
        &FUNCTIONS[self as usize]
    }

    /// Look up a function by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Function> {
        FUNCTIONS
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .map(|s| s.function)
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn precedence(self) -> u8 {
        FUNCTION_PRECEDENCE
    }

    /// Invoke the function over its collected arguments, coercing a
    /// non-finite result to 0.
    pub fn apply(self, args: &[f64]) -> f64 {
        coerce_finite((self.spec().reducer)(args))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
