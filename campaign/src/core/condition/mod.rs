//! Display conditions: boolean expressions over earlier prompt responses.
//!
//! A condition decides whether a prompt is shown. Grammar:
//!
//! ```text
//! expr   := term ( "or" term )*
//! term   := factor ( "and" factor )*
//! factor := "(" expr ")" | clause
//! clause := ID OP LITERAL
//! ```
//!
//! `and` binds tighter than `or`; parentheses override.

mod eval;
mod parser;

pub use eval::{ResponseContext, evaluate};

use crate::core::error::ConditionError;
use crate::core::types::NoResponse;

/// Comparison operator inside a condition clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Op {
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Eq => "==",
            Op::Ne => "!=",
            Op::Lt => "<",
            Op::Gt => ">",
            Op::Le => "<=",
            Op::Ge => ">=",
        }
    }

    /// True for `==` / `!=`, the only operators legal against sentinels.
    pub fn is_equality(self) -> bool {
        matches!(self, Op::Eq | Op::Ne)
    }
}

/// Right-hand side of a clause, classified at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Number(i64),
    Sentinel(NoResponse),
    /// Anything else (e.g. a timestamp); interpreted by the referenced prompt.
    Text(String),
}

/// One `{prompt_id} {op} {literal}` comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionPair {
    pub prompt_id: String,
    pub op: Op,
    pub literal: Literal,
}

/// Parsed condition expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Clause(ConditionPair),
    And(Vec<Condition>),
    Or(Vec<Condition>),
}

impl Condition {
    /// Parse a condition string. Parsing is pure and deterministic.
    pub fn parse(input: &str) -> Result<Condition, ConditionError> {
        parser::parse(input)
    }

    /// All clauses, left to right.
    pub fn clauses(&self) -> Vec<&ConditionPair> {
        let mut out = Vec::new();
        self.collect_clauses(&mut out);
        out
    }

    fn collect_clauses<'a>(&'a self, out: &mut Vec<&'a ConditionPair>) {
        match self {
            Condition::Clause(pair) => out.push(pair),
            Condition::And(parts) | Condition::Or(parts) => {
                for part in parts {
                    part.collect_clauses(out);
                }
            }
        }
    }
}
