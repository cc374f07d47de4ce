//! Errors raised while parsing or evaluating dice expressions.
//!
//! These are configuration-time failures: expressions come from catalog data,
//! so callers validate them once at load time and treat a failure as a bad
//! catalog rather than a gameplay condition.

use thiserror::Error;

/// Structural problems found while restructuring tokens into prefix order
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Malformed {
    #[error("empty expression")]
    EmptyExpression,

    #[error("unmatched '(' at position {position}")]
    UnmatchedLeftParen { position: usize },

    #[error("unmatched ')' at position {position}")]
    UnmatchedRightParen { position: usize },

    #[error("empty parentheses at position {position}")]
    EmptyGroup { position: usize },

    #[error("operator at position {position} has no left operand")]
    MissingLeftOperand { position: usize },

    #[error("operator at position {position} has no right operand")]
    MissingRightOperand { position: usize },

    #[error("operand at position {position} is not joined by an operator")]
    MissingOperator { position: usize },

    #[error("evaluation left {remaining} values on the stack")]
    DanglingOperands { remaining: usize },
}

/// Error type for the dice expression engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    #[error("Parse error at position {position}: unexpected '{fragment}'")]
    Parse { position: usize, fragment: String },

    #[error("Malformed expression: {0}")]
    Malformed(#[from] Malformed),

    #[error("Division by zero at position {position}")]
    DivisionByZero { position: usize },

    #[error("No finite result for the operator at position {position}")]
    NonFinite { position: usize },

    #[error("Dice term at position {position} rolls {count} dice, the limit is {limit}")]
    TooManyDice {
        position: usize,
        count: u32,
        limit: u32,
    },

    #[error("Unknown evaluation mode: {0}")]
    UnknownEvaluationMode(String),
}

impl ExprError {
    pub(crate) fn parse(fragment: impl Into<String>, position: usize) -> Self {
        ExprError::Parse {
            position,
            fragment: fragment.into(),
        }
    }
}
