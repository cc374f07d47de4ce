//! Dice-formula expression engine
//!
//! Damage and armor values are small arithmetic formulas over integers and
//! `NdM` dice terms. A formula is tokenized, restructured into prefix order
//! (parentheses are the only grouping, there is no precedence) and then
//! evaluated under one of four [`EvaluationMode`]s.

pub mod error;
pub mod eval;
pub mod expression;
pub mod prefix;
pub mod token;

pub use error::{ExprError, Malformed};
pub use eval::{evaluate, DamageObject, DieRoll, EvaluationMode};
pub use expression::DamageExpression;
pub use prefix::to_prefix;
pub use token::{tokenize, Token, TokenKind, MAX_DICE_PER_TERM};
