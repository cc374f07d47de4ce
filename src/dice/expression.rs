//! Validated, pre-compiled damage expressions

use std::fmt;
use std::str::FromStr;

use rand::rngs::mock::StepRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::ExprError;
use super::eval::{evaluate, DamageObject, EvaluationMode};
use super::prefix::to_prefix;
use super::token::{tokenize, Token, TokenKind};

/// A dice formula such as `"2d6+3"`, parsed once and evaluated many times
///
/// Deserializing goes through [`DamageExpression::parse`], so a catalog that
/// loads successfully only holds well-formed expressions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DamageExpression {
    source: String,
    prefix: Vec<Token>,
}

impl DamageExpression {
    pub fn parse(source: &str) -> Result<Self, ExprError> {
        let tokens = tokenize(source)?;
        let prefix = to_prefix(&tokens)?;
        Ok(Self {
            source: source.to_string(),
            prefix,
        })
    }

    /// A constant expression
    pub fn flat(value: i64) -> Self {
        let source = value.to_string();
        let prefix = vec![Token::new(TokenKind::Integer, source.clone(), 0)];
        Self { source, prefix }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn prefix(&self) -> &[Token] {
        &self.prefix
    }

    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        mode: EvaluationMode,
        rng: &mut R,
    ) -> Result<DamageObject, ExprError> {
        evaluate(&self.prefix, &self.source, mode, rng)
    }

    /// `count` simultaneous copies of this expression, summed
    ///
    /// Each copy is parenthesized so the grouping of the original survives:
    /// `"1d6"` three times becomes `"(1d6)+(1d6)+(1d6)"`.
    pub fn volley(&self, count: usize) -> Result<Self, ExprError> {
        let copy = format!("({})", self.source);
        let combined = vec![copy; count.max(1)].join("+");
        Self::parse(&combined)
    }

    /// Evaluate under the deterministic modes so division by a zero bound
    /// surfaces at load time rather than mid-fight
    pub fn validate(&self) -> Result<(), ExprError> {
        // Never consulted outside random mode.
        let mut rng = StepRng::new(0, 1);
        for mode in [
            EvaluationMode::Minimum,
            EvaluationMode::Expected,
            EvaluationMode::Maximum,
        ] {
            self.evaluate(mode, &mut rng)?;
        }
        Ok(())
    }
}

impl fmt::Display for DamageExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for DamageExpression {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DamageExpression {
    type Error = ExprError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DamageExpression> for String {
    fn from(expression: DamageExpression) -> Self {
        expression.source
    }
}
