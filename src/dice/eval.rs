//! Prefix evaluation under the four evaluation modes
//!
//! Every atom carries a value and a `[min, max]` envelope. The envelope is
//! propagated through every operator regardless of mode, so one code path
//! serves random rolls, guaranteed bounds and expectations alike.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::{ExprError, Malformed};
use super::token::{Token, TokenKind};

/// How dice terms resolve during evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Roll every die with the injected random source
    Random,
    /// Lowest value the expression can take
    Minimum,
    /// Statistical expectation, `N*(M+1)/2` per dice term
    Expected,
    /// Highest value the expression can take
    Maximum,
}

impl EvaluationMode {
    pub const ALL: [EvaluationMode; 4] = [
        EvaluationMode::Random,
        EvaluationMode::Minimum,
        EvaluationMode::Expected,
        EvaluationMode::Maximum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationMode::Random => "random",
            EvaluationMode::Minimum => "minimum",
            EvaluationMode::Expected => "expected",
            EvaluationMode::Maximum => "maximum",
        }
    }
}

impl fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvaluationMode {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" | "roll" => Ok(EvaluationMode::Random),
            "minimum" | "min" => Ok(EvaluationMode::Minimum),
            "expected" | "avg" | "average" => Ok(EvaluationMode::Expected),
            "maximum" | "max" => Ok(EvaluationMode::Maximum),
            _ => Err(ExprError::UnknownEvaluationMode(s.to_string())),
        }
    }
}

/// One physical die rolled under [`EvaluationMode::Random`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieRoll {
    pub faces_per_die: u32,
    pub rolled_value: u32,
}

/// Result of evaluating one expression once under one mode
///
/// `rolls` is always present and only non-empty for random evaluation of an
/// expression containing dice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageObject {
    pub source_expression: String,
    pub damage: f64,
    pub rolls: Vec<DieRoll>,
    /// Lowest value the expression could have produced
    pub minimum: f64,
    /// Highest value the expression could have produced
    pub maximum: f64,
}

impl DamageObject {
    /// A fixed amount with no rolls behind it
    pub fn flat(source_expression: impl Into<String>, damage: f64) -> Self {
        Self {
            source_expression: source_expression.into(),
            damage,
            rolls: Vec::new(),
            minimum: damage,
            maximum: damage,
        }
    }

    pub fn zero() -> Self {
        Self::flat(String::new(), 0.0)
    }
}

/// Value plus envelope of a partially evaluated subexpression
#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    value: f64,
    min: f64,
    max: f64,
}

impl Span {
    fn exact(value: f64) -> Self {
        Self {
            value,
            min: value,
            max: value,
        }
    }
}

/// Evaluate prefix tokens produced by [`to_prefix`](super::prefix::to_prefix)
///
/// `source` is only carried into the result. `rng` is consulted for
/// [`EvaluationMode::Random`] alone.
pub fn evaluate<R: Rng + ?Sized>(
    prefix: &[Token],
    source: &str,
    mode: EvaluationMode,
    rng: &mut R,
) -> Result<DamageObject, ExprError> {
    let mut values: Vec<f64> = Vec::with_capacity(prefix.len());
    let mut mins: Vec<f64> = Vec::with_capacity(prefix.len());
    let mut maxs: Vec<f64> = Vec::with_capacity(prefix.len());
    let mut rolls: VecDeque<DieRoll> = VecDeque::new();

    for token in prefix.iter().rev() {
        let span = match token.kind {
            TokenKind::Integer => Span::exact(token.integer_value()? as f64),
            TokenKind::Dice => {
                let (count, faces) = token.dice_terms()?;
                let term_rolls = roll_dice(count, faces, mode, rng);
                let span = dice_span(count, faces, mode, &term_rolls);
                // Walking backwards, so earlier terms land in front.
                for roll in term_rolls.into_iter().rev() {
                    rolls.push_front(roll);
                }
                span
            }
            kind if kind.is_operator() => {
                let underflow = || {
                    ExprError::from(Malformed::MissingRightOperand {
                        position: token.position,
                    })
                };
                let left = Span {
                    value: values.pop().ok_or_else(underflow)?,
                    min: mins.pop().ok_or_else(underflow)?,
                    max: maxs.pop().ok_or_else(underflow)?,
                };
                let right = Span {
                    value: values.pop().ok_or_else(underflow)?,
                    min: mins.pop().ok_or_else(underflow)?,
                    max: maxs.pop().ok_or_else(underflow)?,
                };
                combine(kind, left, right, token.position)?
            }
            TokenKind::RightParen => {
                return Err(Malformed::UnmatchedRightParen {
                    position: token.position,
                }
                .into())
            }
            _ => {
                return Err(Malformed::UnmatchedLeftParen {
                    position: token.position,
                }
                .into())
            }
        };
        values.push(span.value);
        mins.push(span.min);
        maxs.push(span.max);
    }

    if values.len() != 1 {
        if values.is_empty() {
            return Err(Malformed::EmptyExpression.into());
        }
        return Err(Malformed::DanglingOperands {
            remaining: values.len(),
        }
        .into());
    }

    let (value, min, max) = (values[0], mins[0], maxs[0]);
    let damage = match mode {
        EvaluationMode::Minimum => min,
        EvaluationMode::Maximum => max,
        EvaluationMode::Random | EvaluationMode::Expected => value,
    };

    tracing::trace!("evaluated '{}' as {} under {} mode", source, damage, mode);

    Ok(DamageObject {
        source_expression: source.to_string(),
        damage,
        rolls: rolls.into(),
        minimum: min,
        maximum: max,
    })
}

fn roll_dice<R: Rng + ?Sized>(
    count: u32,
    faces: u32,
    mode: EvaluationMode,
    rng: &mut R,
) -> Vec<DieRoll> {
    if mode != EvaluationMode::Random {
        return Vec::new();
    }
    (0..count)
        .map(|_| DieRoll {
            faces_per_die: faces,
            rolled_value: rng.gen_range(1..=faces),
        })
        .collect()
}

fn dice_span(count: u32, faces: u32, mode: EvaluationMode, rolls: &[DieRoll]) -> Span {
    let count = f64::from(count);
    let faces = f64::from(faces);
    let min = count;
    let max = count * faces;
    let value = match mode {
        EvaluationMode::Random => rolls.iter().map(|r| f64::from(r.rolled_value)).sum(),
        EvaluationMode::Expected => count * (faces + 1.0) / 2.0,
        EvaluationMode::Minimum => min,
        EvaluationMode::Maximum => max,
    };
    Span { value, min, max }
}

fn combine(op: TokenKind, left: Span, right: Span, position: usize) -> Result<Span, ExprError> {
    let span = match op {
        TokenKind::Plus => Span {
            value: left.value + right.value,
            min: left.min + right.min,
            max: left.max + right.max,
        },
        // The smallest difference pairs the smallest left with the largest right.
        TokenKind::Minus => Span {
            value: left.value - right.value,
            min: left.min - right.max,
            max: left.max - right.min,
        },
        TokenKind::Times => corners(left, right, |a, b| a * b),
        TokenKind::Divide => {
            // Any divisor range that reaches zero can roll it.
            if right.value == 0.0 || (right.min <= 0.0 && right.max >= 0.0) {
                return Err(ExprError::DivisionByZero { position });
            }
            corners(left, right, |a, b| a / b)
        }
        TokenKind::Exponent => power(left, right, position)?,
        _ => unreachable!("combine is only called with binary operators"),
    };
    if !(span.value.is_finite() && span.min.is_finite() && span.max.is_finite()) {
        return Err(ExprError::NonFinite { position });
    }
    Ok(span)
}

/// Applies `op` to all four bound combinations, since either range may be
/// negative or straddle zero
fn corners(left: Span, right: Span, op: impl Fn(f64, f64) -> f64) -> Span {
    let candidates = [
        op(left.min, right.min),
        op(left.min, right.max),
        op(left.max, right.min),
        op(left.max, right.max),
    ];
    Span {
        value: op(left.value, right.value),
        min: bound(&candidates, f64::min),
        max: bound(&candidates, f64::max),
    }
}

/// Folds with `pick`, except that a single NaN candidate makes the bound NaN
fn bound(candidates: &[f64], pick: fn(f64, f64) -> f64) -> f64 {
    candidates
        .iter()
        .copied()
        .reduce(|acc, x| if acc.is_nan() || x.is_nan() { f64::NAN } else { pick(acc, x) })
        .unwrap_or(f64::NAN)
}

/// Bounds of `left ^ right`
///
/// A base that can go negative only has a real power for a fixed integer
/// exponent. With a fixed exponent the extremes sit at the base's bounds or,
/// when the base range crosses zero, at zero itself.
fn power(left: Span, right: Span, position: usize) -> Result<Span, ExprError> {
    let fixed_integer = right.min == right.max && right.min.fract() == 0.0;
    if left.min < 0.0 && !fixed_integer {
        return Err(ExprError::NonFinite { position });
    }
    let mut span = corners(left, right, f64::powf);
    if left.min < 0.0 && left.max > 0.0 {
        let at_zero = 0f64.powf(right.min);
        span.min = bound(&[span.min, at_zero], f64::min);
        span.max = bound(&[span.max, at_zero], f64::max);
    }
    Ok(span)
}
