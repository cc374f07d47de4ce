//! Infix to prefix conversion
//!
//! There is no operator precedence in the dice grammar. Operators group
//! strictly left to right and only parentheses change that, so `2+3*4`
//! becomes `* + 2 3 4` and evaluates to 20.

use super::error::{ExprError, Malformed};
use super::token::{Token, TokenKind};

/// Restructure infix tokens into prefix order
///
/// The result is meant to be consumed from the back: walking it in reverse,
/// atoms push onto a stack and each operator combines the top two entries.
pub fn to_prefix(tokens: &[Token]) -> Result<Vec<Token>, ExprError> {
    if tokens.is_empty() {
        return Err(Malformed::EmptyExpression.into());
    }

    let mut builder = PrefixBuilder::default();
    let mut index = 0;

    while index < tokens.len() {
        let token = &tokens[index];
        match token.kind {
            TokenKind::LeftParen => {
                let close = matching_paren(tokens, index)?;
                let inner = &tokens[index + 1..close];
                if inner.is_empty() {
                    return Err(Malformed::EmptyGroup {
                        position: token.position,
                    }
                    .into());
                }
                builder.push_operand(to_prefix(inner)?, token.position)?;
                index = close + 1;
            }
            TokenKind::RightParen => {
                return Err(Malformed::UnmatchedRightParen {
                    position: token.position,
                }
                .into());
            }
            kind if kind.is_operator() => {
                builder.push_operator(token.clone())?;
                index += 1;
            }
            _ => {
                builder.push_operand(vec![token.clone()], token.position)?;
                index += 1;
            }
        }
    }

    builder.finish()
}

/// Index of the `)` closing the `(` at `open`
fn matching_paren(tokens: &[Token], open: usize) -> Result<usize, ExprError> {
    let mut depth = 0usize;
    for (offset, token) in tokens[open..].iter().enumerate() {
        match token.kind {
            TokenKind::LeftParen => depth += 1,
            TokenKind::RightParen => {
                depth -= 1;
                if depth == 0 {
                    return Ok(open + offset);
                }
            }
            _ => {}
        }
    }
    Err(Malformed::UnmatchedLeftParen {
        position: tokens[open].position,
    }
    .into())
}

#[derive(Default)]
struct PrefixBuilder {
    output: Vec<Token>,
    /// Where the most recently completed left operand begins in `output`
    operand_start: Option<usize>,
    /// Operator still waiting for its right operand
    pending: Option<usize>,
}

impl PrefixBuilder {
    fn push_operator(&mut self, operator: Token) -> Result<(), ExprError> {
        let position = operator.position;
        let start = match (self.operand_start, self.pending) {
            (Some(start), None) => start,
            (None, _) => return Err(Malformed::MissingLeftOperand { position }.into()),
            (Some(_), Some(_)) => return Err(Malformed::MissingRightOperand { position }.into()),
        };
        self.output.insert(start, operator);
        self.pending = Some(position);
        Ok(())
    }

    fn push_operand(&mut self, operand: Vec<Token>, position: usize) -> Result<(), ExprError> {
        match (self.operand_start, self.pending.take()) {
            (None, _) => self.operand_start = Some(self.output.len()),
            // Completes the pending operator; the combined operand still
            // starts where that operator was inserted.
            (Some(_), Some(_)) => {}
            (Some(_), None) => return Err(Malformed::MissingOperator { position }.into()),
        }
        self.output.extend(operand);
        Ok(())
    }

    fn finish(self) -> Result<Vec<Token>, ExprError> {
        if let Some(position) = self.pending {
            return Err(Malformed::MissingRightOperand { position }.into());
        }
        Ok(self.output)
    }
}
