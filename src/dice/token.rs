//! Tokenizer for damage expressions
//!
//! Whitespace is dropped before matching, so `"2 d 6"` reads the same as
//! `"2d6"`. Dice terms are tried before integers, and a `+`/`-` only becomes
//! the sign of an integer when the character before it does not end an
//! operand.

use super::error::ExprError;

/// Most dice a single `NdM` term may roll; random mode keeps one record per die
pub const MAX_DICE_PER_TERM: u32 = 1000;

/// Kinds of token in the dice grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Dice,
    Integer,
    LeftParen,
    RightParen,
    Plus,
    Minus,
    Times,
    Divide,
    Exponent,
}

impl TokenKind {
    /// True for the five binary operators
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Times
                | TokenKind::Divide
                | TokenKind::Exponent
        )
    }

    /// True for integer and dice terms
    pub fn is_atom(self) -> bool {
        matches!(self, TokenKind::Dice | TokenKind::Integer)
    }

    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '(' => Some(TokenKind::LeftParen),
            ')' => Some(TokenKind::RightParen),
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Times),
            '/' => Some(TokenKind::Divide),
            '^' => Some(TokenKind::Exponent),
            _ => None,
        }
    }
}

/// A typed slice of the source expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Byte offset of the token's first character in the original string
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Literal value of an integer token
    pub fn integer_value(&self) -> Result<i64, ExprError> {
        self.text
            .parse::<i64>()
            .map_err(|_| ExprError::parse(self.text.clone(), self.position))
    }

    /// `(count, faces)` of a dice token
    pub fn dice_terms(&self) -> Result<(u32, u32), ExprError> {
        let invalid = || ExprError::parse(self.text.clone(), self.position);
        let (count, faces) = self
            .text
            .split_once(|c: char| c.eq_ignore_ascii_case(&'d'))
            .ok_or_else(invalid)?;
        let count = count.parse::<u32>().map_err(|_| invalid())?;
        let faces = faces.parse::<u32>().map_err(|_| invalid())?;
        if count == 0 || faces == 0 {
            return Err(invalid());
        }
        if count > MAX_DICE_PER_TERM {
            return Err(ExprError::TooManyDice {
                position: self.position,
                count,
                limit: MAX_DICE_PER_TERM,
            });
        }
        Ok((count, faces))
    }
}

/// Split a damage expression into tokens
pub fn tokenize(expression: &str) -> Result<Vec<Token>, ExprError> {
    let chars: Vec<(usize, char)> = expression
        .char_indices()
        .filter(|(_, c)| !c.is_whitespace())
        .collect();

    let mut tokens = Vec::new();
    let mut cursor = 0;

    while cursor < chars.len() {
        let (position, current) = chars[cursor];
        let previous = cursor.checked_sub(1).map(|i| chars[i].1);

        let (kind, len) = if let Some(len) = match_dice(&chars[cursor..]) {
            (TokenKind::Dice, len)
        } else if let Some(len) = match_integer(&chars[cursor..], previous) {
            (TokenKind::Integer, len)
        } else if let Some(kind) = TokenKind::from_symbol(current) {
            (kind, 1)
        } else {
            return Err(ExprError::parse(current.to_string(), position));
        };

        let text: String = chars[cursor..cursor + len].iter().map(|(_, c)| c).collect();
        let token = Token::new(kind, text, position);
        if kind == TokenKind::Dice {
            token.dice_terms()?;
        } else if kind == TokenKind::Integer {
            token.integer_value()?;
        }
        tokens.push(token);
        cursor += len;
    }

    Ok(tokens)
}

fn digit_run(chars: &[(usize, char)]) -> usize {
    chars.iter().take_while(|(_, c)| c.is_ascii_digit()).count()
}

/// `digit+ ('d'|'D') digit+`
fn match_dice(chars: &[(usize, char)]) -> Option<usize> {
    let count = digit_run(chars);
    if count == 0 {
        return None;
    }
    match chars.get(count) {
        Some((_, 'd' | 'D')) => {}
        _ => return None,
    }
    let faces = digit_run(&chars[count + 1..]);
    (faces > 0).then_some(count + 1 + faces)
}

/// `['+'|'-'] digit+`, where the sign is only taken when `previous` does not
/// close an operand
fn match_integer(chars: &[(usize, char)], previous: Option<char>) -> Option<usize> {
    let signed = matches!(chars.first(), Some((_, '+' | '-')))
        && !previous.is_some_and(ends_operand);
    let offset = usize::from(signed);
    let digits = digit_run(&chars[offset..]);
    (digits > 0).then_some(offset + digits)
}

fn ends_operand(c: char) -> bool {
    c.is_ascii_digit() || c == ')'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_dice_plus_integer() {
        let tokens = tokenize("2d6+3").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Dice, "2d6", 0),
                Token::new(TokenKind::Plus, "+", 3),
                Token::new(TokenKind::Integer, "3", 4),
            ]
        );
    }

    #[test]
    fn test_minus_after_digit_is_operator() {
        let tokens = tokenize("1d6-2").unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Dice, TokenKind::Minus, TokenKind::Integer]
        );
        assert_eq!(tokens[2].text, "2");
    }

    #[test]
    fn test_leading_sign_is_part_of_integer() {
        let tokens = tokenize("-3+1d4").unwrap();
        assert_eq!(tokens[0], Token::new(TokenKind::Integer, "-3", 0));
        assert_eq!(tokens[0].integer_value().unwrap(), -3);
    }

    #[test]
    fn test_sign_after_operator_is_part_of_integer() {
        let tokens = tokenize("4*-2").unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Integer, TokenKind::Times, TokenKind::Integer]
        );
        assert_eq!(tokens[2].text, "-2");
    }

    #[test]
    fn test_minus_after_group_is_operator() {
        let tokens = tokenize("(1d6)-2").unwrap();
        assert_eq!(tokens[3].kind, TokenKind::Minus);
        assert_eq!(tokens[4].text, "2");
    }

    #[test]
    fn test_whitespace_is_insignificant() {
        let tokens = tokenize("  2 d 6 -\t1 ").unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Dice, TokenKind::Minus, TokenKind::Integer]
        );
        assert_eq!(tokens[0].text, "2d6");
        assert_eq!(tokens[0].position, 2);
    }

    #[test]
    fn test_uppercase_d() {
        let tokens = tokenize("3D8").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Dice);
        assert_eq!(tokens[0].dice_terms().unwrap(), (3, 8));
    }

    #[test]
    fn test_dice_count_is_capped() {
        assert_eq!(
            tokenize("2+4000000000d6"),
            Err(ExprError::TooManyDice {
                position: 2,
                count: 4_000_000_000,
                limit: MAX_DICE_PER_TERM,
            })
        );
        assert!(tokenize("1001d6").is_err());
        let tokens = tokenize("1000d6").unwrap();
        assert_eq!(tokens[0].dice_terms().unwrap(), (1000, 6));
    }

    #[test]
    fn test_all_operators_and_parens() {
        let tokens = tokenize("(1d2*1d3)/2^1").unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::LeftParen,
                TokenKind::Dice,
                TokenKind::Times,
                TokenKind::Dice,
                TokenKind::RightParen,
                TokenKind::Divide,
                TokenKind::Integer,
                TokenKind::Exponent,
                TokenKind::Integer,
            ]
        );
    }

    #[test]
    fn test_unknown_character_reports_position() {
        let err = tokenize("2d6 + x").unwrap_err();
        assert_eq!(
            err,
            ExprError::Parse {
                position: 6,
                fragment: "x".to_string()
            }
        );
    }

    #[test]
    fn test_dangling_d_is_rejected() {
        assert!(matches!(
            tokenize("2d"),
            Err(ExprError::Parse { position: 1, .. })
        ));
    }

    #[test]
    fn test_zero_dice_rejected() {
        assert!(matches!(tokenize("0d6"), Err(ExprError::Parse { .. })));
        assert!(matches!(tokenize("2d0"), Err(ExprError::Parse { .. })));
    }

    #[test]
    fn test_integer_overflow_rejected() {
        assert!(matches!(
            tokenize("99999999999999999999"),
            Err(ExprError::Parse { position: 0, .. })
        ));
    }
}
