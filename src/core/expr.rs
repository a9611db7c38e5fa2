//! Arithmetic over numerals and `+ - * / ^ ( )`.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr   := term (("+" | "-") term)*
//! term   := unary (("*" | "/") unary)*
//! unary  := ("+" | "-") unary | power
//! power  := atom ("^" unary)?
//! atom   := number | "(" expr ")"
//! ```
//!
//! `^` binds tighter than unary minus and associates to the right, so
//! `-2^2` is `-4` and `2^3^2` is `512`. `**` is accepted as a spelling of `^`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("empty expression")]
    Empty,
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unexpected '{0}' at position {1}")]
    UnexpectedToken(String, usize),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("unbalanced parentheses")]
    Unbalanced,
    #[error("division by zero")]
    DivisionByZero,
    #[error("result is not a finite number")]
    NonFinite,
    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Limit on nested parentheses, signs and exponents combined.
pub const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Num(n) => n.to_string(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Star => "*".into(),
            Token::Slash => "/".into(),
            Token::Caret => "^".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, ExprError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let tok = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let n = text
                    .parse::<f64>()
                    .map_err(|_| ExprError::InvalidNumber(text.clone()))?;
                tokens.push((Token::Num(n), start));
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push((Token::Caret, i));
                i += 2;
                continue;
            }
            '*' | '×' => Token::Star,
            '/' | '÷' => Token::Slash,
            '^' => Token::Caret,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => return Err(ExprError::UnexpectedChar(other, i)),
        };
        tokens.push((tok, i));
        i += 1;
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    /// Open parentheses.
    depth: usize,
    /// Active `unary` frames; every recursive path passes through `unary`.
    nesting: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expr(&mut self) -> Result<f64, ExprError> {
        let mut acc = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.bump();
                    acc += self.term()?;
                }
                Some(Token::Minus) => {
                    self.bump();
                    acc -= self.term()?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn term(&mut self) -> Result<f64, ExprError> {
        let mut acc = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.bump();
                    acc *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.bump();
                    let rhs = self.unary()?;
                    if rhs == 0.0 {
                        return Err(ExprError::DivisionByZero);
                    }
                    acc /= rhs;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, ExprError> {
        if self.nesting >= MAX_NESTING {
            return Err(ExprError::TooDeep(MAX_NESTING));
        }
        self.nesting += 1;
        let value = self.signed();
        self.nesting -= 1;
        value
    }

    fn signed(&mut self) -> Result<f64, ExprError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.bump();
                Ok(-self.unary()?)
            }
            Some(Token::Plus) => {
                self.bump();
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, ExprError> {
        let base = self.atom()?;
        if let Some(Token::Caret) = self.peek() {
            self.bump();
            let exp = self.unary()?;
            return Ok(base.powf(exp));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<f64, ExprError> {
        let at = self.tokens.get(self.pos).map(|(_, p)| *p);
        match self.bump() {
            Some(Token::Num(n)) => Ok(n),
            Some(Token::LParen) => {
                self.depth += 1;
                let inner = self.expr()?;
                match self.bump() {
                    Some(Token::RParen) => {
                        self.depth -= 1;
                        Ok(inner)
                    }
                    _ => Err(ExprError::Unbalanced),
                }
            }
            Some(Token::RParen) => Err(ExprError::Unbalanced),
            Some(other) => Err(ExprError::UnexpectedToken(
                other.describe(),
                at.unwrap_or_default(),
            )),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}

/// Evaluates `input` to a finite number.
pub fn evaluate(input: &str) -> Result<f64, ExprError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ExprError::Empty);
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        nesting: 0,
    };
    let value = parser.expr()?;
    if let Some((tok, at)) = parser.tokens.get(parser.pos) {
        return Err(match tok {
            Token::RParen if parser.depth == 0 => ExprError::Unbalanced,
            other => ExprError::UnexpectedToken(other.describe(), *at),
        });
    }
    if !value.is_finite() {
        return Err(ExprError::NonFinite);
    }
    Ok(value)
}

/// Whole values print without a decimal point; the rest keep up to ten
/// decimals with trailing zeros trimmed.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let text = format!("{value:.10}");
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" || trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Evaluates and formats in one step.
pub fn evaluate_to_string(input: &str) -> Result<String, ExprError> {
    evaluate(input).map(format_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_follows_arithmetic() {
        assert_eq!(evaluate("12 + 7 * 3").unwrap(), 33.0);
        assert_eq!(evaluate("(12 + 7) * 3").unwrap(), 57.0);
        assert_eq!(evaluate("10 - 4 - 3").unwrap(), 3.0);
        assert_eq!(evaluate("100 / 10 / 5").unwrap(), 2.0);
    }

    #[test]
    fn power_is_right_associative_and_binds_tighter_than_negation() {
        assert_eq!(evaluate("2^3^2").unwrap(), 512.0);
        assert_eq!(evaluate("-2^2").unwrap(), -4.0);
        assert_eq!(evaluate("2^-1").unwrap(), 0.5);
        assert_eq!(evaluate("2**10").unwrap(), 1024.0);
    }

    #[test]
    fn decimals_and_unary_signs() {
        assert_eq!(evaluate("1.5 * 4").unwrap(), 6.0);
        assert_eq!(evaluate("-(3 + 2)").unwrap(), -5.0);
        assert_eq!(evaluate("+7 - -2").unwrap(), 9.0);
        assert_eq!(evaluate(".5 + .25").unwrap(), 0.75);
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert_eq!(evaluate(""), Err(ExprError::Empty));
        assert_eq!(evaluate("   "), Err(ExprError::Empty));
        assert_eq!(evaluate("1 +"), Err(ExprError::UnexpectedEnd));
        assert_eq!(evaluate("(1 + 2"), Err(ExprError::Unbalanced));
        assert_eq!(evaluate("1 + 2)"), Err(ExprError::Unbalanced));
        assert_eq!(evaluate("4 / 0"), Err(ExprError::DivisionByZero));
        assert_eq!(evaluate("1..2"), Err(ExprError::InvalidNumber("1..2".into())));
        assert!(matches!(evaluate("2 * x"), Err(ExprError::UnexpectedChar('x', 4))));
        assert!(matches!(evaluate("3 4"), Err(ExprError::UnexpectedToken(_, 2))));
    }

    #[test]
    fn code_is_not_evaluated() {
        assert!(evaluate("__import__('os')").is_err());
        assert!(evaluate("1; 2").is_err());
    }

    #[test]
    fn overflow_is_not_finite() {
        assert_eq!(evaluate("10^400"), Err(ExprError::NonFinite));
    }

    #[test]
    fn runaway_nesting_is_an_error_not_a_crash() {
        let shallow = format!("{}7{}", "(".repeat(200), ")".repeat(200));
        assert_eq!(evaluate(&shallow).unwrap(), 7.0);

        let parens = format!("{}1{}", "(".repeat(60_000), ")".repeat(60_000));
        assert_eq!(evaluate(&parens), Err(ExprError::TooDeep(MAX_NESTING)));
        let signs = format!("{}1", "-".repeat(60_000));
        assert_eq!(evaluate(&signs), Err(ExprError::TooDeep(MAX_NESTING)));
        let powers = vec!["1"; 60_000].join("^");
        assert_eq!(evaluate(&powers), Err(ExprError::TooDeep(MAX_NESTING)));
    }

    #[test]
    fn formatting_drops_needless_decimals() {
        assert_eq!(format_number(33.0), "33");
        assert_eq!(format_number(-4.0), "-4");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(1.0 / 3.0), "0.3333333333");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(evaluate_to_string("0.1 + 0.2").unwrap(), "0.3");
    }
}
