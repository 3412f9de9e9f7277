use crate::error::{Result, SpreadsheetError};
use crate::parser::{CellAddress, RowNumber};
use log::trace;
use std::iter::Peekable;
use std::str::Chars;

/// Read access to stored cell values during evaluation.
pub trait CellSource {
    /// Stored text of the cell, `"0"` for unset cells.
    fn cell_value(&self, address: &CellAddress) -> String;
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Cell(CellAddress),
    Plus,
    Minus,
    Star,
    Slash,
    Power,
    LeftParen,
    RightParen,
}

/// Evaluate an arithmetic formula, substituting cell references from `cells`.
///
/// Supports `+ - * /`, `**` for exponentiation, unary signs, parentheses,
/// decimal literals and single-letter cell references such as `A1`. Any
/// other identifier (`AB1`, `A10X`, `x`) makes the expression invalid, as
/// does division by zero or a non-finite result. The result is rendered with
/// the shortest decimal form that round-trips, so `5.0` prints as `5`.
pub fn evaluate<S: CellSource + ?Sized>(expression: &str, cells: &S) -> Result<String> {
    let tokens = tokenize(expression)?;
    let mut evaluator = Evaluator {
        tokens: &tokens,
        pos: 0,
        depth: 0,
        cells,
    };
    let result = checked(evaluator.evaluate_expression()?)?;
    if let Some(token) = evaluator.peek() {
        return Err(SpreadsheetError::arithmetic(format!(
            "unexpected {:?} in '{}'",
            token, expression
        )));
    }
    // -0 prints as "-0"
    let result = if result == 0.0 { 0.0 } else { result };
    trace!("evaluated '{}' -> {}", expression, result);
    Ok(result.to_string())
}

fn tokenize(expr: &str) -> Result<Vec<Token>> {
    let mut chars = expr.chars().peekable();
    let mut tokens = Vec::new();
    while let Some(&ch) = chars.peek() {
        let token = match ch {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '/' => Token::Slash,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '*' => {
                chars.next();
                if chars.peek() == Some(&'*') {
                    chars.next();
                    tokens.push(Token::Power);
                } else {
                    tokens.push(Token::Star);
                }
                continue;
            }
            c if c.is_ascii_digit() || c == '.' => {
                tokens.push(scan_number(&mut chars)?);
                continue;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                tokens.push(scan_word(&mut chars)?);
                continue;
            }
            other => {
                return Err(SpreadsheetError::arithmetic(format!(
                    "unexpected character '{}'",
                    other
                )))
            }
        };
        chars.next();
        tokens.push(token);
    }
    Ok(tokens)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn scan_number(chars: &mut Peekable<Chars>) -> Result<Token> {
    let mut literal = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() || c == '.' {
            literal.push(c);
            chars.next();
        } else {
            break;
        }
    }
    if let Some(&c) = chars.peek() {
        if is_word_char(c) {
            return Err(SpreadsheetError::arithmetic(format!(
                "malformed number '{}{}'",
                literal, c
            )));
        }
    }
    let dots = literal.matches('.').count();
    if dots > 1 || literal.len() == dots {
        return Err(SpreadsheetError::arithmetic(format!(
            "malformed number '{}'",
            literal
        )));
    }
    let value = literal
        .parse::<f64>()
        .map_err(|_| SpreadsheetError::arithmetic(format!("malformed number '{}'", literal)))?;
    checked(value).map(Token::Number)
}

/// A whole word is a cell reference only if it is one uppercase letter
/// followed by digits and nothing else.
fn scan_word(chars: &mut Peekable<Chars>) -> Result<Token> {
    let mut word = String::new();
    while let Some(&c) = chars.peek() {
        if is_word_char(c) {
            word.push(c);
            chars.next();
        } else {
            break;
        }
    }
    let mut letters = word.chars();
    let column = letters.next().filter(char::is_ascii_uppercase);
    let digits = letters.as_str();
    match column {
        Some(column) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            let row = RowNumber::from_digits(digits);
            Ok(Token::Cell(CellAddress { column, row }))
        }
        _ => Err(SpreadsheetError::arithmetic(format!(
            "unknown identifier '{}'",
            word
        ))),
    }
}

/// Deepest nesting of parentheses, signs and exponents accepted.
const MAX_DEPTH: usize = 256;

struct Evaluator<'a, S: ?Sized> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    cells: &'a S,
}

impl<S: CellSource + ?Sized> Evaluator<'_, S> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// expr := term (('+' | '-') term)*
    fn evaluate_expression(&mut self) -> Result<f64> {
        let mut result = self.evaluate_term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    result = checked(result + self.evaluate_term()?)?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    result = checked(result - self.evaluate_term()?)?;
                }
                _ => return Ok(result),
            }
        }
    }

    /// term := unary (('*' | '/') unary)*
    fn evaluate_term(&mut self) -> Result<f64> {
        let mut result = self.evaluate_unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    result = checked(result * self.evaluate_unary()?)?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let divisor = self.evaluate_unary()?;
                    if divisor == 0.0 {
                        return Err(SpreadsheetError::arithmetic("division by zero"));
                    }
                    result = checked(result / divisor)?;
                }
                _ => return Ok(result),
            }
        }
    }

    /// Every nested subexpression passes through here, so this is where
    /// recursion depth is bounded.
    fn evaluate_unary(&mut self) -> Result<f64> {
        if self.depth >= MAX_DEPTH {
            return Err(SpreadsheetError::arithmetic("expression nested too deeply"));
        }
        self.depth += 1;
        let result = self.evaluate_signed();
        self.depth -= 1;
        result
    }

    fn evaluate_signed(&mut self) -> Result<f64> {
        match self.peek() {
            Some(Token::Plus) => {
                self.pos += 1;
                self.evaluate_unary()
            }
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.evaluate_unary()?)
            }
            _ => self.evaluate_power(),
        }
    }

    /// Right associative, and tighter than a unary sign on its left.
    fn evaluate_power(&mut self) -> Result<f64> {
        let base = self.evaluate_factor()?;
        if self.peek() == Some(&Token::Power) {
            self.pos += 1;
            let exponent = self.evaluate_unary()?;
            return checked(base.powf(exponent));
        }
        Ok(base)
    }

    /// A numeric literal, a cell reference or a parenthesized expression.
    fn evaluate_factor(&mut self) -> Result<f64> {
        match self.next().cloned() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::Cell(address)) => {
                let text = self.cells.cell_value(&address);
                trace!("substituting {} = {}", address, text);
                let value = text.trim().parse::<f64>().map_err(|_| {
                    SpreadsheetError::arithmetic(format!(
                        "cell {} holds non-numeric value '{}'",
                        address, text
                    ))
                })?;
                checked(value)
            }
            Some(Token::LeftParen) => {
                let value = self.evaluate_expression()?;
                match self.next() {
                    Some(Token::RightParen) => Ok(value),
                    _ => Err(SpreadsheetError::arithmetic("missing closing parenthesis")),
                }
            }
            Some(token) => Err(SpreadsheetError::arithmetic(format!(
                "unexpected {:?}",
                token
            ))),
            None => Err(SpreadsheetError::arithmetic("unexpected end of expression")),
        }
    }
}

fn checked(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SpreadsheetError::arithmetic(format!(
            "result {} is not a finite number",
            value
        )))
    }
}
