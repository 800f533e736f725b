//! Tokenizer and recursive-descent parser for the expression grammar.
//!
//! Grammar:
//!
//! ```text
//! expr    := operand ( "&&" operand )*
//!          | operand ( "||" operand )*
//! operand := ident
//!          | "member-of" "(" ident "," literal ")"
//!          | "equals"    "(" ident "," literal ")"
//!          | "(" expr ")"
//! literal := "'" <any chars except '> "'"
//! ident   := [A-Za-z_][A-Za-z0-9_-]*
//! ```
//!
//! A chain uses one operator kind; mixing `&&` and `||` at the same
//! level is rejected so compound conditions must be grouped explicitly
//! and operator precedence never arises.

use thiserror::Error;

use super::Expr;

/// Syntax error in an expression's source text. Callers attach the
/// surrounding context (which filter rule or prompt) before surfacing.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ParseError(String);

impl ParseError {
    fn new(message: impl Into<String>) -> Self {
        ParseError(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Literal(String),
    LParen,
    RParen,
    Comma,
    And,
    Or,
}

fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '&' => {
                chars.next();
                if chars.next_if_eq(&'&').is_none() {
                    return Err(ParseError::new("expected `&&`, found single `&`"));
                }
                tokens.push(Token::And);
            }
            '|' => {
                chars.next();
                if chars.next_if_eq(&'|').is_none() {
                    return Err(ParseError::new("expected `||`, found single `|`"));
                }
                tokens.push(Token::Or);
            }
            '\'' => {
                chars.next();
                let mut literal = String::new();
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(ch) => literal.push(ch),
                        None => return Err(ParseError::new("unterminated string literal")),
                    }
                }
                tokens.push(Token::Literal(literal));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
                        ident.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            other => {
                return Err(ParseError::new(format!("unexpected character `{}`", other)));
            }
        }
    }

    Ok(tokens)
}

/// Parse one expression; the whole input must be consumed.
pub(super) fn parse(input: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(ParseError::new("unexpected trailing input"));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<(), ParseError> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            _ => Err(ParseError::new(format!("expected {}", what))),
        }
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        let first = self.operand()?;

        let op = match self.peek() {
            Some(Token::And) => Token::And,
            Some(Token::Or) => Token::Or,
            _ => return Ok(first),
        };

        let mut parts = vec![first];
        while self.peek() == Some(&op) {
            self.next();
            parts.push(self.operand()?);
        }

        // The other operator at the same chain level means ambiguous
        // precedence; the grammar requires explicit grouping instead.
        if matches!(self.peek(), Some(Token::And) | Some(Token::Or)) {
            return Err(ParseError::new(
                "mixed `&&` and `||` require explicit parentheses",
            ));
        }

        Ok(match op {
            Token::And => Expr::And(parts),
            _ => Expr::Or(parts),
        })
    }

    fn operand(&mut self) -> Result<Expr, ParseError> {
        match self.next() {
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(Token::RParen, "`)`")?;
                Ok(inner)
            }
            Some(Token::Ident(name)) if name == "member-of" || name == "equals" => {
                let (subject, literal) = self.call_args(&name)?;
                Ok(if name == "member-of" {
                    Expr::MemberOf {
                        set: subject,
                        member: literal,
                    }
                } else {
                    Expr::Equals {
                        var: subject,
                        literal,
                    }
                })
            }
            Some(Token::Ident(name)) => Ok(Expr::Var(name)),
            Some(Token::Literal(_)) => Err(ParseError::new(
                "string literal cannot stand alone; use member-of() or equals()",
            )),
            _ => Err(ParseError::new("expected expression")),
        }
    }

    /// `( ident , 'literal' )` following a function keyword.
    fn call_args(&mut self, func: &str) -> Result<(String, String), ParseError> {
        self.expect(Token::LParen, &format!("`(` after `{}`", func))?;
        let subject = match self.next() {
            Some(Token::Ident(name)) => name,
            _ => {
                return Err(ParseError::new(format!(
                    "expected variable name in `{}(...)`",
                    func
                )))
            }
        };
        self.expect(Token::Comma, "`,`")?;
        let literal = match self.next() {
            Some(Token::Literal(text)) => text,
            _ => {
                return Err(ParseError::new(format!(
                    "expected quoted literal in `{}(...)`",
                    func
                )))
            }
        };
        self.expect(Token::RParen, "`)`")?;
        Ok((subject, literal))
    }
}
