use crate::error::Error;
use crate::functions::FunctionRegistry;
use crate::token::{Token, TokenKind};
use std::iter::{Enumerate, Peekable};
use std::vec::IntoIter;

#[must_use]
/// Check if `ident` is a valid variable name
///
/// # Examples
///
/// ```
/// # use tally::is_variable;
///
/// assert_eq!(is_variable("abc3"), true);
/// assert_eq!(is_variable("34zb"), false);
/// ```
pub fn is_variable(ident: &str) -> bool {
    let mut chars = ident.chars();
    // Check first char
    if !chars.next().map_or(false, is_identifier_start) {
        return false;
    }
    // Check all others
    for c in chars {
        if !is_identifier_part(c) {
            return false;
        }
    }
    return true;
}

/// Split `expression` into tokens, classifying identifiers with `registry`.
///
/// # Errors
///
/// Returns [`Error::UnknownCharacter`] or [`Error::MalformedNumber`].
///
/// # Examples
///
/// ```
/// # use tally::{tokenize, FunctionRegistry, TokenKind};
/// let tokens = tokenize("sqrt(x)", &FunctionRegistry::new()).unwrap();
/// let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     [
///         TokenKind::Function,
///         TokenKind::LeftParen,
///         TokenKind::Variable,
///         TokenKind::RightParen,
///         TokenKind::EndOfInput,
///     ]
/// );
/// ```
pub fn tokenize(expression: &str, registry: &FunctionRegistry) -> Result<Vec<Token>, Error> {
    Lexer::new(expression, registry).parse()
}

/// An helper struct for lexing the input.
///
/// Whitespace is dropped before scanning, and every position is a character
/// index into the stripped input.
pub struct Lexer<'a> {
    input: Peekable<Enumerate<IntoIter<char>>>,
    length: usize,
    registry: &'a FunctionRegistry,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `expression`
    #[must_use]
    pub fn new(expression: &str, registry: &'a FunctionRegistry) -> Lexer<'a> {
        let stripped: Vec<char> = expression.chars().filter(|c| !c.is_whitespace()).collect();
        Lexer {
            length: stripped.len(),
            input: stripped.into_iter().enumerate().peekable(),
            registry,
        }
    }

    /// Consume the lexer, producing the token sequence terminated by
    /// `EndOfInput`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCharacter`] or [`Error::MalformedNumber`].
    pub fn parse(mut self) -> Result<Vec<Token>, Error> {
        let mut output = Vec::new();
        while let Some(token) = self.next_token()? {
            output.push(token);
        }
        output.push(Token::end(self.length));
        Ok(output)
    }

    fn next_token(&mut self) -> Result<Option<Token>, Error> {
        let (position, c) = match self.input.next() {
            Some(next) => next,
            None => return Ok(None),
        };
        let token = match c {
            c if is_number_part(c) => self.number(position, c)?,
            c if is_identifier_start(c) => self.identifier(position, c),
            '+' | '-' | '*' | '/' | '^' => Token::new(TokenKind::Operator, c, position),
            '(' => Token::new(TokenKind::LeftParen, c, position),
            ')' => Token::new(TokenKind::RightParen, c, position),
            ',' => Token::new(TokenKind::Comma, c, position),
            other => {
                return Err(Error::UnknownCharacter {
                    character: other,
                    position,
                });
            }
        };
        Ok(Some(token))
    }

    fn number(&mut self, start: usize, first: char) -> Result<Token, Error> {
        let mut text = String::new();
        text.push(first);
        let mut seen_dot = first == '.';
        while let Some(&(position, c)) = self.input.peek() {
            if !is_number_part(c) {
                break;
            }
            if c == '.' {
                if seen_dot {
                    return Err(Error::MalformedNumber { position });
                }
                seen_dot = true;
            }
            self.input.next();
            text.push(c);
        }
        Ok(Token::new(TokenKind::Number, text, start))
    }

    fn identifier(&mut self, start: usize, first: char) -> Token {
        let mut ident = String::new();
        ident.push(first);
        while let Some(&(_, c)) = self.input.peek() {
            if !is_identifier_part(c) {
                break;
            }
            self.input.next();
            ident.push(c);
        }
        let kind = if self.registry.has(&ident) {
            TokenKind::Function
        } else {
            TokenKind::Variable
        };
        Token::new(kind, ident, start)
    }
}

/// Check if `c` can appear inside a numeric literal
fn is_number_part(c: char) -> bool {
    c == '.' || c.is_ascii_digit()
}

/// Check if `c` can appear at the first character of an identifier
fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic()
}

/// Check if `c` can appear inside an identifier
fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric()
}
