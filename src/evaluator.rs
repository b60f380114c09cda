use crate::error::Error;
use crate::functions::FunctionRegistry;
use crate::token::{Op, Token, TokenKind};
use std::collections::HashMap;

// Sequences not produced by the lexer may lack their terminator
static END_OF_INPUT: Token = Token {
    kind: TokenKind::EndOfInput,
    text: String::new(),
    position: 0,
};

/// Deepest nesting of parentheses, call arguments and unary signs accepted
/// by the [`Evaluator`]. Anything deeper fails with
/// [`Error::TooDeeplyNested`].
pub const MAX_NESTING: usize = 256;

/// Evaluate a token sequence produced by [`tokenize`](fn.tokenize.html).
///
/// # Errors
///
/// Returns the first error met while walking the grammar.
///
/// # Examples
///
/// ```
/// # use std::collections::HashMap;
/// # use tally::{evaluate, tokenize, FunctionRegistry};
/// let registry = FunctionRegistry::new();
/// let tokens = tokenize("2 ^ 3 ^ 2", &registry).unwrap();
/// assert_eq!(evaluate(&tokens, &registry, &HashMap::new()), Ok(64.0));
/// ```
pub fn evaluate(
    tokens: &[Token],
    registry: &FunctionRegistry,
    variables: &HashMap<String, f64>,
) -> Result<f64, Error> {
    Evaluator::new(tokens, registry, variables).evaluate()
}

/// Recursive-descent evaluator computing the value of an expression directly
/// from its tokens, without building a tree.
///
/// Grammar, from lowest to highest precedence:
///
/// ```text
/// expression := term (('+' | '-') term)*
/// term       := power (('*' | '/') power)*
/// power      := unary ('^' unary)*
/// unary      := '-' unary | '+' unary | primary
/// primary    := number | variable | call | '(' expression ')'
/// call       := function '(' [expression (',' expression)*] ')'
/// ```
///
/// `^` folds from the left like the other binary operators: `2^3^2` is
/// `(2^3)^2`.
///
/// Every rule recursion goes through `unary`, which keeps count of its open
/// activations and stops at [`MAX_NESTING`].
pub struct Evaluator<'a> {
    tokens: &'a [Token],
    registry: &'a FunctionRegistry,
    variables: &'a HashMap<String, f64>,
    cursor: usize,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator positioned on the first token
    #[must_use]
    pub fn new(
        tokens: &'a [Token],
        registry: &'a FunctionRegistry,
        variables: &'a HashMap<String, f64>,
    ) -> Self {
        Self {
            tokens,
            registry,
            variables,
            cursor: 0,
            depth: 0,
        }
    }

    /// Evaluate the whole sequence, which must hold exactly one expression.
    ///
    /// # Errors
    ///
    /// Returns the first error met while walking the grammar, or
    /// [`Error::UnexpectedTrailingInput`] if tokens remain after the
    /// expression.
    pub fn evaluate(mut self) -> Result<f64, Error> {
        let result = self.expression()?;
        let token = self.current();
        if token.kind != TokenKind::EndOfInput {
            return Err(Error::UnexpectedTrailingInput {
                kind: token.kind,
                position: token.position,
            });
        }
        Ok(result)
    }

    fn current(&self) -> &'a Token {
        self.tokens.get(self.cursor).unwrap_or(&END_OF_INPUT)
    }

    fn advance(&mut self) {
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }
    }

    fn expression(&mut self) -> Result<f64, Error> {
        let mut result = self.term()?;
        loop {
            match self.current().op() {
                Some(Op::Plus) => {
                    self.advance();
                    result += self.term()?;
                }
                Some(Op::Minus) => {
                    self.advance();
                    result -= self.term()?;
                }
                _ => return Ok(result),
            }
        }
    }

    #[allow(clippy::float_cmp)]
    fn term(&mut self) -> Result<f64, Error> {
        let mut result = self.power()?;
        loop {
            let token = self.current();
            match token.op() {
                Some(Op::Mul) => {
                    self.advance();
                    result *= self.power()?;
                }
                Some(Op::Div) => {
                    self.advance();
                    let right = self.power()?;
                    if right == 0.0 {
                        return Err(Error::DivisionByZero {
                            position: token.position,
                        });
                    }
                    result /= right;
                }
                _ => return Ok(result),
            }
        }
    }

    fn power(&mut self) -> Result<f64, Error> {
        let mut result = self.unary()?;
        while self.current().op() == Some(Op::Exp) {
            self.advance();
            let exponent = self.unary()?;
            result = libm::pow(result, exponent);
        }
        Ok(result)
    }

    fn unary(&mut self) -> Result<f64, Error> {
        if self.depth == MAX_NESTING {
            return Err(Error::TooDeeplyNested {
                position: self.current().position,
            });
        }
        self.depth += 1;
        let result = self.signed();
        self.depth -= 1;
        result
    }

    fn signed(&mut self) -> Result<f64, Error> {
        match self.current().op() {
            Some(Op::Minus) => {
                self.advance();
                Ok(-self.unary()?)
            }
            Some(Op::Plus) => {
                self.advance();
                self.unary()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, Error> {
        let token = self.current();
        match token.kind {
            TokenKind::Number => {
                self.advance();
                token.text.parse().map_err(|_| Error::MalformedNumber {
                    position: token.position,
                })
            }
            TokenKind::Variable => {
                self.advance();
                self.variables
                    .get(&token.text)
                    .copied()
                    .ok_or_else(|| Error::UnknownVariable {
                        name: token.text.clone(),
                        position: token.position,
                    })
            }
            TokenKind::Function => self.call(),
            TokenKind::LeftParen => {
                self.advance();
                let result = self.expression()?;
                self.close_paren()?;
                Ok(result)
            }
            kind => Err(Error::UnexpectedToken {
                kind,
                position: token.position,
            }),
        }
    }

    fn call(&mut self) -> Result<f64, Error> {
        let function = self.current();
        self.advance();

        let paren = self.current();
        if paren.kind != TokenKind::LeftParen {
            return Err(Error::UnexpectedToken {
                kind: paren.kind,
                position: paren.position,
            });
        }
        self.advance();

        let mut args = Vec::new();
        if self.current().kind != TokenKind::RightParen {
            args.push(self.expression()?);
            while self.current().kind == TokenKind::Comma {
                self.advance();
                args.push(self.expression()?);
            }
        }
        self.close_paren()?;

        self.registry
            .invoke(&function.text, &args)
            .map_err(|cause| Error::FunctionError {
                name: function.text.clone(),
                position: function.position,
                cause,
            })
    }

    fn close_paren(&mut self) -> Result<(), Error> {
        let token = self.current();
        if token.kind != TokenKind::RightParen {
            return Err(Error::ExpectedClosingParen {
                position: token.position,
            });
        }
        self.advance();
        Ok(())
    }
}
