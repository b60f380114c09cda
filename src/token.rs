use std::fmt::{self, Display, Formatter};

/// Possible kinds of tokens to find in the input string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Numeric literal, converted to a float during evaluation
    Number,
    /// Identifier that is not a registered function
    Variable,
    /// One of `+ - * / ^`
    Operator,
    /// Identifier naming a registered function
    Function,
    /// Left parenthesis
    LeftParen,
    /// Right parenthesis
    RightParen,
    /// Argument separator
    Comma,
    /// Terminates every token sequence
    EndOfInput,
}

impl Display for TokenKind {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        let name = match *self {
            Self::Number => "number",
            Self::Variable => "variable",
            Self::Operator => "operator",
            Self::Function => "function",
            Self::LeftParen => "'('",
            Self::RightParen => "')'",
            Self::Comma => "','",
            Self::EndOfInput => "end of input",
        };
        fmt.write_str(name)
    }
}

/// A classified, positioned piece of the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What the token is
    pub kind: TokenKind,
    /// The literal text: number, operator symbol or identifier. Empty for
    /// `EndOfInput`.
    pub text: String,
    /// Index of the first character in the whitespace-stripped input
    pub position: usize,
}

impl Token {
    /// Create a new token
    pub fn new<S: Into<String>>(kind: TokenKind, text: S, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Create the token terminating a sequence
    #[must_use]
    pub fn end(position: usize) -> Self {
        Self::new(TokenKind::EndOfInput, String::new(), position)
    }

    /// Get the operator for `Operator` tokens, `None` for anything else
    #[must_use]
    pub fn op(&self) -> Option<Op> {
        if self.kind == TokenKind::Operator {
            Op::from_symbol(&self.text)
        } else {
            None
        }
    }
}

/// Allowed operators in the grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `+`, binary or unary
    Plus,
    /// `-`, binary or unary
    Minus,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `^`
    Exp,
}

impl Op {
    /// Get the operator written as `symbol`
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Plus),
            "-" => Some(Self::Minus),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            "^" => Some(Self::Exp),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Op, Token, TokenKind};

    #[test]
    fn operators() {
        let operators = [
            ("+", Op::Plus),
            ("-", Op::Minus),
            ("*", Op::Mul),
            ("/", Op::Div),
            ("^", Op::Exp),
        ];
        for &(symbol, op) in &operators {
            let token = Token::new(TokenKind::Operator, symbol, 0);
            assert_eq!(token.op(), Some(op));
        }

        assert_eq!(Op::from_symbol("%"), None);
        // Only operator tokens carry an operator
        assert_eq!(Token::new(TokenKind::Variable, "+", 0).op(), None);
    }

    #[test]
    fn end() {
        let token = Token::end(7);
        assert_eq!(token.kind, TokenKind::EndOfInput);
        assert!(token.text.is_empty());
        assert_eq!(token.position, 7);
    }
}
