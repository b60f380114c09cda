use crate::token::TokenKind;
use thiserror::Error;

/// Failure raised by a function implementation, before any source position
/// is known.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallError {
    /// No function is registered under this name
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    /// The function was called with the wrong number of arguments
    #[error("expected {expected} argument(s), got {actual}")]
    InvalidArgumentCount {
        /// Number of arguments the function takes
        expected: usize,
        /// Number of arguments it received
        actual: usize,
    },
    /// An argument is outside the mathematical domain of the function
    #[error("{0}")]
    DomainError(String),
}

/// Error type for the tally crate.
///
/// Every variant carries the character index, in the whitespace-stripped
/// expression, where the problem was detected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A character that can not start any token
    #[error("unknown character '{character}' at position {position}")]
    UnknownCharacter {
        /// The offending character
        character: char,
        /// Where it was found
        position: usize,
    },
    /// A numeric literal with more than one `.`, or one that does not convert
    /// to a float
    #[error("malformed number at position {position}")]
    MalformedNumber {
        /// Where the literal went wrong
        position: usize,
    },
    /// A variable with no value in the bindings
    #[error("unknown variable '{name}' at position {position}")]
    UnknownVariable {
        /// Name of the variable, as written
        name: String,
        /// Position of the variable
        position: usize,
    },
    /// A function call failed
    #[error("error in function '{name}' at position {position}: {cause}")]
    FunctionError {
        /// Name of the function, as written
        name: String,
        /// Position of the function name
        position: usize,
        /// What the function reported
        #[source]
        cause: CallError,
    },
    /// The right operand of `/` is zero
    #[error("division by zero at position {position}")]
    DivisionByZero {
        /// Position of the `/` operator
        position: usize,
    },
    /// A `(` was never closed
    #[error("expected ')' at position {position}")]
    ExpectedClosingParen {
        /// Position of the token found instead
        position: usize,
    },
    /// The expression is complete but tokens remain
    #[error("unexpected {kind} after the end of the expression at position {position}")]
    UnexpectedTrailingInput {
        /// Kind of the first left-over token
        kind: TokenKind,
        /// Its position
        position: usize,
    },
    /// A token that no grammar rule accepts here
    #[error("unexpected {kind} at position {position}")]
    UnexpectedToken {
        /// Kind of the token
        kind: TokenKind,
        /// Its position
        position: usize,
    },
    /// Parentheses, calls and unary signs are nested deeper than
    /// [`MAX_NESTING`](crate::MAX_NESTING)
    #[error("expression nested too deeply at position {position}")]
    TooDeeplyNested {
        /// Position of the first token past the limit
        position: usize,
    },
}

impl Error {
    /// Get the position in the whitespace-stripped expression where this
    /// error was detected.
    #[must_use]
    pub fn position(&self) -> usize {
        match *self {
            Self::UnknownCharacter { position, .. }
            | Self::MalformedNumber { position }
            | Self::UnknownVariable { position, .. }
            | Self::FunctionError { position, .. }
            | Self::DivisionByZero { position }
            | Self::ExpectedClosingParen { position }
            | Self::UnexpectedTrailingInput { position, .. }
            | Self::UnexpectedToken { position, .. }
            | Self::TooDeeplyNested { position } => position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CallError, Error};
    use crate::token::TokenKind;
    use std::error::Error as _;

    #[test]
    fn display() {
        let error = Error::UnknownCharacter {
            character: '#',
            position: 1,
        };
        assert_eq!(error.to_string(), "unknown character '#' at position 1");

        let error = Error::UnexpectedToken {
            kind: TokenKind::Operator,
            position: 2,
        };
        assert_eq!(error.to_string(), "unexpected operator at position 2");

        let error = Error::FunctionError {
            name: "sqrt".into(),
            position: 0,
            cause: CallError::InvalidArgumentCount {
                expected: 1,
                actual: 2,
            },
        };
        assert_eq!(
            error.to_string(),
            "error in function 'sqrt' at position 0: expected 1 argument(s), got 2"
        );
    }

    #[test]
    fn function_error_has_cause() {
        let error = Error::FunctionError {
            name: "log".into(),
            position: 4,
            cause: CallError::DomainError("logarithm of a non-positive number".into()),
        };
        assert_eq!(error.position(), 4);
        let source = error.source().map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("logarithm of a non-positive number")
        );

        assert!(Error::DivisionByZero { position: 1 }.source().is_none());

        let error = Error::TooDeeplyNested { position: 256 };
        assert_eq!(error.position(), 256);
        assert_eq!(
            error.to_string(),
            "expression nested too deeply at position 256"
        );
    }
}
