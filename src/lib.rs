#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(
    clippy::needless_return,
    clippy::missing_docs_in_private_items,
    clippy::module_name_repetitions
)]

//! Tally, a crate for evaluating arithmetic formulas written as text.
//!
//! The easiest way to use this crate is with the [`eval`](fn.eval.html)
//! function:
//!
//! ```
//! use std::collections::HashMap;
//! let empty: HashMap<String, f64> = HashMap::new();
//! assert_eq!(tally::eval("3 + 5 * 2", &empty), Ok(13.0));
//! ```
//!
//! The second argument to `eval` is a [`HashMap`], that can define
//! variables:
//!
//! ```
//! use std::collections::HashMap;
//!
//! let mut context :HashMap<String,f64> = HashMap::new();
//! context.insert("a".into(), 3.5);
//! assert_eq!(tally::eval("2 * a", &context), Ok(7.0));
//! ```
//!
//! A [`Calculator`](struct.Calculator.html) keeps a table of functions that
//! can be extended with custom ones, and finds the variables an expression
//! needs before it is evaluated.
//!
//! ```
//! use std::collections::HashMap;
//! use tally::{check_arity, Calculator};
//!
//! let mut calculator = Calculator::new();
//! calculator.register_function("cube", |args| {
//!     let [x] = check_arity::<1>(args)?;
//!     Ok(x * x * x)
//! });
//!
//! let variables = calculator.extract_variables("cube(side) * n").unwrap();
//! assert_eq!(variables.len(), 2);
//!
//! let mut context :HashMap<String,f64> = HashMap::new();
//! context.insert("side".into(), 2.0);
//! context.insert("n".into(), 3.0);
//! assert_eq!(calculator.calculate("cube(side) * n", &context), Ok(24.0));
//! ```
//!
//! # Language definition
//!
//! An expression can contain the following elements:
//!
//! - decimal literals: `12`, `0.5`, `.5`, `3.`. There is no exponent notation
//!   and a literal holds at most one `.`;
//! - left and right parenthesis;
//! - mathematical operators: `+` for addition, `-` for subtraction,
//!   `*` for multiplication, `/` for division and `^` for exponentiation,
//!   plus unary `-` and `+`;
//! - variables. Variable names start with a letter and contain letters and
//!   digits. They are case sensitive;
//! - function calls: `sin(a)`, `max(a, 2)`. Function names ignore case. The
//!   built-in functions are `sin`, `cos`, `tan`, `log` (natural logarithm),
//!   `log10`, `sqrt`, `abs` taking one argument, and `pow`, `max`, `min`
//!   taking two.
//!
//! Whitespace is removed before anything else, so it never separates two
//! tokens: `1 2` is the number `12`. Positions in errors count characters of
//! the expression without its whitespace. Any other symbol is forbidden in
//! the input.
//!
//! Precedence goes, from lowest to highest: `+ -`, then `* /`, then `^`,
//! then unary signs. All binary operators are left associative, **including**
//! `^`: `2 ^ 3 ^ 2` is `(2 ^ 3) ^ 2 = 64`. Unary signs bind tighter than `^`,
//! so `-2 ^ 2` is `4`.
//!
//! Dividing by zero is an error rather than an infinity, and so is calling
//! `sqrt` on a negative number or `log`/`log10` on a non-positive one.
//!
//! Parentheses, function calls and unary signs can be nested at most
//! [`MAX_NESTING`](constant.MAX_NESTING.html) (256) levels deep. Each sign,
//! group or call argument opens one level, so `--1` uses three. Deeper input
//! fails with [`Error::TooDeeplyNested`](enum.Error.html) instead of
//! exhausting the stack.
//!
//! # Technical details
//!
//! tally is a direct evaluator: the [`Lexer`](struct.Lexer.html) produces a
//! token sequence, and the recursive-descent
//! [`Evaluator`](struct.Evaluator.html) computes the value while walking it,
//! without building a tree. It works only with `f64` data.

#[macro_use]
extern crate lazy_static;

mod calculator;
mod error;
mod evaluator;
mod functions;
mod lexer;
mod token;

pub use calculator::{eval, Calculator};
pub use error::{CallError, Error};
pub use evaluator::{evaluate, Evaluator, MAX_NESTING};
pub use functions::{check_arity, Builtin, Function, FunctionRegistry, BUILTINS};
pub use lexer::{is_variable, tokenize, Lexer};
pub use token::{Op, Token, TokenKind};
