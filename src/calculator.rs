use crate::error::{CallError, Error};
use crate::evaluator::evaluate;
use crate::functions::FunctionRegistry;
use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};
use log::{debug, trace};
use std::collections::{BTreeSet, HashMap};

/// Evaluate a single expression from `input`, with the built-in functions.
///
/// Returns `Ok(result)` if the evaluation is successful, or `Err(cause)` if
/// tokenizing or evaluating the expression failed.
///
/// # Errors
///
/// Returns the first [`Error`] met in `input`.
///
/// # Example
///
/// ```
/// # use std::collections::HashMap;
/// # use tally::{eval};
///
/// let empty: HashMap<String, f64> = HashMap::new();
/// assert_eq!(eval("45 - 2^3", &empty), Ok(37.0));
///
/// let mut context :HashMap<String,f64> = HashMap::new();
/// context.insert("a".into(), -5.0);
/// assert_eq!(eval("3 * a", &context), Ok(-15.0));
/// ```
pub fn eval<'a, C>(input: &str, context: C) -> Result<f64, Error>
where
    C: Into<&'a HashMap<String, f64>>,
{
    Calculator::new().calculate(input, context)
}

/// Owns a [`FunctionRegistry`] and runs expressions through the
/// tokenize-then-evaluate pipeline.
///
/// A `Calculator` is `Send + Sync`. Register custom functions first, then
/// share it (for example behind an `Arc`) between threads.
///
/// # Examples
/// ```
/// # use tally::{check_arity, Calculator};
/// # use std::collections::HashMap;
/// let mut calculator = Calculator::new();
/// calculator.register_function("Hypot", |args| {
///     let [a, b] = check_arity::<2>(args)?;
///     Ok(a.hypot(b))
/// });
///
/// let mut context: HashMap<String, f64> = HashMap::new();
/// context.insert("x".into(), 3.0);
/// assert_eq!(calculator.calculate("hypot(x, 4)", &context), Ok(5.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    registry: FunctionRegistry,
}

impl Calculator {
    /// Create a calculator knowing the built-in functions
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a calculator using `registry` to resolve function calls
    #[must_use]
    pub fn with_registry(registry: FunctionRegistry) -> Self {
        Self { registry }
    }

    /// Get the function registry
    #[must_use]
    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Register `function` under `name`, see [`FunctionRegistry::register`]
    pub fn register_function<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&[f64]) -> Result<f64, CallError> + Send + Sync + 'static,
    {
        debug!("registering function '{}'", name);
        self.registry.register(name, function);
    }

    /// Split `expression` into tokens.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCharacter`] or [`Error::MalformedNumber`].
    pub fn tokenize(&self, expression: &str) -> Result<Vec<Token>, Error> {
        tokenize(expression, &self.registry)
    }

    /// Evaluate `expression`, taking variable values from `variables`.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error`] met in `expression`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tally::{Calculator, Error};
    /// # use std::collections::HashMap;
    /// let calculator = Calculator::new();
    /// let mut context: HashMap<String, f64> = HashMap::new();
    /// context.insert("x".into(), 2.0);
    /// context.insert("y".into(), 3.0);
    /// assert_eq!(calculator.calculate("x * y + 1", &context), Ok(7.0));
    /// assert_eq!(
    ///     calculator.calculate("1 / 0", &context),
    ///     Err(Error::DivisionByZero { position: 1 })
    /// );
    /// ```
    pub fn calculate<'a, C>(&self, expression: &str, variables: C) -> Result<f64, Error>
    where
        C: Into<&'a HashMap<String, f64>>,
    {
        debug!("calculating '{}'", expression);
        let tokens = self.tokenize(expression)?;
        trace!("'{}' has {} tokens", expression, tokens.len());
        let result = evaluate(&tokens, &self.registry, variables.into());
        match &result {
            Ok(value) => debug!("'{}' = {}", expression, value),
            Err(error) => debug!("'{}' failed: {}", expression, error),
        }
        result
    }

    /// Get the names of the variables used in `expression`, sorted and
    /// without duplicates.
    ///
    /// # Errors
    ///
    /// Fails the same way as [`tokenize`](#method.tokenize).
    ///
    /// # Examples
    /// ```
    /// # use tally::Calculator;
    /// let calculator = Calculator::new();
    /// let variables = calculator.extract_variables("b * sin(a) + b").unwrap();
    /// assert_eq!(variables.into_iter().collect::<Vec<_>>(), ["a", "b"]);
    /// ```
    pub fn extract_variables(&self, expression: &str) -> Result<BTreeSet<String>, Error> {
        let variables = self
            .tokenize(expression)?
            .into_iter()
            .filter(|token| token.kind == TokenKind::Variable)
            .map(|token| token.text)
            .collect();
        Ok(variables)
    }
}
