use crate::error::CallError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Signature of the built-in functions
pub type Builtin = fn(&[f64]) -> Result<f64, CallError>;

/// A callable stored in a [`FunctionRegistry`]
pub type Function = Arc<dyn Fn(&[f64]) -> Result<f64, CallError> + Send + Sync>;

lazy_static! {
    /// The functions every new [`FunctionRegistry`] starts with
    pub static ref BUILTINS: HashMap<&'static str, Builtin> = {
        let mut map = HashMap::<&'static str, Builtin>::new();
        map.insert("sin", sin);
        map.insert("cos", cos);
        map.insert("tan", tan);
        map.insert("log", log);
        map.insert("log10", log10);
        map.insert("sqrt", sqrt);
        map.insert("abs", abs);
        map.insert("pow", pow);
        map.insert("max", max);
        map.insert("min", min);
        map.shrink_to_fit();
        map
    };
}

/// Check that `args` holds exactly `N` values, and get them as an array.
///
/// # Errors
///
/// Returns [`CallError::InvalidArgumentCount`] when the count differs.
///
/// # Examples
///
/// ```
/// # use tally::{check_arity, CallError};
/// assert_eq!(check_arity::<2>(&[1.0, 2.0]), Ok([1.0, 2.0]));
/// assert_eq!(
///     check_arity::<1>(&[1.0, 2.0]),
///     Err(CallError::InvalidArgumentCount { expected: 1, actual: 2 })
/// );
/// ```
pub fn check_arity<const N: usize>(args: &[f64]) -> Result<[f64; N], CallError> {
    <[f64; N]>::try_from(args).map_err(|_| CallError::InvalidArgumentCount {
        expected: N,
        actual: args.len(),
    })
}

fn sin(args: &[f64]) -> Result<f64, CallError> {
    let [x] = check_arity::<1>(args)?;
    Ok(x.sin())
}

fn cos(args: &[f64]) -> Result<f64, CallError> {
    let [x] = check_arity::<1>(args)?;
    Ok(x.cos())
}

fn tan(args: &[f64]) -> Result<f64, CallError> {
    let [x] = check_arity::<1>(args)?;
    Ok(x.tan())
}

fn log(args: &[f64]) -> Result<f64, CallError> {
    let [x] = check_arity::<1>(args)?;
    if x <= 0.0 {
        return Err(CallError::DomainError(
            "logarithm of a non-positive number".into(),
        ));
    }
    Ok(x.ln())
}

fn log10(args: &[f64]) -> Result<f64, CallError> {
    let [x] = check_arity::<1>(args)?;
    if x <= 0.0 {
        return Err(CallError::DomainError(
            "logarithm of a non-positive number".into(),
        ));
    }
    Ok(x.log10())
}

fn sqrt(args: &[f64]) -> Result<f64, CallError> {
    let [x] = check_arity::<1>(args)?;
    if x < 0.0 {
        return Err(CallError::DomainError(
            "square root of a negative number".into(),
        ));
    }
    Ok(x.sqrt())
}

fn abs(args: &[f64]) -> Result<f64, CallError> {
    let [x] = check_arity::<1>(args)?;
    Ok(x.abs())
}

fn pow(args: &[f64]) -> Result<f64, CallError> {
    let [base, exponent] = check_arity::<2>(args)?;
    Ok(libm::pow(base, exponent))
}

fn max(args: &[f64]) -> Result<f64, CallError> {
    let [a, b] = check_arity::<2>(args)?;
    Ok(a.max(b))
}

fn min(args: &[f64]) -> Result<f64, CallError> {
    let [a, b] = check_arity::<2>(args)?;
    Ok(a.min(b))
}

/// Case-insensitive table of the functions an expression can call.
///
/// Names are lower-cased on the way in, so `Foo`, `FOO` and `foo` all refer
/// to the same entry. Registering needs `&mut self` and lookups only `&self`:
/// once populated, a registry can be shared between threads evaluating
/// concurrently.
///
/// # Examples
///
/// ```
/// # use tally::{check_arity, FunctionRegistry};
/// let mut registry = FunctionRegistry::new();
/// assert!(registry.has("SQRT"));
///
/// registry.register("Double", |args| {
///     let [x] = check_arity::<1>(args)?;
///     Ok(2.0 * x)
/// });
/// assert_eq!(registry.invoke("double", &[4.0]), Ok(8.0));
/// ```
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, Function>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for (&name, &builtin) in BUILTINS.iter() {
            registry.functions.insert(name.into(), Arc::new(builtin));
        }
        registry
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

impl FunctionRegistry {
    /// Create a registry holding the built-in functions
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry without any function
    #[must_use]
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Register `function` under `name`, replacing any function with the same
    /// case-insensitive name.
    pub fn register<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&[f64]) -> Result<f64, CallError> + Send + Sync + 'static,
    {
        self.functions.insert(name.to_lowercase(), Arc::new(function));
    }

    /// Check if a function is registered under `name`, ignoring case
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }

    /// Call the function registered under `name` with `args`.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::UnknownFunction`] if nothing is registered under
    /// `name`, or whatever error the function itself reports.
    pub fn invoke(&self, name: &str, args: &[f64]) -> Result<f64, CallError> {
        let function = self
            .functions
            .get(&name.to_lowercase())
            .ok_or_else(|| CallError::UnknownFunction(name.into()))?;
        function(args)
    }

    /// Get the registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
