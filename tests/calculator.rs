use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use tally::{
    check_arity, eval, Calculator, CallError, Error, FunctionRegistry, TokenKind, MAX_NESTING,
};

fn context(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs
        .iter()
        .map(|&(name, value)| (name.to_string(), value))
        .collect()
}

#[test]
fn complex_expression() {
    assert_eq!(eval("2 + 3 * (4 - 1) ^ 2", &context(&[])), Ok(29.0));
}

#[test]
fn expression_with_functions() {
    assert_eq!(eval("sqrt(16) + abs(-5)", &context(&[])), Ok(9.0));
    assert_eq!(eval("sin(0)", &context(&[])), Ok(0.0));
}

#[test]
fn invalid_expression() {
    let result = eval("2 + * 3", &context(&[]));
    assert_eq!(
        result,
        Err(Error::UnexpectedToken {
            kind: TokenKind::Operator,
            position: 2
        })
    );
}

#[test]
fn power_folds_from_the_left() {
    assert_eq!(eval("2 ^ 3 ^ 2", &context(&[])), Ok(64.0));
    assert_eq!(eval("2 ^ (3 ^ 2)", &context(&[])), Ok(512.0));
}

#[test]
fn variables() {
    let variables = context(&[("x", 2.0), ("y", 3.0)]);
    assert_eq!(eval("x * y + 1", &variables), Ok(7.0));

    let error = eval("unknown * 2", &variables).unwrap_err();
    assert_eq!(
        error,
        Error::UnknownVariable {
            name: "unknown".into(),
            position: 0
        }
    );
    assert_eq!(error.to_string(), "unknown variable 'unknown' at position 0");
}

#[test]
fn division_by_zero_is_an_error() {
    for expression in &["1 / 0", "1 / (3 - 3)", "0 / 0", "1 / -0.0"] {
        let result = eval(expression, &context(&[]));
        assert!(
            matches!(result, Err(Error::DivisionByZero { position: 1 })),
            "{} gave {:?}",
            expression,
            result
        );
    }
}

#[test]
fn unknown_character_position() {
    let error = eval("2 # 3", &context(&[])).unwrap_err();
    assert_eq!(
        error,
        Error::UnknownCharacter {
            character: '#',
            position: 1
        }
    );
    // Positions ignore whitespace
    assert_eq!(eval("   1 +   2 @", &context(&[])).unwrap_err().position(), 3);
}

#[test]
fn token_kinds_ignore_whitespace() {
    let calculator = Calculator::new();
    let kinds = |expression: &str| -> Vec<TokenKind> {
        calculator
            .tokenize(expression)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    };
    assert_eq!(kinds("(1+2)*3^4"), kinds(" ( 1 +\t2 )\n* 3 ^ 4 "));
}

#[test]
fn case_insensitive_registration() {
    let mut calculator = Calculator::new();
    calculator.register_function("Foo", |args| {
        let [x] = check_arity::<1>(args)?;
        Ok(x + 100.0)
    });
    assert_eq!(calculator.calculate("foo(1)", &context(&[])), Ok(101.0));

    calculator.register_function("foo", |args| {
        let [x] = check_arity::<1>(args)?;
        Ok(-x)
    });
    assert_eq!(calculator.calculate("Foo(1)", &context(&[])), Ok(-1.0));
}

#[test]
fn domain_errors_carry_the_call_position() {
    let error = eval("1 + sqrt(0 - 4)", &context(&[])).unwrap_err();
    match error {
        Error::FunctionError {
            ref name,
            position,
            cause: CallError::DomainError(_),
        } => {
            assert_eq!(name, "sqrt");
            assert_eq!(position, 2);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn nesting_is_bounded() {
    let calculator = Calculator::new();
    let empty = context(&[]);

    let deepest = format!(
        "{}x{}",
        "(".repeat(MAX_NESTING - 1),
        ")".repeat(MAX_NESTING - 1)
    );
    assert_eq!(calculator.calculate(&deepest, &context(&[("x", 2.5)])), Ok(2.5));

    let parens = format!("{}1{}", "(".repeat(5_000), ")".repeat(5_000));
    assert_eq!(
        calculator.calculate(&parens, &empty),
        Err(Error::TooDeeplyNested {
            position: MAX_NESTING
        })
    );

    let signs = format!("1 + {}1", "-".repeat(200_000));
    let error = calculator.calculate(&signs, &empty).unwrap_err();
    assert_eq!(error.position(), MAX_NESTING + 2);
    assert_eq!(
        error.to_string(),
        format!("expression nested too deeply at position {}", MAX_NESTING + 2)
    );

    // The calculator stays usable afterwards
    assert_eq!(calculator.calculate("2 * (3 + 4)", &empty), Ok(14.0));
}

#[test]
fn extract_then_calculate() {
    let calculator = Calculator::new();
    let expression = "rate * log(principal) - rate";
    let names = calculator.extract_variables(expression).unwrap();
    assert_eq!(names.iter().map(String::as_str).collect::<Vec<_>>(), ["principal", "rate"]);

    let variables: HashMap<String, f64> = names
        .into_iter()
        .map(|name| {
            let value = if name == "rate" { 2.0 } else { 1.0 };
            (name, value)
        })
        .collect();
    assert_eq!(calculator.calculate(expression, &variables), Ok(-2.0));
}

#[test]
fn shared_between_threads() {
    let mut registry = FunctionRegistry::new();
    registry.register("square", |args| {
        let [x] = check_arity::<1>(args)?;
        Ok(x * x)
    });
    let calculator = Arc::new(Calculator::with_registry(registry));

    let handles: Vec<_> = (0..8_u32)
        .map(|i| {
            let calculator = Arc::clone(&calculator);
            thread::spawn(move || {
                let variables = context(&[("n", f64::from(i))]);
                calculator.calculate("square(n) + 1", &variables)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let n = i as f64;
        assert_eq!(handle.join().unwrap(), Ok(n * n + 1.0));
    }
}

#[test]
fn deterministic_results() {
    let expression = "sin(0.3) ^ 2 + cos(0.3) ^ 2 - tan(1.1) / log10(42) * pow(1.5, 2.5)";
    let first = eval(expression, &context(&[])).unwrap();
    for _ in 0..5 {
        let again = eval(expression, &context(&[])).unwrap();
        assert_eq!(again.to_bits(), first.to_bits());
    }
}
