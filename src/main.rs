use clap::Parser;
use log::debug;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tally::{is_variable, Calculator, Error};

/// tally evaluates arithmetic expressions with variables and functions.
#[derive(Parser, Debug)]
#[command(name = "tally", version, about, long_about = None)]
struct Cli {
    /// Binds a variable before evaluating, e.g. `-D x=2`. Can be repeated.
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE", value_parser = parse_binding)]
    define: Vec<(String, f64)>,

    /// Expression to evaluate once. Without it, tally reads expressions
    /// from the standard input until `exit`.
    expression: Option<String>,
}

fn parse_binding(arg: &str) -> Result<(String, f64), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{arg}'"))?;
    let name = name.trim();
    if !is_variable(name) {
        return Err(format!("'{name}' is not a valid variable name"));
    }
    let value = value.trim();
    let value = value
        .parse::<f64>()
        .map_err(|_| format!("'{value}' is not a number"))?;
    Ok((name.to_string(), value))
}

/// Line-oriented session: reads expressions, asks for the values of their
/// variables and prints results.
struct Shell<'a, R, W> {
    calculator: &'a Calculator,
    bindings: HashMap<String, f64>,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    fn new(
        calculator: &'a Calculator,
        bindings: HashMap<String, f64>,
        input: R,
        output: W,
    ) -> Self {
        Self {
            calculator,
            bindings,
            input,
            output,
        }
    }

    fn run(&mut self) -> io::Result<()> {
        self.banner()?;
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let line = match self.read_line()? {
                Some(line) => line,
                None => break,
            };
            let line = line.trim();
            if line.eq_ignore_ascii_case("exit") {
                break;
            }
            if line.is_empty() {
                continue;
            }

            match self.calculate(line)? {
                Ok(value) => writeln!(self.output, "Result: {value}")?,
                Err(error) => writeln!(self.output, "Error: {error}")?,
            }
            writeln!(self.output)?;
        }
        writeln!(self.output, "Goodbye.")
    }

    fn banner(&mut self) -> io::Result<()> {
        writeln!(self.output, "=== tally: arithmetic expression calculator ===")?;
        writeln!(self.output, "Operators: + - * / ^")?;
        writeln!(
            self.output,
            "Functions: {}",
            self.calculator.registry().names().join(", ")
        )?;
        writeln!(self.output, "Type 'exit' to quit.")?;
        writeln!(self.output)
    }

    /// Evaluate `expression`, prompting for every variable it uses that has
    /// no value yet. The outer error is for I/O, the inner one for the
    /// expression itself.
    fn calculate(&mut self, expression: &str) -> io::Result<Result<f64, Error>> {
        let names = match self.calculator.extract_variables(expression) {
            Ok(names) => names,
            Err(error) => return Ok(Err(error)),
        };

        let mut variables = self.bindings.clone();
        let missing: Vec<String> = names
            .into_iter()
            .filter(|name| !variables.contains_key(name))
            .collect();
        if !missing.is_empty() {
            writeln!(self.output, "Variables found: {}", missing.join(", "))?;
        }
        for name in missing {
            let value = self.read_value(&name)?;
            variables.insert(name, value);
        }

        debug!("evaluating with {} variable(s)", variables.len());
        Ok(self.calculator.calculate(expression, &variables))
    }

    fn read_value(&mut self, name: &str) -> io::Result<f64> {
        loop {
            write!(self.output, "Enter value for {name}: ")?;
            self.output.flush()?;
            let line = self.read_line()?.ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("input ended before a value for '{name}' was given"),
                )
            })?;
            match line.trim().parse::<f64>() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "Error: enter a valid number")?,
            }
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let calculator = Calculator::new();
    let bindings: HashMap<String, f64> = cli.define.into_iter().collect();
    debug!("{} variable(s) bound on the command line", bindings.len());

    let mut shell = Shell::new(&calculator, bindings, io::stdin().lock(), io::stdout());

    let Some(expression) = cli.expression else {
        return match shell.run() {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("Error: {error}");
                ExitCode::from(2)
            }
        };
    };

    match shell.calculate(&expression) {
        Ok(Ok(value)) => {
            println!("Result: {value}");
            ExitCode::SUCCESS
        }
        Ok(Err(error)) => {
            eprintln!("Error: {error}");
            ExitCode::from(1)
        }
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::from(2)
        }
    }
}
