//! CLI support for sorrel-lang.
//!
//! Provides programmatic access to the full pipeline (scan, parse, expand
//! macros, evaluate) for the `sorrel` binary and for embedding in other
//! tools.

use std::fmt;
use std::io;

use crate::environment::Env;
use crate::evaluator;
use crate::lexer::Lexer;
use crate::macros;
use crate::parser::{ParseError, Parser};
use crate::value::Value;

/// Errors that can occur while driving the interpreter.
#[derive(Debug)]
pub enum CliError {
    /// One or more syntax errors; the program was not evaluated
    Parse(Vec<ParseError>),
    /// IO error while reading source
    Io(io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Parse(errors) => {
                writeln!(f, "parser errors:")?;
                for error in errors {
                    writeln!(f, "  {}", error)?;
                }
                Ok(())
            }
            CliError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            CliError::Parse(_) => None,
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

/// Run source through the full pipeline and return the final value.
///
/// A program whose parse produced any errors is refused before evaluation.
/// Runtime failures are not an `Err`: they come back as a [`Value::Error`]
/// for the caller to display.
pub fn run_source(source: &str) -> Result<Value, CliError> {
    let mut parser = Parser::new(Lexer::new(source));
    let mut program = parser.parse_program();

    if !parser.errors().is_empty() {
        return Err(CliError::Parse(parser.errors().to_vec()));
    }

    let macro_env = Env::new();
    macros::define_macros(&mut program, &macro_env);
    let program = macros::expand_macros(program, &macro_env);

    let env = Env::new();
    Ok(evaluator::eval(&program, &env))
}

/// Parse only: validate syntax without evaluating.
pub fn check_source(source: &str) -> Result<(), CliError> {
    let mut parser = Parser::new(Lexer::new(source));
    parser.parse_program();

    if parser.errors().is_empty() {
        Ok(())
    } else {
        Err(CliError::Parse(parser.errors().to_vec()))
    }
}
