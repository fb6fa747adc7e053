//! Interactive read-eval-print loop.
//!
//! Each line runs through the full pipeline against a pair of persistent
//! environments (one for evaluation, one for macros), so definitions survive
//! from line to line.

use std::io::{self, Write};

use crate::environment::Env;
use crate::evaluator;
use crate::lexer::Lexer;
use crate::macros;
use crate::parser::Parser;

const PROMPT: &str = ">> ";

pub fn start() {
    let env = Env::new();
    let macro_env = Env::new();

    loop {
        print!("{}", PROMPT);
        io::stdout().flush().unwrap();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                eprintln!("error reading input: {}", err);
                break;
            }
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" {
            break;
        }

        let mut parser = Parser::new(Lexer::new(line));
        let mut program = parser.parse_program();

        if !parser.errors().is_empty() {
            println!("parser errors:");
            for error in parser.errors() {
                println!("  {}", error);
            }
            continue;
        }

        macros::define_macros(&mut program, &macro_env);
        let program = macros::expand_macros(program, &macro_env);

        println!("{}", evaluator::eval(&program, &env));
    }
}
