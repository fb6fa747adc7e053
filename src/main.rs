use clap::{Parser as ClapParser, Subcommand};
use sorrel_lang::cli::{self, CliError};
use sorrel_lang::repl;
use sorrel_lang::Value;
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "sorrel")]
#[command(about = "Sorrel - a small expression-oriented language with closures and macros")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a script file
    Run {
        /// Path to the script
        file: String,
    },

    /// Evaluate a source string (reads from stdin if not provided)
    Eval {
        /// The source to evaluate
        source: Option<String>,
    },

    /// Validate syntax without evaluating
    Check {
        /// The source to check (reads from stdin if not provided)
        source: Option<String>,
    },

    /// Start an interactive session
    Repl,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Run { file }) => run_file(&file),
        Some(Commands::Eval { source }) => eval_source(source),
        Some(Commands::Check { source }) => check_source(source),
        Some(Commands::Repl) | None => {
            if atty::is(atty::Stream::Stdin) {
                repl::start();
                Ok(())
            } else {
                eval_source(None)
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_source(source: Option<String>) -> Result<String, CliError> {
    match source {
        Some(source) => Ok(source),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Ok(buffer)
        }
    }
}

fn run_file(path: &str) -> Result<(), CliError> {
    let source = std::fs::read_to_string(path).map_err(CliError::Io)?;
    let result = cli::run_source(&source)?;

    // Scripts communicate through `puts`; only a final non-null value or a
    // runtime error is worth showing.
    match result {
        Value::Null => Ok(()),
        Value::Error(_) => {
            eprintln!("{}", result);
            std::process::exit(1);
        }
        value => {
            println!("{}", value);
            Ok(())
        }
    }
}

fn eval_source(source: Option<String>) -> Result<(), CliError> {
    let source = read_source(source)?;
    let result = cli::run_source(&source)?;
    let failed = result.is_error();

    println!("{}", result);
    if failed {
        std::process::exit(1);
    }
    Ok(())
}

fn check_source(source: Option<String>) -> Result<(), CliError> {
    let source = read_source(source)?;
    cli::check_source(&source)?;
    println!("Syntax is valid");
    Ok(())
}
