//! # Sorrel - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for the Sorrel
//! language, a small expression-oriented language with first-class functions,
//! lexical closures, and a quote/unquote macro system.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer, plus keyword lookup
//! - **[operators]** - Prefix and infix operators
//! - **[expressions]** - Expression nodes (literals, operators, functions,
//!   calls, collections)
//! - **[statements]** - Statements, blocks, and the program root
//! - **[modify]** - The bottom-up structural rewriter used by the macro
//!   system
//!
//! ## Core Concepts
//!
//! Everything in Sorrel is an expression apart from `let` and `return`
//! statements. A program is a flat list of statements:
//!
//! ```text
//! let newAdder = fn(x) { fn(y) { x + y } };
//! let addTwo = newAdder(2);
//! addTwo(3);
//! ```
//!
//! Macros are defined with the same surface shape as functions and rewritten
//! away before evaluation:
//!
//! ```text
//! let unless = macro(cond, cons, alt) {
//!     quote(if (!(unquote(cond))) { unquote(cons) } else { unquote(alt) });
//! };
//! ```
//!
//! Every node renders a canonical source form through `Display`; quoted AST
//! fragments and runtime function values reuse it.

pub mod expressions;
pub mod modify;
pub mod operators;
pub mod statements;
pub mod tokens;

pub use expressions::Expression;
pub use modify::{modify_block, modify_expression, modify_program, modify_statement, Rewriter};
pub use operators::{InfixOp, PrefixOp};
pub use statements::{Block, Program, Statement};
pub use tokens::{lookup_identifier, Token};
