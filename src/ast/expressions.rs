use std::fmt;

use crate::ast::{Block, InfixOp, PrefixOp};

/// Abstract Syntax Tree node representing a parsed expression.
///
/// Sorrel is expression-oriented: almost everything that produces a value is
/// one of these variants. The `Display` impl renders the canonical source
/// form used by diagnostics, quoted fragments, and tests.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Variable reference
    ///
    /// # Example
    /// ```text
    /// counter
    /// ```
    Identifier(String),

    /// Integer literal
    Integer(i64),

    /// Boolean literal
    Boolean(bool),

    /// String literal
    String(String),

    /// Prefix operator application
    ///
    /// # Examples
    /// ```text
    /// !ready
    /// -5
    /// ```
    Prefix {
        operator: PrefixOp,
        right: Box<Expression>,
    },

    /// Infix operator application
    ///
    /// # Example
    /// ```text
    /// price * quantity
    /// ```
    Infix {
        operator: InfixOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Conditional expression. The else arm is optional; a false condition
    /// without one produces `null`.
    ///
    /// # Example
    /// ```text
    /// if (x > 10) { "big" } else { "small" }
    /// ```
    If {
        condition: Box<Expression>,
        consequence: Block,
        alternative: Option<Block>,
    },

    /// Function literal. Evaluating one captures the current environment,
    /// making every function a closure.
    ///
    /// # Example
    /// ```text
    /// fn(x, y) { x + y }
    /// ```
    Function {
        parameters: Vec<String>,
        body: Block,
    },

    /// Macro literal. Shares the function literal's shape but is consumed by
    /// the macro expansion pass rather than the evaluator.
    ///
    /// # Example
    /// ```text
    /// macro(x) { quote(unquote(x) + 1) }
    /// ```
    Macro {
        parameters: Vec<String>,
        body: Block,
    },

    /// Call expression
    ///
    /// # Example
    /// ```text
    /// add(1, 2 * 3)
    /// ```
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },

    /// Array literal
    ///
    /// # Example
    /// ```text
    /// [1, "two", fn(x) { x }]
    /// ```
    Array(Vec<Expression>),

    /// Index access on arrays and hashes
    ///
    /// # Example
    /// ```text
    /// items[2]
    /// ```
    Index {
        left: Box<Expression>,
        index: Box<Expression>,
    },

    /// Hash literal. Pairs keep their source order; evaluation order is
    /// observable through error reporting.
    ///
    /// # Example
    /// ```text
    /// {"name": "sorrel", 1: true}
    /// ```
    Hash(Vec<(Expression, Expression)>),
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(name) => write!(f, "{}", name),
            Expression::Integer(value) => write!(f, "{}", value),
            Expression::Boolean(value) => write!(f, "{}", value),
            Expression::String(value) => write!(f, "{}", value),
            Expression::Prefix { operator, right } => write!(f, "({}{})", operator, right),
            Expression::Infix {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if{} {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, "else {}", alternative)?;
                }
                Ok(())
            }
            Expression::Function { parameters, body } => {
                write!(f, "fn({}) {}", parameters.join(", "), body)
            }
            Expression::Macro { parameters, body } => {
                write!(f, "macro({}) {}", parameters.join(", "), body)
            }
            Expression::Call {
                function,
                arguments,
            } => {
                let arguments: Vec<String> = arguments.iter().map(ToString::to_string).collect();
                write!(f, "{}({})", function, arguments.join(", "))
            }
            Expression::Array(elements) => {
                let elements: Vec<String> = elements.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", elements.join(", "))
            }
            Expression::Index { left, index } => write!(f, "({}[{}])", left, index),
            Expression::Hash(pairs) => {
                let pairs: Vec<String> = pairs
                    .iter()
                    .map(|(key, value)| format!("{}:{}", key, value))
                    .collect();
                write!(f, "{{{}}}", pairs.join(", "))
            }
        }
    }
}
