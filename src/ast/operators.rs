use std::fmt;

/// Prefix (unary) operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    /// Logical negation `!`
    Bang,
    /// Numeric negation `-`
    Minus,
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixOp::Bang => write!(f, "!"),
            PrefixOp::Minus => write!(f, "-"),
        }
    }
}

/// Infix (binary) operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    Plus,
    Minus,
    Asterisk,
    Slash,
    Eq,
    NotEq,
    Lt,
    Gt,
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            InfixOp::Plus => "+",
            InfixOp::Minus => "-",
            InfixOp::Asterisk => "*",
            InfixOp::Slash => "/",
            InfixOp::Eq => "==",
            InfixOp::NotEq => "!=",
            InfixOp::Lt => "<",
            InfixOp::Gt => ">",
        };
        write!(f, "{}", symbol)
    }
}
