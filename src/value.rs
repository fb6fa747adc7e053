use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::{Block, Expression};
use crate::environment::Env;

/// Native function backing a builtin.
pub type BuiltinFn = fn(Vec<Value>) -> Value;

/// A user-defined function: a lexical closure over the environment that was
/// current when its literal was evaluated.
pub struct FunctionValue {
    pub parameters: Vec<String>,
    pub body: Block,
    pub env: Rc<RefCell<Env>>,
}

// Not derived: the captured environment may contain this very value, so
// printing it would never terminate.
impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FunctionValue {{ parameters: {:?}, body: {:?} }}",
            self.parameters, self.body
        )
    }
}

/// A macro. Shaped like a function, but applied during the macro expansion
/// pass with its parameters bound to unevaluated [`Value::Quote`] fragments.
pub struct MacroValue {
    pub parameters: Vec<String>,
    pub body: Block,
    pub env: Rc<RefCell<Env>>,
}

impl fmt::Debug for MacroValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MacroValue {{ parameters: {:?}, body: {:?} }}",
            self.parameters, self.body
        )
    }
}

/// A runtime value.
///
/// `Return` and `Error` are internal sentinels used for unwinding; program
/// evaluation unwraps the former and neither should reach user code as an
/// ordinary value. `Quote` holds an unevaluated AST fragment for the macro
/// system.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(String),
    Null,
    Array(Vec<Value>),
    Hash(HashMap<HashKey, HashPair>),
    Function(Rc<FunctionValue>),
    Builtin(BuiltinFn),
    Return(Box<Value>),
    Error(String),
    Quote(Expression),
    Macro(Rc<MacroValue>),
}

/// One hash entry. The original key value is stored alongside the mapped
/// value so the display form can reproduce it; lookups go through
/// [`HashKey`].
#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a, 64-bit. Chosen for string hash keys; the digest is part of
/// observable behavior, so the constants must not change.
fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Hash-table identity: the value's kind plus a 64-bit digest. Two values
/// are the same key exactly when their `HashKey`s are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    kind: &'static str,
    value: u64,
}

impl Value {
    /// Kind name used in error messages and hash keys.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::Null => "NULL",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
            Value::Return(_) => "RETURN_VALUE",
            Value::Error(_) => "ERROR",
            Value::Quote(_) => "QUOTE",
            Value::Macro(_) => "MACRO",
        }
    }

    /// Hash-table identity for this value, or `None` when the kind cannot be
    /// used as a key. Only integers, booleans, and strings are hashable.
    pub fn hash_key(&self) -> Option<HashKey> {
        let digest = match self {
            Value::Integer(value) => *value as u64,
            Value::Boolean(value) => u64::from(*value),
            Value::String(value) => fnv1a_64(value.as_bytes()),
            _ => return None,
        };
        Some(HashKey {
            kind: self.kind(),
            value: digest,
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Everything is truthy except `null` and `false`; zero and the empty
    /// string count as true.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Hash(a), Value::Hash(b)) => a == b,
            // Closures and macros compare by identity; their captured
            // environments may contain them, so structural comparison could
            // never terminate.
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Macro(a), Value::Macro(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => *a as usize == *b as usize,
            (Value::Return(a), Value::Return(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Quote(a), Value::Quote(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{}", value),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{}", value),
            Value::Null => write!(f, "null"),
            Value::Array(elements) => {
                let elements: Vec<String> = elements.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", elements.join(", "))
            }
            Value::Hash(pairs) => {
                let pairs: Vec<String> = pairs
                    .values()
                    .map(|pair| format!("{}: {}", pair.key, pair.value))
                    .collect();
                write!(f, "{{{}}}", pairs.join(", "))
            }
            Value::Function(function) => write!(
                f,
                "fn({}) {{\n{}\n}}",
                function.parameters.join(", "),
                function.body
            ),
            Value::Builtin(_) => write!(f, "builtin function"),
            Value::Return(value) => write!(f, "{}", value),
            Value::Error(message) => write!(f, "ERROR: {}", message),
            Value::Quote(node) => write!(f, "QUOTE({})", node),
            Value::Macro(macro_value) => write!(
                f,
                "macro({}) {{\n{}\n}}",
                macro_value.parameters.join(", "),
                macro_value.body
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_hash_keys_match_by_content() {
        let hello1 = Value::String("Hello World".to_string());
        let hello2 = Value::String("Hello World".to_string());
        let diff = Value::String("My name is johnny".to_string());

        assert_eq!(hello1.hash_key(), hello2.hash_key());
        assert_ne!(hello1.hash_key(), diff.hash_key());
    }

    #[test]
    fn test_string_hash_key_is_fnv1a() {
        // Reference digests for the FNV-1a 64-bit algorithm.
        let empty = Value::String(String::new());
        assert_eq!(empty.hash_key().unwrap().value, 0xcbf2_9ce4_8422_2325);

        let a = Value::String("a".to_string());
        assert_eq!(a.hash_key().unwrap().value, 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_hash_keys_distinguish_kinds() {
        let one = Value::Integer(1);
        let truth = Value::Boolean(true);
        assert_ne!(one.hash_key(), truth.hash_key());
    }

    #[test]
    fn test_unhashable_kinds() {
        assert_eq!(Value::Null.hash_key(), None);
        assert_eq!(Value::Array(vec![]).hash_key(), None);
    }
}
