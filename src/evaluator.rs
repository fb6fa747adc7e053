//! Tree-walking evaluator.
//!
//! [`eval`] walks the AST and produces a [`Value`]. Runtime failures are not
//! Rust errors: they travel as [`Value::Error`] sentinels that every
//! dispatch arm checks for and short-circuits on. `return` unwinds the same
//! way through [`Value::Return`], which block evaluation passes through
//! untouched and program or function application unwraps.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{self, Block, Expression, InfixOp, PrefixOp, Program, Statement};
use crate::builtins;
use crate::environment::Env;
use crate::value::{FunctionValue, HashPair, Value};

/// Evaluate a whole program. The final statement's value is returned, with
/// `return` unwrapped at this level.
pub fn eval(program: &Program, env: &Rc<RefCell<Env>>) -> Value {
    let mut result = Value::Null;

    for statement in &program.statements {
        match eval_statement(statement, env) {
            Value::Return(value) => return *value,
            error @ Value::Error(_) => return error,
            value => result = value,
        }
    }

    result
}

/// Evaluate a block. Unlike [`eval`], `return` and error sentinels are
/// passed through unchanged so that outer frames can see them.
pub fn eval_block(block: &Block, env: &Rc<RefCell<Env>>) -> Value {
    let mut result = Value::Null;

    for statement in &block.statements {
        result = eval_statement(statement, env);

        if matches!(result, Value::Return(_) | Value::Error(_)) {
            return result;
        }
    }

    result
}

fn eval_statement(statement: &Statement, env: &Rc<RefCell<Env>>) -> Value {
    match statement {
        Statement::Expression(expression) => eval_expression(expression, env),
        Statement::Return(value) => {
            let value = eval_expression(value, env);
            if value.is_error() {
                return value;
            }
            Value::Return(Box::new(value))
        }
        Statement::Let { name, value } => {
            let value = eval_expression(value, env);
            if value.is_error() {
                return value;
            }
            env.borrow_mut().set(name.clone(), value);
            // A binding has no value of its own; callers must not rely on
            // what `let` evaluates to.
            Value::Null
        }
        Statement::Block(block) => eval_block(block, env),
    }
}

fn eval_expression(expression: &Expression, env: &Rc<RefCell<Env>>) -> Value {
    match expression {
        Expression::Integer(value) => Value::Integer(*value),
        Expression::Boolean(value) => Value::Boolean(*value),
        Expression::String(value) => Value::String(value.clone()),
        Expression::Identifier(name) => eval_identifier(name, env),
        Expression::Prefix { operator, right } => {
            let right = eval_expression(right, env);
            if right.is_error() {
                return right;
            }
            eval_prefix_expression(*operator, right)
        }
        Expression::Infix {
            operator,
            left,
            right,
        } => {
            let left = eval_expression(left, env);
            if left.is_error() {
                return left;
            }
            let right = eval_expression(right, env);
            if right.is_error() {
                return right;
            }
            eval_infix_expression(*operator, left, right)
        }
        Expression::If {
            condition,
            consequence,
            alternative,
        } => {
            let condition = eval_expression(condition, env);
            if condition.is_error() {
                return condition;
            }
            if condition.is_truthy() {
                eval_block(consequence, env)
            } else if let Some(alternative) = alternative {
                eval_block(alternative, env)
            } else {
                Value::Null
            }
        }
        Expression::Function { parameters, body } => Value::Function(Rc::new(FunctionValue {
            parameters: parameters.clone(),
            body: body.clone(),
            env: Rc::clone(env),
        })),
        // Macro literals only have meaning to the expansion pass; one that
        // survives into evaluation produces nothing.
        Expression::Macro { .. } => Value::Null,
        Expression::Call {
            function,
            arguments,
        } => {
            if let Expression::Identifier(name) = function.as_ref() {
                if name == "quote" {
                    return eval_quote(arguments, env);
                }
            }

            let function = eval_expression(function, env);
            if function.is_error() {
                return function;
            }

            match eval_expressions(arguments, env) {
                Ok(arguments) => apply_function(function, arguments),
                Err(error) => error,
            }
        }
        Expression::Array(elements) => match eval_expressions(elements, env) {
            Ok(elements) => Value::Array(elements),
            Err(error) => error,
        },
        Expression::Index { left, index } => {
            let left = eval_expression(left, env);
            if left.is_error() {
                return left;
            }
            let index = eval_expression(index, env);
            if index.is_error() {
                return index;
            }
            eval_index_expression(left, index)
        }
        Expression::Hash(pairs) => eval_hash_literal(pairs, env),
    }
}

/// Identifiers resolve through the environment chain first, then the global
/// builtin table.
fn eval_identifier(name: &str, env: &Rc<RefCell<Env>>) -> Value {
    if let Some(value) = env.borrow().get(name) {
        return value;
    }
    if let Some(builtin) = builtins::lookup(name) {
        return builtin;
    }
    Value::Error(format!("identifier not found: {}", name))
}

fn eval_prefix_expression(operator: PrefixOp, right: Value) -> Value {
    match operator {
        PrefixOp::Bang => eval_bang_expression(right),
        PrefixOp::Minus => eval_minus_expression(right),
    }
}

fn eval_bang_expression(right: Value) -> Value {
    match right {
        Value::Boolean(value) => Value::Boolean(!value),
        Value::Null => Value::Boolean(true),
        _ => Value::Boolean(false),
    }
}

fn eval_minus_expression(right: Value) -> Value {
    match right {
        Value::Integer(value) => Value::Integer(value.wrapping_neg()),
        other => Value::Error(format!("unknown operator: -{}", other.kind())),
    }
}

fn eval_infix_expression(operator: InfixOp, left: Value, right: Value) -> Value {
    match (&left, &right) {
        (Value::Integer(l), Value::Integer(r)) => {
            eval_integer_infix_expression(operator, *l, *r)
        }
        (Value::String(l), Value::String(r)) => eval_string_infix_expression(operator, l, r),
        _ => match operator {
            InfixOp::Eq => Value::Boolean(values_identical(&left, &right)),
            InfixOp::NotEq => Value::Boolean(!values_identical(&left, &right)),
            _ if left.kind() != right.kind() => Value::Error(format!(
                "type mismatch: {} {} {}",
                left.kind(),
                operator,
                right.kind()
            )),
            _ => Value::Error(format!(
                "unknown operator: {} {} {}",
                left.kind(),
                operator,
                right.kind()
            )),
        },
    }
}

/// Identity comparison backing `==`/`!=` outside the integer and string
/// paths. Booleans and null are singletons in the value model, so they
/// compare by content; any other pair of operands is two distinct values and
/// never compares equal here.
fn values_identical(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Boolean(l), Value::Boolean(r)) => l == r,
        (Value::Null, Value::Null) => true,
        _ => false,
    }
}

/// Integer arithmetic follows two's-complement 64-bit semantics: overflow
/// wraps, division truncates toward zero, division by zero is a runtime
/// error.
fn eval_integer_infix_expression(operator: InfixOp, left: i64, right: i64) -> Value {
    match operator {
        InfixOp::Plus => Value::Integer(left.wrapping_add(right)),
        InfixOp::Minus => Value::Integer(left.wrapping_sub(right)),
        InfixOp::Asterisk => Value::Integer(left.wrapping_mul(right)),
        InfixOp::Slash => {
            if right == 0 {
                Value::Error("division by zero".to_string())
            } else {
                Value::Integer(left.wrapping_div(right))
            }
        }
        InfixOp::Lt => Value::Boolean(left < right),
        InfixOp::Gt => Value::Boolean(left > right),
        InfixOp::Eq => Value::Boolean(left == right),
        InfixOp::NotEq => Value::Boolean(left != right),
    }
}

fn eval_string_infix_expression(operator: InfixOp, left: &str, right: &str) -> Value {
    match operator {
        InfixOp::Plus => Value::String(format!("{}{}", left, right)),
        _ => Value::Error(format!("unknown operator: STRING {} STRING", operator)),
    }
}

/// Evaluate a list of expressions left to right, stopping at the first
/// error.
fn eval_expressions(
    expressions: &[Expression],
    env: &Rc<RefCell<Env>>,
) -> Result<Vec<Value>, Value> {
    let mut results = Vec::with_capacity(expressions.len());

    for expression in expressions {
        let value = eval_expression(expression, env);
        if value.is_error() {
            return Err(value);
        }
        results.push(value);
    }

    Ok(results)
}

/// Apply a callable to already-evaluated arguments.
///
/// User functions run their body in a fresh frame enclosed by the captured
/// environment, with parameters bound positionally; a `return` inside the
/// body is unwrapped here so the wrapper never escapes the call.
pub fn apply_function(function: Value, arguments: Vec<Value>) -> Value {
    match function {
        Value::Function(function) => {
            if arguments.len() != function.parameters.len() {
                return Value::Error(format!(
                    "wrong number of arguments. got={}, want={}",
                    arguments.len(),
                    function.parameters.len()
                ));
            }

            let env = Env::new_enclosed(Rc::clone(&function.env));
            for (parameter, argument) in function.parameters.iter().zip(arguments) {
                env.borrow_mut().set(parameter.clone(), argument);
            }

            unwrap_return_value(eval_block(&function.body, &env))
        }
        Value::Builtin(function) => function(arguments),
        other => Value::Error(format!("not a function: {}", other.kind())),
    }
}

fn unwrap_return_value(value: Value) -> Value {
    match value {
        Value::Return(value) => *value,
        value => value,
    }
}

fn eval_index_expression(left: Value, index: Value) -> Value {
    match (left, index) {
        (Value::Array(elements), Value::Integer(index)) => {
            // Out of bounds is null, not an error.
            if index < 0 || index as usize >= elements.len() {
                Value::Null
            } else {
                elements[index as usize].clone()
            }
        }
        (Value::Hash(pairs), index) => match index.hash_key() {
            Some(key) => pairs
                .get(&key)
                .map(|pair| pair.value.clone())
                .unwrap_or(Value::Null),
            None => Value::Error(format!("unusable as hash key: {}", index.kind())),
        },
        (left, _) => Value::Error(format!("index operator not supported: {}", left.kind())),
    }
}

/// Pairs evaluate in source order, key before value, so the first failure
/// wins.
fn eval_hash_literal(pairs: &[(Expression, Expression)], env: &Rc<RefCell<Env>>) -> Value {
    let mut hash = HashMap::new();

    for (key_expression, value_expression) in pairs {
        let key = eval_expression(key_expression, env);
        if key.is_error() {
            return key;
        }

        let hash_key = match key.hash_key() {
            Some(hash_key) => hash_key,
            None => return Value::Error(format!("unusable as hash key: {}", key.kind())),
        };

        let value = eval_expression(value_expression, env);
        if value.is_error() {
            return value;
        }

        hash.insert(hash_key, HashPair { key, value });
    }

    Value::Hash(hash)
}

// =====================
// quote / unquote
// =====================

/// The `quote` special form. Its argument is not evaluated; every
/// `unquote(inner)` call inside it is replaced by the AST form of `inner`'s
/// value, and the rewritten fragment is wrapped in [`Value::Quote`].
fn eval_quote(arguments: &[Expression], env: &Rc<RefCell<Env>>) -> Value {
    if arguments.len() != 1 {
        return Value::Error(format!(
            "wrong number of arguments. got={}, want=1",
            arguments.len()
        ));
    }

    let node = eval_unquote_calls(arguments[0].clone(), env);
    Value::Quote(node)
}

fn eval_unquote_calls(quoted: Expression, env: &Rc<RefCell<Env>>) -> Expression {
    ast::modify_expression(quoted, &mut |node| {
        let argument = match unquote_argument(&node) {
            Some(argument) => argument.clone(),
            None => return node,
        };

        value_to_expression(eval_expression(&argument, env))
    })
}

/// When `node` is a call of the form `unquote(x)`, return `x`.
fn unquote_argument(node: &Expression) -> Option<&Expression> {
    let (function, arguments) = match node {
        Expression::Call {
            function,
            arguments,
        } => (function, arguments),
        _ => return None,
    };

    match function.as_ref() {
        Expression::Identifier(name) if name == "unquote" && arguments.len() == 1 => {
            Some(&arguments[0])
        }
        _ => None,
    }
}

/// Turn an evaluation result back into source form for splicing into a
/// quoted fragment. Only kinds with a literal syntax (and quoted fragments
/// themselves) convert; anything else has no tree form and aborts expansion.
fn value_to_expression(value: Value) -> Expression {
    match value {
        Value::Integer(value) => Expression::Integer(value),
        Value::Boolean(value) => Expression::Boolean(value),
        Value::String(value) => Expression::String(value),
        Value::Quote(node) => node,
        other => panic!("cannot convert {} into an expression node", other.kind()),
    }
}
