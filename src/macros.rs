//! Macro definition and expansion.
//!
//! This pass sits between the parser and the evaluator and works entirely at
//! the AST level: [`define_macros`] pulls macro definitions out of the
//! program into a dedicated macro environment, and [`expand_macros`] rewrites
//! every call to a defined macro with the tree its body produces. The macro
//! environment is disjoint from the evaluation environment; macro names never
//! leak into runtime scope.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::ast::{self, Expression, Program, Statement};
use crate::environment::Env;
use crate::evaluator;
use crate::value::{MacroValue, Value};

/// Collect every top-level `let <name> = macro(...) { ... }` statement into
/// `env` and strip it from the program. Only top-level definitions are
/// recognized; a macro literal anywhere else is not hoisted.
pub fn define_macros(program: &mut Program, env: &Rc<RefCell<Env>>) {
    let mut definitions = Vec::new();

    for (index, statement) in program.statements.iter().enumerate() {
        let (name, parameters, body) = match statement {
            Statement::Let {
                name,
                value: Expression::Macro { parameters, body },
            } => (name, parameters, body),
            _ => continue,
        };

        let macro_value = Value::Macro(Rc::new(MacroValue {
            parameters: parameters.clone(),
            body: body.clone(),
            env: Rc::clone(env),
        }));
        env.borrow_mut().set(name.clone(), macro_value);
        definitions.push(index);
    }

    // Remove from the back so earlier indices stay valid.
    for index in definitions.into_iter().rev() {
        program.statements.remove(index);
    }
}

/// Rewrite every call whose callee names a defined macro.
///
/// Arguments reach the macro unevaluated, each wrapped as a quoted fragment
/// and bound to the matching parameter in a frame enclosed by the macro's
/// captured environment. The body must produce a quoted fragment, which
/// replaces the call site. Returning anything else is a programmer error and
/// aborts expansion.
pub fn expand_macros(program: Program, env: &Rc<RefCell<Env>>) -> Program {
    ast::modify_program(program, &mut |node| {
        let call = match &node {
            Expression::Call {
                function,
                arguments,
            } => match function.as_ref() {
                Expression::Identifier(name) => Some((name.clone(), arguments.clone())),
                _ => None,
            },
            _ => None,
        };

        let (name, arguments) = match call {
            Some(call) => call,
            None => return node,
        };

        let macro_value = match env.borrow().get(&name) {
            Some(Value::Macro(macro_value)) => macro_value,
            _ => return node,
        };

        debug!("expanding macro {} ({} arguments)", name, arguments.len());

        if arguments.len() != macro_value.parameters.len() {
            panic!(
                "macro {} expects {} arguments, got {}",
                name,
                macro_value.parameters.len(),
                arguments.len()
            );
        }

        let expand_env = Env::new_enclosed(Rc::clone(&macro_value.env));
        for (parameter, argument) in macro_value.parameters.iter().zip(arguments) {
            expand_env
                .borrow_mut()
                .set(parameter.clone(), Value::Quote(argument));
        }

        match evaluator::eval_block(&macro_value.body, &expand_env) {
            Value::Quote(node) => node,
            other => panic!(
                "macro {} must return a quoted expression, got {}",
                name,
                other.kind()
            ),
        }
    })
}
