//! Structural AST rewriting.
//!
//! [`modify_program`] and friends walk the tree bottom-up: child positions
//! are rewritten first, then the node itself is offered to the caller's
//! rewriter. This is the only traversal mechanism in the crate; both
//! quote/unquote substitution and macro expansion are built on it.

use crate::ast::{Block, Expression, Program, Statement};

/// Rewriter applied to every expression node during a traversal. Returning
/// the input unchanged leaves that node alone.
pub type Rewriter<'a> = dyn FnMut(Expression) -> Expression + 'a;

/// Rewrite every expression in a program, bottom-up.
pub fn modify_program(program: Program, rewriter: &mut Rewriter) -> Program {
    Program {
        statements: program
            .statements
            .into_iter()
            .map(|statement| modify_statement(statement, rewriter))
            .collect(),
    }
}

/// Rewrite every expression under a statement.
pub fn modify_statement(statement: Statement, rewriter: &mut Rewriter) -> Statement {
    match statement {
        Statement::Let { name, value } => Statement::Let {
            name,
            value: modify_expression(value, rewriter),
        },
        Statement::Return(value) => Statement::Return(modify_expression(value, rewriter)),
        Statement::Expression(value) => Statement::Expression(modify_expression(value, rewriter)),
        Statement::Block(block) => Statement::Block(modify_block(block, rewriter)),
    }
}

/// Rewrite every expression under a block.
pub fn modify_block(block: Block, rewriter: &mut Rewriter) -> Block {
    Block {
        statements: block
            .statements
            .into_iter()
            .map(|statement| modify_statement(statement, rewriter))
            .collect(),
    }
}

/// Rewrite an expression: children first, then the node itself.
///
/// Hash literal pairs are rebuilt wholesale since rewriting may change key
/// identity.
pub fn modify_expression(expression: Expression, rewriter: &mut Rewriter) -> Expression {
    let expression = match expression {
        Expression::Prefix { operator, right } => Expression::Prefix {
            operator,
            right: Box::new(modify_expression(*right, rewriter)),
        },
        Expression::Infix {
            operator,
            left,
            right,
        } => Expression::Infix {
            operator,
            left: Box::new(modify_expression(*left, rewriter)),
            right: Box::new(modify_expression(*right, rewriter)),
        },
        Expression::Index { left, index } => Expression::Index {
            left: Box::new(modify_expression(*left, rewriter)),
            index: Box::new(modify_expression(*index, rewriter)),
        },
        Expression::If {
            condition,
            consequence,
            alternative,
        } => Expression::If {
            condition: Box::new(modify_expression(*condition, rewriter)),
            consequence: modify_block(consequence, rewriter),
            alternative: alternative.map(|block| modify_block(block, rewriter)),
        },
        Expression::Function { parameters, body } => Expression::Function {
            parameters,
            body: modify_block(body, rewriter),
        },
        Expression::Macro { parameters, body } => Expression::Macro {
            parameters,
            body: modify_block(body, rewriter),
        },
        Expression::Call {
            function,
            arguments,
        } => Expression::Call {
            function: Box::new(modify_expression(*function, rewriter)),
            arguments: arguments
                .into_iter()
                .map(|argument| modify_expression(argument, rewriter))
                .collect(),
        },
        Expression::Array(elements) => Expression::Array(
            elements
                .into_iter()
                .map(|element| modify_expression(element, rewriter))
                .collect(),
        ),
        Expression::Hash(pairs) => Expression::Hash(
            pairs
                .into_iter()
                .map(|(key, value)| {
                    (
                        modify_expression(key, rewriter),
                        modify_expression(value, rewriter),
                    )
                })
                .collect(),
        ),
        leaf => leaf,
    };

    rewriter(expression)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::InfixOp;

    fn one() -> Expression {
        Expression::Integer(1)
    }

    fn two() -> Expression {
        Expression::Integer(2)
    }

    fn turn_one_into_two(expression: Expression) -> Expression {
        match expression {
            Expression::Integer(1) => Expression::Integer(2),
            other => other,
        }
    }

    #[test]
    fn test_modify_leaf() {
        let modified = modify_expression(one(), &mut turn_one_into_two);
        assert_eq!(modified, two());
    }

    #[test]
    fn test_modify_program() {
        let program = Program {
            statements: vec![Statement::Expression(one())],
        };
        let modified = modify_program(program, &mut turn_one_into_two);
        assert_eq!(
            modified,
            Program {
                statements: vec![Statement::Expression(two())],
            }
        );
    }

    #[test]
    fn test_modify_nested_expressions() {
        let cases: Vec<(Expression, Expression)> = vec![
            (
                Expression::Infix {
                    operator: InfixOp::Plus,
                    left: Box::new(one()),
                    right: Box::new(two()),
                },
                Expression::Infix {
                    operator: InfixOp::Plus,
                    left: Box::new(two()),
                    right: Box::new(two()),
                },
            ),
            (
                Expression::Prefix {
                    operator: crate::ast::PrefixOp::Minus,
                    right: Box::new(one()),
                },
                Expression::Prefix {
                    operator: crate::ast::PrefixOp::Minus,
                    right: Box::new(two()),
                },
            ),
            (
                Expression::Index {
                    left: Box::new(one()),
                    index: Box::new(one()),
                },
                Expression::Index {
                    left: Box::new(two()),
                    index: Box::new(two()),
                },
            ),
            (
                Expression::Array(vec![one(), one()]),
                Expression::Array(vec![two(), two()]),
            ),
            (
                Expression::Call {
                    function: Box::new(Expression::Identifier("add".to_string())),
                    arguments: vec![one()],
                },
                Expression::Call {
                    function: Box::new(Expression::Identifier("add".to_string())),
                    arguments: vec![two()],
                },
            ),
        ];

        for (input, expected) in cases {
            let modified = modify_expression(input, &mut turn_one_into_two);
            assert_eq!(modified, expected);
        }
    }

    #[test]
    fn test_modify_statements_and_blocks() {
        let program = Program {
            statements: vec![
                Statement::Let {
                    name: "x".to_string(),
                    value: one(),
                },
                Statement::Return(one()),
                Statement::Block(Block {
                    statements: vec![Statement::Expression(one())],
                }),
            ],
        };

        let modified = modify_program(program, &mut turn_one_into_two);

        assert_eq!(
            modified.statements,
            vec![
                Statement::Let {
                    name: "x".to_string(),
                    value: two(),
                },
                Statement::Return(two()),
                Statement::Block(Block {
                    statements: vec![Statement::Expression(two())],
                }),
            ]
        );
    }

    #[test]
    fn test_modify_if_and_function_bodies() {
        let wrap = |expression: Expression| Block {
            statements: vec![Statement::Expression(expression)],
        };

        let input = Expression::If {
            condition: Box::new(one()),
            consequence: wrap(one()),
            alternative: Some(wrap(one())),
        };
        let expected = Expression::If {
            condition: Box::new(two()),
            consequence: wrap(two()),
            alternative: Some(wrap(two())),
        };
        assert_eq!(modify_expression(input, &mut turn_one_into_two), expected);

        let input = Expression::Function {
            parameters: vec!["x".to_string()],
            body: wrap(one()),
        };
        let expected = Expression::Function {
            parameters: vec!["x".to_string()],
            body: wrap(two()),
        };
        assert_eq!(modify_expression(input, &mut turn_one_into_two), expected);
    }

    #[test]
    fn test_modify_hash_rebuilds_pairs() {
        let input = Expression::Hash(vec![(one(), one()), (one(), one())]);
        let modified = modify_expression(input, &mut turn_one_into_two);
        assert_eq!(
            modified,
            Expression::Hash(vec![(two(), two()), (two(), two())])
        );
    }
}
