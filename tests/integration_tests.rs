// tests/integration_tests.rs
//
// End-to-end scenarios driven through the same entry point the binary uses:
// scan, parse, macro-expand, evaluate, then compare display forms.

use sorrel_lang::cli::{check_source, run_source, CliError};
use sorrel_lang::Value;

fn run(input: &str) -> Value {
    run_source(input).unwrap_or_else(|e| panic!("pipeline failed for {:?}: {}", input, e))
}

fn run_display(input: &str) -> String {
    run(input).to_string()
}

// ============================================================================
// Core Scenarios
// ============================================================================

#[test]
fn test_let_and_arithmetic() {
    assert_eq!(run_display("let a = 5; let b = a * 2; b + 1;"), "11");
}

#[test]
fn test_closure_capture() {
    let input = r#"
let newAdder = fn(x) { fn(y) { x + y } };
let addTwo = newAdder(2);
addTwo(3);
"#;
    assert_eq!(run_display(input), "5");
}

#[test]
fn test_nested_return() {
    let input = r#"
if (10 > 1) {
  if (10 > 1) {
    return 10;
  }
  return 1;
}
"#;
    assert_eq!(run_display(input), "10");
}

#[test]
fn test_push_is_persistent() {
    assert_eq!(
        run_display("let arr = [1, 2, 3]; let b = push(arr, 4); len(arr);"),
        "3"
    );
    assert_eq!(
        run_display("let arr = [1, 2, 3]; let b = push(arr, 4); arr;"),
        "[1, 2, 3]"
    );
    assert_eq!(
        run_display("let arr = [1, 2, 3]; let b = push(arr, 4); b;"),
        "[1, 2, 3, 4]"
    );
}

#[test]
fn test_hash_lookups() {
    let setup = r#"let h = {"name": "Sorrel", true: 1, 99: "x"}; "#;

    let test_cases = vec![
        (r#"h["name"]"#, "Sorrel"),
        ("h[true]", "1"),
        ("h[99]", "x"),
        (r#"h["missing"]"#, "null"),
        ("h[fn(x){x}]", "ERROR: unusable as hash key: FUNCTION"),
    ];

    for (lookup, expected) in test_cases {
        let input = format!("{}{}", setup, lookup);
        assert_eq!(run_display(&input), expected, "Failed for {}", lookup);
    }
}

#[test]
fn test_unless_macro_selects_one_branch() {
    let input = r#"
let unless = macro(condition, consequence, alternative) {
    quote(if (!(unquote(condition))) {
        unquote(consequence);
    } else {
        unquote(alternative);
    });
};

unless(10 > 5, "not greater", "greater");
"#;
    assert_eq!(run_display(input), "greater");
}

// ============================================================================
// Boundary Behavior
// ============================================================================

#[test]
fn test_empty_program() {
    assert_eq!(run_display(""), "null");
}

#[test]
fn test_runtime_errors_come_back_as_values() {
    assert_eq!(run_display("5 / 0"), "ERROR: division by zero");
    assert_eq!(
        run_display("1 + true"),
        "ERROR: type mismatch: INTEGER + BOOLEAN"
    );
}

#[test]
fn test_parse_errors_refuse_evaluation() {
    match run_source("let x 5;") {
        Err(CliError::Parse(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(
                errors[0].to_string(),
                "expected next token to be =, got INT instead"
            );
        }
        other => panic!("expected parse failure, got {:?}", other),
    }
}

#[test]
fn test_check_source() {
    assert!(check_source("let x = 5;").is_ok());
    assert!(check_source("let x 5;").is_err());
}

#[test]
fn test_double_negation_preserves_truthiness() {
    let test_cases = vec![
        ("!!true", "true"),
        ("!!false", "false"),
        ("!!0", "true"),
        (r#"!!"""#, "true"),
        ("!!(if (false) { 1 })", "false"),
        ("!![]", "true"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(run_display(input), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_repeated_runs_are_deterministic() {
    let input = r#"
let make = fn(n) { if (n == 0) { [] } else { push(make(n - 1), n) } };
make(5);
"#;
    assert_eq!(run_display(input), run_display(input));
    assert_eq!(run_display(input), "[1, 2, 3, 4, 5]");
}

#[test]
fn test_map_via_builtins() {
    let input = r#"
let map = fn(arr, f) {
    let iter = fn(arr, accumulated) {
        if (len(arr) == 0) {
            accumulated
        } else {
            iter(rest(arr), push(accumulated, f(first(arr))))
        }
    };
    iter(arr, []);
};

let double = fn(x) { x * 2 };
map([1, 2, 3, 4], double);
"#;
    assert_eq!(run_display(input), "[2, 4, 6, 8]");
}
