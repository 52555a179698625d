//! Fuzz tests for parser using proptest

use crate::frontend::lexer::{tokenize, TokenKind};
use crate::frontend::parser::{parse, parse_expression};
use proptest::prelude::*;

/// Strategy for generating identifiers that are not keywords
fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,10}".prop_filter("keyword", |s| TokenKind::keyword(s).is_none())
}

/// Strategy for generating valid integers
fn int_literal_strategy() -> impl Strategy<Value = String> {
    "[0-9]{1,10}"
}

/// Strategy for generating valid float literals
fn float_literal_strategy() -> impl Strategy<Value = String> {
    "[0-9]{0,5}\\.[0-9]{1,5}"
}

/// Strategy for generating binary operators
fn bin_op_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("+"),
        Just("-"),
        Just("*"),
        Just("/"),
        Just("%"),
        Just("**"),
        Just("<"),
        Just("<="),
        Just(">"),
        Just(">="),
        Just("=="),
        Just("!=="),
        Just("&&"),
        Just("||"),
        Just("??"),
    ]
}

/// Strategy for generating valid expressions
fn expr_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        identifier_strategy(),
        int_literal_strategy(),
        float_literal_strategy(),
        Just("true".to_string()),
        Just("null".to_string()),
    ];

    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            // Unary operators
            inner.clone().prop_map(|e| format!("-{e}")),
            inner.clone().prop_map(|e| format!("!{e}")),
            // Binary operations
            (inner.clone(), bin_op_strategy(), inner.clone())
                .prop_map(|(l, op, r)| format!("{l} {op} {r}")),
            // Grouping and literals
            inner.clone().prop_map(|e| format!("({e})")),
            inner.clone().prop_map(|e| format!("[{e}]")),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(c, a, b)| format!("{c} ? {a} : {b}")),
        ]
    })
}

/// Strategy for generating valid statements
fn stmt_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (identifier_strategy(), expr_strategy()).prop_map(|(n, e)| format!("let {n} = {e};")),
        (identifier_strategy(), expr_strategy()).prop_map(|(n, e)| format!("{n} = {e};")),
        expr_strategy().prop_map(|e| format!("if ({e}) {{ {e} }}")),
        expr_strategy(),
    ]
}

proptest! {
    /// Generated expressions always parse
    #[test]
    fn test_fuzz_valid_expressions(expr in expr_strategy()) {
        let tokens = tokenize(&expr).unwrap();
        prop_assert!(parse_expression(&tokens).is_ok(), "failed on {}", expr);
    }

    /// Nested parens parse at any reasonable depth
    #[test]
    fn test_nested_parens_depth(depth in 1..64usize) {
        let expr = "(".repeat(depth) + "1" + &")".repeat(depth);
        let tokens = tokenize(&expr).unwrap();
        prop_assert!(parse_expression(&tokens).is_ok());
    }

    /// Unbalanced parens fail without panicking
    #[test]
    fn test_unbalanced_parens(depth in 1..32usize) {
        let expr = "(".repeat(depth) + "1";
        let tokens = tokenize(&expr).unwrap();
        prop_assert!(parse_expression(&tokens).is_err());
    }

    /// Generated programs parse
    #[test]
    fn test_fuzz_programs(stmts in prop::collection::vec(stmt_strategy(), 0..5)) {
        let source = stmts.join("\n");
        let tokens = tokenize(&source).unwrap();
        prop_assert!(parse(&tokens).is_ok(), "failed on {}", source);
    }

    /// Arbitrary input never panics the front end
    #[test]
    fn test_arbitrary_input_does_not_panic(source in "\\PC{0,40}") {
        if let Ok(tokens) = tokenize(&source) {
            let _ = parse(&tokens);
        }
    }
}
