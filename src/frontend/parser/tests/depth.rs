//! Nesting limit tests
//!
//! Input nested past the limit must come back as a parse error instead of
//! overflowing the stack.

use super::*;
use crate::frontend::parser::MAX_NESTING_DEPTH;

/// Run `f` on a thread with room for the deepest accepted tree
fn with_big_stack(f: impl FnOnce() + Send + 'static) {
    std::thread::Builder::new()
        .stack_size(32 << 20)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap();
}

fn is_too_deep(source: &str) -> bool {
    matches!(program(source), Err(ParseError::NestingTooDeep { .. }))
}

#[test]
fn test_deep_brackets_are_rejected() {
    with_big_stack(|| {
        let source = "[".repeat(200_000);
        assert!(is_too_deep(&source));
        let closed = format!("{}{}", "[".repeat(5_000), "]".repeat(5_000));
        assert!(is_too_deep(&closed));
    });
}

#[test]
fn test_deep_prefix_operators_are_rejected() {
    with_big_stack(|| {
        assert!(is_too_deep(&format!("{}1", "-".repeat(300_000))));
        assert!(is_too_deep(&format!("{}1", "!".repeat(300_000))));
        assert!(is_too_deep(&format!("{}1{}", "(".repeat(50_000), ")".repeat(50_000))));
    });
}

#[test]
fn test_long_operator_chains_are_rejected() {
    with_big_stack(|| {
        let sum = vec!["1"; 100_000].join("+");
        assert!(is_too_deep(&sum));
        let access = format!("a{}", ".b".repeat(100_000));
        assert!(is_too_deep(&access));
    });
}

#[test]
fn test_deep_blocks_are_rejected() {
    with_big_stack(|| {
        let source = format!("{}{}", "{".repeat(100_000), "}".repeat(100_000));
        assert!(is_too_deep(&source));
    });
}

#[test]
fn test_moderate_nesting_still_parses() {
    with_big_stack(|| {
        let depth = MAX_NESTING_DEPTH / 4;
        let source = format!("{}1{}", "[".repeat(depth), "]".repeat(depth));
        assert!(program(&source).is_ok());
        assert!(program(&format!("{}1", "-".repeat(depth))).is_ok());
        assert!(program(&vec!["1"; depth].join("+")).is_ok());
    });
}

#[test]
fn test_nesting_error_reports_a_position() {
    with_big_stack(|| {
        let message = error(&"[".repeat(MAX_NESTING_DEPTH * 2));
        assert!(message.starts_with("nesting too deep at 1:"), "{message}");
    });
}
