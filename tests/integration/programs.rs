//! Lines shaped like the ones a Lisp-to-JavaScript transpiler emits

use serde_json::json;

use crate::common::{result_value, run_lines};

#[test]
fn test_iife_with_let_and_while() {
    let lines = run_lines(
        "(() => { let acc = []; let i = 0; while (i < 4) { acc.push(i * i); i += 1 } return acc })()\n",
    );
    assert_eq!(result_value(&lines[0]), json!([0, 1, 4, 9]));
}

#[test]
fn test_stdlib_style_definitions() {
    let input = "\
const map = (f, xs) => xs.map(x => f(x))
const filter = (f, xs) => xs.filter(x => f(x))
const reduce = (f, init, xs) => xs.reduce((a, b) => f(a, b), init)
reduce((a, b) => a + b, 0, filter(x => x % 2 === 0, map(x => x * 3, [1, 2, 3, 4])))
";
    let lines = run_lines(input);
    assert_eq!(lines.len(), 4);
    assert_eq!(result_value(&lines[3]), json!(18));
}

#[test]
fn test_nested_ternaries_and_spread() {
    let input = "\
function classify(n) { return n < 0 ? 'neg' : n === 0 ? 'zero' : 'pos' }
[...[-1, 0, 1].map(classify), classify(5)]
";
    let lines = run_lines(input);
    assert_eq!(result_value(&lines[1]), json!(["neg", "zero", "pos", "pos"]));
}

#[test]
fn test_objects_and_json() {
    let input = "\
let user = { name: 'ada', tags: ['x'] }
user.tags.push('y'); user
JSON.stringify(Object.keys(user))
";
    let lines = run_lines(input);
    assert_eq!(result_value(&lines[1]), json!({"name": "ada", "tags": ["x", "y"]}));
    assert_eq!(result_value(&lines[2]), json!(r#"["name","tags"]"#));
}

#[test]
fn test_multiple_statements_on_one_line() {
    let lines = run_lines("let a = 1; let b = 2; a + b\n");
    assert_eq!(lines, [r#"{"result":"3"}"#]);
}

#[test]
fn test_syntax_errors_are_reported() {
    let lines = run_lines("1 +\nlet = 3\n'open\n");
    assert_eq!(lines[0], r#"{"error":"unexpected end of input"}"#);
    assert_eq!(lines[1], r#"{"error":"unexpected token '=' at 1:5"}"#);
    assert_eq!(lines[2], r#"{"error":"unterminated string literal at 1:1"}"#);
}

#[test]
fn test_const_reassignment_is_an_error() {
    let lines = run_lines("const k = 1\nk = 2\nk\n");
    assert_eq!(lines[1], r#"{"error":"assignment to constant variable 'k'"}"#);
    assert_eq!(lines[2], r#"{"result":"1"}"#);
}
