//! Observable guarantees of the loop

use crate::common::{result_value, run_lines};
use serde_json::json;

#[test]
fn test_persistence_across_lines() {
    let lines = run_lines("x = 5\nx + 1\n");
    assert_eq!(lines, [r#"{"result":"5"}"#, r#"{"result":"6"}"#]);
}

#[test]
fn test_unbound_name_then_continue() {
    let lines = run_lines("missing\n'still here'\n");
    assert_eq!(lines[0], r#"{"error":"missing is not defined"}"#);
    assert_eq!(result_value(&lines[1]), json!("still here"));
}

#[test]
fn test_nil_outcomes() {
    let lines = run_lines("null\nundefined\nlet q = 1\nvoid 0\n(function () {})\n");
    assert!(lines.iter().all(|l| l == r#"{"result":"nil"}"#), "{lines:?}");
    assert_eq!(lines.len(), 5);
}

#[test]
fn test_every_output_is_one_json_object() {
    let input = "1\n'two'\n[3]\n{a: 4}\nbad(\nnope\nnull\n";
    for line in run_lines(input) {
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1, "{line}");
        assert!(object.contains_key("result") || object.contains_key("error"));
    }
}

#[test]
fn test_functions_persist() {
    let lines = run_lines("function square(n) { return n * n }\nsquare(7)\n");
    assert_eq!(lines[1], r#"{"result":"49"}"#);
}

#[test]
fn test_deep_recursion_is_an_error() {
    // run on a big stack, as the binary does
    let lines = std::thread::Builder::new()
        .stack_size(32 * 1024 * 1024)
        .spawn(|| run_lines("function down() { return down() }\ndown()\n1\n"))
        .unwrap()
        .join()
        .unwrap();
    assert_eq!(lines[1], r#"{"error":"maximum call stack size exceeded"}"#);
    assert_eq!(lines[2], r#"{"result":"1"}"#);
}

#[test]
fn test_deeply_nested_input_is_an_error() {
    let input = format!(
        "{}\n{}1\n{}\n1 + 1\n",
        "[".repeat(200_000),
        "-".repeat(300_000),
        vec!["1"; 100_000].join("+"),
    );
    let lines = std::thread::Builder::new()
        .stack_size(32 * 1024 * 1024)
        .spawn(move || run_lines(&input))
        .unwrap()
        .join()
        .unwrap();
    assert_eq!(lines.len(), 4);
    for line in &lines[..3] {
        assert!(line.starts_with(r#"{"error":"nesting too deep at 1:"#), "{line}");
    }
    assert_eq!(lines[3], r#"{"result":"2"}"#);
}

#[test]
fn test_deeply_nested_value_is_an_error() {
    let input = "let a = []; for (let i = 0; i < 1000000; i++) a = [a]; 1\na\nString(a).length\na = 0\n1 + 1\n";
    let lines = std::thread::Builder::new()
        .stack_size(32 * 1024 * 1024)
        .spawn(move || run_lines(input))
        .unwrap()
        .join()
        .unwrap();
    assert_eq!(
        lines,
        [
            r#"{"result":"1"}"#,
            r#"{"error":"maximum call stack size exceeded"}"#,
            r#"{"result":"0"}"#,
            r#"{"result":"0"}"#,
            r#"{"result":"2"}"#,
        ]
    );
}

#[test]
fn test_console_does_not_touch_output() {
    let lines = run_lines("console.log('noise'); 5\n");
    assert_eq!(lines, [r#"{"result":"5"}"#]);
}
