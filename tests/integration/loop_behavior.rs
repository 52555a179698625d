//! Line handling: trimming, empty lines, `env`, framing

use remeval::util::config::{Framing, ReplConfig};

use crate::common::{run_lines, run_lines_with};

#[test]
fn test_one_line_per_non_empty_input() {
    let lines = run_lines("1\n\n  \n2\n");
    assert_eq!(lines, [r#"{"result":"1"}"#, r#"{"result":"2"}"#]);
}

#[test]
fn test_surrounding_whitespace_is_ignored() {
    assert_eq!(run_lines("\t  40 + 2   \n"), [r#"{"result":"42"}"#]);
}

#[test]
fn test_env_reports_names_in_binding_order() {
    let lines = run_lines("env\nb = 1\nlet a = 2\nfunction f() {}\nenv\n");
    assert_eq!(lines[0], "[]");
    assert_eq!(lines[4], r#"["b","a","f"]"#);
}

#[test]
fn test_env_is_not_an_identifier() {
    // a binding called `env` does not change what the command does
    let lines = run_lines("env = 3\nenv\nenv + 1\n");
    assert_eq!(lines, [r#"{"result":"3"}"#, r#"["env"]"#, r#"{"result":"4"}"#]);
}

#[test]
fn test_object_literal_lines() {
    let lines = run_lines("{a: 1}\n{a: 1, b: [true, null]}\n{}\n");
    assert_eq!(
        lines,
        [
            r#"{"result":"{\"a\":1}"}"#,
            r#"{"result":"{\"a\":1,\"b\":[true,null]}"}"#,
            r#"{"result":"{}"}"#,
        ]
    );
}

#[test]
fn test_echo_input_on_errors() {
    let config = ReplConfig {
        echo_input: true,
        ..ReplConfig::default()
    };
    let lines = run_lines_with("nope\n", &config);
    assert_eq!(lines, [r#"{"error":"nope is not defined","input":"nope"}"#]);
}

#[test]
fn test_chunk_framing() {
    let config = ReplConfig {
        framing: Framing::Chunk,
        ..ReplConfig::default()
    };
    // a slice reader returns everything in one read: one unit
    let lines = run_lines_with("1;\n2\n", &config);
    assert_eq!(lines, [r#"{"result":"2"}"#]);
}
