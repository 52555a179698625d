//! The binary over real pipes

use std::io::Write;
use std::process::{Command, Stdio};

fn run_binary(
    args: &[&str],
    input: &str,
) -> (String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_remeval"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn remeval");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().expect("Failed to collect output");
    assert!(output.status.success(), "exit status {:?}", output.status);
    (
        String::from_utf8(output.stdout).unwrap(),
        String::from_utf8(output.stderr).unwrap(),
    )
}

#[test]
fn test_binary_session() {
    let (stdout, _) = run_binary(&[], "x = 5\nx + 1\n\nenv\ny\n");
    assert_eq!(
        stdout,
        "{\"result\":\"5\"}\n{\"result\":\"6\"}\n[\"x\"]\n{\"error\":\"y is not defined\"}\n"
    );
}

#[test]
fn test_binary_echo_input_flag() {
    let (stdout, _) = run_binary(&["--echo-input"], "y\n");
    assert_eq!(stdout, "{\"error\":\"y is not defined\",\"input\":\"y\"}\n");
}

#[test]
fn test_binary_console_goes_to_stderr() {
    let (stdout, stderr) = run_binary(&["--log-level", "info"], "console.log('side')\n");
    assert_eq!(stdout, "{\"result\":\"nil\"}\n");
    assert!(stderr.contains("side"), "stderr: {stderr}");
}

#[test]
fn test_binary_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "(echo_input: true)").unwrap();
    let path = file.path().to_str().unwrap().to_string();
    let (stdout, _) = run_binary(&["--config", &path], "nope\n");
    assert_eq!(stdout, "{\"error\":\"nope is not defined\",\"input\":\"nope\"}\n");
}

#[test]
fn test_binary_rejects_bad_config() {
    let output = Command::new(env!("CARGO_BIN_EXE_remeval"))
        .args(["--chunk-size", "0"])
        .stdin(Stdio::null())
        .output()
        .expect("Failed to run remeval");
    assert!(!output.status.success());
}

#[test]
fn test_binary_survives_deep_input() {
    let input = format!("{}\n{}1\n1 + 1\n", "[".repeat(200_000), "-".repeat(300_000));
    let (stdout, _) = run_binary(&[], &input);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with(r#"{"error":"nesting too deep"#), "{}", lines[0]);
    assert!(lines[1].starts_with(r#"{"error":"nesting too deep"#), "{}", lines[1]);
    assert_eq!(lines[2], r#"{"result":"2"}"#);
}
