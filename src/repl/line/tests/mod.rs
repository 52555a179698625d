//! Stream loop tests

use std::io::{self, BufReader, Read};

use super::*;
use crate::repl::engine::Evaluator;

fn run_with(
    input: &str,
    config: &ReplConfig,
) -> String {
    let mut line_loop = LineLoop::new(Evaluator::new(), config);
    let mut out = Vec::new();
    line_loop.run(input.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn run(input: &str) -> String {
    run_with(input, &ReplConfig::default())
}

#[test]
fn test_session() {
    let out = run("x = 5\nx + 1\nenv\n");
    assert_eq!(out, "{\"result\":\"5\"}\n{\"result\":\"6\"}\n[\"x\"]\n");
}

#[test]
fn test_empty_lines_produce_nothing() {
    assert_eq!(run("\n   \n\t\n"), "");
    assert_eq!(run(""), "");
}

#[test]
fn test_last_line_without_newline() {
    assert_eq!(run("1 + 1"), "{\"result\":\"2\"}\n");
}

#[test]
fn test_crlf_is_trimmed() {
    assert_eq!(run("'a'\r\n"), "{\"result\":\"\\\"a\\\"\"}\n");
}

#[test]
fn test_errors_do_not_stop_the_loop() {
    let out = run("y\n1\n");
    assert_eq!(out, "{\"error\":\"y is not defined\"}\n{\"result\":\"1\"}\n");
}

#[test]
fn test_echo_input() {
    let config = ReplConfig {
        echo_input: true,
        ..ReplConfig::default()
    };
    assert_eq!(
        run_with("  y  \n", &config),
        "{\"error\":\"y is not defined\",\"input\":\"y\"}\n"
    );
    // results never carry the input
    assert_eq!(run_with("null\n", &config), "{\"result\":\"nil\"}\n");
}

#[test]
fn test_object_literal_line() {
    assert_eq!(run("{a: 1}\n"), "{\"result\":\"{\\\"a\\\":1}\"}\n");
}

#[test]
fn test_env_on_fresh_loop() {
    assert_eq!(run("env\n"), "[]\n");
}

#[test]
fn test_invalid_utf8_is_replaced() {
    let mut line_loop = LineLoop::new(Evaluator::new(), &ReplConfig::default());
    let mut out = Vec::new();
    line_loop.run(&b"'\xff'\n"[..], &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "{\"result\":\"\\\"\u{FFFD}\\\"\"}\n");
}

/// Reader handing out the given pieces one `read` at a time
struct Pieces(Vec<&'static str>);

impl Read for Pieces {
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> io::Result<usize> {
        if self.0.is_empty() {
            return Ok(0);
        }
        let piece = self.0.remove(0).as_bytes();
        let n = piece.len().min(buf.len());
        buf[..n].copy_from_slice(&piece[..n]);
        Ok(n)
    }
}

#[test]
fn test_chunk_framing_one_unit_per_read() {
    let config = ReplConfig {
        framing: Framing::Chunk,
        ..ReplConfig::default()
    };
    let mut line_loop = LineLoop::new(Evaluator::new(), &config);
    let mut out = Vec::new();
    // capacity 1 so every read reaches the underlying reader
    let reader = BufReader::with_capacity(1, Pieces(vec!["let a = 2\n", "  \n", "a * 3\n"]));
    line_loop.run(reader, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "{\"result\":\"nil\"}\n{\"result\":\"6\"}\n"
    );
}

#[test]
fn test_chunk_framing_splits_long_input() {
    let config = ReplConfig {
        framing: Framing::Chunk,
        chunk_size: 4,
        ..ReplConfig::default()
    };
    // "12345" arrives as "1234" then "5"
    let out = run_with("12345", &config);
    assert_eq!(out, "{\"result\":\"1234\"}\n{\"result\":\"5\"}\n");
}

#[test]
fn test_process_unit_reports_output() {
    let mut line_loop = LineLoop::new(Evaluator::new(), &ReplConfig::default());
    let mut out = Vec::new();
    assert!(!line_loop.process_unit("   ", &mut out).unwrap());
    assert!(line_loop.process_unit("1", &mut out).unwrap());
    assert_eq!(line_loop.backend().stats().eval_count, 1);
}

/// Writer that always fails
struct Broken;

impl io::Write for Broken {
    fn write(
        &mut self,
        _: &[u8],
    ) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_write_failure_ends_the_loop() {
    let mut line_loop = LineLoop::new(Evaluator::new(), &ReplConfig::default());
    let err = line_loop.run("1\n".as_bytes(), Broken).unwrap_err();
    assert_eq!(err.to_string(), "writing output");
}
