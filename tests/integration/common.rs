//! Shared helpers

use remeval::util::config::ReplConfig;

/// Feed `input` through the loop and return its output lines
pub fn run_lines_with(
    input: &str,
    config: &ReplConfig,
) -> Vec<String> {
    let mut out = Vec::new();
    remeval::run_loop(config, input.as_bytes(), &mut out).unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

pub fn run_lines(input: &str) -> Vec<String> {
    run_lines_with(input, &ReplConfig::default())
}

/// Decode a `{"result":...}` line into the JSON value it carries
pub fn result_value(line: &str) -> serde_json::Value {
    let outer: serde_json::Value = serde_json::from_str(line).unwrap();
    let payload = outer["result"].as_str().unwrap();
    serde_json::from_str(payload).unwrap()
}
