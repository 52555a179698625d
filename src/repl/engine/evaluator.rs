//! REPL Evaluation Engine
//!
//! Runs one unit of input against the persistent context and encodes the
//! value the way the loop reports it.

use std::borrow::Cow;
use std::time::Instant;

use tracing::{debug, trace};

use super::context::Context;
use crate::frontend::parse_source;
use crate::frontend::parser::ParseError;
use crate::repl::backend_trait::{EvalResult, ExecutionStats, REPLBackend, SymbolInfo};
use crate::runtime::interpreter::{EvaluationError, Interpreter, DEFAULT_MAX_CALL_DEPTH};
use crate::runtime::value::{json, Value};
use crate::std::Globals;

/// Trim a unit and wrap a leading `{` in parentheses so that it reads as
/// an object literal rather than a block
pub fn normalize(input: &str) -> Cow<'_, str> {
    let trimmed = input.trim();
    if trimmed.starts_with('{') {
        Cow::Owned(format!("({trimmed})"))
    } else {
        Cow::Borrowed(trimmed)
    }
}

/// Point the position of an error in a wrapped unit back at the unit as
/// typed; reaching the closing parenthesis at `close` means the unit ended
/// early
fn unwrap_positions(
    mut error: EvaluationError,
    close: usize,
) -> EvaluationError {
    let position = match &mut error {
        EvaluationError::Lex(e) => Some(e.position_mut()),
        EvaluationError::Parse(e) => e.position_mut(),
        EvaluationError::Runtime(_) => None,
    };
    let Some(position) = position else {
        return error;
    };
    if position.offset >= close {
        return ParseError::UnexpectedEof.into();
    }
    position.offset = position.offset.saturating_sub(1);
    if position.line == 1 {
        position.column = position.column.saturating_sub(1).max(1);
    }
    error
}

/// Evaluation Engine
#[derive(Debug)]
pub struct Evaluator {
    /// Bindings shared by every evaluation
    context: Context,
    /// Native globals
    globals: Globals,
    max_call_depth: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Create an evaluator with an empty context
    pub fn new() -> Self {
        Self {
            context: Context::new(),
            globals: Globals::new(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    /// Set the call depth limit
    pub fn with_max_call_depth(
        mut self,
        max_call_depth: usize,
    ) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    /// The persistent context
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Normalize and run `code`, returning the completion value
    pub fn evaluate(
        &mut self,
        code: &str,
    ) -> Result<Value, EvaluationError> {
        let code = normalize(code);
        trace!("normalized input: {}", code);

        let program = match &code {
            Cow::Owned(wrapped) => {
                parse_source(wrapped).map_err(|e| unwrap_positions(e, wrapped.len() - 1))?
            }
            Cow::Borrowed(text) => parse_source(text)?,
        };
        let mut interpreter = Interpreter::new(&mut self.context, &self.globals)
            .with_max_depth(self.max_call_depth);
        Ok(interpreter.run(&program)?)
    }

    /// Encode a value: `null`/`undefined` and values without a JSON form
    /// are nil, everything else is its `JSON.stringify` text
    pub fn encode(value: &Value) -> EvalResult {
        if value.is_nullish() {
            return EvalResult::Nil;
        }
        match json::stringify(value) {
            Ok(Some(text)) => EvalResult::Value(text),
            Ok(None) => EvalResult::Nil,
            Err(e) => EvalResult::Error(e.to_string()),
        }
    }
}

impl REPLBackend for Evaluator {
    fn eval(
        &mut self,
        code: &str,
    ) -> EvalResult {
        let start = Instant::now();
        let result = match self.evaluate(code) {
            Ok(value) => Self::encode(&value),
            Err(e) => EvalResult::Error(e.to_string()),
        };
        let failed = matches!(result, EvalResult::Error(_));
        let elapsed = start.elapsed();
        self.context.increment_eval(elapsed, failed);
        debug!("evaluated {:?} in {:?} (failed: {})", code, elapsed, failed);
        result
    }

    fn get_symbols(&self) -> Vec<SymbolInfo> {
        self.context.get_all_symbols()
    }

    fn clear(&mut self) {
        self.context.clear();
    }

    fn stats(&self) -> ExecutionStats {
        self.context.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(json: &str) -> EvalResult {
        EvalResult::Value(json.to_string())
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  1 + 1 \n"), "1 + 1");
        assert_eq!(normalize("{a: 1}"), "({a: 1})");
        assert_eq!(normalize("  {}"), "({})");
        assert_eq!(normalize("x = {a: 1}"), "x = {a: 1}");
    }

    #[test]
    fn test_object_literal_line() {
        let mut evaluator = Evaluator::new();
        assert_eq!(evaluator.eval("{a: 1}"), value(r#"{"a":1}"#));
        assert_eq!(evaluator.eval("{}"), value("{}"));
    }

    #[test]
    fn test_nil_results() {
        let mut evaluator = Evaluator::new();
        assert_eq!(evaluator.eval("null"), EvalResult::Nil);
        assert_eq!(evaluator.eval("undefined"), EvalResult::Nil);
        assert_eq!(evaluator.eval("let a = 1"), EvalResult::Nil);
        assert_eq!(evaluator.eval("() => 1"), EvalResult::Nil);
    }

    #[test]
    fn test_values() {
        let mut evaluator = Evaluator::new();
        assert_eq!(evaluator.eval("'use strict'; 1 + 2"), value("3"));
        assert_eq!(evaluator.eval("'hi'"), value(r#""hi""#));
        assert_eq!(evaluator.eval("[1, 'a', null]"), value(r#"[1,"a",null]"#));
        assert_eq!(evaluator.eval("false"), value("false"));
    }

    #[test]
    fn test_wrapped_unit_errors_point_at_the_input() {
        let mut evaluator = Evaluator::new();
        let error = |evaluator: &mut Evaluator, code: &str| match evaluator.eval(code) {
            EvalResult::Error(message) => message,
            other => panic!("expected an error for {code:?}, got {other:?}"),
        };
        assert_eq!(error(&mut evaluator, "{a:"), "unexpected end of input");
        assert_eq!(error(&mut evaluator, "{a: 1"), "unexpected end of input");
        assert_eq!(error(&mut evaluator, "{"), "unexpected end of input");
        let message = error(&mut evaluator, "{a: 1 +* 2}");
        assert!(message.ends_with("at 1:8"), "{message}");
        let message = error(&mut evaluator, "{a: 'open");
        assert_eq!(message, "unterminated string literal at 1:5");
        // unwrapped units are reported as they are
        let message = error(&mut evaluator, "x = 1 +* 2");
        assert!(message.ends_with("at 1:8"), "{message}");
    }

    #[test]
    fn test_deep_unit_is_an_error() {
        std::thread::Builder::new()
            .stack_size(32 << 20)
            .spawn(|| {
                let mut evaluator = Evaluator::new();
                let result = evaluator.eval(&"[".repeat(200_000));
                assert!(
                    matches!(&result, EvalResult::Error(m) if m.starts_with("nesting too deep")),
                    "{result:?}"
                );
                assert_eq!(evaluator.eval("1 + 1"), value("2"));
            })
            .unwrap()
            .join()
            .unwrap();
    }

    #[test]
    fn test_large_numbers_render_like_string_conversion() {
        let mut evaluator = Evaluator::new();
        assert_eq!(evaluator.eval("2 ** 64"), value("18446744073709552000"));
        assert_eq!(evaluator.eval("String(2 ** 64)"), value(r#""18446744073709552000""#));
        assert_eq!(evaluator.eval("1e21"), value("1e+21"));
    }

    #[test]
    fn test_errors_and_stats() {
        let mut evaluator = Evaluator::new();
        assert_eq!(
            evaluator.eval("y"),
            EvalResult::Error("y is not defined".to_string())
        );
        assert_eq!(evaluator.eval("x = 5"), value("5"));
        assert_eq!(evaluator.eval("x + 1"), value("6"));

        let stats = evaluator.stats();
        assert_eq!(stats.eval_count, 3);
        assert_eq!(stats.error_count, 1);
    }

    #[test]
    fn test_circular_value_is_an_error() {
        let mut evaluator = Evaluator::new();
        assert_eq!(
            evaluator.eval("const o = {}; o.self = o; o"),
            EvalResult::Error("converting circular structure to JSON".to_string())
        );
    }

    #[test]
    fn test_call_depth_limit() {
        let mut evaluator = Evaluator::new().with_max_call_depth(20);
        evaluator.eval("function r() { return r() }");
        assert_eq!(
            evaluator.eval("r()"),
            EvalResult::Error("maximum call stack size exceeded".to_string())
        );
    }

    #[test]
    fn test_symbols_and_clear() {
        let mut evaluator = Evaluator::new();
        evaluator.eval("let a = 1; function f() {}");
        let names: Vec<_> = evaluator.get_symbols().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["a", "f"]);
        evaluator.clear();
        assert!(evaluator.get_symbols().is_empty());
    }
}
