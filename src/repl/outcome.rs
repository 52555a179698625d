//! Output line encoding

use serde::Serialize;

use super::backend_trait::EvalResult;

/// Literal result reported for `null`/`undefined`
pub const NIL: &str = "nil";

/// One line of loop output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome<'a> {
    /// `{"result":"<json>"}` or `{"result":"nil"}`
    Result { result: &'a str },
    /// `{"error":"<message>"}`, with the input echoed back on request
    Error {
        error: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        input: Option<&'a str>,
    },
    /// Bare array of bound names, the answer to `env`
    Names(&'a [String]),
}

impl<'a> Outcome<'a> {
    /// Outcome of one evaluation
    ///
    /// `input` is the unit as read (trimmed, before normalization); it is
    /// attached to errors only when `echo_input` is set.
    pub fn from_eval(
        result: &'a EvalResult,
        input: &'a str,
        echo_input: bool,
    ) -> Self {
        match result {
            EvalResult::Value(json) => Outcome::Result { result: json },
            EvalResult::Nil => Outcome::Result { result: NIL },
            EvalResult::Error(message) => Outcome::Error {
                error: message,
                input: echo_input.then_some(input),
            },
        }
    }

    /// Encode as a single JSON line (without the newline)
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
