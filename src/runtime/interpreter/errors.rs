//! Interpreter errors

use crate::frontend::lexer::LexError;
use crate::frontend::parser::ParseError;

/// Error thrown while executing a program
///
/// The `Display` text is the message reported to the user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    #[error("{name} is not defined")]
    NotDefined { name: String },

    #[error("{callee} is not a function")]
    NotAFunction { callee: String },

    #[error("{what} is not iterable")]
    NotIterable { what: String },

    #[error("cannot read properties of {target} (reading '{key}')")]
    ReadOfNullish { target: &'static str, key: String },

    #[error("cannot set properties of {target} (setting '{key}')")]
    WriteToNullish { target: &'static str, key: String },

    #[error("cannot create property '{key}' on {type_name} '{value}'")]
    PrimitiveProperty {
        key: String,
        type_name: &'static str,
        value: String,
    },

    #[error("cannot create property '{key}' on array")]
    ArrayProperty { key: String },

    #[error("assignment to constant variable '{name}'")]
    ConstAssignment { name: String },

    #[error("converting circular structure to JSON")]
    CircularStructure,

    #[error("maximum call stack size exceeded")]
    StackOverflow,

    #[error("{0}")]
    Range(String),

    #[error("{0}")]
    Type(String),

    #[error("invalid JSON: {0}")]
    Json(String),
}

/// Any failure while evaluating one unit of input
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
