//! Frontend
//!
//! Source text to tokens to a parsed program.

use tracing::trace;

use crate::runtime::interpreter::EvaluationError;

pub mod lexer;
pub mod parser;

/// Lex and parse a source string
pub fn parse_source(source: &str) -> Result<parser::ast::Program, EvaluationError> {
    let tokens = lexer::tokenize(source)?;
    trace!("tokenized into {} tokens", tokens.len());
    Ok(parser::parse(&tokens)?)
}
