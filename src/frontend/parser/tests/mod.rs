//! Parser tests module

mod depth;
mod fuzz;

use crate::frontend::lexer::tokenize;
use crate::frontend::parser::ast::*;
use crate::frontend::parser::{parse, parse_expression, ParseError};

/// Tokenize and parse a full program
pub(crate) fn program(source: &str) -> Result<Program, ParseError> {
    let tokens = tokenize(source).expect("lexing failed");
    parse(&tokens)
}

/// Tokenize and parse a single expression
pub(crate) fn expr(source: &str) -> Expr {
    let tokens = tokenize(source).expect("lexing failed");
    parse_expression(&tokens).expect("parsing failed")
}

/// Parse error message for a program
pub(crate) fn error(source: &str) -> String {
    match program(source) {
        Ok(p) => panic!("expected a parse error for {source:?}, got {p:?}"),
        Err(e) => e.to_string(),
    }
}
