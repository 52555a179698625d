//! Parser module
//!
//! This module implements a Pratt Parser for the evaluated JavaScript subset.
//! Expressions go through the nud/led tables; statements are parsed by
//! recursive descent on top of the same token stream.

pub mod ast;
mod expr;
mod led;
mod nud;
mod state;
mod stmt;

pub use state::{ParserState, BP_LOWEST, MAX_NESTING_DEPTH};

use crate::frontend::lexer::tokens::*;
use crate::util::span::Position;
use ast::*;

/// Result type used throughout the parser
pub type PResult<T> = Result<T, ParseError>;

/// Parse tokens into a program
///
/// # Arguments
/// * `tokens` - Token stream from the lexer, terminated by `Eof`
///
/// # Returns
/// Parsed program or the first parse error
pub fn parse(tokens: &[Token]) -> PResult<Program> {
    let mut state = ParserState::new(tokens);
    state.parse_program()
}

/// Parse a single expression, rejecting trailing tokens
pub fn parse_expression(tokens: &[Token]) -> PResult<Expr> {
    let mut state = ParserState::new(tokens);
    let expr = state.parse_expression(BP_LOWEST)?;
    if !state.at_end() {
        return Err(state.unexpected());
    }
    Ok(expr)
}

/// Parse error types
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected token '{found}' at {position}")]
    UnexpectedToken { found: TokenKind, position: Position },

    #[error("expected '{expected}' but found '{found}' at {position}")]
    ExpectedToken {
        expected: TokenKind,
        found: TokenKind,
        position: Position,
    },

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("invalid assignment target at {position}")]
    InvalidAssignmentTarget { position: Position },

    #[error("missing initializer in const declaration of '{name}'")]
    MissingInitializer { name: String },

    #[error("illegal {keyword} statement at {position}")]
    IllegalStatement {
        keyword: &'static str,
        position: Position,
    },

    #[error("rest parameter must be last at {position}")]
    RestNotLast { position: Position },

    #[error("nesting too deep at {position}")]
    NestingTooDeep { position: Position },
}

impl ParseError {
    /// Position the error points at, if it has one
    pub fn position_mut(&mut self) -> Option<&mut Position> {
        match self {
            Self::UnexpectedToken { position, .. }
            | Self::ExpectedToken { position, .. }
            | Self::InvalidAssignmentTarget { position }
            | Self::IllegalStatement { position, .. }
            | Self::RestNotLast { position }
            | Self::NestingTooDeep { position } => Some(position),
            Self::UnexpectedEof | Self::MissingInitializer { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests;
