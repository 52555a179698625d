//! Parser state and token stream management

use super::super::lexer::tokens::*;
use super::{PResult, ParseError};
use crate::util::span::{Position, Span};

/// Binding power levels for Pratt parser
pub const BP_LOWEST: u8 = 0;
pub const BP_ASSIGN: u8 = 10;
pub const BP_TERNARY: u8 = 15;
pub const BP_NULLISH: u8 = 18;
pub const BP_OR: u8 = 20;
pub const BP_AND: u8 = 30;
pub const BP_EQ: u8 = 40;
pub const BP_CMP: u8 = 50;
pub const BP_ADD: u8 = 60;
pub const BP_MUL: u8 = 70;
pub const BP_EXP: u8 = 75;
pub const BP_UNARY: u8 = 80;
pub const BP_POSTFIX: u8 = 85;
pub const BP_CALL: u8 = 90;

/// Deepest syntax tree the parser builds; deeper input is rejected before
/// it can exhaust the stack of the parser or the evaluator
pub const MAX_NESTING_DEPTH: usize = 1000;

static EOF: Token = Token {
    kind: TokenKind::Eof,
    span: Span {
        start: Position {
            line: 1,
            column: 1,
            offset: 0,
        },
        end: Position {
            line: 1,
            column: 1,
            offset: 0,
        },
    },
};

/// Parser state for tracking position and statement context
#[derive(Debug)]
pub struct ParserState<'a> {
    /// Token stream
    tokens: &'a [Token],
    /// Current position in token stream
    pos: usize,
    /// Nesting of function bodies, `return` is legal when non-zero
    pub(super) function_depth: usize,
    /// Nesting of loops in the current function, `break`/`continue` need it
    pub(super) loop_depth: usize,
    /// Depth of the syntax tree being built
    pub(super) nesting: usize,
}

impl<'a> ParserState<'a> {
    /// Create a new parser state
    #[inline]
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            function_depth: 0,
            loop_depth: 0,
            nesting: 0,
        }
    }

    /// Check if at end of token stream
    #[inline]
    pub fn at_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    /// Get current token
    #[inline]
    pub fn current(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .unwrap_or(&EOF)
    }

    /// Get current token kind
    #[inline]
    pub fn kind(&self) -> &TokenKind {
        &self.current().kind
    }

    /// Check current token kind
    #[inline]
    pub fn at(
        &self,
        kind: &TokenKind,
    ) -> bool {
        self.kind() == kind
    }

    /// Peek at nth token ahead
    #[inline]
    pub fn peek_nth(
        &self,
        n: usize,
    ) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    /// Current token span
    #[inline]
    pub fn span(&self) -> Span {
        self.current().span
    }

    /// Span of the most recently consumed token
    #[inline]
    pub fn prev_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span)
            .unwrap_or_else(|| self.span())
    }

    /// Advance to next token
    #[inline]
    pub fn bump(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    /// Skip a specific token
    #[inline]
    pub fn skip(
        &mut self,
        kind: &TokenKind,
    ) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Expect a specific token
    pub fn expect(
        &mut self,
        kind: &TokenKind,
    ) -> PResult<Span> {
        if self.at(kind) {
            let span = self.span();
            self.bump();
            return Ok(span);
        }
        if self.at_end() {
            return Err(ParseError::UnexpectedEof);
        }
        Err(ParseError::ExpectedToken {
            expected: kind.clone(),
            found: self.kind().clone(),
            position: self.span().start,
        })
    }

    /// Expect an identifier and return its name
    pub fn expect_identifier(&mut self) -> PResult<(String, Span)> {
        match self.kind() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                let span = self.span();
                self.bump();
                Ok((name, span))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Go one level deeper into the syntax tree
    ///
    /// Callers save `nesting` before and restore it afterwards, on success
    /// and on error alike.
    pub fn enter(&mut self) -> PResult<()> {
        if self.nesting >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                position: self.span().start,
            });
        }
        self.nesting += 1;
        Ok(())
    }

    /// Error for the current token
    pub fn unexpected(&self) -> ParseError {
        if self.at_end() {
            ParseError::UnexpectedEof
        } else {
            ParseError::UnexpectedToken {
                found: self.kind().clone(),
                position: self.span().start,
            }
        }
    }

    /// Whether a line break separates the current token from the previous one
    #[inline]
    pub fn newline_before(&self) -> bool {
        self.pos > 0 && self.span().start.line > self.prev_span().end.line
    }

    /// Statement terminator with automatic semicolon insertion
    pub fn consume_semicolon(&mut self) -> PResult<()> {
        if self.skip(&TokenKind::Semicolon)
            || self.at(&TokenKind::RBrace)
            || self.at_end()
            || self.newline_before()
        {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Whether the `(` at the current position opens an arrow parameter list
    pub fn at_arrow_params(&self) -> bool {
        let mut depth = 0usize;
        let mut i = self.pos;
        while let Some(token) = self.tokens.get(i) {
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return matches!(
                            self.tokens.get(i + 1).map(|t| &t.kind),
                            Some(TokenKind::FatArrow)
                        );
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            i += 1;
        }
        false
    }
}
