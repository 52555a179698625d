//! Prefix expression parsing (nud - null denotation)

use std::rc::Rc;

use super::super::lexer::tokens::*;
use super::ast::*;
use super::state::*;
use super::{PResult, ParseError};
use crate::runtime::value::number_to_string;
use crate::util::span::Span;

/// Prefix parser entry point
pub(super) type PrefixFn<'a> = fn(&mut ParserState<'a>) -> PResult<Expr>;

impl<'a> ParserState<'a> {
    /// Get the prefix parser for current token
    #[inline]
    pub(crate) fn prefix_fn(&self) -> Option<PrefixFn<'a>> {
        let f: PrefixFn<'a> = match self.kind() {
            // Unary operators
            TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::Not
            | TokenKind::KwTypeof
            | TokenKind::KwVoid => Self::parse_unary,
            TokenKind::PlusPlus | TokenKind::MinusMinus => Self::parse_prefix_update,
            // Literals
            TokenKind::NumberLiteral(_)
            | TokenKind::StringLiteral(_)
            | TokenKind::BoolLiteral(_)
            | TokenKind::KwNull
            | TokenKind::KwUndefined => Self::parse_literal,
            TokenKind::Identifier(_) => Self::parse_identifier,
            TokenKind::KwThis => Self::parse_this,
            // Grouped expression or arrow parameters
            TokenKind::LParen => Self::parse_paren,
            TokenKind::LBracket => Self::parse_array,
            TokenKind::LBrace => Self::parse_object,
            TokenKind::KwFunction => Self::parse_function_expr,
            _ => return None,
        };
        Some(f)
    }

    /// Parse unary operator expression
    fn parse_unary(&mut self) -> PResult<Expr> {
        let span = self.span();
        let op = match self.kind() {
            TokenKind::Minus => UnOp::Neg,
            TokenKind::Plus => UnOp::Pos,
            TokenKind::Not => UnOp::Not,
            TokenKind::KwTypeof => UnOp::Typeof,
            TokenKind::KwVoid => UnOp::Void,
            _ => return Err(self.unexpected()),
        };
        self.bump();

        let operand = self.parse_expression(BP_UNARY)?;
        Ok(Expr::UnOp {
            op,
            span: span.to(operand.span()),
            expr: Box::new(operand),
        })
    }

    /// Parse `++x` / `--x`
    fn parse_prefix_update(&mut self) -> PResult<Expr> {
        let span = self.span();
        let op = if self.at(&TokenKind::PlusPlus) {
            UpdateOp::Inc
        } else {
            UpdateOp::Dec
        };
        self.bump();

        let target = self.parse_expression(BP_UNARY)?;
        if !target.is_assignable() {
            return Err(ParseError::InvalidAssignmentTarget {
                position: target.span().start,
            });
        }
        Ok(Expr::Update {
            op,
            prefix: true,
            span: span.to(target.span()),
            target: Box::new(target),
        })
    }

    /// Parse literal token
    fn parse_literal(&mut self) -> PResult<Expr> {
        let span = self.span();
        let lit = match self.kind() {
            TokenKind::NumberLiteral(n) => Literal::Number(*n),
            TokenKind::StringLiteral(s) => Literal::String(s.clone()),
            TokenKind::BoolLiteral(b) => Literal::Bool(*b),
            TokenKind::KwNull => Literal::Null,
            TokenKind::KwUndefined => Literal::Undefined,
            _ => return Err(self.unexpected()),
        };
        self.bump();
        Ok(Expr::Lit(lit, span))
    }

    /// Parse identifier, or `x => body`
    fn parse_identifier(&mut self) -> PResult<Expr> {
        let (name, span) = self.expect_identifier()?;

        if self.at(&TokenKind::FatArrow) {
            let params = vec![Param {
                name,
                default: None,
                rest: false,
            }];
            return self.parse_arrow_body(params, span);
        }

        Ok(Expr::Ident(name, span))
    }

    fn parse_this(&mut self) -> PResult<Expr> {
        let span = self.expect(&TokenKind::KwThis)?;
        Ok(Expr::This(span))
    }

    /// Parse grouped expression or arrow function
    fn parse_paren(&mut self) -> PResult<Expr> {
        if self.at_arrow_params() {
            let span = self.span();
            let params = self.parse_params()?;
            return self.parse_arrow_body(params, span);
        }

        self.expect(&TokenKind::LParen)?;
        let expr = self.parse_expression(BP_LOWEST)?;
        self.expect(&TokenKind::RParen)?;
        Ok(expr)
    }

    /// Parse `=> body` after arrow parameters
    fn parse_arrow_body(
        &mut self,
        params: Vec<Param>,
        start: Span,
    ) -> PResult<Expr> {
        self.expect(&TokenKind::FatArrow)?;

        let body = if self.at(&TokenKind::LBrace) {
            FunctionBody::Block(self.parse_function_block()?)
        } else {
            FunctionBody::Expr(Box::new(self.parse_expression(BP_ASSIGN)?))
        };

        Ok(Expr::Function(Rc::new(FunctionDef {
            name: None,
            params,
            body,
            is_arrow: true,
            span: start.to(self.prev_span()),
        })))
    }

    /// Parse array literal
    fn parse_array(&mut self) -> PResult<Expr> {
        let start = self.expect(&TokenKind::LBracket)?;
        let items = self.parse_spread_list(&TokenKind::RBracket, true)?;
        Ok(Expr::Array(items, start.to(self.prev_span())))
    }

    /// Parse object literal
    fn parse_object(&mut self) -> PResult<Expr> {
        let start = self.expect(&TokenKind::LBrace)?;
        let mut props = Vec::new();

        while !self.at(&TokenKind::RBrace) {
            if self.skip(&TokenKind::DotDotDot) {
                props.push(Property::Spread(self.parse_expression(BP_ASSIGN)?));
            } else {
                props.push(self.parse_property()?);
            }
            if !self.skip(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(Expr::Object(props, start.to(self.prev_span())))
    }

    /// Parse one `key: value` entry
    fn parse_property(&mut self) -> PResult<Property> {
        let span = self.span();
        let key = match self.kind() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.bump();
                if matches!(self.kind(), TokenKind::Comma | TokenKind::RBrace) {
                    return Ok(Property::Shorthand(name, span));
                }
                PropertyKey::Named(name)
            }
            TokenKind::StringLiteral(s) => {
                let key = PropertyKey::Named(s.clone());
                self.bump();
                key
            }
            TokenKind::NumberLiteral(n) => {
                let key = PropertyKey::Named(number_to_string(*n));
                self.bump();
                key
            }
            TokenKind::LBracket => {
                self.bump();
                let key = self.parse_expression(BP_ASSIGN)?;
                self.expect(&TokenKind::RBracket)?;
                PropertyKey::Computed(key)
            }
            other => match other.property_name() {
                Some(name) => {
                    self.bump();
                    PropertyKey::Named(name)
                }
                None => return Err(self.unexpected()),
            },
        };

        self.expect(&TokenKind::Colon)?;
        let value = self.parse_expression(BP_ASSIGN)?;
        Ok(Property::KeyValue(key, value))
    }

    /// Parse `function name?(params) { body }` in expression position
    fn parse_function_expr(&mut self) -> PResult<Expr> {
        let start = self.expect(&TokenKind::KwFunction)?;
        let name = match self.kind() {
            TokenKind::Identifier(_) => Some(self.expect_identifier()?.0),
            _ => None,
        };
        let def = self.parse_function_rest(name, start)?;
        Ok(Expr::Function(Rc::new(def)))
    }

    /// Parse parameter list and block body after `function name`
    pub(super) fn parse_function_rest(
        &mut self,
        name: Option<String>,
        start: Span,
    ) -> PResult<FunctionDef> {
        let params = self.parse_params()?;
        let body = self.parse_function_block()?;
        Ok(FunctionDef {
            name,
            params,
            body: FunctionBody::Block(body),
            is_arrow: false,
            span: start.to(self.prev_span()),
        })
    }

    /// Parse `(a, b = 1, ...rest)`
    pub(super) fn parse_params(&mut self) -> PResult<Vec<Param>> {
        self.expect(&TokenKind::LParen)?;
        let mut params: Vec<Param> = Vec::new();

        while !self.at(&TokenKind::RParen) {
            if params.last().is_some_and(|p| p.rest) {
                return Err(ParseError::RestNotLast {
                    position: self.span().start,
                });
            }
            let rest = self.skip(&TokenKind::DotDotDot);
            let (name, _) = self.expect_identifier()?;
            let default = if !rest && self.skip(&TokenKind::Eq) {
                Some(self.parse_expression(BP_ASSIGN)?)
            } else {
                None
            };
            params.push(Param {
                name,
                default,
                rest,
            });
            if !self.skip(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    /// Parse `{ statements }` as a function body
    pub(super) fn parse_function_block(&mut self) -> PResult<Vec<Stmt>> {
        let saved_loops = std::mem::replace(&mut self.loop_depth, 0);
        self.function_depth += 1;
        let body = self.parse_block_body();
        self.function_depth -= 1;
        self.loop_depth = saved_loops;
        body
    }
}
