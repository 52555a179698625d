//! Infix expression parsing (led - left denotation)

use super::super::lexer::tokens::*;
use super::ast::*;
use super::state::*;
use super::{PResult, ParseError};

/// Infix parser entry point; receives the left side and the right binding power
pub(super) type InfixFn<'a> = fn(&mut ParserState<'a>, Expr, u8) -> PResult<Expr>;

impl<'a> ParserState<'a> {
    /// Get infix binding powers and parser for current token
    #[inline]
    pub(crate) fn infix_info(&self) -> Option<(u8, u8, InfixFn<'a>)> {
        let info: (u8, u8, InfixFn<'a>) = match self.kind() {
            // Assignment (right-associative)
            TokenKind::Eq
            | TokenKind::PlusEq
            | TokenKind::MinusEq
            | TokenKind::StarEq
            | TokenKind::SlashEq
            | TokenKind::PercentEq => (BP_ASSIGN, BP_ASSIGN, Self::parse_assign),
            // Conditional
            TokenKind::Question => (BP_TERNARY, BP_TERNARY, Self::parse_conditional),
            // Logical
            TokenKind::QuestionQuestion => (BP_NULLISH, BP_NULLISH + 1, Self::parse_logical),
            TokenKind::OrOr => (BP_OR, BP_OR + 1, Self::parse_logical),
            TokenKind::AndAnd => (BP_AND, BP_AND + 1, Self::parse_logical),
            // Equality
            TokenKind::EqEq | TokenKind::Neq | TokenKind::EqEqEq | TokenKind::NeqEq => {
                (BP_EQ, BP_EQ + 1, Self::parse_binary)
            }
            // Comparison
            TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge => {
                (BP_CMP, BP_CMP + 1, Self::parse_binary)
            }
            // Addition/Subtraction
            TokenKind::Plus | TokenKind::Minus => (BP_ADD, BP_ADD + 1, Self::parse_binary),
            // Multiplication/Division/Modulo
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => {
                (BP_MUL, BP_MUL + 1, Self::parse_binary)
            }
            // Exponent (right-associative)
            TokenKind::StarStar => (BP_EXP, BP_EXP, Self::parse_binary),
            // Postfix update, never across a line break
            TokenKind::PlusPlus | TokenKind::MinusMinus if !self.newline_before() => {
                (BP_POSTFIX, BP_POSTFIX, Self::parse_postfix_update)
            }
            // Call and member access
            TokenKind::LParen => (BP_CALL, BP_CALL + 1, Self::parse_call),
            TokenKind::Dot => (BP_CALL, BP_CALL + 1, Self::parse_field),
            TokenKind::LBracket => (BP_CALL, BP_CALL + 1, Self::parse_index),
            TokenKind::QuestionDot => (BP_CALL, BP_CALL + 1, Self::parse_optional),
            _ => return None,
        };
        Some(info)
    }

    /// Parse assignment expression
    fn parse_assign(
        &mut self,
        lhs: Expr,
        right_bp: u8,
    ) -> PResult<Expr> {
        if !lhs.is_assignable() {
            return Err(ParseError::InvalidAssignmentTarget {
                position: lhs.span().start,
            });
        }
        let op = match self.kind() {
            TokenKind::Eq => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::Compound(BinOp::Add),
            TokenKind::MinusEq => AssignOp::Compound(BinOp::Sub),
            TokenKind::StarEq => AssignOp::Compound(BinOp::Mul),
            TokenKind::SlashEq => AssignOp::Compound(BinOp::Div),
            TokenKind::PercentEq => AssignOp::Compound(BinOp::Mod),
            _ => return Err(self.unexpected()),
        };
        self.bump();

        let rhs = self.parse_expression(right_bp)?;
        Ok(Expr::Assign {
            op,
            span: lhs.span().to(rhs.span()),
            target: Box::new(lhs),
            value: Box::new(rhs),
        })
    }

    /// Parse `cond ? a : b`
    fn parse_conditional(
        &mut self,
        condition: Expr,
        _right_bp: u8,
    ) -> PResult<Expr> {
        self.bump(); // consume '?'
        let then_expr = self.parse_expression(BP_ASSIGN)?;
        self.expect(&TokenKind::Colon)?;
        let else_expr = self.parse_expression(BP_ASSIGN)?;

        Ok(Expr::Conditional {
            span: condition.span().to(else_expr.span()),
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        })
    }

    /// Parse `&&`, `||`, `??`
    fn parse_logical(
        &mut self,
        lhs: Expr,
        right_bp: u8,
    ) -> PResult<Expr> {
        let op = match self.kind() {
            TokenKind::AndAnd => LogicalOp::And,
            TokenKind::OrOr => LogicalOp::Or,
            TokenKind::QuestionQuestion => LogicalOp::Nullish,
            _ => return Err(self.unexpected()),
        };
        self.bump();

        let rhs = self.parse_expression(right_bp)?;
        Ok(Expr::Logical {
            op,
            span: lhs.span().to(rhs.span()),
            left: Box::new(lhs),
            right: Box::new(rhs),
        })
    }

    /// Parse binary operator expression
    fn parse_binary(
        &mut self,
        lhs: Expr,
        right_bp: u8,
    ) -> PResult<Expr> {
        let op = match self.kind() {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::Percent => BinOp::Mod,
            TokenKind::StarStar => BinOp::Pow,
            TokenKind::EqEq => BinOp::Eq,
            TokenKind::Neq => BinOp::Neq,
            TokenKind::EqEqEq => BinOp::StrictEq,
            TokenKind::NeqEq => BinOp::StrictNeq,
            TokenKind::Lt => BinOp::Lt,
            TokenKind::Le => BinOp::Le,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::Ge => BinOp::Ge,
            _ => return Err(self.unexpected()),
        };
        self.bump();

        let rhs = self.parse_expression(right_bp)?;
        Ok(Expr::BinOp {
            op,
            span: lhs.span().to(rhs.span()),
            left: Box::new(lhs),
            right: Box::new(rhs),
        })
    }

    /// Parse `x++` / `x--`
    fn parse_postfix_update(
        &mut self,
        target: Expr,
        _right_bp: u8,
    ) -> PResult<Expr> {
        if !target.is_assignable() {
            return Err(ParseError::InvalidAssignmentTarget {
                position: target.span().start,
            });
        }
        let op = if self.at(&TokenKind::PlusPlus) {
            UpdateOp::Inc
        } else {
            UpdateOp::Dec
        };
        let end = self.span();
        self.bump();

        Ok(Expr::Update {
            op,
            prefix: false,
            span: target.span().to(end),
            target: Box::new(target),
        })
    }

    /// Parse function call expression
    fn parse_call(
        &mut self,
        func: Expr,
        _right_bp: u8,
    ) -> PResult<Expr> {
        self.bump(); // consume '('
        self.finish_call(func, false)
    }

    fn finish_call(
        &mut self,
        func: Expr,
        optional: bool,
    ) -> PResult<Expr> {
        let args = self.parse_spread_list(&TokenKind::RParen, false)?;
        Ok(Expr::Call {
            span: func.span().to(self.prev_span()),
            func: Box::new(func),
            args,
            optional,
        })
    }

    /// Parse `.name`
    fn parse_field(
        &mut self,
        object: Expr,
        _right_bp: u8,
    ) -> PResult<Expr> {
        self.bump(); // consume '.'
        self.finish_field(object, false)
    }

    fn finish_field(
        &mut self,
        object: Expr,
        optional: bool,
    ) -> PResult<Expr> {
        let name = self.kind().property_name().ok_or_else(|| self.unexpected())?;
        let end = self.span();
        self.bump();

        Ok(Expr::Member {
            span: object.span().to(end),
            object: Box::new(object),
            property: MemberKey::Named(name),
            optional,
        })
    }

    /// Parse `[index]`
    fn parse_index(
        &mut self,
        object: Expr,
        _right_bp: u8,
    ) -> PResult<Expr> {
        self.bump(); // consume '['
        self.finish_index(object, false)
    }

    fn finish_index(
        &mut self,
        object: Expr,
        optional: bool,
    ) -> PResult<Expr> {
        let index = self.parse_expression(BP_LOWEST)?;
        let end = self.expect(&TokenKind::RBracket)?;

        Ok(Expr::Member {
            span: object.span().to(end),
            object: Box::new(object),
            property: MemberKey::Computed(Box::new(index)),
            optional,
        })
    }

    /// Parse `?.name`, `?.[index]`, `?.(args)`
    fn parse_optional(
        &mut self,
        object: Expr,
        _right_bp: u8,
    ) -> PResult<Expr> {
        self.bump(); // consume '?.'
        if self.skip(&TokenKind::LParen) {
            self.finish_call(object, true)
        } else if self.skip(&TokenKind::LBracket) {
            self.finish_index(object, true)
        } else {
            self.finish_field(object, true)
        }
    }
}
