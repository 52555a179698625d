//! Statement parsing

use std::rc::Rc;

use super::state::*;
use super::ast::*;
use super::super::lexer::tokens::*;
use super::{PResult, ParseError};
use crate::util::span::Span;

impl<'a> ParserState<'a> {
    /// Parse the whole token stream as a program
    pub fn parse_program(&mut self) -> PResult<Program> {
        let start = self.span();
        let mut body = Vec::new();
        while !self.at_end() {
            body.push(self.parse_stmt()?);
        }
        Ok(Program {
            body,
            span: start.to(self.span()),
        })
    }

    /// Parse a statement
    pub fn parse_stmt(&mut self) -> PResult<Stmt> {
        let saved = self.nesting;
        let result = self.enter().and_then(|()| self.parse_stmt_inner());
        self.nesting = saved;
        result
    }

    fn parse_stmt_inner(&mut self) -> PResult<Stmt> {
        let start_span = self.span();

        match self.kind() {
            // variable declaration
            TokenKind::KwLet | TokenKind::KwConst | TokenKind::KwVar => {
                let stmt = self.parse_var_decl(start_span)?;
                self.consume_semicolon()?;
                Ok(stmt)
            }
            // function declaration; anonymous functions are expressions
            TokenKind::KwFunction
                if matches!(
                    self.peek_nth(1).map(|t| &t.kind),
                    Some(TokenKind::Identifier(_))
                ) =>
            {
                self.parse_function_decl(start_span)
            }
            TokenKind::KwReturn => self.parse_return_stmt(start_span),
            TokenKind::KwIf => self.parse_if_stmt(start_span),
            TokenKind::KwWhile => self.parse_while_stmt(start_span),
            TokenKind::KwFor => self.parse_for_stmt(start_span),
            TokenKind::KwBreak | TokenKind::KwContinue => self.parse_jump_stmt(start_span),
            TokenKind::LBrace => {
                let body = self.parse_block_body()?;
                Ok(Stmt::Block(body, start_span.to(self.prev_span())))
            }
            TokenKind::Semicolon => {
                self.bump();
                Ok(Stmt::Empty(start_span))
            }
            // expression statement
            _ => {
                let expr = self.parse_expression(BP_LOWEST)?;
                self.consume_semicolon()?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    /// Parse `{ statements }`, consuming both braces
    pub(super) fn parse_block_body(&mut self) -> PResult<Vec<Stmt>> {
        self.expect(&TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.at(&TokenKind::RBrace) {
            if self.at_end() {
                return Err(ParseError::UnexpectedEof);
            }
            body.push(self.parse_stmt()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(body)
    }

    /// Parse `let|const|var a = 1, b` without the terminator
    fn parse_var_decl(
        &mut self,
        span: Span,
    ) -> PResult<Stmt> {
        let kind = match self.kind() {
            TokenKind::KwLet => DeclKind::Let,
            TokenKind::KwConst => DeclKind::Const,
            TokenKind::KwVar => DeclKind::Var,
            _ => return Err(self.unexpected()),
        };
        self.bump();

        let mut declarators = Vec::new();
        loop {
            let (name, name_span) = self.expect_identifier()?;
            let init = if self.skip(&TokenKind::Eq) {
                Some(self.parse_expression(BP_ASSIGN)?)
            } else {
                None
            };
            if kind == DeclKind::Const && init.is_none() {
                return Err(ParseError::MissingInitializer { name });
            }
            declarators.push(Declarator {
                name,
                init,
                span: name_span.to(self.prev_span()),
            });
            if !self.skip(&TokenKind::Comma) {
                break;
            }
        }

        Ok(Stmt::VarDecl {
            kind,
            declarators,
            span: span.to(self.prev_span()),
        })
    }

    /// Parse `function name(params) { body }`
    fn parse_function_decl(
        &mut self,
        span: Span,
    ) -> PResult<Stmt> {
        self.expect(&TokenKind::KwFunction)?;
        let (name, _) = self.expect_identifier()?;
        let def = self.parse_function_rest(Some(name), span)?;
        Ok(Stmt::Function(Rc::new(def)))
    }

    /// Parse `return [expr];`
    fn parse_return_stmt(
        &mut self,
        span: Span,
    ) -> PResult<Stmt> {
        if self.function_depth == 0 {
            return Err(ParseError::IllegalStatement {
                keyword: "return",
                position: span.start,
            });
        }
        self.bump();

        let value = if self.at(&TokenKind::Semicolon)
            || self.at(&TokenKind::RBrace)
            || self.at_end()
            || self.newline_before()
        {
            None
        } else {
            Some(self.parse_expression(BP_LOWEST)?)
        };
        self.consume_semicolon()?;
        Ok(Stmt::Return(value, span.to(self.prev_span())))
    }

    /// Parse `if (cond) stmt [else stmt]`
    fn parse_if_stmt(
        &mut self,
        span: Span,
    ) -> PResult<Stmt> {
        self.bump(); // consume 'if'
        let condition = self.parse_condition()?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.skip(&TokenKind::KwElse) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            span: span.to(self.prev_span()),
        })
    }

    /// Parse `while (cond) stmt`
    fn parse_while_stmt(
        &mut self,
        span: Span,
    ) -> PResult<Stmt> {
        self.bump(); // consume 'while'
        let condition = self.parse_condition()?;
        let body = Box::new(self.parse_loop_body()?);

        Ok(Stmt::While {
            condition,
            body,
            span: span.to(self.prev_span()),
        })
    }

    /// Parse `for (init; test; update) stmt`
    fn parse_for_stmt(
        &mut self,
        span: Span,
    ) -> PResult<Stmt> {
        self.bump(); // consume 'for'
        self.expect(&TokenKind::LParen)?;

        let init = match self.kind() {
            TokenKind::Semicolon => None,
            TokenKind::KwLet | TokenKind::KwConst | TokenKind::KwVar => {
                let init_span = self.span();
                Some(Box::new(self.parse_var_decl(init_span)?))
            }
            _ => Some(Box::new(Stmt::Expr(self.parse_expression(BP_LOWEST)?))),
        };
        self.expect(&TokenKind::Semicolon)?;

        let test = if self.at(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression(BP_LOWEST)?)
        };
        self.expect(&TokenKind::Semicolon)?;

        let update = if self.at(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression(BP_LOWEST)?)
        };
        self.expect(&TokenKind::RParen)?;

        let body = Box::new(self.parse_loop_body()?);
        Ok(Stmt::For {
            init,
            test,
            update,
            body,
            span: span.to(self.prev_span()),
        })
    }

    /// Parse `break;` / `continue;`
    fn parse_jump_stmt(
        &mut self,
        span: Span,
    ) -> PResult<Stmt> {
        let is_break = self.at(&TokenKind::KwBreak);
        if self.loop_depth == 0 {
            return Err(ParseError::IllegalStatement {
                keyword: if is_break { "break" } else { "continue" },
                position: span.start,
            });
        }
        self.bump();
        self.consume_semicolon()?;

        Ok(if is_break {
            Stmt::Break(span)
        } else {
            Stmt::Continue(span)
        })
    }

    /// Parse `( expr )` after `if` / `while`
    fn parse_condition(&mut self) -> PResult<Expr> {
        self.expect(&TokenKind::LParen)?;
        let condition = self.parse_expression(BP_LOWEST)?;
        self.expect(&TokenKind::RParen)?;
        Ok(condition)
    }

    fn parse_loop_body(&mut self) -> PResult<Stmt> {
        self.loop_depth += 1;
        let body = self.parse_stmt();
        self.loop_depth -= 1;
        body
    }
}
