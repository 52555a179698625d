//! Pratt Parser expression parsing

use super::ast::*;
use super::state::*;
use super::PResult;
use crate::frontend::lexer::TokenKind;

impl<'a> ParserState<'a> {
    /// Parse an expression using Pratt parser
    ///
    /// # Arguments
    /// * `min_bp` - Minimum binding power an infix operator needs to bind
    ///
    /// # Algorithm
    /// 1. Parse prefix expression (nud)
    /// 2. While the next token is an infix operator with left binding power >= `min_bp`,
    ///    hand the left side to its led, which parses the right side with the
    ///    operator's right binding power
    /// 3. Return expression
    pub fn parse_expression(
        &mut self,
        min_bp: u8,
    ) -> PResult<Expr> {
        let saved = self.nesting;
        let result = self.enter().and_then(|()| self.parse_expression_bp(min_bp));
        self.nesting = saved;
        result
    }

    fn parse_expression_bp(
        &mut self,
        min_bp: u8,
    ) -> PResult<Expr> {
        let prefix_fn = self.prefix_fn().ok_or_else(|| self.unexpected())?;
        let mut lhs = prefix_fn(self)?;

        while let Some((left_bp, right_bp, infix_fn)) = self.infix_info() {
            if left_bp < min_bp {
                break;
            }
            // each operator applied here puts the tree one level deeper
            self.enter()?;
            lhs = infix_fn(self, lhs, right_bp)?;
        }

        Ok(lhs)
    }

    /// Parse a comma separated list of expressions with optional spread,
    /// up to and including `close`
    pub(super) fn parse_spread_list(
        &mut self,
        close: &TokenKind,
        allow_holes: bool,
    ) -> PResult<Vec<ExprOrSpread>> {
        let mut items = Vec::new();
        while !self.at(close) {
            if allow_holes && self.at(&TokenKind::Comma) {
                let span = self.span();
                self.bump();
                items.push(ExprOrSpread::Expr(Expr::Lit(Literal::Undefined, span)));
                continue;
            }
            if self.skip(&TokenKind::DotDotDot) {
                items.push(ExprOrSpread::Spread(self.parse_expression(BP_ASSIGN)?));
            } else {
                items.push(ExprOrSpread::Expr(self.parse_expression(BP_ASSIGN)?));
            }
            if !self.skip(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(close)?;
        Ok(items)
    }
}
