//! Lexer module

pub mod tokens;

pub use tokens::{Token, TokenKind};

use crate::util::span::Position;

pub use tokenizer::tokenize;

/// Lexer error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at {position}")]
    UnexpectedChar { ch: char, position: Position },
    #[error("unterminated string literal at {position}")]
    UnterminatedString { position: Position },
    #[error("unterminated comment at {position}")]
    UnterminatedComment { position: Position },
    #[error("invalid escape sequence '\\{sequence}' at {position}")]
    InvalidEscape { sequence: String, position: Position },
    #[error("invalid number literal '{literal}' at {position}")]
    InvalidNumber { literal: String, position: Position },
    #[error("template substitutions are not supported at {position}")]
    TemplateSubstitution { position: Position },
}

impl LexError {
    pub fn position_mut(&mut self) -> &mut Position {
        match self {
            Self::UnexpectedChar { position, .. }
            | Self::UnterminatedString { position }
            | Self::UnterminatedComment { position }
            | Self::InvalidEscape { position, .. }
            | Self::InvalidNumber { position, .. }
            | Self::TemplateSubstitution { position } => position,
        }
    }
}

/// Tokenize source code
mod tokenizer {
    use super::*;
    use crate::util::span::Span;
    use std::iter::Peekable;
    use std::str::Chars;

    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();

        while let Some(token) = lexer.next_token()? {
            tokens.push(token);
        }

        let end = lexer.position();
        tokens.push(Token::new(TokenKind::Eof, Span::new(end, end)));
        Ok(tokens)
    }

    struct Lexer<'a> {
        chars: Peekable<Chars<'a>>,
        offset: usize,
        line: usize,
        column: usize,
        start: Position,
    }

    impl<'a> Lexer<'a> {
        fn new(source: &'a str) -> Self {
            Self {
                chars: source.chars().peekable(),
                offset: 0,
                line: 1,
                column: 1,
                start: Position::start(),
            }
        }

        fn position(&self) -> Position {
            Position::new(self.line, self.column, self.offset)
        }

        fn span(&self) -> Span {
            Span::new(self.start, self.position())
        }

        fn advance(&mut self) -> Option<char> {
            let c = self.chars.next()?;
            self.offset += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            Some(c)
        }

        fn peek(&mut self) -> Option<char> {
            self.chars.peek().copied()
        }

        fn peek_next(&self) -> Option<char> {
            self.chars.clone().nth(1)
        }

        fn eat(
            &mut self,
            expected: char,
        ) -> bool {
            if self.peek() == Some(expected) {
                self.advance();
                true
            } else {
                false
            }
        }

        fn make_token(
            &self,
            kind: TokenKind,
        ) -> Token {
            Token::new(kind, self.span())
        }

        fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
            while let Some(c) = self.peek() {
                match c {
                    c if c.is_whitespace() || c == '\u{feff}' => {
                        self.advance();
                    }
                    '/' if self.peek_next() == Some('/') => {
                        while let Some(c) = self.peek() {
                            if c == '\n' {
                                break;
                            }
                            self.advance();
                        }
                    }
                    '/' if self.peek_next() == Some('*') => {
                        let position = self.position();
                        self.advance();
                        self.advance();
                        loop {
                            match self.advance() {
                                Some('*') if self.peek() == Some('/') => {
                                    self.advance();
                                    break;
                                }
                                Some(_) => {}
                                None => return Err(LexError::UnterminatedComment { position }),
                            }
                        }
                    }
                    _ => break,
                }
            }
            Ok(())
        }

        fn next_token(&mut self) -> Result<Option<Token>, LexError> {
            self.skip_whitespace_and_comments()?;

            self.start = self.position();
            let c = match self.advance() {
                Some(c) => c,
                None => return Ok(None),
            };

            let kind = match c {
                c if is_identifier_start(c) => return Ok(Some(self.scan_identifier(c))),
                c if c.is_ascii_digit() => return self.scan_number(c).map(Some),
                '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                    return self.scan_number(c).map(Some)
                }
                '"' | '\'' => return self.scan_string(c).map(Some),
                '`' => return self.scan_template().map(Some),
                '+' => {
                    if self.eat('+') {
                        TokenKind::PlusPlus
                    } else if self.eat('=') {
                        TokenKind::PlusEq
                    } else {
                        TokenKind::Plus
                    }
                }
                '-' => {
                    if self.eat('-') {
                        TokenKind::MinusMinus
                    } else if self.eat('=') {
                        TokenKind::MinusEq
                    } else {
                        TokenKind::Minus
                    }
                }
                '*' => {
                    if self.eat('*') {
                        TokenKind::StarStar
                    } else if self.eat('=') {
                        TokenKind::StarEq
                    } else {
                        TokenKind::Star
                    }
                }
                '/' => {
                    if self.eat('=') {
                        TokenKind::SlashEq
                    } else {
                        TokenKind::Slash
                    }
                }
                '%' => {
                    if self.eat('=') {
                        TokenKind::PercentEq
                    } else {
                        TokenKind::Percent
                    }
                }
                '=' => {
                    if self.eat('>') {
                        TokenKind::FatArrow
                    } else if self.eat('=') {
                        if self.eat('=') {
                            TokenKind::EqEqEq
                        } else {
                            TokenKind::EqEq
                        }
                    } else {
                        TokenKind::Eq
                    }
                }
                '!' => {
                    if self.eat('=') {
                        if self.eat('=') {
                            TokenKind::NeqEq
                        } else {
                            TokenKind::Neq
                        }
                    } else {
                        TokenKind::Not
                    }
                }
                '<' => {
                    if self.eat('=') {
                        TokenKind::Le
                    } else {
                        TokenKind::Lt
                    }
                }
                '>' => {
                    if self.eat('=') {
                        TokenKind::Ge
                    } else {
                        TokenKind::Gt
                    }
                }
                '&' if self.eat('&') => TokenKind::AndAnd,
                '|' if self.eat('|') => TokenKind::OrOr,
                '?' => {
                    if self.eat('?') {
                        TokenKind::QuestionQuestion
                    } else if self.peek() == Some('.')
                        && !self.peek_next().is_some_and(|c| c.is_ascii_digit())
                    {
                        self.advance();
                        TokenKind::QuestionDot
                    } else {
                        TokenKind::Question
                    }
                }
                '.' => {
                    if self.peek() == Some('.') && self.peek_next() == Some('.') {
                        self.advance();
                        self.advance();
                        TokenKind::DotDotDot
                    } else {
                        TokenKind::Dot
                    }
                }
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                ',' => TokenKind::Comma,
                ':' => TokenKind::Colon,
                ';' => TokenKind::Semicolon,
                ch => {
                    return Err(LexError::UnexpectedChar {
                        ch,
                        position: self.start,
                    })
                }
            };

            Ok(Some(self.make_token(kind)))
        }

        fn scan_identifier(
            &mut self,
            first: char,
        ) -> Token {
            let mut name = String::from(first);
            while let Some(c) = self.peek() {
                if !is_identifier_char(c) {
                    break;
                }
                name.push(c);
                self.advance();
            }

            let kind = TokenKind::keyword(&name).unwrap_or(TokenKind::Identifier(name));
            self.make_token(kind)
        }

        fn scan_number(
            &mut self,
            first: char,
        ) -> Result<Token, LexError> {
            let mut literal = String::from(first);

            if first == '0' {
                let radix = match self.peek() {
                    Some('x' | 'X') => Some(16),
                    Some('o' | 'O') => Some(8),
                    Some('b' | 'B') => Some(2),
                    _ => None,
                };
                if let Some(radix) = radix {
                    literal.push(self.advance().unwrap_or_default());
                    let mut digits = String::new();
                    while let Some(c) = self.peek() {
                        if !c.is_ascii_alphanumeric() {
                            break;
                        }
                        digits.push(c);
                        literal.push(c);
                        self.advance();
                    }
                    let value = u64::from_str_radix(&digits, radix)
                        .map_err(|_| self.invalid_number(&literal))?;
                    return Ok(self.make_token(TokenKind::NumberLiteral(value as f64)));
                }
            }

            let mut seen_dot = first == '.';
            let mut seen_exp = false;
            while let Some(c) = self.peek() {
                match c {
                    '0'..='9' => {}
                    '.' if !seen_dot && !seen_exp => {
                        if !self.peek_next().is_some_and(|n| n.is_ascii_digit())
                            && self.peek_next().is_some_and(is_identifier_start)
                        {
                            // `1.toString` is not a number followed by a member
                            break;
                        }
                        seen_dot = true;
                    }
                    'e' | 'E' if !seen_exp => {
                        seen_exp = true;
                        literal.push(c);
                        self.advance();
                        if let Some(sign @ ('+' | '-')) = self.peek() {
                            literal.push(sign);
                            self.advance();
                        }
                        continue;
                    }
                    _ => break,
                }
                literal.push(c);
                self.advance();
            }

            if self.peek().is_some_and(is_identifier_start) {
                let c = self.advance().unwrap_or_default();
                literal.push(c);
                return Err(self.invalid_number(&literal));
            }

            let value: f64 = literal.parse().map_err(|_| self.invalid_number(&literal))?;
            Ok(self.make_token(TokenKind::NumberLiteral(value)))
        }

        fn invalid_number(
            &self,
            literal: &str,
        ) -> LexError {
            LexError::InvalidNumber {
                literal: literal.to_string(),
                position: self.start,
            }
        }

        fn scan_string(
            &mut self,
            quote: char,
        ) -> Result<Token, LexError> {
            let mut value = String::new();
            loop {
                match self.advance() {
                    Some(c) if c == quote => break,
                    Some('\\') => self.scan_escape(&mut value)?,
                    Some('\n') | None => {
                        return Err(LexError::UnterminatedString {
                            position: self.start,
                        })
                    }
                    Some(c) => value.push(c),
                }
            }
            Ok(self.make_token(TokenKind::StringLiteral(value)))
        }

        fn scan_template(&mut self) -> Result<Token, LexError> {
            let mut value = String::new();
            loop {
                match self.advance() {
                    Some('`') => break,
                    Some('\\') => self.scan_escape(&mut value)?,
                    Some('$') if self.peek() == Some('{') => {
                        return Err(LexError::TemplateSubstitution {
                            position: self.start,
                        })
                    }
                    Some(c) => value.push(c),
                    None => {
                        return Err(LexError::UnterminatedString {
                            position: self.start,
                        })
                    }
                }
            }
            Ok(self.make_token(TokenKind::StringLiteral(value)))
        }

        fn scan_escape(
            &mut self,
            out: &mut String,
        ) -> Result<(), LexError> {
            let position = self.position();
            let c = self
                .advance()
                .ok_or(LexError::UnterminatedString { position: self.start })?;
            match c {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                'b' => out.push('\u{8}'),
                'f' => out.push('\u{c}'),
                'v' => out.push('\u{b}'),
                '0' => out.push('\0'),
                '\n' => {}
                'x' => {
                    let digits = self.take_hex(2);
                    out.push(decode_code_point(&digits).ok_or_else(|| {
                        LexError::InvalidEscape {
                            sequence: format!("x{}", digits),
                            position,
                        }
                    })?);
                }
                'u' => {
                    let digits = if self.eat('{') {
                        let mut digits = String::new();
                        while let Some(c) = self.advance() {
                            if c == '}' {
                                break;
                            }
                            digits.push(c);
                        }
                        digits
                    } else {
                        self.take_hex(4)
                    };
                    out.push(decode_code_point(&digits).ok_or_else(|| {
                        LexError::InvalidEscape {
                            sequence: format!("u{}", digits),
                            position,
                        }
                    })?);
                }
                other => out.push(other),
            }
            Ok(())
        }

        fn take_hex(
            &mut self,
            count: usize,
        ) -> String {
            let mut digits = String::new();
            for _ in 0..count {
                match self.peek() {
                    Some(c) if c.is_ascii_hexdigit() => {
                        digits.push(c);
                        self.advance();
                    }
                    _ => break,
                }
            }
            digits
        }
    }

    fn decode_code_point(digits: &str) -> Option<char> {
        if digits.is_empty() {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
    }

    fn is_identifier_start(c: char) -> bool {
        c == '$' || c == '_' || unicode_ident::is_xid_start(c)
    }

    fn is_identifier_char(c: char) -> bool {
        c == '$' || unicode_ident::is_xid_continue(c)
    }
}

#[cfg(test)]
mod tests;
