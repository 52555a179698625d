//! Token types

use std::fmt;

use crate::util::span::Span;

/// Token kind
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords
    KwLet,
    KwConst,
    KwVar,
    KwFunction,
    KwReturn,
    KwIf,
    KwElse,
    KwWhile,
    KwFor,
    KwBreak,
    KwContinue,
    KwNull,
    KwUndefined,
    KwThis,
    KwTypeof,
    KwVoid,

    // Identifiers
    Identifier(String),

    // Literals
    NumberLiteral(f64),
    StringLiteral(String),
    BoolLiteral(bool),

    // Arithmetic
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,

    // Assignment
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,

    // Comparison
    EqEq,
    EqEqEq,
    Neq,
    NeqEq,
    Lt,
    Le,
    Gt,
    Ge,

    // Logical
    AndAnd,
    OrOr,
    QuestionQuestion,
    Not,
    Question,
    QuestionDot,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semicolon,
    Dot,
    DotDotDot,
    FatArrow,

    // Special
    Eof,
}

impl TokenKind {
    /// Look up a reserved word
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "let" => TokenKind::KwLet,
            "const" => TokenKind::KwConst,
            "var" => TokenKind::KwVar,
            "function" => TokenKind::KwFunction,
            "return" => TokenKind::KwReturn,
            "if" => TokenKind::KwIf,
            "else" => TokenKind::KwElse,
            "while" => TokenKind::KwWhile,
            "for" => TokenKind::KwFor,
            "break" => TokenKind::KwBreak,
            "continue" => TokenKind::KwContinue,
            "null" => TokenKind::KwNull,
            "undefined" => TokenKind::KwUndefined,
            "this" => TokenKind::KwThis,
            "typeof" => TokenKind::KwTypeof,
            "void" => TokenKind::KwVoid,
            "true" => TokenKind::BoolLiteral(true),
            "false" => TokenKind::BoolLiteral(false),
            _ => return None,
        };
        Some(kind)
    }

    /// Whether this token can be used as a property name after `.`
    pub fn property_name(&self) -> Option<String> {
        match self {
            TokenKind::Identifier(name) => Some(name.clone()),
            TokenKind::BoolLiteral(b) => Some(b.to_string()),
            other => {
                let text = other.to_string();
                if text.chars().all(|c| c.is_ascii_alphabetic()) {
                    Some(text)
                } else {
                    None
                }
            }
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let text = match self {
            TokenKind::KwLet => "let",
            TokenKind::KwConst => "const",
            TokenKind::KwVar => "var",
            TokenKind::KwFunction => "function",
            TokenKind::KwReturn => "return",
            TokenKind::KwIf => "if",
            TokenKind::KwElse => "else",
            TokenKind::KwWhile => "while",
            TokenKind::KwFor => "for",
            TokenKind::KwBreak => "break",
            TokenKind::KwContinue => "continue",
            TokenKind::KwNull => "null",
            TokenKind::KwUndefined => "undefined",
            TokenKind::KwThis => "this",
            TokenKind::KwTypeof => "typeof",
            TokenKind::KwVoid => "void",
            TokenKind::Identifier(name) => return write!(f, "{}", name),
            TokenKind::NumberLiteral(n) => return write!(f, "{}", n),
            TokenKind::StringLiteral(s) => return write!(f, "{:?}", s),
            TokenKind::BoolLiteral(b) => return write!(f, "{}", b),
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::StarStar => "**",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Eq => "=",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::EqEq => "==",
            TokenKind::EqEqEq => "===",
            TokenKind::Neq => "!=",
            TokenKind::NeqEq => "!==",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::QuestionQuestion => "??",
            TokenKind::Not => "!",
            TokenKind::Question => "?",
            TokenKind::QuestionDot => "?.",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Dot => ".",
            TokenKind::DotDotDot => "...",
            TokenKind::FatArrow => "=>",
            TokenKind::Eof => "end of input",
        };
        f.write_str(text)
    }
}

/// Token
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        span: Span,
    ) -> Self {
        Self { kind, span }
    }
}
