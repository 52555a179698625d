//! Lexer 单元测试
//!
//! 测试词法分析器的分词功能

use crate::frontend::lexer::{tokenize, LexError, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

mod lexer_basic_tests {
    use super::*;

    #[test]
    fn test_empty_source() {
        let tokens = tokenize("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(matches!(tokens[0].kind, TokenKind::Eof));
    }

    #[test]
    fn test_whitespace_and_comments() {
        assert_eq!(kinds("   \t\n\r   "), vec![TokenKind::Eof]);
        assert_eq!(kinds("// macro (defmacro)\n"), vec![TokenKind::Eof]);
        assert_eq!(
            kinds("1 /* two */ + 3"),
            vec![
                TokenKind::NumberLiteral(1.0),
                TokenKind::Plus,
                TokenKind::NumberLiteral(3.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_identifiers_and_keywords() {
        assert_eq!(
            kinds("let $el _x café"),
            vec![
                TokenKind::KwLet,
                TokenKind::Identifier("$el".into()),
                TokenKind::Identifier("_x".into()),
                TokenKind::Identifier("café".into()),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("true false null undefined"),
            vec![
                TokenKind::BoolLiteral(true),
                TokenKind::BoolLiteral(false),
                TokenKind::KwNull,
                TokenKind::KwUndefined,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_spans_track_lines() {
        let tokens = tokenize("a\n  bb").unwrap();
        assert_eq!(tokens[1].span.start.line, 2);
        assert_eq!(tokens[1].span.start.column, 3);
        assert_eq!(tokens[1].span.len(), 2);
    }
}

mod lexer_literal_tests {
    use super::*;

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("42 3.5 .5 1e3 2E-2 0xff 0b101 0o17"),
            vec![
                TokenKind::NumberLiteral(42.0),
                TokenKind::NumberLiteral(3.5),
                TokenKind::NumberLiteral(0.5),
                TokenKind::NumberLiteral(1000.0),
                TokenKind::NumberLiteral(0.02),
                TokenKind::NumberLiteral(255.0),
                TokenKind::NumberLiteral(5.0),
                TokenKind::NumberLiteral(15.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_invalid_number() {
        assert!(matches!(
            tokenize("12abc"),
            Err(LexError::InvalidNumber { .. })
        ));
        assert!(matches!(tokenize("0x"), Err(LexError::InvalidNumber { .. })));
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(
            kinds(r#""a\"b" 'it\'s' "A\u{1F600}\x41\n""#),
            vec![
                TokenKind::StringLiteral("a\"b".into()),
                TokenKind::StringLiteral("it's".into()),
                TokenKind::StringLiteral("A\u{1F600}A\n".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_template_without_substitution() {
        assert_eq!(
            kinds("`plain`"),
            vec![TokenKind::StringLiteral("plain".into()), TokenKind::Eof]
        );
        assert!(matches!(
            tokenize("`a ${b}`"),
            Err(LexError::TemplateSubstitution { .. })
        ));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("\"abc").unwrap_err();
        assert_eq!(err.to_string(), "unterminated string literal at 1:1");
    }

    #[test]
    fn test_unterminated_comment() {
        assert!(matches!(
            tokenize("1 /* open"),
            Err(LexError::UnterminatedComment { .. })
        ));
    }
}

mod lexer_operator_tests {
    use super::*;

    #[test]
    fn test_multi_char_operators() {
        assert_eq!(
            kinds("=== !== == != => ** ?? ?. ... ++ -- += <= >= && ||"),
            vec![
                TokenKind::EqEqEq,
                TokenKind::NeqEq,
                TokenKind::EqEq,
                TokenKind::Neq,
                TokenKind::FatArrow,
                TokenKind::StarStar,
                TokenKind::QuestionQuestion,
                TokenKind::QuestionDot,
                TokenKind::DotDotDot,
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
                TokenKind::PlusEq,
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_conditional_before_fraction() {
        assert_eq!(
            kinds("a?.5:1"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::Question,
                TokenKind::NumberLiteral(0.5),
                TokenKind::Colon,
                TokenKind::NumberLiteral(1.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("1 # 2").unwrap_err();
        assert_eq!(
            err,
            LexError::UnexpectedChar {
                ch: '#',
                position: crate::util::span::Position::new(1, 3, 2),
            }
        );
        assert_eq!(err.to_string(), "unexpected character '#' at 1:3");
    }
}
