//! logos-based tokenizer for property value strings.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (e.g. `1fr` as [`Token::Dimension`] beats `1` + `fr`)
//! 2. For equal length matches, earlier-defined variants win
//!
//! Our ordering ensures:
//! - `12.5px` matches [`Token::Dimension`], not `Number` + `Ident`
//! - `flex-start` matches a single [`Token::Ident`]
//! - a lone `.` in a template-area row is a [`Token::Dot`]

use logos::Logos;

use super::parse::ParseError;

/// Property value token produced by the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    // ── Compound tokens (longer matches, defined first) ──────────────

    /// Dimension: number with unit suffix like `1fr`, `50%`, `12px`.
    #[regex(r"-?[0-9]+(\.[0-9]+)?(fr|%|px)")]
    Dimension,

    /// Double-quoted string literal.
    #[regex(r#""[^"]*""#)]
    StringLiteral,

    /// Single-quoted string literal.
    #[regex(r"'[^']*'")]
    StringLiteralSingle,

    /// Number: integer or float, possibly negative.
    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,

    /// Identifier: keywords and area names.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    // ── Single-character punctuation ─────────────────────────────────

    /// `/`
    #[token("/")]
    Slash,

    /// `,`
    #[token(",")]
    Comma,

    /// `.`
    #[token(".")]
    Dot,

    /// `(`
    #[token("(")]
    ParenOpen,

    /// `)`
    #[token(")")]
    ParenClose,
}

/// Tokenize a property value into `(Token, slice)` pairs.
///
/// Unlike stylesheet lexing, a character that fails to lex rejects the whole
/// value: property strings are short and a partial parse would be misleading.
pub fn tokenize(input: &str) -> Result<Vec<(Token, &str)>, ParseError> {
    let mut lexer = Token::lexer(input);
    let mut out = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => out.push((token, lexer.slice())),
            Err(()) => {
                return Err(ParseError::UnexpectedCharacter {
                    input: input.to_owned(),
                    offset: lexer.span().start,
                })
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: tokenize and return just the token variants.
    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            tokens("/ , . ( )"),
            vec![
                Token::Slash,
                Token::Comma,
                Token::Dot,
                Token::ParenOpen,
                Token::ParenClose,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let result = tokenize("10 -5 13.67 0").unwrap();
        assert_eq!(result[0], (Token::Number, "10"));
        assert_eq!(result[1], (Token::Number, "-5"));
        assert_eq!(result[2], (Token::Number, "13.67"));
        assert_eq!(result[3], (Token::Number, "0"));
    }

    #[test]
    fn test_dimensions() {
        let result = tokenize("1fr 50% 12px 1.5fr").unwrap();
        assert_eq!(result[0], (Token::Dimension, "1fr"));
        assert_eq!(result[1], (Token::Dimension, "50%"));
        assert_eq!(result[2], (Token::Dimension, "12px"));
        assert_eq!(result[3], (Token::Dimension, "1.5fr"));
    }

    #[test]
    fn test_grid_line() {
        assert_eq!(
            tokens("3 / span 4"),
            vec![Token::Number, Token::Slash, Token::Ident, Token::Number]
        );
    }

    #[test]
    fn test_hyphenated_idents() {
        let result = tokenize("flex-start just-here space-between").unwrap();
        assert_eq!(result[0], (Token::Ident, "flex-start"));
        assert_eq!(result[1], (Token::Ident, "just-here"));
        assert_eq!(result[2], (Token::Ident, "space-between"));
    }

    #[test]
    fn test_template_area_rows() {
        assert_eq!(
            tokens(r#""a a" 'b .'"#),
            vec![Token::StringLiteral, Token::StringLiteralSingle]
        );
    }

    #[test]
    fn test_repeat() {
        assert_eq!(
            tokens("repeat(3, 1fr)"),
            vec![
                Token::Ident,
                Token::ParenOpen,
                Token::Number,
                Token::Comma,
                Token::Dimension,
                Token::ParenClose,
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(tokens("   \t\n  ").is_empty());
    }

    #[test]
    fn test_rejects_unknown_character() {
        let err = tokenize("10 # 20").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedCharacter {
                input: "10 # 20".into(),
                offset: 3,
            }
        );
    }
}
