//! Lexer for the template grammar using logos
//!
//! Every byte of input belongs to some token, so lexing never fails.
//! Column-sensitive rules (comment lines, `\%`) are left to the engine,
//! which knows the nesting level and can look at the preceding byte.

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Run of characters with no special meaning
    #[regex(r"[^\\@%]+")]
    Text,

    // Escape sequences
    #[token("\\\\")]
    EscapedBackslash,
    #[token("\\@")]
    EscapedDelimiter,
    #[token("\\%")]
    EscapedPrefix,

    /// Backslash not starting an escape sequence
    #[token("\\")]
    Backslash,

    /// `%%`, a comment line when at column 1
    #[token("%%")]
    IgnorePrefix,
    #[token("%")]
    Percent,

    /// `@@` not followed by an identifier
    #[token("@@")]
    Delimiter,

    /// `@@identifier`; the closing delimiter is checked by the engine
    #[regex(r"@@[A-Za-z][A-Za-z0-9_]*")]
    Placeholder,

    #[token("@")]
    At,
}

impl Token {
    /// Identifier part of a placeholder token, given the token's text
    pub fn identifier(self, slice: &str) -> Option<&str> {
        match self {
            Token::Placeholder => slice.get(2..),
            _ => None,
        }
    }
}

/// Lex input string into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| (tok.unwrap_or(Token::Text), span))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).map(|(t, _)| t).collect()
    }

    #[test]
    fn test_plain_text_is_one_token() {
        assert_eq!(tokens("hello, world\nagain"), vec![Token::Text]);
    }

    #[test]
    fn test_escape_sequences() {
        assert_eq!(
            tokens(r"\\\@\%\x"),
            vec![
                Token::EscapedBackslash,
                Token::EscapedDelimiter,
                Token::EscapedPrefix,
                Token::Backslash,
                Token::Text,
            ]
        );
    }

    #[test]
    fn test_placeholder_forms() {
        assert_eq!(
            tokens("@@name@@"),
            vec![Token::Placeholder, Token::Delimiter]
        );
        assert_eq!(tokens("@@name"), vec![Token::Placeholder]);
        assert_eq!(tokens("@@name@"), vec![Token::Placeholder, Token::At]);
        assert_eq!(tokens("@@a_1x"), vec![Token::Placeholder]);
    }

    #[test]
    fn test_delimiter_without_identifier() {
        assert_eq!(tokens("@@ x"), vec![Token::Delimiter, Token::Text]);
        assert_eq!(
            tokens("@@_x@@"),
            vec![Token::Delimiter, Token::Text, Token::Delimiter]
        );
        assert_eq!(tokens("a@b"), vec![Token::Text, Token::At, Token::Text]);
    }

    #[test]
    fn test_percent_forms() {
        assert_eq!(tokens("%%"), vec![Token::IgnorePrefix]);
        assert_eq!(tokens("%%%"), vec![Token::IgnorePrefix, Token::Percent]);
        assert_eq!(tokens("5%"), vec![Token::Text, Token::Percent]);
    }

    #[test]
    fn test_spans_cover_input() {
        let input = "a@@b@@c\\@%%d";
        let spans: Vec<_> = lex(input).map(|(_, s)| s).collect();
        assert_eq!(spans.first().map(|s| s.start), Some(0));
        assert_eq!(spans.last().map(|s| s.end), Some(input.len()));
        for pair in spans.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_identifier_extraction() {
        assert_eq!(Token::Placeholder.identifier("@@abc"), Some("abc"));
        assert_eq!(Token::Text.identifier("abc"), None);
    }
}
