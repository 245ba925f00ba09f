//! Template scanner

pub mod lexer;

use logos::Logos;

pub use lexer::{lex, Span, Token};

/// Lex the single token starting at `offset` of `source`.
///
/// The engine resumes scanning at arbitrary offsets (after a nested
/// expansion, or one byte into a token it rejected), so there is no long
/// lived lexer. Spans are absolute positions in `source`. Returns `None` at
/// end of input.
pub fn token_at(source: &str, offset: usize) -> Option<(Token, Span)> {
    let rest = source.get(offset..)?;
    let mut lexer = Token::lexer(rest);
    let token = lexer.next()?.unwrap_or(Token::Text);
    let span = lexer.span();
    Some((token, offset + span.start..offset + span.end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_at_uses_absolute_spans() {
        let source = "ab@@x@@ cd";
        assert_eq!(token_at(source, 0), Some((Token::Text, 0..2)));
        assert_eq!(token_at(source, 2), Some((Token::Placeholder, 2..5)));
        assert_eq!(token_at(source, 5), Some((Token::Delimiter, 5..7)));
        assert_eq!(token_at(source, 7), Some((Token::Text, 7..10)));
        assert_eq!(token_at(source, 10), None);
    }

    #[test]
    fn test_closing_delimiter_before_letter_lexes_as_placeholder() {
        // The engine only looks at the closing `@@` itself and resumes
        // after it, so this token is never acted on when `x` is closed
        let source = "@@x@@cd";
        assert_eq!(token_at(source, 0), Some((Token::Placeholder, 0..3)));
        assert_eq!(token_at(source, 3), Some((Token::Placeholder, 3..7)));
    }

    #[test]
    fn test_token_at_can_restart_inside_a_token() {
        let source = "@@x@@";
        assert_eq!(token_at(source, 1), Some((Token::At, 1..2)));
        assert_eq!(token_at(source, 2), Some((Token::Text, 2..3)));
    }
}
