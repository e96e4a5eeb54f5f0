//! Tokenizer: splits a line into whitespace-delimited raw tokens.
//!
//! A single forward scan with a three-state machine per token:
//! Normal, Escaped, InQuote(char). Escaping and quoting only *protect*
//! characters from acting as delimiters here; nothing is unescaped or
//! unquoted at this stage - both stay literal in the token text for the
//! later stages to interpret.

use crate::error::ParseError;

/// The quote character that opened quoting for a token, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteKind {
    #[default]
    None,
    Double,
    Single,
    Backtick,
}

impl QuoteKind {
    /// Map a quote character to its kind.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '"' => Some(Self::Double),
            '\'' => Some(Self::Single),
            '`' => Some(Self::Backtick),
            _ => None,
        }
    }

    /// The literal quote character, if any.
    pub fn as_char(self) -> Option<char> {
        match self {
            Self::None => None,
            Self::Double => Some('"'),
            Self::Single => Some('\''),
            Self::Backtick => Some('`'),
        }
    }
}

/// One whitespace-delimited unit of the source line, quotes and escapes
/// still in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    /// Raw text, including any quote characters and backslash pairs.
    pub text: String,
    /// Byte offset of the token start in the source line.
    pub start: usize,
    /// True if a quote was opened anywhere in the token, even if it was
    /// later closed. Does not mean the whole token is wrapped in quotes.
    pub quoted: bool,
    /// Kind of the first quote opened in the token.
    pub quote: QuoteKind,
    /// Number of properly closed quoted segments.
    pub quote_runs: u8,
}

/// Split a line into raw tokens, left to right.
///
/// Strict mode fails on the first malformed token. Lax mode records a
/// warning, drops the malformed token, and keeps scanning.
pub fn tokenize(line: &str, strict: bool) -> Result<(Vec<RawToken>, Vec<ParseError>), ParseError> {
    let mut tokens = Vec::new();
    let mut warnings = Vec::new();

    let mut chars = line.char_indices().peekable();
    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        match scan_token(&mut chars, start) {
            Ok(token) => tokens.push(token),
            Err(err) => {
                if strict {
                    return Err(err);
                }
                warnings.push(err);
            }
        }
    }

    Ok((tokens, warnings))
}

/// Scan one token starting at `start`. The iterator is left positioned on
/// the delimiting whitespace (or at end of input).
fn scan_token(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    start: usize,
) -> Result<RawToken, ParseError> {
    let mut text = String::new();
    let mut escaped = false;
    let mut in_quote: Option<char> = None;
    let mut quoted = false;
    let mut quote = QuoteKind::None;
    let mut quote_runs: u8 = 0;

    while let Some(&(_, c)) = chars.peek() {
        if escaped {
            text.push(c);
            escaped = false;
            chars.next();
            continue;
        }

        if c == '\\' {
            text.push(c);
            escaped = true;
            chars.next();
            continue;
        }

        if let Some(kind) = QuoteKind::from_char(c) {
            match in_quote {
                Some(open) if open == c => {
                    text.push(c);
                    in_quote = None;
                    quote_runs = quote_runs.saturating_add(1);
                }
                Some(_) => {
                    // A different quote inside an active quote is plain text.
                    text.push(c);
                }
                None => {
                    text.push(c);
                    in_quote = Some(c);
                    if !quoted {
                        quoted = true;
                        quote = kind;
                    }
                }
            }
            chars.next();
            continue;
        }

        if c.is_whitespace() && in_quote.is_none() {
            break;
        }

        text.push(c);
        chars.next();
    }

    if in_quote.is_some() {
        return Err(ParseError::UnterminatedQuote { position: start });
    }
    if escaped {
        return Err(ParseError::TrailingEscape { position: start });
    }

    Ok(RawToken {
        text,
        start,
        quoted,
        quote,
        quote_runs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(line: &str) -> Vec<String> {
        let (tokens, warnings) = tokenize(line, false).unwrap();
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        tokens.into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn splits_unquoted_tokens() {
        assert_eq!(raw("count=42 active hidden"), vec!["count=42", "active", "hidden"]);
    }

    #[test]
    fn quoted_value_keeps_the_space() {
        let tokens = raw("title=\"Hello world\"");
        assert_eq!(tokens, vec!["title=\"Hello world\""]);
    }

    #[test]
    fn records_offsets_and_quote_state() {
        let (tokens, _) = tokenize(".term  title=\"Hi\"", false).unwrap();
        assert_eq!(tokens[0].start, 0);
        assert!(!tokens[0].quoted);
        assert_eq!(tokens[1].start, 7);
        assert!(tokens[1].quoted);
        assert_eq!(tokens[1].quote, QuoteKind::Double);
        assert_eq!(tokens[1].quote_runs, 1);
    }

    #[test]
    fn escaped_space_does_not_delimit() {
        assert_eq!(raw(r"index:API=REST\ API"), vec![r"index:API=REST\ API"]);
    }

    #[test]
    fn escaped_quote_does_not_open_quoting() {
        let (tokens, _) = tokenize(r#"a=\"b"#, false).unwrap();
        assert_eq!(tokens[0].text, r#"a=\"b"#);
        assert!(!tokens[0].quoted);
    }

    #[test]
    fn other_quote_inside_quote_is_plain_text() {
        let (tokens, _) = tokenize(r#"t="it's fine""#, false).unwrap();
        assert_eq!(tokens[0].text, r#"t="it's fine""#);
        assert_eq!(tokens[0].quote_runs, 1);
    }

    #[test]
    fn quoted_stays_true_after_quote_closes() {
        let (tokens, _) = tokenize(r#"a="b"c"#, false).unwrap();
        assert!(tokens[0].quoted);
        assert_eq!(tokens[0].quote_runs, 1);
    }

    #[test]
    fn two_quote_runs_are_counted() {
        let (tokens, _) = tokenize(r#"a="b"c"d""#, false).unwrap();
        assert_eq!(tokens[0].quote_runs, 2);
    }

    #[test]
    fn unterminated_quote_strict() {
        let err = tokenize("title=\"Hello", true).unwrap_err();
        assert_eq!(err, ParseError::UnterminatedQuote { position: 0 });
    }

    #[test]
    fn unterminated_quote_lax_drops_the_token() {
        let (tokens, warnings) = tokenize("ok=1 title=\"Hello", false).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "ok=1");
        assert_eq!(warnings, vec![ParseError::UnterminatedQuote { position: 5 }]);
    }

    #[test]
    fn trailing_escape_strict() {
        let err = tokenize(r"bad\", true).unwrap_err();
        assert_eq!(err, ParseError::TrailingEscape { position: 0 });
    }

    #[test]
    fn trailing_escape_lax_drops_the_token() {
        let (tokens, warnings) = tokenize("a=1 bad\\", false).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "a=1");
        assert_eq!(warnings, vec![ParseError::TrailingEscape { position: 4 }]);
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(raw("").is_empty());
        assert!(raw("   \t ").is_empty());
    }
}
