//! Classifier: decides each raw token's syntactic kind and splits it into
//! raw key/value parts.
//!
//! Pure shape dispatch, tried in a fixed precedence order: special prefix,
//! `.class`, `#id`, `ns:...`, `key=value`, bare flag. No type conversion
//! and no validation happen here - raw strings in, raw strings out. The
//! only transformation is stripping one layer of enclosing quotes from an
//! extracted value, and only when that value is wholly wrapped in the
//! quote character that opened quoting for the token.

use memchr::memchr;

use crate::token::{QuoteKind, RawToken};

/// Syntactic kind of a classified token. Closed set; the assembler
/// matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Id,
    Class,
    Extension,
    Attribute,
    Special,
    Unknown,
}

/// A token with its kind decided and key/value parts split out.
///
/// `raw_value` keeps quotes in place exactly as tokenized; `value` is the
/// same text with one layer of wholly-wrapping quotes stripped (escape
/// sequences stay literal either way). `quote` records the wrapping quote
/// kind when a strip applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedToken {
    pub kind: TokenKind,
    /// Raw key text: the prefix character for `Special`, the part before
    /// `=` for attributes, the nested key for extensions, the whole text
    /// for bare flags.
    pub key: Option<String>,
    /// Extension namespace (raw, before key conversion).
    pub namespace: Option<String>,
    pub raw_value: Option<String>,
    pub value: Option<String>,
    pub quote: QuoteKind,
    pub source: RawToken,
}

impl ClassifiedToken {
    /// Byte offset of the source token in the line.
    pub fn position(&self) -> usize {
        self.source.start
    }

    /// The key text the validator checks: the full raw token for special
    /// tokens, `namespace:key` for extensions, the raw key otherwise.
    pub fn raw_key(&self) -> String {
        match self.kind {
            TokenKind::Special => self.source.text.clone(),
            TokenKind::Extension => format!(
                "{}:{}",
                self.namespace.as_deref().unwrap_or(""),
                self.key.as_deref().unwrap_or("")
            ),
            _ => self.key.clone().unwrap_or_default(),
        }
    }
}

/// Does the text fit the relaxed bare-flag shape? Letters, digits,
/// underscores and hyphens after a letter or underscore. Hyphenated flags
/// still classify (the validator warns about them separately); anything
/// looser is `Unknown`.
fn is_flag_shape(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Classify one raw token. Pure; never fails.
pub fn classify(token: &RawToken, special_prefixes: &[char]) -> ClassifiedToken {
    let text = token.text.as_str();

    // 1. Special prefix: @"Chapter 1", !draft
    if let Some(first) = text.chars().next() {
        if special_prefixes.contains(&first) {
            let rest = &text[first.len_utf8()..];
            let (value, quote) = extract_value(rest, token);
            return ClassifiedToken {
                kind: TokenKind::Special,
                key: Some(first.to_string()),
                namespace: None,
                raw_value: Some(rest.to_string()),
                value: Some(value),
                quote,
                source: token.clone(),
            };
        }
    }

    // 2. Class: .term
    if let Some(rest) = text.strip_prefix('.') {
        let (value, quote) = extract_value(rest, token);
        return ClassifiedToken {
            kind: TokenKind::Class,
            key: None,
            namespace: None,
            raw_value: Some(rest.to_string()),
            value: Some(value),
            quote,
            source: token.clone(),
        };
    }

    // 3. Id: #def1
    if let Some(rest) = text.strip_prefix('#') {
        let (value, quote) = extract_value(rest, token);
        return ClassifiedToken {
            kind: TokenKind::Id,
            key: None,
            namespace: None,
            raw_value: Some(rest.to_string()),
            value: Some(value),
            quote,
            source: token.clone(),
        };
    }

    // 4. Extension: ns:key=value, ns:flag. The remainder after the first
    // ':' is classified as its own attribute-shaped token; a further ':'
    // is swallowed into the nested key text.
    if let Some(colon) = memchr(b':', text.as_bytes()) {
        let namespace = &text[..colon];
        let rest = &text[colon + 1..];
        let mut inner = classify_attribute_shape(rest, token, true);
        inner.kind = TokenKind::Extension;
        inner.namespace = Some(namespace.to_string());
        return inner;
    }

    // 5/6. Attribute or bare flag; anything shapeless is Unknown.
    classify_attribute_shape(text, token, false)
}

/// Attribute-shape classification for a (sub)token: `key=value`, bare
/// flag, or `Unknown`. Shared by the top-level dispatch and the extension
/// remainder; a nested remainder is always kept as a flag key, whatever
/// its shape, so the validator gets to report it.
fn classify_attribute_shape(text: &str, token: &RawToken, nested: bool) -> ClassifiedToken {
    if let Some(eq) = memchr(b'=', text.as_bytes()) {
        let key = &text[..eq];
        let rest = &text[eq + 1..];
        let (value, quote) = extract_value(rest, token);
        return ClassifiedToken {
            kind: TokenKind::Attribute,
            key: Some(key.to_string()),
            namespace: None,
            raw_value: Some(rest.to_string()),
            value: Some(value),
            quote,
            source: token.clone(),
        };
    }

    if nested || is_flag_shape(text) {
        // Bare flag: value absent, distinct from `key=` (empty string).
        return ClassifiedToken {
            kind: TokenKind::Attribute,
            key: Some(text.to_string()),
            namespace: None,
            raw_value: None,
            value: None,
            quote: QuoteKind::None,
            source: token.clone(),
        };
    }

    ClassifiedToken {
        kind: TokenKind::Unknown,
        key: None,
        namespace: None,
        raw_value: Some(text.to_string()),
        value: Some(text.to_string()),
        quote: QuoteKind::None,
        source: token.clone(),
    }
}

/// Strip one layer of enclosing quotes, but only when the extracted
/// substring itself starts and ends with the quote character that opened
/// quoting for the token. Multiple quoted segments or a quote that does
/// not wrap the whole value are left as raw text. No unescaping.
fn extract_value(value: &str, token: &RawToken) -> (String, QuoteKind) {
    if token.quoted && value.len() >= 2 {
        if let Some(q) = token.quote.as_char() {
            if value.starts_with(q) && value.ends_with(q) {
                return (value[1..value.len() - 1].to_string(), token.quote);
            }
        }
    }
    (value.to_string(), QuoteKind::None)
}
