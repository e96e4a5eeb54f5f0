//! Parse entry point: wires the five pipeline stages together.
//!
//! Data flows strictly left to right - tokenize, classify, type-convert,
//! validate, assemble - with no stage re-reading the raw source. All
//! configuration is carried in an `Options` value passed per call;
//! nothing is process-global, so concurrent parses are independent.

use std::collections::BTreeSet;

use crate::attrs::{assemble, AttributeMap, TypedToken};
use crate::classify::{classify, ClassifiedToken, TokenKind};
use crate::error::ParseError;
use crate::token::{tokenize, QuoteKind};
use crate::validate::validate;
use crate::value::{convert_key, convert_value, unescape, Value};

/// Per-call parser configuration. Everything defaults off/empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Escalate all recoverable conditions to errors, failing fast.
    pub strict: bool,
    /// Characters that introduce `Special` tokens (e.g. `@`, `!`).
    pub special_prefixes: Vec<char>,
    /// Keys (including `namespace:key`) that accumulate into ordered
    /// sequences instead of failing on repetition.
    pub multiple_values: BTreeSet<String>,
    /// Keep literal quote characters in output values.
    pub preserve_quotes: bool,
    /// Keep literal backslash-escape sequences in output values.
    pub preserve_escape: bool,
    /// Route unclassifiable tokens into the unknown bucket instead of
    /// raising.
    pub allow_unknown: bool,
    /// Bypass type coercion; every value comes back as literal text.
    pub raw_string_values: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn special_prefixes(mut self, prefixes: impl IntoIterator<Item = char>) -> Self {
        self.special_prefixes = prefixes.into_iter().collect();
        self
    }

    pub fn multiple_values<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.multiple_values = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn preserve_quotes(mut self, preserve: bool) -> Self {
        self.preserve_quotes = preserve;
        self
    }

    pub fn preserve_escape(mut self, preserve: bool) -> Self {
        self.preserve_escape = preserve;
        self
    }

    pub fn allow_unknown(mut self, allow: bool) -> Self {
        self.allow_unknown = allow;
        self
    }

    pub fn raw_string_values(mut self, raw: bool) -> Self {
        self.raw_string_values = raw;
        self
    }
}

/// A successful parse: the attribute map plus the warnings collected in
/// lax mode (always empty in strict mode, where conditions fail instead).
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub attrs: AttributeMap,
    pub warnings: Vec<ParseError>,
}

/// Parse one inline attribute list line.
///
/// Strict mode fails on the first recoverable condition. Lax mode returns
/// a best-effort map plus warnings, except that id and key duplication
/// stay hard errors in both modes.
pub fn parse(line: &str, options: &Options) -> Result<Parsed, ParseError> {
    let (raw_tokens, mut warnings) = tokenize(line, options.strict)?;

    let classified: Vec<ClassifiedToken> = raw_tokens
        .iter()
        .map(|token| classify(token, &options.special_prefixes))
        .collect();

    warnings.extend(validate(
        &classified,
        options.strict,
        &options.special_prefixes,
    )?);

    let mut typed = Vec::with_capacity(classified.len());
    for ct in classified {
        // The value grammar supports at most one quoted segment per token.
        if ct.source.quote_runs > 1 {
            let err = ParseError::UnsupportedQuotingShape {
                text: ct.source.text.clone(),
                position: ct.position(),
            };
            if options.strict {
                return Err(err);
            }
            warnings.push(err);
            continue;
        }

        if ct.kind == TokenKind::Unknown && !options.allow_unknown {
            let err = ParseError::UnknownTokenShape {
                text: ct.source.text.clone(),
                position: ct.position(),
            };
            if options.strict {
                return Err(err);
            }
            warnings.push(err);
            continue;
        }

        typed.push(resolve(ct, options));
    }

    let attrs = assemble(typed, &options.multiple_values)?;
    Ok(Parsed { attrs, warnings })
}

/// Turn a classified token into its typed form, applying the quote,
/// escape, and coercion options.
fn resolve(ct: ClassifiedToken, options: &Options) -> TypedToken {
    let position = ct.position();

    match ct.kind {
        TokenKind::Id | TokenKind::Class => TypedToken {
            kind: ct.kind,
            key: None,
            namespace: None,
            value: Value::Str(resolved_text(&ct, options).unwrap_or_default()),
            quote: ct.quote,
            position,
        },

        TokenKind::Attribute | TokenKind::Special | TokenKind::Extension => {
            let key = ct.key.as_deref().map(convert_key);
            let namespace = ct.namespace.as_deref().map(convert_key);
            let (value, quote) = match resolved_text(&ct, options) {
                // Bare flag: no value text at all.
                None => (Value::flag(), QuoteKind::None),
                Some(text) => {
                    let value = if options.raw_string_values {
                        Value::Str(text)
                    } else {
                        convert_value(&text, ct.source.quoted)
                    };
                    (value, ct.quote)
                }
            };
            TypedToken {
                kind: ct.kind,
                key,
                namespace,
                value,
                quote,
                position,
            }
        }

        TokenKind::Unknown => TypedToken {
            kind: TokenKind::Unknown,
            key: None,
            namespace: None,
            value: Value::Str(ct.source.text.clone()),
            quote: ct.quote,
            position,
        },
    }
}

/// The token's value text after the quote and escape options are applied:
/// the quote-stripped form unless quotes are preserved, unescaped per the
/// wrapping quote's rules unless escapes are preserved.
fn resolved_text(ct: &ClassifiedToken, options: &Options) -> Option<String> {
    let chosen = if options.preserve_quotes {
        ct.raw_value.as_deref()?
    } else {
        ct.value.as_deref()?
    };
    if options.preserve_escape {
        Some(chosen.to_string())
    } else {
        Some(unescape(chosen, ct.quote))
    }
}
