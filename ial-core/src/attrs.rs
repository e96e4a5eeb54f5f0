//! Assembler: folds the typed token stream into the final attribute map.
//!
//! Accumulation semantics live here: id uniqueness, class set membership,
//! multi-valued keys, extension namespacing, the unknown bucket, and the
//! quote provenance side channel. Id and key duplication are structural
//! invariant violations and fail hard in both strict and lax modes.
//!
//! The assembler never coerces values itself; it receives `Value`s the
//! pipeline has already prepared.

use std::collections::{BTreeMap, BTreeSet};

use crate::classify::TokenKind;
use crate::error::ParseError;
use crate::token::QuoteKind;
use crate::value::Value;

/// A stored attribute: a single value, or an ordered sequence for keys
/// declared multi-valued.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    One(Value),
    Many(Vec<Value>),
}

impl Entry {
    /// The single value, if this entry is not multi-valued.
    pub fn one(&self) -> Option<&Value> {
        match self {
            Entry::One(v) => Some(v),
            Entry::Many(_) => None,
        }
    }

    /// The value sequence, if this entry is multi-valued.
    pub fn many(&self) -> Option<&[Value]> {
        match self {
            Entry::One(_) => None,
            Entry::Many(vs) => Some(vs),
        }
    }
}

/// Which quote character produced a stored value. The `Many` form keeps
/// one slot per occurrence (`QuoteKind::None` for unquoted ones) so
/// indices line up with the value sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteRecord {
    One(QuoteKind),
    Many(Vec<QuoteKind>),
}

/// Provenance key for the unknown-token bucket.
pub const UNKNOWN_KEY: &str = "_unknown";

/// The parse result: ids, classes, typed attributes, namespaced
/// extensions, the unknown bucket, and quote provenance for faithful
/// re-serialization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeMap {
    /// At most one id per parse.
    pub id: Option<String>,
    /// Class membership is idempotent; insertion order is irrelevant.
    pub classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, Entry>,
    pub extensions: BTreeMap<String, BTreeMap<String, Entry>>,
    /// Raw text of unclassifiable tokens, in encounter order. Populated
    /// only when the caller permits unknown tokens.
    pub unknown: Vec<String>,
    /// Keyed by `key`, `namespace:key`, or `_unknown`.
    pub quotes: BTreeMap<String, QuoteRecord>,
}

impl AttributeMap {
    /// Single value of a top-level attribute, if present and not
    /// multi-valued.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).and_then(Entry::one)
    }

    /// Single value of an extension attribute.
    pub fn extension(&self, namespace: &str, key: &str) -> Option<&Value> {
        self.extensions
            .get(namespace)
            .and_then(|sub| sub.get(key))
            .and_then(Entry::one)
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
            && self.extensions.is_empty()
            && self.unknown.is_empty()
            && self.quotes.is_empty()
    }
}

/// A classified token with its value already typed by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TypedToken {
    pub kind: TokenKind,
    /// Canonical key (hyphens converted), or the prefix character for
    /// special tokens.
    pub key: Option<String>,
    /// Canonical extension namespace.
    pub namespace: Option<String>,
    pub value: Value,
    pub quote: QuoteKind,
    pub position: usize,
}

/// Fold the typed token stream into an `AttributeMap`, left to right.
pub(crate) fn assemble(
    tokens: Vec<TypedToken>,
    multiple_values: &BTreeSet<String>,
) -> Result<AttributeMap, ParseError> {
    let mut map = AttributeMap::default();
    let mut id_position = 0usize;

    for token in tokens {
        match token.kind {
            TokenKind::Id => {
                let id = match &token.value {
                    Value::Str(s) | Value::Ident(s) => s.clone(),
                    other => format!("{other:?}"),
                };
                if map.id.is_some() {
                    return Err(ParseError::DuplicateId {
                        id,
                        first: id_position,
                        second: token.position,
                    });
                }
                map.id = Some(id);
                id_position = token.position;
            }

            TokenKind::Class => {
                // The value is a dot-separated class list; empty segments
                // carry no class name.
                if let Some(list) = token.value.as_str() {
                    for name in list.split('.').filter(|name| !name.is_empty()) {
                        map.classes.insert(name.to_string());
                    }
                }
            }

            TokenKind::Attribute | TokenKind::Special => {
                let key = token.key.clone().unwrap_or_default();
                let multi = multiple_values.contains(&key);
                push_entry(
                    &mut map.attributes,
                    &mut map.quotes,
                    key.clone(),
                    key,
                    token.value,
                    token.quote,
                    multi,
                    token.position,
                )?;
            }

            TokenKind::Extension => {
                let namespace = token.namespace.clone().unwrap_or_default();
                let key = token.key.clone().unwrap_or_default();
                let provenance_key = format!("{namespace}:{key}");
                let multi = multiple_values.contains(&provenance_key);
                let sub = map.extensions.entry(namespace).or_default();
                push_entry(
                    sub,
                    &mut map.quotes,
                    key,
                    provenance_key,
                    token.value,
                    token.quote,
                    multi,
                    token.position,
                )?;
            }

            TokenKind::Unknown => {
                let text = match token.value {
                    Value::Str(s) => s,
                    other => format!("{other:?}"),
                };
                map.unknown.push(text);
                match map
                    .quotes
                    .entry(UNKNOWN_KEY.to_string())
                    .or_insert_with(|| QuoteRecord::Many(Vec::new()))
                {
                    QuoteRecord::Many(slots) => slots.push(token.quote),
                    QuoteRecord::One(_) => {}
                }
            }
        }
    }

    Ok(map)
}

/// Insert one value under `key`, enforcing the multiplicity/duplicate
/// policy and recording quote provenance under `provenance_key`.
#[allow(clippy::too_many_arguments)]
fn push_entry(
    entries: &mut BTreeMap<String, Entry>,
    quotes: &mut BTreeMap<String, QuoteRecord>,
    key: String,
    provenance_key: String,
    value: Value,
    quote: QuoteKind,
    multi: bool,
    position: usize,
) -> Result<(), ParseError> {
    if multi {
        match entries.entry(key).or_insert_with(|| Entry::Many(Vec::new())) {
            Entry::Many(values) => values.push(value),
            Entry::One(_) => {}
        }
        match quotes
            .entry(provenance_key)
            .or_insert_with(|| QuoteRecord::Many(Vec::new()))
        {
            QuoteRecord::Many(slots) => slots.push(quote),
            QuoteRecord::One(_) => {}
        }
        return Ok(());
    }

    if entries.contains_key(&key) {
        return Err(ParseError::DuplicateValue {
            key: provenance_key,
            position,
        });
    }
    entries.insert(key, Entry::One(value));
    if quote != QuoteKind::None {
        quotes.insert(provenance_key, QuoteRecord::One(quote));
    }
    Ok(())
}
