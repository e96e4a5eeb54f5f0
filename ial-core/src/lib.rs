//! IAL Core Parser
//!
//! Parser for the inline attribute list (IAL) micro-syntax: a single line
//! of space-separated tokens such as `#id`, `.class`, `key=value`,
//! `ns:key=value`, `@special`, and bare flags, with shell-like quoting
//! and escaping, parsed into a validated, typed attribute map.
//!
//! # Architecture
//!
//! A five-stage pipeline, each stage consuming the previous stage's
//! output:
//!
//! - **token.rs** - Tokenizer: whitespace-delimited raw tokens with
//!   quote/escape tracking
//! - **classify.rs** - Classifier: token-shape dispatch and key/value
//!   splitting
//! - **value.rs** - TypeConverter: syntactic value typing and key
//!   canonicalization
//! - **validate.rs** - Validator: identifier legality and duplicate-id
//!   checks
//! - **attrs.rs** - Assembler: accumulation into the final `AttributeMap`
//!
//! # Example
//!
//! ```
//! use ial_core::{parse, Options, Value};
//!
//! let options = Options::new().special_prefixes(['@']);
//! let parsed = parse(".note #intro count=42 title=\"Hello\"", &options).unwrap();
//!
//! assert_eq!(parsed.attrs.id.as_deref(), Some("intro"));
//! assert!(parsed.attrs.has_class("note"));
//! assert_eq!(parsed.attrs.attribute("count").and_then(Value::as_integer), Some(42));
//! ```

pub mod attrs;
pub mod classify;
pub mod error;
pub mod parse;
pub mod token;
pub mod validate;
pub mod value;

pub use attrs::{AttributeMap, Entry, QuoteRecord};
pub use classify::{ClassifiedToken, TokenKind};
pub use error::ParseError;
pub use parse::{parse, Options, Parsed};
pub use token::{QuoteKind, RawToken};
pub use value::{IntBase, Value};
