//! Parse error taxonomy.
//!
//! One closed enum covers every failure the pipeline can report. In strict
//! mode these are returned as hard errors; in lax mode most of them travel
//! in the warning list instead (see `parse` for the exact policy). Positions
//! are byte offsets into the source line.

use thiserror::Error;

/// Every condition the parser can raise or warn about.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A quote was opened inside a token and never closed.
    #[error("unterminated quote in token starting at position {position}")]
    UnterminatedQuote { position: usize },

    /// The line ended while an escape was pending.
    #[error("escape character at end of token starting at position {position}")]
    TrailingEscape { position: usize },

    /// A bare token that fits no recognized shape, with unknown tokens
    /// disallowed.
    #[error("unknown token {text:?} at position {position}")]
    UnknownTokenShape { text: String, position: usize },

    /// A second id token. Hard error in both modes.
    #[error("duplicate id {id:?} at positions {first} and {second}")]
    DuplicateId {
        id: String,
        first: usize,
        second: usize,
    },

    /// A repeated key that was not declared multi-valued. Hard error in
    /// both modes.
    #[error("duplicate value for attribute {key:?} at position {position}")]
    DuplicateValue { key: String, position: usize },

    /// A key that does not match the identifier pattern.
    #[error("invalid key {key:?} at position {position}: must start with a letter or '_', followed by letters, digits, or '_'")]
    InvalidKey { key: String, position: usize },

    /// An attribute with no key text at all (`=value`).
    #[error("empty key at position {position}")]
    EmptyKey { position: usize },

    /// An extension namespace that is empty or not an identifier.
    #[error("invalid extension name {name:?} at position {position}")]
    InvalidExtensionName { name: String, position: usize },

    /// An extension nested key that is empty, missing, or not an identifier.
    #[error("invalid nested key {key:?} in extension at position {position}")]
    InvalidNestedKey { key: String, position: usize },

    /// More quoted segments in one token than the value grammar supports.
    #[error("unsupported quoting in token {text:?} at position {position}")]
    UnsupportedQuotingShape { text: String, position: usize },
}

impl ParseError {
    /// Byte offset of the offending token in the source line.
    pub fn position(&self) -> usize {
        match self {
            Self::UnterminatedQuote { position }
            | Self::TrailingEscape { position }
            | Self::UnknownTokenShape { position, .. }
            | Self::DuplicateValue { position, .. }
            | Self::InvalidKey { position, .. }
            | Self::EmptyKey { position }
            | Self::InvalidExtensionName { position, .. }
            | Self::InvalidNestedKey { position, .. }
            | Self::UnsupportedQuotingShape { position, .. } => *position,
            Self::DuplicateId { second, .. } => *second,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_kind_text_and_position() {
        let err = ParseError::InvalidKey {
            key: "data-x".to_string(),
            position: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("invalid key"));
        assert!(msg.contains("data-x"));
        assert!(msg.contains('7'));
    }

    #[test]
    fn duplicate_id_reports_both_positions() {
        let err = ParseError::DuplicateId {
            id: "y".to_string(),
            first: 0,
            second: 3,
        };
        assert_eq!(err.position(), 3);
        let msg = err.to_string();
        assert!(msg.contains("positions 0 and 3"));
    }
}
