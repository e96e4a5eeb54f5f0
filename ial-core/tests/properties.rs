//! Property-based tests for the IAL parser.
//!
//! These verify structural invariants that must hold for ANY input, not
//! just crafted examples. proptest generates random inputs and shrinks
//! failures to minimal cases.

use proptest::prelude::*;

use ial_core::{parse, token::tokenize, Options, Value};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        max_shrink_iters: 200,
        ..ProptestConfig::default()
    }
}

/// An ASCII identifier, the way keys and bare values are written.
fn identifier() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,8}"
}

// =============================================================================
// Property: parser never panics
// =============================================================================

proptest! {
    #![proptest_config(config())]

    /// The parser must never panic, in either mode, on any input.
    #[test]
    fn parser_never_panics(line in "\\PC{0,200}") {
        let _ = parse(&line, &Options::new());
        let _ = parse(&line, &Options::new().strict(true));
    }

    /// Syntax-heavy ASCII input exercises the dispatch paths harder.
    #[test]
    fn parser_never_panics_on_syntax_soup(line in "[a-z0-9#.:=@!'\"`\\\\ -]{0,120}") {
        let options = Options::new()
            .special_prefixes(['@', '!'])
            .allow_unknown(true);
        let _ = parse(&line, &options);
        let _ = parse(&line, &options.clone().strict(true));
    }
}

// =============================================================================
// Property: tokenizer round-trip
// =============================================================================

proptest! {
    #![proptest_config(config())]

    /// Tokens without quote, escape, or whitespace characters come back
    /// from the tokenizer byte-for-byte, in scan order, with offsets
    /// pointing at their first byte.
    #[test]
    fn plain_tokens_round_trip(words in prop::collection::vec("[a-zA-Z0-9#.:=_-]{1,12}", 0..8)) {
        let line = words.join(" ");
        let (tokens, warnings) = tokenize(&line, false).unwrap();
        prop_assert!(warnings.is_empty());
        prop_assert_eq!(tokens.len(), words.len());
        for (token, word) in tokens.iter().zip(&words) {
            prop_assert_eq!(&token.text, word);
            prop_assert_eq!(&line[token.start..token.start + word.len()], word.as_str());
        }
    }
}

// =============================================================================
// Property: class idempotence
// =============================================================================

proptest! {
    #![proptest_config(config())]

    /// Repeating class names never changes the resulting set.
    #[test]
    fn class_membership_is_idempotent(names in prop::collection::vec(identifier(), 1..6)) {
        let once = format!(".{}", names.join("."));
        let mut doubled = names.clone();
        doubled.extend(names.iter().cloned());
        let twice = format!(".{}", doubled.join("."));

        let a = parse(&once, &Options::new()).unwrap();
        let b = parse(&twice, &Options::new()).unwrap();
        prop_assert_eq!(a.attrs.classes, b.attrs.classes);
    }
}

// =============================================================================
// Property: lax mode is total for well-shaped input
// =============================================================================

proptest! {
    #![proptest_config(config())]

    /// Distinct identifier flags always parse in lax mode, each one
    /// landing in the map as a true flag, with no warnings.
    #[test]
    fn distinct_flags_all_land(keys in prop::collection::btree_set(identifier(), 0..6)) {
        let line = keys.iter().cloned().collect::<Vec<_>>().join(" ");
        let parsed = parse(&line, &Options::new()).unwrap();
        prop_assert!(parsed.warnings.is_empty());
        prop_assert_eq!(parsed.attrs.attributes.len(), keys.len());
        for key in &keys {
            prop_assert_eq!(parsed.attrs.attribute(key), Some(&Value::Bool(true)));
        }
    }

    /// A strict-mode error for a line implies at least one lax-mode
    /// warning or a hard assembler error, never a silent success.
    #[test]
    fn strict_errors_are_never_silently_fine_in_lax(line in "[a-z0-9#.:=\"'\\\\ ]{0,80}") {
        if parse(&line, &Options::new().strict(true)).is_err() {
            match parse(&line, &Options::new()) {
                Ok(parsed) => prop_assert!(!parsed.warnings.is_empty()),
                Err(_) => {} // hard duplicate, hard in both modes
            }
        }
    }
}
