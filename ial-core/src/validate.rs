//! Validator: identifier legality and duplicate-id checks over the
//! classified token stream.
//!
//! Checks are per-token except for a running set of ids already seen.
//! Strict mode fails fast on the first violation in scan order; lax mode
//! collects every violation as a warning and lets parsing continue.

use std::collections::HashMap;

use crate::classify::{ClassifiedToken, TokenKind};
use crate::error::ParseError;
use crate::value::is_identifier;

/// Does the key start with a configured special prefix and carry more
/// characters after it? A bare prefix character is not exempt.
fn has_special_prefix(key: &str, special_prefixes: &[char]) -> bool {
    special_prefixes
        .iter()
        .any(|&p| key.starts_with(p) && key.len() > p.len_utf8())
}

/// Validate a classified token sequence.
///
/// Returns the collected warnings in lax mode; in strict mode the first
/// violation is returned as an error and the warning list stays empty.
pub fn validate(
    tokens: &[ClassifiedToken],
    strict: bool,
    special_prefixes: &[char],
) -> Result<Vec<ParseError>, ParseError> {
    let mut warnings = Vec::new();
    let mut seen_ids: HashMap<String, usize> = HashMap::new();

    let report = |err: ParseError, warnings: &mut Vec<ParseError>| -> Result<(), ParseError> {
        if strict {
            Err(err)
        } else {
            warnings.push(err);
            Ok(())
        }
    };

    for ct in tokens {
        let pos = ct.position();

        match ct.kind {
            TokenKind::Id => {
                let id = ct.value.clone().unwrap_or_default();
                if let Some(&first) = seen_ids.get(&id) {
                    report(
                        ParseError::DuplicateId {
                            id,
                            first,
                            second: pos,
                        },
                        &mut warnings,
                    )?;
                } else {
                    seen_ids.insert(id, pos);
                }
            }

            TokenKind::Attribute | TokenKind::Special => {
                let raw_key = ct.raw_key();
                if raw_key.is_empty() {
                    report(ParseError::EmptyKey { position: pos }, &mut warnings)?;
                    continue;
                }
                if !has_special_prefix(&raw_key, special_prefixes) && !is_identifier(&raw_key) {
                    report(
                        ParseError::InvalidKey {
                            key: raw_key,
                            position: pos,
                        },
                        &mut warnings,
                    )?;
                }
            }

            TokenKind::Extension => {
                let raw_key = ct.raw_key();
                let (namespace, nested) = match raw_key.split_once(':') {
                    Some((ns, nested)) => (ns, Some(nested)),
                    None => (raw_key.as_str(), None),
                };

                if namespace.is_empty() {
                    report(
                        ParseError::InvalidExtensionName {
                            name: String::new(),
                            position: pos,
                        },
                        &mut warnings,
                    )?;
                    continue;
                }
                if !is_identifier(namespace) {
                    report(
                        ParseError::InvalidExtensionName {
                            name: namespace.to_string(),
                            position: pos,
                        },
                        &mut warnings,
                    )?;
                }

                // A second ':' is part of the nested key text, taken whole.
                let nested = match nested {
                    Some(k) if !k.is_empty() => k,
                    _ => {
                        report(
                            ParseError::InvalidNestedKey {
                                key: String::new(),
                                position: pos,
                            },
                            &mut warnings,
                        )?;
                        continue;
                    }
                };
                if !has_special_prefix(nested, special_prefixes) && !is_identifier(nested) {
                    report(
                        ParseError::InvalidNestedKey {
                            key: nested.to_string(),
                            position: pos,
                        },
                        &mut warnings,
                    )?;
                }
            }

            TokenKind::Class | TokenKind::Unknown => {}
        }
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::token::tokenize;

    const PREFIXES: &[char] = &['@', '!'];

    fn classified(line: &str) -> Vec<ClassifiedToken> {
        let (tokens, _) = tokenize(line, false).unwrap();
        tokens.iter().map(|t| classify(t, PREFIXES)).collect()
    }

    fn warnings_for(line: &str) -> Vec<ParseError> {
        validate(&classified(line), false, PREFIXES).unwrap()
    }

    #[test]
    fn valid_keys_produce_no_warnings() {
        assert!(warnings_for("count=42 color= draft _hidden API").is_empty());
    }

    #[test]
    fn duplicate_id_value_warns_with_both_positions() {
        let warnings = warnings_for("#id1 other #id1");
        assert_eq!(
            warnings,
            vec![ParseError::DuplicateId {
                id: "id1".to_string(),
                first: 0,
                second: 11,
            }]
        );
    }

    #[test]
    fn duplicate_id_value_raises_in_strict() {
        let err = validate(&classified("#id1 #id1"), true, PREFIXES).unwrap_err();
        assert!(matches!(err, ParseError::DuplicateId { .. }));
    }

    #[test]
    fn distinct_ids_pass_validation() {
        // The assembler still rejects a second id; validation itself only
        // tracks repeated id values.
        assert!(warnings_for("#a #b").is_empty());
    }

    #[test]
    fn invalid_keys_collect_all_warnings_in_lax() {
        let warnings = warnings_for("data-x=1 =red");
        assert_eq!(warnings.len(), 2);
        assert!(matches!(
            &warnings[0],
            ParseError::InvalidKey { key, .. } if key == "data-x"
        ));
        assert_eq!(warnings[1], ParseError::EmptyKey { position: 9 });
    }

    #[test]
    fn strict_fails_fast_on_the_first_violation() {
        let err = validate(&classified("data-x=1 =red"), true, PREFIXES).unwrap_err();
        assert!(matches!(err, ParseError::InvalidKey { key, .. } if key == "data-x"));
    }

    #[test]
    fn special_prefixed_keys_are_exempt() {
        assert!(warnings_for("@\"Chapter 1\" !draft @invalid").is_empty());
    }

    #[test]
    fn bare_prefix_character_is_not_exempt() {
        let warnings = warnings_for("@");
        assert_eq!(warnings.len(), 1);
        assert!(matches!(&warnings[0], ParseError::InvalidKey { key, .. } if key == "@"));
    }

    #[test]
    fn extension_edge_cases() {
        let warnings = warnings_for(":empty=val valid:= valid::nested x-y:valid valid:3d");
        assert_eq!(
            warnings,
            vec![
                ParseError::InvalidExtensionName { name: String::new(), position: 0 },
                ParseError::InvalidNestedKey { key: String::new(), position: 11 },
                ParseError::InvalidNestedKey { key: ":nested".to_string(), position: 19 },
                ParseError::InvalidExtensionName { name: "x-y".to_string(), position: 33 },
                ParseError::InvalidNestedKey { key: "3d".to_string(), position: 43 },
            ]
        );
    }

    #[test]
    fn special_prefixed_nested_key_is_exempt() {
        assert!(warnings_for("ns:@mark=1").is_empty());
    }
}
