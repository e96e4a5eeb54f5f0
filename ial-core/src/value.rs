//! Attribute value types with syntactic typing.
//!
//! The syntax determines the type, not value sniffing: a quoted value is
//! always a string, and an unquoted value is matched against a fixed
//! literal grammar (nil words, booleans, based and decimal integers,
//! floats, identifiers) with string as the total fallback. Conversion
//! never fails - every input has a defined output.

use phf::phf_map;

use crate::token::QuoteKind;

/// Radix of an integer literal, kept for round-trip fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntBase {
    Binary,
    Octal,
    Decimal,
    Hex,
}

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Empty text, `nil`, or `null`.
    Nil,

    /// `true` or `false` (lowercase only).
    Bool(bool),

    /// `42`, `-17`, `0xFF`, `0o755`, `0b1010`.
    Integer { value: i64, base: IntBase },

    /// `3.14`, `-0.5`. Digits on both sides of a single dot.
    Float(f64),

    /// A symbolic bare word: `draft`, `API`, `_hidden`.
    Ident(String),

    /// Anything else, or any quoted value, verbatim.
    Str(String),
}

impl Value {
    /// True flag value for bare attributes.
    pub(crate) fn flag() -> Self {
        Value::Bool(true)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Text of an identifier or string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Ident(s) | Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

/// Fixed literal words. `phf` keeps the lookup table static.
#[derive(Clone, Copy)]
enum LiteralWord {
    Nil,
    True,
    False,
}

static LITERALS: phf::Map<&'static str, LiteralWord> = phf_map! {
    "nil" => LiteralWord::Nil,
    "null" => LiteralWord::Nil,
    "true" => LiteralWord::True,
    "false" => LiteralWord::False,
};

/// Canonicalize a raw key: hyphens become underscores, case is preserved.
pub fn convert_key(raw: &str) -> String {
    raw.replace('-', "_")
}

/// ASCII identifier: a letter or `_`, then letters, digits, or `_`.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Coerce raw value text to a typed value.
///
/// Quoted values pass through as literal strings, no interpretation -
/// even `"true"`, `"42"`, `"null"`. Unquoted text is matched against the
/// literal grammar; anything that misses every rule (including malformed
/// digit runs like `0xGG` or `3.14.1`, and digit runs overflowing `i64`)
/// stays a string of the original text.
pub fn convert_value(text: &str, quoted: bool) -> Value {
    if quoted {
        return Value::Str(text.to_string());
    }

    if text.is_empty() {
        return Value::Nil;
    }

    if let Some(word) = LITERALS.get(text) {
        return match word {
            LiteralWord::Nil => Value::Nil,
            LiteralWord::True => Value::Bool(true),
            LiteralWord::False => Value::Bool(false),
        };
    }

    if let Some(value) = try_parse_number(text) {
        return value;
    }

    if is_identifier(text) {
        return Value::Ident(text.to_string());
    }

    Value::Str(text.to_string())
}

/// Try the numeric literal shapes. Returns None when the text is not a
/// well-formed number, so the caller can fall through.
fn try_parse_number(text: &str) -> Option<Value> {
    let bytes = text.as_bytes();

    // Base prefixes take no sign and allow no underscores: the digit run
    // after the prefix must be non-empty and clean for the base.
    if let Some(digits) = text.strip_prefix("0x") {
        return parse_radix(digits, 16, IntBase::Hex, |b| b.is_ascii_hexdigit());
    }
    if let Some(digits) = text.strip_prefix("0o") {
        return parse_radix(digits, 8, IntBase::Octal, |b| (b'0'..=b'7').contains(&b));
    }
    if let Some(digits) = text.strip_prefix("0b") {
        return parse_radix(digits, 2, IntBase::Binary, |b| b == b'0' || b == b'1');
    }

    let (negative, rest) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        _ => (false, bytes),
    };
    if rest.is_empty() {
        return None;
    }

    // Decimal integer: digits only.
    if rest.iter().all(u8::is_ascii_digit) {
        let mut value: i64 = 0;
        for &b in rest {
            value = value.checked_mul(10)?.checked_add((b - b'0') as i64)?;
        }
        if negative {
            value = value.checked_neg()?;
        }
        return Some(Value::Integer {
            value,
            base: IntBase::Decimal,
        });
    }

    // Float: digits, one dot, digits. No exponent form.
    if let Some(dot) = rest.iter().position(|&b| b == b'.') {
        let (int_part, frac_part) = (&rest[..dot], &rest[dot + 1..]);
        if !int_part.is_empty()
            && !frac_part.is_empty()
            && int_part.iter().all(u8::is_ascii_digit)
            && frac_part.iter().all(u8::is_ascii_digit)
        {
            // The split guarantees the text is a plain f64 literal.
            let value: f64 = text.parse().ok()?;
            return Some(Value::Float(value));
        }
    }

    None
}

fn parse_radix(digits: &str, radix: i64, base: IntBase, valid: impl Fn(u8) -> bool) -> Option<Value> {
    let bytes = digits.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(|&b| valid(b)) {
        return None;
    }
    let mut value: i64 = 0;
    for &b in bytes {
        let digit = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            b'A'..=b'F' => b - b'A' + 10,
            _ => return None,
        };
        value = value.checked_mul(radix)?.checked_add(digit as i64)?;
    }
    Some(Value::Integer { value, base })
}

/// Resolve backslash escapes per the active quote character's rules.
///
/// Single quotes resolve only `\\` and `\'`; double quotes, backticks,
/// and unquoted text resolve `\n`, `\r`, `\t`, and `\<c>` to `<c>`. A
/// dangling trailing backslash stays literal (the tokenizer has already
/// reported it).
pub fn unescape(text: &str, quote: QuoteKind) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            None => out.push('\\'),
            Some(next) => match quote {
                QuoteKind::Single => match next {
                    '\\' | '\'' => out.push(next),
                    _ => {
                        out.push('\\');
                        out.push(next);
                    }
                },
                _ => match next {
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    _ => out.push(next),
                },
            },
        }
    }
    out
}
