//! Literal classification by lexical form.

use mova_types::{PrimitiveKind, Type};

/// Type of a literal from its source text.
///
/// `true`/`false` are `bool`; `@0x1` and bare hex `0x1` are addresses;
/// digits take their suffix (`42u8`) or default to `u64`; a hex number with
/// an integer suffix (`0xffu8`) is that integer; `b"…"` and `x"…"` are
/// `vector<u8>`; `"…"` is a string.
pub(crate) fn classify(text: &str) -> Type {
    match text {
        "true" | "false" => return Type::BOOL,
        _ => {}
    }
    if text.starts_with('@') {
        return Type::ADDRESS;
    }
    if text.starts_with("b\"") || text.starts_with("x\"") {
        return Type::vector(Type::U8);
    }
    if text.starts_with('"') {
        return Type::STRING;
    }
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return match split_suffix(hex, |c| c.is_ascii_hexdigit()) {
            Some((_, "")) => Type::ADDRESS,
            Some((_, suffix)) => integer(suffix),
            None => Type::Unknown,
        };
    }
    match split_suffix(text, |c| c.is_ascii_digit()) {
        Some((_, "")) => Type::U64,
        Some((_, suffix)) => integer(suffix),
        None => Type::Unknown,
    }
}

/// A decimal integer literal with no type suffix. Such literals adapt to
/// the integer type around them.
pub(crate) fn is_unsuffixed_integer(text: &str) -> bool {
    !text.starts_with("0x")
        && !text.starts_with("0X")
        && matches!(split_suffix(text, |c| c.is_ascii_digit()), Some((_, "")))
}

/// Split `text` into a non-empty run of digits (underscores allowed after
/// the first) and the rest.
fn split_suffix(text: &str, is_digit: impl Fn(char) -> bool) -> Option<(&str, &str)> {
    if !text.starts_with(&is_digit) {
        return None;
    }
    let end = text
        .find(|c: char| !is_digit(c) && c != '_')
        .unwrap_or(text.len());
    Some(text.split_at(end))
}

fn integer(suffix: &str) -> Type {
    PrimitiveKind::from_suffix(suffix).map_or(Type::Unknown, Type::Primitive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn classification() {
        assert_eq!(classify("true"), Type::BOOL);
        assert_eq!(classify("false"), Type::BOOL);
        assert_eq!(classify("0x1"), Type::ADDRESS);
        assert_eq!(classify("@0x1"), Type::ADDRESS);
        assert_eq!(classify("@std"), Type::ADDRESS);
        assert_eq!(classify("42"), Type::U64);
        assert_eq!(classify("1_000_000"), Type::U64);
        assert_eq!(classify("42u8"), Type::U8);
        assert_eq!(classify("7u256"), Type::U256);
        assert_eq!(classify("0xffu16"), Type::U16);
        assert_eq!(classify("b\"hi\""), Type::vector(Type::U8));
        assert_eq!(classify("x\"00ff\""), Type::vector(Type::U8));
        assert_eq!(classify("\"hello\""), Type::STRING);
    }

    #[test]
    fn malformed_literals_are_unknown() {
        assert_eq!(classify("42i8"), Type::Unknown);
        assert_eq!(classify("0xzz"), Type::Unknown);
        assert_eq!(classify("abc"), Type::Unknown);
        assert_eq!(classify(""), Type::Unknown);
    }

    #[test]
    fn unsuffixed_integers() {
        assert!(is_unsuffixed_integer("42"));
        assert!(is_unsuffixed_integer("1_000"));
        assert!(!is_unsuffixed_integer("42u8"));
        assert!(!is_unsuffixed_integer("0x10"));
        assert!(!is_unsuffixed_integer("true"));
    }
}
