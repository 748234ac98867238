use std::borrow::Cow;

use crate::types::BoxError;

use super::error::LiteralError;

/// Split off a base prefix: `0x`/`0X` hex, `0o`/`0O` and a bare leading `0`
/// octal, `0b`/`0B` binary, otherwise decimal.
fn radix_of(digits: &str) -> (u32, &str) {
    let bytes = digits.as_bytes();
    match bytes {
        [b'0', b'x' | b'X', ..] => (16, &digits[2..]),
        [b'0', b'o' | b'O', ..] => (8, &digits[2..]),
        [b'0', b'b' | b'B', ..] => (2, &digits[2..]),
        [b'0', _, ..] => (8, &digits[1..]),
        _ => (10, digits),
    }
}

/// Drop `_` digit separators. Each one must sit between digits or directly
/// after a base prefix, so `1_000` and `0x_ff` pass but `_1`, `1__0` and `1_`
/// do not.
fn strip_separators<'a>(digits: &str, body: &'a str) -> Option<Cow<'a, str>> {
    if !body.contains('_') {
        return Some(Cow::Borrowed(body));
    }
    if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return None;
    }
    Some(Cow::Owned(body.replace('_', "")))
}

fn parse_magnitude(text: &str, digits: &str) -> Result<u64, BoxError> {
    let invalid = || LiteralError::new(format!("invalid integer '{text}'"));
    let (radix, body) = radix_of(digits);
    let body = strip_separators(digits, body).ok_or_else(invalid)?;
    // from_str_radix accepts a sign of its own; only bare digits are valid here.
    if body.is_empty() || !body.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid().into());
    }
    u64::from_str_radix(&body, radix)
        .map_err(|_| LiteralError::new(format!("integer '{text}' out of range")).into())
}

/// Default integer reducer: signed, base-prefix aware (`-0x1f`, `017`, `42`).
///
/// # Errors
///
/// Fails on malformed digits or values outside `i64`.
pub fn parse_i64(text: &str) -> Result<i64, BoxError> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = parse_magnitude(text, digits)?;
    let value = if negative {
        0_i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    };
    value.ok_or_else(|| LiteralError::new(format!("integer '{text}' out of range")).into())
}

/// Default unsigned reducer: base-prefix aware, no sign.
///
/// # Errors
///
/// Fails on a sign, malformed digits, or values outside `u64`.
pub fn parse_u64(text: &str) -> Result<u64, BoxError> {
    parse_magnitude(text, text)
}

/// Default floating-point reducer.
///
/// # Errors
///
/// Fails when `text` is not a decimal float literal.
pub fn parse_f64(text: &str) -> Result<f64, BoxError> {
    text.parse::<f64>()
        .map_err(|_| LiteralError::new(format!("invalid float '{text}'")).into())
}
