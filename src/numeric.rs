//! Numeric literal grammar for slot and epoch queries
//!
//! The explorer treats a query as a slot number when it reads as a number
//! literal, which includes forms such as `1e3`, `.5`, `Infinity` and
//! `0x10`. Epoch queries are stricter: a plain (optionally signed) decimal
//! integer that does not start with `0` followed by another word character.

/// Returns true when `s` is a number literal: decimal with optional sign,
/// fraction and exponent, signed `Infinity`, or unsigned `0x`/`0o`/`0b`
/// integer.
pub fn is_numeric_literal(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }

    if let Some(digits) = radix_digits(s) {
        return digits;
    }

    let unsigned = s
        .strip_prefix('+')
        .or_else(|| s.strip_prefix('-'))
        .unwrap_or(s);
    if unsigned == "Infinity" {
        return true;
    }
    is_decimal_literal(unsigned.as_bytes())
}

/// `Some(valid)` when `s` carries a `0x`/`0o`/`0b` prefix, `None` otherwise
fn radix_digits(s: &str) -> Option<bool> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    let digits = &s[2..];
    Some(!digits.is_empty() && digits.chars().all(|c| c.is_digit(radix)))
}

fn is_decimal_literal(bytes: &[u8]) -> bool {
    let mut i = 0;
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        mantissa_digits += i - frac_start;
    }
    if mantissa_digits == 0 {
        return false;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

/// Matches `^0\w`: a leading zero followed by a letter, digit or underscore.
/// Used to keep `0x..`/`0b..` style inputs out of epoch suggestions.
pub fn has_zero_prefix(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next() == Some('0')
        && chars
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Compare an optionally signed decimal integer string against `limit`.
///
/// Returns `None` when `s` is not an integer literal, so the caller can
/// skip the comparison instead of failing. Values of any length are
/// compared exactly.
pub fn integer_at_most(s: &str, limit: u128) -> Option<bool> {
    let (negative, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if negative {
        return Some(true);
    }

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Some(true);
    }
    match significant.parse::<u128>() {
        Ok(value) => Some(value <= limit),
        // only overflow can fail here, and overflow exceeds any u64 epoch
        Err(_) => Some(false),
    }
}
