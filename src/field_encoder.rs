//! Renders typed values as `key=value ` tokens.
//!
//! Each token is the key (wrapped in the key highlight markers, which may be
//! empty), an `=`, the rendered value and one trailing space. Nothing is
//! escaped: a key or value containing spaces or `=` is written as is, so
//! callers pick keys that keep the line parseable.
//!
//! All writers append straight into the event buffer. Writing into a
//! `Vec<u8>` cannot fail, so the `io::Result` of `write!` is dropped.

use std::fmt;
use std::io::{Cursor, Write};

use chrono::{DateTime, Datelike, SecondsFormat, TimeZone};

use crate::tags::Tags;

/// Rendered instead of a timestamp that has no RFC 3339 representation.
pub const TIME_MARSHAL_ERROR: &str =
    "error marshaling time: Time.MarshalText: year outside of range [0,9999]";

/// Key used by error fields.
pub const ERROR_KEY: &str = "@error";

/// Appends the highlighted key followed by `=`.
#[inline]
pub fn append_key(buf: &mut Vec<u8>, tags: &Tags, key: &str) {
    buf.extend_from_slice(tags.key_start.as_bytes());
    buf.extend_from_slice(key.as_bytes());
    buf.extend_from_slice(tags.key_end.as_bytes());
    buf.push(b'=');
}

/// Appends a key of the form `{prefix}{index}`, e.g. `@file_3`.
pub fn append_indexed_key(buf: &mut Vec<u8>, tags: &Tags, prefix: &str, index: usize) {
    buf.extend_from_slice(tags.key_start.as_bytes());
    buf.extend_from_slice(prefix.as_bytes());
    let _ = write!(buf, "{}", index);
    buf.extend_from_slice(tags.key_end.as_bytes());
    buf.push(b'=');
}

/// Appends a complete `key=value ` token with an already rendered value.
///
/// # Examples
///
/// ```
/// # use linelog::field_encoder::append_field;
/// # use linelog::Tags;
/// let mut buf = Vec::new();
/// append_field(&mut buf, &Tags::plain(), "user", b"alice");
/// assert_eq!(buf, b"user=alice ");
/// ```
pub fn append_field(buf: &mut Vec<u8>, tags: &Tags, key: &str, value: &[u8]) {
    append_key(buf, tags, key);
    buf.extend_from_slice(value);
    buf.push(b' ');
}

pub fn write_bool(buf: &mut Vec<u8>, value: bool) {
    let text: &[u8] = if value { b"true" } else { b"false" };
    buf.extend_from_slice(text);
}

/// Lowercase hex, two digits per byte, no separators.
pub fn write_hex(buf: &mut Vec<u8>, value: &[u8]) {
    let at = buf.len();
    buf.resize(at + value.len() * 2, 0);
    // Cannot fail: the slice is exactly twice the input length.
    let _ = hex::encode_to_slice(value, &mut buf[at..]);
}

pub fn write_signed(buf: &mut Vec<u8>, value: i64) {
    let _ = write!(buf, "{}", value);
}

pub fn write_unsigned(buf: &mut Vec<u8>, value: u64) {
    let _ = write!(buf, "{}", value);
}

/// Writes `value` with the fewest digits that parse back to the same `f32`.
pub fn write_f32(buf: &mut Vec<u8>, value: f32) {
    if !value.is_finite() {
        return write_non_finite(buf, value.is_nan(), value.is_sign_negative());
    }
    write_general(buf, value.is_sign_negative(), format_args!("{:e}", value.abs()));
}

/// Writes `value` with the fewest digits that parse back to the same `f64`.
pub fn write_f64(buf: &mut Vec<u8>, value: f64) {
    if !value.is_finite() {
        return write_non_finite(buf, value.is_nan(), value.is_sign_negative());
    }
    write_general(buf, value.is_sign_negative(), format_args!("{:e}", value.abs()));
}

fn write_non_finite(buf: &mut Vec<u8>, nan: bool, negative: bool) {
    let text: &[u8] = match (nan, negative) {
        (true, _) => b"NaN",
        (false, true) => b"-Inf",
        (false, false) => b"+Inf",
    };
    buf.extend_from_slice(text);
}

/// Lays out shortest digits in the general numeric format: plain decimal for
/// decimal exponents in `-4..6`, `d.dddE±XX` otherwise.
///
/// `scientific` must render a non-negative finite value in Rust's `{:e}`
/// form, which already carries the shortest round-trip digits for the
/// value's width.
fn write_general(buf: &mut Vec<u8>, negative: bool, scientific: fmt::Arguments<'_>) {
    let mut scratch = [0u8; 40];
    let len = {
        let mut cursor = Cursor::new(&mut scratch[..]);
        let _ = cursor.write_fmt(scientific);
        cursor.position() as usize
    };
    let text = &scratch[..len];

    let (mantissa, exp) = match text.iter().position(|&c| c == b'e') {
        Some(at) => (&text[..at], parse_exponent(&text[at + 1..])),
        None => (text, 0),
    };
    let mut digits = [0u8; 40];
    let mut nd = 0;
    for &c in mantissa.iter().filter(|c| c.is_ascii_digit()) {
        digits[nd] = c;
        nd += 1;
    }
    let digits = &digits[..nd];

    if negative {
        buf.push(b'-');
    }
    if digits.iter().all(|&d| d == b'0') {
        buf.push(b'0');
        return;
    }

    if !(-4..6).contains(&exp) {
        buf.push(digits[0]);
        if nd > 1 {
            buf.push(b'.');
            buf.extend_from_slice(&digits[1..]);
        }
        buf.push(b'E');
        buf.push(if exp < 0 { b'-' } else { b'+' });
        let magnitude = exp.unsigned_abs();
        if magnitude < 10 {
            buf.push(b'0');
        }
        let _ = write!(buf, "{}", magnitude);
        return;
    }

    // Position of the decimal point relative to the first digit.
    let dp = exp + 1;
    let digit_at = |i: i32| -> u8 {
        if i >= 0 && (i as usize) < nd {
            digits[i as usize]
        } else {
            b'0'
        }
    };
    if dp > 0 {
        for i in 0..dp {
            buf.push(digit_at(i));
        }
    } else {
        buf.push(b'0');
    }
    let frac = nd as i32 - dp;
    if frac > 0 {
        buf.push(b'.');
        for i in 0..frac {
            buf.push(digit_at(dp + i));
        }
    }
}

fn parse_exponent(text: &[u8]) -> i32 {
    let (negative, digits) = match text.first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = digits
        .iter()
        .fold(0i32, |acc, &d| acc * 10 + (d - b'0') as i32);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// RFC 3339 with nanosecond precision, trailing zeros of the fraction
/// dropped (`.25Z`, no fraction for whole seconds); `Z` when the offset is
/// zero.
///
/// Years outside `0..=9999` have no RFC 3339 form and render
/// [`TIME_MARSHAL_ERROR`] instead.
pub fn write_time<Tz: TimeZone>(buf: &mut Vec<u8>, value: &DateTime<Tz>)
where
    Tz::Offset: fmt::Display,
{
    if !(0..=9999).contains(&value.year()) {
        buf.extend_from_slice(TIME_MARSHAL_ERROR.as_bytes());
        return;
    }
    let text = value.to_rfc3339_opts(SecondsFormat::Nanos, true);
    let Some(dot) = text.find('.') else {
        buf.extend_from_slice(text.as_bytes());
        return;
    };
    let end = text[dot + 1..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(text.len(), |i| dot + 1 + i);
    let fraction = text[dot + 1..end].trim_end_matches('0');
    buf.extend_from_slice(text[..dot].as_bytes());
    if !fraction.is_empty() {
        buf.push(b'.');
        buf.extend_from_slice(fraction.as_bytes());
    }
    buf.extend_from_slice(text[end..].as_bytes());
}

pub fn write_display(buf: &mut Vec<u8>, value: &dyn fmt::Display) {
    let _ = write!(buf, "{}", value);
}

pub fn write_debug(buf: &mut Vec<u8>, value: &dyn fmt::Debug) {
    let _ = write!(buf, "{:?}", value);
}
