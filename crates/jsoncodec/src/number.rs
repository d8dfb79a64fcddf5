//! Numeric classification and encoding shared by parser and generator.

use alloc::vec::Vec;

/// A decoded JSON number: integer when the literal has no fractional or
/// exponent part and fits `i64`, double otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Int(i64),
    Double(f64),
}

/// Decodes a complete number literal already validated against the JSON
/// number grammar. Returns `None` when the value is not representable as a
/// finite double (e.g. an overflowing exponent).
pub(crate) fn decode(text: &str, has_frac_or_exp: bool) -> Option<Number> {
    if !has_frac_or_exp {
        if let Ok(i) = text.parse::<i64>() {
            return Some(Number::Int(i));
        }
        // Integer literal outside i64 range; fall back to double.
    }
    let d = text.parse::<f64>().ok()?;
    d.is_finite().then_some(Number::Double(d))
}

/// Appends the decimal rendering of `v` to `out`.
pub(crate) fn encode_i64(out: &mut Vec<u8>, v: i64) {
    out.extend_from_slice(itoa::Buffer::new().format(v).as_bytes());
}

/// Appends the shortest round-trip rendering of a finite `v` to `out`.
/// Exponential notation appears only when the magnitude requires it.
pub(crate) fn encode_f64(out: &mut Vec<u8>, v: f64) {
    debug_assert!(v.is_finite());
    out.extend_from_slice(ryu::Buffer::new().format_finite(v).as_bytes());
}
