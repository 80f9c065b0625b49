//! EXIF rational values.
//!
//! EXIF stores non-integer quantities (exposure, f-number, GPS minutes) as
//! `numerator/denominator` pairs. The tag reader hands them over as `"n/d"`
//! text, so decoding works on strings and is deliberately lenient: anything
//! malformed decodes to `0.0` instead of failing the extraction.

/// Decode a `"n/d"` fraction or a bare decimal into a float.
///
/// - One part: parsed as a float, `0.0` if not numeric.
/// - Two numeric parts with a non-zero denominator: `n / d`.
/// - Anything else (three or more parts, non-numeric parts, zero
///   denominator): `0.0`.
pub fn decode_rational(input: &str) -> f64 {
    let parts: Vec<&str> = input.split('/').collect();
    match parts.as_slice() {
        [single] => parse_number(single).unwrap_or(0.0),
        [num, den] => match (parse_number(num), parse_number(den)) {
            (Some(n), Some(d)) if d != 0.0 => n / d,
            _ => 0.0,
        },
        _ => 0.0,
    }
}

/// Split a `"n/d"` string into its two numeric parts.
///
/// Returns `None` unless there are exactly two parts and both parse. The
/// denominator may be zero; callers decide what that means.
pub fn split_fraction(input: &str) -> Option<(f64, f64)> {
    let (num, den) = input.split_once('/')?;
    if den.contains('/') {
        return None;
    }
    Some((parse_number(num)?, parse_number(den)?))
}

/// Parse a trimmed decimal, rejecting NaN and infinities.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
