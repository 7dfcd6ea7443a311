//! Lenient text parsing for loosely-typed source fields
//!
//! Some sources emit numbers as strings ("12.5", "12g") and servings as free
//! text ("150 g", "1 bowl"). These helpers pull the numeric prefix out.

use crate::models::Serving;

/// Parse the longest floating-point prefix of a string
///
/// Leading whitespace is skipped and trailing garbage is ignored, so
/// "12.5g" parses as 12.5. Returns None when there is no numeric prefix.
///
/// Examples:
/// - "42" -> Some(42.0)
/// - " -3.5e2kcal" -> Some(-350.0)
/// - ".5" -> Some(0.5)
/// - "abc" -> None
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Split a serving string like "150 g" into (150.0, "g")
///
/// The amount must be a plain unsigned decimal at the very start of the
/// string. Whitespace between amount and unit is dropped; the rest of the
/// string is the unit, verbatim. Returns None when there is no amount or the
/// unit spans more than one line.
fn split_serving_text(text: &str) -> Option<(f64, &str)> {
    let bytes = text.as_bytes();

    let int_digits = count_digits(bytes);
    if int_digits == 0 {
        return None;
    }
    let mut end = int_digits;

    if bytes.get(end) == Some(&b'.') {
        let frac_digits = count_digits(&bytes[end + 1..]);
        if frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    let amount = text[..end].parse::<f64>().ok()?;
    let unit = text[end..].trim_start();

    if unit.contains(&['\n', '\r', '\u{2028}', '\u{2029}'][..]) {
        return None;
    }

    Some((amount, unit))
}

/// Parse a free-text serving; text without a leading amount becomes
/// amount 0 with the whole string as the unit
pub fn parse_serving_text(text: &str) -> Serving {
    match split_serving_text(text) {
        Some((amount, unit)) => Serving::new(amount, unit),
        None => Serving::new(0.0, text),
    }
}
