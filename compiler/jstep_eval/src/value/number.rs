//! Number formatting and parsing with JavaScript semantics.

/// Format a number the way JavaScript's `String(n)` does.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // Covers -0 as well.
        return "0".to_string();
    }

    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        // Rust's `Display` is the shortest round-trip form without exponent.
        return format!("{n}");
    }

    // Exponent form: `1e+21`, `1.5e-7`.
    let formatted = format!("{n:e}");
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => formatted,
    }
}

/// JavaScript `Number(string)`: whole-string conversion, `NaN` on failure.
pub fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return parse_radix_digits(hex, 16).unwrap_or(f64::NAN);
    }

    let (sign, unsigned) = split_sign(trimmed);
    if unsigned == "Infinity" {
        return sign * f64::INFINITY;
    }
    if unsigned.starts_with(['+', '-']) {
        return f64::NAN;
    }
    // Rust accepts `inf`/`nan`; JavaScript does not.
    if !unsigned
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return f64::NAN;
    }
    unsigned.parse::<f64>().map_or(f64::NAN, |v| sign * v)
}

/// JavaScript `parseFloat`: longest numeric prefix.
pub fn parse_float_prefix(s: &str) -> f64 {
    let trimmed = s.trim_start();
    let (sign, unsigned) = split_sign(trimmed);
    if unsigned.starts_with("Infinity") {
        return sign * f64::INFINITY;
    }

    let bytes = unsigned.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        seen_digit = true;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac = end + 1;
        while frac < bytes.len() && bytes[frac].is_ascii_digit() {
            frac += 1;
            seen_digit = true;
        }
        end = frac;
    }
    if !seen_digit {
        return f64::NAN;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let digits_start = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > digits_start {
            end = exp;
        }
    }

    unsigned[..end].parse::<f64>().map_or(f64::NAN, |v| sign * v)
}

/// JavaScript `parseInt(string, radix)`.
pub fn parse_int_prefix(s: &str, radix: Option<u32>) -> f64 {
    let trimmed = s.trim_start();
    let (sign, mut unsigned) = split_sign(trimmed);

    let mut radix = radix.unwrap_or(0);
    if radix != 0 && !(2..=36).contains(&radix) {
        return f64::NAN;
    }
    if radix == 0 || radix == 16 {
        if let Some(rest) = unsigned
            .strip_prefix("0x")
            .or_else(|| unsigned.strip_prefix("0X"))
        {
            unsigned = rest;
            radix = 16;
        }
    }
    if radix == 0 {
        radix = 10;
    }

    let digits: &str = {
        let end = unsigned
            .char_indices()
            .find(|(_, c)| !c.is_digit(radix))
            .map_or(unsigned.len(), |(i, _)| i);
        &unsigned[..end]
    };
    parse_radix_digits(digits, radix).map_or(f64::NAN, |v| sign * v)
}

fn split_sign(s: &str) -> (f64, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (-1.0, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (1.0, rest)
    } else {
        (1.0, s)
    }
}

/// Accumulate digits in `radix`; `None` when there are no digits or a
/// character is not a digit.
fn parse_radix_digits(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    let mut value = 0.0f64;
    for c in digits.chars() {
        let digit = c.to_digit(radix)?;
        value = value * f64::from(radix) + f64::from(digit);
    }
    Some(value)
}

/// Integer conversion used for indices and counts (`ToIntegerOrInfinity`).
pub fn to_integer(n: f64) -> f64 {
    if n.is_nan() {
        0.0
    } else {
        n.trunc()
    }
}

/// Interpret `n` as an array index if it is a non-negative integer.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn as_index(n: f64) -> Option<usize> {
    if n >= 0.0 && n.fract() == 0.0 && n < 4_294_967_295.0 {
        Some(n as usize)
    } else {
        None
    }
}

/// Resolve a relative index argument (`slice(-2)`) against `len`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn relative_index(n: f64, len: usize) -> usize {
    let n = to_integer(n);
    let len_f = len as f64;
    let resolved = if n < 0.0 { (len_f + n).max(0.0) } else { n.min(len_f) };
    resolved as usize
}

/// `usize` count as a JavaScript number.
#[allow(clippy::cast_precision_loss)]
pub fn count(n: usize) -> f64 {
    n as f64
}

/// `Number.prototype.toFixed`: round half up on the exact binary value.
pub fn to_fixed(x: f64, digits: usize) -> String {
    if !x.is_finite() || x.abs() >= 1e21 {
        return format_number(x);
    }
    let sign = if x < 0.0 { "-" } else { "" };

    // Rust prints the exact decimal expansion at any precision; 1100 places
    // covers the longest f64 fraction.
    let exact = format!("{:.1100}", x.abs());
    let Some((whole, fraction)) = exact.split_once('.') else {
        return format!("{sign}{exact}");
    };
    let (kept, rest) = fraction.split_at(digits.min(fraction.len()));

    let mut out: Vec<char> = whole.chars().chain(kept.chars()).collect();
    if rest.as_bytes().first().is_some_and(|&b| b >= b'5') {
        increment_decimal(&mut out);
    }

    let point = out.len() - kept.len();
    let mut result = String::with_capacity(out.len() + 2);
    result.push_str(sign);
    result.extend(&out[..point]);
    if digits > 0 {
        result.push('.');
        result.extend(&out[point..]);
    }
    result
}

fn increment_decimal(digits: &mut Vec<char>) {
    for digit in digits.iter_mut().rev() {
        if *digit == '9' {
            *digit = '0';
        } else if let Some(next) = digit.to_digit(10).and_then(|d| char::from_digit(d + 1, 10)) {
            *digit = next;
            return;
        }
    }
    digits.insert(0, '1');
}

/// `Number.prototype.toString(radix)` for integers.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_radix_string(n: f64, radix: u32) -> Option<String> {
    if radix == 10 || !n.is_finite() {
        return Some(format_number(n));
    }
    if n.fract() != 0.0 || n.abs() >= 9.0e15 {
        return None;
    }
    let mut value = n.abs() as u64;
    if value == 0 {
        return Some("0".to_string());
    }
    let mut digits = Vec::new();
    while value > 0 {
        let digit = (value % u64::from(radix)) as u32;
        digits.push(char::from_digit(digit, radix)?);
        value /= u64::from(radix);
    }
    if n < 0.0 {
        digits.push('-');
    }
    Some(digits.iter().rev().collect())
}
