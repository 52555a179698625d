//! Number and string conversions following JavaScript rules

/// Format a number the way `String(n)` does
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // -0 prints as 0
        return "0".to_string();
    }

    // shortest digits that round-trip; `Display` pads them with zeros and
    // never switches to an exponent, `{:e}` always does
    let abs = n.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => formatted,
        };
    }
    format!("{}", n)
}

/// Whitespace accepted around numeric strings
fn is_js_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Convert a string to a number the way `Number(s)` does
pub fn string_to_number(s: &str) -> f64 {
    let s = s.trim_matches(is_js_whitespace);
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_digits(&s[2..], radix).unwrap_or(f64::NAN);
    }

    // Rust also accepts "inf" and "nan", which are not numbers here
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse a whole string of digits in the given radix
pub(crate) fn parse_digits(
    digits: &str,
    radix: u32,
) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    let mut value = 0.0f64;
    for c in digits.chars() {
        value = value * radix as f64 + c.to_digit(radix)? as f64;
    }
    Some(value)
}

/// Truncate toward zero, mapping NaN to 0 (ToIntegerOrInfinity)
pub fn to_integer(n: f64) -> f64 {
    if n.is_nan() {
        0.0
    } else {
        n.trunc()
    }
}

/// Resolve a relative index (negative counts from the end) into `0..=len`
pub fn relative_index(
    n: f64,
    len: usize,
) -> usize {
    let n = to_integer(n);
    let len_f = len as f64;
    let idx = if n < 0.0 { (len_f + n).max(0.0) } else { n.min(len_f) };
    idx as usize
}

/// Format a number in the given radix, as `n.toString(radix)` does
pub fn number_to_radix_string(
    n: f64,
    radix: u32,
) -> String {
    if radix == 10 || !n.is_finite() {
        return number_to_string(n);
    }

    let negative = n < 0.0;
    let mut int_part = n.abs().trunc();
    let mut frac_part = n.abs().fract();

    let mut digits = Vec::new();
    if int_part == 0.0 {
        digits.push('0');
    }
    while int_part >= 1.0 {
        let d = (int_part % radix as f64) as u32;
        digits.push(std::char::from_digit(d, radix).unwrap_or('0'));
        int_part = (int_part / radix as f64).trunc();
    }
    digits.reverse();

    let mut out: String = digits.into_iter().collect();
    if frac_part > 0.0 {
        out.push('.');
        // 52 bits of mantissa never need more than this many digits in base 2
        for _ in 0..52 {
            if frac_part == 0.0 {
                break;
            }
            frac_part *= radix as f64;
            let d = frac_part.trunc() as u32;
            out.push(std::char::from_digit(d, radix).unwrap_or('0'));
            frac_part = frac_part.fract();
        }
    }

    if negative {
        format!("-{out}")
    } else {
        out
    }
}
