//! Numeric literal evaluation and canonical (JavaScript `String(n)`) formatting.

/// Evaluate a numeric literal as scanned by the lexer: optional sign, then
/// `0x` hex, legacy octal (`017`), or decimal with fraction/exponent.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let magnitude = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        radix_value(hex, 16)?
    } else if is_legacy_octal(digits) {
        radix_value(&digits[1..], 8)?
    } else {
        digits.parse::<f64>().ok()?
    };

    Some(if negative { -magnitude } else { magnitude })
}

fn is_legacy_octal(digits: &str) -> bool {
    digits.len() > 1
        && digits.starts_with('0')
        && digits[1..].bytes().all(|b| (b'0'..=b'7').contains(&b))
}

fn radix_value(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
    })
}

/// Format a number the way JavaScript's `String(n)` does: integers without a
/// fraction, exponent notation (`1e+21`, `1e-7`) outside `[1e-6, 1e21)`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let abs = value.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let formatted = format!("{:e}", value);
        match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        }
    } else {
        format!("{}", value)
    }
}
