use num_bigint::BigInt;

/// Formats an integer with `,` between groups of three digits.
pub fn group_thousands(value: &BigInt) -> String {
    let text = value.to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };

    let mut grouped = String::with_capacity(text.len() + digits.len() / 3);
    grouped.push_str(sign);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}

// Rewrites Rust's `1.09e15` exponent into `1.09e+15`.
fn signed_exponent(formatted: String) -> String {
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };

    match exponent.parse::<i32>() {
        Ok(exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.unsigned_abs())
        }
        Err(_) => formatted,
    }
}

/// Normalized scientific notation with `precision` fractional digits, e.g.
/// `1.09e+15`. The exponent always carries a sign and at least two digits.
pub fn scientific(value: f64, precision: usize) -> String {
    signed_exponent(format!("{:.*e}", precision, value))
}

/// Shortest round-trip rendering of a float. Magnitudes in `[1e-4, 1e16)`
/// are positional and always show a fractional part (`2400000000000.0`);
/// anything else uses an exponent (`5.4545454545454544e+20`).
pub fn plain(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    if value == 0.0 || (1e-4..1e16).contains(&value.abs()) {
        let text = value.to_string();
        if text.contains('.') {
            text
        } else {
            format!("{}.0", text)
        }
    } else {
        signed_exponent(format!("{:e}", value))
    }
}
