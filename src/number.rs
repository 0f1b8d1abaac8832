use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use std::borrow::Cow;
use std::str::FromStr;

/// Drops `_` digit separators from `raw`. Every separator has to sit between
/// two ASCII digits, otherwise the value is rejected.
fn strip_separators(raw: &str) -> Option<Cow<'_, str>> {
    if !raw.contains('_') {
        return Some(Cow::Borrowed(raw));
    }

    let bytes = raw.as_bytes();
    for (i, byte) in bytes.iter().enumerate() {
        if *byte != b'_' {
            continue;
        }
        let before = i.checked_sub(1).and_then(|j| bytes.get(j));
        let after = bytes.get(i + 1);
        match (before, after) {
            (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit() => {}
            _ => return None,
        }
    }

    Some(Cow::Owned(raw.replace('_', "")))
}

/// Parses a score. Surrounding whitespace, `1_000` separators and the
/// `inf`/`infinity`/`nan` spellings are accepted.
pub fn parse_score(raw: &str) -> Option<f64> {
    strip_separators(raw.trim())?.parse::<f64>().ok()
}

/// Parses an integer weight of any size.
pub fn parse_weight(raw: &str) -> Option<BigInt> {
    BigInt::from_str(&strip_separators(raw.trim())?).ok()
}

/// Parses a whole number of 10^-18 units. Plain integers and exact
/// scientific forms such as `24e18` or `2.2e22` are accepted.
pub fn parse_fixed_point(raw: &str) -> Result<BigInt, String> {
    let cleaned = strip_separators(raw.trim())
        .ok_or_else(|| format!("'{}' has a misplaced '_' separator", raw))?;
    let value = BigDecimal::from_str(&cleaned).map_err(|e| format!("'{}': {}", raw, e))?;

    let whole = value.with_scale(0);
    if whole != value {
        return Err(format!("'{}' is not a whole number of fixed-point units", raw));
    }

    let (int, _) = whole.into_bigint_and_exponent();
    Ok(int)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_score_tests {
        use super::*;

        #[test]
        fn test_plain_and_padded() {
            assert_eq!(parse_score("60"), Some(60.0));
            assert_eq!(parse_score(" 75.5 "), Some(75.5));
            assert_eq!(parse_score("1e2"), Some(100.0));
        }

        #[test]
        fn test_digit_separators() {
            assert_eq!(parse_score("1_000"), Some(1000.0));
            assert_eq!(parse_score("1_000.2_5"), Some(1000.25));
            assert_eq!(parse_score("1e1_0"), Some(1e10));
        }

        #[test]
        fn test_misplaced_separators() {
            assert_eq!(parse_score("_100"), None);
            assert_eq!(parse_score("100_"), None);
            assert_eq!(parse_score("1__00"), None);
            assert_eq!(parse_score("1_.5"), None);
        }

        #[test]
        fn test_special_values() {
            assert_eq!(parse_score("infinity"), Some(f64::INFINITY));
            assert_eq!(parse_score("-Infinity"), Some(f64::NEG_INFINITY));
            assert_eq!(parse_score("inf"), Some(f64::INFINITY));
            assert!(parse_score("nan").unwrap().is_nan());
        }

        #[test]
        fn test_rejects_text() {
            assert_eq!(parse_score("notanumber"), None);
            assert_eq!(parse_score(""), None);
        }
    }

    mod parse_weight_tests {
        use super::*;

        #[test]
        fn test_signed_and_padded() {
            assert_eq!(parse_weight(" 10 "), Some(BigInt::from(10)));
            assert_eq!(parse_weight("+5"), Some(BigInt::from(5)));
            assert_eq!(parse_weight("-7"), Some(BigInt::from(-7)));
            assert_eq!(parse_weight("007"), Some(BigInt::from(7)));
        }

        #[test]
        fn test_separators() {
            assert_eq!(parse_weight("1_000_000"), Some(BigInt::from(1_000_000)));
            assert_eq!(parse_weight("1__000"), None);
        }

        #[test]
        fn test_beyond_i64() {
            let weight = parse_weight("123456789012345678901234567890").unwrap();
            assert_eq!(weight.to_string(), "123456789012345678901234567890");
        }

        #[test]
        fn test_rejects_non_integers() {
            assert_eq!(parse_weight("2.5"), None);
            assert_eq!(parse_weight("weight"), None);
            assert_eq!(parse_weight(""), None);
        }
    }

    mod parse_fixed_point_tests {
        use super::*;

        #[test]
        fn test_plain_integer() {
            let value = parse_fixed_point("24000000000000000000").unwrap();
            assert_eq!(value.to_string(), "24000000000000000000");
        }

        #[test]
        fn test_scientific_forms() {
            assert_eq!(
                parse_fixed_point("24e18").unwrap().to_string(),
                "24000000000000000000"
            );
            assert_eq!(
                parse_fixed_point("2.2e22").unwrap().to_string(),
                "22000000000000000000000"
            );
        }

        #[test]
        fn test_rejects_fractions() {
            assert!(parse_fixed_point("1.5").is_err());
            assert!(parse_fixed_point("abc").is_err());
        }
    }
}
