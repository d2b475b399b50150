//! Fixed-point conversion between human-entered decimal strings and
//! integer base units.
//!
//! Conversion is exact: no floating point is involved in either direction.

use alloy_primitives::U256;
use thiserror::Error;

/// Fractional digits of the DGN token.
pub const TOKEN_DECIMALS: u8 = 18;

/// Largest power of ten that still fits in 256 bits.
const MAX_DECIMALS: u8 = 77;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitsError {
    #[error("amount is required")]
    Empty,
    #[error("invalid character {0:?} in amount")]
    InvalidCharacter(char),
    #[error("amount has more than {0} decimal places")]
    TooManyDecimals(u8),
    #[error("amount does not fit in 256 bits")]
    Overflow,
    #[error("unsupported decimals: {0}")]
    UnsupportedDecimals(u8),
}

/// Parses `input` (e.g. `"1.5"`) into base units scaled by `10^decimals`.
///
/// Signs, exponents and grouping separators are rejected. Trailing zeros past
/// the supported precision are accepted; any other extra digit is an error.
pub fn parse_units(input: &str, decimals: u8) -> Result<U256, UnitsError> {
    if decimals > MAX_DECIMALS {
        return Err(UnitsError::UnsupportedDecimals(decimals));
    }

    let text = input.trim();
    if text.is_empty() {
        return Err(UnitsError::Empty);
    }

    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(UnitsError::InvalidCharacter('.'));
    }
    if let Some(bad) = whole
        .chars()
        .chain(fraction.chars())
        .find(|c| !c.is_ascii_digit())
    {
        return Err(UnitsError::InvalidCharacter(bad));
    }

    let precision = usize::from(decimals);
    let fraction = if fraction.len() > precision {
        let (kept, dropped) = fraction.split_at(precision);
        if dropped.bytes().any(|b| b != b'0') {
            return Err(UnitsError::TooManyDecimals(decimals));
        }
        kept
    } else {
        fraction
    };

    let padding = precision - fraction.len();
    let ten = U256::from(10u64);
    let mut value = U256::ZERO;
    for digit in whole.bytes().chain(fraction.bytes()) {
        value = value
            .checked_mul(ten)
            .and_then(|v| v.checked_add(U256::from(u64::from(digit - b'0'))))
            .ok_or(UnitsError::Overflow)?;
    }
    for _ in 0..padding {
        value = value.checked_mul(ten).ok_or(UnitsError::Overflow)?;
    }

    Ok(value)
}

/// Renders base units as a decimal string.
///
/// Always keeps at least one fractional digit, so one whole token prints as
/// `"1.0"` and zero as `"0.0"`.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let precision = usize::from(decimals);

    let (whole, fraction) = if digits.len() > precision {
        let (whole, fraction) = digits.split_at(digits.len() - precision);
        (whole.to_owned(), fraction.to_owned())
    } else {
        let mut fraction = "0".repeat(precision - digits.len());
        fraction.push_str(&digits);
        ("0".to_owned(), fraction)
    };

    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{fraction}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wei(text: &str) -> U256 {
        text.parse().unwrap()
    }

    #[test]
    fn one_and_a_half_is_exact() {
        let value = parse_units("1.5", TOKEN_DECIMALS).unwrap();
        assert_eq!(value, wei("1500000000000000000"));
        assert_eq!(format_units(value, TOKEN_DECIMALS), "1.5");
    }

    #[test]
    fn whole_and_fractional_edge_forms() {
        assert_eq!(parse_units("42", 18).unwrap(), wei("42000000000000000000"));
        assert_eq!(parse_units(".5", 18).unwrap(), wei("500000000000000000"));
        assert_eq!(parse_units("7.", 18).unwrap(), wei("7000000000000000000"));
        assert_eq!(parse_units(" 0.000000000000000001 ", 18).unwrap(), U256::from(1u64));
        assert_eq!(parse_units("1.5000000000000000000000", 18).unwrap(), wei("1500000000000000000"));
        assert_eq!(parse_units("12.34", 2).unwrap(), U256::from(1234u64));
        assert_eq!(parse_units("9", 0).unwrap(), U256::from(9u64));
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert_eq!(parse_units("", 18), Err(UnitsError::Empty));
        assert_eq!(parse_units("   ", 18), Err(UnitsError::Empty));
        assert_eq!(parse_units(".", 18), Err(UnitsError::InvalidCharacter('.')));
        assert_eq!(parse_units("-1", 18), Err(UnitsError::InvalidCharacter('-')));
        assert_eq!(parse_units("1e3", 18), Err(UnitsError::InvalidCharacter('e')));
        assert_eq!(parse_units("1.2.3", 18), Err(UnitsError::InvalidCharacter('.')));
        assert_eq!(parse_units("1,000", 18), Err(UnitsError::InvalidCharacter(',')));
        assert_eq!(
            parse_units("0.0000000000000000001", 18),
            Err(UnitsError::TooManyDecimals(18))
        );
        assert_eq!(parse_units("1", 78), Err(UnitsError::UnsupportedDecimals(78)));
    }

    #[test]
    fn rejects_amounts_beyond_256_bits() {
        let max = U256::MAX.to_string();
        assert_eq!(parse_units(&max, 0).unwrap(), U256::MAX);
        assert_eq!(parse_units(&max, 1), Err(UnitsError::Overflow));
        assert_eq!(parse_units(&format!("{max}0"), 0), Err(UnitsError::Overflow));
    }

    #[test]
    fn formats_like_the_wallet_display() {
        assert_eq!(format_units(U256::ZERO, 18), "0.0");
        assert_eq!(format_units(wei("1000000000000000000"), 18), "1.0");
        assert_eq!(format_units(U256::from(1u64), 18), "0.000000000000000001");
        assert_eq!(format_units(wei("123450000000000000000"), 18), "123.45");
        assert_eq!(format_units(U256::from(5u64), 0), "5.0");
    }
}
