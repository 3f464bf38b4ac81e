//! # String Codecs
//!
//! Three renderings of a normalized value, plus the inverse suffix-unit
//! decoder:
//!
//! - **plain**: the exact base-10 digit string of `mantissa * 10^exponent`,
//!   reconstructed digit-by-digit so the scaled product is never
//!   materialized in the backing primitive.
//! - **scientific**: `d.ddE+n` with the mantissa reduced to a leading digit.
//! - **suffix**: the idle-game magnitude notation - `999`, `1K`, `12.3M`,
//!   `999T`, then open-ended repeated-letter units (`1AA` at `10^15`,
//!   `1BB` at `10^18`, ..., `1AAA` at `10^93`).
//!
//! Suffix boundaries are strict: a total magnitude length of 3 renders
//! bare, 4 is the first `K`, 7 the first `M`, and 16 the first
//! double-letter unit. Display digits are truncated, not rounded, so a
//! `999.99K` never carries into `1000K`.

use std::fmt;

use crate::error::{NumericError, NumericResult};
use crate::real::Real;
use crate::value::BigNumber;

/// Smallest suffix-unit exponent; everything below renders bare.
const UNIT_EXPONENT_FLOOR: i32 = 3;
/// Suffix exponent of the first repeated-letter unit (`AA`).
const LETTER_UNIT_BASE: i32 = 15;
/// Decimal orders spanned by one unit step.
const ORDERS_PER_UNIT: i32 = 3;
/// Letters in one repetition cycle.
const LETTERS_PER_CYCLE: i32 = 26;
/// Decimal orders spanned by a full letter cycle (`AA` through `ZZ`).
const ORDERS_PER_CYCLE: i32 = LETTERS_PER_CYCLE * ORDERS_PER_UNIT;

/// Renders the unit suffix for a power-of-ten exponent. Exponents below 3
/// have no unit; others use the largest unit at or below them (the
/// exponent is floored to a multiple of 3).
#[must_use]
pub fn exponent_to_unit(exponent: i32) -> String {
    if exponent < UNIT_EXPONENT_FLOOR {
        return String::new();
    }
    match (exponent / ORDERS_PER_UNIT) * ORDERS_PER_UNIT {
        3 => "K".to_string(),
        6 => "M".to_string(),
        9 => "B".to_string(),
        12 => "T".to_string(),
        floored => {
            let index = (floored - LETTER_UNIT_BASE) / ORDERS_PER_UNIT;
            let size = usize::try_from(index / LETTERS_PER_CYCLE + 2).unwrap_or(2);
            let letter = char::from(b'A' + u8::try_from(index % LETTERS_PER_CYCLE).unwrap_or(0));
            std::iter::repeat(letter).take(size).collect()
        }
    }
}

/// Decodes a unit suffix back to its power-of-ten exponent. The empty
/// unit is exponent 0; single letters come from the K/M/B/T table;
/// repeated-letter units invert the generation formula. Case-insensitive.
///
/// # Errors
///
/// [`NumericError::UnparsableInput`] for anything that is not a valid
/// unit: unknown single letters, mixed-letter runs, non-alphabetic input.
pub fn unit_to_exponent(unit: &str) -> NumericResult<i32> {
    if unit.is_empty() {
        return Ok(0);
    }
    let unparsable = || NumericError::UnparsableInput {
        input: unit.to_string(),
    };
    let upper = unit.to_ascii_uppercase();
    let bytes = upper.as_bytes();
    if !bytes.iter().all(u8::is_ascii_uppercase) {
        return Err(unparsable());
    }
    if bytes.len() == 1 {
        return match bytes[0] {
            b'K' => Ok(3),
            b'M' => Ok(6),
            b'B' => Ok(9),
            b'T' => Ok(12),
            _ => Err(unparsable()),
        };
    }
    let letter = bytes[0];
    if bytes.iter().any(|&b| b != letter) {
        return Err(unparsable());
    }
    let size = i32::try_from(bytes.len()).map_err(|_| unparsable())?;
    Ok((size - 2) * ORDERS_PER_CYCLE + LETTER_UNIT_BASE + i32::from(letter - b'A') * ORDERS_PER_UNIT)
}

impl<R: Real> BigNumber<R> {
    /// Renders the exact digit string of the value.
    ///
    /// Values up to three digits long round to zero or two decimal places
    /// (per `strip_decimal`); unscaled values render their mantissa
    /// directly; scaled values are reconstructed digit-by-digit, with the
    /// mantissa's fractional digits supplying the positions the exponent
    /// shifted past and zeros padding the rest.
    #[must_use]
    pub fn to_plain_string(&self, strip_decimal: bool) -> String {
        let magnitude = self.mantissa.abs();
        let length = i64::from(self.digit_length) + i64::from(self.exponent);
        let body = if length <= 3 {
            if strip_decimal {
                magnitude.round_away().fmt_plain()
            } else {
                magnitude.round_dp(2).fmt_plain()
            }
        } else if self.exponent == 0 {
            if strip_decimal {
                magnitude.round_away().fmt_plain()
            } else {
                magnitude.fmt_plain()
            }
        } else {
            self.digits_abs(usize::MAX)
        };
        signed(self.is_negative(), body)
    }

    /// Renders `d.ddE+n` scientific notation. Scaled values reduce the
    /// mantissa to one leading digit; unscaled values longer than five
    /// digits reduce to two; everything shorter renders as a rounded
    /// decimal with no exponent marker. Exponents are always non-negative.
    #[must_use]
    pub fn to_scientific_string(&self) -> String {
        let magnitude = self.mantissa.abs();
        let body = if self.exponent > 0 {
            let lead = (magnitude / R::pow10(self.digit_length - 1)).round_dp(2);
            format!(
                "{}E+{}",
                lead.fmt_plain(),
                i64::from(self.exponent) + i64::from(self.digit_length) - 1
            )
        } else if self.digit_length > 5 {
            let lead = (magnitude / R::pow10(self.digit_length - 2)).round_dp(2);
            format!("{}E+{}", lead.fmt_plain(), self.digit_length - 2)
        } else {
            magnitude.round_dp(2).fmt_plain()
        };
        signed(self.is_negative(), body)
    }

    /// Renders the idle-game magnitude notation: up to three leading
    /// digits, up to two truncated decimals, and the unit suffix for the
    /// value's order of magnitude.
    #[must_use]
    pub fn to_suffix_string(&self) -> String {
        let length = i64::from(self.digit_length) + i64::from(self.exponent);
        if length <= UNIT_EXPONENT_FLOOR.into() {
            let body = self.mantissa.abs().round_away().fmt_plain();
            return signed(self.is_negative(), body);
        }
        let window = usize::try_from((length - 1) % 3 + 1).unwrap_or(1);
        let digits = self.digits_abs(window + 2);
        let lead = &digits[..window];
        let lead_value: u32 = lead.parse().unwrap_or(0);
        let body = if lead_value >= 100 {
            lead.to_string()
        } else if lead_value >= 10 {
            join_decimal(lead, &digits[window..=window])
        } else {
            join_decimal(lead, &digits[window..window + 2])
        };
        let suffix_exponent = i32::try_from((length - 1) / 3 * 3).unwrap_or(i32::MAX);
        signed(
            self.is_negative(),
            format!("{body}{}", exponent_to_unit(suffix_exponent)),
        )
    }

    /// First `limit` digits of the value's decimal expansion: the
    /// mantissa's integer digits, then its fractional digits up to the
    /// exponent, then padding zeros.
    fn digits_abs(&self, limit: usize) -> String {
        let plain = self.mantissa.abs().fmt_plain();
        let (integer, fraction) = match plain.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (plain.as_str(), ""),
        };
        let mut digits = String::from(integer);
        if self.exponent > 0 {
            let scale = usize::try_from(self.exponent).unwrap_or(usize::MAX);
            let taken = fraction.len().min(scale);
            digits.push_str(&fraction[..taken]);
            let padding = (scale - taken).min(limit.saturating_sub(digits.len()));
            digits.extend(std::iter::repeat('0').take(padding));
        }
        digits.truncate(limit);
        digits
    }
}

impl<R: Real> fmt::Display for BigNumber<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_plain_string(false))
    }
}

/// Applies a sign prefix, keeping bare zero unsigned.
fn signed(negative: bool, body: String) -> String {
    if negative && body != "0" {
        format!("-{body}")
    } else {
        body
    }
}

/// Joins truncated display decimals onto the leading digits, dropping
/// trailing zeros.
fn join_decimal(lead: &str, fraction: &str) -> String {
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        lead.to_string()
    } else {
        format!("{lead}.{fraction}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{BigDecimal, BigDouble};
    use rust_decimal_macros::dec;

    #[test]
    fn plain_strings_round_trip_small_integers() {
        let value = "1000".parse::<BigDecimal>().unwrap();
        assert_eq!(value.to_plain_string(true), "1000");
        assert_eq!(value.to_string(), "1000");
    }

    #[test]
    fn plain_strings_reconstruct_scaled_digits() {
        let value = "123456789012345678901".parse::<BigDecimal>().unwrap();
        assert_eq!(value.exponent(), 6);
        assert_eq!(value.to_plain_string(true), "123456789012345000000");
    }

    #[test]
    fn plain_strings_keep_small_fractions() {
        let value = "0.5".parse::<BigDecimal>().unwrap();
        assert_eq!(value.to_plain_string(false), "0.5");
        assert_eq!(value.to_plain_string(true), "1");

        let double = "2.25".parse::<BigDouble>().unwrap();
        assert_eq!(double.to_plain_string(false), "2.25");
    }

    #[test]
    fn plain_strings_carry_the_sign() {
        let value = "-1234567".parse::<BigDecimal>().unwrap();
        assert_eq!(value.to_plain_string(true), "-1234567");
        assert_eq!(value.to_suffix_string(), "-1.23M");
    }

    #[test]
    fn scientific_notation_reduces_to_a_leading_digit() {
        let value = format!("1{}", "0".repeat(15)).parse::<BigDecimal>().unwrap();
        assert_eq!(value.exponent(), 1);
        assert_eq!(value.to_scientific_string(), "1E+15");

        let double = format!("1{}", "0".repeat(15)).parse::<BigDouble>().unwrap();
        assert_eq!(double.to_scientific_string(), "1E+15");
    }

    #[test]
    fn scientific_notation_of_long_unscaled_values_keeps_two_digits() {
        let value = "123456".parse::<BigDecimal>().unwrap();
        assert_eq!(value.to_scientific_string(), "12.35E+4");
    }

    #[test]
    fn scientific_notation_of_short_values_has_no_marker() {
        let value = "1024".parse::<BigDecimal>().unwrap();
        assert_eq!(value.to_scientific_string(), "1024");
        let fraction = "3.14159".parse::<BigDecimal>().unwrap();
        assert_eq!(fraction.to_scientific_string(), "3.14");
    }

    #[test]
    fn suffix_boundary_sits_between_three_and_four_digits() {
        assert_eq!("999".parse::<BigDecimal>().unwrap().to_suffix_string(), "999");
        assert_eq!("1000".parse::<BigDecimal>().unwrap().to_suffix_string(), "1K");
        assert_eq!("999999".parse::<BigDecimal>().unwrap().to_suffix_string(), "999K");
        assert_eq!("1000000".parse::<BigDecimal>().unwrap().to_suffix_string(), "1M");
    }

    #[test]
    fn suffix_decimals_track_the_display_window() {
        assert_eq!("12345".parse::<BigDecimal>().unwrap().to_suffix_string(), "12.3K");
        assert_eq!("1234567".parse::<BigDecimal>().unwrap().to_suffix_string(), "1.23M");
        assert_eq!("123456789".parse::<BigDecimal>().unwrap().to_suffix_string(), "123M");
        assert_eq!("12345".parse::<BigDouble>().unwrap().to_suffix_string(), "12.3K");
    }

    #[test]
    fn suffix_units_walk_the_single_letter_table() {
        assert_eq!(format!("1{}", "0".repeat(9)).parse::<BigDecimal>().unwrap().to_suffix_string(), "1B");
        assert_eq!(format!("1{}", "0".repeat(12)).parse::<BigDecimal>().unwrap().to_suffix_string(), "1T");
        assert_eq!(format!("999{}", "0".repeat(12)).parse::<BigDecimal>().unwrap().to_suffix_string(), "999T");
        assert_eq!(format!("1{}", "0".repeat(12)).parse::<BigDouble>().unwrap().to_suffix_string(), "1T");
    }

    #[test]
    fn suffix_crosses_into_double_letters_past_t() {
        let value = format!("1{}", "0".repeat(15)).parse::<BigDecimal>().unwrap();
        assert_eq!(value.to_suffix_string(), "1AA");
        let next = format!("25{}", "0".repeat(17)).parse::<BigDecimal>().unwrap();
        assert_eq!(next.to_suffix_string(), "2.5BB");
    }

    #[test]
    fn suffix_display_truncates_instead_of_rounding() {
        let value = "999999".parse::<BigDecimal>().unwrap();
        // never carries into "1000K"
        assert_eq!(value.to_suffix_string(), "999K");
        let close = "99999".parse::<BigDecimal>().unwrap();
        assert_eq!(close.to_suffix_string(), "99.9K");
    }

    #[test]
    fn unit_generation_walks_the_alphabet_and_then_lengthens() {
        assert_eq!(exponent_to_unit(0), "");
        assert_eq!(exponent_to_unit(3), "K");
        assert_eq!(exponent_to_unit(12), "T");
        assert_eq!(exponent_to_unit(15), "AA");
        assert_eq!(exponent_to_unit(18), "BB");
        assert_eq!(exponent_to_unit(90), "ZZ");
        assert_eq!(exponent_to_unit(93), "AAA");
        assert_eq!(exponent_to_unit(171), "AAAA");
    }

    #[test]
    fn unit_decoding_inverts_generation() {
        for exponent in (3..=240).step_by(3) {
            let unit = exponent_to_unit(exponent);
            assert_eq!(unit_to_exponent(&unit).unwrap(), exponent, "unit {unit}");
        }
    }

    #[test]
    fn unit_decoding_is_case_insensitive() {
        assert_eq!(unit_to_exponent("k").unwrap(), 3);
        assert_eq!(unit_to_exponent("aa").unwrap(), 15);
        assert_eq!(unit_to_exponent("AA").unwrap(), 15);
    }

    #[test]
    fn unit_decoding_rejects_garbage() {
        assert!(unit_to_exponent("Q").is_err());
        assert!(unit_to_exponent("AB").is_err());
        assert!(unit_to_exponent("A1").is_err());
        assert_eq!(unit_to_exponent("").unwrap(), 0);
    }

    #[test]
    fn repeated_letters_are_distinct_units_from_their_single_forms() {
        // "KK" is the eleventh double-letter unit, not a variant of "K"
        assert_eq!(unit_to_exponent("KK").unwrap(), 45);
        assert_eq!(exponent_to_unit(45), "KK");
    }

    #[test]
    fn zero_renders_bare_everywhere() {
        let zero = BigDecimal::ZERO;
        assert_eq!(zero.to_plain_string(true), "0");
        assert_eq!(zero.to_scientific_string(), "0");
        assert_eq!(zero.to_suffix_string(), "0");
    }

    #[test]
    fn negative_magnitudes_keep_their_sign_in_every_codec() {
        let value = BigDecimal::from_real(dec!(-12345));
        assert_eq!(value.to_plain_string(true), "-12345");
        assert_eq!(value.to_suffix_string(), "-12.3K");
        assert_eq!(value.to_scientific_string(), "-12345");
    }
}
