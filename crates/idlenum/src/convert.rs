//! # Conversion Facade
//!
//! Construction from native integers, floats, and strings, and extraction
//! back out. Every constructor funnels through [`BigNumber::from_parts`],
//! so the result is normalized no matter where it came from.
//!
//! String input accepts three shapes:
//!
//! - plain digits (`"-123.45"`), with arbitrarily long integer parts - the
//!   leading precision-window digits become the mantissa and the rest of
//!   the length becomes the exponent,
//! - scientific `<mantissa>E+<exponent>` (the exponent is never negative),
//! - magnitude-suffix strings (`"12.3K"`, `"1.5aa"`), case-insensitive.
//!
//! Extraction to `i64`/`i32` succeeds at exponent zero when the truncated
//! mantissa fits, or by re-parsing the reconstructed digit string when the
//! value is scaled; anything out of range reports
//! [`NumericError::Overflow`], and the saturating forms clamp to the
//! target's extreme of the matching sign.

use std::str::FromStr;

use crate::error::{NumericError, NumericResult};
use crate::format::unit_to_exponent;
use crate::real::Real;
use crate::value::BigNumber;

impl<R: Real> BigNumber<R> {
    /// Builds a value from a double, rescaling magnitudes beyond the
    /// mantissa window into the exponent first.
    ///
    /// # Errors
    ///
    /// [`NumericError::UnparsableInput`] for NaN or infinite input.
    pub fn try_from_f64(value: f64) -> NumericResult<Self> {
        let unparsable = || NumericError::UnparsableInput {
            input: value.to_string(),
        };
        if !value.is_finite() {
            return Err(unparsable());
        }
        if value == 0.0 {
            return Ok(Self::ZERO);
        }
        let ceiling = R::MAX_WINDOW.to_f64().unwrap_or(f64::MAX);
        let magnitude = value.abs();
        if magnitude > ceiling {
            #[allow(clippy::cast_possible_truncation)]
            let exponent = magnitude.log10().floor() as i32 - (R::WINDOW_DIGITS - 1);
            let scaled = value / 10f64.powi(exponent);
            let mantissa = R::from_f64(scaled).ok_or_else(unparsable)?;
            Ok(Self::from_parts(mantissa, exponent))
        } else {
            let mantissa = R::from_f64(value).ok_or_else(unparsable)?;
            Ok(Self::from_parts(mantissa, 0))
        }
    }

    /// Extracts a truncated `i64`.
    ///
    /// # Errors
    ///
    /// [`NumericError::Overflow`] when the value does not fit.
    pub fn try_to_i64(&self) -> NumericResult<i64> {
        if self.exponent == 0 {
            self.mantissa
                .trunc()
                .to_i64()
                .ok_or(NumericError::Overflow { target: "i64" })
        } else {
            self.to_plain_string(true)
                .parse()
                .map_err(|_| NumericError::Overflow { target: "i64" })
        }
    }

    /// Extracts a truncated `i32`.
    ///
    /// # Errors
    ///
    /// [`NumericError::Overflow`] when the value does not fit.
    pub fn try_to_i32(&self) -> NumericResult<i32> {
        if self.exponent == 0 {
            self.mantissa
                .trunc()
                .to_i32()
                .ok_or(NumericError::Overflow { target: "i32" })
        } else {
            self.to_plain_string(true)
                .parse()
                .map_err(|_| NumericError::Overflow { target: "i32" })
        }
    }

    /// Extracts an `i64`, clamping out-of-range values to the extreme of
    /// the matching sign and warning.
    #[must_use]
    pub fn to_i64_saturating(&self) -> i64 {
        self.try_to_i64().unwrap_or_else(|error| {
            tracing::warn!("integer extraction clamped: {error}");
            if self.is_negative() {
                i64::MIN
            } else {
                i64::MAX
            }
        })
    }

    /// Extracts an `i32`, clamping out-of-range values to the extreme of
    /// the matching sign and warning.
    #[must_use]
    pub fn to_i32_saturating(&self) -> i32 {
        self.try_to_i32().unwrap_or_else(|error| {
            tracing::warn!("integer extraction clamped: {error}");
            if self.is_negative() {
                i32::MIN
            } else {
                i32::MAX
            }
        })
    }

    /// Approximates the value as a double. Magnitudes beyond the double
    /// range come back infinite.
    #[must_use]
    pub fn to_f64_lossy(&self) -> f64 {
        self.mantissa.to_f64().unwrap_or(0.0) * 10f64.powi(self.exponent)
    }

    /// Parses a plain digit token: optional sign, digits, at most one
    /// decimal point. Integer parts longer than the precision window keep
    /// their leading window digits and push the rest into the exponent.
    fn from_plain_str(text: &str) -> NumericResult<Self> {
        let unparsable = || NumericError::UnparsableInput {
            input: text.to_string(),
        };
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (integer, fraction) = match body.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (body, ""),
        };
        if integer.is_empty() && fraction.is_empty() {
            return Err(unparsable());
        }
        if !integer.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(unparsable());
        }
        let integer = integer.trim_start_matches('0');
        let window = usize::try_from(R::WINDOW_DIGITS).unwrap_or(usize::MAX);
        let (token, exponent) = if integer.len() > window {
            (integer[..window].to_string(), integer.len() - window)
        } else {
            // keep the fraction, capped to what the primitive can hold
            let room = usize::try_from(R::MAX_POW10)
                .unwrap_or(usize::MAX)
                .saturating_sub(integer.len().max(1));
            let fraction = &fraction[..fraction.len().min(room)];
            let mut token = String::new();
            token.push_str(if integer.is_empty() { "0" } else { integer });
            if !fraction.is_empty() {
                token.push('.');
                token.push_str(fraction);
            }
            (token, 0)
        };
        let mut mantissa = R::parse_plain(&token).ok_or_else(unparsable)?;
        if negative {
            mantissa = -mantissa;
        }
        Ok(Self::from_parts(
            mantissa,
            i32::try_from(exponent).unwrap_or(i32::MAX),
        ))
    }
}

impl<R: Real> From<i64> for BigNumber<R> {
    fn from(value: i64) -> Self {
        Self::from_parts(R::from_i64(value).unwrap_or(R::ZERO), 0)
    }
}

impl<R: Real> From<i32> for BigNumber<R> {
    fn from(value: i32) -> Self {
        Self::from(i64::from(value))
    }
}

impl<R: Real> From<u32> for BigNumber<R> {
    fn from(value: u32) -> Self {
        Self::from(i64::from(value))
    }
}

impl<R: Real> From<u64> for BigNumber<R> {
    fn from(value: u64) -> Self {
        Self::from_parts(R::from_u64(value).unwrap_or(R::ZERO), 0)
    }
}

impl<R: Real> From<f64> for BigNumber<R> {
    fn from(value: f64) -> Self {
        Self::try_from_f64(value).unwrap_or_else(|error| {
            tracing::warn!("unusable float input, substituting zero: {error}");
            Self::ZERO
        })
    }
}

impl<R: Real> From<f32> for BigNumber<R> {
    fn from(value: f32) -> Self {
        Self::from(f64::from(value))
    }
}

impl<R: Real> FromStr for BigNumber<R> {
    type Err = NumericError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let unparsable = || NumericError::UnparsableInput {
            input: text.to_string(),
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(unparsable());
        }
        // magnitude-suffix form: a trailing alphabetic run that decodes as
        // a unit ("1.5K", "2aa"); a bare "E" tail falls through to the
        // scientific parser below
        let unit_start = trimmed
            .rfind(|c: char| !c.is_ascii_alphabetic())
            .map_or(0, |index| index + 1);
        let (head, unit) = trimmed.split_at(unit_start);
        if !unit.is_empty() {
            if let Ok(unit_exponent) = unit_to_exponent(unit) {
                let base = Self::from_plain_str(head)?;
                return Ok(Self::from_parts(
                    base.mantissa,
                    base.exponent.saturating_add(unit_exponent),
                ));
            }
        }
        // scientific form: <mantissa>E+<exponent>, exponent non-negative
        if let Some(marker) = trimmed.rfind(['e', 'E']) {
            let head = &trimmed[..marker];
            let tail = trimmed[marker + 1..]
                .strip_prefix('+')
                .unwrap_or(&trimmed[marker + 1..]);
            if head.is_empty() || tail.is_empty() || !tail.bytes().all(|b| b.is_ascii_digit()) {
                return Err(unparsable());
            }
            let exponent = tail
                .parse::<i64>()
                .map(|exponent| i32::try_from(exponent).unwrap_or(i32::MAX))
                .map_err(|_| unparsable())?;
            let base = Self::from_plain_str(head)?;
            return Ok(Self::from_parts(
                base.mantissa,
                base.exponent.saturating_add(exponent),
            ));
        }
        Self::from_plain_str(trimmed)
    }
}

impl<R: Real> TryFrom<BigNumber<R>> for i64 {
    type Error = NumericError;

    fn try_from(value: BigNumber<R>) -> Result<Self, Self::Error> {
        value.try_to_i64()
    }
}

impl<R: Real> TryFrom<BigNumber<R>> for i32 {
    type Error = NumericError;

    fn try_from(value: BigNumber<R>) -> Result<Self, Self::Error> {
        value.try_to_i32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{BigDecimal, BigDouble};
    use rust_decimal_macros::dec;

    #[test]
    fn integers_construct_exactly() {
        let value = BigDecimal::from(1_234_567i64);
        assert_eq!(value.mantissa(), dec!(1_234_567));
        assert_eq!(value.exponent(), 0);

        let wide = BigDecimal::from(u64::MAX);
        assert_eq!(wide.exponent(), 5);
    }

    #[test]
    fn floats_construct_through_the_window() {
        let value = BigDecimal::try_from_f64(1.5e30).unwrap();
        assert_eq!(value.to_scientific_string(), "1.5E+30");

        let small = BigDouble::try_from_f64(42.5).unwrap();
        assert_eq!(small.to_plain_string(false), "42.5");
    }

    #[test]
    fn non_finite_floats_are_rejected_and_degrade_to_zero() {
        assert!(BigDecimal::try_from_f64(f64::NAN).is_err());
        assert!(BigDecimal::try_from_f64(f64::INFINITY).is_err());
        assert!(BigDecimal::from(f64::NAN).is_zero());
    }

    #[test]
    fn plain_parsing_windows_long_integer_parts() {
        let value = format!("9{}", "0".repeat(29)).parse::<BigDecimal>().unwrap();
        assert_eq!(value.mantissa(), dec!(900_000_000_000_000));
        assert_eq!(value.exponent(), 15);

        let double = format!("9{}", "0".repeat(29)).parse::<BigDouble>().unwrap();
        assert_eq!(double.exponent(), 18);
    }

    #[test]
    fn plain_parsing_round_trips_within_the_window() {
        for text in ["1", "42", "999", "123456789012345"] {
            let value = text.parse::<BigDecimal>().unwrap();
            assert_eq!(value.to_plain_string(true), text, "input {text}");
        }
    }

    #[test]
    fn reparsing_a_reconstructed_string_preserves_the_value() {
        let value = "9".repeat(30).parse::<BigDecimal>().unwrap();
        let reparsed = value.to_plain_string(true).parse::<BigDecimal>().unwrap();
        assert_eq!(value, reparsed);
    }

    #[test]
    fn scientific_strings_parse_back() {
        let value = "1.5E+30".parse::<BigDecimal>().unwrap();
        assert_eq!(value.to_scientific_string(), "1.5E+30");
        let bare = "2E9".parse::<BigDecimal>().unwrap();
        assert_eq!(bare.to_suffix_string(), "2B");
    }

    #[test]
    fn negative_scientific_exponents_are_rejected() {
        assert!("1E-5".parse::<BigDecimal>().is_err());
    }

    #[test]
    fn suffix_strings_parse_case_insensitively() {
        let value = "1.5K".parse::<BigDecimal>().unwrap();
        assert_eq!(value.to_plain_string(true), "1500");

        let large = "2.5aa".parse::<BigDecimal>().unwrap();
        assert_eq!(large.to_scientific_string(), "2.5E+15");

        let double = "12.3m".parse::<BigDouble>().unwrap();
        assert_eq!(double.to_suffix_string(), "12.3M");
    }

    #[test]
    fn garbage_strings_are_unparsable() {
        for text in ["", "  ", "12..3", "1,000", "gold", "1.5Q", "--5", "1.2.3"] {
            assert!(
                text.parse::<BigDecimal>().is_err(),
                "expected failure on {text:?}"
            );
        }
    }

    #[test]
    fn extraction_succeeds_inside_the_target_range() {
        assert_eq!(BigDecimal::from(123_456i64).try_to_i64().unwrap(), 123_456);
        assert_eq!(BigDecimal::from(-70_000i64).try_to_i32().unwrap(), -70_000);
        assert_eq!(
            "12.75".parse::<BigDecimal>().unwrap().try_to_i64().unwrap(),
            12
        );
    }

    #[test]
    fn extraction_reparses_scaled_values() {
        let value = format!("1{}", "0".repeat(16)).parse::<BigDecimal>().unwrap();
        assert!(value.exponent() > 0);
        assert_eq!(value.try_to_i64().unwrap(), 10_000_000_000_000_000);
    }

    #[test]
    fn extraction_clamps_to_the_matching_sign() {
        let huge = "9".repeat(25).parse::<BigDecimal>().unwrap();
        assert_eq!(
            huge.try_to_i64(),
            Err(NumericError::Overflow { target: "i64" })
        );
        assert_eq!(huge.to_i64_saturating(), i64::MAX);

        let negative = format!("-{}", "9".repeat(25)).parse::<BigDecimal>().unwrap();
        assert_eq!(negative.to_i64_saturating(), i64::MIN);

        assert_eq!(BigDecimal::from(10_000_000_000i64).to_i32_saturating(), i32::MAX);
        assert_eq!(i64::try_from(BigDecimal::from(77i64)).unwrap(), 77);
    }

    #[test]
    fn lossy_doubles_track_the_magnitude() {
        let value = "2.5E+20".parse::<BigDecimal>().unwrap();
        let lossy = value.to_f64_lossy();
        assert!((lossy - 2.5e20).abs() < 1e7);
    }
}
