//! # Backing Primitives
//!
//! The big-number core is one generic implementation over a finite-precision
//! backing primitive. [`Real`] is the contract that primitive must satisfy:
//! ordinary signed arithmetic (via `num-traits`) plus the handful of numeric
//! operations the engine and the formatters need, and the constants that
//! describe how many significant decimal digits the primitive carries
//! reliably (its *precision window*).
//!
//! Two primitives are supported:
//!
//! - [`rust_decimal::Decimal`] - exact base-10, 28 significant digits; the
//!   mantissa window is capped at 15 digits so every arithmetic intermediate
//!   (sums, stripped products, division headroom) stays representable.
//! - [`f64`] - binary floating point; the window is capped at 12 digits,
//!   comfortably inside the ~15.9 digits an IEEE double resolves.

use std::fmt;

use num_traits::{FromPrimitive, Signed, ToPrimitive};
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A finite-precision numeric primitive that can back a big-number value.
///
/// Implementations must be plain `Copy` values with exact-ish decimal
/// behavior inside their declared window: `MAX_WINDOW` is the largest
/// mantissa magnitude the normalizer will leave in place, and every digit
/// inside that window must survive multiplication and division by ten.
pub trait Real:
    Copy + PartialOrd + fmt::Display + Signed + FromPrimitive + ToPrimitive + Serialize + DeserializeOwned
{
    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity.
    const ONE: Self;
    /// The base of every scale shift in this crate.
    const TEN: Self;
    /// Largest mantissa magnitude the normalizer leaves unshifted.
    const MAX_WINDOW: Self;
    /// `MAX_WINDOW / 10`; the lower bound of the scaled-mantissa window.
    const LOW_WINDOW: Self;
    /// Cap on intermediate mantissas inside the iterated-power loop.
    const POW_RENORM_CAP: Self;
    /// Number of decimal digits in `MAX_WINDOW`.
    const WINDOW_DIGITS: i32;
    /// Largest `n` for which `10^n` is representable in this primitive.
    const MAX_POW10: i32;

    /// Rounds to the nearest integer, midpoints away from zero.
    #[must_use]
    fn round_away(self) -> Self;

    /// Rounds to `dp` decimal places, midpoints away from zero.
    #[must_use]
    fn round_dp(self, dp: u32) -> Self;

    /// Drops the fractional part, toward zero.
    #[must_use]
    fn trunc(self) -> Self;

    /// Square root; `None` for negative inputs.
    fn sqrt(self) -> Option<Self>;

    /// Raises to a small non-negative integer power.
    #[must_use]
    fn powi(self, exp: i32) -> Self;

    /// Raises to an arbitrary (fractional) power. Callers keep `self`
    /// positive and the result inside the primitive's range.
    #[must_use]
    fn powf(self, exp: f64) -> Self;

    /// Base-10 logarithm, computed in double precision. Callers keep
    /// `self` strictly positive.
    #[must_use]
    fn log10_f64(self) -> f64;

    /// Checked division; `None` when the quotient is unrepresentable.
    fn checked_div(self, rhs: Self) -> Option<Self>;

    /// `10^exp` for `0 <= exp <= MAX_POW10`.
    #[must_use]
    fn pow10(exp: i32) -> Self;

    /// Parses a plain decimal token (`-?digits(.digits)?`).
    fn parse_plain(text: &str) -> Option<Self>;

    /// Renders without exponent markers and without trailing fractional
    /// zeros, the way the digit-string reconstruction needs it.
    #[must_use]
    fn fmt_plain(self) -> String;
}

impl Real for Decimal {
    const ZERO: Self = Decimal::ZERO;
    const ONE: Self = Decimal::ONE;
    const TEN: Self = Decimal::TEN;
    const MAX_WINDOW: Self = dec!(999_999_999_999_999);
    const LOW_WINDOW: Self = dec!(99_999_999_999_999.9);
    const POW_RENORM_CAP: Self = dec!(1000);
    const WINDOW_DIGITS: i32 = 15;
    const MAX_POW10: i32 = 28;

    fn round_away(self) -> Self {
        self.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }

    fn round_dp(self, dp: u32) -> Self {
        self.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
    }

    fn trunc(self) -> Self {
        Decimal::trunc(&self)
    }

    fn sqrt(self) -> Option<Self> {
        MathematicalOps::sqrt(&self)
    }

    fn powi(self, exp: i32) -> Self {
        MathematicalOps::powi(&self, i64::from(exp))
    }

    fn powf(self, exp: f64) -> Self {
        MathematicalOps::powf(&self, exp)
    }

    fn log10_f64(self) -> f64 {
        self.to_f64().unwrap_or(0.0).log10()
    }

    fn checked_div(self, rhs: Self) -> Option<Self> {
        Decimal::checked_div(self, rhs)
    }

    fn pow10(exp: i32) -> Self {
        MathematicalOps::powi(&Decimal::TEN, i64::from(exp))
    }

    fn parse_plain(text: &str) -> Option<Self> {
        text.parse().ok()
    }

    fn fmt_plain(self) -> String {
        self.normalize().to_string()
    }
}

impl Real for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const TEN: Self = 10.0;
    const MAX_WINDOW: Self = 999_999_999_999.0;
    const LOW_WINDOW: Self = 99_999_999_999.9;
    const POW_RENORM_CAP: Self = 100_000.0;
    const WINDOW_DIGITS: i32 = 12;
    const MAX_POW10: i32 = 300;

    fn round_away(self) -> Self {
        f64::round(self)
    }

    fn round_dp(self, dp: u32) -> Self {
        let factor = 10f64.powi(i32::try_from(dp).unwrap_or(i32::MAX));
        (self * factor).round() / factor
    }

    fn trunc(self) -> Self {
        f64::trunc(self)
    }

    fn sqrt(self) -> Option<Self> {
        if self < 0.0 {
            None
        } else {
            Some(f64::sqrt(self))
        }
    }

    fn powi(self, exp: i32) -> Self {
        f64::powi(self, exp)
    }

    fn powf(self, exp: f64) -> Self {
        f64::powf(self, exp)
    }

    fn log10_f64(self) -> f64 {
        f64::log10(self)
    }

    fn checked_div(self, rhs: Self) -> Option<Self> {
        let quotient = self / rhs;
        quotient.is_finite().then_some(quotient)
    }

    fn pow10(exp: i32) -> Self {
        10f64.powi(exp)
    }

    fn parse_plain(text: &str) -> Option<Self> {
        text.parse().ok()
    }

    fn fmt_plain(self) -> String {
        format!("{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_window_constants_are_consistent() {
        assert_eq!(Decimal::MAX_WINDOW / Decimal::TEN, Decimal::LOW_WINDOW);
        assert_eq!(<Decimal as Real>::pow10(Decimal::WINDOW_DIGITS) - Decimal::ONE, Decimal::MAX_WINDOW);
    }

    #[test]
    fn double_window_constants_are_consistent() {
        assert!((f64::MAX_WINDOW / 10.0 - f64::LOW_WINDOW).abs() < 1e-3);
        assert!((<f64 as Real>::pow10(f64::WINDOW_DIGITS) - 1.0 - f64::MAX_WINDOW).abs() < 1e-3);
    }

    #[test]
    fn rounding_is_midpoint_away_from_zero_for_both_primitives() {
        assert_eq!(dec!(0.5).round_away(), dec!(1));
        assert_eq!(dec!(-0.5).round_away(), dec!(-1));
        assert_eq!(0.5f64.round_away(), 1.0);
        assert_eq!((-0.5f64).round_away(), -1.0);
        assert_eq!(dec!(12.345).round_dp(2), dec!(12.35));
        assert_eq!(12.375f64.round_dp(2), 12.38);
    }

    #[test]
    fn plain_formatting_strips_trailing_zeros() {
        assert_eq!(dec!(3.50).fmt_plain(), "3.5");
        assert_eq!(dec!(1000).fmt_plain(), "1000");
        assert_eq!(1000f64.fmt_plain(), "1000");
        assert_eq!(0.5f64.fmt_plain(), "0.5");
    }

    #[test]
    fn sqrt_rejects_negatives() {
        assert!(Real::sqrt(dec!(-4)).is_none());
        assert!(Real::sqrt(-4.0f64).is_none());
        assert_eq!(Real::sqrt(dec!(16)), Some(dec!(4)));
    }
}
