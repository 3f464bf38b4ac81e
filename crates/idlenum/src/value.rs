//! # Normalized Big-Number Values
//!
//! A [`BigNumber`] is a currency magnitude stored as `mantissa * 10^exponent`
//! with the mantissa kept inside the backing primitive's precision window.
//! Renormalization runs after every mutating step and shifts digits between
//! mantissa and exponent so that:
//!
//! - the exponent is never negative (a negative exponent is folded into the
//!   mantissa, dropping precision below what the primitive can carry),
//! - while the exponent is positive the mantissa magnitude stays inside
//!   `[MAX_WINDOW/10, MAX_WINDOW]`,
//! - small values at exponent zero stay exact and are never scaled up,
//! - a zero mantissa forces a zero exponent.
//!
//! The cached `digit_length` (integer digits of the rounded mantissa) is what
//! the formatters and the multiply/power stripping paths run on.

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::real::Real;

/// High-precision currency value backed by [`rust_decimal::Decimal`]
/// (15-digit mantissa window).
pub type BigDecimal = BigNumber<Decimal>;

/// Double-precision currency value backed by [`f64`] (12-digit mantissa
/// window). Cheaper, loses digits earlier.
pub type BigDouble = BigNumber<f64>;

/// Two values are negligible relative to one another once their total
/// magnitude orders differ by at least this much.
const NEGLIGIBLE_ORDER_GAP: i64 = 10;

/// A game-currency magnitude that can exceed every native numeric range.
///
/// The value is `mantissa * 10^exponent`, renormalized after every
/// operation. Arithmetic is pure: operations never mutate their operands
/// and always return a fresh normalized value.
///
/// Ordering compares the exponent first and the mantissa only on ties.
/// Under the normalization invariant that is magnitude order for the
/// non-negative currency amounts this type is built for; it is *not* a
/// general signed-real comparator across different exponents.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(from = "RawNumber<R>", into = "RawNumber<R>")]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct BigNumber<R: Real> {
    pub(crate) mantissa: R,
    pub(crate) exponent: i32,
    pub(crate) digit_length: i32,
}

/// Wire shape for save files: mantissa and exponent only. The digit length
/// is derived, and stale or hand-edited payloads renormalize on entry.
#[derive(Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))]
struct RawNumber<R: Real> {
    mantissa: R,
    exponent: i32,
}

impl<R: Real> From<RawNumber<R>> for BigNumber<R> {
    fn from(raw: RawNumber<R>) -> Self {
        Self::from_parts(raw.mantissa, raw.exponent)
    }
}

impl<R: Real> From<BigNumber<R>> for RawNumber<R> {
    fn from(value: BigNumber<R>) -> Self {
        Self {
            mantissa: value.mantissa,
            exponent: value.exponent,
        }
    }
}

impl<R: Real> BigNumber<R> {
    /// Zero.
    pub const ZERO: Self = Self {
        mantissa: R::ZERO,
        exponent: 0,
        digit_length: 1,
    };

    /// One.
    pub const ONE: Self = Self {
        mantissa: R::ONE,
        exponent: 0,
        digit_length: 1,
    };

    /// Ten.
    pub const TEN: Self = Self {
        mantissa: R::TEN,
        exponent: 0,
        digit_length: 2,
    };

    /// Builds a value from a raw mantissa and power-of-ten exponent and
    /// normalizes it. This is the funnel every constructor goes through.
    #[must_use]
    pub fn from_parts(mantissa: R, exponent: i32) -> Self {
        let mut value = Self::raw(mantissa, exponent);
        value.renormalize();
        value
    }

    /// Builds a value from a bare backing-primitive quantity.
    #[must_use]
    pub fn from_real(mantissa: R) -> Self {
        Self::from_parts(mantissa, 0)
    }

    /// Unnormalized constructor for intermediate results; the caller must
    /// renormalize before the value escapes.
    pub(crate) const fn raw(mantissa: R, exponent: i32) -> Self {
        Self {
            mantissa,
            exponent,
            digit_length: 0,
        }
    }

    /// The significant-digit value. Combined with [`Self::exponent`] it
    /// reconstructs the represented magnitude.
    #[must_use]
    pub fn mantissa(&self) -> R {
        self.mantissa
    }

    /// The power-of-ten scale factor. Never negative.
    #[must_use]
    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    /// Count of integer digits of the rounded mantissa magnitude (1 when the
    /// mantissa rounds to zero).
    #[must_use]
    pub fn digit_length(&self) -> i32 {
        self.digit_length
    }

    /// True when the mantissa is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// True when the mantissa is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    /// The magnitude of this value.
    #[must_use]
    pub fn abs(self) -> Self {
        Self {
            mantissa: self.mantissa.abs(),
            ..self
        }
    }

    /// Exponent-major total order. On equal exponents an unordered mantissa
    /// pair (possible only through a NaN double) compares as equal.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match self.exponent.cmp(&other.exponent) {
            Ordering::Equal => self
                .mantissa
                .partial_cmp(&other.mantissa)
                .unwrap_or(Ordering::Equal),
            order => order,
        }
    }

    /// The smaller of two values under [`Self::total_cmp`].
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if self.total_cmp(&other) == Ordering::Greater {
            other
        } else {
            self
        }
    }

    /// The larger of two values under [`Self::total_cmp`].
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        if self.total_cmp(&other) == Ordering::Less {
            other
        } else {
            self
        }
    }

    /// True when adding `self` to `other` can be skipped outright: the two
    /// total magnitude orders differ by ten or more, so `self` cannot move
    /// a digit `other` still displays. Advisory; the arithmetic itself
    /// applies the primitive's own sharper cutoff.
    #[must_use]
    pub fn is_negligible_against(&self, other: &Self) -> bool {
        let own = i64::from(self.exponent) + i64::from(self.digit_length);
        let theirs = i64::from(other.exponent) + i64::from(other.digit_length);
        theirs - own >= NEGLIGIBLE_ORDER_GAP
    }

    /// Restores the normalization invariant after a mutating step.
    pub(crate) fn renormalize(&mut self) {
        if self.mantissa.is_zero() {
            self.exponent = 0;
            self.digit_length = 1;
            return;
        }
        let mut magnitude = self.mantissa.abs();
        while magnitude > R::MAX_WINDOW {
            self.mantissa = self.mantissa / R::TEN;
            magnitude = magnitude / R::TEN;
            self.exponent = self.exponent.saturating_add(1);
        }
        while magnitude < R::LOW_WINDOW && self.exponent > 0 {
            self.mantissa = self.mantissa * R::TEN;
            magnitude = magnitude * R::TEN;
            self.exponent -= 1;
        }
        if self.exponent < 0 {
            // fold the scale into the mantissa; digits below the
            // primitive's resolution are gone for good
            let shift = -i64::from(self.exponent);
            self.mantissa = if shift > i64::from(R::MAX_POW10) {
                R::ZERO
            } else {
                let fold = i32::try_from(shift).unwrap_or(R::MAX_POW10);
                self.mantissa / R::pow10(fold)
            };
            self.exponent = 0;
        }
        if self.mantissa.is_zero() {
            self.exponent = 0;
        }
        self.digit_length = count_digits(self.mantissa);
    }
}

/// Integer digits of the rounded magnitude; 1 when it rounds to zero.
fn count_digits<R: Real>(mantissa: R) -> i32 {
    let mut value = mantissa.abs().round_away();
    if value.is_zero() {
        return 1;
    }
    let mut digits = 0;
    while value >= R::ONE {
        value = value / R::TEN;
        digits += 1;
    }
    digits
}

impl<R: Real> Default for BigNumber<R> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<R: Real> PartialEq for BigNumber<R> {
    fn eq(&self, other: &Self) -> bool {
        self.exponent == other.exponent && self.mantissa == other.mantissa
    }
}

impl<R: Real> PartialOrd for BigNumber<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.total_cmp(other))
    }
}

impl<R: Real> fmt::Debug for BigNumber<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigNumber({}e{})", self.mantissa, self.exponent)
    }
}
