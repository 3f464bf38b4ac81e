//! # Arithmetic Engine
//!
//! Pure arithmetic over normalized values. Every operation returns a fresh
//! renormalized [`BigNumber`]; operands are never mutated.
//!
//! Operator impls accept anything convertible into a value (`v + 5`,
//! `v * 2.5`), promoting native literals through the conversion facade.
//! The fallible operations (`checked_div`, `checked_rem`, `checked_sqrt`)
//! return [`NumericResult`]; the operator forms degrade the way the game
//! loop expects - division by zero hands the dividend back, a negative
//! square root collapses to zero - and emit a `tracing` warning instead of
//! failing the frame.

use std::cmp::Ordering;
use std::iter::Sum;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};

use crate::error::{NumericError, NumericResult};
use crate::real::Real;
use crate::value::BigNumber;

/// Both mantissas shift down by this many orders before a division whose
/// operands sit near the top of the window, leaving room for rounding.
const DIV_HEADROOM: i32 = 5;

impl<R: Real> BigNumber<R> {
    fn add_value(self, rhs: Self) -> Self {
        if rhs.is_zero() {
            return self;
        }
        if self.is_zero() {
            return rhs;
        }
        let (mut out, small) = if self.exponent >= rhs.exponent {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let diff = out.exponent - small.exponent;
        if diff == 0 {
            out.mantissa = out.mantissa + small.mantissa;
        } else if diff <= R::MAX_POW10 {
            out.mantissa = out.mantissa + small.mantissa / R::pow10(diff);
        }
        // past the primitive's power-of-ten range the small term cannot
        // move the sum at all
        out.renormalize();
        out
    }

    fn mul_value(self, rhs: Self) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return Self::ZERO;
        }
        let small_product = self.exponent == 0
            && rhs.exponent == 0
            && self.digit_length + rhs.digit_length <= R::WINDOW_DIGITS;
        let mut out = if small_product {
            Self::raw(self.mantissa * rhs.mantissa, 0)
        } else {
            // strip the larger-exponent operand to its leading digit and
            // fold the stripped digit count into the exponent sum, keeping
            // the mantissa product inside the primitive's range
            let (kept, stripped) = if self.exponent >= rhs.exponent {
                (rhs, self)
            } else {
                (self, rhs)
            };
            let shift = stripped.digit_length - 1;
            let lead = if shift > 0 {
                stripped.mantissa / R::pow10(shift)
            } else {
                stripped.mantissa
            };
            Self::raw(
                kept.mantissa * lead,
                kept.exponent
                    .saturating_add(stripped.exponent)
                    .saturating_add(shift),
            )
        };
        out.renormalize();
        out
    }

    /// Divides, reporting a zero-mantissa divisor as [`NumericError::DivideByZero`].
    ///
    /// # Errors
    ///
    /// `DivideByZero` for a zero divisor; `Overflow` when the mantissa
    /// quotient is unrepresentable in the backing primitive.
    pub fn checked_div(self, rhs: Self) -> NumericResult<Self> {
        if rhs.mantissa.is_zero() {
            return Err(NumericError::DivideByZero);
        }
        if self.is_zero() {
            return Ok(Self::ZERO);
        }
        let mut dividend = self;
        let mut divisor = rhs;
        let headroom = R::MAX_WINDOW / R::pow10(DIV_HEADROOM);
        if dividend.mantissa.abs() > headroom || divisor.mantissa.abs() > headroom {
            dividend.mantissa = dividend.mantissa / R::pow10(DIV_HEADROOM);
            dividend.exponent = dividend.exponent.saturating_add(DIV_HEADROOM);
            divisor.mantissa = divisor.mantissa / R::pow10(DIV_HEADROOM);
            divisor.exponent = divisor.exponent.saturating_add(DIV_HEADROOM);
        }
        let mantissa = dividend
            .mantissa
            .checked_div(divisor.mantissa)
            .ok_or(NumericError::Overflow {
                target: "mantissa window",
            })?;
        let mut out = Self::raw(mantissa, dividend.exponent - divisor.exponent);
        out.renormalize();
        Ok(out)
    }

    /// Remainder. A dividend smaller than the divisor comes back unchanged;
    /// otherwise the fractional part of the quotient mantissa is scaled
    /// back up by the divisor.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::checked_div`].
    pub fn checked_rem(self, rhs: Self) -> NumericResult<Self> {
        if rhs.mantissa.is_zero() {
            return Err(NumericError::DivideByZero);
        }
        if self.total_cmp(&rhs) == Ordering::Less {
            return Ok(self);
        }
        let quotient = self.checked_div(rhs)?;
        let fraction = quotient.mantissa - quotient.mantissa.trunc();
        Ok(rhs.mul_value(Self::from_real(fraction)))
    }

    /// Square root: mantissa square-rooted, exponent halved by integer
    /// division. An odd exponent loses one unit of scale - the halving
    /// truncates toward the even exponent below it.
    ///
    /// # Errors
    ///
    /// [`NumericError::NegativeSqrt`] for negative values.
    pub fn checked_sqrt(self) -> NumericResult<Self> {
        if self.is_zero() {
            return Ok(Self::ZERO);
        }
        let root = self.mantissa.sqrt().ok_or(NumericError::NegativeSqrt)?;
        let mut out = Self::raw(root, self.exponent / 2);
        out.renormalize();
        Ok(out)
    }

    /// Infallible square root; negative input degrades to zero with a
    /// warning.
    #[must_use]
    pub fn sqrt(self) -> Self {
        self.checked_sqrt().unwrap_or_else(|error| {
            tracing::warn!("sqrt fallback, substituting zero: {error}");
            Self::ZERO
        })
    }

    /// Raises to an arbitrary real power.
    ///
    /// The mantissa is stripped to its leading digit and the stripped scale
    /// folds into a fractional exponent accumulator; the leading digit is
    /// then raised by repeated fourth powers (`m = m^4`, `hat /= 4`) with
    /// the intermediate renormalized into `[1, 10)` whenever it leaves the
    /// per-primitive cap, and the residual fractional power applied at the
    /// end. Negative powers take the reciprocal of the magnitude result;
    /// negative bases carry `(-1)^trunc(|hat|)`.
    #[must_use]
    pub fn pow(self, hat: f64) -> Self {
        if hat.abs() < f64::EPSILON {
            return Self::ONE;
        }
        if (hat - 1.0).abs() < f64::EPSILON {
            return self;
        }
        if self.is_zero() {
            return Self::ZERO;
        }
        let negative_base = self.is_negative();
        let negative_hat = hat < 0.0;
        let whole_hat = hat.abs().trunc();
        let mut h = hat.abs();

        let shift = self.digit_length - 1;
        let lead = if shift > 0 {
            self.mantissa.abs() / R::pow10(shift)
        } else {
            self.mantissa.abs()
        };
        let mut exp_acc = f64::from(self.exponent.saturating_add(shift)) * h;
        let mut m = lead;
        while h > 1.0 {
            if m > R::POW_RENORM_CAP || m < R::ONE {
                let order = rescale_to_unit_decade(&mut m);
                exp_acc += f64::from(order) * h;
            }
            m = m.powi(4);
            h /= 4.0;
        }
        if (h - 1.0).abs() > f64::EPSILON {
            m = m.powf(h);
        }
        let whole_exponent = exp_acc.floor();
        let fraction = exp_acc - whole_exponent;
        if fraction > 0.0 {
            m = m * R::from_f64(10f64.powf(fraction)).unwrap_or(R::ONE);
        }
        #[allow(clippy::cast_possible_truncation)]
        let mut out = Self::raw(m, whole_exponent as i32);
        out.renormalize();

        let mut result = out;
        if negative_hat {
            result = Self::ONE.checked_div(result).unwrap_or(Self::ZERO);
        }
        #[allow(clippy::cast_possible_truncation)]
        if negative_base && (whole_hat as i64) % 2 == 1 {
            result = -result;
        }
        result
    }

    /// Base-10 logarithm of the magnitude; zero maps to zero.
    #[must_use]
    pub fn log10(&self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        f64::from(self.exponent) + self.mantissa.abs().log10_f64()
    }

    /// Logarithm of the magnitude in an arbitrary base.
    ///
    /// # Errors
    ///
    /// [`NumericError::InvalidLogBase`] for bases that have no finite
    /// logarithm table (non-positive, or one).
    pub fn log_with_base(&self, base: f64) -> NumericResult<f64> {
        if base <= 0.0 || (base - 1.0).abs() < f64::EPSILON {
            return Err(NumericError::InvalidLogBase { base });
        }
        Ok(self.log10() / base.log10())
    }
}

/// Scales a positive intermediate into `[1, 10)` and reports the order
/// shift applied.
fn rescale_to_unit_decade<R: Real>(m: &mut R) -> i32 {
    #[allow(clippy::cast_possible_truncation)]
    let order = m.log10_f64().floor() as i32;
    *m = if order >= 0 {
        *m / R::pow10(order)
    } else {
        *m * R::pow10(-order)
    };
    order
}

impl<R: Real> Neg for BigNumber<R> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            mantissa: -self.mantissa,
            ..self
        }
    }
}

impl<R: Real, T: Into<BigNumber<R>>> Add<T> for BigNumber<R> {
    type Output = Self;

    fn add(self, rhs: T) -> Self::Output {
        self.add_value(rhs.into())
    }
}

impl<R: Real, T: Into<BigNumber<R>>> Sub<T> for BigNumber<R> {
    type Output = Self;

    fn sub(self, rhs: T) -> Self::Output {
        let rhs: Self = rhs.into();
        self.add_value(-rhs)
    }
}

impl<R: Real, T: Into<BigNumber<R>>> Mul<T> for BigNumber<R> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self::Output {
        self.mul_value(rhs.into())
    }
}

impl<R: Real, T: Into<BigNumber<R>>> Div<T> for BigNumber<R> {
    type Output = Self;

    fn div(self, rhs: T) -> Self::Output {
        match self.checked_div(rhs.into()) {
            Ok(quotient) => quotient,
            Err(error) => {
                tracing::warn!("division fallback, returning dividend unchanged: {error}");
                self
            }
        }
    }
}

impl<R: Real, T: Into<BigNumber<R>>> Rem<T> for BigNumber<R> {
    type Output = Self;

    fn rem(self, rhs: T) -> Self::Output {
        match self.checked_rem(rhs.into()) {
            Ok(remainder) => remainder,
            Err(error) => {
                tracing::warn!("modulo fallback, returning dividend unchanged: {error}");
                self
            }
        }
    }
}

impl<R: Real, T: Into<BigNumber<R>>> AddAssign<T> for BigNumber<R> {
    fn add_assign(&mut self, rhs: T) {
        *self = (*self).add_value(rhs.into());
    }
}

impl<R: Real, T: Into<BigNumber<R>>> SubAssign<T> for BigNumber<R> {
    fn sub_assign(&mut self, rhs: T) {
        let rhs: Self = rhs.into();
        *self = (*self).add_value(-rhs);
    }
}

impl<R: Real, T: Into<BigNumber<R>>> MulAssign<T> for BigNumber<R> {
    fn mul_assign(&mut self, rhs: T) {
        *self = (*self).mul_value(rhs.into());
    }
}

impl<R: Real, T: Into<BigNumber<R>>> DivAssign<T> for BigNumber<R> {
    fn div_assign(&mut self, rhs: T) {
        *self = *self / rhs.into();
    }
}

impl<R: Real, T: Into<BigNumber<R>>> RemAssign<T> for BigNumber<R> {
    fn rem_assign(&mut self, rhs: T) {
        *self = *self % rhs.into();
    }
}

impl<R: Real> Sum for BigNumber<R> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::add_value)
    }
}

impl<'a, R: Real> Sum<&'a BigNumber<R>> for BigNumber<R> {
    fn sum<I: Iterator<Item = &'a BigNumber<R>>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, value| acc.add_value(*value))
    }
}
