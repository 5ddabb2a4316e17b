//! Closed tolerance intervals.
//!
//! Every attenuation factor in a chain is only known within manufacturing
//! tolerances, so factors are carried as `[min, max]` pairs instead of single
//! numbers. All factors are transmittance fractions, which keeps every
//! interval non-negative and lets multiplication pair the bounds directly:
//! `[a, b] * [c, d] = [a * c, b * d]`.
//!
//! Only multiplication is defined. Subtraction, division and sign-crossing
//! intervals never occur in range propagation.

use std::fmt;
use std::iter::Product;
use std::ops::{Mul, MulAssign};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// A closed `[min, max]` range of a multiplicative factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// The neutral multiplier.
    pub const ONE: Interval = Interval { min: 1.0, max: 1.0 };

    pub const ZERO: Interval = Interval { min: 0.0, max: 0.0 };

    /// Build a validated interval.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidInterval`] when a bound is not finite, is
    /// negative, or `min > max`.
    pub fn new(min: f64, max: f64) -> Result<Self, ModelError> {
        let interval = Self { min, max };
        if interval.is_well_formed() {
            Ok(interval)
        } else {
            Err(ModelError::InvalidInterval { min, max })
        }
    }

    /// Degenerate interval `[x, x]`.
    pub const fn scalar(x: f64) -> Self {
        Self { min: x, max: x }
    }

    /// Pairwise product of the bounds.
    ///
    /// Only meaningful for non-negative intervals; under that restriction the
    /// operation is commutative and associative.
    #[must_use]
    pub fn multiply(self, other: Interval) -> Self {
        Self {
            min: self.min * other.min,
            max: self.max * other.max,
        }
    }

    /// Multiply both bounds by a non-negative scalar.
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        self.multiply(Self::scalar(factor))
    }

    /// Finite, non-negative and ordered.
    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min <= self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Bound-wise comparison with a relative tolerance.
    pub fn approx_eq(&self, other: &Interval, tolerance: f64) -> bool {
        close(self.min, other.min, tolerance) && close(self.max, other.max, tolerance)
    }
}

fn close(a: f64, b: f64, tolerance: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= tolerance * scale
}

impl Mul for Interval {
    type Output = Interval;

    fn mul(self, rhs: Interval) -> Interval {
        self.multiply(rhs)
    }
}

impl MulAssign for Interval {
    fn mul_assign(&mut self, rhs: Interval) {
        *self = self.multiply(rhs);
    }
}

impl Product for Interval {
    fn product<I: Iterator<Item = Interval>>(iter: I) -> Self {
        iter.fold(Interval::ONE, Interval::multiply)
    }
}

impl<'a> Product<&'a Interval> for Interval {
    fn product<I: Iterator<Item = &'a Interval>>(iter: I) -> Self {
        iter.copied().product()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "[{:.*}, {:.*}]", p, self.min, p, self.max),
            None => write!(f, "[{}, {}]", self.min, self.max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_is_degenerate() {
        let s = Interval::scalar(0.5);
        assert_eq!(s.min, 0.5);
        assert_eq!(s.max, 0.5);
        assert_eq!(s.width(), 0.0);
    }

    #[test]
    fn multiply_pairs_bounds() {
        let a = Interval::new(0.4, 0.5).unwrap();
        let b = Interval::new(0.5, 0.8).unwrap();
        let product = a * b;
        assert!(product.approx_eq(&Interval { min: 0.2, max: 0.4 }, 1e-12));
    }

    #[test]
    fn empty_product_is_neutral() {
        let product: Interval = Vec::<Interval>::new().into_iter().product();
        assert_eq!(product, Interval::ONE);
    }

    #[test]
    fn new_rejects_malformed_bounds() {
        assert!(Interval::new(0.6, 0.5).is_err());
        assert!(Interval::new(-0.1, 0.5).is_err());
        assert!(Interval::new(f64::NAN, 0.5).is_err());
        assert!(Interval::new(0.1, f64::INFINITY).is_err());
    }

    #[test]
    fn display_honours_precision() {
        let value = Interval { min: 0.2352, max: 0.32175 };
        assert_eq!(format!("{value:.3}"), "[0.235, 0.322]");
    }
}
