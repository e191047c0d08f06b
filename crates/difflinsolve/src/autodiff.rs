//! AutoDiff - scalar carrying first-order sensitivities.
//!
//! An [`AutoDiff`] is a value together with its partial derivatives with
//! respect to a set of tracked variables. Variables are identified only by
//! position in the derivative sequence.
//!
//! # Empty derivatives
//!
//! A derivative sequence of length zero stands for the zero vector of
//! whatever length the surrounding computation uses. Arithmetic broadcasts
//! it: `x + c` where `c` has no derivatives keeps the derivatives of `x`.
//! Two non-empty sequences of different lengths never broadcast; combining
//! them panics.
//!
//! # Example
//!
//! ```
//! use difflinsolve::AutoDiff;
//!
//! let x = AutoDiff::new(3.0, [1.0, 0.0]);
//! let y = AutoDiff::new(2.0, [0.0, 1.0]);
//!
//! let z = &x * &y;
//! assert_eq!(z.value(), 6.0);
//! assert_eq!(z.derivatives(), &[2.0, 3.0]);
//!
//! // Constants have empty derivatives and broadcast.
//! let w = &z + &AutoDiff::constant(1.0);
//! assert_eq!(w.derivatives(), &[2.0, 3.0]);
//! ```

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use smallvec::SmallVec;

use crate::scalar::{Scalar, ScalarCategory};

/// Derivative storage; most problems track only a handful of variables.
pub type Derivatives = SmallVec<[f64; 4]>;

/// A value with an immutable sequence of partial derivatives.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AutoDiff {
    value: f64,
    derivatives: Derivatives,
}

impl AutoDiff {
    /// Create a dual number from a value and its derivatives.
    pub fn new(value: f64, derivatives: impl IntoIterator<Item = f64>) -> Self {
        Self {
            value,
            derivatives: derivatives.into_iter().collect(),
        }
    }

    /// Create a dual number with no derivatives (a constant).
    pub fn constant(value: f64) -> Self {
        Self {
            value,
            derivatives: Derivatives::new(),
        }
    }

    /// Create the `index`-th of `num_variables` independent variables.
    ///
    /// The derivative sequence is the unit vector `e_index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_variables`.
    pub fn variable(value: f64, index: usize, num_variables: usize) -> Self {
        assert!(
            index < num_variables,
            "variable index {index} out of range for {num_variables} variables"
        );
        let mut derivatives: Derivatives = SmallVec::from_elem(0.0, num_variables);
        derivatives[index] = 1.0;
        Self { value, derivatives }
    }

    /// The value.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The partial derivatives; empty means "all zero".
    #[inline]
    pub fn derivatives(&self) -> &[f64] {
        &self.derivatives
    }

    /// Number of tracked variables carried by this value.
    #[inline]
    pub fn num_derivatives(&self) -> usize {
        self.derivatives.len()
    }

    /// Check if any derivative information is carried.
    #[inline]
    pub fn has_derivatives(&self) -> bool {
        !self.derivatives.is_empty()
    }

    /// Drop the derivatives, keeping the value.
    pub fn detach(&self) -> Self {
        Self::constant(self.value)
    }
}

/// Combine two derivative sequences elementwise, broadcasting empty ones.
fn combine(lhs: &[f64], rhs: &[f64], f: impl Fn(f64, f64) -> f64) -> Derivatives {
    match (lhs.is_empty(), rhs.is_empty()) {
        (true, true) => Derivatives::new(),
        (false, true) => lhs.iter().map(|&l| f(l, 0.0)).collect(),
        (true, false) => rhs.iter().map(|&r| f(0.0, r)).collect(),
        (false, false) => {
            assert_eq!(
                lhs.len(),
                rhs.len(),
                "AutoDiff derivative size mismatch: {} vs {}",
                lhs.len(),
                rhs.len()
            );
            lhs.iter().zip(rhs).map(|(&l, &r)| f(l, r)).collect()
        }
    }
}

impl<'a> Add<&'a AutoDiff> for &'a AutoDiff {
    type Output = AutoDiff;

    fn add(self, rhs: &'a AutoDiff) -> AutoDiff {
        AutoDiff {
            value: self.value + rhs.value,
            derivatives: combine(&self.derivatives, &rhs.derivatives, |l, r| l + r),
        }
    }
}

impl<'a> Sub<&'a AutoDiff> for &'a AutoDiff {
    type Output = AutoDiff;

    fn sub(self, rhs: &'a AutoDiff) -> AutoDiff {
        AutoDiff {
            value: self.value - rhs.value,
            derivatives: combine(&self.derivatives, &rhs.derivatives, |l, r| l - r),
        }
    }
}

impl<'a> Mul<&'a AutoDiff> for &'a AutoDiff {
    type Output = AutoDiff;

    fn mul(self, rhs: &'a AutoDiff) -> AutoDiff {
        // Product rule
        let (a, b) = (self.value, rhs.value);
        AutoDiff {
            value: a * b,
            derivatives: combine(&self.derivatives, &rhs.derivatives, |l, r| b * l + a * r),
        }
    }
}

impl<'a> Div<&'a AutoDiff> for &'a AutoDiff {
    type Output = AutoDiff;

    fn div(self, rhs: &'a AutoDiff) -> AutoDiff {
        // Quotient rule
        let (a, b) = (self.value, rhs.value);
        let b2 = b * b;
        AutoDiff {
            value: a / b,
            derivatives: combine(&self.derivatives, &rhs.derivatives, |l, r| {
                (l * b - a * r) / b2
            }),
        }
    }
}

impl Neg for &AutoDiff {
    type Output = AutoDiff;

    fn neg(self) -> AutoDiff {
        AutoDiff {
            value: -self.value,
            derivatives: self.derivatives.iter().map(|d| -d).collect(),
        }
    }
}

impl Neg for AutoDiff {
    type Output = AutoDiff;

    fn neg(self) -> AutoDiff {
        -&self
    }
}

macro_rules! forward_owned_binop {
    ($($trait:ident :: $method:ident),*) => {$(
        impl $trait for AutoDiff {
            type Output = AutoDiff;

            #[inline]
            fn $method(self, rhs: AutoDiff) -> AutoDiff {
                $trait::$method(&self, &rhs)
            }
        }

        impl $trait<f64> for AutoDiff {
            type Output = AutoDiff;

            #[inline]
            fn $method(self, rhs: f64) -> AutoDiff {
                $trait::$method(&self, &AutoDiff::constant(rhs))
            }
        }

        impl $trait<AutoDiff> for f64 {
            type Output = AutoDiff;

            #[inline]
            fn $method(self, rhs: AutoDiff) -> AutoDiff {
                $trait::$method(&AutoDiff::constant(self), &rhs)
            }
        }
    )*};
}

forward_owned_binop!(Add::add, Sub::sub, Mul::mul, Div::div);

impl From<f64> for AutoDiff {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

impl Scalar for AutoDiff {
    const CATEGORY: ScalarCategory = ScalarCategory::Dual;

    fn zero() -> Self {
        Self::constant(0.0)
    }

    fn one() -> Self {
        Self::constant(1.0)
    }
}

impl fmt::Display for AutoDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if self.has_derivatives() {
            write!(f, " {:?}", self.derivatives.as_slice())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_has_no_derivatives() {
        let c = AutoDiff::constant(2.5);
        assert_eq!(c.value(), 2.5);
        assert!(!c.has_derivatives());
        assert_eq!(c.num_derivatives(), 0);
    }

    #[test]
    fn test_variable_seeds_unit_vector() {
        let x = AutoDiff::variable(4.0, 1, 3);
        assert_eq!(x.derivatives(), &[0.0, 1.0, 0.0]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_variable_index_out_of_range() {
        let _ = AutoDiff::variable(1.0, 3, 3);
    }

    #[test]
    fn test_product_rule() {
        let x = AutoDiff::new(3.0, [1.0, 2.0]);
        let y = AutoDiff::new(5.0, [-1.0, 4.0]);
        let z = x * y;
        assert_eq!(z.value(), 15.0);
        // d(xy) = y dx + x dy
        assert_eq!(z.derivatives(), &[5.0 - 3.0, 10.0 + 12.0]);
    }

    #[test]
    fn test_quotient_rule() {
        let x = AutoDiff::new(1.0, [1.0]);
        let y = AutoDiff::new(2.0, [3.0]);
        let z = &x / &y;
        assert_relative_eq!(z.value(), 0.5);
        // (dx y - x dy) / y^2 = (2 - 3) / 4
        assert_relative_eq!(z.derivatives()[0], -0.25);
    }

    #[test]
    fn test_empty_derivatives_broadcast() {
        let x = AutoDiff::new(2.0, [1.0, -1.0]);
        let c = AutoDiff::constant(3.0);

        assert_eq!((&x + &c).derivatives(), &[1.0, -1.0]);
        assert_eq!((&c - &x).derivatives(), &[-1.0, 1.0]);
        assert_eq!((&c * &x).derivatives(), &[3.0, -3.0]);
        assert_eq!((&c * &c).derivatives(), &[] as &[f64]);
    }

    #[test]
    fn test_mixed_with_f64() {
        let x = AutoDiff::new(2.0, [1.0]);
        let y = 3.0 * x.clone() - 1.0;
        assert_eq!(y.value(), 5.0);
        assert_eq!(y.derivatives(), &[3.0]);

        let z = x / 4.0;
        assert_relative_eq!(z.derivatives()[0], 0.25);
    }

    #[test]
    fn test_negation() {
        let x = AutoDiff::new(2.0, [1.0, 0.5]);
        let y = -x;
        assert_eq!(y.value(), -2.0);
        assert_eq!(y.derivatives(), &[-1.0, -0.5]);
    }

    #[test]
    #[should_panic(expected = "derivative size mismatch")]
    fn test_mismatched_lengths_panic() {
        let x = AutoDiff::new(1.0, [1.0, 2.0]);
        let y = AutoDiff::new(1.0, [1.0, 2.0, 3.0]);
        let _ = x + y;
    }

    #[test]
    fn test_detach() {
        let x = AutoDiff::new(1.5, [1.0]);
        let d = x.detach();
        assert_eq!(d.value(), 1.5);
        assert!(!d.has_derivatives());
    }

    #[test]
    fn test_display() {
        assert_eq!(AutoDiff::constant(1.0).to_string(), "1");
        assert_eq!(AutoDiff::new(1.0, [2.0]).to_string(), "1 [2.0]");
    }
}
