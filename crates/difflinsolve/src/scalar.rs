//! Scalar trait and scalar-category classification.

use std::fmt::{self, Debug};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// The three numeric domains a matrix entry can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarCategory {
    /// Plain `f64`.
    Numeric,
    /// [`AutoDiff`](crate::AutoDiff): value plus first-order sensitivities.
    Dual,
    /// Exact symbolic expression.
    Symbolic,
}

impl fmt::Display for ScalarCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarCategory::Numeric => "Numeric",
            ScalarCategory::Dual => "Dual",
            ScalarCategory::Symbolic => "Symbolic",
        };
        f.write_str(name)
    }
}

/// Trait for scalar types supported by difflinsolve.
///
/// The category is an associated constant, so classifying a matrix never
/// inspects its entries.
pub trait Scalar:
    Clone
    + Debug
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Category of every value of this type.
    const CATEGORY: ScalarCategory;

    /// Returns the additive identity (zero).
    fn zero() -> Self;

    /// Returns the multiplicative identity (one).
    fn one() -> Self;
}

impl Scalar for f64 {
    const CATEGORY: ScalarCategory = ScalarCategory::Numeric;

    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }
}

/// Category of the scalar type `T`.
#[inline]
pub const fn category_of<T: Scalar>() -> ScalarCategory {
    T::CATEGORY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AutoDiff;

    #[test]
    fn test_f64_is_numeric() {
        assert_eq!(category_of::<f64>(), ScalarCategory::Numeric);
    }

    #[test]
    fn test_autodiff_is_dual() {
        assert_eq!(category_of::<AutoDiff>(), ScalarCategory::Dual);
    }

    #[cfg(feature = "symbolic")]
    #[test]
    fn test_expression_is_symbolic() {
        use crate::symbolic::Expression;
        assert_eq!(category_of::<Expression>(), ScalarCategory::Symbolic);
    }

    #[test]
    fn test_zero_one() {
        assert_eq!(f64::zero(), 0.0);
        assert_eq!(f64::one(), 1.0);
        assert_eq!(AutoDiff::zero().value(), 0.0);
        assert_eq!(AutoDiff::one().value(), 1.0);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ScalarCategory::Dual.to_string(), "Dual");
    }
}
