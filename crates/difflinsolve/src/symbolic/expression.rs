//! Exact rational-function expressions.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

use super::polynomial::{Monomial, Polynomial};
use super::variable::Variable;
use crate::error::SolveError;
use crate::scalar::{Scalar, ScalarCategory};

/// An exact symbolic expression `numerator / denominator`.
///
/// The denominator is never zero. After every operation the pair is
/// normalized: if the denominator divides the numerator the quotient
/// replaces both, otherwise the denominator is scaled to a leading
/// coefficient of 1. Equality compares cross products, so it holds exactly
/// when the two rational functions are equal.
#[derive(Debug, Clone)]
pub struct Expression {
    numerator: Polynomial,
    denominator: Polynomial,
}

impl Expression {
    /// A polynomial expression.
    pub fn polynomial(p: Polynomial) -> Self {
        Self {
            numerator: p,
            denominator: Polynomial::one(),
        }
    }

    /// An exact rational constant.
    pub fn constant(value: BigRational) -> Self {
        Self::polynomial(Polynomial::constant(value))
    }

    /// The rational constant `numer / denom`.
    ///
    /// # Panics
    ///
    /// Panics if `denom` is zero.
    pub fn rational(numer: i64, denom: i64) -> Self {
        assert!(denom != 0, "division by zero expression");
        Self::constant(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    /// The exact binary value of a finite `f64`; `None` for NaN or infinity.
    pub fn from_f64(value: f64) -> Option<Self> {
        BigRational::from_float(value).map(Self::constant)
    }

    /// Build and normalize `numerator / denominator`.
    ///
    /// # Panics
    ///
    /// Panics if `denominator` is the zero polynomial.
    pub fn quotient(numerator: Polynomial, denominator: Polynomial) -> Self {
        assert!(!denominator.is_zero(), "division by zero expression");
        if numerator.is_zero() {
            return Self::polynomial(numerator);
        }
        if let Some(q) = numerator.div_exact(&denominator) {
            return Self::polynomial(q);
        }
        match denominator.leading_term().map(|(_, c)| c.recip()) {
            Some(inv) if !inv.is_one() => Self {
                numerator: numerator.scale(&inv),
                denominator: denominator.scale(&inv),
            },
            _ => Self {
                numerator,
                denominator,
            },
        }
    }

    /// Numerator polynomial.
    #[inline]
    pub fn numerator(&self) -> &Polynomial {
        &self.numerator
    }

    /// Denominator polynomial (`1` for polynomial expressions).
    #[inline]
    pub fn denominator(&self) -> &Polynomial {
        &self.denominator
    }

    /// Check if the expression is identically zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    /// The value if no variable appears.
    pub fn constant_value(&self) -> Option<BigRational> {
        let n = self.numerator.constant_value()?;
        let d = self.denominator.constant_value()?;
        Some(n / d)
    }

    /// Check if the expression is a polynomial (denominator `1`).
    pub fn is_polynomial(&self) -> bool {
        self.denominator == Polynomial::one()
    }

    /// Canonical expanded form.
    ///
    /// Arithmetic keeps expressions normalized already; this re-applies
    /// the normalization, cancelling the denominator when it divides the
    /// numerator.
    pub fn expand(&self) -> Self {
        Self::quotient(self.numerator.clone(), self.denominator.clone())
    }

    /// Variables that appear in the numerator or denominator.
    pub fn variables(&self) -> BTreeSet<Variable> {
        let mut vars = self.numerator.variables();
        vars.extend(self.denominator.variables());
        vars
    }

    /// Integer power.
    pub fn powi(&self, exponent: u32) -> Self {
        let mut result = Self::one();
        for _ in 0..exponent {
            result = &result * self;
        }
        result
    }

    /// Replace every occurrence of `variable` with `replacement`.
    ///
    /// # Panics
    ///
    /// Panics if the substitution makes the denominator zero.
    pub fn substitute(&self, variable: &Variable, replacement: &Expression) -> Self {
        let numerator = substitute_polynomial(&self.numerator, variable, replacement);
        let denominator = substitute_polynomial(&self.denominator, variable, replacement);
        &numerator / &denominator
    }

    /// Evaluate numerically with every variable bound in `env`.
    ///
    /// # Errors
    ///
    /// Returns `SolveError::UnboundVariable` if a variable has no value.
    pub fn evaluate(&self, env: &HashMap<Variable, f64>) -> Result<f64, SolveError> {
        Ok(self.numerator.evaluate(env)? / self.denominator.evaluate(env)?)
    }
}

fn substitute_polynomial(p: &Polynomial, variable: &Variable, replacement: &Expression) -> Expression {
    let mut sum = Expression::zero();
    for (monomial, coeff) in p.terms() {
        let mut term = Expression::constant(coeff.clone());
        for (v, power) in monomial.powers() {
            let factor = if v == variable {
                replacement.powi(*power)
            } else {
                Expression::polynomial(Polynomial::term(
                    Monomial::from_powers([(v.clone(), *power)]),
                    BigRational::one(),
                ))
            };
            term = &term * &factor;
        }
        sum = &sum + &term;
    }
    sum
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        if self.denominator == other.denominator {
            return self.numerator == other.numerator;
        }
        &self.numerator * &other.denominator == &other.numerator * &self.denominator
    }
}

impl<'a> Add<&'a Expression> for &'a Expression {
    type Output = Expression;

    fn add(self, rhs: &'a Expression) -> Expression {
        if self.denominator == rhs.denominator {
            return Expression::quotient(
                &self.numerator + &rhs.numerator,
                self.denominator.clone(),
            );
        }
        Expression::quotient(
            &(&self.numerator * &rhs.denominator) + &(&rhs.numerator * &self.denominator),
            &self.denominator * &rhs.denominator,
        )
    }
}

impl<'a> Sub<&'a Expression> for &'a Expression {
    type Output = Expression;

    fn sub(self, rhs: &'a Expression) -> Expression {
        self + &(-rhs)
    }
}

impl<'a> Mul<&'a Expression> for &'a Expression {
    type Output = Expression;

    fn mul(self, rhs: &'a Expression) -> Expression {
        Expression::quotient(
            &self.numerator * &rhs.numerator,
            &self.denominator * &rhs.denominator,
        )
    }
}

impl<'a> Div<&'a Expression> for &'a Expression {
    type Output = Expression;

    /// # Panics
    ///
    /// Panics if `rhs` is identically zero.
    fn div(self, rhs: &'a Expression) -> Expression {
        assert!(!rhs.is_zero(), "division by zero expression");
        Expression::quotient(
            &self.numerator * &rhs.denominator,
            &self.denominator * &rhs.numerator,
        )
    }
}

impl Neg for &Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        Expression {
            numerator: -&self.numerator,
            denominator: self.denominator.clone(),
        }
    }
}

impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        -&self
    }
}

macro_rules! forward_owned_binop {
    ($($trait:ident :: $method:ident),*) => {$(
        impl $trait for Expression {
            type Output = Expression;

            #[inline]
            fn $method(self, rhs: Expression) -> Expression {
                $trait::$method(&self, &rhs)
            }
        }
    )*};
}

forward_owned_binop!(Add::add, Sub::sub, Mul::mul, Div::div);

impl From<i64> for Expression {
    fn from(value: i64) -> Self {
        Self::polynomial(Polynomial::integer(value))
    }
}

impl From<i32> for Expression {
    fn from(value: i32) -> Self {
        Self::from(i64::from(value))
    }
}

impl From<Variable> for Expression {
    fn from(variable: Variable) -> Self {
        Self::polynomial(Polynomial::var(variable))
    }
}

impl From<&Variable> for Expression {
    fn from(variable: &Variable) -> Self {
        Self::from(variable.clone())
    }
}

impl From<Polynomial> for Expression {
    fn from(p: Polynomial) -> Self {
        Self::polynomial(p)
    }
}

impl Scalar for Expression {
    const CATEGORY: ScalarCategory = ScalarCategory::Symbolic;

    fn zero() -> Self {
        Self::polynomial(Polynomial::zero())
    }

    fn one() -> Self {
        Self::polynomial(Polynomial::one())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_polynomial() {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "({}) / ({})", self.numerator, self.denominator)
        }
    }
}
