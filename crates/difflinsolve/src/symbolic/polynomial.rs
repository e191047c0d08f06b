//! Multivariate polynomials with exact rational coefficients.

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::variable::Variable;
use crate::error::SolveError;

// =============================================================================
// MONOMIAL
// =============================================================================

/// A product of variable powers, e.g. `u^2*v`.
///
/// Powers are sorted by variable and never zero, so each monomial has exactly
/// one representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Monomial {
    powers: Vec<(Variable, u32)>,
}

impl Monomial {
    /// The empty product, `1`.
    pub fn one() -> Self {
        Self::default()
    }

    /// A single variable to the first power.
    pub fn var(variable: Variable) -> Self {
        Self {
            powers: vec![(variable, 1)],
        }
    }

    /// Build from arbitrary `(variable, power)` pairs.
    pub fn from_powers(powers: impl IntoIterator<Item = (Variable, u32)>) -> Self {
        let mut merged: BTreeMap<Variable, u32> = BTreeMap::new();
        for (v, p) in powers {
            *merged.entry(v).or_insert(0) += p;
        }
        Self {
            powers: merged.into_iter().filter(|&(_, p)| p > 0).collect(),
        }
    }

    /// Variable/power pairs, sorted by variable.
    #[inline]
    pub fn powers(&self) -> &[(Variable, u32)] {
        &self.powers
    }

    /// Check if this is the constant monomial `1`.
    #[inline]
    pub fn is_one(&self) -> bool {
        self.powers.is_empty()
    }

    /// Total degree.
    pub fn degree(&self) -> u32 {
        self.powers.iter().map(|(_, p)| p).sum()
    }

    /// Product of two monomials.
    pub fn mul(&self, other: &Monomial) -> Monomial {
        Self::from_powers(self.powers.iter().chain(&other.powers).cloned())
    }

    /// `self / other` if `other` divides `self`.
    pub fn divide(&self, other: &Monomial) -> Option<Monomial> {
        let mut powers: BTreeMap<Variable, u32> = self.powers.iter().cloned().collect();
        for (v, p) in &other.powers {
            let entry = powers.get_mut(v)?;
            *entry = entry.checked_sub(*p)?;
        }
        Some(Self::from_powers(powers))
    }
}

impl Ord for Monomial {
    /// Lexicographic order with variables compared by name: the first
    /// variable (by name) whose exponents differ decides.
    fn cmp(&self, other: &Self) -> Ordering {
        let mut lhs = self.powers.iter().peekable();
        let mut rhs = other.powers.iter().peekable();
        loop {
            match (lhs.peek(), rhs.peek()) {
                (None, None) => return Ordering::Equal,
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (Some((va, pa)), Some((vb, pb))) => match va.cmp(vb) {
                    Ordering::Equal => {
                        if pa != pb {
                            return pa.cmp(pb);
                        }
                        lhs.next();
                        rhs.next();
                    }
                    // lhs has a positive power of a variable rhs lacks
                    Ordering::Less => return Ordering::Greater,
                    Ordering::Greater => return Ordering::Less,
                },
            }
        }
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.powers.is_empty() {
            return write!(f, "1");
        }
        for (k, (v, p)) in self.powers.iter().enumerate() {
            if k > 0 {
                write!(f, "*")?;
            }
            if *p == 1 {
                write!(f, "{v}")?;
            } else {
                write!(f, "{v}^{p}")?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// POLYNOMIAL
// =============================================================================

/// Multivariate polynomial with [`BigRational`] coefficients.
///
/// Terms are kept in a map from monomial to non-zero coefficient, so the
/// representation is canonical and `==` is mathematical equality.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Polynomial {
    terms: BTreeMap<Monomial, BigRational>,
}

impl Polynomial {
    /// The zero polynomial.
    pub fn zero() -> Self {
        Self::default()
    }

    /// The constant polynomial `1`.
    pub fn one() -> Self {
        Self::constant(BigRational::one())
    }

    /// A constant polynomial.
    pub fn constant(value: BigRational) -> Self {
        Self::term(Monomial::one(), value)
    }

    /// A constant polynomial from an integer.
    pub fn integer(value: i64) -> Self {
        Self::constant(BigRational::from_integer(BigInt::from(value)))
    }

    /// The polynomial `variable`.
    pub fn var(variable: Variable) -> Self {
        Self::term(Monomial::var(variable), BigRational::one())
    }

    /// A single term `coeff * monomial`.
    pub fn term(monomial: Monomial, coeff: BigRational) -> Self {
        let mut p = Self::zero();
        p.add_term(monomial, coeff);
        p
    }

    /// Check if this is the zero polynomial.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Check if no variable appears.
    pub fn is_constant(&self) -> bool {
        self.terms.keys().all(Monomial::is_one)
    }

    /// The value of a constant polynomial.
    pub fn constant_value(&self) -> Option<BigRational> {
        if !self.is_constant() {
            return None;
        }
        Some(
            self.terms
                .get(&Monomial::one())
                .cloned()
                .unwrap_or_else(BigRational::zero),
        )
    }

    /// Number of non-zero terms.
    #[inline]
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Terms in ascending monomial order.
    pub fn terms(&self) -> impl DoubleEndedIterator<Item = (&Monomial, &BigRational)> {
        self.terms.iter()
    }

    /// Greatest term in lexicographic monomial order.
    pub fn leading_term(&self) -> Option<(&Monomial, &BigRational)> {
        self.terms.last_key_value()
    }

    /// Variables that appear in some term.
    pub fn variables(&self) -> BTreeSet<Variable> {
        self.terms
            .keys()
            .flat_map(|m| m.powers().iter().map(|(v, _)| v.clone()))
            .collect()
    }

    /// Multiply every coefficient by `factor`.
    pub fn scale(&self, factor: &BigRational) -> Self {
        let mut p = Self::zero();
        for (m, c) in &self.terms {
            p.add_term(m.clone(), c * factor);
        }
        p
    }

    /// Exact quotient `self / divisor`, or `None` if `divisor` does not
    /// divide `self` (or is zero).
    ///
    /// Uses multivariate division by a single polynomial; a zero remainder
    /// is equivalent to divisibility.
    pub fn div_exact(&self, divisor: &Polynomial) -> Option<Polynomial> {
        let (lead_m, lead_c) = divisor.leading_term()?;
        let mut remainder = self.clone();
        let mut quotient = Polynomial::zero();
        while let Some((m, c)) = remainder.leading_term() {
            let step = Polynomial::term(m.divide(lead_m)?, c / lead_c);
            remainder = &remainder - &(&step * divisor);
            quotient = &quotient + &step;
        }
        Some(quotient)
    }

    /// Evaluate with every variable bound in `env`.
    pub fn evaluate(&self, env: &HashMap<Variable, f64>) -> Result<f64, SolveError> {
        let mut sum = 0.0;
        for (m, c) in &self.terms {
            let mut term = rational_to_f64(c);
            for (v, p) in m.powers() {
                let x = env.get(v).ok_or_else(|| SolveError::UnboundVariable {
                    name: v.name().to_string(),
                })?;
                term *= x.powi(*p as i32);
            }
            sum += term;
        }
        Ok(sum)
    }

    fn add_term(&mut self, monomial: Monomial, coeff: BigRational) {
        match self.terms.entry(monomial) {
            Entry::Vacant(e) => {
                if !coeff.is_zero() {
                    e.insert(coeff);
                }
            }
            Entry::Occupied(mut e) => {
                *e.get_mut() += coeff;
                if e.get().is_zero() {
                    e.remove();
                }
            }
        }
    }
}

/// Nearest `f64` to a rational.
pub(crate) fn rational_to_f64(value: &BigRational) -> f64 {
    match (value.numer().to_f64(), value.denom().to_f64()) {
        (Some(n), Some(d)) => n / d,
        _ => f64::NAN,
    }
}

impl<'a> Add<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &'a Polynomial) -> Polynomial {
        let mut p = self.clone();
        for (m, c) in &rhs.terms {
            p.add_term(m.clone(), c.clone());
        }
        p
    }
}

impl<'a> Sub<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &'a Polynomial) -> Polynomial {
        let mut p = self.clone();
        for (m, c) in &rhs.terms {
            p.add_term(m.clone(), -c);
        }
        p
    }
}

impl<'a> Mul<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &'a Polynomial) -> Polynomial {
        let mut p = Polynomial::zero();
        for (ma, ca) in &self.terms {
            for (mb, cb) in &rhs.terms {
                p.add_term(ma.mul(mb), ca * cb);
            }
        }
        p
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        Polynomial {
            terms: self.terms.iter().map(|(m, c)| (m.clone(), -c)).collect(),
        }
    }
}

impl fmt::Display for Polynomial {
    /// Terms in descending order, e.g. `u^2 - 1/3*v + 2`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (k, (m, c)) in self.terms.iter().rev().enumerate() {
            let magnitude = c.abs();
            match (k, c.is_negative()) {
                (0, true) => write!(f, "-")?,
                (0, false) => {}
                (_, true) => write!(f, " - ")?,
                (_, false) => write!(f, " + ")?,
            }
            if m.is_one() {
                write!(f, "{magnitude}")?;
            } else if magnitude.is_one() {
                write!(f, "{m}")?;
            } else {
                write!(f, "{magnitude}*{m}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u() -> Polynomial {
        Polynomial::var(Variable::new("u"))
    }

    fn v() -> Polynomial {
        Polynomial::var(Variable::new("v"))
    }

    fn rat(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn test_monomial_lex_order() {
        let u = Monomial::var(Variable::new("u"));
        let v = Monomial::var(Variable::new("v"));
        let v5 = Monomial::from_powers([(Variable::new("v"), 5)]);
        let uv = u.mul(&v);

        assert!(u > v5);
        assert!(uv > u);
        assert!(v > Monomial::one());
        assert_eq!(u.cmp(&u.clone()), Ordering::Equal);
    }

    #[test]
    fn test_monomial_divide() {
        let u2v = Monomial::from_powers([(Variable::new("u"), 2), (Variable::new("v"), 1)]);
        let u = Monomial::var(Variable::new("u"));
        let w = Monomial::var(Variable::new("w"));

        let q = u2v.divide(&u).unwrap();
        assert_eq!(q.to_string(), "u*v");
        assert!(u.divide(&u2v).is_none());
        assert!(u2v.divide(&w).is_none());
        assert_eq!(u.divide(&u).unwrap(), Monomial::one());
    }

    #[test]
    fn test_cancellation_removes_terms() {
        let p = &(&u() + &v()) - &u();
        assert_eq!(p, v());
        assert!((&u() - &u()).is_zero());
    }

    #[test]
    fn test_difference_of_squares() {
        let lhs = &(&u() + &v()) * &(&u() - &v());
        let rhs = &(&u() * &u()) - &(&v() * &v());
        assert_eq!(lhs, rhs);
        assert_eq!(lhs.num_terms(), 2);
    }

    #[test]
    fn test_div_exact() {
        let product = &(&u() + &Polynomial::integer(1)) * &(&u() - &v());
        let q = product.div_exact(&(&u() - &v())).unwrap();
        assert_eq!(q, &u() + &Polynomial::integer(1));

        assert!(u().div_exact(&v()).is_none());
        assert!(u().div_exact(&Polynomial::zero()).is_none());

        let halved = u().div_exact(&Polynomial::integer(2)).unwrap();
        assert_eq!(halved, u().scale(&rat(1, 2)));
    }

    #[test]
    fn test_constant_value() {
        assert_eq!(Polynomial::integer(3).constant_value(), Some(rat(3, 1)));
        assert_eq!(Polynomial::zero().constant_value(), Some(rat(0, 1)));
        assert_eq!(u().constant_value(), None);
    }

    #[test]
    fn test_evaluate() {
        let p = &(&u() * &u()) - &v().scale(&rat(1, 2));
        let env = HashMap::from([(Variable::new("u"), 3.0), (Variable::new("v"), 4.0)]);
        assert_eq!(p.evaluate(&env).unwrap(), 7.0);

        let missing = HashMap::from([(Variable::new("u"), 3.0)]);
        assert_eq!(
            p.evaluate(&missing),
            Err(SolveError::UnboundVariable {
                name: "v".to_string()
            })
        );
    }

    #[test]
    fn test_display() {
        let p = &(&(&u() * &u()) - &v().scale(&rat(1, 3))) + &Polynomial::integer(-2);
        assert_eq!(p.to_string(), "u^2 - 1/3*v - 2");
        assert_eq!((-&u()).to_string(), "-u");
        assert_eq!(Polynomial::zero().to_string(), "0");
    }

    #[test]
    fn test_variables() {
        let p = &(&u() * &v()) + &Polynomial::integer(1);
        let vars: Vec<_> = p.variables().into_iter().map(|v| v.name().to_string()).collect();
        assert_eq!(vars, vec!["u", "v"]);
    }
}
