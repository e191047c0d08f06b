//! Exact symbolic scalars.
//!
//! An [`Expression`] is a quotient of two multivariate [`Polynomial`]s with
//! arbitrary-precision rational coefficients over named [`Variable`]s.
//! Every arithmetic result is kept in a canonical, expanded form, so
//! comparing two expressions is the same as comparing them after expansion.
//!
//! # Example
//!
//! ```
//! use difflinsolve::symbolic::{Expression, Variable};
//!
//! let u = Expression::from(Variable::new("u"));
//! let v = Expression::from(Variable::new("v"));
//!
//! let lhs = (u.clone() + v.clone()) * (u.clone() - v.clone());
//! let rhs = u.clone() * u - v.clone() * v;
//! assert_eq!(lhs, rhs);
//! ```

mod expression;
mod polynomial;
mod variable;

pub use expression::Expression;
pub use polynomial::{Monomial, Polynomial};
pub use variable::Variable;
