//! difflinsolve - differentiable dense linear solves
//!
//! This crate solves `A x = b` for matrices over three kinds of scalars and
//! propagates derivatives through the solve.
//!
//! # Architecture
//!
//! ```text
//! Level 1: linear_solve (linear_solve module)
//!     → compile-time dispatch on the scalar types of A and b
//!     → numeric, dual and symbolic paths
//!
//! Level 2: get_linear_solver (solver module)
//!     → one factorization per call, reused for every right-hand side
//!
//! Level 3: Backends
//!     → DenseSolver: faer Llt / Ldlt / PartialPivLu / ColPivQr
//!     → SymbolicSolver: exact L D Lᵀ over rational expressions
//! ```
//!
//! Derivatives follow `dx = A⁻¹ (db − dA · x)`: the values of `A` are
//! factorized once and the factorization solves the value system and every
//! derivative direction.
//!
//! # Example
//!
//! ```
//! use difflinsolve::{Algorithm, AutoDiff, Matrix, linear_solve};
//!
//! // A depends on one variable p through A(0, 0) = 1 + p
//! let a = Matrix::from_row_slice(
//!     2,
//!     2,
//!     &[
//!         AutoDiff::new(1.0, [1.0]),
//!         AutoDiff::constant(3.0),
//!         AutoDiff::constant(3.0),
//!         AutoDiff::constant(10.0),
//!     ],
//! )
//! .unwrap();
//! let b = Matrix::from_row_slice(2, 1, &[3.0, 5.0]).unwrap();
//!
//! let x = linear_solve(Algorithm::Cholesky, &a, &b).unwrap();
//! assert!((x[(0, 0)].value() - 15.0).abs() < 1e-12);
//! assert!((x[(0, 0)].derivatives()[0] + 150.0).abs() < 1e-9);
//! ```

pub mod autodiff;
pub mod backend;
pub mod consistency;
pub mod error;
pub mod gradient;
pub mod linear_solve;
pub mod matrix;
pub mod scalar;
pub mod solver;
#[cfg(feature = "symbolic")]
pub mod symbolic;

pub use autodiff::AutoDiff;
pub use error::SolveError;
pub use gradient::Differentiable;
pub use linear_solve::{SolveDispatch, linear_solve};
pub use matrix::Matrix;
pub use scalar::{Scalar, ScalarCategory, category_of};
pub use solver::{Algorithm, DenseSolver, Factorize, LinearSolver, get_linear_solver};
#[cfg(feature = "symbolic")]
pub use solver::SymbolicSolver;
