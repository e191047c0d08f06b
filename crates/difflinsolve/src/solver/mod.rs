//! Factorization selection.
//!
//! [`get_linear_solver`] builds one factorization of a square matrix for a
//! given [`Algorithm`]. The factorization's scalar domain depends on the
//! matrix's scalar type:
//!
//! | `A` entries   | solver                               | solver scalar |
//! |---------------|--------------------------------------|---------------|
//! | `f64`         | [`DenseSolver`] (faer)               | `f64`         |
//! | [`AutoDiff`]  | [`DenseSolver`] over the values of A | `f64`         |
//! | `Expression`  | `SymbolicSolver` (exact)             | `Expression`  |
//!
//! # Example
//!
//! ```
//! use difflinsolve::{Algorithm, LinearSolver, Matrix, get_linear_solver};
//!
//! let a = Matrix::from_row_slice(2, 2, &[1.0, 3.0, 3.0, 10.0]).unwrap();
//! let solver = get_linear_solver(Algorithm::PivotedLu, &a).unwrap();
//! assert_eq!((solver.nrows(), solver.ncols()), (2, 2));
//!
//! let b = Matrix::from_row_slice(2, 1, &[3.0, 5.0]).unwrap();
//! let x = solver.solve(&b).unwrap();
//! assert!((x[(0, 0)] - 15.0).abs() < 1e-12);
//! assert!((x[(1, 0)] + 4.0).abs() < 1e-12);
//! ```

mod dense;
#[cfg(feature = "symbolic")]
mod symbolic;

use std::fmt;
use std::str::FromStr;

use crate::autodiff::AutoDiff;
use crate::error::SolveError;
use crate::gradient::value_matrix;
use crate::matrix::Matrix;
use crate::scalar::Scalar;

pub use dense::DenseSolver;
#[cfg(feature = "symbolic")]
pub use symbolic::SymbolicSolver;

/// Dense factorization algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// `A = L Lᵀ`; requires a symmetric positive definite matrix.
    Cholesky,
    /// `A = L D Lᵀ`; symmetric matrices, tolerates indefinite ones.
    RobustCholesky,
    /// LU with partial (row) pivoting.
    PivotedLu,
    /// Householder QR with column pivoting.
    PivotedQr,
}

impl Algorithm {
    /// Every algorithm, in declaration order.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Cholesky,
        Algorithm::RobustCholesky,
        Algorithm::PivotedLu,
        Algorithm::PivotedQr,
    ];
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Cholesky => "Cholesky",
            Algorithm::RobustCholesky => "RobustCholesky",
            Algorithm::PivotedLu => "PivotedLu",
            Algorithm::PivotedQr => "PivotedQr",
        };
        f.write_str(name)
    }
}

impl FromStr for Algorithm {
    type Err = SolveError;

    /// Accepts the variant names and the short names `llt`, `ldlt`, `lu`
    /// and `qr`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cholesky" | "llt" => Ok(Algorithm::Cholesky),
            "robustcholesky" | "robust_cholesky" | "ldlt" => Ok(Algorithm::RobustCholesky),
            "pivotedlu" | "pivoted_lu" | "lu" | "partial_piv_lu" => Ok(Algorithm::PivotedLu),
            "pivotedqr" | "pivoted_qr" | "qr" | "col_piv_qr" => Ok(Algorithm::PivotedQr),
            _ => Err(SolveError::UnknownAlgorithm {
                name: s.to_string(),
            }),
        }
    }
}

/// A factorization of one square matrix that can solve `A x = rhs` for any
/// number of right-hand sides without refactorizing.
pub trait LinearSolver {
    /// Scalar type of right-hand sides and solutions.
    type Scalar: Scalar;

    /// The algorithm this factorization was built with.
    fn algorithm(&self) -> Algorithm;

    /// Rows of the factorized matrix.
    fn nrows(&self) -> usize;

    /// Columns of the factorized matrix.
    fn ncols(&self) -> usize;

    /// Solve `A x = rhs`.
    ///
    /// # Errors
    ///
    /// Returns `SolveError::DimensionMismatch` if `rhs` has the wrong number
    /// of rows.
    fn solve(&self, rhs: &Matrix<Self::Scalar>) -> Result<Matrix<Self::Scalar>, SolveError>;
}

/// Scalar types whose matrices can be factorized.
pub trait Factorize: Scalar {
    /// The factorization built for matrices of this scalar type.
    type Solver: LinearSolver;

    /// Build the factorization of `a`.
    fn factorize(algorithm: Algorithm, a: &Matrix<Self>) -> Result<Self::Solver, SolveError>;
}

impl Factorize for f64 {
    type Solver = DenseSolver;

    fn factorize(algorithm: Algorithm, a: &Matrix<f64>) -> Result<DenseSolver, SolveError> {
        DenseSolver::new(algorithm, a)
    }
}

impl Factorize for AutoDiff {
    type Solver = DenseSolver;

    fn factorize(algorithm: Algorithm, a: &Matrix<AutoDiff>) -> Result<DenseSolver, SolveError> {
        DenseSolver::new(algorithm, &value_matrix(a))
    }
}

#[cfg(feature = "symbolic")]
impl Factorize for crate::symbolic::Expression {
    type Solver = SymbolicSolver;

    fn factorize(
        algorithm: Algorithm,
        a: &Matrix<crate::symbolic::Expression>,
    ) -> Result<SymbolicSolver, SolveError> {
        SymbolicSolver::new(algorithm, a)
    }
}

/// Build the factorization of `a` for `algorithm`.
///
/// Dual matrices are factorized through their values, so the returned
/// solver works over `f64`. The factorization is owned by the caller and
/// never cached.
///
/// # Errors
///
/// Returns the error of the underlying factorization unchanged:
/// `NotSquareMatrix`, `Factorization` (e.g. a non-positive-definite matrix
/// given to `Cholesky`), or `UnsupportedAlgorithm`.
pub fn get_linear_solver<T: Factorize>(
    algorithm: Algorithm,
    a: &Matrix<T>,
) -> Result<T::Solver, SolveError> {
    log::trace!(
        "factorizing {}x{} {} matrix with {}",
        a.nrows(),
        a.ncols(),
        a.category(),
        algorithm
    );
    T::factorize(algorithm, a)
}
