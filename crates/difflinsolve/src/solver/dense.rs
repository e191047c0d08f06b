//! Numeric factorizations backed by faer.

use std::fmt;

use faer::Side;
use faer::linalg::solvers::{ColPivQr, Ldlt, Llt, PartialPivLu, Solve};

use super::{Algorithm, LinearSolver};
use crate::backend::{AsFaerMat, faer_mat_from_matrix, matrix_from_faer_mat};
use crate::error::SolveError;
use crate::matrix::Matrix;

enum Factorization {
    Cholesky(Llt<f64>),
    RobustCholesky(Ldlt<f64>),
    PivotedLu(PartialPivLu<f64>),
    PivotedQr(ColPivQr<f64>),
}

/// A factorization of a square `f64` matrix.
///
/// The symmetric algorithms only read the lower triangle of the input.
pub struct DenseSolver {
    algorithm: Algorithm,
    factorization: Factorization,
    n: usize,
}

impl DenseSolver {
    /// Factorize `a` with `algorithm`.
    ///
    /// # Errors
    ///
    /// Returns `SolveError::NotSquareMatrix` if `a` is not square, or
    /// `SolveError::Factorization` if faer rejects the matrix (a
    /// non-positive-definite input to `Cholesky`, a zero pivot in
    /// `RobustCholesky`). `PivotedLu` and `PivotedQr` do not detect a
    /// singular matrix; solving with one yields non-finite entries.
    pub fn new(algorithm: Algorithm, a: &Matrix<f64>) -> Result<Self, SolveError> {
        if !a.is_square() {
            return Err(SolveError::NotSquareMatrix {
                rows: a.nrows(),
                cols: a.ncols(),
            });
        }
        let mat = a.as_faer_mat();
        let factorization = match algorithm {
            Algorithm::Cholesky => Factorization::Cholesky(mat.llt(Side::Lower).map_err(|e| {
                SolveError::Factorization {
                    algorithm,
                    message: format!("{:?}", e),
                }
            })?),
            Algorithm::RobustCholesky => {
                Factorization::RobustCholesky(mat.ldlt(Side::Lower).map_err(|e| {
                    SolveError::Factorization {
                        algorithm,
                        message: format!("{:?}", e),
                    }
                })?)
            }
            Algorithm::PivotedLu => Factorization::PivotedLu(mat.partial_piv_lu()),
            Algorithm::PivotedQr => Factorization::PivotedQr(mat.col_piv_qr()),
        };
        Ok(Self {
            algorithm,
            factorization,
            n: a.nrows(),
        })
    }
}

impl LinearSolver for DenseSolver {
    type Scalar = f64;

    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn nrows(&self) -> usize {
        self.n
    }

    fn ncols(&self) -> usize {
        self.n
    }

    fn solve(&self, rhs: &Matrix<f64>) -> Result<Matrix<f64>, SolveError> {
        if rhs.nrows() != self.n {
            return Err(SolveError::DimensionMismatch {
                operation: "solve",
                lhs_rows: self.n,
                lhs_cols: self.n,
                rhs_rows: rhs.nrows(),
                rhs_cols: rhs.ncols(),
            });
        }
        let mut x = faer_mat_from_matrix(rhs);
        match &self.factorization {
            Factorization::Cholesky(f) => f.solve_in_place(&mut x),
            Factorization::RobustCholesky(f) => f.solve_in_place(&mut x),
            Factorization::PivotedLu(f) => f.solve_in_place(&mut x),
            Factorization::PivotedQr(f) => f.solve_in_place(&mut x),
        }
        Ok(matrix_from_faer_mat(x.as_ref()))
    }
}

impl fmt::Debug for DenseSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseSolver")
            .field("algorithm", &self.algorithm)
            .field("n", &self.n)
            .finish_non_exhaustive()
    }
}
