//! Exact factorization of symbolic matrices.
//!
//! Cholesky over expressions is carried out root-free as `A = L D Lᵀ` with
//! `L` unit lower triangular, so every entry stays a rational function of
//! the input entries and no square roots are introduced.

use num_traits::Signed;

use super::{Algorithm, LinearSolver};
use crate::error::SolveError;
use crate::matrix::Matrix;
use crate::scalar::ScalarCategory;
use crate::symbolic::Expression;

/// An exact `L D Lᵀ` factorization of a symmetric symbolic matrix.
///
/// Only the lower triangle of the input is read.
#[derive(Debug, Clone)]
pub struct SymbolicSolver {
    lower: Matrix<Expression>,
    diagonal: Vec<Expression>,
}

impl SymbolicSolver {
    /// Factorize `a`. Only `Algorithm::Cholesky` is available.
    ///
    /// # Errors
    ///
    /// - `SolveError::UnsupportedAlgorithm` for any other algorithm.
    /// - `SolveError::NotSquareMatrix` if `a` is not square.
    /// - `SolveError::Factorization` if a pivot is identically zero or is a
    ///   constant that is not positive.
    pub fn new(algorithm: Algorithm, a: &Matrix<Expression>) -> Result<Self, SolveError> {
        if algorithm != Algorithm::Cholesky {
            return Err(SolveError::UnsupportedAlgorithm {
                algorithm,
                category: ScalarCategory::Symbolic,
            });
        }
        if !a.is_square() {
            return Err(SolveError::NotSquareMatrix {
                rows: a.nrows(),
                cols: a.ncols(),
            });
        }

        let n = a.nrows();
        let mut lower = Matrix::<Expression>::identity(n);
        let mut diagonal: Vec<Expression> = Vec::with_capacity(n);
        for j in 0..n {
            let mut pivot = a[(j, j)].clone();
            for k in 0..j {
                let ljk = &lower[(j, k)];
                pivot = &pivot - &(&(ljk * ljk) * &diagonal[k]);
            }
            check_pivot(j, &pivot)?;

            for i in (j + 1)..n {
                let mut s = a[(i, j)].clone();
                for k in 0..j {
                    s = &s - &(&(&lower[(i, k)] * &lower[(j, k)]) * &diagonal[k]);
                }
                lower[(i, j)] = &s / &pivot;
            }
            diagonal.push(pivot);
        }

        Ok(Self { lower, diagonal })
    }

    /// The unit lower-triangular factor `L`.
    pub fn lower(&self) -> &Matrix<Expression> {
        &self.lower
    }

    /// The diagonal of `D`.
    pub fn diagonal(&self) -> &[Expression] {
        &self.diagonal
    }
}

fn check_pivot(index: usize, pivot: &Expression) -> Result<(), SolveError> {
    if pivot.is_zero() {
        return Err(SolveError::Factorization {
            algorithm: Algorithm::Cholesky,
            message: format!("zero pivot at index {index}"),
        });
    }
    if let Some(value) = pivot.constant_value() {
        if !value.is_positive() {
            return Err(SolveError::Factorization {
                algorithm: Algorithm::Cholesky,
                message: format!("matrix is not positive definite: pivot {value} at index {index}"),
            });
        }
    }
    Ok(())
}

impl LinearSolver for SymbolicSolver {
    type Scalar = Expression;

    fn algorithm(&self) -> Algorithm {
        Algorithm::Cholesky
    }

    fn nrows(&self) -> usize {
        self.diagonal.len()
    }

    fn ncols(&self) -> usize {
        self.diagonal.len()
    }

    fn solve(&self, rhs: &Matrix<Expression>) -> Result<Matrix<Expression>, SolveError> {
        let n = self.diagonal.len();
        if rhs.nrows() != n {
            return Err(self.lower.dimension_mismatch("solve", rhs));
        }
        let mut x = rhs.clone();
        for col in 0..x.ncols() {
            // L y = b
            for i in 0..n {
                for k in 0..i {
                    let updated = &x[(i, col)] - &(&self.lower[(i, k)] * &x[(k, col)]);
                    x[(i, col)] = updated;
                }
            }
            // D z = y
            for i in 0..n {
                let updated = &x[(i, col)] / &self.diagonal[i];
                x[(i, col)] = updated;
            }
            // Lᵀ x = z
            for i in (0..n).rev() {
                for k in (i + 1)..n {
                    let updated = &x[(i, col)] - &(&self.lower[(k, i)] * &x[(k, col)]);
                    x[(i, col)] = updated;
                }
            }
        }
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::Scalar;
    use crate::symbolic::Variable;

    fn int_matrix(nrows: usize, ncols: usize, rows: &[i64]) -> Matrix<Expression> {
        let entries: Vec<Expression> = rows.iter().map(|&v| Expression::from(v)).collect();
        Matrix::from_row_slice(nrows, ncols, &entries).unwrap()
    }

    #[test]
    fn test_factor_is_exact() {
        let a = int_matrix(2, 2, &[1, 3, 3, 10]);
        let solver = SymbolicSolver::new(Algorithm::Cholesky, &a).unwrap();
        assert_eq!(solver.diagonal(), &[Expression::from(1), Expression::from(1)]);
        assert_eq!(solver.lower()[(1, 0)], Expression::from(3));
        assert_eq!(solver.lower()[(0, 1)], Expression::zero());
    }

    #[test]
    fn test_solve_integer_system() {
        let a = int_matrix(2, 2, &[1, 3, 3, 10]);
        let b = int_matrix(2, 1, &[3, 5]);
        let x = SymbolicSolver::new(Algorithm::Cholesky, &a)
            .unwrap()
            .solve(&b)
            .unwrap();
        assert_eq!(x, int_matrix(2, 1, &[15, -4]));
    }

    #[test]
    fn test_solve_with_variables() {
        let u = Expression::from(Variable::new("u"));
        let a = int_matrix(2, 2, &[2, 1, 1, 2]);
        let b = Matrix::from_row_slice(2, 1, &[u.clone(), Expression::from(0)]).unwrap();
        let x = SymbolicSolver::new(Algorithm::Cholesky, &a)
            .unwrap()
            .solve(&b)
            .unwrap();
        assert_eq!(x[(0, 0)], &Expression::rational(2, 3) * &u);
        assert_eq!(x[(1, 0)], &Expression::rational(-1, 3) * &u);
    }

    #[test]
    fn test_symbolic_pivot_is_accepted() {
        let p = Expression::from(Variable::new("p"));
        let a = Matrix::from_row_slice(
            2,
            2,
            &[p.clone(), Expression::from(1), Expression::from(1), Expression::from(1)],
        )
        .unwrap();
        let solver = SymbolicSolver::new(Algorithm::Cholesky, &a).unwrap();
        let expected = &Expression::from(1) - &(&Expression::from(1) / &p);
        assert_eq!(solver.diagonal()[1], expected);
    }

    #[test]
    fn test_variable_pivot_accepted_even_if_negative_later() {
        let p_var = Variable::new("p");
        let p = Expression::from(&p_var);
        let a = Matrix::from_row_slice(
            2,
            2,
            &[p.clone(), Expression::from(1), Expression::from(1), Expression::from(1)],
        )
        .unwrap();
        let solver = SymbolicSolver::new(Algorithm::Cholesky, &a).unwrap();

        // The first pivot is p, negative at p = -1.
        let minus_one = Expression::from(-1);
        assert_eq!(solver.diagonal()[0].substitute(&p_var, &minus_one), minus_one);

        // The exact solution stays valid after substitution.
        let b = Matrix::from_row_slice(2, 1, &[Expression::from(1), Expression::from(0)]).unwrap();
        let x = solver.solve(&b).unwrap();
        let x0 = x[(0, 0)].substitute(&p_var, &minus_one);
        let x1 = x[(1, 0)].substitute(&p_var, &minus_one);
        assert_eq!(x0, Expression::rational(-1, 2));
        assert_eq!(x1, Expression::rational(1, 2));
    }

    #[test]
    fn test_other_algorithms_unsupported() {
        let a = int_matrix(2, 2, &[1, 3, 3, 10]);
        for algorithm in [
            Algorithm::RobustCholesky,
            Algorithm::PivotedLu,
            Algorithm::PivotedQr,
        ] {
            assert_eq!(
                SymbolicSolver::new(algorithm, &a).unwrap_err(),
                SolveError::UnsupportedAlgorithm {
                    algorithm,
                    category: ScalarCategory::Symbolic,
                }
            );
        }
    }

    #[test]
    fn test_non_positive_pivot() {
        let a = int_matrix(2, 2, &[1, 2, 2, 1]);
        assert!(matches!(
            SymbolicSolver::new(Algorithm::Cholesky, &a),
            Err(SolveError::Factorization { .. })
        ));
        let singular = int_matrix(2, 2, &[1, 1, 1, 1]);
        let err = SymbolicSolver::new(Algorithm::Cholesky, &singular).unwrap_err();
        assert!(err.to_string().contains("zero pivot at index 1"));
    }
}
