//! Differentiable linear solve.
//!
//! [`linear_solve`] dispatches on the scalar types of `A` and `b` at compile
//! time. Each pair maps to one of three paths:
//!
//! | `A`          | `b`          | path      | result       |
//! |--------------|--------------|-----------|--------------|
//! | `f64`        | `f64`        | numeric   | `f64`        |
//! | `Expression` | `Expression` | symbolic  | `Expression` |
//! | `AutoDiff`   | `f64`        | dual      | `AutoDiff`   |
//! | `f64`        | `AutoDiff`   | dual      | `AutoDiff`   |
//! | `AutoDiff`   | `AutoDiff`   | dual      | `AutoDiff`   |
//!
//! Mixing symbolic and non-symbolic operands does not compile.
//!
//! The dual path factorizes the values of `A` once and reuses the
//! factorization for every derivative direction, using
//!
//! ```text
//! dx = A⁻¹ (db − dA · x)
//! ```

use crate::autodiff::AutoDiff;
use crate::consistency::{check_variable_counts, derivative_size};
use crate::error::SolveError;
use crate::gradient::{Differentiable, derivative_matrix, value_matrix};
use crate::matrix::Matrix;
use crate::scalar::Scalar;
use crate::solver::{Algorithm, LinearSolver, get_linear_solver};

/// Scalar pairs `(Self, Rhs)` accepted by [`linear_solve`].
pub trait SolveDispatch<Rhs: Scalar>: Scalar {
    /// Scalar type of the solution.
    type Solution: Scalar;

    /// Solve `A x = b` along the path selected for this pair.
    fn solve_with(
        algorithm: Algorithm,
        a: &Matrix<Self>,
        b: &Matrix<Rhs>,
    ) -> Result<Matrix<Self::Solution>, SolveError>;
}

impl SolveDispatch<f64> for f64 {
    type Solution = f64;

    fn solve_with(
        algorithm: Algorithm,
        a: &Matrix<f64>,
        b: &Matrix<f64>,
    ) -> Result<Matrix<f64>, SolveError> {
        solve_numeric(algorithm, a, b)
    }
}

impl SolveDispatch<AutoDiff> for f64 {
    type Solution = AutoDiff;

    fn solve_with(
        algorithm: Algorithm,
        a: &Matrix<f64>,
        b: &Matrix<AutoDiff>,
    ) -> Result<Matrix<AutoDiff>, SolveError> {
        solve_dual(algorithm, a, b)
    }
}

impl SolveDispatch<f64> for AutoDiff {
    type Solution = AutoDiff;

    fn solve_with(
        algorithm: Algorithm,
        a: &Matrix<AutoDiff>,
        b: &Matrix<f64>,
    ) -> Result<Matrix<AutoDiff>, SolveError> {
        solve_dual(algorithm, a, b)
    }
}

impl SolveDispatch<AutoDiff> for AutoDiff {
    type Solution = AutoDiff;

    fn solve_with(
        algorithm: Algorithm,
        a: &Matrix<AutoDiff>,
        b: &Matrix<AutoDiff>,
    ) -> Result<Matrix<AutoDiff>, SolveError> {
        solve_dual(algorithm, a, b)
    }
}

#[cfg(feature = "symbolic")]
impl SolveDispatch<crate::symbolic::Expression> for crate::symbolic::Expression {
    type Solution = crate::symbolic::Expression;

    fn solve_with(
        algorithm: Algorithm,
        a: &Matrix<Self>,
        b: &Matrix<Self>,
    ) -> Result<Matrix<Self>, SolveError> {
        solve_symbolic(algorithm, a, b)
    }
}

/// Solve `A x = b`, propagating derivatives carried by `A` and `b`.
///
/// `A` must be square with as many rows as `b`. `b` may have any number of
/// columns.
///
/// # Errors
///
/// - `SolveError::DerivativeSizeMismatch` if the entries of `A` (or of `b`)
///   carry non-empty derivative sequences of different lengths.
/// - `SolveError::VariableCountMismatch` if `A` and `b` both carry
///   derivatives, for different numbers of variables.
/// - Any error of [`get_linear_solver`] or [`LinearSolver::solve`].
///
/// The derivative checks run before anything is factorized.
///
/// # Example
///
/// ```
/// use difflinsolve::{Algorithm, AutoDiff, Matrix, linear_solve};
///
/// let a = Matrix::from_row_slice(2, 2, &[1.0, 3.0, 3.0, 10.0]).unwrap();
/// let b = Matrix::from_vec(
///     vec![AutoDiff::new(3.0, [1.0]), AutoDiff::new(5.0, [0.0])],
///     2,
///     1,
/// )
/// .unwrap();
///
/// let x = linear_solve(Algorithm::Cholesky, &a, &b).unwrap();
/// assert!((x[(0, 0)].value() - 15.0).abs() < 1e-12);
/// // dx = A⁻¹ db = first column of A⁻¹
/// assert!((x[(0, 0)].derivatives()[0] - 10.0).abs() < 1e-12);
/// assert!((x[(1, 0)].derivatives()[0] + 3.0).abs() < 1e-12);
/// ```
pub fn linear_solve<TA, TB>(
    algorithm: Algorithm,
    a: &Matrix<TA>,
    b: &Matrix<TB>,
) -> Result<Matrix<TA::Solution>, SolveError>
where
    TA: SolveDispatch<TB>,
    TB: Scalar,
{
    log::debug!(
        "linear_solve with {}: A {}x{} ({}), b {}x{} ({})",
        algorithm,
        a.nrows(),
        a.ncols(),
        a.category(),
        b.nrows(),
        b.ncols(),
        b.category()
    );
    TA::solve_with(algorithm, a, b)
}

fn solve_numeric(
    algorithm: Algorithm,
    a: &Matrix<f64>,
    b: &Matrix<f64>,
) -> Result<Matrix<f64>, SolveError> {
    get_linear_solver(algorithm, a)?.solve(b)
}

#[cfg(feature = "symbolic")]
fn solve_symbolic(
    algorithm: Algorithm,
    a: &Matrix<crate::symbolic::Expression>,
    b: &Matrix<crate::symbolic::Expression>,
) -> Result<Matrix<crate::symbolic::Expression>, SolveError> {
    let x = get_linear_solver(algorithm, a)?.solve(b)?;
    Ok(x.map(crate::symbolic::Expression::expand))
}

fn solve_dual<TA, TB>(
    algorithm: Algorithm,
    a: &Matrix<TA>,
    b: &Matrix<TB>,
) -> Result<Matrix<AutoDiff>, SolveError>
where
    TA: Differentiable,
    TB: Differentiable,
{
    let num_a = derivative_size("A", a)?;
    let num_b = derivative_size("b", b)?;
    check_variable_counts(num_a, num_b)?;
    let num_variables = num_a.max(num_b);

    let solver = get_linear_solver(algorithm, &value_matrix(a))?;
    let x = solver.solve(&value_matrix(b))?;
    if num_variables == 0 {
        return Ok(x.cast());
    }

    let mut dx = Vec::with_capacity(num_variables);
    for t in 0..num_variables {
        log::trace!("derivative direction {} of {}", t + 1, num_variables);
        let mut rhs = derivative_matrix(b, t);
        if num_a != 0 {
            rhs = rhs.sub(&derivative_matrix(a, t).matmul(&x)?)?;
        }
        dx.push(solver.solve(&rhs)?);
    }

    Ok(Matrix::from_fn(x.nrows(), x.ncols(), |i, j| {
        AutoDiff::new(x[(i, j)], dx.iter().map(|d| d[(i, j)]))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn a_values() -> Matrix<f64> {
        Matrix::from_row_slice(2, 2, &[1.0, 3.0, 3.0, 10.0]).unwrap()
    }

    fn solution_category<TA: SolveDispatch<TB>, TB: Scalar>() -> crate::ScalarCategory {
        <TA::Solution as Scalar>::CATEGORY
    }

    #[test]
    fn test_solution_category() {
        use crate::ScalarCategory;

        assert_eq!(solution_category::<f64, f64>(), ScalarCategory::Numeric);
        assert_eq!(solution_category::<f64, AutoDiff>(), ScalarCategory::Dual);
        assert_eq!(solution_category::<AutoDiff, f64>(), ScalarCategory::Dual);
        assert_eq!(solution_category::<AutoDiff, AutoDiff>(), ScalarCategory::Dual);
    }

    #[test]
    fn test_numeric_path() {
        let b = Matrix::from_row_slice(2, 1, &[3.0, 5.0]).unwrap();
        let x = linear_solve(Algorithm::PivotedQr, &a_values(), &b).unwrap();
        assert_relative_eq!(x[(0, 0)], 15.0, epsilon = 1e-12);
        assert_relative_eq!(x[(1, 0)], -4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dual_without_derivatives_is_constant() {
        let a: Matrix<AutoDiff> = a_values().cast();
        let b: Matrix<AutoDiff> = Matrix::from_row_slice(2, 1, &[3.0, 5.0]).unwrap().cast();
        let x = linear_solve(Algorithm::Cholesky, &a, &b).unwrap();
        assert!(x.data().iter().all(|v| !v.has_derivatives()));
        assert_relative_eq!(x[(0, 0)].value(), 15.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dual_matrix_derivative() {
        // d/dp of A(p)⁻¹ b with A(p) = [[1 + p, 3], [3, 10]] at p = 0.
        let a = Matrix::from_row_slice(
            2,
            2,
            &[
                AutoDiff::new(1.0, [1.0]),
                AutoDiff::constant(3.0),
                AutoDiff::constant(3.0),
                AutoDiff::constant(10.0),
            ],
        )
        .unwrap();
        let b = Matrix::from_row_slice(2, 1, &[3.0, 5.0]).unwrap();
        let x = linear_solve(Algorithm::PivotedLu, &a, &b).unwrap();

        // dx = -A⁻¹ dA x, A⁻¹ = [[10, -3], [-3, 1]], dA x = [15, 0]
        assert_relative_eq!(x[(0, 0)].derivatives()[0], -150.0, epsilon = 1e-10);
        assert_relative_eq!(x[(1, 0)].derivatives()[0], 45.0, epsilon = 1e-10);
    }

    #[test]
    fn test_validation_precedes_factorization() {
        // Not square, but the derivative mismatch is reported first.
        let a = Matrix::from_row_slice(
            1,
            2,
            &[AutoDiff::new(1.0, [1.0]), AutoDiff::new(2.0, [1.0, 2.0])],
        )
        .unwrap();
        let b = Matrix::from_row_slice(1, 1, &[1.0]).unwrap();
        assert!(matches!(
            linear_solve(Algorithm::PivotedLu, &a, &b),
            Err(SolveError::DerivativeSizeMismatch { matrix: "A", .. })
        ));
    }

    #[test]
    fn test_shape_errors_are_forwarded() {
        let a: Matrix<f64> = Matrix::zeros(2, 3);
        let b: Matrix<f64> = Matrix::zeros(2, 1);
        assert_eq!(
            linear_solve(Algorithm::PivotedLu, &a, &b).unwrap_err(),
            SolveError::NotSquareMatrix { rows: 2, cols: 3 }
        );

        let b: Matrix<AutoDiff> = Matrix::zeros(3, 1);
        let a: Matrix<AutoDiff> = a_values().cast();
        assert!(matches!(
            linear_solve(Algorithm::PivotedLu, &a, &b),
            Err(SolveError::DimensionMismatch { .. })
        ));
    }

    #[cfg(feature = "symbolic")]
    #[test]
    fn test_symbolic_path_expands() {
        use crate::symbolic::{Expression, Variable};

        let a = a_values().map(|v| Expression::from(*v as i64));
        let u = Expression::from(Variable::new("u"));
        let b = Matrix::from_row_slice(2, 1, &[u.clone(), Expression::from(1)]).unwrap();
        let x = linear_solve(Algorithm::Cholesky, &a, &b).unwrap();
        assert!(x.data().iter().all(Expression::is_polynomial));
        let ax = a.matmul(&x).unwrap().map(Expression::expand);
        assert_eq!(ax, b);
    }
}
