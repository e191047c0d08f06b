//! Value extraction and gradient helpers.
//!
//! [`Differentiable`] is implemented by the scalar types that have a plain
//! numeric value: `f64` (never carries derivatives) and [`AutoDiff`].
//! Symbolic expressions deliberately do not implement it; they are solved
//! exactly and never reduced to numbers.

use crate::autodiff::AutoDiff;
use crate::error::SolveError;
use crate::matrix::Matrix;
use crate::scalar::Scalar;

/// A scalar with a plain value and (possibly empty) partial derivatives.
pub trait Differentiable: Scalar {
    /// The plain numeric value.
    fn value(&self) -> f64;

    /// Partial derivatives; empty means "all zero".
    fn derivatives(&self) -> &[f64];
}

impl Differentiable for f64 {
    #[inline]
    fn value(&self) -> f64 {
        *self
    }

    #[inline]
    fn derivatives(&self) -> &[f64] {
        &[]
    }
}

impl Differentiable for AutoDiff {
    #[inline]
    fn value(&self) -> f64 {
        AutoDiff::value(self)
    }

    #[inline]
    fn derivatives(&self) -> &[f64] {
        AutoDiff::derivatives(self)
    }
}

/// Strip derivative information, keeping each entry's value.
///
/// For `Matrix<f64>` this is a copy.
pub fn value_matrix<T: Differentiable>(matrix: &Matrix<T>) -> Matrix<f64> {
    matrix.map(|v| v.value())
}

/// Component `index` of every entry's derivatives.
///
/// Entries whose derivative sequence is empty contribute 0.
pub fn derivative_matrix<T: Differentiable>(matrix: &Matrix<T>, index: usize) -> Matrix<f64> {
    matrix.map(|v| v.derivatives().get(index).copied().unwrap_or(0.0))
}

/// Values of an AutoDiff matrix.
pub fn autodiff_to_value_matrix(matrix: &Matrix<AutoDiff>) -> Matrix<f64> {
    value_matrix(matrix)
}

/// Gradient of an AutoDiff matrix.
///
/// Returns a `len x k` matrix whose row `r` holds the derivatives of the
/// `r`-th entry in column-major order, where `k` is the common derivative
/// size. Entries with empty derivatives give zero rows.
///
/// # Errors
///
/// Returns `SolveError::DerivativeSizeMismatch` if two entries carry
/// non-empty derivatives of different sizes.
///
/// # Example
///
/// ```
/// use difflinsolve::{AutoDiff, Matrix};
/// use difflinsolve::gradient::autodiff_to_gradient_matrix;
///
/// let x = Matrix::from_vec(
///     vec![AutoDiff::new(1.0, [1.0, 2.0]), AutoDiff::constant(3.0)],
///     2,
///     1,
/// )
/// .unwrap();
/// let grad = autodiff_to_gradient_matrix(&x).unwrap();
/// assert_eq!(grad.shape(), (2, 2));
/// assert_eq!(grad[(0, 1)], 2.0);
/// assert_eq!(grad[(1, 1)], 0.0);
/// ```
pub fn autodiff_to_gradient_matrix(matrix: &Matrix<AutoDiff>) -> Result<Matrix<f64>, SolveError> {
    let num_variables = crate::consistency::derivative_size("matrix", matrix)?;
    let entries = matrix.data();
    Ok(Matrix::from_fn(entries.len(), num_variables, |r, c| {
        entries[r].derivatives().get(c).copied().unwrap_or(0.0)
    }))
}

/// Seed every entry as its own independent variable.
///
/// Entry `r` (column-major) gets the unit derivative vector `e_r` of length
/// `values.len()`.
pub fn initialize_autodiff(values: &Matrix<f64>) -> Matrix<AutoDiff> {
    let num_variables = values.len();
    let nrows = values.nrows();
    Matrix::from_fn(nrows, values.ncols(), |i, j| {
        AutoDiff::variable(values[(i, j)], j * nrows + i, num_variables)
    })
}

/// Build an AutoDiff matrix from values and an explicit gradient.
///
/// `gradient` has one row per entry of `values` (column-major order) and one
/// column per tracked variable.
///
/// # Errors
///
/// Returns `SolveError::GradientShapeMismatch` if the gradient row count does
/// not equal the number of entries.
///
/// # Example
///
/// ```
/// use difflinsolve::Matrix;
/// use difflinsolve::gradient::initialize_autodiff_given_gradient_matrix;
///
/// let b = Matrix::from_row_slice(2, 1, &[3.0, 5.0]).unwrap();
/// let grad = Matrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
/// let b_ad = initialize_autodiff_given_gradient_matrix(&b, &grad).unwrap();
/// assert_eq!(b_ad[(1, 0)].derivatives(), &[4.0, 5.0, 6.0]);
/// ```
pub fn initialize_autodiff_given_gradient_matrix(
    values: &Matrix<f64>,
    gradient: &Matrix<f64>,
) -> Result<Matrix<AutoDiff>, SolveError> {
    if gradient.nrows() != values.len() {
        return Err(SolveError::GradientShapeMismatch {
            rows: gradient.nrows(),
            expected: values.len(),
        });
    }
    let nrows = values.nrows();
    Ok(Matrix::from_fn(nrows, values.ncols(), |i, j| {
        let r = j * nrows + i;
        AutoDiff::new(values[(i, j)], (0..gradient.ncols()).map(|c| gradient[(r, c)]))
    }))
}

/// Drop all derivatives, keeping the AutoDiff type.
pub fn discard_gradient(matrix: &Matrix<AutoDiff>) -> Matrix<AutoDiff> {
    matrix.map(AutoDiff::detach)
}
