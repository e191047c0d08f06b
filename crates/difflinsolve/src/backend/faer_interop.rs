//! Zero-copy conversion between Matrix<f64> and faer matrices.
//!
//! # Memory Layout
//!
//! Both difflinsolve and faer use column-major (Fortran-style) storage order,
//! so a numeric matrix can be viewed as a faer `MatRef` without copying.

use faer::{Mat, MatRef};

use crate::matrix::Matrix;

/// Extension trait for viewing a numeric matrix as a faer matrix.
pub trait AsFaerMat {
    /// View matrix data as an immutable faer matrix (zero-copy).
    ///
    /// # Example
    ///
    /// ```
    /// use difflinsolve::Matrix;
    /// use difflinsolve::backend::AsFaerMat;
    ///
    /// let m = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
    /// let mat = m.as_faer_mat();
    /// assert_eq!(mat.nrows(), 2);
    /// assert_eq!(mat.ncols(), 3);
    /// ```
    fn as_faer_mat(&self) -> MatRef<'_, f64>;
}

impl AsFaerMat for Matrix<f64> {
    fn as_faer_mat(&self) -> MatRef<'_, f64> {
        // faer uses column-major order by default, same as Matrix
        MatRef::from_column_major_slice(self.data(), self.nrows(), self.ncols())
    }
}

/// Create a Matrix from a faer matrix (copies data).
///
/// # Example
///
/// ```
/// use faer::Mat;
/// use difflinsolve::backend::matrix_from_faer_mat;
///
/// let mat = Mat::from_fn(2, 3, |i, j| (i * 3 + j) as f64);
/// let m = matrix_from_faer_mat(mat.as_ref());
/// assert_eq!(m.shape(), (2, 3));
/// ```
pub fn matrix_from_faer_mat(mat: MatRef<'_, f64>) -> Matrix<f64> {
    Matrix::from_fn(mat.nrows(), mat.ncols(), |i, j| mat[(i, j)])
}

/// Create an owned faer Mat from a Matrix (copies data).
pub fn faer_mat_from_matrix(matrix: &Matrix<f64>) -> Mat<f64> {
    matrix.as_faer_mat().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_as_faer_mat() {
        let m = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();

        let mat = m.as_faer_mat();
        assert_eq!(mat.nrows(), 2);
        assert_eq!(mat.ncols(), 3);

        // Check column-major order
        assert_relative_eq!(mat[(0, 0)], 1.0);
        assert_relative_eq!(mat[(1, 0)], 2.0);
        assert_relative_eq!(mat[(0, 1)], 3.0);
        assert_relative_eq!(mat[(1, 2)], 6.0);
    }

    #[test]
    fn test_matrix_from_faer_mat() {
        let mat = Mat::from_fn(2, 3, |i, j| (i * 3 + j) as f64);
        let m = matrix_from_faer_mat(mat.as_ref());

        assert_eq!(m.shape(), (2, 3));
        assert_relative_eq!(m[(0, 0)], 0.0);
        assert_relative_eq!(m[(1, 0)], 3.0);
        assert_relative_eq!(m[(0, 1)], 1.0);
        assert_relative_eq!(m[(1, 2)], 5.0);
    }

    #[test]
    fn test_faer_mat_from_matrix() {
        let m = Matrix::from_row_slice(2, 2, &[1.0, 3.0, 3.0, 10.0]).unwrap();
        let mat = faer_mat_from_matrix(&m);
        assert_eq!(mat.nrows(), 2);
        assert_relative_eq!(mat[(0, 1)], 3.0);
        assert_relative_eq!(mat[(1, 1)], 10.0);
    }

    #[test]
    fn test_zero_copy_verification() {
        let m = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        let mat = m.as_faer_mat();

        assert_eq!(
            m.data().as_ptr(),
            mat.as_ptr(),
            "faer matrix should share memory with the Matrix"
        );
    }
}
