//! Dense matrix of scalars.
//!
//! Storage is column-major, matching faer, so numeric matrices convert to
//! faer views without copying (see [`crate::backend`]).

use std::ops::{Index, IndexMut};

use crate::error::SolveError;
use crate::scalar::{Scalar, ScalarCategory};

/// A dense `nrows x ncols` matrix whose entries all share one scalar type.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T: Scalar> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
}

impl<T: Scalar> Matrix<T> {
    /// Create a zero-initialized matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// use difflinsolve::Matrix;
    ///
    /// let m: Matrix<f64> = Matrix::zeros(2, 3);
    /// assert_eq!(m.shape(), (2, 3));
    /// assert_eq!(m.len(), 6);
    /// ```
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            data: vec![T::zero(); nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Create the `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| if i == j { T::one() } else { T::zero() })
    }

    /// Create a matrix by evaluating `f(row, col)` for every entry.
    pub fn from_fn(nrows: usize, ncols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for j in 0..ncols {
            for i in 0..nrows {
                data.push(f(i, j));
            }
        }
        Self { data, nrows, ncols }
    }

    /// Create a matrix from column-major data.
    ///
    /// # Errors
    ///
    /// Returns `SolveError::ShapeMismatch` if data length doesn't match shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use difflinsolve::Matrix;
    ///
    /// let m = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
    /// assert_eq!(m[(1, 0)], 2.0); // Column-major: (1,0) is second element
    /// assert_eq!(m[(0, 1)], 3.0);
    /// ```
    pub fn from_vec(data: Vec<T>, nrows: usize, ncols: usize) -> Result<Self, SolveError> {
        if data.len() != nrows * ncols {
            return Err(SolveError::ShapeMismatch {
                expected: nrows * ncols,
                actual: data.len(),
            });
        }
        Ok(Self { data, nrows, ncols })
    }

    /// Create a matrix from row-major data, the order matrices are usually
    /// written in.
    ///
    /// # Examples
    ///
    /// ```
    /// use difflinsolve::Matrix;
    ///
    /// let a = Matrix::from_row_slice(2, 2, &[1.0, 3.0, 3.0, 10.0]).unwrap();
    /// assert_eq!(a[(0, 1)], 3.0);
    /// assert_eq!(a[(1, 1)], 10.0);
    /// ```
    pub fn from_row_slice(nrows: usize, ncols: usize, rows: &[T]) -> Result<Self, SolveError> {
        if rows.len() != nrows * ncols {
            return Err(SolveError::ShapeMismatch {
                expected: nrows * ncols,
                actual: rows.len(),
            });
        }
        Ok(Self::from_fn(nrows, ncols, |i, j| rows[i * ncols + j].clone()))
    }

    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// `(nrows, ncols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Total number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the matrix has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Scalar category of the entries.
    #[inline]
    pub fn category(&self) -> ScalarCategory {
        T::CATEGORY
    }

    /// Underlying column-major data.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consume the matrix and return its column-major data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Get entry `(row, col)`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.nrows || col >= self.ncols {
            return None;
        }
        self.data.get(col * self.nrows + row)
    }

    /// Set entry `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns `SolveError::IndexOutOfBounds` if the index is outside the matrix.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), SolveError> {
        if row >= self.nrows || col >= self.ncols {
            return Err(SolveError::IndexOutOfBounds {
                row,
                col,
                rows: self.nrows,
                cols: self.ncols,
            });
        }
        self.data[col * self.nrows + row] = value;
        Ok(())
    }

    /// Iterate over `(row, col, entry)` in column-major order.
    pub fn indexed_iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let nrows = self.nrows.max(1);
        self.data
            .iter()
            .enumerate()
            .map(move |(k, v)| (k % nrows, k / nrows, v))
    }

    /// Copy column `col` into an `nrows x 1` matrix.
    pub fn column(&self, col: usize) -> Option<Self> {
        if col >= self.ncols {
            return None;
        }
        let start = col * self.nrows;
        Some(Self {
            data: self.data[start..start + self.nrows].to_vec(),
            nrows: self.nrows,
            ncols: 1,
        })
    }

    /// Apply `f` to every entry.
    pub fn map<U: Scalar>(&self, f: impl FnMut(&T) -> U) -> Matrix<U> {
        Matrix {
            data: self.data.iter().map(f).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    /// Convert every entry into another scalar type.
    ///
    /// # Examples
    ///
    /// ```
    /// use difflinsolve::{AutoDiff, Matrix};
    ///
    /// let a = Matrix::from_row_slice(1, 2, &[1.0, 2.0]).unwrap();
    /// let a_ad: Matrix<AutoDiff> = a.cast();
    /// assert!(!a_ad[(0, 1)].has_derivatives());
    /// ```
    pub fn cast<U: Scalar + From<T>>(&self) -> Matrix<U> {
        self.map(|v| U::from(v.clone()))
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.ncols, self.nrows, |i, j| self[(j, i)].clone())
    }

    /// Matrix product `self * rhs`.
    ///
    /// # Errors
    ///
    /// Returns `SolveError::DimensionMismatch` if inner dimensions differ.
    pub fn matmul(&self, rhs: &Self) -> Result<Self, SolveError> {
        if self.ncols != rhs.nrows {
            return Err(self.dimension_mismatch("matmul", rhs));
        }
        Ok(Self::from_fn(self.nrows, rhs.ncols, |i, j| {
            let mut sum = T::zero();
            for k in 0..self.ncols {
                sum = sum + self[(i, k)].clone() * rhs[(k, j)].clone();
            }
            sum
        }))
    }

    /// Elementwise sum.
    pub fn add(&self, rhs: &Self) -> Result<Self, SolveError> {
        self.zip_with("add", rhs, |a, b| a + b)
    }

    /// Elementwise difference.
    pub fn sub(&self, rhs: &Self) -> Result<Self, SolveError> {
        self.zip_with("sub", rhs, |a, b| a - b)
    }

    fn zip_with(
        &self,
        operation: &'static str,
        rhs: &Self,
        f: impl Fn(T, T) -> T,
    ) -> Result<Self, SolveError> {
        if self.shape() != rhs.shape() {
            return Err(self.dimension_mismatch(operation, rhs));
        }
        Ok(Self {
            data: self
                .data
                .iter()
                .zip(&rhs.data)
                .map(|(a, b)| f(a.clone(), b.clone()))
                .collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        })
    }

    pub(crate) fn dimension_mismatch<U: Scalar>(
        &self,
        operation: &'static str,
        rhs: &Matrix<U>,
    ) -> SolveError {
        SolveError::DimensionMismatch {
            operation,
            lhs_rows: self.nrows,
            lhs_cols: self.ncols,
            rhs_rows: rhs.nrows,
            rhs_cols: rhs.ncols,
        }
    }
}

impl<T: Scalar> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({row}, {col}) out of bounds for {}x{} matrix",
            self.nrows,
            self.ncols
        );
        &self.data[col * self.nrows + row]
    }
}

impl<T: Scalar> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({row}, {col}) out of bounds for {}x{} matrix",
            self.nrows,
            self.ncols
        );
        &mut self.data[col * self.nrows + row]
    }
}
