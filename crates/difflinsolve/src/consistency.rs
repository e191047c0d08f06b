//! Sensitivity consistency checks.
//!
//! Every non-empty derivative sequence of one matrix must have the same
//! length, and `A` and `b` must agree on how many variables they track
//! whenever both track any.

use crate::error::SolveError;
use crate::gradient::Differentiable;
use crate::matrix::Matrix;

/// Number of variables tracked by `matrix`.
///
/// Returns the length shared by all non-empty derivative sequences, or 0
/// when every sequence is empty (always the case for `f64`). `name` labels
/// the matrix in the error.
///
/// # Errors
///
/// Returns `SolveError::DerivativeSizeMismatch` for the first entry, in
/// column-major order, whose size differs from the first non-empty size seen.
pub fn derivative_size<T: Differentiable>(
    name: &'static str,
    matrix: &Matrix<T>,
) -> Result<usize, SolveError> {
    let mut expected = 0;
    for (row, col, entry) in matrix.indexed_iter() {
        let size = entry.derivatives().len();
        if size == 0 {
            continue;
        }
        if expected == 0 {
            expected = size;
        } else if size != expected {
            return Err(SolveError::DerivativeSizeMismatch {
                matrix: name,
                row,
                col,
                size,
                expected,
            });
        }
    }
    Ok(expected)
}

/// Check that `A` and `b` track the same number of variables.
///
/// A count of 0 is compatible with anything.
pub fn check_variable_counts(num_a: usize, num_b: usize) -> Result<(), SolveError> {
    if num_a != 0 && num_b != 0 && num_a != num_b {
        return Err(SolveError::VariableCountMismatch { a: num_a, b: num_b });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AutoDiff;

    #[test]
    fn test_numeric_matrix_tracks_nothing() {
        let m = Matrix::from_row_slice(2, 2, &[1.0, 3.0, 3.0, 10.0]).unwrap();
        assert_eq!(derivative_size("A", &m).unwrap(), 0);
    }

    #[test]
    fn test_empty_entries_are_exempt() {
        let m = Matrix::from_vec(
            vec![
                AutoDiff::constant(1.0),
                AutoDiff::new(2.0, [1.0, 2.0, 3.0]),
                AutoDiff::constant(3.0),
                AutoDiff::new(4.0, [0.0, 0.0, 1.0]),
            ],
            2,
            2,
        )
        .unwrap();
        assert_eq!(derivative_size("A", &m).unwrap(), 3);
    }

    #[test]
    fn test_all_empty_is_zero() {
        let m: Matrix<AutoDiff> = Matrix::from_row_slice(1, 2, &[1.0, 2.0]).unwrap().cast();
        assert_eq!(derivative_size("b", &m).unwrap(), 0);
    }

    #[test]
    fn test_size_mismatch_reports_entry() {
        let m = Matrix::from_row_slice(
            2,
            2,
            &[
                AutoDiff::new(1.0, [1.0, 2.0, 3.0]),
                AutoDiff::new(3.0, [1.0, 2.0]),
                AutoDiff::new(3.0, [7.0, 8.0, 9.0]),
                AutoDiff::new(10.0, [10.0, 11.0, 12.0]),
            ],
        )
        .unwrap();
        let err = derivative_size("A", &m).unwrap_err();
        assert_eq!(
            err,
            SolveError::DerivativeSizeMismatch {
                matrix: "A",
                row: 0,
                col: 1,
                size: 2,
                expected: 3,
            }
        );
        assert!(
            err.to_string()
                .contains("has size 2, while another entry has size 3")
        );
    }

    #[test]
    fn test_variable_counts() {
        assert!(check_variable_counts(0, 4).is_ok());
        assert!(check_variable_counts(3, 0).is_ok());
        assert!(check_variable_counts(3, 3).is_ok());
        assert_eq!(
            check_variable_counts(3, 4),
            Err(SolveError::VariableCountMismatch { a: 3, b: 4 })
        );
    }
}
