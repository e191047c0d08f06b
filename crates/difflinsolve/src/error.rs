//! Error types for difflinsolve.

use thiserror::Error;

use crate::scalar::ScalarCategory;
use crate::solver::Algorithm;

/// Errors that can occur while building a factorization or solving.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// Shape mismatch between data length and expected size.
    #[error("shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Index out of bounds.
    #[error("index ({row}, {col}) is out of bounds for a {rows}x{cols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Matrix must be square.
    #[error("matrix must be square: got {rows}x{cols}")]
    NotSquareMatrix { rows: usize, cols: usize },

    /// Operand shapes are incompatible for the requested operation.
    #[error("dimension mismatch in {operation}: {lhs_rows}x{lhs_cols} and {rhs_rows}x{rhs_cols}")]
    DimensionMismatch {
        operation: &'static str,
        lhs_rows: usize,
        lhs_cols: usize,
        rhs_rows: usize,
        rhs_cols: usize,
    },

    /// Entries of one matrix carry derivative vectors of different lengths.
    #[error(
        "LinearSolve(): {matrix}({row}, {col}).derivatives() has size {size}, while another entry has size {expected}"
    )]
    DerivativeSizeMismatch {
        matrix: &'static str,
        row: usize,
        col: usize,
        size: usize,
        expected: usize,
    },

    /// `A` and `b` track a different number of variables.
    #[error(
        "LinearSolve(): A contains derivatives for {a} variables, while b contains derivatives for {b} variables"
    )]
    VariableCountMismatch { a: usize, b: usize },

    /// The underlying factorization failed (e.g. non-positive-definite input).
    #[error("{algorithm} factorization failed: {message}")]
    Factorization {
        algorithm: Algorithm,
        message: String,
    },

    /// The algorithm has no implementation over the given scalar category.
    #[error("{algorithm} is not supported for {category} matrices")]
    UnsupportedAlgorithm {
        algorithm: Algorithm,
        category: ScalarCategory,
    },

    /// Gradient matrix does not line up with the value matrix.
    #[error("gradient matrix has {rows} rows, expected one row per entry ({expected})")]
    GradientShapeMismatch { rows: usize, expected: usize },

    /// A symbolic expression was evaluated without a value for a variable.
    #[error("no value bound for variable {name}")]
    UnboundVariable { name: String },

    /// Unrecognized algorithm name.
    #[error("unknown linear solver algorithm: {name}")]
    UnknownAlgorithm { name: String },
}
