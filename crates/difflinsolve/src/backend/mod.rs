//! Backend glue between [`Matrix`](crate::Matrix) and faer.
//!
//! # faer Integration
//!
//! The `faer_interop` module provides zero-copy views of numeric matrices as
//! faer matrix references, and copies faer results back into [`Matrix`](crate::Matrix).

mod faer_interop;

pub use faer_interop::{AsFaerMat, faer_mat_from_matrix, matrix_from_faer_mat};
