use std::fmt::Debug;

use crate::error::{MatrixError, Result};

/// Trait for interchangeable matrix multiplication backends (native, fallback).
///
/// Every entry point has the same contract: `a` is row-major `[rows_a, cols_a]`,
/// `b` is row-major `[cols_a, cols_b]`, and `out` is a caller-allocated buffer
/// of `rows_a * cols_b` elements that receives the row-major product.
///
/// Backends do not validate that the operands describe compatible matrices;
/// callers go through [`Matrix::matmul`](crate::Matrix::matmul) or a
/// [`Multiplier`](crate::Multiplier) for that. They only guard slice lengths.
pub trait MatmulBackend: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "parallel", "native").
    fn name(&self) -> &str;

    fn matmul_i32(
        &self,
        rows_a: usize,
        cols_a: usize,
        cols_b: usize,
        a: &[i32],
        b: &[i32],
        out: &mut [i32],
    ) -> Result<()>;

    fn matmul_f32(
        &self,
        rows_a: usize,
        cols_a: usize,
        cols_b: usize,
        a: &[f32],
        b: &[f32],
        out: &mut [f32],
    ) -> Result<()>;

    fn matmul_f64(
        &self,
        rows_a: usize,
        cols_a: usize,
        cols_b: usize,
        a: &[f64],
        b: &[f64],
        out: &mut [f64],
    ) -> Result<()>;
}

/// Checks that the three buffers have the lengths the dimensions imply.
pub(crate) fn check_operands<T>(
    rows_a: usize,
    cols_a: usize,
    cols_b: usize,
    a: &[T],
    b: &[T],
    out: &[T],
) -> Result<()> {
    check_len(a.len(), rows_a, cols_a)?;
    check_len(b.len(), cols_a, cols_b)?;
    check_len(out.len(), rows_a, cols_b)
}

fn check_len(got: usize, rows: usize, cols: usize) -> Result<()> {
    let expected = rows
        .checked_mul(cols)
        .ok_or(MatrixError::DimensionOverflow(rows.max(cols)))?;
    if got != expected {
        return Err(MatrixError::DataLength { expected, got });
    }
    Ok(())
}
