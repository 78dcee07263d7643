use std::fmt;
use std::ops::{Index, IndexMut};

use tracing::debug;

use crate::backend::MatmulBackend;
use crate::element::Element;
use crate::error::{MatrixError, Result};

/// A dense, row-major matrix.
///
/// Element `(r, c)` lives at index `r * cols + c`. Both dimensions are
/// positive and the data length is fixed at `rows * cols` for the lifetime
/// of the matrix. Multiplication is dispatched to a `MatmulBackend`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T: Element> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Element> Matrix<T> {
    /// Create a new matrix from row-major data.
    ///
    /// # Errors
    /// `InvalidDimensions` if either dimension is zero, `DataLength` if
    /// `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::InvalidDimensions { rows, cols });
        }
        let expected = rows
            .checked_mul(cols)
            .ok_or(MatrixError::DimensionOverflow(rows.max(cols)))?;
        if data.len() != expected {
            return Err(MatrixError::DataLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Create a zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        let n = rows
            .checked_mul(cols)
            .ok_or(MatrixError::DimensionOverflow(rows.max(cols)))?;
        Self::new(rows, cols, vec![T::zero(); n])
    }

    /// Create the `n x n` identity matrix.
    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::zeros(n, n)?;
        for i in 0..n {
            m.data[i * n + i] = T::one();
        }
        Ok(m)
    }

    /// Create a matrix from a slice of equally long rows.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(MatrixError::DataLength {
                    expected: cols,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Self::new(rows.len(), cols, data)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the row-major data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Returns the element at `(row, col)`.
    ///
    /// # Errors
    /// `IndexOutOfRange` if the position lies outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        let idx = self.offset(row, col)?;
        Ok(self.data[idx])
    }

    /// Overwrites the element at `(row, col)`.
    ///
    /// # Errors
    /// `IndexOutOfRange` if the position lies outside the matrix.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let idx = self.offset(row, col)?;
        self.data[idx] = value;
        Ok(())
    }

    fn offset(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    /// Returns a new matrix with rows and columns swapped.
    pub fn transpose(&self) -> Matrix<T> {
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..self.cols {
            for r in 0..self.rows {
                data.push(self.data[r * self.cols + c]);
            }
        }
        Matrix {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// Returns true if both matrices have the same shape and every pair of
    /// elements agrees within `max_relative`. Integer matrices compare exactly.
    pub fn approx_eq(&self, other: &Matrix<T>, max_relative: f64) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(&x, &y)| T::approx_eq(x, y, max_relative))
    }

    /// Matrix product `self * other` computed by `backend`.
    ///
    /// self is [n, m], other is [m, l], result is [n, l]. Neither operand is
    /// modified.
    pub fn matmul(&self, other: &Matrix<T>, backend: &dyn MatmulBackend) -> Result<Matrix<T>> {
        if self.cols != other.rows {
            return Err(MatrixError::DimensionMismatch {
                a_rows: self.rows,
                a_cols: self.cols,
                b_rows: other.rows,
                b_cols: other.cols,
            });
        }

        debug!(
            backend = backend.name(),
            kind = %T::KIND,
            rows_a = self.rows,
            cols_a = self.cols,
            cols_b = other.cols,
            "dispatching matmul"
        );

        let mut out = vec![T::zero(); self.rows * other.cols];
        T::run_backend(
            backend,
            self.rows,
            self.cols,
            other.cols,
            &self.data,
            &other.data,
            &mut out,
        )?;
        Matrix::new(self.rows, other.cols, out)
    }
}

/// Panics on out-of-range positions, like slice indexing.
impl<T: Element> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of range for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        &self.data[row * self.cols + col]
    }
}

impl<T: Element> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of range for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        &mut self.data[row * self.cols + col]
    }
}

impl<T: Element> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.data.chunks(self.cols).enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for (c, value) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", value)?;
            }
        }
        Ok(())
    }
}
