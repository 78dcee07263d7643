use std::fmt;

use crate::backend::MatmulBackend;
use crate::element::Element;
use crate::error::{MatrixError, Result};
use crate::kind::ElementKind;
use crate::matrix::Matrix;

/// A matrix whose element kind is only known at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyMatrix {
    I32(Matrix<i32>),
    F32(Matrix<f32>),
    F64(Matrix<f64>),
}

impl AnyMatrix {
    pub fn kind(&self) -> ElementKind {
        match self {
            AnyMatrix::I32(_) => ElementKind::I32,
            AnyMatrix::F32(_) => ElementKind::F32,
            AnyMatrix::F64(_) => ElementKind::F64,
        }
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        match self {
            AnyMatrix::I32(m) => m.shape(),
            AnyMatrix::F32(m) => m.shape(),
            AnyMatrix::F64(m) => m.shape(),
        }
    }

    /// Extracts the typed matrix.
    ///
    /// # Errors
    /// `ElementKindMismatch` if the matrix holds a different kind than `T`.
    pub fn downcast<T: Element>(self) -> Result<Matrix<T>> {
        let kind = self.kind();
        T::from_any(self).map_err(|_| MatrixError::ElementKindMismatch {
            lhs: kind,
            rhs: T::KIND,
        })
    }
}

impl<T: Element> From<Matrix<T>> for AnyMatrix {
    fn from(matrix: Matrix<T>) -> Self {
        T::into_any(matrix)
    }
}

impl fmt::Display for AnyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyMatrix::I32(m) => fmt::Display::fmt(m, f),
            AnyMatrix::F32(m) => fmt::Display::fmt(m, f),
            AnyMatrix::F64(m) => fmt::Display::fmt(m, f),
        }
    }
}

/// Multiplies two runtime-typed matrices with `backend`.
///
/// Both operands must hold the same kind; mixed kinds are rejected rather
/// than widened or narrowed.
pub fn multiply_any(a: &AnyMatrix, b: &AnyMatrix, backend: &dyn MatmulBackend) -> Result<AnyMatrix> {
    match (a, b) {
        (AnyMatrix::I32(a), AnyMatrix::I32(b)) => a.matmul(b, backend).map(AnyMatrix::I32),
        (AnyMatrix::F32(a), AnyMatrix::F32(b)) => a.matmul(b, backend).map(AnyMatrix::F32),
        (AnyMatrix::F64(a), AnyMatrix::F64(b)) => a.matmul(b, backend).map(AnyMatrix::F64),
        _ => Err(MatrixError::ElementKindMismatch {
            lhs: a.kind(),
            rhs: b.kind(),
        }),
    }
}
