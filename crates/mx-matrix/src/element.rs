use std::fmt::{Debug, Display};

use crate::backend::MatmulBackend;
use crate::dispatch::AnyMatrix;
use crate::error::Result;
use crate::kind::ElementKind;
use crate::matrix::Matrix;

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A numeric type a [`Matrix`] can hold.
///
/// Sealed: implemented for exactly `i32`, `f32` and `f64`. The associated
/// `KIND` fixes the element kind at compile time, and `run_backend` routes
/// to the backend entry point for that kind.
pub trait Element:
    sealed::Sealed + Copy + Send + Sync + PartialEq + Debug + Display + 'static
{
    const KIND: ElementKind;

    fn zero() -> Self;

    fn one() -> Self;

    /// Returns `acc + a * b` in the kind's native arithmetic.
    ///
    /// Integers wrap in every build profile. Floats round the product and the
    /// sum separately, matching an unfused `acc += a * b`.
    fn mul_acc(acc: Self, a: Self, b: Self) -> Self;

    /// Tolerance comparison used to check backends against each other.
    /// Integers compare exactly.
    fn approx_eq(a: Self, b: Self, max_relative: f64) -> bool;

    /// Calls the entry point of `backend` that matches `KIND`.
    fn run_backend(
        backend: &dyn MatmulBackend,
        rows_a: usize,
        cols_a: usize,
        cols_b: usize,
        a: &[Self],
        b: &[Self],
        out: &mut [Self],
    ) -> Result<()>;

    fn into_any(matrix: Matrix<Self>) -> AnyMatrix;

    /// Unwraps `any` when it holds this kind, or hands it back unchanged.
    fn from_any(any: AnyMatrix) -> std::result::Result<Matrix<Self>, AnyMatrix>;
}

impl Element for i32 {
    const KIND: ElementKind = ElementKind::I32;

    fn zero() -> Self {
        0
    }

    fn one() -> Self {
        1
    }

    #[inline]
    fn mul_acc(acc: Self, a: Self, b: Self) -> Self {
        acc.wrapping_add(a.wrapping_mul(b))
    }

    fn approx_eq(a: Self, b: Self, _max_relative: f64) -> bool {
        a == b
    }

    fn run_backend(
        backend: &dyn MatmulBackend,
        rows_a: usize,
        cols_a: usize,
        cols_b: usize,
        a: &[Self],
        b: &[Self],
        out: &mut [Self],
    ) -> Result<()> {
        backend.matmul_i32(rows_a, cols_a, cols_b, a, b, out)
    }

    fn into_any(matrix: Matrix<Self>) -> AnyMatrix {
        AnyMatrix::I32(matrix)
    }

    fn from_any(any: AnyMatrix) -> std::result::Result<Matrix<Self>, AnyMatrix> {
        match any {
            AnyMatrix::I32(m) => Ok(m),
            other => Err(other),
        }
    }
}

impl Element for f32 {
    const KIND: ElementKind = ElementKind::F32;

    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    #[inline]
    fn mul_acc(acc: Self, a: Self, b: Self) -> Self {
        acc + a * b
    }

    fn approx_eq(a: Self, b: Self, max_relative: f64) -> bool {
        approx::relative_eq!(a, b, max_relative = max_relative as f32)
    }

    fn run_backend(
        backend: &dyn MatmulBackend,
        rows_a: usize,
        cols_a: usize,
        cols_b: usize,
        a: &[Self],
        b: &[Self],
        out: &mut [Self],
    ) -> Result<()> {
        backend.matmul_f32(rows_a, cols_a, cols_b, a, b, out)
    }

    fn into_any(matrix: Matrix<Self>) -> AnyMatrix {
        AnyMatrix::F32(matrix)
    }

    fn from_any(any: AnyMatrix) -> std::result::Result<Matrix<Self>, AnyMatrix> {
        match any {
            AnyMatrix::F32(m) => Ok(m),
            other => Err(other),
        }
    }
}

impl Element for f64 {
    const KIND: ElementKind = ElementKind::F64;

    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    #[inline]
    fn mul_acc(acc: Self, a: Self, b: Self) -> Self {
        acc + a * b
    }

    fn approx_eq(a: Self, b: Self, max_relative: f64) -> bool {
        approx::relative_eq!(a, b, max_relative = max_relative)
    }

    fn run_backend(
        backend: &dyn MatmulBackend,
        rows_a: usize,
        cols_a: usize,
        cols_b: usize,
        a: &[Self],
        b: &[Self],
        out: &mut [Self],
    ) -> Result<()> {
        backend.matmul_f64(rows_a, cols_a, cols_b, a, b, out)
    }

    fn into_any(matrix: Matrix<Self>) -> AnyMatrix {
        AnyMatrix::F64(matrix)
    }

    fn from_any(any: AnyMatrix) -> std::result::Result<Matrix<Self>, AnyMatrix> {
        match any {
            AnyMatrix::F64(m) => Ok(m),
            other => Err(other),
        }
    }
}
