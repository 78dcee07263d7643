// Adapter for externally compiled multiplication kernels.

#[cfg(feature = "dynamic")]
mod dynamic;

#[cfg(feature = "dynamic")]
pub use dynamic::NativeSymbols;

use std::os::raw::c_int;

use tracing::warn;

use crate::backend::{check_operands, MatmulBackend};
use crate::element::Element;
use crate::error::{MatrixError, Result};

/// C ABI of a native kernel:
/// `(rows_a, cols_a, cols_b, a, b, out) -> status`, 0 on success.
pub type NativeKernelFn<T> =
    unsafe extern "C" fn(c_int, c_int, c_int, *const T, *const T, *mut T) -> c_int;

/// The three entry points of a native library, one per element kind.
#[derive(Debug, Clone, Copy)]
pub struct NativeKernels {
    pub i32: NativeKernelFn<i32>,
    pub f32: NativeKernelFn<f32>,
    pub f64: NativeKernelFn<f64>,
}

/// Backend that forwards to native kernels over the C ABI.
#[derive(Debug)]
pub struct NativeBackend {
    name: String,
    kernels: NativeKernels,
    #[cfg(feature = "dynamic")]
    _library: Option<std::sync::Arc<libloading::Library>>,
}

impl NativeBackend {
    /// Wraps an already-resolved kernel table.
    ///
    /// # Safety
    /// Every kernel must read exactly `rows_a * cols_a` and `cols_a * cols_b`
    /// elements from its inputs, write exactly `rows_a * cols_b` elements to
    /// `out`, and stay callable for the lifetime of the backend.
    pub unsafe fn new(name: impl Into<String>, kernels: NativeKernels) -> Self {
        NativeBackend {
            name: name.into(),
            kernels,
            #[cfg(feature = "dynamic")]
            _library: None,
        }
    }

    fn call<T: Element>(
        &self,
        kernel: NativeKernelFn<T>,
        rows_a: usize,
        cols_a: usize,
        cols_b: usize,
        a: &[T],
        b: &[T],
        out: &mut [T],
    ) -> Result<()> {
        check_operands(rows_a, cols_a, cols_b, a, b, out)?;
        let n = to_c_int(rows_a)?;
        let m = to_c_int(cols_a)?;
        let l = to_c_int(cols_b)?;

        // SAFETY: the buffer lengths were checked above and the kernel
        // contract was accepted in `NativeBackend::new`.
        let status = unsafe { kernel(n, m, l, a.as_ptr(), b.as_ptr(), out.as_mut_ptr()) };
        if status != 0 {
            warn!(backend = %self.name, kind = %T::KIND, status, "native kernel failed");
            return Err(MatrixError::Backend {
                backend: self.name.clone(),
                status,
            });
        }
        Ok(())
    }
}

fn to_c_int(dim: usize) -> Result<c_int> {
    c_int::try_from(dim).map_err(|_| MatrixError::DimensionOverflow(dim))
}

impl MatmulBackend for NativeBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn matmul_i32(
        &self,
        rows_a: usize,
        cols_a: usize,
        cols_b: usize,
        a: &[i32],
        b: &[i32],
        out: &mut [i32],
    ) -> Result<()> {
        self.call(self.kernels.i32, rows_a, cols_a, cols_b, a, b, out)
    }

    fn matmul_f32(
        &self,
        rows_a: usize,
        cols_a: usize,
        cols_b: usize,
        a: &[f32],
        b: &[f32],
        out: &mut [f32],
    ) -> Result<()> {
        self.call(self.kernels.f32, rows_a, cols_a, cols_b, a, b, out)
    }

    fn matmul_f64(
        &self,
        rows_a: usize,
        cols_a: usize,
        cols_b: usize,
        a: &[f64],
        b: &[f64],
        out: &mut [f64],
    ) -> Result<()> {
        self.call(self.kernels.f64, rows_a, cols_a, cols_b, a, b, out)
    }
}
