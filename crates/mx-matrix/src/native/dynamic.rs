//! Runtime loading of native kernels from a shared library.

use std::path::Path;
use std::sync::Arc;

use libloading::Library;
use tracing::debug;

use super::{NativeBackend, NativeKernelFn, NativeKernels};
use crate::error::{MatrixError, Result};

/// Exported symbol names of the three kernels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeSymbols {
    pub i32: String,
    pub f32: String,
    pub f64: String,
}

impl Default for NativeSymbols {
    /// Names exported by the `mx-ffi` library.
    fn default() -> Self {
        Self {
            i32: "mx_multiply_i32".to_string(),
            f32: "mx_multiply_f32".to_string(),
            f64: "mx_multiply_f64".to_string(),
        }
    }
}

impl NativeSymbols {
    /// Names used by the `matMul` C++ library.
    pub fn legacy() -> Self {
        Self {
            i32: "multiplyIntMatrices".to_string(),
            f32: "multiplyFloatMatrices".to_string(),
            f64: "multiplyDoubleMatrices".to_string(),
        }
    }
}

impl NativeBackend {
    /// Load a shared library and resolve its three kernels.
    ///
    /// The library stays loaded for as long as the backend lives.
    ///
    /// # Safety
    /// Loading runs the library's initializers, and the resolved symbols must
    /// honor the contract described on [`NativeBackend::new`].
    pub unsafe fn load(path: impl AsRef<Path>, symbols: &NativeSymbols) -> Result<Self> {
        let path = path.as_ref();
        let library = Library::new(path).map_err(|e| {
            MatrixError::Library(format!("failed to load '{}': {}", path.display(), e))
        })?;

        let kernels = NativeKernels {
            i32: resolve::<i32>(&library, &symbols.i32)?,
            f32: resolve::<f32>(&library, &symbols.f32)?,
            f64: resolve::<f64>(&library, &symbols.f64)?,
        };
        debug!(path = %path.display(), "loaded native kernels");

        Ok(NativeBackend {
            name: format!("native:{}", path.display()),
            kernels,
            _library: Some(Arc::new(library)),
        })
    }
}

unsafe fn resolve<T>(library: &Library, name: &str) -> Result<NativeKernelFn<T>> {
    let symbol = library
        .get::<NativeKernelFn<T>>(name.as_bytes())
        .map_err(|e| MatrixError::Library(format!("missing symbol '{}': {}", name, e)))?;
    Ok(*symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_sets() {
        assert_eq!(NativeSymbols::default().f32, "mx_multiply_f32");
        assert_eq!(NativeSymbols::legacy().i32, "multiplyIntMatrices");
    }

    #[test]
    fn test_missing_library() {
        let err = unsafe { NativeBackend::load("/nonexistent/libmx_ffi.so", &NativeSymbols::default()) }
            .unwrap_err();
        assert!(matches!(err, MatrixError::Library(_)));
    }
}
