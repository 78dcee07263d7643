use std::sync::{Arc, OnceLock};

use tracing::warn;

use crate::backend::MatmulBackend;
use crate::config::ParallelConfig;
use crate::dispatch::{self, AnyMatrix};
use crate::element::Element;
use crate::error::Result;
use crate::matrix::Matrix;
use crate::parallel::ParallelBackend;

/// Entry point for multiplying matrices with a backend chosen at composition
/// time.
///
/// Validates that the inner dimensions agree, allocates the result, and
/// dispatches on the element kind. A failed multiplication never yields a
/// partial result.
#[derive(Debug, Clone)]
pub struct Multiplier {
    backend: Arc<dyn MatmulBackend>,
}

impl Multiplier {
    pub fn new(backend: Arc<dyn MatmulBackend>) -> Self {
        Multiplier { backend }
    }

    /// Multiplier over the parallel fallback engine on the global pool.
    pub fn fallback() -> Self {
        Self::new(Arc::new(ParallelBackend::new()))
    }

    pub fn backend(&self) -> &dyn MatmulBackend {
        self.backend.as_ref()
    }

    /// Returns `a * b`, shaped `a.rows() x b.cols()`.
    ///
    /// # Errors
    /// `DimensionMismatch` when `a.cols() != b.rows()`, or whatever the backend
    /// reports.
    pub fn multiply<T: Element>(&self, a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
        a.matmul(b, self.backend.as_ref())
    }

    /// Runtime-typed variant of [`Multiplier::multiply`].
    pub fn multiply_any(&self, a: &AnyMatrix, b: &AnyMatrix) -> Result<AnyMatrix> {
        dispatch::multiply_any(a, b, self.backend.as_ref())
    }
}

static SHARED: OnceLock<Multiplier> = OnceLock::new();

/// Process-wide fallback multiplier, configured from the environment on
/// first use.
pub fn shared() -> &'static Multiplier {
    SHARED.get_or_init(|| match ParallelBackend::with_config(ParallelConfig::from_env()) {
        Ok(backend) => Multiplier::new(Arc::new(backend)),
        Err(e) => {
            warn!(error = %e, "falling back to the global worker pool");
            Multiplier::fallback()
        }
    })
}

/// Multiplies two matrices with the shared fallback multiplier.
pub fn multiply<T: Element>(a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
    shared().multiply(a, b)
}
