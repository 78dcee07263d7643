use std::sync::OnceLock;

use mx_matrix::{ParallelBackend, ParallelConfig};
use tracing::warn;

static ENGINE: OnceLock<ParallelBackend> = OnceLock::new();

/// The fallback engine behind the exported kernels, created on first call
/// from `MX_NUM_WORKERS`.
pub fn engine() -> &'static ParallelBackend {
    ENGINE.get_or_init(|| {
        ParallelBackend::with_config(ParallelConfig::from_env()).unwrap_or_else(|e| {
            warn!(error = %e, "using the global worker pool");
            ParallelBackend::new()
        })
    })
}
