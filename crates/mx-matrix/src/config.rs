use std::num::NonZeroUsize;

use tracing::warn;

/// Environment variable that overrides the fallback engine's worker count.
pub const WORKERS_ENV: &str = "MX_NUM_WORKERS";

/// Configuration for the parallel fallback engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Number of workers. `None` uses the global rayon pool, sized from the
    /// platform's available parallelism.
    pub workers: Option<NonZeroUsize>,
    /// Name prefix for threads of a dedicated pool.
    pub thread_name: String,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            workers: None,
            thread_name: "mx-worker".to_string(),
        }
    }
}

impl ParallelConfig {
    /// Reads the worker override from `MX_NUM_WORKERS`.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(WORKERS_ENV).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = value {
            match raw.trim().parse::<usize>().ok().and_then(NonZeroUsize::new) {
                Some(n) => config.workers = Some(n),
                None => warn!(value = raw, "ignoring invalid {}", WORKERS_ENV),
            }
        }
        config
    }

    /// Sets the worker count; 0 restores the platform default.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = NonZeroUsize::new(workers);
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}
