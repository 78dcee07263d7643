mod kernel;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{trace, warn};

use crate::backend::{check_operands, MatmulBackend};
use crate::config::ParallelConfig;
use crate::element::Element;
use crate::error::{MatrixError, Result};

/// Portable in-process multiplication backend.
///
/// Transposes the right operand once, splits the result rows into
/// `ceil(n / P)`-row chunks for `P` workers, and computes each chunk as an
/// independent task on a rayon pool. The call returns after every chunk has
/// finished. Results are bit-identical for any worker count, which makes this
/// backend the reference when checking a native one.
///
/// If a chunk panics, its siblings still run to completion and the first panic
/// is reported as `MatrixError::WorkerPanicked`.
#[derive(Debug, Clone)]
pub struct ParallelBackend {
    config: ParallelConfig,
    pool: Option<Arc<ThreadPool>>,
}

impl ParallelBackend {
    /// Backend on the global rayon pool.
    pub fn new() -> Self {
        ParallelBackend {
            config: ParallelConfig::default(),
            pool: None,
        }
    }

    /// Backend honoring `config`. A worker override gets a dedicated pool
    /// of that size, built once here.
    pub fn with_config(config: ParallelConfig) -> Result<Self> {
        let pool = match config.workers {
            Some(n) => {
                let prefix = config.thread_name.clone();
                let pool = ThreadPoolBuilder::new()
                    .num_threads(n.get())
                    .thread_name(move |i| format!("{}-{}", prefix, i))
                    .build()
                    .map_err(|e| MatrixError::ThreadPool(e.to_string()))?;
                Some(Arc::new(pool))
            }
            None => None,
        };
        Ok(ParallelBackend { config, pool })
    }

    pub fn config(&self) -> &ParallelConfig {
        &self.config
    }

    /// Number of workers `P` the rows are partitioned for.
    pub fn workers(&self) -> usize {
        let threads = match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        };
        threads.max(1)
    }

    fn compute<T: Element>(
        &self,
        rows_a: usize,
        cols_a: usize,
        cols_b: usize,
        a: &[T],
        b: &[T],
        out: &mut [T],
    ) -> Result<()> {
        check_operands(rows_a, cols_a, cols_b, a, b, out)?;
        if out.is_empty() {
            return Ok(());
        }

        let bt = kernel::transpose(b, cols_a, cols_b);
        let workers = self.workers();
        let chunk_rows = rows_a.div_ceil(workers);
        trace!(
            kind = %T::KIND,
            workers,
            chunk_rows,
            "fallback matmul"
        );

        self.fork_join(out, chunk_rows * cols_b, |idx, chunk| {
            kernel::row_chunk(a, &bt, cols_a, cols_b, idx * chunk_rows, chunk)
        })
    }

    /// Runs `task` once per `chunk_len`-element chunk of `out`, in parallel,
    /// and waits for all of them.
    fn fork_join<T, F>(&self, out: &mut [T], chunk_len: usize, task: F) -> Result<()>
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync,
    {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| match &self.pool {
            Some(pool) => pool.install(|| spread(out, chunk_len, &task)),
            None => spread(out, chunk_len, &task),
        }));
        outcome.map_err(|payload| {
            let msg = panic_message(payload.as_ref());
            warn!(error = %msg, "fallback worker panicked");
            MatrixError::WorkerPanicked(msg)
        })
    }
}

impl Default for ParallelBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn spread<T, F>(out: &mut [T], chunk_len: usize, task: &F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    out.par_chunks_mut(chunk_len)
        .enumerate()
        .for_each(|(idx, chunk)| task(idx, chunk));
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl MatmulBackend for ParallelBackend {
    fn name(&self) -> &str {
        "parallel"
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
        self.compute(rows_a, cols_a, cols_b, a, b, out)
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
        self.compute(rows_a, cols_a, cols_b, a, b, out)
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
        self.compute(rows_a, cols_a, cols_b, a, b, out)
    }
}
