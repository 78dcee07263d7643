//! `mx-matrix` - Dense matrix multiplication with interchangeable backends.
//!
//! This crate provides:
//! - A row-major `Matrix<T>` over `i32`, `f32` and `f64`
//! - A `MatmulBackend` trait with one entry point per element kind
//! - `ParallelBackend`, a portable fork-join fallback engine
//! - `NativeBackend`, an adapter for externally compiled C ABI kernels
//! - `Multiplier`, which validates shapes and dispatches on element kind

pub mod backend;
pub mod config;
pub mod dispatch;
pub mod element;
pub mod error;
pub mod kind;
pub mod matrix;
pub mod multiply;
pub mod native;
pub mod parallel;

// Re-export primary types at the crate root for convenience.
pub use backend::MatmulBackend;
pub use config::ParallelConfig;
pub use dispatch::{multiply_any, AnyMatrix};
pub use element::Element;
pub use error::{MatrixError, Result};
pub use kind::ElementKind;
pub use matrix::Matrix;
pub use multiply::{multiply, Multiplier};
pub use native::{NativeBackend, NativeKernelFn, NativeKernels};
pub use parallel::ParallelBackend;

#[cfg(feature = "dynamic")]
pub use native::NativeSymbols;
