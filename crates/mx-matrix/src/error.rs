use thiserror::Error;

use crate::kind::ElementKind;

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("matrix dimensions must be positive, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("data length mismatch: expected {expected} elements, got {got}")]
    DataLength { expected: usize, got: usize },
    #[error("index ({row}, {col}) out of range for {rows}x{cols} matrix")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("cannot multiply {a_rows}x{a_cols} by {b_rows}x{b_cols}")]
    DimensionMismatch {
        a_rows: usize,
        a_cols: usize,
        b_rows: usize,
        b_cols: usize,
    },
    #[error("unsupported element kind: {0}")]
    UnsupportedElementKind(String),
    #[error("element kind mismatch: {lhs} and {rhs}")]
    ElementKindMismatch { lhs: ElementKind, rhs: ElementKind },
    #[error("dimension {0} does not fit the native kernel ABI")]
    DimensionOverflow(usize),
    #[error("backend '{backend}' failed with status {status}")]
    Backend { backend: String, status: i32 },
    #[error("native library error: {0}")]
    Library(String),
    #[error("worker panicked: {0}")]
    WorkerPanicked(String),
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

pub type Result<T> = std::result::Result<T, MatrixError>;
