use mx_matrix::{ElementKind, MatrixError};

/// Status codes returned by all FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MXStatus {
    Ok = 0,
    ErrorInvalidArgument = 1,
    ErrorUnsupportedKind = 2,
    ErrorCompute = 3,
    ErrorInternal = 4,
}

impl MXStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<&MatrixError> for MXStatus {
    fn from(err: &MatrixError) -> Self {
        match err {
            MatrixError::InvalidDimensions { .. }
            | MatrixError::DataLength { .. }
            | MatrixError::IndexOutOfRange { .. }
            | MatrixError::DimensionMismatch { .. }
            | MatrixError::DimensionOverflow(_) => MXStatus::ErrorInvalidArgument,
            MatrixError::UnsupportedElementKind(_) | MatrixError::ElementKindMismatch { .. } => {
                MXStatus::ErrorUnsupportedKind
            }
            MatrixError::WorkerPanicked(_) => MXStatus::ErrorInternal,
            MatrixError::Backend { .. }
            | MatrixError::Library(_)
            | MatrixError::ThreadPool(_) => MXStatus::ErrorCompute,
        }
    }
}

/// Element kind tag accepted by `mx_multiply`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MXElementKind {
    I32 = 0,
    F32 = 1,
    F64 = 2,
}

impl From<ElementKind> for MXElementKind {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::I32 => MXElementKind::I32,
            ElementKind::F32 => MXElementKind::F32,
            ElementKind::F64 => MXElementKind::F64,
        }
    }
}
