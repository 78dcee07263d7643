use std::fmt;
use std::str::FromStr;

use crate::error::MatrixError;

/// Numeric representation shared by every element of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// 32-bit signed integer, wrapping on overflow.
    I32,
    /// 32-bit IEEE 754 float.
    F32,
    /// 64-bit IEEE 754 float.
    F64,
}

impl ElementKind {
    /// All supported kinds, in tag order.
    pub const ALL: [ElementKind; 3] = [ElementKind::I32, ElementKind::F32, ElementKind::F64];

    /// Converts a C ABI kind tag to an `ElementKind`.
    ///
    /// Tags:
    /// - 0 => I32
    /// - 1 => F32
    /// - 2 => F64
    pub fn from_tag(tag: u32) -> Result<ElementKind, MatrixError> {
        match tag {
            0 => Ok(ElementKind::I32),
            1 => Ok(ElementKind::F32),
            2 => Ok(ElementKind::F64),
            other => Err(MatrixError::UnsupportedElementKind(format!("tag {}", other))),
        }
    }

    /// Returns the C ABI kind tag for this kind.
    pub fn tag(&self) -> u32 {
        match self {
            ElementKind::I32 => 0,
            ElementKind::F32 => 1,
            ElementKind::F64 => 2,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::I32 => write!(f, "i32"),
            ElementKind::F32 => write!(f, "f32"),
            ElementKind::F64 => write!(f, "f64"),
        }
    }
}

impl FromStr for ElementKind {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "i32" | "int" => Ok(ElementKind::I32),
            "f32" | "float" => Ok(ElementKind::F32),
            "f64" | "double" => Ok(ElementKind::F64),
            _ => Err(MatrixError::UnsupportedElementKind(s.to_string())),
        }
    }
}
