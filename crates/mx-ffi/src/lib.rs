//! C ABI matrix multiplication kernels.
//!
//! Exports one fixed-signature entry point per element kind, computed by the
//! `mx-matrix` parallel fallback engine, so this library can stand in
//! wherever an external native multiplication library is expected.

mod engine;
mod error;
mod types;

pub use engine::engine;
pub use types::*;

use std::ffi::CString;
use std::os::raw::{c_char, c_int, c_void};
use std::panic::{self, AssertUnwindSafe};
use std::slice;

use mx_matrix::{Element, ElementKind};

use crate::error::{report, report_matrix_error};

/// Execute a closure that returns an `MXStatus`, catching any panics
/// and converting them into `MXStatus::ErrorInternal`.
fn catch_panic<F: FnOnce() -> MXStatus>(f: F) -> MXStatus {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(status) => status,
        Err(_) => report(MXStatus::ErrorInternal, "internal panic"),
    }
}

/// Validates C dimensions and returns the element counts of `a`, `b` and `out`.
fn element_counts(
    n: c_int,
    m: c_int,
    l: c_int,
) -> Result<(usize, usize, usize, [usize; 3]), MXStatus> {
    if n <= 0 || m <= 0 || l <= 0 {
        return Err(report(
            MXStatus::ErrorInvalidArgument,
            format!("matrix dimensions must be positive, got {}x{} by {}x{}", n, m, m, l),
        ));
    }
    let (n, m, l) = (n as usize, m as usize, l as usize);
    match (n.checked_mul(m), m.checked_mul(l), n.checked_mul(l)) {
        (Some(a), Some(b), Some(out)) => Ok((n, m, l, [a, b, out])),
        _ => Err(report(
            MXStatus::ErrorInvalidArgument,
            "matrix too large for this platform",
        )),
    }
}

/// Shared body of the typed kernels.
///
/// # Safety
/// `a`, `b` and `out` must point to `n*m`, `m*l` and `n*l` valid elements.
unsafe fn multiply_raw<T: Element>(
    n: c_int,
    m: c_int,
    l: c_int,
    a: *const T,
    b: *const T,
    out: *mut T,
) -> c_int {
    catch_panic(|| {
        if a.is_null() || b.is_null() || out.is_null() {
            return report(MXStatus::ErrorInvalidArgument, "null argument");
        }
        let (n, m, l, [len_a, len_b, len_out]) = match element_counts(n, m, l) {
            Ok(counts) => counts,
            Err(status) => return status,
        };

        let a = unsafe { slice::from_raw_parts(a, len_a) };
        let b = unsafe { slice::from_raw_parts(b, len_b) };
        let out = unsafe { slice::from_raw_parts_mut(out, len_out) };

        match T::run_backend(engine(), n, m, l, a, b, out) {
            Ok(()) => MXStatus::Ok,
            Err(e) => report_matrix_error(&e),
        }
    })
    .code()
}

/// Multiply an `n x m` by an `m x l` row-major `int32` matrix into `out`.
///
/// Returns 0 on success, otherwise an `MXStatus` code.
#[no_mangle]
pub unsafe extern "C" fn mx_multiply_i32(
    n: c_int,
    m: c_int,
    l: c_int,
    a: *const i32,
    b: *const i32,
    out: *mut i32,
) -> c_int {
    multiply_raw(n, m, l, a, b, out)
}

/// Multiply an `n x m` by an `m x l` row-major `float` matrix into `out`.
#[no_mangle]
pub unsafe extern "C" fn mx_multiply_f32(
    n: c_int,
    m: c_int,
    l: c_int,
    a: *const f32,
    b: *const f32,
    out: *mut f32,
) -> c_int {
    multiply_raw(n, m, l, a, b, out)
}

/// Multiply an `n x m` by an `m x l` row-major `double` matrix into `out`.
#[no_mangle]
pub unsafe extern "C" fn mx_multiply_f64(
    n: c_int,
    m: c_int,
    l: c_int,
    a: *const f64,
    b: *const f64,
    out: *mut f64,
) -> c_int {
    multiply_raw(n, m, l, a, b, out)
}

/// Tagged variant of the typed kernels; `kind` is an `MXElementKind` value.
#[no_mangle]
pub unsafe extern "C" fn mx_multiply(
    kind: u32,
    n: c_int,
    m: c_int,
    l: c_int,
    a: *const c_void,
    b: *const c_void,
    out: *mut c_void,
) -> c_int {
    match ElementKind::from_tag(kind) {
        Ok(ElementKind::I32) => multiply_raw::<i32>(n, m, l, a.cast(), b.cast(), out.cast()),
        Ok(ElementKind::F32) => multiply_raw::<f32>(n, m, l, a.cast(), b.cast(), out.cast()),
        Ok(ElementKind::F64) => multiply_raw::<f64>(n, m, l, a.cast(), b.cast(), out.cast()),
        Err(e) => report_matrix_error(&e).code(),
    }
}

/// Retrieve the last error message.
///
/// Returns a pointer to a C string describing the most recent error, or
/// null if no error has occurred. The caller must free the returned string
/// with `mx_free_string`.
#[no_mangle]
pub extern "C" fn mx_last_error() -> *const c_char {
    match error::take_message() {
        Some(e) => e.into_raw(),
        None => std::ptr::null(),
    }
}

/// Status code of the most recent failure on the calling thread, or 0.
///
/// Unlike `mx_last_error` this does not clear the record.
#[no_mangle]
pub extern "C" fn mx_last_status() -> c_int {
    error::last_status().code()
}

/// Free a string previously returned by `mx_last_error`.
#[no_mangle]
pub unsafe extern "C" fn mx_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
