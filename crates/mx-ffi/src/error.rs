// Per-thread record of the most recent failed export.
//
// Each failing call overwrites the record. `mx_last_error` hands the message
// to the caller and clears it; `mx_last_status` only peeks at the code.

use std::cell::Cell;
use std::ffi::CString;
use std::fmt::Display;

use mx_matrix::MatrixError;
use tracing::debug;

use crate::types::MXStatus;

#[derive(Debug)]
struct Failure {
    status: MXStatus,
    message: CString,
}

thread_local! {
    static LAST_FAILURE: Cell<Option<Failure>> = const { Cell::new(None) };
}

/// Converts `message` to a C string. Interior NULs would truncate it on the
/// C side, so they are replaced instead of dropping the whole message.
fn c_message(message: String) -> CString {
    let bytes: Vec<u8> = message
        .into_bytes()
        .into_iter()
        .map(|b| if b == 0 { b' ' } else { b })
        .collect();
    CString::new(bytes).unwrap_or_default()
}

/// Records a failure for this thread and returns `status` for the caller to
/// pass back across the ABI.
pub(crate) fn report(status: MXStatus, message: impl Display) -> MXStatus {
    let message = message.to_string();
    debug!(code = status.code(), error = %message, "mx call failed");
    LAST_FAILURE.with(|slot| {
        slot.set(Some(Failure {
            status,
            message: c_message(message),
        }))
    });
    status
}

/// Records `err` under the status it maps to.
pub(crate) fn report_matrix_error(err: &MatrixError) -> MXStatus {
    report(MXStatus::from(err), err)
}

/// Removes and returns the message of the last failure on this thread.
pub(crate) fn take_message() -> Option<CString> {
    LAST_FAILURE.with(|slot| slot.take()).map(|failure| failure.message)
}

/// Status of the last failure on this thread, `Ok` when there is none.
pub(crate) fn last_status() -> MXStatus {
    LAST_FAILURE.with(|slot| {
        let failure = slot.take();
        let status = failure.as_ref().map_or(MXStatus::Ok, |f| f.status);
        slot.set(failure);
        status
    })
}
