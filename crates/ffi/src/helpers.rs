use crate::error::{with_last_error_mut, SmokeSimErrorCode, SmokeSimFfiError};
use std::ffi::CString;

/// Set the thread-local error message and code.
/// A message containing an interior NUL is dropped; the code is still recorded.
pub(crate) fn set_last_error(error: &impl SmokeSimFfiError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
/// Used by entry points whose return value is not an error code.
#[inline]
pub(crate) fn track_error(error: &impl SmokeSimFfiError) -> SmokeSimErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
/// Every entry point that succeeds calls this, so the getters never report
/// a stale failure.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = SmokeSimErrorCode::Ok;
    });
}

/// Record the outcome of an operation and return its code.
///
/// `Ok` clears the last error, `Err` stores it.
pub(crate) fn track_result<E: SmokeSimFfiError>(result: Result<(), E>) -> SmokeSimErrorCode {
    match result {
        Ok(()) => {
            clear_last_error();
            SmokeSimErrorCode::Ok
        }
        Err(error) => track_error(&error),
    }
}
