use smoke_sim_core::SimError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait SmokeSimFfiError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> SmokeSimErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `SmokeSimFfiError` for common FFI error scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultSmokeSimError {
    code: SmokeSimErrorCode,
    msg: String,
}

impl DefaultSmokeSimError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"instance"`, `"out"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: SmokeSimErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: SmokeSimErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for a caller buffer shorter than the grid.
    ///
    /// # Arguments
    /// * `param_name` - The undersized buffer
    /// * `len` - Length the caller passed
    /// * `required` - Number of cells in the grid
    pub fn buffer_too_small(param_name: &str, len: usize, required: usize) -> Self {
        Self {
            code: SmokeSimErrorCode::BufferTooSmall,
            msg: format!("Buffer '{param_name}' holds {len} values, need {required}"),
        }
    }
}

impl From<SimError> for DefaultSmokeSimError {
    fn from(error: SimError) -> Self {
        let code = match error {
            SimError::Allocation { .. } => SmokeSimErrorCode::AllocationFailed,
            SimError::InvalidGridSize { .. } | SimError::InvalidConfig { .. } => {
                SmokeSimErrorCode::InvalidParameter
            }
            SimError::QueueFull { .. } => SmokeSimErrorCode::QueueFull,
            SimError::Transform { .. } => SmokeSimErrorCode::SolverFailure,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl SmokeSimFfiError for DefaultSmokeSimError {
    fn code(&self) -> SmokeSimErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by smoke simulation functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmokeSimErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Invalid parameter passed to function (e.g. grid size below 2).
    InvalidParameter = 3,

    /// Field buffers could not be allocated.
    AllocationFailed = 4,

    /// Command queue is full; the input was dropped.
    QueueFull = 5,

    /// Caller-provided output buffer is shorter than the grid.
    BufferTooSmall = 6,

    /// The solver failed internally.
    SolverFailure = 7,
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    static LAST_ERROR: RefCell<(Option<CString>, SmokeSimErrorCode)> = const { RefCell::new((None, SmokeSimErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, SmokeSimErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, SmokeSimErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if no error has occurred.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread that
/// sets or clears the error.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// SmokeSimInstance* sim = smoke_sim_new(1, 0.04, 0.001);
/// if (!sim) {
///     printf("Smoke sim creation failed: %s\n", smoke_sim_get_last_error());
/// }
/// ```
#[no_mangle]
pub extern "C" fn smoke_sim_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `SmokeSimErrorCode::Ok` (0) if the last call on this thread succeeded.
#[no_mangle]
pub extern "C" fn smoke_sim_get_last_error_code() -> SmokeSimErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
