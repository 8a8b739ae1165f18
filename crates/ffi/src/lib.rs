//! C ABI for the smoke simulation
//!
//! All functions are thread-safe. Errors are reported through
//! `SmokeSimErrorCode` return values, with a per-thread message available from
//! `smoke_sim_get_last_error()`.

mod error;
mod helpers;
mod instance;

pub use error::{smoke_sim_get_last_error, smoke_sim_get_last_error_code, SmokeSimErrorCode};
pub use instance::*;
