//! Error types for the smoke simulation core
//!
//! Numerical degeneracies (the zero-frequency bin, samples landing exactly on a
//! grid line, non-finite parameters) are handled inside the solver and never
//! surface here. Only allocation failure is fatal.

use std::error::Error;
use std::fmt;

/// Errors raised by grid initialization, configuration and the tick pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Field buffers could not be allocated during initialization.
    Allocation {
        /// Size of the request that failed, in bytes
        bytes: usize,
    },
    /// Grid side length is too small to form a periodic lattice.
    InvalidGridSize {
        /// Requested side length
        size: usize,
    },
    /// A configuration value failed validation.
    InvalidConfig {
        /// Name of the offending field
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },
    /// The bounded command queue rejected a submission.
    QueueFull {
        /// Fixed capacity of the queue
        capacity: usize,
    },
    /// The Fourier transform library rejected a buffer.
    Transform {
        /// Message from the transform library
        reason: String,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation { bytes } => {
                write!(f, "failed to allocate {bytes} bytes of field storage")
            }
            Self::InvalidGridSize { size } => {
                write!(f, "grid size {size} is invalid, need at least 2 cells per side")
            }
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid configuration value '{field}': {reason}")
            }
            Self::QueueFull { capacity } => {
                write!(f, "command queue is full ({capacity} pending commands)")
            }
            Self::Transform { reason } => write!(f, "spectral transform failed: {reason}"),
        }
    }
}

impl Error for SimError {}

impl From<realfft::FftError> for SimError {
    fn from(error: realfft::FftError) -> Self {
        Self::Transform {
            reason: error.to_string(),
        }
    }
}

/// Convenience alias used across the crate
pub type SimResult<T> = Result<T, SimError>;
