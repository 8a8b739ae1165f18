//! Stable-fluids solver
//!
//! Alternates real-space semi-Lagrangian advection with a frequency-space
//! diffusion and projection step. Every routine here operates on buffers
//! owned by `GridState` and allocates nothing per call.
//!
//! # Example
//!
//! ```rust,ignore
//! use smoke_sim_core::grid::GridState;
//! use smoke_sim_core::solver::{step_density, step_velocity};
//!
//! let mut state = GridState::initialize(64)?;
//! step_velocity(&mut state, 0.04, 0.001)?;
//! step_density(&mut state, 0.04);
//! ```

mod advection;
mod fields;
pub mod spectral;
mod transport;
mod velocity;

// Re-exports
pub use advection::{advect, sample_bilinear};
pub use fields::{FieldData, SpectralField};
pub use spectral::{diffuse_and_project, normalize, project_spectrum, SpectralTransform};
pub use transport::step_density;
pub use velocity::step_velocity;
