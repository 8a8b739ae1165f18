//! Smoke Simulation Core Library
//!
//! A real-time 2D smoke solver on a periodic grid using the stable-fluids
//! scheme: semi-Lagrangian advection in real space alternates with viscous
//! damping and divergence-free projection in frequency space, and a passive
//! density field is carried through the resulting flow.
//!
//! ## Layout
//!
//! - `grid`: periodic geometry and the `GridState` that owns every buffer
//! - `solver`: advection, spectral diffusion-projection, velocity and density steps
//! - `simulation`: forcing, command queue, configuration and the tick orchestrator
//!
//! ```rust,ignore
//! use smoke_sim_core::{Command, SimulationConfig, SmokeSimulation};
//!
//! let mut sim = SmokeSimulation::new(&SimulationConfig::default())?;
//! sim.submit(Command::InjectDensity { x: 25, y: 25, value: 10.0 })?;
//! sim.tick()?;
//! println!("{:?}", sim.frame().stats());
//! ```

pub mod error;
pub mod grid;
pub mod simulation;
pub mod solver;

// Re-export main types
pub use error::{SimError, SimResult};
pub use grid::{Grid, GridState, VectorField};
pub use simulation::{
    Command, CommandQueue, FieldStats, Frame, FrameSink, NullSink, PointerDrag, RunState,
    SimulationConfig, SimulationParams, SmokeSimulation, TickOutcome,
};
pub use solver::{FieldData, SpectralField, SpectralTransform};
