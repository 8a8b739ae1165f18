//! Grid geometry and the state that owns every field buffer

mod layout;
mod state;

// Re-export main types
pub use layout::Grid;
pub use state::{GridState, SpectralPair, VectorField};
