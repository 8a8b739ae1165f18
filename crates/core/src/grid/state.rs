//! Grid state: sole owner of every simulation buffer
//!
//! All arrays are allocated once by `GridState::initialize`, zero-filled, and
//! reused for the lifetime of the simulation. Solver components borrow the
//! buffers they need for one phase of a tick and keep nothing across ticks.

use super::layout::Grid;
use crate::error::SimResult;
use crate::solver::{FieldData, SpectralField, SpectralTransform};
use tracing::info;

/// Two-component field over the grid
#[derive(Debug, Clone, PartialEq)]
pub struct VectorField {
    /// x component
    pub x: FieldData,
    /// y component
    pub y: FieldData,
}

impl VectorField {
    /// Allocate both components zero-filled
    ///
    /// # Errors
    ///
    /// Returns `SimError::Allocation` if either buffer cannot be reserved.
    pub fn zeroed(grid: Grid) -> SimResult<Self> {
        Ok(Self {
            x: FieldData::zeroed(grid)?,
            y: FieldData::zeroed(grid)?,
        })
    }
}

/// Padded frequency-domain working buffers for both velocity components
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralPair {
    /// x component, padded layout
    pub x: SpectralField,
    /// y component, padded layout
    pub y: SpectralField,
}

/// Every field and working buffer of one simulation
///
/// - `velocity` holds this tick's physically valid velocity after a step.
/// - `velocity_prev` is scratch: force input before a step, pre-advection
///   snapshot during one.
/// - `force` accumulates injected impulses; decayed, never reset.
/// - `density` / `density_prev` mirror the velocity pair for smoke.
#[derive(Debug)]
pub struct GridState {
    grid: Grid,
    /// Current velocity
    pub velocity: VectorField,
    /// Velocity scratch buffer
    pub velocity_prev: VectorField,
    /// Injected force impulses awaiting decay and integration
    pub force: VectorField,
    /// Current smoke density
    pub density: FieldData,
    /// Density scratch buffer (decayed copy of `density`)
    pub density_prev: FieldData,
    /// Padded buffers for the spectral step
    pub spectral: SpectralPair,
    /// Planned transform pair and its scratch storage
    pub transform: SpectralTransform,
}

impl GridState {
    /// Allocate and zero every buffer for an `n`×`n` periodic grid
    ///
    /// # Errors
    ///
    /// - `SimError::InvalidGridSize` if `n < 2`
    /// - `SimError::Allocation` if any buffer cannot be reserved
    pub fn initialize(n: usize) -> SimResult<Self> {
        let grid = Grid::new(n)?;

        let state = Self {
            grid,
            velocity: VectorField::zeroed(grid)?,
            velocity_prev: VectorField::zeroed(grid)?,
            force: VectorField::zeroed(grid)?,
            density: FieldData::zeroed(grid)?,
            density_prev: FieldData::zeroed(grid)?,
            spectral: SpectralPair {
                x: SpectralField::zeroed(grid)?,
                y: SpectralField::zeroed(grid)?,
            },
            transform: SpectralTransform::new(grid)?,
        };

        info!(
            "Grid state initialized: {}x{} cells, {} KiB of field storage",
            n,
            n,
            state.field_bytes() / 1024
        );
        Ok(state)
    }

    /// Grid geometry
    #[inline]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Bytes held by field buffers (excluding transform scratch)
    pub fn field_bytes(&self) -> usize {
        let compact = 8 * self.grid.cell_count();
        let padded = 2 * self.grid.padded_len();
        (compact + padded) * std::mem::size_of::<f64>()
    }
}
