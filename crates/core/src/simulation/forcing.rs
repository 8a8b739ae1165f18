//! Forcing interface
//!
//! Decays the accumulated external input once per tick and hands it to the
//! solver. Injection writes go straight into the un-decayed force and density
//! buffers; callers reach them through the command queue.

use super::config::SimulationParams;
use crate::grid::GridState;

/// Decay density and force, then seed the velocity scratch from the force
///
/// - `density_prev = density_decay * density`
/// - `force *= force_decay` on both axes, with no floor
/// - `velocity_prev = force`
pub fn prepare_tick(state: &mut GridState, params: &SimulationParams) {
    state
        .density_prev
        .assign_scaled(&state.density, params.density_decay);

    state.force.x.scale(params.force_decay);
    state.force.y.scale(params.force_decay);

    state
        .velocity_prev
        .x
        .data
        .copy_from_slice(&state.force.x.data);
    state
        .velocity_prev
        .y
        .data
        .copy_from_slice(&state.force.y.data);
}

/// Add `(dx, dy)` to the force at a cell, clamping the coordinates onto the grid
///
/// # Returns
///
/// The cell actually written
pub fn inject_force(state: &mut GridState, x: i64, y: i64, dx: f64, dy: f64) -> (usize, usize) {
    let grid = state.grid();
    let (cx, cy) = (grid.clamp(x), grid.clamp(y));
    let idx = grid.index(cx, cy);
    state.force.x.data[idx] += dx;
    state.force.y.data[idx] += dy;
    (cx, cy)
}

/// Overwrite the density at a cell, clamping the coordinates onto the grid
///
/// # Returns
///
/// The cell actually written
pub fn inject_density(state: &mut GridState, x: i64, y: i64, value: f64) -> (usize, usize) {
    let grid = state.grid();
    let (cx, cy) = (grid.clamp(x), grid.clamp(y));
    state.density.data[grid.index(cx, cy)] = value;
    (cx, cy)
}
