//! Velocity solver
//!
//! One step of the stable-fluids velocity update: integrate the force input,
//! self-advect, then diffuse and project in frequency space.

use super::advection::advect;
use super::spectral::diffuse_and_project;
use crate::error::SimResult;
use crate::grid::{GridState, VectorField};
use tracing::trace;

/// Advance `state.velocity` by one step
///
/// On entry `state.velocity_prev` holds the force input prepared by the
/// forcing phase. On return `state.velocity` holds the new divergence-free,
/// viscously damped velocity and `state.velocity_prev` holds the
/// pre-advection snapshot.
///
/// # Arguments
///
/// * `state` - Initialized grid state
/// * `dt` - Timestep (any sign)
/// * `viscosity` - Kinematic viscosity (any sign)
///
/// # Errors
///
/// Returns `SimError::Transform` if the transform library rejects a buffer.
pub fn step_velocity(state: &mut GridState, dt: f64, viscosity: f64) -> SimResult<()> {
    let grid = state.grid();

    integrate_forces(&mut state.velocity, &mut state.velocity_prev, dt);

    // Both components trace from the same snapshot
    let snapshot = &state.velocity_prev;
    advect(
        grid,
        &snapshot.x.data,
        &snapshot.y.data,
        &mut state.velocity.x.data,
        &snapshot.x.data,
        dt,
    );
    advect(
        grid,
        &snapshot.x.data,
        &snapshot.y.data,
        &mut state.velocity.y.data,
        &snapshot.y.data,
        dt,
    );

    state.spectral.x.load(&state.velocity.x);
    state.spectral.y.load(&state.velocity.y);

    diffuse_and_project(
        &mut state.transform,
        &mut state.spectral.x,
        &mut state.spectral.y,
        viscosity,
        dt,
    )?;

    state.spectral.x.store(&mut state.velocity.x);
    state.spectral.y.store(&mut state.velocity.y);

    trace!("Velocity step complete (dt={}, viscosity={})", dt, viscosity);
    Ok(())
}

/// `velocity += dt * source`, then mirror the result into `source`
fn integrate_forces(velocity: &mut VectorField, source: &mut VectorField, dt: f64) {
    let pairs = [
        (&mut velocity.x.data, &mut source.x.data),
        (&mut velocity.y.data, &mut source.y.data),
    ];
    for (current, scratch) in pairs {
        for (v, s) in current.iter_mut().zip(scratch.iter_mut()) {
            *v += dt * *s;
            *s = *v;
        }
    }
}
