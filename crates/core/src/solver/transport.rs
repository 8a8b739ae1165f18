//! Scalar transport: carries smoke density through the updated velocity

use super::advection::advect;
use crate::grid::GridState;

/// Advect `state.density_prev` into `state.density`
///
/// Must run after `step_velocity` so the density follows this tick's
/// velocity rather than the previous one.
pub fn step_density(state: &mut GridState, dt: f64) {
    let grid = state.grid();
    advect(
        grid,
        &state.velocity.x.data,
        &state.velocity.y.data,
        &mut state.density.data,
        &state.density_prev.data,
        dt,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_still_air_copies_scratch() {
        let mut state = GridState::initialize(6).unwrap();
        state.density_prev.set(1, 4, 2.5);
        state.density.set(0, 0, 99.0);

        step_density(&mut state, 0.04);

        assert_eq!(state.density, state.density_prev);
    }

    #[test]
    fn test_density_follows_flow() {
        // N * dt * vx = 6 * 0.5 * (1/3) = 1 cell to the right
        let mut state = GridState::initialize(6).unwrap();
        state.velocity.x.fill(1.0 / 3.0);
        state.density_prev.set(5, 2, 1.0);

        step_density(&mut state, 0.5);

        assert!((state.density.get(0, 2) - 1.0).abs() < 1e-12);
        assert!(state.density.get(5, 2).abs() < 1e-12);
    }
}
