//! Numerical properties of the stable-fluids solver
use approx::{assert_abs_diff_eq, assert_relative_eq};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smoke_sim_core::grid::GridState;
use smoke_sim_core::solver::{
    advect, diffuse_and_project, normalize, sample_bilinear, step_density, step_velocity,
    FieldData, SpectralField, SpectralTransform,
};
use smoke_sim_core::Grid;
use std::f64::consts::PI;
use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

fn random_values(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random_range(-1.0..1.0)).collect()
}

fn random_field(grid: Grid, seed: u64) -> FieldData {
    let mut field = FieldData::zeroed(grid).unwrap();
    field.data = random_values(grid.cell_count(), seed);
    field
}

/// Run the spectral step on a compact velocity pair and return the result
fn spectral_step(
    grid: Grid,
    vx: &FieldData,
    vy: &FieldData,
    viscosity: f64,
    dt: f64,
) -> (FieldData, FieldData) {
    let mut transform = SpectralTransform::new(grid).unwrap();
    let mut x_hat = SpectralField::zeroed(grid).unwrap();
    let mut y_hat = SpectralField::zeroed(grid).unwrap();
    x_hat.load(vx);
    y_hat.load(vy);

    diffuse_and_project(&mut transform, &mut x_hat, &mut y_hat, viscosity, dt).unwrap();

    let mut out_x = FieldData::zeroed(grid).unwrap();
    let mut out_y = FieldData::zeroed(grid).unwrap();
    x_hat.store(&mut out_x);
    y_hat.store(&mut out_y);
    (out_x, out_y)
}

#[test]
fn test_sampling_wraps_out_of_range_positions() {
    let grid = Grid::new(10).unwrap();
    let source = random_values(grid.cell_count(), 1);
    let n = grid.size() as f64;

    for &(x, y) in &[(0.25, 0.75), (3.5, 9.9), (9.75, 0.0), (4.0, 6.125)] {
        let expected = sample_bilinear(grid, &source, x, y);
        for &(wx, wy) in &[(1.0, 0.0), (-1.0, 2.0), (-3.0, -1.0), (5.0, -4.0)] {
            let shifted = sample_bilinear(grid, &source, x + wx * n, y + wy * n);
            assert_abs_diff_eq!(shifted, expected, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_advection_traces_wrap_whole_periods() {
    // With dt = 0.5 on N = 16, adding 2.0 to a velocity moves the traced
    // position exactly one full period
    let grid = Grid::new(16).unwrap();
    let source = random_values(grid.cell_count(), 2);
    let vx = random_values(grid.cell_count(), 3);
    let vy = random_values(grid.cell_count(), 4);
    let vx_far: Vec<f64> = vx.iter().map(|v| v + 2.0).collect();
    let vy_far: Vec<f64> = vy.iter().map(|v| v - 4.0).collect();

    let mut near = vec![0.0; grid.cell_count()];
    let mut far = vec![0.0; grid.cell_count()];
    advect(grid, &vx, &vy, &mut near, &source, 0.5);
    advect(grid, &vx_far, &vy_far, &mut far, &source, 0.5);

    for (a, b) in near.iter().zip(&far) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-9);
    }
}

#[test]
fn test_spectral_step_preserves_mean_velocity() {
    let grid = Grid::new(20).unwrap();
    let vx = random_field(grid, 5);
    let vy = random_field(grid, 6);

    let (out_x, out_y) = spectral_step(grid, &vx, &vy, 0.01, 0.04);

    assert_abs_diff_eq!(out_x.mean(), vx.mean(), epsilon = 1e-12);
    assert_abs_diff_eq!(out_y.mean(), vy.mean(), epsilon = 1e-12);
}

#[test]
fn test_damping_decreases_with_timestep() {
    // vx = cos(2πy/N) is a single divergence-free mode with |k|² = 1
    let grid = Grid::new(16).unwrap();
    let mut vx = FieldData::zeroed(grid).unwrap();
    for y in 0..16 {
        for x in 0..16 {
            vx.set(x, y, (2.0 * PI * y as f64 / 16.0).cos());
        }
    }
    let vy = FieldData::zeroed(grid).unwrap();

    let viscosity = 0.2;
    let mut previous = f64::INFINITY;
    for dt in [0.01, 0.1, 0.5, 1.0, 4.0] {
        let (out_x, _) = spectral_step(grid, &vx, &vy, viscosity, dt);
        let amplitude = out_x.get(0, 0);
        assert_relative_eq!(amplitude, (-dt * viscosity).exp(), epsilon = 1e-12);
        assert!(amplitude < previous);
        previous = amplitude;
    }

    for dt in [0.01, 1.0, 4.0] {
        let (out_x, out_y) = spectral_step(grid, &vx, &vy, 0.0, dt);
        for (a, b) in out_x.data.iter().zip(&vx.data) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
        assert!(out_y.data.iter().all(|v| v.abs() < 1e-12));
    }
}

#[test]
fn test_velocity_step_is_divergence_free() {
    // Odd N: no Nyquist column, whose ±kx aliasing breaks exact orthogonality
    let mut state = GridState::initialize(25).unwrap();
    let grid = state.grid();
    state.velocity_prev.x.data = random_values(grid.cell_count(), 7);
    state.velocity_prev.y.data = random_values(grid.cell_count(), 8);

    step_velocity(&mut state, 0.04, 0.001).unwrap();

    let mut transform = SpectralTransform::new(grid).unwrap();
    let mut x_hat = SpectralField::zeroed(grid).unwrap();
    let mut y_hat = SpectralField::zeroed(grid).unwrap();
    x_hat.load(&state.velocity.x);
    y_hat.load(&state.velocity.y);
    transform.forward(&mut x_hat).unwrap();
    transform.forward(&mut y_hat).unwrap();

    for j in 0..grid.size() {
        let ky = grid.folded_wavenumber(j);
        for kx_index in 0..grid.spectrum_width() {
            let kx = kx_index as f64;
            let (u_re, u_im) = x_hat.bin(kx_index, j);
            let (v_re, v_im) = y_hat.bin(kx_index, j);
            assert_abs_diff_eq!(kx * u_re + ky * v_re, 0.0, epsilon = 1e-8);
            assert_abs_diff_eq!(kx * u_im + ky * v_im, 0.0, epsilon = 1e-8);
        }
    }
}

#[test]
fn test_zero_velocity_transport_is_identity() {
    let mut state = GridState::initialize(32).unwrap();
    state.density_prev.data = random_values(32 * 32, 9);

    step_density(&mut state, 0.04);

    assert_eq!(state.density.data, state.density_prev.data);
}

#[test]
fn test_round_trip_reproduces_field() {
    for n in [2, 3, 31, 64] {
        let grid = Grid::new(n).unwrap();
        let original = random_field(grid, n as u64 + 100);
        let mut transform = SpectralTransform::new(grid).unwrap();
        let mut buffer = SpectralField::zeroed(grid).unwrap();
        buffer.load(&original);

        transform.forward(&mut buffer).unwrap();
        transform.inverse(&mut buffer).unwrap();
        normalize(&mut buffer);

        let mut restored = FieldData::zeroed(grid).unwrap();
        buffer.store(&mut restored);
        for (a, b) in original.data.iter().zip(&restored.data) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_zero_viscosity_spectral_step_keeps_solenoidal_field() {
    // Stream function ψ = sin(2πx/N)·sin(2πy/N) gives a divergence-free field
    let grid = Grid::new(12).unwrap();
    let mut vx = FieldData::zeroed(grid).unwrap();
    let mut vy = FieldData::zeroed(grid).unwrap();
    let w = 2.0 * PI / 12.0;
    for y in 0..12 {
        for x in 0..12 {
            let (xf, yf) = (x as f64 * w, y as f64 * w);
            vx.set(x, y, xf.sin() * yf.cos());
            vy.set(x, y, -xf.cos() * yf.sin());
        }
    }

    let (out_x, out_y) = spectral_step(grid, &vx, &vy, 0.0, 0.04);

    for (a, b) in out_x.data.iter().zip(&vx.data) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-12);
    }
    for (a, b) in out_y.data.iter().zip(&vy.data) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-12);
    }
}
