//! Spectral diffusion and projection
//!
//! Viscosity and incompressibility are applied together in frequency space,
//! where both become a per-bin algebraic operation:
//!
//! ```text
//! û(k) ← exp(-|k|² · Δt · ν) · (I - k kᵀ / |k|²) · û(k)
//! ```
//!
//! The projection removes the component of each complex velocity coefficient
//! parallel to its wavevector (Helmholtz decomposition), leaving the
//! divergence-free part. The zero-frequency bin holds the mean flow and is
//! left untouched.
//!
//! `SpectralTransform` wraps `realfft`/`rustfft` into an unnormalized 2D
//! real↔complex pair over the padded layout described in `grid::layout`:
//! rows are real-transformed along x (the contiguous axis) into
//! `N/2 + 1` interleaved bins, then each bin column is complex-transformed
//! along y.

use super::fields::{try_filled, SpectralField};
use crate::error::SimResult;
use crate::grid::Grid;
use rayon::prelude::*;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;

/// Planned 2D real↔complex transform with preallocated scratch storage
pub struct SpectralTransform {
    grid: Grid,
    row_forward: Arc<dyn RealToComplex<f64>>,
    row_inverse: Arc<dyn ComplexToReal<f64>>,
    column_forward: Arc<dyn Fft<f64>>,
    column_inverse: Arc<dyn Fft<f64>>,
    row_real: Vec<f64>,
    row_spectrum: Vec<Complex<f64>>,
    row_scratch: Vec<Complex<f64>>,
    column: Vec<Complex<f64>>,
    column_scratch: Vec<Complex<f64>>,
}

impl fmt::Debug for SpectralTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectralTransform")
            .field("size", &self.grid.size())
            .finish_non_exhaustive()
    }
}

impl SpectralTransform {
    /// Plan transforms for `grid` and allocate their working buffers
    ///
    /// # Errors
    ///
    /// Returns `SimError::Allocation` if a scratch buffer cannot be reserved.
    pub fn new(grid: Grid) -> SimResult<Self> {
        let n = grid.size();

        let mut real_planner = RealFftPlanner::<f64>::new();
        let row_forward = real_planner.plan_fft_forward(n);
        let row_inverse = real_planner.plan_fft_inverse(n);

        let mut planner = FftPlanner::<f64>::new();
        let column_forward = planner.plan_fft_forward(n);
        let column_inverse = planner.plan_fft_inverse(n);

        let row_scratch_len = row_forward
            .get_scratch_len()
            .max(row_inverse.get_scratch_len());
        let column_scratch_len = column_forward
            .get_inplace_scratch_len()
            .max(column_inverse.get_inplace_scratch_len());
        let zero = Complex::new(0.0, 0.0);

        Ok(Self {
            grid,
            row_real: try_filled(n, 0.0)?,
            row_spectrum: try_filled(grid.spectrum_width(), zero)?,
            row_scratch: try_filled(row_scratch_len, zero)?,
            column: try_filled(n, zero)?,
            column_scratch: try_filled(column_scratch_len, zero)?,
            row_forward,
            row_inverse,
            column_forward,
            column_inverse,
        })
    }

    /// Grid the transform was planned for
    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// In-place forward transform: real samples → interleaved half-spectrum
    ///
    /// # Errors
    ///
    /// Returns `SimError::Transform` if the transform library rejects a buffer.
    pub fn forward(&mut self, field: &mut SpectralField) -> SimResult<()> {
        debug_assert_eq!(field.grid(), self.grid);
        let n = self.grid.size();
        let stride = self.grid.padded_stride();
        let data = field.as_mut_slice();

        for row in data.chunks_exact_mut(stride) {
            self.row_real.copy_from_slice(&row[..n]);
            self.row_forward.process_with_scratch(
                &mut self.row_real,
                &mut self.row_spectrum,
                &mut self.row_scratch,
            )?;
            for (pair, bin) in row.chunks_exact_mut(2).zip(&self.row_spectrum) {
                pair[0] = bin.re;
                pair[1] = bin.im;
            }
        }

        for kx in 0..self.grid.spectrum_width() {
            gather_column(data, stride, kx, &mut self.column);
            self.column_forward
                .process_with_scratch(&mut self.column, &mut self.column_scratch);
            scatter_column(data, stride, kx, &self.column);
        }
        Ok(())
    }

    /// In-place inverse transform: interleaved half-spectrum → real samples
    ///
    /// Unnormalized, so `inverse(forward(f)) == N² · f`. The imaginary parts
    /// of the kx = 0 bin (and the kx = N/2 bin for even N) are ignored, and
    /// the padding slots of each row are zeroed.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Transform` if the transform library rejects a buffer.
    pub fn inverse(&mut self, field: &mut SpectralField) -> SimResult<()> {
        debug_assert_eq!(field.grid(), self.grid);
        let n = self.grid.size();
        let stride = self.grid.padded_stride();
        let width = self.grid.spectrum_width();
        let data = field.as_mut_slice();

        for kx in 0..width {
            gather_column(data, stride, kx, &mut self.column);
            self.column_inverse
                .process_with_scratch(&mut self.column, &mut self.column_scratch);
            scatter_column(data, stride, kx, &self.column);
        }

        for row in data.chunks_exact_mut(stride) {
            for (bin, pair) in self.row_spectrum.iter_mut().zip(row.chunks_exact(2)) {
                *bin = Complex::new(pair[0], pair[1]);
            }
            self.row_spectrum[0].im = 0.0;
            if n % 2 == 0 {
                self.row_spectrum[width - 1].im = 0.0;
            }
            self.row_inverse.process_with_scratch(
                &mut self.row_spectrum,
                &mut self.row_real,
                &mut self.row_scratch,
            )?;
            row[..n].copy_from_slice(&self.row_real);
            row[n..].fill(0.0);
        }
        Ok(())
    }
}

fn gather_column(data: &[f64], stride: usize, kx: usize, column: &mut [Complex<f64>]) {
    for (j, value) in column.iter_mut().enumerate() {
        let idx = j * stride + 2 * kx;
        *value = Complex::new(data[idx], data[idx + 1]);
    }
}

fn scatter_column(data: &mut [f64], stride: usize, kx: usize, column: &[Complex<f64>]) {
    for (j, value) in column.iter().enumerate() {
        let idx = j * stride + 2 * kx;
        data[idx] = value.re;
        data[idx + 1] = value.im;
    }
}

/// Per-bin projection and viscous damping of a transformed velocity field
///
/// Operates on the interleaved half-spectra of both components. Each (re, im)
/// pair is rotated as a unit so real and imaginary parts share the same
/// wavevector `(kx, ky)`; `ky` is folded into `(-N/2, N/2]`.
pub fn project_spectrum(
    x_hat: &mut SpectralField,
    y_hat: &mut SpectralField,
    viscosity: f64,
    dt: f64,
) {
    let grid = x_hat.grid();
    let stride = grid.padded_stride();

    x_hat
        .as_mut_slice()
        .par_chunks_mut(stride)
        .zip(y_hat.as_mut_slice().par_chunks_mut(stride))
        .enumerate()
        .for_each(|(j, (x_row, y_row))| {
            let ky = grid.folded_wavenumber(j);
            for (index, (x_pair, y_pair)) in x_row
                .chunks_exact_mut(2)
                .zip(y_row.chunks_exact_mut(2))
                .enumerate()
            {
                let kx = index as f64;
                let k_sq = kx * kx + ky * ky;
                // Mean flow
                if k_sq == 0.0 {
                    continue;
                }
                let damping = (-k_sq * dt * viscosity).exp();
                let pxx = 1.0 - kx * kx / k_sq;
                let pxy = kx * ky / k_sq;
                let pyy = 1.0 - ky * ky / k_sq;
                for part in 0..2 {
                    let (along_x, along_y) = (x_pair[part], y_pair[part]);
                    x_pair[part] = damping * (pxx * along_x - pxy * along_y);
                    y_pair[part] = damping * (pyy * along_y - pxy * along_x);
                }
            }
        });
}

/// Divide every value by N², undoing the gain of an unnormalized round trip
pub fn normalize(field: &mut SpectralField) {
    let n = field.grid().size() as f64;
    let factor = 1.0 / (n * n);
    field
        .as_mut_slice()
        .par_iter_mut()
        .for_each(|value| *value *= factor);
}

/// Forward-transform, project and damp, inverse-transform, normalize
///
/// On return both buffers hold the divergence-free, viscously damped velocity
/// in their real-space slots.
///
/// # Errors
///
/// Returns `SimError::Transform` if the transform library rejects a buffer.
pub fn diffuse_and_project(
    transform: &mut SpectralTransform,
    x_hat: &mut SpectralField,
    y_hat: &mut SpectralField,
    viscosity: f64,
    dt: f64,
) -> SimResult<()> {
    transform.forward(x_hat)?;
    transform.forward(y_hat)?;

    project_spectrum(x_hat, y_hat, viscosity, dt);

    transform.inverse(x_hat)?;
    transform.inverse(y_hat)?;

    normalize(x_hat);
    normalize(y_hat);
    Ok(())
}
