//! Field buffers for the solver
//!
//! `FieldData` holds a compact N×N real-space field. `SpectralField` holds the
//! padded layout the half-spectrum transform works in: N rows of
//! `Grid::padded_stride()` values, real data in the first N slots of each row
//! and interleaved (re, im) pairs after a forward transform.
//!
//! Both are allocated once, fallibly, and never resized afterwards.

use crate::error::{SimError, SimResult};
use crate::grid::Grid;
use rayon::prelude::*;

/// Allocate a buffer filled with `value`, reporting allocation failure instead of aborting
pub(crate) fn try_filled<T: Clone>(len: usize, value: T) -> SimResult<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| SimError::Allocation {
            bytes: len.saturating_mul(std::mem::size_of::<T>()),
        })?;
    data.resize(len, value);
    Ok(data)
}

fn try_zeroed(len: usize) -> SimResult<Vec<f64>> {
    try_filled(len, 0.0)
}

/// Compact real-space field
///
/// Stores values in row-major order (`y * width + x`).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldData {
    /// Field values in row-major order (y * width + x)
    pub data: Vec<f64>,
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
}

impl FieldData {
    /// Allocate a zeroed field covering `grid`
    ///
    /// # Errors
    ///
    /// Returns `SimError::Allocation` if the buffer cannot be reserved.
    pub fn zeroed(grid: Grid) -> SimResult<Self> {
        Ok(Self {
            data: try_zeroed(grid.cell_count())?,
            width: grid.size(),
            height: grid.size(),
        })
    }

    /// Get reference to field data
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Get mutable reference to field data
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Get value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        assert!(
            x < self.width && y < self.height,
            "Coordinates out of bounds"
        );
        self.data[y * self.width + x]
    }

    /// Set value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        assert!(
            x < self.width && y < self.height,
            "Coordinates out of bounds"
        );
        self.data[y * self.width + x] = value;
    }

    /// Fill entire field with a value
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Overwrite this field with `factor * source`
    pub fn assign_scaled(&mut self, source: &FieldData, factor: f64) {
        for (dst, &src) in self.data.iter_mut().zip(&source.data) {
            *dst = factor * src;
        }
    }

    /// Multiply every value by `factor`
    pub fn scale(&mut self, factor: f64) {
        for value in &mut self.data {
            *value *= factor;
        }
    }

    /// Arithmetic mean over all cells
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }
}

/// Padded frequency-domain buffer
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralField {
    data: Vec<f64>,
    grid: Grid,
}

impl SpectralField {
    /// Allocate a zeroed padded buffer for `grid`
    ///
    /// # Errors
    ///
    /// Returns `SimError::Allocation` if the buffer cannot be reserved.
    pub fn zeroed(grid: Grid) -> SimResult<Self> {
        Ok(Self {
            data: try_zeroed(grid.padded_len())?,
            grid,
        })
    }

    /// Grid this buffer is laid out for
    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Raw padded values
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Raw padded values, mutable
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Copy a compact field into the real-space slots, zeroing the padding
    pub fn load(&mut self, source: &FieldData) {
        let n = self.grid.size();
        let stride = self.grid.padded_stride();
        self.data
            .par_chunks_mut(stride)
            .zip(source.data.par_chunks(n))
            .for_each(|(padded_row, compact_row)| {
                padded_row[..n].copy_from_slice(compact_row);
                padded_row[n..].fill(0.0);
            });
    }

    /// Copy the real-space slots into a compact field, stripping the padding
    pub fn store(&self, target: &mut FieldData) {
        let n = self.grid.size();
        let stride = self.grid.padded_stride();
        target
            .data
            .par_chunks_mut(n)
            .zip(self.data.par_chunks(stride))
            .for_each(|(compact_row, padded_row)| {
                compact_row.copy_from_slice(&padded_row[..n]);
            });
    }

    /// Complex bin `(kx, row)` as `(re, im)`
    #[must_use]
    pub fn bin(&self, kx: usize, row: usize) -> (f64, f64) {
        let idx = self.grid.padded_index(2 * kx, row);
        (self.data[idx], self.data[idx + 1])
    }

    /// Overwrite complex bin `(kx, row)`
    pub fn set_bin(&mut self, kx: usize, row: usize, re: f64, im: f64) {
        let idx = self.grid.padded_index(2 * kx, row);
        self.data[idx] = re;
        self.data[idx + 1] = im;
    }
}
