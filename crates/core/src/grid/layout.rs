//! Periodic grid geometry
//!
//! Centralizes the toroidal index arithmetic and the two buffer strides used by
//! the solver: the compact real-space stride (N) and the padded stride the
//! half-spectrum transform writes into (`2 * (N/2 + 1)`, i.e. N+2 for even N).

use crate::error::{SimError, SimResult};

/// Square toroidal lattice of side `n`
///
/// Cells are addressed as `(x, y)` with `x` the contiguous axis, so the compact
/// flat index is `y * n + x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    n: usize,
}

impl Grid {
    /// Create a grid of side `n`
    ///
    /// # Errors
    ///
    /// - `SimError::InvalidGridSize` when `n < 2`
    /// - `SimError::Allocation` when a padded buffer of side `n` has more
    ///   values than `usize` can count
    pub fn new(n: usize) -> SimResult<Self> {
        if n < 2 {
            return Err(SimError::InvalidGridSize { size: n });
        }
        // Every other length and index derives from this product
        let padded_len = (n / 2 + 1)
            .checked_mul(2)
            .and_then(|stride| stride.checked_mul(n));
        if padded_len.is_none() {
            return Err(SimError::Allocation { bytes: usize::MAX });
        }
        Ok(Self { n })
    }

    /// Side length in cells
    #[inline]
    pub const fn size(&self) -> usize {
        self.n
    }

    /// Number of cells in a compact (N×N) buffer
    #[inline]
    pub const fn cell_count(&self) -> usize {
        self.n * self.n
    }

    /// Row stride of the padded frequency-domain layout
    #[inline]
    pub const fn padded_stride(&self) -> usize {
        2 * (self.n / 2 + 1)
    }

    /// Number of values in a padded (N × stride) buffer
    #[inline]
    pub const fn padded_len(&self) -> usize {
        self.n * self.padded_stride()
    }

    /// Number of complex bins per padded row
    #[inline]
    pub const fn spectrum_width(&self) -> usize {
        self.n / 2 + 1
    }

    /// Wrap a signed coordinate onto `[0, n)`
    #[inline]
    pub fn wrap(&self, coord: i64) -> usize {
        coord.rem_euclid(self.n as i64) as usize
    }

    /// Clamp a signed coordinate onto `[0, n-1]`
    #[inline]
    pub fn clamp(&self, coord: i64) -> usize {
        coord.clamp(0, self.n as i64 - 1) as usize
    }

    /// Compact flat index of an in-range cell
    #[inline]
    pub const fn index(&self, x: usize, y: usize) -> usize {
        y * self.n + x
    }

    /// Compact flat index of an arbitrary cell, wrapping both axes
    #[inline]
    pub fn wrapped_index(&self, x: i64, y: i64) -> usize {
        self.index(self.wrap(x), self.wrap(y))
    }

    /// Padded flat index of an in-range cell
    #[inline]
    pub const fn padded_index(&self, x: usize, y: usize) -> usize {
        y * self.padded_stride() + x
    }

    /// Folded wavenumber for row `j` of the spectrum (`j` for `j <= n/2`, else `j - n`)
    #[inline]
    pub fn folded_wavenumber(&self, j: usize) -> f64 {
        if j <= self.n / 2 {
            j as f64
        } else {
            j as f64 - self.n as f64
        }
    }
}
