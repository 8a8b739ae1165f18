//! Per-frame field diagnostics

use rayon::prelude::*;

/// Summary of one frame's fields
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldStats {
    /// Sum of density over all cells
    pub total_density: f64,
    /// Largest cell density
    pub max_density: f64,
    /// Largest cell speed `|v|`
    pub max_speed: f64,
    /// `0.5 * Σ |v|²` over all cells
    pub kinetic_energy: f64,
    /// Mean velocity `(vx, vy)`, the zero-frequency component of the flow
    pub mean_velocity: [f64; 2],
}

impl FieldStats {
    /// Compute statistics from compact velocity and density slices
    ///
    /// # Arguments
    ///
    /// * `velocity_x` - Velocity x component, one value per cell
    /// * `velocity_y` - Velocity y component, one value per cell
    /// * `density` - Density, one value per cell
    pub fn compute(velocity_x: &[f64], velocity_y: &[f64], density: &[f64]) -> Self {
        let cells = density.len();
        if cells == 0 {
            return Self::default();
        }

        let total_density = density.par_iter().sum::<f64>();
        let max_density = density
            .par_iter()
            .copied()
            .reduce(|| f64::NEG_INFINITY, f64::max);

        let (sum_x, sum_y, sum_sq, max_sq) = velocity_x
            .par_iter()
            .zip(velocity_y.par_iter())
            .map(|(&vx, &vy)| {
                let sq = vx * vx + vy * vy;
                (vx, vy, sq, sq)
            })
            .reduce(
                || (0.0, 0.0, 0.0, 0.0),
                |a, b| (a.0 + b.0, a.1 + b.1, a.2 + b.2, a.3.max(b.3)),
            );

        Self {
            total_density,
            max_density,
            max_speed: max_sq.sqrt(),
            kinetic_energy: 0.5 * sum_sq,
            mean_velocity: [sum_x / cells as f64, sum_y / cells as f64],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_stats_of_simple_fields() {
        let vx = [3.0, 0.0, 0.0, 1.0];
        let vy = [4.0, 0.0, 0.0, -1.0];
        let density = [1.0, 2.0, 0.5, 0.0];

        let stats = FieldStats::compute(&vx, &vy, &density);

        assert_abs_diff_eq!(stats.total_density, 3.5);
        assert_eq!(stats.max_density, 2.0);
        assert_abs_diff_eq!(stats.max_speed, 5.0);
        assert_abs_diff_eq!(stats.kinetic_energy, 0.5 * 27.0);
        assert_abs_diff_eq!(stats.mean_velocity[0], 1.0);
        assert_abs_diff_eq!(stats.mean_velocity[1], 0.75);
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(FieldStats::compute(&[], &[], &[]), FieldStats::default());
    }
}
