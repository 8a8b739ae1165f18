//! Pointer drag input
//!
//! Turns window-space cursor motion into force and density commands. A drag
//! pushes the fluid in the direction the cursor moved and drops fresh smoke
//! under it.

use super::commands::Command;
use crate::grid::Grid;
use nalgebra::Vector2;

/// Length of the force added per drag event
pub const DRAG_FORCE: f64 = 0.1;

/// Density written under the cursor per drag event
pub const DRAG_DENSITY: f64 = 10.0;

/// Tracks the cursor between drag events
///
/// Window coordinates have their origin at the top-left corner with y growing
/// downward; grid rows grow upward, so y is flipped on the way in.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerDrag {
    grid: Grid,
    window: Vector2<f64>,
    last: Vector2<f64>,
}

impl PointerDrag {
    /// Create a tracker for `grid` shown in a `width`×`height` window
    ///
    /// The previous cursor position starts at the origin, so the first drag
    /// measures its motion from there.
    pub fn new(grid: Grid, width: f64, height: f64) -> Self {
        Self {
            grid,
            window: Vector2::new(width, height),
            last: Vector2::zeros(),
        }
    }

    /// Update the window size after a resize
    pub fn resize(&mut self, width: f64, height: f64) {
        self.window = Vector2::new(width, height);
    }

    /// Grid cell under a window position, clamped onto the grid
    pub fn cell_at(&self, mx: f64, my: f64) -> (i64, i64) {
        let scale = (self.grid.size() + 1) as f64;
        let x = (scale * mx / self.window.x).floor() as i64;
        let y = (scale * (self.window.y - my) / self.window.y).floor() as i64;
        (self.grid.clamp(x) as i64, self.grid.clamp(y) as i64)
    }

    /// Convert one drag event into commands
    ///
    /// # Returns
    ///
    /// An `InjectForce` along the cursor motion (rescaled to `DRAG_FORCE`
    /// unless the cursor did not move) followed by an `InjectDensity` of
    /// `DRAG_DENSITY`, both at the cell under the cursor.
    pub fn drag(&mut self, mx: f64, my: f64) -> [Command; 2] {
        let (x, y) = self.cell_at(mx, my);

        let cursor = Vector2::new(mx, self.window.y - my);
        let mut delta = cursor - self.last;
        let len = delta.norm();
        if len != 0.0 {
            delta *= DRAG_FORCE / len;
        }
        self.last = cursor;

        [
            Command::InjectForce {
                x,
                y,
                dx: delta.x,
                dy: delta.y,
            },
            Command::InjectDensity {
                x,
                y,
                value: DRAG_DENSITY,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_cell_mapping_flips_y() {
        let pointer = PointerDrag::new(Grid::new(50).unwrap(), 510.0, 510.0);
        // 51 * 100 / 510 = 10; 51 * (510 - 100) / 510 = 41
        assert_eq!(pointer.cell_at(100.0, 100.0), (10, 41));
        assert_eq!(pointer.cell_at(0.0, 510.0), (0, 0));
    }

    #[test]
    fn test_cell_mapping_clamps() {
        let pointer = PointerDrag::new(Grid::new(50).unwrap(), 500.0, 500.0);
        assert_eq!(pointer.cell_at(500.0, 0.0), (49, 49));
        assert_eq!(pointer.cell_at(-20.0, 900.0), (0, 0));
    }

    #[test]
    fn test_smallest_grid_maps_every_position() {
        let pointer = PointerDrag::new(Grid::new(2).unwrap(), 90.0, 90.0);
        assert_eq!(pointer.cell_at(0.0, 90.0), (0, 0));
        assert_eq!(pointer.cell_at(90.0, 0.0), (1, 1));
        assert_eq!(pointer.cell_at(f64::NAN, -1e300), (0, 1));
    }

    #[test]
    fn test_drag_normalizes_motion() {
        let mut pointer = PointerDrag::new(Grid::new(50).unwrap(), 500.0, 500.0);
        pointer.drag(100.0, 400.0);
        let [force, density] = pointer.drag(130.0, 360.0);

        match force {
            Command::InjectForce { dx, dy, .. } => {
                // Moved (30, 40) in grid orientation
                assert_abs_diff_eq!(dx, 0.06, epsilon = 1e-12);
                assert_abs_diff_eq!(dy, 0.08, epsilon = 1e-12);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(
            density,
            Command::InjectDensity {
                x: 13,
                y: 14,
                value: DRAG_DENSITY
            }
        );
    }

    #[test]
    fn test_stationary_drag_adds_no_force() {
        let mut pointer = PointerDrag::new(Grid::new(20).unwrap(), 200.0, 200.0);
        pointer.drag(50.0, 50.0);
        let [force, _] = pointer.drag(50.0, 50.0);
        assert!(matches!(
            force,
            Command::InjectForce { dx, dy, .. } if dx == 0.0 && dy == 0.0
        ));
    }

    #[test]
    fn test_first_drag_measures_from_origin() {
        let mut pointer = PointerDrag::new(Grid::new(10).unwrap(), 100.0, 100.0);
        // Cursor at grid-oriented (0, 100): straight up from the origin
        let [force, _] = pointer.drag(0.0, 0.0);
        match force {
            Command::InjectForce { x, y, dx, dy } => {
                assert_eq!((x, y), (0, 9));
                assert_eq!(dx, 0.0);
                assert_abs_diff_eq!(dy, DRAG_FORCE, epsilon = 1e-15);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
