//! Simulation configuration
//!
//! `SimulationConfig` is the startup description of a simulation (grid size,
//! initial parameters, queue capacity). It deserializes with every field
//! optional so partial JSON files are valid. `SimulationParams` is the subset
//! that stays mutable while the simulation runs.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// Largest accepted grid side length
pub const MAX_GRID_SIZE: usize = 4096;

/// Startup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Cells per side of the periodic grid
    pub grid_size: usize,
    /// Initial timestep
    pub timestep: f64,
    /// Initial viscosity
    pub viscosity: f64,
    /// Per-tick multiplier applied to density before transport
    pub density_decay: f64,
    /// Per-tick multiplier applied to accumulated force
    pub force_decay: f64,
    /// Maximum number of queued commands between ticks
    pub command_capacity: usize,
    /// Whether the first tick finds the simulation paused
    pub start_paused: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_size: 50,
            timestep: 0.04,
            viscosity: 0.001,
            density_decay: 0.995,
            force_decay: 0.85,
            command_capacity: 1024,
            start_paused: false,
        }
    }
}

impl SimulationConfig {
    /// Default configuration with a different grid size
    #[must_use]
    pub fn with_grid_size(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Self::default()
        }
    }

    /// Check structural limits
    ///
    /// Timestep and viscosity accept any value.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> SimResult<()> {
        if !(2..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(SimError::InvalidConfig {
                field: "grid_size",
                reason: format!("{} is outside 2..={MAX_GRID_SIZE}", self.grid_size),
            });
        }
        if self.command_capacity == 0 {
            return Err(SimError::InvalidConfig {
                field: "command_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        for (field, value) in [
            ("density_decay", self.density_decay),
            ("force_decay", self.force_decay),
        ] {
            if !value.is_finite() {
                return Err(SimError::InvalidConfig {
                    field,
                    reason: format!("{value} is not a finite multiplier"),
                });
            }
        }
        Ok(())
    }

    /// Runtime parameters seeded from this configuration
    #[must_use]
    pub fn params(&self) -> SimulationParams {
        SimulationParams {
            timestep: self.timestep,
            viscosity: self.viscosity,
            density_decay: self.density_decay,
            force_decay: self.force_decay,
        }
    }
}

/// Parameters adjustable between ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    /// Timestep Δt, signed
    pub timestep: f64,
    /// Viscosity ν
    pub viscosity: f64,
    /// Density decay multiplier
    pub density_decay: f64,
    /// Force decay multiplier
    pub force_decay: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationConfig::default().params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.grid_size, 50);
        assert_eq!(config.timestep, 0.04);
        assert_eq!(config.viscosity, 0.001);
        assert_eq!(config.density_decay, 0.995);
        assert_eq!(config.force_decay, 0.85);
        assert!(!config.start_paused);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{ "grid_size": 64, "viscosity": 0.0 }"#).unwrap();
        assert_eq!(config.grid_size, 64);
        assert_eq!(config.viscosity, 0.0);
        assert_eq!(config.timestep, 0.04);
        assert_eq!(config.command_capacity, 1024);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let err = SimulationConfig::with_grid_size(1).validate().unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig { field: "grid_size", .. }));

        let err = SimulationConfig::with_grid_size(MAX_GRID_SIZE + 1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig { field: "grid_size", .. }));

        let config = SimulationConfig {
            command_capacity: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfig { field: "command_capacity", .. })
        ));

        let config = SimulationConfig {
            force_decay: f64::NAN,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfig { field: "force_decay", .. })
        ));
    }

    #[test]
    fn test_negative_timestep_is_valid() {
        let config = SimulationConfig {
            timestep: -0.04,
            viscosity: -1.0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
