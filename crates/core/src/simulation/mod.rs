//! Smoke simulation step orchestrator
//!
//! `SmokeSimulation` owns the grid state, the runtime parameters, the command
//! queue and the run state. Each `tick`:
//!
//! 1. Drains queued commands in submission order (even while paused, so a
//!    `TogglePause` can resume)
//! 2. Returns early if paused
//! 3. Runs forcing, the velocity step and density transport
//! 4. Hands a read-only `Frame` to the caller's `FrameSink`

pub mod commands;
pub mod config;
pub mod forcing;
pub mod pointer;
pub mod stats;

pub use commands::{Command, CommandQueue};
pub use config::{SimulationConfig, SimulationParams, MAX_GRID_SIZE};
pub use forcing::{inject_density, inject_force, prepare_tick};
pub use pointer::{PointerDrag, DRAG_DENSITY, DRAG_FORCE};
pub use stats::FieldStats;

use crate::error::SimResult;
use crate::grid::{Grid, GridState};
use crate::solver::{step_density, step_velocity};
use tracing::{debug, info, trace, warn, Level};

/// Whether ticks advance the fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Ticks advance the simulation
    Running,
    /// Ticks only drain commands
    Paused,
}

impl RunState {
    /// The other state
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Running => Self::Paused,
            Self::Paused => Self::Running,
        }
    }
}

/// Result of one `tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Fields advanced one step and a frame was emitted
    Advanced,
    /// Paused; commands were applied but the fields did not move
    Paused,
}

/// Read-only view of the fields after a completed tick
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Grid geometry
    pub grid: Grid,
    /// Number of advanced ticks so far
    pub tick: u64,
    /// Velocity x component
    pub velocity_x: &'a [f64],
    /// Velocity y component
    pub velocity_y: &'a [f64],
    /// Force x component
    pub force_x: &'a [f64],
    /// Force y component
    pub force_y: &'a [f64],
    /// Smoke density
    pub density: &'a [f64],
}

impl Frame<'_> {
    /// Summary statistics of this frame
    pub fn stats(&self) -> FieldStats {
        FieldStats::compute(self.velocity_x, self.velocity_y, self.density)
    }
}

/// Receives a frame whenever a tick advances the simulation
pub trait FrameSink {
    /// New state is ready to be rendered
    fn frame_ready(&mut self, frame: &Frame<'_>);
}

/// Sink that discards frames
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn frame_ready(&mut self, _frame: &Frame<'_>) {}
}

/// Periodic 2D smoke simulation
#[derive(Debug)]
pub struct SmokeSimulation {
    state: GridState,
    params: SimulationParams,
    commands: CommandQueue,
    run_state: RunState,
    ticks: u64,
}

impl SmokeSimulation {
    /// Create a simulation from a configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Grid size, initial parameters and queue capacity
    ///
    /// # Errors
    ///
    /// - `SimError::InvalidConfig` if `config` fails validation
    /// - `SimError::Allocation` if the field buffers cannot be allocated
    pub fn new(config: &SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        info!(
            "Creating smoke simulation: N={}, dt={}, viscosity={}",
            config.grid_size, config.timestep, config.viscosity
        );

        let state = GridState::initialize(config.grid_size)?;
        let commands = CommandQueue::with_capacity(config.command_capacity)?;
        let run_state = if config.start_paused {
            RunState::Paused
        } else {
            RunState::Running
        };

        Ok(Self {
            state,
            params: config.params(),
            commands,
            run_state,
            ticks: 0,
        })
    }

    /// Queue a command for the next tick
    ///
    /// # Errors
    ///
    /// Returns `SimError::QueueFull` if the queue is at capacity.
    pub fn submit(&mut self, command: Command) -> SimResult<()> {
        self.commands.submit(command)
    }

    /// Advance one tick, discarding the frame
    ///
    /// # Errors
    ///
    /// Returns `SimError::Transform` if the spectral step fails.
    pub fn tick(&mut self) -> SimResult<TickOutcome> {
        self.tick_into(&mut NullSink)
    }

    /// Advance one tick, handing the resulting frame to `sink`
    ///
    /// # Errors
    ///
    /// Returns `SimError::Transform` if the spectral step fails.
    pub fn tick_into<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> SimResult<TickOutcome> {
        self.apply_pending();

        if self.run_state == RunState::Paused {
            return Ok(TickOutcome::Paused);
        }

        let SimulationParams {
            timestep,
            viscosity,
            ..
        } = self.params;

        prepare_tick(&mut self.state, &self.params);
        step_velocity(&mut self.state, timestep, viscosity)?;
        step_density(&mut self.state, timestep);
        self.ticks += 1;

        let frame = self.frame();
        if tracing::enabled!(Level::DEBUG) {
            let stats = frame.stats();
            debug!(
                "Tick {}: density={:.4}, max_speed={:.5}, energy={:.6}",
                self.ticks, stats.total_density, stats.max_speed, stats.kinetic_energy
            );
        }
        sink.frame_ready(&frame);

        Ok(TickOutcome::Advanced)
    }

    fn apply_pending(&mut self) {
        while let Some(command) = self.commands.pop() {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: Command) {
        trace!("Applying {:?}", command);
        match command {
            Command::InjectForce { x, y, dx, dy } => {
                inject_force(&mut self.state, x, y, dx, dy);
            }
            Command::InjectDensity { x, y, value } => {
                inject_density(&mut self.state, x, y, value);
            }
            Command::SetTimestep(value) => {
                self.params.timestep = value;
                warn_if_non_finite("timestep", self.params.timestep);
            }
            Command::AdjustTimestep(delta) => {
                self.params.timestep += delta;
                warn_if_non_finite("timestep", self.params.timestep);
            }
            Command::SetViscosity(value) => {
                self.params.viscosity = value;
                warn_if_non_finite("viscosity", self.params.viscosity);
            }
            Command::ScaleViscosity(factor) => {
                self.params.viscosity *= factor;
                warn_if_non_finite("viscosity", self.params.viscosity);
            }
            Command::TogglePause => {
                self.run_state = self.run_state.toggled();
                info!("Simulation {:?}", self.run_state);
            }
        }
    }

    /// Current fields as a read-only frame
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            grid: self.state.grid(),
            tick: self.ticks,
            velocity_x: &self.state.velocity.x.data,
            velocity_y: &self.state.velocity.y.data,
            force_x: &self.state.force.x.data,
            force_y: &self.state.force.y.data,
            density: &self.state.density.data,
        }
    }

    /// Grid geometry
    pub fn grid(&self) -> Grid {
        self.state.grid()
    }

    /// Underlying grid state
    pub fn state(&self) -> &GridState {
        &self.state
    }

    /// Current runtime parameters
    pub fn params(&self) -> SimulationParams {
        self.params
    }

    /// Running or paused
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Shorthand for `run_state() == RunState::Paused`
    pub fn is_paused(&self) -> bool {
        self.run_state == RunState::Paused
    }

    /// Number of ticks that advanced the fields
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Pending command queue
    pub fn commands(&self) -> &CommandQueue {
        &self.commands
    }
}

fn warn_if_non_finite(name: &str, value: f64) {
    if !value.is_finite() {
        warn!("{} is non-finite ({}), applying anyway", name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        ticks: Vec<u64>,
    }

    impl FrameSink for Recorder {
        fn frame_ready(&mut self, frame: &Frame<'_>) {
            self.ticks.push(frame.tick);
        }
    }

    fn small() -> SmokeSimulation {
        SmokeSimulation::new(&SimulationConfig::with_grid_size(8)).unwrap()
    }

    #[test]
    fn test_tick_emits_frames() {
        let mut sim = small();
        let mut sink = Recorder { ticks: Vec::new() };
        for _ in 0..3 {
            assert_eq!(sim.tick_into(&mut sink).unwrap(), TickOutcome::Advanced);
        }
        assert_eq!(sink.ticks, vec![1, 2, 3]);
        assert_eq!(sim.tick_count(), 3);
    }

    #[test]
    fn test_paused_tick_is_noop() {
        let mut sim = small();
        sim.submit(Command::InjectDensity { x: 2, y: 2, value: 10.0 })
            .unwrap();
        sim.submit(Command::TogglePause).unwrap();

        let mut sink = Recorder { ticks: Vec::new() };
        assert_eq!(sim.tick_into(&mut sink).unwrap(), TickOutcome::Paused);
        assert!(sink.ticks.is_empty());
        assert_eq!(sim.tick_count(), 0);
        // Commands still land while paused
        assert_eq!(sim.state().density.get(2, 2), 10.0);
        assert!(sim.state().density_prev.data.iter().all(|&v| v == 0.0));

        sim.submit(Command::TogglePause).unwrap();
        assert_eq!(sim.tick().unwrap(), TickOutcome::Advanced);
        assert_eq!(sim.run_state(), RunState::Running);
    }

    #[test]
    fn test_parameter_commands() {
        let mut sim = small();
        sim.submit(Command::AdjustTimestep(0.001)).unwrap();
        sim.submit(Command::ScaleViscosity(5.0)).unwrap();
        sim.submit(Command::TogglePause).unwrap();
        sim.tick().unwrap();

        let params = sim.params();
        assert!((params.timestep - 0.041).abs() < 1e-12);
        assert!((params.viscosity - 0.005).abs() < 1e-12);

        sim.submit(Command::SetTimestep(-0.5)).unwrap();
        sim.submit(Command::SetViscosity(f64::INFINITY)).unwrap();
        sim.tick().unwrap();
        assert_eq!(sim.params().timestep, -0.5);
        assert_eq!(sim.params().viscosity, f64::INFINITY);
    }

    #[test]
    fn test_start_paused() {
        let config = SimulationConfig {
            start_paused: true,
            ..SimulationConfig::with_grid_size(4)
        };
        let mut sim = SmokeSimulation::new(&config).unwrap();
        assert!(sim.is_paused());
        assert_eq!(sim.tick().unwrap(), TickOutcome::Paused);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(SmokeSimulation::new(&SimulationConfig::with_grid_size(0)).is_err());
    }
}
