//! Bounded command queue
//!
//! External input (pointer drags, key presses, FFI calls) never writes into
//! field buffers directly. It submits `Command`s here, and the orchestrator
//! drains the queue at the start of each tick, before the forcing phase.
//! The queue is allocated once at its full capacity and rejects submissions
//! beyond it.

use crate::error::{SimError, SimResult};
use std::collections::VecDeque;
use tracing::warn;

/// Input accepted between ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Add `(dx, dy)` to the force at a cell (coordinates clamp to the grid)
    InjectForce {
        /// Cell column
        x: i64,
        /// Cell row
        y: i64,
        /// Force x component
        dx: f64,
        /// Force y component
        dy: f64,
    },
    /// Overwrite the density at a cell (coordinates clamp to the grid)
    InjectDensity {
        /// Cell column
        x: i64,
        /// Cell row
        y: i64,
        /// New density value
        value: f64,
    },
    /// Replace the timestep
    SetTimestep(f64),
    /// Add to the timestep
    AdjustTimestep(f64),
    /// Replace the viscosity
    SetViscosity(f64),
    /// Multiply the viscosity
    ScaleViscosity(f64),
    /// Switch between running and paused
    TogglePause,
}

/// Fixed-capacity FIFO of pending commands
#[derive(Debug)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
    capacity: usize,
    dropped: u64,
}

impl CommandQueue {
    /// Allocate a queue holding at most `capacity` commands
    ///
    /// # Errors
    ///
    /// - `SimError::InvalidConfig` if `capacity` is zero
    /// - `SimError::Allocation` if the storage cannot be reserved
    pub fn with_capacity(capacity: usize) -> SimResult<Self> {
        if capacity == 0 {
            return Err(SimError::InvalidConfig {
                field: "command_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        let mut pending = VecDeque::new();
        pending
            .try_reserve_exact(capacity)
            .map_err(|_| SimError::Allocation {
                bytes: capacity.saturating_mul(std::mem::size_of::<Command>()),
            })?;
        Ok(Self {
            pending,
            capacity,
            dropped: 0,
        })
    }

    /// Enqueue a command for the next tick
    ///
    /// # Errors
    ///
    /// Returns `SimError::QueueFull` when `capacity` commands are already
    /// pending. The command is discarded and counted in `dropped()`.
    pub fn submit(&mut self, command: Command) -> SimResult<()> {
        if self.pending.len() >= self.capacity {
            self.dropped += 1;
            warn!(
                "Command queue full ({} pending), dropping {:?}",
                self.capacity, command
            );
            return Err(SimError::QueueFull {
                capacity: self.capacity,
            });
        }
        self.pending.push_back(command);
        Ok(())
    }

    /// Remove the oldest pending command
    pub fn pop(&mut self) -> Option<Command> {
        self.pending.pop_front()
    }

    /// Number of pending commands
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no commands are pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Maximum number of pending commands
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Commands rejected since creation
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
