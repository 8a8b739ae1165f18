//! Simulation handle and its C-compatible operations
#![allow(clippy::not_unsafe_ptr_arg_deref)]

use smoke_sim_core::{Command, SimulationConfig, SmokeSimulation, TickOutcome};
use std::ptr;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{DefaultSmokeSimError, SmokeSimErrorCode};
use crate::helpers::{clear_last_error, track_error, track_result};

/// Opaque handle to a smoke simulation.
///
/// # Thread Safety
/// The simulation is protected by an `RwLock`: buffer copies take a shared
/// read lock, ticks and input take the exclusive write lock. Input submitted
/// from any thread is queued and applied at the start of the next tick.
///
/// Memory is managed by `smoke_sim_new` / `smoke_sim_destroy`.
pub struct SmokeSimInstance {
    pub(crate) sim: RwLock<SmokeSimulation>,
}

impl SmokeSimInstance {
    fn read(&self) -> Result<RwLockReadGuard<'_, SmokeSimulation>, DefaultSmokeSimError> {
        self.sim
            .read()
            .map_err(|_| DefaultSmokeSimError::lock_poisoned("RwLock"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, SmokeSimulation>, DefaultSmokeSimError> {
        self.sim
            .write()
            .map_err(|_| DefaultSmokeSimError::lock_poisoned("RwLock"))
    }
}

fn instance_ref<'a>(
    instance: *const SmokeSimInstance,
) -> Result<&'a SmokeSimInstance, DefaultSmokeSimError> {
    if instance.is_null() {
        return Err(DefaultSmokeSimError::null_pointer("instance"));
    }
    // SAFETY: non-null pointers are required to come from `smoke_sim_new`
    Ok(unsafe { &*instance })
}

fn submit(instance: *const SmokeSimInstance, command: Command) -> SmokeSimErrorCode {
    track_result(instance_ref(instance).and_then(|handle| {
        handle
            .write()?
            .submit(command)
            .map_err(DefaultSmokeSimError::from)
    }))
}

fn write_out<T>(out: *mut T, value: T, name: &str) -> Result<(), DefaultSmokeSimError> {
    if out.is_null() {
        return Err(DefaultSmokeSimError::null_pointer(name));
    }
    // SAFETY: caller guarantees `out` points to writable storage for one `T`
    unsafe { out.write(value) };
    Ok(())
}

fn copy_out(
    source: &[f64],
    out: *mut f64,
    len: usize,
    name: &str,
) -> Result<(), DefaultSmokeSimError> {
    if out.is_null() {
        return Err(DefaultSmokeSimError::null_pointer(name));
    }
    if len < source.len() {
        return Err(DefaultSmokeSimError::buffer_too_small(name, len, source.len()));
    }
    // SAFETY: caller guarantees `out` is valid for `len` writes
    let target = unsafe { std::slice::from_raw_parts_mut(out, source.len()) };
    target.copy_from_slice(source);
    Ok(())
}

/// Creates a new smoke simulation on a `grid_size`×`grid_size` periodic grid.
///
/// # Arguments
/// * `grid_size` - Cells per side (at least 2)
/// * `timestep` - Initial timestep
/// * `viscosity` - Initial viscosity
///
/// # Returns
/// Pointer to `SmokeSimInstance`, or null on error.
/// Check `smoke_sim_get_last_error()` for details.
///
/// # Safety
/// Caller owns the returned pointer and must call `smoke_sim_destroy()`.
#[no_mangle]
pub extern "C" fn smoke_sim_new(
    grid_size: usize,
    timestep: f64,
    viscosity: f64,
) -> *mut SmokeSimInstance {
    let config = SimulationConfig {
        grid_size,
        timestep,
        viscosity,
        ..SimulationConfig::default()
    };
    match SmokeSimulation::new(&config) {
        Ok(sim) => {
            clear_last_error();
            Box::into_raw(Box::new(SmokeSimInstance {
                sim: RwLock::new(sim),
            }))
        }
        Err(error) => {
            track_error(&DefaultSmokeSimError::from(error));
            ptr::null_mut()
        }
    }
}

/// Destroys a simulation instance and frees all memory.
///
/// # Safety
/// - `instance` must have been created by `smoke_sim_new()` (null is a no-op)
/// - After this call, `instance` pointer is invalid
#[no_mangle]
pub extern "C" fn smoke_sim_destroy(instance: *mut SmokeSimInstance) {
    if !instance.is_null() {
        unsafe {
            drop(Box::from_raw(instance));
        }
    }
}

/// Runs one tick: applies queued input, then advances the fields unless paused.
///
/// # Arguments
/// * `instance` - The simulation instance (must not be null)
/// * `out_advanced` - Receives 1 if the fields advanced, 0 if paused (must not be null)
#[no_mangle]
pub extern "C" fn smoke_sim_tick(
    instance: *mut SmokeSimInstance,
    out_advanced: *mut i32,
) -> SmokeSimErrorCode {
    track_result(instance_ref(instance).and_then(|handle| {
        if out_advanced.is_null() {
            return Err(DefaultSmokeSimError::null_pointer("out_advanced"));
        }
        let outcome = handle.write()?.tick().map_err(DefaultSmokeSimError::from)?;
        let advanced = i32::from(outcome == TickOutcome::Advanced);
        write_out(out_advanced, advanced, "out_advanced")
    }))
}

/// Queues a force impulse `(dx, dy)` at a cell. Coordinates clamp to the grid.
///
/// Returns `QueueFull` if the input queue is full; the impulse is dropped.
#[no_mangle]
pub extern "C" fn smoke_sim_inject_force(
    instance: *mut SmokeSimInstance,
    x: i64,
    y: i64,
    dx: f64,
    dy: f64,
) -> SmokeSimErrorCode {
    submit(instance, Command::InjectForce { x, y, dx, dy })
}

/// Queues a density overwrite at a cell. Coordinates clamp to the grid.
#[no_mangle]
pub extern "C" fn smoke_sim_inject_density(
    instance: *mut SmokeSimInstance,
    x: i64,
    y: i64,
    value: f64,
) -> SmokeSimErrorCode {
    submit(instance, Command::InjectDensity { x, y, value })
}

/// Queues a new timestep. Any value is accepted, including zero and negative.
#[no_mangle]
pub extern "C" fn smoke_sim_set_timestep(
    instance: *mut SmokeSimInstance,
    timestep: f64,
) -> SmokeSimErrorCode {
    submit(instance, Command::SetTimestep(timestep))
}

/// Queues a new viscosity. Any value is accepted, including zero and negative.
#[no_mangle]
pub extern "C" fn smoke_sim_set_viscosity(
    instance: *mut SmokeSimInstance,
    viscosity: f64,
) -> SmokeSimErrorCode {
    submit(instance, Command::SetViscosity(viscosity))
}

/// Queues a pause/resume toggle, applied at the next tick.
#[no_mangle]
pub extern "C" fn smoke_sim_toggle_pause(instance: *mut SmokeSimInstance) -> SmokeSimErrorCode {
    submit(instance, Command::TogglePause)
}

/// Reports whether the simulation is currently paused.
#[no_mangle]
pub extern "C" fn smoke_sim_is_paused(
    instance: *const SmokeSimInstance,
    out_paused: *mut bool,
) -> SmokeSimErrorCode {
    track_result(instance_ref(instance).and_then(|handle| {
        let paused = handle.read()?.is_paused();
        write_out(out_paused, paused, "out_paused")
    }))
}

/// Reports the grid side length N. Field buffers hold N*N values.
#[no_mangle]
pub extern "C" fn smoke_sim_grid_size(
    instance: *const SmokeSimInstance,
    out_size: *mut usize,
) -> SmokeSimErrorCode {
    track_result(instance_ref(instance).and_then(|handle| {
        let size = handle.read()?.grid().size();
        write_out(out_size, size, "out_size")
    }))
}

/// Copies the density field (row-major, N*N values) into `out`.
///
/// Returns `BufferTooSmall` if `len < N*N`.
#[no_mangle]
pub extern "C" fn smoke_sim_copy_density(
    instance: *const SmokeSimInstance,
    out: *mut f64,
    len: usize,
) -> SmokeSimErrorCode {
    track_result(instance_ref(instance).and_then(|handle| {
        let sim = handle.read()?;
        copy_out(sim.frame().density, out, len, "out")
    }))
}

/// Copies both velocity components (row-major, N*N values each).
///
/// Returns `BufferTooSmall` if `len < N*N`.
#[no_mangle]
pub extern "C" fn smoke_sim_copy_velocity(
    instance: *const SmokeSimInstance,
    out_x: *mut f64,
    out_y: *mut f64,
    len: usize,
) -> SmokeSimErrorCode {
    track_result(instance_ref(instance).and_then(|handle| {
        let sim = handle.read()?;
        let frame = sim.frame();
        copy_out(frame.velocity_x, out_x, len, "out_x")?;
        copy_out(frame.velocity_y, out_y, len, "out_y")
    }))
}

/// Copies both force components (row-major, N*N values each).
///
/// Returns `BufferTooSmall` if `len < N*N`.
#[no_mangle]
pub extern "C" fn smoke_sim_copy_force(
    instance: *const SmokeSimInstance,
    out_x: *mut f64,
    out_y: *mut f64,
    len: usize,
) -> SmokeSimErrorCode {
    track_result(instance_ref(instance).and_then(|handle| {
        let sim = handle.read()?;
        let frame = sim.frame();
        copy_out(frame.force_x, out_x, len, "out_x")?;
        copy_out(frame.force_y, out_y, len, "out_y")
    }))
}
