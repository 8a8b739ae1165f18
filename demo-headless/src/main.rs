use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smoke_sim_core::{PointerDrag, SimError, SimulationConfig, SmokeSimulation};
use std::error::Error;
use std::f64::consts::TAU;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Window the scripted pointer moves in
const WINDOW_SIZE: f64 = 512.0;

/// Headless smoke simulation driven by a scripted pointer drag
#[derive(Parser, Debug)]
#[command(name = "smoke-sim-demo")]
#[command(about = "Stable-fluids smoke simulation demo", long_about = None)]
struct Args {
    /// Cells per side of the periodic grid
    #[arg(short = 'n', long)]
    grid_size: Option<usize>,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 500)]
    ticks: u64,

    /// Timestep
    #[arg(long, allow_hyphen_values = true)]
    timestep: Option<f64>,

    /// Viscosity
    #[arg(long, allow_hyphen_values = true)]
    viscosity: Option<f64>,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the pointer jitter
    #[arg(short, long, default_value_t = 7)]
    seed: u64,

    /// Print statistics every this many ticks
    #[arg(short, long, default_value_t = 50)]
    report_interval: u64,
}

fn load_config(args: &Args) -> Result<SimulationConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            serde_json::from_str(&std::fs::read_to_string(path)?)?
        }
        None => SimulationConfig::default(),
    };
    if let Some(grid_size) = args.grid_size {
        config.grid_size = grid_size;
    }
    if let Some(timestep) = args.timestep {
        config.timestep = timestep;
    }
    if let Some(viscosity) = args.viscosity {
        config.viscosity = viscosity;
    }
    Ok(config)
}

/// Cursor on a circular orbit around the window center, with seeded jitter
struct Orbit {
    rng: StdRng,
    angle: f64,
}

impl Orbit {
    fn advance(&mut self) -> (f64, f64) {
        self.angle = (self.angle + 0.12 + self.rng.random_range(-0.03..0.03)) % TAU;
        let radius = WINDOW_SIZE * 0.3 + self.rng.random_range(-4.0..4.0);
        let center = WINDOW_SIZE * 0.5;
        (
            center + radius * self.angle.cos(),
            center + radius * self.angle.sin(),
        )
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    println!("=== Smoke Simulation Demo ===\n");
    println!(
        "Grid: {0}x{0}, dt: {1}, viscosity: {2}",
        config.grid_size, config.timestep, config.viscosity
    );

    let mut sim = SmokeSimulation::new(&config)?;
    let mut pointer = PointerDrag::new(sim.grid(), WINDOW_SIZE, WINDOW_SIZE);
    let mut orbit = Orbit {
        rng: StdRng::seed_from_u64(args.seed),
        angle: 0.0,
    };
    let report_interval = args.report_interval.max(1);

    println!("\nRunning {} ticks...\n", args.ticks);
    println!("   Tick |  Density | Max dens | Max speed |     Energy | Mean velocity");
    println!("--------|----------|----------|-----------|------------|--------------------");

    for _ in 0..args.ticks {
        let (mx, my) = orbit.advance();
        for command in pointer.drag(mx, my) {
            match sim.submit(command) {
                Ok(()) => {}
                Err(SimError::QueueFull { capacity }) => {
                    warn!("Input dropped, queue holds {} commands", capacity);
                }
                Err(error) => return Err(error.into()),
            }
        }
        sim.tick()?;

        if sim.tick_count() % report_interval == 0 {
            let stats = sim.frame().stats();
            println!(
                "{:7} | {:8.3} | {:8.3} | {:9.5} | {:10.6} | ({:+.5}, {:+.5})",
                sim.tick_count(),
                stats.total_density,
                stats.max_density,
                stats.max_speed,
                stats.kinetic_energy,
                stats.mean_velocity[0],
                stats.mean_velocity[1]
            );
        }
    }

    let stats = sim.frame().stats();
    println!("\n=== Simulation Complete ===");
    println!("Ticks: {}", sim.tick_count());
    println!("Total density: {:.3}", stats.total_density);
    println!("Max speed: {:.5}", stats.max_speed);
    println!("Dropped commands: {}", sim.commands().dropped());

    Ok(())
}
