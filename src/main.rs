use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use traffic_grid::simulation::{
    town, ArrivalPolicy, EntryPolicy, PathPlanner, PhaseDurations, SignalController, Simulator,
    SimulatorConfig,
};

#[derive(Parser)]
#[command(name = "traffic_grid")]
#[command(about = "Headless A* traffic simulation on a grid town")]
struct Cli {
    /// Number of intersections along the x axis
    #[arg(long, default_value = "10")]
    width: u32,

    /// Number of intersections along the y axis
    #[arg(long, default_value = "10")]
    height: u32,

    /// Number of vehicles to spawn with random start and goal
    #[arg(long, default_value = "20")]
    vehicles: usize,

    /// Stop after this many ticks even if vehicles are still travelling
    #[arg(long, default_value = "500")]
    max_ticks: u64,

    /// Seed for town congestion, signal offsets and trips
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Number of roads given a random higher weight
    #[arg(long, default_value = "15")]
    congested_roads: usize,

    /// Ticks each signal stays green
    #[arg(long, default_value = "3")]
    green: u32,

    /// Ticks each signal stays yellow
    #[arg(long, default_value = "1")]
    yellow: u32,

    /// Ticks each signal stays red
    #[arg(long, default_value = "2")]
    red: u32,

    /// Let vehicles enter on yellow as well as green
    #[arg(long)]
    allow_yellow: bool,

    /// Drop vehicles from the simulation once they arrive
    #[arg(long)]
    remove_arrived: bool,

    /// Wall-clock pause between ticks in milliseconds
    #[arg(long, default_value = "0")]
    tick_delay_ms: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    run_headless(&cli)
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli) -> Result<()> {
    info!(
        "Running traffic simulation on a {}x{} grid with {} vehicles (seed {})",
        cli.width, cli.height, cli.vehicles, cli.seed
    );

    let mut rng = StdRng::seed_from_u64(cli.seed);

    let mut network = town::build_grid(cli.width, cli.height, 1.0).context("Failed to build town")?;
    for congestion in town::add_random_congestion(&mut network, &mut rng, cli.congested_roads, 2.0, 6.0)? {
        debug!(
            "Congested road {} -> {} to weight {:.2}",
            congestion.from, congestion.to, congestion.weight
        );
    }

    let entry_policy = if cli.allow_yellow {
        EntryPolicy::GreenOrYellow
    } else {
        EntryPolicy::GreenOnly
    };
    let durations = PhaseDurations::new(cli.green, cli.yellow, cli.red)
        .context("Invalid signal timing")?;
    let mut signals = SignalController::new(entry_policy);
    signals.install_everywhere(&network, durations, &mut rng);

    let config = SimulatorConfig {
        arrival_policy: if cli.remove_arrived {
            ArrivalPolicy::Remove
        } else {
            ArrivalPolicy::Retain
        },
    };
    // Congestion only raises weights, so grid distance stays admissible
    let mut simulator = Simulator::new(network, signals, PathPlanner::manhattan(), config);

    info!("=== SPAWNING VEHICLES ===");
    for _ in 0..cli.vehicles {
        let (start, goal) = town::random_trip(&mut rng, cli.width, cli.height)?;
        simulator
            .spawn_vehicle(start, goal)
            .with_context(|| format!("Failed to spawn vehicle from {} to {}", start, goal))?;
    }

    let mut tick = 0;
    while tick < cli.max_ticks && !simulator.is_complete() {
        let report = simulator.step(tick);
        debug!(
            "Tick {}: {} moved, {} waiting, {} arrived",
            report.tick,
            report.advanced.len(),
            report.waiting.len(),
            report.arrived.len()
        );
        for vehicle in simulator.vehicles() {
            debug!(
                "  Vehicle {} from {} to {} at {}",
                vehicle.id(),
                vehicle.start(),
                vehicle.goal(),
                vehicle.current_position()
            );
        }

        tick += 1;
        if cli.tick_delay_ms > 0 {
            std::thread::sleep(std::time::Duration::from_millis(cli.tick_delay_ms));
        }
    }

    simulator.stats().log_summary();
    Ok(())
}
