//! Headless engine binary for the Outpost colony simulation.
//!
//! Wires the world builder, survivor spawner, scripted player, and tick
//! loop together and runs one colony from landing to idle.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `outpost-config.yaml` (or the path given as
//!    the first argument)
//! 2. Initialize structured logging (tracing)
//! 3. Build the starting world
//! 4. Spawn survivors around the shelter
//! 5. Assemble simulation state
//! 6. Plan the scripted player
//! 7. Run the simulation loop
//! 8. Haul each survivor's region stock into its inventory
//! 9. Log the colony report

mod director;
mod error;
mod report;
mod scenario;
mod spawner;

use std::path::{Path, PathBuf};

use outpost_agents::SeededRandom;
use outpost_core::collaborators::{RecordingHighlighter, RecordingYieldSink};
use outpost_core::config::SimulationConfig;
use outpost_core::runner::{self, RunOptions};
use outpost_core::tick::{Collaborators, SimulationState};
use outpost_types::JobKind;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::director::Director;
use crate::error::EngineError;
use crate::report::ColonyReport;

/// Default config file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "outpost-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration (logging comes up once the level is known).
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, found) = load_config(&config_path)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("outpost-engine starting");
    if found {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        tick_seconds = config.world.tick_seconds,
        tick_interval_ms = config.world.tick_interval_ms,
        survivors = config.survivors.count,
        "Configuration"
    );

    // 3. Build the starting world.
    let (world, layout) = scenario::build_world(&config.world)?;

    // 4. Spawn survivors.
    let mut rng = SeededRandom::new(config.world.seed);
    let spawned = spawner::spawn_survivors(&config.survivors, &world, layout.shelter, &mut rng)?;
    let survivor_ids = spawned.survivors.clone();

    // 5. Assemble simulation state.
    let mut state = SimulationState::new(&config, world, spawned.roster, rng)?;
    info!(
        regions = state.world.region_count(),
        survivors = state.roster.len(),
        jobs = ?config.jobs.enabled,
        "Simulation state assembled"
    );

    // 6. Plan the scripted player.
    let jobs: Vec<JobKind> = state.coordinator.jobs().kinds().collect();
    let (mut director, mut pointer) =
        Director::plan(&state.world, layout.shelter, &survivor_ids, &jobs);

    // 7. Run the simulation.
    let mut highlighter = RecordingHighlighter::new();
    let mut sink = RecordingYieldSink::new();
    let options = RunOptions::from_config(&config);
    let result = {
        let mut collab = Collaborators {
            pointer: &mut pointer,
            highlighter: &mut highlighter,
            sink: &mut sink,
        };
        runner::run_simulation(&mut state, &mut collab, &options, &mut director).await?
    };
    runner::log_simulation_end(&result);
    info!(
        commits = director.commits(),
        rejections = director.rejections(),
        highlights = highlighter.calls.len(),
        "Player script finished"
    );

    // 8. Haul region stock.
    haul(&mut state);

    // 9. Report.
    let report = ColonyReport::collect(&result, &state, sink.spawned.len());
    let json = serde_json::to_string_pretty(&report).map_err(EngineError::from)?;
    info!(report = %json, "Colony report");

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "outpost-engine shutdown complete"
    );

    Ok(())
}

/// Load the simulation configuration from `path`.
///
/// A missing file falls back to defaults; the flag reports whether the file
/// was found.
fn load_config(path: &Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        Ok((SimulationConfig::from_file(path)?, true))
    } else {
        Ok((SimulationConfig::default(), false))
    }
}

/// Move everything each bound region holds into its survivor's inventory.
fn haul(state: &mut SimulationState) {
    let bindings: Vec<_> = state.coordinator.registry().iter().collect();
    for (survivor, region) in bindings {
        let stock: Vec<_> = state
            .world
            .region(region)
            .map(|r| r.resources().iter().collect())
            .unwrap_or_default();
        for (resource, amount) in stock {
            if let Err(e) = state.coordinator.collect_resource(
                &mut state.world,
                &mut state.roster,
                survivor,
                resource,
                amount,
            ) {
                warn!(survivor = %survivor, region = %region, ?resource, error = %e, "Haul failed");
            }
        }
    }
}
