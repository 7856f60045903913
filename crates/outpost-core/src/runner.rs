//! Simulation loop runner.
//!
//! This module provides [`run_simulation`], the top-level async function
//! that drives the tick loop:
//!
//! - **Bounded simulation**: stop after `max_ticks`
//! - **Idle stop**: optionally stop once no survivor has work, no region
//!   selection is open, and the callback has no more input queued
//! - **Pacing**: sleep `tick_interval_ms` between ticks (0 runs flat out)
//!
//! The runner wraps the single-tick [`run_tick`] function and adds the
//! control plane around it.
//!
//! [`run_tick`]: crate::tick::run_tick

use serde::Serialize;
use tracing::{info, warn};

use crate::config::SimulationConfig;
use crate::tick::{self, Collaborators, SimulationState, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Why the simulation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SimulationEndReason {
    /// The configured tick limit was reached.
    MaxTicksReached,
    /// Nothing left to do and no input pending.
    ColonyIdle,
}

/// Loop boundaries and pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Stop after this many ticks (0 = unbounded).
    pub max_ticks: u64,
    /// Stop once the colony is idle.
    pub stop_when_idle: bool,
    /// Real-time milliseconds between ticks.
    pub tick_interval_ms: u64,
}

impl RunOptions {
    /// Options from the loaded configuration.
    pub const fn from_config(config: &SimulationConfig) -> Self {
        Self {
            max_ticks: config.simulation.max_ticks,
            stop_when_idle: config.simulation.stop_when_idle,
            tick_interval_ms: config.world.tick_interval_ms,
        }
    }

    const fn tick_limit_reached(&self, tick: u64) -> bool {
        self.max_ticks > 0 && tick >= self.max_ticks
    }
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Hooks around each tick.
///
/// A callback can act as the player: [`before_tick`](Self::before_tick)
/// gets mutable state so it can select survivors and press job buttons,
/// and [`has_pending_input`](Self::has_pending_input) keeps an idle colony
/// running while scripted input is still to come.
pub trait TickCallback: Send {
    /// Called before tick `tick` runs.
    fn before_tick(&mut self, _tick: u64, _state: &mut SimulationState) {}

    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);

    /// Whether more input is scheduled after the last completed tick.
    fn has_pending_input(&self) -> bool {
        false
    }
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails unrecoverably.
pub async fn run_simulation(
    state: &mut SimulationState,
    collab: &mut Collaborators<'_>,
    options: &RunOptions,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = options.max_ticks,
        stop_when_idle = options.stop_when_idle,
        tick_interval_ms = options.tick_interval_ms,
        survivors = state.roster.len(),
        "Simulation starting"
    );

    loop {
        // --- Player hooks ---
        let next = state.clock.tick().saturating_add(1);
        callback.before_tick(next, state);

        // --- Execute tick ---
        let summary = tick::run_tick(state, collab)?;

        total_ticks = total_ticks.saturating_add(1);

        // --- Notify callback ---
        callback.on_tick(&summary, state);

        // --- Check tick limit ---
        if options.tick_limit_reached(summary.tick) {
            info!(
                tick = summary.tick,
                max_ticks = options.max_ticks,
                "Tick limit reached"
            );
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::MaxTicksReached,
                final_summary: Some(summary),
                total_ticks,
            });
        }

        // --- Check idle colony ---
        if options.stop_when_idle && summary.idle && !callback.has_pending_input() {
            info!(tick = summary.tick, "Colony idle");
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::ColonyIdle,
                final_summary: Some(summary),
                total_ticks,
            });
        }

        // --- Sleep for tick interval ---
        if options.tick_interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(options.tick_interval_ms)).await;
        }
    }
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            busy_survivors = summary.busy_survivors,
            pending_tasks = summary.pending_tasks,
            idle = summary.idle,
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}
