//! Tick cycle: the phased loop that drives the Outpost simulation.
//!
//! Each tick runs through these phases:
//!
//! 1. **Clock** -- advance the tick counter.
//! 2. **Input** -- latch a pointer frame and run the region target selector.
//!    A commit binds the region and sends the survivor there.
//! 3. **Work** -- advance every survivor's in-flight task by one tick of
//!    simulated time, in survivor id order, and dispatch follow-ups.
//!
//! The tick cycle is deterministic given the same initial state, seed, and
//! pointer script.

use outpost_agents::{SeededRandom, SurvivorRoster, TaskConfig, YieldTable};
use outpost_world::WorldGrid;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::{ClockError, SimClock};
use crate::collaborators::{Highlighter, PointerInput, YieldSink};
use crate::config::SimulationConfig;
use crate::coordinator::{Coordinator, SurvivorReport, WorkContext};
use crate::error::CoreError;
use crate::jobs::JobRegistry;
use crate::selector::SelectionEvent;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// Region selection failed unexpectedly.
    #[error("coordination error: {source}")]
    Core {
        /// The underlying coordination error.
        #[from]
        source: CoreError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// What the region selector did this tick.
    pub selection: SelectionEvent,
    /// Tasks that completed this tick.
    pub completed: u32,
    /// Tasks that failed validation this tick.
    pub failed: u32,
    /// Survivors with a task in flight at end of tick.
    pub busy_survivors: u32,
    /// Tasks waiting behind in-flight ones at end of tick.
    pub pending_tasks: u32,
    /// No survivor has work and no region selection is open.
    pub idle: bool,
}

/// The mutable simulation state passed through the tick cycle.
#[derive(Debug)]
pub struct SimulationState {
    /// The simulation clock.
    pub clock: SimClock,
    /// The world grid.
    pub world: WorldGrid,
    /// Survivors and their task queues.
    pub roster: SurvivorRoster,
    /// Jobs, bindings, and the region selector.
    pub coordinator: Coordinator,
    /// Seeded dice for yields and names.
    pub rng: SeededRandom,
    /// Movement and action timing.
    pub tasks: TaskConfig,
    /// Yield tables.
    pub yields: YieldTable,
}

impl SimulationState {
    /// Assemble a state around a prepared world and roster.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the configured tick length is
    /// not positive.
    pub fn new(
        config: &SimulationConfig,
        world: WorldGrid,
        roster: SurvivorRoster,
        rng: SeededRandom,
    ) -> Result<Self, ClockError> {
        Ok(Self {
            clock: SimClock::from_config(&config.world)?,
            world,
            roster,
            coordinator: Coordinator::new(JobRegistry::new(config.jobs.enabled.iter().copied())),
            rng,
            tasks: config.tasks,
            yields: config.yields,
        })
    }

    /// Borrow the state as a coordination context.
    pub fn work_context<'a>(&'a mut self, sink: &'a mut dyn YieldSink) -> (&'a mut Coordinator, WorkContext<'a>) {
        (
            &mut self.coordinator,
            WorkContext {
                world: &mut self.world,
                roster: &mut self.roster,
                rng: &mut self.rng,
                sink,
                tasks: &self.tasks,
                yields: &self.yields,
            },
        )
    }
}

/// Presentation-side collaborators for one tick.
pub struct Collaborators<'a> {
    /// Pointer input.
    pub pointer: &'a mut dyn PointerInput,
    /// Region highlighting.
    pub highlighter: &'a mut dyn Highlighter,
    /// Yield spawning.
    pub sink: &'a mut dyn YieldSink,
}

/// Execute one complete tick.
///
/// # Errors
///
/// Returns [`TickError`] if the clock overflows or the selector hits a
/// region missing from the grid. Task failures and rejected selections are
/// reported in the summary and logs, not as errors.
pub fn run_tick(
    state: &mut SimulationState,
    collab: &mut Collaborators<'_>,
) -> Result<TickSummary, TickError> {
    // --- Phase 1: Clock ---
    let tick = state.clock.advance()?;
    let dt = state.clock.tick_seconds();
    debug!(tick, "Tick started");

    // --- Phase 2: Input ---
    collab.pointer.begin_frame();
    let (coordinator, mut ctx) = state.work_context(&mut *collab.sink);
    let selection = coordinator.poll_selection(&mut ctx, &*collab.pointer, &mut *collab.highlighter)?;
    if let SelectionEvent::Committed { binding, job } = selection {
        info!(tick, survivor = %binding.survivor, region = %binding.region, job = %job, "Region committed");
    }

    // --- Phase 3: Work ---
    let reports = coordinator.advance_tasks(&mut ctx, dt);
    let (completed, failed) = tally(tick, &reports);

    let busy = state
        .roster
        .ids()
        .into_iter()
        .filter_map(|id| state.roster.entry(id))
        .filter(|e| e.tasks.is_busy())
        .count();
    let pending = state
        .roster
        .ids()
        .into_iter()
        .filter_map(|id| state.roster.entry(id))
        .fold(0_usize, |acc, e| acc.saturating_add(e.tasks.pending_len()));
    let idle = state.roster.all_idle() && !state.coordinator.selector().is_selecting();

    Ok(TickSummary {
        tick,
        selection,
        completed,
        failed,
        busy_survivors: u32::try_from(busy).unwrap_or(u32::MAX),
        pending_tasks: u32::try_from(pending).unwrap_or(u32::MAX),
        idle,
    })
}

/// Count completed and failed reports, logging each failure.
fn tally(tick: u64, reports: &[SurvivorReport]) -> (u32, u32) {
    let mut completed = 0_u32;
    let mut failed = 0_u32;
    for r in reports {
        match &r.report.outcome {
            outpost_agents::TaskOutcome::Completed => completed = completed.saturating_add(1),
            outpost_agents::TaskOutcome::Failed(reason) => {
                warn!(
                    tick,
                    survivor = %r.survivor,
                    ticket = %r.report.ticket,
                    tile = %r.report.task.tile(),
                    reason = %reason,
                    "Task failed"
                );
                failed = failed.saturating_add(1);
            }
        }
    }
    (completed, failed)
}
