//! Task variants and their per-tick execution.
//!
//! A [`Task`] is one step of a job: walk to a tile, or perform a timed
//! action on a prop. Tasks that span time do not block: [`Task::start`]
//! either finishes immediately or hands back a [`Progress`] record which
//! the owning queue resumes once per tick with the tick's elapsed time.
//!
//! Every path ends in a [`TaskOutcome`]. Validation problems are reported as
//! [`TaskFailure`] inside the outcome, never as an `Err`, so a bad task can
//! never wedge its queue.

use outpost_types::{ActionKind, JobKind, Position, PropId, Resource, TileCoord};
use outpost_world::{WorldError, WorldGrid};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::random::RandomSource;
use crate::survivor::Survivor;
use crate::yields::YieldTable;

// ---------------------------------------------------------------------------
// Task definitions
// ---------------------------------------------------------------------------

/// Work to dispatch once a task completes successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowUp {
    /// Build and enqueue the job's work chain for the survivor's region.
    PerformJob(JobKind),
}

/// One executable step of a survivor's behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    /// Walk in a straight line to a tile.
    MoveToTarget {
        /// Destination tile.
        tile: TileCoord,
        /// Dispatched when the survivor arrives.
        then: Option<FollowUp>,
    },
    /// Perform a timed action on the prop standing on a tile.
    PerformAction {
        /// Tile holding the target prop.
        tile: TileCoord,
        /// The prop the action was planned against.
        prop: PropId,
        /// What to do to it.
        action: ActionKind,
    },
}

impl Task {
    /// A move with no follow-up.
    pub const fn move_to(tile: TileCoord) -> Self {
        Self::MoveToTarget { tile, then: None }
    }

    /// The tile this task is about.
    pub const fn tile(&self) -> TileCoord {
        match *self {
            Self::MoveToTarget { tile, .. } | Self::PerformAction { tile, .. } => tile,
        }
    }

    /// The follow-up to dispatch on success, if any.
    pub const fn follow_up(&self) -> Option<FollowUp> {
        match *self {
            Self::MoveToTarget { then, .. } => then,
            Self::PerformAction { .. } => None,
        }
    }
}

/// Why a task ended without doing its work.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskFailure {
    /// The target tile does not exist.
    #[error("tile {0} does not exist")]
    TileNotFound(TileCoord),

    /// The tile is occupied by something the survivor's job may not approach.
    #[error("tile {tile} is occupied and not workable for job {job:?}")]
    TileBlocked {
        /// The occupied tile.
        tile: TileCoord,
        /// The survivor's job at validation time.
        job: Option<JobKind>,
    },

    /// The prop the action was planned against is gone.
    #[error("target on tile {tile} no longer exists")]
    TargetMissing {
        /// Tile that held the prop.
        tile: TileCoord,
    },

    /// The action does not apply to the prop on the tile.
    #[error("cannot {action:?} the prop on tile {tile}")]
    WrongTarget {
        /// Tile holding the prop.
        tile: TileCoord,
        /// The attempted action.
        action: ActionKind,
    },

    /// The rolled yield could not be credited to the region ledger.
    #[error("yield deposit failed: {0}")]
    Deposit(#[source] WorldError),
}

/// How a task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The task did its work.
    Completed,
    /// The task gave up; the queue moves on regardless.
    Failed(TaskFailure),
}

impl TaskOutcome {
    /// Whether the task completed successfully.
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

// ---------------------------------------------------------------------------
// Execution context
// ---------------------------------------------------------------------------

/// Movement and action timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// A move finishes once the survivor is within this distance of its
    /// destination.
    #[serde(default = "default_arrival_epsilon")]
    pub arrival_epsilon: f32,
    /// Simulated seconds an action takes.
    #[serde(default = "default_action_seconds")]
    pub action_seconds: f32,
}

const fn default_arrival_epsilon() -> f32 {
    0.1
}

const fn default_action_seconds() -> f32 {
    2.0
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            arrival_epsilon: default_arrival_epsilon(),
            action_seconds: default_action_seconds(),
        }
    }
}

/// Receives yields when an action completes.
pub trait YieldSink {
    /// Spawn `primary` and `secondary` resources at `tile`.
    fn spawn_yield(&mut self, tile: TileCoord, primary: (Resource, u32), secondary: (Resource, u32));
}

/// A sink that drops every yield.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

impl YieldSink for NoOpSink {
    fn spawn_yield(&mut self, _tile: TileCoord, _primary: (Resource, u32), _secondary: (Resource, u32)) {}
}

/// Everything a task touches while it runs.
pub struct TaskContext<'a> {
    /// The survivor executing the task.
    pub survivor: &'a mut Survivor,
    /// The world grid.
    pub world: &'a mut WorldGrid,
    /// Dice for yield rolls.
    pub rng: &'a mut dyn RandomSource,
    /// Where completed yields are announced.
    pub sink: &'a mut dyn YieldSink,
    /// Movement and action timing.
    pub config: &'a TaskConfig,
    /// Yield definitions.
    pub yields: &'a YieldTable,
}

// ---------------------------------------------------------------------------
// Suspension state
// ---------------------------------------------------------------------------

/// Resume state of a task that spans ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Progress {
    /// Walking toward `destination`.
    Travelling {
        /// Where the survivor's center should end up.
        destination: Position,
    },
    /// Performing an action; `remaining` simulated seconds to go.
    Working {
        /// Seconds left before the action resolves.
        remaining: f32,
    },
}

/// Result of starting or resuming a task.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The task has ended.
    Finished(TaskOutcome),
    /// The task needs more ticks.
    Suspended(Progress),
}

impl Task {
    /// Begin executing this task.
    pub fn start(&self, ctx: &mut TaskContext<'_>) -> Step {
        match *self {
            Self::MoveToTarget { tile, .. } => start_move(tile, ctx),
            Self::PerformAction { tile, prop, action } => start_action(tile, prop, action, ctx),
        }
    }

    /// Advance a suspended task by `dt` simulated seconds.
    pub fn resume(&self, progress: Progress, ctx: &mut TaskContext<'_>, dt: f32) -> Step {
        match (*self, progress) {
            (Self::MoveToTarget { .. }, Progress::Travelling { destination }) => {
                step_move(destination, ctx, dt)
            }
            (Self::PerformAction { tile, prop, action }, Progress::Working { remaining }) => {
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    Step::Suspended(Progress::Working { remaining })
                } else {
                    Step::Finished(finish_action(tile, prop, action, ctx))
                }
            }
            // A progress record from another variant cannot be resumed; restart.
            _ => self.start(ctx),
        }
    }
}

// ---------------------------------------------------------------------------
// MoveToTarget
// ---------------------------------------------------------------------------

fn start_move(tile: TileCoord, ctx: &mut TaskContext<'_>) -> Step {
    let survivor = ctx.survivor.id;
    let Some(target) = ctx.world.tile(tile) else {
        debug!(survivor = %survivor, tile = %tile, "Move target does not exist");
        return Step::Finished(TaskOutcome::Failed(TaskFailure::TileNotFound(tile)));
    };

    // Free, or holding a prop this survivor's job is licensed to work.
    let licensed = ctx
        .survivor
        .job
        .zip(target.occupant())
        .is_some_and(|(job, prop)| job.target_prop() == prop.kind);
    if target.is_occupied() && !licensed {
        debug!(survivor = %survivor, tile = %tile, job = ?ctx.survivor.job, "Tile is occupied, cannot move there");
        return Step::Finished(TaskOutcome::Failed(TaskFailure::TileBlocked {
            tile,
            job: ctx.survivor.job,
        }));
    }

    let destination = target.position().raised(ctx.survivor.half_height());
    debug!(survivor = %survivor, tile = %tile, "Moving to tile");
    if arrived(ctx.survivor.position, destination, ctx.config.arrival_epsilon) {
        return Step::Finished(TaskOutcome::Completed);
    }
    Step::Suspended(Progress::Travelling { destination })
}

fn step_move(destination: Position, ctx: &mut TaskContext<'_>, dt: f32) -> Step {
    let max_delta = ctx.survivor.stats.speed * dt;
    ctx.survivor.position = ctx.survivor.position.move_towards(destination, max_delta);
    if arrived(ctx.survivor.position, destination, ctx.config.arrival_epsilon) {
        debug!(survivor = %ctx.survivor.id, "Arrived");
        Step::Finished(TaskOutcome::Completed)
    } else {
        Step::Suspended(Progress::Travelling { destination })
    }
}

/// Standing on the destination always counts, whatever the tolerance.
fn arrived(position: Position, destination: Position, epsilon: f32) -> bool {
    position.distance(destination) <= epsilon.max(0.0)
}

// ---------------------------------------------------------------------------
// PerformAction
// ---------------------------------------------------------------------------

fn check_target(
    tile: TileCoord,
    prop: PropId,
    action: ActionKind,
    world: &WorldGrid,
) -> Result<(), TaskFailure> {
    let Some(current) = world.prop_at(tile).filter(|p| p.id == prop) else {
        return Err(TaskFailure::TargetMissing { tile });
    };
    if current.kind.action() != action {
        return Err(TaskFailure::WrongTarget { tile, action });
    }
    Ok(())
}

fn start_action(tile: TileCoord, prop: PropId, action: ActionKind, ctx: &mut TaskContext<'_>) -> Step {
    if let Err(failure) = check_target(tile, prop, action, ctx.world) {
        debug!(survivor = %ctx.survivor.id, tile = %tile, ?action, %failure, "Action target invalid");
        return Step::Finished(TaskOutcome::Failed(failure));
    }
    debug!(survivor = %ctx.survivor.id, tile = %tile, ?action, "Action started");
    if ctx.config.action_seconds > 0.0 {
        Step::Suspended(Progress::Working {
            remaining: ctx.config.action_seconds,
        })
    } else {
        Step::Finished(finish_action(tile, prop, action, ctx))
    }
}

fn finish_action(
    tile: TileCoord,
    prop: PropId,
    action: ActionKind,
    ctx: &mut TaskContext<'_>,
) -> TaskOutcome {
    // The prop may have been removed while the action was running.
    if let Err(failure) = check_target(tile, prop, action, ctx.world) {
        debug!(survivor = %ctx.survivor.id, tile = %tile, ?action, %failure, "Action target vanished");
        return TaskOutcome::Failed(failure);
    }
    let Some(removed) = ctx.world.take_prop(tile, prop) else {
        return TaskOutcome::Failed(TaskFailure::TargetMissing { tile });
    };

    let roll = ctx.yields.for_prop(removed.kind).roll(ctx.rng);
    if let Err(e) = ctx.world.deposit_yield(tile, &[roll.primary, roll.secondary]) {
        debug!(survivor = %ctx.survivor.id, tile = %tile, error = %e, "Could not deposit yield");
        return TaskOutcome::Failed(TaskFailure::Deposit(e));
    }
    ctx.sink.spawn_yield(tile, roll.primary, roll.secondary);

    info!(
        survivor = %ctx.survivor.id,
        tile = %tile,
        ?action,
        primary = ?roll.primary,
        secondary = ?roll.secondary,
        "Action completed"
    );
    TaskOutcome::Completed
}
