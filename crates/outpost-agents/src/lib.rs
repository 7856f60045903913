//! Survivors, task chains, and task queues for the Outpost simulation.
//!
//! # Modules
//!
//! - [`error`] -- Error types for roster operations.
//! - [`executor`] -- [`TaskQueue`]: strictly ordered, one-in-flight task
//!   execution with completion reports.
//! - [`random`] -- [`RandomSource`] and its seeded and scripted sources.
//! - [`roster`] -- [`SurvivorRoster`]: survivors, their queues, the name
//!   pool, and player selection.
//! - [`survivor`] -- [`Survivor`] state.
//! - [`task`] -- [`Task`] variants and their suspend/resume execution.
//! - [`yields`] -- Yield tables rolled when actions complete.

pub mod error;
pub mod executor;
pub mod random;
pub mod roster;
pub mod survivor;
pub mod task;
pub mod yields;

pub use error::AgentError;
pub use executor::{TaskQueue, TaskReport, TaskTicket};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use roster::{SurvivorEntry, SurvivorRoster};
pub use survivor::{Survivor, SurvivorStats};
pub use task::{
    FollowUp, NoOpSink, Progress, Step, Task, TaskConfig, TaskContext, TaskFailure, TaskOutcome,
    YieldSink,
};
pub use yields::{PropYield, YieldRange, YieldRoll, YieldTable};
