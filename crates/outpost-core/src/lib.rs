//! Jobs, region targeting, assignment, and the tick cycle for the Outpost
//! simulation.
//!
//! This crate turns player intent into survivor work: a job button hands a
//! survivor to the region target selector, a committed region is bound in
//! the assignment registry, and the coordinator queues the job's task chain
//! on the survivor's task queue. The tick cycle drives all of it.
//!
//! # Modules
//!
//! - [`clock`] -- Tick counter with a fixed simulated step.
//! - [`collaborators`] -- Pointer, highlight, and yield-spawn interfaces
//!   with scripted and recording implementations.
//! - [`config`] -- Configuration loading from `outpost-config.yaml` into
//!   strongly-typed structs.
//! - [`coordinator`] -- [`Coordinator`]: job assignment, region binding,
//!   task dispatch, and resource collection.
//! - [`error`] -- [`CoreError`].
//! - [`jobs`] -- [`Job`] behaviours and the [`JobRegistry`].
//! - [`registry`] -- [`AssignmentRegistry`]: survivor to region bindings.
//! - [`runner`] -- The async simulation loop.
//! - [`selector`] -- [`RegionTargetSelector`] state machine.
//! - [`tick`] -- The phased tick cycle.

pub mod clock;
pub mod collaborators;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod jobs;
pub mod registry;
pub mod runner;
pub mod selector;
pub mod tick;

pub use coordinator::{Coordinator, SurvivorReport, WorkContext};
pub use error::CoreError;
pub use jobs::{Job, JobRegistry};
pub use registry::{AssignmentRegistry, Binding};
pub use selector::{RegionTargetSelector, Rejection, SelectionEvent, SelectorState};
