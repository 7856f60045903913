//! Job/task coordination.
//!
//! The [`Coordinator`] owns the job registry, the assignment registry, and
//! the region target selector, and glues them to the survivors' task
//! queues:
//!
//! 1. A job button calls [`Coordinator::assign_job`], which hands the
//!    survivor to the selector.
//! 2. [`Coordinator::poll_selection`] runs the selector for one frame. On
//!    commit it enqueues a move to the nearest free tile of the new region,
//!    tagged with a `PerformJob` follow-up.
//! 3. [`Coordinator::advance_tasks`] advances every queue and dispatches
//!    follow-ups from completed tasks, which enqueue the job's work chain.
//!
//! All collaborators arrive through a [`WorkContext`] built by the caller,
//! so nothing here reaches for global state.

use outpost_agents::{
    FollowUp, RandomSource, SurvivorEntry, SurvivorRoster, Task, TaskConfig, TaskContext,
    TaskQueue, TaskReport, YieldSink, YieldTable,
};
use outpost_types::{JobKind, RegionCoord, Resource, SurvivorId};
use outpost_world::WorldGrid;
use tracing::{debug, info, warn};

use crate::collaborators::{Highlighter, PointerInput};
use crate::error::CoreError;
use crate::jobs::{Job, JobRegistry};
use crate::registry::{AssignmentRegistry, Binding};
use crate::selector::{RegionTargetSelector, SelectionEvent};

/// Mutable world state and collaborators for one coordination step.
pub struct WorkContext<'a> {
    /// The world grid.
    pub world: &'a mut WorldGrid,
    /// Survivors and their queues.
    pub roster: &'a mut SurvivorRoster,
    /// Dice for yield rolls.
    pub rng: &'a mut dyn RandomSource,
    /// Where completed yields are announced.
    pub sink: &'a mut dyn YieldSink,
    /// Movement and action timing.
    pub tasks: &'a TaskConfig,
    /// Yield definitions.
    pub yields: &'a YieldTable,
}

/// A finished task, attributed to its survivor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurvivorReport {
    /// Survivor that ran the task.
    pub survivor: SurvivorId,
    /// The report from its queue.
    pub report: TaskReport,
}

/// Glue between jobs, region binding, and task queues.
#[derive(Debug, Clone, Default)]
pub struct Coordinator {
    jobs: JobRegistry,
    registry: AssignmentRegistry,
    selector: RegionTargetSelector,
}

impl Coordinator {
    /// Create a coordinator with the given job registry.
    pub const fn new(jobs: JobRegistry) -> Self {
        Self {
            jobs,
            registry: AssignmentRegistry::new(),
            selector: RegionTargetSelector::new(),
        }
    }

    /// The enabled jobs.
    pub const fn jobs(&self) -> &JobRegistry {
        &self.jobs
    }

    /// The survivor ↔ region bindings.
    pub const fn registry(&self) -> &AssignmentRegistry {
        &self.registry
    }

    /// The region target selector.
    pub const fn selector(&self) -> &RegionTargetSelector {
        &self.selector
    }

    // -------------------------------------------------------------------
    // Job assignment
    // -------------------------------------------------------------------

    /// Give `survivor` the job `kind` and start region targeting.
    ///
    /// # Errors
    ///
    /// [`CoreError::JobNotRegistered`] or [`CoreError::SurvivorNotFound`];
    /// nothing changes.
    pub fn assign_job(
        &mut self,
        roster: &mut SurvivorRoster,
        survivor: SurvivorId,
        kind: JobKind,
    ) -> Result<(), CoreError> {
        let job = self.jobs.get(kind)?;
        let target = roster
            .get_mut(survivor)
            .ok_or(CoreError::SurvivorNotFound(survivor))?;
        job.assign(target, &mut self.selector);
        Ok(())
    }

    /// [`assign_job`](Self::assign_job) for the roster's selected survivor.
    ///
    /// # Errors
    ///
    /// [`CoreError::NoSurvivorSelected`] when nobody is selected.
    pub fn assign_job_to_selected(
        &mut self,
        roster: &mut SurvivorRoster,
        kind: JobKind,
    ) -> Result<SurvivorId, CoreError> {
        let Some(survivor) = roster.selected() else {
            warn!(job = %kind, "No survivor selected");
            return Err(CoreError::NoSurvivorSelected);
        };
        self.assign_job(roster, survivor, kind)?;
        Ok(survivor)
    }

    // -------------------------------------------------------------------
    // Region binding
    // -------------------------------------------------------------------

    /// Run the region target selector for one frame.
    ///
    /// On a successful commit the survivor is sent to its new region. A
    /// region without a free tile is logged; the binding still stands.
    ///
    /// # Errors
    ///
    /// Only unexpected world lookups fail; rejected commits come back as
    /// [`SelectionEvent::Rejected`].
    pub fn poll_selection(
        &mut self,
        ctx: &mut WorkContext<'_>,
        pointer: &dyn PointerInput,
        highlighter: &mut dyn Highlighter,
    ) -> Result<SelectionEvent, CoreError> {
        let event = self
            .selector
            .update(ctx.world, &mut self.registry, pointer, highlighter)?;
        if let SelectionEvent::Committed { binding, job } = event
            && let Err(e) = self.send_to_region(ctx, &binding, job)
        {
            warn!(survivor = %binding.survivor, region = %binding.region, error = %e, "Survivor not dispatched to region");
        }
        Ok(event)
    }

    /// Bind `survivor` to `region` without going through the selector.
    ///
    /// Applies the same checks as a commit: the survivor's job must accept
    /// the region's terrain and the region must be unassigned.
    ///
    /// # Errors
    ///
    /// [`CoreError::NoJob`], [`CoreError::InvalidRegionForJob`] or
    /// [`CoreError::RegionAlreadyAssigned`]; nothing is bound.
    pub fn bind_region(
        &mut self,
        ctx: &mut WorkContext<'_>,
        survivor: SurvivorId,
        region: RegionCoord,
    ) -> Result<Binding, CoreError> {
        let job = ctx
            .roster
            .get(survivor)
            .ok_or(CoreError::SurvivorNotFound(survivor))?
            .job
            .ok_or(CoreError::NoJob(survivor))?;
        let region_type = ctx.world.require_region(region)?.region_type();
        if !Job::from_kind(job).is_valid_region(region_type) {
            warn!(survivor = %survivor, region = %region, ?region_type, job = %job, "Invalid region type for job");
            return Err(CoreError::InvalidRegionForJob {
                region,
                region_type,
                job,
            });
        }
        let binding = self.registry.bind(ctx.world, survivor, region)?;
        if let Err(e) = self.send_to_region(ctx, &binding, job) {
            warn!(survivor = %survivor, region = %region, error = %e, "Survivor not dispatched to region");
        }
        Ok(binding)
    }

    /// Walk the survivor to the nearest free tile of its new region, with
    /// the job chain to follow on arrival.
    fn send_to_region(
        &self,
        ctx: &mut WorkContext<'_>,
        binding: &Binding,
        job: JobKind,
    ) -> Result<(), CoreError> {
        let from = ctx
            .roster
            .get(binding.survivor)
            .ok_or(CoreError::SurvivorNotFound(binding.survivor))?
            .position;
        let tile = ctx
            .world
            .nearest_free_tile(binding.region, from)
            .ok_or(CoreError::NoFreeTile(binding.region))?;
        debug!(survivor = %binding.survivor, region = %binding.region, tile = %tile, "Heading to region");
        let task = Task::MoveToTarget {
            tile,
            then: Some(FollowUp::PerformJob(job)),
        };
        with_queue(ctx, binding.survivor, |queue, task_ctx| {
            queue.enqueue(task, task_ctx);
        })?;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Work
    // -------------------------------------------------------------------

    /// Build `kind`'s work chain for the survivor's bound region and
    /// enqueue it. Returns the number of tasks enqueued.
    ///
    /// # Errors
    ///
    /// [`CoreError::NoRegionBound`] or [`CoreError::JobNotRegistered`];
    /// nothing is enqueued.
    pub fn perform_job(
        &self,
        ctx: &mut WorkContext<'_>,
        survivor: SurvivorId,
        kind: JobKind,
    ) -> Result<usize, CoreError> {
        self.enqueue_job_chain(ctx, survivor, kind)
    }

    fn enqueue_job_chain(
        &self,
        ctx: &mut WorkContext<'_>,
        survivor: SurvivorId,
        kind: JobKind,
    ) -> Result<usize, CoreError> {
        let region = self.registry.lookup(survivor).inspect_err(|_| {
            warn!(survivor = %survivor, "No region bound to survivor");
        })?;
        let job = self.jobs.get(kind)?;
        let worker = ctx
            .roster
            .get(survivor)
            .ok_or(CoreError::SurvivorNotFound(survivor))?;
        let tasks = job.perform_job(worker, ctx.world.require_region(region)?);
        let count = tasks.len();
        if count > 0 {
            with_queue(ctx, survivor, |queue, task_ctx| {
                queue.enqueue_all(tasks, task_ctx);
            })?;
        }
        Ok(count)
    }

    /// Advance every survivor's in-flight task by `dt` simulated seconds
    /// and dispatch follow-ups.
    ///
    /// Survivors are processed in id order. Returns every task that
    /// finished since the last call, including tasks that completed on
    /// enqueue.
    pub fn advance_tasks(&self, ctx: &mut WorkContext<'_>, dt: f32) -> Vec<SurvivorReport> {
        let mut finished = Vec::new();
        for survivor in ctx.roster.ids() {
            if with_queue(ctx, survivor, |queue, task_ctx| queue.advance(task_ctx, dt)).is_ok() {
                self.dispatch(ctx, survivor, &mut finished);
            }
        }
        finished
    }

    /// Drain the survivor's reports until no more arrive, running the
    /// follow-ups of completed tasks.
    fn dispatch(
        &self,
        ctx: &mut WorkContext<'_>,
        survivor: SurvivorId,
        finished: &mut Vec<SurvivorReport>,
    ) {
        loop {
            let reports = ctx
                .roster
                .entry_mut(survivor)
                .map(|e| e.tasks.drain_reports())
                .unwrap_or_default();
            if reports.is_empty() {
                return;
            }
            for report in reports {
                if report.outcome.is_completed()
                    && let Some(FollowUp::PerformJob(kind)) = report.task.follow_up()
                    && let Err(e) = self.enqueue_job_chain(ctx, survivor, kind)
                {
                    warn!(survivor = %survivor, job = %kind, error = %e, "Job step skipped");
                }
                finished.push(SurvivorReport { survivor, report });
            }
        }
    }

    // -------------------------------------------------------------------
    // Resources
    // -------------------------------------------------------------------

    /// Move `amount` of `resource` from the survivor's bound region into
    /// its inventory. Returns the survivor's new count.
    ///
    /// # Errors
    ///
    /// [`CoreError::NoRegionBound`], or [`CoreError::World`] wrapping
    /// `InsufficientResource`; neither ledger changes.
    pub fn collect_resource(
        &self,
        world: &mut WorldGrid,
        roster: &mut SurvivorRoster,
        survivor: SurvivorId,
        resource: Resource,
        amount: u32,
    ) -> Result<u32, CoreError> {
        let region = self.registry.lookup(survivor).inspect_err(|_| {
            warn!(survivor = %survivor, "No region bound to survivor");
        })?;
        let collector = roster
            .get_mut(survivor)
            .ok_or(CoreError::SurvivorNotFound(survivor))?;
        let source = world.require_region_mut(region)?;
        if let Err(e) = source
            .resources_mut()
            .transfer(&mut collector.inventory, resource, amount)
        {
            warn!(survivor = %survivor, region = %region, ?resource, amount, error = %e, "Collection failed");
            return Err(e.into());
        }
        let held = collector.inventory.get(resource);
        info!(survivor = %survivor, region = %region, ?resource, amount, held, "Resource collected");
        Ok(held)
    }
}

/// Run `f` against one survivor's queue with a task context assembled from
/// `ctx`.
fn with_queue<R>(
    ctx: &mut WorkContext<'_>,
    survivor: SurvivorId,
    f: impl FnOnce(&mut TaskQueue, &mut TaskContext<'_>) -> R,
) -> Result<R, CoreError> {
    let SurvivorEntry {
        survivor: worker,
        tasks,
    } = ctx
        .roster
        .entry_mut(survivor)
        .ok_or(CoreError::SurvivorNotFound(survivor))?;
    let mut task_ctx = TaskContext {
        survivor: worker,
        world: &mut *ctx.world,
        rng: &mut *ctx.rng,
        sink: &mut *ctx.sink,
        config: ctx.tasks,
        yields: ctx.yields,
    };
    Ok(f(tasks, &mut task_ctx))
}
