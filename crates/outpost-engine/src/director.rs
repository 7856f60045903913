//! Scripted player for the headless engine.
//!
//! The [`Director`] stands in for the person at the keyboard. At startup it
//! plans one order per survivor: a job (cycling through the enabled jobs)
//! and the nearest free region whose terrain suits it. Each order plays out
//! over four ticks:
//!
//! 1. select the survivor and press the job button, while the pointer rests
//!    on the shelter (an invalid region, shown red);
//! 2. move the pointer onto the target region;
//! 3. commit;
//! 4. a quiet tick before the next order.
//!
//! The pointer script is returned as a [`ScriptedPointer`] alongside the
//! director, one frame per tick.

use std::collections::BTreeSet;

use outpost_core::collaborators::{PointerFrame, ScriptedPointer};
use outpost_core::runner::TickCallback;
use outpost_core::tick::{SimulationState, TickSummary};
use outpost_core::{Job, SelectionEvent};
use outpost_types::{JobKind, Position, RegionCoord, SurvivorId};
use outpost_world::WorldGrid;
use tracing::{debug, info, warn};

/// Ticks between consecutive orders.
const ORDER_SPACING: u64 = 4;

/// One planned job assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    /// Survivor to select.
    pub survivor: SurvivorId,
    /// Job button to press.
    pub job: JobKind,
    /// Region to commit.
    pub region: RegionCoord,
    /// Tick on which the job button is pressed.
    pub tick: u64,
}

/// Tick callback that plays the planned orders.
#[derive(Debug, Default)]
pub struct Director {
    orders: Vec<Order>,
    last_scripted_tick: u64,
    last_tick: u64,
    commits: u32,
    rejections: u32,
}

impl Director {
    /// Plan one order per survivor and the pointer script that carries
    /// them out.
    ///
    /// Survivors for whom no suitable free region remains get no order.
    pub fn plan(
        world: &WorldGrid,
        shelter: RegionCoord,
        survivors: &[SurvivorId],
        jobs: &[JobKind],
    ) -> (Self, ScriptedPointer) {
        let mut director = Self::default();
        let mut frames = Vec::new();
        let mut claimed = BTreeSet::new();
        let Ok(home) = world.region_center(shelter) else {
            warn!(shelter = %shelter, "Shelter is not on the grid; no orders planned");
            return (director, ScriptedPointer::default());
        };

        let mut tick: u64 = 1;
        for (survivor, job) in survivors.iter().copied().zip(jobs.iter().copied().cycle()) {
            let Some((region, target)) = nearest_region(world, home, job, &claimed) else {
                warn!(survivor = %survivor, job = %job, "No free region for job");
                continue;
            };
            claimed.insert(region);
            director.orders.push(Order {
                survivor,
                job,
                region,
                tick,
            });
            frames.extend([
                PointerFrame::hover(home),
                PointerFrame::hover(target),
                PointerFrame::commit(target),
                PointerFrame::idle(),
            ]);
            director.last_scripted_tick = tick.saturating_add(2);
            tick = tick.saturating_add(ORDER_SPACING);
        }

        info!(
            orders = director.orders.len(),
            last_scripted_tick = director.last_scripted_tick,
            "Player script planned"
        );
        (director, ScriptedPointer::new(frames))
    }

    /// The planned orders, in play order.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Regions committed so far.
    pub const fn commits(&self) -> u32 {
        self.commits
    }

    /// Commits refused so far.
    pub const fn rejections(&self) -> u32 {
        self.rejections
    }
}

impl TickCallback for Director {
    fn before_tick(&mut self, tick: u64, state: &mut SimulationState) {
        for order in self.orders.iter().filter(|o| o.tick == tick) {
            if let Err(e) = state.roster.select(order.survivor) {
                warn!(tick, survivor = %order.survivor, error = %e, "Survivor could not be selected");
                continue;
            }
            match state
                .coordinator
                .assign_job_to_selected(&mut state.roster, order.job)
            {
                Ok(survivor) => {
                    info!(tick, survivor = %survivor, job = %order.job, region = %order.region, "Job button pressed");
                }
                Err(e) => {
                    warn!(tick, survivor = %order.survivor, job = %order.job, error = %e, "Job assignment failed");
                }
            }
        }
    }

    fn on_tick(&mut self, summary: &TickSummary, _state: &SimulationState) {
        self.last_tick = summary.tick;
        match summary.selection {
            SelectionEvent::Committed { .. } => self.commits = self.commits.saturating_add(1),
            SelectionEvent::Rejected { .. } => self.rejections = self.rejections.saturating_add(1),
            SelectionEvent::Inactive | SelectionEvent::Pending => {}
        }
        debug!(
            tick = summary.tick,
            completed = summary.completed,
            failed = summary.failed,
            busy = summary.busy_survivors,
            pending = summary.pending_tasks,
            "Tick complete"
        );
    }

    fn has_pending_input(&self) -> bool {
        self.last_tick < self.last_scripted_tick
    }
}

/// The unclaimed, unassigned region nearest `from` that suits `job`, with
/// its center.
fn nearest_region(
    world: &WorldGrid,
    from: Position,
    job: JobKind,
    claimed: &BTreeSet<RegionCoord>,
) -> Option<(RegionCoord, Position)> {
    world
        .regions()
        .filter(|r| Job::from_kind(job).is_valid_region(r.region_type()))
        .filter(|r| !r.is_assigned() && !claimed.contains(&r.coord()))
        .filter_map(|r| {
            let center = world.region_center(r.coord()).ok()?;
            Some((r.coord(), center, from.distance(center)))
        })
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(coord, center, _)| (coord, center))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use outpost_agents::{SeededRandom, SurvivorRoster, SurvivorStats};
    use outpost_core::collaborators::PointerInput;
    use outpost_core::config::SimulationConfig;
    use outpost_core::{Coordinator, JobRegistry};
    use outpost_types::RegionType;

    use super::*;

    /// 3x1 grid: grass, stone shelter, forest.
    fn world() -> WorldGrid {
        let mut world = WorldGrid::new(3, 1, 4, RegionType::Forest).unwrap();
        world
            .set_region_type(RegionCoord::new(0, 0), RegionType::Grass)
            .unwrap();
        world
            .set_region_type(RegionCoord::new(1, 0), RegionType::Stone)
            .unwrap();
        world
    }

    fn ids(n: usize) -> Vec<SurvivorId> {
        (0..n).map(|_| SurvivorId::new()).collect()
    }

    #[test]
    fn plan_cycles_jobs_and_claims_regions() {
        let survivors = ids(3);
        let (director, pointer) = Director::plan(
            &world(),
            RegionCoord::new(1, 0),
            &survivors,
            &JobKind::ALL,
        );

        let orders = director.orders();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].job, JobKind::Farmer);
        assert_eq!(orders[0].region, RegionCoord::new(0, 0));
        assert_eq!(orders[0].tick, 1);
        assert_eq!(orders[1].job, JobKind::Lumberjack);
        assert_eq!(orders[1].region, RegionCoord::new(2, 0));
        assert_eq!(orders[1].tick, 5);
        // The third survivor would need a second grass region.
        assert_eq!(pointer.remaining(), 8);
        assert_eq!(director.last_scripted_tick, 7);
    }

    #[test]
    fn plan_only_orders_enabled_jobs() {
        let coordinator = Coordinator::new(JobRegistry::new([JobKind::Lumberjack]));
        let jobs: Vec<JobKind> = coordinator.jobs().kinds().collect();
        let (director, _) = Director::plan(&world(), RegionCoord::new(1, 0), &ids(2), &jobs);

        let orders = director.orders();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].job, JobKind::Lumberjack);
        assert_eq!(orders[0].region, RegionCoord::new(2, 0));
    }

    #[test]
    fn pointer_script_hovers_then_commits() {
        let w = world();
        let (_, mut pointer) =
            Director::plan(&w, RegionCoord::new(1, 0), &ids(1), &[JobKind::Lumberjack]);

        pointer.begin_frame();
        assert_eq!(
            pointer.resolve_hovered_region(&w),
            Some(RegionCoord::new(1, 0))
        );
        assert!(!pointer.commit_pressed());
        pointer.begin_frame();
        assert_eq!(
            pointer.resolve_hovered_region(&w),
            Some(RegionCoord::new(2, 0))
        );
        pointer.begin_frame();
        assert!(pointer.commit_pressed());
        assert_eq!(
            pointer.resolve_hovered_region(&w),
            Some(RegionCoord::new(2, 0))
        );
    }

    #[test]
    fn pending_input_until_last_commit() {
        let (mut director, _) =
            Director::plan(&world(), RegionCoord::new(1, 0), &ids(1), &[JobKind::Farmer]);
        assert!(director.has_pending_input());

        let mut config = SimulationConfig::default();
        config.world.tick_seconds = 0.5;
        let state = SimulationState::new(
            &config,
            world(),
            SurvivorRoster::default(),
            SeededRandom::new(1),
        )
        .unwrap();
        let mut summary = TickSummary {
            tick: 2,
            selection: SelectionEvent::Pending,
            completed: 0,
            failed: 0,
            busy_survivors: 0,
            pending_tasks: 0,
            idle: false,
        };
        director.on_tick(&summary, &state);
        assert!(director.has_pending_input());
        summary.tick = 3;
        director.on_tick(&summary, &state);
        assert!(!director.has_pending_input());
    }

    #[test]
    fn before_tick_presses_the_job_button() {
        let mut roster = SurvivorRoster::default();
        let ada = roster
            .spawn(
                String::from("Ada"),
                Position::new(5.5, 1.0, 1.5),
                SurvivorStats::default(),
            )
            .unwrap();
        let mut config = SimulationConfig::default();
        config.world.tick_seconds = 0.5;
        let mut state =
            SimulationState::new(&config, world(), roster, SeededRandom::new(1)).unwrap();
        let (mut director, _) = Director::plan(
            &state.world,
            RegionCoord::new(1, 0),
            &[ada],
            &[JobKind::Lumberjack],
        );

        director.before_tick(1, &mut state);

        assert_eq!(state.roster.selected(), Some(ada));
        assert_eq!(state.roster.get(ada).unwrap().job, Some(JobKind::Lumberjack));
        assert!(state.coordinator.selector().is_selecting());
    }
}
