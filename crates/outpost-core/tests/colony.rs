//! End-to-end tests for job assignment, region binding, and task chains.
//!
//! Each test builds a small world by hand, drives it through
//! [`run_tick`] with scripted pointer input, and checks the observable
//! behaviour of the selector, the registry, and the per-survivor queues.

#![allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    clippy::too_many_lines,
    clippy::items_after_statements
)]

use std::collections::BTreeMap;

use outpost_agents::{
    SeededRandom, SurvivorEntry, SurvivorRoster, SurvivorStats, Task, TaskContext, TaskFailure,
    TaskOutcome, TaskReport, YieldRange,
};
use outpost_core::collaborators::{
    HighlightCall, PointerFrame, RecordingHighlighter, RecordingYieldSink, ScriptedPointer,
};
use outpost_core::config::SimulationConfig;
use outpost_core::tick::{Collaborators, SimulationState, TickSummary, run_tick};
use outpost_core::{CoreError, Rejection, SelectionEvent};
use outpost_types::{
    ActionKind, JobKind, Position, PropKind, RegionCoord, RegionType, Resource, SurvivorId,
    TileCoord,
};
use outpost_world::WorldGrid;

const REGION_SIZE: u32 = 4;
const FOREST: RegionCoord = RegionCoord::new(0, 0);
const GRASS: RegionCoord = RegionCoord::new(1, 0);

// =============================================================================
// Harness
// =============================================================================

struct Colony {
    state: SimulationState,
    pointer: ScriptedPointer,
    highlighter: RecordingHighlighter,
    sink: RecordingYieldSink,
}

impl Colony {
    /// A 2x1 grid: forest at (0, 0), grass at (1, 0).
    fn new() -> Self {
        let mut config = SimulationConfig::default();
        config.world.tick_seconds = 0.25;
        config.tasks.action_seconds = 0.5;
        let mut world = WorldGrid::new(2, 1, REGION_SIZE, RegionType::Forest).unwrap();
        world.set_region_type(GRASS, RegionType::Grass).unwrap();
        let state =
            SimulationState::new(&config, world, SurvivorRoster::default(), SeededRandom::new(7))
                .unwrap();
        Self {
            state,
            pointer: ScriptedPointer::default(),
            highlighter: RecordingHighlighter::new(),
            sink: RecordingYieldSink::new(),
        }
    }

    fn spawn(&mut self, name: &str, at: Position) -> SurvivorId {
        self.state
            .roster
            .spawn(String::from(name), at, SurvivorStats { height: 2.0, speed: 4.0 })
            .unwrap()
    }

    fn plant(&mut self, kind: PropKind, tiles: &[TileCoord]) {
        for t in tiles {
            self.state.world.place_prop(*t, kind).unwrap();
        }
    }

    fn assign(&mut self, survivor: SurvivorId, job: JobKind) {
        self.state.roster.select(survivor).unwrap();
        self.state
            .coordinator
            .assign_job_to_selected(&mut self.state.roster, job)
            .unwrap();
    }

    fn tick(&mut self, frame: PointerFrame) -> TickSummary {
        self.pointer.push(frame);
        let mut collab = Collaborators {
            pointer: &mut self.pointer,
            highlighter: &mut self.highlighter,
            sink: &mut self.sink,
        };
        run_tick(&mut self.state, &mut collab).unwrap()
    }

    /// Advance every queue until the colony is idle, checking the
    /// one-in-flight rule every step. Returns each survivor's reports in
    /// completion order.
    fn run_until_idle(&mut self, limit: usize) -> BTreeMap<SurvivorId, Vec<TaskReport>> {
        let mut finished: BTreeMap<SurvivorId, Vec<TaskReport>> = BTreeMap::new();
        for _ in 0..limit {
            for id in self.state.roster.ids() {
                assert!(self.state.roster.entry(id).unwrap().tasks.in_flight_count() <= 1);
            }
            let (coordinator, mut ctx) = self.state.work_context(&mut self.sink);
            for r in coordinator.advance_tasks(&mut ctx, 0.25) {
                finished.entry(r.survivor).or_default().push(r.report);
            }
            if self.state.roster.all_idle() {
                return finished;
            }
        }
        panic!("colony still busy after {limit} steps");
    }

    /// Enqueue `tasks` directly on a survivor's queue.
    fn enqueue(&mut self, survivor: SurvivorId, tasks: &[Task]) {
        let SimulationState {
            world,
            roster,
            rng,
            tasks: config,
            yields,
            ..
        } = &mut self.state;
        let SurvivorEntry {
            survivor: worker,
            tasks: queue,
        } = roster.entry_mut(survivor).unwrap();
        let mut ctx = TaskContext {
            survivor: worker,
            world,
            rng,
            sink: &mut self.sink,
            config,
            yields,
        };
        queue.enqueue_all(tasks.iter().copied(), &mut ctx);
    }

    fn queued(&self, survivor: SurvivorId) -> Vec<Task> {
        let queue = &self.state.roster.entry(survivor).unwrap().tasks;
        queue.current().into_iter().chain(queue.pending()).copied().collect()
    }
}

/// A ground point in the middle-ish of `region`.
fn over(region: RegionCoord) -> Position {
    let size = f32::from(u16::try_from(REGION_SIZE).unwrap());
    let x = f32::from(u16::try_from(region.x).unwrap());
    let y = f32::from(u16::try_from(region.y).unwrap());
    Position::new(x.mul_add(size, 1.0), 0.0, y.mul_add(size, 1.0))
}

// =============================================================================
// Selector scenarios
// =============================================================================

#[test]
fn lumberjack_scenario_binds_forest_and_queues_one_pair_per_tree() {
    let mut colony = Colony::new();
    let trees = [TileCoord::new(1, 0), TileCoord::new(3, 1), TileCoord::new(0, 3)];
    colony.plant(PropKind::Tree, &trees);
    // Standing on tile (0, 0): the arrival move completes on enqueue.
    let a = colony.spawn("Ada", Position::new(0.0, 1.0, 0.0));
    colony.assign(a, JobKind::Lumberjack);

    colony.tick(PointerFrame::hover(over(GRASS)));
    assert_eq!(
        colony.highlighter.last_for(GRASS),
        Some(HighlightCall { region: GRASS, visible: true, valid: false })
    );

    colony.tick(PointerFrame::hover(over(FOREST)));
    assert_eq!(
        colony.highlighter.last_for(FOREST),
        Some(HighlightCall { region: FOREST, visible: true, valid: true })
    );
    assert_eq!(colony.highlighter.visible_regions(), vec![FOREST]);

    let summary = colony.tick(PointerFrame::commit(over(FOREST)));
    let SelectionEvent::Committed { binding, job } = summary.selection else {
        panic!("expected a commit, got {:?}", summary.selection);
    };
    assert_eq!((binding.survivor, binding.region, job), (a, FOREST, JobKind::Lumberjack));
    assert!(colony.state.world.region(FOREST).unwrap().is_assigned());
    assert_eq!(colony.state.coordinator.registry().lookup(a), Ok(FOREST));
    assert!(colony.highlighter.visible_regions().is_empty());
    assert_eq!(summary.completed, 1);

    let queued = colony.queued(a);
    assert_eq!(queued.len(), trees.len() * 2);
    for (pair, tile) in queued.chunks(2).zip(trees) {
        assert_eq!(pair[0], Task::move_to(tile));
        assert!(matches!(
            pair[1],
            Task::PerformAction { tile: t, action: ActionKind::Chop, .. } if t == tile
        ));
    }
}

#[test]
fn commit_on_region_held_by_another_survivor_is_rejected() {
    let mut colony = Colony::new();
    let a = colony.spawn("Ada", Position::new(6.0, 1.0, 1.0));
    let b = colony.spawn("Bo", Position::new(5.0, 1.0, 1.0));

    colony.assign(b, JobKind::Lumberjack);
    colony.tick(PointerFrame::commit(over(FOREST)));
    assert_eq!(colony.state.coordinator.registry().lookup(b), Ok(FOREST));

    colony.assign(a, JobKind::Lumberjack);
    colony.tick(PointerFrame::hover(over(FOREST)));
    let calls = colony.highlighter.calls.len();
    let summary = colony.tick(PointerFrame::commit(over(FOREST)));

    assert_eq!(
        summary.selection,
        SelectionEvent::Rejected {
            region: Some(FOREST),
            reason: Rejection::AlreadyAssigned { holder: Some(b) },
        }
    );
    assert_eq!(colony.state.coordinator.registry().lookup(b), Ok(FOREST));
    assert_eq!(
        colony.state.coordinator.registry().lookup(a),
        Err(CoreError::NoRegionBound(a))
    );
    assert_eq!(colony.state.coordinator.registry().len(), 1);
    assert_eq!(colony.highlighter.calls.len(), calls);
    assert!(colony.state.coordinator.selector().is_selecting());
}

#[test]
fn rejected_terrain_keeps_selecting_until_valid_commit() {
    let mut colony = Colony::new();
    let a = colony.spawn("Ada", Position::new(2.0, 1.0, 2.0));
    colony.assign(a, JobKind::Farmer);

    let first = colony.tick(PointerFrame::commit(over(FOREST)));
    assert!(matches!(
        first.selection,
        SelectionEvent::Rejected { reason: Rejection::InvalidRegionType { region_type: RegionType::Forest }, .. }
    ));
    assert!(!colony.state.world.region(FOREST).unwrap().is_assigned());

    let second = colony.tick(PointerFrame::commit(over(GRASS)));
    assert!(matches!(second.selection, SelectionEvent::Committed { .. }));
    assert_eq!(colony.state.coordinator.registry().lookup(a), Ok(GRASS));
}

// =============================================================================
// Queue execution
// =============================================================================

#[test]
fn tasks_finish_in_enqueue_order_with_one_in_flight() {
    let mut colony = Colony::new();
    colony.plant(PropKind::Tree, &[TileCoord::new(0, 0), TileCoord::new(2, 1), TileCoord::new(1, 3)]);
    colony.plant(PropKind::Crop, &[TileCoord::new(5, 0), TileCoord::new(7, 3)]);
    let a = colony.spawn("Ada", Position::new(3.0, 1.0, 3.0));
    let b = colony.spawn("Bo", Position::new(4.0, 1.0, 0.0));

    colony.assign(a, JobKind::Lumberjack);
    colony.tick(PointerFrame::commit(over(FOREST)));
    colony.assign(b, JobKind::Farmer);
    colony.tick(PointerFrame::commit(over(GRASS)));

    let finished = colony.run_until_idle(400);

    let lumber = &finished[&a];
    let farm = &finished[&b];
    for done in [lumber, farm] {
        assert!(done.iter().all(|r| r.outcome.is_completed()));
        let tickets: Vec<u64> = done.iter().map(|r| r.ticket.0).collect();
        let mut sorted = tickets.clone();
        sorted.sort_unstable();
        assert_eq!(tickets, sorted);
    }
    let chops = lumber
        .iter()
        .filter(|r| matches!(r.task, Task::PerformAction { action: ActionKind::Chop, .. }))
        .count();
    let harvests = farm
        .iter()
        .filter(|r| matches!(r.task, Task::PerformAction { action: ActionKind::Harvest, .. }))
        .count();
    assert_eq!(chops, 3);
    assert_eq!(harvests, 2);
    assert_eq!(colony.sink.spawned.len(), 5);
}

#[test]
fn chopped_tree_yields_within_range_and_frees_tile() {
    let mut colony = Colony::new();
    let tree = TileCoord::new(2, 2);
    colony.plant(PropKind::Tree, &[tree]);
    let a = colony.spawn("Ada", Position::new(6.0, 1.0, 2.0));
    colony.assign(a, JobKind::Lumberjack);
    colony.tick(PointerFrame::commit(over(FOREST)));
    colony.run_until_idle(200);

    assert!(!colony.state.world.tile_is_occupied(tree));
    let spawned = colony.sink.spawned.first().copied().unwrap();
    assert_eq!(spawned.tile, tree);
    assert_eq!(spawned.primary.0, Resource::Wood);
    assert!(YieldRange::new(1, 5).contains(spawned.primary.1));
    assert!(spawned.secondary.1 == 0 || YieldRange::new(1, 2).contains(spawned.secondary.1));

    let ledger = colony.state.world.region(FOREST).unwrap().resources();
    assert_eq!(ledger.get(Resource::Wood), spawned.primary.1);
    assert_eq!(ledger.get(Resource::Sapling), spawned.secondary.1);
}

#[test]
fn failed_move_still_lets_the_queue_drain() {
    let mut colony = Colony::new();
    let rock = TileCoord::new(1, 1);
    colony.plant(PropKind::Rock, &[rock]);
    let a = colony.spawn("Ada", Position::new(0.0, 1.0, 0.0));
    colony.state.roster.get_mut(a).unwrap().assign_job(JobKind::Lumberjack);

    let free = TileCoord::new(2, 0);
    colony.enqueue(a, &[Task::move_to(rock), Task::move_to(free)]);
    let finished = colony.run_until_idle(50);

    let reports = &finished[&a];
    assert_eq!(reports.len(), 2);
    assert!(matches!(
        reports[0].outcome,
        TaskOutcome::Failed(TaskFailure::TileBlocked { .. })
    ));
    assert_eq!(reports[1].task, Task::move_to(free));
    assert!(reports[1].outcome.is_completed());
    let at = colony.state.roster.get(a).unwrap().position;
    assert!(at.distance(Position::new(2.0, 1.0, 0.0)) <= 0.1);
}

// =============================================================================
// Resources
// =============================================================================

#[test]
fn collect_resource_draws_from_bound_region_only() {
    let mut colony = Colony::new();
    colony.plant(PropKind::Tree, &[TileCoord::new(1, 1)]);
    let a = colony.spawn("Ada", Position::new(6.0, 1.0, 1.0));

    let unbound = colony.state.coordinator.collect_resource(
        &mut colony.state.world,
        &mut colony.state.roster,
        a,
        Resource::Wood,
        1,
    );
    assert_eq!(unbound, Err(CoreError::NoRegionBound(a)));

    colony.assign(a, JobKind::Lumberjack);
    colony.tick(PointerFrame::commit(over(FOREST)));
    colony.run_until_idle(200);

    let stock = colony
        .state
        .world
        .region(FOREST)
        .unwrap()
        .resources()
        .get(Resource::Wood);
    assert!(stock >= 1);

    let too_much = colony.state.coordinator.collect_resource(
        &mut colony.state.world,
        &mut colony.state.roster,
        a,
        Resource::Wood,
        stock + 1,
    );
    assert!(matches!(too_much, Err(CoreError::World { .. })));
    assert_eq!(colony.state.roster.get(a).unwrap().inventory.get(Resource::Wood), 0);

    let held = colony
        .state
        .coordinator
        .collect_resource(&mut colony.state.world, &mut colony.state.roster, a, Resource::Wood, stock)
        .unwrap();
    assert_eq!(held, stock);
    assert_eq!(
        colony.state.world.region(FOREST).unwrap().resources().get(Resource::Wood),
        0
    );
}

#[test]
fn job_on_empty_region_is_a_quiet_no_op() {
    let mut colony = Colony::new();
    let a = colony.spawn("Ada", Position::new(6.0, 1.0, 1.0));
    colony.assign(a, JobKind::Lumberjack);
    colony.tick(PointerFrame::commit(over(FOREST)));
    let finished = colony.run_until_idle(100);

    // Only the arrival move ran.
    assert_eq!(finished[&a].len(), 1);
    assert!(finished[&a][0].outcome.is_completed());
    assert!(colony.sink.spawned.is_empty());
}
