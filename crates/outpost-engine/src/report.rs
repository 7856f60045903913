//! End-of-run colony report.
//!
//! Summarizes where every survivor ended up, what it carries, and what the
//! worked regions hold. Serialized to JSON and logged at shutdown.

use outpost_core::runner::{SimulationEndReason, SimulationResult};
use outpost_core::tick::SimulationState;
use outpost_types::{JobKind, Position, RegionCoord, RegionType, SurvivorId};
use outpost_world::ResourceLedger;
use serde::Serialize;

/// One survivor's final state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurvivorReport {
    /// Survivor id.
    pub id: SurvivorId,
    /// Display name.
    pub name: String,
    /// Assigned job, if any.
    pub job: Option<JobKind>,
    /// Bound region, if any.
    pub region: Option<RegionCoord>,
    /// Final position.
    pub position: Position,
    /// Carried resources.
    pub inventory: ResourceLedger,
    /// Tasks still queued or in flight.
    pub queued_tasks: usize,
}

/// One region that was bound or holds resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionReport {
    /// Region coordinate.
    pub coord: RegionCoord,
    /// Terrain.
    pub region_type: RegionType,
    /// Survivor bound to it, if any.
    pub holder: Option<SurvivorId>,
    /// Resources left in the region.
    pub resources: ResourceLedger,
}

/// The full end-of-run report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColonyReport {
    /// Why the run stopped.
    pub end_reason: SimulationEndReason,
    /// Ticks executed.
    pub total_ticks: u64,
    /// Simulated seconds elapsed.
    pub elapsed_seconds: f64,
    /// Survivors in id order.
    pub survivors: Vec<SurvivorReport>,
    /// Worked regions in grid order.
    pub regions: Vec<RegionReport>,
    /// Yield piles spawned during the run.
    pub yields_spawned: usize,
}

impl ColonyReport {
    /// Build a report from the final simulation state.
    pub fn collect(result: &SimulationResult, state: &SimulationState, yields_spawned: usize) -> Self {
        let registry = state.coordinator.registry();
        let survivors = state
            .roster
            .ids()
            .into_iter()
            .filter_map(|id| state.roster.entry(id))
            .map(|entry| SurvivorReport {
                id: entry.survivor.id,
                name: entry.survivor.name.clone(),
                job: entry.survivor.job,
                region: registry.lookup(entry.survivor.id).ok(),
                position: entry.survivor.position,
                inventory: entry.survivor.inventory.clone(),
                queued_tasks: entry
                    .tasks
                    .pending_len()
                    .saturating_add(entry.tasks.in_flight_count()),
            })
            .collect();
        let regions = state
            .world
            .regions()
            .filter(|r| r.is_assigned() || !r.resources().is_empty())
            .map(|r| RegionReport {
                coord: r.coord(),
                region_type: r.region_type(),
                holder: registry.holder_of(r.coord()),
                resources: r.resources().clone(),
            })
            .collect();
        Self {
            end_reason: result.end_reason,
            total_ticks: result.total_ticks,
            elapsed_seconds: state.clock.elapsed_seconds(),
            survivors,
            regions,
            yields_spawned,
        }
    }
}
