//! Survivor state.
//!
//! A [`Survivor`] is an autonomous colonist with an optional job, a world
//! position and an inventory. The scheduling core only ever changes three
//! things on it: the job, the inventory, and the position (by movement
//! tasks).

use outpost_types::{JobKind, Position, SurvivorId};
use outpost_world::ResourceLedger;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Physical parameters shared by freshly spawned survivors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurvivorStats {
    /// Body height in world units. Survivors stand with their center at
    /// half this height above the ground.
    pub height: f32,
    /// Movement speed in world units per simulated second.
    pub speed: f32,
}

impl Default for SurvivorStats {
    fn default() -> Self {
        Self {
            height: 2.0,
            speed: 3.0,
        }
    }
}

/// An autonomous colonist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survivor {
    /// Unique identifier.
    pub id: SurvivorId,
    /// Display name, drawn from the name pool.
    pub name: String,
    /// Current role. `None` until a job is assigned.
    pub job: Option<JobKind>,
    /// Current world position (body center).
    pub position: Position,
    /// Body height and movement speed.
    pub stats: SurvivorStats,
    /// Collected resources.
    pub inventory: ResourceLedger,
}

impl Survivor {
    /// Create a jobless survivor with an empty inventory.
    pub fn new(name: String, position: Position, stats: SurvivorStats) -> Self {
        Self {
            id: SurvivorId::new(),
            name,
            job: None,
            position,
            stats,
            inventory: ResourceLedger::new(),
        }
    }

    /// Half the body height: the vertical offset from ground to center.
    pub fn half_height(&self) -> f32 {
        self.stats.height / 2.0
    }

    /// Set the survivor's job.
    pub fn assign_job(&mut self, job: JobKind) {
        if let Some(previous) = self.job.replace(job) {
            if previous != job {
                info!(survivor = %self.id, name = %self.name, from = %previous, to = %job, "Survivor changed job");
            }
        } else {
            info!(survivor = %self.id, name = %self.name, job = %job, "Survivor took a job");
        }
    }
}
