//! The survivor roster.
//!
//! [`SurvivorRoster`] owns every survivor together with its task queue, the
//! pool of unused names, and the currently selected survivor (the one job
//! buttons act on). Survivors are iterated in id order, which is creation
//! order for UUID v7 ids minted on one thread.

use std::collections::BTreeMap;

use outpost_types::{Position, SurvivorId};
use tracing::{debug, info, warn};

use crate::error::AgentError;
use crate::executor::TaskQueue;
use crate::random::RandomSource;
use crate::survivor::{Survivor, SurvivorStats};

/// A survivor and the queue that runs its tasks.
#[derive(Debug, Clone)]
pub struct SurvivorEntry {
    /// The survivor.
    pub survivor: Survivor,
    /// Its task queue.
    pub tasks: TaskQueue,
}

/// All survivors in the colony.
#[derive(Debug, Clone, Default)]
pub struct SurvivorRoster {
    /// Survivors indexed by id.
    survivors: BTreeMap<SurvivorId, SurvivorEntry>,
    /// Names not yet handed out.
    name_pool: Vec<String>,
    /// Survivor the player last selected.
    selected: Option<SurvivorId>,
}

impl SurvivorRoster {
    /// Create an empty roster drawing names from `name_pool`.
    pub const fn new(name_pool: Vec<String>) -> Self {
        Self {
            survivors: BTreeMap::new(),
            name_pool,
            selected: None,
        }
    }

    // -------------------------------------------------------------------
    // Names
    // -------------------------------------------------------------------

    /// Remove and return a random name from the pool.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NamePoolEmpty`] once every name has been used.
    pub fn draw_name(&mut self, rng: &mut dyn RandomSource) -> Result<String, AgentError> {
        let last = self.name_pool.len().checked_sub(1).ok_or_else(|| {
            warn!("Name pool is empty");
            AgentError::NamePoolEmpty
        })?;
        let last = u32::try_from(last).unwrap_or(u32::MAX);
        let idx = usize::try_from(rng.range_inclusive(0, last)).unwrap_or(0);
        if idx >= self.name_pool.len() {
            return Err(AgentError::ArithmeticOverflow {
                context: format!("name index {idx} outside pool of {}", self.name_pool.len()),
            });
        }
        Ok(self.name_pool.swap_remove(idx))
    }

    /// Names still available.
    pub fn names_left(&self) -> usize {
        self.name_pool.len()
    }

    // -------------------------------------------------------------------
    // Spawning
    // -------------------------------------------------------------------

    /// Add a survivor named `name` standing at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::DuplicateName`] if the name is taken.
    pub fn spawn(
        &mut self,
        name: String,
        position: Position,
        stats: SurvivorStats,
    ) -> Result<SurvivorId, AgentError> {
        if self.survivors.values().any(|e| e.survivor.name == name) {
            return Err(AgentError::DuplicateName(name));
        }
        let survivor = Survivor::new(name, position, stats);
        let id = survivor.id;
        info!(survivor = %id, name = %survivor.name, x = position.x, z = position.z, "Survivor spawned");
        self.survivors.insert(
            id,
            SurvivorEntry {
                survivor,
                tasks: TaskQueue::new(),
            },
        );
        Ok(id)
    }

    /// Spawn a survivor with a name drawn from the pool.
    pub fn spawn_named(
        &mut self,
        rng: &mut dyn RandomSource,
        position: Position,
        stats: SurvivorStats,
    ) -> Result<SurvivorId, AgentError> {
        let name = self.draw_name(rng)?;
        self.spawn(name, position, stats)
    }

    /// Spawn two survivors at the left and right edges of a region.
    ///
    /// `center` is the region's ground-level middle; survivors are placed
    /// half a region (less half a tile) to either side and raised by half
    /// their height so they stand on the ground.
    pub fn spawn_around(
        &mut self,
        rng: &mut dyn RandomSource,
        center: Position,
        region_size: u32,
        stats: SurvivorStats,
    ) -> Result<[SurvivorId; 2], AgentError> {
        let offset = edge_offset(region_size);
        let lift = stats.height / 2.0;
        let left = Position::new(center.x - offset, center.y, center.z).raised(lift);
        let right = Position::new(center.x + offset, center.y, center.z).raised(lift);
        let first = self.spawn_named(rng, left, stats)?;
        let second = self.spawn_named(rng, right, stats)?;
        Ok([first, second])
    }

    // -------------------------------------------------------------------
    // Access
    // -------------------------------------------------------------------

    /// Get a survivor by id.
    pub fn get(&self, id: SurvivorId) -> Option<&Survivor> {
        self.survivors.get(&id).map(|e| &e.survivor)
    }

    /// Get a survivor by id, mutably.
    pub fn get_mut(&mut self, id: SurvivorId) -> Option<&mut Survivor> {
        self.survivors.get_mut(&id).map(|e| &mut e.survivor)
    }

    /// Get a survivor or fail with [`AgentError::SurvivorNotFound`].
    pub fn require(&self, id: SurvivorId) -> Result<&Survivor, AgentError> {
        self.get(id).ok_or(AgentError::SurvivorNotFound(id))
    }

    /// Get a survivor and its queue.
    pub fn entry(&self, id: SurvivorId) -> Option<&SurvivorEntry> {
        self.survivors.get(&id)
    }

    /// Get a survivor and its queue, mutably.
    pub fn entry_mut(&mut self, id: SurvivorId) -> Option<&mut SurvivorEntry> {
        self.survivors.get_mut(&id)
    }

    /// All survivor ids in iteration order.
    pub fn ids(&self) -> Vec<SurvivorId> {
        self.survivors.keys().copied().collect()
    }

    /// Iterate over all survivors.
    pub fn iter(&self) -> impl Iterator<Item = &Survivor> {
        self.survivors.values().map(|e| &e.survivor)
    }

    /// Number of survivors.
    pub fn len(&self) -> usize {
        self.survivors.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.survivors.is_empty()
    }

    /// Whether every survivor's queue is idle.
    pub fn all_idle(&self) -> bool {
        self.survivors.values().all(|e| e.tasks.is_idle())
    }

    // -------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------

    /// Make `id` the selected survivor.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::SurvivorNotFound`] if no such survivor exists;
    /// the previous selection is kept.
    pub fn select(&mut self, id: SurvivorId) -> Result<(), AgentError> {
        let survivor = self.require(id)?;
        debug!(survivor = %id, name = %survivor.name, "Survivor selected");
        self.selected = Some(id);
        Ok(())
    }

    /// The selected survivor, if any.
    pub const fn selected(&self) -> Option<SurvivorId> {
        self.selected
    }
}

/// Distance from a region's middle to the center of its edge tiles.
#[allow(clippy::cast_precision_loss)]
fn edge_offset(region_size: u32) -> f32 {
    (region_size as f32 / 2.0 - 0.5).max(0.0)
}
