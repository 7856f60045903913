//! Jobs: how a role picks its region and what work it does there.
//!
//! Jobs are stateless. The [`JobRegistry`] maps each enabled [`JobKind`] to
//! its [`Job`] behaviour; survivors only carry the kind.

use std::collections::BTreeMap;

use outpost_agents::{Survivor, Task};
use outpost_types::{JobKind, PropKind, RegionType};
use outpost_world::Region;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::selector::RegionTargetSelector;

/// Behaviour of a survivor role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Job {
    /// Harvests crops on grass regions.
    Farmer,
    /// Chops trees in forest regions.
    Lumberjack,
}

impl Job {
    /// The job for `kind`.
    pub const fn from_kind(kind: JobKind) -> Self {
        match kind {
            JobKind::Farmer => Self::Farmer,
            JobKind::Lumberjack => Self::Lumberjack,
        }
    }

    /// The kind this job implements.
    pub const fn kind(self) -> JobKind {
        match self {
            Self::Farmer => JobKind::Farmer,
            Self::Lumberjack => JobKind::Lumberjack,
        }
    }

    /// The prop this job works on.
    pub const fn target_prop(self) -> PropKind {
        self.kind().target_prop()
    }

    /// Whether a region of `region_type` may be bound for this job.
    pub const fn is_valid_region(self, region_type: RegionType) -> bool {
        self.kind().accepts_region(region_type)
    }

    /// Give `survivor` this job and start region targeting for it.
    pub fn assign(self, survivor: &mut Survivor, selector: &mut RegionTargetSelector) {
        survivor.assign_job(self.kind());
        selector.begin(survivor.id, self.kind());
    }

    /// Build the work chain for `region`.
    ///
    /// One move followed by one action per tile holding this job's prop, in
    /// tile order. An empty chain is not an error.
    pub fn perform_job(self, survivor: &Survivor, region: &Region) -> Vec<Task> {
        let target = self.target_prop();
        let mut tasks = Vec::new();
        for tile in region.tiles_with(target) {
            let Some(prop) = tile.occupant() else {
                continue;
            };
            tasks.push(Task::move_to(tile.coord()));
            tasks.push(Task::PerformAction {
                tile: tile.coord(),
                prop: prop.id,
                action: prop.kind.action(),
            });
        }

        if tasks.is_empty() {
            info!(survivor = %survivor.id, region = %region.coord(), job = %self.kind(), prop = ?target, "No work found in region");
        } else {
            debug!(survivor = %survivor.id, region = %region.coord(), job = %self.kind(), tasks = tasks.len(), "Job chain built");
        }
        tasks
    }
}

/// Registry of enabled jobs, keyed by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRegistry {
    jobs: BTreeMap<JobKind, Job>,
}

impl JobRegistry {
    /// Register a job for every kind in `kinds`.
    pub fn new(kinds: impl IntoIterator<Item = JobKind>) -> Self {
        Self {
            jobs: kinds.into_iter().map(|k| (k, Job::from_kind(k))).collect(),
        }
    }

    /// Look up the job for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::JobNotRegistered`] if the kind is disabled.
    pub fn get(&self, kind: JobKind) -> Result<Job, CoreError> {
        self.jobs.get(&kind).copied().ok_or_else(|| {
            warn!(job = %kind, "Job not registered");
            CoreError::JobNotRegistered(kind)
        })
    }

    /// Enabled job kinds.
    pub fn kinds(&self) -> impl Iterator<Item = JobKind> + '_ {
        self.jobs.keys().copied()
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new(JobKind::ALL)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use outpost_agents::SurvivorStats;
    use outpost_types::{ActionKind, Position, RegionCoord, TileCoord};
    use outpost_world::WorldGrid;

    use super::*;

    fn survivor() -> Survivor {
        Survivor::new(String::from("Ada"), Position::ORIGIN, SurvivorStats::default())
    }

    #[test]
    fn lumberjack_chain_pairs_moves_and_chops_in_tile_order() {
        let mut world = WorldGrid::new(1, 1, 4, RegionType::Forest).unwrap();
        let trees = [TileCoord::new(3, 0), TileCoord::new(1, 2), TileCoord::new(0, 3)];
        for t in trees {
            world.place_prop(t, PropKind::Tree).unwrap();
        }
        world.place_prop(TileCoord::new(2, 2), PropKind::Rock).unwrap();
        let region = world.region(RegionCoord::new(0, 0)).unwrap();

        let tasks = Job::Lumberjack.perform_job(&survivor(), region);
        assert_eq!(tasks.len(), 6);
        for (pair, tile) in tasks.chunks(2).zip(trees) {
            assert_eq!(pair.first(), Some(&Task::move_to(tile)));
            assert!(matches!(
                pair.get(1),
                Some(Task::PerformAction { tile: t, action: ActionKind::Chop, .. }) if *t == tile
            ));
        }
    }

    #[test]
    fn farmer_ignores_trees() {
        let mut world = WorldGrid::new(1, 1, 3, RegionType::Grass).unwrap();
        world.place_prop(TileCoord::new(0, 0), PropKind::Tree).unwrap();
        world.place_prop(TileCoord::new(1, 1), PropKind::Crop).unwrap();
        let region = world.region(RegionCoord::new(0, 0)).unwrap();
        let tasks = Job::Farmer.perform_job(&survivor(), region);
        assert_eq!(tasks.len(), 2);
        assert!(matches!(
            tasks.get(1),
            Some(Task::PerformAction { action: ActionKind::Harvest, .. })
        ));
    }

    #[test]
    fn empty_region_yields_no_tasks() {
        let world = WorldGrid::new(1, 1, 3, RegionType::Forest).unwrap();
        let region = world.region(RegionCoord::new(0, 0)).unwrap();
        assert!(Job::Lumberjack.perform_job(&survivor(), region).is_empty());
    }

    #[test]
    fn assign_sets_job_and_starts_selecting() {
        let mut s = survivor();
        let mut selector = RegionTargetSelector::new();
        Job::Farmer.assign(&mut s, &mut selector);
        assert_eq!(s.job, Some(JobKind::Farmer));
        assert!(selector.is_selecting());
    }

    #[test]
    fn valid_regions_follow_the_job() {
        assert!(Job::Lumberjack.is_valid_region(RegionType::Forest));
        assert!(!Job::Lumberjack.is_valid_region(RegionType::Grass));
        assert!(Job::Farmer.is_valid_region(RegionType::Grass));
        assert!(!Job::Farmer.is_valid_region(RegionType::Stone));
        assert_eq!(Job::from_kind(JobKind::Farmer).kind(), JobKind::Farmer);
    }

    #[test]
    fn registry_rejects_disabled_jobs() {
        let registry = JobRegistry::new([JobKind::Lumberjack]);
        assert_eq!(registry.get(JobKind::Lumberjack), Ok(Job::Lumberjack));
        assert_eq!(
            registry.get(JobKind::Farmer),
            Err(CoreError::JobNotRegistered(JobKind::Farmer))
        );
        assert_eq!(JobRegistry::default().kinds().count(), 2);
    }
}
