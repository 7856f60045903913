//! Error types for the `outpost-core` crate.
//!
//! [`CoreError`] covers job lookup, region binding, and coordination. None
//! of these is fatal: callers log the error and carry on, and a failed
//! operation leaves the world, registry, and queues as they were.

use outpost_agents::AgentError;
use outpost_types::{JobKind, RegionCoord, RegionType, SurvivorId};
use outpost_world::WorldError;

/// Errors that can occur during job assignment and region binding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The survivor has no bound region.
    #[error("no region bound to survivor {0}")]
    NoRegionBound(SurvivorId),

    /// No job is registered for the requested kind.
    #[error("job not registered: {0}")]
    JobNotRegistered(JobKind),

    /// The survivor does not exist.
    #[error("survivor not found: {0}")]
    SurvivorNotFound(SurvivorId),

    /// The survivor has no job to bind a region for.
    #[error("survivor {0} has no job")]
    NoJob(SurvivorId),

    /// A job button was pressed with no survivor selected.
    #[error("no survivor selected")]
    NoSurvivorSelected,

    /// The region is already bound to a survivor.
    #[error("region {region} is already assigned")]
    RegionAlreadyAssigned {
        /// The contested region.
        region: RegionCoord,
        /// The survivor currently holding it, if known.
        holder: Option<SurvivorId>,
    },

    /// The region's terrain does not suit the job.
    #[error("region {region} ({region_type:?}) is not valid for job {job}")]
    InvalidRegionForJob {
        /// The rejected region.
        region: RegionCoord,
        /// Its terrain category.
        region_type: RegionType,
        /// The job being targeted.
        job: JobKind,
    },

    /// The region has no free tile to walk to.
    #[error("no free tile in region {0}")]
    NoFreeTile(RegionCoord),

    /// A world-grid or ledger operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// A roster operation failed.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },
}
