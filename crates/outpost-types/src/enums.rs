//! Enumeration types for the Outpost simulation.
//!
//! Terrain categories, prop tags, actions, jobs and resources. The
//! job ⇄ terrain ⇄ prop rules live here as `const fn` tables so that every
//! crate (task validation, job chains, region targeting) reads the same
//! source of truth.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Terrain
// ---------------------------------------------------------------------------

/// Terrain category of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionType {
    /// Open grass, farmable.
    Grass,
    /// Bare dirt.
    Dirt,
    /// Rocky ground. The shelter sits on the central stone region.
    Stone,
    /// Wooded region, home to trees.
    Forest,
}

// ---------------------------------------------------------------------------
// Props and actions
// ---------------------------------------------------------------------------

/// Category tag of a prop occupying a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropKind {
    /// A tree that can be chopped for wood.
    Tree,
    /// A crop that can be harvested for food.
    Crop,
    /// A boulder. No job is licensed to approach it.
    Rock,
}

impl PropKind {
    /// The action a survivor performs on this prop.
    pub const fn action(self) -> ActionKind {
        match self {
            Self::Tree => ActionKind::Chop,
            Self::Crop => ActionKind::Harvest,
            Self::Rock => ActionKind::Mine,
        }
    }
}

/// A timed action performed on a prop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Fell a tree.
    Chop,
    /// Gather a ripe crop.
    Harvest,
    /// Break up a rock.
    Mine,
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

/// A survivor's role.
///
/// A survivor without a job holds `None` in its `Option<JobKind>` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Works grass regions, harvesting crops.
    Farmer,
    /// Works forest regions, chopping trees.
    Lumberjack,
}

impl JobKind {
    /// Every job kind, in registration order.
    pub const ALL: [Self; 2] = [Self::Farmer, Self::Lumberjack];

    /// Whether a region of the given terrain can be bound for this job.
    pub const fn accepts_region(self, region_type: RegionType) -> bool {
        matches!(
            (self, region_type),
            (Self::Lumberjack, RegionType::Forest) | (Self::Farmer, RegionType::Grass)
        )
    }

    /// The prop category this job is licensed to approach and work on.
    pub const fn target_prop(self) -> PropKind {
        match self {
            Self::Farmer => PropKind::Crop,
            Self::Lumberjack => PropKind::Tree,
        }
    }
}

impl core::fmt::Display for JobKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Farmer => f.write_str("Farmer"),
            Self::Lumberjack => f.write_str("Lumberjack"),
        }
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// A countable resource held in region ledgers and survivor inventories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Lumber from chopped trees.
    Wood,
    /// Saplings occasionally dropped by chopped trees.
    Sapling,
    /// Food from harvested crops.
    Food,
    /// Seeds occasionally dropped by harvested crops.
    Seed,
    /// Stone from broken rocks.
    Stone,
}
