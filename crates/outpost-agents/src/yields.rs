//! Yield tables for timed actions.
//!
//! Finishing an action on a prop produces a primary resource drawn uniformly
//! from `[min, max]`, plus a secondary resource that only drops when an
//! independent unit draw is at or below `secondary_chance`.

use outpost_types::{PropKind, Resource};
use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

/// An inclusive count range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldRange {
    /// Smallest count (inclusive).
    pub min: u32,
    /// Largest count (inclusive).
    pub max: u32,
}

impl YieldRange {
    /// Construct a range.
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Whether `count` lies inside the range.
    pub const fn contains(self, count: u32) -> bool {
        count >= self.min && count <= self.max
    }
}

/// What one prop kind yields when its action completes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropYield {
    /// Resource always produced.
    pub primary: Resource,
    /// Count range of the primary resource.
    pub primary_range: YieldRange,
    /// Resource produced on a successful chance draw.
    pub secondary: Resource,
    /// Probability in `[0, 1]` that the secondary resource drops.
    pub secondary_chance: f64,
    /// Count range of the secondary resource.
    pub secondary_range: YieldRange,
}

impl PropYield {
    /// Trees: 1-5 wood, and a 25% chance of 1-2 saplings.
    pub const fn tree() -> Self {
        Self {
            primary: Resource::Wood,
            primary_range: YieldRange::new(1, 5),
            secondary: Resource::Sapling,
            secondary_chance: 0.25,
            secondary_range: YieldRange::new(1, 2),
        }
    }

    /// Crops: 2-4 food, and an even chance of 1-3 seeds.
    pub const fn crop() -> Self {
        Self {
            primary: Resource::Food,
            primary_range: YieldRange::new(2, 4),
            secondary: Resource::Seed,
            secondary_chance: 0.5,
            secondary_range: YieldRange::new(1, 3),
        }
    }

    /// Rocks: 1-3 stone, nothing else.
    pub const fn rock() -> Self {
        Self {
            primary: Resource::Stone,
            primary_range: YieldRange::new(1, 3),
            secondary: Resource::Stone,
            secondary_chance: 0.0,
            secondary_range: YieldRange::new(0, 0),
        }
    }

    /// Roll the yield.
    ///
    /// Draw order is fixed: primary count, chance draw, then secondary count
    /// (only when the chance draw succeeds).
    pub fn roll(&self, rng: &mut dyn RandomSource) -> YieldRoll {
        let primary = rng.range_inclusive(self.primary_range.min, self.primary_range.max);
        let secondary = if rng.unit() <= self.secondary_chance {
            rng.range_inclusive(self.secondary_range.min, self.secondary_range.max)
        } else {
            0
        };
        YieldRoll {
            primary: (self.primary, primary),
            secondary: (self.secondary, secondary),
        }
    }
}

/// Rolled quantities of one completed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldRoll {
    /// Primary resource and count.
    pub primary: (Resource, u32),
    /// Secondary resource and count (zero when the chance draw failed).
    pub secondary: (Resource, u32),
}

/// Yield definitions for every prop kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldTable {
    /// Yield of a chopped tree.
    #[serde(default = "PropYield::tree")]
    pub tree: PropYield,
    /// Yield of a harvested crop.
    #[serde(default = "PropYield::crop")]
    pub crop: PropYield,
    /// Yield of a mined rock.
    #[serde(default = "PropYield::rock")]
    pub rock: PropYield,
}

impl YieldTable {
    /// The yield for `kind`.
    pub const fn for_prop(&self, kind: PropKind) -> &PropYield {
        match kind {
            PropKind::Tree => &self.tree,
            PropKind::Crop => &self.crop,
            PropKind::Rock => &self.rock,
        }
    }
}

impl Default for YieldTable {
    fn default() -> Self {
        Self {
            tree: PropYield::tree(),
            crop: PropYield::crop(),
            rock: PropYield::rock(),
        }
    }
}
