//! Grid coordinates and world-space positions.
//!
//! Regions and tiles are identified by their grid coordinates. Tile
//! coordinates are global (not relative to their region); the world grid
//! derives the owning region from them.

use serde::{Deserialize, Serialize};

/// Grid coordinate of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionCoord {
    /// Column (grid X).
    pub x: u32,
    /// Row (grid Y, world Z).
    pub y: u32,
}

impl RegionCoord {
    /// Construct a region coordinate.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl core::fmt::Display for RegionCoord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Region_{},{}", self.x, self.y)
    }
}

/// Global grid coordinate of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Column (grid X).
    pub x: u32,
    /// Row (grid Y, world Z).
    pub y: u32,
}

impl TileCoord {
    /// Construct a tile coordinate.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl core::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Tile_{},{}", self.x, self.y)
    }
}

/// A point in world space. `y` is up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// World X.
    pub x: f32,
    /// World Y (height).
    pub y: f32,
    /// World Z.
    pub z: f32,
}

impl Position {
    /// The world origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    /// Construct a position.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Self) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        dz.mul_add(dz, dx.mul_add(dx, dy * dy)).sqrt()
    }

    /// This position shifted up by `dy`.
    pub const fn raised(self, dy: f32) -> Self {
        Self::new(self.x, self.y + dy, self.z)
    }

    /// Step from `self` toward `target` by at most `max_delta`.
    ///
    /// Lands exactly on `target` when it is within reach. A non-positive
    /// `max_delta` leaves the position unchanged.
    pub fn move_towards(self, target: Self, max_delta: f32) -> Self {
        let dist = self.distance(target);
        if dist <= max_delta || dist <= f32::EPSILON {
            return target;
        }
        if max_delta <= 0.0 {
            return self;
        }
        let t = max_delta / dist;
        Self::new(
            (target.x - self.x).mul_add(t, self.x),
            (target.y - self.y).mul_add(t, self.y),
            (target.z - self.z).mul_add(t, self.z),
        )
    }
}
