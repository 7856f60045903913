//! Regions: assignable groups of tiles sharing one terrain type.
//!
//! A [`Region`] owns its tiles in row-major order, carries an `assigned`
//! flag that flips false → true exactly once (on a successful binding), and
//! keeps a [`ResourceLedger`] of stock produced inside it.

use outpost_types::{Position, PropKind, RegionCoord, RegionType, TileCoord};
use serde::{Deserialize, Serialize};

use crate::ledger::ResourceLedger;
use crate::tile::Tile;

/// A grid cell grouping of tiles, assignable as a unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    coord: RegionCoord,
    region_type: RegionType,
    tiles: Vec<Tile>,
    assigned: bool,
    resources: ResourceLedger,
}

impl Region {
    /// Create an unassigned region with an empty ledger.
    pub const fn new(coord: RegionCoord, region_type: RegionType, tiles: Vec<Tile>) -> Self {
        Self {
            coord,
            region_type,
            tiles,
            assigned: false,
            resources: ResourceLedger::new(),
        }
    }

    /// Grid coordinate of this region.
    pub const fn coord(&self) -> RegionCoord {
        self.coord
    }

    /// Terrain category.
    pub const fn region_type(&self) -> RegionType {
        self.region_type
    }

    /// Change the terrain category (scenario setup only).
    pub const fn set_region_type(&mut self, region_type: RegionType) {
        self.region_type = region_type;
    }

    /// Tiles in row-major order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Look up a tile owned by this region.
    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.coord() == coord)
    }

    /// Look up a tile owned by this region, mutably.
    pub fn tile_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        self.tiles.iter_mut().find(|t| t.coord() == coord)
    }

    /// Tiles holding a prop of `kind`, in tile order.
    pub fn tiles_with(&self, kind: PropKind) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles
            .iter()
            .filter(move |t| t.is_occupied() && t.occupant().is_some_and(|p| p.kind == kind))
    }

    /// Whether a survivor is bound to this region.
    pub const fn is_assigned(&self) -> bool {
        self.assigned
    }

    /// Set the assigned flag.
    ///
    /// Returns `false` (and changes nothing) if the region was already
    /// assigned. There is deliberately no way to clear the flag.
    pub const fn mark_assigned(&mut self) -> bool {
        if self.assigned {
            return false;
        }
        self.assigned = true;
        true
    }

    /// The free tile closest to `from`, if any.
    ///
    /// Ties resolve to the earliest tile in row-major order.
    pub fn nearest_free_tile(&self, from: Position) -> Option<&Tile> {
        let mut nearest: Option<(&Tile, f32)> = None;
        for tile in self.tiles.iter().filter(|t| !t.is_occupied()) {
            let distance = from.distance(tile.position());
            match nearest {
                Some((_, best)) if best <= distance => {}
                _ => nearest = Some((tile, distance)),
            }
        }
        nearest.map(|(tile, _)| tile)
    }

    /// The region's resource stock.
    pub const fn resources(&self) -> &ResourceLedger {
        &self.resources
    }

    /// The region's resource stock, mutably.
    pub const fn resources_mut(&mut self) -> &mut ResourceLedger {
        &mut self.resources
    }
}
