//! The world index: a rectangular grid of square regions.
//!
//! [`WorldGrid`] owns every [`Region`] (and through them every [`Tile`]) and
//! answers the spatial questions the scheduling core asks: which region a
//! tile or position belongs to, whether a tile is occupied, and which free
//! tile of a region is nearest to a point.
//!
//! Layout is fixed at construction. Tile `(tx, ty)` sits at world position
//! `(tx, 0, ty)` with a spacing of one unit, and belongs to region
//! `(tx / region_size, ty / region_size)`.

use std::collections::BTreeMap;

use outpost_types::{Position, PropId, PropKind, RegionCoord, RegionType, Resource, TileCoord};
use tracing::debug;

use crate::error::WorldError;
use crate::region::Region;
use crate::tile::{Prop, Tile};

/// Grid of regions, each holding `region_size * region_size` tiles.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WorldGrid {
    /// Number of regions along X.
    width: u32,
    /// Number of regions along Z.
    depth: u32,
    /// Tiles per region side.
    region_size: u32,
    /// All regions indexed by grid coordinate.
    regions: BTreeMap<RegionCoord, Region>,
}

impl WorldGrid {
    /// Build a grid where every region starts with `region_type`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidGrid`] if any dimension is zero or the
    /// total tile span does not fit in a `u32`.
    pub fn new(
        width: u32,
        depth: u32,
        region_size: u32,
        region_type: RegionType,
    ) -> Result<Self, WorldError> {
        if width == 0 || depth == 0 || region_size == 0 {
            return Err(WorldError::InvalidGrid {
                reason: format!("width={width} depth={depth} region_size={region_size}"),
            });
        }
        let span_overflow = || WorldError::InvalidGrid {
            reason: format!("{width}x{depth} regions of {region_size} tiles overflow u32"),
        };
        width.checked_mul(region_size).ok_or_else(span_overflow)?;
        depth.checked_mul(region_size).ok_or_else(span_overflow)?;

        let mut regions = BTreeMap::new();
        for ry in 0..depth {
            for rx in 0..width {
                let coord = RegionCoord::new(rx, ry);
                let tiles = build_tiles(coord, region_size)?;
                regions.insert(coord, Region::new(coord, region_type, tiles));
            }
        }

        debug!(width, depth, region_size, "World grid built");
        Ok(Self {
            width,
            depth,
            region_size,
            regions,
        })
    }

    // -------------------------------------------------------------------
    // Dimensions
    // -------------------------------------------------------------------

    /// Number of regions along X.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of regions along Z.
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Tiles per region side.
    pub const fn region_size(&self) -> u32 {
        self.region_size
    }

    /// The region in the middle of the grid (rounded down).
    pub const fn center_region(&self) -> RegionCoord {
        RegionCoord::new(self.width / 2, self.depth / 2)
    }

    // -------------------------------------------------------------------
    // Region access
    // -------------------------------------------------------------------

    /// Get a region by coordinate.
    pub fn region(&self, coord: RegionCoord) -> Option<&Region> {
        self.regions.get(&coord)
    }

    /// Get a region by coordinate, mutably.
    pub fn region_mut(&mut self, coord: RegionCoord) -> Option<&mut Region> {
        self.regions.get_mut(&coord)
    }

    /// Get a region or fail with [`WorldError::RegionNotFound`].
    pub fn require_region(&self, coord: RegionCoord) -> Result<&Region, WorldError> {
        self.regions
            .get(&coord)
            .ok_or(WorldError::RegionNotFound(coord))
    }

    /// Get a region mutably or fail with [`WorldError::RegionNotFound`].
    pub fn require_region_mut(&mut self, coord: RegionCoord) -> Result<&mut Region, WorldError> {
        self.regions
            .get_mut(&coord)
            .ok_or(WorldError::RegionNotFound(coord))
    }

    /// Iterate over all regions in coordinate order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    /// Number of regions in the grid.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Change a region's terrain category.
    pub fn set_region_type(
        &mut self,
        coord: RegionCoord,
        region_type: RegionType,
    ) -> Result<(), WorldError> {
        self.require_region_mut(coord)?.set_region_type(region_type);
        Ok(())
    }

    /// World position of a region's middle, at ground height.
    ///
    /// For even region sizes this falls between the two central tiles.
    pub fn region_center(&self, coord: RegionCoord) -> Result<Position, WorldError> {
        self.require_region(coord)?;
        let base_x = coord.x.checked_mul(self.region_size);
        let base_y = coord.y.checked_mul(self.region_size);
        let (Some(base_x), Some(base_y)) = (base_x, base_y) else {
            return Err(WorldError::ArithmeticOverflow {
                context: format!("center of {coord}"),
            });
        };
        let half = (to_world(self.region_size) - 1.0) / 2.0;
        Ok(Position::new(
            to_world(base_x) + half,
            0.0,
            to_world(base_y) + half,
        ))
    }

    // -------------------------------------------------------------------
    // Tile access
    // -------------------------------------------------------------------

    /// The region owning `tile`, if the tile is inside the grid.
    pub fn region_of_tile(&self, tile: TileCoord) -> Option<RegionCoord> {
        let coord = RegionCoord::new(
            tile.x.checked_div(self.region_size)?,
            tile.y.checked_div(self.region_size)?,
        );
        self.regions.contains_key(&coord).then_some(coord)
    }

    /// The tile whose cell contains `position`, if inside the grid.
    pub fn tile_at(&self, position: Position) -> Option<TileCoord> {
        let tile = TileCoord::new(to_grid(position.x)?, to_grid(position.z)?);
        self.region_of_tile(tile).map(|_| tile)
    }

    /// The region whose area contains `position`, if inside the grid.
    pub fn region_at(&self, position: Position) -> Option<RegionCoord> {
        self.tile_at(position)
            .and_then(|tile| self.region_of_tile(tile))
    }

    /// Get a tile by global coordinate.
    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        let region = self.region_of_tile(coord)?;
        self.regions.get(&region)?.tile(coord)
    }

    /// Get a tile by global coordinate, mutably.
    pub fn tile_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        let region = self.region_of_tile(coord)?;
        self.regions.get_mut(&region)?.tile_mut(coord)
    }

    /// Whether `tile` is occupied.
    ///
    /// Tiles outside the grid report as occupied: nothing can stand there.
    pub fn tile_is_occupied(&self, tile: TileCoord) -> bool {
        self.tile(tile).is_none_or(Tile::is_occupied)
    }

    /// The free tile of `region` nearest to `from`.
    pub fn nearest_free_tile(&self, region: RegionCoord, from: Position) -> Option<TileCoord> {
        self.regions
            .get(&region)?
            .nearest_free_tile(from)
            .map(Tile::coord)
    }

    // -------------------------------------------------------------------
    // Props
    // -------------------------------------------------------------------

    /// The prop standing on `tile`, if any.
    pub fn prop_at(&self, tile: TileCoord) -> Option<Prop> {
        self.tile(tile).and_then(Tile::occupant)
    }

    /// Place a new prop of `kind` on `tile`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TileNotFound`] for a tile outside the grid, or
    /// [`WorldError::TileOccupied`] if something already stands there.
    pub fn place_prop(&mut self, tile: TileCoord, kind: PropKind) -> Result<PropId, WorldError> {
        let prop = Prop::new(kind);
        self.tile_mut(tile)
            .ok_or(WorldError::TileNotFound(tile))?
            .occupy(prop)?;
        Ok(prop.id)
    }

    /// Mark `tile` occupied without placing a prop on it.
    pub fn reserve_tile(&mut self, tile: TileCoord) -> Result<(), WorldError> {
        self.tile_mut(tile)
            .ok_or(WorldError::TileNotFound(tile))?
            .reserve();
        Ok(())
    }

    /// Remove the prop `id` from `tile`, freeing it.
    ///
    /// Returns `None` when the tile no longer holds that prop.
    pub fn take_prop(&mut self, tile: TileCoord, id: PropId) -> Option<Prop> {
        let slot = self.tile_mut(tile)?;
        if !slot.holds(id) {
            return None;
        }
        let prop = slot.take_occupant();
        debug!(tile = %tile, "Prop removed");
        prop
    }

    // -------------------------------------------------------------------
    // Yields
    // -------------------------------------------------------------------

    /// Credit `yields` to the ledger of the region owning `tile`.
    ///
    /// Zero amounts are skipped. The whole deposit is validated before any
    /// count changes. Returns the region that received the yield.
    pub fn deposit_yield(
        &mut self,
        tile: TileCoord,
        yields: &[(Resource, u32)],
    ) -> Result<RegionCoord, WorldError> {
        let coord = self
            .region_of_tile(tile)
            .ok_or(WorldError::TileNotFound(tile))?;
        let region = self.require_region_mut(coord)?;

        let mut staged = region.resources().clone();
        for &(resource, amount) in yields.iter().filter(|(_, amount)| *amount > 0) {
            staged.add(resource, amount)?;
        }
        *region.resources_mut() = staged;

        debug!(region = %coord, tile = %tile, ?yields, "Yield deposited");
        Ok(coord)
    }
}

// ---------------------------------------------------------------------------
// Layout helpers
// ---------------------------------------------------------------------------

fn build_tiles(region: RegionCoord, size: u32) -> Result<Vec<Tile>, WorldError> {
    let overflow = || WorldError::ArithmeticOverflow {
        context: format!("tile layout of {region}"),
    };
    let base_x = region.x.checked_mul(size).ok_or_else(overflow)?;
    let base_y = region.y.checked_mul(size).ok_or_else(overflow)?;

    let capacity = usize::try_from(size.checked_mul(size).ok_or_else(overflow)?)
        .map_err(|_e| overflow())?;
    let mut tiles = Vec::with_capacity(capacity);
    for ly in 0..size {
        for lx in 0..size {
            let tx = base_x.checked_add(lx).ok_or_else(overflow)?;
            let ty = base_y.checked_add(ly).ok_or_else(overflow)?;
            tiles.push(Tile::new(
                TileCoord::new(tx, ty),
                Position::new(to_world(tx), 0.0, to_world(ty)),
            ));
        }
    }
    Ok(tiles)
}

/// Grid index to world coordinate.
#[allow(clippy::cast_precision_loss)]
const fn to_world(index: u32) -> f32 {
    index as f32
}

/// World coordinate to the grid index of the cell containing it.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_grid(value: f32) -> Option<u32> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded < 0.0 || rounded > to_world(u32::MAX) {
        return None;
    }
    Some(rounded as u32)
}
