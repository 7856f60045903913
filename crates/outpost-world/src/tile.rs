//! Tiles and the props that occupy them.
//!
//! A [`Tile`] is the smallest addressable grid unit. It is owned by exactly
//! one region and never exists on its own. A tile can be occupied by a
//! [`Prop`] (tree, crop, rock) or reserved without one (the shelter's
//! footprint).

use outpost_types::{PropId, PropKind, Position, TileCoord};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// A harvestable or blocking object standing on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prop {
    /// Identity of this prop instance.
    pub id: PropId,
    /// Category tag.
    pub kind: PropKind,
}

impl Prop {
    /// Create a new prop of the given kind with a fresh id.
    pub fn new(kind: PropKind) -> Self {
        Self {
            id: PropId::new(),
            kind,
        }
    }
}

/// A single grid cell inside a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    coord: TileCoord,
    position: Position,
    occupied: bool,
    occupant: Option<Prop>,
}

impl Tile {
    /// Create a free tile.
    pub const fn new(coord: TileCoord, position: Position) -> Self {
        Self {
            coord,
            position,
            occupied: false,
            occupant: None,
        }
    }

    /// Grid coordinate of this tile.
    pub const fn coord(&self) -> TileCoord {
        self.coord
    }

    /// World position of the tile's surface center.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Whether something stands on this tile.
    pub const fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// The prop on this tile, if any.
    pub const fn occupant(&self) -> Option<Prop> {
        self.occupant
    }

    /// Whether the prop with `id` is still on this tile.
    pub fn holds(&self, id: PropId) -> bool {
        self.occupant.is_some_and(|p| p.id == id)
    }

    /// Place `prop` on this tile.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TileOccupied`] if the tile is already occupied.
    pub fn occupy(&mut self, prop: Prop) -> Result<(), WorldError> {
        if self.occupied {
            return Err(WorldError::TileOccupied(self.coord));
        }
        self.occupied = true;
        self.occupant = Some(prop);
        Ok(())
    }

    /// Mark the tile occupied without a prop.
    pub const fn reserve(&mut self) {
        self.occupied = true;
    }

    /// Remove and return the prop, freeing the tile.
    pub const fn take_occupant(&mut self) -> Option<Prop> {
        let prop = self.occupant.take();
        if prop.is_some() {
            self.occupied = false;
        }
        prop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile() -> Tile {
        Tile::new(TileCoord::new(1, 2), Position::new(1.0, 0.0, 2.0))
    }

    #[test]
    fn new_tile_is_free() {
        let t = tile();
        assert!(!t.is_occupied());
        assert!(t.occupant().is_none());
    }

    #[test]
    fn occupy_then_take_frees_tile() {
        let mut t = tile();
        let prop = Prop::new(PropKind::Tree);
        assert!(t.occupy(prop).is_ok());
        assert!(t.is_occupied());
        assert!(t.holds(prop.id));
        assert_eq!(t.take_occupant(), Some(prop));
        assert!(!t.is_occupied());
        assert!(!t.holds(prop.id));
    }

    #[test]
    fn cannot_double_occupy() {
        let mut t = tile();
        assert!(t.occupy(Prop::new(PropKind::Tree)).is_ok());
        assert_eq!(
            t.occupy(Prop::new(PropKind::Rock)),
            Err(WorldError::TileOccupied(TileCoord::new(1, 2)))
        );
    }

    #[test]
    fn reserved_tile_stays_occupied_without_prop() {
        let mut t = tile();
        t.reserve();
        assert!(t.is_occupied());
        assert!(t.take_occupant().is_none());
        assert!(t.is_occupied());
    }
}
