//! Error types for the `outpost-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

use outpost_types::{RegionCoord, Resource, TileCoord};

/// Errors that can occur during world-grid and ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// A region was not found in the grid.
    #[error("region not found: {0}")]
    RegionNotFound(RegionCoord),

    /// A tile was not found in the grid.
    #[error("tile not found: {0}")]
    TileNotFound(TileCoord),

    /// A prop was placed on a tile that is already occupied.
    #[error("tile {0} is already occupied")]
    TileOccupied(TileCoord),

    /// A ledger removal asked for more than is stored.
    #[error("insufficient resource: wanted {requested} of {resource:?} but only have {available}")]
    InsufficientResource {
        /// The resource being removed.
        resource: Resource,
        /// The quantity the caller attempted to remove.
        requested: u32,
        /// The quantity actually stored.
        available: u32,
    },

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in world calculation: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },

    /// The grid was constructed with a zero or oversized dimension.
    #[error("invalid grid dimensions: {reason}")]
    InvalidGrid {
        /// Explanation of what is wrong with the dimensions.
        reason: String,
    },
}
