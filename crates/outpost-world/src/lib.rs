//! Region grid, tiles, and resource ledgers for the Outpost simulation.
//!
//! This crate models the physical colony: a rectangular grid of regions,
//! each owning a square block of tiles, with props standing on tiles and a
//! counted resource ledger per region.
//!
//! # Modules
//!
//! - [`error`] -- Error types for grid and ledger operations.
//! - [`grid`] -- [`WorldGrid`], the world index: layout arithmetic,
//!   occupancy and nearest-free-tile queries, prop placement and removal.
//! - [`ledger`] -- [`ResourceLedger`], checked per-resource counts.
//! - [`region`] -- [`Region`], an assignable group of tiles.
//! - [`tile`] -- [`Tile`] and the [`Prop`] that may occupy it.

pub mod error;
pub mod grid;
pub mod ledger;
pub mod region;
pub mod tile;

pub use error::WorldError;
pub use grid::WorldGrid;
pub use ledger::ResourceLedger;
pub use region::Region;
pub use tile::{Prop, Tile};
