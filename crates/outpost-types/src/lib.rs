//! Shared type definitions for the Outpost colony simulation.
//!
//! This crate is the single source of truth for identifiers, grid
//! coordinates and enumerations used across the Outpost workspace.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for survivors and props
//! - [`enums`] -- Terrain, prop, action, job and resource enumerations
//! - [`structs`] -- Grid coordinates and world-space positions

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ActionKind, JobKind, PropKind, RegionType, Resource};
pub use ids::{PropId, SurvivorId};
pub use structs::{Position, RegionCoord, TileCoord};
