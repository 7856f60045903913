//! Interfaces to the presentation layer, with scripted and recording
//! implementations.
//!
//! The core never draws anything or reads raw input. It talks to:
//!
//! - a [`PointerInput`] that reports where the pointer hits the ground and
//!   whether the commit button went down this frame;
//! - a [`Highlighter`] that shows or hides region highlights;
//! - a [`YieldSink`] that spawns yields in the world (re-exported from
//!   `outpost-agents`).
//!
//! [`ScriptedPointer`], [`RecordingHighlighter`] and [`RecordingYieldSink`]
//! drive the headless engine and the tests.

use std::collections::{BTreeMap, VecDeque};

use outpost_types::{Position, RegionCoord, Resource, TileCoord};
use outpost_world::WorldGrid;
use serde::Serialize;

pub use outpost_agents::YieldSink;

// ---------------------------------------------------------------------------
// Pointer
// ---------------------------------------------------------------------------

/// Pointer state for the current frame.
pub trait PointerInput {
    /// Latch input for a new frame. Called once at the start of every tick.
    fn begin_frame(&mut self) {}

    /// Where the pointer ray hits the ground, if anywhere.
    fn pointer_position(&self) -> Option<Position>;

    /// Whether commit was pressed this frame (edge-triggered).
    fn commit_pressed(&self) -> bool;

    /// The region under the pointer.
    fn resolve_hovered_region(&self, world: &WorldGrid) -> Option<RegionCoord> {
        self.pointer_position().and_then(|p| world.region_at(p))
    }
}

/// One frame of scripted pointer input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerFrame {
    /// Ground hit point, `None` when the pointer is off the grid.
    pub position: Option<Position>,
    /// Commit pressed this frame.
    pub commit: bool,
}

impl PointerFrame {
    /// Pointer off the grid, nothing pressed.
    pub const fn idle() -> Self {
        Self {
            position: None,
            commit: false,
        }
    }

    /// Pointer resting on `position`.
    pub const fn hover(position: Position) -> Self {
        Self {
            position: Some(position),
            commit: false,
        }
    }

    /// Commit pressed while pointing at `position`.
    pub const fn commit(position: Position) -> Self {
        Self {
            position: Some(position),
            commit: true,
        }
    }
}

/// Pointer that replays one frame per tick, then sits idle.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPointer {
    frames: VecDeque<PointerFrame>,
    current: PointerFrame,
}

impl ScriptedPointer {
    /// Create a pointer replaying `frames` in order.
    pub fn new(frames: impl IntoIterator<Item = PointerFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            current: PointerFrame::idle(),
        }
    }

    /// Append a frame to the script.
    pub fn push(&mut self, frame: PointerFrame) {
        self.frames.push_back(frame);
    }

    /// Frames not yet replayed.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl PointerInput for ScriptedPointer {
    fn begin_frame(&mut self) {
        self.current = self.frames.pop_front().unwrap_or_default();
    }

    fn pointer_position(&self) -> Option<Position> {
        self.current.position
    }

    fn commit_pressed(&self) -> bool {
        self.current.commit
    }
}

// ---------------------------------------------------------------------------
// Highlighting
// ---------------------------------------------------------------------------

/// Shows and hides region highlights.
pub trait Highlighter {
    /// Show (`visible`) or hide a region's highlight, tinted by `valid`.
    fn set_highlight(&mut self, region: RegionCoord, visible: bool, valid: bool);
}

/// One recorded highlight call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightCall {
    /// Target region.
    pub region: RegionCoord,
    /// Shown or hidden.
    pub visible: bool,
    /// Validity tint.
    pub valid: bool,
}

/// Highlighter that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingHighlighter {
    /// Calls in the order they were made.
    pub calls: Vec<HighlightCall>,
}

impl RecordingHighlighter {
    /// Create an empty recorder.
    pub const fn new() -> Self {
        Self { calls: Vec::new() }
    }

    /// The most recent call for `region`.
    pub fn last_for(&self, region: RegionCoord) -> Option<HighlightCall> {
        self.calls.iter().rev().find(|c| c.region == region).copied()
    }

    /// Regions whose latest call left them highlighted.
    pub fn visible_regions(&self) -> Vec<RegionCoord> {
        let mut latest: BTreeMap<RegionCoord, bool> = BTreeMap::new();
        for call in &self.calls {
            latest.insert(call.region, call.visible);
        }
        latest
            .into_iter()
            .filter_map(|(region, visible)| visible.then_some(region))
            .collect()
    }
}

impl Highlighter for RecordingHighlighter {
    fn set_highlight(&mut self, region: RegionCoord, visible: bool, valid: bool) {
        tracing::trace!(region = %region, visible, valid, "Highlight");
        self.calls.push(HighlightCall {
            region,
            visible,
            valid,
        });
    }
}

// ---------------------------------------------------------------------------
// Yield spawning
// ---------------------------------------------------------------------------

/// One recorded yield spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpawnedYield {
    /// Where the yield appeared.
    pub tile: TileCoord,
    /// Primary resource and count.
    pub primary: (Resource, u32),
    /// Secondary resource and count.
    pub secondary: (Resource, u32),
}

/// Yield sink that records every spawn.
#[derive(Debug, Clone, Default)]
pub struct RecordingYieldSink {
    /// Spawns in the order they happened.
    pub spawned: Vec<SpawnedYield>,
}

impl RecordingYieldSink {
    /// Create an empty recorder.
    pub const fn new() -> Self {
        Self {
            spawned: Vec::new(),
        }
    }

    /// Total count of `resource` across all spawns, saturating.
    pub fn total(&self, resource: Resource) -> u32 {
        self.spawned
            .iter()
            .flat_map(|s| [s.primary, s.secondary])
            .filter(|(r, _)| *r == resource)
            .fold(0_u32, |acc, (_, n)| acc.saturating_add(n))
    }
}

impl YieldSink for RecordingYieldSink {
    fn spawn_yield(&mut self, tile: TileCoord, primary: (Resource, u32), secondary: (Resource, u32)) {
        self.spawned.push(SpawnedYield {
            tile,
            primary,
            secondary,
        });
    }
}

#[cfg(test)]
mod tests {
    use outpost_types::RegionType;

    use super::*;

    #[test]
    fn scripted_pointer_replays_then_idles() {
        let at = Position::new(1.0, 0.0, 1.0);
        let mut pointer = ScriptedPointer::new([PointerFrame::hover(at), PointerFrame::commit(at)]);
        pointer.begin_frame();
        assert_eq!(pointer.pointer_position(), Some(at));
        assert!(!pointer.commit_pressed());
        pointer.begin_frame();
        assert!(pointer.commit_pressed());
        pointer.begin_frame();
        assert_eq!(pointer.pointer_position(), None);
        assert!(!pointer.commit_pressed());
    }

    #[test]
    fn pointer_resolves_region_through_world() {
        let world = WorldGrid::new(2, 2, 4, RegionType::Grass);
        let Ok(world) = world else {
            panic!("grid should build");
        };
        let mut pointer = ScriptedPointer::new([PointerFrame::hover(Position::new(5.0, 0.0, 1.0))]);
        pointer.begin_frame();
        assert_eq!(
            pointer.resolve_hovered_region(&world),
            Some(RegionCoord::new(1, 0))
        );
    }

    #[test]
    fn recording_highlighter_tracks_visibility() {
        let mut h = RecordingHighlighter::new();
        let a = RegionCoord::new(0, 0);
        let b = RegionCoord::new(1, 0);
        h.set_highlight(a, true, false);
        h.set_highlight(a, false, false);
        h.set_highlight(b, true, true);
        assert_eq!(h.visible_regions(), vec![b]);
        assert_eq!(
            h.last_for(b),
            Some(HighlightCall {
                region: b,
                visible: true,
                valid: true
            })
        );
    }

    #[test]
    fn recording_sink_totals_resources() {
        let mut sink = RecordingYieldSink::new();
        let tile = TileCoord::new(0, 0);
        sink.spawn_yield(tile, (Resource::Wood, 3), (Resource::Sapling, 1));
        sink.spawn_yield(tile, (Resource::Wood, 2), (Resource::Sapling, 0));
        assert_eq!(sink.total(Resource::Wood), 5);
        assert_eq!(sink.total(Resource::Sapling), 1);
    }
}
