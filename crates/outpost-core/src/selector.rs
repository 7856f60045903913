//! Region target selector: the player picks a region for a survivor's job.
//!
//! A two-state machine. [`Job::assign`](crate::jobs::Job::assign) moves it
//! from `Idle` to `Selecting`; every tick while selecting it follows the
//! pointer, highlighting the hovered region green or red depending on
//! whether its terrain suits the job. A commit on a valid, unassigned
//! region binds it and returns to `Idle`; any other commit is rejected and
//! selection continues.
//!
//! Only one survivor can be selecting at a time. Starting a new selection
//! replaces the pending one.

use outpost_types::{JobKind, RegionCoord, RegionType, SurvivorId};
use outpost_world::WorldGrid;
use serde::Serialize;
use tracing::{debug, warn};

use crate::collaborators::{Highlighter, PointerInput};
use crate::error::CoreError;
use crate::jobs::Job;
use crate::registry::{AssignmentRegistry, Binding};

/// Selector state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SelectorState {
    /// Not targeting.
    #[default]
    Idle,
    /// Waiting for the player to commit a region.
    Selecting {
        /// Survivor the region is for.
        survivor: SurvivorId,
        /// Job the region must suit.
        job: JobKind,
    },
}

/// Why a commit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rejection {
    /// The pointer was not over any region.
    NothingHovered,
    /// The region's terrain does not suit the job.
    InvalidRegionType {
        /// Terrain of the hovered region.
        region_type: RegionType,
    },
    /// The region is already bound to a survivor.
    AlreadyAssigned {
        /// The survivor holding it, if known.
        holder: Option<SurvivorId>,
    },
}

/// What happened on one selector update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectionEvent {
    /// The selector is idle.
    Inactive,
    /// Still selecting, nothing committed.
    Pending,
    /// A commit was refused; still selecting.
    Rejected {
        /// Region under the pointer at commit time.
        region: Option<RegionCoord>,
        /// Why it was refused.
        reason: Rejection,
    },
    /// A region was bound; the selector is idle again.
    Committed {
        /// The new binding.
        binding: Binding,
        /// The job the region was picked for.
        job: JobKind,
    },
}

/// Frame-driven region picker.
#[derive(Debug, Clone, Default)]
pub struct RegionTargetSelector {
    state: SelectorState,
    hovered: Option<RegionCoord>,
}

impl RegionTargetSelector {
    /// Create an idle selector.
    pub const fn new() -> Self {
        Self {
            state: SelectorState::Idle,
            hovered: None,
        }
    }

    /// Current state.
    pub const fn state(&self) -> SelectorState {
        self.state
    }

    /// Whether a selection is in progress.
    pub const fn is_selecting(&self) -> bool {
        matches!(self.state, SelectorState::Selecting { .. })
    }

    /// Region hovered on the last update.
    pub const fn hovered(&self) -> Option<RegionCoord> {
        self.hovered
    }

    /// Start selecting a region for `survivor`'s `job`.
    ///
    /// Replaces any pending selection. The current hover highlight stays
    /// and is re-evaluated when the pointer moves to another region.
    pub fn begin(&mut self, survivor: SurvivorId, job: JobKind) {
        if let SelectorState::Selecting {
            survivor: pending, ..
        } = self.state
            && pending != survivor
        {
            warn!(pending = %pending, survivor = %survivor, "Replacing pending region selection");
        }
        debug!(survivor = %survivor, job = %job, "Region selection started");
        self.state = SelectorState::Selecting { survivor, job };
    }

    /// Process one frame of pointer input.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::World`] if the hovered region vanished from the
    /// grid. Refused commits are events, not errors.
    pub fn update(
        &mut self,
        world: &mut WorldGrid,
        registry: &mut AssignmentRegistry,
        pointer: &dyn PointerInput,
        highlighter: &mut dyn Highlighter,
    ) -> Result<SelectionEvent, CoreError> {
        let SelectorState::Selecting { survivor, job } = self.state else {
            return Ok(SelectionEvent::Inactive);
        };

        let hovered = pointer.resolve_hovered_region(world);
        if hovered != self.hovered {
            if let Some(previous) = self.hovered {
                highlighter.set_highlight(previous, false, false);
            }
            if let Some(current) = hovered {
                let region_type = world.require_region(current)?.region_type();
                let valid = Job::from_kind(job).is_valid_region(region_type);
                highlighter.set_highlight(current, true, valid);
            }
            self.hovered = hovered;
        }

        if !pointer.commit_pressed() {
            return Ok(SelectionEvent::Pending);
        }

        let Some(region) = hovered else {
            warn!(survivor = %survivor, "Commit with no region under the pointer");
            return Ok(SelectionEvent::Rejected {
                region: None,
                reason: Rejection::NothingHovered,
            });
        };

        let region_type = world.require_region(region)?.region_type();
        if !Job::from_kind(job).is_valid_region(region_type) {
            warn!(survivor = %survivor, region = %region, ?region_type, job = %job, "Invalid region type for job");
            return Ok(SelectionEvent::Rejected {
                region: Some(region),
                reason: Rejection::InvalidRegionType { region_type },
            });
        }

        let binding = match registry.bind(world, survivor, region) {
            Ok(binding) => binding,
            Err(CoreError::RegionAlreadyAssigned { holder, .. }) => {
                return Ok(SelectionEvent::Rejected {
                    region: Some(region),
                    reason: Rejection::AlreadyAssigned { holder },
                });
            }
            Err(e) => return Err(e),
        };

        highlighter.set_highlight(region, false, false);
        self.hovered = None;
        self.state = SelectorState::Idle;
        Ok(SelectionEvent::Committed { binding, job })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use outpost_types::Position;

    use super::*;
    use crate::collaborators::{HighlightCall, PointerFrame, RecordingHighlighter, ScriptedPointer};

    struct Rig {
        world: WorldGrid,
        registry: AssignmentRegistry,
        selector: RegionTargetSelector,
        highlighter: RecordingHighlighter,
    }

    const FOREST: RegionCoord = RegionCoord::new(0, 0);
    const GRASS: RegionCoord = RegionCoord::new(1, 0);

    fn over(region: RegionCoord) -> Position {
        Position::new(
            f32::from(u16::try_from(region.x).unwrap()) * 4.0 + 1.0,
            0.0,
            f32::from(u16::try_from(region.y).unwrap()) * 4.0 + 1.0,
        )
    }

    impl Rig {
        fn new() -> Self {
            let mut world = WorldGrid::new(2, 1, 4, RegionType::Forest).unwrap();
            world.set_region_type(GRASS, RegionType::Grass).unwrap();
            Self {
                world,
                registry: AssignmentRegistry::new(),
                selector: RegionTargetSelector::new(),
                highlighter: RecordingHighlighter::new(),
            }
        }

        fn frame(&mut self, frame: PointerFrame) -> SelectionEvent {
            let mut pointer = ScriptedPointer::new([frame]);
            pointer.begin_frame();
            self.selector
                .update(&mut self.world, &mut self.registry, &pointer, &mut self.highlighter)
                .unwrap()
        }
    }

    #[test]
    fn idle_selector_ignores_input() {
        let mut rig = Rig::new();
        let event = rig.frame(PointerFrame::commit(over(FOREST)));
        assert_eq!(event, SelectionEvent::Inactive);
        assert!(rig.highlighter.calls.is_empty());
        assert!(rig.registry.is_empty());
    }

    #[test]
    fn hover_highlights_with_validity() {
        let mut rig = Rig::new();
        rig.selector.begin(SurvivorId::new(), JobKind::Lumberjack);

        assert_eq!(rig.frame(PointerFrame::hover(over(GRASS))), SelectionEvent::Pending);
        assert_eq!(
            rig.highlighter.last_for(GRASS),
            Some(HighlightCall { region: GRASS, visible: true, valid: false })
        );

        rig.frame(PointerFrame::hover(over(FOREST)));
        assert_eq!(
            rig.highlighter.last_for(GRASS),
            Some(HighlightCall { region: GRASS, visible: false, valid: false })
        );
        assert_eq!(
            rig.highlighter.last_for(FOREST),
            Some(HighlightCall { region: FOREST, visible: true, valid: true })
        );

        // Same region again: no new calls.
        let calls = rig.highlighter.calls.len();
        rig.frame(PointerFrame::hover(over(FOREST)));
        assert_eq!(rig.highlighter.calls.len(), calls);

        rig.frame(PointerFrame::idle());
        assert!(rig.highlighter.visible_regions().is_empty());
        assert_eq!(rig.selector.hovered(), None);
    }

    #[test]
    fn commit_on_wrong_terrain_keeps_selecting() {
        let mut rig = Rig::new();
        rig.selector.begin(SurvivorId::new(), JobKind::Lumberjack);
        let event = rig.frame(PointerFrame::commit(over(GRASS)));
        assert_eq!(
            event,
            SelectionEvent::Rejected {
                region: Some(GRASS),
                reason: Rejection::InvalidRegionType { region_type: RegionType::Grass },
            }
        );
        assert!(rig.selector.is_selecting());
        assert!(!rig.world.region(GRASS).unwrap().is_assigned());
    }

    #[test]
    fn commit_with_nothing_hovered_is_rejected() {
        let mut rig = Rig::new();
        rig.selector.begin(SurvivorId::new(), JobKind::Farmer);
        let event = rig.frame(PointerFrame {
            position: None,
            commit: true,
        });
        assert_eq!(
            event,
            SelectionEvent::Rejected {
                region: None,
                reason: Rejection::NothingHovered
            }
        );
        assert!(rig.selector.is_selecting());
    }

    #[test]
    fn valid_commit_binds_and_goes_idle() {
        let mut rig = Rig::new();
        let a = SurvivorId::new();
        rig.selector.begin(a, JobKind::Lumberjack);
        rig.frame(PointerFrame::hover(over(FOREST)));
        let event = rig.frame(PointerFrame::commit(over(FOREST)));

        let SelectionEvent::Committed { binding, job } = event else {
            panic!("expected a commit, got {event:?}");
        };
        assert_eq!(binding.survivor, a);
        assert_eq!(binding.region, FOREST);
        assert_eq!(job, JobKind::Lumberjack);
        assert!(rig.world.region(FOREST).unwrap().is_assigned());
        assert_eq!(rig.registry.lookup(a), Ok(FOREST));
        assert_eq!(rig.selector.state(), SelectorState::Idle);
        assert!(rig.highlighter.visible_regions().is_empty());
    }

    #[test]
    fn commit_on_held_region_is_rejected_without_changes() {
        let mut rig = Rig::new();
        let a = SurvivorId::new();
        let b = SurvivorId::new();
        rig.registry.bind(&mut rig.world, b, FOREST).unwrap();

        rig.selector.begin(a, JobKind::Lumberjack);
        rig.frame(PointerFrame::hover(over(FOREST)));
        let calls = rig.highlighter.calls.len();
        let event = rig.frame(PointerFrame::commit(over(FOREST)));

        assert_eq!(
            event,
            SelectionEvent::Rejected {
                region: Some(FOREST),
                reason: Rejection::AlreadyAssigned { holder: Some(b) },
            }
        );
        assert_eq!(rig.registry.lookup(b), Ok(FOREST));
        assert!(rig.registry.lookup(a).is_err());
        assert_eq!(rig.highlighter.calls.len(), calls);
        assert!(rig.selector.is_selecting());
    }

    #[test]
    fn begin_overwrites_pending_selection() {
        let mut rig = Rig::new();
        let a = SurvivorId::new();
        let b = SurvivorId::new();
        rig.selector.begin(a, JobKind::Lumberjack);
        rig.selector.begin(b, JobKind::Farmer);
        assert_eq!(
            rig.selector.state(),
            SelectorState::Selecting { survivor: b, job: JobKind::Farmer }
        );
        let event = rig.frame(PointerFrame::commit(over(GRASS)));
        assert!(matches!(event, SelectionEvent::Committed { binding, .. } if binding.survivor == b));
    }
}
