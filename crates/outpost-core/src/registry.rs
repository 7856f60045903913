//! Assignment registry: which survivor works which region.
//!
//! A binding is exclusive. Binding a region that is already assigned is
//! rejected and leaves both the registry and the region untouched. Binding
//! a survivor that already has a region overwrites its entry; the old
//! region keeps its assigned flag (there is no release path).

use std::collections::BTreeMap;

use outpost_types::{RegionCoord, SurvivorId};
use outpost_world::WorldGrid;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::CoreError;

/// A successful survivor ↔ region binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Binding {
    /// The bound survivor.
    pub survivor: SurvivorId,
    /// The region it now works.
    pub region: RegionCoord,
    /// The region it was bound to before, if this was a rebinding.
    pub previous: Option<RegionCoord>,
}

/// Authoritative survivor → region mapping.
#[derive(Debug, Clone, Default)]
pub struct AssignmentRegistry {
    bindings: BTreeMap<SurvivorId, RegionCoord>,
}

impl AssignmentRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// Bind `survivor` to `region`, marking the region assigned.
    ///
    /// # Errors
    ///
    /// - [`CoreError::World`] if the region does not exist.
    /// - [`CoreError::RegionAlreadyAssigned`] if another binding holds it.
    pub fn bind(
        &mut self,
        world: &mut WorldGrid,
        survivor: SurvivorId,
        region: RegionCoord,
    ) -> Result<Binding, CoreError> {
        let target = world.require_region_mut(region)?;
        if !target.mark_assigned() {
            let holder = self.holder_of(region);
            warn!(survivor = %survivor, region = %region, holder = ?holder, "Region is already assigned");
            return Err(CoreError::RegionAlreadyAssigned { region, holder });
        }

        let previous = self.bindings.insert(survivor, region);
        match previous {
            Some(old) => {
                info!(survivor = %survivor, from = %old, to = %region, "Survivor reassigned to region");
            }
            None => info!(survivor = %survivor, region = %region, "Survivor assigned to region"),
        }
        Ok(Binding {
            survivor,
            region,
            previous,
        })
    }

    /// The region bound to `survivor`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoRegionBound`] if the survivor has no binding.
    pub fn lookup(&self, survivor: SurvivorId) -> Result<RegionCoord, CoreError> {
        self.bindings
            .get(&survivor)
            .copied()
            .ok_or(CoreError::NoRegionBound(survivor))
    }

    /// The survivor currently bound to `region`, if any.
    pub fn holder_of(&self, region: RegionCoord) -> Option<SurvivorId> {
        self.bindings
            .iter()
            .find(|(_, r)| **r == region)
            .map(|(s, _)| *s)
    }

    /// All bindings in survivor order.
    pub fn iter(&self) -> impl Iterator<Item = (SurvivorId, RegionCoord)> + '_ {
        self.bindings.iter().map(|(s, r)| (*s, *r))
    }

    /// Number of bound survivors.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no survivor is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
