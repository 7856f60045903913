//! Counted resource ledgers.
//!
//! A [`ResourceLedger`] maps each [`Resource`] to a non-negative count. It
//! backs both a region's harvestable stock and a survivor's inventory. All
//! arithmetic is checked: additions fail on overflow, removals fail when the
//! stored count is too small, and a failed operation leaves the ledger
//! untouched (no partial deduction).

use std::collections::BTreeMap;

use outpost_types::Resource;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Per-resource counts with checked add/remove.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLedger {
    /// Stored counts. Zero entries are removed.
    counts: BTreeMap<Resource, u32>,
}

impl ResourceLedger {
    /// Create an empty ledger.
    pub const fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Return the stored count of `resource` (zero when absent).
    pub fn get(&self, resource: Resource) -> u32 {
        self.counts.get(&resource).copied().unwrap_or(0)
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over non-zero entries in resource order.
    pub fn iter(&self) -> impl Iterator<Item = (Resource, u32)> + '_ {
        self.counts.iter().map(|(r, q)| (*r, *q))
    }

    /// Add `amount` of `resource`. Returns the new stored count.
    ///
    /// Adding zero is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ArithmeticOverflow`] if the count would exceed
    /// `u32::MAX`; the ledger is unchanged.
    pub fn add(&mut self, resource: Resource, amount: u32) -> Result<u32, WorldError> {
        let current = self.get(resource);
        let updated = current
            .checked_add(amount)
            .ok_or_else(|| WorldError::ArithmeticOverflow {
                context: format!("adding {amount} {resource:?} to {current}"),
            })?;
        if updated > 0 {
            self.counts.insert(resource, updated);
        }
        Ok(updated)
    }

    /// Remove `amount` of `resource`. Returns the remaining count.
    ///
    /// The entry is dropped entirely when it reaches zero.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InsufficientResource`] when `amount` exceeds the
    /// stored count; the ledger is unchanged.
    pub fn remove(&mut self, resource: Resource, amount: u32) -> Result<u32, WorldError> {
        let current = self.get(resource);
        let remaining =
            current
                .checked_sub(amount)
                .ok_or(WorldError::InsufficientResource {
                    resource,
                    requested: amount,
                    available: current,
                })?;
        if remaining == 0 {
            self.counts.remove(&resource);
        } else {
            self.counts.insert(resource, remaining);
        }
        Ok(remaining)
    }

    /// Move `amount` of `resource` from this ledger into `to`.
    ///
    /// Both sides are validated before either is modified.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InsufficientResource`] if this ledger holds too
    /// little, or [`WorldError::ArithmeticOverflow`] if `to` would overflow.
    pub fn transfer(
        &mut self,
        to: &mut Self,
        resource: Resource,
        amount: u32,
    ) -> Result<(), WorldError> {
        let available = self.get(resource);
        if available < amount {
            return Err(WorldError::InsufficientResource {
                resource,
                requested: amount,
                available,
            });
        }
        if to.get(resource).checked_add(amount).is_none() {
            return Err(WorldError::ArithmeticOverflow {
                context: format!("transfer of {amount} {resource:?} overflows destination"),
            });
        }
        self.remove(resource, amount)?;
        to.add(resource, amount)?;
        Ok(())
    }
}
