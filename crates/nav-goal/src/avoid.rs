//! Short-term memory of goals to skip.
//!
//! An entry is live while `expiry > now`.  Expired entries may linger until
//! the next [`AvoidList::prune`] but never count as avoided.

use arrayvec::ArrayVec;

use nav_core::config::MAX_AVOID_GOALS;
use nav_core::{GoalId, Seconds};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AvoidEntry {
    pub id:     GoalId,
    pub expiry: Seconds,
}

#[derive(Clone, Debug, Default)]
pub struct AvoidList {
    entries: ArrayVec<AvoidEntry, MAX_AVOID_GOALS>,
}

impl AvoidList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Avoid `id` until `expiry`.
    ///
    /// An existing entry for `id` is updated in place.  When the table is
    /// full the entry closest to expiry is overwritten.
    pub fn add(&mut self, id: GoalId, expiry: Seconds) {
        if let Some(e) = self.entries.iter_mut().find(|e| e.id == id) {
            e.expiry = expiry;
            return;
        }
        let entry = AvoidEntry { id, expiry };
        if let Err(full) = self.entries.try_push(entry) {
            let soonest = self
                .entries
                .iter_mut()
                .reduce(|a, b| if b.expiry < a.expiry { b } else { a });
            if let Some(slot) = soonest {
                *slot = full.element();
            }
        }
    }

    pub fn contains(&self, id: GoalId, now: Seconds) -> bool {
        self.entries.iter().any(|e| e.id == id && e.expiry > now)
    }

    pub fn remove(&mut self, id: GoalId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    /// Seconds until `id` becomes eligible again; 0 when not avoided.
    pub fn time_remaining(&self, id: GoalId, now: Seconds) -> Seconds {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map_or(0.0, |e| (e.expiry - now).max(0.0))
    }

    /// Drop every entry with `expiry <= now`, keeping the order of the rest.
    pub fn prune(&mut self, now: Seconds) {
        self.entries.retain(|e| e.expiry > now);
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[AvoidEntry] {
        &self.entries
    }
}
