//! Handle pool of weight configurations.
//!
//! Handles run `1..=MAX_WEIGHT_HANDLES`; 0 is never issued.  A handle is
//! allocated empty and receives a config through [`WeightRegistry::load`].
//! Configs are held behind `Arc` so bots evaluating in parallel share them
//! without copying.

use std::sync::Arc;

use tracing::warn;

use nav_core::WeightHandle;

use crate::config::WeightConfig;
use crate::{WeightError, WeightResult};

pub const MAX_WEIGHT_HANDLES: usize = 32;

#[derive(Clone, Debug, Default)]
enum Slot {
    #[default]
    Free,
    Allocated(Option<Arc<WeightConfig>>),
}

pub struct WeightRegistry {
    slots: Vec<Slot>,
}

impl WeightRegistry {
    pub fn new() -> Self {
        Self { slots: vec![Slot::Free; MAX_WEIGHT_HANDLES] }
    }

    /// Lowest free handle.
    pub fn alloc(&mut self) -> WeightResult<WeightHandle> {
        let Some(i) = self.slots.iter().position(|s| matches!(s, Slot::Free)) else {
            warn!("no free weight handles");
            return Err(WeightError::NoFreeHandles);
        };
        self.slots[i] = Slot::Allocated(None);
        Ok(WeightHandle(i as u32 + 1))
    }

    pub fn free(&mut self, handle: WeightHandle) -> WeightResult<()> {
        let slot = self.slot_mut(handle)?;
        *slot = Slot::Free;
        Ok(())
    }

    /// Install `config` under `handle`, replacing any previous one.
    pub fn load(&mut self, handle: WeightHandle, config: WeightConfig) -> WeightResult<()> {
        let slot = self.slot_mut(handle)?;
        *slot = Slot::Allocated(Some(Arc::new(config)));
        Ok(())
    }

    pub fn config(&self, handle: WeightHandle) -> WeightResult<&Arc<WeightConfig>> {
        match self.slot(handle)? {
            Slot::Allocated(Some(c)) => Ok(c),
            _ => Err(WeightError::NoConfig(handle)),
        }
    }

    /// Weight index of `name`, or `None` for a bad handle, an empty slot, or
    /// an unknown name.
    pub fn find(&self, handle: WeightHandle, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.config(handle).ok()?.find_index(name)
    }

    /// Evaluate one weight.  A bad handle or empty slot gives 0.
    pub fn evaluate(&self, handle: WeightHandle, inventory: &[i32], index: usize) -> f32 {
        self.config(handle).map_or(0.0, |c| c.fuzzy_weight(inventory, index))
    }

    pub fn set_weight(&mut self, handle: WeightHandle, name: &str, value: f32) -> WeightResult<()> {
        if name.is_empty() {
            return Err(WeightError::EmptyName);
        }
        match self.slot_mut(handle)? {
            Slot::Allocated(Some(c)) => Arc::make_mut(c).set_weight(name, value),
            _ => Err(WeightError::NoConfig(handle)),
        }
    }

    pub fn allocated(&self) -> usize {
        self.slots.iter().filter(|s| matches!(s, Slot::Allocated(_))).count()
    }

    fn slot(&self, handle: WeightHandle) -> WeightResult<&Slot> {
        match handle.index().checked_sub(1).and_then(|i| self.slots.get(i)) {
            Some(s) if matches!(s, Slot::Allocated(_)) => Ok(s),
            _ => {
                warn!(%handle, "invalid weight handle");
                Err(WeightError::InvalidHandle(handle))
            }
        }
    }

    fn slot_mut(&mut self, handle: WeightHandle) -> WeightResult<&mut Slot> {
        match handle.index().checked_sub(1).and_then(|i| self.slots.get_mut(i)) {
            Some(s) if matches!(s, Slot::Allocated(_)) => Ok(s),
            _ => {
                warn!(%handle, "invalid weight handle");
                Err(WeightError::InvalidHandle(handle))
            }
        }
    }
}

impl Default for WeightRegistry {
    fn default() -> Self {
        Self::new()
    }
}
