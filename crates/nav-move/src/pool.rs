//! Bounded pool of move states addressed by [`MoveHandle`].

use tracing::warn;

use nav_core::{MoveHandle, NavConfig};
use nav_world::WorldState;

use crate::{InitMove, MoveError, MoveResult, MoveState};

/// Slots for handles `1..=capacity`.  Slot `i` holds handle `i + 1`.
#[derive(Clone, Debug)]
pub struct MovePool {
    slots: Vec<Option<MoveState>>,
}

impl MovePool {
    pub fn new(capacity: usize) -> Self {
        Self { slots: vec![None; capacity] }
    }

    pub fn from_config(config: &NavConfig) -> Self {
        Self::new(config.max_clients)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of allocated states.
    pub fn in_use(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Allocate the lowest free handle with a cleared state.
    pub fn alloc(&mut self) -> MoveResult<MoveHandle> {
        let Some(i) = self.slots.iter().position(Option::is_none) else {
            warn!(capacity = self.capacity(), "move state pool exhausted");
            return Err(MoveError::PoolExhausted { capacity: self.capacity() });
        };
        self.slots[i] = Some(MoveState::new());
        Ok(MoveHandle(i as u32 + 1))
    }

    /// Release `handle`.  Bad handles are logged and ignored.
    pub fn free(&mut self, handle: MoveHandle) {
        match self.slot_index(handle) {
            Some(i) if self.slots[i].is_some() => self.slots[i] = None,
            Some(_) => warn!(%handle, "free: move handle not allocated"),
            None => warn!(%handle, "free: move handle out of range"),
        }
    }

    /// Clear the state behind `handle` but keep it allocated.  Bad handles
    /// are logged and ignored.
    pub fn reset(&mut self, handle: MoveHandle) {
        match self.get_mut(handle) {
            Ok(state) => *state = MoveState::new(),
            Err(e) => warn!(%handle, error = %e, "reset: bad move handle"),
        }
    }

    /// Reset `handle`, load `init`, and classify the environment.
    pub fn init(&mut self, handle: MoveHandle, init: &InitMove, world: &WorldState) -> MoveResult<()> {
        let state = self.get_mut(handle)?;
        *state = MoveState::from_init(init, world);
        Ok(())
    }

    pub fn get(&self, handle: MoveHandle) -> MoveResult<&MoveState> {
        let i = self.checked_index(handle)?;
        self.slots[i].as_ref().ok_or(MoveError::NotAllocated(handle))
    }

    pub fn get_mut(&mut self, handle: MoveHandle) -> MoveResult<&mut MoveState> {
        let i = self.checked_index(handle)?;
        self.slots[i].as_mut().ok_or(MoveError::NotAllocated(handle))
    }

    fn slot_index(&self, handle: MoveHandle) -> Option<usize> {
        let i = handle.index().checked_sub(1)?;
        (i < self.slots.len()).then_some(i)
    }

    fn checked_index(&self, handle: MoveHandle) -> MoveResult<usize> {
        self.slot_index(handle)
            .ok_or(MoveError::InvalidHandle { handle, capacity: self.capacity() })
    }
}
