use thiserror::Error;

use nav_core::MoveHandle;
use nav_world::WorldError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MoveError {
    #[error(transparent)]
    World(#[from] WorldError),

    #[error("move handle {handle} out of range (1..={capacity})")]
    InvalidHandle { handle: MoveHandle, capacity: usize },

    #[error("move handle {0} not allocated")]
    NotAllocated(MoveHandle),

    #[error("all {capacity} move states in use")]
    PoolExhausted { capacity: usize },
}

pub type MoveResult<T> = Result<T, MoveError>;
