use thiserror::Error;

use nav_core::NavError;
use nav_goal::GoalError;
use nav_move::MoveError;
use nav_weight::WeightError;
use nav_world::WorldError;

use crate::BotId;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("bot controller configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match bot count {expected}")]
    BotCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("unknown bot {0}")]
    UnknownBot(BotId),

    #[error("no weight named {0:?}")]
    UnknownWeight(String),

    #[error(transparent)]
    Nav(#[from] NavError),

    #[error("world error: {0}")]
    World(#[from] WorldError),

    #[error("weight error: {0}")]
    Weight(#[from] WeightError),

    #[error("goal error: {0}")]
    Goal(#[from] GoalError),

    #[error("movement error: {0}")]
    Move(#[from] MoveError),
}

pub type BotResult<T> = Result<T, BotError>;
