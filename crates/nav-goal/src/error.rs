use thiserror::Error;

use nav_core::GoalId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GoalError {
    #[error("goal candidate list full ({limit} entries)")]
    CandidatesFull { limit: usize },

    #[error("static goal ids must be positive, got {0}")]
    InvalidCandidateId(GoalId),

    #[error("goal stack overflow ({capacity} goals)")]
    StackOverflow { capacity: usize },
}

pub type GoalResult<T> = Result<T, GoalError>;
