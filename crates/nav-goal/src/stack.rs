//! Per-bot goal stack.

use arrayvec::ArrayVec;
use tracing::warn;

use crate::{GoalCandidate, GoalError, GoalResult};

pub const MAX_GOALSTACK: usize = 8;

/// Nested goals: the top is pursued, the rest resume when it is popped.
#[derive(Clone, Debug, Default)]
pub struct GoalStack {
    goals: ArrayVec<GoalCandidate, MAX_GOALSTACK>,
}

impl GoalStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `goal`.  A full stack is left unchanged.
    pub fn push(&mut self, goal: GoalCandidate) -> GoalResult<()> {
        self.goals.try_push(goal).map_err(|_| {
            warn!(goal = %goal.id, "goal stack overflow");
            GoalError::StackOverflow { capacity: MAX_GOALSTACK }
        })
    }

    pub fn pop(&mut self) -> Option<GoalCandidate> {
        self.goals.pop()
    }

    pub fn empty(&mut self) {
        self.goals.clear();
    }

    pub fn top(&self) -> Option<&GoalCandidate> {
        self.goals.last()
    }

    /// The goal under the top.
    pub fn second(&self) -> Option<&GoalCandidate> {
        self.goals.len().checked_sub(2).map(|i| &self.goals[i])
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }
}
