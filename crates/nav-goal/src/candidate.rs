//! Goal candidates and the selection a refresh produces.

use std::fmt;

use nav_core::{AreaId, GoalId, TravelFlags, Vec3};

/// A place a bot may decide to go.
///
/// Registered goals (items, camp spots) carry a positive `id` and usually an
/// `item` index the weight callback understands.  Candidates synthesized from
/// sounds and lights carry a negative id and no item.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GoalCandidate {
    pub id:           GoalId,
    pub origin:       Vec3,
    pub area:         AreaId,
    pub base_weight:  f32,
    pub travel_flags: TravelFlags,
    pub item:         Option<u32>,
}

impl GoalCandidate {
    pub fn new(id: GoalId, origin: Vec3, area: AreaId, base_weight: f32) -> Self {
        Self { id, origin, area, base_weight, travel_flags: TravelFlags::DEFAULT, item: None }
    }

    pub fn with_item(mut self, item: u32) -> Self {
        self.item = Some(item);
        self
    }

    pub fn with_travel_flags(mut self, flags: TravelFlags) -> Self {
        self.travel_flags = flags;
        self
    }
}

impl fmt::Display for GoalCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {} at {} (base {:.1})", self.id, self.area, self.origin, self.base_weight)
    }
}

// ── Selection ─────────────────────────────────────────────────────────────────

/// Outcome of one refresh.  `candidate` is `None` when nothing was eligible.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Selection {
    pub candidate:   Option<GoalCandidate>,
    pub score:       f32,
    pub travel_time: f32,
}

impl Selection {
    pub const NONE: Selection = Selection { candidate: None, score: f32::NEG_INFINITY, travel_time: 0.0 };

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.candidate.is_some()
    }

    pub fn goal_id(&self) -> Option<GoalId> {
        self.candidate.map(|c| c.id)
    }

    /// Both empty, or both holding a candidate with the same id.  Score and
    /// travel time are ignored.
    pub fn same_identity(&self, other: &Selection) -> bool {
        self.goal_id() == other.goal_id()
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::NONE
    }
}
