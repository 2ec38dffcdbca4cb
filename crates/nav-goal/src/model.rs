//! The `GoalModel` trait: how a host scores candidates.

use nav_core::{AreaId, Vec3};

use crate::{GoalCandidate, Selection};

/// Scoring callbacks consulted by [`GoalSelector`][crate::GoalSelector].
///
/// Every method has a default, so `impl GoalModel for MyType {}` is a valid
/// model that ranks candidates by base weight alone.
///
/// The selector may be refreshed for many bots in parallel, so models are
/// `Send + Sync` and take `&self`.  A model that must record something in
/// [`selection_changed`][Self::selection_changed] needs interior mutability.
pub trait GoalModel: Send + Sync {
    /// Desirability of `candidate`.  Non-finite results skip the candidate.
    fn weight(&self, candidate: &GoalCandidate) -> f32 {
        candidate.base_weight
    }

    /// Seconds to reach `candidate` from `from`.
    ///
    /// Negative means unreachable: the candidate goes on the avoid list.
    /// Non-finite counts as 0.
    fn travel_time(&self, _from: AreaId, _candidate: &GoalCandidate) -> f32 {
        0.0
    }

    /// Called after a refresh whose selection differs by identity from the
    /// previous one.
    fn selection_changed(&self, _selection: &Selection) {}

    /// Host override for locating a point.  `None` falls back to the world's
    /// own area lookup.
    fn point_area(&self, _origin: Vec3) -> Option<AreaId> {
        None
    }
}

/// A [`GoalModel`] using every default: base weight, zero travel time.
pub struct DefaultGoalModel;

impl GoalModel for DefaultGoalModel {}
