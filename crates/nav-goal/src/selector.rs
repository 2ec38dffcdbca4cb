//! Per-bot goal selection.
//!
//! Each [`GoalSelector::refresh`] scores every registered candidate plus the
//! candidates suggested by recent sounds and lights, skipping avoided ids,
//! and keeps the best.  Score is `weight - travel_time`; the first candidate
//! reaching a given score wins ties.

use arrayvec::ArrayVec;
use tracing::{debug, warn};

use nav_core::config::MAX_CANDIDATES;
use nav_core::{AreaId, GoalId, NavConfig, Seconds, TravelFlags, Vec3};
use nav_world::WorldState;

use crate::avoid::AvoidList;
use crate::model::GoalModel;
use crate::sensory::{
    light_goal_score, sound_goal_score, SensoryQueues, SensorySerial, LIGHT_GOAL_TAG, SOUND_GOAL_TAG,
};
use crate::{GoalCandidate, GoalError, GoalResult, Selection};

pub struct GoalSelector {
    candidates:      ArrayVec<GoalCandidate, MAX_CANDIDATES>,
    candidate_limit: usize,
    avoid:           AvoidList,
    avoid_duration:  Seconds,
    sound_limit:     usize,
    light_limit:     usize,
    current_area:    AreaId,
    active:          Selection,
    serial:          SensorySerial,
}

impl GoalSelector {
    pub fn new() -> Self {
        Self::from_config(&NavConfig::default())
    }

    pub fn from_config(config: &NavConfig) -> Self {
        Self {
            candidates:      ArrayVec::new(),
            candidate_limit: config.max_candidates.min(MAX_CANDIDATES),
            avoid:           AvoidList::new(),
            avoid_duration:  config.effective_avoid_duration(),
            sound_limit:     config.max_sound_candidates,
            light_limit:     config.max_light_candidates,
            current_area:    AreaId::INVALID,
            active:          Selection::NONE,
            serial:          SensorySerial::default(),
        }
    }

    // ── Candidates ───────────────────────────────────────────────────────

    /// Register a static goal.  Its id must be positive.
    pub fn add_candidate(&mut self, candidate: GoalCandidate) -> GoalResult<()> {
        if candidate.id.0 <= 0 {
            return Err(GoalError::InvalidCandidateId(candidate.id));
        }
        if self.candidates.len() >= self.candidate_limit {
            warn!(id = %candidate.id, limit = self.candidate_limit, "goal candidate list full");
            return Err(GoalError::CandidatesFull { limit: self.candidate_limit });
        }
        self.candidates.push(candidate);
        Ok(())
    }

    pub fn remove_candidate(&mut self, id: GoalId) -> bool {
        match self.candidates.iter().position(|c| c.id == id) {
            Some(i) => {
                self.candidates.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn clear_candidates(&mut self) {
        self.candidates.clear();
    }

    pub fn candidates(&self) -> &[GoalCandidate] {
        &self.candidates
    }

    // ── Bot state ────────────────────────────────────────────────────────

    pub fn current_area(&self) -> AreaId {
        self.current_area
    }

    pub fn set_current_area(&mut self, area: AreaId) {
        self.current_area = area;
    }

    /// Locate the bot from its new origin: the model's answer if it has one,
    /// else the world's.  Returns the area, which may be invalid.
    pub fn record_client_update<M>(&mut self, origin: Vec3, world: &WorldState, model: &M) -> AreaId
    where
        M: GoalModel + ?Sized,
    {
        let area = model.point_area(origin).unwrap_or_else(|| world.point_area(origin));
        self.current_area = if world.in_range(area) { area } else { AreaId::INVALID };
        self.current_area
    }

    pub fn avoid(&self) -> &AvoidList {
        &self.avoid
    }

    pub fn avoid_mut(&mut self) -> &mut AvoidList {
        &mut self.avoid
    }

    pub fn avoid_duration(&self) -> Seconds {
        self.avoid_duration
    }

    /// Result of the last refresh.
    pub fn active(&self) -> &Selection {
        &self.active
    }

    pub fn sensory_serial(&self) -> SensorySerial {
        self.serial
    }

    /// Drop candidates, avoid entries, the current area, and the active goal.
    pub fn reset(&mut self) {
        self.candidates.clear();
        self.avoid.reset();
        self.current_area = AreaId::INVALID;
        self.active = Selection::NONE;
        self.serial.reset();
    }

    // ── Refresh ──────────────────────────────────────────────────────────

    /// Pick the best goal at time `now`.
    ///
    /// Calls [`GoalModel::selection_changed`] when the winner's identity
    /// differs from the previous refresh.
    pub fn refresh<M>(&mut self, now: Seconds, world: &WorldState, sensory: &SensoryQueues, model: &M) -> Selection
    where
        M: GoalModel + ?Sized,
    {
        self.avoid.prune(now);
        let mut best = Selection::NONE;

        for i in 0..self.candidates.len() {
            let candidate = self.candidates[i];
            self.consider(&candidate, now, model, &mut best);
        }
        self.consider_sounds(now, world, sensory, model, &mut best);
        self.consider_lights(now, world, sensory, model, &mut best);

        let changed = !self.active.same_identity(&best);
        self.active = best;
        if changed {
            debug!(goal = ?best.goal_id(), score = best.score, "goal selection changed");
            model.selection_changed(&self.active);
        }
        best
    }

    fn consider<M>(&mut self, candidate: &GoalCandidate, now: Seconds, model: &M, best: &mut Selection)
    where
        M: GoalModel + ?Sized,
    {
        if self.avoid.contains(candidate.id, now) {
            return;
        }
        let weight = model.weight(candidate);
        if !weight.is_finite() {
            return;
        }

        let mut travel_time = 0.0;
        if self.current_area.is_valid() && candidate.area.is_valid() {
            let t = model.travel_time(self.current_area, candidate);
            let t = if t.is_finite() { t } else { 0.0 };
            if t < 0.0 {
                warn!(goal = %candidate.id, from = %self.current_area, to = %candidate.area, "goal unreachable, avoiding");
                self.avoid.add(candidate.id, now + self.avoid_duration);
                return;
            }
            travel_time = t;
        }

        let score = weight - travel_time;
        if !best.is_valid() || score > best.score {
            *best = Selection { candidate: Some(*candidate), score, travel_time };
        }
    }

    fn consider_sounds<M>(
        &mut self,
        now:     Seconds,
        world:   &WorldState,
        sensory: &SensoryQueues,
        model:   &M,
        best:    &mut Selection,
    ) where
        M: GoalModel + ?Sized,
    {
        let mut considered = 0;
        for event in sensory.sounds() {
            if considered >= self.sound_limit {
                break;
            }
            let info = event.info.and_then(|i| sensory.info(i));
            let Some(score) = sound_goal_score(info, event, now) else { continue };
            let id = self.serial.next(SOUND_GOAL_TAG);
            let Some(candidate) = sensory_candidate(id, event.origin, score, world) else { continue };
            self.consider(&candidate, now, model, best);
            considered += 1;
        }
    }

    fn consider_lights<M>(
        &mut self,
        now:     Seconds,
        world:   &WorldState,
        sensory: &SensoryQueues,
        model:   &M,
        best:    &mut Selection,
    ) where
        M: GoalModel + ?Sized,
    {
        let mut considered = 0;
        for event in sensory.lights() {
            if considered >= self.light_limit {
                break;
            }
            let Some(score) = light_goal_score(event) else { continue };
            let id = self.serial.next(LIGHT_GOAL_TAG);
            let Some(candidate) = sensory_candidate(id, event.origin, score, world) else { continue };
            self.consider(&candidate, now, model, best);
            considered += 1;
        }
    }
}

impl Default for GoalSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// Candidate at `origin`, or `None` when the point lies in no area or the
/// score is unusable.
fn sensory_candidate(id: GoalId, origin: Vec3, score: f32, world: &WorldState) -> Option<GoalCandidate> {
    let area = world.point_area(origin);
    if !area.is_valid() || !score.is_finite() || score <= 0.0 {
        return None;
    }
    Some(GoalCandidate::new(id, origin, area, score).with_travel_flags(TravelFlags::DEFAULT))
}
