//! Goal-scoring callbacks wired to the weight configs and the route cache.

use std::sync::Arc;

use nav_core::{AreaId, BotRng, Vec3, WeightHandle};
use nav_goal::{GoalCandidate, GoalModel};
use nav_weight::{WeightConfig, WeightRegistry};
use nav_world::{RouteCache, WorldState};

use crate::{BotError, BotResult};

// ── Item weights ──────────────────────────────────────────────────────────────

/// Maps item numbers to weights in one [`WeightConfig`].
#[derive(Clone, Debug)]
pub struct ItemWeights {
    config:  Arc<WeightConfig>,
    by_item: Vec<Option<usize>>,
}

impl ItemWeights {
    pub fn new(config: Arc<WeightConfig>) -> Self {
        Self { config, by_item: Vec::new() }
    }

    /// Share the config loaded under `handle`.
    pub fn from_registry(registry: &WeightRegistry, handle: WeightHandle) -> BotResult<Self> {
        Ok(Self::new(Arc::clone(registry.config(handle)?)))
    }

    /// Score item `item` with the weight called `name`.
    pub fn map(mut self, item: u32, name: &str) -> BotResult<Self> {
        let index = self
            .config
            .find_index(name)
            .ok_or_else(|| BotError::UnknownWeight(name.to_string()))?;
        let slot = item as usize;
        if self.by_item.len() <= slot {
            self.by_item.resize(slot + 1, None);
        }
        self.by_item[slot] = Some(index);
        Ok(self)
    }

    pub fn weight_index(&self, item: u32) -> Option<usize> {
        self.by_item.get(item as usize).copied().flatten()
    }

    pub fn config(&self) -> &WeightConfig {
        &self.config
    }

    /// Fuzzy weight of `item` for a bot holding `inventory`, or `None` when
    /// the item is unmapped.
    pub fn evaluate(&self, item: u32, inventory: &[i32]) -> Option<f32> {
        self.weight_index(item).map(|i| self.config.fuzzy_weight(inventory, i))
    }

    /// Like [`evaluate`](Self::evaluate), drawing balance nodes from `rng`.
    pub fn evaluate_undecided(&self, item: u32, inventory: &[i32], rng: &mut BotRng) -> Option<f32> {
        self.weight_index(item)
            .map(|i| self.config.fuzzy_weight_undecided(inventory, i, rng))
    }
}

// ── Route travel time ─────────────────────────────────────────────────────────

/// Travel time from a bot's position through the route cache.
pub struct RouteTravelTime<'a> {
    pub world:  &'a WorldState,
    pub routes: &'a RouteCache,
    pub origin: Vec3,
}

impl RouteTravelTime<'_> {
    /// Seconds from `from` to `candidate`, or −1 when no route exists.
    pub fn seconds(&self, from: AreaId, candidate: &GoalCandidate) -> f32 {
        self.routes
            .area_travel_time_to_goal(self.world, from, self.origin, candidate.area, candidate.travel_flags)
            .map_or(-1.0, |t| f32::from(t) * 0.01)
    }
}

// ── Goal model ────────────────────────────────────────────────────────────────

/// The [`GoalModel`] a controller hands to each bot's selector.
pub struct BotGoalModel<'a> {
    pub weights:   Option<&'a ItemWeights>,
    pub inventory: &'a [i32],
    pub travel:    RouteTravelTime<'a>,
}

impl GoalModel for BotGoalModel<'_> {
    fn weight(&self, candidate: &GoalCandidate) -> f32 {
        candidate
            .item
            .zip(self.weights)
            .and_then(|(item, w)| w.evaluate(item, self.inventory))
            .unwrap_or(candidate.base_weight)
    }

    fn travel_time(&self, from: AreaId, candidate: &GoalCandidate) -> f32 {
        self.travel.seconds(from, candidate)
    }
}
