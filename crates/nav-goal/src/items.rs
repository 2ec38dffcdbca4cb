//! Picking an item to walk to: long-term goals (LTG) and nearby goals (NBG).
//!
//! Every level item the bot may use and has not recently taken is scored as
//!
//! ```text
//! score = weight × (roam scale) / (travel × 0.01)
//! ```
//!
//! with `travel` in hundredths of a second through the route cache.  The
//! best positive score wins; ties keep the first item.  The winner goes on
//! the goal stack and on the avoid list for its respawn time, so the bot does
//! not run back to an empty spawn point.
//!
//! A nearby goal must also be closer than `max_time` and must not lengthen
//! the trip to the long-term goal: from the item, the long-term goal may be
//! no further away than it is from the bot.

use bitflags::bitflags;
use tracing::debug;

use nav_core::{AreaId, Seconds, TravelFlags, Vec3};
use nav_world::{RouteCache, WorldState};

use crate::model::GoalModel;
use crate::{GoalCandidate, GoalResult, GoalSelector, GoalStack};

/// Seconds per unit of route travel time.
pub const TRAVELTIME_SCALE: f32 = 0.01;
/// Shortest time a taken item stays avoided.
pub const AVOID_MINIMUM_TIME: Seconds = 10.0;
/// Avoid time for an item with no known respawn time.
pub const AVOID_DEFAULT_TIME: Seconds = 30.0;
/// Avoid time for a dropped item; it will not respawn.
pub const AVOID_DROPPED_TIME: Seconds = 10.0;

bitflags! {
    /// Placement flags of a level item.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ItemFlags: u32 {
        /// Not spawned in free-for-all.
        const NOTFREE   = 0x0001;
        /// Not spawned in team games.
        const NOTTEAM   = 0x0002;
        const NOTSINGLE = 0x0004;
        /// Never a bot goal.
        const NOTBOT    = 0x0008;
        /// A roaming spot; its weight is scaled by `weight_scale`.
        const ROAM      = 0x0010;
    }
}

/// Game mode, as far as item placement cares.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameType {
    #[default]
    FreeForAll,
    Tournament,
    Single,
    /// Any team mode.
    Team,
}

impl GameType {
    pub fn from_raw(raw: i32) -> GameType {
        match raw {
            1 => GameType::Tournament,
            2 => GameType::Single,
            r if r >= 3 => GameType::Team,
            _ => GameType::FreeForAll,
        }
    }
}

// ── Level items ───────────────────────────────────────────────────────────────

/// An item placed in the level.
///
/// `goal.id` is the item's number (what the avoid list remembers) and
/// `goal.item` the index the weight model scores.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelItem {
    pub goal:         GoalCandidate,
    pub flags:        ItemFlags,
    pub weight_scale: f32,
    /// Seconds until a taken item comes back; 0 when unknown.
    pub respawn_time: Seconds,
    /// Positive for an item dropped by a player.
    pub timeout:      Seconds,
}

impl LevelItem {
    pub fn new(goal: GoalCandidate) -> Self {
        Self { goal, flags: ItemFlags::empty(), weight_scale: 1.0, respawn_time: 0.0, timeout: 0.0 }
    }

    pub fn with_flags(mut self, flags: ItemFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Mark as a roaming spot worth `scale` times its weight.
    pub fn roam(mut self, scale: f32) -> Self {
        self.flags |= ItemFlags::ROAM;
        self.weight_scale = scale;
        self
    }

    pub fn with_respawn(mut self, respawn_time: Seconds) -> Self {
        self.respawn_time = respawn_time;
        self
    }

    pub fn dropped(mut self, timeout: Seconds) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether a bot may pick this item in `game`.
    pub fn usable(&self, game: GameType) -> bool {
        if self.flags.contains(ItemFlags::NOTBOT) {
            return false;
        }
        match game {
            GameType::FreeForAll => !self.flags.contains(ItemFlags::NOTFREE),
            GameType::Team => !self.flags.contains(ItemFlags::NOTTEAM),
            GameType::Tournament | GameType::Single => true,
        }
    }

    /// How long to stay away after taking this item.
    pub fn avoid_time(&self) -> Seconds {
        if self.timeout > 0.0 {
            return AVOID_DROPPED_TIME;
        }
        let respawn = if self.respawn_time > 0.0 { self.respawn_time } else { AVOID_DEFAULT_TIME };
        respawn.max(AVOID_MINIMUM_TIME)
    }
}

// ── Query ─────────────────────────────────────────────────────────────────────

/// Where the bot stands and how it may travel.
#[derive(Copy, Clone)]
pub struct ItemQuery<'a> {
    pub world:        &'a WorldState,
    pub routes:       &'a RouteCache,
    pub area:         AreaId,
    pub origin:       Vec3,
    pub travel_flags: TravelFlags,
    pub game:         GameType,
    pub now:          Seconds,
}

impl ItemQuery<'_> {
    fn travel(&self, from: AreaId, origin: Vec3, to: AreaId) -> Option<u16> {
        self.routes.area_travel_time_to_goal(self.world, from, origin, to, self.travel_flags)
    }
}

// ── Choice ────────────────────────────────────────────────────────────────────

impl GoalSelector {
    /// Pick the best level item as a long-term goal and push it onto
    /// `stack`.  `None` when nothing scores above zero.
    pub fn choose_ltg_item<M>(
        &mut self,
        items: &[LevelItem],
        query: &ItemQuery<'_>,
        model: &M,
        stack: &mut GoalStack,
    ) -> GoalResult<Option<GoalCandidate>>
    where
        M: GoalModel + ?Sized,
    {
        let best = self.best_item(items, query, model, |_, _| true);
        self.take(best, query.now, stack)
    }

    /// Pick an item worth a detour on the way to `ltg` and push it onto
    /// `stack`.  Items `max_time` seconds away or more are ignored.
    pub fn choose_nbg_item<M>(
        &mut self,
        items:    &[LevelItem],
        query:    &ItemQuery<'_>,
        model:    &M,
        ltg:      Option<&GoalCandidate>,
        max_time: Seconds,
        stack:    &mut GoalStack,
    ) -> GoalResult<Option<GoalCandidate>>
    where
        M: GoalModel + ?Sized,
    {
        let ltg_time = ltg.and_then(|g| query.travel(query.area, query.origin, g.area));
        let best = self.best_item(items, query, model, |item, travel| {
            if f32::from(travel) * TRAVELTIME_SCALE >= max_time {
                return false;
            }
            match (ltg, ltg_time) {
                (Some(g), Some(direct)) => query
                    .travel(item.goal.area, item.goal.origin, g.area)
                    .is_some_and(|back| back <= direct),
                _ => true,
            }
        });
        self.take(best, query.now, stack)
    }

    fn best_item<'i, M, F>(
        &self,
        items:  &'i [LevelItem],
        query:  &ItemQuery<'_>,
        model:  &M,
        accept: F,
    ) -> Option<&'i LevelItem>
    where
        M: GoalModel + ?Sized,
        F: Fn(&LevelItem, u16) -> bool,
    {
        if !query.area.is_valid() {
            return None;
        }
        let mut best: Option<(&LevelItem, f32)> = None;
        for item in items {
            if !item.usable(query.game) || !item.goal.area.is_valid() {
                continue;
            }
            if self.avoid().contains(item.goal.id, query.now) {
                continue;
            }
            // Zero travel has no defined score.
            let Some(travel) = query.travel(query.area, query.origin, item.goal.area).filter(|&t| t > 0) else {
                continue;
            };
            if !accept(item, travel) {
                continue;
            }

            let mut weight = model.weight(&item.goal);
            if !(weight > 0.0) {
                continue;
            }
            if item.flags.contains(ItemFlags::ROAM) {
                weight *= item.weight_scale;
            }
            let score = weight / (f32::from(travel) * TRAVELTIME_SCALE);
            if score > 0.0 && best.is_none_or(|(_, s)| score > s) {
                best = Some((item, score));
            }
        }
        best.map(|(item, _)| item)
    }

    fn take(&mut self, item: Option<&LevelItem>, now: Seconds, stack: &mut GoalStack) -> GoalResult<Option<GoalCandidate>> {
        let Some(item) = item else { return Ok(None) };
        stack.push(item.goal)?;
        let avoid = item.avoid_time();
        self.avoid_mut().add(item.goal.id, now + avoid);
        debug!(goal = %item.goal.id, avoid, "item goal chosen");
        Ok(Some(item.goal))
    }
}
