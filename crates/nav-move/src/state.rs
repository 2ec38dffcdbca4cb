//! Per-bot movement state.

use nav_core::{AreaId, ClientId, EntityId, ReachId, Seconds, Vec3};
use nav_world::{AreaContents, WorldState};

use crate::MoveFlags;

/// Snapshot a move state is initialised from.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitMove {
    pub origin:        Vec3,
    pub velocity:      Vec3,
    pub view_offset:   Vec3,
    pub entity:        EntityId,
    pub client:        ClientId,
    pub think_time:    Seconds,
    pub presence_type: u32,
    pub view_angles:   [f32; 3],
    /// ORed into the fresh state's move flags.
    pub or_move_flags: MoveFlags,
}

/// A reachability the bot should not take again until `expiry`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AvoidReach {
    pub reach:  ReachId,
    pub expiry: Seconds,
}

/// Everything the dispatcher remembers about one bot between frames.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveState {
    // ── Client snapshot ──────────────────────────────────────────────────
    pub origin:        Vec3,
    pub velocity:      Vec3,
    pub view_offset:   Vec3,
    pub view_angles:   [f32; 3],
    pub entity:        EntityId,
    pub client:        ClientId,
    pub think_time:    Seconds,
    pub presence_type: u32,

    // ── Area history ─────────────────────────────────────────────────────
    pub area:           AreaId,
    pub last_area:      AreaId,
    pub last_goal_area: AreaId,
    /// Destination area of the last dispatched edge.
    pub reach_area:     AreaId,
    pub last_reach:     Option<ReachId>,
    pub last_origin:    Vec3,

    pub move_flags: MoveFlags,
    /// Set by jump-type travel; cleared by the caller once the jump lands.
    pub jump_reach: bool,

    // ── Grapple ──────────────────────────────────────────────────────────
    pub grapple_visible_time: Seconds,
    pub last_grapple_dist:    f32,

    /// Time after which the current traversal counts as stuck.
    pub reachability_time: Seconds,
    pub avoid_reach:       Option<AvoidReach>,
}

impl MoveState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh state carrying `init`, classified against `world`.
    pub fn from_init(init: &InitMove, world: &WorldState) -> Self {
        let mut state = MoveState {
            origin:        init.origin,
            velocity:      init.velocity,
            view_offset:   init.view_offset,
            view_angles:   init.view_angles,
            entity:        init.entity,
            client:        init.client,
            think_time:    init.think_time,
            presence_type: init.presence_type,
            move_flags:    init.or_move_flags,
            ..MoveState::default()
        };
        state.classify_environment(world);
        state
    }

    #[inline]
    pub fn is_swimming(&self) -> bool {
        self.move_flags.contains(MoveFlags::SWIMMING)
    }

    /// Re-derive the current area and the swimming/ladder flags from the
    /// origin.  A point inside no area keeps the previous area.
    pub fn classify_environment(&mut self, world: &WorldState) {
        self.last_area = self.area;
        let area = world.point_area(self.origin);
        if area.is_valid() {
            self.area = area;
        }

        self.move_flags.remove(MoveFlags::SWIMMING | MoveFlags::AGAINSTLADDER);
        let contents = world.area_contents(self.area);
        if contents.is_liquid() {
            self.move_flags.insert(MoveFlags::SWIMMING);
        }
        if contents.contains(AreaContents::LADDER) {
            self.move_flags.insert(MoveFlags::AGAINSTLADDER);
        }
    }

    // ── Avoid-reach slot ─────────────────────────────────────────────────

    /// Avoid `reach` until `expiry`, replacing any previous entry.
    pub fn avoid(&mut self, reach: ReachId, expiry: Seconds) {
        self.avoid_reach = Some(AvoidReach { reach, expiry });
    }

    pub fn is_avoiding(&self, reach: ReachId, now: Seconds) -> bool {
        matches!(self.avoid_reach, Some(a) if a.reach == reach && a.expiry > now)
    }

    /// Drop the avoided edge once its expiry has passed.
    pub fn refresh_avoid_reach(&mut self, now: Seconds) {
        if matches!(self.avoid_reach, Some(a) if a.expiry <= now) {
            self.avoid_reach = None;
        }
    }

    pub fn reset_avoid_reach(&mut self) {
        self.avoid_reach = None;
    }

    /// Clear every grapple flag and timer.
    pub(crate) fn disengage_grapple(&mut self) {
        self.move_flags.remove(MoveFlags::ACTIVEGRAPPLE | MoveFlags::GRAPPLEPULL);
        self.grapple_visible_time = 0.0;
        self.last_grapple_dist = 0.0;
        self.reachability_time = 0.0;
    }
}
