//! Grapple-hook traversal.
//!
//! A grapple edge is driven in two phases.  While not attached the bot walks
//! to the edge start and aims at the anchor (`reach.end`); once it is close
//! and aimed it fires the hook.  While attached it keeps firing and watches
//! the horizontal pull distance, letting go when the distance stops
//! shrinking.
//!
//! Nothing happens unless the host enables both the use-hook and the
//! laser-hook capability.

use tracing::debug;

use nav_core::{angle_delta, NavConfig, Seconds, TravelType};
use nav_world::Reachability;

use crate::{ActionFlags, MoveCommand, MoveFlags, MoveHooks, MoveResultFlags, MoveState};

/// Attach when the bot is closer than this to the edge start.
pub const ATTACH_DISTANCE: f32 = 5.0;
/// Yaw and pitch must both be within this many degrees of the anchor.
pub const AIM_TOLERANCE: f32 = 2.0;
/// Below this pull distance the bot lets go as soon as it stops closing in.
pub const NEAR_PULL_DISTANCE: f32 = 48.0;
/// Far from the anchor, seconds without progress before letting go.
pub const STALL_TIME: Seconds = 0.4;
pub const APPROACH_SPEED: f32 = 400.0;
/// Inside this distance the approach slows to `4 × distance`.
pub const SLOWDOWN_DISTANCE: f32 = 70.0;
/// Weapon slot selected while the hook is out.
pub const GRAPPLE_WEAPON: i32 = 0;

/// Capability gate and precache bookkeeping for the grapple.
#[derive(Clone, Debug)]
pub struct Grapple {
    use_hook:   bool,
    laser_hook: bool,
    model:      String,
    precached:  bool,
}

impl Grapple {
    pub fn new(use_hook: bool, laser_hook: bool, model: impl Into<String>) -> Self {
        Self { use_hook, laser_hook, model: model.into(), precached: false }
    }

    pub fn from_config(config: &NavConfig) -> Self {
        Self::new(config.use_hook, config.laser_hook, config.grapple_model.clone())
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.use_hook && self.laser_hook
    }

    pub fn is_precached(&self) -> bool {
        self.precached
    }

    fn precache<H: MoveHooks + ?Sized>(&mut self, state: &MoveState, hooks: &H) {
        if self.precached || self.model.is_empty() {
            return;
        }
        hooks.precache_model(state.client, &self.model);
        self.precached = true;
    }

    /// One frame of travel along grapple edge `reach`.
    pub fn travel<H>(&mut self, state: &mut MoveState, reach: &Reachability, now: Seconds, hooks: &H) -> MoveCommand
    where
        H: MoveHooks + ?Sized,
    {
        let kind = TravelType::GrappleHook;
        if !self.is_enabled() {
            return MoveCommand::failed(kind.raw());
        }
        self.precache(state, hooks);

        let ideal = (reach.end - (state.origin + state.view_offset)).to_angles();
        let mut cmd = MoveCommand {
            travel_type: kind.raw(),
            flags:       MoveResultFlags::MOVEMENTVIEW,
            ideal_view:  Some(ideal),
            ..MoveCommand::default()
        };
        let timeout = now + kind.timeout_secs();

        if state.move_flags.contains(MoveFlags::ACTIVEGRAPPLE) {
            let pull = (reach.end - state.origin).horizontal_length();
            let last = state.last_grapple_dist;

            let release = if pull < NEAR_PULL_DISTANCE {
                last - pull < 1.0
            } else if pull > last - 2.0 {
                now - state.grapple_visible_time > STALL_TIME
            } else {
                state.grapple_visible_time = now;
                false
            };

            cmd.flags |= MoveResultFlags::MOVEMENTWEAPON;
            if release {
                debug!(client = %state.client, pull, "grapple released");
                state.disengage_grapple();
                cmd.actions = ActionFlags::HOOK_OFF;
                return cmd;
            }

            state.move_flags.insert(MoveFlags::GRAPPLEPULL);
            state.last_grapple_dist = pull;
            state.reachability_time = timeout;
            cmd.actions = ActionFlags::ATTACK;
            cmd.weapon = Some(GRAPPLE_WEAPON);
            return cmd;
        }

        let mut approach = reach.start - state.origin;
        if !state.is_swimming() {
            approach = approach.flattened();
        }
        let (dir, dist) = approach.normalize_len();
        let yaw_off = angle_delta(ideal[1], state.view_angles[1]).abs();
        let pitch_off = angle_delta(ideal[0], state.view_angles[0]).abs();

        state.grapple_visible_time = now;
        state.reachability_time = timeout;

        if dist < ATTACH_DISTANCE && yaw_off < AIM_TOLERANCE && pitch_off < AIM_TOLERANCE {
            state.move_flags.insert(MoveFlags::ACTIVEGRAPPLE | MoveFlags::GRAPPLEPULL);
            state.last_grapple_dist = (reach.end - state.origin).horizontal_length();
            debug!(client = %state.client, pull = state.last_grapple_dist, "grapple attached");
            cmd.actions = ActionFlags::HOOK_ON | ActionFlags::ATTACK;
            cmd.weapon = Some(GRAPPLE_WEAPON);
            cmd.flags |= MoveResultFlags::MOVEMENTWEAPON;
            return cmd;
        }

        cmd.dir = dir;
        cmd.speed = if dist < SLOWDOWN_DISTANCE { 4.0 * dist } else { APPROACH_SPEED };
        if state.is_swimming() {
            cmd.flags |= MoveResultFlags::SWIMVIEW;
        }
        cmd
    }
}

impl Default for Grapple {
    fn default() -> Self {
        Self::from_config(&NavConfig::default())
    }
}
