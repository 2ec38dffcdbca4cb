//! Top-level configuration for the navigation core.
//!
//! Typically filled in by the host from its own config variables and passed
//! to `nav_bot::BotControllerBuilder`.  Each subsystem reads only the fields
//! it needs.

use crate::{NavError, NavResult};

/// Hard ceiling for static goal candidates per bot.
pub const MAX_CANDIDATES: usize = 32;
/// Hard ceiling for avoid-list entries per bot.
pub const MAX_AVOID_GOALS: usize = 32;
/// Hard ceiling for sound-derived candidates per refresh.
pub const MAX_SOUND_CANDIDATES: usize = 16;
/// Hard ceiling for light-derived candidates per refresh.
pub const MAX_LIGHT_CANDIDATES: usize = 8;

/// Default grapple model precached on first hook use.
pub const DEFAULT_GRAPPLE_MODEL: &str = "models/weapons/grapple/hook/tris.md2";

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavConfig {
    /// Size of the move-state handle pool.  Default: 256.
    pub max_clients: usize,

    /// Highest entity number + 1 the linker accepts.  Storage grows on
    /// demand up to this limit.
    pub max_entities: usize,

    /// Size of the shared area-link pool.  Linking an entity that would
    /// need more links fails and leaves the previous links in place.
    pub max_area_links: usize,

    /// Seconds an unreachable goal stays on the avoid list.  Values `<= 0`
    /// fall back to 5 s.
    pub avoid_duration: f32,

    /// Static goal candidates allowed per bot (≤ [`MAX_CANDIDATES`]).
    pub max_candidates: usize,

    /// Sound-derived candidates considered per refresh (≤ 16).
    pub max_sound_candidates: usize,

    /// Light-derived candidates considered per refresh (≤ 8).
    pub max_light_candidates: usize,

    /// Ring capacity of the recorded sound queue.
    pub sound_queue_capacity: usize,

    /// Ring capacity of the recorded point-light queue.
    pub light_queue_capacity: usize,

    /// Host allows the off-hand grapple.
    pub use_hook: bool,

    /// Host grapple is the laser variant bots know how to fire.
    pub laser_hook: bool,

    /// Model requested through the move hooks on first grapple use.
    pub grapple_model: String,

    /// Speed of ordinary movement commands.  Default: 400.
    pub default_move_speed: f32,

    /// Master RNG seed.  The same seed gives identical balance-node draws.
    pub seed: u64,
}

impl NavConfig {
    /// Avoid duration with the ≤ 0 fallback applied.
    #[inline]
    pub fn effective_avoid_duration(&self) -> f32 {
        if self.avoid_duration > 0.0 { self.avoid_duration } else { 5.0 }
    }

    /// Reject configurations the fixed-capacity structures cannot honour.
    pub fn validate(&self) -> NavResult<()> {
        if self.max_clients == 0 {
            return Err(NavError::Config("max_clients must be at least 1".into()));
        }
        if self.max_entities == 0 || self.max_area_links == 0 {
            return Err(NavError::Config("entity and area-link limits must be non-zero".into()));
        }
        if self.max_candidates == 0 || self.max_candidates > MAX_CANDIDATES {
            return Err(NavError::Config(format!(
                "max_candidates {} outside 1..={MAX_CANDIDATES}",
                self.max_candidates
            )));
        }
        if self.max_sound_candidates > MAX_SOUND_CANDIDATES {
            return Err(NavError::Config(format!(
                "max_sound_candidates {} exceeds {MAX_SOUND_CANDIDATES}",
                self.max_sound_candidates
            )));
        }
        if self.max_light_candidates > MAX_LIGHT_CANDIDATES {
            return Err(NavError::Config(format!(
                "max_light_candidates {} exceeds {MAX_LIGHT_CANDIDATES}",
                self.max_light_candidates
            )));
        }
        if self.sound_queue_capacity == 0 || self.light_queue_capacity == 0 {
            return Err(NavError::Config("sensory queue capacities must be non-zero".into()));
        }
        if !(self.default_move_speed > 0.0) {
            return Err(NavError::Config("default_move_speed must be positive".into()));
        }
        Ok(())
    }
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            max_clients:          256,
            max_entities:         1024,
            max_area_links:       4096,
            avoid_duration:       5.0,
            max_candidates:       MAX_CANDIDATES,
            max_sound_candidates: MAX_SOUND_CANDIDATES,
            max_light_candidates: MAX_LIGHT_CANDIDATES,
            sound_queue_capacity: 64,
            light_queue_capacity: 32,
            use_hook:             false,
            laser_hook:           false,
            grapple_model:        DEFAULT_GRAPPLE_MODEL.to_string(),
            default_move_speed:   400.0,
            seed:                 0,
        }
    }
}
