//! `nav-goal` — what a bot wants to go to next.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`candidate`] | `GoalCandidate`, `Selection`                                 |
//! | [`avoid`]     | `AvoidList` (32 timed entries, soonest-expiry eviction)      |
//! | [`model`]     | `GoalModel` scoring callbacks, `DefaultGoalModel`            |
//! | [`items`]     | `LevelItem`, long-term and nearby item choice                |
//! | [`sensory`]   | `SensoryQueues`, sound info table, sound/light scoring       |
//! | [`selector`]  | `GoalSelector` (candidates + avoid list + refresh)           |
//! | [`stack`]     | `GoalStack` (8 nested goals)                                 |
//! | [`error`]     | `GoalError`, `GoalResult<T>`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on candidates and sound info. |

pub mod avoid;
pub mod candidate;
pub mod error;
pub mod items;
pub mod model;
pub mod selector;
pub mod sensory;
pub mod stack;

#[cfg(test)]
mod tests;

pub use avoid::{AvoidEntry, AvoidList};
pub use candidate::{GoalCandidate, Selection};
pub use error::{GoalError, GoalResult};
pub use items::{GameType, ItemFlags, ItemQuery, LevelItem};
pub use model::{DefaultGoalModel, GoalModel};
pub use selector::GoalSelector;
pub use sensory::{
    LightEmission, LightEvent, SensoryQueues, SensorySerial, SoundEmission, SoundEvent, SoundInfo, SoundType,
    LIGHT_GOAL_TAG, SOUND_GOAL_TAG,
};
pub use stack::{GoalStack, MAX_GOALSTACK};
