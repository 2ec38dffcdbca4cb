//! `nav-core` — foundational types for the `botnav` bot navigation core.
//!
//! Every other `nav-*` crate depends on this one.  It has no `nav-*`
//! dependencies and few external ones (`rand`, `thiserror`, `bitflags`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`ids`]      | `AreaId`, `ReachId`, `EntityId`, `GoalId`, handles         |
//! | [`math`]     | `Vec3`, `Aabb`, view-angle helpers                         |
//! | [`travel`]   | `TravelType`, `TravelFlags`, `TravelFlagTable`             |
//! | [`time`]     | `Seconds`, `FrameClock`                                    |
//! | [`config`]   | `NavConfig` and fixed capacity limits                      |
//! | [`rng`]      | `BotRng` (per-bot, deterministic)                          |
//! | [`error`]    | `NavError`, `NavResult`                                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to public value types.      |

pub mod config;
pub mod error;
pub mod ids;
pub mod math;
pub mod rng;
pub mod time;
pub mod travel;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::NavConfig;
pub use error::{NavError, NavResult};
pub use ids::{AreaId, ClientId, EntityId, GoalId, MoveHandle, ReachId, WeightHandle};
pub use math::{angle_delta, Aabb, Vec3};
pub use rng::BotRng;
pub use time::{FrameClock, Seconds};
pub use travel::{TravelFlagTable, TravelFlags, TravelType};
