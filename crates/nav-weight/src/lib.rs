//! `nav-weight` — fuzzy weight trees for goal and weapon scoring.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`fuzzy`]    | `FuzzyArena`, `FuzzyNode`, `SepId`, the evaluator         |
//! | [`switch`]   | `Switch` / `Outcome` tree description                     |
//! | [`config`]   | `WeightConfig` (≤ 128 named weights), builder             |
//! | [`registry`] | `WeightRegistry` (32 handles)                             |
//! | [`error`]    | `WeightError`, `WeightResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on arena and config types. |

pub mod config;
pub mod error;
pub mod fuzzy;
pub mod registry;
pub mod switch;


pub use config::{NamedWeight, WeightConfig, WeightConfigBuilder, MAX_WEIGHTS};
pub use error::{WeightError, WeightResult};
pub use fuzzy::{FuzzyArena, FuzzyNode, SepId, SeparatorKind};
pub use registry::{WeightRegistry, MAX_WEIGHT_HANDLES};
pub use switch::{Outcome, Switch};
