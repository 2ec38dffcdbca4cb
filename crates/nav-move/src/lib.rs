//! `nav-move` — turns "go to this goal" into one frame of movement.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`flags`]    | `MoveFlags`, `MoveResultFlags`, `ResultType`, `ActionFlags`, `MoveType` |
//! | [`state`]    | `MoveState`, `InitMove`, avoid-reach slot, environment checks |
//! | [`pool`]     | `MovePool` (handles `1..=max_clients`)                       |
//! | [`command`]  | `MoveGoal`, `MoveCommand`                                    |
//! | [`dispatch`] | `MoveDispatcher`, edge selection, per-travel-type handlers   |
//! | [`grapple`]  | `Grapple` (approach, attach, pull, release)                  |
//! | [`mover`]    | `MoverCatalogue`, `MoverKind`, ground-mover support check    |
//! | [`hooks`]    | `MoveHooks` host callbacks, `NoopHooks`                      |
//! | [`error`]    | `MoveError`, `MoveResult<T>`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on states, commands, flags. |

pub mod command;
pub mod dispatch;
pub mod error;
pub mod flags;
pub mod grapple;
pub mod hooks;
pub mod mover;
pub mod pool;
pub mod state;

#[cfg(test)]
mod tests;

pub use command::{MoveCommand, MoveGoal};
pub use dispatch::{best_reach, MoveDispatcher};
pub use error::{MoveError, MoveResult};
pub use flags::{ActionFlags, MoveFlags, MoveResultFlags, MoveType, ResultType};
pub use grapple::Grapple;
pub use hooks::{MoveHooks, NoopHooks};
pub use mover::{MoverCatalogue, MoverKind, MoverSupport};
pub use pool::MovePool;
pub use state::{AvoidReach, InitMove, MoveState};
