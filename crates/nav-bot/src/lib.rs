//! `nav-bot` — per-frame bot controller for botnav.
//!
//! # Frame loop
//!
//! ```text
//! each server frame:
//!   ① Time:     set_frame_time(now) syncs the clock and sensory queues.
//!   ② Inputs:   update_entity / update_client / record_sound / record_light.
//!                A BSP mover that moved invalidates the route cache.
//!   ③ Refresh:  GoalSelector::refresh for every bot, scored by item
//!                weights and route travel times
//!                (parallel with the `parallel` feature).
//!   ④ Move:     for each bot in ascending BotId order:
//!                  goal stack top, else the selection → move_to_goal
//!                  no goal                           → idle input
//!                The linker goes along, so a bot standing on a
//!                registered lift rides it.
//! ```
//!
//! Between frames the host may call `choose_ltg_item` / `choose_nbg_item`
//! to push a level item onto a bot's goal stack.
//!
//! # Crate layout
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`controller`] | `BotController`, `BotControllerBuilder`, `BotId`      |
//! | [`model`]      | `ItemWeights`, `RouteTravelTime`, `BotGoalModel`      |
//! | [`input`]      | `ClientSnapshot` in, `BotInput` out                   |
//! | [`observer`]   | `BotObserver` callbacks and `NoopObserver`            |
//! | [`error`]      | `BotError`, `BotResult`                               |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the goal-refresh phase on Rayon's thread pool.    |
//! | `fx-hash`  | FxHash for the route cache's table map.                |
//! | `serde`    | Serialize/Deserialize on snapshots, inputs and config. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use nav_bot::{BotControllerBuilder, BotId, ClientSnapshot, NoopObserver};
//! use nav_core::{ClientId, NavConfig};
//!
//! let mut bots = BotControllerBuilder::new(NavConfig::default(), world)
//!     .clients(vec![ClientId(0)])
//!     .build()?;
//! bots.set_frame_time(1.0);
//! bots.update_client(BotId(0), &ClientSnapshot { origin, ..Default::default() })?;
//! for (bot, input) in bots.tick(&mut NoopObserver)? {
//!     host.apply(bot, input);
//! }
//! ```

pub mod controller;
pub mod error;
pub mod input;
pub mod model;
pub mod observer;


pub use controller::{BotController, BotControllerBuilder, BotId, BotSlot, DEFAULT_INVENTORY_SIZE};
pub use error::{BotError, BotResult};
pub use input::{BotInput, ClientSnapshot};
pub use model::{BotGoalModel, ItemWeights, RouteTravelTime};
pub use observer::{BotObserver, NoopObserver};
