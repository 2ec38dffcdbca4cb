//! `nav-world` — static navigation world, entity-area linking, reachability
//! access, route times, and diagnostics.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`world`]  | `WorldState` (areas, settings, edges, R-tree), `WorldBuilder` |
//! | [`reach`]  | Edge scans on `WorldState` (`edges_from`, `edges_into`, …)    |
//! | [`linker`] | `EntityLinker`, `EntityUpdate`, `TrackedEntity`               |
//! | [`route`]  | `RouteCache` (per-goal travel-time tables)                    |
//! | [`debug`]  | `bfs_path`, `describe_area`, `reachability_listing`           |
//! | [`error`]  | `WorldError`, `WorldResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `fx-hash` | Route-cache tables keyed through `FxHashMap`.              |
//! | `serde`   | Derives `Serialize`/`Deserialize` on public types.         |

pub mod debug;
pub mod error;
pub mod linker;
pub mod reach;
pub mod route;
pub mod world;


pub use debug::{bfs_path, describe_area, reachability_listing, AreaPath, AreaReport, PathStep, ReachSummary};
pub use error::{WorldError, WorldResult};
pub use linker::{EntityLinker, EntityUpdate, Solid, TrackedEntity, UpdateOutcome};
pub use route::{RouteCache, ROUTE_INVALID_TIME};
pub use world::{Area, AreaContents, AreaSettings, Reachability, WorldBuilder, WorldState};
