//! Route travel-time cache.
//!
//! One table per `(goal area, travel flags)` pair, holding every area's
//! travel time to that goal in hundredths of a second.  Tables are filled on
//! first use by a backward Dijkstra from the goal over the reversed
//! reachability index, then shared read-only (`Arc`) with every caller.
//!
//! # Cost units
//!
//! Edge costs are the edges' `travel_time` (1/100 s).  Sums are carried in
//! `u32` and stored as `u16`; anything at or beyond [`ROUTE_INVALID_TIME`]
//! reads as unreachable.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use nav_core::{AreaId, TravelFlags, Vec3};

use crate::world::WorldState;

#[cfg(feature = "fx-hash")]
type TableMap = rustc_hash::FxHashMap<(AreaId, TravelFlags), Arc<[u16]>>;
#[cfg(not(feature = "fx-hash"))]
type TableMap = std::collections::HashMap<(AreaId, TravelFlags), Arc<[u16]>>;

/// Stored time meaning "no route".
pub const ROUTE_INVALID_TIME: u16 = 0xFFFF;

/// Hundredths of a second per unit of distance inside the start area.
const LOCAL_TIME_SCALE: f32 = 0.33;

#[derive(Default)]
pub struct RouteCache {
    tables: RwLock<TableMap>,
}

impl RouteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Travel time in 1/100 s from `origin` (standing in `area`) to
    /// `goal_area`.
    ///
    /// `None` when the world is not loaded, either area is out of range, or
    /// no route exists.  `Some(0)` is a real zero-cost route.  Inside the
    /// goal area the result is the time to cross from `origin` to the area
    /// centre.
    pub fn area_travel_time_to_goal(
        &self,
        world: &WorldState,
        area: AreaId,
        origin: Vec3,
        goal_area: AreaId,
        flags: TravelFlags,
    ) -> Option<u16> {
        if !world.is_loaded() || !world.in_range(area) || !world.in_range(goal_area) {
            return None;
        }
        let center = world.areas[area.index()].center;
        let local = (origin.distance(center) * LOCAL_TIME_SCALE).min(ROUTE_INVALID_TIME as f32) as u16;
        if area == goal_area {
            return Some(local);
        }
        let table = self.table(world, goal_area, flags);
        match table.get(area.index()).copied() {
            None | Some(ROUTE_INVALID_TIME) => None,
            Some(base) => Some(base.saturating_add(local)),
        }
    }

    /// The per-area table for `(goal_area, flags)`, computing it on a miss.
    /// An empty `flags` mask means [`TravelFlags::DEFAULT`].
    pub fn table(&self, world: &WorldState, goal_area: AreaId, flags: TravelFlags) -> Arc<[u16]> {
        let key = (goal_area, flags.or_default_mask());
        {
            let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
            if let Some(t) = tables.get(&key) {
                return Arc::clone(t);
            }
        }

        let table: Arc<[u16]> = backward_times(world, key.0, key.1).into();
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        Arc::clone(tables.entry(key).or_insert(table))
    }

    /// Drop every cached table.
    pub fn invalidate(&self) {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        if !tables.is_empty() {
            debug!(tables = tables.len(), "route cache invalidated");
        }
        tables.clear();
    }

    pub fn len(&self) -> usize {
        self.tables.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Dijkstra from `goal` along reversed edges.  Only edges whose every
/// required flag is in `flags` are usable.
fn backward_times(world: &WorldState, goal: AreaId, flags: TravelFlags) -> Vec<u16> {
    let n = world.num_areas() + 1;
    let mut dist = vec![u32::MAX; n];
    dist[goal.index()] = 0;

    // Reverse turns the max-heap into a min-heap; AreaId breaks ties.
    let mut heap: BinaryHeap<Reverse<(u32, AreaId)>> = BinaryHeap::new();
    heap.push(Reverse((0, goal)));

    while let Some(Reverse((cost, area))) = heap.pop() {
        if cost > dist[area.index()] {
            continue;
        }
        for (_, r) in world.edges_into(area) {
            if !world.edge_routable(r, flags) {
                continue;
            }
            let next = cost + r.travel_time as u32;
            let slot = &mut dist[r.source.index()];
            if next < *slot {
                *slot = next;
                heap.push(Reverse((next, r.source)));
            }
        }
    }

    let reached = dist.iter().filter(|&&d| d < ROUTE_INVALID_TIME as u32).count();
    debug!(%goal, flags = flags.bits(), reached, "route table built");

    dist.into_iter()
        .map(|d| d.min(ROUTE_INVALID_TIME as u32) as u16)
        .collect()
}
