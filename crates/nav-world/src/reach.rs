//! Read-only scans over the reachability edge array.

use std::ops::Range;

use nav_core::travel::TRAVELTYPE_MASK;
use nav_core::{AreaId, ReachId, TravelFlags, TravelType};

use crate::world::{Reachability, WorldState};
use crate::{WorldError, WorldResult};

impl WorldState {
    /// Edge index range leaving `area`.  Empty for the null area, an
    /// out-of-range area, or an unloaded world.
    pub fn reach_range(&self, area: AreaId) -> Range<usize> {
        if !self.is_loaded() || !self.in_range(area) {
            return 0..0;
        }
        let s = &self.settings[area.index()];
        let start = s.first_reach as usize;
        start..start + s.num_reach as usize
    }

    /// Outgoing edges of `area` with their ids, in array order.
    pub fn edges_from(&self, area: AreaId) -> impl Iterator<Item = (ReachId, &Reachability)> + '_ {
        let range = self.reach_range(area);
        let start = range.start;
        self.reach[range]
            .iter()
            .enumerate()
            .map(move |(i, r)| (ReachId((start + i) as u32), r))
    }

    /// Edges that arrive in `area`, in ascending id order.
    pub fn edges_into(&self, area: AreaId) -> impl Iterator<Item = (ReachId, &Reachability)> + '_ {
        let ids: &[ReachId] = if self.is_loaded() && self.in_range(area) {
            let lo = self.into_start[area.index()] as usize;
            let hi = self.into_start[area.index() + 1] as usize;
            &self.into_edges[lo..hi]
        } else {
            &[]
        };
        ids.iter().map(move |&id| (id, &self.reach[id.index()]))
    }

    #[inline]
    pub fn out_degree(&self, area: AreaId) -> usize {
        self.reach_range(area).len()
    }

    pub fn reach(&self, id: ReachId) -> WorldResult<&Reachability> {
        self.ensure_loaded()?;
        self.reach
            .get(id.index())
            .ok_or(WorldError::Core(nav_core::NavError::ReachOutOfRange(id)))
    }

    /// Flag an edge requires, including its not-team bits.
    #[inline]
    pub fn travel_flag_for(&self, r: &Reachability) -> TravelFlags {
        self.travel_flags.flag_for(r.travel_type)
    }

    /// Whether a movement request with `mask` may take `r`.  An empty mask
    /// means [`TravelFlags::DEFAULT`].
    #[inline]
    pub fn edge_allowed(&self, r: &Reachability, mask: TravelFlags) -> bool {
        self.travel_flags.allows(r.travel_type, mask)
    }

    /// Whether route search with `mask` may use `r`: every required bit must
    /// be present.
    #[inline]
    pub fn edge_routable(&self, r: &Reachability, mask: TravelFlags) -> bool {
        self.travel_flags.permits_all(r.travel_type, mask)
    }

    /// First edge from `from` straight into `to` that `mask` allows.
    pub fn direct_reach(&self, from: AreaId, to: AreaId, mask: TravelFlags) -> Option<ReachId> {
        self.edges_from(from)
            .find(|(_, r)| r.dest == to && self.edge_allowed(r, mask))
            .map(|(id, _)| id)
    }

    /// First edge of travel type `kind` ridden on brush model `model`.  The
    /// model number sits in the low 16 bits of the edge's face.
    pub fn model_reach(&self, kind: TravelType, model: i32) -> Option<ReachId> {
        if !self.is_loaded() {
            return None;
        }
        self.reach
            .iter()
            .position(|r| r.travel_type & TRAVELTYPE_MASK == kind.raw() && r.face & 0xFFFF == model)
            .map(|i| ReachId(i as u32))
    }
}
