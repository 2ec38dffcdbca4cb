//! Entity-area linker.
//!
//! Every tracked entity is linked into each area its absolute box overlaps.
//! A link record sits on two lists at once: the entity's list of areas and
//! the area's list of entities.  Records live in one flat pool and refer to
//! each other by index, with [`NIL`] as the list terminator.  The area axis
//! is doubly linked so a single record can be spliced out in O(1); the
//! entity axis is only ever walked and released whole, so it is singly
//! linked.
//!
//! Each entity also carries an occupancy bitset with one bit per area.  It is
//! a derived view of the entity's list: the only code that sets or clears a
//! bit is the code that adds or removes the matching link.
//!
//! Linking is O(num_areas) per call (a box test against every area).  Area
//! counts are static and small enough that this is acceptable.

use std::iter::successors;

use tracing::{debug, warn};

use nav_core::{Aabb, AreaId, EntityId, NavConfig, Seconds, Vec3};

use crate::world::WorldState;
use crate::{WorldError, WorldResult};

/// List terminator for link indices.
pub const NIL: u32 = u32::MAX;

/// Per-axis movement above which a BSP mover invalidates cached routes.
const BSP_MOVE_EPSILON: f32 = 0.125;

// ── Entity input ──────────────────────────────────────────────────────────────

/// Collision class of an entity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Solid {
    #[default]
    Not,
    Trigger,
    BBox,
    /// Brush model (doors, platforms).  Moving one changes travel times.
    Bsp,
}

impl Solid {
    pub fn from_raw(raw: u32) -> Solid {
        match raw {
            1 => Solid::Trigger,
            2 => Solid::BBox,
            3 => Solid::Bsp,
            _ => Solid::Not,
        }
    }
}

/// One entity's state as reported by the engine bridge this frame.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityUpdate {
    pub origin:      Vec3,
    pub old_origin:  Vec3,
    pub angles:      Vec3,
    /// Box relative to `origin`.
    pub mins:        Vec3,
    pub maxs:        Vec3,
    pub solid:       Solid,
    pub model_index: i32,
}

/// What the caller must do after an update.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// A BSP mover changed position; cached route times are stale.
    pub routes_stale: bool,
    /// Number of areas the entity is now linked into.
    pub areas:        usize,
}

// ── Tracked state ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct TrackedEntity {
    pub in_use:          bool,
    pub origin:          Vec3,
    pub previous_origin: Vec3,
    pub old_origin:      Vec3,
    pub angles:          Vec3,
    pub mins:            Vec3,
    pub maxs:            Vec3,
    /// World-space box the current links were computed from.
    pub abs_bounds:      Aabb,
    pub solid:           Solid,
    pub model_index:     i32,
    pub update_time:     Option<Seconds>,
    pub delta_time:      Seconds,
    pub outside:         bool,
    /// Frame time at which the entity was last found outside every area.
    pub outside_time:    Seconds,
    first_link:          u32,
    link_count:          usize,
    occupancy:           Vec<u32>,
}

impl Default for TrackedEntity {
    fn default() -> Self {
        Self {
            in_use:          false,
            origin:          Vec3::ZERO,
            previous_origin: Vec3::ZERO,
            old_origin:      Vec3::ZERO,
            angles:          Vec3::ZERO,
            mins:            Vec3::ZERO,
            maxs:            Vec3::ZERO,
            abs_bounds:      Aabb::default(),
            solid:           Solid::Not,
            model_index:     0,
            update_time:     None,
            delta_time:      0.0,
            outside:         true,
            outside_time:    0.0,
            first_link:      NIL,
            link_count:      0,
            occupancy:       Vec::new(),
        }
    }
}

impl TrackedEntity {
    #[inline]
    pub fn link_count(&self) -> usize {
        self.link_count
    }

    #[inline]
    fn bit(&self, area: AreaId) -> bool {
        let (w, b) = (area.index() >> 5, area.index() & 31);
        self.occupancy.get(w).is_some_and(|word| (word >> b) & 1 == 1)
    }
}

#[derive(Clone, Debug)]
struct AreaLink {
    entity:    EntityId,
    area:      AreaId,
    next_ent:  u32,
    prev_area: u32,
    next_area: u32,
}

#[inline]
fn bitset_words(num_areas: usize) -> usize {
    (num_areas + 1).div_ceil(32)
}

// ── EntityLinker ──────────────────────────────────────────────────────────────

pub struct EntityLinker {
    entities:     Vec<TrackedEntity>,
    links:        Vec<AreaLink>,
    free:         Vec<u32>,
    /// Head link of each area's entity list, indexed by area number.
    area_heads:   Vec<u32>,
    live_links:   usize,
    max_entities: usize,
    max_links:    usize,
}

impl EntityLinker {
    pub fn new(max_entities: usize, max_links: usize) -> Self {
        Self {
            entities: Vec::new(),
            links: Vec::new(),
            free: Vec::new(),
            area_heads: Vec::new(),
            live_links: 0,
            max_entities,
            max_links,
        }
    }

    pub fn from_config(config: &NavConfig) -> Self {
        Self::new(config.max_entities, config.max_area_links)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn entity(&self, ent: EntityId) -> Option<&TrackedEntity> {
        self.entities.get(ent.index())
    }

    /// Number of entity slots allocated so far.
    pub fn entity_slots(&self) -> usize {
        self.entities.len()
    }

    /// Links currently in use across all entities.
    #[inline]
    pub fn live_links(&self) -> usize {
        self.live_links
    }

    /// Areas `ent` is linked into.  Most recently linked first.
    pub fn entity_areas(&self, ent: EntityId) -> impl Iterator<Item = AreaId> + '_ {
        let head = self.entity(ent).map_or(NIL, |e| e.first_link);
        successors(Some(head).filter(|&i| i != NIL), move |&i| {
            Some(self.links[i as usize].next_ent).filter(|&n| n != NIL)
        })
        .map(move |i| self.links[i as usize].area)
    }

    /// Entities linked into `area`.  Most recently linked first.
    pub fn area_entities(&self, area: AreaId) -> impl Iterator<Item = EntityId> + '_ {
        let head = self.area_heads.get(area.index()).copied().unwrap_or(NIL);
        successors(Some(head).filter(|&i| i != NIL), move |&i| {
            Some(self.links[i as usize].next_area).filter(|&n| n != NIL)
        })
        .map(move |i| self.links[i as usize].entity)
    }

    /// Occupancy bit test.
    pub fn occupies(&self, ent: EntityId, area: AreaId) -> bool {
        self.entity(ent).is_some_and(|e| e.bit(area))
    }

    /// Number of bits set in `ent`'s occupancy bitset.
    pub fn occupancy_count(&self, ent: EntityId) -> usize {
        self.entity(ent)
            .map_or(0, |e| e.occupancy.iter().map(|w| w.count_ones() as usize).sum())
    }

    /// Whether `ent` is outside every area, with the time it was found so.
    pub fn outside(&self, ent: EntityId) -> Option<(bool, Seconds)> {
        self.entity(ent).map(|e| (e.outside, e.outside_time))
    }

    // ── Updates ───────────────────────────────────────────────────────────

    /// Apply one engine snapshot for `ent`.  `None` means the entity left the
    /// game.
    pub fn update_entity(
        &mut self,
        world: &WorldState,
        ent: EntityId,
        update: Option<&EntityUpdate>,
        now: Seconds,
    ) -> WorldResult<UpdateOutcome> {
        world.ensure_loaded()?;
        self.grow_to(ent)?;

        let Some(u) = update else {
            self.unlink_entity(ent);
            let e = &mut self.entities[ent.index()];
            e.occupancy.iter_mut().for_each(|w| *w = 0);
            e.in_use = false;
            e.outside = true;
            e.outside_time = now;
            return Ok(UpdateOutcome::default());
        };

        let e = &mut self.entities[ent.index()];
        let was_in_use = e.in_use;
        e.previous_origin = e.origin;
        e.origin = u.origin;
        e.old_origin = u.old_origin;
        e.angles = u.angles;
        e.mins = u.mins;
        e.maxs = u.maxs;
        e.solid = u.solid;
        e.model_index = u.model_index;
        e.in_use = true;
        e.delta_time = e.update_time.map_or(0.0, |t| now - t);
        e.update_time = Some(now);

        let moved = e.origin - e.previous_origin;
        let routes_stale = was_in_use
            && e.solid == Solid::Bsp
            && (0..3).any(|axis| moved.axis(axis).abs() > BSP_MOVE_EPSILON);

        let bounds = Aabb::around(u.origin, u.mins, u.maxs);
        let areas = self.link_entity(world, ent, bounds, now)?;
        if routes_stale {
            debug!(%ent, "bsp entity moved; routes stale");
        }
        Ok(UpdateOutcome { routes_stale, areas })
    }

    /// Recompute every area `bounds` overlaps and replace `ent`'s links.
    ///
    /// On error nothing changes: the previous links and bitset stay intact.
    /// Returns the number of areas linked.
    pub fn link_entity(
        &mut self,
        world: &WorldState,
        ent: EntityId,
        bounds: Aabb,
        now: Seconds,
    ) -> WorldResult<usize> {
        world.ensure_loaded()?;
        self.grow_to(ent)?;
        self.sync_world(world);

        let num_areas = world.num_areas();
        let areas = world.areas_overlapping(&bounds);
        let needed = areas.len();

        let held = self.entities[ent.index()].link_count;
        if self.live_links - held + needed > self.max_links {
            warn!(%ent, needed, limit = self.max_links, "area link pool exhausted");
            return Err(WorldError::LinkPoolExhausted { entity: ent, needed, limit: self.max_links });
        }

        // Reserve everything that can fail before touching live state.
        let words = bitset_words(num_areas);
        let mut fresh_bits = None;
        if self.entities[ent.index()].occupancy.len() != words {
            let mut v = Vec::new();
            v.try_reserve_exact(words).map_err(|_| WorldError::Allocation("occupancy bitset"))?;
            v.resize(words, 0u32);
            fresh_bits = Some(v);
        }
        let spare = self.free.len() + held;
        if needed > spare {
            self.links
                .try_reserve(needed - spare)
                .map_err(|_| WorldError::Allocation("area links"))?;
        }

        self.unlink_entity(ent);
        {
            let e = &mut self.entities[ent.index()];
            match fresh_bits {
                Some(v) => e.occupancy = v,
                None => e.occupancy.iter_mut().for_each(|w| *w = 0),
            }
            e.abs_bounds = bounds;
        }

        for &area in &areas {
            self.insert_link(ent, area);
        }

        let e = &mut self.entities[ent.index()];
        if needed == 0 {
            e.outside = true;
            e.outside_time = now;
        } else {
            e.outside = false;
            e.outside_time = 0.0;
        }
        debug!(%ent, areas = needed, "linked");
        Ok(needed)
    }

    /// Remove every link of `ent` and clear its occupancy.  Unknown
    /// entities are ignored.
    pub fn unlink_entity(&mut self, ent: EntityId) {
        let Some(e) = self.entities.get_mut(ent.index()) else { return };
        let mut cur = std::mem::replace(&mut e.first_link, NIL);
        let removed = std::mem::replace(&mut e.link_count, 0);

        while cur != NIL {
            let link = self.links[cur as usize].clone();
            if link.prev_area != NIL {
                self.links[link.prev_area as usize].next_area = link.next_area;
            } else if let Some(head) = self.area_heads.get_mut(link.area.index()) {
                *head = link.next_area;
            }
            if link.next_area != NIL {
                self.links[link.next_area as usize].prev_area = link.prev_area;
            }
            let (w, b) = (link.area.index() >> 5, link.area.index() & 31);
            if let Some(word) = self.entities[ent.index()].occupancy.get_mut(w) {
                *word &= !(1 << b);
            }
            self.free.push(cur);
            cur = link.next_ent;
        }
        self.live_links -= removed;
        if removed > 0 {
            debug!(%ent, links = removed, "unlinked");
        }
    }

    /// Unlink every entity not in use that still holds links.
    pub fn unlink_invalid_entities(&mut self) {
        for i in 0..self.entities.len() {
            let e = &self.entities[i];
            if !e.in_use && e.first_link != NIL {
                self.unlink_entity(EntityId(i as u32));
            }
        }
    }

    /// Mark every entity not in use.  Called when a new frame snapshot
    /// starts; entities the engine reports again come back in use.
    pub fn invalidate_entities(&mut self) {
        for e in &mut self.entities {
            e.in_use = false;
        }
    }

    /// Drop all links and entity state.
    pub fn reset(&mut self) {
        self.entities.clear();
        self.links.clear();
        self.free.clear();
        self.area_heads.clear();
        self.live_links = 0;
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn grow_to(&mut self, ent: EntityId) -> WorldResult<()> {
        if !ent.is_valid() || ent.index() >= self.max_entities {
            return Err(WorldError::EntityOutOfRange(ent));
        }
        if ent.index() >= self.entities.len() {
            let extra = ent.index() + 1 - self.entities.len();
            self.entities
                .try_reserve(extra)
                .map_err(|_| WorldError::Allocation("entity table"))?;
            self.entities.resize_with(ent.index() + 1, TrackedEntity::default);
        }
        Ok(())
    }

    /// Area lists must cover `0..=num_areas`.  A different area count means
    /// the world was reloaded, and every old link is meaningless.
    fn sync_world(&mut self, world: &WorldState) {
        let want = world.num_areas() + 1;
        if self.area_heads.len() == want {
            return;
        }
        if self.live_links > 0 {
            debug!(old = self.area_heads.len(), new = want, "area count changed; dropping links");
        }
        self.links.clear();
        self.free.clear();
        self.live_links = 0;
        for e in &mut self.entities {
            e.first_link = NIL;
            e.link_count = 0;
            e.occupancy.clear();
        }
        self.area_heads.clear();
        self.area_heads.resize(want, NIL);
    }

    fn insert_link(&mut self, ent: EntityId, area: AreaId) {
        let ent_head = self.entities[ent.index()].first_link;
        let area_head = self.area_heads[area.index()];
        let link = AreaLink {
            entity:    ent,
            area,
            next_ent:  ent_head,
            prev_area: NIL,
            next_area: area_head,
        };
        let idx = match self.free.pop() {
            Some(i) => {
                self.links[i as usize] = link;
                i
            }
            None => {
                self.links.push(link);
                (self.links.len() - 1) as u32
            }
        };
        if area_head != NIL {
            self.links[area_head as usize].prev_area = idx;
        }
        self.area_heads[area.index()] = idx;

        let e = &mut self.entities[ent.index()];
        e.first_link = idx;
        e.link_count += 1;
        let (w, b) = (area.index() >> 5, area.index() & 31);
        e.occupancy[w] |= 1 << b;
        self.live_links += 1;
    }
}
