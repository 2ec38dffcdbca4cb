//! Static navigation world and its builder.
//!
//! # Data layout
//!
//! Areas and area settings are indexed by area number.  Slot 0 is the null
//! area, so `areas[a]` and `settings[a]` are valid for every `a` in
//! `1..=num_areas` without an offset.
//!
//! Reachability edges are sorted by source area.  The outgoing edges of area
//! `a` occupy the contiguous slice
//!
//! ```text
//! reach[ settings[a].first_reach .. settings[a].first_reach + settings[a].num_reach ]
//! ```
//!
//! A reversed index in CSR form (`into_start` / `into_edges`) lists, per
//! destination area, the edges that arrive there.  The route cache walks it
//! backwards from a goal.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over the area boxes answers point-to-area queries.
//! When boxes overlap, the lowest area number containing the point wins.

use rstar::{Envelope, PointDistance, RTree, RTreeObject, AABB};
use tracing::error;

use bitflags::bitflags;
use nav_core::{Aabb, AreaId, ReachId, TravelFlagTable, TravelType, Vec3};

use crate::{WorldError, WorldResult};

// ── Contents ──────────────────────────────────────────────────────────────────

bitflags! {
    /// Collision contents of an area, as reported by the world compiler.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AreaContents: u32 {
        const LAVA   = 8;
        const SLIME  = 16;
        const WATER  = 32;
        const LADDER = 0x2000_0000;
    }
}

impl AreaContents {
    /// Water, slime, and lava are all swimmable.
    #[inline]
    pub fn is_liquid(self) -> bool {
        self.intersects(AreaContents::WATER | AreaContents::SLIME | AreaContents::LAVA)
    }
}

// ── Area records ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Area {
    pub id:         AreaId,
    pub num_faces:  u32,
    pub first_face: u32,
    pub mins:       Vec3,
    pub maxs:       Vec3,
    pub center:     Vec3,
}

impl Area {
    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.mins, self.maxs)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaSettings {
    pub contents:      AreaContents,
    pub area_flags:    u32,
    pub presence_type: u32,
    pub cluster:       i32,
    pub cluster_area:  i32,
    /// First outgoing edge in the world's edge array.
    pub first_reach:   u32,
    /// Number of outgoing edges.
    pub num_reach:     u32,
}

/// A directed, typed, timed connection between two areas.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reachability {
    /// Area the edge leaves from.  Derived from the settings ranges when the
    /// world is built, never supplied by the loader.
    pub source:      AreaId,
    pub dest:        AreaId,
    pub face:        i32,
    pub edge:        i32,
    pub start:       Vec3,
    pub end:         Vec3,
    /// Raw travel type: low 24 bits are a [`TravelType`], bits 24/25 are the
    /// not-team flags.
    pub travel_type: u32,
    /// Hundredths of a second.
    pub travel_time: u16,
}

impl Reachability {
    /// Decoded travel type, or `None` for values outside the known set.
    #[inline]
    pub fn kind(&self) -> Option<TravelType> {
        TravelType::from_raw(self.travel_type)
    }
}

// ── R-tree area entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct AreaEntry {
    bounds: AABB<[f32; 3]>,
    id:     AreaId,
}

impl RTreeObject for AreaEntry {
    type Envelope = AABB<[f32; 3]>;
    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

impl PointDistance for AreaEntry {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        self.bounds.distance_2(point)
    }

    fn contains_point(&self, point: &[f32; 3]) -> bool {
        self.bounds.contains_point(point)
    }
}

#[inline]
fn point3(v: Vec3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

// ── WorldState ────────────────────────────────────────────────────────────────

/// The static navigation world.
///
/// Read-only during gameplay.  Replacing it is a stop-the-world operation:
/// the host must not tick any bot while a new world is swapped in.
pub struct WorldState {
    pub(crate) areas:        Vec<Area>,
    pub(crate) settings:     Vec<AreaSettings>,
    pub(crate) reach:        Vec<Reachability>,
    /// CSR row pointer of the reversed index.  Length = `num_areas + 2`.
    pub(crate) into_start:   Vec<u32>,
    pub(crate) into_edges:   Vec<ReachId>,
    pub(crate) travel_flags: TravelFlagTable,
    area_index:              RTree<AreaEntry>,
    loaded:                  bool,
}

impl WorldState {
    /// A world with no areas that reports itself as not loaded.
    pub fn empty() -> Self {
        Self {
            areas:        vec![Area::default()],
            settings:     vec![AreaSettings::default()],
            reach:        Vec::new(),
            into_start:   vec![0, 0],
            into_edges:   Vec::new(),
            travel_flags: TravelFlagTable::default(),
            area_index:   RTree::new(),
            loaded:       false,
        }
    }

    /// Assemble a world from loader arrays indexed by area number (slot 0 is
    /// the null area).
    ///
    /// Area ids and each edge's `source` are rewritten from the array
    /// positions and settings ranges.  Fails when the arrays disagree in
    /// length, a range runs past the edge array, or an edge names an area
    /// outside the world.
    pub fn from_parts(
        mut areas: Vec<Area>,
        mut settings: Vec<AreaSettings>,
        mut reach: Vec<Reachability>,
    ) -> WorldResult<Self> {
        if areas.is_empty() && settings.is_empty() {
            areas.push(Area::default());
            settings.push(AreaSettings::default());
        }
        if settings.len() != areas.len() {
            error!(areas = areas.len(), settings = settings.len(), "area/settings length mismatch");
            return Err(WorldError::SettingsMismatch { areas: areas.len(), settings: settings.len() });
        }
        let num_areas = areas.len() - 1;

        for (i, area) in areas.iter_mut().enumerate() {
            area.id = AreaId(i as u32);
        }

        for r in reach.iter_mut() {
            r.source = AreaId::INVALID;
        }
        for a in 1..=num_areas {
            let s = &settings[a];
            let end = s.first_reach as usize + s.num_reach as usize;
            if end > reach.len() {
                error!(area = a, first = s.first_reach, count = s.num_reach, "reachability range out of bounds");
                return Err(WorldError::ReachRangeOutOfBounds {
                    area:  AreaId(a as u32),
                    first: s.first_reach,
                    count: s.num_reach,
                    total: reach.len(),
                });
            }
            for r in &mut reach[s.first_reach as usize..end] {
                r.source = AreaId(a as u32);
            }
        }

        for (i, r) in reach.iter().enumerate() {
            if !r.dest.is_valid() || r.dest.index() > num_areas {
                error!(reach = i, dest = r.dest.0, "reachability destination outside the world");
                return Err(WorldError::BadReachArea { reach: ReachId(i as u32), area: r.dest });
            }
        }

        let (into_start, into_edges) = reversed_index(num_areas, &reach);

        let entries: Vec<AreaEntry> = areas
            .iter()
            .skip(1)
            .map(|a| {
                let b = Aabb::from_corners(a.mins, a.maxs);
                AreaEntry { bounds: AABB::from_corners(point3(b.mins), point3(b.maxs)), id: a.id }
            })
            .collect();

        Ok(Self {
            areas,
            settings,
            reach,
            into_start,
            into_edges,
            travel_flags: TravelFlagTable::default(),
            area_index: RTree::bulk_load(entries),
            loaded: true,
        })
    }

    // ── Load state ────────────────────────────────────────────────────────

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[inline]
    pub fn ensure_loaded(&self) -> WorldResult<()> {
        if self.loaded { Ok(()) } else { Err(WorldError::NotLoaded) }
    }

    /// Mark the world unloaded.  Every gated operation fails or no-ops
    /// until a new world is built.
    pub fn unload(&mut self) {
        self.loaded = false;
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn num_areas(&self) -> usize {
        self.areas.len() - 1
    }

    #[inline]
    pub fn num_reach(&self) -> usize {
        self.reach.len()
    }

    /// Valid area ids, `1..=num_areas`.
    pub fn area_ids(&self) -> impl Iterator<Item = AreaId> + '_ {
        (1..=self.num_areas()).map(|a| AreaId(a as u32))
    }

    #[inline]
    pub fn in_range(&self, area: AreaId) -> bool {
        area.is_valid() && area.index() <= self.num_areas()
    }

    // ── Area access ───────────────────────────────────────────────────────

    pub fn area(&self, area: AreaId) -> WorldResult<&Area> {
        self.ensure_loaded()?;
        if !self.in_range(area) {
            return Err(WorldError::AreaOutOfRange(area));
        }
        Ok(&self.areas[area.index()])
    }

    pub fn settings(&self, area: AreaId) -> WorldResult<&AreaSettings> {
        self.ensure_loaded()?;
        if !self.in_range(area) {
            return Err(WorldError::AreaOutOfRange(area));
        }
        Ok(&self.settings[area.index()])
    }

    /// Contents of `area`; empty for the null area or when not loaded.
    pub fn area_contents(&self, area: AreaId) -> AreaContents {
        self.settings(area).map(|s| s.contents).unwrap_or_default()
    }

    /// Area whose box contains `point`, or [`AreaId::INVALID`] when none
    /// does or the world is not loaded.
    pub fn point_area(&self, point: Vec3) -> AreaId {
        if !self.loaded {
            return AreaId::INVALID;
        }
        self.area_index
            .locate_all_at_point(&point3(point))
            .map(|e| e.id)
            .min()
            .unwrap_or(AreaId::INVALID)
    }

    /// Areas whose boxes overlap `bounds`, in ascending order.
    pub fn areas_overlapping(&self, bounds: &Aabb) -> Vec<AreaId> {
        if !self.loaded {
            return Vec::new();
        }
        self.area_ids()
            .filter(|a| self.areas[a.index()].bounds().overlaps(bounds))
            .collect()
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::empty()
    }
}

/// Build the per-destination reversed index.  Edges are listed in ascending
/// `ReachId` order within each destination.
fn reversed_index(num_areas: usize, reach: &[Reachability]) -> (Vec<u32>, Vec<ReachId>) {
    let mut start = vec![0u32; num_areas + 2];
    for r in reach {
        start[r.dest.index() + 1] += 1;
    }
    for i in 1..start.len() {
        start[i] += start[i - 1];
    }
    let mut cursor = start.clone();
    let mut edges = vec![ReachId::INVALID; reach.len()];
    for (i, r) in reach.iter().enumerate() {
        let slot = &mut cursor[r.dest.index()];
        edges[*slot as usize] = ReachId(i as u32);
        *slot += 1;
    }
    (start, edges)
}

// ── WorldBuilder ──────────────────────────────────────────────────────────────

/// Construct a [`WorldState`] incrementally, then call [`build`](Self::build).
///
/// Areas are numbered from 1 in insertion order.  Edges may be added in any
/// order; `build()` sorts them by source area into contiguous ranges.
///
/// # Example
///
/// ```
/// use nav_core::{TravelType, Vec3};
/// use nav_world::WorldBuilder;
///
/// let mut b = WorldBuilder::new();
/// let a = b.add_area(Vec3::new(0.0, 0.0, 0.0), Vec3::new(32.0, 32.0, 32.0));
/// let c = b.add_area(Vec3::new(32.0, 0.0, 0.0), Vec3::new(64.0, 32.0, 32.0));
/// b.add_reach(a, c, TravelType::Walk, 50, Vec3::new(30.0, 16.0, 0.0), Vec3::new(34.0, 16.0, 0.0));
/// let world = b.build().unwrap();
/// assert_eq!(world.num_areas(), 2);
/// assert_eq!(world.edges_from(a).count(), 1);
/// ```
pub struct WorldBuilder {
    areas:     Vec<(Aabb, AreaContents)>,
    raw_reach: Vec<Reachability>,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self { areas: Vec::new(), raw_reach: Vec::new() }
    }

    pub fn add_area(&mut self, mins: Vec3, maxs: Vec3) -> AreaId {
        self.add_area_with_contents(mins, maxs, AreaContents::empty())
    }

    pub fn add_area_with_contents(&mut self, mins: Vec3, maxs: Vec3, contents: AreaContents) -> AreaId {
        self.areas.push((Aabb::from_corners(mins, maxs), contents));
        AreaId(self.areas.len() as u32)
    }

    /// Add a directed edge of a known travel type.
    pub fn add_reach(
        &mut self,
        from: AreaId,
        to: AreaId,
        travel_type: TravelType,
        travel_time: u16,
        start: Vec3,
        end: Vec3,
    ) {
        self.add_reach_raw(from, to, travel_type.raw(), travel_time, start, end);
    }

    /// Add a directed edge with a raw travel-type word (team bits, or values
    /// the dispatcher does not know).
    pub fn add_reach_raw(
        &mut self,
        from: AreaId,
        to: AreaId,
        travel_type: u32,
        travel_time: u16,
        start: Vec3,
        end: Vec3,
    ) {
        self.raw_reach.push(Reachability {
            source: from,
            dest: to,
            face: 0,
            edge: 0,
            start,
            end,
            travel_type,
            travel_time,
        });
    }

    /// Add an elevator or bobbing-platform edge ridden on brush model
    /// `model`.
    pub fn add_mover_reach(
        &mut self,
        from: AreaId,
        to: AreaId,
        travel_type: TravelType,
        model: i32,
        travel_time: u16,
        start: Vec3,
        end: Vec3,
    ) {
        self.add_reach(from, to, travel_type, travel_time, start, end);
        if let Some(r) = self.raw_reach.last_mut() {
            r.face = model & 0xFFFF;
        }
    }

    pub fn area_count(&self) -> usize { self.areas.len() }
    pub fn reach_count(&self) -> usize { self.raw_reach.len() }

    /// Consume the builder and produce a loaded [`WorldState`].
    pub fn build(self) -> WorldResult<WorldState> {
        let num_areas = self.areas.len();

        let mut raw = self.raw_reach;
        for (i, r) in raw.iter().enumerate() {
            if !r.source.is_valid() || r.source.index() > num_areas {
                return Err(WorldError::BadReachArea { reach: ReachId(i as u32), area: r.source });
            }
        }
        // Stable: edges of one area keep their insertion order.
        raw.sort_by_key(|r| r.source.0);

        let mut areas = Vec::with_capacity(num_areas + 1);
        let mut settings = Vec::with_capacity(num_areas + 1);
        areas.push(Area::default());
        settings.push(AreaSettings::default());

        let mut first = 0u32;
        for (i, (bounds, contents)) in self.areas.into_iter().enumerate() {
            let id = AreaId(i as u32 + 1);
            let count = raw[first as usize..].iter().take_while(|r| r.source == id).count() as u32;
            areas.push(Area {
                id,
                num_faces: 0,
                first_face: 0,
                mins: bounds.mins,
                maxs: bounds.maxs,
                center: bounds.center(),
            });
            settings.push(AreaSettings {
                contents,
                presence_type: 0,
                cluster: 0,
                cluster_area: 0,
                area_flags: 0,
                first_reach: first,
                num_reach: count,
            });
            first += count;
        }

        WorldState::from_parts(areas, settings, raw)
    }
}

impl Default for WorldBuilder {
    fn default() -> Self {
        Self::new()
    }
}
