//! Read-only diagnostics: area reports, reachability listings, and a
//! hop-count path search.
//!
//! Nothing here is on the per-tick path.  The breadth-first search ignores
//! travel types and times; it answers "is there any chain of edges, and how
//! few hops does it take".

use std::collections::VecDeque;
use std::fmt;

use nav_core::{AreaId, ReachId, TravelType, Vec3};

use crate::world::{Area, AreaSettings, WorldState};
use crate::{WorldError, WorldResult};

// ── Path search ───────────────────────────────────────────────────────────────

/// One hop of an [`AreaPath`]: the area reached and the edge used to get
/// there (`ReachId::INVALID` for the start).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PathStep {
    pub area:  AreaId,
    pub reach: ReachId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AreaPath {
    pub steps: Vec<PathStep>,
}

impl AreaPath {
    /// Edges traversed.
    pub fn hops(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn areas(&self) -> impl Iterator<Item = AreaId> + '_ {
        self.steps.iter().map(|s| s.area)
    }
}

impl fmt::Display for AreaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, s) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " -[{}]-> ", s.reach.0)?;
            }
            write!(f, "{}", s.area.0)?;
        }
        Ok(())
    }
}

/// Fewest-hop path from `start` to `goal`.
///
/// FIFO traversal; an area is marked visited when first enqueued and its
/// predecessor (area + edge) recorded then.  The path is rebuilt by walking
/// predecessors back from the goal.
pub fn bfs_path(world: &WorldState, start: AreaId, goal: AreaId) -> WorldResult<AreaPath> {
    world.ensure_loaded()?;
    for a in [start, goal] {
        if !world.in_range(a) {
            return Err(WorldError::AreaOutOfRange(a));
        }
    }

    let n = world.num_areas() + 1;
    let mut visited = vec![false; n];
    let mut prev = vec![(AreaId::INVALID, ReachId::INVALID); n];
    let mut queue = VecDeque::new();

    visited[start.index()] = true;
    queue.push_back(start);

    while let Some(area) = queue.pop_front() {
        if area == goal {
            break;
        }
        for (id, r) in world.edges_from(area) {
            let d = r.dest.index();
            if d < n && !visited[d] {
                visited[d] = true;
                prev[d] = (area, id);
                queue.push_back(r.dest);
            }
        }
    }

    if !visited[goal.index()] {
        return Err(WorldError::NoPath { start, goal });
    }

    let mut steps = Vec::new();
    let mut cur = goal;
    while cur != start {
        let (from, via) = prev[cur.index()];
        if !from.is_valid() || steps.len() >= n {
            return Err(WorldError::NoPath { start, goal });
        }
        steps.push(PathStep { area: cur, reach: via });
        cur = from;
    }
    steps.push(PathStep { area: start, reach: ReachId::INVALID });
    steps.reverse();
    Ok(AreaPath { steps })
}

// ── Reports ───────────────────────────────────────────────────────────────────

/// One line of a reachability listing.
#[derive(Clone, Debug, PartialEq)]
pub struct ReachSummary {
    pub id:          ReachId,
    pub dest:        AreaId,
    pub kind:        Option<TravelType>,
    pub raw_type:    u32,
    pub travel_time: u16,
    pub start:       Vec3,
    pub end:         Vec3,
}

impl fmt::Display for ReachSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ", self.id, self.dest)?;
        match self.kind {
            Some(k) => write!(f, "{k}")?,
            None => write!(f, "type {}", self.raw_type)?,
        }
        write!(
            f,
            " {:.2}s {} .. {}",
            self.travel_time as f32 / 100.0,
            self.start,
            self.end
        )
    }
}

/// Outgoing edges of `area`.
pub fn reachability_listing(world: &WorldState, area: AreaId) -> WorldResult<Vec<ReachSummary>> {
    world.area(area)?;
    Ok(world
        .edges_from(area)
        .map(|(id, r)| ReachSummary {
            id,
            dest:        r.dest,
            kind:        r.kind(),
            raw_type:    r.travel_type,
            travel_time: r.travel_time,
            start:       r.start,
            end:         r.end,
        })
        .collect())
}

#[derive(Clone, Debug, PartialEq)]
pub struct AreaReport {
    pub area:     Area,
    pub settings: AreaSettings,
    pub edges:    Vec<ReachSummary>,
    /// Edges arriving in this area.
    pub incoming: usize,
}

impl fmt::Display for AreaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} .. {} centre {} contents {:#x} presence {}",
            self.area.id,
            self.area.mins,
            self.area.maxs,
            self.area.center,
            self.settings.contents.bits(),
            self.settings.presence_type,
        )?;
        writeln!(f, "  {} outgoing, {} incoming", self.edges.len(), self.incoming)?;
        for e in &self.edges {
            writeln!(f, "  {e}")?;
        }
        Ok(())
    }
}

pub fn describe_area(world: &WorldState, area: AreaId) -> WorldResult<AreaReport> {
    Ok(AreaReport {
        area:     world.area(area)?.clone(),
        settings: world.settings(area)?.clone(),
        edges:    reachability_listing(world, area)?,
        incoming: world.edges_into(area).count(),
    })
}
