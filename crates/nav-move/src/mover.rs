//! Brush-model movers the bot can stand on.
//!
//! The host registers each platform and bobbing platform by brush model
//! number.  Every frame the dispatcher looks through the entities linked into
//! the bot's area for a registered mover right under the bot.  A bot on a
//! mover must be riding one of that mover's edges; when none exists it is
//! stuck and the command reports the mover as the blocking entity.

use std::collections::BTreeMap;

use nav_core::{EntityId, ReachId, TravelType};
use nav_world::{EntityLinker, Solid, WorldState};

use crate::{MoveResultFlags, MoveState};

/// Horizontal slack around the mover's box.
const LATERAL_TOLERANCE: f32 = 1.0;
/// How far the bot's origin may sit below the mover's top.
const BELOW_TOLERANCE: f32 = 64.0;
/// How far the bot's origin may sit above the mover's top.
const ABOVE_TOLERANCE: f32 = 32.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoverKind {
    /// `func_plat`, ridden with elevator edges.
    Plat,
    /// `func_bobbing`, ridden with bobbing-platform edges.
    Bob,
}

impl MoverKind {
    pub fn travel_type(self) -> TravelType {
        match self {
            MoverKind::Plat => TravelType::Elevator,
            MoverKind::Bob => TravelType::FuncBob,
        }
    }

    /// Result flag set while standing on this kind of mover.
    pub fn on_top_flag(self) -> MoveResultFlags {
        match self {
            MoverKind::Plat => MoveResultFlags::ONTOPOF_ELEVATOR,
            MoverKind::Bob => MoveResultFlags::ONTOPOF_FUNCBOB,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MoverKind::Plat => "func_plat",
            MoverKind::Bob => "func_bobbing",
        }
    }
}

/// The mover under a bot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoverSupport {
    pub entity: EntityId,
    /// Brush model number (entity model index − 1).
    pub model:  i32,
    pub kind:   MoverKind,
}

/// Registered movers, keyed by brush model number.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoverCatalogue {
    models: BTreeMap<i32, MoverKind>,
}

impl MoverCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register brush model `model` as a mover.  Returns the kind it replaced.
    pub fn insert(&mut self, model: i32, kind: MoverKind) -> Option<MoverKind> {
        self.models.insert(model, kind)
    }

    pub fn kind(&self, model: i32) -> Option<MoverKind> {
        self.models.get(&model).copied()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn clear(&mut self) {
        self.models.clear();
    }

    /// First registered mover linked into the bot's area whose top is within
    /// reach of the bot's feet.
    pub fn support(&self, linker: &EntityLinker, state: &MoveState) -> Option<MoverSupport> {
        if self.models.is_empty() || !state.area.is_valid() {
            return None;
        }
        let o = state.origin;
        linker.area_entities(state.area).find_map(|entity| {
            let e = linker.entity(entity)?;
            if !e.in_use || e.solid != Solid::Bsp || e.model_index <= 0 {
                return None;
            }
            let model = e.model_index - 1;
            let kind = self.kind(model)?;

            let mins = e.origin + e.mins;
            let maxs = e.origin + e.maxs;
            let beside = o.x + LATERAL_TOLERANCE < mins.x
                || o.x - LATERAL_TOLERANCE > maxs.x
                || o.y + LATERAL_TOLERANCE < mins.y
                || o.y - LATERAL_TOLERANCE > maxs.y;
            if beside || o.z + BELOW_TOLERANCE < maxs.z || o.z > maxs.z + ABOVE_TOLERANCE {
                return None;
            }
            Some(MoverSupport { entity, model, kind })
        })
    }
}

// ── Ground check ──────────────────────────────────────────────────────────────

/// What the dispatcher must do about the mover under the bot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum GroundMover {
    /// Already riding the mover's edge `reach`.
    Riding(MoverSupport, ReachId),
    /// Switch to the mover's edge `reach`.
    Relink(MoverSupport, ReachId),
    /// No edge rides this mover.
    Stuck(MoverSupport),
}

pub(crate) fn ground_mover(
    catalogue: &MoverCatalogue,
    world:     &WorldState,
    linker:    &EntityLinker,
    state:     &MoveState,
) -> Option<GroundMover> {
    let support = catalogue.support(linker, state)?;
    let kind = support.kind.travel_type();

    let riding = state.last_reach.filter(|&id| {
        world
            .reach(id)
            .is_ok_and(|r| r.kind() == Some(kind) && r.face & 0xFFFF == support.model)
    });
    if let Some(reach) = riding {
        return Some(GroundMover::Riding(support, reach));
    }

    Some(match world.model_reach(kind, support.model) {
        Some(reach) => GroundMover::Relink(support, reach),
        None => GroundMover::Stuck(support),
    })
}
