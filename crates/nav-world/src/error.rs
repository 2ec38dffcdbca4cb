//! World-subsystem error type.

use thiserror::Error;

use nav_core::{AreaId, EntityId, NavError, ReachId};

/// Errors produced by `nav-world`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WorldError {
    #[error(transparent)]
    Core(#[from] NavError),

    #[error("navigation world is not loaded")]
    NotLoaded,

    #[error("area {0} out of range")]
    AreaOutOfRange(AreaId),

    #[error("entity {0} out of range")]
    EntityOutOfRange(EntityId),

    #[error("{areas} areas but {settings} area settings")]
    SettingsMismatch { areas: usize, settings: usize },

    #[error("area {area} references {count} reachabilities from {first}, beyond {total}")]
    ReachRangeOutOfBounds {
        area:  AreaId,
        first: u32,
        count: u32,
        total: usize,
    },

    #[error("reachability {reach} names area {area} outside the world")]
    BadReachArea { reach: ReachId, area: AreaId },

    #[error("no free area links for {entity}: needs {needed}, limit {limit}")]
    LinkPoolExhausted {
        entity: EntityId,
        needed: usize,
        limit:  usize,
    },

    #[error("allocation failed for {0}")]
    Allocation(&'static str),

    #[error("no path from {start} to {goal}")]
    NoPath { start: AreaId, goal: AreaId },
}

pub type WorldResult<T> = Result<T, WorldError>;
