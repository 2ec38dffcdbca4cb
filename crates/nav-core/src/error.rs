//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `NavError` as one
//! variant where they need the shared cases.

use thiserror::Error;

use crate::{AreaId, ReachId};

/// Errors shared by every `nav-*` crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NavError {
    #[error("navigation world is not loaded")]
    NotLoaded,

    #[error("area {0} out of range")]
    AreaOutOfRange(AreaId),

    #[error("reachability {0} out of range")]
    ReachOutOfRange(ReachId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `nav-core`.
pub type NavResult<T> = Result<T, NavError>;
