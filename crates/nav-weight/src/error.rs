//! Weight-subsystem error type.

use thiserror::Error;

use nav_core::WeightHandle;

use crate::fuzzy::SepId;

/// Errors produced by `nav-weight`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WeightError {
    #[error("too many fuzzy weights (limit {limit})")]
    TooManyWeights { limit: usize },

    #[error("duplicate weight name {0:?}")]
    DuplicateName(String),

    #[error("weight name required")]
    EmptyName,

    #[error("separator {node} links to missing separator {link}")]
    DanglingLink { node: SepId, link: SepId },

    #[error("separator {0} is reachable twice from one root")]
    SharedNode(SepId),

    #[error("unknown weight {0:?}")]
    UnknownWeight(String),

    #[error("invalid weight handle {0}")]
    InvalidHandle(WeightHandle),

    #[error("no free weight handles")]
    NoFreeHandles,

    #[error("weight handle {0} has no configuration")]
    NoConfig(WeightHandle),
}

pub type WeightResult<T> = Result<T, WeightError>;
