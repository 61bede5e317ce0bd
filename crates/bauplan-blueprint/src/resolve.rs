//! Resolution boundary for referenced documents.

use std::fmt;

use thiserror::Error;

use bauplan_blocks::Block;
use bauplan_filter::Filter;

use crate::Blueprint;

/// Kind of resource a reference points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Blueprint,
    Filter,
    Material,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Blueprint => "blueprint",
            ResourceKind::Filter => "filter",
            ResourceKind::Material => "material",
        })
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{kind} `{key}` not found")]
    NotFound { kind: ResourceKind, key: String },
    #[error("{kind} `{key}` is malformed: {reason}")]
    Malformed {
        kind: ResourceKind,
        key: String,
        reason: String,
    },
}

/// Supplies referenced documents during flattening.
///
/// Implementations own caching and lookup; the composition algorithm
/// treats every call as an opaque, possibly-slow fetch that must complete
/// before the palette entry using it can merge. Failures propagate
/// unchanged through [`crate::flatten`].
pub trait Resolver {
    fn blueprint(&self, key: &str) -> Result<&Blueprint, ResolveError>;
    fn filter(&self, key: &str) -> Result<&Filter, ResolveError>;
    fn material(&self, key: &str) -> Result<&Block, ResolveError>;
}
