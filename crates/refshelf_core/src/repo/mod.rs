//! Store layer: in-memory ownership of contexts and references.
//!
//! # Responsibility
//! - Define use-case oriented store contracts for both entity sets.
//! - Own entities by value, addressed by id, never by position.
//!
//! # Invariants
//! - Store APIs return semantic errors (`NotFound`, `DuplicateId`) instead of
//!   silently ignoring unknown ids.
//! - Id counters only move forward within one process.

mod arena;
pub mod context_repo;
pub mod reference_repo;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Which entity collection an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Context,
    Reference,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Context => f.write_str("context"),
            Self::Reference => f.write_str("reference"),
        }
    }
}

/// Store-level error for lookups, writes and tree walks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record with this id exists.
    NotFound { kind: EntityKind, id: i64 },
    /// An explicit id collides with a stored record.
    DuplicateId { kind: EntityKind, id: i64 },
    /// Stored ids must be positive.
    InvalidId { kind: EntityKind, id: i64 },
    /// The counter cannot move past `i64::MAX`.
    IdSpaceExhausted { kind: EntityKind },
    /// The parent chain starting at `id` revisits a context.
    CycleDetected { id: i64 },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::DuplicateId { kind, id } => write!(f, "{kind} id already in use: {id}"),
            Self::InvalidId { kind, id } => write!(f, "{kind} id must be positive, got {id}"),
            Self::IdSpaceExhausted { kind } => write!(f, "{kind} id space exhausted"),
            Self::CycleDetected { id } => {
                write!(f, "context parent chain starting at {id} contains a cycle")
            }
        }
    }
}

impl Error for StoreError {}

/// Counter value that follows `id`.
pub(crate) fn counter_after(kind: EntityKind, id: i64) -> StoreResult<i64> {
    id.checked_add(1).ok_or(StoreError::IdSpaceExhausted { kind })
}
