//! Use-case services over the stores.
//!
//! # Responsibility
//! - Orchestrate store calls, integrity cascades, persistence and
//!   notifications into the facade used by presentation callers.
//! - Keep callers decoupled from store and codec details.

pub mod integrity;
pub mod library_service;

use crate::persist::CodecError;
use crate::repo::{EntityKind, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type LibraryResult<T> = Result<T, LibraryError>;

/// Facade-level error.
#[derive(Debug)]
pub enum LibraryError {
    /// Store lookup, write or tree-walk failure.
    Store(StoreError),
    /// File persistence, import or export failure.
    Codec(CodecError),
}

impl LibraryError {
    /// Returns whether this is a `NotFound` for the given collection.
    pub fn is_not_found(&self, kind: EntityKind) -> bool {
        matches!(self, Self::Store(StoreError::NotFound { kind: found, .. }) if *found == kind)
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LibraryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Codec(err) => Some(err),
        }
    }
}

impl From<StoreError> for LibraryError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<CodecError> for LibraryError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}
