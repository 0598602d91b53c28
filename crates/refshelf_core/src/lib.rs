//! Core logic for refshelf, a bibliographic reference library.
//! This crate is the single source of truth for data-model invariants.

pub mod format;
pub mod logging;
pub mod model;
pub mod notify;
pub mod persist;
pub mod repo;
pub mod service;

pub use format::citation::{bibtex_key, render, render_all, CitationFormat, UnknownFormatError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::context::{Context, ContextId, ROOT_PARENT_ID};
pub use model::reference::{Reference, ReferenceId, ReferenceType};
pub use notify::{ChangeEvent, ChangeNotifier, ListenerId};
pub use persist::{CodecError, CodecResult, Dataset};
pub use repo::context_repo::{ContextRepository, InMemoryContextRepository, PATH_SEPARATOR};
pub use repo::reference_repo::{InMemoryReferenceRepository, ReferenceRepository};
pub use repo::{EntityKind, StoreError, StoreResult};
pub use service::integrity::IntegrityReport;
pub use service::library_service::{InMemoryLibrary, ReferenceLibrary};
pub use service::{LibraryError, LibraryResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
