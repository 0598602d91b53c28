//! Citation rendering.
//!
//! # Responsibility
//! - Turn one reference into BibTeX, Harvard or DSTU text.
//!
//! # Invariants
//! - Rendering is pure: no store access, no numbering, no I/O.

pub mod citation;
