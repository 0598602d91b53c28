//! Domain model for the reference library.
//!
//! # Responsibility
//! - Define the canonical records owned by the stores.
//! - Own the JSON wire shape shared by save/load and import.
//!
//! # Invariants
//! - Every stored record carries a non-zero id; `0` means "assign one".
//! - Wire field names (`parentId`, `contexts`, `related`) are load-bearing.

pub mod context;
pub mod reference;
