//! Reference store contract and in-memory implementation.
//!
//! # Responsibility
//! - Own bibliographic records: add, replace, remove, lookup, search.
//! - Provide the relation-stripping passes used by cascading deletes.
//!
//! # Invariants
//! - Listing and search results follow insertion order.
//! - Relation stripping mutates records in place and never changes the
//!   collection's length or ids.

use crate::model::context::ContextId;
use crate::model::reference::{Reference, ReferenceId};
use crate::repo::arena::{IdArena, Keyed};
use crate::repo::{counter_after, EntityKind, StoreError, StoreResult};

impl Keyed for Reference {
    fn key(&self) -> i64 {
        self.id
    }
}

/// Store interface for bibliographic records.
pub trait ReferenceRepository {
    /// Stores one reference, assigning an id when `reference.id == 0`.
    fn insert(&mut self, reference: Reference) -> StoreResult<ReferenceId>;
    /// Replaces the reference with the same id.
    fn update(&mut self, reference: Reference) -> StoreResult<()>;
    /// Removes one reference and returns it.
    fn remove(&mut self, id: ReferenceId) -> StoreResult<Reference>;
    /// Loads one reference by id.
    fn get(&self, id: ReferenceId) -> Option<&Reference>;
    /// All references in insertion order.
    fn list(&self) -> &[Reference];
    /// Filters by title/author substring and optional context membership.
    fn search(&self, query: &str, context_id: Option<ContextId>) -> Vec<&Reference>;
    /// Drops `context_id` from every record; returns how many changed.
    fn strip_context(&mut self, context_id: ContextId) -> usize;
    /// Drops `reference_id` from every record's relations; returns how many changed.
    fn strip_related(&mut self, reference_id: ReferenceId) -> usize;
    /// Id the next auto-assigned reference will receive.
    fn next_id(&self) -> ReferenceId;
    /// Swaps in a complete collection and counter.
    fn replace_all(&mut self, references: Vec<Reference>, next_id: ReferenceId);
}

/// Vec-backed reference store with an id index.
#[derive(Debug, Clone)]
pub struct InMemoryReferenceRepository {
    references: IdArena<Reference>,
    next_id: ReferenceId,
}

impl Default for InMemoryReferenceRepository {
    fn default() -> Self {
        Self {
            references: IdArena::default(),
            next_id: 1,
        }
    }
}

impl InMemoryReferenceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored references.
    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.len() == 0
    }
}

impl ReferenceRepository for InMemoryReferenceRepository {
    fn insert(&mut self, mut reference: Reference) -> StoreResult<ReferenceId> {
        if reference.id == 0 {
            reference.id = self.next_id;
        } else if reference.id < 0 {
            return Err(StoreError::InvalidId {
                kind: EntityKind::Reference,
                id: reference.id,
            });
        } else if self.references.contains(reference.id) {
            return Err(StoreError::DuplicateId {
                kind: EntityKind::Reference,
                id: reference.id,
            });
        }

        let id = reference.id;
        if id >= self.next_id {
            self.next_id = counter_after(EntityKind::Reference, id)?;
        }
        self.references.push(reference);
        Ok(id)
    }

    fn update(&mut self, reference: Reference) -> StoreResult<()> {
        let id = reference.id;
        if !self.references.replace(reference) {
            return Err(StoreError::NotFound {
                kind: EntityKind::Reference,
                id,
            });
        }
        Ok(())
    }

    fn remove(&mut self, id: ReferenceId) -> StoreResult<Reference> {
        self.references.remove(id).ok_or(StoreError::NotFound {
            kind: EntityKind::Reference,
            id,
        })
    }

    fn get(&self, id: ReferenceId) -> Option<&Reference> {
        self.references.get(id)
    }

    fn list(&self) -> &[Reference] {
        self.references.as_slice()
    }

    fn search(&self, query: &str, context_id: Option<ContextId>) -> Vec<&Reference> {
        let needle = query.to_lowercase();
        self.references
            .as_slice()
            .iter()
            .filter(|reference| reference.matches_lowercase(&needle))
            .filter(|reference| context_id.map_or(true, |id| reference.context_ids.contains(&id)))
            .collect()
    }

    fn strip_context(&mut self, context_id: ContextId) -> usize {
        let mut changed = 0;
        for reference in self.references.iter_mut() {
            if reference.context_ids.remove(&context_id) {
                changed += 1;
            }
        }
        changed
    }

    fn strip_related(&mut self, reference_id: ReferenceId) -> usize {
        let mut changed = 0;
        for reference in self.references.iter_mut() {
            if reference.related_ids.remove(&reference_id) {
                changed += 1;
            }
        }
        changed
    }

    fn next_id(&self) -> ReferenceId {
        self.next_id
    }

    fn replace_all(&mut self, references: Vec<Reference>, next_id: ReferenceId) {
        self.references = IdArena::from_vec(references);
        self.next_id = next_id;
    }
}
