//! Context store contract and in-memory implementation.
//!
//! # Responsibility
//! - Own the category tree: add, replace, remove, lookup.
//! - Resolve direct children and root-first display paths.
//!
//! # Invariants
//! - Child listing follows insertion order.
//! - Removing a context never touches its children; they keep the dangling
//!   `parent_id`.
//! - Path walks terminate: a revisited id fails with `CycleDetected`.

use crate::model::context::{Context, ContextId};
use crate::repo::arena::{IdArena, Keyed};
use crate::repo::{counter_after, EntityKind, StoreError, StoreResult};
use std::collections::HashSet;

/// Separator between names in a context path.
pub const PATH_SEPARATOR: &str = " / ";

impl Keyed for Context {
    fn key(&self) -> i64 {
        self.id
    }
}

/// Store interface for the context tree.
pub trait ContextRepository {
    /// Stores one context, assigning an id when `context.id == 0`.
    fn insert(&mut self, context: Context) -> StoreResult<ContextId>;
    /// Replaces the context with the same id.
    fn update(&mut self, context: Context) -> StoreResult<()>;
    /// Removes one context and returns it.
    fn remove(&mut self, id: ContextId) -> StoreResult<Context>;
    /// Loads one context by id.
    fn get(&self, id: ContextId) -> Option<&Context>;
    /// All contexts in insertion order.
    fn list(&self) -> &[Context];
    /// Direct children of `parent_id` (`None` = top-level) in insertion order.
    fn children_of(&self, parent_id: Option<ContextId>) -> Vec<&Context>;
    /// Root-first `" / "`-joined path of names ending at `id`.
    fn path_of(&self, id: ContextId) -> StoreResult<String>;
    /// Id the next auto-assigned context will receive.
    fn next_id(&self) -> ContextId;
    /// Swaps in a complete collection and counter.
    fn replace_all(&mut self, contexts: Vec<Context>, next_id: ContextId);
}

/// Vec-backed context store with an id index.
#[derive(Debug, Clone)]
pub struct InMemoryContextRepository {
    contexts: IdArena<Context>,
    next_id: ContextId,
}

impl Default for InMemoryContextRepository {
    fn default() -> Self {
        Self {
            contexts: IdArena::default(),
            next_id: 1,
        }
    }
}

impl InMemoryContextRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored contexts.
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.len() == 0
    }
}

impl ContextRepository for InMemoryContextRepository {
    fn insert(&mut self, mut context: Context) -> StoreResult<ContextId> {
        if context.id == 0 {
            context.id = self.next_id;
        } else if context.id < 0 {
            return Err(StoreError::InvalidId {
                kind: EntityKind::Context,
                id: context.id,
            });
        } else if self.contexts.contains(context.id) {
            return Err(StoreError::DuplicateId {
                kind: EntityKind::Context,
                id: context.id,
            });
        }

        let id = context.id;
        if id >= self.next_id {
            self.next_id = counter_after(EntityKind::Context, id)?;
        }
        self.contexts.push(context);
        Ok(id)
    }

    fn update(&mut self, context: Context) -> StoreResult<()> {
        let id = context.id;
        if !self.contexts.replace(context) {
            return Err(StoreError::NotFound {
                kind: EntityKind::Context,
                id,
            });
        }
        Ok(())
    }

    fn remove(&mut self, id: ContextId) -> StoreResult<Context> {
        self.contexts.remove(id).ok_or(StoreError::NotFound {
            kind: EntityKind::Context,
            id,
        })
    }

    fn get(&self, id: ContextId) -> Option<&Context> {
        self.contexts.get(id)
    }

    fn list(&self) -> &[Context] {
        self.contexts.as_slice()
    }

    fn children_of(&self, parent_id: Option<ContextId>) -> Vec<&Context> {
        self.contexts
            .as_slice()
            .iter()
            .filter(|context| context.parent_id == parent_id)
            .collect()
    }

    fn path_of(&self, id: ContextId) -> StoreResult<String> {
        let leaf = self.get(id).ok_or(StoreError::NotFound {
            kind: EntityKind::Context,
            id,
        })?;

        let mut names = vec![leaf.name.as_str()];
        let mut visited = HashSet::from([leaf.id]);
        let mut cursor = leaf.parent_id;
        // A missing ancestor (deleted parent) ends the walk.
        while let Some(parent) = cursor.and_then(|parent_id| self.get(parent_id)) {
            if !visited.insert(parent.id) {
                return Err(StoreError::CycleDetected { id });
            }
            names.push(parent.name.as_str());
            cursor = parent.parent_id;
        }

        names.reverse();
        Ok(names.join(PATH_SEPARATOR))
    }

    fn next_id(&self) -> ContextId {
        self.next_id
    }

    fn replace_all(&mut self, contexts: Vec<Context>, next_id: ContextId) {
        self.contexts = IdArena::from_vec(contexts);
        self.next_id = next_id;
    }
}
