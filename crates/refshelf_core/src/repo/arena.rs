//! Id-indexed arena shared by both stores.

use std::collections::HashMap;

/// Record addressable by a numeric id.
pub(crate) trait Keyed {
    fn key(&self) -> i64;
}

/// Records in insertion order plus an id -> slot index.
///
/// Slots are internal; callers only ever see ids.
#[derive(Debug, Clone)]
pub(crate) struct IdArena<T> {
    items: Vec<T>,
    index: HashMap<i64, usize>,
}

impl<T> Default for IdArena<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Keyed> IdArena<T> {
    pub(crate) fn from_vec(items: Vec<T>) -> Self {
        let mut arena = Self {
            items,
            index: HashMap::new(),
        };
        arena.reindex();
        arena
    }

    pub(crate) fn contains(&self, id: i64) -> bool {
        self.index.contains_key(&id)
    }

    pub(crate) fn get(&self, id: i64) -> Option<&T> {
        self.index.get(&id).map(|slot| &self.items[*slot])
    }

    /// Appends a record whose id is not yet present.
    pub(crate) fn push(&mut self, item: T) {
        self.index.insert(item.key(), self.items.len());
        self.items.push(item);
    }

    /// Replaces the record with the same id; returns `false` if absent.
    pub(crate) fn replace(&mut self, item: T) -> bool {
        match self.index.get(&item.key()) {
            Some(slot) => {
                self.items[*slot] = item;
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove(&mut self, id: i64) -> Option<T> {
        let slot = self.index.remove(&id)?;
        let removed = self.items.remove(slot);
        self.reindex();
        Some(removed)
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Mutable pass over every record. Length and ids must not change.
    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    fn reindex(&mut self) {
        self.index = self
            .items
            .iter()
            .enumerate()
            .map(|(slot, item)| (item.key(), slot))
            .collect();
    }
}
