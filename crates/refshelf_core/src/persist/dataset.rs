//! Dataset document shape.

use crate::model::context::{Context, ContextId};
use crate::model::reference::{Reference, ReferenceId};
use crate::repo::{counter_after, EntityKind, StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn default_counter() -> i64 {
    1
}

/// Complete persisted state: both collections plus both id counters.
///
/// Missing keys decode as empty collections and counter `1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub contexts: Vec<Context>,
    #[serde(rename = "nextRefId", default = "default_counter")]
    pub next_ref_id: ReferenceId,
    #[serde(rename = "nextCtxId", default = "default_counter")]
    pub next_ctx_id: ContextId,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            references: Vec::new(),
            contexts: Vec::new(),
            next_ref_id: 1,
            next_ctx_id: 1,
        }
    }
}

impl Dataset {
    /// Checks stored ids and raises counters that would hand out an id
    /// already on file.
    ///
    /// # Errors
    /// - `InvalidId` for an id below 1 (including a missing `id` key).
    /// - `DuplicateId` for an id repeated within one collection.
    /// - `IdSpaceExhausted` when a stored id is `i64::MAX`.
    pub fn reconcile(&mut self) -> StoreResult<()> {
        self.next_ref_id = reconcile_ids(
            EntityKind::Reference,
            self.references.iter().map(|item| item.id),
            self.next_ref_id,
        )?;
        self.next_ctx_id = reconcile_ids(
            EntityKind::Context,
            self.contexts.iter().map(|item| item.id),
            self.next_ctx_id,
        )?;
        Ok(())
    }
}

fn reconcile_ids(
    kind: EntityKind,
    ids: impl Iterator<Item = i64>,
    counter: i64,
) -> StoreResult<i64> {
    let mut seen = HashSet::new();
    let mut next = counter.max(1);
    for id in ids {
        if id < 1 {
            return Err(StoreError::InvalidId { kind, id });
        }
        if !seen.insert(id) {
            return Err(StoreError::DuplicateId { kind, id });
        }
        if id >= next {
            next = counter_after(kind, id)?;
        }
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::Dataset;
    use crate::model::context::Context;
    use crate::model::reference::{Reference, ReferenceType};
    use crate::repo::{EntityKind, StoreError};

    #[test]
    fn empty_object_decodes_with_default_counters() {
        let dataset: Dataset = serde_json::from_str("{}").unwrap();
        assert_eq!(dataset, Dataset::default());
    }

    #[test]
    fn stale_counter_is_raised_past_stored_ids() {
        let mut dataset = Dataset {
            contexts: vec![Context::with_id(5, "A", None)],
            next_ctx_id: 2,
            ..Dataset::default()
        };
        dataset.reconcile().unwrap();
        assert_eq!(dataset.next_ctx_id, 6);
        assert_eq!(dataset.next_ref_id, 1);
    }

    #[test]
    fn non_positive_counter_is_raised_to_one() {
        let mut dataset = Dataset {
            next_ref_id: 0,
            next_ctx_id: -4,
            ..Dataset::default()
        };
        dataset.reconcile().unwrap();
        assert_eq!((dataset.next_ref_id, dataset.next_ctx_id), (1, 1));
    }

    #[test]
    fn stored_max_id_exhausts_counter() {
        let mut top = Reference::new(ReferenceType::Book, "A", "x");
        top.id = i64::MAX;
        let mut dataset = Dataset {
            references: vec![top],
            ..Dataset::default()
        };
        assert_eq!(
            dataset.reconcile(),
            Err(StoreError::IdSpaceExhausted {
                kind: EntityKind::Reference
            })
        );
    }

    #[test]
    fn unassigned_and_repeated_ids_are_rejected() {
        let mut missing = Dataset {
            contexts: vec![Context::new("No id", None)],
            ..Dataset::default()
        };
        assert_eq!(
            missing.reconcile(),
            Err(StoreError::InvalidId {
                kind: EntityKind::Context,
                id: 0
            })
        );

        let mut repeated = Dataset {
            contexts: vec![Context::with_id(2, "A", None), Context::with_id(2, "B", None)],
            ..Dataset::default()
        };
        assert_eq!(
            repeated.reconcile(),
            Err(StoreError::DuplicateId {
                kind: EntityKind::Context,
                id: 2
            })
        );
    }
}
