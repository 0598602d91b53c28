//! Cross-collection integrity rules.
//!
//! # Responsibility
//! - Strip deleted ids from the relation sets of surviving references.
//! - Report dangling links without repairing them.
//!
//! # Invariants
//! - Cascades run after the owning store removed the record.
//! - Context deletion never cascades to child contexts.

use crate::model::context::ContextId;
use crate::model::reference::ReferenceId;
use crate::repo::context_repo::ContextRepository;
use crate::repo::reference_repo::ReferenceRepository;
use log::debug;

/// Removes a deleted context from every reference's membership set.
///
/// Returns how many references were changed.
pub fn cascade_context_deleted<R: ReferenceRepository>(
    references: &mut R,
    context_id: ContextId,
) -> usize {
    let changed = references.strip_context(context_id);
    debug!(
        "event=cascade module=integrity status=ok trigger=context_deleted id={} changed={}",
        context_id, changed
    );
    changed
}

/// Removes a deleted reference from every remaining reference's relations.
///
/// Returns how many references were changed.
pub fn cascade_reference_deleted<R: ReferenceRepository>(
    references: &mut R,
    reference_id: ReferenceId,
) -> usize {
    let changed = references.strip_related(reference_id);
    debug!(
        "event=cascade module=integrity status=ok trigger=reference_deleted id={} changed={}",
        reference_id, changed
    );
    changed
}

/// Dangling links found by `audit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    /// `(context, missing parent)` pairs left behind by parent deletion.
    pub orphaned_contexts: Vec<(ContextId, ContextId)>,
    /// `(reference, missing context)` pairs.
    pub unknown_context_links: Vec<(ReferenceId, ContextId)>,
    /// `(reference, missing related reference)` pairs.
    pub unknown_related_links: Vec<(ReferenceId, ReferenceId)>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.orphaned_contexts.is_empty()
            && self.unknown_context_links.is_empty()
            && self.unknown_related_links.is_empty()
    }
}

/// Scans both stores for links to records that do not exist.
pub fn audit<C: ContextRepository, R: ReferenceRepository>(
    contexts: &C,
    references: &R,
) -> IntegrityReport {
    let mut report = IntegrityReport::default();

    for context in contexts.list() {
        if let Some(parent_id) = context.parent_id {
            if contexts.get(parent_id).is_none() {
                report.orphaned_contexts.push((context.id, parent_id));
            }
        }
    }

    for reference in references.list() {
        for context_id in &reference.context_ids {
            if contexts.get(*context_id).is_none() {
                report.unknown_context_links.push((reference.id, *context_id));
            }
        }
        for related_id in &reference.related_ids {
            if references.get(*related_id).is_none() {
                report.unknown_related_links.push((reference.id, *related_id));
            }
        }
    }

    report
}
