//! Reference library facade.
//!
//! # Responsibility
//! - Expose the add/update/delete/query operations presentation callers use.
//! - Run integrity cascades after deletions.
//! - Emit change events after every successful mutation.
//! - Bridge both stores to the persistence codecs.
//!
//! # Invariants
//! - Failed operations emit no events and leave both stores unchanged.
//! - Load replaces both stores only after the whole document decoded.
//! - Import never touches contexts and always assigns fresh ids.

use crate::format::citation::CitationFormat;
use crate::model::context::{Context, ContextId};
use crate::model::reference::{Reference, ReferenceId};
use crate::notify::{ChangeEvent, ChangeNotifier, ListenerId};
use crate::persist::{self, Dataset};
use crate::repo::context_repo::{ContextRepository, InMemoryContextRepository};
use crate::repo::reference_repo::{InMemoryReferenceRepository, ReferenceRepository};
use crate::repo::{EntityKind, StoreError};
use crate::service::integrity::{self, IntegrityReport};
use crate::service::LibraryResult;
use log::{debug, info};
use std::path::Path;

/// Facade composed of the context store, the reference store and a notifier.
pub struct ReferenceLibrary<C: ContextRepository, R: ReferenceRepository> {
    contexts: C,
    references: R,
    notifier: ChangeNotifier,
}

/// Library backed by the in-memory stores.
pub type InMemoryLibrary = ReferenceLibrary<InMemoryContextRepository, InMemoryReferenceRepository>;

impl InMemoryLibrary {
    /// Creates an empty library with both counters at 1.
    pub fn in_memory() -> Self {
        Self::new(
            InMemoryContextRepository::new(),
            InMemoryReferenceRepository::new(),
        )
    }
}

impl Default for InMemoryLibrary {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<C: ContextRepository, R: ReferenceRepository> ReferenceLibrary<C, R> {
    /// Creates a facade over the provided store implementations.
    pub fn new(contexts: C, references: R) -> Self {
        Self {
            contexts,
            references,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Registers a change listener; see [`ChangeNotifier::subscribe`].
    pub fn subscribe(&mut self, listener: impl FnMut(&ChangeEvent) + 'static) -> ListenerId {
        self.notifier.subscribe(listener)
    }

    /// Removes a change listener.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.notifier.unsubscribe(id)
    }

    // --- references -------------------------------------------------------

    /// Stores a reference. `id = 0` requests a fresh id.
    ///
    /// # Errors
    /// - `DuplicateId` when an explicit id is already stored.
    pub fn add_reference(&mut self, reference: Reference) -> LibraryResult<ReferenceId> {
        let id = self.references.insert(reference)?;
        debug!("event=reference_add module=library status=ok id={id}");
        self.notifier.emit(ChangeEvent::ReferenceAdded(id));
        Ok(id)
    }

    /// Replaces the stored reference with the same id.
    pub fn update_reference(&mut self, reference: Reference) -> LibraryResult<()> {
        let id = reference.id;
        self.references.update(reference)?;
        debug!("event=reference_update module=library status=ok id={id}");
        self.notifier.emit(ChangeEvent::ReferenceUpdated(id));
        Ok(())
    }

    /// Removes a reference and unlinks it from every other reference.
    ///
    /// Returns the removed record.
    pub fn delete_reference(&mut self, id: ReferenceId) -> LibraryResult<Reference> {
        let removed = self.references.remove(id)?;
        integrity::cascade_reference_deleted(&mut self.references, id);
        debug!("event=reference_delete module=library status=ok id={id}");
        self.notifier.emit(ChangeEvent::ReferenceDeleted(id));
        Ok(removed)
    }

    pub fn get_reference(&self, id: ReferenceId) -> LibraryResult<&Reference> {
        self.references.get(id).ok_or_else(|| {
            StoreError::NotFound {
                kind: EntityKind::Reference,
                id,
            }
            .into()
        })
    }

    pub fn get_all_references(&self) -> &[Reference] {
        self.references.list()
    }

    /// Case-insensitive title/author search, optionally limited to one context.
    ///
    /// An empty `query` matches every reference.
    pub fn search_references(&self, query: &str, context_id: Option<ContextId>) -> Vec<&Reference> {
        self.references.search(query, context_id)
    }

    pub fn next_reference_id(&self) -> ReferenceId {
        self.references.next_id()
    }

    // --- contexts ---------------------------------------------------------

    /// Stores a context. `id = 0` requests a fresh id.
    pub fn add_context(&mut self, context: Context) -> LibraryResult<ContextId> {
        let id = self.contexts.insert(context)?;
        debug!("event=context_add module=library status=ok id={id}");
        self.notifier.emit(ChangeEvent::ContextAdded(id));
        Ok(id)
    }

    /// Replaces the stored context with the same id.
    pub fn update_context(&mut self, context: Context) -> LibraryResult<()> {
        let id = context.id;
        self.contexts.update(context)?;
        debug!("event=context_update module=library status=ok id={id}");
        self.notifier.emit(ChangeEvent::ContextUpdated(id));
        Ok(())
    }

    /// Removes a context and drops it from every reference's membership.
    ///
    /// Child contexts are left in place with their parent id unchanged.
    pub fn delete_context(&mut self, id: ContextId) -> LibraryResult<Context> {
        let removed = self.contexts.remove(id)?;
        integrity::cascade_context_deleted(&mut self.references, id);
        debug!("event=context_delete module=library status=ok id={id}");
        self.notifier.emit(ChangeEvent::ContextDeleted(id));
        Ok(removed)
    }

    pub fn get_context(&self, id: ContextId) -> LibraryResult<&Context> {
        self.contexts.get(id).ok_or_else(|| {
            StoreError::NotFound {
                kind: EntityKind::Context,
                id,
            }
            .into()
        })
    }

    pub fn get_all_contexts(&self) -> &[Context] {
        self.contexts.list()
    }

    /// Direct children of `parent_id`; `None` lists top-level contexts.
    pub fn get_child_contexts(&self, parent_id: Option<ContextId>) -> Vec<&Context> {
        self.contexts.children_of(parent_id)
    }

    /// Root-first path such as `"AI / NLP"`.
    ///
    /// # Errors
    /// - `NotFound` for an unknown id.
    /// - `CycleDetected` when the parent chain loops.
    pub fn get_context_path(&self, id: ContextId) -> LibraryResult<String> {
        Ok(self.contexts.path_of(id)?)
    }

    pub fn next_context_id(&self) -> ContextId {
        self.contexts.next_id()
    }

    /// Lists dangling parents and relation links without changing anything.
    pub fn audit(&self) -> IntegrityReport {
        integrity::audit(&self.contexts, &self.references)
    }

    // --- persistence ------------------------------------------------------

    /// Copies both collections and counters into a dataset document.
    pub fn snapshot(&self) -> Dataset {
        Dataset {
            references: self.references.list().to_vec(),
            contexts: self.contexts.list().to_vec(),
            next_ref_id: self.references.next_id(),
            next_ctx_id: self.contexts.next_id(),
        }
    }

    /// Writes the whole library to `path`.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> LibraryResult<()> {
        persist::save_to_file(path, &self.snapshot())?;
        Ok(())
    }

    /// Replaces the whole library with the document at `path`.
    ///
    /// Emits a single `DataChanged` on success; on failure nothing changes.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> LibraryResult<()> {
        let dataset = persist::load_from_file(path)?;
        self.install(dataset);
        Ok(())
    }

    /// Replaces both stores with `dataset` and emits `DataChanged`.
    ///
    /// Counters are raised past stored ids first, as on load.
    ///
    /// # Errors
    /// - `InvalidId`, `DuplicateId` or `IdSpaceExhausted` from
    ///   [`Dataset::reconcile`]; the library is left unchanged.
    pub fn replace_with(&mut self, mut dataset: Dataset) -> LibraryResult<()> {
        dataset.reconcile()?;
        self.install(dataset);
        Ok(())
    }

    fn install(&mut self, dataset: Dataset) {
        let Dataset {
            references,
            contexts,
            next_ref_id,
            next_ctx_id,
        } = dataset;
        info!(
            "event=library_replace module=library status=ok references={} contexts={}",
            references.len(),
            contexts.len()
        );
        self.references.replace_all(references, next_ref_id);
        self.contexts.replace_all(contexts, next_ctx_id);
        self.notifier.emit_data_changed();
    }

    /// Writes `references` to `path` in the given dialect, in the given order.
    ///
    /// Returns how many references were written.
    pub fn export_references<'a>(
        &self,
        path: impl AsRef<Path>,
        format: CitationFormat,
        references: impl IntoIterator<Item = &'a Reference>,
    ) -> LibraryResult<usize> {
        Ok(persist::export_references(path, format, references)?)
    }

    /// Adds every record of a bare-array import file under a fresh id.
    ///
    /// Returns the assigned ids in file order. Each record emits its own
    /// `ReferenceAdded` + `DataChanged` pair.
    pub fn import_references(&mut self, path: impl AsRef<Path>) -> LibraryResult<Vec<ReferenceId>> {
        let imported = persist::import_references(path)?;
        imported
            .into_iter()
            .map(|reference| self.add_reference(reference))
            .collect()
    }
}

impl<C: ContextRepository, R: ReferenceRepository> std::fmt::Debug for ReferenceLibrary<C, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceLibrary")
            .field("contexts", &self.contexts.list().len())
            .field("references", &self.references.list().len())
            .field("notifier", &self.notifier)
            .finish()
    }
}
