//! Synchronous change notifications for presentation callers.
//!
//! # Responsibility
//! - Keep an ordered list of listeners.
//! - Deliver entity events followed by the generic `DataChanged` event.
//!
//! # Invariants
//! - Delivery is in-line on the mutating thread, in registration order.
//! - For one mutation every listener sees the entity event before any
//!   listener sees `DataChanged`.

use crate::model::context::ContextId;
use crate::model::reference::ReferenceId;
use log::trace;

/// Event emitted after a successful store mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    DataChanged,
    ReferenceAdded(ReferenceId),
    ReferenceUpdated(ReferenceId),
    ReferenceDeleted(ReferenceId),
    ContextAdded(ContextId),
    ContextUpdated(ContextId),
    ContextDeleted(ContextId),
}

impl ChangeEvent {
    /// Short stable name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DataChanged => "data_changed",
            Self::ReferenceAdded(_) => "reference_added",
            Self::ReferenceUpdated(_) => "reference_updated",
            Self::ReferenceDeleted(_) => "reference_deleted",
            Self::ContextAdded(_) => "context_added",
            Self::ContextUpdated(_) => "context_updated",
            Self::ContextDeleted(_) => "context_deleted",
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ChangeEvent)>;

/// Ordered observer registry.
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener at the end of the delivery order.
    pub fn subscribe(&mut self, listener: impl FnMut(&ChangeEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Delivers `event`, then `DataChanged`.
    ///
    /// Passing `DataChanged` itself delivers it once.
    pub fn emit(&mut self, event: ChangeEvent) {
        if event != ChangeEvent::DataChanged {
            self.deliver(&event);
        }
        self.deliver(&ChangeEvent::DataChanged);
    }

    /// Delivers only `DataChanged` (whole-dataset replacement).
    pub fn emit_data_changed(&mut self) {
        self.deliver(&ChangeEvent::DataChanged);
    }

    fn deliver(&mut self, event: &ChangeEvent) {
        trace!(
            "event=change_deliver module=notify change={} listeners={}",
            event.name(),
            self.listeners.len()
        );
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
