//! Scoped registration of the document-level pointer listener pair.
//!
//! A drag keeps receiving pointer-move and pointer-release events after the
//! cursor leaves the crop surface, so the host registers both listeners
//! globally for the lifetime of the drag. [`ListenerGuard`] ties that
//! registration to ownership: dropping the guard deregisters exactly once.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Host hook that attaches and detaches the global move/release listener pair.
pub trait GlobalListeners {
    fn subscribe(&self) -> ListenerId;
    fn unsubscribe(&self, id: ListenerId);
}

pub struct ListenerGuard {
    listeners: Rc<dyn GlobalListeners>,
    id: ListenerId,
}

impl ListenerGuard {
    pub fn acquire(listeners: Rc<dyn GlobalListeners>) -> Self {
        let id = listeners.subscribe();
        debug!("global pointer listeners attached ({})", id.raw());
        Self { listeners, id }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.listeners.unsubscribe(self.id);
        debug!("global pointer listeners detached ({})", self.id.raw());
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard").field("id", &self.id).finish()
    }
}

/// Registry that only counts registrations. Used by tests and the demo host.
#[derive(Debug, Default)]
pub struct CountingListeners {
    next_id: Cell<u64>,
    active: RefCell<HashSet<ListenerId>>,
    subscribed: Cell<usize>,
    unsubscribed: Cell<usize>,
}

impl CountingListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listener pairs currently attached.
    pub fn active(&self) -> usize {
        self.active.borrow().len()
    }

    pub fn subscribed(&self) -> usize {
        self.subscribed.get()
    }

    pub fn unsubscribed(&self) -> usize {
        self.unsubscribed.get()
    }
}

impl GlobalListeners for CountingListeners {
    fn subscribe(&self) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.active.borrow_mut().insert(id);
        self.subscribed.set(self.subscribed.get() + 1);
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        if self.active.borrow_mut().remove(&id) {
            self.unsubscribed.set(self.unsubscribed.get() + 1);
        } else {
            warn!("unsubscribe for unknown listener pair {}", id.raw());
        }
    }
}
