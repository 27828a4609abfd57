//! Zero-payload publish/subscribe signal
//!
//! Used for the page-wide "open cookie settings" trigger. A `SignalBus` is
//! cheap to clone; clones share the same listener registry. Listeners live
//! as long as the [`Subscription`] returned by [`SignalBus::subscribe`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

#[derive(Clone, Default)]
pub struct SignalBus {
    registry: Rc<RefCell<Registry>>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener. It stays attached until the returned handle is dropped.
    #[must_use = "dropping the subscription detaches the listener immediately"]
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.insert(id, Rc::new(listener));
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Notify every attached listener once. Returns how many were notified.
    pub fn emit(&self) -> usize {
        // Snapshot so listeners may subscribe/unsubscribe while running
        let snapshot: Vec<(u64, Listener)> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(id, listener)| (*id, listener.clone()))
            .collect();

        let mut notified = 0;
        for (id, listener) in &snapshot {
            // Skip listeners detached by an earlier listener in this emit
            if !self.registry.borrow().listeners.contains_key(id) {
                continue;
            }
            listener();
            notified += 1;
        }
        tracing::debug!(listeners = notified, "signal emitted");
        notified
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Handle for an attached listener; detaches on drop
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Detach explicitly. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().listeners.remove(&self.id);
        }
    }
}
