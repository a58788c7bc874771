//! Listener registration: tree events, scopes, RAII subscriptions.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use slotmap::new_key_type;

use super::Node;

new_key_type! {
    /// Identifies a registered listener.
    pub struct ListenerId;
}

/// A change delivered synchronously to tree listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeEvent {
    /// A property on `node` was written with a different value, or removed.
    PropertyChanged { node: Node, name: String },
    /// `child` was inserted into `parent` at `index`.
    ChildAdded { parent: Node, child: Node, index: usize },
    /// The child at `index` was detached from `parent`. The child handle is
    /// dead by the time listeners run.
    ChildRemoved { parent: Node, child: Node, index: usize },
}

impl TreeEvent {
    /// The node the event happened on: the changed node, or the parent whose
    /// children changed.
    pub fn target(&self) -> &Node {
        match self {
            TreeEvent::PropertyChanged { node, .. } => node,
            TreeEvent::ChildAdded { parent, .. } | TreeEvent::ChildRemoved { parent, .. } => {
                parent
            }
        }
    }
}

/// Which events a listener receives, relative to the node it was registered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenScope {
    /// Only events targeting the node itself.
    Node,
    /// Events targeting the node or any of its descendants.
    Subtree,
}

/// A registered callback plus the flag that silences it once unsubscribed.
pub(crate) struct ListenerEntry<F: ?Sized> {
    alive: Rc<Cell<bool>>,
    callback: Rc<F>,
}

impl<F: ?Sized> ListenerEntry<F> {
    pub(crate) fn new(callback: Rc<F>) -> Self {
        Self {
            alive: Rc::new(Cell::new(true)),
            callback,
        }
    }

    pub(crate) fn alive_flag(&self) -> Rc<Cell<bool>> {
        self.alive.clone()
    }

    /// Clone out the flag and callback so the registry borrow can be released
    /// before the callback runs.
    pub(crate) fn snapshot(&self) -> (Rc<Cell<bool>>, Rc<F>) {
        (self.alive.clone(), self.callback.clone())
    }
}

/// Keeps a listener registered. Dropping it deregisters the listener, and the
/// callback will not run again, even if a dispatch is already in flight.
#[must_use = "the listener is removed as soon as the subscription is dropped"]
pub struct Subscription {
    alive: Rc<Cell<bool>>,
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(alive: Rc<Cell<bool>>, detach: impl FnOnce() + 'static) -> Self {
        Self {
            alive,
            detach: Some(Box::new(detach)),
        }
    }

    /// Whether the listener is still registered.
    pub fn is_active(&self) -> bool {
        self.alive.get()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.alive.set(false);
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.alive.get())
            .finish()
    }
}
