//! Runtime style resolution for one component.
//!
//! A [`StyleSheet`] answers "what is the effective value of style property
//! `name` here?" by walking from its node up to the interpreted root. At each
//! scope the node's `style` object is consulted before the node's own
//! properties, and the nearest scope that declares the name wins.
//!
//! Every source of staleness (tree edits in the scope chain, edits of a
//! referenced style object, geometry changes, hover/press changes) funnels
//! into [`StyleSheet::invalidate`], which recomputes the paint values, pushes
//! them to the component and asks it to repaint.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::event::{InteractionState, PointerEvent};
use crate::item::container::BOX_MODEL_VALID;
use crate::item::{Component, ComponentRef};
use crate::property::PropertyValue;
use crate::tree::{ListenScope, Node, Object, Subscription, TreeEvent, Value};

/// Name of the property holding a node's style object.
pub const STYLE: &str = "style";
/// Style sub-object consulted while the pointer is over the component.
pub const HOVER: &str = "hover";
/// Style sub-object consulted while the pointer is pressed on the component.
pub const ACTIVE: &str = "active";

pub const BACKGROUND: &str = "background";
pub const FOREGROUND: &str = "foreground";

/// Why a style sheet's cached values went stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationReason {
    /// A property of the bound node changed.
    PropertyChanged,
    /// A property of an ancestor in the scope chain changed.
    AncestorPropertyChanged,
    /// A referenced style object changed.
    StyleObjectChanged,
    /// The component was moved or resized.
    BoundsChanged,
    /// Hover or press state changed.
    InteractionChanged,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Resolved {
    background: Value,
    foreground: Value,
}

struct SheetInner {
    component: Weak<RefCell<dyn Component>>,
    node: Node,
    root: Node,
    interaction: Cell<InteractionState>,
    resolved: RefCell<Resolved>,
    /// Memoized lookups; cleared on every invalidation.
    cache: RefCell<IndexMap<String, Option<Value>>>,
    dirty: Cell<bool>,
    style_watches: RefCell<Vec<Subscription>>,
    tree_watches: RefCell<Vec<Subscription>>,
}

/// Cascading style resolution bound to one (component, node) pair.
///
/// Holds the component weakly: once it is gone, invalidations still
/// recompute but nothing is pushed.
pub struct StyleSheet {
    inner: Rc<SheetInner>,
}

impl StyleSheet {
    /// Bind to `component` and `node`. `root` bounds the scope chain; it is
    /// normally the root of the interpreted tree.
    pub fn new(component: &ComponentRef, node: &Node, root: &Node) -> Self {
        let inner = Rc::new(SheetInner {
            component: Rc::downgrade(component),
            node: node.clone(),
            root: root.clone(),
            interaction: Cell::new(InteractionState::default()),
            resolved: RefCell::new(Resolved::default()),
            cache: RefCell::new(IndexMap::new()),
            dirty: Cell::new(true),
            style_watches: RefCell::new(Vec::new()),
            tree_watches: RefCell::new(Vec::new()),
        });

        let watches = inner
            .scopes()
            .into_iter()
            .map(|scope| {
                let weak = Rc::downgrade(&inner);
                let reason = if scope == inner.node {
                    InvalidationReason::PropertyChanged
                } else {
                    InvalidationReason::AncestorPropertyChanged
                };
                scope.subscribe(ListenScope::Node, move |event| {
                    if let Some(inner) = weak.upgrade() {
                        inner.tree_changed(event, reason);
                    }
                })
            })
            .collect();
        *inner.tree_watches.borrow_mut() = watches;
        SheetInner::watch_style_objects(&inner);
        inner.apply();

        Self { inner }
    }

    /// The bound node.
    pub fn node(&self) -> &Node {
        &self.inner.node
    }

    /// Effective value of `name`: the nearest scope declaring it wins; within
    /// a scope the style object is consulted before direct properties.
    pub fn find_style_property(&self, name: &str) -> Option<Value> {
        self.inner.find_cached(name)
    }

    /// Typed lookup. A malformed value reads as `T::default()`.
    pub fn get<T: PropertyValue>(&self, name: &str) -> Option<T> {
        self.find_style_property(name).map(|value| {
            T::from_value(&value).unwrap_or_else(|| {
                tracing::debug!(property = name, %value, "using zero value");
                T::default()
            })
        })
    }

    /// Resolved `background`, `Value::Void` when nothing declares one.
    pub fn background(&self) -> Value {
        self.inner.resolved.borrow().background.clone()
    }

    /// Resolved `foreground`, `Value::Void` when nothing declares one.
    pub fn foreground(&self) -> Value {
        self.inner.resolved.borrow().foreground.clone()
    }

    /// Whether cached values are stale. Only observable from inside an
    /// invalidation, which recomputes before returning.
    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.get()
    }

    pub fn interaction(&self) -> InteractionState {
        self.inner.interaction.get()
    }

    /// Replace the interaction state, invalidating if it changed.
    pub fn set_interaction(&self, state: InteractionState) {
        if self.inner.interaction.replace(state) != state {
            self.invalidate(InvalidationReason::InteractionChanged);
        }
    }

    /// Apply a pointer transition.
    pub fn pointer_event(&self, event: PointerEvent) {
        let mut state = self.inner.interaction.get();
        if state.apply(event) {
            self.inner.interaction.set(state);
            self.invalidate(InvalidationReason::InteractionChanged);
        }
    }

    /// The single invalidation funnel.
    pub fn invalidate(&self, reason: InvalidationReason) {
        self.inner.invalidate(reason);
    }

    /// Number of style objects currently watched (diagnostics and tests).
    pub fn watched_objects(&self) -> usize {
        self.inner.style_watches.borrow().len()
    }
}

impl fmt::Debug for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleSheet")
            .field("node", &self.inner.node.node_type())
            .field("interaction", &self.inner.interaction.get())
            .field("resolved", &*self.inner.resolved.borrow())
            .finish()
    }
}

impl SheetInner {
    /// The bound node followed by its ancestors, up to and including `root`.
    fn scopes(&self) -> Vec<Node> {
        let mut scopes = vec![self.node.clone()];
        if self.node == self.root {
            return scopes;
        }
        for ancestor in self.node.ancestors() {
            let is_root = ancestor == self.root;
            scopes.push(ancestor);
            if is_root {
                break;
            }
        }
        scopes
    }

    fn style_object(node: &Node) -> Option<Object> {
        node.get(STYLE).and_then(|value| value.as_object().cloned())
    }

    /// Style objects consulted at the bound node, most specific first.
    fn conditioned(&self, style: &Object) -> Vec<Object> {
        let state = self.interaction.get();
        let mut objects = Vec::with_capacity(3);
        for (active, key) in [(state.active, ACTIVE), (state.hovered, HOVER)] {
            if !active {
                continue;
            }
            if let Some(sub) = style.get(key).and_then(|value| value.as_object().cloned()) {
                objects.push(sub);
            }
        }
        objects.push(style.clone());
        objects
    }

    fn find(&self, name: &str) -> Option<Value> {
        for scope in self.scopes() {
            if let Some(style) = Self::style_object(&scope) {
                let objects = if scope == self.node {
                    self.conditioned(&style)
                } else {
                    vec![style]
                };
                if let Some(value) = objects.iter().find_map(|object| object.get(name)) {
                    return Some(value);
                }
            }
            if let Some(value) = scope.get(name) {
                return Some(value);
            }
        }
        None
    }

    fn find_cached(&self, name: &str) -> Option<Value> {
        if let Some(hit) = self.cache.borrow().get(name) {
            return hit.clone();
        }
        let value = self.find(name);
        self.cache.borrow_mut().insert(name.to_owned(), value.clone());
        value
    }

    /// Subscribe to every style object in the scope chain, plus the
    /// interaction sub-objects of the bound node's style.
    fn watch_style_objects(this: &Rc<Self>) {
        let mut objects = Vec::new();
        for scope in this.scopes() {
            let Some(style) = Self::style_object(&scope) else {
                continue;
            };
            if scope == this.node {
                for key in [ACTIVE, HOVER] {
                    if let Some(sub) = style.get(key).and_then(|value| value.as_object().cloned()) {
                        objects.push(sub);
                    }
                }
            }
            objects.push(style);
        }

        let watches = objects
            .iter()
            .map(|object| {
                let weak = Rc::downgrade(this);
                object.subscribe(move |name| {
                    let Some(inner) = weak.upgrade() else {
                        return;
                    };
                    // A replaced interaction sub-object needs a fresh watch.
                    if name == HOVER || name == ACTIVE {
                        Self::watch_style_objects(&inner);
                    }
                    inner.invalidate(InvalidationReason::StyleObjectChanged);
                })
            })
            .collect();
        *this.style_watches.borrow_mut() = watches;
    }

    /// Called for property edits on one node of the scope chain.
    fn tree_changed(self: Rc<Self>, event: &TreeEvent, reason: InvalidationReason) {
        let TreeEvent::PropertyChanged { name, .. } = event else {
            return;
        };
        if name == BOX_MODEL_VALID {
            return;
        }
        if name == STYLE {
            Self::watch_style_objects(&self);
        }
        self.invalidate(reason);
    }

    fn invalidate(&self, reason: InvalidationReason) {
        tracing::trace!(node = %self.node.node_type(), ?reason, "style invalidated");
        self.dirty.set(true);
        self.cache.borrow_mut().clear();
        self.apply();
    }

    /// Recompute the paint values and push them to the component.
    fn apply(&self) {
        let resolved = Resolved {
            background: self.find_cached(BACKGROUND).unwrap_or_default(),
            foreground: self.find_cached(FOREGROUND).unwrap_or_default(),
        };
        *self.resolved.borrow_mut() = resolved.clone();
        self.dirty.set(false);

        let Some(component) = self.component.upgrade() else {
            return;
        };
        let mut component = component.borrow_mut();
        component.set_background(&resolved.background);
        component.set_foreground(&resolved.foreground);
        component.repaint();
    }
}
