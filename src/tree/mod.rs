//! Attributed tree: slotmap-backed arena of typed-value nodes with listeners.
//!
//! The tree is the single source of truth that items and style sheets observe.
//! [`AttributedTree`] and [`Node`] are cheap, clonable handles onto a shared
//! arena; all mutation goes through them and is broadcast synchronously to
//! listeners before the mutating call returns.

pub mod listener;
pub mod node;
pub mod value;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use slotmap::{Key, SecondaryMap, SlotMap};

pub use listener::{ListenScope, ListenerId, Subscription, TreeEvent};
pub use node::{Element, NodeData, NodeId};
pub use value::{Object, Value};

use listener::ListenerEntry;

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

type TreeCallback = dyn Fn(&TreeEvent);

struct TreeListener {
    node: NodeId,
    scope: ListenScope,
    entry: ListenerEntry<TreeCallback>,
}

/// Node storage. Parent/child relationships live in secondary maps so that
/// removal is O(subtree size) and lookup is O(1).
struct Arena {
    nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: NodeId,
}

impl Arena {
    fn insert_subtree(&mut self, element: Element, parent: Option<NodeId>) -> NodeId {
        let Element { data, children } = element;
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::with_capacity(children.len()));
        if let Some(parent) = parent {
            self.parent.insert(id, parent);
        }
        for child in children {
            let child_id = self.insert_subtree(child, Some(id));
            if let Some(kids) = self.children.get_mut(id) {
                kids.push(child_id);
            }
        }
        id
    }

    fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    fn is_self_or_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent.get(node).copied();
        }
        false
    }

    /// Remove `id` and all its descendants (BFS).
    fn remove_subtree(&mut self, id: NodeId) -> usize {
        let mut queue = VecDeque::from([id]);
        let mut removed = 0;
        while let Some(current) = queue.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                queue.extend(kids);
            }
            self.parent.remove(current);
            if self.nodes.remove(current).is_some() {
                removed += 1;
            }
        }
        removed
    }
}

/// Listener storage, indexed by the node each listener is registered on so
/// that dispatch only visits the target and its ancestors.
#[derive(Default)]
struct Registry {
    entries: SlotMap<ListenerId, TreeListener>,
    by_node: SecondaryMap<NodeId, Vec<ListenerId>>,
}

impl Registry {
    fn insert(&mut self, listener: TreeListener) -> ListenerId {
        let node = listener.node;
        let id = self.entries.insert(listener);
        if !node.is_null() {
            if let Some(entry) = self.by_node.entry(node) {
                entry.or_default().push(id);
            }
        }
        id
    }

    fn remove(&mut self, id: ListenerId) {
        let Some(listener) = self.entries.remove(id) else {
            return;
        };
        let Some(ids) = self.by_node.get_mut(listener.node) else {
            return;
        };
        ids.retain(|&other| other != id);
        if ids.is_empty() {
            self.by_node.remove(listener.node);
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Callbacks covering `target`: every listener on the target itself, then
    /// subtree listeners on each ancestor, nearest first.
    fn covering(&self, arena: &Arena, target: NodeId) -> Vec<(Rc<Cell<bool>>, Rc<TreeCallback>)> {
        let mut callbacks = Vec::new();
        let mut current = Some(target);
        let mut at_target = true;
        while let Some(node) = current {
            let ids = self.by_node.get(node).map(Vec::as_slice).unwrap_or_default();
            for listener in ids.iter().filter_map(|&id| self.entries.get(id)) {
                if at_target || listener.scope == ListenScope::Subtree {
                    callbacks.push(listener.entry.snapshot());
                }
            }
            at_target = false;
            current = arena.parent.get(node).copied();
        }
        callbacks
    }
}

struct TreeInner {
    arena: RefCell<Arena>,
    listeners: Rc<RefCell<Registry>>,
}

impl TreeInner {
    /// Deliver `event` to every live listener whose scope covers its target.
    /// Cost is bounded by the target's depth and the listeners registered
    /// along that path.
    fn dispatch(&self, event: TreeEvent) {
        let target = event.target().id;
        let callbacks = {
            let arena = self.arena.borrow();
            self.listeners.borrow().covering(&arena, target)
        };
        tracing::trace!(?event, listeners = callbacks.len(), "tree event");
        for (alive, callback) in callbacks {
            if alive.get() {
                callback(&event);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// AttributedTree
// ---------------------------------------------------------------------------

/// A shared handle onto a tree of attributed nodes.
///
/// Cloning the handle does not clone the tree.
#[derive(Clone)]
pub struct AttributedTree {
    inner: Rc<TreeInner>,
}

impl AttributedTree {
    /// Build a tree from a declarative element description.
    pub fn new(root: impl Into<Element>) -> Self {
        let mut arena = Arena {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: NodeId::default(),
        };
        arena.root = arena.insert_subtree(root.into(), None);
        Self {
            inner: Rc::new(TreeInner {
                arena: RefCell::new(arena),
                listeners: Rc::new(RefCell::new(Registry::default())),
            }),
        }
    }

    /// The root node.
    pub fn root(&self) -> Node {
        let id = self.inner.arena.borrow().root;
        self.node(id)
    }

    /// A handle for `id`. The handle may be dead if `id` was removed.
    pub fn node(&self, id: NodeId) -> Node {
        Node {
            tree: self.inner.clone(),
            id,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.inner.arena.borrow().nodes.len()
    }

    /// Whether the tree has no live nodes (only after the root was removed).
    pub fn is_empty(&self) -> bool {
        self.inner.arena.borrow().nodes.is_empty()
    }

    /// Number of registered listeners across the whole tree.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

impl PartialEq for AttributedTree {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for AttributedTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributedTree")
            .field("len", &self.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A handle onto one node of an [`AttributedTree`].
///
/// Handles stay valid after the node is removed; they then report
/// `is_alive() == false`, read as empty, and ignore writes.
#[derive(Clone)]
pub struct Node {
    tree: Rc<TreeInner>,
    id: NodeId,
}

impl Node {
    /// The node's arena id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The tree this node belongs to.
    pub fn tree(&self) -> AttributedTree {
        AttributedTree {
            inner: self.tree.clone(),
        }
    }

    fn sibling(&self, id: NodeId) -> Node {
        Node {
            tree: self.tree.clone(),
            id,
        }
    }

    /// Whether the node still exists in its tree.
    pub fn is_alive(&self) -> bool {
        self.tree.arena.borrow().nodes.contains_key(self.id)
    }

    /// The node's type tag, or an empty string for a dead node.
    pub fn node_type(&self) -> String {
        self.tree
            .arena
            .borrow()
            .nodes
            .get(self.id)
            .map(|data| data.node_type.clone())
            .unwrap_or_default()
    }

    // ── Properties ───────────────────────────────────────────────────

    /// Read a property.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.tree
            .arena
            .borrow()
            .nodes
            .get(self.id)
            .and_then(|data| data.properties.get(name).cloned())
    }

    /// Whether the property is declared on this node.
    pub fn contains(&self, name: &str) -> bool {
        self.tree
            .arena
            .borrow()
            .nodes
            .get(self.id)
            .is_some_and(|data| data.properties.contains_key(name))
    }

    /// Names of all declared properties, in declaration order.
    pub fn property_names(&self) -> Vec<String> {
        self.tree
            .arena
            .borrow()
            .nodes
            .get(self.id)
            .map(|data| data.properties.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Write a property. Listeners are notified only when the stored value
    /// actually changes.
    pub fn set(&self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        {
            let mut arena = self.tree.arena.borrow_mut();
            let Some(data) = arena.nodes.get_mut(self.id) else {
                tracing::debug!(name, "ignoring write to removed node");
                return;
            };
            if data.properties.get(name) == Some(&value) {
                return;
            }
            data.properties.insert(name.to_owned(), value);
        }
        self.tree.dispatch(TreeEvent::PropertyChanged {
            node: self.clone(),
            name: name.to_owned(),
        });
    }

    /// Remove a property, notifying listeners if it was declared.
    pub fn remove_property(&self, name: &str) {
        let removed = {
            let mut arena = self.tree.arena.borrow_mut();
            arena
                .nodes
                .get_mut(self.id)
                .and_then(|data| data.properties.shift_remove(name))
        };
        if removed.is_some() {
            self.tree.dispatch(TreeEvent::PropertyChanged {
                node: self.clone(),
                name: name.to_owned(),
            });
        }
    }

    // ── Structure ────────────────────────────────────────────────────

    /// The parent node, if any.
    pub fn parent(&self) -> Option<Node> {
        let parent = self.tree.arena.borrow().parent.get(self.id).copied();
        parent.map(|id| self.sibling(id))
    }

    /// Children in document order.
    pub fn children(&self) -> Vec<Node> {
        let ids = self.tree.arena.borrow().children(self.id).to_vec();
        ids.into_iter().map(|id| self.sibling(id)).collect()
    }

    /// The child at `index`.
    pub fn child(&self, index: usize) -> Option<Node> {
        let id = self.tree.arena.borrow().children(self.id).get(index).copied();
        id.map(|id| self.sibling(id))
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.tree.arena.borrow().children(self.id).len()
    }

    /// Position of this node among its parent's children.
    pub fn index_in_parent(&self) -> Option<usize> {
        let arena = self.tree.arena.borrow();
        let parent = arena.parent.get(self.id)?;
        arena.children(*parent).iter().position(|&c| c == self.id)
    }

    /// Ancestors from the immediate parent up to the root.
    pub fn ancestors(&self) -> Vec<Node> {
        let arena = self.tree.arena.borrow();
        let mut result = Vec::new();
        let mut current = self.id;
        while let Some(&p) = arena.parent.get(current) {
            result.push(self.sibling(p));
            current = p;
        }
        result
    }

    /// Whether `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &Node) -> bool {
        if !Rc::ptr_eq(&self.tree, &other.tree) || self.id == other.id {
            return false;
        }
        self.tree.arena.borrow().is_self_or_ancestor(self.id, other.id)
    }

    /// Append a subtree as the last child. Returns the new child.
    pub fn append(&self, element: impl Into<Element>) -> Node {
        self.insert(usize::MAX, element)
    }

    /// Insert a subtree at `index` (clamped to the child count). Returns the
    /// new child, which is dead if `self` is.
    pub fn insert(&self, index: usize, element: impl Into<Element>) -> Node {
        let (child, index) = {
            let mut arena = self.tree.arena.borrow_mut();
            if !arena.nodes.contains_key(self.id) {
                tracing::debug!("ignoring insert into removed node");
                return self.sibling(NodeId::default());
            }
            let child = arena.insert_subtree(element.into(), Some(self.id));
            let kids = arena.children.entry(self.id).map(|e| e.or_default());
            let Some(kids) = kids else {
                return self.sibling(NodeId::default());
            };
            let index = index.min(kids.len());
            kids.insert(index, child);
            (child, index)
        };
        let child = self.sibling(child);
        self.tree.dispatch(TreeEvent::ChildAdded {
            parent: self.clone(),
            child: child.clone(),
            index,
        });
        child
    }

    /// Remove the child at `index` and its subtree. Returns `false` if there
    /// was no such child.
    pub fn remove_child(&self, index: usize) -> bool {
        let child = {
            let mut arena = self.tree.arena.borrow_mut();
            let Some(kids) = arena.children.get_mut(self.id) else {
                return false;
            };
            if index >= kids.len() {
                return false;
            }
            let child = kids.remove(index);
            arena.remove_subtree(child);
            child
        };
        self.tree.dispatch(TreeEvent::ChildRemoved {
            parent: self.clone(),
            child: self.sibling(child),
            index,
        });
        true
    }

    /// Detach this node from its parent, removing its subtree.
    pub fn remove(&self) -> bool {
        match (self.parent(), self.index_in_parent()) {
            (Some(parent), Some(index)) => parent.remove_child(index),
            _ => false,
        }
    }

    /// Pre-order depth-first search for a node whose `id` property equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<Node> {
        let arena = self.tree.arena.borrow();
        let mut stack = vec![self.id];
        while let Some(current) = stack.pop() {
            let Some(data) = arena.nodes.get(current) else {
                continue;
            };
            if data.properties.get("id").and_then(Value::as_str) == Some(id) {
                return Some(self.sibling(current));
            }
            stack.extend(arena.children(current).iter().rev());
        }
        None
    }

    // ── Listeners ────────────────────────────────────────────────────

    /// Register a listener for events on this node (or its subtree). The
    /// listener lives as long as the returned [`Subscription`].
    pub fn subscribe(
        &self,
        scope: ListenScope,
        callback: impl Fn(&TreeEvent) + 'static,
    ) -> Subscription {
        let entry = ListenerEntry::new(Rc::new(callback) as Rc<TreeCallback>);
        let alive = entry.alive_flag();
        let id = self.tree.listeners.borrow_mut().insert(TreeListener {
            node: self.id,
            scope,
            entry,
        });
        let registry = Rc::downgrade(&self.tree.listeners);
        Subscription::new(alive, move || {
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().remove(id);
            }
        })
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree) && self.id == other.id
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Node").field(&self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;

    /// Build a small test tree:
    /// ```text
    ///       root
    ///      /    \
    ///    a        b
    ///   / \
    ///  c   d
    /// ```
    fn build_tree() -> (AttributedTree, Node, Node, Node, Node, Node) {
        let tree = AttributedTree::new(
            Element::new("Container")
                .with("id", "root")
                .with_child(
                    Element::new("Panel")
                        .with("id", "a")
                        .with_child(Element::new("Button").with("id", "c"))
                        .with_child(Element::new("Label").with("id", "d")),
                )
                .with_child(Element::new("Panel").with("id", "b")),
        );
        let root = tree.root();
        let a = root.child(0).unwrap();
        let b = root.child(1).unwrap();
        let c = a.child(0).unwrap();
        let d = a.child(1).unwrap();
        (tree, root, a, b, c, d)
    }

    fn record(events: &Rc<RefCell<Vec<String>>>) -> impl Fn(&TreeEvent) + 'static {
        let sink = events.clone();
        move |event| {
            let line = match event {
                TreeEvent::PropertyChanged { node, name } => {
                    format!("{}.{name}", node.get("id").unwrap_or_default())
                }
                TreeEvent::ChildAdded { parent, index, .. } => {
                    format!("{}+{index}", parent.get("id").unwrap_or_default())
                }
                TreeEvent::ChildRemoved { parent, index, .. } => {
                    format!("{}-{index}", parent.get("id").unwrap_or_default())
                }
            };
            sink.borrow_mut().push(line);
        }
    }

    #[test]
    fn builds_from_elements() {
        let (tree, root, a, b, c, d) = build_tree();
        assert_eq!(tree.len(), 5);
        assert_eq!(root.children(), vec![a.clone(), b.clone()]);
        assert_eq!(a.children(), vec![c.clone(), d]);
        assert_eq!(c.parent(), Some(a.clone()));
        assert_eq!(root.parent(), None);
        assert_eq!(c.node_type(), "Button");
    }

    #[test]
    fn ancestors_and_relations() {
        let (_tree, root, a, b, c, _d) = build_tree();
        assert_eq!(c.ancestors(), vec![a.clone(), root.clone()]);
        assert!(root.is_ancestor_of(&c));
        assert!(a.is_ancestor_of(&c));
        assert!(!b.is_ancestor_of(&c));
        assert!(!c.is_ancestor_of(&c));
        assert_eq!(c.index_in_parent(), Some(0));
        assert_eq!(b.index_in_parent(), Some(1));
    }

    #[test]
    fn set_notifies_only_on_change() {
        let (_tree, root, ..) = build_tree();
        let events = Rc::new(RefCell::new(Vec::new()));
        let _sub = root.subscribe(ListenScope::Node, record(&events));

        root.set("width", 10);
        root.set("width", 10);
        root.set("width", 11);
        root.remove_property("height");
        root.remove_property("width");

        assert_eq!(*events.borrow(), vec!["root.width", "root.width", "root.width"]);
        assert!(!root.contains("width"));
    }

    #[test]
    fn node_scope_ignores_descendants() {
        let (_tree, root, _a, _b, c, _d) = build_tree();
        let events = Rc::new(RefCell::new(Vec::new()));
        let _sub = root.subscribe(ListenScope::Node, record(&events));
        c.set("text", "hi");
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn subtree_scope_sees_descendants() {
        let (_tree, _root, a, b, c, _d) = build_tree();
        let events = Rc::new(RefCell::new(Vec::new()));
        let _sub = a.subscribe(ListenScope::Subtree, record(&events));
        c.set("text", "hi");
        b.set("text", "ignored");
        a.set("x", 1);
        assert_eq!(*events.borrow(), vec!["c.text", "a.x"]);
    }

    #[test]
    fn dispatch_visits_only_the_ancestor_chain() {
        let tree = AttributedTree::new(
            Element::new("Panel")
                .with("id", "root")
                .with_children((0..50).map(|i| Element::new("Button").with("id", i))),
        );
        let root = tree.root();
        let events = Rc::new(RefCell::new(Vec::new()));
        let subs: Vec<_> = root
            .children()
            .iter()
            .map(|child| child.subscribe(ListenScope::Node, record(&events)))
            .collect();
        let _watch = root.subscribe(ListenScope::Subtree, record(&events));
        let _own = root.subscribe(ListenScope::Node, record(&events));
        assert_eq!(tree.listener_count(), subs.len() + 2);

        let target = root.child(7).unwrap();
        let covering = {
            let arena = tree.inner.arena.borrow();
            tree.inner.listeners.borrow().covering(&arena, target.id()).len()
        };
        assert_eq!(covering, 2);

        target.set("text", "hi");
        assert_eq!(*events.borrow(), vec!["7.text", "7.text"]);
    }

    #[test]
    fn sibling_subtree_listeners_are_not_called() {
        let (tree, _root, a, b, c, _d) = build_tree();
        let events = Rc::new(RefCell::new(Vec::new()));
        let _on_b = b.subscribe(ListenScope::Subtree, record(&events));
        let on_a = a.subscribe(ListenScope::Subtree, record(&events));
        c.set("text", "hi");
        assert_eq!(*events.borrow(), vec!["c.text"]);

        drop(on_a);
        assert_eq!(tree.listener_count(), 1);
        c.set("text", "again");
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn insert_and_remove_children() {
        let (tree, root, a, b, ..) = build_tree();
        let events = Rc::new(RefCell::new(Vec::new()));
        let _sub = root.subscribe(ListenScope::Node, record(&events));

        let e = root.insert(1, Element::new("Panel").with("id", "e"));
        assert_eq!(root.children(), vec![a.clone(), e.clone(), b.clone()]);
        assert_eq!(tree.len(), 6);

        assert!(root.remove_child(0));
        assert!(!a.is_alive());
        assert_eq!(tree.len(), 3);
        assert_eq!(root.children(), vec![e, b]);
        assert!(!root.remove_child(7));

        assert_eq!(*events.borrow(), vec!["root+1", "root-0"]);
    }

    #[test]
    fn append_clamps_to_end() {
        let (_tree, root, ..) = build_tree();
        let x = root.insert(99, Element::new("X"));
        assert_eq!(x.index_in_parent(), Some(2));
        let y = root.append(Element::new("Y").with_child(Element::new("Z")));
        assert_eq!(y.index_in_parent(), Some(3));
        assert_eq!(y.child_count(), 1);
    }

    #[test]
    fn dead_nodes_read_empty_and_ignore_writes() {
        let (_tree, _root, a, _b, c, _d) = build_tree();
        assert!(a.remove());
        assert!(!c.is_alive());
        assert_eq!(c.get("id"), None);
        assert_eq!(c.node_type(), "");
        c.set("id", "zombie");
        assert_eq!(c.get("id"), None);
        assert!(c.children().is_empty());
    }

    #[test]
    fn dropping_subscription_stops_delivery() {
        let (tree, root, ..) = build_tree();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sub = root.subscribe(ListenScope::Subtree, record(&events));
        assert_eq!(tree.listener_count(), 1);
        assert!(sub.is_active());
        drop(sub);
        assert_eq!(tree.listener_count(), 0);
        root.set("x", 1);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn listener_dropped_mid_dispatch_does_not_fire() {
        let (_tree, root, ..) = build_tree();
        let fired = Rc::new(RefCell::new(0));
        let second: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let slot = second.clone();
        let _first = root.subscribe(ListenScope::Node, move |_| {
            slot.borrow_mut().take();
        });
        let counter = fired.clone();
        *second.borrow_mut() = Some(root.subscribe(ListenScope::Node, move |_| {
            *counter.borrow_mut() += 1;
        }));

        root.set("x", 1);
        assert_eq!(*fired.borrow(), 0);
    }

    #[test]
    fn listeners_may_mutate_the_tree() {
        let (_tree, root, a, ..) = build_tree();
        let target = a.clone();
        let _sub = root.subscribe(ListenScope::Node, move |event| {
            if let TreeEvent::PropertyChanged { name, .. } = event {
                if name == "width" {
                    target.set("echo", true);
                }
            }
        });
        root.set("width", 5);
        assert_eq!(a.get("echo"), Some(Value::Bool(true)));
    }

    #[test]
    fn find_by_id_searches_subtree() {
        let (_tree, root, a, _b, _c, d) = build_tree();
        assert_eq!(root.find_by_id("d"), Some(d));
        assert_eq!(a.find_by_id("b"), None);
    }
}
