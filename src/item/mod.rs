//! Layout items: one per interpreted node, composed from decorators.
//!
//! An [`Item`] owns its component, its children and its decorators. The
//! parent link is weak. Capabilities are found by concrete type through a
//! `TypeId` index, so lookup cost does not depend on how many decorators are
//! attached.

pub mod canvas;
pub mod component;
pub mod container;
pub mod content;
pub mod decorator;
pub mod text;

use std::any::TypeId;
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::event::PointerEvent;
use crate::geometry::{Rect, Size};
use crate::property::{Length, PropertyValue};
use crate::tree::{Node, Subscription};

pub use canvas::Canvas;
pub use component::{component_ref, BasicComponent, Component, ComponentFactory, ComponentRef};
pub use container::ContainerItem;
pub use content::ContentItem;
pub use decorator::Decorator;
pub use text::{Text, TextStyle};

struct ItemInner {
    node: Node,
    component: ComponentRef,
    parent: RefCell<Weak<ItemInner>>,
    children: RefCell<Vec<Item>>,
    decorators: RefCell<Vec<Box<dyn Decorator>>>,
    index: RefCell<HashMap<TypeId, usize>>,
    subscriptions: RefCell<Vec<Subscription>>,
}

/// A node in the interpreted item tree.
///
/// Cloning yields another handle to the same item.
#[derive(Clone)]
pub struct Item {
    inner: Rc<ItemInner>,
}

/// A non-owning handle to an [`Item`].
#[derive(Clone, Default)]
pub struct WeakItem(Weak<ItemInner>);

impl WeakItem {
    /// The item, if it is still alive.
    pub fn upgrade(&self) -> Option<Item> {
        self.0.upgrade().map(|inner| Item { inner })
    }
}

impl fmt::Debug for WeakItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakItem")
    }
}

impl Item {
    /// Create an undecorated item for `node`.
    pub fn new(node: Node, component: ComponentRef) -> Self {
        Self {
            inner: Rc::new(ItemInner {
                node,
                component,
                parent: RefCell::new(Weak::new()),
                children: RefCell::new(Vec::new()),
                decorators: RefCell::new(Vec::new()),
                index: RefCell::new(HashMap::new()),
                subscriptions: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakItem {
        WeakItem(Rc::downgrade(&self.inner))
    }

    /// The source node.
    pub fn node(&self) -> &Node {
        &self.inner.node
    }

    /// The visual component.
    pub fn component(&self) -> ComponentRef {
        self.inner.component.clone()
    }

    // ── Decorators ───────────────────────────────────────────────────

    /// Attach a decorator outside all current ones.
    pub fn attach(&self, decorator: Box<dyn Decorator>) {
        let type_id = decorator.as_any().type_id();
        let mut decorators = self.inner.decorators.borrow_mut();
        self.inner
            .index
            .borrow_mut()
            .entry(type_id)
            .or_insert(decorators.len());
        tracing::trace!(decorator = decorator.name(), "attach");
        decorators.push(decorator);
    }

    /// The attached decorator of type `T`, if any. Repeated calls return the
    /// same instance.
    pub fn decorator<T: Decorator>(&self) -> Option<Ref<'_, T>> {
        let idx = *self.inner.index.borrow().get(&TypeId::of::<T>())?;
        Ref::filter_map(self.inner.decorators.borrow(), |decorators| {
            decorators.get(idx)?.as_any().downcast_ref::<T>()
        })
        .ok()
    }

    /// Whether a decorator of type `T` is attached.
    pub fn has<T: Decorator>(&self) -> bool {
        self.inner.index.borrow().contains_key(&TypeId::of::<T>())
    }

    /// The attached decorator of type `T`.
    ///
    /// # Panics
    ///
    /// Panics if no decorator of type `T` is attached. Use
    /// [`decorator`](Self::decorator) when the capability is optional.
    pub fn expect_decorator<T: Decorator>(&self) -> Ref<'_, T> {
        match self.decorator::<T>() {
            Some(decorator) => decorator,
            None => panic!(
                "item {:?} has no {} decorator",
                self.node().node_type(),
                std::any::type_name::<T>()
            ),
        }
    }

    /// Names of the attached decorators, innermost first.
    pub fn decorator_names(&self) -> Vec<&'static str> {
        self.inner
            .decorators
            .borrow()
            .iter()
            .map(|d| d.name())
            .collect()
    }

    /// Whether the item lays out children.
    pub fn is_container(&self) -> bool {
        self.inner
            .decorators
            .borrow()
            .iter()
            .rev()
            .find_map(|d| d.is_container())
            .unwrap_or(false)
    }

    /// Whether the item shows content of its own.
    pub fn is_content(&self) -> bool {
        self.inner
            .decorators
            .borrow()
            .iter()
            .rev()
            .find_map(|d| d.is_content())
            .unwrap_or(false)
    }

    /// Whether children may be added.
    pub fn accepts_children(&self) -> bool {
        self.inner
            .decorators
            .borrow()
            .iter()
            .all(|d| d.accepts_children())
    }

    /// Keep a subscription alive for as long as the item.
    pub fn hold(&self, subscription: Subscription) {
        self.inner.subscriptions.borrow_mut().push(subscription);
    }

    // ── Hierarchy ────────────────────────────────────────────────────

    /// The parent item, if any.
    pub fn parent(&self) -> Option<Item> {
        self.inner.parent.borrow().upgrade().map(|inner| Item { inner })
    }

    /// Children in order.
    pub fn children(&self) -> Vec<Item> {
        self.inner.children.borrow().clone()
    }

    /// The child at `index`.
    pub fn child(&self, index: usize) -> Option<Item> {
        self.inner.children.borrow().get(index).cloned()
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.inner.children.borrow().len()
    }

    /// Append a child.
    ///
    /// # Panics
    ///
    /// Panics if a decorator refuses children (e.g. [`Text`]).
    pub fn add_child(&self, child: Item) {
        let index = self.child_count();
        self.insert_child(index, child);
    }

    /// Insert a child at `index` (clamped to the child count).
    ///
    /// # Panics
    ///
    /// Panics if a decorator refuses children (e.g. [`Text`]).
    pub fn insert_child(&self, index: usize, child: Item) {
        if !self.accepts_children() {
            panic!(
                "{:?} item does not accept children",
                self.node().node_type()
            );
        }
        *child.inner.parent.borrow_mut() = Rc::downgrade(&self.inner);
        let mut children = self.inner.children.borrow_mut();
        let index = index.min(children.len());
        children.insert(index, child);
    }

    /// Detach and return the child at `index`.
    pub fn remove_child(&self, index: usize) -> Option<Item> {
        let mut children = self.inner.children.borrow_mut();
        if index >= children.len() {
            return None;
        }
        let child = children.remove(index);
        *child.inner.parent.borrow_mut() = Weak::new();
        Some(child)
    }

    /// Depth-first search for the item whose node has `id`.
    pub fn find_by_id(&self, id: &str) -> Option<Item> {
        if self.node().get("id").as_ref().and_then(|v| v.as_str()) == Some(id) {
            return Some(self.clone());
        }
        self.children().iter().find_map(|child| child.find_by_id(id))
    }

    // ── Geometry ─────────────────────────────────────────────────────

    /// The component's bounds, relative to the parent component.
    pub fn bounds(&self) -> Rect {
        self.inner.component.borrow().bounds()
    }

    /// Move or resize the component. Decorators are told; containers lay out
    /// their children.
    pub fn set_bounds(&self, bounds: Rect) {
        let old = {
            let mut component = self.inner.component.borrow_mut();
            let old = component.bounds();
            component.set_bounds(bounds);
            old
        };
        let decorators = self.inner.decorators.borrow();
        for decorator in decorators.iter() {
            decorator.bounds_changed(self, old);
        }
    }

    /// Size the item needs with `available` space (infinite on unbounded
    /// axes).
    pub fn intrinsic_size(&self, available: Size) -> Size {
        let measured = self
            .inner
            .decorators
            .borrow()
            .iter()
            .rev()
            .find_map(|d| d.intrinsic_size(self, available));
        measured
            .or_else(|| self.inner.component.borrow().preferred_size())
            .unwrap_or(Size::ZERO)
    }

    /// Size a top-level item from its own `width` / `height`, measuring the
    /// axes it leaves unset, and lay it out.
    pub fn perform_layout(&self) {
        let declared = |name: &str| {
            self.node()
                .get(name)
                .and_then(|v| Length::from_value(&v))
                .and_then(|length| match length {
                    Length::Px(px) => Some(px),
                    _ => None,
                })
        };
        let (width, height) = (declared("width"), declared("height"));
        let available = Size::new(
            width.unwrap_or(f32::INFINITY),
            height.unwrap_or(f32::INFINITY),
        );
        let measured = match (width, height) {
            (Some(w), Some(h)) => Size::new(w, h),
            _ => self.intrinsic_size(available),
        };
        let size = Size::new(
            width.unwrap_or(measured.width),
            height.unwrap_or(measured.height),
        );
        let origin = self.bounds().origin();
        tracing::debug!(width = size.width, height = size.height, "top-level layout");
        self.set_bounds(Rect::new(origin.x, origin.y, size.width, size.height));
    }

    /// Re-solve the layout if the box model was invalidated.
    pub fn update_layout(&self) {
        if let Some(container) = self.decorator::<ContainerItem>() {
            if !container.is_box_model_valid() {
                container.layout(self);
            }
        }
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Forward a pointer transition to every decorator.
    pub fn pointer_event(&self, event: PointerEvent) {
        let decorators = self.inner.decorators.borrow();
        for decorator in decorators.iter() {
            decorator.pointer_event(self, event);
        }
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("type", &self.node().node_type())
            .field("decorators", &self.decorator_names())
            .field("children", &self.child_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::cell::Cell;

    use super::*;
    use crate::tree::{AttributedTree, Element};

    struct Recorder {
        calls: Rc<Cell<usize>>,
        container: Option<bool>,
    }

    impl Decorator for Recorder {
        fn name(&self) -> &'static str {
            "Recorder"
        }
        fn is_container(&self) -> Option<bool> {
            self.container
        }
        fn bounds_changed(&self, _item: &Item, _old: Rect) {
            self.calls.set(self.calls.get() + 1);
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct Leaf;

    impl Decorator for Leaf {
        fn name(&self) -> &'static str {
            "Leaf"
        }
        fn accepts_children(&self) -> bool {
            false
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn item(tree: &AttributedTree) -> Item {
        Item::new(tree.root(), component_ref(BasicComponent::new("Component")))
    }

    fn recorder(container: Option<bool>) -> (Box<dyn Decorator>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (
            Box::new(Recorder {
                calls: calls.clone(),
                container,
            }),
            calls,
        )
    }

    #[test]
    fn decorator_lookup_returns_same_instance() {
        let tree = AttributedTree::new(Element::new("Component"));
        let item = item(&tree);
        let (decorator, _) = recorder(None);
        item.attach(decorator);

        let first = item.decorator::<Recorder>().map(|p| &*p as *const Recorder);
        let second = item.decorator::<Recorder>().map(|p| &*p as *const Recorder);
        assert!(first.is_some());
        assert_eq!(first, second);
        assert!(item.has::<Recorder>());
        assert!(item.decorator::<Leaf>().is_none());
        assert!(!item.has::<Leaf>());
    }

    #[test]
    #[should_panic(expected = "no")]
    fn expect_decorator_panics_when_absent() {
        let tree = AttributedTree::new(Element::new("Component"));
        let item = item(&tree);
        let _ = item.expect_decorator::<Leaf>();
    }

    #[test]
    fn outermost_opinion_wins() {
        let tree = AttributedTree::new(Element::new("Component"));
        let item = item(&tree);
        assert!(!item.is_container());

        let (inner, _) = recorder(Some(true));
        item.attach(inner);
        assert!(item.is_container());

        item.attach(Box::new(Leaf));
        assert!(item.is_container());
        assert_eq!(item.decorator_names(), vec!["Recorder", "Leaf"]);
    }

    #[test]
    #[should_panic(expected = "does not accept children")]
    fn leaf_refuses_children() {
        let tree = AttributedTree::new(Element::new("Text").with_child(Element::new("Span")));
        let parent = item(&tree);
        parent.attach(Box::new(Leaf));
        let child = Item::new(
            tree.root().child(0).unwrap(),
            component_ref(BasicComponent::new("Span")),
        );
        parent.add_child(child);
    }

    #[test]
    fn children_link_back_to_parent() {
        let tree = AttributedTree::new(
            Element::new("Component")
                .with_child(Element::new("A"))
                .with_child(Element::new("B")),
        );
        let parent = item(&tree);
        let a = Item::new(tree.root().child(0).unwrap(), component_ref(BasicComponent::new("A")));
        let b = Item::new(tree.root().child(1).unwrap(), component_ref(BasicComponent::new("B")));
        parent.add_child(b.clone());
        parent.insert_child(0, a.clone());

        assert_eq!(parent.children(), vec![a.clone(), b.clone()]);
        assert_eq!(a.parent(), Some(parent.clone()));

        let removed = parent.remove_child(0).unwrap();
        assert_eq!(removed, a);
        assert_eq!(a.parent(), None);
        assert_eq!(parent.child_count(), 1);
        assert!(parent.remove_child(5).is_none());
    }

    #[test]
    fn set_bounds_notifies_decorators() {
        let tree = AttributedTree::new(Element::new("Component"));
        let item = item(&tree);
        let (decorator, calls) = recorder(None);
        item.attach(decorator);

        item.set_bounds(Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(item.bounds(), Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn intrinsic_size_falls_back_to_component() {
        let tree = AttributedTree::new(Element::new("Component"));
        let sized = Item::new(
            tree.root(),
            component_ref(BasicComponent::new("Knob").with_preferred_size(Size::new(8.0, 9.0))),
        );
        assert_eq!(sized.intrinsic_size(Size::new(100.0, 100.0)), Size::new(8.0, 9.0));
        assert_eq!(item(&tree).intrinsic_size(Size::new(100.0, 100.0)), Size::ZERO);
    }

    #[test]
    fn perform_layout_uses_declared_size() {
        let tree = AttributedTree::new(Element::new("Component").with("width", 222).with("height", 333));
        let item = item(&tree);
        item.perform_layout();
        assert_eq!(item.bounds(), Rect::new(0.0, 0.0, 222.0, 333.0));
    }

    #[test]
    fn find_by_id_walks_children() {
        let tree = AttributedTree::new(
            Element::new("Component").with_child(Element::new("A").with("id", "target")),
        );
        let parent = item(&tree);
        let child = Item::new(tree.root().child(0).unwrap(), component_ref(BasicComponent::new("A")));
        parent.add_child(child.clone());
        assert_eq!(parent.find_by_id("target"), Some(child));
        assert_eq!(parent.find_by_id("missing"), None);
    }
}
