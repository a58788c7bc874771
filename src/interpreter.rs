//! Tree interpreter: turns an attributed tree into a tree of layout items.
//!
//! One [`Item`] is created per node. Its capabilities are chosen from the
//! node's type, its `display` and its parent's `display`:
//!
//! 1. the parent's child adapter ([`GridItem`], [`FlexItem`] or [`BlockItem`]);
//! 2. [`Text`] for text types, else [`ContainerItem`] for `flex` / `grid` /
//!    `block`, else [`ContentItem`];
//! 3. [`Canvas`] when style sheets are enabled;
//! 4. custom decorators registered for the node type, in registration order.
//!
//! The item tree then follows live child insertions and removals on the
//! source tree.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::config::InterpreterConfig;
use crate::item::container::BOX_MODEL_VALID;
use crate::item::{Canvas, ComponentFactory, ContainerItem, ContentItem, Decorator, Item, Text};
use crate::layout::{BlockItem, FlexItem, GridItem};
use crate::property::{Display, Property};
use crate::tree::{ListenScope, Node, TreeEvent};

/// Builds a custom decorator for a freshly created item.
pub type DecoratorFactory = dyn Fn(&Item) -> Box<dyn Decorator>;

struct Shared {
    config: RefCell<InterpreterConfig>,
    factory: RefCell<ComponentFactory>,
    decorators: RefCell<IndexMap<String, Vec<Rc<DecoratorFactory>>>>,
}

/// Interprets attributed trees into item trees.
///
/// Cheap to clone; clones share configuration. Items keep the configuration
/// alive for as long as they follow live edits.
#[derive(Clone)]
pub struct Interpreter {
    shared: Rc<Shared>,
}

impl Interpreter {
    /// Create an interpreter with the default configuration and a factory
    /// that builds [`BasicComponent`](crate::item::BasicComponent)s.
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                config: RefCell::new(config),
                factory: RefCell::new(ComponentFactory::new()),
                decorators: RefCell::new(IndexMap::new()),
            }),
        }
    }

    /// Replace the configuration. Items already interpreted keep the layout
    /// defaults they were built with.
    pub fn set_config(&self, config: InterpreterConfig) {
        *self.shared.config.borrow_mut() = config;
    }

    pub fn config(&self) -> Ref<'_, InterpreterConfig> {
        self.shared.config.borrow()
    }

    pub fn set_component_factory(&self, factory: ComponentFactory) {
        *self.shared.factory.borrow_mut() = factory;
    }

    pub fn component_factory(&self) -> Ref<'_, ComponentFactory> {
        self.shared.factory.borrow()
    }

    /// Attach a decorator built by `factory` to every item of `node_type`.
    pub fn add_decorator(
        &self,
        node_type: impl Into<String>,
        factory: impl Fn(&Item) -> Box<dyn Decorator> + 'static,
    ) {
        self.shared
            .decorators
            .borrow_mut()
            .entry(node_type.into())
            .or_default()
            .push(Rc::new(factory));
    }

    /// Interpret `node` and its subtree. `node` becomes the style root.
    pub fn interpret(&self, node: &Node) -> Item {
        let item = interpret_node(&self.shared, node, None, node);
        tracing::debug!(root = %node.node_type(), "interpreted tree");
        item
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("config", &*self.shared.config.borrow())
            .field("factory", &*self.shared.factory.borrow())
            .field("decorators", &self.shared.decorators.borrow().keys().collect::<Vec<_>>())
            .finish()
    }
}

fn interpret_node(shared: &Rc<Shared>, node: &Node, parent_display: Option<Display>, root: &Node) -> Item {
    let node_type = node.node_type();
    let component = shared.factory.borrow().create(&node_type);
    let config = shared.config.borrow().clone();
    let default_display = component
        .borrow()
        .default_display()
        .unwrap_or(config.default_display);
    let display = Property::with_default(node, "display", default_display).get();
    let item = Item::new(node.clone(), component);

    // Child adapter, chosen by the parent.
    let defaults = &config.layout_defaults;
    match parent_display {
        Some(Display::Grid) => item.attach(Box::new(GridItem::new(&item, defaults))),
        Some(Display::Flex) => item.attach(Box::new(FlexItem::new(&item, defaults))),
        Some(Display::Block) => item.attach(Box::new(BlockItem::new(&item, defaults))),
        Some(Display::Content) | None => {}
    }

    if config.is_text_type(&node_type) {
        let text = Text::new(&item);
        item.attach(Box::new(text));
    } else if display.is_container() {
        let container = ContainerItem::new(&item, default_display);
        item.attach(Box::new(container));
    } else {
        item.attach(Box::new(ContentItem));
    }

    if config.style_sheets {
        let canvas = Canvas::new(&item, root);
        item.attach(Box::new(canvas));
    }

    let custom = shared.decorators.borrow().get(&node_type).cloned();
    for factory in custom.into_iter().flatten() {
        let decorator = factory(&item);
        item.attach(decorator);
    }

    tracing::trace!(node = %node_type, decorators = ?item.decorator_names(), "interpreted node");

    if !item.accepts_children() {
        return item;
    }

    let child_display = container_display(&item);
    for child in node.children() {
        item.add_child(interpret_node(shared, &child, child_display, root));
    }
    follow_children(shared, &item, root);
    item
}

/// The display a container lays its children out with; `None` when the item
/// lays out nothing.
fn container_display(item: &Item) -> Option<Display> {
    item.decorator::<ContainerItem>().map(|container| container.display.get())
}

/// Keep the item's children in step with the node's children.
fn follow_children(shared: &Rc<Shared>, item: &Item, root: &Node) {
    let weak = item.downgrade();
    let shared = shared.clone();
    let root = root.clone();
    let subscription = item.node().subscribe(ListenScope::Node, move |event| {
        let Some(item) = weak.upgrade() else {
            return;
        };
        match event {
            TreeEvent::ChildAdded { child, index, .. } => {
                tracing::debug!(node = %child.node_type(), index, "interpreting inserted child");
                let display = container_display(&item);
                item.insert_child(*index, interpret_node(&shared, child, display, &root));
            }
            TreeEvent::ChildRemoved { index, .. } => {
                tracing::debug!(index, "dropping removed child");
                item.remove_child(*index);
            }
            TreeEvent::PropertyChanged { .. } => return,
        }
        if item.is_container() {
            item.node().set(BOX_MODEL_VALID, false);
        }
    });
    item.hold(subscription);
}
