//! Visual components: the narrow contract items drive, and the factory that
//! creates them by node type.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::geometry::{Rect, Size};
use crate::property::Display;
use crate::tree::Value;

use super::text::TextStyle;

// ---------------------------------------------------------------------------
// Component trait
// ---------------------------------------------------------------------------

/// A visual component positioned by the layout engine and painted by the
/// host.
///
/// Bounds are relative to the parent component. Everything past geometry is
/// a paint request; components decide themselves when to act on it.
pub trait Component: Any {
    /// The node type this component was created for.
    fn component_type(&self) -> &str;

    /// Current bounds, relative to the parent component.
    fn bounds(&self) -> Rect;

    /// Move or resize.
    fn set_bounds(&mut self, bounds: Rect);

    /// Size the component would like when nothing else constrains it.
    fn preferred_size(&self) -> Option<Size> {
        None
    }

    /// Display mode used when the node declares none.
    fn default_display(&self) -> Option<Display> {
        None
    }

    /// Replace the displayed text (text leaves only).
    fn set_text(&mut self, _text: &str) {}

    /// Replace the font and paragraph settings (text leaves only).
    fn set_text_style(&mut self, _style: &TextStyle) {}

    /// Resolved `background` style value.
    fn set_background(&mut self, _fill: &Value) {}

    /// Resolved `foreground` style value.
    fn set_foreground(&mut self, _fill: &Value) {}

    /// The component's appearance is stale.
    fn repaint(&mut self) {}

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Shared handle to a type-erased component.
pub type ComponentRef = Rc<RefCell<dyn Component>>;

/// Wrap a concrete component in a [`ComponentRef`].
pub fn component_ref(component: impl Component) -> ComponentRef {
    Rc::new(RefCell::new(component))
}

// ---------------------------------------------------------------------------
// BasicComponent
// ---------------------------------------------------------------------------

/// Headless component that records everything pushed to it. Used as the
/// fallback for unknown node types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasicComponent {
    pub component_type: String,
    pub bounds: Rect,
    pub text: String,
    pub text_style: TextStyle,
    pub background: Value,
    pub foreground: Value,
    pub preferred_size: Option<Size>,
    pub default_display: Option<Display>,
    /// Number of repaint requests received.
    pub repaints: usize,
}

impl BasicComponent {
    pub fn new(component_type: impl Into<String>) -> Self {
        Self {
            component_type: component_type.into(),
            ..Self::default()
        }
    }

    /// Set the preferred size (builder).
    pub fn with_preferred_size(mut self, size: Size) -> Self {
        self.preferred_size = Some(size);
        self
    }

    /// Set the default display (builder).
    pub fn with_default_display(mut self, display: Display) -> Self {
        self.default_display = Some(display);
        self
    }
}

impl Component for BasicComponent {
    fn component_type(&self) -> &str {
        &self.component_type
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn preferred_size(&self) -> Option<Size> {
        self.preferred_size
    }

    fn default_display(&self) -> Option<Display> {
        self.default_display
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_owned();
    }

    fn set_text_style(&mut self, style: &TextStyle) {
        self.text_style = style.clone();
    }

    fn set_background(&mut self, fill: &Value) {
        self.background = fill.clone();
    }

    fn set_foreground(&mut self, fill: &Value) {
        self.foreground = fill.clone();
    }

    fn repaint(&mut self) {
        self.repaints += 1;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// ComponentFactory
// ---------------------------------------------------------------------------

type Constructor = Rc<dyn Fn(&str) -> ComponentRef>;

/// Creates components by node type, with a fallback for unknown types.
#[derive(Clone)]
pub struct ComponentFactory {
    constructors: IndexMap<String, Constructor>,
    fallback: Constructor,
}

impl ComponentFactory {
    /// A factory with no registered types; everything gets a
    /// [`BasicComponent`].
    pub fn new() -> Self {
        Self {
            constructors: IndexMap::new(),
            fallback: Rc::new(|node_type| component_ref(BasicComponent::new(node_type))),
        }
    }

    /// Register a constructor for `node_type` (builder).
    pub fn with<C: Component>(
        mut self,
        node_type: impl Into<String>,
        constructor: impl Fn() -> C + 'static,
    ) -> Self {
        self.register(node_type, constructor);
        self
    }

    /// Register a constructor for `node_type`, replacing any previous one.
    pub fn register<C: Component>(
        &mut self,
        node_type: impl Into<String>,
        constructor: impl Fn() -> C + 'static,
    ) {
        self.constructors
            .insert(node_type.into(), Rc::new(move |_| component_ref(constructor())));
    }

    /// Replace the fallback constructor.
    pub fn set_fallback<C: Component>(&mut self, constructor: impl Fn(&str) -> C + 'static) {
        self.fallback = Rc::new(move |node_type| component_ref(constructor(node_type)));
    }

    /// Whether `node_type` has a registered constructor.
    pub fn knows(&self, node_type: &str) -> bool {
        self.constructors.contains_key(node_type)
    }

    /// Create a component for `node_type`.
    pub fn create(&self, node_type: &str) -> ComponentRef {
        match self.constructors.get(node_type) {
            Some(constructor) => constructor(node_type),
            None => {
                tracing::debug!(node_type, "unknown node type, using fallback component");
                (self.fallback)(node_type)
            }
        }
    }
}

impl Default for ComponentFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ComponentFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentFactory")
            .field("types", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}
