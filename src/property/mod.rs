//! Typed, observable bindings onto node values.
//!
//! A [`Property<T>`] reads one named value from one [`Node`], parsing it
//! permissively: anything that fails to parse reads as `T::default()`. The
//! fallback used when the node does not declare the value at all is an
//! explicit snapshot handed to the constructor.

pub mod parse;
pub mod tokenizer;
pub mod types;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::geometry::Edges;
use crate::tree::{ListenScope, Node, Object, Subscription, TreeEvent, Value};

pub use parse::ParseError;
pub use types::*;

// ---------------------------------------------------------------------------
// PropertyValue
// ---------------------------------------------------------------------------

/// Conversion between untyped node storage and a typed property value.
pub trait PropertyValue: Default + Clone + 'static {
    /// Parse from storage. `None` means the stored value is malformed.
    fn from_value(value: &Value) -> Option<Self>;
    /// Convert to storage.
    fn to_value(&self) -> Value;
}

/// Implement [`PropertyValue`] for a string-parsed type.
macro_rules! string_property {
    ($ty:ty, $parse:path) => {
        impl PropertyValue for $ty {
            fn from_value(value: &Value) -> Option<Self> {
                match $parse(value.as_str()?) {
                    Ok(parsed) => Some(parsed),
                    Err(err) => {
                        tracing::debug!(%err, "malformed property value");
                        None
                    }
                }
            }

            fn to_value(&self) -> Value {
                Value::Str(keyword_of(self))
            }
        }
    };
}

impl PropertyValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            Value::Str(s) => match s.trim() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl PropertyValue for i32 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => i32::try_from(*i).ok(),
            other => other.as_f64().map(|f| f as i32),
        }
    }

    fn to_value(&self) -> Value {
        Value::Int((*self).into())
    }
}

impl PropertyValue for f32 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64().map(|f| f as f32)
    }

    fn to_value(&self) -> Value {
        Value::Float((*self).into())
    }
}

impl PropertyValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl PropertyValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Void | Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl PropertyValue for Option<Object> {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(|o| Some(o.clone()))
    }

    fn to_value(&self) -> Value {
        self.clone().map(Value::Object).unwrap_or_default()
    }
}

impl PropertyValue for Length {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(_) | Value::Float(_) => value.as_f64().map(|px| Length::Px(px as f32)),
            Value::Str(s) => parse::parse_length(s)
                .map_err(|err| tracing::debug!(%err, "malformed length"))
                .ok(),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Length::Px(px) => Value::Float((*px).into()),
            other => Value::Str(other.to_string()),
        }
    }
}

impl PropertyValue for Edges {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(_) | Value::Float(_) => value.as_f64().map(|v| Edges::all(v as f32)),
            Value::Str(s) => parse::parse_edges(s)
                .map_err(|err| tracing::debug!(%err, "malformed edges"))
                .ok(),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        Value::Str(format!("{} {} {} {}", self.top, self.right, self.bottom, self.left))
    }
}

impl PropertyValue for Gap {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(_) | Value::Float(_) => value.as_f64().map(|v| Gap::uniform(v as f32)),
            Value::Str(s) => parse::parse_gap(s)
                .map_err(|err| tracing::debug!(%err, "malformed gap"))
                .ok(),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        Value::Str(format!("{} {}", self.row, self.column))
    }
}

impl PropertyValue for GridSpan {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(line) if *line != 0 => i32::try_from(*line)
                .ok()
                .map(|line| GridSpan::new(GridLine::Line(line), GridLine::Auto)),
            Value::Str(s) => parse::parse_grid_span(s)
                .map_err(|err| tracing::debug!(%err, "malformed grid line"))
                .ok(),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl PropertyValue for Vec<TrackSize> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(_) | Value::Float(_) => {
                value.as_f64().map(|px| vec![TrackSize::Px(px as f32)])
            }
            Value::Str(s) => parse::parse_track_list(s)
                .map_err(|err| tracing::debug!(%err, "malformed track list"))
                .ok(),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        let tracks: Vec<String> = self
            .iter()
            .map(|track| match track {
                TrackSize::Auto => "auto".to_owned(),
                TrackSize::Px(px) => format!("{px}"),
                TrackSize::Percent(pct) => format!("{pct}%"),
                TrackSize::Fr(fr) => format!("{fr}fr"),
            })
            .collect();
        Value::Str(tracks.join(" "))
    }
}

impl PropertyValue for TemplateAreas {
    fn from_value(value: &Value) -> Option<Self> {
        parse::parse_template_areas(value.as_str()?)
            .map_err(|err| tracing::debug!(%err, "malformed template areas"))
            .ok()
    }

    fn to_value(&self) -> Value {
        let rows: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                let cells: Vec<&str> = row.iter().map(|c| c.as_deref().unwrap_or(".")).collect();
                format!("\"{}\"", cells.join(" "))
            })
            .collect();
        Value::Str(rows.join(" "))
    }
}

string_property!(Display, parse::parse_display);
string_property!(SelfAlignment, parse::parse_self_alignment);
string_property!(ItemAlignment, parse::parse_item_alignment);
string_property!(ContentAlignment, parse::parse_content_alignment);
string_property!(FlexDirection, parse::parse_flex_direction);
string_property!(FlexWrap, parse::parse_flex_wrap);
string_property!(AutoFlow, parse::parse_auto_flow);

/// The canonical keyword for a keyword-valued type, derived from its `Debug`
/// name (`SpaceBetween` → `space-between`).
fn keyword_of(value: &impl fmt::Debug) -> String {
    let name = format!("{value:?}");
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Property
// ---------------------------------------------------------------------------

type ChangeCallback = Rc<RefCell<Option<Rc<dyn Fn()>>>>;

/// A typed view over one named value on one node.
///
/// The binding stays registered on the node for as long as the property
/// lives; dropping it removes the listener and its change callback.
pub struct Property<T: PropertyValue> {
    node: Node,
    name: Rc<str>,
    default: T,
    on_change: ChangeCallback,
    _subscription: Subscription,
}

impl<T: PropertyValue> Property<T> {
    /// Bind to `name` on `node`, falling back to `T::default()`.
    pub fn new(node: &Node, name: &str) -> Self {
        Self::with_default(node, name, T::default())
    }

    /// Bind to `name` on `node`, falling back to `default` when the node does
    /// not declare the value. The default is a snapshot: later changes to
    /// whatever produced it do not affect this property.
    pub fn with_default(node: &Node, name: &str, default: T) -> Self {
        let name: Rc<str> = Rc::from(name);
        let on_change: ChangeCallback = Rc::new(RefCell::new(None));

        let watched = name.clone();
        let callback = Rc::downgrade(&on_change);
        let subscription = node.subscribe(ListenScope::Node, move |event| {
            let TreeEvent::PropertyChanged { name, .. } = event else {
                return;
            };
            if name.as_str() != &*watched {
                return;
            }
            let Some(slot) = callback.upgrade() else {
                return;
            };
            let current = slot.borrow().clone();
            if let Some(f) = current {
                f();
            }
        });

        Self {
            node: node.clone(),
            name,
            default,
            on_change,
            _subscription: subscription,
        }
    }

    /// Whether the node currently declares this value.
    pub fn exists(&self) -> bool {
        self.node.contains(&self.name)
    }

    /// The typed value: declared and parsed, `T::default()` if malformed, or
    /// the construction-time default if undeclared.
    pub fn get(&self) -> T {
        match self.node.get(&self.name) {
            None => self.default.clone(),
            Some(value) => T::from_value(&value).unwrap_or_else(|| {
                tracing::debug!(property = &*self.name, %value, "using zero value");
                T::default()
            }),
        }
    }

    /// Write through to the node. Listeners fire only if the stored value
    /// changes.
    pub fn set(&self, value: T) {
        self.node.set(&self.name, value.to_value());
    }

    /// Remove the declaration, reverting to the default.
    pub fn clear(&self) {
        self.node.remove_property(&self.name);
    }

    /// Install (or replace) the callback run synchronously after the value
    /// changes.
    pub fn on_value_change(&self, callback: impl Fn() + 'static) {
        *self.on_change.borrow_mut() = Some(Rc::new(callback));
    }

    /// The bound property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound node.
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// The construction-time default.
    pub fn default_value(&self) -> &T {
        &self.default
    }
}

impl<T: PropertyValue + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &&*self.name)
            .field("value", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tree::{AttributedTree, Element};

    fn node(element: Element) -> (AttributedTree, Node) {
        let tree = AttributedTree::new(element);
        let root = tree.root();
        (tree, root)
    }

    #[test]
    fn undeclared_uses_snapshot_default() {
        let (_tree, root) = node(Element::new("Component"));
        let order = Property::<i32>::with_default(&root, "order", 7);
        assert!(!order.exists());
        assert_eq!(order.get(), 7);
        assert_eq!(*order.default_value(), 7);
    }

    #[test]
    fn declared_value_wins() {
        let (_tree, root) = node(Element::new("Component").with("order", 456));
        let order = Property::<i32>::with_default(&root, "order", 7);
        assert!(order.exists());
        assert_eq!(order.get(), 456);
    }

    #[test]
    fn malformed_reads_zero_value() {
        let (_tree, root) = node(
            Element::new("Component")
                .with("order", "many")
                .with("justify-self", "sideways"),
        );
        assert_eq!(Property::<i32>::with_default(&root, "order", 7).get(), 0);
        assert_eq!(
            Property::<SelfAlignment>::with_default(&root, "justify-self", SelfAlignment::End).get(),
            SelfAlignment::Auto
        );
    }

    #[test]
    fn set_writes_through_and_notifies_once() {
        let (_tree, root) = node(Element::new("Component"));
        let width = Property::<f32>::new(&root, "width");
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        width.on_value_change(move || counter.set(counter.get() + 1));

        width.set(112.0);
        width.set(112.0);
        assert_eq!(root.get("width"), Some(Value::Float(112.0)));
        assert_eq!(width.get(), 112.0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn callback_sees_post_write_state() {
        let (_tree, root) = node(Element::new("Component"));
        let order = Rc::new(Property::<i32>::new(&root, "order"));
        let seen = Rc::new(Cell::new(-1));
        let (weak_order, sink) = (Rc::downgrade(&order), seen.clone());
        order.on_value_change(move || {
            if let Some(order) = weak_order.upgrade() {
                sink.set(order.get());
            }
        });
        root.set("order", 123);
        assert_eq!(seen.get(), 123);
    }

    #[test]
    fn ignores_other_names() {
        let (_tree, root) = node(Element::new("Component"));
        let order = Property::<i32>::new(&root, "order");
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        order.on_value_change(move || counter.set(counter.get() + 1));
        root.set("width", 3);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn dropping_property_deregisters() {
        let (tree, root) = node(Element::new("Component"));
        let order = Property::<i32>::new(&root, "order");
        assert_eq!(tree.listener_count(), 1);
        drop(order);
        assert_eq!(tree.listener_count(), 0);
    }

    #[test]
    fn keyword_round_trip_spelling() {
        assert_eq!(ContentAlignment::SpaceBetween.to_value(), Value::from("space-between"));
        assert_eq!(FlexWrap::NoWrap.to_value(), Value::from("no-wrap"));
        assert_eq!(SelfAlignment::Center.to_value(), Value::from("center"));
    }

    #[test]
    fn numeric_edges_apply_to_all_sides() {
        let (_tree, root) = node(Element::new("Component").with("margin", 45));
        assert_eq!(Property::<Edges>::new(&root, "margin").get(), Edges::all(45.0));
    }

    #[test]
    fn style_objects() {
        let style = Object::new().with("background", "red");
        let (_tree, root) = node(Element::new("Component").with("style", style.clone()));
        assert_eq!(Property::<Option<Object>>::new(&root, "style").get(), Some(style));
        root.set("style", "not an object");
        assert_eq!(Property::<Option<Object>>::new(&root, "style").get(), None);
    }

    #[test]
    fn clear_reverts_to_default() {
        let (_tree, root) = node(Element::new("Component").with("display", "grid"));
        let display = Property::<Display>::with_default(&root, "display", Display::Block);
        assert_eq!(display.get(), Display::Grid);
        display.clear();
        assert_eq!(display.get(), Display::Block);
    }
}
