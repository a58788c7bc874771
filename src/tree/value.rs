//! Dynamically typed property values and shared style objects.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use slotmap::SlotMap;

use super::listener::{ListenerEntry, ListenerId, Subscription};

/// A value stored under a property name on a node or an [`Object`].
///
/// Storage is untyped; typed access goes through
/// [`Property`](crate::property::Property), which parses permissively.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// No value.
    #[default]
    Void,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A shared property bag, compared by identity.
    Object(Object),
}

impl Value {
    /// Whether this is [`Value::Void`].
    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view: ints and floats directly, strings when they parse.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Str(s) => s.trim().parse().ok(),
            Value::Void | Value::Object(_) => None,
        }
    }

    /// Borrow the object payload, if this is an object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => f.write_str(s),
            Value::Object(o) => write!(f, "[object; {} properties]", o.len()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

// ---------------------------------------------------------------------------
// Object
// ---------------------------------------------------------------------------

/// Callback invoked with the name of the object property that changed.
type ObjectCallback = dyn Fn(&str);

struct ObjectInner {
    properties: RefCell<IndexMap<String, Value>>,
    listeners: Rc<RefCell<SlotMap<ListenerId, ListenerEntry<ObjectCallback>>>>,
}

/// A named, reusable property bag shared between nodes (e.g. a `style`).
///
/// Cloning is cheap and yields a handle to the same bag; equality is identity.
#[derive(Clone)]
pub struct Object {
    inner: Rc<ObjectInner>,
}

impl Object {
    /// Create an empty object.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ObjectInner {
                properties: RefCell::new(IndexMap::new()),
                listeners: Rc::new(RefCell::new(SlotMap::with_key())),
            }),
        }
    }

    /// Set a property (builder). Does not notify; the object has no listeners yet.
    pub fn with(self, name: &str, value: impl Into<Value>) -> Self {
        self.inner
            .properties
            .borrow_mut()
            .insert(name.to_owned(), value.into());
        self
    }

    /// Read a property.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.inner.properties.borrow().get(name).cloned()
    }

    /// Whether the property is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.properties.borrow().contains_key(name)
    }

    /// Number of declared properties.
    pub fn len(&self) -> usize {
        self.inner.properties.borrow().len()
    }

    /// Whether no properties are declared.
    pub fn is_empty(&self) -> bool {
        self.inner.properties.borrow().is_empty()
    }

    /// Write a property, notifying listeners if the value changed.
    pub fn set(&self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        {
            let mut props = self.inner.properties.borrow_mut();
            if props.get(name) == Some(&value) {
                return;
            }
            props.insert(name.to_owned(), value);
        }
        self.notify(name);
    }

    /// Remove a property, notifying listeners if it was declared.
    pub fn remove(&self, name: &str) {
        let removed = self.inner.properties.borrow_mut().shift_remove(name);
        if removed.is_some() {
            self.notify(name);
        }
    }

    /// Listen for property changes. The listener lives as long as the returned
    /// [`Subscription`].
    pub fn subscribe(&self, callback: impl Fn(&str) + 'static) -> Subscription {
        let entry = ListenerEntry::new(Rc::new(callback) as Rc<ObjectCallback>);
        let alive = entry.alive_flag();
        let id = self.inner.listeners.borrow_mut().insert(entry);
        let registry = Rc::downgrade(&self.inner.listeners);
        Subscription::new(alive, move || {
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().remove(id);
            }
        })
    }

    /// Number of live listeners (diagnostics and tests).
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn notify(&self, name: &str) {
        let callbacks: Vec<_> = self
            .inner
            .listeners
            .borrow()
            .values()
            .map(ListenerEntry::snapshot)
            .collect();
        for (alive, callback) in callbacks {
            if alive.get() {
                callback(name);
            }
        }
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.inner.properties.borrow().iter())
            .finish()
    }
}
