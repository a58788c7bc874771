//! Node types: NodeId, NodeData, Element.

use indexmap::IndexMap;
use slotmap::new_key_type;

use super::value::Value;

new_key_type! {
    /// Unique identifier for a node in an [`AttributedTree`](super::AttributedTree).
    /// Copy, lightweight (u64).
    pub struct NodeId;
}

/// Data associated with a single node: its type tag and its named values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeData {
    /// Type tag (e.g. "Component", "Text", "Button").
    pub node_type: String,
    /// Declared properties, in declaration order.
    pub properties: IndexMap<String, Value>,
}

impl NodeData {
    /// Create node data with the given type and no properties.
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            properties: IndexMap::new(),
        }
    }

    /// Declare a property (builder).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

/// A detached, declarative description of a subtree.
///
/// Elements are what callers build trees from; appending one to a live node
/// materialises the whole subtree in one step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub data: NodeData,
    pub children: Vec<Element>,
}

impl Element {
    /// Create an element of the given type.
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            data: NodeData::new(node_type),
            children: Vec::new(),
        }
    }

    /// Declare a property (builder).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.properties.insert(name.into(), value.into());
        self
    }

    /// Append a child element (builder).
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Append several child elements (builder).
    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Number of elements in this subtree, including itself.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(Element::len).sum::<usize>()
    }

    /// Always `false`: an element describes at least itself.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl From<NodeData> for Element {
    fn from(data: NodeData) -> Self {
        Self {
            data,
            children: Vec::new(),
        }
    }
}
