//! Pilot: programmatic interaction with a headless item tree.
//!
//! The `Pilot` owns an attributed tree and its interpreted items, and provides
//! methods to resize the root, edit the tree, and simulate pointer input, then
//! inspect the resulting geometry and style state.

use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use indexmap::IndexMap;

use crate::event::PointerTracker;
use crate::geometry::{Point, Rect};
use crate::interpreter::Interpreter;
use crate::item::{Canvas, Item};
use crate::tree::{AttributedTree, Element, Node, NodeId, Value};

use super::snapshot::dump_items;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless driver for testing.
///
/// # Examples
///
/// ```ignore
/// use trellis::testing::Pilot;
/// use trellis::tree::Element;
///
/// let mut pilot = Pilot::new(Element::new("Panel").with_child(Element::new("Button").with("id", "ok")));
/// pilot.resize(80, 24);
/// pilot.hover(10, 2);
/// assert!(pilot.is_hovered("ok"));
/// ```
pub struct Pilot {
    tree: AttributedTree,
    root: Item,
    trackers: IndexMap<NodeId, PointerTracker>,
}

impl Pilot {
    /// Build a tree from `element` and interpret it with the default
    /// interpreter.
    pub fn new(element: impl Into<Element>) -> Self {
        Self::with_interpreter(element, &Interpreter::new())
    }

    pub fn with_interpreter(element: impl Into<Element>, interpreter: &Interpreter) -> Self {
        let tree = AttributedTree::new(element);
        let root = interpreter.interpret(&tree.root());
        Self {
            tree,
            root,
            trackers: IndexMap::new(),
        }
    }

    // ── Layout ───────────────────────────────────────────────────────

    /// Give the root item a fixed size and lay everything out.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.root
            .set_bounds(Rect::new(0.0, 0.0, f32::from(width), f32::from(height)));
    }

    /// Size the root from its own properties and lay everything out.
    pub fn perform_layout(&mut self) {
        self.root.perform_layout();
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Simulate the pointer moving to (x, y).
    pub fn hover(&mut self, x: u16, y: u16) {
        self.mouse(MouseEventKind::Moved, x, y);
    }

    /// Simulate a left-button press at (x, y).
    pub fn press(&mut self, x: u16, y: u16) {
        self.mouse(MouseEventKind::Down(MouseButton::Left), x, y);
    }

    /// Simulate a left-button release at (x, y).
    pub fn release(&mut self, x: u16, y: u16) {
        self.mouse(MouseEventKind::Up(MouseButton::Left), x, y);
    }

    /// Simulate a click (press then release) at (x, y).
    pub fn click(&mut self, x: u16, y: u16) {
        self.press(x, y);
        self.release(x, y);
    }

    /// Feed a raw mouse event to every item, in absolute coordinates.
    pub fn mouse(&mut self, kind: MouseEventKind, x: u16, y: u16) {
        let event = MouseEvent {
            kind,
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        };
        let mut placed = Vec::new();
        collect_absolute(&self.root, Point::ZERO, &mut placed);
        for (item, area) in placed {
            let tracker = self.trackers.entry(item.node().id()).or_default();
            for transition in tracker.track(&event, area) {
                item.pointer_event(transition);
            }
        }
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn tree(&self) -> &AttributedTree {
        &self.tree
    }

    pub fn root(&self) -> &Item {
        &self.root
    }

    /// The node with the given `id`.
    pub fn node(&self, id: &str) -> Option<Node> {
        self.tree.root().find_by_id(id)
    }

    /// The item whose node has the given `id`.
    pub fn item(&self, id: &str) -> Option<Item> {
        self.root.find_by_id(id)
    }

    /// Bounds of an item in absolute coordinates.
    pub fn absolute_bounds(&self, id: &str) -> Option<Rect> {
        let mut placed = Vec::new();
        collect_absolute(&self.root, Point::ZERO, &mut placed);
        placed
            .into_iter()
            .find(|(item, _)| item.node().get("id").as_ref().and_then(Value::as_str) == Some(id))
            .map(|(_, area)| area)
    }

    pub fn is_hovered(&self, id: &str) -> bool {
        self.with_canvas(id, |canvas| canvas.style_sheet().interaction().hovered)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.with_canvas(id, |canvas| canvas.style_sheet().interaction().active)
    }

    /// Resolved `background` of an item, `Value::Void` when it has no style
    /// sheet.
    pub fn background(&self, id: &str) -> Value {
        self.with_canvas(id, |canvas| canvas.style_sheet().background())
    }

    /// Outline of the item tree (see [`dump_items`]).
    pub fn dump(&self) -> String {
        dump_items(&self.root)
    }

    fn with_canvas<R: Default>(&self, id: &str, f: impl FnOnce(&Canvas) -> R) -> R {
        let Some(item) = self.item(id) else {
            return R::default();
        };
        let result = item.decorator::<Canvas>().map(|canvas| f(&canvas));
        result.unwrap_or_default()
    }
}

/// Every item with its bounds translated to absolute coordinates, depth first.
fn collect_absolute(item: &Item, origin: Point, out: &mut Vec<(Item, Rect)>) {
    let area = item.bounds().translate(origin);
    out.push((item.clone(), area));
    for child in item.children() {
        collect_absolute(&child, area.origin(), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Object;

    fn pilot() -> Pilot {
        let mut pilot = Pilot::new(
            Element::new("Panel")
                .with("flex-direction", "row")
                .with_child(
                    Element::new("Button")
                        .with("id", "ok")
                        .with("width", 10)
                        .with("style", Object::new().with("background", "grey").with(
                            "hover",
                            Object::new().with("background", "white"),
                        )),
                )
                .with_child(Element::new("Button").with("id", "cancel").with("width", 10)),
        );
        pilot.resize(40, 4);
        pilot
    }

    #[test]
    fn resize_lays_out() {
        let pilot = pilot();
        assert_eq!(pilot.absolute_bounds("ok"), Some(Rect::new(0.0, 0.0, 10.0, 4.0)));
        assert_eq!(pilot.absolute_bounds("cancel"), Some(Rect::new(10.0, 0.0, 10.0, 4.0)));
        assert_eq!(pilot.absolute_bounds("missing"), None);
    }

    #[test]
    fn hover_moves_between_items() {
        let mut pilot = pilot();
        assert_eq!(pilot.background("ok"), Value::from("grey"));

        pilot.hover(3, 1);
        assert!(pilot.is_hovered("ok"));
        assert!(!pilot.is_hovered("cancel"));
        assert_eq!(pilot.background("ok"), Value::from("white"));

        pilot.hover(12, 1);
        assert!(!pilot.is_hovered("ok"));
        assert!(pilot.is_hovered("cancel"));
        assert_eq!(pilot.background("ok"), Value::from("grey"));
    }

    #[test]
    fn press_and_release() {
        let mut pilot = pilot();
        pilot.press(12, 1);
        assert!(pilot.is_active("cancel"));
        pilot.release(12, 1);
        assert!(!pilot.is_active("cancel"));
        assert!(pilot.is_hovered("cancel"));
    }
}
