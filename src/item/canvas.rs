//! Canvas capability: owns the item's [`StyleSheet`] and feeds it geometry
//! and pointer changes.

use std::any::Any;

use crate::event::PointerEvent;
use crate::geometry::Rect;
use crate::style::{InvalidationReason, StyleSheet};
use crate::tree::Node;

use super::{Decorator, Item};

pub struct Canvas {
    style_sheet: StyleSheet,
}

impl Canvas {
    /// `root` bounds the style cascade.
    pub fn new(item: &Item, root: &Node) -> Self {
        Self {
            style_sheet: StyleSheet::new(&item.component(), item.node(), root),
        }
    }

    pub fn style_sheet(&self) -> &StyleSheet {
        &self.style_sheet
    }
}

impl Decorator for Canvas {
    fn name(&self) -> &'static str {
        "Canvas"
    }

    fn bounds_changed(&self, item: &Item, old: Rect) {
        if item.bounds() != old {
            self.style_sheet.invalidate(InvalidationReason::BoundsChanged);
        }
    }

    fn pointer_event(&self, _item: &Item, event: PointerEvent) {
        self.style_sheet.pointer_event(event);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
