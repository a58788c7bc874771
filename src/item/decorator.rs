//! Decorator trait: a capability attached to an [`Item`].
//!
//! Items carry an ordered list of decorators (innermost first). Classification
//! queries ask them from the outside in, and the first one with an opinion
//! wins; hooks are broadcast to all of them.

use std::any::Any;

use crate::event::PointerEvent;
use crate::geometry::{Rect, Size};

use super::Item;

/// A capability layered onto an item.
///
/// Decorators receive the item they are attached to on every hook, so they
/// never need to own a strong reference back to it.
pub trait Decorator: Any {
    /// Short name used in diagnostics and item dumps.
    fn name(&self) -> &'static str;

    /// Whether the item lays out children. `None` defers to inner decorators.
    fn is_container(&self) -> Option<bool> {
        None
    }

    /// Whether the item shows content of its own. `None` defers to inner
    /// decorators.
    fn is_content(&self) -> Option<bool> {
        None
    }

    /// Whether children may be added to the item.
    fn accepts_children(&self) -> bool {
        true
    }

    /// The item's component was given new bounds (possibly equal to `old`).
    fn bounds_changed(&self, _item: &Item, _old: Rect) {}

    /// Size the item needs when laid out with `available` space (infinite on
    /// unbounded axes). `None` defers to inner decorators.
    fn intrinsic_size(&self, _item: &Item, _available: Size) -> Option<Size> {
        None
    }

    /// A pointer transition over the item.
    fn pointer_event(&self, _item: &Item, _event: PointerEvent) {}

    /// Downcast to `&dyn Any` for capability lookup.
    fn as_any(&self) -> &dyn Any;
}
