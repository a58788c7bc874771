//! Content capability: a node that shows something of its own instead of
//! laying out children.

use std::any::Any;

use super::Decorator;

/// Marks an item as content. Its size comes from the component's preferred
/// size.
#[derive(Debug, Default)]
pub struct ContentItem;

impl Decorator for ContentItem {
    fn name(&self) -> &'static str {
        "ContentItem"
    }

    fn is_container(&self) -> Option<bool> {
        Some(false)
    }

    fn is_content(&self) -> Option<bool> {
        Some(true)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
