//! Block child adapter: explicit `x` / `y` positioning.

use std::any::Any;

use crate::config::LayoutDefaults;
use crate::geometry::Rect;
use crate::item::{Decorator, Item};
use crate::property::{Length, Property};

use super::sizing::{invalidate_parent_on_change, SizeProperties, Sizing};
use super::LayoutStrategy;

/// Position and size of one block child, relative to the parent content box.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockItemGeometry {
    pub x: f32,
    pub y: f32,
    pub sizing: Sizing,
}

/// Decorator for children of block containers.
pub struct BlockItem {
    pub x: Property<Length>,
    pub y: Property<Length>,
    pub size: SizeProperties,
}

impl BlockItem {
    pub fn new(item: &Item, defaults: &LayoutDefaults) -> Self {
        let node = item.node();
        let block_item = Self {
            x: Property::with_default(node, "x", Length::Px(0.0)),
            y: Property::with_default(node, "y", Length::Px(0.0)),
            size: SizeProperties::new(node, defaults),
        };
        invalidate_parent_on_change(&block_item.x);
        invalidate_parent_on_change(&block_item.y);
        block_item.size.invalidate_parent_on_change();
        block_item
    }

    pub fn geometry(&self, parent_content: Rect, strategy: LayoutStrategy) -> BlockItemGeometry {
        BlockItemGeometry {
            x: self.x.get().resolve(parent_content.width).unwrap_or(0.0),
            y: self.y.get().resolve(parent_content.height).unwrap_or(0.0),
            sizing: self.size.resolve(parent_content, strategy),
        }
    }
}

impl Decorator for BlockItem {
    fn name(&self) -> &'static str {
        "BlockItem"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{component_ref, BasicComponent};
    use crate::tree::{AttributedTree, Element};

    #[test]
    fn position_resolves_against_parent_content() {
        let tree = AttributedTree::new(
            Element::new("Component")
                .with_child(Element::new("C").with("x", "25%").with("y", 7)),
        );
        let item = Item::new(
            tree.root().child(0).unwrap(),
            component_ref(BasicComponent::new("C")),
        );
        let block_item = BlockItem::new(&item, &LayoutDefaults::default());
        let geometry = block_item.geometry(Rect::new(0.0, 0.0, 200.0, 100.0), LayoutStrategy::Real);
        assert_eq!(geometry.x, 50.0);
        assert_eq!(geometry.y, 7.0);

        item.node().set("x", "auto");
        let geometry = block_item.geometry(Rect::new(0.0, 0.0, 200.0, 100.0), LayoutStrategy::Real);
        assert_eq!(geometry.x, 0.0);
    }
}
