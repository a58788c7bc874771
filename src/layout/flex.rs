//! Flex child adapter.

use std::any::Any;

use crate::config::LayoutDefaults;
use crate::geometry::Rect;
use crate::item::{Decorator, Item};
use crate::property::{Length, Property, SelfAlignment};

use super::sizing::{invalidate_parent_on_change, SizeProperties, Sizing};
use super::LayoutStrategy;

/// Flex factors and alignment of one flex child, ready for the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct FlexItemGeometry {
    pub order: i32,
    pub align_self: SelfAlignment,
    pub flex_grow: f32,
    pub flex_shrink: f32,
    /// Left unresolved; percentages refer to the container's main axis.
    pub flex_basis: Length,
    pub sizing: Sizing,
}

/// Decorator for children of flex containers.
pub struct FlexItem {
    pub order: Property<i32>,
    pub align_self: Property<SelfAlignment>,
    pub flex_grow: Property<f32>,
    pub flex_shrink: Property<f32>,
    pub flex_basis: Property<Length>,
    pub size: SizeProperties,
}

impl FlexItem {
    pub fn new(item: &Item, defaults: &LayoutDefaults) -> Self {
        let node = item.node();
        let flex_item = Self {
            order: Property::with_default(node, "order", defaults.order),
            align_self: Property::with_default(node, "align-self", defaults.align_self),
            flex_grow: Property::with_default(node, "flex-grow", defaults.flex_grow),
            flex_shrink: Property::with_default(node, "flex-shrink", defaults.flex_shrink),
            flex_basis: Property::with_default(node, "flex-basis", defaults.flex_basis),
            size: SizeProperties::new(node, defaults),
        };
        invalidate_parent_on_change(&flex_item.order);
        invalidate_parent_on_change(&flex_item.align_self);
        invalidate_parent_on_change(&flex_item.flex_grow);
        invalidate_parent_on_change(&flex_item.flex_shrink);
        invalidate_parent_on_change(&flex_item.flex_basis);
        flex_item.size.invalidate_parent_on_change();
        flex_item
    }

    pub fn geometry(&self, parent_content: Rect, strategy: LayoutStrategy) -> FlexItemGeometry {
        let align_self = match strategy {
            LayoutStrategy::Real => self.align_self.get(),
            LayoutStrategy::Dummy => SelfAlignment::Stretch,
        };
        FlexItemGeometry {
            order: self.order.get(),
            align_self,
            flex_grow: self.flex_grow.get(),
            flex_shrink: self.flex_shrink.get(),
            flex_basis: self.flex_basis.get(),
            sizing: self.size.resolve(parent_content, strategy),
        }
    }
}

impl Decorator for FlexItem {
    fn name(&self) -> &'static str {
        "FlexItem"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
