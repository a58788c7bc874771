//! Grid child adapter.
//!
//! [`GridItem`] holds the grid placement properties of a child of a
//! `display: grid` container and turns them into a [`GridItemGeometry`].

use std::any::Any;

use crate::config::LayoutDefaults;
use crate::geometry::Rect;
use crate::item::{Decorator, Item};
use crate::property::{GridSpan, Property, SelfAlignment};

use super::sizing::{invalidate_parent_on_change, SizeProperties, Sizing};
use super::LayoutStrategy;

/// Placement of one grid child, ready for the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct GridItemGeometry {
    pub order: i32,
    pub justify_self: SelfAlignment,
    pub align_self: SelfAlignment,
    pub column: GridSpan,
    pub row: GridSpan,
    /// Named area; empty when unset.
    pub area: String,
    pub sizing: Sizing,
}

/// Decorator for children of grid containers.
pub struct GridItem {
    pub order: Property<i32>,
    pub justify_self: Property<SelfAlignment>,
    pub align_self: Property<SelfAlignment>,
    pub column: Property<GridSpan>,
    pub row: Property<GridSpan>,
    pub area: Property<String>,
    pub size: SizeProperties,
}

impl GridItem {
    pub fn new(item: &Item, defaults: &LayoutDefaults) -> Self {
        let node = item.node();
        let grid_item = Self {
            order: Property::with_default(node, "order", defaults.order),
            justify_self: Property::with_default(node, "justify-self", defaults.justify_self),
            align_self: Property::with_default(node, "align-self", defaults.align_self),
            column: Property::with_default(node, "grid-column", defaults.grid_column),
            row: Property::with_default(node, "grid-row", defaults.grid_row),
            area: Property::with_default(node, "grid-area", defaults.grid_area.clone()),
            size: SizeProperties::new(node, defaults),
        };
        invalidate_parent_on_change(&grid_item.order);
        invalidate_parent_on_change(&grid_item.justify_self);
        invalidate_parent_on_change(&grid_item.align_self);
        invalidate_parent_on_change(&grid_item.column);
        invalidate_parent_on_change(&grid_item.row);
        invalidate_parent_on_change(&grid_item.area);
        grid_item.size.invalidate_parent_on_change();
        grid_item
    }

    /// Build the geometry primitive for the current property values.
    pub fn geometry(&self, parent_content: Rect, strategy: LayoutStrategy) -> GridItemGeometry {
        let (justify_self, align_self) = match strategy {
            LayoutStrategy::Real => (self.justify_self.get(), self.align_self.get()),
            LayoutStrategy::Dummy => (SelfAlignment::Stretch, SelfAlignment::Stretch),
        };
        GridItemGeometry {
            order: self.order.get(),
            justify_self,
            align_self,
            column: self.column.get(),
            row: self.row.get(),
            area: self.area.get(),
            sizing: self.size.resolve(parent_content, strategy),
        }
    }
}

impl Decorator for GridItem {
    fn name(&self) -> &'static str {
        "GridItem"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
