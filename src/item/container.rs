//! Container capability: lays out children through the layout engine.

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use crate::geometry::{Edges, Rect, Size};
use crate::layout::{child_geometry, ContainerGeometry, LayoutEngine, LayoutStrategy};
use crate::property::{
    AutoFlow, ContentAlignment, Display, FlexDirection, FlexWrap, Gap, ItemAlignment, Property,
    PropertyValue, TemplateAreas, TrackSize,
};
use crate::tree::Node;

use super::{Decorator, Item, WeakItem};

/// Name of the flag containers keep on their node. `false` means the
/// children's geometry is stale.
pub const BOX_MODEL_VALID: &str = "box-model-valid";

/// Container-side layout properties of a `flex`, `grid` or `block` node.
pub struct ContainerItem {
    pub display: Property<Display>,
    pub padding: Property<Edges>,
    pub gap: Property<Gap>,
    pub template_columns: Property<Vec<TrackSize>>,
    pub template_rows: Property<Vec<TrackSize>>,
    pub template_areas: Property<TemplateAreas>,
    pub auto_flow: Property<AutoFlow>,
    pub auto_columns: Property<Vec<TrackSize>>,
    pub auto_rows: Property<Vec<TrackSize>>,
    pub flex_direction: Property<FlexDirection>,
    pub flex_wrap: Property<FlexWrap>,
    pub justify_content: Property<ContentAlignment>,
    pub align_content: Property<ContentAlignment>,
    pub justify_items: Property<ItemAlignment>,
    pub align_items: Property<ItemAlignment>,
    pub box_model_valid: Property<bool>,
    laying_out: Rc<Cell<bool>>,
}

impl ContainerItem {
    /// `display` is the mode used when the node declares none.
    pub fn new(item: &Item, display: Display) -> Self {
        let node = item.node();
        let container = Self {
            display: Property::with_default(node, "display", display),
            padding: Property::new(node, "padding"),
            gap: Property::new(node, "gap"),
            template_columns: Property::new(node, "grid-template-columns"),
            template_rows: Property::new(node, "grid-template-rows"),
            template_areas: Property::new(node, "grid-template-areas"),
            auto_flow: Property::new(node, "grid-auto-flow"),
            auto_columns: Property::new(node, "grid-auto-columns"),
            auto_rows: Property::new(node, "grid-auto-rows"),
            flex_direction: Property::new(node, "flex-direction"),
            flex_wrap: Property::new(node, "flex-wrap"),
            justify_content: Property::new(node, "justify-content"),
            align_content: Property::new(node, "align-content"),
            justify_items: Property::new(node, "justify-items"),
            align_items: Property::new(node, "align-items"),
            box_model_valid: Property::new(node, BOX_MODEL_VALID),
            laying_out: Rc::new(Cell::new(false)),
        };

        invalidate_on_change(&container.display);
        invalidate_on_change(&container.padding);
        invalidate_on_change(&container.gap);
        invalidate_on_change(&container.template_columns);
        invalidate_on_change(&container.template_rows);
        invalidate_on_change(&container.template_areas);
        invalidate_on_change(&container.auto_flow);
        invalidate_on_change(&container.auto_columns);
        invalidate_on_change(&container.auto_rows);
        invalidate_on_change(&container.flex_direction);
        invalidate_on_change(&container.flex_wrap);
        invalidate_on_change(&container.justify_content);
        invalidate_on_change(&container.align_content);
        invalidate_on_change(&container.justify_items);
        invalidate_on_change(&container.align_items);

        let weak = item.downgrade();
        let laying_out = container.laying_out.clone();
        let valid = node.clone();
        container.box_model_valid.on_value_change(move || {
            if laying_out.get() || is_valid(&valid) {
                return;
            }
            relayout(&weak);
        });
        container
    }

    /// Whether the children's geometry is up to date.
    pub fn is_box_model_valid(&self) -> bool {
        self.box_model_valid.get()
    }

    /// Mark the children's geometry stale.
    pub fn invalidate(&self) {
        self.box_model_valid.set(false);
    }

    /// Snapshot of the container-side properties.
    pub fn geometry(&self) -> ContainerGeometry {
        ContainerGeometry {
            display: self.display.get(),
            padding: self.padding.get(),
            gap: self.gap.get(),
            template_columns: self.template_columns.get(),
            template_rows: self.template_rows.get(),
            template_areas: self.template_areas.get(),
            auto_flow: self.auto_flow.get(),
            auto_columns: self.auto_columns.get(),
            auto_rows: self.auto_rows.get(),
            flex_direction: self.flex_direction.get(),
            flex_wrap: self.flex_wrap.get(),
            justify_content: self.justify_content.get(),
            align_content: self.align_content.get(),
            justify_items: self.justify_items.get(),
            align_items: self.align_items.get(),
        }
    }

    /// Solve the children within the item's current bounds and write their
    /// bounds back. Children that are containers lay out their own children
    /// in turn.
    pub fn layout(&self, item: &Item) {
        if self.laying_out.replace(true) {
            return;
        }
        self.box_model_valid.set(true);

        let bounds = item.bounds();
        let container = self.geometry();
        let content = bounds.size().to_rect().shrink(container.padding);
        let children = item.children();
        let primitives: Vec<_> = children
            .iter()
            .map(|child| child_geometry(child, content, LayoutStrategy::Real))
            .collect();
        let solved = LayoutEngine::new().solve(
            &container,
            &primitives,
            Some(bounds.size()),
            bounds.size(),
            |index, available| children[index].intrinsic_size(available),
        );
        tracing::debug!(
            node = %item.node().node_type(),
            width = bounds.width,
            height = bounds.height,
            children = children.len(),
            "layout"
        );

        for (child, rect) in children.iter().zip(solved.rects) {
            child.set_bounds(rect);
        }
        self.laying_out.set(false);
    }

    /// Size the container needs for its children: a dummy pass where children
    /// stretch and take their minimum sizes.
    pub fn measure(&self, item: &Item, available: Size) -> Size {
        let container = self.geometry();
        let basis = Size::new(finite_or_zero(available.width), finite_or_zero(available.height));
        let content = basis.to_rect().shrink(container.padding);
        let children = item.children();
        let primitives: Vec<_> = children
            .iter()
            .map(|child| child_geometry(child, content, LayoutStrategy::Dummy))
            .collect();
        LayoutEngine::new()
            .solve(&container, &primitives, None, available, |index, space| {
                children[index].intrinsic_size(space)
            })
            .size
    }
}

impl Decorator for ContainerItem {
    fn name(&self) -> &'static str {
        "ContainerItem"
    }

    fn is_container(&self) -> Option<bool> {
        Some(true)
    }

    fn is_content(&self) -> Option<bool> {
        Some(false)
    }

    fn bounds_changed(&self, item: &Item, old: Rect) {
        let bounds = item.bounds();
        if bounds.is_empty() {
            return;
        }
        if old.size() != bounds.size() || !self.is_box_model_valid() {
            self.layout(item);
        }
    }

    fn intrinsic_size(&self, item: &Item, available: Size) -> Option<Size> {
        Some(self.measure(item, available))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A container property changed: its own children and, through its size,
/// its parent's layout are stale.
fn invalidate_on_change<T: PropertyValue>(property: &Property<T>) {
    let node = property.node().clone();
    property.on_value_change(move || {
        node.set(BOX_MODEL_VALID, false);
        if let Some(parent) = node.parent() {
            parent.set(BOX_MODEL_VALID, false);
        }
    });
}

fn is_valid(node: &Node) -> bool {
    node.get(BOX_MODEL_VALID)
        .and_then(|value| bool::from_value(&value))
        .unwrap_or(false)
}

fn relayout(weak: &WeakItem) {
    let Some(item) = weak.upgrade() else {
        return;
    };
    if item.bounds().is_empty() {
        return;
    }
    tracing::trace!(node = %item.node().node_type(), "box model invalidated");
    item.update_layout();
}

fn finite_or_zero(extent: f32) -> f32 {
    if extent.is_finite() {
        extent
    } else {
        0.0
    }
}
