//! Layout: child adapters, solver style resolution and the taffy engine.
//!
//! Every child of a container carries one adapter ([`GridItem`], [`FlexItem`]
//! or [`BlockItem`]) chosen by the container's `display`. Adapters turn the
//! child's properties into a geometry primitive; the container collects the
//! primitives, [`resolve`] maps them to taffy styles and [`LayoutEngine`]
//! solves one container at a time.

pub mod block;
pub mod engine;
pub mod flex;
pub mod grid;
pub mod resolve;
pub mod sizing;

use crate::geometry::{Edges, Rect};
use crate::item::Item;
use crate::property::{
    AutoFlow, ContentAlignment, Display, FlexDirection, FlexWrap, Gap, ItemAlignment,
    TemplateAreas, TrackSize,
};

pub use block::{BlockItem, BlockItemGeometry};
pub use engine::{LayoutEngine, Solved};
pub use flex::{FlexItem, FlexItemGeometry};
pub use grid::{GridItem, GridItemGeometry};
pub use sizing::{SizeProperties, Sizing};

/// Which pass a geometry primitive is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutStrategy {
    /// Final placement: alignment and sizes verbatim.
    #[default]
    Real,
    /// Provisional measuring pass: children stretch, and an unset size
    /// takes its minimum.
    Dummy,
}

/// Container-side layout properties, ready for the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerGeometry {
    pub display: Display,
    pub padding: Edges,
    pub gap: Gap,
    pub template_columns: Vec<TrackSize>,
    pub template_rows: Vec<TrackSize>,
    pub template_areas: TemplateAreas,
    pub auto_flow: AutoFlow,
    pub auto_columns: Vec<TrackSize>,
    pub auto_rows: Vec<TrackSize>,
    pub flex_direction: FlexDirection,
    pub flex_wrap: FlexWrap,
    pub justify_content: ContentAlignment,
    pub align_content: ContentAlignment,
    pub justify_items: ItemAlignment,
    pub align_items: ItemAlignment,
}

impl Default for ContainerGeometry {
    fn default() -> Self {
        Self {
            display: Display::Flex,
            padding: Edges::ZERO,
            gap: Gap::default(),
            template_columns: Vec::new(),
            template_rows: Vec::new(),
            template_areas: TemplateAreas::default(),
            auto_flow: AutoFlow::Row,
            auto_columns: Vec::new(),
            auto_rows: Vec::new(),
            flex_direction: FlexDirection::Column,
            flex_wrap: FlexWrap::NoWrap,
            justify_content: ContentAlignment::Normal,
            align_content: ContentAlignment::Normal,
            justify_items: ItemAlignment::Normal,
            align_items: ItemAlignment::Normal,
        }
    }
}

/// The geometry primitive of one child, whichever adapter it carries.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildGeometry {
    Grid(GridItemGeometry),
    Flex(FlexItemGeometry),
    Block(BlockItemGeometry),
    /// The child carries no adapter; the solver sizes it from its content.
    Unplaced,
}

impl ChildGeometry {
    /// Document-order override; children are solved sorted by this.
    pub fn order(&self) -> i32 {
        match self {
            ChildGeometry::Grid(g) => g.order,
            ChildGeometry::Flex(f) => f.order,
            ChildGeometry::Block(_) | ChildGeometry::Unplaced => 0,
        }
    }

    pub fn sizing(&self) -> Option<&Sizing> {
        match self {
            ChildGeometry::Grid(g) => Some(&g.sizing),
            ChildGeometry::Flex(f) => Some(&f.sizing),
            ChildGeometry::Block(b) => Some(&b.sizing),
            ChildGeometry::Unplaced => None,
        }
    }
}

/// Build the primitive for `child` from whichever adapter it carries.
pub fn child_geometry(child: &Item, parent_content: Rect, strategy: LayoutStrategy) -> ChildGeometry {
    if let Some(grid) = child.decorator::<GridItem>() {
        return ChildGeometry::Grid(grid.geometry(parent_content, strategy));
    }
    if let Some(flex) = child.decorator::<FlexItem>() {
        return ChildGeometry::Flex(flex.geometry(parent_content, strategy));
    }
    if let Some(block) = child.decorator::<BlockItem>() {
        return ChildGeometry::Block(block.geometry(parent_content, strategy));
    }
    ChildGeometry::Unplaced
}
