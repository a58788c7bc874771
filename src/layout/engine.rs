//! TaffyTree wrapper for layout computation.
//!
//! [`LayoutEngine`] solves one container at a time: the container becomes the
//! taffy root and each child a measured leaf whose context is its index in
//! document order. Grandchildren are not part of the solve; a child that is a
//! container itself answers the measure hook with its own dummy pass.

use taffy::prelude::*;

use crate::geometry::{Rect, Size};

use super::resolve::{child_style, container_style};
use super::{ChildGeometry, ContainerGeometry};

/// The outcome of one solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solved {
    /// Border-box size of the container.
    pub size: Size,
    /// One rectangle per child in document order, relative to the
    /// container's border box.
    pub rects: Vec<Rect>,
}

impl Solved {
    fn empty(children: usize) -> Self {
        Self {
            size: Size::ZERO,
            rects: vec![Rect::EMPTY; children],
        }
    }
}

/// Wraps a [`TaffyTree`] whose leaves carry the child index as context.
pub struct LayoutEngine {
    tree: TaffyTree<usize>,
}

impl LayoutEngine {
    /// Create a new, empty layout engine.
    pub fn new() -> Self {
        let mut tree = TaffyTree::new();
        tree.disable_rounding();
        Self { tree }
    }

    /// Solve `container` with `children`.
    ///
    /// `size` fixes the container's border box; `None` sizes it from its
    /// content within `available` (infinite on unbounded axes). `measure`
    /// is asked for the size of child `index` given the space it may use.
    ///
    /// Children are placed in ascending `order`, ties in document order.
    /// Solver errors are logged and yield empty rectangles.
    pub fn solve(
        &mut self,
        container: &ContainerGeometry,
        children: &[ChildGeometry],
        size: Option<Size>,
        available: Size,
        measure: impl FnMut(usize, Size) -> Size,
    ) -> Solved {
        self.tree.clear();
        match self.try_solve(container, children, size, available, measure) {
            Ok(solved) => solved,
            Err(err) => {
                tracing::warn!(%err, "layout solver failed");
                Solved::empty(children.len())
            }
        }
    }

    fn try_solve(
        &mut self,
        container: &ContainerGeometry,
        children: &[ChildGeometry],
        size: Option<Size>,
        available: Size,
        mut measure: impl FnMut(usize, Size) -> Size,
    ) -> taffy::TaffyResult<Solved> {
        let mut placement: Vec<usize> = (0..children.len()).collect();
        placement.sort_by_key(|&index| children[index].order());

        let mut leaves = Vec::with_capacity(children.len());
        for &index in &placement {
            let style = child_style(&children[index], container);
            leaves.push(self.tree.new_leaf_with_context(style, index)?);
        }
        let root = self
            .tree
            .new_with_children(container_style(container, size), &leaves)?;

        let space = taffy::geometry::Size {
            width: available_space(available.width),
            height: available_space(available.height),
        };
        self.tree.compute_layout_with_measure(
            root,
            space,
            |known, available, _node, context: Option<&mut usize>, _style| {
                let Some(index) = context.map(|index| *index) else {
                    return taffy::geometry::Size::ZERO;
                };
                if let (Some(width), Some(height)) = (known.width, known.height) {
                    return taffy::geometry::Size { width, height };
                }
                let space = Size::new(
                    known.width.unwrap_or_else(|| definite_or_unbounded(available.width)),
                    known.height.unwrap_or_else(|| definite_or_unbounded(available.height)),
                );
                let measured = measure(index, space);
                taffy::geometry::Size {
                    width: known.width.unwrap_or(measured.width),
                    height: known.height.unwrap_or(measured.height),
                }
            },
        )?;

        let root_layout = self.tree.layout(root)?;
        let mut solved = Solved {
            size: Size::new(root_layout.size.width, root_layout.size.height),
            rects: vec![Rect::EMPTY; children.len()],
        };
        for (&leaf, &index) in leaves.iter().zip(&placement) {
            let layout = self.tree.layout(leaf)?;
            solved.rects[index] = Rect::new(
                layout.location.x,
                layout.location.y,
                layout.size.width,
                layout.size.height,
            );
        }
        Ok(solved)
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn available_space(extent: f32) -> AvailableSpace {
    if extent.is_finite() {
        AvailableSpace::Definite(extent)
    } else {
        AvailableSpace::MaxContent
    }
}

/// Content-based sizing is measured unbounded.
fn definite_or_unbounded(space: AvailableSpace) -> f32 {
    match space {
        AvailableSpace::Definite(extent) => extent,
        AvailableSpace::MinContent | AvailableSpace::MaxContent => f32::INFINITY,
    }
}
