//! Size constraints shared by every child adapter.

use crate::config::LayoutDefaults;
use crate::geometry::{Edges, Rect};
use crate::property::{Length, Property, PropertyValue};
use crate::tree::Node;

use super::LayoutStrategy;

/// Resolved size constraints of one child, in pixels.
///
/// `None` means unassigned: the solver sizes that axis itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sizing {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub min_width: f32,
    pub min_height: f32,
    pub max_width: Option<f32>,
    pub max_height: Option<f32>,
    pub margin: Edges,
}

impl Default for Sizing {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            min_width: 0.0,
            min_height: 0.0,
            max_width: None,
            max_height: None,
            margin: Edges::ZERO,
        }
    }
}

impl Sizing {
    /// Substitute the minimum for an unassigned size on each axis.
    fn fill_from_minimums(&mut self) {
        if self.width.is_none() && self.min_width > 0.0 {
            self.width = Some(self.min_width);
        }
        if self.height.is_none() && self.min_height > 0.0 {
            self.height = Some(self.min_height);
        }
    }
}

/// The `width`, `height`, `min-*`, `max-*` and `margin` properties of a child.
pub struct SizeProperties {
    pub width: Property<Length>,
    pub height: Property<Length>,
    pub min_width: Property<Length>,
    pub min_height: Property<Length>,
    pub max_width: Property<Length>,
    pub max_height: Property<Length>,
    pub margin: Property<Edges>,
}

impl SizeProperties {
    pub fn new(node: &Node, defaults: &LayoutDefaults) -> Self {
        Self {
            width: Property::with_default(node, "width", defaults.width),
            height: Property::with_default(node, "height", defaults.height),
            min_width: Property::with_default(node, "min-width", defaults.min_width),
            min_height: Property::with_default(node, "min-height", defaults.min_height),
            max_width: Property::with_default(node, "max-width", defaults.max_width),
            max_height: Property::with_default(node, "max-height", defaults.max_height),
            margin: Property::with_default(node, "margin", defaults.margin),
        }
    }

    /// Invalidate the parent's box model whenever any of these change.
    pub fn invalidate_parent_on_change(&self) {
        invalidate_parent_on_change(&self.width);
        invalidate_parent_on_change(&self.height);
        invalidate_parent_on_change(&self.min_width);
        invalidate_parent_on_change(&self.min_height);
        invalidate_parent_on_change(&self.max_width);
        invalidate_parent_on_change(&self.max_height);
        invalidate_parent_on_change(&self.margin);
    }

    /// Resolve against the parent's content box.
    pub fn resolve(&self, parent_content: Rect, strategy: LayoutStrategy) -> Sizing {
        let (w, h) = (parent_content.width, parent_content.height);
        let mut sizing = Sizing {
            width: self.width.get().resolve(w),
            height: self.height.get().resolve(h),
            min_width: self.min_width.get().resolve(w).unwrap_or(0.0),
            min_height: self.min_height.get().resolve(h).unwrap_or(0.0),
            max_width: self.max_width.get().resolve(w),
            max_height: self.max_height.get().resolve(h),
            margin: self.margin.get(),
        };
        if strategy == LayoutStrategy::Dummy {
            sizing.fill_from_minimums();
        }
        sizing
    }
}

/// Write `box-model-valid = false` on the bound node's parent whenever
/// `property` changes.
pub fn invalidate_parent_on_change<T: PropertyValue>(property: &Property<T>) {
    let node = property.node().clone();
    let name = property.name().to_owned();
    property.on_value_change(move || {
        if let Some(parent) = node.parent() {
            tracing::trace!(property = %name, "invalidating parent box model");
            parent.set("box-model-valid", false);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{AttributedTree, Element};

    fn sizing(element: Element, strategy: LayoutStrategy) -> Sizing {
        let tree = AttributedTree::new(element);
        SizeProperties::new(&tree.root(), &LayoutDefaults::default())
            .resolve(Rect::new(0.0, 0.0, 200.0, 100.0), strategy)
    }

    #[test]
    fn unassigned_by_default() {
        assert_eq!(sizing(Element::new("C"), LayoutStrategy::Real), Sizing::default());
    }

    #[test]
    fn percentages_resolve_against_parent_content() {
        let s = sizing(
            Element::new("C").with("width", "50%").with("max-height", "25%"),
            LayoutStrategy::Real,
        );
        assert_eq!(s.width, Some(100.0));
        assert_eq!(s.max_height, Some(25.0));
    }

    #[test]
    fn dummy_substitutes_minimums() {
        let element = Element::new("C").with("min-width", 30).with("min-height", 0);
        let real = sizing(element.clone(), LayoutStrategy::Real);
        assert_eq!(real.width, None);

        let dummy = sizing(element, LayoutStrategy::Dummy);
        assert_eq!(dummy.width, Some(30.0));
        assert_eq!(dummy.height, None);
    }

    #[test]
    fn dummy_keeps_explicit_sizes() {
        let s = sizing(
            Element::new("C").with("width", 10).with("min-width", 30),
            LayoutStrategy::Dummy,
        );
        assert_eq!(s.width, Some(10.0));
    }

    #[test]
    fn changes_invalidate_parent() {
        let tree = AttributedTree::new(Element::new("Parent").with_child(Element::new("Child")));
        let child = tree.root().child(0).unwrap();
        let props = SizeProperties::new(&child, &LayoutDefaults::default());
        props.invalidate_parent_on_change();

        tree.root().set("box-model-valid", true);
        child.set("margin", "1 2");
        assert_eq!(tree.root().get("box-model-valid"), Some(false.into()));
    }
}
