//! Snapshot rendering helpers.
//!
//! Functions for converting an item tree into plain-text strings suitable for
//! snapshot testing and assertions.

use std::fmt::Write;

use crate::geometry::Rect;
use crate::item::Item;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render an item tree as an indented outline.
///
/// Each item becomes one line: its node type, its `id` when declared, its
/// decorators (innermost first) and its bounds relative to the parent. Children
/// are indented by two spaces. The final line does not have a trailing
/// newline.
///
/// # Examples
///
/// ```ignore
/// use trellis::testing::dump_items;
///
/// let root = Interpreter::new().interpret(&tree.root());
/// root.perform_layout();
/// insta::assert_snapshot!(dump_items(&root));
/// ```
pub fn dump_items(root: &Item) -> String {
    let mut lines = Vec::new();
    dump_into(root, 0, &mut lines);
    lines.join("\n")
}

/// Render just the bounds of every item, one per line, depth first.
pub fn dump_bounds(root: &Item) -> String {
    let mut lines = Vec::new();
    walk(root, 0, &mut |item, depth| {
        lines.push(format!("{}{}", "  ".repeat(depth), format_rect(item.bounds())));
    });
    lines.join("\n")
}

/// Format a rectangle as `x,y wxh`, dropping fractional zeros.
pub fn format_rect(rect: Rect) -> String {
    format!(
        "{},{} {}x{}",
        format_number(rect.x),
        format_number(rect.y),
        format_number(rect.width),
        format_number(rect.height)
    )
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn dump_into(item: &Item, depth: usize, lines: &mut Vec<String>) {
    walk(item, depth, &mut |item, depth| {
        let mut line = "  ".repeat(depth);
        line.push_str(&item.node().node_type());
        if let Some(id) = item.node().get("id") {
            let _ = write!(line, "#{id}");
        }
        let _ = write!(
            line,
            " [{}] {}",
            item.decorator_names().join(", "),
            format_rect(item.bounds())
        );
        lines.push(line);
    });
}

fn walk(item: &Item, depth: usize, visit: &mut dyn FnMut(&Item, usize)) {
    visit(item, depth);
    for child in item.children() {
        walk(&child, depth + 1, visit);
    }
}

fn format_number(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Interpreter;
    use crate::tree::{AttributedTree, Element};

    #[test]
    fn format_rect_drops_zero_fractions() {
        assert_eq!(format_rect(Rect::new(0.0, 1.5, 10.0, 2.25)), "0,1.5 10x2.25");
    }

    #[test]
    fn dump_items_outline() {
        let tree = AttributedTree::new(
            Element::new("Panel")
                .with("width", 40)
                .with("height", 20)
                .with_child(Element::new("Panel").with("id", "top").with("height", 5))
                .with_child(Element::new("Text").with("text", "hi")),
        );
        let root = Interpreter::new().interpret(&tree.root());
        root.perform_layout();
        insta::assert_snapshot!(dump_items(&root), @r"
        Panel [ContainerItem, Canvas] 0,0 40x20
          Panel#top [FlexItem, ContainerItem, Canvas] 0,0 40x5
          Text [FlexItem, Text, Canvas] 0,5 40x12
        ");
    }

    #[test]
    fn dump_bounds_indents() {
        let tree = AttributedTree::new(
            Element::new("Panel")
                .with("width", 10)
                .with("height", 10)
                .with_child(Element::new("Panel").with("height", 4)),
        );
        let root = Interpreter::new().interpret(&tree.root());
        root.perform_layout();
        assert_eq!(dump_bounds(&root), "0,0 10x10\n  0,0 10x4");
    }
}
