//! Tests for the `tree!` markup macro.

#![cfg(feature = "macros")]

use pretty_assertions::assert_eq;

use trellis::geometry::Rect;
use trellis::testing::Pilot;
use trellis::{tree, AttributedTree, Element, Value};

#[test]
fn test_tree_macro_matches_builder() {
    let from_macro = tree! {
        <Panel display="grid" grid-template-columns="1fr 1fr" width=80>
            <Text id="title" text="Hello" word-wrap=false />
            <Panel grid-column="1 / span 2" order=-1 />
        </Panel>
    };
    let from_builder = Element::new("Panel")
        .with("display", "grid")
        .with("grid-template-columns", "1fr 1fr")
        .with("width", 80)
        .with_child(
            Element::new("Text")
                .with("id", "title")
                .with("text", "Hello")
                .with("word-wrap", false),
        )
        .with_child(
            Element::new("Panel")
                .with("grid-column", "1 / span 2")
                .with("order", -1),
        );
    assert_eq!(from_macro, from_builder);
}

#[test]
fn test_tree_macro_expressions() {
    let rows = 3;
    let element = tree! { <Panel height={rows * 2} flex-grow=0.5 /> };
    let tree = AttributedTree::new(element);
    assert_eq!(tree.root().get("height"), Some(Value::Int(6)));
    assert_eq!(tree.root().get("flex-grow"), Some(Value::Float(0.5)));
}

#[test]
fn test_tree_macro_drives_layout() {
    let mut pilot = Pilot::new(tree! {
        <Panel flex-direction="row">
            <Panel id="a" width=10 />
            <Panel id="b" flex-grow=1 />
        </Panel>
    });
    pilot.resize(50, 5);
    assert_eq!(pilot.absolute_bounds("b"), Some(Rect::new(10.0, 0.0, 40.0, 5.0)));
}
