//! # trellis
//!
//! Interprets declarative, attributed property trees into live layouts.
//!
//! A UI is described as a tree of typed nodes carrying named properties
//! (`display`, `grid-template-columns`, `flex-grow`, `background`, ...). The
//! [`Interpreter`] turns that tree into a parallel tree of layout [`Item`]s
//! whose capabilities are composed from decorators, lays them out with CSS
//! grid, flexbox or block rules, and keeps everything in sync as the source
//! tree is edited.
//!
//! ## Core Systems
//!
//! - **[`tree`]**: Slotmap-backed attributed tree with change notifications
//! - **[`property`]**: Typed, observable property bindings and CSS value parsing
//! - **[`item`]**: Items, components and decorators (container, content, text, canvas)
//! - **[`layout`]**: Grid/flex/block child adapters and the taffy-powered solver
//! - **[`style`]**: Cascading style sheets with hover/active interaction states
//! - **[`interpreter`]**: Tree-to-item interpretation that follows live edits
//! - **[`event`]**: Pointer transitions and crossterm mouse tracking
//! - **[`testing`]**: Headless pilot and snapshot helpers
//! - **[`geometry`]**: Point, Size, Rect, Edges primitives

// Foundation
pub mod config;
pub mod geometry;

// Core systems
pub mod property;
pub mod tree;

// Items and layout
pub mod item;
pub mod layout;
pub mod style;

// Interpretation and input
pub mod event;
pub mod interpreter;

// Testing
pub mod testing;

pub use config::{InterpreterConfig, LayoutDefaults};
pub use interpreter::Interpreter;
pub use item::Item;
pub use tree::{AttributedTree, Element, Node, Object, Value};

// Proc macros (feature-gated)
#[cfg(feature = "macros")]
pub use trellis_macros::tree;
