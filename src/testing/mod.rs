//! Headless testing framework: Pilot, snapshot helpers.
//!
//! Use the [`Pilot`] to drive an interpreted item tree without a terminal:
//! resize it, edit the source tree, and feed pointer input. Use
//! [`dump_items`] and related helpers to capture the item tree as plain text
//! for snapshot-style assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{dump_bounds, dump_items, format_rect};
