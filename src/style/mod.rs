//! Cascading style resolution.
//!
//! Style properties are looked up by name from an item's node outwards; see
//! [`StyleSheet`] for the cascade order.

pub mod sheet;

pub use sheet::{InvalidationReason, StyleSheet, ACTIVE, BACKGROUND, FOREGROUND, HOVER, STYLE};
