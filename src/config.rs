//! Interpreter configuration and layout defaults.

use crate::geometry::Edges;
use crate::property::{Display, GridSpan, Length, SelfAlignment};

// ---------------------------------------------------------------------------
// LayoutDefaults
// ---------------------------------------------------------------------------

/// Values a child adapter falls back to for properties its node does not
/// declare.
///
/// Adapters copy these once, when they are built; changing the interpreter's
/// defaults afterwards only affects items interpreted later.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutDefaults {
    pub order: i32,
    pub justify_self: SelfAlignment,
    pub align_self: SelfAlignment,
    pub grid_column: GridSpan,
    pub grid_row: GridSpan,
    pub grid_area: String,
    pub flex_grow: f32,
    pub flex_shrink: f32,
    pub flex_basis: Length,
    pub width: Length,
    pub height: Length,
    pub min_width: Length,
    pub min_height: Length,
    pub max_width: Length,
    pub max_height: Length,
    pub margin: Edges,
}

impl Default for LayoutDefaults {
    fn default() -> Self {
        Self {
            order: 0,
            justify_self: SelfAlignment::Auto,
            align_self: SelfAlignment::Auto,
            grid_column: GridSpan::AUTO,
            grid_row: GridSpan::AUTO,
            grid_area: String::new(),
            flex_grow: 0.0,
            flex_shrink: 1.0,
            flex_basis: Length::Auto,
            width: Length::Auto,
            height: Length::Auto,
            min_width: Length::Px(0.0),
            min_height: Length::Px(0.0),
            max_width: Length::Auto,
            max_height: Length::Auto,
            margin: Edges::ZERO,
        }
    }
}

// ---------------------------------------------------------------------------
// InterpreterConfig
// ---------------------------------------------------------------------------

/// Configuration for the [`Interpreter`](crate::interpreter::Interpreter).
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Fallbacks for undeclared placement properties.
    pub layout_defaults: LayoutDefaults,
    /// Node types interpreted as text leaves.
    pub text_types: Vec<String>,
    /// Display mode for nodes that declare none and whose component has no
    /// preference.
    pub default_display: Display,
    /// Whether every item gets a style sheet.
    pub style_sheets: bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            layout_defaults: LayoutDefaults::default(),
            text_types: vec!["Text".to_owned()],
            default_display: Display::Flex,
            style_sheets: true,
        }
    }
}

impl InterpreterConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout defaults (builder).
    pub fn with_layout_defaults(mut self, defaults: LayoutDefaults) -> Self {
        self.layout_defaults = defaults;
        self
    }

    /// Treat `node_type` as a text leaf (builder).
    pub fn with_text_type(mut self, node_type: impl Into<String>) -> Self {
        self.text_types.push(node_type.into());
        self
    }

    /// Set the fallback display mode (builder).
    pub fn with_default_display(mut self, display: Display) -> Self {
        self.default_display = display;
        self
    }

    /// Enable or disable style sheets (builder).
    pub fn with_style_sheets(mut self, enabled: bool) -> Self {
        self.style_sheets = enabled;
        self
    }

    /// Whether `node_type` is a text leaf.
    pub fn is_text_type(&self, node_type: &str) -> bool {
        self.text_types.iter().any(|t| t == node_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = InterpreterConfig::default();
        assert!(config.is_text_type("Text"));
        assert!(!config.is_text_type("Component"));
        assert_eq!(config.default_display, Display::Flex);
        assert!(config.style_sheets);
    }

    #[test]
    fn builder_chain() {
        let config = InterpreterConfig::new()
            .with_text_type("Label")
            .with_default_display(Display::Block)
            .with_style_sheets(false);
        assert!(config.is_text_type("Label"));
        assert!(config.is_text_type("Text"));
        assert_eq!(config.default_display, Display::Block);
        assert!(!config.style_sheets);
    }

    #[test]
    fn solver_canonical_defaults() {
        let defaults = LayoutDefaults::default();
        assert_eq!(defaults.order, 0);
        assert_eq!(defaults.justify_self, SelfAlignment::Auto);
        assert_eq!(defaults.grid_column, GridSpan::AUTO);
        assert_eq!(defaults.flex_shrink, 1.0);
        assert_eq!(defaults.width, Length::Auto);
        assert_eq!(defaults.margin, Edges::ZERO);
    }
}
