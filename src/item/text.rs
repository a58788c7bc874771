//! Text capability: a leaf whose content is its `text` property followed by
//! the text of its child nodes.

use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::geometry::Size;
use crate::property::{Property, PropertyValue};
use crate::tree::{ListenScope, Node, Subscription, TreeEvent};

use super::container::BOX_MODEL_VALID;
use super::{Component, Decorator, Item};

/// Properties whose change can alter the text's size.
const METRIC_PROPERTIES: &[&str] = &[
    "text",
    "typeface-name",
    "font-weight",
    "font-height",
    "font-style",
    "kerning",
    "horizontal-scale",
    "line-spacing",
    "word-wrap",
    "direction",
    "ideal-width",
    "ideal-height",
];

/// Properties forwarded to the component as a [`TextStyle`].
const STYLE_PROPERTIES: &[&str] = &[
    "typeface-name",
    "font-weight",
    "font-height",
    "font-style",
    "justification",
    "direction",
];

const DEFAULT_FONT_HEIGHT: f32 = 12.0;
const DEFAULT_FONT_WEIGHT: &str = "normal";
const DEFAULT_FONT_STYLE: &str = "normal";
const DEFAULT_JUSTIFICATION: &str = "left";
const DEFAULT_DIRECTION: &str = "left-to-right";

/// Font and paragraph settings a text component renders with. The layout
/// estimate only uses the metrics; the rest is passed through for painting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStyle {
    pub typeface_name: String,
    pub font_weight: String,
    pub font_height: f32,
    pub font_style: String,
    pub justification: String,
    pub direction: String,
}

impl TextStyle {
    /// Read the style declared on `node`, with the same defaults as [`Text`].
    pub fn from_node(node: &Node) -> Self {
        Self {
            typeface_name: read(node, "typeface-name", String::new()),
            font_weight: read(node, "font-weight", DEFAULT_FONT_WEIGHT.to_owned()),
            font_height: read(node, "font-height", DEFAULT_FONT_HEIGHT),
            font_style: read(node, "font-style", DEFAULT_FONT_STYLE.to_owned()),
            justification: read(node, "justification", DEFAULT_JUSTIFICATION.to_owned()),
            direction: read(node, "direction", DEFAULT_DIRECTION.to_owned()),
        }
    }
}

fn read<T: PropertyValue>(node: &Node, name: &str, default: T) -> T {
    match node.get(name) {
        None => default,
        Some(value) => T::from_value(&value).unwrap_or_default(),
    }
}

/// Average glyph advance as a fraction of the font height, used when
/// neither an ideal size nor a preferred size is known.
const ADVANCE_RATIO: f32 = 0.5;

/// Text leaf. Refuses child items; child nodes contribute their `text`.
pub struct Text {
    pub text: Property<String>,
    pub typeface_name: Property<String>,
    pub font_weight: Property<String>,
    pub font_height: Property<f32>,
    pub font_style: Property<String>,
    pub kerning: Property<f32>,
    pub horizontal_scale: Property<f32>,
    pub line_spacing: Property<f32>,
    pub justification: Property<String>,
    pub word_wrap: Property<bool>,
    pub direction: Property<String>,
    pub ideal_width: Property<f32>,
    pub ideal_height: Property<f32>,
    content: Rc<RefCell<String>>,
    _subscription: Subscription,
}

impl Text {
    pub fn new(item: &Item) -> Self {
        let node = item.node();
        let content = Rc::new(RefCell::new(collect_text(node)));
        {
            let component = item.component();
            let mut component = component.borrow_mut();
            component.set_text(&content.borrow());
            component.set_text_style(&TextStyle::from_node(node));
        }

        let watched = node.clone();
        let component = Rc::downgrade(&item.component());
        let shown = Rc::downgrade(&content);
        let subscription = node.subscribe(ListenScope::Subtree, move |event| {
            let relevant = match event {
                TreeEvent::PropertyChanged { node, name } => {
                    if *node == watched && STYLE_PROPERTIES.contains(&name.as_str()) {
                        style_changed(&watched, &component);
                    }
                    METRIC_PROPERTIES.contains(&name.as_str())
                }
                TreeEvent::ChildAdded { .. } | TreeEvent::ChildRemoved { .. } => true,
            };
            if relevant {
                text_changed(&watched, &component, &shown);
            }
        });

        Self {
            text: Property::new(node, "text"),
            typeface_name: Property::new(node, "typeface-name"),
            font_weight: Property::with_default(node, "font-weight", DEFAULT_FONT_WEIGHT.to_owned()),
            font_height: Property::with_default(node, "font-height", DEFAULT_FONT_HEIGHT),
            font_style: Property::with_default(node, "font-style", DEFAULT_FONT_STYLE.to_owned()),
            kerning: Property::new(node, "kerning"),
            horizontal_scale: Property::with_default(node, "horizontal-scale", 1.0),
            line_spacing: Property::with_default(node, "line-spacing", 1.0),
            justification: Property::with_default(node, "justification", DEFAULT_JUSTIFICATION.to_owned()),
            word_wrap: Property::with_default(node, "word-wrap", true),
            direction: Property::with_default(node, "direction", DEFAULT_DIRECTION.to_owned()),
            ideal_width: Property::new(node, "ideal-width"),
            ideal_height: Property::new(node, "ideal-height"),
            content,
            _subscription: subscription,
        }
    }

    /// The displayed text.
    pub fn content(&self) -> String {
        self.content.borrow().clone()
    }

    /// Current font and paragraph settings, as pushed to the component.
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            typeface_name: self.typeface_name.get(),
            font_weight: self.font_weight.get(),
            font_height: self.font_height.get(),
            font_style: self.font_style.get(),
            justification: self.justification.get(),
            direction: self.direction.get(),
        }
    }

    /// Size estimated from font metrics, wrapping at `available.width` when
    /// word wrap is on.
    pub fn estimate(&self, available: Size) -> Size {
        let font_height = self.font_height.get().max(0.0);
        let advance = (font_height * ADVANCE_RATIO * self.horizontal_scale.get()
            + self.kerning.get())
        .max(0.0);
        let line_height = font_height * self.line_spacing.get().max(0.0);

        let per_line = if self.word_wrap.get() && available.width.is_finite() && advance > 0.0 {
            Some(((available.width / advance).floor() as usize).max(1))
        } else {
            None
        };

        let content = self.content.borrow();
        let (mut lines, mut widest) = (0usize, 0usize);
        for line in content.split('\n') {
            let chars = line.chars().count();
            match per_line {
                Some(limit) if chars > limit => {
                    lines += chars.div_ceil(limit);
                    widest = widest.max(limit);
                }
                _ => {
                    lines += 1;
                    widest = widest.max(chars);
                }
            }
        }
        if content.is_empty() {
            lines = 0;
        }
        Size::new(widest as f32 * advance, lines as f32 * line_height)
    }
}

impl Decorator for Text {
    fn name(&self) -> &'static str {
        "Text"
    }

    fn is_container(&self) -> Option<bool> {
        Some(false)
    }

    fn is_content(&self) -> Option<bool> {
        Some(true)
    }

    fn accepts_children(&self) -> bool {
        false
    }

    fn intrinsic_size(&self, item: &Item, available: Size) -> Option<Size> {
        let fallback = item
            .component()
            .borrow()
            .preferred_size()
            .unwrap_or_else(|| self.estimate(available));
        let width = match self.ideal_width.get() {
            w if self.ideal_width.exists() && w > 0.0 => w,
            _ => fallback.width,
        };
        let height = match self.ideal_height.get() {
            h if self.ideal_height.exists() && h > 0.0 => h,
            _ => fallback.height,
        };
        Some(Size::new(width, height))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The node's `text` followed by the text of its descendants, in document
/// order.
pub fn collect_text(node: &Node) -> String {
    let mut text = node
        .get("text")
        .map(|value| value.to_string())
        .unwrap_or_default();
    for child in node.children() {
        text.push_str(&collect_text(&child));
    }
    text
}

fn style_changed(node: &Node, component: &Weak<RefCell<dyn Component>>) {
    if let Some(component) = component.upgrade() {
        let mut component = component.borrow_mut();
        component.set_text_style(&TextStyle::from_node(node));
        component.repaint();
    }
}

fn text_changed(node: &Node, component: &Weak<RefCell<dyn Component>>, shown: &Weak<RefCell<String>>) {
    let Some(shown) = shown.upgrade() else {
        return;
    };
    let text = collect_text(node);
    if *shown.borrow() != text {
        if let Some(component) = component.upgrade() {
            component.borrow_mut().set_text(&text);
        }
        *shown.borrow_mut() = text;
    }
    if let Some(parent) = node.parent() {
        tracing::trace!("text metrics changed, invalidating parent box model");
        parent.set(BOX_MODEL_VALID, false);
    }
}
