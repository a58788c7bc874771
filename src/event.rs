//! Pointer events forwarded to items.
//!
//! Only the enter/exit/down/up transitions that affect style resolution are
//! modelled. [`PointerTracker`] derives them from raw crossterm mouse events
//! so the rest of the crate never depends on crossterm directly.

use crossterm::event::{MouseEvent, MouseEventKind};

use crate::geometry::{Point, Rect};

/// A pointer transition relative to one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEvent {
    Enter,
    Exit,
    Down,
    Up,
}

/// Hover and press state derived from [`PointerEvent`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InteractionState {
    pub hovered: bool,
    pub active: bool,
}

impl InteractionState {
    /// Apply a transition. Returns `true` if the state changed.
    pub fn apply(&mut self, event: PointerEvent) -> bool {
        let before = *self;
        match event {
            PointerEvent::Enter => self.hovered = true,
            PointerEvent::Exit => self.hovered = false,
            PointerEvent::Down => self.active = true,
            PointerEvent::Up => self.active = false,
        }
        *self != before
    }
}

/// Converts a stream of crossterm mouse events into [`PointerEvent`]s for
/// one rectangle.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    inside: bool,
    pressed: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the pointer was last seen inside the area.
    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// Feed one mouse event observed over `area` (absolute cell coordinates).
    pub fn track(&mut self, event: &MouseEvent, area: Rect) -> Vec<PointerEvent> {
        let point = Point::new(f32::from(event.column), f32::from(event.row));
        let inside = area.contains(point);
        let mut out = Vec::new();

        if inside && !self.inside {
            out.push(PointerEvent::Enter);
        }
        match event.kind {
            MouseEventKind::Down(_) if inside => {
                self.pressed = true;
                out.push(PointerEvent::Down);
            }
            MouseEventKind::Up(_) if self.pressed => {
                self.pressed = false;
                out.push(PointerEvent::Up);
            }
            _ => {}
        }
        if !inside && self.inside {
            out.push(PointerEvent::Exit);
        }

        self.inside = inside;
        out
    }
}
