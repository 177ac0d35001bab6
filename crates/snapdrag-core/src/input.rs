//! Pointer input normalization for mouse and touch streams.
//!
//! Native mouse and touch events are collapsed into one drag sequence:
//! `Start`, any number of `Move`, then exactly one `End` per session.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

impl MouseButton {
    /// Only the primary button starts a drag.
    pub fn is_primary(self) -> bool {
        self == MouseButton::Left
    }
}

/// Pointer coordinates in viewport (`client`) and document (`page`) space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPoint {
    pub client: Point,
    pub page: Point,
}

impl PointerPoint {
    pub fn new(client: Point, page: Point) -> Self {
        Self { client, page }
    }

    /// A point where page and client coordinates coincide.
    pub fn at(x: f64, y: f64) -> Self {
        let p = Point::new(x, y);
        Self { client: p, page: p }
    }
}

/// One active touch contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub point: PointerPoint,
}

/// Native event stream as delivered by the host.
///
/// Touch events carry the full list of touches still on the surface,
/// after the change the event describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NativeEvent {
    MouseDown {
        button: MouseButton,
        point: PointerPoint,
    },
    MouseMove {
        point: PointerPoint,
    },
    MouseUp {
        button: MouseButton,
    },
    TouchStart {
        touches: Vec<TouchPoint>,
    },
    TouchMove {
        touches: Vec<TouchPoint>,
    },
    TouchEnd {
        touches: Vec<TouchPoint>,
    },
}

/// Normalized drag signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragSignal {
    Start(PointerPoint),
    Move(PointerPoint),
    End,
}

/// Which input stream owns the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActivePointer {
    Mouse,
    Touch(u64),
}

/// Relays native events as [`DragSignal`]s.
///
/// Mouse move/up are treated as global: once a session is acquired they are
/// followed wherever the pointer goes, as long as the listener scope is held.
#[derive(Debug, Clone, Default)]
pub struct PointerInputAdapter {
    attached: bool,
    active: Option<ActivePointer>,
}

impl PointerInputAdapter {
    /// Create a detached adapter. Nothing is relayed until [`attach`](Self::attach).
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the global listener scope.
    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Release the listener scope. Any in-flight session is dropped silently.
    pub fn detach(&mut self) {
        self.attached = false;
        self.active = None;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether a drag session is currently acquired.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Forget the current session without emitting `End`.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Translate one native event.
    pub fn handle_event(&mut self, event: &NativeEvent) -> Option<DragSignal> {
        if !self.attached {
            return None;
        }

        match event {
            NativeEvent::MouseDown { button, point } => {
                if self.active.is_some() || !button.is_primary() {
                    return None;
                }
                self.active = Some(ActivePointer::Mouse);
                Some(DragSignal::Start(*point))
            }
            NativeEvent::MouseMove { point } => {
                (self.active == Some(ActivePointer::Mouse)).then_some(DragSignal::Move(*point))
            }
            NativeEvent::MouseUp { button } => {
                if self.active == Some(ActivePointer::Mouse) && button.is_primary() {
                    self.active = None;
                    Some(DragSignal::End)
                } else {
                    None
                }
            }
            NativeEvent::TouchStart { touches } => {
                if self.active.is_some() {
                    return None;
                }
                match touches.as_slice() {
                    [touch] => {
                        self.active = Some(ActivePointer::Touch(touch.id));
                        Some(DragSignal::Start(touch.point))
                    }
                    _ => None,
                }
            }
            NativeEvent::TouchMove { touches } => {
                let Some(ActivePointer::Touch(id)) = self.active else {
                    return None;
                };
                touches
                    .iter()
                    .find(|t| t.id == id)
                    .map(|t| DragSignal::Move(t.point))
            }
            NativeEvent::TouchEnd { touches } => {
                let Some(ActivePointer::Touch(id)) = self.active else {
                    return None;
                };
                if touches.iter().any(|t| t.id == id) {
                    return None;
                }
                self.active = None;
                Some(DragSignal::End)
            }
        }
    }
}
