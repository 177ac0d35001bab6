//! Translation from winit window events to [`NativeEvent`]s.

use crate::input::{MouseButton, NativeEvent, PointerPoint, TouchPoint};
use kurbo::{Point, Vec2};
use std::collections::BTreeMap;
use winit::event::{ElementState, TouchPhase, WindowEvent};

impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => MouseButton::Left,
            winit::event::MouseButton::Right => MouseButton::Right,
            winit::event::MouseButton::Middle => MouseButton::Middle,
            winit::event::MouseButton::Back => MouseButton::Other(3),
            winit::event::MouseButton::Forward => MouseButton::Other(4),
            winit::event::MouseButton::Other(n) => MouseButton::Other(n),
        }
    }
}

/// Stateful translator for one window.
///
/// winit reports mouse buttons without a position and touches one at a
/// time, so the translator remembers the cursor and the set of active
/// touches to produce DOM-style events.
#[derive(Debug, Clone, Default)]
pub struct WinitTranslator {
    cursor: Point,
    scroll_offset: Vec2,
    touches: BTreeMap<u64, Point>,
}

impl WinitTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document scroll offset (page = client + offset).
    pub fn set_scroll_offset(&mut self, offset: Vec2) {
        self.scroll_offset = offset;
    }

    /// Translate a window event. Events unrelated to pointers yield `None`.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<NativeEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.cursor_moved(Point::new(position.x, position.y)))
            }
            WindowEvent::MouseInput { state, button, .. } => {
                Some(self.mouse_input(*state, (*button).into()))
            }
            WindowEvent::Touch(touch) => Some(self.touch(
                touch.id,
                touch.phase,
                Point::new(touch.location.x, touch.location.y),
            )),
            _ => None,
        }
    }

    pub fn cursor_moved(&mut self, position: Point) -> NativeEvent {
        self.cursor = position;
        NativeEvent::MouseMove {
            point: self.pointer_point(position),
        }
    }

    pub fn mouse_input(&mut self, state: ElementState, button: MouseButton) -> NativeEvent {
        match state {
            ElementState::Pressed => NativeEvent::MouseDown {
                button,
                point: self.pointer_point(self.cursor),
            },
            ElementState::Released => NativeEvent::MouseUp { button },
        }
    }

    pub fn touch(&mut self, id: u64, phase: TouchPhase, location: Point) -> NativeEvent {
        match phase {
            TouchPhase::Started => {
                self.touches.insert(id, location);
                NativeEvent::TouchStart {
                    touches: self.touch_list(),
                }
            }
            TouchPhase::Moved => {
                self.touches.insert(id, location);
                NativeEvent::TouchMove {
                    touches: self.touch_list(),
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.remove(&id);
                NativeEvent::TouchEnd {
                    touches: self.touch_list(),
                }
            }
        }
    }

    fn pointer_point(&self, client: Point) -> PointerPoint {
        PointerPoint::new(client, client + self.scroll_offset)
    }

    fn touch_list(&self) -> Vec<TouchPoint> {
        self.touches
            .iter()
            .map(|(&id, &location)| TouchPoint {
                id,
                point: self.pointer_point(location),
            })
            .collect()
    }
}
