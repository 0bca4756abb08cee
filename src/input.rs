//! Keyboard and mouse state for the viewer.
//!
//! Window events are folded into per-frame state; the app reads it once per
//! redraw and then calls [`Input::begin_frame`].
//!
//! Bindings:
//! - `T` - Force Tree
//! - `E` - Force Explode
//! - `Escape` - quit
//! - left drag - orbit, wheel - zoom

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

use crate::control::ManualControl;

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    T,
    E,
    Escape,
    /// Any key without a binding.
    Other,
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::KeyT => KeyCode::T,
            WinitKeyCode::KeyE => KeyCode::E,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other,
        }
    }
}

/// Input state tracking for keyboard and mouse.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,

    dragging: bool,
    last_cursor: Option<Vec2>,
    drag_delta: Vec2,

    scroll_delta: f32,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a key was pressed this frame (no auto-repeat).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Manual controls triggered this frame.
    pub fn manual_controls(&self) -> impl Iterator<Item = ManualControl> + '_ {
        [
            (KeyCode::T, ManualControl::ForceTree),
            (KeyCode::E, ManualControl::ForceExplode),
        ]
        .into_iter()
        .filter(|(key, _)| self.key_pressed(*key))
        .map(|(_, control)| control)
    }

    /// Cursor movement in pixels while the left button is held.
    pub fn drag_delta(&self) -> Vec2 {
        self.drag_delta
    }

    /// Scroll this frame; positive is toward the scene.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    /// Clear per-frame state.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.drag_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.handle_key(KeyCode::from(code), event.state);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if *button == MouseButton::Left {
                    self.dragging = *state == ElementState::Pressed;
                    if !self.dragging {
                        self.last_cursor = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_held.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    fn handle_cursor(&mut self, position: Vec2) {
        if self.dragging {
            if let Some(last) = self.last_cursor {
                self.drag_delta += position - last;
            }
            self.last_cursor = Some(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_press_without_repeat() {
        let mut input = Input::new();
        input.handle_key(KeyCode::E, ElementState::Pressed);
        assert!(input.key_pressed(KeyCode::E));

        input.begin_frame();
        // Held key repeating does not fire again
        input.handle_key(KeyCode::E, ElementState::Pressed);
        assert!(!input.key_pressed(KeyCode::E));

        input.handle_key(KeyCode::E, ElementState::Released);
        input.handle_key(KeyCode::E, ElementState::Pressed);
        assert!(input.key_pressed(KeyCode::E));
    }

    #[test]
    fn test_manual_controls_from_keys() {
        let mut input = Input::new();
        input.handle_key(KeyCode::T, ElementState::Pressed);
        let controls: Vec<_> = input.manual_controls().collect();
        assert_eq!(controls, vec![ManualControl::ForceTree]);

        input.begin_frame();
        assert_eq!(input.manual_controls().count(), 0);
    }

    #[test]
    fn test_drag_only_while_pressed() {
        let mut input = Input::new();
        input.handle_cursor(Vec2::new(10.0, 10.0));
        input.handle_cursor(Vec2::new(20.0, 10.0));
        assert_eq!(input.drag_delta(), Vec2::ZERO);

        input.dragging = true;
        input.handle_cursor(Vec2::new(20.0, 10.0));
        input.handle_cursor(Vec2::new(25.0, 4.0));
        assert_eq!(input.drag_delta(), Vec2::new(5.0, -6.0));
    }
}
