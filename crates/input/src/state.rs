use glam::Vec2;
use lumen_common::Viewport;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Keyboard keys the scene core knows how to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    Space,
    LeftShift,
    LeftControl,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Read-only view of the window and its input devices for the current frame.
///
/// Implemented by the windowing layer. Camera navigation polls it during
/// `update`; it never receives callbacks.
pub trait InputSource {
    /// Cursor position in window pixels, origin at the top-left corner.
    fn cursor_position(&self) -> Vec2;

    fn is_key_down(&self, key: Key) -> bool;

    fn is_mouse_button_down(&self, button: MouseButton) -> bool;

    /// Size of the drawable area in pixels.
    fn viewport_size(&self) -> Viewport;
}

/// Snapshot of input state for one frame.
///
/// A windowing layer feeds events into it between frames; headless drivers
/// and tests script it directly.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    cursor: Vec2,
    keys_held: HashSet<Key>,
    buttons_held: HashSet<MouseButton>,
    viewport: Viewport,
}

impl InputState {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    pub fn set_cursor_position(&mut self, position: Vec2) {
        self.cursor = position;
    }

    pub fn set_key(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.keys_held.insert(key);
        } else {
            self.keys_held.remove(&key);
        }
    }

    pub fn set_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.buttons_held.insert(button);
        } else {
            self.buttons_held.remove(&button);
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Release every key and button.
    pub fn clear(&mut self) {
        self.keys_held.clear();
        self.buttons_held.clear();
    }
}

impl InputSource for InputState {
    fn cursor_position(&self) -> Vec2 {
        self.cursor
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.keys_held.contains(&key)
    }

    fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.buttons_held.contains(&button)
    }

    fn viewport_size(&self) -> Viewport {
        self.viewport
    }
}
