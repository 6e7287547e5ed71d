use std::collections::HashSet;

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Physical keys currently held down, fed from window events.
#[derive(Debug, Default)]
pub struct KeyboardState {
    down: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.down.insert(key);
            }
            ElementState::Released => {
                self.down.remove(&key);
            }
        }
    }

    pub fn is_down(&self, key: KeyCode) -> bool {
        self.down.contains(&key)
    }

    /// Forgets every held key, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.down.clear();
    }
}

/// Relative pointer motion and scroll gathered between two frames.
#[derive(Debug, Default)]
pub struct PointerState {
    position: glam::Vec2,
    moved: bool,
    scroll: f32,
}

impl PointerState {
    pub fn add_motion(&mut self, delta: glam::Vec2) {
        self.position += delta;
        self.moved = true;
    }

    pub fn add_scroll(&mut self, lines: f32) {
        self.scroll += lines;
    }

    /// The virtual pointer position if it moved since the last call.
    pub fn take_motion(&mut self) -> Option<glam::Vec2> {
        std::mem::take(&mut self.moved).then_some(self.position)
    }

    pub fn take_scroll(&mut self) -> f32 {
        std::mem::take(&mut self.scroll)
    }
}
