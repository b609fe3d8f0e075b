//! Keyboard and mouse state
//!
//! The host pushes events (`press`, `release`, `mouse_moved`, ...) as they
//! arrive; games query the folded state. Edge flags and mouse deltas are
//! one-shot and cleared by `end_step` after each simulation substep.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Named keys the games read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    N,
    P,
    Q,
    R,
    S,
    V,
    W,
    X,
    Z,
    Space,
    Enter,
    Escape,
    Up,
    Down,
    Left,
    Right,
    LeftShift,
    RightShift,
    LeftCtrl,
    LeftAlt,
}

impl Key {
    #[inline]
    fn bit(self) -> u64 {
        1u64 << (self as u32)
    }

    /// Map a DOM `KeyboardEvent.code` to a key
    pub fn from_code(code: &str) -> Option<Self> {
        let key = match code {
            "KeyA" => Key::A,
            "KeyB" => Key::B,
            "KeyC" => Key::C,
            "KeyD" => Key::D,
            "KeyE" => Key::E,
            "KeyN" => Key::N,
            "KeyP" => Key::P,
            "KeyQ" => Key::Q,
            "KeyR" => Key::R,
            "KeyS" => Key::S,
            "KeyV" => Key::V,
            "KeyW" => Key::W,
            "KeyX" => Key::X,
            "KeyZ" => Key::Z,
            "Space" => Key::Space,
            "Enter" | "NumpadEnter" => Key::Enter,
            "Escape" => Key::Escape,
            "ArrowUp" => Key::Up,
            "ArrowDown" => Key::Down,
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            "ShiftLeft" => Key::LeftShift,
            "ShiftRight" => Key::RightShift,
            "ControlLeft" => Key::LeftCtrl,
            "AltLeft" => Key::LeftAlt,
            _ => return None,
        };
        Some(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    #[inline]
    fn bit(self) -> u8 {
        1u8 << (self as u8)
    }

    /// Map a DOM `MouseEvent.button` index
    pub fn from_dom(button: i16) -> Option<Self> {
        match button {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    }
}

/// Input state for one simulation step
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys_down: u64,
    keys_pressed: u64,
    keys_released: u64,
    buttons_down: u8,
    buttons_pressed: u8,
    buttons_released: u8,
    /// Cursor position in game pixels
    pub mouse_pos: Vec2,
    /// Cursor movement since the last step
    pub mouse_delta: Vec2,
    /// Wheel notches since the last step (positive = away from the user)
    pub wheel: f32,
}

impl InputState {
    /// State with `keys` held and freshly pressed this step
    pub fn pressing(keys: &[Key]) -> Self {
        let mut input = Self::default();
        for &key in keys {
            input.press(key);
        }
        input
    }

    /// State with `keys` held since an earlier step
    pub fn holding(keys: &[Key]) -> Self {
        let mut input = Self::pressing(keys);
        input.end_step();
        input
    }

    pub fn press(&mut self, key: Key) {
        if self.keys_down & key.bit() == 0 {
            self.keys_pressed |= key.bit();
        }
        self.keys_down |= key.bit();
    }

    pub fn release(&mut self, key: Key) {
        if self.keys_down & key.bit() != 0 {
            self.keys_released |= key.bit();
        }
        self.keys_down &= !key.bit();
    }

    pub fn press_button(&mut self, button: MouseButton) {
        if self.buttons_down & button.bit() == 0 {
            self.buttons_pressed |= button.bit();
        }
        self.buttons_down |= button.bit();
    }

    pub fn release_button(&mut self, button: MouseButton) {
        if self.buttons_down & button.bit() != 0 {
            self.buttons_released |= button.bit();
        }
        self.buttons_down &= !button.bit();
    }

    /// Record a cursor move; deltas accumulate until the step ends
    pub fn mouse_moved(&mut self, pos: Vec2, delta: Vec2) {
        self.mouse_pos = pos;
        self.mouse_delta += delta;
    }

    pub fn wheel_moved(&mut self, notches: f32) {
        self.wheel += notches;
    }

    /// Drop every held key and button (window lost focus)
    pub fn release_all(&mut self) {
        self.keys_released |= self.keys_down;
        self.buttons_released |= self.buttons_down;
        self.keys_down = 0;
        self.buttons_down = 0;
    }

    /// Clear one-shot state after a simulation step consumed it
    pub fn end_step(&mut self) {
        self.keys_pressed = 0;
        self.keys_released = 0;
        self.buttons_pressed = 0;
        self.buttons_released = 0;
        self.mouse_delta = Vec2::ZERO;
        self.wheel = 0.0;
    }

    #[inline]
    pub fn is_down(&self, key: Key) -> bool {
        self.keys_down & key.bit() != 0
    }

    #[inline]
    pub fn is_pressed(&self, key: Key) -> bool {
        self.keys_pressed & key.bit() != 0
    }

    #[inline]
    pub fn is_released(&self, key: Key) -> bool {
        self.keys_released & key.bit() != 0
    }

    pub fn any_down(&self, keys: &[Key]) -> bool {
        keys.iter().any(|&k| self.is_down(k))
    }

    pub fn any_pressed(&self, keys: &[Key]) -> bool {
        keys.iter().any(|&k| self.is_pressed(k))
    }

    #[inline]
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down & button.bit() != 0
    }

    #[inline]
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed & button.bit() != 0
    }

    #[inline]
    pub fn is_button_released(&self, button: MouseButton) -> bool {
        self.buttons_released & button.bit() != 0
    }

    /// -1, 0 or 1 from two groups of held keys; opposing keys cancel
    pub fn axis(&self, negative: &[Key], positive: &[Key]) -> f32 {
        let mut value = 0.0;
        if self.any_down(negative) {
            value -= 1.0;
        }
        if self.any_down(positive) {
            value += 1.0;
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_sets_edge_once() {
        let mut input = InputState::default();
        input.press(Key::Space);
        assert!(input.is_pressed(Key::Space));
        assert!(input.is_down(Key::Space));

        input.end_step();
        // Key repeat delivers another keydown while held
        input.press(Key::Space);
        assert!(!input.is_pressed(Key::Space));
        assert!(input.is_down(Key::Space));
    }

    #[test]
    fn test_release_edge() {
        let mut input = InputState::holding(&[Key::W]);
        input.release(Key::W);
        assert!(input.is_released(Key::W));
        assert!(!input.is_down(Key::W));
        input.end_step();
        assert!(!input.is_released(Key::W));
    }

    #[test]
    fn test_axis_cancels() {
        let input = InputState::holding(&[Key::A, Key::D]);
        assert_eq!(input.axis(&[Key::A], &[Key::D]), 0.0);
        let input = InputState::holding(&[Key::Left]);
        assert_eq!(input.axis(&[Key::A, Key::Left], &[Key::D, Key::Right]), -1.0);
    }

    #[test]
    fn test_mouse_delta_accumulates_until_step_end() {
        let mut input = InputState::default();
        input.mouse_moved(Vec2::new(10.0, 10.0), Vec2::new(2.0, 0.0));
        input.mouse_moved(Vec2::new(13.0, 11.0), Vec2::new(3.0, 1.0));
        assert_eq!(input.mouse_delta, Vec2::new(5.0, 1.0));
        assert_eq!(input.mouse_pos, Vec2::new(13.0, 11.0));
        input.end_step();
        assert_eq!(input.mouse_delta, Vec2::ZERO);
        assert_eq!(input.mouse_pos, Vec2::new(13.0, 11.0));
    }

    #[test]
    fn test_buttons() {
        let mut input = InputState::default();
        input.press_button(MouseButton::Right);
        assert!(input.is_button_pressed(MouseButton::Right));
        assert!(!input.is_button_down(MouseButton::Left));
        input.end_step();
        input.release_button(MouseButton::Right);
        assert!(input.is_button_released(MouseButton::Right));
    }

    #[test]
    fn test_key_from_code() {
        assert_eq!(Key::from_code("KeyW"), Some(Key::W));
        assert_eq!(Key::from_code("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_code("F13"), None);
    }
}
