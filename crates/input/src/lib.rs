//! Input state for the arena: raw keyboard/mouse events in, movement
//! intents and action triggers out.
//!
//! The platform layer feeds events into an [`InputState`]; the simulation
//! reads it once per tick and the platform calls [`InputState::end_frame`]
//! afterwards to clear one-shot triggers.

use glam::Vec2;
use std::collections::HashSet;

/// Key bindings for movement and actions.
pub mod bindings {
    use super::KeyCode;

    pub const FORWARD: KeyCode = KeyCode::KeyW;
    pub const BACK: KeyCode = KeyCode::KeyS;
    pub const LEFT: KeyCode = KeyCode::KeyA;
    pub const RIGHT: KeyCode = KeyCode::KeyD;
    pub const JUMP: KeyCode = KeyCode::Space;
    pub const DODGE: KeyCode = KeyCode::KeyQ;
    pub const RELOAD: KeyCode = KeyCode::KeyR;
    pub const WEAPON_SLOTS: [KeyCode; 3] = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3];
}

/// Input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_pressed: HashSet<MouseButton>,

    /// Mouse movement accumulated since the last `end_frame`.
    mouse_delta: Vec2,

    /// Whether the cursor is captured/locked.
    cursor_locked: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call once the tick has consumed this frame's input.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.clear();
        self.mouse_delta = Vec2::ZERO;
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.mouse_held.contains(&button) {
                    self.mouse_pressed.insert(button);
                }
                self.mouse_held.insert(button);
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
            }
        }
    }

    /// Process raw mouse movement. Ignored while the cursor is not captured.
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        if !self.cursor_locked {
            return;
        }
        self.mouse_delta.x += delta.0 as f32;
        self.mouse_delta.y += delta.1 as f32;
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a mouse button was pressed this frame.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    /// Get the mouse movement delta for this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Check if the cursor is locked.
    pub fn is_cursor_locked(&self) -> bool {
        self.cursor_locked
    }

    /// Set cursor lock state. Releasing the lock also drops held input.
    pub fn set_cursor_locked(&mut self, locked: bool) {
        if self.cursor_locked != locked {
            log::debug!("Input capture {}", if locked { "acquired" } else { "released" });
        }
        self.cursor_locked = locked;
        if !locked {
            self.mouse_delta = Vec2::ZERO;
        }
    }

    /// Raw movement axes: `x` = right - left, `y` = forward - back. Not normalized.
    pub fn movement_axes(&self) -> Vec2 {
        let axis = |pos: KeyCode, neg: KeyCode| {
            (self.is_key_held(pos) as i32 - self.is_key_held(neg) as i32) as f32
        };
        Vec2::new(
            axis(bindings::RIGHT, bindings::LEFT),
            axis(bindings::FORWARD, bindings::BACK),
        )
    }

    /// True if any movement key is held.
    pub fn is_moving(&self) -> bool {
        [bindings::FORWARD, bindings::BACK, bindings::LEFT, bindings::RIGHT]
            .iter()
            .any(|k| self.is_key_held(*k))
    }

    /// Check if sprint is held (Shift).
    pub fn is_sprinting(&self) -> bool {
        self.is_key_held(KeyCode::ShiftLeft) || self.is_key_held(KeyCode::ShiftRight)
    }

    /// Check if jump was pressed (Space).
    pub fn is_jump_pressed(&self) -> bool {
        self.is_key_pressed(bindings::JUMP)
    }

    /// Check if dodge was pressed (Q).
    pub fn is_dodge_pressed(&self) -> bool {
        self.is_key_pressed(bindings::DODGE)
    }

    /// Check if reload was pressed (R).
    pub fn is_reload_pressed(&self) -> bool {
        self.is_key_pressed(bindings::RELOAD)
    }

    /// Weapon slot (0-based) selected this frame with the number keys.
    pub fn weapon_slot_pressed(&self) -> Option<usize> {
        bindings::WEAPON_SLOTS
            .iter()
            .position(|k| self.is_key_pressed(*k))
    }

    /// Check if fire was pressed this frame (left mouse button, one shot per click).
    pub fn is_fire_pressed(&self) -> bool {
        self.is_mouse_pressed(MouseButton::Left)
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;
