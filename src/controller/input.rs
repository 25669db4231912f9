//! Keyboard state and key-to-rotation mapping
use std::collections::HashSet;

use winit::event::ElementState;
use winit::keyboard::KeyCode;

use crate::controller::frame_updater::{Rotation, RotationInputs};

/// Keys currently held down, fed from window keyboard events.
#[derive(Debug, Default)]
pub struct InputState {
    pub pressed_keys: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the key went from released to pressed.
    pub fn process_key(&mut self, code: KeyCode, state: ElementState) -> bool {
        match state {
            ElementState::Pressed => self.pressed_keys.insert(code),
            ElementState::Released => {
                self.pressed_keys.remove(&code);
                false
            }
        }
    }

    pub fn is_key_pressed(&self, code: KeyCode) -> bool {
        self.pressed_keys.contains(&code)
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
    }
}

/// Key mapping configuration
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub pitch_up: KeyCode,
    pub pitch_down: KeyCode,
    pub yaw_right: KeyCode,
    pub yaw_left: KeyCode,
    pub roll_cw: KeyCode,
    pub roll_ccw: KeyCode,
    pub toggle_depth_order: KeyCode,
    pub toggle_overlay: KeyCode,
    pub quit: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            pitch_up: KeyCode::ArrowUp,
            pitch_down: KeyCode::ArrowDown,
            yaw_right: KeyCode::ArrowRight,
            yaw_left: KeyCode::ArrowLeft,
            roll_cw: KeyCode::KeyF,
            roll_ccw: KeyCode::KeyG,
            toggle_depth_order: KeyCode::KeyM,
            toggle_overlay: KeyCode::KeyH,
            quit: KeyCode::Escape,
        }
    }
}

impl KeyBindings {
    pub fn rotation_key(&self, rotation: Rotation) -> KeyCode {
        match rotation {
            Rotation::PitchUp => self.pitch_up,
            Rotation::PitchDown => self.pitch_down,
            Rotation::YawRight => self.yaw_right,
            Rotation::YawLeft => self.yaw_left,
            Rotation::RollCw => self.roll_cw,
            Rotation::RollCcw => self.roll_ccw,
        }
    }
}

/// High-level input processor
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    bindings: KeyBindings,
}

impl InputProcessor {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Snapshot of the six rotation keys for this frame.
    pub fn rotation_inputs(&self, input: &InputState) -> RotationInputs {
        let mut inputs = RotationInputs::default();
        for rotation in Rotation::ALL {
            inputs.set(rotation, input.is_key_pressed(self.bindings.rotation_key(rotation)));
        }
        inputs
    }

    pub fn wants_to_quit(&self, code: KeyCode) -> bool {
        code == self.bindings.quit
    }

    pub fn wants_to_toggle_depth_order(&self, code: KeyCode) -> bool {
        code == self.bindings.toggle_depth_order
    }

    pub fn wants_to_toggle_overlay(&self, code: KeyCode) -> bool {
        code == self.bindings.toggle_overlay
    }
}
