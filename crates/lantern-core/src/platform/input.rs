// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Backend-agnostic input events and the module that tracks input state.

use crate::event::Event;
use crate::module::{Module, ModuleError};
use std::any::Any;
use std::collections::HashSet;

/// An engine-internal representation of a user input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A keyboard key was pressed.
    KeyPressed {
        /// A string representation of the physical key code.
        key_code: String,
    },
    /// A keyboard key was released.
    KeyReleased {
        /// A string representation of the physical key code.
        key_code: String,
    },
    /// A mouse button was pressed.
    MouseButtonPressed {
        /// The mouse button that was pressed.
        button: MouseButton,
    },
    /// A mouse button was released.
    MouseButtonReleased {
        /// The mouse button that was released.
        button: MouseButton,
    },
    /// The mouse cursor moved.
    MouseMoved {
        /// The new x-coordinate of the cursor.
        x: f32,
        /// The new y-coordinate of the cursor.
        y: f32,
    },
    /// The mouse wheel was scrolled.
    MouseWheelScrolled {
        /// The horizontal scroll delta.
        delta_x: f32,
        /// The vertical scroll delta.
        delta_y: f32,
    },
}

/// An engine-internal representation of a mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// The left mouse button.
    Left,
    /// The right mouse button.
    Right,
    /// The middle mouse button.
    Middle,
    /// The back mouse button.
    Back,
    /// The forward mouse button.
    Forward,
    /// Another mouse button, identified by a numeric code.
    Other(u16),
}

/// Snapshot of what is currently held, plus per-frame deltas.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: HashSet<String>,
    buttons: HashSet<MouseButton>,
    cursor: (f32, f32),
    cursor_delta: (f32, f32),
    wheel: (f32, f32),
}

impl InputState {
    /// Folds one event into the state.
    pub fn apply(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyPressed { key_code } => {
                self.keys.insert(key_code.clone());
            }
            InputEvent::KeyReleased { key_code } => {
                self.keys.remove(key_code);
            }
            InputEvent::MouseButtonPressed { button } => {
                self.buttons.insert(*button);
            }
            InputEvent::MouseButtonReleased { button } => {
                self.buttons.remove(button);
            }
            InputEvent::MouseMoved { x, y } => {
                self.cursor_delta.0 += x - self.cursor.0;
                self.cursor_delta.1 += y - self.cursor.1;
                self.cursor = (*x, *y);
            }
            InputEvent::MouseWheelScrolled { delta_x, delta_y } => {
                self.wheel.0 += delta_x;
                self.wheel.1 += delta_y;
            }
        }
    }

    /// Returns `true` while the key is held.
    pub fn is_key_down(&self, key_code: &str) -> bool {
        self.keys.contains(key_code)
    }

    /// Returns `true` while the button is held.
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Last known cursor position.
    pub fn cursor(&self) -> (f32, f32) {
        self.cursor
    }

    /// Cursor movement accumulated this frame.
    pub fn cursor_delta(&self) -> (f32, f32) {
        self.cursor_delta
    }

    /// Wheel scroll accumulated this frame.
    pub fn wheel(&self) -> (f32, f32) {
        self.wheel
    }

    /// Clears the per-frame deltas.
    pub fn end_frame(&mut self) {
        self.cursor_delta = (0.0, 0.0);
        self.wheel = (0.0, 0.0);
    }
}

/// Tracks input state and rebroadcasts events to subscribers.
#[derive(Debug, Default)]
pub struct InputModule {
    state: InputState,
    on_input: Event<InputEvent>,
}

impl InputModule {
    /// Creates the module.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the state, then notifies subscribers.
    pub fn push_event(&mut self, event: InputEvent) {
        self.state.apply(&event);
        self.on_input.invoke(&event);
    }

    /// The event invoked for every input event.
    pub fn on_input(&self) -> &Event<InputEvent> {
        &self.on_input
    }

    /// Current input state.
    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Resets per-frame deltas. Called by the engine at the end of each tick.
    pub fn end_frame(&mut self) {
        self.state.end_frame();
    }
}

impl Module for InputModule {
    fn name(&self) -> &'static str {
        "input"
    }

    fn shutdown(&mut self) -> Result<(), ModuleError> {
        self.on_input.clear();
        self.state = InputState::default();
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn key(code: &str, pressed: bool) -> InputEvent {
        if pressed {
            InputEvent::KeyPressed { key_code: code.to_owned() }
        } else {
            InputEvent::KeyReleased { key_code: code.to_owned() }
        }
    }

    #[test]
    fn keys_and_buttons_are_tracked() {
        let mut state = InputState::default();
        state.apply(&key("KeyW", true));
        state.apply(&InputEvent::MouseButtonPressed { button: MouseButton::Left });
        assert!(state.is_key_down("KeyW"));
        assert!(state.is_button_down(MouseButton::Left));

        state.apply(&key("KeyW", false));
        state.apply(&InputEvent::MouseButtonReleased { button: MouseButton::Left });
        assert!(!state.is_key_down("KeyW"));
        assert!(!state.is_button_down(MouseButton::Left));
    }

    #[test]
    fn deltas_accumulate_until_end_of_frame() {
        let mut state = InputState::default();
        state.apply(&InputEvent::MouseMoved { x: 10.0, y: 5.0 });
        state.apply(&InputEvent::MouseMoved { x: 15.0, y: 5.0 });
        state.apply(&InputEvent::MouseWheelScrolled { delta_x: 0.0, delta_y: 1.0 });
        state.apply(&InputEvent::MouseWheelScrolled { delta_x: 0.0, delta_y: 2.0 });

        assert_eq!(state.cursor(), (15.0, 5.0));
        assert_eq!(state.cursor_delta(), (15.0, 5.0));
        assert_eq!(state.wheel(), (0.0, 3.0));

        state.end_frame();
        assert_eq!(state.cursor_delta(), (0.0, 0.0));
        assert_eq!(state.wheel(), (0.0, 0.0));
        assert_eq!(state.cursor(), (15.0, 5.0));
    }

    #[test]
    fn module_notifies_after_updating_state() {
        let mut module = InputModule::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        module.on_input().subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        module.push_event(key("Space", true));
        assert!(module.state().is_key_down("Space"));
        assert_eq!(*seen.lock().unwrap(), vec![key("Space", true)]);
    }
}
