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

//! Translation from `winit` window events to engine [`InputEvent`]s.

use lantern_core::platform::{InputEvent, MouseButton};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Converts a window event into an [`InputEvent`].
///
/// Returns `None` for everything that is not direct user input (resize,
/// focus, close) as well as for key repeats and zero scroll deltas.
pub fn translate_winit_input(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            let PhysicalKey::Code(code) = event.physical_key else {
                return None;
            };
            let key_code = key_name(code);
            match event.state {
                ElementState::Pressed if !event.repeat => Some(InputEvent::KeyPressed { key_code }),
                ElementState::Released => Some(InputEvent::KeyReleased { key_code }),
                ElementState::Pressed => None,
            }
        }
        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::MouseMoved {
            x: position.x as f32,
            y: position.y as f32,
        }),
        WindowEvent::MouseInput { state, button, .. } => {
            let button = mouse_button(*button);
            Some(match state {
                ElementState::Pressed => InputEvent::MouseButtonPressed { button },
                ElementState::Released => InputEvent::MouseButtonReleased { button },
            })
        }
        WindowEvent::MouseWheel { delta, .. } => {
            let (delta_x, delta_y) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                MouseScrollDelta::PixelDelta(p) => (p.x as f32, p.y as f32),
            };
            (delta_x != 0.0 || delta_y != 0.0)
                .then_some(InputEvent::MouseWheelScrolled { delta_x, delta_y })
        }
        _ => None,
    }
}

/// Physical key name, e.g. `"KeyW"` or `"Space"`.
fn key_name(code: KeyCode) -> String {
    format!("{code:?}")
}

fn mouse_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(id) => MouseButton::Other(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::{PhysicalPosition, PhysicalSize};
    use winit::event::{DeviceId, TouchPhase};

    #[test]
    fn key_names_follow_physical_codes() {
        assert_eq!(key_name(KeyCode::KeyW), "KeyW");
        assert_eq!(key_name(KeyCode::Escape), "Escape");
    }

    #[test]
    fn mouse_buttons_map_one_to_one() {
        assert_eq!(mouse_button(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(mouse_button(WinitMouseButton::Forward), MouseButton::Forward);
        assert_eq!(mouse_button(WinitMouseButton::Other(9)), MouseButton::Other(9));
    }

    #[test]
    fn mouse_press_and_release() {
        let press = WindowEvent::MouseInput {
            device_id: DeviceId::dummy(),
            state: ElementState::Pressed,
            button: WinitMouseButton::Middle,
        };
        assert_eq!(
            translate_winit_input(&press),
            Some(InputEvent::MouseButtonPressed {
                button: MouseButton::Middle
            })
        );
        let release = WindowEvent::MouseInput {
            device_id: DeviceId::dummy(),
            state: ElementState::Released,
            button: WinitMouseButton::Middle,
        };
        assert_eq!(
            translate_winit_input(&release),
            Some(InputEvent::MouseButtonReleased {
                button: MouseButton::Middle
            })
        );
    }

    #[test]
    fn cursor_position_is_forwarded() {
        let moved = WindowEvent::CursorMoved {
            device_id: DeviceId::dummy(),
            position: PhysicalPosition::new(12.5, 40.0),
        };
        assert_eq!(
            translate_winit_input(&moved),
            Some(InputEvent::MouseMoved { x: 12.5, y: 40.0 })
        );
    }

    #[test]
    fn zero_scroll_is_dropped() {
        let still = WindowEvent::MouseWheel {
            device_id: DeviceId::dummy(),
            delta: MouseScrollDelta::LineDelta(0.0, 0.0),
            phase: TouchPhase::Moved,
        };
        assert_eq!(translate_winit_input(&still), None);

        let pixels = WindowEvent::MouseWheel {
            device_id: DeviceId::dummy(),
            delta: MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -3.0)),
            phase: TouchPhase::Moved,
        };
        assert_eq!(
            translate_winit_input(&pixels),
            Some(InputEvent::MouseWheelScrolled {
                delta_x: 0.0,
                delta_y: -3.0
            })
        );
    }

    #[test]
    fn window_events_are_not_input() {
        assert_eq!(
            translate_winit_input(&WindowEvent::Resized(PhysicalSize::new(64, 64))),
            None
        );
        assert_eq!(translate_winit_input(&WindowEvent::CloseRequested), None);
    }
}
