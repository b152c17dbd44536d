//! Translation of winit window events into [`HostInput`].
//!
//! Winit reports positions in physical pixels; the root window works in
//! logical units, so positions and pixel scroll deltas are divided by the
//! window scale. Line scroll deltas are converted to pixels first.

use horizon_strata_core::{KeyCode, MouseButton};
use horizon_strata_render::{Point, Size};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key as WinitKey, KeyLocation, NamedKey};

use super::host::HostInput;

/// Logical pixels per scroll line.
pub const PIXELS_PER_LINE: f64 = 20.0;

/// Converts a winit mouse button to a toolkit button.
pub fn from_winit_mouse_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(id) => MouseButton::Other(id),
    }
}

/// Converts a winit logical key to a key code.
///
/// Modifiers are split by `location`. Keys without a toolkit code map to
/// `None`.
pub fn key_code_from_winit(key: &WinitKey, location: KeyLocation) -> Option<KeyCode> {
    let right = location == KeyLocation::Right;
    match key {
        WinitKey::Character(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Some(KeyCode::Char(c)),
                _ => None,
            }
        }
        WinitKey::Named(named) => Some(match named {
            NamedKey::Space => KeyCode::Char(' '),
            NamedKey::Tab => KeyCode::Char('\t'),
            NamedKey::Enter => KeyCode::Char('\r'),
            NamedKey::Backspace => KeyCode::Backspace,
            NamedKey::Escape => KeyCode::Escape,
            NamedKey::Delete => KeyCode::Delete,
            NamedKey::Insert => KeyCode::Insert,

            NamedKey::ArrowLeft => KeyCode::ArrowLeft,
            NamedKey::ArrowUp => KeyCode::ArrowUp,
            NamedKey::ArrowRight => KeyCode::ArrowRight,
            NamedKey::ArrowDown => KeyCode::ArrowDown,
            NamedKey::PageUp => KeyCode::PageUp,
            NamedKey::PageDown => KeyCode::PageDown,
            NamedKey::Home => KeyCode::Home,
            NamedKey::End => KeyCode::End,

            NamedKey::Shift if right => KeyCode::ShiftRight,
            NamedKey::Shift => KeyCode::ShiftLeft,
            NamedKey::Control if right => KeyCode::ControlRight,
            NamedKey::Control => KeyCode::ControlLeft,
            NamedKey::Alt if right => KeyCode::AltRight,
            NamedKey::Alt => KeyCode::AltLeft,
            NamedKey::Super if right => KeyCode::SuperRight,
            NamedKey::Super => KeyCode::SuperLeft,
            NamedKey::ContextMenu => KeyCode::Menu,

            NamedKey::CapsLock => KeyCode::CapsLock,
            NamedKey::ScrollLock => KeyCode::ScrollLock,
            NamedKey::NumLock => KeyCode::NumLock,
            NamedKey::PrintScreen => KeyCode::PrintScreen,
            NamedKey::Pause => KeyCode::Pause,

            NamedKey::F1 => KeyCode::F1,
            NamedKey::F2 => KeyCode::F2,
            NamedKey::F3 => KeyCode::F3,
            NamedKey::F4 => KeyCode::F4,
            NamedKey::F5 => KeyCode::F5,
            NamedKey::F6 => KeyCode::F6,
            NamedKey::F7 => KeyCode::F7,
            NamedKey::F8 => KeyCode::F8,
            NamedKey::F9 => KeyCode::F9,
            NamedKey::F10 => KeyCode::F10,
            NamedKey::F11 => KeyCode::F11,
            NamedKey::F12 => KeyCode::F12,

            _ => return None,
        }),
        WinitKey::Unidentified(_) | WinitKey::Dead(_) => None,
    }
}

/// Translate one winit window event. Events the toolkit does not consume
/// map to `None`.
pub fn host_input_from_window_event(event: &WindowEvent, scale: f64) -> Option<HostInput> {
    match event {
        WindowEvent::CursorMoved { position, .. } => Some(HostInput::PointerMoved(Point::new(
            position.x / scale,
            position.y / scale,
        ))),
        WindowEvent::MouseInput { state, button, .. } => Some(HostInput::Button {
            button: from_winit_mouse_button(*button),
            pressed: *state == ElementState::Pressed,
        }),
        WindowEvent::KeyboardInput { event, .. } => {
            let key = key_code_from_winit(&event.logical_key, event.location)?;
            Some(HostInput::Key {
                key,
                pressed: event.state == ElementState::Pressed,
            })
        }
        WindowEvent::MouseWheel { delta, .. } => {
            let delta = match delta {
                MouseScrollDelta::LineDelta(x, y) => Point::new(
                    f64::from(*x) * PIXELS_PER_LINE,
                    f64::from(*y) * PIXELS_PER_LINE,
                ),
                MouseScrollDelta::PixelDelta(pos) => Point::new(pos.x / scale, pos.y / scale),
            };
            Some(HostInput::Scroll(delta))
        }
        WindowEvent::Resized(size) => Some(HostInput::Configure(Size::new(
            f64::from(size.width) / scale,
            f64::from(size.height) / scale,
        ))),
        WindowEvent::CloseRequested | WindowEvent::Destroyed => Some(HostInput::CloseRequested),
        _ => None,
    }
}
