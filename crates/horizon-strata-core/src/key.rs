//! Key codes.
//!
//! Printable keys carry their ASCII character. Everything else lives in a
//! reserved block above the ASCII range. [`KeyCode::Any`] is a wildcard used
//! in hot-key lists: it matches every key through [`KeyCode::matches`] while
//! plain equality stays structural.

use std::fmt;

/// First code of the reserved (non-printable) block.
pub const RESERVED_BLOCK_START: u32 = 0xE000;

/// A keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyCode {
    /// Wildcard, matches every key in hot-key lists.
    Any,
    /// A printable ASCII character (includes space, tab and carriage return).
    Char(char),

    Backspace,
    Escape,
    Delete,

    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,

    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,
    SuperLeft,
    SuperRight,
    Menu,

    CapsLock,
    ScrollLock,
    NumLock,
    PrintScreen,
    Pause,
}

const RESERVED: [KeyCode; 38] = [
    KeyCode::Backspace,
    KeyCode::Escape,
    KeyCode::Delete,
    KeyCode::F1,
    KeyCode::F2,
    KeyCode::F3,
    KeyCode::F4,
    KeyCode::F5,
    KeyCode::F6,
    KeyCode::F7,
    KeyCode::F8,
    KeyCode::F9,
    KeyCode::F10,
    KeyCode::F11,
    KeyCode::F12,
    KeyCode::ArrowLeft,
    KeyCode::ArrowUp,
    KeyCode::ArrowRight,
    KeyCode::ArrowDown,
    KeyCode::PageUp,
    KeyCode::PageDown,
    KeyCode::Home,
    KeyCode::End,
    KeyCode::Insert,
    KeyCode::ShiftLeft,
    KeyCode::ShiftRight,
    KeyCode::ControlLeft,
    KeyCode::ControlRight,
    KeyCode::AltLeft,
    KeyCode::AltRight,
    KeyCode::SuperLeft,
    KeyCode::SuperRight,
    KeyCode::Menu,
    KeyCode::CapsLock,
    KeyCode::ScrollLock,
    KeyCode::NumLock,
    KeyCode::PrintScreen,
    KeyCode::Pause,
];

/// Code used for the [`KeyCode::Any`] wildcard.
const ANY_CODE: u32 = 0xFFFF_FFFF;

impl KeyCode {
    /// Numeric key code: ASCII for printable keys, the reserved block for the
    /// rest.
    pub fn code(self) -> u32 {
        match self {
            KeyCode::Any => ANY_CODE,
            KeyCode::Char(c) => c as u32,
            other => {
                let index = RESERVED.iter().position(|k| *k == other).unwrap_or(0);
                RESERVED_BLOCK_START + index as u32
            }
        }
    }

    /// Inverse of [`code`](Self::code).
    pub fn from_code(code: u32) -> Option<Self> {
        if code == ANY_CODE {
            return Some(KeyCode::Any);
        }
        if code >= RESERVED_BLOCK_START {
            return RESERVED
                .get((code - RESERVED_BLOCK_START) as usize)
                .copied();
        }
        char::from_u32(code)
            .filter(char::is_ascii)
            .map(KeyCode::Char)
    }

    /// Wildcard-aware comparison used for hot-key lookup.
    #[inline]
    pub fn matches(self, other: KeyCode) -> bool {
        self == KeyCode::Any || other == KeyCode::Any || self == other
    }

    /// Check if this is a modifier key.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            KeyCode::ShiftLeft
                | KeyCode::ShiftRight
                | KeyCode::ControlLeft
                | KeyCode::ControlRight
                | KeyCode::AltLeft
                | KeyCode::AltRight
                | KeyCode::SuperLeft
                | KeyCode::SuperRight
        )
    }

    /// Check if this is a navigation key.
    pub fn is_navigation(self) -> bool {
        matches!(
            self,
            KeyCode::ArrowLeft
                | KeyCode::ArrowUp
                | KeyCode::ArrowRight
                | KeyCode::ArrowDown
                | KeyCode::PageUp
                | KeyCode::PageDown
                | KeyCode::Home
                | KeyCode::End
        )
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Any => write!(f, "<any>"),
            KeyCode::Char(c) => write!(f, "{c:?}"),
            other => write!(f, "{other:?}"),
        }
    }
}
