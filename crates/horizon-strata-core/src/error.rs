//! Error types for Horizon Strata core.

use thiserror::Error;

/// Errors raised when decoding wire values.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// The value is not one of the fifteen event-kind wire values.
    #[error("unknown event kind wire value {0:#x}")]
    UnknownEventKind(u32),
    /// The value is neither ASCII nor inside the reserved key block.
    #[error("unknown key code {0:#x}")]
    UnknownKeyCode(u32),
}

/// Result type for core decoding operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

impl TryFrom<u32> for crate::event::EventKind {
    type Error = CoreError;

    fn try_from(bits: u32) -> CoreResult<Self> {
        Self::from_bits(bits).ok_or(CoreError::UnknownEventKind(bits))
    }
}

impl TryFrom<u32> for crate::key::KeyCode {
    type Error = CoreError;

    fn try_from(code: u32) -> CoreResult<Self> {
        Self::from_code(code).ok_or(CoreError::UnknownKeyCode(code))
    }
}
