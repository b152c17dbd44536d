//! Error types for the render crate.

use thiserror::Error;

/// Errors that can occur during raster operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Extends were negative, not finite, or exceed the raster size limit.
    #[error("invalid raster extends: {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },

    /// The scale factor was zero, negative or not finite.
    #[error("invalid scale factor: {0}")]
    InvalidScale(f64),

    /// The pixel buffer could not be allocated.
    #[error("failed to allocate a {width}x{height} raster")]
    AllocationFailed { width: u32, height: u32 },
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
