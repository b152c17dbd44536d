//! Error types for Horizon Strata.
//!
//! Structural operations on the scene graph never fail with an error: they
//! answer with `Option`/`bool`. Errors are reserved for resources (rasters),
//! the host bridge and configuration loading.

use std::path::PathBuf;

use horizon_strata_render::RenderError;
use thiserror::Error;

/// Failures reported by a host bridge.
///
/// These never escape [`MainWindow::step`](crate::window::MainWindow::step):
/// the window turns them into a close-request for the root.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The output surface is gone.
    #[error("host surface lost: {0}")]
    SurfaceLost(String),
    /// Reading input from the host failed.
    #[error("host input failed: {0}")]
    Input(String),
    /// Handing a frame to the host failed.
    #[error("failed to present frame: {0}")]
    Present(String),
}

/// Errors raised while loading or validating a [`ToolkitConfig`](crate::config::ToolkitConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configuration text is not valid TOML for the expected schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range.
    #[error("invalid config value for '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// The main error type for Horizon Strata.
#[derive(Error, Debug)]
pub enum StrataError {
    /// Raster allocation or sizing failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    /// The host bridge failed.
    #[error("host error: {0}")]
    Host(#[from] HostError),
    /// The configuration is unusable.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for Horizon Strata operations.
pub type Result<T> = std::result::Result<T, StrataError>;
