//! Toolkit configuration.
//!
//! [`ToolkitConfig`] gathers the tunables of the root window and the
//! dispatcher. Every field has a default, so a configuration file only needs
//! to name what it changes:
//!
//! ```
//! use horizon_strata::config::ToolkitConfig;
//!
//! let config = ToolkitConfig::from_toml_str(r#"
//! [window]
//! title = "Mixer"
//! width = 640
//!
//! [dispatch]
//! click_radius = 3.0
//! "#).unwrap();
//!
//! assert_eq!(config.window.title, "Mixer");
//! assert_eq!(config.window.width, 640);
//! assert_eq!(config.window.height, 600);
//! assert_eq!(config.dispatch.click_interval_ms, 300);
//! ```

use std::path::Path;
use std::time::Duration;

use horizon_strata_render::{Color, Size};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default click synthesis radius, in logical pixels.
pub const DEFAULT_CLICK_RADIUS: f64 = 5.0;
/// Default click synthesis interval, in milliseconds.
pub const DEFAULT_CLICK_INTERVAL_MS: u64 = 300;
/// Default pointer rest time before focus-in, in milliseconds.
pub const DEFAULT_FOCUS_IN_MS: u64 = 200;
/// Default pointer rest time before focus-out, in milliseconds.
pub const DEFAULT_FOCUS_OUT_MS: u64 = 5000;
/// Default cap on events dispatched per step.
pub const DEFAULT_MAX_EVENTS_PER_STEP: usize = 10_000;

/// Root window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    /// Logical width.
    pub width: u32,
    /// Logical height.
    pub height: u32,
    /// Device pixels per logical unit.
    pub scale: f64,
    /// Root background as `#rrggbb` or `#rrggbbaa`.
    pub background: String,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Strata".to_owned(),
            width: 800,
            height: 600,
            scale: 1.0,
            background: "#202020ff".to_owned(),
        }
    }
}

impl WindowSettings {
    /// Logical size of the root window.
    pub fn size(&self) -> Size {
        Size::from((self.width, self.height))
    }

    /// The parsed background color. Unparseable values fall back to dark gray.
    pub fn background_color(&self) -> Color {
        Color::from_hex(&self.background).unwrap_or(Color::DARK_GRAY)
    }
}

/// Dispatcher settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Maximum pointer travel between press and release for a click.
    pub click_radius: f64,
    /// Maximum time between press and release for a click.
    pub click_interval_ms: u64,
    /// Pointer rest time before focus-in, for newly created widgets.
    pub focus_in_ms: u64,
    /// Pointer rest time before focus-out, for newly created widgets.
    pub focus_out_ms: u64,
    /// Upper bound on events dispatched by one `step()`.
    pub max_events_per_step: usize,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            click_radius: DEFAULT_CLICK_RADIUS,
            click_interval_ms: DEFAULT_CLICK_INTERVAL_MS,
            focus_in_ms: DEFAULT_FOCUS_IN_MS,
            focus_out_ms: DEFAULT_FOCUS_OUT_MS,
            max_events_per_step: DEFAULT_MAX_EVENTS_PER_STEP,
        }
    }
}

impl DispatchSettings {
    pub fn click_interval(&self) -> Duration {
        Duration::from_millis(self.click_interval_ms)
    }

    pub fn focus_in(&self) -> Duration {
        Duration::from_millis(self.focus_in_ms)
    }

    pub fn focus_out(&self) -> Duration {
        Duration::from_millis(self.focus_out_ms)
    }
}

/// Complete toolkit configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    pub window: WindowSettings,
    pub dispatch: DispatchSettings,
}

impl ToolkitConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key, reason: &str| ConfigError::Invalid {
            key,
            reason: reason.to_owned(),
        };

        if self.window.width == 0 {
            return Err(invalid("window.width", "must be positive"));
        }
        if self.window.height == 0 {
            return Err(invalid("window.height", "must be positive"));
        }
        if !self.window.scale.is_finite() || self.window.scale <= 0.0 {
            return Err(invalid("window.scale", "must be a positive number"));
        }
        if Color::from_hex(&self.window.background).is_none() {
            return Err(invalid("window.background", "expected #rrggbb or #rrggbbaa"));
        }
        if !self.dispatch.click_radius.is_finite() || self.dispatch.click_radius < 0.0 {
            return Err(invalid("dispatch.click_radius", "must not be negative"));
        }
        if self.dispatch.focus_in_ms >= self.dispatch.focus_out_ms {
            return Err(invalid(
                "dispatch.focus_in_ms",
                "must be smaller than dispatch.focus_out_ms",
            ));
        }
        if self.dispatch.max_events_per_step == 0 {
            return Err(invalid("dispatch.max_events_per_step", "must be positive"));
        }
        Ok(())
    }
}
