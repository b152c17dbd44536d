//! Prelude module for Horizon Strata.
//!
//! ```
//! use horizon_strata::prelude::*;
//! ```

// ============================================================================
// Core Types
// ============================================================================

pub use horizon_strata_core::{
    Clock, Device, Event, EventKind, EventKinds, KeyCode, ManualClock, MouseButton, Value,
    WidgetId,
};
pub use horizon_strata_render::{Area, Color, Point, Size};

// ============================================================================
// Widgets
// ============================================================================

pub use crate::widget::{
    PaintContext, Panel, Stacking, Status, Style, Widget, WidgetContext, WidgetTree,
};

// ============================================================================
// Root Window
// ============================================================================

pub use crate::config::ToolkitConfig;
pub use crate::error::{Result, StrataError};
pub use crate::window::{HeadlessBridge, HostBridge, HostInput, MainWindow};
