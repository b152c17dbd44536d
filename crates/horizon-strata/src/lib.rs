//! Horizon Strata - the core of a retained-mode widget toolkit.
//!
//! The crate ties together three parts:
//!
//! - **Scene graph** ([`widget`]): an arena of widgets with parent/child
//!   links, per-widget support traits, rasters and styles
//! - **Event pipeline** ([`dispatch`]): host input becomes events that are
//!   queued at the root, merged, routed by hit testing, keyboard entry and
//!   device grabs, and delivered to one widget each
//! - **Compositor** ([`compositor`]): widget rasters are blitted layer by
//!   layer with clipping and blended into the window frame
//!
//! [`MainWindow`](window::MainWindow) owns all three and drives them from
//! its `step` loop.
//!
//! # Example
//!
//! ```
//! use horizon_strata::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let host = HeadlessBridge::new();
//!     let mut window = MainWindow::new(ToolkitConfig::default(), host.clone())?;
//!
//!     let panel = window
//!         .tree_mut()
//!         .insert_at(Panel::new(Color::BLUE), Area::new(20.0, 20.0, 100.0, 40.0));
//!     window.add(panel);
//!
//!     host.push_input(HostInput::CloseRequested);
//!     window.run();
//!     assert!(window.is_close_requested());
//!     Ok(())
//! }
//! ```

pub mod compositor;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod prelude;
pub mod widget;
pub mod window;

/// Events, queue, devices and clocks.
pub mod core {
    pub use horizon_strata_core::*;
}

/// Geometry, colors and rasters.
pub mod render {
    pub use horizon_strata_render::*;
}

pub use error::{ConfigError, HostError, Result, StrataError};
