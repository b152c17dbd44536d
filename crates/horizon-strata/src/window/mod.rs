//! The root window and its bridge to the host windowing system.
//!
//! [`MainWindow`] is the root of a widget tree. It owns the event queue, the
//! dispatcher state and the output frame, and talks to the windowing system
//! through a [`HostBridge`]:
//!
//! ```text
//! HostBridge::poll_input ──> Dispatcher ──> EventQueue ──> widgets
//!                                                 │
//! HostBridge::present <── Compositor <── damage <─┘
//! ```
//!
//! [`HeadlessBridge`] runs a window without a display, which is how the test
//! suite drives it. The [`winit_input`] module translates winit window events
//! for a bridge backed by a real window.

mod host;
mod main_window;
pub mod winit_input;

pub use host::{HeadlessBridge, HostBridge, HostInput};
pub use main_window::MainWindow;
