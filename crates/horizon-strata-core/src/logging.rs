//! Logging facilities for Horizon Strata.
//!
//! Horizon Strata uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_strata::dispatch=debug")
//!         .init();
//!
//!     // Your application code...
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Scene graph target (add, release, destroy).
    pub const TREE: &str = "horizon_strata::tree";
    /// Event queue target (enqueue, merge, cancel).
    pub const QUEUE: &str = "horizon_strata_core::queue";
    /// Dispatcher target (routing, focus timer, clicks).
    pub const DISPATCH: &str = "horizon_strata::dispatch";
    /// Compositor target (layer passes, redraws).
    pub const COMPOSITOR: &str = "horizon_strata::compositor";
    /// Root window target (step loop, host bridge).
    pub const WINDOW: &str = "horizon_strata::window";
    /// Raster target.
    pub const RENDER: &str = "horizon_strata_render::raster";
}
