//! Core systems for Horizon Strata.
//!
//! This crate provides the building blocks the toolkit's dispatch pipeline is
//! made of, independent of the scene graph:
//!
//! - **Widget ids**: arena keys naming scene-graph nodes
//! - **Event model**: event kinds with stable bitset wire values, event records and payloads
//! - **Event queue**: FIFO queue with de-duplication, merging and targeted cancellation
//! - **Devices**: key codes, mouse buttons and per-widget grab sets
//! - **Values**: typed payloads for value-changed and message events
//! - **Clocks**: monotonic time sources for the dispatcher's timers
//!
//! # Example
//!
//! ```
//! use horizon_strata_core::{Event, EventKind, EventQueue, DEFAULT_MERGEABLE, WidgetId};
//! use horizon_strata_render::Point;
//!
//! let mut queue = EventQueue::new();
//! let widget = WidgetId::default();
//!
//! queue.enqueue(Event::pointer_motion(widget, Point::new(1.0, 1.0), Point::new(1.0, 1.0)), DEFAULT_MERGEABLE);
//! queue.enqueue(Event::pointer_motion(widget, Point::new(3.0, 2.0), Point::new(2.0, 1.0)), DEFAULT_MERGEABLE);
//!
//! let event = queue.pop().unwrap();
//! assert_eq!(event.kind(), EventKind::PointerMotion);
//! assert_eq!(event.delta(), Some(Point::new(3.0, 2.0)));
//! assert!(queue.is_empty());
//! ```

pub mod clock;
pub mod device;
mod error;
pub mod event;
pub mod key;
pub mod logging;
pub mod queue;
pub mod value;

pub use clock::{Clock, ManualClock, SystemClock};
pub use device::{Device, DeviceSet, MouseButton};
pub use error::{CoreError, CoreResult};
pub use event::{Event, EventId, EventKind, EventKinds, EventPayload, WidgetId};
pub use key::{KeyCode, RESERVED_BLOCK_START};
pub use queue::{DEFAULT_MERGEABLE, EnqueueOutcome, EventQueue};
pub use value::Value;
