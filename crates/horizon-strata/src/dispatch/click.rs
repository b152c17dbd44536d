//! Click synthesis.
//!
//! A press followed by a release of the same button, close in space and
//! time, is a click. Radius and interval come from
//! [`DispatchSettings`](crate::config::DispatchSettings).

use std::collections::BTreeMap;
use std::time::Duration;

use horizon_strata_core::{MouseButton, WidgetId};
use horizon_strata_render::Point;

/// A button held down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Press {
    pub widget: WidgetId,
    pub position: Point,
    pub at: Duration,
}

/// Tracks held buttons and decides which releases are clicks.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    presses: BTreeMap<MouseButton, Press>,
    radius: f64,
    interval: Duration,
}

impl ClickTracker {
    pub fn new(radius: f64, interval: Duration) -> Self {
        Self {
            presses: BTreeMap::new(),
            radius,
            interval,
        }
    }

    /// Record a press. A second press of a held button replaces the first.
    pub fn press(&mut self, button: MouseButton, widget: WidgetId, position: Point, at: Duration) {
        self.presses.insert(
            button,
            Press {
                widget,
                position,
                at,
            },
        );
    }

    /// Forget a held button and return its press.
    pub fn release(&mut self, button: MouseButton) -> Option<Press> {
        self.presses.remove(&button)
    }

    /// The lowest held button, if any.
    pub fn held(&self) -> Option<(MouseButton, Press)> {
        self.presses.iter().next().map(|(b, p)| (*b, *p))
    }

    pub fn is_held(&self, button: MouseButton) -> bool {
        self.presses.contains_key(&button)
    }

    /// Whether releasing at `position` and time `at` completes a click.
    pub fn is_click(&self, press: &Press, position: Point, at: Duration) -> bool {
        press.position.distance_to(position) <= self.radius
            && at.saturating_sub(press.at) <= self.interval
    }
}
