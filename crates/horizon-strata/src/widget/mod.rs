//! Widget system for Horizon Strata.
//!
//! This module provides the scene graph and the widget contract:
//!
//! - [`WidgetTree`]: the arena holding every widget and its links
//! - [`WidgetNode`]: identity, geometry, status, style, support traits and
//!   the owned raster of one widget
//! - [`SupportTraits`]: the capability flags the dispatcher consults
//! - [`Widget`]: the behavior a concrete widget plugs into a node
//! - [`WidgetContext`]: what an event handler may do to the tree and queue
//!
//! # Creating a Widget
//!
//! A concrete widget supplies a paint routine and an event handler, and
//! declares which event kinds it handles. Kinds it does not handle pass to
//! the widget beneath when the node's passable mask allows it.
//!
//! ```
//! use horizon_strata::widget::{PaintContext, Widget, WidgetContext};
//! use horizon_strata::core::{Event, EventKind, EventKinds};
//! use horizon_strata::render::Color;
//!
//! struct Toggle {
//!     on: bool,
//! }
//!
//! impl Widget for Toggle {
//!     fn supported_events(&self) -> EventKinds {
//!         EventKinds::BUTTON_CLICK
//!     }
//!
//!     fn paint(&self, ctx: &mut PaintContext<'_>) {
//!         ctx.fill(if self.on { Color::GREEN } else { Color::GRAY });
//!     }
//!
//!     fn event(&mut self, ctx: &mut WidgetContext<'_>, event: &Event) -> bool {
//!         if event.kind() == EventKind::ButtonClick {
//!             self.on = !self.on;
//!             ctx.emit_value_changed(self.on);
//!             ctx.update(ctx.widget());
//!             return true;
//!         }
//!         false
//!     }
//! }
//! ```

use std::any::Any;

use horizon_strata_core::{Event, EventKinds, WidgetId};
use horizon_strata_render::{Area, Color, Raster};

mod context;
mod node;
mod panel;
pub mod support;
mod tree;

#[cfg(test)]
mod tests;

pub use context::WidgetContext;
pub use node::{DEFAULT_LAYER, Stacking, Status, Style, StyleValue, WidgetNode};
pub use panel::Panel;
pub use support::{Activatable, Enterable, PointerFocusable, SupportTraits, Visualizable};
pub use tree::{EventCallback, WidgetTree};

/// The behavior of a concrete widget.
///
/// Both methods have empty defaults, so a purely decorative widget only
/// implements [`paint`](Widget::paint) and a purely logical one only
/// [`event`](Widget::event).
pub trait Widget: Any {
    /// Event kinds this widget handles.
    ///
    /// The hit test uses this to decide whether a widget under the pointer
    /// takes an event or lets it pass.
    fn supported_events(&self) -> EventKinds {
        EventKinds::empty()
    }

    /// Redraw the widget's raster.
    ///
    /// The raster is cleared to transparent before the call. The tree may be
    /// read but not changed.
    fn paint(&self, ctx: &mut PaintContext<'_>) {
        let _ = ctx;
    }

    /// Handle an event. Returns whether the event was consumed.
    fn event(&mut self, ctx: &mut WidgetContext<'_>, event: &Event) -> bool {
        let _ = (ctx, event);
        false
    }
}

/// Context passed to [`Widget::paint`].
pub struct PaintContext<'a> {
    raster: &'a mut Raster,
    tree: &'a WidgetTree,
    widget: WidgetId,
}

impl<'a> PaintContext<'a> {
    pub(crate) fn new(raster: &'a mut Raster, tree: &'a WidgetTree, widget: WidgetId) -> Self {
        Self {
            raster,
            tree,
            widget,
        }
    }

    /// The widget being painted.
    pub fn widget(&self) -> WidgetId {
        self.widget
    }

    /// The widget's node (its raster is lent out while painting).
    pub fn node(&self) -> Option<&'a WidgetNode> {
        self.tree.get(self.widget)
    }

    /// Read-only view of the whole tree.
    pub fn tree(&self) -> &'a WidgetTree {
        self.tree
    }

    /// The raster being drawn.
    pub fn raster(&mut self) -> &mut Raster {
        self.raster
    }

    /// The widget's bounds in its own coordinates.
    pub fn rect(&self) -> Area {
        Area::from_origin_size(Default::default(), self.raster.extends())
    }

    /// Fill the whole raster.
    pub fn fill(&mut self, color: Color) {
        self.raster.clear(color);
    }

    /// Fill an area given in widget coordinates.
    pub fn fill_area(&mut self, area: Area, color: Color) {
        self.raster.fill_area(area, color);
    }
}
