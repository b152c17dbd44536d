//! Event dispatching for the root window.
//!
//! The [`Dispatcher`] sits between the host bridge and the widgets:
//!
//! 1. **Translation**: raw [`HostInput`] becomes core events. Pointer events
//!    are routed by hit testing, key events by keyboard entry and hot keys,
//!    and grabbed devices override both.
//! 2. **Synthesis**: button clicks are synthesized from press/release pairs,
//!    pointer-focus events from the pointer-rest timer, and hover status from
//!    pointer motion.
//! 3. **Delivery**: [`Dispatcher::deliver`] hands a popped event to its
//!    widget's handler and then to the registered callback.
//!
//! Every produced event goes through the root queue; nothing is delivered
//! directly from translation.

mod click;
mod focus;

use std::time::Duration;

use horizon_strata_core::logging::targets;
use horizon_strata_core::{
    Device, EnqueueOutcome, Event, EventKind, EventQueue, KeyCode, MouseButton, WidgetId,
};
use horizon_strata_render::{Area, Point, Size};
use tracing::{debug, trace};

use crate::config::DispatchSettings;
use crate::widget::{WidgetContext, WidgetTree};
use crate::window::HostInput;

pub use click::{ClickTracker, Press};
pub use focus::{FocusState, FocusTimer, FocusTransition};
pub use hit_test::{focus_target, front_to_back, hit_test, hover_target};

/// Input translation and routing state of one root window.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    pointer: Option<Point>,
    clicks: ClickTracker,
    focus: FocusTimer,
    hovered: Option<WidgetId>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(&DispatchSettings::default())
    }
}

fn post(tree: &WidgetTree, queue: &mut EventQueue, event: Event) -> EnqueueOutcome {
    trace!(
        target: targets::DISPATCH,
        kind = %event.kind(),
        widget = event.widget().as_raw(),
        "routed"
    );
    let mergeable = tree.mergeable(event.widget());
    queue.enqueue(event, mergeable)
}

impl Dispatcher {
    pub fn new(settings: &DispatchSettings) -> Self {
        Self {
            pointer: None,
            clicks: ClickTracker::new(settings.click_radius, settings.click_interval()),
            focus: FocusTimer::new(),
            hovered: None,
        }
    }

    /// Last known pointer position in root coordinates.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// The widget currently in hover status.
    pub fn hovered(&self) -> Option<WidgetId> {
        self.hovered
    }

    pub fn focus_state(&self) -> FocusState {
        self.focus.state()
    }

    /// Translate one host input into queued events.
    pub fn handle_input(
        &mut self,
        tree: &mut WidgetTree,
        queue: &mut EventQueue,
        window: WidgetId,
        input: HostInput,
        now: Duration,
    ) {
        match input {
            HostInput::PointerMoved(position) => {
                self.pointer_moved(tree, queue, window, position, now)
            }
            HostInput::Button { button, pressed } => {
                if pressed {
                    self.button_pressed(tree, queue, window, button, now);
                } else {
                    self.button_released(tree, queue, window, button, now);
                }
            }
            HostInput::Key { key, pressed } => self.key(tree, queue, window, key, pressed),
            HostInput::Scroll(delta) => {
                let position = self.pointer.unwrap_or_default();
                let target = hit_test(tree, window, position, EventKind::WheelScroll);
                post(tree, queue, Event::wheel_scroll(target, position, delta));
            }
            HostInput::Configure(size) => {
                post(tree, queue, Event::configure_request(window, window_area(size)));
            }
            HostInput::CloseRequested => {
                post(tree, queue, Event::close_request(window));
            }
        }
    }

    fn pointer_moved(
        &mut self,
        tree: &mut WidgetTree,
        queue: &mut EventQueue,
        window: WidgetId,
        position: Point,
        now: Duration,
    ) {
        let delta = position - self.pointer.unwrap_or(position);
        self.pointer = Some(position);

        if let Some(retracted) = self.focus.on_motion(now) {
            post(tree, queue, Event::pointer_focus_out(retracted, position));
        }
        self.update_hover(tree, queue, window, position);

        let event = match self.clicks.held() {
            Some((button, press)) => {
                let target = tree
                    .device_holder(window, Device::Mouse(button))
                    .or_else(|| tree.contains(press.widget).then_some(press.widget))
                    .unwrap_or(window);
                Event::pointer_drag(target, position, delta, button)
            }
            None => {
                let target = hit_test(tree, window, position, EventKind::PointerMotion);
                Event::pointer_motion(target, position, delta)
            }
        };
        post(tree, queue, event);
    }

    fn update_hover(
        &mut self,
        tree: &mut WidgetTree,
        queue: &mut EventQueue,
        window: WidgetId,
        position: Point,
    ) {
        let hovered = hover_target(tree, window, position);
        if hovered == self.hovered {
            return;
        }
        let mut ctx = WidgetContext::new(tree, queue, window);
        if let Some(old) = self.hovered {
            ctx.set_hover(old, false);
        }
        if let Some(new) = hovered {
            ctx.set_hover(new, true);
        }
        self.hovered = hovered;
    }

    fn button_pressed(
        &mut self,
        tree: &mut WidgetTree,
        queue: &mut EventQueue,
        window: WidgetId,
        button: MouseButton,
        now: Duration,
    ) {
        let position = self.pointer.unwrap_or_default();
        let target = match tree.device_holder(window, Device::Mouse(button)) {
            Some(holder) => {
                debug!(target: targets::DISPATCH, widget = holder.as_raw(), button = button.id(), "press routed by grab");
                holder
            }
            None => hit_test(tree, window, position, EventKind::ButtonPress),
        };
        self.clicks.press(button, target, position, now);
        post(tree, queue, Event::button_press(target, button, position));
    }

    fn button_released(
        &mut self,
        tree: &mut WidgetTree,
        queue: &mut EventQueue,
        window: WidgetId,
        button: MouseButton,
        now: Duration,
    ) {
        let position = self.pointer.unwrap_or_default();
        let press = self.clicks.release(button);
        let target = tree
            .device_holder(window, Device::Mouse(button))
            .or_else(|| press.map(|p| p.widget).filter(|&w| tree.contains(w)))
            .unwrap_or_else(|| hit_test(tree, window, position, EventKind::ButtonRelease));

        post(tree, queue, Event::button_release(target, button, position));

        if let Some(press) = press
            && press.widget == target
            && self.clicks.is_click(&press, position, now)
        {
            debug!(target: targets::DISPATCH, widget = target.as_raw(), button = button.id(), "click");
            post(tree, queue, Event::button_click(target, button, position));
        }
    }

    fn key(
        &mut self,
        tree: &mut WidgetTree,
        queue: &mut EventQueue,
        window: WidgetId,
        key: KeyCode,
        pressed: bool,
    ) {
        let position = self.pointer.unwrap_or_default();
        let target = tree
            .device_holder(window, Device::Keys(key))
            .or_else(|| tree.entered_widget(window))
            .or_else(|| tree.hot_key_target(window, key));
        let Some(target) = target else {
            debug!(target: targets::DISPATCH, %key, "no widget for key, dropped");
            return;
        };
        let event = if pressed {
            Event::key_press(target, key, position)
        } else {
            Event::key_release(target, key, position)
        };
        post(tree, queue, event);
    }

    /// Run the pointer-rest timer at `now`.
    pub fn tick(
        &mut self,
        tree: &mut WidgetTree,
        queue: &mut EventQueue,
        window: WidgetId,
        now: Duration,
    ) {
        let Some(position) = self.pointer else {
            return;
        };
        let target = focus_target(tree, window, position)
            .and_then(|w| tree.get(w).map(|n| (w, n.support().focusable)));
        for transition in self.focus.tick(now, target) {
            let event = match transition {
                FocusTransition::In(w) => Event::pointer_focus_in(w, position),
                FocusTransition::Out(w) => Event::pointer_focus_out(w, position),
            };
            debug!(target: targets::DISPATCH, kind = %event.kind(), widget = event.widget().as_raw(), "focus timer");
            post(tree, queue, event);
        }
    }

    /// Forget pointer-related state for a window that was resized away from
    /// the pointer or lost it.
    pub fn reset_pointer(&mut self) {
        self.pointer = None;
        self.hovered = None;
        self.focus = FocusTimer::new();
    }

    /// Hand an event to its widget: the widget's own handler first, then the
    /// callback registered for the kind.
    ///
    /// Events whose widget no longer exists are skipped. Returns whether
    /// anything handled the event.
    pub fn deliver(tree: &mut WidgetTree, queue: &mut EventQueue, event: &Event) -> bool {
        let id = event.widget();
        if !tree.contains(id) {
            debug!(target: targets::DISPATCH, kind = %event.kind(), widget = id.as_raw(), "widget gone, skipped");
            return false;
        }

        let companion = tree.get(id).and_then(|n| n.focus_companion());
        if let Some(companion) = companion {
            let mut ctx = WidgetContext::new(tree, queue, id);
            match event.kind() {
                EventKind::PointerFocusIn => ctx.show(companion),
                EventKind::PointerFocusOut => ctx.hide(companion),
                _ => {}
            }
        }

        let mut handled = false;
        if let Some(mut behavior) = tree.take_behavior(id) {
            let mut ctx = WidgetContext::new(tree, queue, id);
            handled = behavior.event(&mut ctx, event);
            tree.restore_behavior(id, behavior);
        }

        if let Some(mut callback) = tree.take_callback(id, event.kind()) {
            let mut ctx = WidgetContext::new(tree, queue, id);
            callback(&mut ctx, event);
            tree.restore_callback(id, event.kind(), callback);
            handled = true;
        }

        trace!(target: targets::DISPATCH, kind = %event.kind(), widget = id.as_raw(), handled, "delivered");
        handled
    }
}

/// Area covering a root window of `size`.
pub(crate) fn window_area(size: Size) -> Area {
    Area::from_origin_size(Point::ZERO, size)
}
