//! Handler context.
//!
//! A [`WidgetContext`] pairs mutable access to the scene graph with the root
//! event queue. Operations that change what is on screen go through it so
//! that the matching expose-requests get queued: `update`, `show`, `hide`,
//! geometry changes, activation, navigation and destruction.

use horizon_strata_core::logging::targets;
use horizon_strata_core::{
    Device, EnqueueOutcome, Event, EventKind, EventQueue, Value, WidgetId,
};
use horizon_strata_render::{Area, Point, Size};
use tracing::{debug, trace};

use super::node::{Status, Style};
use super::tree::WidgetTree;

/// Mutable access to the tree and the queue on behalf of one widget.
pub struct WidgetContext<'a> {
    tree: &'a mut WidgetTree,
    queue: &'a mut EventQueue,
    widget: WidgetId,
}

impl<'a> WidgetContext<'a> {
    pub fn new(tree: &'a mut WidgetTree, queue: &'a mut EventQueue, widget: WidgetId) -> Self {
        Self {
            tree,
            queue,
            widget,
        }
    }

    /// The widget this context acts for.
    pub fn widget(&self) -> WidgetId {
        self.widget
    }

    pub fn tree(&self) -> &WidgetTree {
        &*self.tree
    }

    /// Direct tree access. Changes made this way do not queue redraws.
    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut *self.tree
    }

    pub fn queue(&self) -> &EventQueue {
        &*self.queue
    }

    /// Queue an event, merging according to its widget's mergeable mask.
    pub fn post(&mut self, event: Event) -> EnqueueOutcome {
        let mergeable = self.tree.mergeable(event.widget());
        self.queue.enqueue(event, mergeable)
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Schedule a redraw of `id` and, if it is visible, queue an
    /// expose-request for its absolute area.
    pub fn update(&mut self, id: WidgetId) {
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        node.raster.schedule_draw();
        if !self.tree.is_visible(id) {
            return;
        }
        if let Some(area) = self.tree.absolute_area(id) {
            self.post(Event::expose_request(id, area));
        }
    }

    /// Queue an expose-request for an area in root coordinates, on behalf of
    /// the root of `id`.
    pub fn expose(&mut self, id: WidgetId, area: Area) {
        if let Some(root) = self.tree.root(id) {
            self.post(Event::expose_request(root, area));
        }
    }

    fn update_all(&mut self, ids: &[WidgetId]) {
        for &id in ids {
            self.update(id);
        }
    }

    /// Show a widget and redraw it.
    pub fn show(&mut self, id: WidgetId) {
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        node.support_mut().visualizable.visible = true;
        for w in self.tree.subtree(id) {
            self.update(w);
        }
    }

    /// Hide a widget and expose the area it covered.
    pub fn hide(&mut self, id: WidgetId) {
        let covered = self
            .tree
            .is_visible(id)
            .then(|| self.tree.visible_area(id))
            .flatten();
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        node.support_mut().visualizable.visible = false;
        if let Some(area) = covered {
            self.expose(id, area);
        }
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Move and resize a widget. If the raster cannot be resized the widget
    /// keeps its previous state and no update is queued.
    pub fn set_area(&mut self, id: WidgetId, area: Area) -> bool {
        let old = self
            .tree
            .is_visible(id)
            .then(|| self.tree.visible_area(id))
            .flatten();
        let Some(node) = self.tree.get_mut(id) else {
            return false;
        };
        if !node.set_size(area.size) {
            return false;
        }
        node.set_position(area.origin);
        if let Some(old) = old {
            self.expose(id, old);
        }
        self.update(id);
        true
    }

    pub fn resize(&mut self, id: WidgetId, size: Size) -> bool {
        let Some(position) = self.tree.get(id).map(|n| n.position()) else {
            return false;
        };
        self.set_area(id, Area::from_origin_size(position, size))
    }

    pub fn move_to(&mut self, id: WidgetId, position: Point) -> bool {
        let Some(size) = self.tree.get(id).map(|n| n.size()) else {
            return false;
        };
        self.set_area(id, Area::from_origin_size(position, size))
    }

    /// Raise among siblings and redraw.
    pub fn raise(&mut self, id: WidgetId) -> bool {
        let raised = self.tree.raise(id);
        if raised {
            self.update(id);
        }
        raised
    }

    /// Lower among siblings and redraw what was in front of it.
    pub fn lower(&mut self, id: WidgetId) -> bool {
        let lowered = self.tree.lower(id);
        if lowered {
            self.update(id);
        }
        lowered
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Add `child` to `parent` and redraw it.
    pub fn add(&mut self, parent: WidgetId, child: WidgetId) -> Option<usize> {
        let old = self
            .tree
            .is_visible(child)
            .then(|| self.tree.visible_area(child))
            .flatten();
        if let Some(old) = old {
            self.expose(child, old);
        }
        let index = self.tree.add(parent, child)?;
        for w in self.tree.subtree(child) {
            self.update(w);
        }
        Some(index)
    }

    /// Release `child` from `parent`, exposing the area it covered.
    pub fn release(&mut self, parent: WidgetId, child: WidgetId) -> bool {
        let covered = self
            .tree
            .is_visible(child)
            .then(|| self.tree.visible_area(child))
            .flatten();
        if !self.tree.release(parent, child) {
            return false;
        }
        if let Some(area) = covered {
            self.expose(parent, area);
        }
        true
    }

    /// Destroy a widget: release it, release its children, cancel its queued
    /// events and remove it from the tree.
    pub fn destroy(&mut self, id: WidgetId) -> bool {
        let covered = self
            .tree
            .is_visible(id)
            .then(|| self.tree.visible_area(id))
            .flatten();
        let root = self.tree.parent(id).and_then(|p| self.tree.root(p));
        if !self.tree.remove(id) {
            return false;
        }
        let cancelled = self.queue.cancel_for_widget(id);
        debug!(target: targets::TREE, widget = id.as_raw(), cancelled, "destroyed widget");
        if let (Some(root), Some(area)) = (root, covered) {
            self.post(Event::expose_request(root, area));
        }
        true
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Activate or deactivate a widget and redraw every widget whose status
    /// changed.
    pub fn activate(&mut self, id: WidgetId, on: bool) -> bool {
        let changed = self.tree.activate(id, on);
        self.update_all(&changed);
        self.tree.is_active(id) == on
    }

    /// Disable or re-enable a widget.
    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) {
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        let status = match (enabled, node.status()) {
            (false, _) => Status::Disabled,
            (true, Status::Disabled) => Status::Normal,
            (true, status) => status,
        };
        if node.status() != status {
            node.set_status(status);
            self.update(id);
        }
    }

    /// Set the hover status unless the widget is active or disabled.
    pub(crate) fn set_hover(&mut self, id: WidgetId, hover: bool) {
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        let next = match (hover, node.status()) {
            (true, Status::Normal) => Status::Hover,
            (false, Status::Hover) => Status::Normal,
            _ => return,
        };
        node.set_status(next);
        self.update(id);
    }

    /// Replace a widget's style (cascading when configured) and redraw.
    pub fn set_style(&mut self, id: WidgetId, style: Style) {
        let changed = self.tree.set_style(id, style);
        self.update_all(&changed);
    }

    pub fn enter(&mut self, id: WidgetId) -> bool {
        self.tree.enter(id)
    }

    pub fn leave(&mut self, id: WidgetId) -> bool {
        self.tree.leave(id)
    }

    fn navigate(
        &mut self,
        parent: WidgetId,
        step: impl FnOnce(&mut WidgetTree, WidgetId) -> Option<WidgetId>,
    ) -> Option<WidgetId> {
        let before: Vec<(WidgetId, Option<Status>)> = self
            .tree
            .children(parent)
            .iter()
            .map(|&c| (c, self.tree.get(c).map(|n| n.status())))
            .collect();
        let target = step(&mut *self.tree, parent);
        for (child, status) in before {
            if self.tree.get(child).map(|n| n.status()) != status {
                self.update(child);
            }
        }
        target
    }

    pub fn navigate_forward(&mut self, parent: WidgetId) -> Option<WidgetId> {
        self.navigate(parent, WidgetTree::navigate_forward)
    }

    pub fn navigate_backward(&mut self, parent: WidgetId) -> Option<WidgetId> {
        self.navigate(parent, WidgetTree::navigate_backward)
    }

    pub fn navigate_to_start(&mut self, parent: WidgetId) -> Option<WidgetId> {
        self.navigate(parent, WidgetTree::navigate_to_start)
    }

    pub fn enter_navigated(&mut self, parent: WidgetId) -> Option<WidgetId> {
        self.tree.enter_navigated(parent)
    }

    // =========================================================================
    // Devices
    // =========================================================================

    /// Grab a device for this context's widget.
    pub fn grab(&mut self, device: Device) -> bool {
        self.tree.grab_device(self.widget, device)
    }

    /// Release a device held by this context's widget.
    pub fn ungrab(&mut self, device: Device) -> bool {
        self.tree.release_device(self.widget, device)
    }

    // =========================================================================
    // Messages
    // =========================================================================

    /// Post a message from this context's widget. Ignored for widgets that
    /// are not messagable.
    pub fn post_message(&mut self, name: impl Into<String>, value: impl Into<Value>) -> bool {
        let messagable = self
            .tree
            .get(self.widget)
            .is_some_and(|n| n.support().messagable);
        if !messagable {
            trace!(target: targets::QUEUE, widget = self.widget.as_raw(), "not messagable");
            return false;
        }
        let event = Event::message(self.widget, name, value);
        self.post(event) != EnqueueOutcome::Rejected
    }

    /// Queue a value-changed event from this context's widget.
    pub fn emit_value_changed(&mut self, value: impl Into<Value>) -> EnqueueOutcome {
        let event = Event::value_changed(self.widget, value);
        self.post(event)
    }

    /// Ask the root window to close.
    pub fn request_close(&mut self) {
        if let Some(root) = self.tree.root(self.widget) {
            self.post(Event::close_request(root));
        }
    }

    /// Whether the event kind would currently be accepted by the queue.
    pub fn is_queueable(&self, kind: EventKind) -> bool {
        self.queue.is_queueable(kind)
    }
}
