//! The scene graph.
//!
//! [`WidgetTree`] is an arena of [`WidgetNode`]s keyed by [`WidgetId`].
//! Parent and root links are plain ids resolved against the arena, so they
//! never keep a node alive and simply stop resolving once a node is removed.
//!
//! # Invariants
//!
//! - A node either has no parent, or its parent's children list contains it.
//! - A node's `root` equals its parent's `root`, or the node itself when it
//!   has no parent.
//! - The children list is in draw order: the last child is foremost.
//!
//! # Example
//!
//! ```
//! use horizon_strata::widget::{Panel, WidgetTree};
//! use horizon_strata::render::Color;
//!
//! let mut tree = WidgetTree::new();
//! let parent = tree.insert(Panel::new(Color::GRAY));
//! let child = tree.insert(Panel::new(Color::RED));
//!
//! assert_eq!(tree.add(parent, child), Some(0));
//! assert_eq!(tree.parent(child), Some(parent));
//! assert_eq!(tree.root(child), Some(parent));
//!
//! assert!(tree.release(parent, child));
//! assert_eq!(tree.parent(child), None);
//! assert_eq!(tree.root(child), Some(child));
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::mem;
use std::time::Duration;

use horizon_strata_core::logging::targets;
use horizon_strata_core::{Device, Event, EventKind, EventKinds, KeyCode, WidgetId};
use horizon_strata_render::{Area, Color, Point, Size};
use slotmap::SlotMap;
use tracing::debug;

use super::context::WidgetContext;
use super::node::{DEFAULT_LAYER, Stacking, Status, Style, WidgetNode};
use super::support::PointerFocusable;
use super::{PaintContext, Widget};

/// Application callback fired after a widget's own handler.
pub type EventCallback = Box<dyn FnMut(&mut WidgetContext<'_>, &Event)>;

/// Arena-backed widget hierarchy.
pub struct WidgetTree {
    nodes: SlotMap<WidgetId, WidgetNode>,
    callbacks: HashMap<(WidgetId, EventKind), EventCallback>,
    scale: f64,
    focus_timing: PointerFocusable,
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetTree")
            .field("nodes", &self.nodes.len())
            .field("callbacks", &self.callbacks.len())
            .field("scale", &self.scale)
            .finish()
    }
}

impl WidgetTree {
    /// Create an empty tree whose rasters use scale 1.
    pub fn new() -> Self {
        Self::with_scale(1.0)
    }

    /// Create an empty tree whose new rasters use `scale`.
    pub fn with_scale(scale: f64) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            callbacks: HashMap::new(),
            scale,
            focus_timing: PointerFocusable::default(),
        }
    }

    /// Scale factor given to rasters of new widgets.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Pointer-focus timings given to new widgets. Support stays off until a
    /// widget enables it.
    pub fn set_focus_timing(&mut self, focus_in: Duration, focus_out: Duration) {
        self.focus_timing.focus_in = focus_in;
        self.focus_timing.focus_out = focus_out;
    }

    // =========================================================================
    // Creation and lookup
    // =========================================================================

    /// Create a detached widget driven by `widget`.
    pub fn insert(&mut self, widget: impl Widget) -> WidgetId {
        self.insert_boxed(Some(Box::new(widget)))
    }

    /// Create a detached widget with the given area.
    pub fn insert_at(&mut self, widget: impl Widget, area: Area) -> WidgetId {
        let id = self.insert(widget);
        if let Some(node) = self.nodes.get_mut(id) {
            node.set_position(area.origin);
            node.set_size(area.size);
        }
        id
    }

    /// Create a detached widget without behavior. It draws nothing and
    /// handles no events.
    pub fn insert_empty(&mut self) -> WidgetId {
        self.insert_boxed(None)
    }

    pub fn insert_boxed(&mut self, behavior: Option<Box<dyn Widget>>) -> WidgetId {
        let scale = self.scale;
        let id = self
            .nodes
            .insert_with_key(|id| WidgetNode::new(id, behavior, scale));
        if let Some(node) = self.nodes.get_mut(id) {
            node.support_mut().focusable = self.focus_timing;
        }
        debug!(target: targets::TREE, widget = id.as_raw(), "created widget");
        id
    }

    pub(crate) fn insert_window(&mut self, widget: impl Widget, size: Size) -> WidgetId {
        let id = self.insert(widget);
        if let Some(node) = self.nodes.get_mut(id) {
            node.is_window = true;
            node.set_size(size);
        }
        id
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut WidgetNode> {
        self.nodes.get_mut(id)
    }

    /// Iterate over every widget id.
    pub fn ids(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.nodes.keys()
    }

    // =========================================================================
    // Behavior and callbacks
    // =========================================================================

    /// Replace a widget's behavior.
    pub fn set_behavior(&mut self, id: WidgetId, widget: impl Widget) -> bool {
        let callback_kinds = self.callback_kinds(id);
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        let widget: Box<dyn Widget> = Box::new(widget);
        node.handles = widget.supported_events() | callback_kinds;
        node.behavior = Some(widget);
        true
    }

    /// Borrow a widget's behavior as its concrete type.
    pub fn behavior<T: Widget>(&self, id: WidgetId) -> Option<&T> {
        let behavior: &dyn Any = self.nodes.get(id)?.behavior.as_deref()?;
        behavior.downcast_ref::<T>()
    }

    /// Mutably borrow a widget's behavior as its concrete type.
    pub fn behavior_mut<T: Widget>(&mut self, id: WidgetId) -> Option<&mut T> {
        let behavior: &mut dyn Any = self.nodes.get_mut(id)?.behavior.as_deref_mut()?;
        behavior.downcast_mut::<T>()
    }

    pub(crate) fn take_behavior(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        self.nodes.get_mut(id)?.behavior.take()
    }

    /// Put a behavior back after a handler ran. Dropped if the widget was
    /// destroyed or received a new behavior meanwhile.
    pub(crate) fn restore_behavior(&mut self, id: WidgetId, behavior: Box<dyn Widget>) {
        if let Some(node) = self.nodes.get_mut(id)
            && node.behavior.is_none()
        {
            node.behavior = Some(behavior);
        }
    }

    /// Register a callback for one event kind on a widget, replacing any
    /// previous one. Registering makes the widget handle that kind.
    pub fn set_callback(
        &mut self,
        id: WidgetId,
        kind: EventKind,
        callback: impl FnMut(&mut WidgetContext<'_>, &Event) + 'static,
    ) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        node.handles |= kind.flag();
        self.callbacks.insert((id, kind), Box::new(callback));
        true
    }

    /// Remove a callback. Returns whether one was registered.
    pub fn remove_callback(&mut self, id: WidgetId, kind: EventKind) -> bool {
        let removed = self.callbacks.remove(&(id, kind)).is_some();
        if removed && let Some(node) = self.nodes.get_mut(id) {
            let own = node
                .behavior
                .as_ref()
                .map_or(EventKinds::empty(), |b| b.supported_events());
            if !own.contains(kind.flag()) {
                node.handles.remove(kind.flag());
            }
        }
        removed
    }

    fn callback_kinds(&self, id: WidgetId) -> EventKinds {
        self.callbacks
            .keys()
            .filter(|(w, _)| *w == id)
            .fold(EventKinds::empty(), |acc, (_, k)| acc | k.flag())
    }

    pub(crate) fn take_callback(&mut self, id: WidgetId, kind: EventKind) -> Option<EventCallback> {
        self.callbacks.remove(&(id, kind))
    }

    pub(crate) fn restore_callback(&mut self, id: WidgetId, kind: EventKind, callback: EventCallback) {
        if self.nodes.contains_key(id) {
            self.callbacks.entry((id, kind)).or_insert(callback);
        }
    }

    /// Whether the widget handles `kind` itself.
    pub fn actively_supports(&self, id: WidgetId, kind: EventKind) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|n| n.handles.contains(kind.flag()))
    }

    /// The widget's mergeable mask; empty for unknown widgets.
    pub fn mergeable(&self, id: WidgetId) -> EventKinds {
        self.nodes
            .get(id)
            .map_or(EventKinds::empty(), |n| n.support().mergeable)
    }

    // =========================================================================
    // Links
    // =========================================================================

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(id)?.parent
    }

    /// Children in draw order. Empty for unknown widgets.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes.get(id).map_or(&[], |n| n.children.as_slice())
    }

    pub fn root(&self, id: WidgetId) -> Option<WidgetId> {
        Some(self.nodes.get(id)?.root)
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent(c);
        }
        false
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut result = Vec::new();
        let mut current = self.parent(id);
        while let Some(c) = current {
            result.push(c);
            current = self.parent(c);
        }
        result
    }

    /// `id` and all its descendants in pre-order.
    pub fn subtree(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut result = Vec::new();
        if !self.nodes.contains_key(id) {
            return result;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        result
    }

    /// Visit descendants of `id` depth-first in pre-order.
    ///
    /// The predicate's return value gates descent: `false` skips that node's
    /// children, `true` visits them.
    pub fn for_each_child(
        &self,
        id: WidgetId,
        mut pred: impl FnMut(WidgetId, &WidgetNode) -> bool,
    ) {
        let mut stack: Vec<WidgetId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if pred(current, node) {
                stack.extend(node.children.iter().rev());
            }
        }
    }

    /// Append `child` to `parent`'s children.
    ///
    /// Returns the child's index, or `None` if `parent` is not linkable,
    /// either widget is unknown, or the link would create a cycle.
    pub fn add(&mut self, parent: WidgetId, child: WidgetId) -> Option<usize> {
        self.add_with(parent, child, |_, _| {})
    }

    /// Like [`add`](Self::add), calling `hook` for every reparented node in
    /// pre-order.
    pub fn add_with(
        &mut self,
        parent: WidgetId,
        child: WidgetId,
        mut hook: impl FnMut(WidgetId, &mut WidgetNode),
    ) -> Option<usize> {
        if !self.nodes.contains_key(child) {
            return None;
        }
        let linkable = self.nodes.get(parent)?.support().linkable;
        if !linkable {
            debug!(target: targets::TREE, parent = parent.as_raw(), "parent is not linkable");
            return None;
        }
        if self.is_ancestor_or_self(child, parent) {
            debug!(target: targets::TREE, parent = parent.as_raw(), child = child.as_raw(), "refusing cyclic add");
            return None;
        }

        if let Some(old_parent) = self.parent(child) {
            self.release(old_parent, child);
        }

        let parent_node = self.nodes.get_mut(parent)?;
        parent_node.children.push(child);
        let index = parent_node.children.len() - 1;
        let root = parent_node.root;

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        for id in self.subtree(child) {
            if let Some(node) = self.nodes.get_mut(id) {
                node.root = root;
                hook(id, node);
            }
        }

        debug!(
            target: targets::TREE,
            parent = parent.as_raw(),
            child = child.as_raw(),
            index,
            "added child"
        );
        Some(index)
    }

    /// Detach `child` from `parent`. The detached subtree becomes rooted at
    /// `child`. Returns `false` if `child` is not a child of `parent`.
    pub fn release(&mut self, parent: WidgetId, child: WidgetId) -> bool {
        self.release_with(parent, child, |_, _| {})
    }

    /// Like [`release`](Self::release), calling `hook` for every node of the
    /// detached subtree in pre-order.
    pub fn release_with(
        &mut self,
        parent: WidgetId,
        child: WidgetId,
        mut hook: impl FnMut(WidgetId, &mut WidgetNode),
    ) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
        for id in self.subtree(child) {
            if let Some(node) = self.nodes.get_mut(id) {
                node.root = child;
                hook(id, node);
            }
        }
        debug!(target: targets::TREE, parent = parent.as_raw(), child = child.as_raw(), "released child");
        true
    }

    /// Release every child of `parent`. Returns how many were released.
    pub fn release_all(&mut self, parent: WidgetId) -> usize {
        let children = self.children(parent).to_vec();
        children
            .into_iter()
            .filter(|&c| self.release(parent, c))
            .count()
    }

    /// Remove a widget from the arena.
    ///
    /// The widget is released from its parent and its children are released
    /// (they survive as self-rooted subtrees). Queued events are not touched;
    /// use [`WidgetContext::destroy`] to cancel those too.
    pub fn remove(&mut self, id: WidgetId) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        if let Some(parent) = self.parent(id) {
            self.release(parent, id);
        }
        self.release_all(id);
        self.callbacks.retain(|(w, _), _| *w != id);
        self.nodes.remove(id);
        debug!(target: targets::TREE, widget = id.as_raw(), "removed widget");
        true
    }

    // =========================================================================
    // Z-order
    // =========================================================================

    /// Position among the parent's children.
    pub fn sibling_index(&self, id: WidgetId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    fn reorder(&mut self, id: WidgetId, place: impl FnOnce(&mut Vec<WidgetId>) -> bool) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        let Some(parent_node) = self.nodes.get_mut(parent) else {
            return false;
        };
        let before = parent_node.children.clone();
        parent_node.children.retain(|&c| c != id);
        if place(&mut parent_node.children) {
            true
        } else {
            parent_node.children = before;
            false
        }
    }

    /// Move to the front (last child).
    pub fn raise(&mut self, id: WidgetId) -> bool {
        self.reorder(id, |children| {
            children.push(id);
            true
        })
    }

    /// Move to the back (first child).
    pub fn lower(&mut self, id: WidgetId) -> bool {
        self.reorder(id, |children| {
            children.insert(0, id);
            true
        })
    }

    /// Place directly in front of a sibling.
    pub fn stack_above(&mut self, id: WidgetId, sibling: WidgetId) -> bool {
        if id == sibling || self.parent(id) != self.parent(sibling) {
            return false;
        }
        self.reorder(id, |children| match children.iter().position(|&c| c == sibling) {
            Some(pos) => {
                children.insert(pos + 1, id);
                true
            }
            None => false,
        })
    }

    /// Place directly behind a sibling.
    pub fn stack_below(&mut self, id: WidgetId, sibling: WidgetId) -> bool {
        if id == sibling || self.parent(id) != self.parent(sibling) {
            return false;
        }
        self.reorder(id, |children| match children.iter().position(|&c| c == sibling) {
            Some(pos) => {
                children.insert(pos, id);
                true
            }
            None => false,
        })
    }

    // =========================================================================
    // Geometry and visibility
    // =========================================================================

    /// Whether the widget, all its ancestors are shown, and the chain ends at
    /// a window.
    pub fn is_visible(&self, id: WidgetId) -> bool {
        let mut current = id;
        loop {
            let Some(node) = self.nodes.get(current) else {
                return false;
            };
            if !node.is_shown() {
                return false;
            }
            match node.parent {
                Some(parent) => current = parent,
                None => return node.is_window,
            }
        }
    }

    /// Position in root coordinates.
    pub fn absolute_position(&self, id: WidgetId) -> Option<Point> {
        let mut position = self.nodes.get(id)?.position();
        for ancestor in self.ancestors(id) {
            position += self.nodes.get(ancestor)?.position();
        }
        Some(position)
    }

    /// Area in root coordinates.
    pub fn absolute_area(&self, id: WidgetId) -> Option<Area> {
        let size = self.nodes.get(id)?.size();
        Some(Area::from_origin_size(self.absolute_position(id)?, size))
    }

    /// The region (root coordinates) the widget may draw into.
    ///
    /// A `Clipped` widget is cut by its parent's area; an `Escape` widget only
    /// inherits the parent's own clip. The root's clip is its own area.
    /// `None` when the region is empty.
    pub fn clip_area(&self, id: WidgetId) -> Option<Area> {
        let mut chain = self.ancestors(id);
        chain.reverse();
        chain.push(id);

        let mut clip = self.absolute_area(*chain.first()?)?;
        for pair in chain.windows(2) {
            let (parent, child) = (pair[0], pair[1]);
            if self.nodes.get(child)?.stacking() == Stacking::Clipped {
                clip = clip.intersect(&self.absolute_area(parent)?)?;
            }
        }
        Some(clip)
    }

    /// The widget's absolute area cut by its clip: where it actually shows.
    pub fn visible_area(&self, id: WidgetId) -> Option<Area> {
        self.absolute_area(id)?.intersect(&self.clip_area(id)?)
    }

    /// Own layer, else the nearest ancestor's, else [`DEFAULT_LAYER`].
    pub fn effective_layer(&self, id: WidgetId) -> i32 {
        let mut current = Some(id);
        while let Some(c) = current {
            let Some(node) = self.nodes.get(c) else {
                break;
            };
            if let Some(layer) = node.layer() {
                return layer;
            }
            current = node.parent;
        }
        DEFAULT_LAYER
    }

    /// Shown widgets of the subtree at `root` in draw order: parents before
    /// children, children in list order. Hidden widgets prune their subtree.
    pub fn draw_order(&self, root: WidgetId) -> Vec<WidgetId> {
        let mut order = Vec::new();
        match self.nodes.get(root) {
            Some(node) if node.is_shown() => order.push(root),
            _ => return order,
        }
        self.for_each_child(root, |id, node| {
            if node.is_shown() {
                order.push(id);
                true
            } else {
                false
            }
        });
        order
    }

    /// Distinct effective layers of the drawn widgets, back to front
    /// (descending).
    pub fn layers(&self, root: WidgetId) -> Vec<i32> {
        let mut layers: Vec<i32> = self
            .draw_order(root)
            .into_iter()
            .map(|id| self.effective_layer(id))
            .collect();
        layers.sort_unstable_by(|a, b| b.cmp(a));
        layers.dedup();
        layers
    }

    // =========================================================================
    // Activation, entry and navigation
    // =========================================================================

    /// Change a widget's activation. With auto-deactivate, activating also
    /// deactivates the activatable siblings.
    ///
    /// Returns the widgets whose status changed.
    pub fn activate(&mut self, id: WidgetId, on: bool) -> Vec<WidgetId> {
        let mut changed = Vec::new();
        let Some(node) = self.nodes.get_mut(id) else {
            return changed;
        };
        let activatable = node.support().activatable;
        if !activatable.supported || node.status() == Status::Disabled {
            return changed;
        }

        let target = if on { Status::Active } else { Status::Normal };
        if node.status() != target {
            node.set_status(target);
            changed.push(id);
        }

        if on && activatable.auto_deactivate {
            let siblings = self
                .parent(id)
                .map(|p| self.children(p).to_vec())
                .unwrap_or_default();
            for sibling in siblings.into_iter().filter(|&s| s != id) {
                if let Some(node) = self.nodes.get_mut(sibling)
                    && node.support().activatable.supported
                    && node.status() == Status::Active
                {
                    node.set_status(Status::Normal);
                    changed.push(sibling);
                }
            }
        }
        changed
    }

    pub fn is_active(&self, id: WidgetId) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|n| n.status() == Status::Active)
    }

    /// Give keyboard entry to `id`, taking it from every other widget under
    /// the same root. Returns `false` if the widget is not enterable.
    pub fn enter(&mut self, id: WidgetId) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        if !node.support().enterable.supported {
            return false;
        }
        let root = node.root;
        for other in self.subtree(root) {
            if other != id {
                self.leave(other);
            }
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.support_mut().enterable.entered = true;
        }
        debug!(target: targets::TREE, widget = id.as_raw(), "entered");
        true
    }

    /// Clear keyboard entry. Returns whether the widget was entered.
    pub fn leave(&mut self, id: WidgetId) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) if node.support().enterable.entered => {
                node.support_mut().enterable.entered = false;
                true
            }
            _ => false,
        }
    }

    pub fn is_entered(&self, id: WidgetId) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|n| n.support().enterable.supported && n.support().enterable.entered)
    }

    /// The entered widget under `root`, if any.
    pub fn entered_widget(&self, root: WidgetId) -> Option<WidgetId> {
        self.subtree(root).into_iter().find(|&id| self.is_entered(id))
    }

    /// The foremost visible enterable widget under `root` listing `key` as a
    /// hot key.
    pub fn hot_key_target(&self, root: WidgetId, key: KeyCode) -> Option<WidgetId> {
        self.draw_order(root).into_iter().rev().find(|&id| {
            self.nodes.get(id).is_some_and(|n| {
                n.support().enterable.supported && n.support().enterable.has_hot_key(key)
            })
        })
    }

    fn activatable_children(&self, parent: WidgetId) -> Vec<WidgetId> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|&c| {
                self.nodes.get(c).is_some_and(|n| {
                    n.support().activatable.supported && n.status() != Status::Disabled
                })
            })
            .collect()
    }

    /// The first active activatable child.
    pub fn navigated_child(&self, parent: WidgetId) -> Option<WidgetId> {
        self.activatable_children(parent)
            .into_iter()
            .find(|&c| self.is_active(c))
    }

    fn navigate_to(&mut self, parent: WidgetId, target: WidgetId) -> WidgetId {
        let previous = self.navigated_child(parent);
        self.activate(target, true);
        if let Some(previous) = previous
            && previous != target
        {
            self.activate(previous, false);
        }
        target
    }

    fn is_navigatable(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.support().navigatable)
    }

    /// Move the cursor to the next activatable child. Without an active child
    /// the first is activated; at the end the cursor stays put.
    pub fn navigate_forward(&mut self, parent: WidgetId) -> Option<WidgetId> {
        if !self.is_navigatable(parent) {
            return None;
        }
        let candidates = self.activatable_children(parent);
        let target = match self.navigated_child(parent) {
            None => *candidates.first()?,
            Some(current) => {
                let pos = candidates.iter().position(|&c| c == current)?;
                candidates.get(pos + 1).copied().unwrap_or(current)
            }
        };
        Some(self.navigate_to(parent, target))
    }

    /// Move the cursor to the previous activatable child. Without an active
    /// child the last is activated; at the start the cursor stays put.
    pub fn navigate_backward(&mut self, parent: WidgetId) -> Option<WidgetId> {
        if !self.is_navigatable(parent) {
            return None;
        }
        let candidates = self.activatable_children(parent);
        let target = match self.navigated_child(parent) {
            None => *candidates.last()?,
            Some(current) => {
                let pos = candidates.iter().position(|&c| c == current)?;
                pos.checked_sub(1)
                    .and_then(|p| candidates.get(p).copied())
                    .unwrap_or(current)
            }
        };
        Some(self.navigate_to(parent, target))
    }

    /// Activate the first activatable child.
    pub fn navigate_to_start(&mut self, parent: WidgetId) -> Option<WidgetId> {
        if !self.is_navigatable(parent) {
            return None;
        }
        let first = *self.activatable_children(parent).first()?;
        Some(self.navigate_to(parent, first))
    }

    /// Enter the active child if it is enterable.
    pub fn enter_navigated(&mut self, parent: WidgetId) -> Option<WidgetId> {
        let child = self.navigated_child(parent)?;
        self.enter(child).then_some(child)
    }

    // =========================================================================
    // Device grabs
    // =========================================================================

    /// Grab a device for `id`, releasing it from any other holder under the
    /// same root. Returns `false` if `id` already held it.
    pub fn grab_device(&mut self, id: WidgetId, device: Device) -> bool {
        let Some(root) = self.root(id) else {
            return false;
        };
        for other in self.subtree(root) {
            if other != id
                && let Some(node) = self.nodes.get_mut(other)
                && node.devices.release(device)
            {
                debug!(target: targets::TREE, widget = other.as_raw(), %device, "grab taken over");
            }
        }
        self.nodes
            .get_mut(id)
            .is_some_and(|n| n.devices.grab(device))
    }

    pub fn release_device(&mut self, id: WidgetId, device: Device) -> bool {
        self.nodes
            .get_mut(id)
            .is_some_and(|n| n.devices.release(device))
    }

    /// The widget under `root` holding `device`. A key grab of
    /// [`KeyCode::Any`] holds every key.
    pub fn device_holder(&self, root: WidgetId, device: Device) -> Option<WidgetId> {
        let subtree = self.subtree(root);
        let holds = |d: Device| {
            subtree
                .iter()
                .copied()
                .find(|&id| self.nodes.get(id).is_some_and(|n| n.devices.contains(d)))
        };
        holds(device).or_else(|| match device {
            Device::Keys(_) => holds(Device::Keys(KeyCode::Any)),
            Device::Mouse(_) => None,
        })
    }

    // =========================================================================
    // Style
    // =========================================================================

    /// Replace a widget's style. With push-style-to-children set, every
    /// descendant gets a copy. Returns the widgets whose style changed.
    pub fn set_style(&mut self, id: WidgetId, style: Style) -> Vec<WidgetId> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        let targets = if node.push_style_to_children() {
            self.subtree(id)
        } else {
            vec![id]
        };
        for &target in &targets {
            if let Some(node) = self.nodes.get_mut(target) {
                node.set_style_raw(style.clone());
            }
        }
        targets
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Refresh a widget's raster through its behavior and clear its redraw
    /// flag.
    pub(crate) fn redraw(&mut self, id: WidgetId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let mut raster = mem::take(&mut node.raster);
        raster.clear(Color::TRANSPARENT);
        if let Some(behavior) = self.nodes.get(id).and_then(|n| n.behavior.as_deref()) {
            let mut ctx = PaintContext::new(&mut raster, self, id);
            behavior.paint(&mut ctx);
        }
        raster.clear_draw_schedule();
        if let Some(node) = self.nodes.get_mut(id) {
            node.raster = raster;
        }
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// An indented listing of the subtree at `id`.
    pub fn dump_tree(&self, id: WidgetId) -> String {
        let mut output = String::new();
        self.dump_tree_recursive(id, 0, &mut output);
        output
    }

    fn dump_tree_recursive(&self, id: WidgetId, depth: usize, output: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let title = if node.title().is_empty() {
            "(untitled)"
        } else {
            node.title()
        };
        let area = node.area();
        let _ = writeln!(
            output,
            "{}[{}] {} ({}, {}, {}x{}) layer={} {}",
            "  ".repeat(depth),
            id.as_raw(),
            title,
            area.left(),
            area.top(),
            area.width(),
            area.height(),
            self.effective_layer(id),
            if self.is_visible(id) { "visible" } else { "hidden" },
        );
        for &child in &node.children {
            self.dump_tree_recursive(child, depth + 1, output);
        }
    }
}
