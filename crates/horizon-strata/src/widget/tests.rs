//! Tests for the widget system.

use std::cell::RefCell;
use std::rc::Rc;

use horizon_strata_core::{Device, Event, EventKind, EventKinds, EventQueue, KeyCode, MouseButton};
use horizon_strata_render::{Area, Color, Point, Size};

use super::*;

/// A widget recording the kinds it receives.
#[derive(Default)]
struct Recorder {
    seen: Vec<EventKind>,
}

impl Widget for Recorder {
    fn supported_events(&self) -> EventKinds {
        EventKinds::all()
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) {
        ctx.fill(Color::WHITE);
    }

    fn event(&mut self, _ctx: &mut WidgetContext<'_>, event: &Event) -> bool {
        self.seen.push(event.kind());
        true
    }
}

fn window(tree: &mut WidgetTree) -> WidgetId {
    tree.insert_window(Panel::new(Color::BLACK), Size::new(200.0, 200.0))
}

fn activatable(tree: &mut WidgetTree, parent: WidgetId) -> WidgetId {
    let id = tree.insert(Panel::default());
    if let Some(node) = tree.get_mut(id) {
        node.support_mut().activatable.supported = true;
    }
    tree.add(parent, id);
    id
}

#[test]
fn test_roots_follow_links() {
    let mut tree = WidgetTree::new();
    let root = window(&mut tree);
    let a = tree.insert(Panel::default());
    let b = tree.insert(Panel::default());
    tree.add(root, a);
    tree.add(a, b);

    assert_eq!(tree.root(b), Some(root));
    for id in [a, b] {
        for ancestor in tree.ancestors(id) {
            assert_eq!(tree.root(id), tree.root(ancestor));
        }
    }

    assert!(tree.release(root, a));
    assert_eq!(tree.parent(a), None);
    assert_eq!(tree.root(a), Some(a));
    assert_eq!(tree.root(b), Some(a));
}

#[test]
fn test_add_refuses_cycles_and_non_linkable_parents() {
    let mut tree = WidgetTree::new();
    let a = tree.insert(Panel::default());
    let b = tree.insert(Panel::default());
    tree.add(a, b);

    assert_eq!(tree.add(b, a), None);
    assert_eq!(tree.add(a, a), None);

    let leaf = tree.insert(Panel::default());
    if let Some(node) = tree.get_mut(leaf) {
        node.support_mut().linkable = false;
    }
    let other = tree.insert_empty();
    assert_eq!(tree.add(leaf, other), None);
}

#[test]
fn test_add_moves_between_parents() {
    let mut tree = WidgetTree::new();
    let first = tree.insert(Panel::default());
    let second = tree.insert(Panel::default());
    let child = tree.insert(Panel::default());

    tree.add(first, child);
    assert_eq!(tree.add(second, child), Some(0));
    assert!(tree.children(first).is_empty());
    assert_eq!(tree.parent(child), Some(second));
}

#[test]
fn test_release_of_non_child_is_noop() {
    let mut tree = WidgetTree::new();
    let a = tree.insert(Panel::default());
    let b = tree.insert(Panel::default());
    assert!(!tree.release(a, b));
}

#[test]
fn test_destroy_releases_children_and_cancels_events() {
    let mut tree = WidgetTree::new();
    let mut queue = EventQueue::new();
    let root = window(&mut tree);
    let parent = tree.insert_at(Panel::default(), Area::new(0.0, 0.0, 50.0, 50.0));
    let child = tree.insert(Panel::default());
    tree.add(root, parent);
    tree.add(parent, child);

    let mut ctx = WidgetContext::new(&mut tree, &mut queue, root);
    ctx.post(Event::value_changed(parent, 1));
    ctx.post(Event::value_changed(root, 2));
    assert!(ctx.destroy(parent));

    assert!(!tree.contains(parent));
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.root(child), Some(child));
    assert!(queue.iter().all(|e| e.widget() != parent));
    assert!(queue
        .iter()
        .any(|e| e.kind() == EventKind::ExposeRequest && e.widget() == root));
}

#[test]
fn test_z_order_operations() {
    let mut tree = WidgetTree::new();
    let parent = tree.insert(Panel::default());
    let a = tree.insert(Panel::default());
    let b = tree.insert(Panel::default());
    let c = tree.insert(Panel::default());
    for id in [a, b, c] {
        tree.add(parent, id);
    }

    assert!(tree.raise(a));
    assert_eq!(tree.children(parent), &[b, c, a]);
    assert!(tree.lower(a));
    assert_eq!(tree.children(parent), &[a, b, c]);
    assert!(tree.stack_above(a, c));
    assert_eq!(tree.children(parent), &[b, c, a]);
    assert!(tree.stack_below(a, b));
    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.sibling_index(c), Some(2));
}

#[test]
fn test_navigation_moves_activation() {
    let mut tree = WidgetTree::new();
    let menu = tree.insert(Panel::default());
    if let Some(node) = tree.get_mut(menu) {
        node.support_mut().navigatable = true;
    }
    let c0 = activatable(&mut tree, menu);
    let c1 = activatable(&mut tree, menu);
    let c2 = activatable(&mut tree, menu);

    assert_eq!(tree.navigate_forward(menu), Some(c0));
    assert_eq!(tree.navigate_forward(menu), Some(c1));
    assert_eq!(tree.navigate_backward(menu), Some(c0));
    assert!(tree.is_active(c0));
    assert!(!tree.is_active(c1));

    tree.navigate_forward(menu);
    tree.navigate_forward(menu);
    assert_eq!(tree.navigate_forward(menu), Some(c2));
    assert_eq!(tree.navigated_child(menu), Some(c2));

    assert_eq!(tree.navigate_to_start(menu), Some(c0));
    assert!(!tree.is_active(c2));
}

#[test]
fn test_navigation_requires_navigatable_parent() {
    let mut tree = WidgetTree::new();
    let plain = tree.insert(Panel::default());
    activatable(&mut tree, plain);
    assert_eq!(tree.navigate_forward(plain), None);
}

#[test]
fn test_backward_without_active_child_picks_last() {
    let mut tree = WidgetTree::new();
    let menu = tree.insert(Panel::default());
    if let Some(node) = tree.get_mut(menu) {
        node.support_mut().navigatable = true;
    }
    activatable(&mut tree, menu);
    let last = activatable(&mut tree, menu);
    assert_eq!(tree.navigate_backward(menu), Some(last));
}

#[test]
fn test_auto_deactivate() {
    let mut tree = WidgetTree::new();
    let parent = tree.insert(Panel::default());
    let a = activatable(&mut tree, parent);
    let b = activatable(&mut tree, parent);

    tree.activate(a, true);
    let changed = tree.activate(b, true);
    assert!(changed.contains(&a) && changed.contains(&b));
    assert!(!tree.is_active(a));

    if let Some(node) = tree.get_mut(a) {
        node.support_mut().activatable.auto_deactivate = false;
    }
    tree.activate(a, true);
    assert!(tree.is_active(a) && tree.is_active(b));
}

#[test]
fn test_enter_is_exclusive_per_root() {
    let mut tree = WidgetTree::new();
    let root = window(&mut tree);
    let a = tree.insert(Panel::default());
    let b = tree.insert(Panel::default());
    for id in [a, b] {
        tree.add(root, id);
        if let Some(node) = tree.get_mut(id) {
            node.support_mut().enterable.supported = true;
        }
    }

    assert!(tree.enter(a));
    assert!(tree.enter(b));
    assert!(!tree.is_entered(a));
    assert_eq!(tree.entered_widget(root), Some(b));

    let plain = tree.insert(Panel::default());
    assert!(!tree.enter(plain));
}

#[test]
fn test_hot_key_lookup() {
    let mut tree = WidgetTree::new();
    let root = window(&mut tree);
    let button = tree.insert(Panel::default());
    tree.add(root, button);
    if let Some(node) = tree.get_mut(button) {
        let enterable = &mut node.support_mut().enterable;
        enterable.supported = true;
        enterable.hot_keys.push(KeyCode::Char('q'));
    }

    assert_eq!(tree.hot_key_target(root, KeyCode::Char('q')), Some(button));
    assert_eq!(tree.hot_key_target(root, KeyCode::Char('w')), None);
}

#[test]
fn test_grab_is_taken_over() {
    let mut tree = WidgetTree::new();
    let root = window(&mut tree);
    let a = tree.insert(Panel::default());
    let b = tree.insert(Panel::default());
    tree.add(root, a);
    tree.add(root, b);
    let left = Device::Mouse(MouseButton::Left);

    assert!(tree.grab_device(a, left));
    assert!(tree.grab_device(b, left));
    assert_eq!(tree.device_holder(root, left), Some(b));
    assert!(!tree.get(a).is_some_and(|n| n.devices().contains(left)));

    assert!(tree.release_device(b, left));
    assert_eq!(tree.device_holder(root, left), None);
}

#[test]
fn test_any_key_grab_holds_every_key() {
    let mut tree = WidgetTree::new();
    let root = window(&mut tree);
    let field = tree.insert(Panel::default());
    tree.add(root, field);
    tree.grab_device(field, Device::Keys(KeyCode::Any));

    assert_eq!(
        tree.device_holder(root, Device::Keys(KeyCode::Char('x'))),
        Some(field)
    );
}

#[test]
fn test_style_cascade() {
    let mut tree = WidgetTree::new();
    let parent = tree.insert(Panel::default());
    let child = tree.insert(Panel::default());
    tree.add(parent, child);

    let style = Style::new().with("background", Color::RED);
    assert_eq!(tree.set_style(parent, style.clone()), vec![parent]);
    assert!(tree.get(child).is_some_and(|n| n.style().is_empty()));

    if let Some(node) = tree.get_mut(parent) {
        node.set_push_style_to_children(true);
    }
    assert_eq!(tree.set_style(parent, style), vec![parent, child]);
    assert_eq!(
        tree.get(child).and_then(|n| n.style().color("background")),
        Some(Color::RED)
    );
}

#[test]
fn test_update_queues_expose_for_visible_widgets() {
    let mut tree = WidgetTree::new();
    let mut queue = EventQueue::new();
    let root = window(&mut tree);
    let parent = tree.insert_at(Panel::default(), Area::new(10.0, 10.0, 100.0, 100.0));
    let child = tree.insert_at(Panel::default(), Area::new(5.0, 5.0, 20.0, 20.0));
    tree.add(root, parent);
    tree.add(parent, child);

    let mut ctx = WidgetContext::new(&mut tree, &mut queue, child);
    ctx.update(child);
    let event = queue.peek().cloned();
    assert_eq!(event.as_ref().map(|e| e.kind()), Some(EventKind::ExposeRequest));
    assert_eq!(event.and_then(|e| e.area()), Some(Area::new(15.0, 15.0, 20.0, 20.0)));

    queue.clear();
    let detached = tree.insert_at(Panel::default(), Area::new(0.0, 0.0, 5.0, 5.0));
    WidgetContext::new(&mut tree, &mut queue, detached).update(detached);
    assert!(queue.is_empty());
    assert!(tree.get(detached).is_some_and(|n| n.raster().is_draw_scheduled()));
}

#[test]
fn test_hide_exposes_covered_area() {
    let mut tree = WidgetTree::new();
    let mut queue = EventQueue::new();
    let root = window(&mut tree);
    let w = tree.insert_at(Panel::default(), Area::new(10.0, 10.0, 30.0, 30.0));
    tree.add(root, w);

    WidgetContext::new(&mut tree, &mut queue, w).hide(w);
    assert!(!tree.is_visible(w));
    let event = queue.pop();
    assert_eq!(event.as_ref().map(|e| e.widget()), Some(root));
    assert_eq!(event.and_then(|e| e.area()), Some(Area::new(10.0, 10.0, 30.0, 30.0)));
}

#[test]
fn test_visibility_requires_window_ancestor() {
    let mut tree = WidgetTree::new();
    let root = window(&mut tree);
    let orphan = tree.insert(Panel::default());
    assert!(!tree.is_visible(orphan));

    tree.add(root, orphan);
    assert!(tree.is_visible(orphan));

    if let Some(node) = tree.get_mut(root) {
        node.support_mut().visualizable.visible = false;
    }
    assert!(!tree.is_visible(orphan));
}

#[test]
fn test_resize_round_trip_keeps_pixels() {
    let mut tree = WidgetTree::new();
    let mut queue = EventQueue::new();
    let root = window(&mut tree);
    let w = tree.insert_at(Recorder::default(), Area::new(0.0, 0.0, 10.0, 10.0));
    tree.add(root, w);
    tree.redraw(w);
    let before = tree.get(w).map(|n| n.raster().image().clone());

    let mut ctx = WidgetContext::new(&mut tree, &mut queue, root);
    assert!(ctx.resize(w, Size::new(20.0, 20.0)));
    assert!(ctx.resize(w, Size::new(10.0, 10.0)));

    let after = tree.get(w).map(|n| n.raster().image().clone());
    assert_eq!(before, after);
}

#[test]
fn test_failed_resize_queues_nothing() {
    let mut tree = WidgetTree::new();
    let mut queue = EventQueue::new();
    let root = window(&mut tree);
    let w = tree.insert_at(Panel::default(), Area::new(0.0, 0.0, 10.0, 10.0));
    tree.add(root, w);

    let mut ctx = WidgetContext::new(&mut tree, &mut queue, root);
    assert!(!ctx.set_area(w, Area::new(5.0, 5.0, 1.0e9, 10.0)));
    assert!(queue.is_empty());
    assert_eq!(tree.get(w).map(|n| n.area()), Some(Area::new(0.0, 0.0, 10.0, 10.0)));
}

#[test]
fn test_callbacks_fire_after_handler() {
    let mut tree = WidgetTree::new();
    let mut queue = EventQueue::new();
    let w = tree.insert(Recorder::default());
    let fired = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&fired);
    tree.set_callback(w, EventKind::Message, move |ctx, event| {
        let seen = ctx
            .tree()
            .behavior::<Recorder>(ctx.widget())
            .map_or(0, |r| r.seen.len());
        log.borrow_mut().push((event.message_name().map(str::to_owned), seen));
    });

    let event = Event::message(w, "ping", true);
    assert!(crate::dispatch::Dispatcher::deliver(&mut tree, &mut queue, &event));

    assert_eq!(fired.borrow().as_slice(), &[(Some("ping".to_owned()), 1)]);
    assert_eq!(
        tree.behavior::<Recorder>(w).map(|r| r.seen.clone()),
        Some(vec![EventKind::Message])
    );
}

#[test]
fn test_post_message_respects_messagable() {
    let mut tree = WidgetTree::new();
    let mut queue = EventQueue::new();
    let w = tree.insert(Panel::default());

    assert!(WidgetContext::new(&mut tree, &mut queue, w).post_message("hello", 1));
    if let Some(node) = tree.get_mut(w) {
        node.support_mut().messagable = false;
    }
    assert!(!WidgetContext::new(&mut tree, &mut queue, w).post_message("hello", 2));
    assert_eq!(queue.len(), 1);
}

#[test]
fn test_absolute_geometry() {
    let mut tree = WidgetTree::new();
    let root = window(&mut tree);
    let a = tree.insert_at(Panel::default(), Area::new(10.0, 20.0, 50.0, 50.0));
    let b = tree.insert_at(Panel::default(), Area::new(5.0, 5.0, 10.0, 10.0));
    tree.add(root, a);
    tree.add(a, b);

    assert_eq!(tree.absolute_position(b), Some(Point::new(15.0, 25.0)));
    assert_eq!(tree.absolute_area(b), Some(Area::new(15.0, 25.0, 10.0, 10.0)));
}

#[test]
fn test_add_hook_visits_reparented_nodes_in_pre_order() {
    let mut tree = WidgetTree::new();
    let root = window(&mut tree);
    let a = tree.insert(Panel::default());
    let b = tree.insert(Panel::default());
    let c = tree.insert(Panel::default());
    let d = tree.insert(Panel::default());
    tree.add(a, b);
    tree.add(b, c);
    tree.add(a, d);

    let mut visited = Vec::new();
    let index = tree.add_with(root, a, |id, node| visited.push((id, node.root())));

    assert_eq!(index, Some(0));
    assert_eq!(visited, vec![(a, root), (b, root), (c, root), (d, root)]);
}

#[test]
fn test_release_hook_sees_self_rooted_subtree() {
    let mut tree = WidgetTree::new();
    let root = window(&mut tree);
    let a = tree.insert(Panel::default());
    let b = tree.insert(Panel::default());
    let c = tree.insert(Panel::default());
    tree.add(root, a);
    tree.add(a, b);
    tree.add(b, c);

    let mut visited = Vec::new();
    assert!(tree.release_with(root, a, |id, node| visited.push((id, node.root()))));

    assert_eq!(visited, vec![(a, a), (b, a), (c, a)]);
    assert!(tree.children(root).is_empty());

    let mut calls = 0;
    assert!(!tree.release_with(root, a, |_, _| calls += 1));
    assert_eq!(calls, 0);
}

#[test]
fn test_release_all_detaches_every_child() {
    let mut tree = WidgetTree::new();
    let root = window(&mut tree);
    let children: Vec<WidgetId> = (0..3)
        .map(|_| {
            let child = tree.insert(Panel::default());
            tree.add(root, child);
            child
        })
        .collect();

    assert_eq!(tree.release_all(root), 3);
    assert!(tree.children(root).is_empty());
    for child in children {
        assert_eq!(tree.parent(child), None);
        assert_eq!(tree.root(child), Some(child));
    }
    assert_eq!(tree.release_all(root), 0);
}

#[test]
fn test_enter_navigated_enters_active_enterable_child() {
    let mut tree = WidgetTree::new();
    let root = window(&mut tree);
    let menu = tree.insert(Panel::default());
    tree.add(root, menu);
    if let Some(node) = tree.get_mut(menu) {
        node.support_mut().navigatable = true;
    }
    let plain = activatable(&mut tree, menu);
    let field = activatable(&mut tree, menu);
    if let Some(node) = tree.get_mut(field) {
        node.support_mut().enterable.supported = true;
    }

    assert_eq!(tree.enter_navigated(menu), None);

    assert_eq!(tree.navigate_forward(menu), Some(plain));
    assert_eq!(tree.enter_navigated(menu), None);
    assert!(!tree.is_entered(plain));

    assert_eq!(tree.navigate_forward(menu), Some(field));
    assert_eq!(tree.enter_navigated(menu), Some(field));
    assert!(tree.is_entered(field));
    assert_eq!(tree.entered_widget(root), Some(field));
}
