//! End-to-end scenarios driving a headless main window.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use horizon_strata::prelude::*;

type Log = Rc<RefCell<Vec<(&'static str, EventKind)>>>;

/// A widget that handles a fixed set of kinds and logs the ones it receives.
struct Probe {
    name: &'static str,
    kinds: EventKinds,
    log: Log,
}

impl Widget for Probe {
    fn supported_events(&self) -> EventKinds {
        self.kinds
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) {
        ctx.fill(Color::GRAY);
    }

    fn event(&mut self, _ctx: &mut WidgetContext<'_>, event: &Event) -> bool {
        if !self.kinds.contains(event.kind().flag()) {
            return false;
        }
        self.log.borrow_mut().push((self.name, event.kind()));
        true
    }
}

struct Harness {
    window: MainWindow,
    host: HeadlessBridge,
    clock: ManualClock,
    log: Log,
}

impl Harness {
    fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("horizon_strata=debug")
            .with_test_writer()
            .try_init();

        let host = HeadlessBridge::new();
        let clock = ManualClock::new();
        let mut config = ToolkitConfig::default();
        config.window.width = 200;
        config.window.height = 200;
        let mut window = MainWindow::with_clock(config, host.clone(), clock.clone()).unwrap();
        window.step();
        Self {
            window,
            host,
            clock,
            log: Log::default(),
        }
    }

    fn probe(&mut self, name: &'static str, kinds: EventKinds, area: Area) -> WidgetId {
        let probe = Probe {
            name,
            kinds,
            log: Rc::clone(&self.log),
        };
        self.window.tree_mut().insert_at(probe, area)
    }

    fn add_probe(&mut self, name: &'static str, kinds: EventKinds, area: Area) -> WidgetId {
        let id = self.probe(name, kinds, area);
        self.window.add(id);
        id
    }

    fn input(&mut self, inputs: impl IntoIterator<Item = HostInput>) {
        self.host.push_inputs(inputs);
        self.window.step();
    }

    fn at(&mut self, millis: u64) {
        self.clock.set_millis(millis);
        self.window.step();
    }

    fn received(&self, name: &str) -> Vec<EventKind> {
        self.log
            .borrow()
            .iter()
            .filter(|(n, _)| *n == name)
            .map(|(_, k)| *k)
            .collect()
    }

    fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }
}

fn press(button: MouseButton) -> HostInput {
    HostInput::Button {
        button,
        pressed: true,
    }
}

fn release(button: MouseButton) -> HostInput {
    HostInput::Button {
        button,
        pressed: false,
    }
}

fn move_to(x: f64, y: f64) -> HostInput {
    HostInput::PointerMoved(Point::new(x, y))
}

#[test]
fn test_hit_test_passes_through_to_root() {
    let mut h = Harness::new();
    let root = h.window.root();
    let root_presses = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&root_presses);
    h.window
        .tree_mut()
        .set_callback(root, EventKind::ButtonPress, move |_, _| {
            *counter.borrow_mut() += 1;
        });

    let a = h.add_probe("a", EventKinds::empty(), Area::new(0.0, 0.0, 100.0, 100.0));
    let b = h.probe("b", EventKinds::KEY_EVENTS, Area::new(10.0, 10.0, 20.0, 20.0));
    h.window.context(a).add(a, b);
    let passes = h
        .window
        .tree()
        .get(a)
        .is_some_and(|n| n.support().is_passable(EventKind::ButtonPress));
    assert!(passes);

    h.input([move_to(15.0, 15.0), press(MouseButton::Left)]);

    assert_eq!(*root_presses.borrow(), 1);
    assert!(!h.received("a").contains(&EventKind::ButtonPress));
    assert!(!h.received("b").contains(&EventKind::ButtonPress));
}

#[test]
fn test_focus_in_and_out_timing() {
    let mut h = Harness::new();
    let w = h.add_probe(
        "w",
        EventKinds::POINTER_FOCUS_EVENTS,
        Area::new(0.0, 0.0, 100.0, 100.0),
    );
    if let Some(node) = h.window.tree_mut().get_mut(w) {
        let focus = &mut node.support_mut().focusable;
        focus.supported = true;
        focus.focus_in = Duration::from_millis(200);
        focus.focus_out = Duration::from_millis(5000);
    }

    h.input([move_to(50.0, 50.0)]);
    h.at(199);
    assert!(h.received("w").is_empty());

    h.at(200);
    assert_eq!(h.received("w"), vec![EventKind::PointerFocusIn]);

    h.at(4999);
    assert_eq!(h.received("w").len(), 1);

    h.at(5000);
    assert_eq!(
        h.received("w"),
        vec![EventKind::PointerFocusIn, EventKind::PointerFocusOut]
    );

    h.at(9000);
    assert_eq!(h.received("w").len(), 2);
}

#[test]
fn test_motion_retracts_focus() {
    let mut h = Harness::new();
    let w = h.add_probe(
        "w",
        EventKinds::POINTER_FOCUS_EVENTS,
        Area::new(0.0, 0.0, 100.0, 100.0),
    );
    if let Some(node) = h.window.tree_mut().get_mut(w) {
        node.support_mut().focusable.supported = true;
    }

    h.input([move_to(50.0, 50.0)]);
    h.at(250);
    h.input([move_to(51.0, 50.0)]);
    assert_eq!(
        h.received("w"),
        vec![EventKind::PointerFocusIn, EventKind::PointerFocusOut]
    );
}

#[test]
fn test_focus_companion_follows_focus() {
    let mut h = Harness::new();
    let w = h.add_probe(
        "w",
        EventKinds::POINTER_FOCUS_EVENTS,
        Area::new(0.0, 0.0, 100.0, 100.0),
    );
    let tip = h.add_probe("tip", EventKinds::empty(), Area::new(0.0, 110.0, 60.0, 20.0));
    if let Some(node) = h.window.tree_mut().get_mut(tip) {
        node.support_mut().visualizable.visible = false;
    }
    if let Some(node) = h.window.tree_mut().get_mut(w) {
        node.support_mut().focusable.supported = true;
        node.set_focus_companion(Some(tip));
    }

    h.input([move_to(50.0, 50.0)]);
    h.at(200);
    assert!(h.window.tree().is_visible(tip));

    h.input([move_to(60.0, 50.0)]);
    assert!(!h.window.tree().is_visible(tip));
}

#[test]
fn test_navigation_without_wraparound() {
    let mut h = Harness::new();
    let menu = h.add_probe("menu", EventKinds::empty(), Area::new(0.0, 0.0, 100.0, 100.0));
    if let Some(node) = h.window.tree_mut().get_mut(menu) {
        node.support_mut().navigatable = true;
    }
    let items: Vec<WidgetId> = (0..3)
        .map(|i| {
            let item = h.probe("item", EventKinds::empty(), Area::new(0.0, 20.0 * i as f64, 100.0, 20.0));
            if let Some(node) = h.window.tree_mut().get_mut(item) {
                node.support_mut().activatable.supported = true;
            }
            h.window.context(menu).add(menu, item);
            item
        })
        .collect();

    let mut ctx = h.window.context(menu);
    assert_eq!(ctx.navigate_forward(menu), Some(items[0]));
    assert_eq!(ctx.navigate_forward(menu), Some(items[1]));
    assert_eq!(ctx.navigate_backward(menu), Some(items[0]));
    assert_eq!(ctx.navigate_forward(menu), Some(items[1]));
    assert_eq!(ctx.navigate_forward(menu), Some(items[2]));
    assert_eq!(ctx.navigate_forward(menu), Some(items[2]));

    let active: Vec<bool> = items.iter().map(|&i| h.window.tree().is_active(i)).collect();
    assert_eq!(active, vec![false, false, true]);
}

#[test]
fn test_destroy_cancels_pending_events() {
    let mut h = Harness::new();
    let w = h.add_probe("w", EventKinds::all(), Area::new(0.0, 0.0, 50.0, 50.0));
    h.window.step();
    h.clear_log();

    h.window.post(Event::value_changed(w, 42));
    assert!(h.window.context(w).destroy(w));
    h.window.step();

    assert!(h.received("w").is_empty());
    assert!(!h.window.tree().contains(w));
}

#[test]
fn test_expose_requests_merge_by_union() {
    let mut h = Harness::new();
    let w = h.add_probe("w", EventKinds::empty(), Area::new(100.0, 100.0, 50.0, 50.0));
    h.window.step();
    assert!(h.window.queue().is_empty());

    for area in [
        Area::new(100.0, 100.0, 10.0, 10.0),
        Area::new(120.0, 120.0, 10.0, 10.0),
        Area::new(100.0, 140.0, 50.0, 10.0),
    ] {
        h.window.post(Event::expose_request(w, area));
    }

    assert_eq!(h.window.queue().len(), 1);
    let merged = h.window.queue().peek().and_then(|e| e.area());
    assert_eq!(merged, Some(Area::new(100.0, 100.0, 50.0, 50.0)));

    h.window.step();
    assert_eq!(h.host.last_dirty(), Some(Area::new(100.0, 100.0, 50.0, 50.0)));
}

#[test]
fn test_grab_routes_press_outside_widget() {
    let mut h = Harness::new();
    let w = h.add_probe("w", EventKinds::BUTTON_EVENTS, Area::new(0.0, 0.0, 50.0, 50.0));
    assert!(h.window.context(w).grab(Device::Mouse(MouseButton::Left)));

    h.input([move_to(150.0, 150.0), press(MouseButton::Left)]);
    assert_eq!(h.received("w"), vec![EventKind::ButtonPress]);

    h.input([press(MouseButton::Right)]);
    assert_eq!(h.received("w").len(), 1);
}

#[test]
fn test_press_release_synthesizes_one_click() {
    let mut h = Harness::new();
    h.add_probe("w", EventKinds::BUTTON_EVENTS, Area::new(0.0, 0.0, 50.0, 50.0));

    h.input([move_to(20.0, 20.0), press(MouseButton::Left)]);
    h.clock.set_millis(100);
    h.input([release(MouseButton::Left)]);

    assert_eq!(
        h.received("w"),
        vec![EventKind::ButtonPress, EventKind::ButtonRelease, EventKind::ButtonClick]
    );
}

#[test]
fn test_slow_or_distant_release_is_not_a_click() {
    let mut h = Harness::new();
    h.add_probe("w", EventKinds::BUTTON_EVENTS, Area::new(0.0, 0.0, 50.0, 50.0));

    h.input([move_to(20.0, 20.0), press(MouseButton::Left)]);
    h.clock.set_millis(400);
    h.input([release(MouseButton::Left)]);

    h.input([press(MouseButton::Left)]);
    h.input([move_to(40.0, 40.0), release(MouseButton::Left)]);

    let clicks = h
        .received("w")
        .into_iter()
        .filter(|k| *k == EventKind::ButtonClick)
        .count();
    assert_eq!(clicks, 0);
}

#[test]
fn test_drag_follows_pressing_widget() {
    let mut h = Harness::new();
    h.add_probe(
        "w",
        EventKinds::BUTTON_EVENTS | EventKinds::POINTER_EVENTS,
        Area::new(0.0, 0.0, 50.0, 50.0),
    );

    h.input([move_to(10.0, 10.0), press(MouseButton::Left)]);
    h.clear_log();
    h.input([move_to(120.0, 120.0)]);
    assert_eq!(h.received("w"), vec![EventKind::PointerDrag]);

    h.input([release(MouseButton::Left)]);
    h.clear_log();
    h.input([move_to(130.0, 130.0)]);
    assert!(h.received("w").is_empty());
}

#[test]
fn test_hover_status_tracks_pointer() {
    let mut h = Harness::new();
    let w = h.add_probe("w", EventKinds::BUTTON_EVENTS, Area::new(0.0, 0.0, 50.0, 50.0));
    let status = |h: &Harness| h.window.tree().get(w).map(|n| n.status());

    h.input([move_to(10.0, 10.0)]);
    assert_eq!(status(&h), Some(Status::Hover));
    assert_eq!(h.window.dispatcher().hovered(), Some(w));

    h.input([move_to(100.0, 100.0)]);
    assert_eq!(status(&h), Some(Status::Normal));
}

#[test]
fn test_keys_go_to_entered_widget_then_hot_keys() {
    let mut h = Harness::new();
    let field = h.add_probe("field", EventKinds::KEY_EVENTS, Area::new(0.0, 0.0, 50.0, 20.0));
    let button = h.add_probe("button", EventKinds::KEY_EVENTS, Area::new(0.0, 30.0, 50.0, 20.0));
    if let Some(node) = h.window.tree_mut().get_mut(field) {
        node.support_mut().enterable.supported = true;
    }
    if let Some(node) = h.window.tree_mut().get_mut(button) {
        let enterable = &mut node.support_mut().enterable;
        enterable.supported = true;
        enterable.hot_keys.push(KeyCode::Char('q'));
    }

    let key = |key| HostInput::Key { key, pressed: true };

    h.input([key(KeyCode::Char('q'))]);
    assert_eq!(h.received("button"), vec![EventKind::KeyPress]);

    assert!(h.window.context(field).enter(field));
    h.input([key(KeyCode::Char('q'))]);
    assert_eq!(h.received("field"), vec![EventKind::KeyPress]);
    assert_eq!(h.received("button").len(), 1);

    h.window.context(field).leave(field);
    h.clear_log();
    h.input([key(KeyCode::Char('z'))]);
    assert!(h.log.borrow().is_empty());
}

#[test]
fn test_configure_reaches_root_callback() {
    let mut h = Harness::new();
    let root = h.window.root();
    let sizes = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&sizes);
    h.window
        .tree_mut()
        .set_callback(root, EventKind::ConfigureRequest, move |_, event| {
            seen.borrow_mut().push(event.area());
        });

    h.input([HostInput::Configure(Size::new(320.0, 240.0))]);
    assert_eq!(sizes.borrow().as_slice(), &[Some(Area::new(0.0, 0.0, 320.0, 240.0))]);
    assert_eq!(h.window.frame().dimensions(), (320, 240));
}

#[test]
fn test_frame_shows_layers_back_to_front() {
    let mut h = Harness::new();
    let back = h.add_probe("back", EventKinds::empty(), Area::new(0.0, 0.0, 40.0, 40.0));
    let front = h.window.tree_mut().insert_at(Panel::new(Color::RED), Area::new(10.0, 10.0, 10.0, 10.0));
    h.window.add(front);
    if let Some(node) = h.window.tree_mut().get_mut(front) {
        node.set_layer(Some(-1));
    }
    h.window.context(back).raise(back);
    h.window.step();

    let frame = h.host.last_frame().unwrap();
    assert_eq!(Color::from(*frame.get_pixel(15, 15)), Color::RED);
    assert_eq!(Color::from(*frame.get_pixel(5, 5)), Color::GRAY);
}
