//! The root window and its step loop.

use std::time::Duration;

use horizon_strata_core::logging::targets;
use horizon_strata_core::{Clock, Event, EventKind, EventQueue, SystemClock, WidgetId};
use horizon_strata_render::{Area, DamageTracker, Raster, RgbaImage, Size};
use tracing::{debug, info, trace, warn};

use crate::compositor::{CompositeStats, Compositor};
use crate::config::ToolkitConfig;
use crate::dispatch::{Dispatcher, window_area};
use crate::error::Result;
use crate::widget::{Panel, Widget, WidgetContext, WidgetTree};

use super::host::HostBridge;

/// How long `run` lets the host block when a step had nothing to do.
const IDLE_WAIT: Duration = Duration::from_millis(8);

/// The root of a widget tree, bound to one host surface.
///
/// The main window owns the scene graph, the event queue, the dispatcher
/// state and the output frame. Each [`step`](Self::step):
///
/// 1. polls host input and translates it into queued events,
/// 2. runs the pointer-focus timer,
/// 3. drains the queue, delivering each event to its widget,
/// 4. composites the accumulated dirty area and presents it.
///
/// # Example
///
/// ```
/// use horizon_strata::config::ToolkitConfig;
/// use horizon_strata::render::{Area, Color};
/// use horizon_strata::widget::Panel;
/// use horizon_strata::window::{HeadlessBridge, MainWindow};
///
/// let host = HeadlessBridge::new();
/// let mut window = MainWindow::new(ToolkitConfig::default(), host.clone()).unwrap();
///
/// let panel = window.tree_mut().insert_at(Panel::new(Color::RED), Area::new(10.0, 10.0, 50.0, 20.0));
/// window.add(panel);
/// window.step();
///
/// assert_eq!(host.present_count(), 1);
/// ```
pub struct MainWindow {
    tree: WidgetTree,
    queue: EventQueue,
    dispatcher: Dispatcher,
    compositor: Compositor,
    host: Box<dyn HostBridge>,
    clock: Box<dyn Clock>,
    damage: DamageTracker,
    frame: RgbaImage,
    config: ToolkitConfig,
    root: WidgetId,
    close_requested: bool,
}

impl std::fmt::Debug for MainWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainWindow")
            .field("root", &self.root)
            .field("widgets", &self.tree.len())
            .field("queued", &self.queue.len())
            .field("close_requested", &self.close_requested)
            .finish_non_exhaustive()
    }
}

impl MainWindow {
    /// Create a root window with a plain background panel.
    pub fn new(config: ToolkitConfig, host: impl HostBridge + 'static) -> Result<Self> {
        let background = Panel::new(config.window.background_color());
        Self::with_root(config, host, background, SystemClock::new())
    }

    /// Create a root window driven by an explicit clock.
    pub fn with_clock(
        config: ToolkitConfig,
        host: impl HostBridge + 'static,
        clock: impl Clock + 'static,
    ) -> Result<Self> {
        let background = Panel::new(config.window.background_color());
        Self::with_root(config, host, background, clock)
    }

    /// Create a root window whose root widget is driven by `root`.
    pub fn with_root(
        config: ToolkitConfig,
        host: impl HostBridge + 'static,
        root: impl Widget,
        clock: impl Clock + 'static,
    ) -> Result<Self> {
        config.validate()?;
        let scale = config.window.scale;
        let size = config.window.size();
        let (width, height) = Raster::pixel_dimensions(size, scale)?;

        let mut tree = WidgetTree::with_scale(scale);
        tree.set_focus_timing(config.dispatch.focus_in(), config.dispatch.focus_out());
        let root = tree.insert_window(root, size);
        if let Some(node) = tree.get_mut(root) {
            node.set_title(config.window.title.clone());
        }

        let mut damage = DamageTracker::with_viewport(window_area(size));
        damage.invalidate_all();

        info!(
            target: targets::WINDOW,
            title = %config.window.title,
            width = size.width,
            height = size.height,
            scale,
            "main window created"
        );

        Ok(Self {
            tree,
            queue: EventQueue::new(),
            dispatcher: Dispatcher::new(&config.dispatch),
            compositor: Compositor::new(config.window.background_color()),
            host: Box::new(host),
            clock: Box::new(clock),
            damage,
            frame: RgbaImage::new(width, height),
            config,
            root,
            close_requested: false,
        })
    }

    pub fn root(&self) -> WidgetId {
        self.root
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut EventQueue {
        &mut self.queue
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    /// A handler context acting for `widget`.
    pub fn context(&mut self, widget: WidgetId) -> WidgetContext<'_> {
        WidgetContext::new(&mut self.tree, &mut self.queue, widget)
    }

    /// Add a widget directly under the root.
    pub fn add(&mut self, child: WidgetId) -> Option<usize> {
        let root = self.root;
        self.context(root).add(root, child)
    }

    /// Queue an event, merging by its widget's mergeable mask.
    pub fn post(&mut self, event: Event) {
        let root = self.root;
        self.context(root).post(event);
    }

    /// The output frame as last composited.
    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    pub fn is_close_requested(&self) -> bool {
        self.close_requested
    }

    /// Queue a close-request for the root.
    pub fn request_close(&mut self) {
        self.post(Event::close_request(self.root));
    }

    /// Advance the window by one iteration. Returns whether any work was
    /// done.
    pub fn step(&mut self) -> bool {
        let now = self.clock.now();
        let mut busy = false;

        match self.host.poll_input() {
            Ok(inputs) => {
                busy |= !inputs.is_empty();
                for input in inputs {
                    trace!(target: targets::WINDOW, ?input, "host input");
                    self.dispatcher.handle_input(
                        &mut self.tree,
                        &mut self.queue,
                        self.root,
                        input,
                        now,
                    );
                }
            }
            Err(err) => {
                warn!(target: targets::WINDOW, error = %err, "host input failed, closing");
                self.request_close();
            }
        }

        self.dispatcher
            .tick(&mut self.tree, &mut self.queue, self.root, now);

        busy |= self.drain();

        if let Some(dirty) = self.damage.take() {
            busy = true;
            self.present(dirty);
        }
        busy
    }

    /// Step until a close is requested.
    pub fn run(&mut self) {
        info!(target: targets::WINDOW, "entering run loop");
        while !self.close_requested {
            if !self.step() && !self.close_requested {
                self.host.wait(IDLE_WAIT);
            }
        }
        info!(target: targets::WINDOW, "run loop finished");
    }

    fn drain(&mut self) -> bool {
        let cap = self.config.dispatch.max_events_per_step;
        let mut processed = 0;
        while let Some(event) = self.queue.pop() {
            self.process(event);
            processed += 1;
            if processed >= cap {
                if !self.queue.is_empty() {
                    warn!(
                        target: targets::WINDOW,
                        cap,
                        remaining = self.queue.len(),
                        "event cap reached, deferring the rest to the next step"
                    );
                }
                break;
            }
        }
        processed > 0
    }

    fn process(&mut self, event: Event) {
        let widget = event.widget();
        match event.kind() {
            EventKind::ConfigureRequest => {
                if let Some(area) = event.area() {
                    if widget == self.root {
                        self.configure_root(area.size);
                    } else {
                        self.context(widget).set_area(widget, area);
                    }
                }
            }
            EventKind::ExposeRequest => {
                if let Some(area) = event.area()
                    && self.tree.root(widget) == Some(self.root)
                {
                    self.damage.add_damage(area);
                }
            }
            EventKind::CloseRequest if widget == self.root => {
                debug!(target: targets::WINDOW, "close requested");
                self.close_requested = true;
            }
            _ => {}
        }
        Dispatcher::deliver(&mut self.tree, &mut self.queue, &event);
    }

    fn configure_root(&mut self, size: Size) {
        let scale = self.config.window.scale;
        let (width, height) = match Raster::pixel_dimensions(size, scale) {
            Ok(dims) => dims,
            Err(err) => {
                warn!(target: targets::WINDOW, error = %err, "ignoring invalid window size");
                return;
            }
        };
        let root = self.root;
        let Some(node) = self.tree.get_mut(root) else {
            return;
        };
        if !node.set_size(size) {
            return;
        }
        node.raster.schedule_draw();

        self.frame = RgbaImage::new(width, height);
        self.damage.set_viewport(window_area(size));
        self.damage.invalidate_all();
        debug!(target: targets::WINDOW, width = size.width, height = size.height, "window configured");
    }

    fn present(&mut self, dirty: Area) {
        let scale = self.config.window.scale;
        let stats: CompositeStats =
            match self
                .compositor
                .composite(&mut self.tree, self.root, &mut self.frame, dirty, scale)
            {
                Ok(stats) => stats,
                Err(err) => {
                    warn!(target: targets::WINDOW, error = %err, "compositing failed");
                    return;
                }
            };
        trace!(target: targets::WINDOW, ?stats, "composited");

        if let Err(err) = self.host.present(&self.frame, dirty) {
            warn!(target: targets::WINDOW, error = %err, "present failed, closing");
            self.request_close();
        }
    }
}
