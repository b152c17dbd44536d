//! Event model.
//!
//! Every event record carries a single [`EventKind`], the [`WidgetId`] it
//! belongs to and a kind-dependent [`EventPayload`]. Kinds have stable
//! power-of-two wire values so that sets of kinds compose as [`EventKinds`]
//! bitsets; widgets test support for whole groups by masking against the
//! aggregate constants.
//!
//! # Example
//!
//! ```
//! use horizon_strata_core::{Event, EventKind, EventKinds, WidgetId};
//! use horizon_strata_render::Area;
//!
//! let widget = WidgetId::default();
//! let event = Event::expose_request(widget, Area::new(0.0, 0.0, 10.0, 10.0));
//!
//! assert_eq!(event.kind(), EventKind::ExposeRequest);
//! assert!(EventKinds::WIDGET_EVENTS.contains(event.kind().flag()));
//! assert_eq!(EventKind::PointerFocusOut.bits(), 0x4000);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;
use horizon_strata_render::{Area, Point};
use slotmap::new_key_type;

use crate::device::MouseButton;
use crate::key::KeyCode;
use crate::value::Value;

new_key_type! {
    /// A unique identifier for a widget in the scene graph.
    ///
    /// `WidgetId`s are stable handles that remain valid while the tree is
    /// restructured. They become invalid when the widget is destroyed.
    pub struct WidgetId;
}

impl WidgetId {
    /// Convert the id to a raw u64 value.
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }
}

bitflags! {
    /// A set of event kinds.
    ///
    /// The single-kind values are part of the public wire format and must
    /// never change.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
    pub struct EventKinds: u32 {
        const CONFIGURE_REQUEST = 0x0001;
        const EXPOSE_REQUEST = 0x0002;
        const CLOSE_REQUEST = 0x0004;
        const KEY_PRESS = 0x0008;
        const KEY_RELEASE = 0x0010;
        const BUTTON_PRESS = 0x0020;
        const BUTTON_RELEASE = 0x0040;
        const BUTTON_CLICK = 0x0080;
        const POINTER_DRAG = 0x0100;
        const POINTER_MOTION = 0x0200;
        const WHEEL_SCROLL = 0x0400;
        const VALUE_CHANGED = 0x0800;
        const MESSAGE = 0x1000;
        const POINTER_FOCUS_IN = 0x2000;
        const POINTER_FOCUS_OUT = 0x4000;

        const WIDGET_EVENTS = Self::CONFIGURE_REQUEST.bits()
            | Self::EXPOSE_REQUEST.bits()
            | Self::CLOSE_REQUEST.bits();
        const KEY_EVENTS = Self::KEY_PRESS.bits() | Self::KEY_RELEASE.bits();
        const BUTTON_EVENTS = Self::BUTTON_PRESS.bits()
            | Self::BUTTON_RELEASE.bits()
            | Self::BUTTON_CLICK.bits();
        const POINTER_EVENTS = Self::POINTER_DRAG.bits() | Self::POINTER_MOTION.bits();
        const WHEEL_EVENTS = Self::WHEEL_SCROLL.bits();
        const MOUSE_EVENTS = Self::BUTTON_EVENTS.bits()
            | Self::POINTER_EVENTS.bits()
            | Self::WHEEL_EVENTS.bits();
        const CONTENT_EVENTS = Self::VALUE_CHANGED.bits() | Self::MESSAGE.bits();
        const POINTER_FOCUS_EVENTS = Self::POINTER_FOCUS_IN.bits()
            | Self::POINTER_FOCUS_OUT.bits();
    }
}

/// A single event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum EventKind {
    ConfigureRequest = 0x0001,
    ExposeRequest = 0x0002,
    CloseRequest = 0x0004,
    KeyPress = 0x0008,
    KeyRelease = 0x0010,
    ButtonPress = 0x0020,
    ButtonRelease = 0x0040,
    ButtonClick = 0x0080,
    PointerDrag = 0x0100,
    PointerMotion = 0x0200,
    WheelScroll = 0x0400,
    ValueChanged = 0x0800,
    Message = 0x1000,
    PointerFocusIn = 0x2000,
    PointerFocusOut = 0x4000,
}

impl EventKind {
    /// Every kind, in wire-value order.
    pub const ALL: [EventKind; 15] = [
        EventKind::ConfigureRequest,
        EventKind::ExposeRequest,
        EventKind::CloseRequest,
        EventKind::KeyPress,
        EventKind::KeyRelease,
        EventKind::ButtonPress,
        EventKind::ButtonRelease,
        EventKind::ButtonClick,
        EventKind::PointerDrag,
        EventKind::PointerMotion,
        EventKind::WheelScroll,
        EventKind::ValueChanged,
        EventKind::Message,
        EventKind::PointerFocusIn,
        EventKind::PointerFocusOut,
    ];

    /// The wire value.
    #[inline]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// The kind as a one-element set.
    #[inline]
    pub const fn flag(self) -> EventKinds {
        EventKinds::from_bits_retain(self as u32)
    }

    /// Look up a kind by wire value. Unknown values yield `None`.
    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.bits() == bits)
    }

    /// Whether the payload of this kind carries a pointer position.
    pub fn is_positional(self) -> bool {
        EventKinds::MOUSE_EVENTS
            .union(EventKinds::KEY_EVENTS)
            .union(EventKinds::POINTER_FOCUS_EVENTS)
            .contains(self.flag())
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::ConfigureRequest => "configure-request",
            EventKind::ExposeRequest => "expose-request",
            EventKind::CloseRequest => "close-request",
            EventKind::KeyPress => "key-press",
            EventKind::KeyRelease => "key-release",
            EventKind::ButtonPress => "button-press",
            EventKind::ButtonRelease => "button-release",
            EventKind::ButtonClick => "button-click",
            EventKind::PointerDrag => "pointer-drag",
            EventKind::PointerMotion => "pointer-motion",
            EventKind::WheelScroll => "wheel-scroll",
            EventKind::ValueChanged => "value-changed",
            EventKind::Message => "message",
            EventKind::PointerFocusIn => "pointer-focus-in",
            EventKind::PointerFocusOut => "pointer-focus-out",
        };
        f.write_str(name)
    }
}

/// Identity of one event record.
///
/// Clones of a record share its id, which is what the queue uses to refuse
/// holding the same record twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(u64);

impl EventId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

/// Kind-dependent event data.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    /// Close requests carry nothing.
    None,
    /// Configure (new area) and expose (dirty area) requests.
    Area(Area),
    Key {
        key: KeyCode,
        position: Point,
    },
    Button {
        button: MouseButton,
        position: Point,
    },
    /// Motion and drag. Drags name the button held.
    Pointer {
        position: Point,
        delta: Point,
        button: Option<MouseButton>,
    },
    Wheel {
        position: Point,
        delta: Point,
    },
    Focus {
        position: Point,
    },
    Value(Value),
    Message {
        name: String,
        value: Value,
    },
}

/// An event record.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    id: EventId,
    kind: EventKind,
    widget: WidgetId,
    payload: EventPayload,
}

impl Event {
    fn with(kind: EventKind, widget: WidgetId, payload: EventPayload) -> Self {
        Self {
            id: EventId::next(),
            kind,
            widget,
            payload,
        }
    }

    /// Ask a widget to take a new area.
    pub fn configure_request(widget: WidgetId, area: Area) -> Self {
        Self::with(EventKind::ConfigureRequest, widget, EventPayload::Area(area))
    }

    /// Report a dirty area (root coordinates) that needs compositing.
    pub fn expose_request(widget: WidgetId, area: Area) -> Self {
        Self::with(EventKind::ExposeRequest, widget, EventPayload::Area(area))
    }

    pub fn close_request(widget: WidgetId) -> Self {
        Self::with(EventKind::CloseRequest, widget, EventPayload::None)
    }

    pub fn key_press(widget: WidgetId, key: KeyCode, position: Point) -> Self {
        Self::with(EventKind::KeyPress, widget, EventPayload::Key { key, position })
    }

    pub fn key_release(widget: WidgetId, key: KeyCode, position: Point) -> Self {
        Self::with(EventKind::KeyRelease, widget, EventPayload::Key { key, position })
    }

    pub fn button_press(widget: WidgetId, button: MouseButton, position: Point) -> Self {
        Self::with(
            EventKind::ButtonPress,
            widget,
            EventPayload::Button { button, position },
        )
    }

    pub fn button_release(widget: WidgetId, button: MouseButton, position: Point) -> Self {
        Self::with(
            EventKind::ButtonRelease,
            widget,
            EventPayload::Button { button, position },
        )
    }

    pub fn button_click(widget: WidgetId, button: MouseButton, position: Point) -> Self {
        Self::with(
            EventKind::ButtonClick,
            widget,
            EventPayload::Button { button, position },
        )
    }

    pub fn pointer_motion(widget: WidgetId, position: Point, delta: Point) -> Self {
        Self::with(
            EventKind::PointerMotion,
            widget,
            EventPayload::Pointer {
                position,
                delta,
                button: None,
            },
        )
    }

    pub fn pointer_drag(
        widget: WidgetId,
        position: Point,
        delta: Point,
        button: MouseButton,
    ) -> Self {
        Self::with(
            EventKind::PointerDrag,
            widget,
            EventPayload::Pointer {
                position,
                delta,
                button: Some(button),
            },
        )
    }

    pub fn wheel_scroll(widget: WidgetId, position: Point, delta: Point) -> Self {
        Self::with(
            EventKind::WheelScroll,
            widget,
            EventPayload::Wheel { position, delta },
        )
    }

    pub fn pointer_focus_in(widget: WidgetId, position: Point) -> Self {
        Self::with(EventKind::PointerFocusIn, widget, EventPayload::Focus { position })
    }

    pub fn pointer_focus_out(widget: WidgetId, position: Point) -> Self {
        Self::with(EventKind::PointerFocusOut, widget, EventPayload::Focus { position })
    }

    pub fn value_changed(widget: WidgetId, value: impl Into<Value>) -> Self {
        Self::with(
            EventKind::ValueChanged,
            widget,
            EventPayload::Value(value.into()),
        )
    }

    pub fn message(widget: WidgetId, name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::with(
            EventKind::Message,
            widget,
            EventPayload::Message {
                name: name.into(),
                value: value.into(),
            },
        )
    }

    #[inline]
    pub fn id(&self) -> EventId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The widget the event belongs to (target or originator).
    #[inline]
    pub fn widget(&self) -> WidgetId {
        self.widget
    }

    /// Redirect the event to another widget.
    #[inline]
    pub fn set_widget(&mut self, widget: WidgetId) {
        self.widget = widget;
    }

    #[inline]
    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    #[inline]
    pub fn payload_mut(&mut self) -> &mut EventPayload {
        &mut self.payload
    }

    /// Pointer position for positional kinds.
    pub fn position(&self) -> Option<Point> {
        match &self.payload {
            EventPayload::Key { position, .. }
            | EventPayload::Button { position, .. }
            | EventPayload::Pointer { position, .. }
            | EventPayload::Wheel { position, .. }
            | EventPayload::Focus { position } => Some(*position),
            _ => None,
        }
    }

    /// Delta for motion, drag and wheel events.
    pub fn delta(&self) -> Option<Point> {
        match &self.payload {
            EventPayload::Pointer { delta, .. } | EventPayload::Wheel { delta, .. } => {
                Some(*delta)
            }
            _ => None,
        }
    }

    /// Area for configure and expose requests.
    pub fn area(&self) -> Option<Area> {
        match &self.payload {
            EventPayload::Area(area) => Some(*area),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<KeyCode> {
        match &self.payload {
            EventPayload::Key { key, .. } => Some(*key),
            _ => None,
        }
    }

    pub fn button(&self) -> Option<MouseButton> {
        match &self.payload {
            EventPayload::Button { button, .. } => Some(*button),
            EventPayload::Pointer { button, .. } => *button,
            _ => None,
        }
    }

    /// Value of value-changed and message events.
    pub fn value(&self) -> Option<&Value> {
        match &self.payload {
            EventPayload::Value(value) | EventPayload::Message { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Name of a message event.
    pub fn message_name(&self) -> Option<&str> {
        match &self.payload {
            EventPayload::Message { name, .. } => Some(name),
            _ => None,
        }
    }
}
