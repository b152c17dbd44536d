//! Support traits: per-capability flags carried by every widget.
//!
//! A widget does not opt into behaviors by implementing Rust traits. Instead
//! each node carries one [`SupportTraits`] record, and the scene graph and
//! dispatcher consult its flags to decide whether the node takes part in a
//! given path (drawing, linking, pointer focus, activation, keyboard entry,
//! navigation, event merging and pass-through).

use std::time::Duration;

use horizon_strata_core::{DEFAULT_MERGEABLE, EventKind, EventKinds, KeyCode};

use crate::config::{DEFAULT_FOCUS_IN_MS, DEFAULT_FOCUS_OUT_MS};

/// Drawing support and the widget's own visibility flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visualizable {
    pub supported: bool,
    pub visible: bool,
}

impl Default for Visualizable {
    fn default() -> Self {
        Self {
            supported: true,
            visible: true,
        }
    }
}

/// Pointer-rest focus (tooltips and the like).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerFocusable {
    pub supported: bool,
    /// Rest time after which focus-in fires.
    pub focus_in: Duration,
    /// Rest time after which focus-out fires.
    pub focus_out: Duration,
}

impl Default for PointerFocusable {
    fn default() -> Self {
        Self {
            supported: false,
            focus_in: Duration::from_millis(DEFAULT_FOCUS_IN_MS),
            focus_out: Duration::from_millis(DEFAULT_FOCUS_OUT_MS),
        }
    }
}

impl PointerFocusable {
    /// Whether a pointer resting for `rest` is inside the focus window
    /// `focus_in <= rest < focus_out`.
    pub fn in_focus_window(&self, rest: Duration) -> bool {
        self.focus_in <= rest && rest < self.focus_out
    }
}

/// Activation (menu highlight).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activatable {
    pub supported: bool,
    /// Activating this widget deactivates its activatable siblings.
    pub auto_deactivate: bool,
}

impl Default for Activatable {
    fn default() -> Self {
        Self {
            supported: false,
            auto_deactivate: true,
        }
    }
}

/// Keyboard entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enterable {
    pub supported: bool,
    pub entered: bool,
    /// Keys that reach this widget while no widget is entered.
    pub hot_keys: Vec<KeyCode>,
}

impl Enterable {
    /// Whether `key` is one of the hot keys. [`KeyCode::Any`] matches all.
    pub fn has_hot_key(&self, key: KeyCode) -> bool {
        self.hot_keys.iter().any(|k| k.matches(key))
    }
}

/// The full set of capability flags of one widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportTraits {
    pub visualizable: Visualizable,
    /// May take children.
    pub linkable: bool,
    /// May post and receive messages.
    pub messagable: bool,
    pub focusable: PointerFocusable,
    pub activatable: Activatable,
    pub enterable: Enterable,
    /// Acts as a menu-style cursor over its activatable children.
    pub navigatable: bool,
    /// Kinds whose queued records for this widget may coalesce.
    pub mergeable: EventKinds,
    /// Kinds handed to the widget beneath when this one does not handle them.
    pub passable: EventKinds,
}

impl Default for SupportTraits {
    fn default() -> Self {
        Self {
            visualizable: Visualizable::default(),
            linkable: true,
            messagable: true,
            focusable: PointerFocusable::default(),
            activatable: Activatable::default(),
            enterable: Enterable::default(),
            navigatable: false,
            mergeable: DEFAULT_MERGEABLE,
            passable: EventKinds::all(),
        }
    }
}

impl SupportTraits {
    pub fn is_mergeable(&self, kind: EventKind) -> bool {
        self.mergeable.contains(kind.flag())
    }

    pub fn is_passable(&self, kind: EventKind) -> bool {
        self.passable.contains(kind.flag())
    }

    /// Set or clear pass-through for a group of kinds.
    pub fn set_passable(&mut self, kinds: EventKinds, on: bool) {
        self.passable.set(kinds, on);
    }

    /// Set or clear merging for a group of kinds.
    pub fn set_mergeable(&mut self, kinds: EventKinds, on: bool) {
        self.mergeable.set(kinds, on);
    }
}
