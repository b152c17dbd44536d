//! Input devices and per-widget grab sets.
//!
//! A [`Device`] names one input source: a key or a mouse button. Devices order
//! lexicographically on (kind, parameter) and compare equal exactly when that
//! ordering says so. A widget's [`DeviceSet`] holds the devices it has
//! grabbed; each device appears at most once per set.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::key::KeyCode;

/// Mouse buttons.
///
/// Buttons compare, order and hash by [`id`](MouseButton::id), so
/// `Other(1)` is the same button as `Left`.
#[derive(Debug, Clone, Copy)]
pub enum MouseButton {
    /// Primary button (usually left), id 1.
    Left,
    /// Middle button (scroll wheel click), id 2.
    Middle,
    /// Secondary button (usually right), id 3.
    Right,
    /// Additional button (e.g., browser back), id 4.
    Back,
    /// Additional button (e.g., browser forward), id 5.
    Forward,
    /// Any other button by raw id.
    Other(u16),
}

impl MouseButton {
    /// Numeric button id.
    pub fn id(self) -> u16 {
        match self {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
            MouseButton::Back => 4,
            MouseButton::Forward => 5,
            MouseButton::Other(id) => id,
        }
    }

    /// Button from its numeric id.
    pub fn from_id(id: u16) -> Self {
        match id {
            1 => MouseButton::Left,
            2 => MouseButton::Middle,
            3 => MouseButton::Right,
            4 => MouseButton::Back,
            5 => MouseButton::Forward,
            other => MouseButton::Other(other),
        }
    }
}

impl PartialEq for MouseButton {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for MouseButton {}

impl PartialOrd for MouseButton {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MouseButton {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id().cmp(&other.id())
    }
}

impl Hash for MouseButton {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

/// A comparable handle identifying an input source.
///
/// Keys order before mouse buttons; within a kind, devices order by their
/// parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Device {
    /// A keyboard key.
    Keys(KeyCode),
    /// A mouse button.
    Mouse(MouseButton),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Keys(key) => write!(f, "key {key}"),
            Device::Mouse(button) => write!(f, "mouse button {}", button.id()),
        }
    }
}

/// The set of devices grabbed by one widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSet {
    devices: BTreeSet<Device>,
}

impl DeviceSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device. Returns `false` if it was already present.
    pub fn grab(&mut self, device: Device) -> bool {
        self.devices.insert(device)
    }

    /// Remove a device. Returns `false` if it was not present.
    pub fn release(&mut self, device: Device) -> bool {
        self.devices.remove(&device)
    }

    /// Remove every device.
    pub fn release_all(&mut self) {
        self.devices.clear();
    }

    /// Check whether the device is held.
    pub fn contains(&self, device: Device) -> bool {
        self.devices.contains(&device)
    }

    /// Number of held devices.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Iterate over held devices in order.
    pub fn iter(&self) -> impl Iterator<Item = Device> + '_ {
        self.devices.iter().copied()
    }
}
