//! Scene-graph node records.
//!
//! A [`WidgetNode`] is the core record of one widget: identity, geometry,
//! status, style, support-trait flags, the owned raster and the tree links.
//! Tree links are read-only from outside the crate; they change only through
//! [`WidgetTree`](super::WidgetTree) so that the parent/children/root
//! invariants hold at all times.

use std::collections::BTreeMap;
use std::fmt;

use horizon_strata_core::logging::targets;
use horizon_strata_core::{DeviceSet, EventKinds, WidgetId};
use horizon_strata_render::{Area, Color, Point, Raster, Size};

use super::Widget;
use super::support::SupportTraits;

/// Layer used when neither a widget nor any ancestor names one.
pub const DEFAULT_LAYER: i32 = 0;

/// How a widget behaves at its parent's boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stacking {
    /// Cut at the parent's area.
    #[default]
    Clipped,
    /// Overhangs beyond the parent's area are drawn.
    Escape,
}

/// Interaction status of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Normal,
    Active,
    Hover,
    Disabled,
}

/// One entry of a style bundle.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Color(Color),
    Number(f64),
    Text(String),
}

impl From<Color> for StyleValue {
    fn from(v: Color) -> Self {
        StyleValue::Color(v)
    }
}

impl From<f64> for StyleValue {
    fn from(v: f64) -> Self {
        StyleValue::Number(v)
    }
}

impl From<&str> for StyleValue {
    fn from(v: &str) -> Self {
        StyleValue::Text(v.to_owned())
    }
}

/// A named set of style values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    entries: BTreeMap<String, StyleValue>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.entries.get(key)
    }

    /// Color entry, if present and a color.
    pub fn color(&self, key: &str) -> Option<Color> {
        match self.entries.get(key) {
            Some(StyleValue::Color(c)) => Some(*c),
            _ => None,
        }
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.entries.get(key) {
            Some(StyleValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The record of one widget in the scene graph.
pub struct WidgetNode {
    urid: u32,
    title: String,
    position: Point,
    size: Size,
    stacking: Stacking,
    status: Status,
    style: Style,
    theme: Option<String>,
    focus_companion: Option<WidgetId>,
    push_style_to_children: bool,
    layer: Option<i32>,
    support: SupportTraits,
    pub(crate) devices: DeviceSet,
    pub(crate) raster: Raster,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) root: WidgetId,
    pub(crate) children: Vec<WidgetId>,
    pub(crate) behavior: Option<Box<dyn Widget>>,
    pub(crate) handles: EventKinds,
    pub(crate) is_window: bool,
}

impl fmt::Debug for WidgetNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetNode")
            .field("urid", &self.urid)
            .field("title", &self.title)
            .field("position", &self.position)
            .field("size", &self.size)
            .field("stacking", &self.stacking)
            .field("status", &self.status)
            .field("layer", &self.layer)
            .field("parent", &self.parent)
            .field("root", &self.root)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

impl WidgetNode {
    pub(crate) fn new(id: WidgetId, behavior: Option<Box<dyn Widget>>, scale: f64) -> Self {
        let handles = behavior
            .as_ref()
            .map_or(EventKinds::empty(), |b| b.supported_events());
        let raster = Raster::new(Size::ZERO, scale).unwrap_or_default();
        Self {
            urid: 0,
            title: String::new(),
            position: Point::ZERO,
            size: Size::ZERO,
            stacking: Stacking::default(),
            status: Status::default(),
            style: Style::default(),
            theme: None,
            focus_companion: None,
            push_style_to_children: false,
            layer: None,
            support: SupportTraits::default(),
            devices: DeviceSet::new(),
            raster,
            parent: None,
            root: id,
            children: Vec::new(),
            behavior,
            handles,
            is_window: false,
        }
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Integer identifier used for style and theme lookup.
    pub fn urid(&self) -> u32 {
        self.urid
    }

    pub fn set_urid(&mut self, urid: u32) -> &mut Self {
        self.urid = urid;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Position relative to the parent.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) -> &mut Self {
        self.position = position;
        self
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Change the extends and resize the raster to match.
    ///
    /// If the raster cannot be resized, the old raster and extends are kept
    /// and `false` is returned.
    pub fn set_size(&mut self, size: Size) -> bool {
        match self.raster.resize(size) {
            Ok(()) => {
                self.size = size;
                true
            }
            Err(err) => {
                tracing::warn!(
                    target: targets::RENDER,
                    title = %self.title,
                    width = size.width,
                    height = size.height,
                    error = %err,
                    "raster resize failed, keeping previous raster"
                );
                false
            }
        }
    }

    /// Area relative to the parent.
    pub fn area(&self) -> Area {
        Area::from_origin_size(self.position, self.size)
    }

    pub fn stacking(&self) -> Stacking {
        self.stacking
    }

    pub fn set_stacking(&mut self, stacking: Stacking) -> &mut Self {
        self.stacking = stacking;
        self
    }

    /// Own layer, `None` to inherit from the parent.
    pub fn layer(&self) -> Option<i32> {
        self.layer
    }

    pub fn set_layer(&mut self, layer: Option<i32>) -> &mut Self {
        self.layer = layer;
        self
    }

    // =========================================================================
    // State and appearance
    // =========================================================================

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn set_status(&mut self, status: Status) -> &mut Self {
        self.status = status;
        self
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub(crate) fn set_style_raw(&mut self, style: Style) {
        self.style = style;
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    pub fn set_theme(&mut self, theme: Option<String>) -> &mut Self {
        self.theme = theme;
        self
    }

    pub fn push_style_to_children(&self) -> bool {
        self.push_style_to_children
    }

    pub fn set_push_style_to_children(&mut self, push: bool) -> &mut Self {
        self.push_style_to_children = push;
        self
    }

    /// Widget shown on pointer-focus-in and hidden on pointer-focus-out.
    pub fn focus_companion(&self) -> Option<WidgetId> {
        self.focus_companion
    }

    pub fn set_focus_companion(&mut self, companion: Option<WidgetId>) -> &mut Self {
        self.focus_companion = companion;
        self
    }

    pub fn support(&self) -> &SupportTraits {
        &self.support
    }

    pub fn support_mut(&mut self) -> &mut SupportTraits {
        &mut self.support
    }

    /// The widget's own visibility flag (ignores ancestors).
    pub fn is_shown(&self) -> bool {
        self.support.visualizable.supported && self.support.visualizable.visible
    }

    pub fn devices(&self) -> &DeviceSet {
        &self.devices
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Kinds the widget handles itself (its own handler or a callback).
    pub fn handled_events(&self) -> EventKinds {
        self.handles
    }

    // =========================================================================
    // Links
    // =========================================================================

    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    pub fn root(&self) -> WidgetId {
        self.root
    }

    /// Children in draw order (last is foremost).
    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    pub fn is_window(&self) -> bool {
        self.is_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn node() -> WidgetNode {
        let mut ids: SlotMap<WidgetId, ()> = SlotMap::with_key();
        WidgetNode::new(ids.insert(()), None, 1.0)
    }

    #[test]
    fn test_set_size_resizes_raster() {
        let mut node = node();
        assert!(node.set_size(Size::new(12.0, 7.5)));
        assert_eq!(node.raster().width(), 12);
        assert_eq!(node.raster().height(), 8);
    }

    #[test]
    fn test_failed_resize_keeps_old_raster() {
        let mut node = node();
        assert!(node.set_size(Size::new(4.0, 4.0)));
        assert!(!node.set_size(Size::new(f64::NAN, 4.0)));
        assert_eq!(node.size(), Size::new(4.0, 4.0));
        assert_eq!(node.raster().width(), 4);
    }

    #[test]
    fn test_style_accessors() {
        let style = Style::new()
            .with("background", Color::RED)
            .with("radius", 3.0)
            .with("font", "mono");
        assert_eq!(style.color("background"), Some(Color::RED));
        assert_eq!(style.number("radius"), Some(3.0));
        assert_eq!(style.color("radius"), None);
        assert_eq!(style.len(), 3);
    }
}
