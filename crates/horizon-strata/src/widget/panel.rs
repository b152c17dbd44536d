//! A plain colored panel.

use horizon_strata_render::Color;

use super::node::Status;
use super::{PaintContext, Widget};

/// A widget that fills its area with one color.
///
/// A `"background"` color in the node's style overrides the panel's own
/// color. Hovered and disabled panels are drawn lighter and translucent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    pub background: Color,
}

impl Panel {
    pub fn new(background: Color) -> Self {
        Self { background }
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new(Color::TRANSPARENT)
    }
}

impl Widget for Panel {
    fn paint(&self, ctx: &mut PaintContext<'_>) {
        let node = ctx.node();
        let base = node
            .and_then(|n| n.style().color("background"))
            .unwrap_or(self.background);
        let color = match node.map(|n| n.status()) {
            Some(Status::Hover) => lighten(base),
            Some(Status::Disabled) => base.with_alpha(base.a / 2),
            _ => base,
        };
        ctx.fill(color);
    }
}

fn lighten(color: Color) -> Color {
    let up = |c: u8| c.saturating_add((255 - c) / 4);
    Color::from_rgba8(up(color.r), up(color.g), up(color.b), color.a)
}
