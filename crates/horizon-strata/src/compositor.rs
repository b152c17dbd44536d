//! Layered compositing of widget rasters into the window frame.
//!
//! For every dirty area the compositor:
//!
//! 1. clears the area of the frame to the window background,
//! 2. walks the effective layers back to front (highest layer number first),
//! 3. for each layer, redraws the scheduled rasters of its widgets and blits
//!    every raster at its absolute position, cut by its clip and the dirty
//!    area, onto a transient [`LayerSurface`],
//! 4. blends the finished layer over the frame inside the dirty area.

use horizon_strata_core::WidgetId;
use horizon_strata_core::logging::targets;
use horizon_strata_render::{Area, Color, LayerSurface, RenderResult, RgbaImage, fill_frame_area};
use tracing::debug;

use crate::widget::WidgetTree;

/// Counters of one compositing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompositeStats {
    /// Layers assembled.
    pub layers: usize,
    /// Rasters repainted because they were scheduled.
    pub redraws: usize,
    /// Rasters that put at least one pixel on a layer.
    pub blits: usize,
}

/// Assembles the frame of one root window.
#[derive(Debug, Clone)]
pub struct Compositor {
    background: Color,
}

impl Compositor {
    pub fn new(background: Color) -> Self {
        Self { background }
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    /// Repaint `dirty` (logical root coordinates) of `frame` from the subtree
    /// at `root`. `scale` converts logical units to frame pixels.
    pub fn composite(
        &mut self,
        tree: &mut WidgetTree,
        root: WidgetId,
        frame: &mut RgbaImage,
        dirty: Area,
        scale: f64,
    ) -> RenderResult<CompositeStats> {
        let mut stats = CompositeStats::default();
        fill_frame_area(frame, dirty, scale, self.background);

        let order = tree.draw_order(root);
        for layer in tree.layers(root) {
            let mut surface = LayerSurface::new(layer, frame.width(), frame.height(), scale)?;
            for &id in &order {
                if tree.effective_layer(id) != layer {
                    continue;
                }
                if tree.get(id).is_some_and(|n| n.raster().is_draw_scheduled()) {
                    tree.redraw(id);
                    stats.redraws += 1;
                }
                let Some(clip) = tree.clip_area(id).and_then(|c| c.intersect(&dirty)) else {
                    continue;
                };
                let (Some(node), Some(origin)) = (tree.get(id), tree.absolute_position(id)) else {
                    continue;
                };
                if surface.blit(node.raster(), origin, clip) {
                    stats.blits += 1;
                }
            }
            surface.composite_onto(frame, dirty);
            stats.layers += 1;
            debug!(
                target: targets::COMPOSITOR,
                layer,
                blits = surface.blit_count(),
                "layer composited"
            );
        }

        debug!(
            target: targets::COMPOSITOR,
            x = dirty.left(),
            y = dirty.top(),
            width = dirty.width(),
            height = dirty.height(),
            layers = stats.layers,
            redraws = stats.redraws,
            "frame composited"
        );
        Ok(stats)
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(Color::TRANSPARENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_strata_render::{Point, Size};

    use crate::widget::{Panel, Stacking};

    fn pixel(frame: &RgbaImage, x: u32, y: u32) -> Color {
        Color::from(*frame.get_pixel(x, y))
    }

    fn window(tree: &mut WidgetTree, size: f64) -> WidgetId {
        tree.insert_window(Panel::new(Color::BLACK), Size::new(size, size))
    }

    #[test]
    fn test_child_over_parent() {
        let mut tree = WidgetTree::new();
        let root = window(&mut tree, 20.0);
        let child = tree.insert_at(Panel::new(Color::RED), Area::new(5.0, 5.0, 5.0, 5.0));
        tree.add(root, child);

        let mut frame = RgbaImage::new(20, 20);
        let stats = Compositor::new(Color::WHITE)
            .composite(&mut tree, root, &mut frame, Area::new(0.0, 0.0, 20.0, 20.0), 1.0)
            .unwrap();

        assert_eq!(stats.layers, 1);
        assert_eq!(stats.redraws, 2);
        assert_eq!(pixel(&frame, 0, 0), Color::BLACK);
        assert_eq!(pixel(&frame, 6, 6), Color::RED);
    }

    #[test]
    fn test_lower_layer_number_drawn_last() {
        let mut tree = WidgetTree::new();
        let root = window(&mut tree, 20.0);
        let overlay = tree.insert_at(Panel::new(Color::BLUE), Area::new(0.0, 0.0, 10.0, 10.0));
        let base = tree.insert_at(Panel::new(Color::GREEN), Area::new(0.0, 0.0, 10.0, 10.0));
        tree.add(root, overlay);
        tree.add(root, base);
        if let Some(node) = tree.get_mut(overlay) {
            node.set_layer(Some(-1));
        }

        let mut frame = RgbaImage::new(20, 20);
        let stats = Compositor::default()
            .composite(&mut tree, root, &mut frame, Area::new(0.0, 0.0, 20.0, 20.0), 1.0)
            .unwrap();

        assert_eq!(stats.layers, 2);
        assert_eq!(pixel(&frame, 2, 2), Color::BLUE);
    }

    #[test]
    fn test_clipped_and_escaping_children() {
        let mut tree = WidgetTree::new();
        let root = window(&mut tree, 40.0);
        let parent = tree.insert_at(Panel::new(Color::GRAY), Area::new(0.0, 0.0, 10.0, 10.0));
        let clipped = tree.insert_at(Panel::new(Color::RED), Area::new(5.0, 5.0, 10.0, 10.0));
        let escaping = tree.insert_at(Panel::new(Color::BLUE), Area::new(20.0, 20.0, 5.0, 5.0));
        tree.add(root, parent);
        tree.add(parent, clipped);
        tree.add(parent, escaping);
        if let Some(node) = tree.get_mut(escaping) {
            node.set_stacking(Stacking::Escape);
        }

        let mut frame = RgbaImage::new(40, 40);
        Compositor::default()
            .composite(&mut tree, root, &mut frame, Area::new(0.0, 0.0, 40.0, 40.0), 1.0)
            .unwrap();

        assert_eq!(pixel(&frame, 7, 7), Color::RED);
        assert_eq!(pixel(&frame, 12, 12), Color::BLACK);
        assert_eq!(pixel(&frame, 22, 22), Color::BLUE);
    }

    #[test]
    fn test_only_dirty_area_is_touched() {
        let mut tree = WidgetTree::new();
        let root = window(&mut tree, 20.0);

        let mut frame = RgbaImage::from_pixel(20, 20, Color::WHITE.to_rgba());
        Compositor::default()
            .composite(&mut tree, root, &mut frame, Area::new(0.0, 0.0, 5.0, 5.0), 1.0)
            .unwrap();

        assert_eq!(pixel(&frame, 1, 1), Color::BLACK);
        assert_eq!(pixel(&frame, 10, 10), Color::WHITE);
    }

    #[test]
    fn test_hidden_subtree_not_drawn() {
        let mut tree = WidgetTree::new();
        let root = window(&mut tree, 20.0);
        let child = tree.insert_at(Panel::new(Color::RED), Area::new(0.0, 0.0, 10.0, 10.0));
        tree.add(root, child);
        if let Some(node) = tree.get_mut(child) {
            node.support_mut().visualizable.visible = false;
        }

        let mut frame = RgbaImage::new(20, 20);
        Compositor::default()
            .composite(&mut tree, root, &mut frame, Area::new(0.0, 0.0, 20.0, 20.0), 1.0)
            .unwrap();
        assert_eq!(pixel(&frame, 5, 5), Color::BLACK);
    }

    #[test]
    fn test_scaled_frame() {
        let mut tree = WidgetTree::with_scale(2.0);
        let root = window(&mut tree, 10.0);
        let child = tree.insert_at(Panel::new(Color::RED), Area::new(5.0, 5.0, 5.0, 5.0));
        tree.add(root, child);

        let mut frame = RgbaImage::new(20, 20);
        Compositor::default()
            .composite(&mut tree, root, &mut frame, Area::new(0.0, 0.0, 10.0, 10.0), 2.0)
            .unwrap();
        assert_eq!(pixel(&frame, 9, 9), Color::BLACK);
        assert_eq!(pixel(&frame, 10, 10), Color::RED);
        assert_eq!(tree.absolute_position(child), Some(Point::new(5.0, 5.0)));
    }
}
