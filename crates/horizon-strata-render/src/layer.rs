//! Layer surfaces for compositing widget rasters.
//!
//! A [`LayerSurface`] is a transient RGBA buffer the size of the output. Widget
//! rasters are blitted onto it at their absolute positions, cut by a clip
//! area, and finished layers are blended back-to-front onto the output frame.
//!
//! Geometry passed to this module is logical. The surface scale converts it
//! to output pixels; each raster brings its own scale, so rasters of mixed
//! density are resampled (nearest neighbour) while blitting.

use image::{Rgba, RgbaImage};

use crate::error::RenderResult;
use crate::raster::{allocate, pixel_span, Raster};
use crate::types::{Area, Color, Point};

/// Blend `src` over `dst` (non-premultiplied source-over).
#[inline]
pub fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src.0[3];
    if sa == 0 {
        return;
    }
    if sa == 255 {
        *dst = src;
        return;
    }

    let sa = f32::from(sa) / 255.0;
    let da = f32::from(dst.0[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    for i in 0..3 {
        let sc = f32::from(src.0[i]);
        let dc = f32::from(dst.0[i]);
        let c = (sc * sa + dc * da * (1.0 - sa)) / out_a;
        dst.0[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Clear a logical area of an output frame to one color.
pub fn fill_frame_area(frame: &mut RgbaImage, area: Area, scale: f64, color: Color) {
    let (x0, x1) = pixel_span(area.left(), area.right(), scale, frame.width());
    let (y0, y1) = pixel_span(area.top(), area.bottom(), scale, frame.height());
    let pixel = color.to_rgba();
    for y in y0..y1 {
        for x in x0..x1 {
            frame.put_pixel(x, y, pixel);
        }
    }
}

/// A transient compositing surface for one Z-layer.
#[derive(Debug)]
pub struct LayerSurface {
    layer: i32,
    image: RgbaImage,
    scale: f64,
    blits: usize,
}

impl LayerSurface {
    /// Allocate a transparent surface of the given pixel size.
    pub fn new(layer: i32, width: u32, height: u32, scale: f64) -> RenderResult<Self> {
        Ok(Self {
            layer,
            image: allocate(width, height)?,
            scale,
            blits: 0,
        })
    }

    /// The layer identifier this surface collects.
    #[inline]
    pub fn layer(&self) -> i32 {
        self.layer
    }

    /// Number of rasters blitted so far.
    #[inline]
    pub fn blit_count(&self) -> usize {
        self.blits
    }

    /// The surface pixels.
    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Blit a raster whose top-left corner sits at `origin`, restricted to
    /// `clip`. Both are logical coordinates of the output.
    ///
    /// Returns `false` if nothing was drawn.
    pub fn blit(&mut self, raster: &Raster, origin: Point, clip: Area) -> bool {
        let Some(visible) = clip.intersect(&Area::from_origin_size(origin, raster.extends()))
        else {
            return false;
        };
        if raster.width() == 0 || raster.height() == 0 {
            return false;
        }

        let (x0, x1) = pixel_span(visible.left(), visible.right(), self.scale, self.image.width());
        let (y0, y1) = pixel_span(visible.top(), visible.bottom(), self.scale, self.image.height());
        let src_scale = raster.scale();
        let src = raster.image();
        let mut drawn = false;

        for y in y0..y1 {
            let ly = (f64::from(y) + 0.5) / self.scale;
            if !(ly >= visible.top() && ly < visible.bottom()) {
                continue;
            }
            let sy = ((ly - origin.y) * src_scale).floor();
            if sy < 0.0 || sy >= f64::from(src.height()) {
                continue;
            }
            for x in x0..x1 {
                let lx = (f64::from(x) + 0.5) / self.scale;
                if !(lx >= visible.left() && lx < visible.right()) {
                    continue;
                }
                let sx = ((lx - origin.x) * src_scale).floor();
                if sx < 0.0 || sx >= f64::from(src.width()) {
                    continue;
                }
                let pixel = *src.get_pixel(sx as u32, sy as u32);
                blend_over(self.image.get_pixel_mut(x, y), pixel);
                drawn = true;
            }
        }

        if drawn {
            self.blits += 1;
        }
        drawn
    }

    /// Blend this layer over `frame` inside the logical `dirty` area.
    pub fn composite_onto(&self, frame: &mut RgbaImage, dirty: Area) {
        let width = frame.width().min(self.image.width());
        let height = frame.height().min(self.image.height());
        let (x0, x1) = pixel_span(dirty.left(), dirty.right(), self.scale, width);
        let (y0, y1) = pixel_span(dirty.top(), dirty.bottom(), self.scale, height);
        for y in y0..y1 {
            for x in x0..x1 {
                let pixel = *self.image.get_pixel(x, y);
                blend_over(frame.get_pixel_mut(x, y), pixel);
            }
        }
    }
}
