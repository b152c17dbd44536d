//! Widget-owned off-screen rasters.
//!
//! Every widget owns a [`Raster`]: an RGBA pixel buffer sized to the widget's
//! extends multiplied by the raster's scale factor, plus the flag telling the
//! compositor that the widget must redraw before its pixels are used again.
//!
//! # Example
//!
//! ```
//! use horizon_strata_render::{Color, Raster, Size};
//!
//! let mut raster = Raster::new(Size::new(10.5, 4.0), 2.0).unwrap();
//! assert_eq!((raster.width(), raster.height()), (21, 8));
//!
//! raster.clear(Color::RED);
//! raster.resize(Size::new(20.0, 4.0)).unwrap();
//! assert_eq!(raster.pixel(0, 0), Some(Color::RED));
//! assert_eq!(raster.pixel(39, 0), Some(Color::TRANSPARENT));
//! ```

use image::{imageops, RgbaImage};

use crate::error::{RenderError, RenderResult};
use crate::types::{Area, Color, Size};

/// Largest raster edge, in device pixels.
pub const MAX_RASTER_DIMENSION: u32 = 16_384;

/// An RGBA raster with its logical extends, scale factor and redraw flag.
#[derive(Clone, Debug)]
pub struct Raster {
    image: RgbaImage,
    extends: Size,
    scale: f64,
    draw_scheduled: bool,
}

impl Default for Raster {
    fn default() -> Self {
        Self::empty()
    }
}

impl Raster {
    /// Create a transparent raster for the given logical extends.
    ///
    /// New rasters start with a redraw scheduled.
    pub fn new(extends: Size, scale: f64) -> RenderResult<Self> {
        let (width, height) = Self::pixel_dimensions(extends, scale)?;
        Ok(Self {
            image: allocate(width, height)?,
            extends,
            scale,
            draw_scheduled: true,
        })
    }

    /// Create a zero-sized raster at scale 1.
    pub fn empty() -> Self {
        Self {
            image: RgbaImage::new(0, 0),
            extends: Size::ZERO,
            scale: 1.0,
            draw_scheduled: false,
        }
    }

    /// Device pixel dimensions for the given extends: `ceil(extends * scale)`.
    pub fn pixel_dimensions(extends: Size, scale: f64) -> RenderResult<(u32, u32)> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(RenderError::InvalidScale(scale));
        }
        let invalid = || RenderError::InvalidDimensions {
            width: extends.width,
            height: extends.height,
        };
        if !extends.width.is_finite()
            || !extends.height.is_finite()
            || extends.width < 0.0
            || extends.height < 0.0
        {
            return Err(invalid());
        }

        let width = (extends.width * scale).ceil();
        let height = (extends.height * scale).ceil();
        let limit = f64::from(MAX_RASTER_DIMENSION);
        if width > limit || height > limit {
            return Err(invalid());
        }
        Ok((width as u32, height as u32))
    }

    /// The logical extends of the raster.
    #[inline]
    pub fn extends(&self) -> Size {
        self.extends
    }

    /// The scale factor from logical units to device pixels.
    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Width in device pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in device pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The underlying pixel buffer.
    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Mutable access to the underlying pixel buffer.
    #[inline]
    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    /// Resize the raster to new logical extends.
    ///
    /// Existing pixels are kept by blitting the old buffer into the new one at
    /// the origin. On failure the old raster is left untouched.
    pub fn resize(&mut self, extends: Size) -> RenderResult<()> {
        if extends == self.extends {
            return Ok(());
        }
        let (width, height) = Self::pixel_dimensions(extends, self.scale)?;
        let mut image = allocate(width, height)?;
        imageops::replace(&mut image, &self.image, 0, 0);

        tracing::trace!(
            target: "horizon_strata_render::raster",
            old_width = self.image.width(),
            old_height = self.image.height(),
            width,
            height,
            "resized raster"
        );
        self.image = image;
        self.extends = extends;
        Ok(())
    }

    /// Change the scale factor.
    ///
    /// The pixel content is discarded and a redraw is scheduled.
    pub fn set_scale(&mut self, scale: f64) -> RenderResult<()> {
        if scale == self.scale {
            return Ok(());
        }
        let (width, height) = Self::pixel_dimensions(self.extends, scale)?;
        self.image = allocate(width, height)?;
        self.scale = scale;
        self.draw_scheduled = true;
        Ok(())
    }

    /// Mark the raster content as stale.
    #[inline]
    pub fn schedule_draw(&mut self) {
        self.draw_scheduled = true;
    }

    /// Whether a redraw has been scheduled.
    #[inline]
    pub fn is_draw_scheduled(&self) -> bool {
        self.draw_scheduled
    }

    /// Clear the redraw flag after the content has been refreshed.
    #[inline]
    pub fn clear_draw_schedule(&mut self) {
        self.draw_scheduled = false;
    }

    /// Fill the whole raster with one color.
    pub fn clear(&mut self, color: Color) {
        let pixel = color.to_rgba();
        for p in self.image.pixels_mut() {
            *p = pixel;
        }
    }

    /// Fill a logical area (raster-local coordinates) with one color.
    pub fn fill_area(&mut self, area: Area, color: Color) {
        let (x0, x1) = pixel_span(area.left(), area.right(), self.scale, self.width());
        let (y0, y1) = pixel_span(area.top(), area.bottom(), self.scale, self.height());
        let pixel = color.to_rgba();
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.put_pixel(x, y, pixel);
            }
        }
    }

    /// Read a device pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image.get_pixel_checked(x, y).map(|p| Color::from(*p))
    }

    /// Write a device pixel. Out-of-range writes are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(p) = self.image.get_pixel_mut_checked(x, y) {
            *p = color.to_rgba();
        }
    }
}

/// Convert a logical span to a clamped device pixel span `[start, end)`.
pub(crate) fn pixel_span(start: f64, end: f64, scale: f64, limit: u32) -> (u32, u32) {
    let limit = f64::from(limit);
    let first = (start * scale).floor().clamp(0.0, limit);
    let last = (end * scale).ceil().clamp(0.0, limit);
    if last <= first {
        (0, 0)
    } else {
        (first as u32, last as u32)
    }
}

/// Allocate a transparent pixel buffer, reporting allocation failure instead
/// of aborting.
pub(crate) fn allocate(width: u32, height: u32) -> RenderResult<RgbaImage> {
    let failed = || RenderError::AllocationFailed { width, height };
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(failed)?;

    let mut buffer: Vec<u8> = Vec::new();
    buffer.try_reserve_exact(len).map_err(|_| failed())?;
    buffer.resize(len, 0);
    RgbaImage::from_raw(width, height, buffer).ok_or_else(failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_round_up() {
        let raster = Raster::new(Size::new(10.2, 3.0), 1.5).unwrap();
        assert_eq!(raster.width(), 16);
        assert_eq!(raster.height(), 5);
        assert!(raster.is_draw_scheduled());
    }

    #[test]
    fn test_invalid_extends_rejected() {
        assert!(matches!(
            Raster::new(Size::new(-1.0, 3.0), 1.0),
            Err(RenderError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Raster::new(Size::new(1.0, 3.0), 0.0),
            Err(RenderError::InvalidScale(_))
        ));
        assert!(matches!(
            Raster::new(Size::new(100_000.0, 1.0), 1.0),
            Err(RenderError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_failed_resize_keeps_old_raster() {
        let mut raster = Raster::new(Size::new(4.0, 4.0), 1.0).unwrap();
        raster.clear(Color::BLUE);
        assert!(raster.resize(Size::new(f64::NAN, 4.0)).is_err());
        assert_eq!(raster.extends(), Size::new(4.0, 4.0));
        assert_eq!(raster.pixel(3, 3), Some(Color::BLUE));
    }

    #[test]
    fn test_resize_round_trip_keeps_pixels() {
        let mut raster = Raster::new(Size::new(4.0, 4.0), 1.0).unwrap();
        raster.put_pixel(0, 0, Color::RED);
        raster.put_pixel(3, 3, Color::GREEN);
        let before = raster.image().clone();

        raster.resize(Size::new(8.0, 6.0)).unwrap();
        assert_eq!(raster.pixel(3, 3), Some(Color::GREEN));
        assert_eq!(raster.pixel(7, 5), Some(Color::TRANSPARENT));

        raster.resize(Size::new(4.0, 4.0)).unwrap();
        assert_eq!(raster.image(), &before);
    }

    #[test]
    fn test_fill_area_scaled() {
        let mut raster = Raster::new(Size::new(4.0, 4.0), 2.0).unwrap();
        raster.fill_area(Area::new(1.0, 1.0, 1.0, 1.0), Color::RED);
        assert_eq!(raster.pixel(1, 1), Some(Color::TRANSPARENT));
        assert_eq!(raster.pixel(2, 2), Some(Color::RED));
        assert_eq!(raster.pixel(3, 3), Some(Color::RED));
        assert_eq!(raster.pixel(4, 4), Some(Color::TRANSPARENT));
    }
}
