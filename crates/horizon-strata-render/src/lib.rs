//! Raster and compositing primitives for Horizon Strata.
//!
//! This crate provides the pixel side of the toolkit:
//!
//! - **Geometry**: [`Point`], [`Size`] and [`Area`] in logical units
//! - **Color**: non-premultiplied 8-bit [`Color`]
//! - **Rasters**: the widget-owned [`Raster`] with its scale factor and
//!   redraw flag
//! - **Layers**: [`LayerSurface`] for clip-aware blitting and back-to-front
//!   compositing
//! - **Damage**: [`DamageTracker`] for accumulating dirty areas
//!
//! # Compositing Example
//!
//! ```
//! use horizon_strata_render::{Area, Color, LayerSurface, Point, Raster, RgbaImage, Size};
//!
//! let mut raster = Raster::new(Size::new(4.0, 4.0), 1.0).unwrap();
//! raster.clear(Color::RED);
//!
//! let mut layer = LayerSurface::new(0, 8, 8, 1.0).unwrap();
//! layer.blit(&raster, Point::new(2.0, 2.0), Area::new(0.0, 0.0, 8.0, 8.0));
//!
//! let mut frame = RgbaImage::new(8, 8);
//! layer.composite_onto(&mut frame, Area::new(0.0, 0.0, 8.0, 8.0));
//! assert_eq!(Color::from(*frame.get_pixel(3, 3)), Color::RED);
//! ```

pub mod damage;
mod error;
pub mod layer;
pub mod raster;
mod types;

pub use damage::DamageTracker;
pub use error::{RenderError, RenderResult};
pub use layer::{blend_over, fill_frame_area, LayerSurface};
pub use raster::{Raster, MAX_RASTER_DIMENSION};
pub use types::{Area, Color, Point, Size};

// Re-export the pixel buffer type used for output frames.
pub use image::RgbaImage;
