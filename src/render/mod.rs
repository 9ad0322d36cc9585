//! Card rasterization and export composition.
//!
//! [`compositor`] is the raster capture engine, [`logo`] pre-rasterizes
//! the vector logo it cannot handle, [`rasterizer`] coordinates the two
//! through a scoped substitution, and [`compose`] turns a captured
//! surface into the final export image.

pub mod compose;
pub mod compositor;
pub mod logo;
pub mod rasterizer;

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{ColorU8, Pixmap};

/// Converts an RGBA image into a premultiplied tiny-skia pixmap.
///
/// Returns `None` for zero-sized images.
pub(crate) fn pixmap_from_rgba(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;

    for (pixel, out) in image.pixels().zip(pixmap.pixels_mut()) {
        let [r, g, b, a] = pixel.0;
        *out = ColorU8::from_rgba(r, g, b, a).premultiply();
    }

    Some(pixmap)
}

/// Converts a premultiplied pixmap back into a straight-alpha RGBA image.
pub(crate) fn rgba_from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());

    for (pixel, out) in pixmap.pixels().iter().zip(image.pixels_mut()) {
        let color = pixel.demultiply();
        *out = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }

    image
}
