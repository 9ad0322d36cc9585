//! Supersampled rasterization of the vector logo.
//!
//! The logo's markup colors itself with `currentColor`, which a
//! standalone SVG rasterizer resolves against nothing. Before rendering,
//! the inherited color is substituted with the concrete theme color, and
//! the tile is rendered at a multiple of its on-screen size against an
//! opaque card-colored background, so later downscaling leaves no jagged
//! or haloed edges.

use image::RgbaImage;
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::card::LogoElement;
use crate::color::Rgb;
use crate::error::{CardError, CardResult};

/// Renders the logo to an opaque RGBA tile at
/// `max(supersample_floor, round(device_pixel_ratio))` times its frame.
///
/// `background` is the card's current background; pass `None` when it is
/// indeterminate and the tile falls back to white.
pub fn rasterize_logo(
    logo: &LogoElement,
    background: Option<Rgb>,
    device_pixel_ratio: f32,
    supersample_floor: u32,
) -> CardResult<RgbaImage> {
    let multiplier = supersample_floor
        .max(device_pixel_ratio.round() as u32)
        .max(1);
    let width = ((logo.frame.width * multiplier as f32).round() as u32).max(1);
    let height = ((logo.frame.height * multiplier as f32).round() as u32).max(1);

    let markup = resolve_current_color(&logo.markup, logo.color);
    let mut options = Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = Tree::from_str(&markup, &options).map_err(|e| CardError::svg(e.to_string()))?;

    let mut pixmap =
        Pixmap::new(width, height).ok_or_else(|| CardError::svg("empty logo frame"))?;

    let fill = background.unwrap_or(Rgb::WHITE);
    pixmap.fill(Color::from_rgba8(fill.r, fill.g, fill.b, 255));

    // Stretch the tree to fill the tile, like the glyph fills its frame.
    let sx = width as f32 / tree.size().width();
    let sy = height as f32 / tree.size().height();
    resvg::render(&tree, Transform::from_scale(sx, sy), &mut pixmap.as_mut());

    Ok(super::rgba_from_pixmap(&pixmap))
}

/// Substitutes `currentColor` with a concrete hex color.
///
/// Plain text substitution is enough here: the markup is crate-provided
/// or host-provided glyph markup, not arbitrary documents.
fn resolve_current_color(markup: &str, color: Rgb) -> String {
    markup.replace("currentColor", &color.to_hex())
}
