//! The raster capture engine.
//!
//! [`capture`] flattens a [`CardScene`] into a single bitmap at a given
//! scale. It handles native pixel content: the background fill, the cover
//! image, text blocks (shaped through resvg with explicit styling), and
//! the raster stand-in installed during logo substitution.
//!
//! It does NOT handle live vector markup whose styling is inherited from
//! the surrounding scene (`currentColor` has nothing to resolve against
//! here). A visible [`LogoElement`](crate::card::LogoElement) is skipped
//! with a warning; callers that want the logo in the output go through
//! [`rasterizer::capture_card`](crate::render::rasterizer::capture_card),
//! which substitutes a pre-rendered tile first.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use tracing::warn;

use crate::card::{CardScene, FramePx, TextElement};
use crate::error::{CardError, CardResult};

/// Captures the scene into a bitmap of `preview dimensions × scale`.
pub fn capture(scene: &CardScene, scale: f32) -> CardResult<RgbaImage> {
    let width = scaled_dimension(scene.metrics.preview_width, scale);
    let height = scaled_dimension(scene.metrics.preview_height, scale);

    let mut surface = RgbaImage::from_pixel(
        width,
        height,
        Rgba([scene.background.r, scene.background.g, scene.background.b, 255]),
    );

    if let Some(cover) = &scene.cover {
        draw_resized(&mut surface, &cover.image, cover.frame, scale);
    }

    let mut options = Options::default();
    options.fontdb_mut().load_system_fonts();

    for text in &scene.texts {
        match render_text_tile(text, scale, &options)? {
            Some(tile) => {
                let (x, y) = scaled_origin(text.frame, scale);
                composite_over(&mut surface, &tile, x, y);
            }
            None => continue,
        }
    }

    if let Some(logo) = &scene.logo {
        if logo.visible && scene.stand_in.is_none() {
            warn!("vector logo cannot be captured in place and was skipped");
        }
    }

    if let Some(stand_in) = &scene.stand_in {
        draw_resized(&mut surface, &stand_in.image, stand_in.frame, scale);
    }

    Ok(surface)
}

fn scaled_dimension(value: u32, scale: f32) -> u32 {
    ((value as f32 * scale).round() as u32).max(1)
}

fn scaled_origin(frame: FramePx, scale: f32) -> (i32, i32) {
    (
        (frame.x * scale).round() as i32,
        (frame.y * scale).round() as i32,
    )
}

/// Resizes `image` to its frame at the capture scale and composites it.
fn draw_resized(surface: &mut RgbaImage, image: &RgbaImage, frame: FramePx, scale: f32) {
    let target_w = ((frame.width * scale).round() as u32).max(1);
    let target_h = ((frame.height * scale).round() as u32).max(1);
    if image.width() == 0 || image.height() == 0 {
        return;
    }

    let resized = if image.dimensions() == (target_w, target_h) {
        image.clone()
    } else {
        imageops::resize(image, target_w, target_h, FilterType::Triangle)
    };

    let (x, y) = scaled_origin(frame, scale);
    composite_over(surface, &resized, x, y);
}

/// Shapes one text block into an RGBA tile sized `frame × scale`.
///
/// The block is expressed as standalone SVG with explicit fill, family,
/// and weight, so nothing depends on inherited style. Lines are split on
/// `\n`; overflow past the frame is clipped by the tile bounds, which is
/// what the on-screen card does with its max-height.
fn render_text_tile(
    text: &TextElement,
    scale: f32,
    options: &Options,
) -> CardResult<Option<RgbaImage>> {
    if text.content.is_empty() || text.frame.width < 1.0 || text.frame.height < 1.0 {
        return Ok(None);
    }
    let tile_w = ((text.frame.width * scale).round() as u32).max(1);
    let tile_h = ((text.frame.height * scale).round() as u32).max(1);

    let markup = text_markup(text);
    let tree = Tree::from_str(&markup, options).map_err(|e| CardError::svg(e.to_string()))?;

    let Some(mut pixmap) = Pixmap::new(tile_w, tile_h) else {
        return Ok(None);
    };
    let sx = tile_w as f32 / tree.size().width();
    let sy = tile_h as f32 / tree.size().height();
    resvg::render(&tree, Transform::from_scale(sx, sy), &mut pixmap.as_mut());

    Ok(Some(super::rgba_from_pixmap(&pixmap)))
}

fn text_markup(text: &TextElement) -> String {
    let weight = if text.bold { 700 } else { 400 };
    let mut spans = String::new();
    for (i, line) in text.content.lines().enumerate() {
        let dy = if i == 0 { 0.0 } else { text.line_height };
        spans.push_str(&format!(
            r#"<tspan x="0" dy="{dy}">{}</tspan>"#,
            escape_xml(line)
        ));
    }

    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" "#,
            r#"viewBox="0 0 {w} {h}">"#,
            r#"<text x="0" y="{baseline}" font-family="{family}" "#,
            r#"font-size="{size}" font-weight="{weight}" fill="{fill}">{spans}</text>"#,
            r#"</svg>"#
        ),
        w = text.frame.width,
        h = text.frame.height,
        baseline = text.font_size,
        family = text.font_family,
        size = text.font_size,
        weight = weight,
        fill = text.color.to_hex(),
        spans = spans,
    )
}

fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Composites `src` over `dest` at the given position with source-over
/// alpha blending. Out-of-bounds source pixels are dropped.
pub(crate) fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let dest_width = dest.width() as i32;
    let dest_height = dest.height() as i32;

    for sy in 0..src.height() {
        for sx in 0..src.width() {
            let dx = x + sx as i32;
            let dy = y + sy as i32;
            if dx < 0 || dy < 0 || dx >= dest_width || dy >= dest_height {
                continue;
            }

            let blended = blend_over(*src.get_pixel(sx, sy), *dest.get_pixel(dx as u32, dy as u32));
            dest.put_pixel(dx as u32, dy as u32, blended);
        }
    }
}

fn blend_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |s: u8, d: u8| {
        let blended = (s as f32 / 255.0 * sa + d as f32 / 255.0 * da * (1.0 - sa)) / out_a;
        (blended * 255.0).round() as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}
