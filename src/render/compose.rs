//! Export composition: opaque backing fill and rounded-corner clipping.
//!
//! The captured surface may be drawn into the output clipped to a
//! rounded rectangle; the fill behind it is always opaque, so rounded
//! exports never carry transparency in their corners.

use image::RgbaImage;
use resvg::tiny_skia::{
    Color, FillRule, Mask, PathBuilder, Pixmap, PixmapPaint, Transform,
};

use crate::card::LayoutMetrics;
use crate::config::{CardConfig, ExportConfig};
use crate::error::{CardError, CardResult};

/// Produces the final export image from a captured surface.
///
/// The output has the source's dimensions. The corner radius is the
/// live on-screen radius from `metrics` (or the configured default when
/// the live value is unset), scaled by `output width / preview width` so
/// corners keep their proportion at export resolution.
pub fn compose(
    source: &RgbaImage,
    metrics: &LayoutMetrics,
    export: &ExportConfig,
    config: &CardConfig,
) -> CardResult<RgbaImage> {
    let width = source.width();
    let height = source.height();

    let mut output = Pixmap::new(width, height)
        .ok_or_else(|| CardError::encode("empty render surface"))?;
    output.fill(Color::from_rgba8(
        export.background.r,
        export.background.g,
        export.background.b,
        255,
    ));

    let source_pixmap = super::pixmap_from_rgba(source)
        .ok_or_else(|| CardError::encode("empty render surface"))?;

    let radius = effective_radius(width, metrics, export, config);
    let mask = if radius > 0.0 {
        rounded_rect_mask(width, height, radius)
    } else {
        None
    };

    output.draw_pixmap(
        0,
        0,
        source_pixmap.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        mask.as_ref(),
    );

    Ok(super::rgba_from_pixmap(&output))
}

/// The clip radius in output pixels; zero when rounding is off.
fn effective_radius(
    output_width: u32,
    metrics: &LayoutMetrics,
    export: &ExportConfig,
    config: &CardConfig,
) -> f32 {
    if !export.rounded {
        return 0.0;
    }

    let live = if metrics.corner_radius_px > 0.0 {
        metrics.corner_radius_px
    } else {
        config.default_radius_px
    };

    let scale_factor = if metrics.preview_width > 0 {
        output_width as f32 / metrics.preview_width as f32
    } else {
        1.0
    };

    live * scale_factor
}

/// A filled rounded-rectangle mask: straight edges joined by quadratic
/// corner curves.
fn rounded_rect_mask(width: u32, height: u32, radius: f32) -> Option<Mask> {
    let w = width as f32;
    let h = height as f32;
    let r = radius.min(w / 2.0).min(h / 2.0);

    let mut pb = PathBuilder::new();
    pb.move_to(r, 0.0);
    pb.line_to(w - r, 0.0);
    pb.quad_to(w, 0.0, w, r);
    pb.line_to(w, h - r);
    pb.quad_to(w, h, w - r, h);
    pb.line_to(r, h);
    pb.quad_to(0.0, h, 0.0, h - r);
    pb.line_to(0.0, r);
    pb.quad_to(0.0, 0.0, r, 0.0);
    pb.close();
    let path = pb.finish()?;

    let mut mask = Mask::new(width, height)?;
    mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
    Some(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn metrics_for(source_width: u32, radius: f32) -> LayoutMetrics {
        LayoutMetrics {
            preview_width: source_width,
            preview_height: source_width,
            corner_radius_px: radius,
        }
    }

    fn rounded_export() -> ExportConfig {
        ExportConfig {
            rounded: true,
            ..ExportConfig::default()
        }
    }

    #[test]
    fn rounded_corners_show_export_background() {
        let source = RgbaImage::from_pixel(200, 200, Rgba([255, 255, 255, 255]));
        let output = compose(
            &source,
            &metrics_for(200, 10.0),
            &rounded_export(),
            &CardConfig::default(),
        )
        .unwrap();

        for (x, y) in [(0, 0), (199, 0), (0, 199), (199, 199)] {
            assert_eq!(output.get_pixel(x, y).0, [0, 0, 0, 255], "corner ({x},{y})");
        }
        // Center keeps the source content.
        assert_eq!(output.get_pixel(100, 100).0, [255, 255, 255, 255]);
    }

    #[test]
    fn unrounded_output_equals_source_everywhere() {
        let source = RgbaImage::from_pixel(50, 40, Rgba([12, 34, 56, 255]));
        let output = compose(
            &source,
            &metrics_for(50, 20.0),
            &ExportConfig::default(),
            &CardConfig::default(),
        )
        .unwrap();

        assert_eq!(output.dimensions(), (50, 40));
        for (x, y) in [(0, 0), (49, 0), (0, 39), (49, 39), (25, 20)] {
            assert_eq!(output.get_pixel(x, y).0, [12, 34, 56, 255]);
        }
    }

    #[test]
    fn radius_scales_with_output_resolution() {
        // Preview 100 wide, output 200 wide: the 10px live radius clips
        // 20px-deep corners in output space.
        let source = RgbaImage::from_pixel(200, 200, Rgba([255, 255, 255, 255]));
        let metrics = LayoutMetrics {
            preview_width: 100,
            preview_height: 100,
            corner_radius_px: 10.0,
        };
        let output = compose(
            &source,
            &metrics,
            &rounded_export(),
            &CardConfig::default(),
        )
        .unwrap();

        assert_eq!(output.get_pixel(2, 2).0, [0, 0, 0, 255]);
        // Just inside the 20px corner arc the source shows through.
        assert_eq!(output.get_pixel(20, 20).0, [255, 255, 255, 255]);
    }

    #[test]
    fn zero_live_radius_falls_back_to_default() {
        let source = RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]));
        let output = compose(
            &source,
            &metrics_for(100, 0.0),
            &rounded_export(),
            &CardConfig::default(),
        )
        .unwrap();

        // Default 15px radius still clips the corners.
        assert_eq!(output.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn export_background_color_is_honored() {
        let source = RgbaImage::from_pixel(60, 60, Rgba([255, 255, 255, 255]));
        let export = ExportConfig {
            rounded: true,
            background: crate::color::Rgb::new(40, 10, 90),
            ..ExportConfig::default()
        };
        let output = compose(
            &source,
            &metrics_for(60, 12.0),
            &export,
            &CardConfig::default(),
        )
        .unwrap();
        assert_eq!(output.get_pixel(0, 0).0, [40, 10, 90, 255]);
    }
}
