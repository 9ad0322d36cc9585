//! The card scene model.
//!
//! A [`CardScene`] is the explicit, already-laid-out description of the
//! visual card: a background color, an optional cover image, positioned
//! text blocks, and an optional vector logo. Capture and export functions
//! take the scene (plus [`LayoutMetrics`]) as plain values — there is no
//! implicit live state to re-read mid-render.

use image::RgbaImage;

use crate::color::Rgb;
use crate::config::CardConfig;
use crate::error::{CardError, CardResult};

/// Default logo glyph: three audio bars, colored via `currentColor` so the
/// fill follows the card theme. Markup like this is exactly what the
/// capture engine cannot rasterize in place (see
/// [`render::compositor`](crate::render::compositor)).
pub const DEFAULT_LOGO_MARKUP: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 168 60" fill="currentColor"><rect x="8" y="18" width="10" height="24" rx="5"/><rect x="26" y="8" width="10" height="44" rx="5"/><rect x="44" y="14" width="10" height="32" rx="5"/><text x="66" y="40" font-size="26" font-family="sans-serif">Lyrics</text></svg>"##;

/// A rectangle in preview-space pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FramePx {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl FramePx {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// The on-screen geometry an export must reproduce.
///
/// Replaces the live style state the preview and the exporter used to
/// share implicitly; sizing and export functions take this value and
/// nothing else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub preview_width: u32,
    pub preview_height: u32,
    /// Corner radius currently applied to the on-screen card.
    pub corner_radius_px: f32,
}

impl LayoutMetrics {
    /// Metrics for a card in its default (non-rounded) state.
    pub fn from_config(config: &CardConfig) -> Self {
        Self {
            preview_width: config.preview_width,
            preview_height: config.preview_height,
            corner_radius_px: 0.0,
        }
    }

    /// Metrics with the rounding toggle applied to the live radius.
    pub fn with_rounding(config: &CardConfig, rounded: bool) -> Self {
        Self {
            corner_radius_px: if rounded { config.rounded_radius_px } else { 0.0 },
            ..Self::from_config(config)
        }
    }
}

/// Free-text card fields. Empty fields render placeholder text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardContent {
    pub title: String,
    pub artist: String,
    pub lyrics: String,
}

impl CardContent {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        lyrics: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            lyrics: lyrics.into(),
        }
    }

    pub(crate) fn title_or_default(&self) -> &str {
        non_empty_or(&self.title, "Song title")
    }

    pub(crate) fn artist_or_default(&self) -> &str {
        non_empty_or(&self.artist, "Artist")
    }

    pub(crate) fn lyrics_or_default(&self) -> &str {
        non_empty_or(&self.lyrics, "Song lyrics...")
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}

/// A positioned text block.
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub content: String,
    pub frame: FramePx,
    pub font_size: f32,
    pub line_height: f32,
    pub font_family: String,
    pub color: Rgb,
    pub bold: bool,
}

/// The cover image, pre-decoded, positioned in preview space.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverElement {
    pub image: RgbaImage,
    pub frame: FramePx,
}

/// The vector logo element: raw SVG markup relying on `currentColor`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoElement {
    pub markup: String,
    pub frame: FramePx,
    /// The color `currentColor` resolves to, inherited from the card text.
    pub color: Rgb,
    pub visible: bool,
}

/// A raster tile standing in for the logo during one capture.
#[derive(Debug, Clone)]
pub(crate) struct StandIn {
    pub image: RgbaImage,
    pub frame: FramePx,
}

/// The complete visual card, laid out in preview coordinates.
#[derive(Debug, Clone)]
pub struct CardScene {
    pub background: Rgb,
    pub cover: Option<CoverElement>,
    pub texts: Vec<TextElement>,
    pub logo: Option<LogoElement>,
    pub metrics: LayoutMetrics,

    /// Temporary raster substitute for the logo, scoped to one capture.
    pub(crate) stand_in: Option<StandIn>,
}

impl CardScene {
    /// An empty scene: just a background at the configured preview size.
    pub fn new(background: Rgb, metrics: LayoutMetrics) -> Self {
        Self {
            background,
            cover: None,
            texts: Vec::new(),
            logo: None,
            metrics,
            stand_in: None,
        }
    }

    /// Builds the standard card layout: cover top-left, title and artist
    /// beside it, lyrics below, logo bottom-left.
    pub fn standard(
        content: &CardContent,
        cover: Option<RgbaImage>,
        background: Rgb,
        show_logo: bool,
        rounded: bool,
        config: &CardConfig,
    ) -> Self {
        let metrics = LayoutMetrics::with_rounding(config, rounded);
        let mut scene = Self::new(background, metrics);

        let pad = 24.0;
        let cover_size = 96.0;
        let text_x = pad + cover_size + 16.0;
        let text_width = config.preview_width as f32 - text_x - pad;
        let logo_height = 60.0;

        if let Some(image) = cover {
            scene.cover = Some(CoverElement {
                image,
                frame: FramePx::new(pad, pad, cover_size, cover_size),
            });
        }

        scene.texts.push(TextElement {
            content: content.title_or_default().to_string(),
            frame: FramePx::new(text_x, pad + 8.0, text_width, 36.0),
            font_size: 28.0,
            line_height: 36.0,
            font_family: "sans-serif".to_string(),
            color: Rgb::BLACK,
            bold: true,
        });
        scene.texts.push(TextElement {
            content: content.artist_or_default().to_string(),
            frame: FramePx::new(text_x, pad + 52.0, text_width, 24.0),
            font_size: 18.0,
            line_height: 24.0,
            font_family: "sans-serif".to_string(),
            color: Rgb::BLACK,
            bold: false,
        });
        scene.texts.push(TextElement {
            content: content.lyrics_or_default().to_string(),
            frame: FramePx::new(
                pad,
                pad + cover_size + 24.0,
                config.preview_width as f32 - pad * 2.0,
                // Lyrics stop clear of the logo band when it is shown.
                (config.preview_height as f32
                    - (pad + cover_size + 24.0)
                    - pad
                    - if show_logo { logo_height + 8.0 } else { 0.0 })
                .max(0.0),
            ),
            font_size: 34.0,
            line_height: 44.0,
            font_family: "sans-serif".to_string(),
            color: Rgb::BLACK,
            bold: true,
        });

        scene.logo = Some(LogoElement {
            markup: DEFAULT_LOGO_MARKUP.to_string(),
            frame: FramePx::new(
                pad,
                config.preview_height as f32 - pad - logo_height,
                168.0,
                logo_height,
            ),
            color: Rgb::BLACK,
            visible: show_logo,
        });

        scene
    }
}

/// Decodes an uploaded cover image into an RGBA bitmap.
///
/// The format is sniffed from the bytes; any decoder failure surfaces as
/// [`CardError::ImageDecode`] for the resolver to recover from.
pub fn decode_cover(bytes: &[u8]) -> CardResult<RgbaImage> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| CardError::decode(e.to_string()))
}
