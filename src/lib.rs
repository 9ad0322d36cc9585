//! lyrics-card: rendering core for shareable lyrics cards
//!
//! This crate turns a cover image, song text, and a handful of flags into
//! two things: a background color that keeps black text legible, and a
//! flattened PNG/JPEG export of the card. Form handling, file pickers,
//! and layout auto-fitting belong to the host; the crate deals in plain
//! values.
//!
//! # Color resolution
//!
//! ```
//! use lyrics_card::{resolve_background, CardConfig};
//!
//! let config = CardConfig::default();
//! let background = resolve_background(None, "#336699", true, &config);
//! // Always a usable color, contrast-adjusted for black text.
//! assert_eq!(background.hex, background.rgb.to_hex());
//! ```
//!
//! # Export
//!
//! ```
//! use lyrics_card::render::{compose, rasterizer};
//! use lyrics_card::{
//!     resolve_background, CardConfig, CardContent, CardScene, ExportConfig, ExportFormat,
//! };
//!
//! # fn main() -> Result<(), lyrics_card::CardError> {
//! let config = CardConfig {
//!     preview_width: 228,
//!     preview_height: 133,
//!     ..CardConfig::default()
//! };
//!
//! let background = resolve_background(None, "#336699", false, &config);
//! let content = CardContent::new("Holiday", "Green Day", "I hear the sound...");
//! let mut scene = CardScene::standard(&content, None, background.rgb, true, true, &config);
//!
//! let export = ExportConfig {
//!     rounded: true,
//!     scale: 2.0,
//!     ..ExportConfig::default()
//! };
//! let captured = rasterizer::capture_card(&mut scene, &export, 1.0, &config)?;
//! let finished = compose::compose(&captured, &scene.metrics, &export, &config)?;
//! let png = lyrics_card::export::encode(&finished, ExportFormat::Png, &export)?;
//! assert!(!png.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod card;
pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod render;

pub use card::{
    decode_cover, CardContent, CardScene, CoverElement, FramePx, LayoutMetrics, LogoElement,
    TextElement, DEFAULT_LOGO_MARKUP,
};
pub use color::{
    boost_saturation, choose_dominant_color, contrast_against_black, ensure_contrast,
    extract_histogram, hsl_to_rgb, is_grayish, relative_luminance, resolve_background, rgb_to_hsl,
    ColorHistogram, Hsl, ResolvedColor, Rgb,
};
pub use config::{CardConfig, ExportConfig};
pub use error::{CardError, CardResult};
pub use export::{copy_to_clipboard, encode, save_as_file, DeliverySink, ExportFormat, SinkError};
