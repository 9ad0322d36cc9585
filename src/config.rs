//! Tunable constants for color extraction and export.
//!
//! All knobs live in [`CardConfig`] so a host can load them from JSON the
//! same way it would ship any other settings blob:
//!
//! ```
//! use lyrics_card::CardConfig;
//!
//! let config = CardConfig::default();
//! let json = config.to_json().unwrap();
//! let restored = CardConfig::from_json(&json).unwrap();
//! assert_eq!(restored.sample_stride, config.sample_stride);
//! ```

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Configuration for the color and export pipelines.
///
/// The dominance and saturation thresholds are product constants carried
/// over unchanged; they are exposed here rather than hard-coded, but there
/// is no derivation behind the exact values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardConfig {
    /// Sample every Nth pixel when building the color histogram.
    /// Larger strides trade accuracy for speed.
    pub sample_stride: usize,

    /// Maximum pairwise channel difference for a color to count as gray.
    pub gray_threshold: u8,

    /// Minimum share of the dominant bucket's count a non-gray bucket
    /// needs to win the pick, in percent.
    pub non_gray_share_percent: u32,

    /// Saturation below this triggers a boost on the auto-picked color.
    pub min_saturation: f32,

    /// Percentage points of saturation added by the boost.
    pub saturation_boost_percent: f32,

    /// Minimum WCAG contrast ratio against black foreground text.
    pub min_contrast_ratio: f64,

    /// Color used when a hex string cannot be parsed.
    pub fallback_color: Rgb,

    /// Preview card width in pixels.
    pub preview_width: u32,

    /// Preview card height in pixels.
    pub preview_height: u32,

    /// Corner radius applied to the live card when rounding is on.
    pub rounded_radius_px: f32,

    /// Corner radius assumed when no live radius is known.
    pub default_radius_px: f32,

    /// Minimum supersampling multiplier for logo rasterization.
    pub supersample_floor: u32,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            sample_stride: 8,
            gray_threshold: 10,
            non_gray_share_percent: 15,
            min_saturation: 0.18,
            saturation_boost_percent: 28.0,
            min_contrast_ratio: 4.5,
            fallback_color: Rgb::new(0xd8, 0x4c, 0x3d),
            preview_width: 912,
            preview_height: 532,
            rounded_radius_px: 20.0,
            default_radius_px: 15.0,
            supersample_floor: 2,
        }
    }
}

impl CardConfig {
    /// Serializes to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Settings for one export. Supplied fresh per call, immutable during it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportConfig {
    /// Clip the output to a rounded rectangle.
    pub rounded: bool,

    /// Output resolution as a multiple of the preview resolution.
    pub scale: f32,

    /// Opaque fill behind the card, visible outside rounded corners.
    pub background: Rgb,

    /// JPEG quality in [0, 1].
    pub jpeg_quality: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            rounded: false,
            scale: 1.0,
            background: Rgb::new(0, 0, 0),
            jpeg_quality: 0.92,
        }
    }
}
