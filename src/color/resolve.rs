//! Background color resolution.
//!
//! Orchestrates extraction, saturation boost, and contrast enforcement
//! into the one guarantee the caller relies on: every call returns a
//! usable background color. Extraction problems degrade to the manual
//! color; an unparseable manual color degrades to the configured
//! fallback. Nothing propagates.

use image::RgbaImage;
use tracing::warn;

use crate::color::{
    boost_saturation, choose_dominant_color, ensure_contrast, extract_histogram, rgb_to_hsl, Rgb,
};
use crate::config::CardConfig;
use crate::error::{CardError, CardResult};

/// A resolved background color with its hex encoding.
///
/// The hex always reflects `rgb`, including any contrast adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColor {
    pub rgb: Rgb,
    pub hex: String,
}

impl ResolvedColor {
    fn from_rgb(rgb: Rgb) -> Self {
        Self {
            hex: rgb.to_hex(),
            rgb,
        }
    }
}

/// Resolves the card background from the cover image or the manual color.
///
/// With `auto_enabled` and a cover present, the dominant color is
/// extracted, boosted if washed out, and contrast-adjusted. Any failure
/// on that path falls through to the manual color; an invalid
/// `manual_hex` falls through to `config.fallback_color`.
pub fn resolve_background(
    cover: Option<&RgbaImage>,
    manual_hex: &str,
    auto_enabled: bool,
    config: &CardConfig,
) -> ResolvedColor {
    if auto_enabled {
        if let Some(image) = cover {
            match auto_color(image, config) {
                Ok(rgb) => return ResolvedColor::from_rgb(rgb),
                Err(err) => {
                    warn!(error = %err, "color extraction failed, using manual color");
                }
            }
        }
    }

    let manual = Rgb::from_hex(manual_hex).unwrap_or_else(|err| {
        warn!(error = %err, "falling back to default background");
        config.fallback_color
    });
    ResolvedColor::from_rgb(ensure_contrast(manual, config.min_contrast_ratio))
}

fn auto_color(image: &RgbaImage, config: &CardConfig) -> CardResult<Rgb> {
    let histogram = extract_histogram(image, config.sample_stride);
    let chosen = choose_dominant_color(
        &histogram,
        config.gray_threshold,
        config.non_gray_share_percent,
    )
    .ok_or(CardError::ExtractionEmpty)?;

    let chosen = if rgb_to_hsl(chosen).s < config.min_saturation {
        boost_saturation(chosen, config.saturation_boost_percent)
    } else {
        chosen
    };

    Ok(ensure_contrast(chosen, config.min_contrast_ratio))
}
