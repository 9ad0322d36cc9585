//! RGB and HSL color values and the conversions between them.
//!
//! Conversions go through the `palette` crate; hue is renormalized from
//! degrees into [0, 1] so every HSL component shares one range.

use palette::{IntoColor, Srgb};
use serde::{Deserialize, Serialize};

use crate::error::CardError;

// ============================================================================
// Rgb
// ============================================================================

/// An 8-bit-per-channel RGB color.
///
/// Serializes as a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a `#RRGGBB` hex string. The leading `#` is required.
    pub fn from_hex(hex: &str) -> Result<Self, CardError> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| CardError::InvalidHexColor(hex.to_string()))?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(CardError::InvalidHexColor(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| CardError::InvalidHexColor(hex.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Formats as a lowercase `#rrggbb` string.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

impl std::str::FromStr for Rgb {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = CardError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

// ============================================================================
// Hsl
// ============================================================================

/// An HSL color with hue, saturation, and lightness all in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

/// Converts an RGB color to HSL.
///
/// Achromatic input (all channels equal) yields `h == s == 0`.
pub fn rgb_to_hsl(color: Rgb) -> Hsl {
    let srgb = Srgb::new(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
    );
    let hsl: palette::Hsl = srgb.into_color();

    Hsl {
        h: hsl.hue.into_positive_degrees() / 360.0,
        s: hsl.saturation,
        l: hsl.lightness,
    }
}

/// Converts an HSL color back to RGB, rounding each channel to the nearest
/// integer.
///
/// `hsl_to_rgb(rgb_to_hsl(c))` differs from `c` by at most 1 per channel.
pub fn hsl_to_rgb(color: Hsl) -> Rgb {
    let hsl = palette::Hsl::new(color.h * 360.0, color.s, color.l);
    let srgb: Srgb = hsl.into_color();

    Rgb::new(
        (srgb.red * 255.0).round().clamp(0.0, 255.0) as u8,
        (srgb.green * 255.0).round().clamp(0.0, 255.0) as u8,
        (srgb.blue * 255.0).round().clamp(0.0, 255.0) as u8,
    )
}

/// Raises a color's saturation by `boost_percent` percentage points,
/// clamped to full saturation. Hue and lightness are untouched.
pub fn boost_saturation(color: Rgb, boost_percent: f32) -> Rgb {
    let hsl = rgb_to_hsl(color);
    hsl_to_rgb(Hsl {
        s: (hsl.s + boost_percent / 100.0).min(1.0),
        ..hsl
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        let color = Rgb::from_hex("#1A2B3C").unwrap();
        assert_eq!(color, Rgb::new(26, 43, 60));
        assert_eq!(color.to_hex(), "#1a2b3c");

        assert!(Rgb::from_hex("1A2B3C").is_err());
        assert!(Rgb::from_hex("#1A2B").is_err());
        assert!(Rgb::from_hex("#1A2B3G").is_err());
        assert!(Rgb::from_hex("#ããããã").is_err());
    }

    #[test]
    fn hex_round_trip() {
        for color in [Rgb::new(0, 0, 0), Rgb::new(255, 255, 255), Rgb::new(216, 76, 61)] {
            assert_eq!(Rgb::from_hex(&color.to_hex()).unwrap(), color);
        }
    }

    #[test]
    fn achromatic_has_zero_hue_and_saturation() {
        for value in [0u8, 51, 128, 255] {
            let hsl = rgb_to_hsl(Rgb::new(value, value, value));
            assert_eq!(hsl.h, 0.0);
            assert_eq!(hsl.s, 0.0);
        }
    }

    #[test]
    fn conversion_round_trip_within_one() {
        let samples = [
            Rgb::new(255, 0, 0),
            Rgb::new(0, 255, 0),
            Rgb::new(0, 0, 255),
            Rgb::new(51, 102, 153),
            Rgb::new(216, 76, 61),
            Rgb::new(13, 250, 7),
            Rgb::new(1, 2, 3),
        ];
        for original in samples {
            let back = hsl_to_rgb(rgb_to_hsl(original));
            assert!(
                back.r.abs_diff(original.r) <= 1
                    && back.g.abs_diff(original.g) <= 1
                    && back.b.abs_diff(original.b) <= 1,
                "{original:?} round-tripped to {back:?}"
            );
        }
    }

    #[test]
    fn boost_raises_saturation_and_clamps() {
        let washed = Rgb::new(140, 128, 128);
        let boosted = boost_saturation(washed, 28.0);
        assert!(rgb_to_hsl(boosted).s > rgb_to_hsl(washed).s);

        let vivid = Rgb::new(255, 0, 0);
        let clamped = boost_saturation(vivid, 28.0);
        assert!(rgb_to_hsl(clamped).s <= 1.0);
    }

    #[test]
    fn boost_leaves_lightness_close() {
        let color = Rgb::new(120, 110, 100);
        let boosted = boost_saturation(color, 28.0);
        let before = rgb_to_hsl(color).l;
        let after = rgb_to_hsl(boosted).l;
        assert!((before - after).abs() < 0.02);
    }
}
