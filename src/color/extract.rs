//! Dominant-color extraction from a cover bitmap.
//!
//! The extractor makes a single strided pass over the pixels, buckets each
//! channel coarsely, and picks a representative color with a bias against
//! grayscale. The bias is two-staged: a vivid bucket only beats the
//! overall winner when it carries a meaningful share of the count, so a
//! rare splash of color never outvotes an overwhelmingly gray image.

use std::collections::HashMap;

use image::RgbaImage;

use crate::color::Rgb;

/// Channel quantization step. Eight levels per channel, 512 buckets total.
const BUCKET_STEP: u8 = 32;

/// Occurrence counts keyed by quantized color.
///
/// Keys are always multiples of [`BUCKET_STEP`] in every channel; counts
/// are positive. Built once per extraction and discarded after selection.
pub type ColorHistogram = HashMap<[u8; 3], u32>;

/// Builds a histogram of quantized colors, sampling every `stride`th pixel.
pub fn extract_histogram(image: &RgbaImage, stride: usize) -> ColorHistogram {
    let stride = stride.max(1);
    let mut histogram = ColorHistogram::new();

    for pixel in image.pixels().step_by(stride) {
        let [r, g, b, _] = pixel.0;
        let key = [quantize(r), quantize(g), quantize(b)];
        *histogram.entry(key).or_insert(0) += 1;
    }

    histogram
}

fn quantize(channel: u8) -> u8 {
    (channel / BUCKET_STEP) * BUCKET_STEP
}

/// Returns true when all pairwise channel differences are within
/// `threshold`. Equal channels are trivially gray at any threshold.
pub fn is_grayish(r: u8, g: u8, b: u8, threshold: u8) -> bool {
    r.abs_diff(g) <= threshold && r.abs_diff(b) <= threshold && g.abs_diff(b) <= threshold
}

/// Picks the representative color from a histogram.
///
/// The overall winner is returned outright unless it is grayish; in that
/// case the most frequent non-gray bucket takes over, but only when its
/// count reaches `non_gray_share_percent` of the winner's. Returns `None`
/// only for an empty histogram.
pub fn choose_dominant_color(
    histogram: &ColorHistogram,
    gray_threshold: u8,
    non_gray_share_percent: u32,
) -> Option<Rgb> {
    let (&dominant_key, &dominant_count) =
        histogram.iter().max_by_key(|&(_, &count)| count)?;
    let dominant = Rgb::new(dominant_key[0], dominant_key[1], dominant_key[2]);

    if !is_grayish(dominant.r, dominant.g, dominant.b, gray_threshold) {
        return Some(dominant);
    }

    let non_gray = histogram
        .iter()
        .filter(|([r, g, b], _)| !is_grayish(*r, *g, *b, gray_threshold))
        .max_by_key(|&(_, &count)| count);

    if let Some((&key, &count)) = non_gray {
        // u64 to keep the share comparison exact for large counts
        if count as u64 * 100 >= dominant_count as u64 * non_gray_share_percent as u64 {
            return Some(Rgb::new(key[0], key[1], key[2]));
        }
    }

    Some(dominant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn histogram_of(entries: &[([u8; 3], u32)]) -> ColorHistogram {
        entries.iter().copied().collect()
    }

    #[test]
    fn histogram_keys_are_quantized() {
        let mut image = RgbaImage::new(4, 4);
        for (i, pixel) in image.pixels_mut().enumerate() {
            *pixel = Rgba([i as u8 * 17, 200, 33, 255]);
        }

        let histogram = extract_histogram(&image, 1);
        for key in histogram.keys() {
            assert!(key.iter().all(|c| c % BUCKET_STEP == 0), "key {key:?}");
        }
        let total: u32 = histogram.values().sum();
        assert_eq!(total, 16);
    }

    #[test]
    fn stride_reduces_sample_count() {
        let image = RgbaImage::from_pixel(8, 8, Rgba([64, 64, 64, 255]));
        let histogram = extract_histogram(&image, 8);
        assert_eq!(histogram[&[64, 64, 64]], 8);
    }

    #[test]
    fn empty_image_gives_empty_histogram() {
        let image = RgbaImage::new(0, 0);
        assert!(extract_histogram(&image, 8).is_empty());
    }

    #[test]
    fn equal_channels_are_always_gray() {
        for r in [0u8, 10, 100, 255] {
            assert!(is_grayish(r, r, r, 0));
            assert!(is_grayish(r, r, r, 10));
        }
        assert!(!is_grayish(255, 0, 0, 10));
        assert!(is_grayish(100, 105, 95, 10));
        assert!(!is_grayish(100, 111, 95, 10));
    }

    #[test]
    fn lone_gray_bucket_wins() {
        let histogram = histogram_of(&[([0, 0, 0], 100)]);
        assert_eq!(
            choose_dominant_color(&histogram, 10, 15),
            Some(Rgb::new(0, 0, 0))
        );
    }

    #[test]
    fn frequent_non_gray_beats_gray_dominant() {
        let histogram = histogram_of(&[([0, 0, 0], 100), ([224, 0, 0], 20)]);
        assert_eq!(
            choose_dominant_color(&histogram, 10, 15),
            Some(Rgb::new(224, 0, 0))
        );
    }

    #[test]
    fn rare_non_gray_loses_to_gray_dominant() {
        let histogram = histogram_of(&[([0, 0, 0], 100), ([224, 0, 0], 10)]);
        assert_eq!(
            choose_dominant_color(&histogram, 10, 15),
            Some(Rgb::new(0, 0, 0))
        );
    }

    #[test]
    fn non_gray_dominant_returned_directly() {
        let histogram = histogram_of(&[([224, 32, 0], 5), ([0, 0, 0], 4)]);
        assert_eq!(
            choose_dominant_color(&histogram, 10, 15),
            Some(Rgb::new(224, 32, 0))
        );
    }

    #[test]
    fn empty_histogram_yields_none() {
        assert_eq!(choose_dominant_color(&ColorHistogram::new(), 10, 15), None);
    }

    #[test]
    fn share_boundary_is_inclusive() {
        let histogram = histogram_of(&[([32, 32, 32], 100), ([224, 0, 0], 15)]);
        assert_eq!(
            choose_dominant_color(&histogram, 10, 15),
            Some(Rgb::new(224, 0, 0))
        );
    }
}
