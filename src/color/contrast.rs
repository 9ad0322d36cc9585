//! WCAG luminance and contrast enforcement against black foreground text.

use crate::color::Rgb;

/// Luminance above which lightening stops even if the ratio target was
/// not reached. Prevents chasing an unreachable ratio near white.
const LUMINANCE_CAP: f64 = 0.8;

/// Per-channel step added on each lightening pass.
const LIGHTEN_STEP: u8 = 15;

/// WCAG relative luminance, in [0, 1].
pub fn relative_luminance(color: Rgb) -> f64 {
    0.2126 * linearize(color.r) + 0.7152 * linearize(color.g) + 0.0722 * linearize(color.b)
}

fn linearize(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Contrast ratio of `color` against black text, `(L + 0.05) / 0.05`.
pub fn contrast_against_black(color: Rgb) -> f64 {
    (relative_luminance(color) + 0.05) / 0.05
}

/// Lightens `color` until it reaches `min_ratio` against black text.
///
/// Each pass adds a fixed step to every channel (clamped at 255), so
/// luminance is non-decreasing and the loop terminates within
/// `ceil(255 * 3 / step)` iterations. Lightening also stops once
/// luminance saturates near white, where the target may be unreachable.
/// Idempotent once the target ratio is met.
pub fn ensure_contrast(color: Rgb, min_ratio: f64) -> Rgb {
    let mut current = color;
    let mut luminance = relative_luminance(current);

    while (luminance + 0.05) / 0.05 < min_ratio && luminance < LUMINANCE_CAP {
        current = Rgb::new(
            current.r.saturating_add(LIGHTEN_STEP),
            current.g.saturating_add(LIGHTEN_STEP),
            current.b.saturating_add(LIGHTEN_STEP),
        );
        luminance = relative_luminance(current);
    }

    current
}
