//! The background-color pipeline: extraction, contrast, resolution.
//!
//! Data flows in one direction: a cover bitmap is sampled into a coarse
//! histogram, a representative color is chosen with a bias against
//! grayscale, washed-out picks get a saturation boost, and the result is
//! lightened until black text stays legible on it. [`resolve_background`]
//! ties the stages together and owns the fallback chain.

pub mod contrast;
pub mod extract;
pub mod resolve;
pub mod space;

pub use contrast::{contrast_against_black, ensure_contrast, relative_luminance};
pub use extract::{choose_dominant_color, extract_histogram, is_grayish, ColorHistogram};
pub use resolve::{resolve_background, ResolvedColor};
pub use space::{boost_saturation, hsl_to_rgb, rgb_to_hsl, Hsl, Rgb};
