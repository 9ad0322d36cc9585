//! Whole-card capture, with logo substitution when needed.
//!
//! The capture engine cannot rasterize the live vector logo (see
//! [`compositor`](crate::render::compositor)), so when the logo is
//! visible it is pre-rendered into a raster tile, swapped in at the
//! identical frame for the duration of one capture, and swapped back
//! out. The swap is held by a guard so the scene is restored on every
//! exit path, including capture failure.

use image::RgbaImage;

use crate::card::{CardScene, StandIn};
use crate::config::{CardConfig, ExportConfig};
use crate::error::CardResult;
use crate::render::{compositor, logo};

/// Captures the card at the export scale.
///
/// The returned bitmap is `preview dimensions × export.scale`. With the
/// logo hidden (or absent) this is a direct capture; with it visible the
/// capture runs against a raster stand-in.
pub fn capture_card(
    scene: &mut CardScene,
    export: &ExportConfig,
    device_pixel_ratio: f32,
    config: &CardConfig,
) -> CardResult<RgbaImage> {
    let visible_logo = scene.logo.as_ref().filter(|l| l.visible);

    let Some(element) = visible_logo else {
        return compositor::capture(scene, export.scale);
    };

    let tile = logo::rasterize_logo(
        element,
        Some(scene.background),
        device_pixel_ratio,
        config.supersample_floor,
    )?;

    let substitution = Substitution::begin(scene, tile);
    let captured = compositor::capture(substitution.scene(), export.scale);
    drop(substitution);

    captured
}

/// Scoped logo substitution: hides the vector element and installs a
/// raster stand-in with the same frame. Dropping it reverts both.
struct Substitution<'a> {
    scene: &'a mut CardScene,
}

impl<'a> Substitution<'a> {
    fn begin(scene: &'a mut CardScene, tile: RgbaImage) -> Self {
        let logo = scene.logo.as_mut().expect("substitution requires a logo");
        logo.visible = false;
        scene.stand_in = Some(StandIn {
            image: tile,
            frame: logo.frame,
        });
        Self { scene }
    }

    fn scene(&self) -> &CardScene {
        self.scene
    }
}

impl Drop for Substitution<'_> {
    fn drop(&mut self) {
        self.scene.stand_in = None;
        if let Some(logo) = self.scene.logo.as_mut() {
            logo.visible = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardContent, CardScene, FramePx, LogoElement, DEFAULT_LOGO_MARKUP};
    use crate::color::Rgb;

    fn scene_with_logo(visible: bool) -> CardScene {
        let config = CardConfig::default();
        let mut scene = CardScene::standard(
            &CardContent::default(),
            None,
            Rgb::new(30, 120, 80),
            visible,
            false,
            &config,
        );
        scene.texts.clear(); // keep capture independent of installed fonts
        scene
    }

    #[test]
    fn dimensions_match_preview_times_scale() {
        let mut scene = scene_with_logo(false);
        let export = ExportConfig {
            scale: 2.0,
            ..ExportConfig::default()
        };

        let bitmap = capture_card(&mut scene, &export, 1.0, &CardConfig::default()).unwrap();
        assert_eq!(bitmap.dimensions(), (912 * 2, 532 * 2));
    }

    #[test]
    fn substitution_is_reverted_after_capture() {
        let mut scene = scene_with_logo(true);
        let export = ExportConfig::default();

        let bitmap = capture_card(&mut scene, &export, 1.0, &CardConfig::default()).unwrap();
        assert_eq!(bitmap.dimensions(), (912, 532));

        assert!(scene.stand_in.is_none());
        assert!(scene.logo.as_ref().unwrap().visible);
    }

    #[test]
    fn substitution_is_reverted_on_failure() {
        let mut scene = scene_with_logo(true);
        // Poison the logo markup so rasterization fails before capture.
        scene.logo.as_mut().unwrap().markup = "<svg".to_string();

        let result = capture_card(
            &mut scene,
            &ExportConfig::default(),
            1.0,
            &CardConfig::default(),
        );
        assert!(result.is_err());
        assert!(scene.stand_in.is_none());
        assert!(scene.logo.as_ref().unwrap().visible);
    }

    #[test]
    fn guard_restores_scene_state_on_drop() {
        let mut scene = scene_with_logo(true);
        {
            let logo = scene.logo.as_ref().unwrap().clone();
            let tile = RgbaImage::new(4, 4);
            let substitution = Substitution::begin(&mut scene, tile);
            assert!(!substitution.scene().logo.as_ref().unwrap().visible);
            assert!(substitution.scene().stand_in.is_some());
            drop(substitution);
            assert_eq!(scene.logo.as_ref().unwrap().frame, logo.frame);
        }
        assert!(scene.logo.as_ref().unwrap().visible);
        assert!(scene.stand_in.is_none());
    }

    #[test]
    fn logo_lands_in_capture_via_stand_in() {
        let config = CardConfig::default();
        let mut scene = CardScene::new(
            Rgb::WHITE,
            crate::card::LayoutMetrics::from_config(&config),
        );
        scene.logo = Some(LogoElement {
            markup: DEFAULT_LOGO_MARKUP.to_string(),
            frame: FramePx::new(0.0, 0.0, 168.0, 60.0),
            color: Rgb::new(200, 0, 0),
            visible: true,
        });

        let bitmap =
            capture_card(&mut scene, &ExportConfig::default(), 1.0, &config).unwrap();
        // First bar center: reddish after substitution, white without it.
        let pixel = bitmap.get_pixel(13, 30);
        assert!(pixel.0[0] > 150 && pixel.0[1] < 120, "got {:?}", pixel.0);
    }
}
