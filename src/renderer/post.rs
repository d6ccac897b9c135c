//! Cosmetic overlays drawn after the scene

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{Rect, Surface};
use crate::settings::Settings;

/// Opacity of the vignette at the screen corners
pub const VIGNETTE_STRENGTH: f32 = 0.75;
/// Fraction of the half-diagonal left untouched in the middle
const VIGNETTE_INNER: f32 = 0.35;
const GRAIN_MAX_ALPHA: f32 = 0.12;

/// Radial darkening toward the screen edges
pub fn vignette(surface: &mut dyn Surface, settings: &Settings) {
    let w = settings.screen_width as f32;
    let h = settings.screen_height as f32;
    let center = Vec2::new(w / 2.0, h / 2.0);
    let reach = center.length();

    surface.fill_radial_gradient(
        center,
        reach * VIGNETTE_INNER,
        reach,
        [0.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, VIGNETTE_STRENGTH],
    );
}

/// Scatter faint single-pixel dots; draws nothing when grain is off
pub fn grain(surface: &mut dyn Surface, settings: &Settings, rng: &mut Pcg32) {
    let dots = settings.grain_dots();
    if dots == 0 {
        return;
    }
    let w = settings.screen_width;
    let h = settings.screen_height;
    for _ in 0..dots {
        let x = rng.random_range(0..w) as f32;
        let y = rng.random_range(0..h) as f32;
        let v: f32 = rng.random_range(0.0..1.0);
        let alpha = rng.random_range(0.0..GRAIN_MAX_ALPHA);
        surface.fill_rect(Rect::new(x, y, 1.0, 1.0), [v, v, v, alpha]);
    }
}
