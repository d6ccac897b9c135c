//! Software ray-casting renderer
//!
//! Draws through the `Surface` trait so the core never touches a window or a
//! canvas. Per frame:
//! 1. floor/ceiling gradients around the (pitched, bobbing) horizon
//! 2. one wall strip per ray column, filling the Z-buffer
//! 3. the stalker sprite, occluded against the Z-buffer
//! 4. cosmetic vignette and grain

pub mod framebuffer;
pub mod post;
pub mod raycast;
pub mod sprite;

pub use framebuffer::{Framebuffer, PixelSprite};
pub use sprite::SpriteOutcome;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::settings::Settings;
use crate::sim::{GameState, bob_offset};

/// Linear RGBA in [0, 1]; alpha doubles as the per-draw opacity
pub type Rgba = [f32; 4];

pub const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];
pub const WALL_COLOR: Rgba = [0.78, 0.74, 0.62, 1.0];
pub const CEILING_COLOR: Rgba = [0.16, 0.15, 0.13, 1.0];
pub const FLOOR_COLOR: Rgba = [0.22, 0.19, 0.15, 1.0];
/// Distance (world units) inside which walls are drawn at full brightness
pub const LIGHT_RADIUS: f32 = 2.5 * crate::consts::TILE_SIZE;

/// Scale the color channels, leaving alpha alone
#[inline]
pub fn shade(color: Rgba, brightness: f32) -> Rgba {
    [
        color[0] * brightness,
        color[1] * brightness,
        color[2] * brightness,
        color[3],
    ]
}

/// Axis-aligned screen rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// The frame being presented
pub trait Surface {
    /// Width and height in pixels
    fn size(&self) -> (u32, u32);
    fn clear(&mut self, color: Rgba);
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    /// Vertical gradient from `top` to `bottom` across `rect`
    fn fill_linear_gradient(&mut self, rect: Rect, top: Rgba, bottom: Rgba);
    /// Full-surface radial gradient; `inner` inside `inner_radius`, `outer` past `outer_radius`
    fn fill_radial_gradient(
        &mut self,
        center: Vec2,
        inner_radius: f32,
        outer_radius: f32,
        inner: Rgba,
        outer: Rgba,
    );
}

/// A sprite image that may still be loading
pub trait SpriteAsset {
    fn ready(&self) -> bool;
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn draw(&self, surface: &mut dyn Surface, rect: Rect, brightness: f32);
}

/// Frame renderer; owns the Z-buffer and the grain RNG
pub struct Renderer {
    settings: Settings,
    z_buffer: Vec<f32>,
    grain_rng: Pcg32,
    last_sprite: SpriteOutcome,
}

impl Renderer {
    pub fn new(settings: Settings) -> Self {
        let grain_rng = Pcg32::seed_from_u64(settings.grain_seed);
        Self {
            z_buffer: vec![f32::MAX; settings.num_rays()],
            settings,
            grain_rng,
            last_sprite: SpriteOutcome::NotRendered,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Corrected wall distance per column from the last frame
    pub fn z_buffer(&self) -> &[f32] {
        &self.z_buffer
    }

    /// What happened to the stalker sprite in the last frame
    pub fn last_sprite(&self) -> SpriteOutcome {
        self.last_sprite
    }

    /// Screen row of the horizon for the current player pose
    pub fn horizon(&self, state: &GameState) -> f32 {
        self.settings.screen_height as f32 / 2.0
            + state.player.pose.pitch
            + bob_offset(&state.player, &state.tuning.player)
    }

    /// Follow the surface's pixel size; the column count and projection derive from it
    fn fit_to(&mut self, width: u32, height: u32) {
        if (width, height) == (self.settings.screen_width, self.settings.screen_height) {
            return;
        }
        log::info!(
            "Surface is {}x{}, resizing from {}x{}",
            width,
            height,
            self.settings.screen_width,
            self.settings.screen_height
        );
        self.settings.screen_width = width;
        self.settings.screen_height = height;
    }

    /// Draw one complete frame
    ///
    /// Layout follows `surface.size()`; an empty surface draws nothing.
    pub fn render(&mut self, state: &GameState, surface: &mut dyn Surface, sprite: &dyn SpriteAsset) {
        let (width, height) = surface.size();
        if width == 0 || height == 0 {
            log::warn!("Skipping frame for an empty {width}x{height} surface");
            self.last_sprite = SpriteOutcome::NotRendered;
            return;
        }
        self.fit_to(width, height);
        let horizon = self.horizon(state);

        surface.clear(BLACK);
        raycast::draw_background(surface, &self.settings, horizon);
        raycast::draw_walls(surface, state, &self.settings, horizon, &mut self.z_buffer);
        self.last_sprite =
            sprite::draw_stalker(surface, state, &self.settings, horizon, &self.z_buffer, sprite);

        if self.settings.vignette {
            post::vignette(surface, &self.settings);
        }
        post::grain(surface, &self.settings, &mut self.grain_rng);
    }
}
