//! Wall columns, floor/ceiling and the Z-buffer

use super::{CEILING_COLOR, FLOOR_COLOR, LIGHT_RADIUS, Rect, Rgba, Surface, WALL_COLOR, shade};
use crate::settings::Settings;
use crate::sim::{GameState, cast_ray};

/// Smallest depth used for projection, so a player pressed against a wall
/// doesn't divide by zero
const MIN_DEPTH: f32 = 0.1;

/// Ray angle for column `i` of `num_rays`
#[inline]
pub fn column_angle(facing: f32, fov: f32, i: usize, num_rays: usize) -> f32 {
    facing - fov / 2.0 + (i as f32 / num_rays as f32) * fov
}

/// Project a radial distance onto the view direction
#[inline]
pub fn fisheye_correct(raw: f32, facing: f32, ray_angle: f32) -> f32 {
    raw * (facing - ray_angle).cos()
}

/// On-screen wall height for a corrected distance
#[inline]
pub fn wall_height(distance: f32, tile_size: f32, projection: f32) -> f32 {
    tile_size / distance.max(MIN_DEPTH) * projection
}

/// Inverse-square falloff, clamped to full brightness
#[inline]
pub fn brightness(distance: f32) -> f32 {
    let d = distance.max(MIN_DEPTH);
    ((LIGHT_RADIUS * LIGHT_RADIUS) / (d * d)).min(1.0)
}

/// Ceiling fades to black toward the horizon, floor fades up from it
pub fn draw_background(surface: &mut dyn Surface, settings: &Settings, horizon: f32) {
    let w = settings.screen_width as f32;
    let h = settings.screen_height as f32;
    let fade: Rgba = [0.0, 0.0, 0.0, 1.0];

    if horizon > 0.0 {
        surface.fill_linear_gradient(Rect::new(0.0, 0.0, w, horizon), CEILING_COLOR, fade);
    }
    if horizon < h {
        surface.fill_linear_gradient(Rect::new(0.0, horizon, w, h - horizon), fade, FLOOR_COLOR);
    }
}

/// Cast every column, draw its strip and record its depth
pub fn draw_walls(
    surface: &mut dyn Surface,
    state: &GameState,
    settings: &Settings,
    horizon: f32,
    z_buffer: &mut Vec<f32>,
) {
    let num_rays = settings.num_rays();
    let strip = settings.screen_width as f32 / num_rays as f32;
    let projection = settings.projection_distance();
    let geo = &state.tuning.geometry;
    let pose = &state.player.pose;

    z_buffer.clear();
    z_buffer.reserve(num_rays);

    for i in 0..num_rays {
        let angle = column_angle(pose.facing, settings.fov, i, num_rays);
        let raw = cast_ray(&state.map, pose.pos, angle, geo);
        let distance = fisheye_correct(raw, pose.facing, angle);
        z_buffer.push(distance);

        let height = wall_height(distance, geo.tile_size, projection);
        let color = shade(WALL_COLOR, brightness(distance));
        surface.fill_rect(
            Rect::new(i as f32 * strip, horizon - height / 2.0, strip, height),
            color,
        );
    }
}
