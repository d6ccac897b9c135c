//! Grid queries: wall-casting rays and line-of-sight
//!
//! The two queries use different sampling. `cast_ray` runs once
//! per screen column, marches in fine steps and then bisects the last step so
//! wall edges land on the right pixel. `has_line_of_sight` runs once per tick
//! for the AI and samples at a coarser step that is still below one tile, so a
//! single-cell wall can never be skipped along an axis.

use glam::Vec2;

use super::map::GridMap;
use crate::heading;
use crate::tuning::GeometryTuning;

/// March from `origin` along `angle` until a wall; returns the distance traveled
///
/// Never fails. Rays that leave the grid hit the implicit boundary wall, and
/// the march is capped at `max_ray_distance` in case the grid is open.
pub fn cast_ray(map: &GridMap, origin: Vec2, angle: f32, geo: &GeometryTuning) -> f32 {
    let dir = heading(angle);
    let max_steps = (geo.max_ray_distance / geo.ray_step).ceil() as u32;

    let mut traveled = 0.0;
    for _ in 0..max_steps {
        let next = (traveled + geo.ray_step).min(geo.max_ray_distance);
        if map.is_wall(origin + dir * next) {
            return refine_hit(map, origin, dir, traveled, next, geo.ray_refine_passes);
        }
        traveled = next;
    }
    geo.max_ray_distance
}

/// Bisect between a free sample and a wall sample
fn refine_hit(
    map: &GridMap,
    origin: Vec2,
    dir: Vec2,
    mut free: f32,
    mut wall: f32,
    passes: u32,
) -> f32 {
    for _ in 0..passes {
        let mid = (free + wall) * 0.5;
        if map.is_wall(origin + dir * mid) {
            wall = mid;
        } else {
            free = mid;
        }
    }
    wall
}

/// Sample the segment `from -> to` every `step` units; false on the first wall
pub fn has_line_of_sight(map: &GridMap, from: Vec2, to: Vec2, step: f32) -> bool {
    let delta = to - from;
    let length = delta.length();
    if length <= f32::EPSILON {
        return true;
    }

    let samples = (length / step).ceil().max(1.0) as u32;
    (0..=samples).all(|i| {
        let t = i as f32 / samples as f32;
        map.is_open(from + delta * t)
    })
}
