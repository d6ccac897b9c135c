//! Stalker sprite projection and occlusion
//!
//! Occlusion is a single Z-buffer sample at the sprite's center column, not a
//! per-pixel mask: the sprite is either fully drawn or not drawn at all.

use glam::Vec2;

use super::raycast::{brightness, wall_height};
use super::{Rect, Rgba, SpriteAsset, Surface, shade};
use crate::normalize_angle;
use crate::settings::Settings;
use crate::sim::{GameState, Pose, StalkerState};

const SILHOUETTE_COLOR: Rgba = [0.05, 0.04, 0.04, 1.0];
const EYE_COLOR: Rgba = [1.0, 0.92, 0.85, 1.0];
/// Width/height ratio used when the asset is not ready
const PLACEHOLDER_ASPECT: f32 = 0.45;

/// What happened to the sprite this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteOutcome {
    /// No frame rendered yet
    NotRendered,
    /// The stalker is mid-relocation
    Hidden,
    /// Center falls outside the field of view
    OutOfView,
    /// A wall at `column` is nearer than the sprite
    Occluded { column: usize },
    Drawn {
        rect: Rect,
        column: usize,
        distance: f32,
        placeholder: bool,
    },
}

/// Where a world point lands on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub screen_x: f32,
    pub column: usize,
    /// View-plane distance, comparable with the Z-buffer
    pub distance: f32,
    pub height: f32,
}

/// Project `target` for `viewer`; `None` when its center is outside the FOV
pub fn project(viewer: &Pose, target: Vec2, settings: &Settings, tile_size: f32) -> Option<Projection> {
    let to_target = target - viewer.pos;
    let raw = to_target.length();
    let relative = normalize_angle(to_target.y.atan2(to_target.x) - viewer.facing);
    let half_fov = settings.fov / 2.0;
    if raw <= f32::EPSILON || relative.abs() > half_fov {
        return None;
    }

    let width = settings.screen_width as f32;
    let screen_x = (relative + half_fov) / settings.fov * width;
    let num_rays = settings.num_rays();
    let column = ((screen_x / width * num_rays as f32) as usize).min(num_rays - 1);
    let distance = raw * relative.cos();

    Some(Projection {
        screen_x,
        column,
        distance,
        height: wall_height(distance, tile_size, settings.projection_distance()),
    })
}

/// Project, occlusion-test and draw the stalker
pub fn draw_stalker(
    surface: &mut dyn Surface,
    state: &GameState,
    settings: &Settings,
    horizon: f32,
    z_buffer: &[f32],
    asset: &dyn SpriteAsset,
) -> SpriteOutcome {
    if state.stalker.state == StalkerState::Hidden {
        return SpriteOutcome::Hidden;
    }
    let tile = state.tuning.geometry.tile_size;
    let Some(p) = project(&state.player.pose, state.stalker.pose.pos, settings, tile) else {
        return SpriteOutcome::OutOfView;
    };

    let wall = z_buffer.get(p.column).copied().unwrap_or(f32::MAX);
    if p.distance >= wall {
        return SpriteOutcome::Occluded { column: p.column };
    }

    let ready = asset.ready() && asset.width() > 0 && asset.height() > 0;
    let aspect = if ready {
        asset.width() as f32 / asset.height() as f32
    } else {
        PLACEHOLDER_ASPECT
    };
    let rect = Rect::new(
        p.screen_x - p.height * aspect / 2.0,
        horizon - p.height / 2.0,
        p.height * aspect,
        p.height,
    );
    let light = brightness(p.distance);

    if ready {
        asset.draw(surface, rect, light);
    } else {
        draw_placeholder(surface, rect, light);
    }

    SpriteOutcome::Drawn {
        rect,
        column: p.column,
        distance: p.distance,
        placeholder: !ready,
    }
}

/// Dark silhouette with two bright eyes, both lit by the wall falloff
pub fn draw_placeholder(surface: &mut dyn Surface, rect: Rect, brightness: f32) {
    let head = rect.w * 0.6;
    let body_top = rect.y + head * 0.9;
    let body = shade(SILHOUETTE_COLOR, brightness);

    surface.fill_rect(
        Rect::new(rect.x, body_top, rect.w, rect.y + rect.h - body_top),
        body,
    );
    surface.fill_rect(
        Rect::new(rect.x + (rect.w - head) / 2.0, rect.y, head, head),
        body,
    );

    let eye = (head * 0.14).max(1.0);
    let eye_y = rect.y + head * 0.4;
    let cx = rect.x + rect.w / 2.0;
    let glow = shade(EYE_COLOR, brightness);
    surface.fill_rect(Rect::new(cx - head * 0.22 - eye / 2.0, eye_y, eye, eye), glow);
    surface.fill_rect(Rect::new(cx + head * 0.22 - eye / 2.0, eye_y, eye, eye), glow);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FOV, TILE_SIZE};
    use crate::renderer::raycast::draw_walls;
    use crate::renderer::{Framebuffer, PixelSprite};
    use crate::sim::GridMap;
    use crate::tuning::Tuning;

    const HORIZON: f32 = 200.0;

    fn state_for(map: &str) -> GameState {
        let map = GridMap::parse(map, TILE_SIZE).unwrap();
        GameState::new(map, Tuning::default(), FOV, 1)
    }

    fn frame(state: &GameState, asset: &dyn SpriteAsset) -> (SpriteOutcome, Framebuffer) {
        let settings = Settings::default();
        let mut surface = Framebuffer::new(settings.screen_width, settings.screen_height);
        let mut z = Vec::new();
        draw_walls(&mut surface, state, &settings, HORIZON, &mut z);
        let outcome = draw_stalker(&mut surface, state, &settings, HORIZON, &z, asset);
        (outcome, surface)
    }

    #[test]
    fn test_project_center() {
        let settings = Settings::default();
        let viewer = Pose::new(Vec2::ZERO, 0.0);
        let p = project(&viewer, Vec2::new(128.0, 0.0), &settings, TILE_SIZE).unwrap();
        assert!((p.screen_x - 320.0).abs() < 1e-3);
        assert_eq!(p.column, 160);
        assert!((p.distance - 128.0).abs() < 1e-4);
        assert!(project(&viewer, Vec2::new(-128.0, 0.0), &settings, TILE_SIZE).is_none());
    }

    #[test]
    fn test_visible_sprite_uses_placeholder_when_pending() {
        let state = state_for("##########\n#P.....S.#\n##########");
        let (outcome, surface) = frame(&state, &PixelSprite::pending(32, 64));
        let SpriteOutcome::Drawn {
            placeholder, rect, ..
        } = outcome
        else {
            panic!("expected sprite to be drawn, got {outcome:?}");
        };
        assert!(placeholder);
        // Body pixel is the dark silhouette, not the wall behind it
        let c = rect.center();
        let px = surface.pixel(c.x as u32, (rect.y + rect.h * 0.8) as u32).unwrap();
        assert!(px[0] < 30, "expected silhouette, got {px:?}");
    }

    #[test]
    fn test_ready_asset_is_drawn() {
        let state = state_for("##########\n#P.....S.#\n##########");
        let red = PixelSprite::from_rgba(2, 4, vec![[255, 0, 0, 255]; 8]).unwrap();
        let (outcome, surface) = frame(&state, &red);
        let SpriteOutcome::Drawn {
            placeholder, rect, ..
        } = outcome
        else {
            panic!("expected sprite to be drawn, got {outcome:?}");
        };
        assert!(!placeholder);
        let c = rect.center();
        let px = surface.pixel(c.x as u32, c.y as u32).unwrap();
        assert!(px[0] > px[1] && px[0] > px[2]);
    }

    #[test]
    fn test_sprite_behind_wall_is_occluded() {
        // Stalker straight ahead, but a wall cell sits between
        let state = state_for(
            "\
##########
#P..#..S.#
#........#
##########",
        );
        let (outcome, _) = frame(&state, &PixelSprite::pending(32, 64));
        assert!(matches!(outcome, SpriteOutcome::Occluded { column: 160 }));
    }

    #[test]
    fn test_placeholder_dims_with_distance() {
        let rect = Rect::new(0.0, 0.0, 20.0, 40.0);
        let eye_px = |brightness: f32| {
            let mut fb = Framebuffer::new(20, 40);
            draw_placeholder(&mut fb, rect, brightness);
            // Left eye: head is 12 wide, eyes sit 0.4 down it
            fb.pixel(7, 5).unwrap()[0]
        };
        assert!(eye_px(1.0) > 200);
        assert!(eye_px(0.1) < 40);
    }

    #[test]
    fn test_hidden_stalker_not_drawn() {
        let mut state = state_for("##########\n#P.....S.#\n##########");
        state.stalker.state = StalkerState::Hidden;
        let (outcome, _) = frame(&state, &PixelSprite::pending(32, 64));
        assert_eq!(outcome, SpriteOutcome::Hidden);
    }

    #[test]
    fn test_stalker_behind_player_out_of_view() {
        let mut state = state_for("##########\n#P.....S.#\n##########");
        state.player.pose.facing = std::f32::consts::PI;
        let (outcome, _) = frame(&state, &PixelSprite::pending(32, 64));
        assert_eq!(outcome, SpriteOutcome::OutOfView);
    }
}
