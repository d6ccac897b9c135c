//! Player movement integrator
//!
//! Collision is resolved one axis at a time so walking diagonally into a wall
//! slides along it instead of stopping dead.

use glam::Vec2;

use super::map::GridMap;
use super::state::{Intent, Player};
use crate::tuning::PlayerTuning;
use crate::wrap_angle;

/// Axis displacements below this are rounding noise from `cos`/`sin`
const MIN_AXIS_STEP: f32 = 1e-4;

/// Advance the player by one frame of `dt` seconds
pub fn integrate(
    player: &mut Player,
    intent: &Intent,
    map: &GridMap,
    tuning: &PlayerTuning,
    dt: f32,
) {
    let pose = &mut player.pose;

    // Direction from the pre-turn facing so look and move don't fight in one frame
    let wish = pose.forward() * f32::from(intent.forward.signum())
        + pose.right() * f32::from(intent.strafe.signum());
    let displacement = wish.normalize_or_zero() * tuning.speed * dt;

    let mut moved = false;
    if displacement.x.abs() > MIN_AXIS_STEP {
        let probe = Vec2::new(
            pose.pos.x + displacement.x + displacement.x.signum() * tuning.probe,
            pose.pos.y,
        );
        if map.is_open(probe) {
            pose.pos.x += displacement.x;
            moved = true;
        }
    }
    if displacement.y.abs() > MIN_AXIS_STEP {
        let probe = Vec2::new(
            pose.pos.x,
            pose.pos.y + displacement.y + displacement.y.signum() * tuning.probe,
        );
        if map.is_open(probe) {
            pose.pos.y += displacement.y;
            moved = true;
        }
    }

    pose.facing = wrap_angle(pose.facing + intent.look_delta.x * tuning.look_sensitivity);
    pose.pitch = (pose.pitch - intent.look_delta.y * tuning.pitch_sensitivity)
        .clamp(-tuning.max_pitch, tuning.max_pitch);

    if moved {
        player.bob_phase = wrap_angle(player.bob_phase + tuning.bob_rate * dt);
    } else {
        player.bob_phase = 0.0;
    }
}

/// Vertical camera offset for the current bob phase
#[inline]
pub fn bob_offset(player: &Player, tuning: &PlayerTuning) -> f32 {
    player.bob_phase.sin() * tuning.bob_amplitude
}
