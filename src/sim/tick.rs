//! Per-frame simulation tick
//!
//! Player first, then the stalker reacting to the updated player pose.

use super::player::integrate;
use super::stalker;
use super::state::{GameState, Intent};
use crate::consts::MAX_FRAME_DT;

/// Advance the game state by one frame of `dt_ms` milliseconds
///
/// Player movement scales with elapsed time (clamped so a stalled frame cannot
/// teleport the player through a wall). The stalker steps once per tick.
pub fn tick(state: &mut GameState, intent: &Intent, dt_ms: f32) {
    state.events.clear();
    state.time_ticks += 1;

    let dt = (dt_ms / 1000.0).clamp(0.0, MAX_FRAME_DT);
    integrate(
        &mut state.player,
        intent,
        &state.map,
        &state.tuning.player,
        dt,
    );

    stalker::update(state);
}
