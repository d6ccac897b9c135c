//! Maze Stalker - a ray-cast maze with a "don't look at me" adversary
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, geometry queries, player, stalker AI)
//! - `renderer`: Per-column ray casting against a `Surface` boundary
//! - `tuning`: Data-driven gameplay constants
//! - `settings`: Display and quality preferences
//! - `game`: Session object tying simulation and rendering together

pub mod error;
pub mod game;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod telemetry;
pub mod tuning;

pub use error::ConfigError;
pub use game::Game;
pub use settings::{QualityPreset, Settings};
pub use telemetry::Telemetry;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use std::f32::consts::PI;

    /// Maximum frame delta fed to the integrator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// World units per grid cell
    pub const TILE_SIZE: f32 = 64.0;

    /// Render field of view (radians)
    pub const FOV: f32 = PI / 3.0;

    /// Default screen dimensions
    pub const SCREEN_WIDTH: u32 = 640;
    pub const SCREEN_HEIGHT: u32 = 400;

    /// Ray march step for wall casting (world units)
    pub const RAY_STEP: f32 = 1.0;
    /// Bisection passes that refine a ray hit between the last free and first wall sample
    pub const RAY_REFINE_PASSES: u32 = 8;
    /// Render far plane (world units)
    pub const MAX_RAY_DISTANCE: f32 = 24.0 * TILE_SIZE;
    /// Line-of-sight sampling step; must stay below one tile
    pub const LOS_STEP: f32 = TILE_SIZE / 4.0;

    /// Player movement speed (world units per second)
    pub const PLAYER_SPEED: f32 = 160.0;
    /// Distance the collision probe is pushed ahead of the player
    pub const PLAYER_PROBE: f32 = 12.0;
    /// Radians of yaw per unit of horizontal look delta
    pub const LOOK_SENSITIVITY: f32 = 0.003;
    /// Pixels of pitch per unit of vertical look delta
    pub const PITCH_SENSITIVITY: f32 = 1.0;
    /// Symmetric pitch clamp (pixels)
    pub const MAX_PITCH: f32 = 160.0;
    /// Bob phase advance (radians per second of movement)
    pub const BOB_RATE: f32 = 10.0;
    /// Bob amplitude (pixels)
    pub const BOB_AMPLITUDE: f32 = 4.0;

    /// Stalker pursuit speed (world units per tick)
    pub const STALKER_SPEED: f32 = 1.5;
    pub const STALKER_RADIUS: f32 = 10.0;
    /// Stalker stops advancing inside this radius
    pub const STALKER_STANDOFF: f32 = 24.0;
    /// Detection cone = render FOV * this factor
    pub const DETECTION_TIGHTENING: f32 = 0.7;
    /// Frames of continuous staring before a forced far relocation
    pub const STARE_LIMIT: u32 = 90;
    /// Unseen frames before a taunt relocation is considered
    pub const TAUNT_INTERVAL: u32 = 600;
    /// Taunt only fires while the stalker is farther than this
    pub const FAR_THRESHOLD: f32 = 6.0 * TILE_SIZE;
    /// Spawn distance for the forced-away placement
    pub const FAR_SPAWN_DISTANCE: f32 = 8.0 * TILE_SIZE;
    /// Spawn distance for the taunt placement
    pub const NEAR_SPAWN_DISTANCE: f32 = 3.0 * TILE_SIZE;
    /// Half-width of the uniform angle jitter around "behind the player"
    pub const RELOCATION_JITTER: f32 = 0.6;
    pub const RELOCATION_ATTEMPTS: u32 = 10;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to exactly TAU
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Unit vector for a heading
#[inline]
pub fn heading(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
