//! Game state and core simulation types
//!
//! One `GameState` lives for one session. Nothing here is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::map::GridMap;
use crate::tuning::Tuning;
use crate::{heading, wrap_angle};

/// Per-frame movement intent from the input collaborator
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    /// -1 back, 0 none, 1 forward
    pub forward: i8,
    /// -1 left, 0 none, 1 right
    pub strafe: i8,
    /// Accumulated pointer movement since the previous frame
    pub look_delta: Vec2,
}

/// Position and orientation of an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub pos: Vec2,
    /// Radians, kept in [0, 2π)
    pub facing: f32,
    /// Vertical view offset in pixels
    pub pitch: f32,
}

impl Pose {
    pub fn new(pos: Vec2, facing: f32) -> Self {
        Self {
            pos,
            facing: wrap_angle(facing),
            pitch: 0.0,
        }
    }

    /// Unit vector along `facing`
    #[inline]
    pub fn forward(&self) -> Vec2 {
        heading(self.facing)
    }

    /// Unit vector 90° clockwise on screen (y grows downward)
    #[inline]
    pub fn right(&self) -> Vec2 {
        let f = self.forward();
        Vec2::new(-f.y, f.x)
    }
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pose: Pose,
    /// Camera bob phase; advances while moving, 0 when idle. Cosmetic only.
    pub bob_phase: f32,
}

impl Player {
    pub fn new(pos: Vec2, facing: f32) -> Self {
        Self {
            pose: Pose::new(pos, facing),
            bob_phase: 0.0,
        }
    }
}

/// Stalker controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StalkerState {
    /// Unobserved, closing in on the player
    Stalking,
    /// Observed; holds position
    Frozen,
    /// A relocation was ordered this tick
    Hidden,
}

/// The only memory the stalker controller keeps between ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    /// Consecutive unobserved ticks since the last relocation
    pub teleport_timer: u32,
    /// Consecutive observed ticks
    pub visible_streak: u32,
}

/// The adversary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stalker {
    pub pose: Pose,
    pub state: StalkerState,
    /// World units per tick
    pub speed: f32,
    pub collision_radius: f32,
    pub counters: Counters,
}

impl Stalker {
    pub fn new(pos: Vec2, speed: f32, collision_radius: f32) -> Self {
        Self {
            pose: Pose::new(pos, 0.0),
            state: StalkerState::Stalking,
            speed,
            collision_radius,
            counters: Counters::default(),
        }
    }
}

/// How far from the player a relocation should land
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    /// Forced away after being stared at
    Far,
    /// Reappears close behind the player
    Near,
}

/// Things that happened during a tick, for telemetry and logging
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    StalkerFroze,
    StalkerResumed,
    StalkerRelocated {
        placement: Placement,
        from: Vec2,
        to: Vec2,
    },
    RelocationFailed {
        placement: Placement,
    },
}

/// RNG state wrapper for reproducible sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub map: GridMap,
    pub tuning: Tuning,
    /// Render field of view; the detection cone is derived from it
    pub fov: f32,
    pub player: Player,
    pub stalker: Stalker,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    pub rng_state: RngState,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a fresh session on `map`; the player starts facing east
    pub fn new(map: GridMap, tuning: Tuning, fov: f32, seed: u64) -> Self {
        let player = Player::new(map.player_start(), 0.0);
        let stalker = Stalker::new(
            map.stalker_spawn(),
            tuning.stalker.speed,
            tuning.stalker.collision_radius,
        );
        let rng_state = RngState::new(seed);
        let rng = rng_state.to_rng();

        Self {
            map,
            tuning,
            fov,
            player,
            stalker,
            time_ticks: 0,
            events: Vec::new(),
            rng_state,
            rng,
        }
    }

    /// Distance from the stalker to the player
    pub fn separation(&self) -> f32 {
        self.player.pose.pos.distance(self.stalker.pose.pos)
    }
}
