//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - No rendering or platform dependencies
//! - Every query is total; out-of-grid positions read as walls

pub mod geometry;
pub mod map;
pub mod player;
pub mod stalker;
pub mod state;
pub mod tick;

pub use geometry::{cast_ray, has_line_of_sight};
pub use map::{Cell, GridMap, Occupancy};
pub use player::{bob_offset, integrate};
pub use stalker::{Decision, find_relocation, in_detection_cone, is_seen, transition};
pub use state::{
    Counters, GameEvent, GameState, Intent, Placement, Player, Pose, Stalker, StalkerState,
};
pub use tick::tick;
