//! Data-driven gameplay balance
//!
//! The stare limit, taunt timer and spawn distances are tuned values, so they
//! live here rather than being baked into the AI. Missing JSON fields fall
//! back to the defaults in `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Step sizes for the two grid queries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryTuning {
    pub tile_size: f32,
    /// Wall-casting march step
    pub ray_step: f32,
    pub ray_refine_passes: u32,
    /// Far plane; rays that travel this far report it as their distance
    pub max_ray_distance: f32,
    /// Line-of-sight sampling step (coarser than `ray_step`)
    pub los_step: f32,
}

impl Default for GeometryTuning {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            ray_step: RAY_STEP,
            ray_refine_passes: RAY_REFINE_PASSES,
            max_ray_distance: MAX_RAY_DISTANCE,
            los_step: LOS_STEP,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// World units per second
    pub speed: f32,
    pub probe: f32,
    pub look_sensitivity: f32,
    pub pitch_sensitivity: f32,
    pub max_pitch: f32,
    pub bob_rate: f32,
    pub bob_amplitude: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: PLAYER_SPEED,
            probe: PLAYER_PROBE,
            look_sensitivity: LOOK_SENSITIVITY,
            pitch_sensitivity: PITCH_SENSITIVITY,
            max_pitch: MAX_PITCH,
            bob_rate: BOB_RATE,
            bob_amplitude: BOB_AMPLITUDE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StalkerTuning {
    /// World units per tick
    pub speed: f32,
    pub collision_radius: f32,
    pub standoff: f32,
    pub detection_tightening: f32,
    pub stare_limit: u32,
    pub taunt_interval: u32,
    pub far_threshold: f32,
    pub far_spawn_distance: f32,
    pub near_spawn_distance: f32,
    pub relocation_jitter: f32,
    pub relocation_attempts: u32,
}

impl Default for StalkerTuning {
    fn default() -> Self {
        Self {
            speed: STALKER_SPEED,
            collision_radius: STALKER_RADIUS,
            standoff: STALKER_STANDOFF,
            detection_tightening: DETECTION_TIGHTENING,
            stare_limit: STARE_LIMIT,
            taunt_interval: TAUNT_INTERVAL,
            far_threshold: FAR_THRESHOLD,
            far_spawn_distance: FAR_SPAWN_DISTANCE,
            near_spawn_distance: NEAR_SPAWN_DISTANCE,
            relocation_jitter: RELOCATION_JITTER,
            relocation_attempts: RELOCATION_ATTEMPTS,
        }
    }
}

/// All gameplay tuning
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub geometry: GeometryTuning,
    pub player: PlayerTuning,
    pub stalker: StalkerTuning,
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject values that would break query termination or the AI contract
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.geometry;
        let s = &self.stalker;
        let fail = |msg: String| Err(ConfigError::InvalidTuning(msg));

        if g.tile_size <= 0.0 {
            return fail(format!("tile_size must be positive, got {}", g.tile_size));
        }
        if g.ray_step <= 0.0 || g.ray_step >= g.tile_size {
            return fail(format!(
                "ray_step must be in (0, tile_size), got {}",
                g.ray_step
            ));
        }
        if g.los_step <= 0.0 || g.los_step >= g.tile_size {
            return fail(format!(
                "los_step must be strictly smaller than one tile, got {}",
                g.los_step
            ));
        }
        // Sight checks sample coarser than the wall march
        if g.los_step <= g.ray_step {
            return fail(format!(
                "los_step ({}) must be coarser than ray_step ({})",
                g.los_step, g.ray_step
            ));
        }
        if g.max_ray_distance <= g.ray_step {
            return fail("max_ray_distance must exceed ray_step".to_string());
        }
        if self.player.speed < 0.0 || self.player.max_pitch < 0.0 {
            return fail("player speed and max_pitch must be non-negative".to_string());
        }
        if s.speed < 0.0 || s.collision_radius < 0.0 {
            return fail("stalker speed and radius must be non-negative".to_string());
        }
        if s.speed >= s.standoff {
            return fail(format!(
                "stalker speed ({}) must be below standoff ({}) or it can overshoot the player",
                s.speed, s.standoff
            ));
        }
        if !(0.0..=1.0).contains(&s.detection_tightening) {
            return fail(format!(
                "detection_tightening must be in [0, 1], got {}",
                s.detection_tightening
            ));
        }
        if s.far_threshold <= s.standoff {
            return fail("far_threshold must exceed standoff".to_string());
        }
        if s.relocation_jitter < 0.0 {
            return fail("relocation_jitter must be non-negative".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "stalker": { "stare_limit": 30 } }"#).unwrap();
        assert_eq!(tuning.stalker.stare_limit, 30);
        assert_eq!(tuning.stalker.taunt_interval, TAUNT_INTERVAL);
        assert_eq!(tuning.geometry.tile_size, TILE_SIZE);
    }

    #[test]
    fn test_los_step_must_be_below_tile() {
        let err = Tuning::from_json(r#"{ "geometry": { "los_step": 64.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTuning(_)));
    }

    #[test]
    fn test_los_step_must_be_coarser_than_ray_step() {
        let err = Tuning::from_json(r#"{ "geometry": { "ray_step": 8.0, "los_step": 4.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTuning(_)));
        let err = Tuning::from_json(r#"{ "geometry": { "ray_step": 8.0, "los_step": 8.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTuning(_)));
    }

    #[test]
    fn test_stalker_speed_below_standoff() {
        let err = Tuning::from_json(r#"{ "stalker": { "speed": 30.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTuning(_)));
        assert!(Tuning::from_json(r#"{ "stalker": { "speed": 3.0 } }"#).is_ok());
    }

    #[test]
    fn test_malformed_json() {
        let err = Tuning::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
