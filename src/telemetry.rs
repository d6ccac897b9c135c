//! Per-session counters for a HUD or a post-run summary
//!
//! Folded from the state after each tick; never feeds back into the simulation.

use serde::{Deserialize, Serialize};

use crate::sim::{GameEvent, GameState, Placement, StalkerState};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub ticks: u64,
    /// Ticks the stalker spent frozen under the player's gaze
    pub frozen_ticks: u64,
    /// Current unbroken run of frozen ticks
    pub current_stare: u32,
    pub longest_stare: u32,
    pub relocations_far: u32,
    pub relocations_near: u32,
    pub relocations_failed: u32,
    /// Smallest player-stalker distance seen, in world units
    pub closest_approach: Option<f32>,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one completed tick
    pub fn record(&mut self, state: &GameState) {
        self.ticks += 1;

        if state.stalker.state == StalkerState::Frozen {
            self.frozen_ticks += 1;
            self.current_stare += 1;
            self.longest_stare = self.longest_stare.max(self.current_stare);
        } else {
            self.current_stare = 0;
        }

        for event in &state.events {
            match event {
                GameEvent::StalkerRelocated { placement, .. } => match placement {
                    Placement::Far => self.relocations_far += 1,
                    Placement::Near => self.relocations_near += 1,
                },
                GameEvent::RelocationFailed { .. } => self.relocations_failed += 1,
                GameEvent::StalkerFroze | GameEvent::StalkerResumed => {}
            }
        }

        // A hidden stalker is mid-jump, its position says nothing about pursuit
        if state.stalker.state != StalkerState::Hidden {
            let d = state.separation();
            self.closest_approach = Some(self.closest_approach.map_or(d, |c| c.min(d)));
        }
    }

    pub fn relocations(&self) -> u32 {
        self.relocations_far + self.relocations_near
    }

    /// Share of ticks spent frozen, in [0, 1]
    pub fn frozen_ratio(&self) -> f32 {
        if self.ticks == 0 {
            0.0
        } else {
            self.frozen_ticks as f32 / self.ticks as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FOV;
    use crate::sim::GridMap;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn state() -> GameState {
        let map = GridMap::parse("##########\n#P......S#\n##########", 64.0).unwrap();
        GameState::new(map, Tuning::default(), FOV, 3)
    }

    #[test]
    fn test_stare_runs() {
        let mut state = state();
        let mut t = Telemetry::new();
        state.stalker.state = StalkerState::Frozen;
        for _ in 0..5 {
            t.record(&state);
        }
        state.stalker.state = StalkerState::Stalking;
        t.record(&state);
        state.stalker.state = StalkerState::Frozen;
        for _ in 0..2 {
            t.record(&state);
        }
        assert_eq!(t.ticks, 8);
        assert_eq!(t.frozen_ticks, 7);
        assert_eq!(t.longest_stare, 5);
        assert_eq!(t.current_stare, 2);
        assert!((t.frozen_ratio() - 7.0 / 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_counts_relocations() {
        let mut state = state();
        let mut t = Telemetry::new();
        state.stalker.state = StalkerState::Hidden;
        state.events = vec![
            GameEvent::StalkerRelocated {
                placement: Placement::Far,
                from: Vec2::ZERO,
                to: Vec2::ONE,
            },
            GameEvent::RelocationFailed {
                placement: Placement::Near,
            },
        ];
        t.record(&state);
        assert_eq!(t.relocations_far, 1);
        assert_eq!(t.relocations_near, 0);
        assert_eq!(t.relocations_failed, 1);
        assert_eq!(t.relocations(), 1);
        // Hidden ticks don't count toward approach distance
        assert_eq!(t.closest_approach, None);
    }

    #[test]
    fn test_closest_approach_keeps_minimum() {
        let mut state = state();
        let mut t = Telemetry::new();
        t.record(&state);
        let first = t.closest_approach.unwrap();
        state.stalker.pose.pos.x -= 100.0;
        t.record(&state);
        state.stalker.pose.pos.x += 300.0;
        t.record(&state);
        assert!((t.closest_approach.unwrap() - (first - 100.0)).abs() < 1e-3);
    }

    #[test]
    fn test_serializes() {
        let t = Telemetry {
            ticks: 10,
            closest_approach: Some(42.0),
            ..Default::default()
        };
        let json = serde_json::to_string(&t).unwrap();
        let back: Telemetry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
