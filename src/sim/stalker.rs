//! Stalker AI
//!
//! Three pieces, kept apart so each can be tested on its own:
//! - the visibility predicate (detection cone + line of sight), a pure query
//! - `transition`, which maps `(seen, far, counters)` to the next state, the
//!   new counters and what the body should do this tick
//! - the body: direct pursuit with radial collision probes, and relocation
//!   through a bounded, lazily sampled candidate iterator

use glam::Vec2;
use rand::Rng;

use super::geometry::has_line_of_sight;
use super::map::GridMap;
use super::state::{Counters, GameEvent, GameState, Placement, Pose, Stalker, StalkerState};
use crate::tuning::{StalkerTuning, Tuning};
use crate::{heading, normalize_angle, wrap_angle};

/// True when `target` lies inside the viewer's detection cone
///
/// The cone is the render field of view narrowed by `tightening`. A target on
/// top of the viewer counts as inside.
pub fn in_detection_cone(viewer: &Pose, target: Vec2, fov: f32, tightening: f32) -> bool {
    let to_target = target - viewer.pos;
    if to_target.length_squared() <= f32::EPSILON {
        return true;
    }
    let offset = normalize_angle(to_target.y.atan2(to_target.x) - viewer.facing).abs();
    offset <= fov * 0.5 * tightening
}

/// Whether the player is currently looking at the stalker
///
/// The sight line is traced from the stalker toward the player.
pub fn is_seen(
    map: &GridMap,
    player: &Pose,
    stalker_pos: Vec2,
    fov: f32,
    tuning: &Tuning,
) -> bool {
    in_detection_cone(player, stalker_pos, fov, tuning.stalker.detection_tightening)
        && has_line_of_sight(map, stalker_pos, player.pos, tuning.geometry.los_step)
}

/// Outcome of one controller step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub state: StalkerState,
    pub counters: Counters,
    /// Advance toward the player this tick
    pub pursue: bool,
    /// Relocate after any pursuit
    pub relocate: Option<Placement>,
}

/// Pure state transition
///
/// `far` is whether the stalker is beyond the taunt distance threshold. The
/// returned state is the one visibility implies; `update` switches to
/// `Hidden` only once an ordered relocation actually lands.
pub fn transition(seen: bool, far: bool, counters: Counters, tuning: &StalkerTuning) -> Decision {
    if seen {
        let visible_streak = counters.visible_streak + 1;
        if visible_streak > tuning.stare_limit {
            return Decision {
                state: StalkerState::Frozen,
                counters: Counters::default(),
                pursue: false,
                relocate: Some(Placement::Far),
            };
        }
        return Decision {
            state: StalkerState::Frozen,
            counters: Counters {
                visible_streak,
                ..counters
            },
            pursue: false,
            relocate: None,
        };
    }

    let teleport_timer = counters.teleport_timer + 1;
    if teleport_timer > tuning.taunt_interval && far {
        return Decision {
            state: StalkerState::Stalking,
            counters: Counters::default(),
            pursue: true,
            relocate: Some(Placement::Near),
        };
    }
    Decision {
        state: StalkerState::Stalking,
        counters: Counters {
            teleport_timer,
            visible_streak: 0,
        },
        pursue: true,
        relocate: None,
    }
}

/// Candidate relocation points, sampled lazily around "behind the player"
pub struct RelocationCandidates<'a, R: Rng> {
    rng: &'a mut R,
    origin: Vec2,
    behind: f32,
    distance: f32,
    jitter: f32,
    remaining: u32,
}

impl<'a, R: Rng> RelocationCandidates<'a, R> {
    pub fn new(rng: &'a mut R, player: &Pose, distance: f32, jitter: f32, attempts: u32) -> Self {
        Self {
            rng,
            origin: player.pos,
            behind: player.facing + std::f32::consts::PI,
            distance,
            jitter,
            remaining: attempts,
        }
    }
}

impl<R: Rng> Iterator for RelocationCandidates<'_, R> {
    type Item = Vec2;

    fn next(&mut self) -> Option<Vec2> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let jitter = if self.jitter > 0.0 {
            self.rng.random_range(-self.jitter..=self.jitter)
        } else {
            0.0
        };
        Some(self.origin + heading(self.behind + jitter) * self.distance)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

/// A spot is usable when the body fits and the player cannot see it
pub fn is_hidden_spot(
    map: &GridMap,
    player_pos: Vec2,
    spot: Vec2,
    radius: f32,
    los_step: f32,
) -> bool {
    let offset = Vec2::splat(radius);
    map.is_open(spot)
        && map.is_open(spot + offset)
        && map.is_open(spot - offset)
        && !has_line_of_sight(map, player_pos, spot, los_step)
}

/// First accepted relocation point for `placement`, if any within the budget
pub fn find_relocation<R: Rng>(
    map: &GridMap,
    player: &Pose,
    placement: Placement,
    tuning: &Tuning,
    radius: f32,
    rng: &mut R,
) -> Option<Vec2> {
    let s = &tuning.stalker;
    let distance = match placement {
        Placement::Far => s.far_spawn_distance,
        Placement::Near => s.near_spawn_distance,
    };
    RelocationCandidates::new(rng, player, distance, s.relocation_jitter, s.relocation_attempts)
        .find(|&spot| is_hidden_spot(map, player.pos, spot, radius, tuning.geometry.los_step))
}

/// Step straight toward `target`, one axis at a time
///
/// Each axis commits only if all four radial probes around the new center are open.
pub fn pursue(stalker: &mut Stalker, target: Vec2, standoff: f32, map: &GridMap) {
    let to_target = target - stalker.pose.pos;
    let distance = to_target.length();
    if distance <= standoff {
        return;
    }

    let step = to_target / distance * stalker.speed;
    stalker.pose.facing = wrap_angle(to_target.y.atan2(to_target.x));

    let radius = stalker.collision_radius;
    let next_x = stalker.pose.pos + Vec2::new(step.x, 0.0);
    if body_fits(map, next_x, radius) {
        stalker.pose.pos = next_x;
    }
    let next_y = stalker.pose.pos + Vec2::new(0.0, step.y);
    if body_fits(map, next_y, radius) {
        stalker.pose.pos = next_y;
    }
}

fn body_fits(map: &GridMap, center: Vec2, radius: f32) -> bool {
    [
        Vec2::new(radius, 0.0),
        Vec2::new(-radius, 0.0),
        Vec2::new(0.0, radius),
        Vec2::new(0.0, -radius),
    ]
    .into_iter()
    .all(|offset| map.is_open(center + offset))
}

/// Run the controller for one tick against the current player pose
pub fn update(state: &mut GameState) {
    let player = state.player.pose;
    let tuning = &state.tuning;

    let seen = is_seen(&state.map, &player, state.stalker.pose.pos, state.fov, tuning);
    let far = state.separation() > tuning.stalker.far_threshold;
    let previous = state.stalker.state;
    let decision = transition(seen, far, state.stalker.counters, &tuning.stalker);

    state.stalker.state = decision.state;
    state.stalker.counters = decision.counters;

    if decision.pursue {
        pursue(
            &mut state.stalker,
            player.pos,
            tuning.stalker.standoff,
            &state.map,
        );
    }

    let mut relocation = None;
    if let Some(placement) = decision.relocate {
        let from = state.stalker.pose.pos;
        let radius = state.stalker.collision_radius;
        match find_relocation(&state.map, &player, placement, tuning, radius, &mut state.rng) {
            Some(to) => {
                state.stalker.pose.pos = to;
                let toward = player.pos - to;
                state.stalker.pose.facing = wrap_angle(toward.y.atan2(toward.x));
                state.stalker.state = StalkerState::Hidden;
                log::info!("Stalker relocated ({:?}) {:?} -> {:?}", placement, from, to);
                relocation = Some(GameEvent::StalkerRelocated { placement, from, to });
            }
            None => {
                // Stays put in whatever state visibility implies
                log::warn!("No hidden {:?} relocation found; stalker stays put", placement);
                relocation = Some(GameEvent::RelocationFailed { placement });
            }
        }
    }

    match (previous, state.stalker.state) {
        (StalkerState::Frozen, StalkerState::Frozen) => {}
        (_, StalkerState::Frozen) => {
            log::debug!("Stalker froze at {:?}", state.stalker.pose.pos);
            state.events.push(GameEvent::StalkerFroze);
        }
        (StalkerState::Frozen, _) => {
            log::debug!("Stalker resumed");
            state.events.push(GameEvent::StalkerResumed);
        }
        _ => {}
    }
    state.events.extend(relocation);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FOV;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::PI;

    const TILE: f32 = 64.0;

    fn corridor_state() -> GameState {
        let map = GridMap::parse(
            "\
##########
#P......S#
##########",
            TILE,
        )
        .unwrap();
        GameState::new(map, Tuning::default(), FOV, 1)
    }

    fn tile(col: f32, row: f32) -> Vec2 {
        Vec2::new(col * TILE, row * TILE)
    }

    #[test]
    fn test_cone_excludes_behind() {
        let viewer = Pose::new(Vec2::ZERO, 0.0);
        assert!(in_detection_cone(&viewer, Vec2::new(100.0, 0.0), FOV, 0.7));
        assert!(!in_detection_cone(&viewer, Vec2::new(-100.0, 0.0), FOV, 0.7));
        // Just inside the render FOV but outside the tightened cone
        let edge = heading(FOV * 0.45) * 100.0;
        assert!(in_detection_cone(&viewer, edge, FOV, 1.0));
        assert!(!in_detection_cone(&viewer, edge, FOV, 0.7));
    }

    #[test]
    fn test_cone_wraps_across_zero() {
        let viewer = Pose::new(Vec2::ZERO, 2.0 * PI - 0.05);
        assert!(in_detection_cone(&viewer, heading(0.05) * 50.0, FOV, 0.7));
    }

    #[test]
    fn test_cone_with_unwrapped_facing() {
        // A raw facing far outside [0, 2π) returns instead of spinning
        let viewer = Pose {
            pos: Vec2::ZERO,
            facing: 1e10,
            pitch: 0.0,
        };
        let seen: Vec<bool> = (0..8)
            .map(|i| in_detection_cone(&viewer, heading(i as f32) * 100.0, FOV, 0.7))
            .collect();
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_transition_seen_freezes_and_counts() {
        let tuning = StalkerTuning::default();
        let counters = Counters {
            teleport_timer: 40,
            visible_streak: 3,
        };
        let d = transition(true, true, counters, &tuning);
        assert_eq!(d.state, StalkerState::Frozen);
        assert_eq!(d.counters.visible_streak, 4);
        assert_eq!(d.counters.teleport_timer, 40);
        assert!(!d.pursue);
        assert_eq!(d.relocate, None);
    }

    #[test]
    fn test_transition_stare_forces_far_relocation() {
        let tuning = StalkerTuning::default();
        let counters = Counters {
            teleport_timer: 12,
            visible_streak: tuning.stare_limit,
        };
        let d = transition(true, false, counters, &tuning);
        assert_eq!(d.relocate, Some(Placement::Far));
        // Hidden only once the search succeeds
        assert_eq!(d.state, StalkerState::Frozen);
        assert_eq!(d.counters, Counters::default());
    }

    #[test]
    fn test_transition_unseen_stalks() {
        let tuning = StalkerTuning::default();
        let counters = Counters {
            teleport_timer: 5,
            visible_streak: 9,
        };
        let d = transition(false, true, counters, &tuning);
        assert_eq!(d.state, StalkerState::Stalking);
        assert_eq!(
            d.counters,
            Counters {
                teleport_timer: 6,
                visible_streak: 0
            }
        );
        assert!(d.pursue);
    }

    #[test]
    fn test_transition_taunt_needs_distance() {
        let tuning = StalkerTuning::default();
        let counters = Counters {
            teleport_timer: tuning.taunt_interval,
            visible_streak: 0,
        };
        let near = transition(false, false, counters, &tuning);
        assert_eq!(near.relocate, None);
        assert_eq!(near.counters.teleport_timer, tuning.taunt_interval + 1);

        let far = transition(false, true, counters, &tuning);
        assert_eq!(far.relocate, Some(Placement::Near));
        assert_eq!(far.counters.teleport_timer, 0);
    }

    #[test]
    fn test_candidates_are_bounded_and_behind() {
        let mut rng = Pcg32::seed_from_u64(3);
        let player = Pose::new(Vec2::new(500.0, 500.0), 0.0);
        let candidates: Vec<Vec2> =
            RelocationCandidates::new(&mut rng, &player, 100.0, 0.5, 10).collect();
        assert_eq!(candidates.len(), 10);
        for c in candidates {
            assert!((c.distance(player.pos) - 100.0).abs() < 1e-3);
            assert!(c.x < player.pos.x, "candidate {c:?} is not behind");
        }
    }

    #[test]
    fn test_candidates_stop_at_first_accept() {
        let mut rng = Pcg32::seed_from_u64(3);
        let player = Pose::new(Vec2::ZERO, 0.0);
        let mut candidates = RelocationCandidates::new(&mut rng, &player, 10.0, 0.5, 10);
        assert!(candidates.next().is_some());
        assert_eq!(candidates.size_hint(), (9, Some(9)));
    }

    #[test]
    fn test_frozen_when_watched() {
        let mut state = corridor_state();
        state.player.pose = Pose::new(tile(1.5, 1.5), 0.0);
        state.stalker.pose.pos = tile(4.5, 1.5);
        let before = state.stalker.pose.pos;

        update(&mut state);

        assert_eq!(state.stalker.state, StalkerState::Frozen);
        assert_eq!(state.stalker.pose.pos, before);
        assert_eq!(state.stalker.counters.visible_streak, 1);
        assert_eq!(state.events, vec![GameEvent::StalkerFroze]);
    }

    #[test]
    fn test_pursues_when_unwatched() {
        let mut state = corridor_state();
        // Player looks west, away from the stalker three tiles east
        state.player.pose = Pose::new(tile(1.5, 1.5), PI);
        state.stalker.pose.pos = tile(4.5, 1.5);
        let before = state.stalker.pose.pos;

        update(&mut state);

        assert_eq!(state.stalker.state, StalkerState::Stalking);
        let moved = state.stalker.pose.pos - before;
        assert!((moved.length() - state.stalker.speed).abs() < 1e-4);
        assert!(moved.x < 0.0, "should move toward the player");
        assert!(moved.y.abs() < 1e-4);
    }

    #[test]
    fn test_holds_at_standoff() {
        let mut state = corridor_state();
        state.player.pose = Pose::new(tile(1.5, 1.5), PI);
        state.stalker.pose.pos = tile(1.5, 1.5) + Vec2::new(state.tuning.stalker.standoff, 0.0);
        let before = state.stalker.pose.pos;
        update(&mut state);
        assert_eq!(state.stalker.pose.pos, before);
    }

    #[test]
    fn test_pursuit_blocked_by_wall() {
        let map = GridMap::parse(
            "\
#####
#P#S#
#...#
#####",
            TILE,
        )
        .unwrap();
        let mut stalker = Stalker::new(tile(3.5, 1.5), 1.5, 10.0);
        // Hugging the west side of its cell; moving west would put the probe in the wall
        stalker.pose.pos.x = 3.0 * TILE + 10.5;
        let before = stalker.pose.pos;
        pursue(&mut stalker, tile(1.5, 1.5), 24.0, &map);
        assert_eq!(stalker.pose.pos, before);
    }

    /// Corridor with the stalker tucked behind a long wall, far from the player
    fn taunt_state() -> GameState {
        let map = GridMap::parse(
            "\
################
#..#P..........#
#..###########.#
#..#........S..#
################",
            TILE,
        )
        .unwrap();
        let mut tuning = Tuning::default();
        tuning.stalker.relocation_jitter = 0.0;
        GameState::new(map, tuning, FOV, 11)
    }

    #[test]
    fn test_taunt_relocates_out_of_sight() {
        let mut state = taunt_state();
        state.stalker.counters.teleport_timer = state.tuning.stalker.taunt_interval;
        assert!(state.separation() > state.tuning.stalker.far_threshold);
        let before = state.stalker.pose.pos;

        update(&mut state);

        let after = state.stalker.pose.pos;
        assert!(after.distance(before) > TILE);
        assert!(!has_line_of_sight(
            &state.map,
            state.player.pose.pos,
            after,
            state.tuning.geometry.los_step
        ));
        assert_eq!(state.stalker.state, StalkerState::Hidden);
        assert_eq!(state.stalker.counters, Counters::default());
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::StalkerRelocated {
                placement: Placement::Near,
                ..
            })
        ));
    }

    #[test]
    fn test_failed_relocation_is_a_no_op() {
        // Nowhere behind the player is hidden in an open room
        let map = GridMap::parse(
            "\
##########
#........#
#...P....#
#.......S#
##########",
            TILE,
        )
        .unwrap();
        let mut state = GameState::new(map, Tuning::default(), FOV, 5);
        state.stalker.counters.visible_streak = state.tuning.stalker.stare_limit;
        // Look straight at the stalker
        let to_stalker = state.stalker.pose.pos - state.player.pose.pos;
        state.player.pose.facing = wrap_angle(to_stalker.y.atan2(to_stalker.x));
        let before = state.stalker.pose.pos;

        update(&mut state);

        assert_eq!(state.stalker.pose.pos, before);
        // Still in plain view, so still frozen rather than hidden
        assert_eq!(state.stalker.state, StalkerState::Frozen);
        assert_eq!(state.stalker.counters, Counters::default());
        assert_eq!(
            state.events.last(),
            Some(&GameEvent::RelocationFailed {
                placement: Placement::Far
            })
        );
    }

    proptest! {
        #[test]
        fn prop_relocation_is_never_visible(
            seed in any::<u64>(),
            col in 1usize..15,
            row in 1usize..14,
            facing in 0.0f32..std::f32::consts::TAU,
            far in any::<bool>(),
        ) {
            let map = GridMap::default_level(TILE).unwrap();
            let pos = map.cell_center(col, row);
            prop_assume!(map.is_open(pos));
            let tuning = Tuning::default();
            let player = Pose::new(pos, facing);
            let placement = if far { Placement::Far } else { Placement::Near };
            let mut rng = Pcg32::seed_from_u64(seed);

            if let Some(spot) = find_relocation(&map, &player, placement, &tuning, 10.0, &mut rng) {
                prop_assert!(map.is_open(spot));
                prop_assert!(!has_line_of_sight(&map, pos, spot, tuning.geometry.los_step));
            }
        }
    }
}
