//! Procedural obstacle and orb spawning
//!
//! Difficulty scales two ways: gaps narrow as the score rises, and the spawn
//! interval shortens as scroll speed ramps up.

use rand::Rng;

use super::state::{DataOrb, GameState, Obstacle, ObstacleKind};
use crate::consts::*;

/// Milliseconds between spawns at the given scroll speed
pub fn spawn_interval_ms(speed: f32) -> f64 {
    (SPAWN_INTERVAL_BASE_MS - speed as f64 * SPAWN_INTERVAL_PER_SPEED_MS).max(SPAWN_INTERVAL_MIN_MS)
}

/// Gap height for the given score
pub fn gap_size(score: u64) -> f32 {
    (GAP_MAX - score as f32 * GAP_SHRINK_PER_POINT).max(GAP_MIN)
}

/// Obstacle type for the given score
pub fn obstacle_kind(score: u64, moving_gate_score: u64) -> ObstacleKind {
    if score > moving_gate_score {
        ObstacleKind::MovingGate
    } else {
        ObstacleKind::Gate
    }
}

/// True once enough time has passed since the last spawn
pub fn spawn_due(state: &GameState, now_ms: f64) -> bool {
    now_ms - state.last_spawn_ms > spawn_interval_ms(state.speed)
}

/// Spawn one obstacle just past the right edge, maybe with an orb in its gap
pub fn spawn_obstacle(state: &mut GameState, now_ms: f64) {
    let score = state.score();
    let ground = state.viewport.ground_y();
    let gap = gap_size(score);

    // Keep GAP_TOP_MARGIN above the gap and twice that below it. Tiny viewports
    // collapse the range to the top margin instead of going negative.
    let span = (ground - gap - GAP_TOP_MARGIN * 2.0).max(0.0);
    let roll: f32 = state.rng().random();
    let gap_top = GAP_TOP_MARGIN + roll * span;

    let kind = obstacle_kind(score, state.tuning.moving_gate_score);
    let x = state.viewport.width + SPAWN_MARGIN;
    state.obstacles.push(Obstacle::new(x, gap_top, gap, kind));

    let chance = state.tuning.orb_spawn_chance;
    let chance = if chance.is_nan() { 0.0 } else { chance.clamp(0.0, 1.0) };
    if state.rng().random_bool(chance) {
        state
            .orbs
            .push(DataOrb::new(x + ORB_X_OFFSET, gap_top + gap / 2.0));
    }

    log::debug!(
        "spawn {} at t={} gap_top={:.1} gap={:.1}",
        kind.as_str(),
        state.game_time,
        gap_top,
        gap
    );
    state.last_spawn_ms = now_ms;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use crate::tuning::Tuning;

    #[test]
    fn test_interval_shrinks_with_speed() {
        assert_eq!(spawn_interval_ms(9.0), 1300.0);
        assert!(spawn_interval_ms(12.0) < spawn_interval_ms(9.0));
        assert_eq!(spawn_interval_ms(22.0), SPAWN_INTERVAL_MIN_MS);
    }

    #[test]
    fn test_gap_floor() {
        assert_eq!(gap_size(0), GAP_MAX);
        assert_eq!(gap_size(10), 231.0);
        assert_eq!(gap_size(500), GAP_MIN);
    }

    #[test]
    fn test_moving_gates_after_threshold() {
        assert_eq!(obstacle_kind(20, MOVING_GATE_SCORE), ObstacleKind::Gate);
        assert_eq!(obstacle_kind(21, MOVING_GATE_SCORE), ObstacleKind::MovingGate);
    }

    #[test]
    fn test_spawn_places_gap_inside_play_area() {
        let vp = Viewport::new(800.0, 600.0);
        let mut state = GameState::new(42, vp, Tuning::default());
        for i in 0..200 {
            spawn_obstacle(&mut state, i as f64 * 1000.0);
        }
        for obs in &state.obstacles {
            assert_eq!(obs.x, 1000.0);
            assert!(obs.gap_top() >= GAP_TOP_MARGIN);
            assert!(obs.gap_bottom() <= vp.ground_y() - GAP_TOP_MARGIN + 0.01);
            assert_eq!(obs.kind, ObstacleKind::Gate);
        }
        assert_eq!(state.last_spawn_ms, 199_000.0);
    }

    #[test]
    fn test_orb_chance_extremes() {
        let vp = Viewport::default();
        let tuning = Tuning {
            orb_spawn_chance: 1.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(3, vp, tuning);
        spawn_obstacle(&mut state, 0.0);
        assert_eq!(state.orbs.len(), 1);
        let obs = &state.obstacles[0];
        assert_eq!(state.orbs[0].y, obs.gap_center());
        assert_eq!(state.orbs[0].x, obs.x + ORB_X_OFFSET);

        let tuning = Tuning {
            orb_spawn_chance: 0.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(3, vp, tuning);
        for _ in 0..20 {
            spawn_obstacle(&mut state, 0.0);
        }
        assert!(state.orbs.is_empty());
    }

    #[test]
    fn test_nan_orb_chance_spawns_no_orbs() {
        let mut state = GameState::new(3, Viewport::default(), Tuning::default());
        // Edited after construction, so it bypasses validation
        state.tuning.orb_spawn_chance = f64::NAN;
        for _ in 0..10 {
            spawn_obstacle(&mut state, 0.0);
        }
        assert_eq!(state.obstacles.len(), 10);
        assert!(state.orbs.is_empty());
    }

    #[test]
    fn test_nan_orb_chance_at_construction_uses_default() {
        let tuning = Tuning {
            orb_spawn_chance: f64::NAN,
            ..Tuning::default()
        };
        let mut state = GameState::new(3, Viewport::default(), tuning);
        assert_eq!(state.tuning.orb_spawn_chance, ORB_SPAWN_CHANCE);
        spawn_obstacle(&mut state, 0.0);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_tiny_viewport_does_not_invert_gap() {
        let vp = Viewport::new(300.0, 200.0);
        let mut state = GameState::new(9, vp, Tuning::default());
        spawn_obstacle(&mut state, 0.0);
        assert_eq!(state.obstacles[0].gap_top(), GAP_TOP_MARGIN);
    }
}
