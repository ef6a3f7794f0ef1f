//! Per-frame simulation tick
//!
//! Core game loop that advances the world one discrete step. Given the same
//! seed and the same input timeline the resulting player path is identical.

use glam::Vec2;

use super::collision::{crossed_player, gate_contact, orb_pickup, out_of_bounds, within_perfect_band};
use super::spawn::{spawn_due, spawn_obstacle};
use super::state::{DeathCause, GameEvent, GamePhase, GameState, JumpRing, ObstacleKind, Tint};
use crate::consts::*;

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Frame timestamp in milliseconds (drives idle hover and spawn timing)
    pub now_ms: f64,
    /// One discrete player intent (flap or dash), applied before the tick
    pub trigger: bool,
}

impl TickInput {
    pub fn at(now_ms: f64) -> Self {
        Self {
            now_ms,
            trigger: false,
        }
    }

    pub fn trigger_at(now_ms: f64) -> Self {
        Self {
            now_ms,
            trigger: true,
        }
    }
}

/// Apply a player trigger: dash if the meter is full, otherwise flap
///
/// The first trigger of a run starts the clock. Ignored once the run is over.
pub fn trigger(state: &mut GameState, now_ms: f64) {
    if state.is_over() {
        return;
    }

    if !state.has_started() {
        state.phase = GamePhase::Playing;
        state.last_spawn_ms = now_ms;
        log::info!("Run started (seed {})", state.seed);
    }

    let y = state.player.y;
    if state.player.dash_ready() {
        state.player.is_dashing = true;
        state.player.dash_cooldown = state.tuning.dash_duration.max(1);
        state.player.sync_meter = 0.0;
        state.shake = 25.0;
        state.burst(Vec2::new(PLAYER_X, y), Tint::White, 20, 10.0);
        state.push_event(GameEvent::DashActivated);
        state.push_event(GameEvent::SyncChanged(0.0));
    } else {
        state.player.velocity = state.tuning.jump_force;
        state.rings.push(JumpRing {
            center: Vec2::new(PLAYER_X, y),
            radius: 4.0,
            alpha: 0.7,
        });
        let pitch = 1.4 - y / state.viewport.height.max(1.0);
        state.push_event(GameEvent::Flapped { pitch });
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.is_over() {
        return;
    }

    if input.trigger {
        trigger(state, input.now_ms);
    }

    if !state.has_started() {
        // Hover in place until the first input
        let hover = (input.now_ms * IDLE_FREQUENCY).sin() as f32 * IDLE_AMPLITUDE;
        state.player.y = state.viewport.height / 2.0 + hover;
        update_effects(state);
        return;
    }

    if !advance(state, input.now_ms) {
        return;
    }

    update_effects(state);
    state.debug_check();
}

/// Gameplay half of the tick. Returns false if the run ended.
fn advance(state: &mut GameState, now_ms: f64) -> bool {
    let prev_score = state.score();
    state.game_time += 1;
    let score = state.score();
    if score != prev_score {
        state.push_event(GameEvent::ScoreChanged(score));
    }

    let max_speed = state.tuning.max_speed;
    if state.speed < max_speed {
        state.speed = (state.speed + state.tuning.speed_increment).min(max_speed);
    }
    if state.shake > 0.0 {
        state.shake *= SHAKE_DECAY;
    }
    if state.impact > 0.0 {
        state.impact *= IMPACT_DECAY;
    }

    let y = state.player.y;
    state.player.path.push(y);

    if state.player.dash_cooldown > 0 {
        state.player.dash_cooldown -= 1;
        if state.player.dash_cooldown == 0 {
            state.player.is_dashing = false;
            state.push_event(GameEvent::DashEnded);
        }
        state.burst(Vec2::new(PLAYER_X, y), Tint::Sync, 1, 0.5);
    }

    if !state.player.is_dashing {
        let player = &mut state.player;
        player.velocity = (player.velocity + state.tuning.gravity).min(state.tuning.terminal_velocity);
        player.y += player.velocity;
    }

    let py = state.player.y;
    let radius = state.player.radius;

    if out_of_bounds(&state.viewport, py, radius) && !state.player.is_dashing {
        end_run(state, DeathCause::Boundary);
        return false;
    }

    if spawn_due(state, now_ms) {
        spawn_obstacle(state, now_ms);
    }

    let speed = state.speed;
    let sway = (state.game_time as f32 * MOVING_GATE_FREQUENCY).sin() * MOVING_GATE_AMPLITUDE;

    // Walk backwards so removals never skip an element
    let mut i = state.obstacles.len();
    while i > 0 {
        i -= 1;
        let obs = &mut state.obstacles[i];
        obs.x -= speed;
        if obs.kind == ObstacleKind::MovingGate {
            obs.offset = sway;
        }

        if gate_contact(obs, py, radius).hit() {
            if state.player.is_dashing {
                let center_x = obs.x + obs.width / 2.0;
                state.obstacles.remove(i);
                state.impact = 1.0;
                state.shake = 35.0;
                state.burst(Vec2::new(center_x, py), Tint::Obstacle, 60, 18.0);
                state.push_event(GameEvent::GateShattered);
                continue;
            }
            let kind = obs.kind;
            end_run(state, DeathCause::Obstacle(kind));
            return false;
        }

        let perfect = !obs.sync_awarded && crossed_player(obs, speed) && within_perfect_band(obs, py);
        if perfect {
            obs.sync_awarded = true;
        }
        let expired = obs.x + obs.width < OBSTACLE_DESPAWN_X;

        if perfect {
            state.player.charge(state.tuning.perfect_pass_bonus);
            state.burst(Vec2::new(PLAYER_X, py), Tint::Bonus, 10, 8.0);
            state.push_event(GameEvent::PerfectPass);
            state.push_event(GameEvent::SyncChanged(state.player.sync_meter));
        }
        if expired {
            state.obstacles.remove(i);
        }
    }

    let mut i = state.orbs.len();
    while i > 0 {
        i -= 1;
        let orb = &mut state.orbs[i];
        orb.x -= speed;
        if orb_pickup(orb, py, radius) {
            orb.collected = true;
            let at = Vec2::new(orb.x, orb.y);
            state.orbs.remove(i);
            state.player.charge(state.tuning.sync_gain);
            state.burst(at, Tint::Sync, 20, 5.0);
            state.push_event(GameEvent::OrbCollected);
            state.push_event(GameEvent::SyncChanged(state.player.sync_meter));
        } else if orb.x < ORB_DESPAWN_X {
            state.orbs.remove(i);
        }
    }

    let drift = speed * STAR_PARALLAX;
    let wrap_x = state.viewport.width + 20.0;
    for star in &mut state.stars {
        star.pos.x -= drift;
        if star.pos.x < -20.0 {
            star.pos.x = wrap_x;
        }
    }

    true
}

/// Finish the run and announce the final score
fn end_run(state: &mut GameState, cause: DeathCause) {
    let score = state.score();
    let y = state.player.y;
    state.phase = GamePhase::GameOver;
    state.shake = 50.0;
    state.burst(Vec2::new(PLAYER_X, y), Tint::Player, 80, 12.0);
    log::info!(
        "Run ended: score {} cause {} after {} ticks",
        score,
        cause.as_str(),
        state.game_time
    );
    state.push_event(GameEvent::RunEnded { score, y, cause });
}

/// Decay cosmetic particles and flap rings
fn update_effects(state: &mut GameState) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.life -= particle.decay;
    }
    state.particles.retain(|p| p.life > 0.0);

    for ring in state.rings.iter_mut() {
        ring.radius += 8.0;
        ring.alpha -= 0.1;
    }
    state.rings.retain(|r| r.alpha > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{DataOrb, Obstacle, Viewport};
    use crate::tuning::Tuning;

    /// A running game with the player resting at y=300 in an 800x600 view.
    /// Timestamps stay at 0 so nothing spawns on its own.
    fn running() -> GameState {
        let mut state = GameState::new(12345, Viewport::new(800.0, 600.0), Tuning::default());
        trigger(&mut state, 0.0);
        state.player.velocity = 0.0;
        state.player.y = 300.0;
        state.drain_events();
        state
    }

    fn run_ended(events: &[GameEvent]) -> Option<(u64, DeathCause)> {
        events.iter().find_map(|e| match e {
            GameEvent::RunEnded { score, cause, .. } => Some((*score, *cause)),
            _ => None,
        })
    }

    #[test]
    fn test_idle_until_trigger() {
        let mut state = GameState::new(1, Viewport::new(800.0, 600.0), Tuning::default());
        for frame in 0..2000 {
            tick(&mut state, &TickInput::at(frame as f64 * 16.0));
            assert!((state.player.y - 300.0).abs() <= IDLE_AMPLITUDE + 1e-3);
        }
        assert!(!state.has_started());
        assert_eq!(state.game_time, 0);
        assert!(state.obstacles.is_empty());
        assert!(state.player.path.is_empty());
        assert!(!state.is_over());
    }

    #[test]
    fn test_first_trigger_starts_and_flaps() {
        let mut state = GameState::new(1, Viewport::new(800.0, 600.0), Tuning::default());
        tick(&mut state, &TickInput::trigger_at(500.0));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.last_spawn_ms, 500.0);
        assert_eq!(state.game_time, 1);
        assert_eq!(state.rings.len(), 1);
        // Flap then one step of gravity
        assert!((state.player.velocity - (JUMP_FORCE + GRAVITY)).abs() < 1e-5);
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::Flapped { .. })));
    }

    #[test]
    fn test_boundary_death_freezes_score_and_path() {
        let mut state = running();
        let mut events = Vec::new();
        while !state.is_over() {
            tick(&mut state, &TickInput::at(0.0));
            events.extend(state.drain_events());
            assert!(state.game_time < 10_000, "player never fell");
        }
        let ended: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::RunEnded { .. }))
            .collect();
        assert_eq!(ended.len(), 1);
        let (score, cause) = run_ended(&events).unwrap();
        assert_eq!(cause, DeathCause::Boundary);
        assert_eq!(score, state.game_time / 10);
        assert_eq!(state.player.path.len() as u64, state.game_time);

        // Further ticks and triggers are no-ops
        let frozen = state.game_time;
        tick(&mut state, &TickInput::trigger_at(0.0));
        assert_eq!(state.game_time, frozen);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_dash_lasts_exact_duration() {
        let mut state = running();
        state.player.sync_meter = SYNC_MAX;
        trigger(&mut state, 0.0);
        assert!(state.player.is_dashing);
        assert_eq!(state.player.sync_meter, 0.0);
        assert_eq!(state.player.dash_cooldown, DASH_DURATION);

        for k in 1..=DASH_DURATION {
            tick(&mut state, &TickInput::at(0.0));
            if k < DASH_DURATION {
                assert!(state.player.is_dashing, "dash ended early at tick {k}");
                // Gravity suspended
                assert_eq!(state.player.y, 300.0);
            } else {
                assert!(!state.player.is_dashing);
            }
        }
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::DashEnded));
    }

    #[test]
    fn test_zero_dash_duration_never_sticks() {
        // Rejected at construction: the default length applies
        let tuning = Tuning {
            dash_duration: 0,
            ..Tuning::default()
        };
        let mut state = GameState::new(12345, Viewport::new(800.0, 600.0), tuning);
        trigger(&mut state, 0.0);
        state.player.sync_meter = SYNC_MAX;
        trigger(&mut state, 0.0);
        assert_eq!(state.player.dash_cooldown, DASH_DURATION);

        // Edited afterwards: still at least one tick, then over
        let mut state = running();
        state.tuning.dash_duration = 0;
        state.player.sync_meter = SYNC_MAX;
        trigger(&mut state, 0.0);
        assert!(state.player.is_dashing);
        assert_eq!(state.player.dash_cooldown, 1);
        tick(&mut state, &TickInput::at(0.0));
        assert!(!state.player.is_dashing);
        assert!(state.drain_events().contains(&GameEvent::DashEnded));
    }

    #[test]
    fn test_moving_gate_sways_plain_gate_holds() {
        let mut state = running();
        state
            .obstacles
            .push(Obstacle::new(700.0, 200.0, 200.0, ObstacleKind::MovingGate));
        state
            .obstacles
            .push(Obstacle::new(700.0, 200.0, 200.0, ObstacleKind::Gate));
        for _ in 0..5 {
            tick(&mut state, &TickInput::at(0.0));
        }
        assert!(!state.is_over());
        assert_eq!(state.game_time, 5);

        let expected = (5.0 * MOVING_GATE_FREQUENCY).sin() * MOVING_GATE_AMPLITUDE;
        let moving = &state.obstacles[0];
        let plain = &state.obstacles[1];
        assert_eq!(moving.kind, ObstacleKind::MovingGate);
        assert!((moving.offset - expected).abs() < 1e-4);
        assert!((moving.offset - 30.8608).abs() < 1e-3);
        assert_eq!(moving.gap_top(), 200.0 + moving.offset);
        assert_eq!(plain.offset, 0.0);
        assert_eq!(plain.gap_top(), 200.0);
    }

    #[test]
    fn test_perfect_pass_tracks_swayed_centre() {
        let mut state = running();
        state.game_time = 22;
        let sway = (23.0 * MOVING_GATE_FREQUENCY).sin() * MOVING_GATE_AMPLITUDE;

        // Gap 200..400 before sway; the player ends this tick on the swayed centre,
        // well outside the band around the resting centre
        state.player.y = 300.0 + sway - GRAVITY;
        state
            .obstacles
            .push(Obstacle::new(PLAYER_X + 4.0, 200.0, 200.0, ObstacleKind::MovingGate));
        tick(&mut state, &TickInput::at(0.0));

        assert!(!state.is_over());
        let gate = &state.obstacles[0];
        assert!((gate.offset - sway).abs() < 1e-4);
        assert!((state.player.y - 300.0).abs() > 200.0 * PERFECT_PASS_BAND);
        assert!(gate.sync_awarded);
        assert_eq!(state.player.sync_meter, PERFECT_PASS_BONUS);
        assert!(state.drain_events().contains(&GameEvent::PerfectPass));
    }

    #[test]
    fn test_trigger_below_cap_flaps() {
        let mut state = running();
        state.player.sync_meter = 99.0;
        trigger(&mut state, 0.0);
        assert!(!state.player.is_dashing);
        assert_eq!(state.player.velocity, JUMP_FORCE);
        assert_eq!(state.player.sync_meter, 99.0);
    }

    #[test]
    fn test_dash_survives_boundary() {
        let mut state = running();
        state.player.sync_meter = SYNC_MAX;
        trigger(&mut state, 0.0);
        state.player.y = 5.0;
        tick(&mut state, &TickInput::at(0.0));
        assert!(!state.is_over());
    }

    #[test]
    fn test_dash_shatters_gate() {
        let mut state = running();
        state.player.sync_meter = SYNC_MAX;
        trigger(&mut state, 0.0);
        state.drain_events();
        // Gap far below the player
        state
            .obstacles
            .push(Obstacle::new(PLAYER_X, 400.0, 150.0, ObstacleKind::Gate));
        tick(&mut state, &TickInput::at(0.0));
        assert!(!state.is_over());
        assert!(state.obstacles.is_empty());
        assert_eq!(state.impact, 1.0);
        assert!(state.drain_events().contains(&GameEvent::GateShattered));
    }

    #[test]
    fn test_gate_contact_is_fatal() {
        let mut state = running();
        state
            .obstacles
            .push(Obstacle::new(PLAYER_X, 400.0, 150.0, ObstacleKind::MovingGate));
        tick(&mut state, &TickInput::at(0.0));
        assert!(state.is_over());
        let (_, cause) = run_ended(&state.drain_events()).unwrap();
        assert_eq!(cause, DeathCause::Obstacle(ObstacleKind::MovingGate));
    }

    #[test]
    fn test_perfect_pass_awarded_once() {
        let mut state = running();
        // Gap 200..400, leading edge crosses the player this tick
        state
            .obstacles
            .push(Obstacle::new(PLAYER_X + 4.0, 200.0, 200.0, ObstacleKind::Gate));
        tick(&mut state, &TickInput::at(0.0));
        assert!(!state.is_over());
        assert!(state.obstacles[0].sync_awarded);
        assert_eq!(state.player.sync_meter, PERFECT_PASS_BONUS);

        state.player.velocity = 0.0;
        state.player.y = 300.0;
        tick(&mut state, &TickInput::at(0.0));
        assert_eq!(state.player.sync_meter, PERFECT_PASS_BONUS);
    }

    #[test]
    fn test_off_centre_pass_earns_nothing() {
        let mut state = running();
        state.player.y = 250.0;
        state
            .obstacles
            .push(Obstacle::new(PLAYER_X + 4.0, 200.0, 200.0, ObstacleKind::Gate));
        tick(&mut state, &TickInput::at(0.0));
        assert!(!state.is_over());
        assert!(!state.obstacles[0].sync_awarded);
        assert_eq!(state.player.sync_meter, 0.0);
    }

    #[test]
    fn test_orbs_and_perfect_pass_fill_meter_for_dash() {
        let mut state = running();
        state.player.sync_meter = 40.0;

        // Two orbs land on the player this tick
        let x = PLAYER_X + state.speed;
        state.orbs.push(DataOrb::new(x, 300.0));
        state.orbs.push(DataOrb::new(x, 305.0));
        tick(&mut state, &TickInput::at(0.0));
        assert!(state.orbs.is_empty());
        assert_eq!(state.player.sync_meter, 90.0);

        state.player.velocity = 0.0;
        state.player.y = 300.0;
        state
            .obstacles
            .push(Obstacle::new(PLAYER_X + 4.0, 200.0, 200.0, ObstacleKind::Gate));
        tick(&mut state, &TickInput::at(0.0));
        assert_eq!(state.player.sync_meter, SYNC_MAX);

        trigger(&mut state, 0.0);
        assert!(state.player.is_dashing);
        assert_eq!(state.player.sync_meter, 0.0);
    }

    #[test]
    fn test_speed_caps_at_max() {
        let mut state = running();
        state.speed = MAX_SPEED - 0.001;
        tick(&mut state, &TickInput::at(0.0));
        assert_eq!(state.speed, MAX_SPEED);
        state.player.velocity = 0.0;
        state.player.y = 300.0;
        tick(&mut state, &TickInput::at(0.0));
        assert_eq!(state.speed, MAX_SPEED);
    }

    #[test]
    fn test_spawn_follows_clock() {
        let mut state = running();
        // Interval at base speed is ~1300ms
        tick(&mut state, &TickInput::at(1000.0));
        assert!(state.obstacles.is_empty());
        state.player.velocity = 0.0;
        state.player.y = 300.0;
        tick(&mut state, &TickInput::at(1400.0));
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.last_spawn_ms, 1400.0);
    }

    #[test]
    fn test_offscreen_entities_pruned() {
        let mut state = running();
        state
            .obstacles
            .push(Obstacle::new(-355.0, 200.0, 200.0, ObstacleKind::Gate));
        state.orbs.push(DataOrb::new(-95.0, 100.0));
        tick(&mut state, &TickInput::at(0.0));
        assert!(state.obstacles.is_empty());
        assert!(state.orbs.is_empty());
    }

    #[test]
    fn test_effects_decay() {
        let mut state = running();
        state.burst(Vec2::ZERO, Tint::White, 5, 1.0);
        for _ in 0..8 {
            state.player.velocity = 0.0;
            state.player.y = 300.0;
            tick(&mut state, &TickInput::at(0.0));
        }
        // Flap ring from the starting trigger has faded
        assert!(state.rings.is_empty());
        for _ in 0..60 {
            state.player.velocity = 0.0;
            state.player.y = 300.0;
            tick(&mut state, &TickInput::at(0.0));
        }
        assert!(state.particles.is_empty());
    }
}
