//! Idle/demo mode - a simple pilot that plays the game
//!
//! Used by the headless runner and attract screens. Reads the world and
//! decides whether this frame should carry a trigger; never mutates state.

use super::state::{GameState, Obstacle};
use crate::consts::PLAYER_X;

/// How far below the target line the pilot lets itself sink before flapping
const FLAP_SLACK: f32 = 15.0;
/// Don't flap again while still rising faster than this
const RISING_CUTOFF: f32 = -2.0;
/// Dash when a gate is this many ticks away and the meter is full
const DASH_LOOKAHEAD_TICKS: f32 = 4.0;

/// The nearest gate the player has not cleared yet
pub fn next_gate(state: &GameState) -> Option<&Obstacle> {
    let radius = state.player.radius;
    state
        .obstacles
        .iter()
        .filter(|o| o.x + o.width > PLAYER_X - radius)
        .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
}

/// Decide whether to send a trigger this frame
pub fn wants_trigger(state: &GameState) -> bool {
    if state.is_over() {
        return false;
    }
    if !state.has_started() {
        return true;
    }

    let player = &state.player;
    if player.is_dashing {
        return false;
    }

    let gate = next_gate(state);

    if player.dash_ready() {
        if let Some(gate) = gate {
            let distance = gate.x - PLAYER_X;
            if distance < state.speed * DASH_LOOKAHEAD_TICKS {
                return true;
            }
        }
        // Holding a full meter; keep flying normally but never waste it on a flap
        let target = target_line(state, gate);
        return predicted_y(state) > target + FLAP_SLACK * 2.0 && player.velocity > RISING_CUTOFF;
    }

    let target = target_line(state, gate);
    predicted_y(state) > target + FLAP_SLACK && player.velocity > RISING_CUTOFF
}

/// Where the pilot wants to be: the next gap centre, else mid play area
fn target_line(state: &GameState, gate: Option<&Obstacle>) -> f32 {
    gate.map(|g| g.gap_center())
        .unwrap_or(state.viewport.ground_y() / 2.0)
}

/// Player y after one more step of gravity
fn predicted_y(state: &GameState) -> f32 {
    let player = &state.player;
    let vel = (player.velocity + state.tuning.gravity).min(state.tuning.terminal_velocity);
    player.y + vel
}
