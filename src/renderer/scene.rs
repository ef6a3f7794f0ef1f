//! Frame assembly
//!
//! Turns a read-only view of the world into one triangle list, back to front.

use glam::Vec2;

use super::shapes::{banded_rect, circle, glyph, line, rect, ring};
use super::vertex::{Vertex, colors};
use crate::consts::PLAYER_X;
use crate::settings::Settings;
use crate::sim::{GameState, Stage, Tint};

/// Background grid spacing in pixels
const GRID_SIZE: f32 = 140.0;
/// Echo samples drawn behind and ahead of the current tick
const ECHO_BEHIND: usize = 30;
const ECHO_AHEAD: usize = 100;
const STAR_SEGMENTS: u32 = 6;

pub fn stage_color(stage: Stage) -> [f32; 4] {
    match stage {
        Stage::Sync => colors::PLAYER,
        Stage::Resonance => colors::SYNC,
        Stage::Apex => colors::OBSTACLE,
    }
}

pub fn tint_color(tint: Tint) -> [f32; 4] {
    match tint {
        Tint::Player => colors::PLAYER,
        Tint::Sync => colors::SYNC,
        Tint::Obstacle => colors::OBSTACLE,
        Tint::Bonus => colors::BONUS,
        Tint::White => colors::WHITE,
    }
}

/// Screen shake offset; a pure function of time so the frame stays reproducible
fn shake_offset(shake: f32, now_ms: f64) -> Vec2 {
    if shake <= 0.5 {
        return Vec2::ZERO;
    }
    let t = now_ms as f32;
    Vec2::new((t * 0.37).sin(), (t * 0.53).cos()) * (shake / 2.0)
}

/// Build every vertex for one frame
///
/// `best_path` is the echo of the best run, indexed by tick.
pub fn build_frame(
    state: &GameState,
    settings: &Settings,
    best_path: &[f32],
    now_ms: f64,
) -> Vec<Vertex> {
    let w = state.viewport.width;
    let h = state.viewport.height;
    let ground = state.viewport.ground_y();
    let segments = settings.quality.circle_segments();
    let phase_color = stage_color(state.stage());

    let mut out = Vec::with_capacity(4096);

    out.extend(rect(0.0, 0.0, w, h, colors::BACKGROUND));

    if settings.quality.starfield_enabled() {
        for star in &state.stars {
            let color = colors::with_alpha(colors::WHITE, star.opacity);
            out.extend(circle(star.pos, star.size, color, STAR_SEGMENTS));
        }
    }

    if settings.effective_impact_flash() && state.impact > 0.01 {
        let color = colors::with_alpha(colors::WHITE, state.impact * 0.15);
        out.extend(rect(0.0, 0.0, w, h, color));
    }

    // Everything below the backdrop shakes
    let world_start = out.len();

    let grid_color = colors::with_alpha(phase_color, 0.05);
    let scroll = (state.game_time as f32 * state.speed * 0.4) % GRID_SIZE;
    let mut x = -scroll;
    while x < w {
        out.extend(rect(x, 0.0, 1.0, h, grid_color));
        x += GRID_SIZE;
    }
    let mut y = 0.0;
    while y < h {
        out.extend(rect(0.0, y, w, 1.0, grid_color));
        y += GRID_SIZE;
    }

    if settings.show_echo {
        echo(&mut out, state, best_path);
    }

    out.extend(rect(0.0, ground - 2.0, w, 4.0, phase_color));
    out.extend(rect(0.0, 2.0, w, 4.0, phase_color));

    for obs in &state.obstacles {
        let top = obs.gap_top();
        let bottom = obs.gap_bottom();
        out.extend(banded_rect(obs.x, 0.0, obs.width, top, colors::OBSTACLE, colors::WHITE));
        out.extend(banded_rect(
            obs.x,
            bottom,
            obs.width,
            ground - bottom,
            colors::OBSTACLE,
            colors::WHITE,
        ));
        // Faint marker at the gap centre
        out.extend(rect(
            obs.x + 5.0,
            top + obs.height * 0.48,
            obs.width - 10.0,
            obs.height * 0.04,
            colors::with_alpha(colors::WHITE, 0.08),
        ));
    }

    let pulse = (state.game_time as f32 * 0.15).sin() * 2.0;
    for orb in &state.orbs {
        let center = Vec2::new(orb.x, orb.y);
        let radius = orb.radius + pulse;
        out.extend(circle(center, radius + 6.0, colors::with_alpha(colors::SYNC, 0.2), segments));
        out.extend(circle(center, radius, colors::SYNC, segments));
    }

    let player = &state.player;
    let center = Vec2::new(PLAYER_X, player.y);
    if player.is_dashing {
        out.extend(glyph(center, player.radius, 0.0, Vec2::new(4.0, 0.2), colors::WHITE));
    } else {
        out.extend(glyph(
            center,
            player.radius,
            player.velocity * 0.1,
            Vec2::ONE,
            colors::PLAYER,
        ));
    }

    if settings.particles {
        for p in &state.particles {
            let color = colors::with_alpha(tint_color(p.tint), p.life.clamp(0.0, 1.0));
            out.extend(circle(p.pos, p.size, color, STAR_SEGMENTS));
        }
    }

    for r in &state.rings {
        let color = colors::with_alpha(colors::PLAYER, r.alpha);
        out.extend(ring(r.center, (r.radius - 1.0).max(0.0), r.radius, color, segments));
    }

    if settings.effective_screen_shake() {
        let offset = shake_offset(state.shake, now_ms);
        if offset != Vec2::ZERO {
            for v in &mut out[world_start..] {
                v.position[0] += offset.x;
                v.position[1] += offset.y;
            }
        }
    }

    out
}

/// Dashed ghost trace of the best run around the current tick
fn echo(out: &mut Vec<Vertex>, state: &GameState, best_path: &[f32]) {
    if best_path.is_empty() {
        return;
    }
    let color = colors::with_alpha(colors::PLAYER, 0.08);
    let now = state.game_time as usize;
    let start = now.saturating_sub(ECHO_BEHIND);
    let end = (now + ECHO_AHEAD).min(best_path.len());
    let to_x = |i: usize| PLAYER_X + (i as f32 - now as f32) * state.speed;

    // Every other segment, for the dashed look
    let mut i = start;
    while i + 1 < end {
        let from = Vec2::new(to_x(i), best_path[i]);
        let to = Vec2::new(to_x(i + 1), best_path[i + 1]);
        out.extend(line(from, to, 2.0, color));
        i += 2;
    }
}
