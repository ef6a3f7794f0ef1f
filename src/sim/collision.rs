//! Collision detection against a player fixed at `PLAYER_X`
//!
//! The player never moves horizontally, so every test reduces to a circle at
//! a known x against axis-aligned slabs, a floor/ceiling pair, or another
//! circle.

use super::state::{DataOrb, Obstacle, Viewport};
use crate::consts::{ORB_PICKUP_SLACK, PERFECT_PASS_BAND, PLAYER_X};

/// Which slab of a gate the player touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GateContact {
    pub top: bool,
    pub bottom: bool,
}

impl GateContact {
    pub fn hit(&self) -> bool {
        self.top || self.bottom
    }
}

/// True when the player's horizontal extent overlaps the obstacle column
#[inline]
pub fn overlaps_column(obstacle: &Obstacle, radius: f32) -> bool {
    PLAYER_X + radius > obstacle.x && PLAYER_X - radius < obstacle.x + obstacle.width
}

/// Test a player circle at (`PLAYER_X`, `y`) against both slabs of a gate
///
/// The top slab spans from the ceiling to the gap top, the bottom slab from the
/// gap bottom to the floor.
pub fn gate_contact(obstacle: &Obstacle, y: f32, radius: f32) -> GateContact {
    if !overlaps_column(obstacle, radius) {
        return GateContact::default();
    }
    GateContact {
        top: y - radius < obstacle.gap_top(),
        bottom: y + radius > obstacle.gap_bottom(),
    }
}

/// True when the player leaves the vertical play area
pub fn out_of_bounds(viewport: &Viewport, y: f32, radius: f32) -> bool {
    y + radius > viewport.ground_y() || y - radius < 0.0
}

/// True when the gate's leading edge crossed the player this tick
///
/// `speed` is the distance the obstacle moved this tick.
#[inline]
pub fn crossed_player(obstacle: &Obstacle, speed: f32) -> bool {
    obstacle.x < PLAYER_X && obstacle.x + speed > PLAYER_X
}

/// True when `y` lies in the perfect-pass band around the gap centre
#[inline]
pub fn within_perfect_band(obstacle: &Obstacle, y: f32) -> bool {
    (y - obstacle.gap_center()).abs() < obstacle.height * PERFECT_PASS_BAND
}

/// True when the player circle is close enough to collect the orb
pub fn orb_pickup(orb: &DataOrb, y: f32, radius: f32) -> bool {
    let dx = PLAYER_X - orb.x;
    let dy = y - orb.y;
    (dx * dx + dy * dy).sqrt() < radius + orb.radius + ORB_PICKUP_SLACK
}
