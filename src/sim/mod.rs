//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per frame, driven by frame timestamps
//! - Seeded RNG only
//! - No rendering, storage or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{GateContact, gate_contact, orb_pickup, out_of_bounds};
pub use state::{
    DataOrb, DeathCause, GameEvent, GamePhase, GameState, JumpRing, Obstacle, ObstacleKind,
    OrbKind, Particle, Player, Stage, Star, Tint, Viewport, MAX_PARTICLES,
};
pub use tick::{TickInput, tick, trigger};
