//! Loop Dash - A side-scrolling reflex arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, spawning, scoring)
//! - `session`: Run lifecycle wiring the simulation to storage, sound and HUD
//! - `renderer`: Read-only tessellation of the world into vertex lists
//! - `persistence`: Key-value storage backends and the mistake/echo memory
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `audio`: Event-to-sound mapping and sound sinks
//! - `platform`: Logging, clock and storage selection per target

pub mod audio;
pub mod mistakes;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use mistakes::{DeathRecord, MistakeLog};
pub use session::{FrameReport, RunStatus, Session};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Player horizontal position (the world scrolls, the player never moves in x)
    pub const PLAYER_X: f32 = 160.0;
    pub const PLAYER_RADIUS: f32 = 14.0;

    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.52;
    /// Velocity set by a flap (negative is up)
    pub const JUMP_FORCE: f32 = -8.8;
    pub const TERMINAL_VELOCITY: f32 = 14.0;

    /// Scroll speed in pixels per tick
    pub const BASE_SPEED: f32 = 9.0;
    pub const MAX_SPEED: f32 = 22.0;
    pub const SPEED_INCREMENT: f32 = 0.0025;

    /// Height of the floor strip below the play area
    pub const GROUND_HEIGHT: f32 = 40.0;

    /// Sync meter
    pub const SYNC_MAX: f32 = 100.0;
    pub const SYNC_GAIN: f32 = 25.0;
    pub const PERFECT_PASS_BONUS: f32 = 20.0;
    /// Perfect pass band as a fraction of gap height
    pub const PERFECT_PASS_BAND: f32 = 0.14;

    /// Dash length in ticks
    pub const DASH_DURATION: u32 = 15;

    /// Obstacle geometry
    pub const GATE_WIDTH: f32 = 60.0;
    pub const GAP_MAX: f32 = 240.0;
    pub const GAP_MIN: f32 = 140.0;
    pub const GAP_SHRINK_PER_POINT: f32 = 0.9;
    pub const GAP_TOP_MARGIN: f32 = 80.0;
    pub const SPAWN_MARGIN: f32 = 200.0;
    pub const OBSTACLE_DESPAWN_X: f32 = -300.0;
    /// Score above which gates start oscillating
    pub const MOVING_GATE_SCORE: u64 = 20;
    pub const MOVING_GATE_AMPLITUDE: f32 = 90.0;
    pub const MOVING_GATE_FREQUENCY: f32 = 0.07;

    /// Spawn interval in milliseconds: max(MIN, BASE - speed * PER_SPEED)
    pub const SPAWN_INTERVAL_BASE_MS: f64 = 2200.0;
    pub const SPAWN_INTERVAL_PER_SPEED_MS: f64 = 100.0;
    pub const SPAWN_INTERVAL_MIN_MS: f64 = 900.0;

    /// Orbs
    pub const ORB_RADIUS: f32 = 8.0;
    pub const ORB_SPAWN_CHANCE: f64 = 0.5;
    /// Orb sits this far past the obstacle's leading edge
    pub const ORB_X_OFFSET: f32 = 30.0;
    /// Extra pickup slack on top of both radii
    pub const ORB_PICKUP_SLACK: f32 = 10.0;
    pub const ORB_DESPAWN_X: f32 = -100.0;

    /// Ticks per score point
    pub const TICKS_PER_POINT: u64 = 10;

    /// Idle hover before the first input
    pub const IDLE_AMPLITUDE: f32 = 15.0;
    pub const IDLE_FREQUENCY: f64 = 0.005;

    /// Background parallax
    pub const STAR_COUNT: usize = 120;
    pub const STAR_PARALLAX: f32 = 0.12;

    /// Cosmetic decay per tick
    pub const SHAKE_DECAY: f32 = 0.92;
    pub const IMPACT_DECAY: f32 = 0.9;
}

/// Score for a given number of elapsed ticks
#[inline]
pub fn score_for_ticks(game_time: u64) -> u64 {
    game_time / consts::TICKS_PER_POINT
}
