//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`], owned by a single caller and
//! mutated only through [`super::tick`] and [`super::trigger`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Salt separating the cosmetic RNG stream from the gameplay one
const FX_STREAM_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Player hovers idly until the first trigger
    Waiting,
    /// Active gameplay
    Playing,
    /// Run ended
    GameOver,
}

/// Difficulty tier derived from score, used for HUD text and colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Sync,
    Resonance,
    Apex,
}

impl Stage {
    pub fn for_score(score: u64) -> Self {
        if score > 60 {
            Stage::Apex
        } else if score > 30 {
            Stage::Resonance
        } else {
            Stage::Sync
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Sync => "PHASE_01: SYNC",
            Stage::Resonance => "PHASE_02: RESONANCE",
            Stage::Apex => "PHASE_03: APEX",
        }
    }
}

/// Drawing surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Y of the floor line; the play area is `0..ground_y()`
    pub fn ground_y(&self) -> f32 {
        self.height - GROUND_HEIGHT
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// The player's glyph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub y: f32,
    pub velocity: f32,
    pub radius: f32,
    /// 0..=100, spent all at once on a dash
    pub sync_meter: f32,
    pub is_dashing: bool,
    /// Ticks of dash remaining
    pub dash_cooldown: u32,
    /// One `y` sample per simulated tick
    pub path: Vec<f32>,
}

impl Player {
    pub fn new(y: f32) -> Self {
        Self {
            y,
            velocity: 0.0,
            radius: PLAYER_RADIUS,
            sync_meter: 0.0,
            is_dashing: false,
            dash_cooldown: 0,
            path: Vec::new(),
        }
    }

    /// Add to the sync meter, saturating at the cap
    pub fn charge(&mut self, amount: f32) {
        self.sync_meter = (self.sync_meter + amount).min(SYNC_MAX);
    }

    pub fn dash_ready(&self) -> bool {
        self.sync_meter >= SYNC_MAX
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    #[default]
    Gate,
    MovingGate,
    /// Reserved; never spawned and has no behaviour of its own
    GlitchGate,
}

impl ObstacleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Gate => "gate",
            ObstacleKind::MovingGate => "moving_gate",
            ObstacleKind::GlitchGate => "glitch_gate",
        }
    }
}

/// A pair of slabs with a gap the player must fly through
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    /// Top of the gap before oscillation
    pub y: f32,
    pub width: f32,
    /// Gap height
    pub height: f32,
    pub kind: ObstacleKind,
    /// Vertical oscillation (moving gates only)
    pub offset: f32,
    pub sync_awarded: bool,
}

impl Obstacle {
    pub fn new(x: f32, gap_top: f32, gap_height: f32, kind: ObstacleKind) -> Self {
        Self {
            x,
            y: gap_top,
            width: GATE_WIDTH,
            height: gap_height,
            kind,
            offset: 0.0,
            sync_awarded: false,
        }
    }

    /// Top of the gap including oscillation
    pub fn gap_top(&self) -> f32 {
        self.y + self.offset
    }

    pub fn gap_bottom(&self) -> f32 {
        self.gap_top() + self.height
    }

    pub fn gap_center(&self) -> f32 {
        self.gap_top() + self.height / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbKind {
    #[default]
    Sync,
}

/// A collectible that charges the sync meter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataOrb {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub kind: OrbKind,
    pub collected: bool,
}

impl DataOrb {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            radius: ORB_RADIUS,
            kind: OrbKind::Sync,
            collected: false,
        }
    }
}

/// Palette slot for cosmetic entities; the renderer owns actual colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    Player,
    Sync,
    Obstacle,
    Bonus,
    White,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub tint: Tint,
    /// 0-1, decreases by `decay` each tick
    pub life: f32,
    pub decay: f32,
    pub size: f32,
}

/// Expanding ring left behind by a flap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JumpRing {
    pub center: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

/// Parallax background dot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub opacity: f32,
}

/// Default particle cap (settings may lower it)
pub const MAX_PARTICLES: usize = 512;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Left the vertical play area
    Boundary,
    /// Hit a gate slab
    Obstacle(ObstacleKind),
}

impl DeathCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathCause::Boundary => "boundary",
            DeathCause::Obstacle(kind) => kind.as_str(),
        }
    }
}

/// Something the outside world may want to react to (sound, HUD, storage)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ScoreChanged(u64),
    SyncChanged(f32),
    /// `pitch` rises as the player climbs
    Flapped { pitch: f32 },
    DashActivated,
    DashEnded,
    PerfectPass,
    OrbCollected,
    /// A gate destroyed by a dash
    GateShattered,
    RunEnded { score: u64, y: f32, cause: DeathCause },
}

/// Complete run state (deterministic for a given seed and input timeline)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub viewport: Viewport,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Ticks simulated since the first trigger; doubles as the score clock
    pub game_time: u64,
    /// Scroll speed in pixels per tick
    pub speed: f32,
    /// Timestamp (ms) of the last obstacle spawn
    pub last_spawn_ms: f64,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub orbs: Vec<DataOrb>,
    /// Visual-only state below
    pub shake: f32,
    pub impact: f32,
    pub particles: Vec<Particle>,
    pub rings: Vec<JumpRing>,
    pub stars: Vec<Star>,
    pub max_particles: usize,
    /// Gameplay RNG (spawns only)
    rng: Pcg32,
    /// Cosmetic RNG, so particle settings never shift the spawn sequence
    fx_rng: Pcg32,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh run with the given seed. Invalid tuning falls back to the defaults.
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        let tuning = tuning.or_default();
        let mut state = Self {
            seed,
            viewport,
            player: Player::new(viewport.height / 2.0),
            speed: tuning.base_speed,
            tuning,
            phase: GamePhase::Waiting,
            game_time: 0,
            last_spawn_ms: 0.0,
            obstacles: Vec::new(),
            orbs: Vec::new(),
            shake: 0.0,
            impact: 0.0,
            particles: Vec::new(),
            rings: Vec::new(),
            stars: Vec::with_capacity(STAR_COUNT),
            max_particles: MAX_PARTICLES,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_STREAM_SALT),
            events: Vec::new(),
        };
        state.scatter_stars();
        state
    }

    fn scatter_stars(&mut self) {
        for _ in 0..STAR_COUNT {
            let pos = Vec2::new(
                self.fx_rng.random::<f32>() * self.viewport.width,
                self.fx_rng.random::<f32>() * self.viewport.height,
            );
            self.stars.push(Star {
                pos,
                size: self.fx_rng.random::<f32>() * 1.5 + 0.5,
                opacity: self.fx_rng.random::<f32>() * 0.4 + 0.1,
            });
        }
    }

    /// Current score
    pub fn score(&self) -> u64 {
        crate::score_for_ticks(self.game_time)
    }

    pub fn stage(&self) -> Stage {
        Stage::for_score(self.score())
    }

    pub fn has_started(&self) -> bool {
        self.phase != GamePhase::Waiting
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Gameplay RNG
    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Scatter `count` particles from `origin`, respecting the particle cap
    pub fn burst(&mut self, origin: Vec2, tint: Tint, count: usize, force: f32) {
        let room = self.max_particles.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let vel = Vec2::new(
                (self.fx_rng.random::<f32>() - 0.5) * force,
                (self.fx_rng.random::<f32>() - 0.5) * force,
            );
            let size = self.fx_rng.random::<f32>() * 2.0 + 1.0;
            let decay = self.fx_rng.random::<f32>() * 0.02 + 0.02;
            self.particles.push(Particle {
                pos: origin,
                vel,
                tint,
                life: 1.0,
                decay,
                size,
            });
        }
    }

    /// Ensure the run is internally consistent (debug builds only)
    pub(crate) fn debug_check(&self) {
        debug_assert!(self.player.y.is_finite(), "player y went non-finite");
        debug_assert!(self.player.velocity.is_finite());
        debug_assert!((0.0..=SYNC_MAX).contains(&self.player.sync_meter));
        debug_assert!(!self.player.is_dashing || self.player.dash_cooldown > 0);
    }
}
