//! Run lifecycle
//!
//! A [`Session`] owns the current [`GameState`] plus the collaborators the
//! simulation must not know about: storage, sound and the HUD snapshot. The
//! host calls [`Session::trigger`] on input and [`Session::frame`] once per
//! animation frame.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{SoundEffect, SoundSink};
use crate::mistakes::{MistakeLog, adaptive_message};
use crate::persistence::{KvStore, MemoryService};
use crate::renderer::{self, Vertex};
use crate::settings::Settings;
use crate::sim::{self, DeathCause, GameEvent, GameState, Stage, TickInput, Viewport};
use crate::tuning::Tuning;

/// Salt for the feedback-message RNG
const FEEDBACK_STREAM_SALT: u64 = 0xA076_1D64_78BD_642F;

/// Where the current run stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Playing,
    GameOver { score: u64, new_best: bool },
}

/// HUD snapshot produced every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub score: u64,
    pub sync_meter: f32,
    pub stage: Stage,
    pub dashing: bool,
    /// Final score, once the run has ended
    pub ended: Option<u64>,
}

impl FrameReport {
    fn of(state: &GameState) -> Self {
        Self {
            score: state.score(),
            sync_meter: state.player.sync_meter,
            stage: state.stage(),
            dashing: state.player.is_dashing,
            ended: None,
        }
    }

    /// Fold one simulation event into the snapshot
    fn apply(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::ScoreChanged(score) => {
                self.score = score;
                self.stage = Stage::for_score(score);
            }
            GameEvent::SyncChanged(meter) => self.sync_meter = meter,
            GameEvent::DashActivated => self.dashing = true,
            GameEvent::DashEnded => self.dashing = false,
            GameEvent::RunEnded { score, .. } => {
                self.score = score;
                self.ended = Some(score);
            }
            _ => {}
        }
    }
}

pub struct Session<S: KvStore, A: SoundSink> {
    state: GameState,
    tuning: Tuning,
    settings: Settings,
    memory: MemoryService<S>,
    sound: A,
    /// Echo of the best run, loaded at run start
    best_path: Vec<f32>,
    status: RunStatus,
    hud: FrameReport,
    message: &'static str,
    feedback_rng: Pcg32,
}

impl<S: KvStore, A: SoundSink> Session<S, A> {
    pub fn new(
        viewport: Viewport,
        seed: u64,
        tuning: Tuning,
        settings: Settings,
        store: S,
        sound: A,
    ) -> Self {
        let memory = MemoryService::new(store);
        let mut feedback_rng = Pcg32::seed_from_u64(seed ^ FEEDBACK_STREAM_SALT);
        let message = adaptive_message(memory.mistakes().latest(), &mut feedback_rng);
        let state = GameState::new(seed, viewport, tuning);
        let hud = FrameReport::of(&state);

        let mut session = Self {
            tuning: state.tuning.clone(),
            state,
            settings,
            memory,
            sound,
            best_path: Vec::new(),
            status: RunStatus::Playing,
            hud,
            message,
            feedback_rng,
        };
        session.begin_run();
        session
    }

    fn begin_run(&mut self) {
        self.state.max_particles = self.settings.max_particles();
        self.best_path = self.memory.best_path();
        self.status = RunStatus::Playing;
        self.hud = FrameReport::of(&self.state);
        log::debug!(
            "Run ready (seed {}, echo of {} samples)",
            self.state.seed,
            self.best_path.len()
        );
    }

    /// One discrete player intent. Ignored once the run is over.
    pub fn trigger(&mut self, now_ms: f64) {
        if self.status != RunStatus::Playing {
            return;
        }
        sim::trigger(&mut self.state, now_ms);
    }

    /// Advance one frame and dispatch everything that happened
    pub fn frame(&mut self, now_ms: f64) -> FrameReport {
        if self.status != RunStatus::Playing {
            return self.hud;
        }

        sim::tick(&mut self.state, &TickInput::at(now_ms));

        let volume = self.settings.effective_sfx_volume();
        for event in self.state.drain_events() {
            if volume > 0.0 {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.sound.play(effect, volume);
                }
            }
            self.hud.apply(&event);
            if let GameEvent::RunEnded { score, y, cause } = event {
                self.finish_run(score, y, cause);
            }
        }
        self.hud
    }

    fn finish_run(&mut self, score: u64, y: f32, cause: DeathCause) {
        let new_best = self.memory.record_mistake(
            score,
            y,
            cause.as_str(),
            &self.state.player.path,
            crate::platform::now_ms(),
        );
        self.message = adaptive_message(self.memory.mistakes().latest(), &mut self.feedback_rng);
        self.status = RunStatus::GameOver { score, new_best };
    }

    /// Start a fresh run, reloading the echo of the best one
    pub fn restart(&mut self, seed: u64) {
        self.state = GameState::new(seed, self.state.viewport, self.tuning.clone());
        self.begin_run();
    }

    /// Resizing the play field restarts the run with the same seed
    pub fn resize(&mut self, viewport: Viewport) {
        let seed = self.state.seed;
        self.state = GameState::new(seed, viewport, self.tuning.clone());
        self.begin_run();
    }

    /// Replace and persist the player's preferences
    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.state.max_particles = self.settings.max_particles();
        self.settings.save(self.memory.store_mut());
    }

    /// Erase the mistake log and best run, then start over
    pub fn forget_progress(&mut self) {
        self.memory.clear();
        self.message = adaptive_message(None, &mut self.feedback_rng);
        let seed = self.state.seed;
        self.restart(seed);
        log::info!("Saved progress cleared");
    }

    /// Game-over line, based on the most recent mistake
    pub fn feedback_message(&self) -> &'static str {
        self.message
    }

    /// Vertices for the current frame
    pub fn render(&self, now_ms: f64) -> Vec<Vertex> {
        renderer::build_frame(&self.state, &self.settings, &self.best_path, now_ms)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn hud(&self) -> FrameReport {
        self.hud
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn best_path(&self) -> &[f32] {
        &self.best_path
    }

    pub fn best_score(&self) -> u64 {
        self.memory.best_score()
    }

    pub fn mistakes(&self) -> MistakeLog {
        self.memory.mistakes()
    }

    pub fn memory(&self) -> &MemoryService<S> {
        &self.memory
    }

    pub fn sound(&self) -> &A {
        &self.sound
    }
}
