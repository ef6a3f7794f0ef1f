//! Data-driven game balance
//!
//! Every knob defaults to the value in [`crate::consts`]. A tuning file only
//! needs to name the fields it overrides:
//!
//! ```json
//! { "gravity": 0.45, "dash_duration": 20 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Error, Debug)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tuning value: {0}")]
    Invalid(String),
}

/// Gameplay constants that can be overridden per run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub gravity: f32,
    pub jump_force: f32,
    pub terminal_velocity: f32,
    pub base_speed: f32,
    pub max_speed: f32,
    pub speed_increment: f32,
    pub sync_gain: f32,
    pub perfect_pass_bonus: f32,
    pub dash_duration: u32,
    pub orb_spawn_chance: f64,
    pub moving_gate_score: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            terminal_velocity: TERMINAL_VELOCITY,
            base_speed: BASE_SPEED,
            max_speed: MAX_SPEED,
            speed_increment: SPEED_INCREMENT,
            sync_gain: SYNC_GAIN,
            perfect_pass_bonus: PERFECT_PASS_BONUS,
            dash_duration: DASH_DURATION,
            orb_spawn_chance: ORB_SPAWN_CHANCE,
            moving_gate_score: MOVING_GATE_SCORE,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let finite = [
            self.gravity,
            self.jump_force,
            self.terminal_velocity,
            self.base_speed,
            self.max_speed,
            self.speed_increment,
            self.sync_gain,
            self.perfect_pass_bonus,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(TuningError::Invalid("values must be finite".into()));
        }
        if self.base_speed <= 0.0 || self.max_speed < self.base_speed {
            return Err(TuningError::Invalid(format!(
                "speed range {}..{} is empty",
                self.base_speed, self.max_speed
            )));
        }
        if self.speed_increment < 0.0 {
            return Err(TuningError::Invalid("speed_increment must be >= 0".into()));
        }
        if self.terminal_velocity <= 0.0 {
            return Err(TuningError::Invalid("terminal_velocity must be > 0".into()));
        }
        if self.sync_gain < 0.0 || self.perfect_pass_bonus < 0.0 {
            return Err(TuningError::Invalid("sync gains must be >= 0".into()));
        }
        if self.dash_duration == 0 {
            return Err(TuningError::Invalid("dash_duration must be >= 1".into()));
        }
        if !(0.0..=1.0).contains(&self.orb_spawn_chance) {
            return Err(TuningError::Invalid(
                "orb_spawn_chance must be within 0..=1".into(),
            ));
        }
        Ok(())
    }

    /// This tuning if it validates, otherwise the defaults
    pub fn or_default(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(err) => {
                log::warn!("Ignoring tuning overrides: {err}");
                Self::default()
            }
        }
    }
}
