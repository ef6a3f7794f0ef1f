//! Mistake log and adaptive feedback
//!
//! Every run-ending collision is logged newest first; only the last ten are
//! kept. The game-over screen reads the latest entry to pick its message.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Maximum number of mistakes to keep
pub const MAX_MISTAKES: usize = 10;

/// Shown before the player has ever died
pub const FIRST_RUN_MESSAGE: &str = "INITIATING NEURAL LINK...";

const ADAPTIVE_MESSAGES: [&str; 8] = [
    "EYES ON THE ECHO.",
    "PRECISION IS POWER.",
    "THE LOOP REMEMBERS.",
    "ADAPTING TO YOUR RHYTHM.",
    "SYNC RATIO INCREASING.",
    "BREAK THE PATTERN.",
    "FLOW STATE DETECTED.",
    "RE-CALIBRATING SEQUENCES.",
];

/// A single run-ending collision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathRecord {
    pub score: u64,
    /// Player y at the moment of death
    pub y: f32,
    /// "boundary" or the obstacle type that was hit
    #[serde(rename = "obstacleType")]
    pub cause: String,
    /// Unix timestamp (ms)
    pub timestamp: f64,
}

/// Newest-first bounded list of deaths
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MistakeLog {
    pub entries: Vec<DeathRecord>,
}

impl MistakeLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a death at the front, dropping the oldest beyond the cap
    pub fn push(&mut self, record: DeathRecord) {
        self.entries.insert(0, record);
        self.entries.truncate(MAX_MISTAKES);
    }

    /// Most recent death
    pub fn latest(&self) -> Option<&DeathRecord> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most frequent cause in the log (ties go to the most recent)
    pub fn dominant_cause(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for entry in &self.entries {
            let count = self
                .entries
                .iter()
                .filter(|e| e.cause == entry.cause)
                .count();
            if best.is_none_or(|(_, n)| count > n) {
                best = Some((entry.cause.as_str(), count));
            }
        }
        best.map(|(cause, _)| cause)
    }
}

/// Message for the game-over screen
pub fn adaptive_message<R: Rng>(latest: Option<&DeathRecord>, rng: &mut R) -> &'static str {
    match latest {
        None => FIRST_RUN_MESSAGE,
        Some(_) => ADAPTIVE_MESSAGES[rng.random_range(0..ADAPTIVE_MESSAGES.len())],
    }
}
