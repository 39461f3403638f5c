//! Engine timing and battle settings.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Settings for the render loop.
///
/// Missing fields in a config file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seconds between two revealed characters.
    pub text_speed: f64,
    /// Sleep at the end of every dialogue frame, in milliseconds.
    pub frame_interval_ms: u64,
    /// Sleep at the end of every battle frame, in milliseconds.
    pub battle_frame_interval_ms: u64,
    /// Number of lines kept in the history view.
    pub history_len: usize,
    /// Seed for battle randomness; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            text_speed: 0.05,
            frame_interval_ms: 10,
            battle_frame_interval_ms: 50,
            history_len: 20,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| EngineError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| EngineError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(config.clamped())
    }

    /// Set the reveal speed (clamped to 0.001-1 seconds per character).
    pub fn with_text_speed(mut self, seconds: f64) -> Self {
        self.text_speed = if seconds.is_finite() {
            seconds.clamp(0.001, 1.0)
        } else {
            Self::default().text_speed
        };
        self
    }

    /// Set the dialogue frame sleep (clamped to 1-100 ms).
    pub fn with_frame_interval_ms(mut self, ms: u64) -> Self {
        self.frame_interval_ms = ms.clamp(1, 100);
        self
    }

    /// Set the battle frame sleep (clamped to 1-200 ms).
    pub fn with_battle_frame_interval_ms(mut self, ms: u64) -> Self {
        self.battle_frame_interval_ms = ms.clamp(1, 200);
        self
    }

    /// Set the history length (clamped to 1-500).
    pub fn with_history_len(mut self, len: usize) -> Self {
        self.history_len = len.clamp(1, 500);
        self
    }

    /// Fix the battle RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run every field through its builder so file values obey the same
    /// ranges.
    pub fn clamped(self) -> Self {
        let (speed, frame, battle, history) = (
            self.text_speed,
            self.frame_interval_ms,
            self.battle_frame_interval_ms,
            self.history_len,
        );
        self.with_text_speed(speed)
            .with_frame_interval_ms(frame)
            .with_battle_frame_interval_ms(battle)
            .with_history_len(history)
    }

    /// Time between two revealed characters.
    pub fn reveal_interval(&self) -> Duration {
        Duration::from_secs_f64(self.text_speed)
    }

    /// Dialogue frame sleep.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Battle frame sleep.
    pub fn battle_frame_interval(&self) -> Duration {
        Duration::from_millis(self.battle_frame_interval_ms)
    }
}
