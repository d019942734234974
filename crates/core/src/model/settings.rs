use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("countdown must be between 0 and 10 seconds")]
    InvalidCountdown,

    #[error("feedback delay must be between 0 and 5000 ms")]
    InvalidFeedbackDelay,
}

/// Pacing of a session, independent of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    countdown_secs: u32,
    feedback_delay_ms: u64,
}

impl EngineSettings {
    /// # Errors
    ///
    /// Returns `SettingsError` if either value is outside its range.
    pub fn new(countdown_secs: u32, feedback_delay_ms: u64) -> Result<Self, SettingsError> {
        if countdown_secs > 10 {
            return Err(SettingsError::InvalidCountdown);
        }
        if feedback_delay_ms > 5_000 {
            return Err(SettingsError::InvalidFeedbackDelay);
        }
        Ok(Self {
            countdown_secs,
            feedback_delay_ms,
        })
    }

    /// Seconds of "3, 2, 1" before the first challenge.
    #[must_use]
    pub fn countdown_secs(&self) -> u32 {
        self.countdown_secs
    }

    /// Pause after each answer before the next challenge loads.
    #[must_use]
    pub fn feedback_delay_ms(&self) -> u64 {
        self.feedback_delay_ms
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            countdown_secs: 3,
            feedback_delay_ms: 800,
        }
    }
}
