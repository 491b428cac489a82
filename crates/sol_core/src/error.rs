//! Error types for the game simulation.
//!
//! Player mistakes (dispatching from an empty planet, clicking the wrong
//! thing) are never errors: they are silent no-ops. The variants here cover
//! the cases that really are failures, such as unknown levels or corrupt data.

use thiserror::Error;

use crate::planet::PlanetId;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all game simulation errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// Requested level does not exist in the catalog.
    #[error("Level not found: {0}")]
    LevelNotFound(u32),

    /// Planet identifier does not resolve in the current state.
    #[error("Planet not found: {0}")]
    PlanetNotFound(PlanetId),

    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path (or source label) of the data that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Level fixture data failed validation.
    #[error("Invalid level {level}: {message}")]
    InvalidLevel {
        /// Level identifier.
        level: u32,
        /// What is wrong with it.
        message: String,
    },

    /// Invalid game state.
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Replay playback ended on a different state than was recorded.
    #[error("Replay mismatch: expected hash {expected}, got {actual}")]
    ReplayMismatch {
        /// Hash stored in the replay.
        expected: u64,
        /// Hash produced by playback.
        actual: u64,
    },
}
