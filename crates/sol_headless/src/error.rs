//! Error type for the headless runner.

use thiserror::Error;

use sol_core::error::GameError;

/// Result alias for headless operations.
pub type Result<T> = std::result::Result<T, HeadlessError>;

/// Errors raised by the headless runner.
#[derive(Debug, Error)]
pub enum HeadlessError {
    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON document could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A strategy file could not be parsed.
    #[error("failed to parse strategy: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// The simulation rejected a request.
    #[error(transparent)]
    Game(#[from] GameError),

    /// No strategy preset with this name.
    #[error("unknown strategy: {0} (expected passive, greedy or turtle)")]
    UnknownStrategy(String),

    /// A command argument was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
