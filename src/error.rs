//! Error types for game setup.
//!
//! The simulation itself is infallible; only the platform boundary
//! (DOM lookups, browser API availability) can fail hard.

use thiserror::Error;

/// Errors that can occur while wiring the game to its host page.
#[derive(Debug, Error)]
pub enum GameError {
    /// A required page element is missing.
    #[error("required element not found: #{0}")]
    MissingElement(&'static str),

    /// A browser API was unavailable or rejected the call.
    #[error("platform API unavailable: {0}")]
    Platform(String),
}

pub type GameResult<T> = Result<T, GameError>;
