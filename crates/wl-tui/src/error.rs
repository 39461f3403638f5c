//! Engine error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use wl_core::SaveError;
use wl_story::StoryError;

/// Errors that end a play session.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Terminal I/O failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    /// A config file could not be read or parsed.
    #[error("cannot read config '{}': {reason}", path.display())]
    Config {
        /// Path of the config file.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// A story scene failed or panicked.
    #[error(transparent)]
    Story(#[from] StoryError),

    /// Loading the save file failed.
    #[error(transparent)]
    Save(#[from] SaveError),

    /// The player pressed Ctrl+C.
    #[error("interrupted")]
    Interrupted,
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
