//! Error types for the core engine.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for save and load operations.
pub type SaveResult<T> = Result<T, SaveError>;

/// Errors raised by speech, choice, and character operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// `lock_speech` was called on a channel that is already locked.
    #[error("speech for '{0}' is already locked")]
    SpeechAlreadyLocked(String),

    /// `unlock_speech` was called on a channel that is not locked.
    #[error("speech for '{0}' is not locked")]
    SpeechNotLocked(String),

    /// A choice entry is missing its title or id.
    #[error("malformed choice: {0}")]
    MalformedChoice(String),

    /// A selection index outside the current menu was recorded.
    #[error("invalid selection {index} for a menu of {len} choices")]
    InvalidSelection {
        /// The rejected index.
        index: usize,
        /// Number of entries in the menu.
        len: usize,
    },

    /// A character sex other than `m` or `f`.
    #[error("invalid sex '{sex}' for character '{name}', expected 'm' or 'f'")]
    InvalidSex {
        /// Character name.
        name: String,
        /// The rejected value.
        sex: String,
    },

    /// No character with this name is registered.
    #[error("no such character '{0}'")]
    CharacterNotFound(String),
}

/// Errors raised while reading or writing the save file.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The save file does not exist.
    #[error("save file '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    /// The save file exists but its content cannot be decoded.
    #[error("save file is corrupt: {0}")]
    Corrupt(String),

    /// The save file decodes but a required key is absent.
    #[error("save file is missing required key '{0}'")]
    MissingKey(&'static str),

    /// A value could not be encoded as JSON.
    #[error("failed to encode save data: {0}")]
    Encode(#[from] serde_json::Error),

    /// Reading or writing the file failed.
    #[error("save file I/O error: {0}")]
    Io(#[from] std::io::Error),
}
