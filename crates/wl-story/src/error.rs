//! Error types for story execution.

use thiserror::Error;

/// Result type for story operations.
pub type StoryResult<T> = Result<T, StoryError>;

/// Errors raised while running chapters.
#[derive(Debug, Error)]
pub enum StoryError {
    /// A saved section name is not defined by its chapter.
    #[error("section '{section}' does not exist within chapter '{chapter}'")]
    SectionNotFound {
        /// Chapter title.
        chapter: String,
        /// Requested section.
        section: String,
    },

    /// No registered chapter has this title.
    #[error("no such chapter '{0}'")]
    ChapterNotFound(String),

    /// A scene was used outside of any chapter.
    #[error("no chapter is running")]
    NoChapter,

    /// The story thread panicked.
    #[error("story '{name}' panicked: {message}")]
    Panicked {
        /// Thread name.
        name: String,
        /// Panic payload, if it was a string.
        message: String,
    },

    /// The story thread could not be started.
    #[error("failed to start story thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The presence collaborator rejected an update.
    #[error("presence unavailable: {0}")]
    Presence(String),

    /// Speech, choice or character error.
    #[error("{0}")]
    Core(#[from] wl_core::CoreError),

    /// Save or load error.
    #[error("{0}")]
    Save(#[from] wl_core::SaveError),

    /// Battle setup error.
    #[error("{0}")]
    Battle(#[from] wl_battle::BattleError),
}
