//! Story execution for What Lurks Within.
//!
//! Chapters are registered explicitly in a [`ChapterRegistry`], which turns
//! them into a playlist (optionally resuming from a saved section). Each
//! scene runs on a supervised [`StoryTask`] thread and talks to the render
//! loop only through its [`StoryContext`].

pub mod chapter;
pub mod context;
pub mod error;
pub mod mailbox;
pub mod presence;
pub mod task;

pub use chapter::{Chapter, ChapterRegistry, Launch, Scene};
pub use context::StoryContext;
pub use error::{StoryError, StoryResult};
pub use mailbox::{BattleReport, BattleSlot};
pub use presence::{Activity, ActivityKind, LogPresence, Presence, publish};
pub use task::StoryTask;
