//! Core engine for the What Lurks Within terminal visual novel.
//!
//! Holds the pieces shared by the story thread and the render loop:
//!
//! - [`format`]: inline dialogue markup
//! - [`speech`]: per-character speech channels
//! - [`character`]: characters and story-side speaker handles
//! - [`choice`]: the choice menu mailbox
//! - [`history`]: the bounded line history
//! - [`manager`]: roster, resume position, flags, save and load

pub mod character;
pub mod choice;
pub mod error;
pub mod format;
pub mod history;
pub mod manager;
pub mod speech;
pub mod sync;

pub use character::{AffinityTier, Character, CharacterRecord, Pronouns, Sex, Speaker};
pub use choice::{ChoiceConsumer, ChoiceEntry, ChoiceMenu, ChoiceProducer};
pub use error::{CoreError, CoreResult, SaveError, SaveResult};
pub use format::{FormatRun, TextStyle, format_line, format_up_to, max_length};
pub use history::{History, HistoryEntry};
pub use manager::{Manager, SaveData, Section};
pub use speech::{Cursor, Pause, Saying, SpeakOptions, SpeechConsumer, SpeechProducer};
