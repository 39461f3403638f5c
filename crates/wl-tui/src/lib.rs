//! Terminal front end for What Lurks Within.
//!
//! The [`Engine`] owns the terminal and runs the frame loop: it reveals
//! dialogue through the [`Director`], draws the choice menu, and switches to
//! the battle and history screens as modal loops of their own. Story scenes
//! run on a separate thread and reach the engine only through the shared
//! channels in `wl-core` and `wl-story`.

pub mod config;
pub mod director;
pub mod engine;
pub mod error;
pub mod layout;
pub mod terminal;
pub mod views;

pub use config::EngineConfig;
pub use director::{DialogueFrame, Director};
pub use engine::{Engine, Start};
pub use error::{EngineError, EngineResult};
