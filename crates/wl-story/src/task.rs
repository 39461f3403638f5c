//! The story thread and its supervisor.
//!
//! A scene runs on its own named thread. Whatever happens inside it, an
//! error return or a panic, comes back out of [`StoryTask::join`] so the
//! render loop never waits on a thread that has already died.

use std::any::Any;
use std::thread::{self, JoinHandle};

use tracing::{error, info};

use crate::chapter::Scene;
use crate::context::StoryContext;
use crate::error::{StoryError, StoryResult};

/// A running scene.
#[derive(Debug)]
pub struct StoryTask {
    name: String,
    handle: JoinHandle<StoryResult<()>>,
}

impl StoryTask {
    /// Start `scene` on a new thread named `name`.
    pub fn spawn(name: impl Into<String>, scene: Scene, ctx: StoryContext) -> StoryResult<Self> {
        let name = name.into();
        let thread_name = name.clone();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let result = scene(&ctx);
                match &result {
                    Ok(()) => info!(story = %thread_name, "story finished"),
                    Err(e) => error!(story = %thread_name, error = %e, "story failed"),
                }
                result
            })
            .map_err(StoryError::Spawn)?;
        info!(story = %name, "story started");
        Ok(Self { name, handle })
    }

    /// Thread name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the scene has returned or panicked.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the scene and surface its result, turning a panic into
    /// [`StoryError::Panicked`].
    pub fn join(self) -> StoryResult<()> {
        match self.handle.join() {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(story = %self.name, %message, "story panicked");
                Err(StoryError::Panicked {
                    name: self.name,
                    message,
                })
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailbox::BattleSlot;
    use crate::presence::LogPresence;
    use std::sync::Arc;
    use wl_core::{ChoiceMenu, CoreError, Manager};

    fn ctx() -> StoryContext {
        StoryContext::new(
            Arc::new(Manager::new("unused.json")),
            Arc::new(ChoiceMenu::new()),
            Arc::new(BattleSlot::new()),
            Arc::new(LogPresence),
        )
    }

    fn fine(_: &StoryContext) -> StoryResult<()> {
        Ok(())
    }

    fn fails(_: &StoryContext) -> StoryResult<()> {
        Err(CoreError::CharacterNotFound("Ghost".into()).into())
    }

    fn explodes(_: &StoryContext) -> StoryResult<()> {
        panic!("the floor gave way");
    }

    #[test]
    fn clean_scene_joins_ok() {
        let task = StoryTask::spawn("chapter-1", fine, ctx()).unwrap();
        assert_eq!(task.name(), "chapter-1");
        assert!(task.join().is_ok());
    }

    #[test]
    fn scene_error_surfaces_at_join() {
        let task = StoryTask::spawn("chapter-1", fails, ctx()).unwrap();
        assert!(matches!(
            task.join(),
            Err(StoryError::Core(CoreError::CharacterNotFound(_)))
        ));
    }

    #[test]
    fn panic_surfaces_at_join() {
        let task = StoryTask::spawn("chapter-2", explodes, ctx()).unwrap();
        while !task.is_finished() {
            thread::sleep(std::time::Duration::from_millis(5));
        }
        match task.join() {
            Err(StoryError::Panicked { name, message }) => {
                assert_eq!(name, "chapter-2");
                assert_eq!(message, "the floor gave way");
            }
            other => panic!("expected a panic error, got {other:?}"),
        }
    }
}
