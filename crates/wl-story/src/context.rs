//! What a scene can reach: the producer side of every shared channel.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::debug;
use wl_battle::Battle;
use wl_core::{
    Character, ChoiceEntry, ChoiceMenu, ChoiceProducer, Manager, Speaker, SpeechProducer,
};

use crate::error::{StoryError, StoryResult};
use crate::mailbox::{BattleReport, BattleSlot};
use crate::presence::{Activity, Presence, publish};

/// Handle passed to every scene.
///
/// Cloning is cheap; all state lives behind shared pointers.
#[derive(Clone)]
pub struct StoryContext {
    manager: Arc<Manager>,
    choices: Arc<ChoiceMenu>,
    battles: Arc<BattleSlot>,
    presence: Arc<dyn Presence>,
    chapter: Option<(u32, String)>,
}

impl StoryContext {
    /// Create a context over the shared game state.
    pub fn new(
        manager: Arc<Manager>,
        choices: Arc<ChoiceMenu>,
        battles: Arc<BattleSlot>,
        presence: Arc<dyn Presence>,
    ) -> Self {
        Self {
            manager,
            choices,
            battles,
            presence,
            chapter: None,
        }
    }

    /// The same context, running inside the given chapter.
    pub fn in_chapter(&self, number: u32, title: &str) -> Self {
        Self {
            chapter: Some((number, title.to_string())),
            ..self.clone()
        }
    }

    /// Number and title of the running chapter.
    pub fn chapter(&self) -> Option<(u32, &str)> {
        self.chapter.as_ref().map(|(n, t)| (*n, t.as_str()))
    }

    /// The game state manager.
    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    /// Register a character (or fetch the one already registered by name).
    pub fn register(&self, character: Character) -> Speaker {
        self.manager.register_character(character)
    }

    /// Fetch a registered character.
    pub fn speaker(&self, name: &str) -> StoryResult<Speaker> {
        Ok(self.manager.character(name)?)
    }

    /// Show a menu and block until the player picks; returns the entry id.
    pub fn choose(&self, entries: Vec<ChoiceEntry>) -> StoryResult<String> {
        self.choices.set_choices(entries)?;
        Ok(self.choices.wait_choice())
    }

    /// Keep `question` on screen while the player picks from `entries`.
    pub fn ask(
        &self,
        speaker: &Speaker,
        question: &str,
        entries: Vec<ChoiceEntry>,
    ) -> StoryResult<String> {
        speaker.speak_locked(question)?;
        let id = self.choose(entries);
        speaker.unlock_speech()?;
        id
    }

    /// Hand a battle to the render loop and block until it is over.
    pub fn battle(&self, battle: Battle) -> StoryResult<BattleReport> {
        self.battles.request(battle);
        let report = self.battles.wait_result();
        debug!(outcome = ?report.outcome, "battle returned to story");
        Ok(report)
    }

    /// Sleep on the story thread.
    pub fn pause(&self, seconds: f64) {
        thread::sleep(Duration::from_secs_f64(seconds.max(0.0)));
    }

    /// Record a resume point in the running chapter and report it.
    pub fn set_section(&self, section: &str) -> StoryResult<()> {
        let (number, title) = self.chapter().ok_or(StoryError::NoChapter)?;
        self.manager.set_section(title, section);
        publish(self.presence.as_ref(), &Activity::chapter(number, title, false));
        Ok(())
    }

    /// Write the save file.
    pub fn save(&self) -> StoryResult<()> {
        Ok(self.manager.save()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presence::LogPresence;
    use std::sync::Mutex;
    use wl_core::{ChoiceConsumer, SpeechConsumer};

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Activity>>);

    impl Presence for Recorder {
        fn set_activity(&self, activity: &Activity) -> StoryResult<()> {
            self.0.lock().unwrap().push(activity.clone());
            Ok(())
        }
    }

    fn context(presence: Arc<dyn Presence>) -> (StoryContext, Arc<ChoiceMenu>) {
        let choices = Arc::new(ChoiceMenu::new());
        let ctx = StoryContext::new(
            Arc::new(Manager::new("unused.json")),
            Arc::clone(&choices),
            Arc::new(BattleSlot::new()),
            presence,
        );
        (ctx, choices)
    }

    #[test]
    fn set_section_needs_a_chapter() {
        let (ctx, _) = context(Arc::new(LogPresence));
        assert!(matches!(ctx.set_section("s1"), Err(StoryError::NoChapter)));
    }

    #[test]
    fn set_section_records_and_reports() {
        let recorder = Arc::new(Recorder::default());
        let (ctx, _) = context(recorder.clone());
        let ctx = ctx.in_chapter(1, "False Beginnings");

        ctx.set_section("s2").unwrap();
        assert_eq!(
            ctx.manager().section().position(),
            Some(("False Beginnings", "s2"))
        );
        let sent = recorder.0.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].details, "Chapter 1: False Beginnings");
    }

    #[test]
    fn ask_keeps_question_up_until_answered() {
        let (ctx, choices) = context(Arc::new(LogPresence));
        let chloe = ctx.register(Character::new("Chloe", "f").unwrap());
        let character = Arc::clone(chloe.character());

        let story = ctx.clone();
        let handle = thread::spawn(move || {
            story.ask(
                &chloe,
                "Left or right?",
                vec![ChoiceEntry::new("Left", "left"), ChoiceEntry::new("Right", "right")],
            )
        });

        while !choices.is_open() {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(character.speech().is_locked());
        assert!(character.speech().saying().is_active());

        choices.select(1).unwrap();
        assert_eq!(handle.join().unwrap().unwrap(), "left");
        assert!(!character.speech().is_locked());
        assert!(!character.speech().saying().is_active());
    }

    #[test]
    fn unknown_speaker_is_an_error() {
        let (ctx, _) = context(Arc::new(LogPresence));
        assert!(matches!(ctx.speaker("Nobody"), Err(StoryError::Core(_))));
    }
}
