//! Dialogue pacing.
//!
//! Once per frame the [`Director`] walks every character with an active
//! line and applies the first rule that fits:
//!
//! 1. a pending pause has elapsed: reveal one character and end the pause;
//! 2. the reveal interval has elapsed and the player did not press Enter:
//!    reveal one character;
//! 3. the player pressed Enter before the line was fully shown: show all of
//!    it;
//! 4. the player pressed Enter on a fully shown, unlocked line: dismiss it.
//!
//! A pause directive that has come into view is then taken. A skip directive
//! in view dismisses the line only once no pause is holding it. The frame
//! shows the last character in registration order whose line is still up.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;
use wl_core::{Character, Cursor, FormatRun, Manager, SpeechConsumer};

/// What the dialogue box should show this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueFrame {
    /// Name shown in the box title.
    pub speaker: String,
    /// Inner thought rather than speech.
    pub thought: bool,
    /// The revealed part of the line.
    pub runs: Vec<FormatRun>,
    /// Whether the whole line is visible.
    pub complete: bool,
}

/// Reveal state shared by every speech channel.
#[derive(Debug)]
pub struct Director {
    reveal_interval: Duration,
    last_reveal: Instant,
    pause: Option<Duration>,
    acknowledged: bool,
    line: Option<(String, u64)>,
}

impl Director {
    /// Create a director revealing one character every `reveal_interval`.
    pub fn new(reveal_interval: Duration, now: Instant) -> Self {
        Self {
            reveal_interval,
            last_reveal: now,
            pause: None,
            acknowledged: false,
            line: None,
        }
    }

    /// The player pressed Enter this frame.
    pub fn acknowledge(&mut self) {
        self.acknowledged = true;
    }

    /// Whether a pause directive is holding the reveal.
    pub fn is_paused(&self) -> bool {
        self.pause.is_some()
    }

    /// Advance every active speech channel by one frame and return the line
    /// to draw, if any.
    ///
    /// Lines are recorded in the manager's history the first time they are
    /// seen. The Enter press is consumed by the end of the frame whether or
    /// not a rule used it.
    pub fn frame(&mut self, manager: &Manager, now: Instant) -> Option<DialogueFrame> {
        let shown = self.advance(&manager.characters(), manager, now);
        self.acknowledged = false;
        shown
    }

    fn advance(
        &mut self,
        characters: &[Arc<Character>],
        manager: &Manager,
        now: Instant,
    ) -> Option<DialogueFrame> {
        let mut shown = None;

        for character in characters {
            let speech = character.speech();
            let saying = speech.saying();
            if !saying.is_active() {
                continue;
            }

            let line = (character.name().to_string(), saying.line);
            if self.line.as_ref() != Some(&line) {
                self.line = Some(line);
                self.pause = None;
            }
            manager.record_line(character);

            let fully_read = saying.cursor == Cursor::FullyRead;
            let elapsed = now.saturating_duration_since(self.last_reveal);
            match self.pause {
                Some(pause) if elapsed > pause => {
                    speech.increment_speak_index(false);
                    self.last_reveal = now;
                    self.pause = None;
                }
                None if elapsed > self.reveal_interval && !self.acknowledged => {
                    speech.increment_speak_index(false);
                    self.last_reveal = now;
                }
                _ if self.acknowledged && !fully_read => {
                    speech.increment_speak_index(true);
                    self.acknowledged = false;
                    self.pause = None;
                }
                _ if self.acknowledged && !speech.is_locked() => {
                    speech.mark_read_text();
                    self.acknowledged = false;
                    self.pause = None;
                    debug!(speaker = %character.name(), "line dismissed");
                    continue;
                }
                _ => {}
            }

            if let Some(pause) = speech.take_pause() {
                self.pause = Some(Duration::from_secs_f64(pause.seconds.max(0.0)));
                self.last_reveal = now;
            }
            if self.pause.is_none() && speech.skip_reached() && !speech.is_locked() {
                speech.mark_read_text();
                debug!(speaker = %character.name(), "line skipped");
                continue;
            }

            let saying = speech.saying();
            shown = Some(DialogueFrame {
                speaker: character.display_name(),
                thought: saying.thought,
                runs: saying.visible(),
                complete: saying.cursor == Cursor::FullyRead,
            });
        }

        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use wl_core::{CoreResult, Speaker, SpeechProducer, format::plain_text};

    const STEP: Duration = Duration::from_millis(100);

    struct Stage {
        manager: Manager,
        director: Director,
        start: Instant,
        frames: u32,
    }

    impl Stage {
        fn new() -> Self {
            let start = Instant::now();
            Self {
                manager: Manager::new("unused.json"),
                director: Director::new(Duration::from_millis(50), start),
                start,
                frames: 0,
            }
        }

        fn cast(&self, name: &str) -> Speaker {
            self.manager
                .register_character(Character::new(name, "f").unwrap())
        }

        fn tick(&mut self) -> Option<DialogueFrame> {
            self.frames += 1;
            let now = self.start + STEP * self.frames;
            self.director.frame(&self.manager, now)
        }

        /// Advance the clock without a frame, as if the loop were busy.
        fn skip_time(&mut self, steps: u32) {
            self.frames += steps;
        }
    }

    fn say(speaker: &Speaker, text: &'static str) -> thread::JoinHandle<CoreResult<()>> {
        let story = speaker.clone();
        let handle = thread::spawn(move || story.speak(text));
        while !speaker_active(speaker) {
            thread::sleep(Duration::from_millis(2));
        }
        handle
    }

    fn speaker_active(speaker: &Speaker) -> bool {
        speaker.character().speech().saying().is_active()
    }

    fn shown_text(frame: &Option<DialogueFrame>) -> String {
        frame
            .as_ref()
            .map(|f| plain_text(&f.runs))
            .unwrap_or_default()
    }

    #[test]
    fn reveals_one_character_per_interval_then_waits() {
        let mut stage = Stage::new();
        let alice = stage.cast("Alice");
        let story = say(&alice, "hi");

        assert_eq!(shown_text(&stage.tick()), "h");
        assert_eq!(shown_text(&stage.tick()), "hi");
        let frame = stage.tick();
        assert!(frame.as_ref().unwrap().complete);

        // Fully shown lines stay up until the player acknowledges them.
        for _ in 0..5 {
            assert!(stage.tick().unwrap().complete);
        }
        assert!(!story.is_finished());

        stage.director.acknowledge();
        assert!(stage.tick().is_none());
        assert!(story.join().unwrap().is_ok());
        assert_eq!(stage.manager.history().len(), 1);
    }

    #[test]
    fn enter_mid_line_shows_everything() {
        let mut stage = Stage::new();
        let alice = stage.cast("Alice");
        let story = say(&alice, "a longer line");

        assert_eq!(shown_text(&stage.tick()), "a");
        stage.director.acknowledge();
        let frame = stage.tick().unwrap();
        assert!(frame.complete);
        assert_eq!(plain_text(&frame.runs), "a longer line");

        // The press was used to reveal, not to dismiss.
        assert!(stage.tick().is_some());
        stage.director.acknowledge();
        assert!(stage.tick().is_none());
        story.join().unwrap().unwrap();
    }

    #[test]
    fn locked_line_survives_enter() {
        let mut stage = Stage::new();
        let alice = stage.cast("Alice");
        alice.speak_locked("Left or right?").unwrap();

        stage.director.acknowledge();
        assert!(stage.tick().unwrap().complete);
        stage.director.acknowledge();
        assert!(stage.tick().is_some());
        stage.director.acknowledge();
        assert!(stage.tick().is_some());

        alice.unlock_speech().unwrap();
        assert!(stage.tick().is_none());
    }

    #[test]
    fn pause_directive_holds_the_reveal() {
        let mut stage = Stage::new();
        let alice = stage.cast("Alice");
        let story = say(&alice, "ab<w=1>cd");

        stage.tick();
        assert_eq!(shown_text(&stage.tick()), "ab");
        assert!(stage.director.is_paused());

        // Still inside the one second pause.
        assert_eq!(shown_text(&stage.tick()), "ab");
        assert_eq!(shown_text(&stage.tick()), "ab");

        stage.skip_time(10);
        assert_eq!(shown_text(&stage.tick()), "abc");
        assert!(!stage.director.is_paused());

        stage.director.acknowledge();
        stage.tick();
        stage.director.acknowledge();
        assert!(stage.tick().is_none());
        story.join().unwrap().unwrap();
    }

    #[test]
    fn skip_directive_dismisses_without_enter() {
        let mut stage = Stage::new();
        let alice = stage.cast("Alice");
        let story = say(&alice, "go<s>");

        assert_eq!(shown_text(&stage.tick()), "g");
        assert!(stage.tick().is_none());
        story.join().unwrap().unwrap();
    }

    #[test]
    fn pause_then_skip_holds_before_dismissing() {
        let mut stage = Stage::new();
        let alice = stage.cast("Alice");
        let story = say(&alice, "ab<w=1><s>");

        assert_eq!(shown_text(&stage.tick()), "a");
        assert_eq!(shown_text(&stage.tick()), "ab");
        assert!(stage.director.is_paused());
        assert_eq!(shown_text(&stage.tick()), "ab");
        assert!(!story.is_finished());

        stage.skip_time(10);
        assert!(stage.tick().is_none());
        story.join().unwrap().unwrap();
    }

    #[test]
    fn last_active_speaker_is_shown() {
        let mut stage = Stage::new();
        let alice = stage.cast("Alice");
        let bob = stage.cast("Bob");
        let story = say(&alice, "hi");
        bob.speak_locked("wait").unwrap();

        stage.director.acknowledge();
        let frame = stage.tick().unwrap();
        assert_eq!(frame.speaker, "Bob");
        assert_eq!(plain_text(&frame.runs), "w");
        let speakers: Vec<_> = stage
            .manager
            .history()
            .into_iter()
            .map(|entry| entry.speaker)
            .collect();
        assert_eq!(speakers, vec!["Alice", "Bob"]);

        // Dismissing Alice's line still leaves Bob on screen this frame.
        stage.director.acknowledge();
        let frame = stage.tick().unwrap();
        assert_eq!(frame.speaker, "Bob");
        assert_eq!(plain_text(&frame.runs), "wa");
        story.join().unwrap().unwrap();

        bob.unlock_speech().unwrap();
        assert!(stage.tick().is_none());
    }

    #[test]
    fn thoughts_are_flagged() {
        let mut stage = Stage::new();
        let alice = stage.cast("Alice");
        let speaker = alice.clone();
        let story = thread::spawn(move || speaker.think("hmm"));
        while !speaker_active(&alice) {
            thread::sleep(Duration::from_millis(2));
        }

        let frame = stage.tick().unwrap();
        assert!(frame.thought);
        assert_eq!(frame.speaker, "Alice");

        stage.director.acknowledge();
        stage.tick();
        stage.director.acknowledge();
        stage.tick();
        story.join().unwrap().unwrap();
    }
}
