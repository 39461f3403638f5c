//! Per-character speech channels.
//!
//! A channel holds the line a character is currently saying and how much of
//! it has been revealed. Two sides touch it:
//!
//! - the story thread posts lines through [`SpeechProducer`] and blocks in
//!   `speak` until the line is dismissed;
//! - the render loop reveals and dismisses lines through [`SpeechConsumer`].
//!
//! The cursor is only ever moved by the consumer side.

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::format::{FormatRun, format_line, format_up_to, max_length};
use crate::sync::lock;

/// How often a parked `speak` call rechecks its channel.
pub const SPEECH_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How far a line has been revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// This many displayable characters are visible.
    At(usize),
    /// The whole line is visible and waiting to be acknowledged.
    FullyRead,
}

/// Snapshot of a channel, as seen by the render loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Saying {
    /// The line being said (empty when the channel is idle).
    pub runs: Vec<FormatRun>,
    /// Reveal position.
    pub cursor: Cursor,
    /// Whether the line is an inner thought rather than speech.
    pub thought: bool,
    /// Sequence number of the line; bumps on every `speak`.
    pub line: u64,
}

impl Saying {
    /// A speech is active while it has runs to show.
    pub fn is_active(&self) -> bool {
        !self.runs.is_empty()
    }

    /// The runs visible at the current cursor.
    pub fn visible(&self) -> Vec<FormatRun> {
        match self.cursor {
            Cursor::At(pos) => format_up_to(&self.runs, pos),
            Cursor::FullyRead => self.runs.clone(),
        }
    }
}

/// Options for posting a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeakOptions {
    /// Render as an inner thought.
    pub thought: bool,
    /// Lock the line on screen and return immediately.
    pub lock: bool,
}

/// A pause directive taken out of a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pause {
    /// Pause length in seconds.
    pub seconds: f64,
    /// Display offset at which the pause sat.
    pub offset: usize,
}

/// Story-side operations on a speech channel.
pub trait SpeechProducer {
    /// Post a line and block until it is dismissed (or, with `lock`, lock it
    /// on screen and return at once).
    fn speak_with(&self, text: &str, options: SpeakOptions) -> CoreResult<()>;

    /// Lock the current line on screen.
    fn lock_speech(&self) -> CoreResult<()>;

    /// Unlock and clear the current line, releasing a parked `speak`.
    fn unlock_speech(&self) -> CoreResult<()>;

    /// Say a line and wait for the player to read it.
    fn speak(&self, text: &str) -> CoreResult<()> {
        self.speak_with(text, SpeakOptions::default())
    }

    /// Think a line and wait for the player to read it.
    fn think(&self, text: &str) -> CoreResult<()> {
        self.speak_with(
            text,
            SpeakOptions {
                thought: true,
                lock: false,
            },
        )
    }

    /// Say a line and keep it on screen until `unlock_speech`.
    fn speak_locked(&self, text: &str) -> CoreResult<()> {
        self.speak_with(
            text,
            SpeakOptions {
                thought: false,
                lock: true,
            },
        )
    }
}

/// Render-side operations on a speech channel.
pub trait SpeechConsumer {
    /// Snapshot the channel.
    fn saying(&self) -> Saying;

    /// Reveal one more character, or jump to fully read.
    fn increment_speak_index(&self, to_max: bool);

    /// Hide the last revealed character.
    fn decrement_speak_index(&self);

    /// Dismiss the line, keeping the lock flag as is.
    fn mark_read_text(&self);

    /// Remove and return the first pause directive inside the visible prefix.
    fn take_pause(&self) -> Option<Pause>;

    /// Whether a skip directive is inside the visible prefix.
    fn skip_reached(&self) -> bool;

    /// Whether the line is locked on screen.
    fn is_locked(&self) -> bool;
}

#[derive(Debug, Default)]
struct SpeechState {
    runs: Vec<FormatRun>,
    index: usize,
    thought: bool,
    locked: bool,
    line: u64,
}

impl SpeechState {
    fn cursor(&self) -> Cursor {
        if self.index > max_length(&self.runs) {
            Cursor::FullyRead
        } else {
            Cursor::At(self.index)
        }
    }
}

/// The speech state owned by a single character.
#[derive(Debug)]
pub struct SpeechChannel {
    owner: String,
    state: Mutex<SpeechState>,
}

impl SpeechChannel {
    /// Create an idle channel for the named speaker.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            state: Mutex::new(SpeechState::default()),
        }
    }

    /// Name of the speaker owning this channel.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    fn released(&self) -> bool {
        let state = lock(&self.state);
        state.runs.is_empty() || state.locked
    }
}

impl SpeechProducer for SpeechChannel {
    fn speak_with(&self, text: &str, options: SpeakOptions) -> CoreResult<()> {
        {
            let mut state = lock(&self.state);
            if options.lock && state.locked {
                return Err(CoreError::SpeechAlreadyLocked(self.owner.clone()));
            }
            state.runs = format_line(text);
            state.index = 0;
            state.thought = options.thought;
            state.line += 1;
            if options.lock {
                state.locked = true;
            }
            debug!(speaker = %self.owner, line = state.line, locked = options.lock, "speech posted");
        }

        if options.lock {
            return Ok(());
        }

        while !self.released() {
            thread::sleep(SPEECH_POLL_INTERVAL);
        }
        Ok(())
    }

    fn lock_speech(&self) -> CoreResult<()> {
        let mut state = lock(&self.state);
        if state.locked {
            return Err(CoreError::SpeechAlreadyLocked(self.owner.clone()));
        }
        state.locked = true;
        Ok(())
    }

    fn unlock_speech(&self) -> CoreResult<()> {
        let mut state = lock(&self.state);
        if !state.locked {
            return Err(CoreError::SpeechNotLocked(self.owner.clone()));
        }
        state.locked = false;
        state.runs.clear();
        Ok(())
    }
}

impl SpeechConsumer for SpeechChannel {
    fn saying(&self) -> Saying {
        let state = lock(&self.state);
        Saying {
            runs: state.runs.clone(),
            cursor: state.cursor(),
            thought: state.thought,
            line: state.line,
        }
    }

    fn increment_speak_index(&self, to_max: bool) {
        let mut state = lock(&self.state);
        if to_max {
            state.index = max_length(&state.runs) + 1;
        } else {
            state.index += 1;
        }
    }

    fn decrement_speak_index(&self) {
        let mut state = lock(&self.state);
        state.index = state.index.saturating_sub(1);
    }

    fn mark_read_text(&self) {
        lock(&self.state).runs.clear();
    }

    fn take_pause(&self) -> Option<Pause> {
        let mut state = lock(&self.state);
        if state.cursor() == Cursor::FullyRead {
            return None;
        }

        let mut shown = 0;
        let mut found = None;
        for (i, run) in state.runs.iter().enumerate() {
            match run {
                FormatRun::Text { .. } => {
                    let len = run.display_len();
                    if shown + len > state.index {
                        break;
                    }
                    shown += len;
                }
                FormatRun::Wait { seconds } => {
                    found = Some((i, *seconds));
                    break;
                }
                FormatRun::Skip => {}
            }
        }

        let (i, seconds) = found?;
        state.runs.remove(i);
        Some(Pause {
            seconds,
            offset: shown,
        })
    }

    fn skip_reached(&self) -> bool {
        let state = lock(&self.state);
        let visible = match state.cursor() {
            Cursor::At(pos) => format_up_to(&state.runs, pos),
            Cursor::FullyRead => return state.runs.contains(&FormatRun::Skip),
        };
        visible.contains(&FormatRun::Skip)
    }

    fn is_locked(&self) -> bool {
        lock(&self.state).locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    fn wait_until(mut done: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if done() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    fn post(channel: &Arc<SpeechChannel>, text: &'static str) -> thread::JoinHandle<CoreResult<()>> {
        let speaker = Arc::clone(channel);
        let handle = thread::spawn(move || speaker.speak(text));
        assert!(wait_until(|| channel.saying().is_active()));
        handle
    }

    #[test]
    fn idle_channel_is_inactive() {
        let channel = SpeechChannel::new("Aki");
        let saying = channel.saying();
        assert!(!saying.is_active());
        assert_eq!(saying.line, 0);
    }

    #[test]
    fn speak_parks_until_marked_read() {
        let channel = Arc::new(SpeechChannel::new("Aki"));
        let handle = post(&channel, "hello");

        assert_eq!(channel.saying().cursor, Cursor::At(0));
        for _ in 0..6 {
            channel.increment_speak_index(false);
        }
        assert_eq!(channel.saying().cursor, Cursor::FullyRead);

        thread::sleep(SPEECH_POLL_INTERVAL * 3);
        assert!(!handle.is_finished());
        assert_eq!(channel.saying().cursor, Cursor::FullyRead);

        channel.mark_read_text();
        assert!(wait_until(|| handle.is_finished()));
        assert!(handle.join().unwrap().is_ok());
    }

    #[test]
    fn five_advances_stop_short_of_fully_read() {
        let channel = SpeechChannel::new("Aki");
        channel.speak_locked("hello").unwrap();
        for _ in 0..5 {
            channel.increment_speak_index(false);
        }
        assert_eq!(channel.saying().cursor, Cursor::At(5));
    }

    #[test]
    fn lock_releases_parked_speaker_and_keeps_text() {
        let channel = Arc::new(SpeechChannel::new("Chloe"));
        let handle = post(&channel, "Which way?");

        channel.lock_speech().unwrap();
        assert!(wait_until(|| handle.is_finished()));
        assert!(channel.saying().is_active());

        channel.unlock_speech().unwrap();
        assert!(!channel.saying().is_active());
    }

    #[test]
    fn locked_speak_returns_immediately() {
        let channel = SpeechChannel::new("Chloe");
        channel.speak_locked("Stay.").unwrap();
        assert!(channel.is_locked());
        assert!(channel.saying().is_active());
    }

    #[test]
    fn double_lock_and_unlock_fail() {
        let channel = SpeechChannel::new("Chloe");
        channel.lock_speech().unwrap();
        assert!(matches!(
            channel.lock_speech(),
            Err(CoreError::SpeechAlreadyLocked(_))
        ));
        assert!(matches!(
            channel.speak_locked("again"),
            Err(CoreError::SpeechAlreadyLocked(_))
        ));
        channel.unlock_speech().unwrap();
        assert!(matches!(
            channel.unlock_speech(),
            Err(CoreError::SpeechNotLocked(_))
        ));
    }

    #[test]
    fn mark_read_keeps_lock_flag() {
        let channel = SpeechChannel::new("Chloe");
        channel.speak_locked("Stay.").unwrap();
        channel.mark_read_text();
        assert!(!channel.saying().is_active());
        assert!(channel.is_locked());
    }

    #[test]
    fn thought_flag_and_line_counter() {
        let channel = Arc::new(SpeechChannel::new("Aki"));
        let speaker = Arc::clone(&channel);
        let handle = thread::spawn(move || speaker.think("hmm"));
        assert!(wait_until(|| channel.saying().is_active()));

        let saying = channel.saying();
        assert!(saying.thought);
        assert_eq!(saying.line, 1);

        channel.mark_read_text();
        assert!(wait_until(|| handle.is_finished()));
    }

    #[test]
    fn jump_to_max_reveals_everything() {
        let channel = SpeechChannel::new("Aki");
        channel.speak_locked("<b>Now</b><w=1> go").unwrap();
        channel.increment_speak_index(true);
        let saying = channel.saying();
        assert_eq!(saying.cursor, Cursor::FullyRead);
        assert_eq!(saying.visible(), saying.runs);
    }

    #[test]
    fn decrement_saturates_at_zero() {
        let channel = SpeechChannel::new("Aki");
        channel.speak_locked("ab").unwrap();
        channel.decrement_speak_index();
        assert_eq!(channel.saying().cursor, Cursor::At(0));
        channel.increment_speak_index(false);
        channel.decrement_speak_index();
        assert_eq!(channel.saying().cursor, Cursor::At(0));
    }

    #[test]
    fn pause_is_taken_once_revealed() {
        let channel = SpeechChannel::new("Aki");
        channel.speak_locked("Hi<w=1.5>there").unwrap();

        assert_eq!(channel.take_pause(), None);
        channel.increment_speak_index(false);
        channel.increment_speak_index(false);

        let pause = channel.take_pause().unwrap();
        assert!((pause.seconds - 1.5).abs() < f64::EPSILON);
        assert_eq!(pause.offset, 2);
        assert_eq!(channel.take_pause(), None);
        assert!(!channel.saying().runs.iter().any(FormatRun::is_directive));
    }

    #[test]
    fn skip_detected_when_revealed() {
        let channel = SpeechChannel::new("Narrator");
        channel.speak_locked("Go<s>").unwrap();
        assert!(!channel.skip_reached());
        channel.increment_speak_index(false);
        channel.increment_speak_index(false);
        assert!(channel.skip_reached());
    }
}
