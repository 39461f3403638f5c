//! Bounded log of lines the player has seen.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::format::FormatRun;
use crate::speech::Saying;

/// Default number of lines kept.
pub const DEFAULT_HISTORY_LEN: usize = 20;

/// One remembered line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Name shown for the speaker when the line was said.
    pub speaker: String,
    /// The line's text runs, directives removed.
    pub runs: Vec<FormatRun>,
    /// Whether the line was a thought.
    pub thought: bool,
}

/// The most recent lines, oldest first.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    recorded: HashMap<String, u64>,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_LEN)
    }
}

impl History {
    /// Create an empty history keeping at most `capacity` lines.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            recorded: HashMap::new(),
        }
    }

    /// Change the capacity, dropping the oldest lines if needed.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.trim();
    }

    /// Append a line.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        self.trim();
    }

    /// Record what a character is saying, once per posted line.
    ///
    /// `key` identifies the channel and `shown_name` is what goes into the
    /// log. Returns whether a new entry was added.
    pub fn record(&mut self, key: &str, shown_name: &str, saying: &Saying) -> bool {
        if !saying.is_active() || self.recorded.get(key) == Some(&saying.line) {
            return false;
        }
        self.recorded.insert(key.to_string(), saying.line);
        self.push(HistoryEntry {
            speaker: shown_name.to_string(),
            runs: saying
                .runs
                .iter()
                .filter(|run| !run.is_directive())
                .cloned()
                .collect(),
            thought: saying.thought,
        });
        true
    }

    /// Replace every entry, keeping the newest ones that fit.
    pub fn replace(&mut self, entries: Vec<HistoryEntry>) {
        self.entries = entries.into();
        self.recorded.clear();
        self.trim();
    }

    /// Iterate oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Owned copy of every entry, oldest first.
    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no lines were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn trim(&mut self) {
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_line;
    use crate::speech::Cursor;

    fn saying(text: &str, line: u64) -> Saying {
        Saying {
            runs: format_line(text),
            cursor: Cursor::At(0),
            thought: false,
            line,
        }
    }

    fn entry(text: &str) -> HistoryEntry {
        HistoryEntry {
            speaker: "Aki".into(),
            runs: format_line(text),
            thought: false,
        }
    }

    #[test]
    fn oldest_entries_drop_off() {
        let mut history = History::with_capacity(2);
        history.push(entry("one"));
        history.push(entry("two"));
        history.push(entry("three"));
        let texts: Vec<_> = history
            .iter()
            .map(|e| crate::format::plain_text(&e.runs))
            .collect();
        assert_eq!(texts, vec!["two", "three"]);
    }

    #[test]
    fn same_line_recorded_once() {
        let mut history = History::default();
        let line = saying("Hi<w=1> there", 1);
        assert!(history.record("Aki", "Aki", &line));
        assert!(!history.record("Aki", "Aki", &line));
        assert!(history.record("Aki", "Aki", &saying("Again", 2)));
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|e| e.runs.iter().all(|r| !r.is_directive())));
    }

    #[test]
    fn channels_tracked_separately() {
        let mut history = History::default();
        assert!(history.record("Aki", "Aki", &saying("a", 1)));
        assert!(history.record("Chloe", "???", &saying("b", 1)));
        assert_eq!(history.iter().last().map(|e| e.speaker.as_str()), Some("???"));
    }

    #[test]
    fn idle_channel_not_recorded() {
        let mut history = History::default();
        assert!(!history.record("Aki", "Aki", &saying("", 1)));
        assert!(history.is_empty());
    }

    #[test]
    fn replace_forgets_recorded_lines() {
        let mut history = History::default();
        assert!(history.record("Aki", "Aki", &saying("x", 1)));
        history.replace(Vec::new());
        assert!(history.record("Aki", "Aki", &saying("x", 1)));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn shrinking_capacity_trims() {
        let mut history = History::default();
        for i in 0..5 {
            history.push(entry(&i.to_string()));
        }
        history.set_capacity(3);
        assert_eq!(history.len(), 3);
        assert_eq!(history.capacity(), 3);
    }
}
