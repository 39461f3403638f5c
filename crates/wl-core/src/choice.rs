//! The choice menu shared by the story thread and the render loop.
//!
//! Entries are stored in display order, which is the reverse of the order the
//! story supplied them. The render loop stacks them upward from the middle of
//! the screen, so index 0 is drawn lowest and the story's first entry ends up
//! on top.

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::sync::lock;

/// How often a parked `wait_choice` call rechecks the menu.
pub const CHOICE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceEntry {
    /// Text shown to the player.
    pub title: String,
    /// Value returned to the story when chosen.
    pub id: String,
}

impl ChoiceEntry {
    /// Create an entry.
    pub fn new(title: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            id: id.into(),
        }
    }
}

/// Story-side menu operations.
pub trait ChoiceProducer {
    /// Replace the menu, discarding any pending selection.
    fn set_choices(&self, entries: Vec<ChoiceEntry>) -> CoreResult<()>;

    /// Block until the player picks an entry and return its id.
    fn wait_choice(&self) -> String;
}

/// Render-side menu operations.
pub trait ChoiceConsumer {
    /// Entries in display order.
    fn entries(&self) -> Vec<ChoiceEntry>;

    /// Record the entry at display `index` as chosen.
    fn select(&self, index: usize) -> CoreResult<()>;

    /// Whether a menu is up and not yet answered.
    fn is_open(&self) -> bool;

    /// Sequence number of the current menu; bumps on every `set_choices`.
    fn menu_id(&self) -> u64;

    /// Returns true once after a menu was answered, so the display can
    /// clear it.
    fn take_clear_request(&self) -> bool;
}

#[derive(Debug, Default)]
struct MenuState {
    entries: Vec<ChoiceEntry>,
    selected: Option<usize>,
    clear_requested: bool,
    menu: u64,
}

/// Mailbox holding at most one outstanding menu.
#[derive(Debug, Default)]
pub struct ChoiceMenu {
    state: Mutex<MenuState>,
}

impl ChoiceMenu {
    /// Create an empty menu.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChoiceProducer for ChoiceMenu {
    fn set_choices(&self, entries: Vec<ChoiceEntry>) -> CoreResult<()> {
        for entry in &entries {
            if entry.title.is_empty() {
                return Err(CoreError::MalformedChoice(format!(
                    "entry with id '{}' has no title",
                    entry.id
                )));
            }
            if entry.id.is_empty() {
                return Err(CoreError::MalformedChoice(format!(
                    "entry '{}' has no id",
                    entry.title
                )));
            }
        }

        let mut state = lock(&self.state);
        state.entries = entries.into_iter().rev().collect();
        state.selected = None;
        state.clear_requested = false;
        state.menu += 1;
        debug!(count = state.entries.len(), menu = state.menu, "choices set");
        Ok(())
    }

    fn wait_choice(&self) -> String {
        loop {
            {
                let mut state = lock(&self.state);
                if let Some(index) = state.selected.take()
                    && let Some(entry) = state.entries.get(index)
                {
                    let id = entry.id.clone();
                    state.entries.clear();
                    state.clear_requested = true;
                    debug!(%id, "choice made");
                    return id;
                }
            }
            thread::sleep(CHOICE_POLL_INTERVAL);
        }
    }
}

impl ChoiceConsumer for ChoiceMenu {
    fn entries(&self) -> Vec<ChoiceEntry> {
        lock(&self.state).entries.clone()
    }

    fn select(&self, index: usize) -> CoreResult<()> {
        let mut state = lock(&self.state);
        let len = state.entries.len();
        if index >= len {
            return Err(CoreError::InvalidSelection { index, len });
        }
        state.selected = Some(index);
        Ok(())
    }

    fn is_open(&self) -> bool {
        let state = lock(&self.state);
        !state.entries.is_empty() && state.selected.is_none()
    }

    fn menu_id(&self) -> u64 {
        lock(&self.state).menu
    }

    fn take_clear_request(&self) -> bool {
        std::mem::take(&mut lock(&self.state).clear_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    fn two_choices() -> Vec<ChoiceEntry> {
        vec![ChoiceEntry::new("A", "a"), ChoiceEntry::new("B", "b")]
    }

    #[test]
    fn entries_are_reversed_for_display() {
        let menu = ChoiceMenu::new();
        menu.set_choices(two_choices()).unwrap();
        let titles: Vec<_> = menu.entries().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[test]
    fn index_zero_maps_to_last_supplied_entry() {
        let menu = Arc::new(ChoiceMenu::new());
        menu.set_choices(two_choices()).unwrap();

        let waiter = Arc::clone(&menu);
        let handle = thread::spawn(move || waiter.wait_choice());
        thread::sleep(CHOICE_POLL_INTERVAL);
        assert!(!handle.is_finished());

        menu.select(0).unwrap();
        assert_eq!(handle.join().unwrap(), "b");
        assert!(menu.entries().is_empty());
        assert!(menu.take_clear_request());
        assert!(!menu.take_clear_request());
    }

    #[test]
    fn index_one_maps_to_first_supplied_entry() {
        let menu = ChoiceMenu::new();
        menu.set_choices(two_choices()).unwrap();
        menu.select(1).unwrap();
        let started = Instant::now();
        assert_eq!(menu.wait_choice(), "a");
        assert!(started.elapsed() < CHOICE_POLL_INTERVAL);
    }

    #[test]
    fn out_of_range_selection_fails() {
        let menu = ChoiceMenu::new();
        menu.set_choices(two_choices()).unwrap();
        assert!(matches!(
            menu.select(2),
            Err(CoreError::InvalidSelection { index: 2, len: 2 })
        ));
    }

    #[test]
    fn selecting_without_menu_fails() {
        let menu = ChoiceMenu::new();
        assert!(menu.select(0).is_err());
        assert!(!menu.is_open());
    }

    #[test]
    fn malformed_entries_rejected() {
        let menu = ChoiceMenu::new();
        assert!(matches!(
            menu.set_choices(vec![ChoiceEntry::new("", "a")]),
            Err(CoreError::MalformedChoice(_))
        ));
        assert!(matches!(
            menu.set_choices(vec![ChoiceEntry::new("A", "")]),
            Err(CoreError::MalformedChoice(_))
        ));
        assert!(menu.entries().is_empty());
    }

    #[test]
    fn new_menu_discards_pending_selection() {
        let menu = ChoiceMenu::new();
        menu.set_choices(two_choices()).unwrap();
        menu.select(1).unwrap();
        assert!(!menu.is_open());

        menu.set_choices(vec![ChoiceEntry::new("C", "c")]).unwrap();
        assert!(menu.is_open());
        assert_eq!(menu.menu_id(), 2);
    }
}
