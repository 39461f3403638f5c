//! The choice menu overlay.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use tracing::warn;
use wl_core::{ChoiceConsumer, ChoiceEntry};

use crate::layout::centered_row;

/// Highlight state for whichever menu is open.
#[derive(Debug, Default)]
pub struct ChoiceView {
    highlighted: usize,
    menu: u64,
}

impl ChoiceView {
    /// Display index of the highlighted entry.
    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// Reset the highlight when a new menu has been posted.
    pub fn sync(&mut self, menu: &dyn ChoiceConsumer) {
        let id = menu.menu_id();
        if id != self.menu {
            self.menu = id;
            self.highlighted = 0;
        }
    }

    /// Move the highlight or pick an entry. Returns false when no menu is
    /// open or the key means nothing to it.
    ///
    /// Up moves to the entry drawn above, Down to the one below; both wrap.
    pub fn handle_key(&mut self, key: &KeyEvent, menu: &dyn ChoiceConsumer) -> bool {
        self.sync(menu);
        let len = menu.entries().len();
        if len == 0 {
            return false;
        }

        match key.code {
            KeyCode::Up => self.highlighted = (self.highlighted + 1) % len,
            KeyCode::Down => self.highlighted = (self.highlighted + len - 1) % len,
            KeyCode::Enter => {
                if let Err(e) = menu.select(self.highlighted) {
                    warn!(error = %e, "selection rejected");
                }
                self.highlighted = 0;
            }
            _ => return false,
        }
        true
    }
}

/// Draw `entries` stacked upward from the middle row, highlighting one.
pub fn draw(frame: &mut Frame, entries: &[ChoiceEntry], highlighted: usize) {
    let area = frame.area();
    let middle = area.y + area.height / 2;

    for (i, entry) in entries.iter().enumerate() {
        let Some(y) = u16::try_from(i).ok().and_then(|i| middle.checked_sub(i)) else {
            break;
        };
        let style = if i == highlighted {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::ITALIC)
        };
        let rect = centered_row(entry.title.chars().count(), y, area);
        frame.render_widget(
            Paragraph::new(Span::styled(entry.title.clone(), style)),
            rect,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::screen_rows;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;
    use wl_core::{ChoiceMenu, ChoiceProducer};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn menu() -> ChoiceMenu {
        let menu = ChoiceMenu::new();
        menu.set_choices(vec![
            ChoiceEntry::new("Run", "run"),
            ChoiceEntry::new("Hide", "hide"),
            ChoiceEntry::new("Fight", "fight"),
        ])
        .unwrap();
        menu
    }

    #[test]
    fn keys_do_nothing_without_a_menu() {
        let mut view = ChoiceView::default();
        let menu = ChoiceMenu::new();
        assert!(!view.handle_key(&key(KeyCode::Enter), &menu));
        assert!(!view.handle_key(&key(KeyCode::Up), &menu));
    }

    #[test]
    fn highlight_wraps_both_ways() {
        let mut view = ChoiceView::default();
        let menu = menu();
        assert!(view.handle_key(&key(KeyCode::Down), &menu));
        assert_eq!(view.highlighted(), 2);
        assert!(view.handle_key(&key(KeyCode::Up), &menu));
        assert_eq!(view.highlighted(), 0);
        view.handle_key(&key(KeyCode::Up), &menu);
        assert_eq!(view.highlighted(), 1);
    }

    #[test]
    fn enter_selects_highlighted_entry() {
        let mut view = ChoiceView::default();
        let menu = menu();
        view.handle_key(&key(KeyCode::Up), &menu);
        view.handle_key(&key(KeyCode::Enter), &menu);
        // Entries are stored last-first, so display index 1 is "Hide".
        assert_eq!(menu.wait_choice(), "hide");
        assert_eq!(view.highlighted(), 0);
    }

    #[test]
    fn new_menu_resets_highlight() {
        let mut view = ChoiceView::default();
        let menu = menu();
        view.handle_key(&key(KeyCode::Up), &menu);
        menu.set_choices(vec![ChoiceEntry::new("Yes", "yes")]).unwrap();
        view.sync(&menu);
        assert_eq!(view.highlighted(), 0);
    }

    #[test]
    fn first_entry_sits_on_top() {
        let menu = menu();
        let entries = menu.entries();
        let mut terminal = Terminal::new(TestBackend::new(20, 10)).unwrap();
        terminal.draw(|f| draw(f, &entries, 0)).unwrap();

        let rows = screen_rows(terminal.backend().buffer());
        assert!(rows[3].contains("Run"));
        assert!(rows[4].contains("Hide"));
        assert!(rows[5].contains("Fight"));
    }
}
