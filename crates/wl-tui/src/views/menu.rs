//! The title screen.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use wl_core::ChoiceEntry;

use crate::layout::centered_row;
use crate::views::choices;

/// Game title shown on the top row.
pub const TITLE: &str = "WHAT LURKS WITHIN";

/// What the player picked on the title screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Play from the first chapter.
    NewGame,
    /// Resume from the save file.
    LoadGame,
    /// Leave the game.
    Quit,
}

impl MenuChoice {
    /// The menu, top entry first.
    pub fn entries() -> Vec<ChoiceEntry> {
        vec![
            ChoiceEntry::new("Start New Game", "start"),
            ChoiceEntry::new("Load Game", "load"),
            ChoiceEntry::new("Quit", "quit"),
        ]
    }

    /// Map a menu id back to the choice.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "start" => Some(Self::NewGame),
            "load" => Some(Self::LoadGame),
            "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Draw the title and the menu.
pub fn draw(frame: &mut Frame, entries: &[ChoiceEntry], highlighted: usize) {
    let area = frame.area();
    frame.render_widget(
        Paragraph::new(TITLE),
        centered_row(TITLE.len(), area.y, area),
    );
    choices::draw(frame, entries, highlighted);
}
