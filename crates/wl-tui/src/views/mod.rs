//! Screens drawn by the engine.

pub mod battle;
pub mod choices;
pub mod dialogue;
pub mod history;
pub mod menu;

pub use battle::BattleScreen;
pub use choices::ChoiceView;
pub use history::HistoryView;

#[cfg(test)]
pub(crate) fn screen_rows(buffer: &ratatui::buffer::Buffer) -> Vec<String> {
    let width = usize::from(buffer.area.width).max(1);
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect())
        .collect()
}

#[cfg(test)]
pub(crate) fn screen_contains(buffer: &ratatui::buffer::Buffer, needle: &str) -> bool {
    screen_rows(buffer).iter().any(|row| row.contains(needle))
}
