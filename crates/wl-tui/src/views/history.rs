//! Scrollable list of recent lines.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use wl_core::{FormatRun, HistoryEntry};

use crate::layout::wrap_runs;

/// Title in the top border.
pub const TITLE: &str = " < HISTORY > ";
/// Key hints in the bottom border.
pub const HELP: &str = " <ESC>: Exit ";

/// Scroll state of the history modal. Offsets count lines up from the
/// newest entry.
#[derive(Debug, Default)]
pub struct HistoryView {
    scroll: usize,
}

impl HistoryView {
    /// Lines scrolled back from the bottom.
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Handle a key; returns true when the view should close.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Up => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_add(10),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::End => self.scroll = 0,
            _ => {}
        }
        false
    }

    /// Draw the newest entries that fit, shifted back by the scroll offset.
    pub fn draw(&mut self, frame: &mut Frame, entries: &[HistoryEntry]) {
        let area = frame.area();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Line::from(TITLE).centered())
            .title_bottom(Line::from(HELP).right_aligned());
        let inner = block.inner(area).inner(Margin {
            horizontal: 1,
            vertical: 0,
        });

        let lines = entry_lines(entries, usize::from(inner.width));
        let max_scroll = lines.len().saturating_sub(usize::from(inner.height));
        self.scroll = self.scroll.min(max_scroll);
        let top = u16::try_from(max_scroll - self.scroll).unwrap_or(u16::MAX);

        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new(lines).scroll((top, 0)), inner);
    }
}

/// Render entries as `name: "text"`, thoughts italic and unquoted.
pub fn entry_lines(entries: &[HistoryEntry], width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for entry in entries {
        let mut runs = vec![FormatRun::bold(format!("{}: ", entry.speaker))];
        let base = if entry.thought {
            runs.extend(entry.runs.iter().cloned());
            Style::default().add_modifier(Modifier::ITALIC)
        } else {
            runs.push(FormatRun::plain("\""));
            runs.extend(entry.runs.iter().cloned());
            runs.push(FormatRun::plain("\""));
            Style::default()
        };
        lines.extend(wrap_runs(&runs, width, base));
    }
    lines
}
