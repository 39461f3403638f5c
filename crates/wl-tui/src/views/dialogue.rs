//! The dialogue box.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use wl_core::FormatRun;

use crate::director::DialogueFrame;
use crate::layout::wrap_runs;

/// Key hints in the bottom border.
pub const HELP: &str = " <ENTER>: Continue, h: History ";

/// The runs to draw for a line: speech is quoted, with the closing quote
/// appearing once the line is complete; thoughts are drawn bare.
pub fn dialogue_runs(line: &DialogueFrame) -> Vec<FormatRun> {
    if line.thought {
        return line.runs.clone();
    }
    let mut runs = Vec::with_capacity(line.runs.len() + 2);
    runs.push(FormatRun::plain("\""));
    runs.extend(line.runs.iter().cloned());
    if line.complete {
        runs.push(FormatRun::plain("\""));
    }
    runs
}

/// Draw the box around the whole screen and the current line inside it.
pub fn draw(frame: &mut Frame, line: Option<&DialogueFrame>) {
    let area = frame.area();
    let mut block = Block::default()
        .borders(Borders::ALL)
        .title_bottom(Line::from(HELP).right_aligned());

    let Some(line) = line else {
        frame.render_widget(block, area);
        return;
    };

    block = block.title(format!(" {} ", line.speaker));
    let text_area = block.inner(area).inner(Margin {
        horizontal: 1,
        vertical: 1,
    });
    let base = if line.thought {
        Style::default().add_modifier(Modifier::ITALIC)
    } else {
        Style::default()
    };
    let lines = wrap_runs(&dialogue_runs(line), usize::from(text_area.width), base);

    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(lines), text_area);
}
