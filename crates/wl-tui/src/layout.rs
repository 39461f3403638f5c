//! Layout helpers: word wrap over format runs and rectangle placement.

use std::mem;

use ratatui::prelude::*;
use wl_core::{FormatRun, TextStyle};

/// Break runs into lines narrower than `width`, keeping each run's style.
///
/// Text is split into alternating word and whitespace pieces; a piece that
/// would overflow starts a new line. A word too long for any line is broken
/// mid-word. Whitespace that causes a wrap is dropped. Directives draw nothing. `base` applies to plain runs, so a
/// thought can be italic throughout.
pub fn wrap_runs(runs: &[FormatRun], width: usize, base: Style) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut x = 0;

    for run in runs {
        let FormatRun::Text { style, text } = run else {
            continue;
        };
        let style = style_for(*style, base);
        for word in split_words(text).into_iter().flat_map(|w| split_long(w, width)) {
            let len = word.chars().count();
            if x > 0 && x + len >= width {
                lines.push(Line::from(mem::take(&mut current)));
                x = 0;
                if word.trim().is_empty() {
                    continue;
                }
            }
            current.push(Span::styled(word.to_string(), style));
            x += len;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

fn style_for(style: TextStyle, base: Style) -> Style {
    match style {
        TextStyle::Plain => base,
        TextStyle::Italic => base.add_modifier(Modifier::ITALIC),
        TextStyle::Bold => Style::default().add_modifier(Modifier::BOLD),
    }
}

/// Split text into maximal runs of whitespace and non-whitespace.
fn split_words(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    let mut previous: Option<bool> = None;
    for (i, c) in text.char_indices() {
        let space = c.is_whitespace();
        if let Some(p) = previous
            && p != space
        {
            words.push(&text[start..i]);
            start = i;
        }
        previous = Some(space);
    }
    if start < text.len() {
        words.push(&text[start..]);
    }
    words
}

/// Cut a word that cannot fit on an empty line into chunks that can.
fn split_long(word: &str, width: usize) -> Vec<&str> {
    let chunk = width.saturating_sub(1).max(1);
    if word.chars().count() <= chunk || word.trim().is_empty() {
        return vec![word];
    }
    let mut pieces = Vec::new();
    let mut start = 0;
    for (n, (i, _)) in word.char_indices().enumerate() {
        if n > 0 && n % chunk == 0 {
            pieces.push(&word[start..i]);
            start = i;
        }
    }
    pieces.push(&word[start..]);
    pieces
}

/// A one-row rectangle at row `y` holding `len` cells centered in `area`.
///
/// The result never leaves `area`; it is empty when `y` is outside it.
pub fn centered_row(len: usize, y: u16, area: Rect) -> Rect {
    let width = u16::try_from(len).unwrap_or(u16::MAX).min(area.width);
    let x = area.x + (area.width - width) / 2;
    Rect::new(x, y, width, 1).intersection(area)
}
