//! Terminal setup, teardown, and key polling.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::Size;
use ratatui::prelude::*;

use crate::error::EngineResult;

/// The terminal every screen draws to.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Switch to raw mode and the alternate screen.
pub fn setup() -> EngineResult<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(terminal)
}

/// Give the terminal back, whatever state the session ended in.
pub fn restore(terminal: &mut Tui) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
}

/// Read at most one pending key press without blocking.
pub fn poll_key() -> EngineResult<Option<KeyEvent>> {
    if !event::poll(Duration::ZERO)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
        _ => Ok(None),
    }
}

/// Ctrl+C.
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Clear the screen if the terminal changed size since `last`.
pub fn refresh_on_resize(terminal: &mut Tui, last: &mut Size) -> EngineResult<()> {
    let size = terminal.size()?;
    if size != *last {
        terminal.clear()?;
        *last = size;
    }
    Ok(())
}
