//! The battle screen: combatant boxes, status lines, and the command prompt.

use std::mem;
use std::ops::Range;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use wl_battle::{
    Battle, BattleCharacter, BattleCommand, CommandOutcome, Outcome, Side, TurnStep,
};
use wl_story::BattleReport;

use crate::layout::centered_row;

const BOX_HEIGHT: u16 = 10;
const OVERLAY_PAD_X: u16 = 5;
const OVERLAY_PAD_Y: u16 = 2;

/// Input mode of the battle prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Typing commands.
    Command,
    /// Inspecting the combatant at this roster index.
    Visual(usize),
}

/// A battle in progress plus the player's prompt state.
#[derive(Debug)]
pub struct BattleScreen {
    battle: Battle,
    mode: Mode,
    input: String,
    pending: Option<BattleCommand>,
    selected: usize,
}

impl BattleScreen {
    /// Wrap a battle about to start.
    pub fn new(battle: Battle) -> Self {
        Self {
            battle,
            mode: Mode::Command,
            input: String::new(),
            pending: None,
            selected: 0,
        }
    }

    /// The battle being fought.
    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    /// Current prompt mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Text typed so far.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Highlighted roster index.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Finish with the given outcome.
    pub fn into_report(self, outcome: Outcome) -> BattleReport {
        BattleReport {
            outcome,
            battle: self.battle,
        }
    }

    fn player_turn(&self) -> bool {
        self.battle.side_of(self.battle.turn()) == Side::Allies && self.battle.current().is_alive()
    }

    /// Handle a key press. Keys are ignored while the foes act.
    pub fn handle_key(&mut self, key: &KeyEvent) {
        if !self.player_turn() {
            return;
        }
        let len = self.battle.roster().len();

        match key.code {
            KeyCode::Left => self.selected = (self.selected + len - 1) % len,
            KeyCode::Right => self.selected = (self.selected + 1) % len,
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter if self.mode == Mode::Command => {
                let line = mem::take(&mut self.input);
                self.pending = BattleCommand::parse(&line);
            }
            KeyCode::Esc => {
                self.mode = Mode::Command;
                self.input.clear();
                self.pending = None;
            }
            KeyCode::Char(c)
                if self.mode == Mode::Command && (c.is_alphanumeric() || c == ' ') =>
            {
                self.input.push(c);
            }
            _ => {}
        }
    }

    /// Advance one frame, `dt` seconds after the last.
    ///
    /// The outcome is checked before anything else, so a finished battle
    /// never runs another turn.
    pub fn tick(&mut self, dt: f64) -> Option<Outcome> {
        if let Some(outcome) = self.battle.outcome() {
            return Some(outcome);
        }
        self.battle.get_display(Some(dt));

        if self.battle.step() == TurnStep::Player
            && let Some(command) = self.pending.take()
            && let CommandOutcome::View(index) = self.battle.execute(&command, self.selected)
        {
            self.mode = Mode::Visual(index);
        }
        None
    }

    /// Text on the bottom row.
    pub fn status_line(&self) -> String {
        match self.mode {
            Mode::Command => format!("COMMAND MODE >>> {}", self.input),
            Mode::Visual(_) => "VISUAL MODE ~~~".to_string(),
        }
    }

    /// Draw the whole screen.
    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let width = box_width(self.battle.roster());

        self.draw_side(frame, Side::Foes, area.y, width);
        let allies_y = area.bottom().saturating_sub(BOX_HEIGHT + 1).max(area.y);
        self.draw_side(frame, Side::Allies, allies_y, width);

        let middle = area.y + area.height / 2;
        let turn = format!(
            "TURN {} ({})",
            self.battle.turn_number(),
            self.battle.current().name
        );
        let turn_row = centered_row(turn.chars().count(), middle.saturating_sub(1), area);
        frame.render_widget(Paragraph::new(turn), turn_row);
        if let Some(message) = self.battle.display() {
            let row = centered_row(message.text.chars().count(), middle, area);
            frame.render_widget(Paragraph::new(message.text.clone()), row);
        }

        if let Mode::Visual(index) = self.mode
            && let Ok(shown) = self.battle.combatant(index)
        {
            self.draw_overlay(frame, index, shown);
        }

        let prompt = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
        frame.render_widget(Paragraph::new(self.status_line()), prompt.intersection(area));
    }

    fn draw_side(&self, frame: &mut Frame, side: Side, y: u16, width: u16) {
        let area = frame.area();
        let indices: Range<usize> = self.battle.side_indices(side);
        let count = u16::try_from(indices.len()).unwrap_or(u16::MAX);
        let gap = area.width.saturating_sub(count.saturating_mul(width)) / (count + 1);

        let mut x = area.x + gap;
        for index in indices {
            let Ok(unit) = self.battle.combatant(index) else {
                continue;
            };
            let title_style = if index == self.selected {
                Style::default().fg(side_color(side))
            } else {
                Style::default()
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .title(Line::from(self.box_title(index)).centered().style(title_style));
            let rect = Rect::new(x, y, width, BOX_HEIGHT).intersection(area);
            let separator = "─".repeat(usize::from(width.saturating_sub(2)));
            let mut lines = vec![Line::from(hp_text(unit)), Line::from(separator)];
            lines.extend(unit.buffs.iter().map(|b| Line::from(buff_text(b))));

            frame.render_widget(Paragraph::new(lines).block(block), rect);
            x = x.saturating_add(width).saturating_add(gap);
        }
    }

    fn draw_overlay(&self, frame: &mut Frame, index: usize, unit: &BattleCharacter) {
        let area = frame.area();
        let rect = Rect::new(
            area.x + OVERLAY_PAD_X,
            area.y + OVERLAY_PAD_Y,
            area.width.saturating_sub(OVERLAY_PAD_X * 2),
            area.height.saturating_sub(OVERLAY_PAD_Y * 2),
        )
        .intersection(area);

        let color = side_color(self.battle.side_of(index));
        let block = Block::default().borders(Borders::ALL).title(
            Line::from(format!("\"{}\" ({index})", unit.name))
                .centered()
                .style(Style::default().fg(color)),
        );

        let lines: Vec<Line> = overlay_lines(unit)
            .into_iter()
            .map(|(heading, text)| {
                if heading {
                    Line::from(text).centered().bold()
                } else {
                    Line::from(text)
                }
            })
            .collect();

        frame.render_widget(Clear, rect);
        frame.render_widget(Paragraph::new(lines).block(block), rect);
    }

    /// Box title for a roster index; the combatant whose turn it is gets
    /// arrows.
    pub fn box_title(&self, index: usize) -> String {
        let name = self
            .battle
            .combatant(index)
            .map(|c| c.name.as_str())
            .unwrap_or("?");
        if index == self.battle.turn() {
            format!("> {index}:{name} <")
        } else {
            format!("{index}:{name}")
        }
    }
}

fn side_color(side: Side) -> Color {
    match side {
        Side::Allies => Color::Green,
        Side::Foes => Color::Red,
    }
}

/// Every box is as wide as the longest title needs.
fn box_width(roster: &[BattleCharacter]) -> u16 {
    let digits = roster.len().to_string().len();
    let longest = roster
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0);
    u16::try_from(longest + 5 + digits + 2).unwrap_or(u16::MAX)
}

fn hp_text(unit: &BattleCharacter) -> String {
    if unit.is_alive() {
        format!("HP:{}", unit.hitpoints)
    } else {
        "!DOWN!".to_string()
    }
}

fn buff_text(buff: &wl_battle::Buff) -> String {
    format!("{}:{}T", buff.name, buff.remaining)
}

/// Inspection content as `(is_heading, text)` rows.
fn overlay_lines(unit: &BattleCharacter) -> Vec<(bool, String)> {
    let mut lines = vec![
        (false, String::new()),
        (true, " STATS ".to_string()),
        (false, format!("HP:{}", unit.hitpoints)),
        (false, String::new()),
        (true, " ACTIVE BUFFS ".to_string()),
    ];
    lines.extend(
        unit.buffs
            .iter()
            .enumerate()
            .map(|(i, b)| (false, format!("{i} - {}", buff_text(b)))),
    );
    lines.push((false, String::new()));
    lines.push((true, " ATTACKS ".to_string()));
    lines.extend(unit.attacks.iter().map(|a| {
        let buff = a.buff.as_ref().map_or("NONE", |b| b.name.as_str());
        (
            false,
            format!("{} ({}/{buff}): '{}'", a.name, a.damage, a.description),
        )
    }));
    lines
}
