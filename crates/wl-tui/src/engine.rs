//! The frame loop and the campaign around it.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossterm::event::KeyCode;
use tracing::{debug, info};
use wl_battle::Battle;
use wl_core::{ChoiceConsumer, ChoiceMenu, ChoiceProducer, Manager};
use wl_story::{
    Activity, BattleReport, BattleSlot, ChapterRegistry, Launch, Presence, StoryContext,
    StoryError, StoryTask, publish,
};

use crate::config::EngineConfig;
use crate::director::Director;
use crate::error::{EngineError, EngineResult};
use crate::terminal::{self, Tui, is_interrupt, poll_key, refresh_on_resize};
use crate::views::menu::{self, MenuChoice};
use crate::views::{BattleScreen, ChoiceView, HistoryView, choices, dialogue};

/// Where a session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Start {
    /// Show the title screen.
    Menu,
    /// Play from the first chapter.
    NewGame,
    /// Load the save file and resume.
    Continue,
}

/// Owns the shared game state and drives the terminal.
pub struct Engine {
    config: EngineConfig,
    manager: Arc<Manager>,
    choices: Arc<ChoiceMenu>,
    battles: Arc<BattleSlot>,
    presence: Arc<dyn Presence>,
}

impl Engine {
    /// Create an engine over a manager and a presence collaborator.
    pub fn new(config: EngineConfig, manager: Manager, presence: Arc<dyn Presence>) -> Self {
        let manager = manager.with_history_len(config.history_len);
        Self {
            config,
            manager: Arc::new(manager),
            choices: Arc::new(ChoiceMenu::new()),
            battles: Arc::new(BattleSlot::new()),
            presence,
        }
    }

    /// Engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The game state manager.
    pub fn manager(&self) -> &Arc<Manager> {
        &self.manager
    }

    /// A story context sharing this engine's channels.
    pub fn context(&self) -> StoryContext {
        StoryContext::new(
            Arc::clone(&self.manager),
            Arc::clone(&self.choices),
            Arc::clone(&self.battles),
            Arc::clone(&self.presence),
        )
    }

    /// Take over the terminal, play, and give the terminal back.
    ///
    /// The terminal is restored on every exit path, including Ctrl+C and a
    /// failed scene.
    pub fn run(&self, registry: &ChapterRegistry, start: Start) -> EngineResult<()> {
        let mut tui = terminal::setup()?;
        let result = self.session(&mut tui, registry, start);
        terminal::restore(&mut tui);
        result
    }

    fn session(&self, tui: &mut Tui, registry: &ChapterRegistry, start: Start) -> EngineResult<()> {
        let resume = match start {
            Start::NewGame => false,
            Start::Continue => true,
            Start::Menu => match self.main_menu(tui)? {
                MenuChoice::NewGame => false,
                MenuChoice::LoadGame => true,
                MenuChoice::Quit => return Ok(()),
            },
        };
        tui.clear()?;
        self.campaign(tui, registry, resume)
    }

    /// Build the list of scenes to play, loading the save first when
    /// resuming.
    pub fn plan(&self, registry: &ChapterRegistry, resume: bool) -> EngineResult<Vec<Launch>> {
        if !resume {
            return Ok(registry.playlist(None)?);
        }
        self.manager.load()?;
        let section = self.manager.section();
        Ok(registry.playlist(section.position())?)
    }

    fn campaign(&self, tui: &mut Tui, registry: &ChapterRegistry, resume: bool) -> EngineResult<()> {
        for launch in self.plan(registry, resume)? {
            info!(chapter = launch.number, title = %launch.chapter, section = ?launch.section, "launching chapter");
            publish(
                self.presence.as_ref(),
                &Activity::chapter(launch.number, &launch.chapter, launch.is_resume()),
            );
            let ctx = self.context().in_chapter(launch.number, &launch.chapter);
            let task = StoryTask::spawn(launch.thread_name(), launch.scene, ctx)?;
            self.play_chapter(tui, task)?;
            tui.clear()?;
        }
        info!("campaign finished");
        Ok(())
    }

    fn main_menu(&self, tui: &mut Tui) -> EngineResult<MenuChoice> {
        publish(self.presence.as_ref(), &Activity::menu());
        self.choices.set_choices(MenuChoice::entries()).map_err(StoryError::from)?;
        let mut chooser = ChoiceView::default();
        let mut size = tui.size()?;

        loop {
            refresh_on_resize(tui, &mut size)?;
            if let Some(key) = poll_key()? {
                if is_interrupt(&key) {
                    return Err(EngineError::Interrupted);
                }
                let picked = key.code == KeyCode::Enter;
                if chooser.handle_key(&key, self.choices.as_ref()) && picked {
                    let id = self.choices.wait_choice();
                    if let Some(choice) = MenuChoice::from_id(&id) {
                        debug!(?choice, "main menu");
                        return Ok(choice);
                    }
                }
            }

            let entries = self.choices.entries();
            tui.draw(|frame| menu::draw(frame, &entries, chooser.highlighted()))?;
            thread::sleep(self.config.battle_frame_interval());
        }
    }

    /// Run frames until the scene ends, then surface its result.
    fn play_chapter(&self, tui: &mut Tui, task: StoryTask) -> EngineResult<()> {
        let mut director = Director::new(self.config.reveal_interval(), Instant::now());
        let mut chooser = ChoiceView::default();
        let mut size = tui.size()?;

        loop {
            if task.is_finished() {
                info!(story = %task.name(), "waiting on chapter to close");
                task.join()?;
                return Ok(());
            }
            refresh_on_resize(tui, &mut size)?;

            if let Some(key) = poll_key()? {
                if is_interrupt(&key) {
                    return Err(EngineError::Interrupted);
                }
                if !chooser.handle_key(&key, self.choices.as_ref()) {
                    match key.code {
                        KeyCode::Enter => director.acknowledge(),
                        KeyCode::Char('h' | 'H') => {
                            debug!("opening history");
                            self.history(tui)?;
                            tui.clear()?;
                        }
                        _ => {}
                    }
                }
            }

            if let Some(battle) = self.battles.take_request() {
                tui.clear()?;
                let report = self.fight(tui, battle)?;
                debug!(outcome = ?report.outcome, "battle over");
                self.battles.finish(report);
                tui.clear()?;
            }

            if self.choices.take_clear_request() {
                chooser.sync(self.choices.as_ref());
                tui.clear()?;
            }

            let shown = director.frame(&self.manager, Instant::now());
            let entries = self.choices.entries();
            tui.draw(|frame| {
                dialogue::draw(frame, shown.as_ref());
                choices::draw(frame, &entries, chooser.highlighted());
            })?;

            thread::sleep(self.config.frame_interval());
        }
    }

    /// The history modal; returns on Esc.
    fn history(&self, tui: &mut Tui) -> EngineResult<()> {
        let mut view = HistoryView::default();
        tui.clear()?;
        loop {
            if let Some(key) = poll_key()? {
                if is_interrupt(&key) {
                    return Err(EngineError::Interrupted);
                }
                if view.handle_key(&key) {
                    return Ok(());
                }
            }
            let entries = self.manager.history();
            tui.draw(|frame| view.draw(frame, &entries))?;
            thread::sleep(self.config.battle_frame_interval());
        }
    }

    /// The battle modal; returns once a side is wiped out.
    fn fight(&self, tui: &mut Tui, mut battle: Battle) -> EngineResult<BattleReport> {
        if let Some(seed) = self.config.seed {
            battle.reseed(seed);
        }
        info!(combatants = battle.roster().len(), "battle started");
        let mut screen = BattleScreen::new(battle);
        let mut size = tui.size()?;
        let mut last = Instant::now();

        loop {
            refresh_on_resize(tui, &mut size)?;
            if let Some(key) = poll_key()? {
                if is_interrupt(&key) {
                    return Err(EngineError::Interrupted);
                }
                screen.handle_key(&key);
            }

            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f64();
            last = now;
            if let Some(outcome) = screen.tick(dt) {
                info!(?outcome, "battle finished");
                return Ok(screen.into_report(outcome));
            }

            tui.draw(|frame| screen.draw(frame))?;
            thread::sleep(self.config.battle_frame_interval());
        }
    }
}
