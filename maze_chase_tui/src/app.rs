use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use maze_chase_core::{
    Direction,
    agent::{Agent, AgentKind, ProtagonistPreset},
    config::GameConfig,
    encounter::EncounterOutcome,
    level::load_level,
    session::Session,
    timing::MoveGate,
};
use ratatui::crossterm::event::KeyCode;

/// How long the result screen stays up before returning to the menu.
const RESULT_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Play(ProtagonistPreset),
    Controls,
    Help,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 5] = [
        MenuItem::Play(ProtagonistPreset::LukeSkywalker),
        MenuItem::Play(ProtagonistPreset::MasterYoda),
        MenuItem::Controls,
        MenuItem::Help,
        MenuItem::Quit,
    ];

    pub fn label(self) -> String {
        match self {
            MenuItem::Play(preset) => {
                format!("Play as {} ({} health)", preset.name(), preset.max_health())
            }
            MenuItem::Controls => "Controls".to_string(),
            MenuItem::Help => "Help".to_string(),
            MenuItem::Quit => "Quit".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseItem {
    Resume,
    Menu,
    Quit,
}

impl PauseItem {
    pub const ALL: [PauseItem; 3] = [PauseItem::Resume, PauseItem::Menu, PauseItem::Quit];

    pub fn label(self) -> &'static str {
        match self {
            PauseItem::Resume => "Resume",
            PauseItem::Menu => "Back to menu",
            PauseItem::Quit => "Quit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Controls,
    Help,
    Playing,
    Paused,
    Result { victory: bool, since: Instant },
}

/// Presentation state wrapped around the core session.
pub struct App {
    level_path: PathBuf,
    config: GameConfig,
    screen: Screen,
    menu_selected: usize,
    pause_selected: usize,
    session: Option<Session>,
    gate: MoveGate,
    /// Directions pressed since the last movement attempt.
    pending: Vec<Direction>,
    /// Last notable event, shown under the menu or the maze.
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(level_path: PathBuf, config: GameConfig) -> Self {
        let gate = MoveGate::new(config.move_interval());
        App {
            level_path,
            config,
            screen: Screen::Menu,
            menu_selected: 0,
            pause_selected: 0,
            session: None,
            gate,
            pending: Vec::new(),
            status: None,
            should_quit: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn menu_selected(&self) -> usize {
        self.menu_selected
    }

    pub fn pause_selected(&self) -> usize {
        self.pause_selected
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// How long the event loop may block before [`App::update`] has work.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        match self.screen {
            Screen::Playing if !self.pending.is_empty() => self.gate.remaining(now),
            _ => Duration::MAX,
        }
    }

    pub fn on_key(&mut self, key: KeyCode) {
        match self.screen {
            Screen::Menu => self.on_menu_key(key),
            Screen::Controls | Screen::Help => self.screen = Screen::Menu,
            Screen::Playing => self.on_play_key(key),
            Screen::Paused => self.on_pause_key(key),
            Screen::Result { .. } => self.return_to_menu(),
        }
    }

    /// Advances time-driven state: movement ticks and the result screen.
    pub fn update(&mut self, now: Instant) {
        match self.screen {
            Screen::Playing => self.advance(now),
            Screen::Result { since, .. } if now.duration_since(since) >= RESULT_DURATION => {
                self.return_to_menu();
            }
            _ => {}
        }
    }

    fn on_menu_key(&mut self, key: KeyCode) {
        let count = MenuItem::ALL.len();
        match key {
            KeyCode::Up => self.menu_selected = (self.menu_selected + count - 1) % count,
            KeyCode::Down => self.menu_selected = (self.menu_selected + 1) % count,
            KeyCode::Enter => match MenuItem::ALL[self.menu_selected] {
                MenuItem::Play(preset) => self.start_session(preset),
                MenuItem::Controls => self.screen = Screen::Controls,
                MenuItem::Help => self.screen = Screen::Help,
                MenuItem::Quit => self.should_quit = true,
            },
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn on_play_key(&mut self, key: KeyCode) {
        let direction = match key {
            KeyCode::Up | KeyCode::Char('w') => Direction::Up,
            KeyCode::Down | KeyCode::Char('s') => Direction::Down,
            KeyCode::Left | KeyCode::Char('a') => Direction::Left,
            KeyCode::Right | KeyCode::Char('d') => Direction::Right,
            KeyCode::Esc | KeyCode::Char('p') => {
                self.pause_selected = 0;
                self.screen = Screen::Paused;
                return;
            }
            _ => return,
        };
        if !self.pending.contains(&direction) {
            self.pending.push(direction);
        }
    }

    fn on_pause_key(&mut self, key: KeyCode) {
        let count = PauseItem::ALL.len();
        match key {
            KeyCode::Up => self.pause_selected = (self.pause_selected + count - 1) % count,
            KeyCode::Down => self.pause_selected = (self.pause_selected + 1) % count,
            KeyCode::Esc => self.resume(),
            KeyCode::Enter => match PauseItem::ALL[self.pause_selected] {
                PauseItem::Resume => self.resume(),
                PauseItem::Menu => {
                    tracing::info!("session abandoned from pause menu");
                    self.return_to_menu();
                }
                PauseItem::Quit => self.should_quit = true,
            },
            _ => {}
        }
    }

    fn resume(&mut self) {
        self.pending.clear();
        self.screen = Screen::Playing;
    }

    fn start_session(&mut self, preset: ProtagonistPreset) {
        match load_level(&self.level_path, &self.config.layout) {
            Ok(level) => {
                self.session = Some(Session::new(preset, &level));
                self.gate = MoveGate::new(self.config.move_interval());
                self.pending.clear();
                self.status = None;
                self.screen = Screen::Playing;
            }
            Err(err) => {
                tracing::error!(error = %err, "could not start session");
                self.status = Some(format!("Could not start: {err}"));
            }
        }
    }

    fn return_to_menu(&mut self) {
        self.session = None;
        self.status = None;
        self.pending.clear();
        self.screen = Screen::Menu;
    }

    /// One movement attempt once the gate is open and input is waiting.
    fn advance(&mut self, now: Instant) {
        if self.pending.is_empty() || !self.gate.is_open(now) {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            self.return_to_menu();
            return;
        };

        let pressed = std::mem::take(&mut self.pending);
        let (tick, outcome) = session.step(&pressed);
        if !tick.moved {
            return;
        }
        self.gate.record_move(now);

        if outcome.is_terminal() {
            self.screen = Screen::Result {
                victory: outcome == EncounterOutcome::Victorious,
                since: now,
            };
        } else if outcome == EncounterOutcome::Damaged {
            self.status = Some(format!(
                "Caught! Back to the start with {} health.",
                format_health(session.protagonist())
            ));
        }
    }
}

/// Health as `current/max`, with one decimal when a hit can remove half a
/// point.
pub fn format_health(hero: &Agent) -> String {
    let halves = matches!(
        hero.kind(),
        AgentKind::Protagonist(preset) if preset.damage_per_hit().fract() != 0.0
    );
    if halves {
        format!("{:.1}/{:.0}", hero.health(), hero.max_health())
    } else {
        format!("{:.0}/{:.0}", hero.health(), hero.max_health())
    }
}
