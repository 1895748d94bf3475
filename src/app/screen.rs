//! Application screen state management
//!
//! Handles transitions between the application screens:
//! - Main menu and name entry
//! - Playing, with save/load slot pickers and notices on top
//! - Game over and the hi-score table

use std::sync::Arc;

use crate::config::Rules;
use crate::game::validation::ValidationResult;
use crate::game::{Dictionary, Game, SubmitOutcome};
use crate::storage::{HiScore, SlotInfo, Storage, StorageError};
use tracing::warn;

use super::state::App;

/// Longest player name accepted on the name entry screen
pub const MAX_NAME_LEN: usize = 12;

/// Menu option on the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    NewGame,
    LoadGame,
    HiScores,
    Quit,
}

impl MenuOption {
    /// Get all menu options in order
    pub fn all() -> &'static [MenuOption] {
        &[
            MenuOption::NewGame,
            MenuOption::LoadGame,
            MenuOption::HiScores,
            MenuOption::Quit,
        ]
    }

    /// Get the display label for this option
    pub fn label(&self) -> &'static str {
        match self {
            MenuOption::NewGame => "New Game",
            MenuOption::LoadGame => "Load Game",
            MenuOption::HiScores => "Hi-Scores",
            MenuOption::Quit => "Quit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAction {
    Save,
    Load,
}

/// The current application screen
pub enum Screen {
    /// Main menu
    Menu { selected: usize },
    /// Typing the player name before a new game
    NameEntry { input: String },
    /// Playing a session
    Playing { app: Box<App> },
    /// Choosing a save slot. `app` is the session to return to, if any.
    SlotPicker {
        action: SlotAction,
        selected: usize,
        slots: Vec<Option<SlotInfo>>,
        app: Option<Box<App>>,
    },
    /// A message over the running session; any key dismisses it
    Notice { message: String, app: Box<App> },
    /// HP ran out
    GameOver { app: Box<App>, made_table: bool },
    /// The hi-score table
    HiScores { scores: Vec<HiScore> },
    /// Unrecoverable error (storage failures)
    Error { message: String },
}

/// Main application coordinator
pub struct AppCoordinator {
    /// Current screen
    pub screen: Screen,
    /// Whether the application should quit
    pub should_quit: bool,
    storage: Option<Storage>,
    rules: Rules,
    dictionary: Arc<Dictionary>,
    player: String,
}

impl AppCoordinator {
    /// Create a new app coordinator starting at the menu.
    ///
    /// Without storage the game still runs; saving, loading and hi-scores
    /// report that they are unavailable.
    pub fn new(rules: Rules, dictionary: Arc<Dictionary>, storage: Option<Storage>) -> Self {
        let player = std::env::var("USER")
            .unwrap_or_else(|_| "Player".to_string())
            .chars()
            .take(MAX_NAME_LEN)
            .collect::<String>();

        Self {
            screen: Screen::Menu { selected: 0 },
            should_quit: false,
            storage,
            rules,
            dictionary,
            player,
        }
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Go back to the main menu
    pub fn go_to_menu(&mut self) {
        self.screen = Screen::Menu { selected: 0 };
    }

    /// The running session, if the play screen is showing.
    pub fn playing(&mut self) -> Option<&mut App> {
        match &mut self.screen {
            Screen::Playing { app } => Some(&mut **app),
            _ => None,
        }
    }

    /// Handle menu navigation (up)
    pub fn menu_up(&mut self) {
        if let Screen::Menu { selected } = &mut self.screen {
            if *selected > 0 {
                *selected -= 1;
            }
        }
    }

    /// Handle menu navigation (down)
    pub fn menu_down(&mut self) {
        if let Screen::Menu { selected } = &mut self.screen {
            if *selected < MenuOption::all().len() - 1 {
                *selected += 1;
            }
        }
    }

    /// Handle menu selection (Enter)
    pub fn menu_select(&mut self) {
        let selected = match &self.screen {
            Screen::Menu { selected } => *selected,
            _ => return,
        };

        match MenuOption::all()[selected] {
            MenuOption::NewGame => {
                self.screen = Screen::NameEntry {
                    input: self.player.clone(),
                };
            }
            MenuOption::LoadGame => self.open_slot_picker(SlotAction::Load, None),
            MenuOption::HiScores => self.show_hi_scores(),
            MenuOption::Quit => self.quit(),
        }
    }

    /// Name entry character input
    pub fn name_char(&mut self, c: char) {
        if let Screen::NameEntry { input } = &mut self.screen {
            if input.chars().count() < MAX_NAME_LEN && !c.is_control() {
                input.push(c);
            }
        }
    }

    pub fn name_backspace(&mut self) {
        if let Screen::NameEntry { input } = &mut self.screen {
            input.pop();
        }
    }

    /// Finish name entry and start a fresh session. An empty name keeps the
    /// previous one.
    pub fn name_confirm(&mut self) {
        if let Screen::NameEntry { input } = &self.screen {
            let name = input.trim();
            if !name.is_empty() {
                self.player = name.to_string();
            }
            self.start_game();
        }
    }

    /// Start a new session for the current player.
    pub fn start_game(&mut self) {
        let game = Game::new(self.dictionary.clone(), self.rules.clone(), self.player.clone());
        self.screen = Screen::Playing {
            app: Box::new(App::new(game)),
        };
    }

    /// Enter on the play screen. A dictionary miss raises a notice.
    pub fn play_submit(&mut self) {
        let outcome = match self.playing() {
            Some(app) => app.on_submit(),
            None => return,
        };
        if let SubmitOutcome::Rejected {
            word,
            reason: ValidationResult::NotInDictionary,
        } = outcome
        {
            self.show_notice(format!("{} is not a word", word));
        }
    }

    /// Advance a pending resolution by one step and end the game when HP
    /// runs out. Called by the main loop on every resolver step.
    pub fn tick(&mut self) {
        let over = match &mut self.screen {
            Screen::Playing { app } => {
                if app.game().is_resolving() {
                    app.step();
                }
                app.is_over()
            }
            _ => false,
        };
        if over {
            self.finish_game();
        }
    }

    fn finish_game(&mut self) {
        let app = match std::mem::replace(&mut self.screen, Screen::Menu { selected: 0 }) {
            Screen::Playing { app } => app,
            other => {
                self.screen = other;
                return;
            }
        };
        let game = app.game();
        let made_table = match &self.storage {
            Some(storage) => storage
                .record_hi_score(game.player(), game.level(), game.score())
                .unwrap_or_else(|e| {
                    warn!(error = %e, "could not record hi-score");
                    false
                }),
            None => false,
        };
        self.screen = Screen::GameOver { app, made_table };
    }

    /// Show a message over the running session.
    pub fn show_notice(&mut self, message: String) {
        match std::mem::replace(&mut self.screen, Screen::Menu { selected: 0 }) {
            Screen::Playing { app } => self.screen = Screen::Notice { message, app },
            other => self.screen = other,
        }
    }

    /// Return from a notice to the session underneath.
    pub fn dismiss_notice(&mut self) {
        match std::mem::replace(&mut self.screen, Screen::Menu { selected: 0 }) {
            Screen::Notice { app, .. } => self.screen = Screen::Playing { app },
            other => self.screen = other,
        }
    }

    /// F2: pick a slot to save into. Only offered while the board is settled.
    pub fn open_save(&mut self) {
        let settled = match &self.screen {
            Screen::Playing { app } => app.game().accepts_input(),
            _ => return,
        };
        if !settled {
            return;
        }
        let previous = std::mem::replace(&mut self.screen, Screen::Menu { selected: 0 });
        if let Screen::Playing { app } = previous {
            self.open_slot_picker(SlotAction::Save, Some(app));
        }
    }

    /// F3: pick a slot to load, leaving the current session on cancel.
    pub fn open_load(&mut self) {
        let previous = std::mem::replace(&mut self.screen, Screen::Menu { selected: 0 });
        if let Screen::Playing { app } = previous {
            self.open_slot_picker(SlotAction::Load, Some(app));
        }
    }

    fn open_slot_picker(&mut self, action: SlotAction, app: Option<Box<App>>) {
        let slots = match &self.storage {
            Some(storage) => storage.list_slots(),
            None => {
                self.unavailable(app);
                return;
            }
        };
        match slots {
            Ok(slots) => {
                self.screen = Screen::SlotPicker {
                    action,
                    selected: 0,
                    slots,
                    app,
                };
            }
            Err(e) => self.fail(e),
        }
    }

    fn unavailable(&mut self, app: Option<Box<App>>) {
        let message = "Saved games are unavailable".to_string();
        self.screen = match app {
            Some(app) => Screen::Notice { message, app },
            None => Screen::Error { message },
        };
    }

    pub fn slot_up(&mut self) {
        if let Screen::SlotPicker { selected, .. } = &mut self.screen {
            if *selected > 0 {
                *selected -= 1;
            }
        }
    }

    pub fn slot_down(&mut self) {
        if let Screen::SlotPicker { selected, slots, .. } = &mut self.screen {
            if *selected < slots.len().saturating_sub(1) {
                *selected += 1;
            }
        }
    }

    /// Esc in the slot picker: back to the session, or the menu.
    pub fn slot_cancel(&mut self) {
        match std::mem::replace(&mut self.screen, Screen::Menu { selected: 0 }) {
            Screen::SlotPicker { app: Some(app), .. } => self.screen = Screen::Playing { app },
            Screen::SlotPicker { app: None, .. } => {}
            other => self.screen = other,
        }
    }

    /// Delete in the slot picker: empty the highlighted slot and stay.
    pub fn slot_delete(&mut self) {
        let Screen::SlotPicker { selected, .. } = &self.screen else {
            return;
        };
        let slot = *selected as u32;
        let Some(storage) = &self.storage else {
            return;
        };
        match storage.delete_slot(slot).and_then(|()| storage.list_slots()) {
            Ok(fresh) => {
                if let Screen::SlotPicker { slots, .. } = &mut self.screen {
                    *slots = fresh;
                }
            }
            Err(e) => self.fail(e),
        }
    }

    /// Enter in the slot picker.
    pub fn slot_confirm(&mut self) {
        let previous = std::mem::replace(&mut self.screen, Screen::Menu { selected: 0 });
        let (action, selected, app) = match previous {
            Screen::SlotPicker {
                action, selected, app, ..
            } => (action, selected, app),
            other => {
                self.screen = other;
                return;
            }
        };
        let Some(storage) = &self.storage else {
            self.unavailable(app);
            return;
        };
        let slot = selected as u32;

        match (action, app) {
            (SlotAction::Save, Some(app)) => {
                let snapshot = app.game().snapshot();
                match storage.save_slot(slot, &snapshot) {
                    Ok(()) => {
                        self.screen = Screen::Notice {
                            message: format!("Saved to slot {}", slot + 1),
                            app,
                        };
                    }
                    Err(e) => self.fail(e),
                }
            }
            (SlotAction::Save, None) => {}
            (SlotAction::Load, app) => match storage.load_slot(slot) {
                Ok(snapshot) => {
                    let mut game = Game::new(
                        self.dictionary.clone(),
                        self.rules.clone(),
                        snapshot.player.clone(),
                    );
                    game.restore(snapshot);
                    self.player = game.player().to_string();
                    self.screen = Screen::Playing {
                        app: Box::new(App::new(game)),
                    };
                }
                Err(StorageError::EmptySlot { slot }) => {
                    // Nothing to load: stay in the picker.
                    self.screen = match storage.list_slots() {
                        Ok(slots) => Screen::SlotPicker {
                            action: SlotAction::Load,
                            selected: slot as usize,
                            slots,
                            app,
                        },
                        Err(e) => Screen::Error {
                            message: e.to_string(),
                        },
                    };
                }
                Err(e) => self.fail(e),
            },
        }
    }

    fn fail(&mut self, error: StorageError) {
        warn!(error = %error, "storage failure");
        self.screen = Screen::Error {
            message: error.to_string(),
        };
    }

    /// Show the hi-score table.
    pub fn show_hi_scores(&mut self) {
        let scores = match &self.storage {
            Some(storage) => storage.hi_scores(),
            None => {
                self.unavailable(None);
                return;
            }
        };
        match scores {
            Ok(scores) => self.screen = Screen::HiScores { scores },
            Err(e) => self.fail(e),
        }
    }
}
