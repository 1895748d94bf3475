//! booksnek - a hex-grid word game for the terminal
//!
//! Spell words by snaking through adjacent tiles. Long words spawn helpful
//! tiles; short ones let attackers and poison creep in.

mod app;
mod config;
mod game;
mod storage;
mod tui;

use anyhow::{Context, Result};
use app::{AppCoordinator, Screen};
use config::Rules;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use game::Dictionary;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use storage::Storage;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tui::Tui;

fn main() -> Result<()> {
    init_logging();

    let rules = Rules::load().context("loading rules")?;
    let storage = match Storage::open() {
        Ok(storage) => Some(storage.with_limits(rules.save_slots, rules.hi_score_len)),
        Err(e) => {
            warn!(error = %e, "storage unavailable; saves and hi-scores disabled");
            None
        }
    };
    let dictionary = Dictionary::load_or_embedded(rules.dictionary.as_deref())
        .context("loading dictionary")?;
    let step = Duration::from_millis(rules.step_ms.max(1));
    let mut coordinator = AppCoordinator::new(rules, dictionary, storage);
    info!("booksnek started");

    let mut terminal = Tui::new()?;
    terminal.enter()?;

    let mut board: Option<Rect> = None;
    let mut last_step = Instant::now();

    loop {
        terminal.draw(|frame| board = tui::render(frame, &coordinator))?;

        let timeout = step.checked_sub(last_step.elapsed()).unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                // Only handle key press events (not release)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(&mut coordinator, key);
                }
                Event::Mouse(mouse) => handle_mouse(&mut coordinator, mouse, board),
                _ => {}
            }
        }

        // The resolver plays one batch per step
        if last_step.elapsed() >= step {
            coordinator.tick();
            last_step = Instant::now();
        }

        if coordinator.should_quit {
            break;
        }
    }

    info!("booksnek exiting");
    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}

/// Log to a file in the data directory; the terminal belongs to the UI.
fn init_logging() {
    let Ok(dir) = Storage::data_dir() else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(log_file) = std::fs::File::create(dir.join("booksnek.log")) else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();
}

fn handle_key(coordinator: &mut AppCoordinator, key: KeyEvent) {
    match coordinator.screen {
        Screen::Menu { .. } => match key.code {
            KeyCode::Up => coordinator.menu_up(),
            KeyCode::Down => coordinator.menu_down(),
            KeyCode::Enter => coordinator.menu_select(),
            KeyCode::Esc => coordinator.quit(),
            _ => {}
        },
        Screen::NameEntry { .. } => match key.code {
            KeyCode::Enter => coordinator.name_confirm(),
            KeyCode::Backspace => coordinator.name_backspace(),
            KeyCode::Esc => coordinator.go_to_menu(),
            KeyCode::Char(c) => coordinator.name_char(c),
            _ => {}
        },
        Screen::Playing { .. } => handle_play_key(coordinator, key),
        Screen::SlotPicker { .. } => match key.code {
            KeyCode::Up => coordinator.slot_up(),
            KeyCode::Down => coordinator.slot_down(),
            KeyCode::Enter => coordinator.slot_confirm(),
            KeyCode::Delete => coordinator.slot_delete(),
            KeyCode::Esc => coordinator.slot_cancel(),
            _ => {}
        },
        Screen::Notice { .. } => coordinator.dismiss_notice(),
        Screen::GameOver { .. } => match key.code {
            KeyCode::Enter => coordinator.show_hi_scores(),
            KeyCode::Esc => coordinator.go_to_menu(),
            _ => {}
        },
        Screen::HiScores { .. } | Screen::Error { .. } => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                coordinator.go_to_menu();
            }
        }
    }
}

fn handle_play_key(coordinator: &mut AppCoordinator, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => return coordinator.go_to_menu(),
        KeyCode::Enter => return coordinator.play_submit(),
        KeyCode::F(2) => return coordinator.open_save(),
        KeyCode::F(3) => return coordinator.open_load(),
        _ => {}
    }
    let Some(app) = coordinator.playing() else {
        return;
    };
    match key.code {
        KeyCode::Backspace => app.on_backspace(),
        KeyCode::Delete => app.on_clear_selection(),
        KeyCode::Up => app.move_cursor(0, -1),
        KeyCode::Down => app.move_cursor(0, 1),
        KeyCode::Left => app.move_cursor(-1, 0),
        KeyCode::Right => app.move_cursor(1, 0),
        KeyCode::Char(' ') => app.on_select_cursor(),
        // Shift + letter arrives as the uppercase letter
        KeyCode::Char(c) if c.is_ascii_uppercase() => app.on_highlight(c),
        KeyCode::Char('m') => app.on_mark(),
        KeyCode::Char('u') => app.on_clear_marks(),
        KeyCode::Char('s') => app.on_scramble(),
        _ => {}
    }
}

/// Left click selects a tile. Right click trims the snake back to a selected
/// tile, or marks any other.
fn handle_mouse(coordinator: &mut AppCoordinator, mouse: MouseEvent, board: Option<Rect>) {
    let Some(board) = board else {
        return;
    };
    let Some(pos) = tui::tile_at(board, mouse.column, mouse.row) else {
        return;
    };
    let Some(app) = coordinator.playing() else {
        return;
    };
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.on_click(pos),
        MouseEventKind::Down(MouseButton::Right) => app.on_secondary_click(pos),
        _ => {}
    }
}
