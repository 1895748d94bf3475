//! Serializable session state for save slots

use std::collections::VecDeque;

use super::board::Board;
use super::resolver::Health;
use super::session::{Game, HistoryEntry, Mode, WordRecord};
use super::tile::Tile;
use serde::{Deserialize, Serialize};

/// Everything needed to resume a session between turns.
///
/// The in-flight event queue is not captured; saves are only offered while
/// the board is settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: String,
    pub score: u64,
    pub level: u32,
    pub exp: u64,
    pub exp_target: u64,
    pub hp: u32,
    pub hp_max: u32,
    pub multiplier: u32,
    pub bonus_word: Option<String>,
    pub bonus_len: usize,
    pub recent: VecDeque<usize>,
    pub history: VecDeque<HistoryEntry>,
    pub longest: Option<String>,
    pub best: Option<WordRecord>,
    pub mode: Mode,
    pub tiles: Vec<Tile>,
}

impl Snapshot {
    pub fn capture(game: &Game) -> Self {
        Self {
            player: game.player.clone(),
            score: game.score,
            level: game.level,
            exp: game.exp,
            exp_target: game.exp_target,
            hp: game.health.hp(),
            hp_max: game.health.hp_max(),
            multiplier: game.multiplier,
            bonus_word: game.bonus_word.clone(),
            bonus_len: game.bonus_len,
            recent: game.recent.clone(),
            history: game.history.clone(),
            longest: game.longest.clone(),
            best: game.best.clone(),
            mode: game.mode,
            tiles: game.board.tiles().to_vec(),
        }
    }

    /// Level at which the best-scoring word was played.
    pub fn level_best(&self) -> u32 {
        self.best.as_ref().map_or(1, |best| best.level)
    }
}

impl Game {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Replace the session with saved state. Dictionary, rules and rng are kept.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.player = snapshot.player;
        self.score = snapshot.score;
        self.level = snapshot.level;
        self.exp = snapshot.exp;
        self.exp_target = snapshot.exp_target;
        self.health = Health::from_parts(snapshot.hp, snapshot.hp_max);
        self.multiplier = snapshot.multiplier;
        self.bonus_word = snapshot.bonus_word;
        self.bonus_len = snapshot.bonus_len;
        self.recent = snapshot.recent;
        self.history = snapshot.history;
        self.longest = snapshot.longest;
        self.best = snapshot.best;
        self.mode = snapshot.mode;
        self.restore_state(Board::from_tiles(snapshot.tiles));
    }
}
