//! Game session controller
//!
//! `Game` owns the board and everything that changes as words are played.
//! A valid submission builds an [`EventQueue`]; the caller then drives it
//! with [`Game::advance`] (one batch per call) until it reports
//! [`StepOutcome::Settled`]. Selection, marking, submission and scramble
//! are all refused while a queue is pending.

use std::collections::VecDeque;
use std::sync::Arc;

use super::board::Board;
use super::dictionary::Dictionary;
use super::events::build_queue;
use super::resolver::{BatchReport, EventQueue, Health, Origin};
use super::snake::{Snake, SnakeChange};
use super::spawner;
use super::tile::{TileId, TileKind};
use super::validation::{validate_word, ValidationResult};
use crate::config::Rules;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Play,
    GameOver,
}

/// Color annotation for one letter of a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterTag {
    Plain,
    Bonus,
    Attack,
    Heal,
    Gold,
    Poison,
    Silver,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub word: String,
    pub score: u64,
    /// One tag per spelled letter.
    pub tags: Vec<LetterTag>,
}

/// A notable word and the session state it was played in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub word: String,
    pub score: u64,
    pub level: u32,
    pub multiplier: u32,
}

/// HUD preview of the word being built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Preview {
    pub word: String,
    pub score: u64,
    pub in_dictionary: bool,
    pub bonus: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Word scored; a resolution is now pending.
    Accepted {
        word: String,
        score: u64,
        bonus: bool,
        levels_gained: u32,
    },
    /// Word refused; nothing on the board changed.
    Rejected {
        word: String,
        reason: ValidationResult,
    },
    /// Input is locked (resolving or game over).
    Locked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing pending.
    Idle,
    /// One batch was played.
    Batch(BatchReport),
    /// The queue drained and the board refilled.
    Settled { spawned: Option<TileId> },
}

pub struct Game {
    pub(super) board: Board,
    pub(super) snake: Snake,
    dictionary: Arc<Dictionary>,
    rules: Rules,
    rng: StdRng,
    pub(super) player: String,
    pub(super) score: u64,
    pub(super) level: u32,
    pub(super) exp: u64,
    pub(super) exp_target: u64,
    pub(super) multiplier: u32,
    pub(super) health: Health,
    pub(super) bonus_word: Option<String>,
    pub(super) bonus_len: usize,
    pub(super) history: VecDeque<HistoryEntry>,
    pub(super) recent: VecDeque<usize>,
    pub(super) longest: Option<String>,
    pub(super) best: Option<WordRecord>,
    pub(super) mode: Mode,
    pending: Option<EventQueue>,
}

impl Game {
    /// Start a session seeded from the OS.
    pub fn new(dictionary: Arc<Dictionary>, rules: Rules, player: impl Into<String>) -> Self {
        Self::from_rng(dictionary, rules, player, StdRng::from_os_rng())
    }

    /// Start a reproducible session.
    pub fn with_seed(
        dictionary: Arc<Dictionary>,
        rules: Rules,
        player: impl Into<String>,
        seed: u64,
    ) -> Self {
        Self::from_rng(dictionary, rules, player, StdRng::seed_from_u64(seed))
    }

    fn from_rng(
        dictionary: Arc<Dictionary>,
        rules: Rules,
        player: impl Into<String>,
        mut rng: StdRng,
    ) -> Self {
        let board = Board::generate(1, &mut rng);
        let mut game = Self {
            board,
            snake: Snake::new(),
            health: Health::new(rules.starting_hp),
            dictionary,
            rng,
            player: player.into(),
            score: 0,
            level: 1,
            exp: 0,
            exp_target: rules.exp_increment.max(1),
            multiplier: 1,
            bonus_word: None,
            bonus_len: rules.bonus_start_len,
            history: VecDeque::new(),
            recent: VecDeque::new(),
            longest: None,
            best: None,
            mode: Mode::Play,
            pending: None,
            rules,
        };
        game.choose_bonus_word();
        game
    }

    /// Reset everything but the player name.
    pub fn new_game(&mut self) {
        self.board = Board::generate(1, &mut self.rng);
        self.snake.clear();
        self.health = Health::new(self.rules.starting_hp);
        self.score = 0;
        self.level = 1;
        self.exp = 0;
        self.exp_target = self.rules.exp_increment.max(1);
        self.multiplier = 1;
        self.bonus_len = self.rules.bonus_start_len;
        self.history.clear();
        self.recent.clear();
        self.longest = None;
        self.best = None;
        self.mode = Mode::Play;
        self.pending = None;
        self.choose_bonus_word();
        info!(player = %self.player, "new game");
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn exp(&self) -> u64 {
        self.exp
    }

    pub fn exp_target(&self) -> u64 {
        self.exp_target
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn bonus_word(&self) -> Option<&str> {
        self.bonus_word.as_deref()
    }

    pub fn bonus_len(&self) -> usize {
        self.bonus_len
    }

    pub fn history(&self) -> &VecDeque<HistoryEntry> {
        &self.history
    }

    /// Tile counts of the most recent words, oldest first.
    pub fn recent_lengths(&self) -> &VecDeque<usize> {
        &self.recent
    }

    pub fn longest(&self) -> Option<&str> {
        self.longest.as_deref()
    }

    pub fn best(&self) -> Option<&WordRecord> {
        self.best.as_ref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_resolving(&self) -> bool {
        self.pending.is_some()
    }

    /// Batches still waiting to fire.
    pub fn pending(&self) -> Option<&EventQueue> {
        self.pending.as_ref()
    }

    /// Whether the player may touch the board.
    pub fn accepts_input(&self) -> bool {
        self.mode == Mode::Play && self.pending.is_none()
    }

    pub fn try_select(&mut self, id: TileId) -> SnakeChange {
        if !self.accepts_input() {
            return SnakeChange::Ignored;
        }
        self.snake.try_add(id, &self.board)
    }

    pub fn try_trim(&mut self, id: TileId) -> SnakeChange {
        if !self.accepts_input() {
            return SnakeChange::Ignored;
        }
        self.snake.trim_to(id)
    }

    /// Drop the last selected tile.
    pub fn backspace(&mut self) -> Option<TileId> {
        if !self.accepts_input() {
            return None;
        }
        self.snake.pop()
    }

    pub fn clear_selection(&mut self) {
        if self.accepts_input() {
            self.snake.clear();
        }
    }

    /// Toggle the player's mark on a tile. Stone tiles cannot be marked.
    pub fn try_mark(&mut self, id: TileId) -> bool {
        if !self.accepts_input() || !self.board.tile(id).is_selectable() {
            return false;
        }
        self.board.tile_mut(id).toggle_mark();
        true
    }

    pub fn clear_marks(&mut self) {
        if self.accepts_input() {
            self.board.clear_marks();
        }
    }

    /// Score a word would earn from the current snake.
    fn word_score(&self, word: &str) -> u64 {
        let points: u64 = self
            .snake
            .tiles()
            .iter()
            .map(|id| u64::from(self.board.tile(*id).point_value()))
            .sum();
        points * word.chars().count() as u64
    }

    pub fn preview(&self) -> Preview {
        let word = self.snake.word(&self.board);
        if word.is_empty() {
            return Preview::default();
        }
        Preview {
            score: self.word_score(&word),
            in_dictionary: validate_word(&word, &self.dictionary).is_valid(),
            bonus: self.bonus_word.as_deref() == Some(word.as_str()),
            word,
        }
    }

    /// Submit the current snake as a word.
    ///
    /// A valid word scores immediately (with the multiplier in effect
    /// before any bonus bump) and queues its board effects. A dictionary
    /// miss clears the snake and changes nothing else.
    pub fn try_submit(&mut self) -> SubmitOutcome {
        if !self.accepts_input() {
            return SubmitOutcome::Locked;
        }
        let Some(word) = self.snake.submit(&self.board) else {
            let word = self.snake.word(&self.board);
            let reason = ValidationResult::TooShort {
                length: word.chars().count(),
            };
            debug!(%word, ?reason, "word rejected");
            if self.snake.len() == 1 {
                self.snake.clear();
            }
            return SubmitOutcome::Rejected { word, reason };
        };
        let reason = validate_word(&word, &self.dictionary);
        if !reason.is_valid() {
            debug!(%word, ?reason, "word rejected");
            self.snake.clear();
            return SubmitOutcome::Rejected { word, reason };
        }

        let bonus = self.bonus_word.as_deref() == Some(word.as_str());
        let score = self.word_score(&word);
        let length = self.snake.len();

        self.commit_to_history(&word, score, bonus);
        self.score += score;
        self.update_records(&word, score);
        let levels_gained = self.gain_exp(score);
        info!(%word, score, total = self.score, bonus, "word scored");

        if bonus {
            self.multiplier_up();
        }

        let batches = build_queue(self.snake.tiles(), &self.board, bonus);
        self.pending = Some(EventQueue::new(batches, Origin::Word { length }));

        SubmitOutcome::Accepted {
            word,
            score,
            bonus,
            levels_gained,
        }
    }

    /// Run the board's hazards without a word, then reroll the letters.
    pub fn scramble(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.snake.clear();
        let batches = build_queue(&[], &self.board, false);
        self.pending = Some(EventQueue::new(batches, Origin::Scramble));
        info!("scramble");
        true
    }

    /// Play the next batch, or settle the board once the queue is empty.
    pub fn advance(&mut self) -> StepOutcome {
        let Some(queue) = self.pending.as_mut() else {
            return StepOutcome::Idle;
        };
        if let Some(report) =
            queue.execute_next_batch(
                &mut self.board,
                &mut self.health,
                self.multiplier,
                &mut self.rng,
            )
        {
            if self.mode == Mode::Play && self.health.is_dead() {
                self.mode = Mode::GameOver;
                info!(score = self.score, level = self.level, "game over");
            }
            return StepOutcome::Batch(report);
        }
        let origin = queue.origin();
        self.pending = None;
        let spawned = self.settle(origin);
        StepOutcome::Settled { spawned }
    }

    /// Drive the pending resolution to completion.
    pub fn resolve_all(&mut self) -> Vec<StepOutcome> {
        let mut steps = Vec::new();
        while self.pending.is_some() {
            steps.push(self.advance());
        }
        steps
    }

    fn settle(&mut self, origin: Origin) -> Option<TileId> {
        let returned = self.board.repopulate();
        self.board.unpause_all();
        self.snake.clear();
        let spawned = match origin {
            Origin::Word { length } => {
                spawner::roll_special(&self.rules, length, &self.recent, &mut self.rng).and_then(
                    |kind| {
                        spawner::promote_one(
                            &mut self.board,
                            &returned,
                            kind,
                            &self.rules,
                            &mut self.rng,
                        )
                    },
                )
            }
            Origin::Scramble => {
                for id in self.board.ids().collect::<Vec<_>>() {
                    let tile = self.board.tile_mut(id);
                    if tile.kind() == TileKind::Normal && !tile.marked() {
                        tile.choose_letter(&mut self.rng);
                    }
                }
                spawner::spawn_top_row_attack(&mut self.board, &self.rules, &mut self.rng)
            }
        };
        debug!(returned = returned.len(), ?spawned, "board settled");
        spawned
    }

    fn commit_to_history(&mut self, word: &str, score: u64, bonus: bool) {
        let mut tags = Vec::with_capacity(word.len());
        for id in self.snake.tiles() {
            let tile = self.board.tile(*id);
            let tag = match tile.kind() {
                TileKind::Attack => LetterTag::Attack,
                TileKind::Heal => LetterTag::Heal,
                TileKind::Gold => LetterTag::Gold,
                TileKind::Poison => LetterTag::Poison,
                TileKind::Silver => LetterTag::Silver,
                TileKind::Normal | TileKind::Stone if bonus => LetterTag::Bonus,
                TileKind::Normal | TileKind::Stone => LetterTag::Plain,
            };
            tags.extend(std::iter::repeat(tag).take(tile.spelling().len()));
        }
        self.history.push_back(HistoryEntry {
            word: word.to_string(),
            score,
            tags,
        });
        while self.history.len() > self.rules.history_len {
            self.history.pop_front();
        }
        self.recent.push_back(self.snake.len());
        while self.recent.len() > self.rules.rolling_window {
            self.recent.pop_front();
        }
    }

    fn update_records(&mut self, word: &str, score: u64) {
        let longer = self
            .longest
            .as_ref()
            .map_or(true, |longest| word.len() > longest.len());
        if longer {
            self.longest = Some(word.to_string());
        }
        let better = self.best.as_ref().map_or(true, |best| score > best.score);
        if better {
            self.best = Some(WordRecord {
                word: word.to_string(),
                score,
                level: self.level,
                multiplier: self.multiplier,
            });
        }
    }

    /// Add EXP and apply every level-up it pays for.
    fn gain_exp(&mut self, amount: u64) -> u32 {
        self.exp += amount;
        let mut gained = 0;
        while self.exp >= self.exp_target {
            self.exp -= self.exp_target;
            self.exp_target += u64::from(self.level) * self.rules.exp_increment;
            self.level += 1;
            let lo = self.rules.level_buff_min.min(self.rules.level_buff_max);
            let hi = self.rules.level_buff_min.max(self.rules.level_buff_max);
            let buff = self.rng.random_range(lo..=hi);
            self.health.buff(buff);
            info!(level = self.level, buff, hp_max = self.health.hp_max(), "level up");
            gained += 1;
        }
        gained
    }

    fn multiplier_up(&mut self) {
        self.multiplier += 1;
        self.bonus_len += 1;
        self.choose_bonus_word();
        self.board.apply_multiplier(self.multiplier);
        info!(multiplier = self.multiplier, next = ?self.bonus_word, "bonus word matched");
    }

    fn choose_bonus_word(&mut self) {
        let threshold = self.rules.bonus_threshold(self.bonus_len);
        self.bonus_word = self
            .dictionary
            .choose_bonus_word(self.bonus_len, threshold, &mut self.rng);
        debug!(bonus = ?self.bonus_word, "bonus word chosen");
    }

    /// Rebuild the session from saved state. The pending queue, snake and
    /// rng are not part of a save.
    pub(super) fn restore_state(&mut self, board: Board) {
        self.board = board;
        self.snake.clear();
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::topology::Pos;

    fn game_with(letters: &str) -> Game {
        let mut game = Game::with_seed(Dictionary::embedded(), Rules::default(), "tester", 21);
        game.board = Board::from_letters(letters);
        game.bonus_word = Some("DOG".to_string());
        game
    }

    fn at(game: &Game, col: i32, row: i32) -> TileId {
        game.board().id_at(Pos::new(col, row)).unwrap()
    }

    fn select(game: &mut Game, cells: &[(i32, i32)]) {
        for &(col, row) in cells {
            let id = at(game, col, row);
            game.try_select(id);
        }
    }

    // C0R0 = C, C0R1 = A, C1R0 = T
    const CAT_BOARD: &str = "CAEEEEEET";

    #[test]
    fn test_simple_word_scenario() {
        let mut game = game_with(CAT_BOARD);
        select(&mut game, &[(0, 0), (0, 1), (1, 0)]);
        assert_eq!(game.snake().len(), 3);

        let outcome = game.try_submit();
        assert_eq!(
            outcome,
            SubmitOutcome::Accepted {
                word: "CAT".to_string(),
                score: (3 + 1 + 1) * 3,
                bonus: false,
                levels_gained: 0,
            }
        );
        assert!(game.is_resolving());

        let steps = game.resolve_all();
        assert!(matches!(steps.last(), Some(StepOutcome::Settled { .. })));
        assert_eq!(game.score(), 15);
        assert_eq!(game.health().hp(), 15);
        assert!(game.snake().is_empty());
        assert!(!game.board().any_paused());
        // At most the one probabilistic spawn: a 3-tile word guarantees nothing.
        assert_eq!(game.board().ids_of_kind(TileKind::Silver).len(), 0);
        for pos in crate::game::topology::positions() {
            assert!(game.board().id_at(pos).is_some());
        }
        assert_eq!(game.history().back().unwrap().word, "CAT");
        assert_eq!(game.recent_lengths().back(), Some(&3));
    }

    #[test]
    fn test_invalid_word_changes_nothing() {
        let mut game = game_with("CTEEEEEEA");
        let board_before = game.board().clone();
        select(&mut game, &[(0, 0), (0, 1), (1, 0)]);
        let outcome = game.try_submit();
        assert!(matches!(
            outcome,
            SubmitOutcome::Rejected {
                reason: ValidationResult::NotInDictionary,
                ..
            }
        ));
        assert!(game.snake().is_empty());
        assert_eq!(game.board(), &board_before);
        assert_eq!(game.score(), 0);
        assert_eq!(game.health().hp(), 15);
        assert!(!game.is_resolving());
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_short_snake_is_kept() {
        let mut game = game_with(CAT_BOARD);
        select(&mut game, &[(0, 0), (0, 1)]);
        assert!(matches!(
            game.try_submit(),
            SubmitOutcome::Rejected {
                reason: ValidationResult::TooShort { length: 2 },
                ..
            }
        ));
        assert_eq!(game.snake().len(), 2);
    }

    #[test]
    fn test_qu_pair_reaches_dictionary_check() {
        let mut game = game_with("QZ");
        select(&mut game, &[(0, 0), (0, 1)]);
        assert_eq!(
            game.try_submit(),
            SubmitOutcome::Rejected {
                word: "QUZ".to_string(),
                reason: ValidationResult::NotInDictionary,
            }
        );
        assert!(game.snake().is_empty());

        select(&mut game, &[(0, 1)]);
        assert!(matches!(
            game.try_submit(),
            SubmitOutcome::Rejected {
                reason: ValidationResult::TooShort { length: 1 },
                ..
            }
        ));
        assert!(game.snake().is_empty());
    }

    #[test]
    fn test_input_locked_while_resolving() {
        let mut game = game_with(CAT_BOARD);
        select(&mut game, &[(0, 0), (0, 1), (1, 0)]);
        game.try_submit();
        let other = at(&game, 4, 4);
        assert_eq!(game.try_select(other), SnakeChange::Ignored);
        assert_eq!(game.try_submit(), SubmitOutcome::Locked);
        assert!(!game.scramble());
        assert!(!game.try_mark(other));
        game.resolve_all();
        assert_eq!(game.try_select(other), SnakeChange::Started);
    }

    #[test]
    fn test_bonus_word_raises_multiplier() {
        let mut game = game_with(CAT_BOARD);
        game.bonus_word = Some("CAT".to_string());
        select(&mut game, &[(0, 0), (0, 1), (1, 0)]);
        let outcome = game.try_submit();
        assert!(matches!(
            outcome,
            SubmitOutcome::Accepted {
                score: 15,
                bonus: true,
                ..
            }
        ));
        assert_eq!(game.multiplier(), 2);
        assert_eq!(game.bonus_len(), 4);
        assert_eq!(game.bonus_word().map(str::len), Some(4));
        let entry = game.history().back().unwrap();
        assert!(entry.tags.iter().all(|t| *t == LetterTag::Bonus));

        game.resolve_all();
        let normal = at(&game, 3, 3);
        assert_eq!(game.board().tile(normal).multiplier(), 2);
    }

    #[test]
    fn test_multiplier_scales_score_and_preview() {
        let mut game = game_with(CAT_BOARD);
        game.bonus_word = None;
        game.multiplier = 2;
        game.board.apply_multiplier(2);
        select(&mut game, &[(0, 0), (0, 1), (1, 0)]);

        let preview = game.preview();
        assert_eq!(preview.word, "CAT");
        assert_eq!(preview.score, 30);

        let outcome = game.try_submit();
        assert!(matches!(outcome, SubmitOutcome::Accepted { score: 30, .. }));
        assert_eq!(game.score(), 30);
    }

    #[test]
    fn test_level_up_buffs_health() {
        let mut game = game_with(CAT_BOARD);
        game.exp_target = 10;
        select(&mut game, &[(0, 0), (0, 1), (1, 0)]);
        let outcome = game.try_submit();
        assert!(matches!(outcome, SubmitOutcome::Accepted { levels_gained: 1, .. }));
        assert_eq!(game.level(), 2);
        assert_eq!(game.exp(), 5);
        assert_eq!(game.exp_target(), 110);
        let hp_max = game.health().hp_max();
        assert!((16..=18).contains(&hp_max));
        assert_eq!(game.health().hp(), hp_max);
    }

    #[test]
    fn test_five_tile_word_spawns_silver() {
        // Column 0 spells STONE
        let mut game = game_with("STONE");
        select(&mut game, &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]);
        assert!(matches!(game.try_submit(), SubmitOutcome::Accepted { .. }));
        let steps = game.resolve_all();
        let Some(StepOutcome::Settled { spawned: Some(id) }) = steps.last() else {
            panic!("expected a spawned tile, got {:?}", steps.last());
        };
        assert_eq!(game.board().tile(*id).kind(), TileKind::Silver);
        assert_eq!(game.board().tile(*id).pos().col, 0);
        assert!(game.board().tile(*id).pos().row < 5);
    }

    #[test]
    fn test_attack_can_end_the_game() {
        let mut game = game_with(CAT_BOARD);
        let attack = at(&game, 4, 4);
        game.board.tile_mut(attack).promote(TileKind::Attack, 1);
        game.board.tile_mut(attack).set_first_turn(false);
        game.health = Health::from_parts(1, 15);

        assert!(game.scramble());
        game.resolve_all();
        assert_eq!(game.health().hp(), 0);
        assert_eq!(game.mode(), Mode::GameOver);
        assert!(!game.accepts_input());
    }

    #[test]
    fn test_scramble_keeps_marked_letters() {
        let mut game = game_with("");
        let marked = at(&game, 3, 3);
        assert!(game.try_mark(marked));
        let letters_before: Vec<char> = game.board().tiles().iter().map(|t| t.letter()).collect();

        assert!(game.scramble());
        let steps = game.resolve_all();
        assert_eq!(steps.len(), 1);

        assert_eq!(game.board().tile(marked).letter(), 'E');
        assert!(game.board().tile(marked).marked());
        let letters_after: Vec<char> = game.board().tiles().iter().map(|t| t.letter()).collect();
        assert_ne!(letters_before, letters_after);
        let attacks = game.board().ids_of_kind(TileKind::Attack);
        assert_eq!(attacks.len(), 1);
        assert_eq!(game.board().tile(attacks[0]).pos().row, 0);
    }

    #[test]
    fn test_history_is_bounded() {
        let rules = Rules {
            history_len: 2,
            ..Rules::default()
        };
        let mut game = Game::with_seed(Dictionary::embedded(), rules, "tester", 3);
        for _ in 0..4 {
            game.board = Board::from_letters(CAT_BOARD);
            game.bonus_word = None;
            select(&mut game, &[(0, 0), (0, 1), (1, 0)]);
            assert!(matches!(game.try_submit(), SubmitOutcome::Accepted { .. }));
            game.resolve_all();
        }
        assert_eq!(game.history().len(), 2);
        assert_eq!(game.recent_lengths().len(), 4);
        assert_eq!(game.score(), 60);
    }

    #[test]
    fn test_records_track_longest_and_best() {
        let mut game = game_with("STONE");
        select(&mut game, &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]);
        game.try_submit();
        game.resolve_all();
        assert_eq!(game.longest(), Some("STONE"));
        let best = game.best().unwrap();
        assert_eq!(best.word, "STONE");
        assert_eq!(best.level, 1);
        assert_eq!(best.multiplier, 1);
    }

    #[test]
    fn test_preview() {
        let mut game = game_with(CAT_BOARD);
        assert_eq!(game.preview(), Preview::default());
        select(&mut game, &[(0, 0), (0, 1), (1, 0)]);
        let preview = game.preview();
        assert_eq!(preview.word, "CAT");
        assert_eq!(preview.score, 15);
        assert!(preview.in_dictionary);
        assert!(!preview.bonus);
    }

    #[test]
    fn test_new_game_resets_session() {
        let mut game = game_with(CAT_BOARD);
        select(&mut game, &[(0, 0), (0, 1), (1, 0)]);
        game.try_submit();
        game.resolve_all();
        game.new_game();
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), 1);
        assert!(game.history().is_empty());
        assert_eq!(game.player(), "tester");
        assert_eq!(game.bonus_word().map(str::len), Some(3));
    }
}
