//! A single board cell and its lifecycle
//!
//! Tiles are pooled: a removed tile is reset and parked above its column
//! (negative row, paused) until repopulation drops it back into the grid.

use super::topology::Pos;
use super::{draw_letter, label, letter_rank, spelling};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Point factor for Silver tiles.
pub const SILVER_FACTOR: u32 = 3;
/// Point factor for Gold tiles.
pub const GOLD_FACTOR: u32 = 4;
/// Timer value carried by a tile with no countdown running.
pub const IDLE_TIMER: u32 = 5;

/// Index of a tile in the board's pool. Stable for the lifetime of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub usize);

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tile type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Normal,
    Attack,
    Heal,
    Poison,
    Gold,
    Silver,
    Stone,
}

impl TileKind {
    /// Tiles whose countdown runs every resolved turn.
    pub fn has_countdown(self) -> bool {
        matches!(self, TileKind::Attack | TileKind::Poison)
    }

    pub fn label(self) -> &'static str {
        match self {
            TileKind::Normal => "Normal",
            TileKind::Attack => "Attack",
            TileKind::Heal => "Heal",
            TileKind::Poison => "Poison",
            TileKind::Gold => "Gold",
            TileKind::Silver => "Silver",
            TileKind::Stone => "Stone",
        }
    }
}

/// What a countdown tick did to a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Tile has no countdown.
    Inert,
    /// First tick after spawning; only the first-turn flag was cleared.
    Suppressed,
    /// Timer decremented; value remaining.
    Counting(u32),
    /// Timer ran out.
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pos: Pos,
    letter: char,
    kind: TileKind,
    timer: u32,
    first_turn: bool,
    marked: bool,
    multiplier: u32,
    point_value: u32,
    #[serde(skip)]
    paused: bool,
}

impl Tile {
    /// A Normal tile with a fixed letter.
    pub fn new(pos: Pos, letter: char, multiplier: u32) -> Self {
        let mut tile = Self {
            pos,
            letter: letter.to_ascii_uppercase(),
            kind: TileKind::Normal,
            timer: IDLE_TIMER,
            first_turn: true,
            marked: false,
            multiplier: multiplier.max(1),
            point_value: 0,
            paused: false,
        };
        tile.refresh();
        tile
    }

    /// A Normal tile with a random letter.
    pub fn random<R: Rng + ?Sized>(pos: Pos, multiplier: u32, rng: &mut R) -> Self {
        Self::new(pos, draw_letter(rng), multiplier)
    }

    /// Builder used by tests and restores: same tile with another type.
    pub fn with_kind(mut self, kind: TileKind, timer: u32) -> Self {
        self.kind = kind;
        self.timer = timer;
        self.refresh();
        self
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn first_turn(&self) -> bool {
        self.first_turn
    }

    pub fn marked(&self) -> bool {
        self.marked
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn point_value(&self) -> u32 {
        self.point_value
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Letters this tile adds to a word ("QU" for the digraph, nothing for Stone).
    pub fn spelling(&self) -> &'static str {
        if self.kind == TileKind::Stone {
            ""
        } else {
            spelling(self.letter)
        }
    }

    /// Face text for the board.
    pub fn label(&self) -> &'static str {
        if self.kind == TileKind::Stone {
            ""
        } else {
            label(self.letter)
        }
    }

    /// Whether the player can pick this tile.
    pub fn is_selectable(&self) -> bool {
        self.kind != TileKind::Stone && !self.paused
    }

    /// Draw a new letter and recompute the point value.
    pub fn choose_letter<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.letter = draw_letter(rng);
        self.refresh();
    }

    /// Back to a fresh Normal tile with a new letter.
    pub fn reset<R: Rng + ?Sized>(&mut self, multiplier: u32, rng: &mut R) {
        self.kind = TileKind::Normal;
        self.timer = IDLE_TIMER;
        self.first_turn = true;
        self.marked = false;
        self.multiplier = multiplier.max(1);
        self.choose_letter(rng);
    }

    /// Turn this tile into a special type. Countdowns start on the next turn.
    pub fn promote(&mut self, kind: TileKind, timer: u32) {
        self.kind = kind;
        self.timer = timer;
        self.first_turn = true;
        self.marked = false;
        self.refresh();
    }

    /// Follow the session multiplier. Special tiles keep the value they spawned with.
    pub fn set_multiplier(&mut self, multiplier: u32) {
        if self.kind == TileKind::Normal {
            self.multiplier = multiplier.max(1);
            self.refresh();
        }
    }

    /// Run one turn of the countdown.
    ///
    /// The first tick after spawning only clears `first_turn`. An expiring
    /// Poison tile turns to Stone; an Attack tile is removed by its own
    /// event before its timer can run out.
    pub fn tick(&mut self) -> Tick {
        if !self.kind.has_countdown() {
            return Tick::Inert;
        }
        if self.first_turn {
            self.first_turn = false;
            return Tick::Suppressed;
        }
        self.timer = self.timer.saturating_sub(1);
        if self.timer > 0 {
            return Tick::Counting(self.timer);
        }
        if self.kind == TileKind::Poison {
            self.kind = TileKind::Stone;
            self.marked = false;
            self.refresh();
        }
        Tick::Expired
    }

    pub fn toggle_mark(&mut self) {
        self.marked = !self.marked;
    }

    pub fn set_marked(&mut self, marked: bool) {
        self.marked = marked;
    }

    pub(crate) fn set_pos(&mut self, pos: Pos) {
        self.pos = pos;
    }

    pub(crate) fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub(crate) fn set_first_turn(&mut self, first_turn: bool) {
        self.first_turn = first_turn;
    }

    fn refresh(&mut self) {
        let rank = letter_rank(self.letter);
        let m = self.multiplier;
        self.point_value = match self.kind {
            TileKind::Normal | TileKind::Attack => rank * m,
            TileKind::Silver => rank * SILVER_FACTOR * m,
            TileKind::Gold => rank * GOLD_FACTOR * m,
            TileKind::Heal | TileKind::Poison => m,
            TileKind::Stone => 0,
        };
    }
}
