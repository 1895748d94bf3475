//! The player's in-progress selection path

use super::board::Board;
use super::tile::TileId;
use super::validation::MIN_WORD_LENGTH;

/// What a selection attempt did to the snake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeChange {
    /// First tile of a new path.
    Started,
    /// Tile appended to the path.
    Extended,
    /// Path cut back to an earlier tile.
    Trimmed,
    /// The lone selected tile was clicked again.
    Cleared,
    /// Tile was not adjacent to the head; the path starts over from it.
    Restarted,
    /// Nothing changed (stone, parked tile, input locked).
    Ignored,
}

/// Ordered selection of adjacent tiles. Insertion order is spelling order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snake {
    tiles: Vec<TileId>,
}

impl Snake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn last(&self) -> Option<TileId> {
        self.tiles.last().copied()
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.contains(&id)
    }

    /// Select a tile.
    ///
    /// Re-clicking the only tile deselects it; clicking a tile already in the
    /// path trims back to it; a tile that does not touch the head restarts
    /// the path; anything else extends it. Stone and parked tiles are ignored.
    pub fn try_add(&mut self, id: TileId, board: &Board) -> SnakeChange {
        if !board.tile(id).is_selectable() {
            return SnakeChange::Ignored;
        }
        if self.tiles.len() == 1 && self.tiles[0] == id {
            self.tiles.clear();
            return SnakeChange::Cleared;
        }
        if self.contains(id) {
            return self.trim_to(id);
        }
        match self.last() {
            None => {
                self.tiles.push(id);
                SnakeChange::Started
            }
            Some(head) if board.is_neighbor(id, head) => {
                self.tiles.push(id);
                SnakeChange::Extended
            }
            Some(_) => {
                self.tiles.clear();
                self.tiles.push(id);
                SnakeChange::Restarted
            }
        }
    }

    /// Cut the path back to, and including, `id`.
    pub fn trim_to(&mut self, id: TileId) -> SnakeChange {
        match self.tiles.iter().position(|t| *t == id) {
            Some(index) => {
                self.tiles.truncate(index + 1);
                SnakeChange::Trimmed
            }
            None => SnakeChange::Ignored,
        }
    }

    /// Drop the last tile.
    pub fn pop(&mut self) -> Option<TileId> {
        self.tiles.pop()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    /// The spelled candidate word, uppercase.
    pub fn word(&self, board: &Board) -> String {
        self.tiles
            .iter()
            .map(|id| board.tile(*id).spelling())
            .collect()
    }

    /// The candidate word if it is long enough to submit. A two-tile path
    /// through "Qu" spells three letters and qualifies.
    pub fn submit(&self, board: &Board) -> Option<String> {
        let word = self.word(board);
        (word.chars().count() >= MIN_WORD_LENGTH).then_some(word)
    }
}
