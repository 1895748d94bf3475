//! The tile pool laid out on the hex grid

use super::tile::{Tile, TileId, TileKind};
use super::topology::{self, Pos};
use rand::Rng;
use tracing::debug;

/// Every tile in the game, indexed by [`TileId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    tiles: Vec<Tile>,
}

impl Board {
    /// Fill every grid position with a random Normal tile.
    pub fn generate<R: Rng + ?Sized>(multiplier: u32, rng: &mut R) -> Self {
        let tiles = topology::positions()
            .map(|pos| Tile::random(pos, multiplier, rng))
            .collect();
        Self { tiles }
    }

    /// Wrap a prepared set of tiles (restores and test fixtures).
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    /// Build a full board from a letter per grid position (column-major).
    ///
    /// Positions beyond `letters` are filled with 'E'.
    pub fn from_letters(letters: &str) -> Self {
        let mut chars = letters.chars();
        let tiles = topology::positions()
            .map(|pos| Tile::new(pos, chars.next().unwrap_or('E'), 1))
            .collect();
        Self { tiles }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = TileId> {
        (0..self.tiles.len()).map(TileId)
    }

    pub fn tile(&self, id: TileId) -> &Tile {
        &self.tiles[id.0]
    }

    pub fn tile_mut(&mut self, id: TileId) -> &mut Tile {
        &mut self.tiles[id.0]
    }

    /// The live tile sitting at `pos`, if any.
    pub fn id_at(&self, pos: Pos) -> Option<TileId> {
        self.tiles
            .iter()
            .position(|t| !t.paused() && t.pos() == pos)
            .map(TileId)
    }

    /// Whether two tiles touch on the grid.
    pub fn is_neighbor(&self, a: TileId, b: TileId) -> bool {
        topology::is_neighbor(self.tile(a).pos(), self.tile(b).pos())
    }

    /// Live tiles touching `id`, excluding itself, in pool order.
    pub fn neighbors(&self, id: TileId) -> Vec<TileId> {
        let origin = self.tile(id).pos();
        self.ids()
            .filter(|other| *other != id)
            .filter(|other| {
                let t = self.tile(*other);
                !t.paused() && topology::is_neighbor(t.pos(), origin)
            })
            .collect()
    }

    /// Live tiles of a given type, in pool order.
    pub fn ids_of_kind(&self, kind: TileKind) -> Vec<TileId> {
        self.ids()
            .filter(|id| {
                let t = self.tile(*id);
                !t.paused() && t.kind() == kind
            })
            .collect()
    }

    /// Tiles waiting off-grid.
    pub fn paused_ids(&self) -> Vec<TileId> {
        self.ids().filter(|id| self.tile(*id).paused()).collect()
    }

    pub fn any_paused(&self) -> bool {
        self.tiles.iter().any(Tile::paused)
    }

    /// Take a tile off the grid.
    ///
    /// The tile is reset to a fresh Normal tile, stacked above the highest
    /// tile in its column and paused until [`Board::repopulate`].
    pub fn remove<R: Rng + ?Sized>(&mut self, id: TileId, multiplier: u32, rng: &mut R) {
        let col = self.tile(id).pos().col;
        let top = self
            .tiles
            .iter()
            .filter(|t| t.pos().col == col)
            .map(|t| t.pos().row)
            .min()
            .unwrap_or(0);
        let tile = self.tile_mut(id);
        let from = tile.pos();
        tile.reset(multiplier, rng);
        tile.set_pos(Pos::new(col, top.min(0) - 1));
        tile.set_paused(true);
        debug!(tile = %id, from = %from, "tile removed");
    }

    /// Drop every parked tile back into the grid.
    ///
    /// Each column is re-numbered top to bottom in current row order, so the
    /// parked tiles land in the top rows and the survivors fall below them.
    /// Returns the tiles that came back, column by column.
    pub fn repopulate(&mut self) -> Vec<TileId> {
        let mut returned = Vec::new();
        for col in 0..topology::COLUMNS {
            let mut column: Vec<TileId> = self
                .ids()
                .filter(|id| self.tile(*id).pos().col == col)
                .collect();
            if !column.iter().any(|id| self.tile(*id).pos().row < 0) {
                continue;
            }
            column.sort_by_key(|id| self.tile(*id).pos().row);
            for (row, id) in column.into_iter().enumerate() {
                let was_parked = self.tile(id).pos().row < 0;
                self.tile_mut(id).set_pos(Pos::new(col, row as i32));
                if was_parked {
                    returned.push(id);
                }
            }
        }
        returned
    }

    pub fn unpause_all(&mut self) {
        for tile in &mut self.tiles {
            tile.set_paused(false);
        }
    }

    /// Push the session multiplier into every Normal tile.
    pub fn apply_multiplier(&mut self, multiplier: u32) {
        for tile in &mut self.tiles {
            tile.set_multiplier(multiplier);
        }
    }

    pub fn clear_marks(&mut self) {
        for tile in &mut self.tiles {
            tile.set_marked(false);
        }
    }

    pub fn marked_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.marked()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(11)
    }

    #[test]
    fn test_generate_fills_grid() {
        let board = Board::generate(1, &mut rng());
        assert_eq!(board.len(), 53);
        for pos in topology::positions() {
            assert!(board.id_at(pos).is_some(), "missing tile at {}", pos);
        }
    }

    #[test]
    fn test_neighbors_exclude_self() {
        let board = Board::from_letters("");
        let id = board.id_at(Pos::new(2, 3)).unwrap();
        let neighbors = board.neighbors(id);
        assert_eq!(neighbors.len(), 6);
        assert!(!neighbors.contains(&id));
    }

    #[test]
    fn test_remove_parks_tiles_above_column() {
        let mut rng = rng();
        let mut board = Board::from_letters("");
        let a = board.id_at(Pos::new(0, 5)).unwrap();
        let b = board.id_at(Pos::new(0, 2)).unwrap();
        board.remove(a, 1, &mut rng);
        board.remove(b, 1, &mut rng);
        assert_eq!(board.tile(a).pos(), Pos::new(0, -1));
        assert_eq!(board.tile(b).pos(), Pos::new(0, -2));
        assert!(board.tile(a).paused());
        assert_eq!(board.id_at(Pos::new(0, 5)), None);
        assert_eq!(board.paused_ids().len(), 2);
    }

    #[test]
    fn test_repopulate_refills_column() {
        let mut rng = rng();
        let mut board = Board::from_letters("");
        let below = board.id_at(Pos::new(0, 6)).unwrap();
        let above = board.id_at(Pos::new(0, 0)).unwrap();
        let removed = board.id_at(Pos::new(0, 3)).unwrap();
        board.remove(removed, 1, &mut rng);

        let returned = board.repopulate();
        board.unpause_all();

        assert_eq!(returned, vec![removed]);
        assert_eq!(board.tile(removed).pos(), Pos::new(0, 0));
        assert_eq!(board.tile(above).pos(), Pos::new(0, 1));
        assert_eq!(board.tile(below).pos(), Pos::new(0, 6));
        for pos in topology::positions() {
            assert!(board.id_at(pos).is_some(), "hole at {}", pos);
        }
    }

    #[test]
    fn test_apply_multiplier_skips_specials() {
        let mut board = Board::from_letters("");
        let gold = TileId(4);
        board.tile_mut(gold).promote(TileKind::Gold, 3);
        board.apply_multiplier(2);
        assert_eq!(board.tile(TileId(0)).multiplier(), 2);
        assert_eq!(board.tile(gold).multiplier(), 1);
    }
}
