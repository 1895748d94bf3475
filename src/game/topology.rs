//! Hex-offset board geometry
//!
//! Seven columns. Even columns hold 8 tiles; odd columns hold 7 and sit
//! half a tile lower, so every odd-column tile touches two tiles in each
//! neighbouring even column:
//!
//! ```text
//!  c0  c1  c2
//!  r0      r0
//!      r0
//!  r1      r1
//!      r1
//!  r2      r2
//! ```
//!
//! Adjacency is a lookup over six offsets keyed on the reference tile's
//! column parity. No state lives here.

use serde::{Deserialize, Serialize};

/// Number of columns on the board.
pub const COLUMNS: i32 = 7;

/// Grid coordinate. Rows go negative while a removed tile waits off-grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub col: i32,
    pub row: i32,
}

impl Pos {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}r{}", self.col, self.row)
    }
}

/// Outward burst direction, used only to animate a tile caught in a blast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

// (dcol, drow) offsets from the reference tile.
const EVEN_OFFSETS: [(i32, i32); 6] = [(0, -1), (0, 1), (-1, -1), (-1, 0), (1, -1), (1, 0)];
const ODD_OFFSETS: [(i32, i32); 6] = [(0, -1), (0, 1), (-1, 0), (-1, 1), (1, 0), (1, 1)];

/// Rows held by a column.
pub fn rows_in_col(col: i32) -> i32 {
    if col.rem_euclid(2) == 0 {
        8
    } else {
        7
    }
}

/// Whether a position lies on the visible grid.
pub fn in_bounds(pos: Pos) -> bool {
    (0..COLUMNS).contains(&pos.col) && (0..rows_in_col(pos.col)).contains(&pos.row)
}

/// Every grid position, column-major.
pub fn positions() -> impl Iterator<Item = Pos> {
    (0..COLUMNS).flat_map(|col| (0..rows_in_col(col)).map(move |row| Pos::new(col, row)))
}

/// The six neighbour offsets for a tile in `col`.
pub fn neighbor_offsets(col: i32) -> &'static [(i32, i32); 6] {
    if col.rem_euclid(2) == 0 {
        &EVEN_OFFSETS
    } else {
        &ODD_OFFSETS
    }
}

/// True when `a` is `b` or one of its six hex neighbours.
pub fn is_neighbor(a: Pos, b: Pos) -> bool {
    if a == b {
        return true;
    }
    let delta = (a.col - b.col, a.row - b.row);
    neighbor_offsets(b.col).contains(&delta)
}

/// In-bounds neighbours of `pos`.
pub fn neighbors_of(pos: Pos) -> impl Iterator<Item = Pos> {
    neighbor_offsets(pos.col)
        .iter()
        .map(move |(dc, dr)| Pos::new(pos.col + dc, pos.row + dr))
        .filter(|p| in_bounds(*p))
}

/// Twice the on-screen vertical centre of a tile (odd columns sit half a tile lower).
fn doubled_y(pos: Pos) -> i32 {
    pos.row * 2 + pos.col.rem_euclid(2)
}

/// Compass direction from `source` to `target` as drawn on screen.
pub fn burst_direction(target: Pos, source: Pos) -> Direction {
    let dx = target.col - source.col;
    let dy = doubled_y(target) - doubled_y(source);
    match (dx.signum(), dy.signum()) {
        (0, 1) => Direction::S,
        (0, _) => Direction::N,
        (1, -1) => Direction::NE,
        (1, 0) => Direction::E,
        (1, _) => Direction::SE,
        (_, -1) => Direction::NW,
        (_, 0) => Direction::W,
        _ => Direction::SW,
    }
}
