//! Game logic: hex board, tiles, selection snake, turn resolution, session

pub mod board;
pub mod dictionary;
pub mod events;
pub mod resolver;
pub mod session;
pub mod snake;
pub mod snapshot;
pub mod spawner;
pub mod tile;
pub mod topology;
pub mod validation;

pub use board::Board;
pub use dictionary::Dictionary;
pub use session::{Game, StepOutcome, SubmitOutcome};
pub use snake::SnakeChange;
pub use snapshot::Snapshot;
pub use tile::{TileId, TileKind};
pub use topology::Pos;

use once_cell::sync::Lazy;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::*;

/// Letter draw weights (percent). 'Q' is always the "Qu" digraph.
const LETTER_WEIGHTS: [(char, u32); 26] = [
    ('A', 9),
    ('B', 2),
    ('C', 2),
    ('D', 4),
    ('E', 12),
    ('F', 2),
    ('G', 3),
    ('H', 2),
    ('I', 9),
    ('J', 1),
    ('K', 1),
    ('L', 4),
    ('M', 3),
    ('N', 6),
    ('O', 8),
    ('P', 2),
    ('Q', 1),
    ('R', 6),
    ('S', 5),
    ('T', 6),
    ('U', 4),
    ('V', 2),
    ('W', 2),
    ('X', 1),
    ('Y', 2),
    ('Z', 1),
];

static LETTER_DIST: Lazy<WeightedIndex<u32>> = Lazy::new(|| {
    let weights: Vec<u32> = LETTER_WEIGHTS.iter().map(|(_, w)| *w).collect();
    WeightedIndex::new(&weights).expect("valid weights")
});

/// Draw a random tile letter weighted to English frequency.
pub fn draw_letter<R: Rng + ?Sized>(rng: &mut R) -> char {
    LETTER_WEIGHTS[LETTER_DIST.sample(rng)].0
}

/// Point tier of a letter. Unlisted letters (Q, Z) are worth 10.
pub fn letter_rank(letter: char) -> u32 {
    match letter.to_ascii_uppercase() {
        'A' | 'E' | 'I' | 'L' | 'N' | 'O' | 'R' | 'S' | 'T' | 'U' => 1,
        'D' | 'G' => 2,
        'B' | 'C' | 'M' | 'P' => 3,
        'F' | 'H' | 'V' | 'W' | 'Y' => 4,
        'K' => 5,
        'J' | 'X' => 8,
        _ => 10,
    }
}

/// How a tile letter contributes to the spelled word.
pub fn spelling(letter: char) -> &'static str {
    const SPELLINGS: [&str; 26] = [
        "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "QU", "R",
        "S", "T", "U", "V", "W", "X", "Y", "Z",
    ];
    let upper = letter.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        SPELLINGS[(upper as u8 - b'A') as usize]
    } else {
        ""
    }
}

/// How a tile letter is shown on the board.
pub fn label(letter: char) -> &'static str {
    if letter.to_ascii_uppercase() == 'Q' {
        "Qu"
    } else {
        spelling(letter)
    }
}
