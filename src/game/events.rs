//! Event construction for a resolving turn
//!
//! A submitted word (or a scramble) becomes a list of per-tile events, each
//! tagged with the turn it fires on. After deduplication every tile is the
//! target of at most one event, and events are grouped into batches that
//! the resolver plays back one turn at a time.
//!
//! Turn layout:
//!
//! ```text
//! 0          Heal tiles in the word
//! 1          every other word tile is removed
//! 2 + depth  gold detonations and their blast radius
//! next ...   one turn per Attack tile, then one turn per Poison tile
//! ```

use std::collections::HashSet;

use super::board::Board;
use super::tile::{TileId, TileKind};
use super::topology::{burst_direction, Direction};
use serde::{Deserialize, Serialize};
use tracing::debug;

const HEAL_TURN: u32 = 0;
const REMOVE_TURN: u32 = 1;
const GOLD_TURN: u32 = 2;

/// What happens to the target tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Heal the player; the Heal tile is used up.
    Heal,
    /// A Gold tile detonates.
    Gold,
    /// Tile caught in a gold blast.
    Explode,
    /// Tile caught in an attack splash.
    Kill,
    /// Word tile removed after a valid submission.
    Remove,
    /// Poison tile deals damage and counts down.
    Poison,
    /// Attack tile fires: damage, then the tile is removed.
    Attack,
    /// Countdown only.
    Tick,
}

impl EventKind {
    /// Kinds that take the target tile off the board.
    pub fn removes_tile(self) -> bool {
        !matches!(self, EventKind::Poison | EventKind::Tick)
    }
}

/// One effect on one tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub target: TileId,
    /// Tile whose existence this event depends on.
    pub source: TileId,
    pub kind: EventKind,
    /// Signed HP change: positive heals, negative damages.
    pub magnitude: i32,
    pub turn: u32,
    pub active: bool,
    /// Outward burst for blast victims, drawn only.
    pub direction: Option<Direction>,
    /// Removed as part of the bonus word.
    pub bonus: bool,
}

impl Event {
    pub fn new(target: TileId, source: TileId, kind: EventKind, turn: u32) -> Self {
        Self {
            target,
            source,
            kind,
            magnitude: 0,
            turn,
            active: true,
            direction: None,
            bonus: false,
        }
    }

    fn with_magnitude(mut self, magnitude: i32) -> Self {
        self.magnitude = magnitude;
        self
    }

    fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    fn with_bonus(mut self, bonus: bool) -> Self {
        self.bonus = bonus;
        self
    }
}

/// Events that fire together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub turn: u32,
    pub events: Vec<Event>,
}

/// Build the ordered batches for a submitted word. An empty `snake` builds
/// the hazard-only batches used by a scramble.
pub fn build_queue(snake: &[TileId], board: &Board, bonus: bool) -> Vec<Batch> {
    let mut events = Vec::new();
    let mut visited = HashSet::new();

    for &id in snake {
        let tile = board.tile(id);
        match tile.kind() {
            TileKind::Heal => {
                events.push(heal_event(board, id, HEAL_TURN));
            }
            TileKind::Gold => {
                if visited.contains(&id) {
                    continue;
                }
                let (event, blast) = gold_chain(board, id, GOLD_TURN, &mut visited);
                events.push(event);
                events.extend(blast);
            }
            _ => {
                events.push(Event::new(id, id, EventKind::Remove, REMOVE_TURN).with_bonus(bonus));
            }
        }
    }

    let mut turn = events.iter().map(|e| e.turn).max().unwrap_or(REMOVE_TURN) + 1;
    let in_snake = |id: &TileId| snake.contains(id);

    for id in board.ids_of_kind(TileKind::Attack) {
        if in_snake(&id) {
            continue;
        }
        events.extend(attack_events(board, id, turn));
        turn += 1;
    }

    for id in board.ids_of_kind(TileKind::Poison) {
        if in_snake(&id) {
            continue;
        }
        let tile = board.tile(id);
        let event = if tile.first_turn() {
            Event::new(id, id, EventKind::Tick, turn)
        } else {
            Event::new(id, id, EventKind::Poison, turn).with_magnitude(-(tile.multiplier() as i32))
        };
        events.push(event);
        turn += 1;
    }

    let events = dedup(events);
    let batches = into_batches(events);
    debug!(
        word_tiles = snake.len(),
        batches = batches.len(),
        events = batches.iter().map(|b| b.events.len()).sum::<usize>(),
        "event queue built"
    );
    batches
}

/// Detonate a Gold tile at `turn`.
///
/// Returns the detonation itself plus everything it causes. The chain
/// spreads in waves: every unvisited neighbour of a wave's golds explodes
/// on that wave's turn (Heal neighbours heal instead), and the Gold tiles
/// it reaches form the next wave one turn later. `visited` is shared across
/// the whole chain so no tile is caught twice, and a whole wave claims its
/// neighbours before the next wave starts.
pub fn gold_chain(
    board: &Board,
    id: TileId,
    turn: u32,
    visited: &mut HashSet<TileId>,
) -> (Event, Vec<Event>) {
    visited.insert(id);
    let detonation = Event::new(id, id, EventKind::Gold, turn);

    let mut caused = Vec::new();
    let mut wave = vec![id];
    let mut turn = turn;
    while !wave.is_empty() {
        let mut next = Vec::new();
        for &gold in &wave {
            let origin = board.tile(gold).pos();
            for n in board.neighbors(gold) {
                if !visited.insert(n) {
                    continue;
                }
                let neighbor = board.tile(n);
                match neighbor.kind() {
                    TileKind::Heal => caused.push(heal_event(board, n, turn)),
                    TileKind::Gold => next.push(n),
                    _ => caused.push(
                        Event::new(n, gold, EventKind::Explode, turn)
                            .with_direction(burst_direction(neighbor.pos(), origin)),
                    ),
                }
            }
        }
        turn += 1;
        caused.extend(next.iter().map(|&g| Event::new(g, g, EventKind::Gold, turn)));
        wave = next;
    }

    (detonation, caused)
}

fn heal_event(board: &Board, id: TileId, turn: u32) -> Event {
    let amount = board.tile(id).multiplier() as i32;
    Event::new(id, id, EventKind::Heal, turn).with_magnitude(amount)
}

/// An Attack tile either fires (timer at its last tick) or counts down.
fn attack_events(board: &Board, id: TileId, turn: u32) -> Vec<Event> {
    let tile = board.tile(id);
    if tile.first_turn() || tile.timer() > 1 {
        return vec![Event::new(id, id, EventKind::Tick, turn)];
    }
    let origin = tile.pos();
    let strike = Event::new(id, id, EventKind::Attack, turn)
        .with_magnitude(-(tile.point_value() as i32));
    let mut events = vec![strike];
    for n in board.neighbors(id) {
        events.push(
            Event::new(n, id, EventKind::Kill, turn)
                .with_direction(burst_direction(board.tile(n).pos(), origin)),
        );
    }
    events
}

/// Keep only the earliest event per target tile.
pub fn dedup(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by_key(|e| e.turn);
    let mut seen = HashSet::new();
    events.retain(|e| seen.insert(e.target));
    events
}

/// Group turn-sorted events into batches, one per distinct turn.
fn into_batches(events: Vec<Event>) -> Vec<Batch> {
    let mut batches: Vec<Batch> = Vec::new();
    for event in events {
        match batches.last_mut() {
            Some(batch) if batch.turn == event.turn => batch.events.push(event),
            _ => batches.push(Batch {
                turn: event.turn,
                events: vec![event],
            }),
        }
    }
    batches
}
