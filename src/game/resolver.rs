//! Batch-by-batch playback of a built event queue

use std::collections::VecDeque;

use super::board::Board;
use super::events::{Batch, Event, EventKind};
use super::tile::TileId;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Player hit points. `hp` never leaves `0..=hp_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    hp: u32,
    hp_max: u32,
}

impl Health {
    pub fn new(hp_max: u32) -> Self {
        Self { hp: hp_max, hp_max }
    }

    /// Restore saved values, clamping `hp` into range.
    pub fn from_parts(hp: u32, hp_max: u32) -> Self {
        Self {
            hp: hp.min(hp_max),
            hp_max,
        }
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn hp_max(&self) -> u32 {
        self.hp_max
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    /// Heal. At full health the maximum grows instead.
    pub fn heal(&mut self, amount: u32) {
        if self.hp == self.hp_max {
            self.hp_max += amount;
        } else {
            self.hp = (self.hp + amount).min(self.hp_max);
        }
    }

    pub fn damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    /// Level-up bonus: both current and maximum grow.
    pub fn buff(&mut self, amount: u32) {
        self.hp_max += amount;
        self.hp += amount;
    }

    fn apply(&mut self, magnitude: i32) {
        if magnitude >= 0 {
            self.heal(magnitude.unsigned_abs());
        } else {
            self.damage(magnitude.unsigned_abs());
        }
    }
}

/// What started a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// A valid word of this many tiles.
    Word { length: usize },
    /// A board-wide reroll.
    Scramble,
}

/// The result of playing back one batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub turn: u32,
    pub applied: Vec<Event>,
    /// Events dropped because they were cancelled or their tile was gone.
    pub skipped: usize,
    pub damage: u32,
    pub healed: u32,
}

/// Remaining batches of a resolution in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQueue {
    batches: VecDeque<Batch>,
    origin: Origin,
}

impl EventQueue {
    pub fn new(batches: Vec<Batch>, origin: Origin) -> Self {
        Self {
            batches: batches.into(),
            origin,
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.batches.len()
    }

    /// Play back the next batch.
    ///
    /// Removed tiles are parked off-grid with fresh letters at `multiplier`.
    /// Every later event sourced from a removed tile is deactivated before
    /// the following batch runs. Returns `None` once the queue is drained.
    pub fn execute_next_batch<R: Rng + ?Sized>(
        &mut self,
        board: &mut Board,
        health: &mut Health,
        multiplier: u32,
        rng: &mut R,
    ) -> Option<BatchReport> {
        let batch = self.batches.pop_front()?;
        let mut report = BatchReport {
            turn: batch.turn,
            ..Default::default()
        };

        for event in batch.events {
            if !event.active {
                debug!(turn = batch.turn, tile = %event.target, kind = ?event.kind, "cancelled event skipped");
                report.skipped += 1;
                continue;
            }
            if board.tile(event.target).paused() {
                debug!(turn = batch.turn, tile = %event.target, kind = ?event.kind, "target already removed");
                report.skipped += 1;
                continue;
            }

            match event.kind {
                EventKind::Heal | EventKind::Attack | EventKind::Kill | EventKind::Poison => {
                    let before = health.hp();
                    health.apply(event.magnitude);
                    if event.magnitude < 0 {
                        let dealt = before - health.hp();
                        report.damage += dealt;
                        info!(tile = %event.target, kind = ?event.kind, dealt, hp = health.hp(), "player damaged");
                    } else if event.magnitude > 0 {
                        report.healed += event.magnitude.unsigned_abs();
                        info!(
                            tile = %event.target,
                            amount = event.magnitude,
                            hp = health.hp(),
                            hp_max = health.hp_max(),
                            "player healed"
                        );
                    }
                }
                _ => {}
            }

            if matches!(event.kind, EventKind::Poison | EventKind::Tick) {
                let tick = board.tile_mut(event.target).tick();
                debug!(tile = %event.target, ?tick, "countdown");
            }

            if event.kind.removes_tile() {
                board.remove(event.target, multiplier, rng);
                self.cancel_sourced_from(event.target);
            }
            report.applied.push(event);
        }

        Some(report)
    }

    fn cancel_sourced_from(&mut self, tile: TileId) {
        for event in self.batches.iter_mut().flat_map(|b| b.events.iter_mut()) {
            if event.active && event.source == tile {
                debug!(source = %tile, target = %event.target, kind = ?event.kind, "event cancelled");
                event.active = false;
            }
        }
    }
}
