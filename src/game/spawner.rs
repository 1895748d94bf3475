//! Special tile spawning
//!
//! After a word resolves, at most one of the tiles that just dropped back
//! into the grid is promoted. Long words earn a guaranteed bonus tile from
//! the rules' length table; short words roll for a hazard, with odds that
//! fall as the player's recent words get longer.

use std::collections::VecDeque;

use super::board::Board;
use super::letter_rank;
use super::tile::{TileId, TileKind};
use crate::config::Rules;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::*;
use tracing::{debug, info};

/// Mean of the recent word lengths, rounded to one decimal.
pub fn rolling_average(recent: &VecDeque<usize>) -> f64 {
    if recent.is_empty() {
        return 0.0;
    }
    let sum: usize = recent.iter().sum();
    let avg = sum as f64 / recent.len() as f64;
    (avg * 10.0).round() / 10.0
}

/// Decide which special type, if any, a word of `word_len` tiles earns.
///
/// `recent` holds the lengths of the last words, the current one included.
/// The hazard roll only happens once the window is full.
pub fn roll_special<R: Rng + ?Sized>(
    rules: &Rules,
    word_len: usize,
    recent: &VecDeque<usize>,
    rng: &mut R,
) -> Option<TileKind> {
    if let Some(kind) = rules.special_for_length(word_len) {
        return Some(kind);
    }
    if recent.len() < rules.rolling_window {
        return None;
    }
    let avg = rolling_average(recent);
    let p = rules.adverse_probability(avg);
    debug!(avg, p, "adverse roll");
    if !rng.random_bool(p) {
        return None;
    }
    let kinds = [TileKind::Attack, TileKind::Poison];
    match WeightedIndex::new([rules.attack_weight, rules.poison_weight]) {
        Ok(dist) => Some(kinds[dist.sample(rng)]),
        Err(_) => Some(TileKind::Attack),
    }
}

/// Countdown a freshly promoted tile starts with.
pub fn timer_for(kind: TileKind, letter: char, rules: &Rules) -> u32 {
    match kind {
        TileKind::Attack => rules.attack_timer(letter_rank(letter)),
        TileKind::Poison => rules.poison_timer,
        _ => rules.special_timer,
    }
}

/// Promote one uniformly chosen tile among `candidates`.
pub fn promote_one<R: Rng + ?Sized>(
    board: &mut Board,
    candidates: &[TileId],
    kind: TileKind,
    rules: &Rules,
    rng: &mut R,
) -> Option<TileId> {
    let id = *candidates.choose(rng)?;
    let timer = timer_for(kind, board.tile(id).letter(), rules);
    board.tile_mut(id).promote(kind, timer);
    info!(tile = %id, kind = kind.label(), timer, "special tile spawned");
    Some(id)
}

/// Turn a random Normal tile in the top row into an Attack tile.
pub fn spawn_top_row_attack<R: Rng + ?Sized>(
    board: &mut Board,
    rules: &Rules,
    rng: &mut R,
) -> Option<TileId> {
    let candidates: Vec<TileId> = board
        .ids()
        .filter(|id| {
            let t = board.tile(*id);
            !t.paused() && t.pos().row == 0 && t.kind() == TileKind::Normal
        })
        .collect();
    if candidates.is_empty() {
        debug!("no Normal tile on the top row for an attack");
    }
    promote_one(board, &candidates, TileKind::Attack, rules, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::topology::Pos;

    fn rng(seed: u64) -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(seed)
    }

    fn window(lengths: &[usize]) -> VecDeque<usize> {
        lengths.iter().copied().collect()
    }

    #[test]
    fn test_rolling_average_rounds() {
        assert_eq!(rolling_average(&window(&[3, 3, 4, 3, 3])), 3.2);
        assert_eq!(rolling_average(&window(&[3, 4, 4])), 3.7);
        assert_eq!(rolling_average(&window(&[])), 0.0);
    }

    #[test]
    fn test_length_table_wins() {
        let rules = Rules::default();
        let mut rng = rng(1);
        let recent = window(&[3, 3, 3, 3, 5]);
        assert_eq!(roll_special(&rules, 5, &recent, &mut rng), Some(TileKind::Silver));
        assert_eq!(roll_special(&rules, 6, &recent, &mut rng), Some(TileKind::Heal));
        assert_eq!(roll_special(&rules, 9, &recent, &mut rng), Some(TileKind::Gold));
    }

    #[test]
    fn test_no_hazard_before_window_fills() {
        let rules = Rules::default();
        let mut rng = rng(2);
        let recent = window(&[3, 3, 3, 3]);
        for _ in 0..100 {
            assert_eq!(roll_special(&rules, 3, &recent, &mut rng), None);
        }
    }

    #[test]
    fn test_long_average_suppresses_hazards() {
        let rules = Rules::default();
        let mut rng = rng(3);
        // avg 6.0 gives p = 0
        let recent = window(&[3, 7, 7, 7, 6]);
        for _ in 0..100 {
            assert_eq!(roll_special(&rules, 3, &recent, &mut rng), None);
        }
    }

    #[test]
    fn test_short_average_spawns_hazards() {
        let rules = Rules {
            adverse_intercept: 5.0,
            ..Rules::default()
        };
        let mut rng = rng(4);
        let recent = window(&[3, 3, 3, 3, 3]);
        let mut attacks = 0;
        let mut poisons = 0;
        for _ in 0..400 {
            match roll_special(&rules, 3, &recent, &mut rng) {
                Some(TileKind::Attack) => attacks += 1,
                Some(TileKind::Poison) => poisons += 1,
                other => panic!("expected a hazard, got {:?}", other),
            }
        }
        assert!(attacks > poisons);
        assert!(poisons > 0);
    }

    #[test]
    fn test_timers() {
        let rules = Rules::default();
        assert_eq!(timer_for(TileKind::Attack, 'E', &rules), 2);
        assert_eq!(timer_for(TileKind::Attack, 'K', &rules), 3);
        assert_eq!(timer_for(TileKind::Attack, 'Z', &rules), 4);
        assert_eq!(timer_for(TileKind::Poison, 'E', &rules), 5);
        assert_eq!(timer_for(TileKind::Gold, 'E', &rules), 3);
    }

    #[test]
    fn test_promote_one_picks_a_candidate() {
        let rules = Rules::default();
        let mut board = Board::from_letters("");
        let candidates = [TileId(3), TileId(9)];
        let id = promote_one(&mut board, &candidates, TileKind::Silver, &rules, &mut rng(5)).unwrap();
        assert!(candidates.contains(&id));
        assert_eq!(board.tile(id).kind(), TileKind::Silver);
        assert!(promote_one(&mut board, &[], TileKind::Silver, &rules, &mut rng(5)).is_none());
    }

    #[test]
    fn test_top_row_attack() {
        let rules = Rules::default();
        let mut board = Board::from_letters("");
        let id = spawn_top_row_attack(&mut board, &rules, &mut rng(6)).unwrap();
        assert_eq!(board.tile(id).pos().row, 0);
        assert_eq!(board.tile(id).kind(), TileKind::Attack);
        assert_eq!(board.tile(id).timer(), 2);
    }

    #[test]
    fn test_top_row_attack_needs_normal_tile() {
        let rules = Rules::default();
        let mut board = Board::from_letters("");
        for col in 0..7 {
            let id = board.id_at(Pos::new(col, 0)).unwrap();
            board.tile_mut(id).promote(TileKind::Stone, 0);
        }
        assert!(spawn_top_row_attack(&mut board, &rules, &mut rng(7)).is_none());
    }
}
