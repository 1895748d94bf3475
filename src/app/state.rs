//! Play screen state: cursor, highlight and feedback around a [`Game`]

use crate::game::resolver::BatchReport;
use crate::game::session::Mode;
use crate::game::topology::{rows_in_col, COLUMNS};
use crate::game::{Game, Pos, SnakeChange, StepOutcome, SubmitOutcome, TileId};

/// Main play state
pub struct App {
    game: Game,
    /// Keyboard cursor
    pub cursor: Pos,
    /// Letter whose tiles are highlighted (Shift + letter)
    pub highlight: Option<char>,
    /// Feedback message from the last action
    pub feedback: String,
    /// Most recent batch played back, for the HUD
    last_batch: Option<BatchReport>,
}

impl App {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            cursor: Pos::new(0, 0),
            highlight: None,
            feedback: String::new(),
            last_batch: None,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn last_batch(&self) -> Option<&BatchReport> {
        self.last_batch.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.game.mode() == Mode::GameOver
    }

    /// Mouse click on a grid cell.
    pub fn on_click(&mut self, pos: Pos) {
        self.cursor = pos;
        if let Some(id) = self.game.board().id_at(pos) {
            self.select(id);
        }
    }

    /// Right click: cut the snake back to a tile already in it; any other
    /// tile gets its mark toggled.
    pub fn on_secondary_click(&mut self, pos: Pos) {
        self.cursor = pos;
        let Some(id) = self.game.board().id_at(pos) else {
            return;
        };
        if self.game.try_trim(id) == SnakeChange::Ignored {
            self.game.try_mark(id);
        }
    }

    /// Space: select the tile under the cursor.
    pub fn on_select_cursor(&mut self) {
        if let Some(id) = self.game.board().id_at(self.cursor) {
            self.select(id);
        }
    }

    fn select(&mut self, id: TileId) {
        match self.game.try_select(id) {
            SnakeChange::Ignored => {}
            _ => self.feedback.clear(),
        }
    }

    /// Move the cursor, clamping to the board. Changing column keeps the row
    /// where the new column has one.
    pub fn move_cursor(&mut self, dcol: i32, drow: i32) {
        let col = (self.cursor.col + dcol).clamp(0, COLUMNS - 1);
        let row = (self.cursor.row + drow).clamp(0, rows_in_col(col) - 1);
        self.cursor = Pos::new(col, row);
    }

    pub fn on_backspace(&mut self) {
        self.game.backspace();
    }

    pub fn on_clear_selection(&mut self) {
        self.game.clear_selection();
    }

    /// Enter: submit the snake.
    pub fn on_submit(&mut self) -> SubmitOutcome {
        let outcome = self.game.try_submit();
        match &outcome {
            SubmitOutcome::Accepted {
                word,
                score,
                bonus,
                levels_gained,
            } => {
                let mut feedback = format!("OK +{} ({})", score, word);
                if *bonus {
                    feedback.push_str(" BONUS!");
                }
                if *levels_gained > 0 {
                    feedback.push_str(&format!(" LEVEL {}", self.game.level()));
                }
                self.feedback = feedback;
            }
            SubmitOutcome::Rejected { reason, .. } => {
                self.feedback = reason.message();
            }
            SubmitOutcome::Locked => {}
        }
        outcome
    }

    /// `m`: toggle the mark on the tile under the cursor.
    pub fn on_mark(&mut self) {
        if let Some(id) = self.game.board().id_at(self.cursor) {
            self.game.try_mark(id);
        }
    }

    pub fn on_clear_marks(&mut self) {
        self.game.clear_marks();
    }

    pub fn on_scramble(&mut self) {
        if self.game.scramble() {
            self.feedback = "Scramble!".to_string();
        }
    }

    /// Shift + letter: highlight every tile showing that letter. Pressing the
    /// same letter again turns the highlight off.
    pub fn on_highlight(&mut self, c: char) {
        let c = c.to_ascii_uppercase();
        self.highlight = if self.highlight == Some(c) { None } else { Some(c) };
    }

    pub fn is_highlighted(&self, id: TileId) -> bool {
        let tile = self.game.board().tile(id);
        self.highlight == Some(tile.letter()) && tile.is_selectable()
    }

    /// Play the next step of a pending resolution.
    pub fn step(&mut self) -> StepOutcome {
        let outcome = self.game.advance();
        match &outcome {
            StepOutcome::Batch(report) => {
                if report.damage > 0 {
                    self.feedback = format!("OUCH -{} HP", report.damage);
                } else if report.healed > 0 {
                    self.feedback = format!("HEAL +{} HP", report.healed);
                }
                self.last_batch = Some(report.clone());
            }
            StepOutcome::Settled { spawned } => {
                if let Some(id) = spawned {
                    let kind = self.game.board().tile(*id).kind();
                    self.feedback = format!("{} tile appeared", kind.label());
                }
                self.last_batch = None;
            }
            StepOutcome::Idle => {}
        }
        if self.is_over() {
            self.feedback = "GAME OVER".to_string();
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rules;
    use crate::game::{Board, Dictionary, Snapshot};

    /// A game whose first column spells C, A and whose second starts with T.
    fn cat_app() -> App {
        let mut game = Game::with_seed(Dictionary::embedded(), Rules::default(), "tester", 3);
        let mut snapshot = Snapshot::capture(&game);
        snapshot.tiles = Board::from_letters("CAEEEEEET").tiles().to_vec();
        snapshot.bonus_word = None;
        game.restore(snapshot);
        App::new(game)
    }

    #[test]
    fn test_click_builds_snake() {
        let mut app = cat_app();
        app.on_click(Pos::new(0, 0));
        app.on_click(Pos::new(0, 1));
        app.on_click(Pos::new(1, 0));
        assert_eq!(app.game().snake().len(), 3);
        assert_eq!(app.cursor, Pos::new(1, 0));
        assert_eq!(app.game().preview().word, "CAT");
    }

    #[test]
    fn test_click_outside_board_is_ignored() {
        let mut app = cat_app();
        app.on_click(Pos::new(1, 7));
        assert!(app.game().snake().is_empty());
    }

    #[test]
    fn test_submit_then_step_until_settled() {
        let mut app = cat_app();
        for pos in [Pos::new(0, 0), Pos::new(0, 1), Pos::new(1, 0)] {
            app.on_click(pos);
        }
        let outcome = app.on_submit();
        assert!(matches!(outcome, SubmitOutcome::Accepted { .. }));
        assert!(app.feedback.starts_with("OK +"));
        assert!(app.game().is_resolving());

        let mut steps = 0;
        while app.game().is_resolving() {
            app.step();
            steps += 1;
            assert!(steps < 50);
        }
        assert!(app.game().accepts_input());
        assert_eq!(app.game().score(), 15);
        assert!(app.last_batch().is_none());
    }

    #[test]
    fn test_rejected_word_sets_feedback() {
        let mut app = cat_app();
        app.on_click(Pos::new(0, 2));
        app.on_click(Pos::new(0, 3));
        app.on_click(Pos::new(0, 4));
        let outcome = app.on_submit();
        assert!(matches!(outcome, SubmitOutcome::Rejected { .. }));
        assert_eq!(app.feedback, "Not in dictionary");
        assert_eq!(app.game().score(), 0);
    }

    #[test]
    fn test_right_click_trims_or_marks() {
        let mut app = cat_app();
        for row in 0..4 {
            app.on_click(Pos::new(0, row));
        }
        assert_eq!(app.game().snake().len(), 4);

        app.on_secondary_click(Pos::new(0, 1));
        assert_eq!(app.game().preview().word, "CA");
        assert_eq!(app.game().board().marked_count(), 0);

        app.on_secondary_click(Pos::new(3, 3));
        assert_eq!(app.game().snake().len(), 2);
        assert_eq!(app.game().board().marked_count(), 1);
        assert_eq!(app.cursor, Pos::new(3, 3));
    }

    #[test]
    fn test_clear_selection_keeps_marks() {
        let mut app = cat_app();
        app.on_mark();
        app.on_click(Pos::new(0, 0));
        app.on_click(Pos::new(0, 1));
        app.on_clear_selection();
        assert!(app.game().snake().is_empty());
        assert_eq!(app.game().board().marked_count(), 1);
    }

    #[test]
    fn test_cursor_clamps_to_board() {
        let mut app = cat_app();
        app.move_cursor(0, -1);
        assert_eq!(app.cursor, Pos::new(0, 0));
        app.move_cursor(1, 0);
        assert_eq!(app.cursor, Pos::new(1, 0));
        for _ in 0..10 {
            app.move_cursor(0, 1);
        }
        // odd columns are one tile shorter
        assert_eq!(app.cursor, Pos::new(1, 6));
        app.move_cursor(-1, 0);
        assert_eq!(app.cursor, Pos::new(0, 6));
        for _ in 0..10 {
            app.move_cursor(1, 0);
        }
        assert_eq!(app.cursor.col, COLUMNS - 1);
    }

    #[test]
    fn test_space_selects_under_cursor() {
        let mut app = cat_app();
        app.move_cursor(0, 1);
        app.on_select_cursor();
        assert_eq!(app.game().preview().word, "A");
    }

    #[test]
    fn test_mark_under_cursor() {
        let mut app = cat_app();
        app.on_mark();
        assert_eq!(app.game().board().marked_count(), 1);
        app.on_clear_marks();
        assert_eq!(app.game().board().marked_count(), 0);
    }

    #[test]
    fn test_highlight_toggles() {
        let mut app = cat_app();
        app.on_highlight('c');
        assert_eq!(app.highlight, Some('C'));
        let c = app.game().board().id_at(Pos::new(0, 0)).unwrap();
        let a = app.game().board().id_at(Pos::new(0, 1)).unwrap();
        assert!(app.is_highlighted(c));
        assert!(!app.is_highlighted(a));
        app.on_highlight('C');
        assert_eq!(app.highlight, None);
    }

    #[test]
    fn test_scramble_locks_until_settled() {
        let mut app = cat_app();
        app.on_scramble();
        assert_eq!(app.feedback, "Scramble!");
        assert!(!app.game().accepts_input());
        while app.game().is_resolving() {
            app.step();
        }
        assert!(app.game().accepts_input());
    }
}
