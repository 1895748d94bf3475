//! UI rendering using ratatui
//!
//! Supports multiple screens:
//! - Menu, name entry, slot picker and hi-score table
//! - Playing: the hex board beside the HUD
//! - Notice and game over popups drawn over the board
//! - Error: Error message display

use crate::app::{App, AppCoordinator, MenuOption, Screen, SlotAction};
use crate::game::session::{HistoryEntry, LetterTag};
use crate::game::topology::{in_bounds, positions, rows_in_col, COLUMNS};
use crate::game::{Pos, TileKind};
use crate::storage::{HiScore, SlotInfo};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph},
};

/// Width of one tile cell, borders included
const TILE_W: u16 = 6;
/// Height of one tile cell, borders included. Odd columns drop by half.
const TILE_H: u16 = 4;

/// Render the appropriate screen based on app state.
///
/// Returns where the board was drawn, for mapping mouse clicks.
pub fn render(frame: &mut Frame, coordinator: &AppCoordinator) -> Option<Rect> {
    match &coordinator.screen {
        Screen::Menu { selected } => {
            render_menu(frame, *selected, coordinator.player());
            None
        }
        Screen::NameEntry { input } => {
            render_name_entry(frame, input);
            None
        }
        Screen::Playing { app } => Some(render_game(frame, app)),
        Screen::SlotPicker {
            action,
            selected,
            slots,
            ..
        } => {
            render_slot_picker(frame, *action, *selected, slots);
            None
        }
        Screen::Notice { message, app } => {
            let board = render_game(frame, app);
            render_popup(
                frame,
                vec![
                    Line::from(message.as_str()).style(Style::default().fg(Color::Yellow).bold()),
                    Line::from(""),
                    Line::from("Press any key").style(Style::default().fg(Color::DarkGray)),
                ],
            );
            Some(board)
        }
        Screen::GameOver { app, made_table } => {
            render_game(frame, app);
            render_game_over(frame, app, *made_table);
            None
        }
        Screen::HiScores { scores } => {
            render_hi_scores(frame, scores);
            None
        }
        Screen::Error { message } => {
            render_error(frame, message);
            None
        }
    }
}

/// Render the main menu
fn render_menu(frame: &mut Frame, selected: usize, player: &str) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Logo
            Constraint::Length(2), // Player
            Constraint::Min(6),    // Menu options
            Constraint::Length(2), // Footer
        ])
        .margin(2)
        .split(area);

    let logo = r#"
 _                 _                   _
| |__   ___   ___ | | _____ _ __   ___| | __
| '_ \ / _ \ / _ \| |/ / __| '_ \ / _ \ |/ /
| |_) | (_) | (_) |   <\__ \ | | |  __/   <
|_.__/ \___/ \___/|_|\_\___/_| |_|\___|_|\_\
"#;
    let logo_widget = Paragraph::new(logo)
        .style(Style::default().fg(Color::Green).bold())
        .alignment(Alignment::Center);
    frame.render_widget(logo_widget, layout[0]);

    let player_widget = Paragraph::new(format!("Player: {}", player))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(player_widget, layout[1]);

    let items: Vec<ListItem> = MenuOption::all()
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let style = if i == selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if i == selected { "> " } else { "  " };
            ListItem::new(format!("{}{}", prefix, opt.label())).style(style)
        })
        .collect();
    frame.render_widget(List::new(items), centered(layout[2], 20, layout[2].height));

    let footer = Paragraph::new("↑↓ Navigate  Enter Select  Esc Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[3]);
}

fn render_name_entry(frame: &mut Frame, input: &str) {
    let area = centered(frame.area(), 40, 5);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title("Who's playing?");
    let text = vec![
        Line::from(format!("> {}_", input)).style(Style::default().fg(Color::White).bold()),
        Line::from(""),
        Line::from("Enter Start  Esc Back").style(Style::default().fg(Color::DarkGray)),
    ];
    frame.render_widget(Paragraph::new(text).block(block), area);
}

/// Render the in-game screen and return the board rectangle.
fn render_game(frame: &mut Frame, app: &App) -> Rect {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(COLUMNS as u16 * TILE_W + 2), // Board
            Constraint::Min(30),                             // HUD
        ])
        .split(area);

    let board = board_area(layout[0]);
    render_board(frame, board, app);
    render_hud(frame, layout[1], app);
    board
}

/// Where the board sits inside `area`: top-left aligned with a one cell
/// margin, sized to the full grid.
pub fn board_area(area: Rect) -> Rect {
    let width = COLUMNS as u16 * TILE_W;
    let height = rows_in_col(0).max(rows_in_col(1)) as u16 * TILE_H;
    Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        width.min(area.width.saturating_sub(1)),
        height.min(area.height.saturating_sub(1)),
    )
}

/// Screen rectangle of the tile cell at `pos` inside a board.
pub fn tile_rect(board: Rect, pos: Pos) -> Rect {
    let offset = if pos.col % 2 == 1 { TILE_H / 2 } else { 0 };
    Rect::new(
        board.x + pos.col as u16 * TILE_W,
        board.y + pos.row as u16 * TILE_H + offset,
        TILE_W,
        TILE_H,
    )
}

/// The grid cell under a screen coordinate, if any.
pub fn tile_at(board: Rect, x: u16, y: u16) -> Option<Pos> {
    if x < board.x || y < board.y || x >= board.right() || y >= board.bottom() {
        return None;
    }
    let col = ((x - board.x) / TILE_W) as i32;
    let offset = if col % 2 == 1 { TILE_H / 2 } else { 0 };
    let dy = (y - board.y).checked_sub(offset)?;
    let pos = Pos::new(col, (dy / TILE_H) as i32);
    in_bounds(pos).then_some(pos)
}

fn kind_color(kind: TileKind) -> Color {
    match kind {
        TileKind::Normal => Color::White,
        TileKind::Attack => Color::Red,
        TileKind::Heal => Color::Green,
        TileKind::Poison => Color::Magenta,
        TileKind::Gold => Color::Yellow,
        TileKind::Silver => Color::Cyan,
        TileKind::Stone => Color::DarkGray,
    }
}

fn render_board(frame: &mut Frame, board: Rect, app: &App) {
    let game = app.game();
    let screen = frame.area();
    let in_snake = |pos: Pos| {
        game.board()
            .id_at(pos)
            .is_some_and(|id| game.snake().contains(id))
    };

    for pos in positions() {
        let rect = tile_rect(board, pos);
        if rect.right() > screen.right() || rect.bottom() > screen.bottom() {
            continue;
        }
        let Some(id) = game.board().id_at(pos) else {
            continue;
        };
        let tile = game.board().tile(id);
        let color = kind_color(tile.kind());

        let mut border = Style::default().fg(color);
        if tile.marked() {
            border = border.fg(Color::LightYellow).bold();
        }
        if in_snake(pos) {
            border = border.fg(Color::LightBlue).bold();
        }
        if pos == app.cursor {
            border = border.add_modifier(Modifier::REVERSED);
        }

        let mut text_style = Style::default().fg(color).bold();
        if app.is_highlighted(id) {
            text_style = text_style.bg(Color::Blue);
        }
        if in_snake(pos) {
            text_style = text_style.fg(Color::Black).bg(Color::LightBlue);
        }

        let detail = if tile.kind().has_countdown() {
            format!("{}", tile.timer())
        } else if tile.kind() == TileKind::Stone {
            String::new()
        } else {
            format!("{}", tile.point_value())
        };
        let text = vec![
            Line::from(tile.label()).style(text_style),
            Line::from(detail).style(Style::default().fg(Color::DarkGray)),
        ];
        let block = Block::default().borders(Borders::ALL).border_style(border);
        frame.render_widget(
            Paragraph::new(text).block(block).alignment(Alignment::Center),
            rect,
        );
    }
}

fn render_hud(frame: &mut Frame, area: Rect, app: &App) {
    let game = app.game();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // HP
            Constraint::Length(5), // Stats
            Constraint::Length(2), // Preview
            Constraint::Length(1), // Feedback
            Constraint::Min(3),    // History
            Constraint::Length(2), // Footer
        ])
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled("BOOKSNEK ", Style::default().fg(Color::Green).bold()),
        Span::styled(game.player().to_string(), Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(title, layout[0]);

    let health = game.health();
    let ratio = if health.hp_max() == 0 {
        0.0
    } else {
        f64::from(health.hp()) / f64::from(health.hp_max())
    };
    let hp_color = if ratio <= 0.25 {
        Color::Red
    } else if ratio <= 0.5 {
        Color::Yellow
    } else {
        Color::Green
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(hp_color).bg(Color::Black))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("HP {}/{}", health.hp(), health.hp_max()));
    frame.render_widget(gauge, layout[1]);

    let bonus = game
        .bonus_word()
        .map_or_else(|| "-".to_string(), |w| format!("{} ({})", w, game.bonus_len()));
    let best = game
        .best()
        .map_or_else(|| "-".to_string(), |b| format!("{} {}", b.word, b.score));
    let stats = vec![
        Line::from(format!("Score: {}", game.score())).style(Style::default().fg(Color::Magenta).bold()),
        Line::from(format!(
            "Level {}  EXP {}/{}  x{}",
            game.level(),
            game.exp(),
            game.exp_target(),
            game.multiplier()
        )),
        Line::from(vec![
            Span::raw("Bonus: "),
            Span::styled(bonus, Style::default().fg(Color::Yellow)),
        ]),
        Line::from(format!("Longest: {}", game.longest().unwrap_or("-"))),
        Line::from(format!("Best: {}", best)),
    ];
    frame.render_widget(Paragraph::new(stats), layout[2]);

    let preview = game.preview();
    let preview_style = if preview.bonus {
        Style::default().fg(Color::Yellow).bold()
    } else if preview.in_dictionary {
        Style::default().fg(Color::Green).bold()
    } else {
        Style::default().fg(Color::White)
    };
    let preview_line = if preview.word.is_empty() {
        Line::from("> _").style(Style::default().fg(Color::DarkGray))
    } else {
        Line::from(format!("> {}  +{}", preview.word, preview.score)).style(preview_style)
    };
    let status = if game.is_resolving() {
        Line::from(format!("resolving... {} left", game.pending().map_or(0, |q| q.remaining())))
            .style(Style::default().fg(Color::DarkGray))
    } else {
        Line::from("")
    };
    frame.render_widget(Paragraph::new(vec![preview_line, status]), layout[3]);

    let (feedback_text, feedback_color) = format_feedback(&app.feedback);
    frame.render_widget(
        Paragraph::new(feedback_text).style(Style::default().fg(feedback_color)),
        layout[4],
    );

    let items: Vec<ListItem> = game.history().iter().rev().map(history_item).collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("History"),
    );
    frame.render_widget(list, layout[5]);

    let footer = Paragraph::new(vec![
        Line::from("Click/Space select  Right-click trim  Enter submit  Bksp undo  Del clear"),
        Line::from("s scramble  m mark  u unmark  Shift+letter find  F2 save  F3 load  Esc menu"),
    ])
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, layout[6]);
}

fn tag_color(tag: LetterTag) -> Color {
    match tag {
        LetterTag::Plain => Color::White,
        LetterTag::Bonus => Color::Yellow,
        LetterTag::Attack => Color::Red,
        LetterTag::Heal => Color::Green,
        LetterTag::Gold => Color::LightYellow,
        LetterTag::Poison => Color::Magenta,
        LetterTag::Silver => Color::Cyan,
    }
}

fn history_item(entry: &HistoryEntry) -> ListItem<'static> {
    let mut spans: Vec<Span> = entry
        .word
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let tag = entry.tags.get(i).copied().unwrap_or(LetterTag::Plain);
            Span::styled(c.to_string(), Style::default().fg(tag_color(tag)))
        })
        .collect();
    spans.push(Span::styled(
        format!("  {}", entry.score),
        Style::default().fg(Color::DarkGray),
    ));
    ListItem::new(Line::from(spans))
}

fn render_slot_picker(frame: &mut Frame, action: SlotAction, selected: usize, slots: &[Option<SlotInfo>]) {
    let title = match action {
        SlotAction::Save => "Save to slot",
        SlotAction::Load => "Load from slot",
    };
    let items: Vec<ListItem> = slots
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let label = match slot {
                Some(info) => format!(
                    "{}. {:<12} score {:>6}  level {}",
                    i + 1,
                    info.player,
                    info.score,
                    info.level
                ),
                None => format!("{}. <empty>", i + 1),
            };
            let style = if i == selected {
                Style::default().fg(Color::Yellow).bold()
            } else if slot.is_none() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if i == selected { "> " } else { "  " };
            ListItem::new(format!("{}{}", prefix, label)).style(style)
        })
        .collect();

    let area = centered(frame.area(), 50, slots.len() as u16 + 4);
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title)
            .title_bottom("Enter Pick  Del Delete  Esc Cancel"),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(list, area);
}

fn render_game_over(frame: &mut Frame, app: &App, made_table: bool) {
    let game = app.game();
    let mut lines = vec![
        Line::from("GAME OVER").style(Style::default().fg(Color::Red).bold()),
        Line::from(""),
        Line::from(format!("Final Score: {}", game.score())).style(Style::default().fg(Color::Yellow).bold()),
        Line::from(format!("Level {}", game.level())),
    ];
    if let Some(best) = game.best() {
        lines.push(Line::from(format!("Best word: {} ({})", best.word, best.score)));
    }
    if made_table {
        lines.push(Line::from("New hi-score!").style(Style::default().fg(Color::Green).bold()));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("Enter Hi-scores  Esc Menu").style(Style::default().fg(Color::DarkGray)));
    render_popup(frame, lines);
}

fn render_hi_scores(frame: &mut Frame, scores: &[HiScore]) {
    let items: Vec<ListItem> = if scores.is_empty() {
        vec![ListItem::new("No games finished yet").style(Style::default().fg(Color::DarkGray))]
    } else {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let style = if i == 0 {
                    Style::default().fg(Color::Yellow).bold()
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(format!(
                    "{:>2}. {:<12} {:>7}  level {}",
                    i + 1,
                    s.player,
                    s.score,
                    s.level
                ))
                .style(style)
            })
            .collect()
    };
    let area = centered(frame.area(), 44, scores.len().max(1) as u16 + 4);
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title("Hi-Scores")
            .title_bottom("Esc Back"),
    );
    frame.render_widget(list, area);
}

/// Render error screen
fn render_error(frame: &mut Frame, message: &str) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Percentage(40),
        ])
        .margin(2)
        .split(area);

    let error = Paragraph::new(format!("Error: {}", message))
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center);
    frame.render_widget(error, layout[1]);

    let hint = Paragraph::new("Press Esc to go back")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(hint, layout[2]);
}

fn render_popup(frame: &mut Frame, lines: Vec<Line<'_>>) {
    let width = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16 + 6;
    let area = centered(frame.area(), width, lines.len() as u16 + 2);
    let popup = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Yellow)));
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

/// A `width` x `height` rectangle centered in `area`, clipped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Format feedback with appropriate color
fn format_feedback(feedback: &str) -> (String, Color) {
    if feedback.is_empty() {
        return (String::new(), Color::White);
    }

    let color = if feedback.starts_with("OK") || feedback.starts_with("HEAL") {
        Color::Green
    } else if feedback.starts_with("Not in dictionary")
        || feedback.starts_with("Too short")
        || feedback.starts_with("OUCH")
        || feedback.starts_with("GAME OVER")
    {
        Color::Red
    } else if feedback.ends_with("appeared") || feedback.starts_with("Scramble") {
        Color::Yellow
    } else {
        Color::White
    };

    (feedback.to_string(), color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Rect {
        board_area(Rect::new(0, 0, 80, 40))
    }

    #[test]
    fn test_board_area_fits_grid() {
        let b = board();
        assert_eq!(b, Rect::new(1, 1, 42, 32));
        let small = board_area(Rect::new(0, 0, 20, 10));
        assert_eq!(small.width, 19);
        assert_eq!(small.height, 9);
    }

    #[test]
    fn test_tile_rect_offsets_odd_columns() {
        let b = board();
        assert_eq!(tile_rect(b, Pos::new(0, 0)), Rect::new(1, 1, TILE_W, TILE_H));
        assert_eq!(tile_rect(b, Pos::new(1, 0)), Rect::new(7, 3, TILE_W, TILE_H));
        assert_eq!(tile_rect(b, Pos::new(2, 3)), Rect::new(13, 13, TILE_W, TILE_H));
    }

    #[test]
    fn test_tile_at_inverts_tile_rect() {
        let b = board();
        for pos in positions() {
            let r = tile_rect(b, pos);
            assert_eq!(tile_at(b, r.x, r.y), Some(pos));
            assert_eq!(tile_at(b, r.right() - 1, r.bottom() - 1), Some(pos));
        }
    }

    #[test]
    fn test_tile_at_misses() {
        let b = board();
        // above the board
        assert_eq!(tile_at(b, 5, 0), None);
        // gap above the first odd-column tile
        assert_eq!(tile_at(b, 8, 1), None);
        // below the last odd-column tile
        assert_eq!(tile_at(b, 8, 31), None);
        // right of the board
        assert_eq!(tile_at(b, 60, 5), None);
    }

    #[test]
    fn test_centered_clips() {
        let area = Rect::new(0, 0, 10, 10);
        assert_eq!(centered(area, 4, 2), Rect::new(3, 4, 4, 2));
        assert_eq!(centered(area, 40, 20), area);
    }

    #[test]
    fn test_feedback_colors() {
        assert_eq!(format_feedback("OK +15 (CAT)").1, Color::Green);
        assert_eq!(format_feedback("Not in dictionary").1, Color::Red);
        assert_eq!(format_feedback("OUCH -3 HP").1, Color::Red);
        assert_eq!(format_feedback("Gold tile appeared").1, Color::Yellow);
        assert_eq!(format_feedback("").0, "");
    }
}
