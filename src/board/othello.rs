//! Othello (Reversi) rules

use tracing::warn;

use super::board::{Board, BoardChanges, PASS_WORD};
use super::position_list::BoardPositionList;
use super::rules::{step, GameRules, ALL_DIRECTIONS};
use super::{Cell, Color, Game, Move, Point};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct OthelloRules;

/// Opponent stones flipped by placing `color` at `pos`
fn flips(board: &Board, pos: usize, color: Color) -> Vec<usize> {
    let own = Cell::from(color);
    let opponent = Cell::from(color.opponent());
    let mut flipped = Vec::new();

    for &delta in &ALL_DIRECTIONS {
        let mut line = Vec::new();
        let mut current = step(pos, delta);
        while board.cell(current) == opponent {
            line.push(current);
            current = step(current, delta);
        }
        if !line.is_empty() && board.cell(current) == own {
            flipped.extend(line);
        }
    }

    flipped
}

fn is_legal_placement(board: &Board, pos: usize, color: Color) -> bool {
    board.is_on_grid(pos) && board.cell(pos) == Cell::Empty && !flips(board, pos, color).is_empty()
}

/// Whether `color` has any placement available
pub fn has_legal_placement(board: &Board, color: Color) -> bool {
    (0..board.grid().len()).any(|pos| board.cell(pos) == Cell::Empty && !flips(board, pos, color).is_empty())
}

impl GameRules for OthelloRules {
    fn game(&self) -> Game {
        Game::Othello
    }

    fn stack_entry_size(&self) -> usize {
        8
    }

    fn relative_num_moves_per_game(&self) -> f64 {
        1.0
    }

    fn default_board_size(&self) -> u8 {
        8
    }

    fn standard_board_sizes(&self) -> &'static [u8] {
        &[8]
    }

    fn first_color_to_play(&self) -> Color {
        Color::Black
    }

    fn is_legal_move(&self, board: &Board, color: Color, mv: &Move) -> bool {
        match mv {
            Move::Pass => !has_legal_placement(board, color),
            Move::Play(point) => is_legal_placement(board, point.to_position(), color),
            Move::Amazons { .. } => false,
        }
    }

    fn play_move(&self, board: &mut Board, color: Color, mv: &Move) {
        let pos = match mv {
            Move::Pass => {
                board.push_word(0);
                board.push_word(PASS_WORD);
                board.push_word(color.index() as i32);
                return;
            }
            Move::Play(point) => point.to_position(),
            Move::Amazons { .. } => panic!("Amazons move played on an Othello board"),
        };

        let previous = board.cell(pos);
        if previous != Cell::Empty {
            warn!(pos, ?previous, "Othello move on an occupied square");
        }
        let flipped = flips(board, pos, color);
        board.set_cell(pos, Cell::from(color));
        for &stone in &flipped {
            board.set_cell(stone, Cell::from(color));
            board.push_word(stone as i32);
        }

        board.push_word(flipped.len() as i32);
        board.push_word(previous.to_word());
        board.push_word(pos as i32);
        board.push_word(color.index() as i32);
    }

    fn undo(&self, board: &mut Board) {
        let color = if board.pop_word() == 0 { Color::Black } else { Color::White };
        let pos_word = board.pop_word();
        if pos_word == PASS_WORD {
            board.pop_word();
            return;
        }

        let previous = Cell::from_word(board.pop_word());
        let num_flipped = board.pop_word() as usize;
        for _ in 0..num_flipped {
            let stone = board.pop_word() as usize;
            board.set_cell(stone, Cell::from(color.opponent()));
        }
        board.set_cell(pos_word as usize, previous);
    }

    /// A player without placements passes automatically.
    fn adjust_color_to_play(&self, board: &Board, color: Color) -> Color {
        if !has_legal_placement(board, color) && has_legal_placement(board, color.opponent()) {
            color.opponent()
        } else {
            color
        }
    }

    fn default_setup(&self, width: u8, height: u8) -> Option<BoardChanges> {
        let (x, y) = (width / 2 - 1, height / 2 - 1);
        Some(BoardChanges {
            black: BoardPositionList::from_points([Point::new(x + 1, y), Point::new(x, y + 1)]),
            white: BoardPositionList::from_points([Point::new(x, y), Point::new(x + 1, y + 1)]),
            ..Default::default()
        })
    }

    fn format_move(&self, mv: &Move, _width: u8, height: u8) -> String {
        match mv {
            Move::Play(point) => self.format_point(*point, height),
            _ => "pass".to_string(),
        }
    }

    fn parse_move(&self, text: &str, width: u8, height: u8) -> Result<Move> {
        if text.trim().eq_ignore_ascii_case("pass") {
            return Ok(Move::Pass);
        }
        self.parse_point(text, width, height)
            .map(Move::Play)
            .ok_or_else(|| Error::InvalidMoveNotation { game: "Othello", text: text.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_board() -> Board {
        let mut board = Board::new(Game::Othello, 8, 8);
        let setup = OthelloRules.default_setup(8, 8).unwrap();
        board.apply_changes(&setup);
        board
    }

    #[test]
    fn test_default_setup() {
        let board = setup_board();
        assert_eq!(board.get(3, 3), Cell::White);
        assert_eq!(board.get(4, 4), Cell::White);
        assert_eq!(board.get(4, 3), Cell::Black);
        assert_eq!(board.get(3, 4), Cell::Black);
        assert_eq!(board.count(Cell::Black), 2);
    }

    #[test]
    fn test_flip_and_undo() {
        let mut board = setup_board();
        let mv = Move::Play(Point::new(2, 3));
        assert!(board.is_legal_move(Color::Black, &mv));
        assert!(!board.is_legal_move(Color::Black, &Move::Pass));

        board.play_move(Color::Black, &mv);
        assert_eq!(board.get(3, 3), Cell::Black);
        assert_eq!(board.count(Cell::Black), 4);
        assert_eq!(board.count(Cell::White), 1);

        board.undo(1);
        assert_eq!(board.get(2, 3), Cell::Empty);
        assert_eq!(board.get(3, 3), Cell::White);
    }

    #[test]
    fn test_move_on_occupied_square_is_replayable() {
        let mut board = setup_board();
        board.play_move(Color::Black, &Move::Play(Point::new(3, 3)));
        assert_eq!(board.get(3, 3), Cell::Black);
        assert_eq!(board.count(Cell::White), 1);

        board.undo(1);
        assert_eq!(board.get(3, 3), Cell::White);
        assert_eq!(board.count(Cell::White), 2);
        assert_eq!(board.count(Cell::Black), 2);
    }

    #[test]
    fn test_non_flipping_placement_is_illegal() {
        let board = setup_board();
        assert!(!board.is_legal_move(Color::Black, &Move::Play(Point::new(0, 0))));
        assert!(!board.is_legal_move(Color::Black, &Move::Play(Point::new(3, 3))));
    }

    #[test]
    fn test_forced_pass_adjusts_color() {
        let mut board = Board::new(Game::Othello, 8, 8);
        board.apply_changes(&BoardChanges {
            black: BoardPositionList::from_points([Point::new(0, 0), Point::new(1, 0)]),
            ..Default::default()
        });
        assert_eq!(OthelloRules.adjust_color_to_play(&board, Color::White), Color::White);

        board.apply_changes(&BoardChanges {
            white: BoardPositionList::from_points([Point::new(2, 0)]),
            ..Default::default()
        });
        // White has no flips available, black can flip (2, 0) from (3, 0)
        assert_eq!(OthelloRules.adjust_color_to_play(&board, Color::White), Color::Black);
    }
}
