//! Game of the Amazons rules

use super::board::{Board, BoardChanges};
use super::position_list::BoardPositionList;
use super::rules::{step, GameRules, ALL_DIRECTIONS};
use super::{Cell, Color, Game, Move, Point};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct AmazonsRules;

/// Whether `to` is reachable from `from` along a queen line over empty
/// squares. `vacated` is treated as empty.
fn is_queen_reachable(board: &Board, from: usize, to: usize, vacated: Option<usize>) -> bool {
    if from == to {
        return false;
    }
    let is_free = |pos: usize| board.cell(pos) == Cell::Empty || Some(pos) == vacated;

    ALL_DIRECTIONS.iter().any(|&delta| {
        let mut current = step(from, delta);
        while board.is_on_grid(current) && is_free(current) {
            if current == to {
                return true;
            }
            current = step(current, delta);
        }
        false
    })
}

impl GameRules for AmazonsRules {
    fn game(&self) -> Game {
        Game::Amazons
    }

    fn stack_entry_size(&self) -> usize {
        4
    }

    fn relative_num_moves_per_game(&self) -> f64 {
        1.0
    }

    fn default_board_size(&self) -> u8 {
        10
    }

    fn standard_board_sizes(&self) -> &'static [u8] {
        &[10]
    }

    fn first_color_to_play(&self) -> Color {
        Color::White
    }

    fn is_valid_cell(&self, cell: Cell) -> bool {
        cell != Cell::OffGrid
    }

    fn is_legal_move(&self, board: &Board, color: Color, mv: &Move) -> bool {
        let Move::Amazons { from, to, arrow } = *mv else {
            return false;
        };
        let (from, to, arrow) = (from.to_position(), to.to_position(), arrow.to_position());

        board.is_on_grid(from)
            && board.cell(from) == Cell::from(color)
            && is_queen_reachable(board, from, to, None)
            && is_queen_reachable(board, to, arrow, Some(from))
    }

    fn play_move(&self, board: &mut Board, color: Color, mv: &Move) {
        let Move::Amazons { from, to, arrow } = *mv else {
            panic!("Amazons board requires a queen move with an arrow");
        };
        let (from, to, arrow) = (from.to_position(), to.to_position(), arrow.to_position());

        board.set_cell(from, Cell::Empty);
        board.set_cell(to, Cell::from(color));
        board.set_cell(arrow, Cell::Arrow);

        board.push_word(from as i32);
        board.push_word(to as i32);
        board.push_word(arrow as i32);
        board.push_word(color.index() as i32);
    }

    fn undo(&self, board: &mut Board) {
        let color = if board.pop_word() == 0 { Color::Black } else { Color::White };
        let arrow = board.pop_word() as usize;
        let to = board.pop_word() as usize;
        let from = board.pop_word() as usize;

        board.set_cell(arrow, Cell::Empty);
        board.set_cell(to, Cell::Empty);
        board.set_cell(from, Cell::from(color));
    }

    fn default_setup(&self, width: u8, height: u8) -> Option<BoardChanges> {
        let (x1, y1) = ((width - 1) / 3, (height - 1) / 3);
        let (x2, y2) = (width - 1 - x1, height - 1 - y1);
        let (right, bottom) = (width - 1, height - 1);

        Some(BoardChanges {
            black: BoardPositionList::from_points([
                Point::new(0, y1),
                Point::new(x1, 0),
                Point::new(x2, 0),
                Point::new(right, y1),
            ]),
            white: BoardPositionList::from_points([
                Point::new(0, y2),
                Point::new(x1, bottom),
                Point::new(x2, bottom),
                Point::new(right, y2),
            ]),
            ..Default::default()
        })
    }

    fn format_move(&self, mv: &Move, _width: u8, height: u8) -> String {
        match *mv {
            Move::Amazons { from, to, arrow } => format!(
                "{}-{}x{}",
                self.format_point(from, height),
                self.format_point(to, height),
                self.format_point(arrow, height)
            ),
            Move::Play(point) => self.format_point(point, height),
            Move::Pass => "pass".to_string(),
        }
    }

    fn parse_move(&self, text: &str, width: u8, height: u8) -> Result<Move> {
        let invalid = || Error::InvalidMoveNotation { game: "Amazons", text: text.to_string() };

        let (from, rest) = text.split_once('-').ok_or_else(invalid)?;
        let (to, arrow) = rest
            .split_once(|c: char| c == 'x' || c == 'X')
            .ok_or_else(invalid)?;

        Ok(Move::Amazons {
            from: self.parse_point(from, width, height).ok_or_else(invalid)?,
            to: self.parse_point(to, width, height).ok_or_else(invalid)?,
            arrow: self.parse_point(arrow, width, height).ok_or_else(invalid)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_board() -> Board {
        let mut board = Board::new(Game::Amazons, 10, 10);
        board.apply_changes(&AmazonsRules.default_setup(10, 10).unwrap());
        board
    }

    #[test]
    fn test_default_setup_matches_standard_position() {
        let board = setup_board();
        // a4, d1, g1, j4 white; a7, d10, g10, j7 black
        assert_eq!(board.get(0, 6), Cell::White);
        assert_eq!(board.get(3, 9), Cell::White);
        assert_eq!(board.get(6, 9), Cell::White);
        assert_eq!(board.get(9, 6), Cell::White);
        assert_eq!(board.get(0, 3), Cell::Black);
        assert_eq!(board.get(3, 0), Cell::Black);
        assert_eq!(board.get(9, 3), Cell::Black);
    }

    #[test]
    fn test_move_legality_and_undo() {
        let mut board = setup_board();
        let mv = AmazonsRules.parse_move("D1-D7xD1", 10, 10).unwrap();
        assert_eq!(
            mv,
            Move::Amazons { from: Point::new(3, 9), to: Point::new(3, 3), arrow: Point::new(3, 9) }
        );
        assert!(board.is_legal_move(Color::White, &mv));
        assert!(!board.is_legal_move(Color::Black, &mv));

        board.play_move(Color::White, &mv);
        assert_eq!(board.get(3, 3), Cell::White);
        assert_eq!(board.get(3, 9), Cell::Arrow);

        board.undo(1);
        assert_eq!(board.get(3, 3), Cell::Empty);
        assert_eq!(board.get(3, 9), Cell::White);
    }

    #[test]
    fn test_blocked_path_is_illegal() {
        let board = setup_board();
        // a4 cannot pass through a7 to reach a8
        let mv = Move::Amazons { from: Point::new(0, 6), to: Point::new(0, 2), arrow: Point::new(0, 1) };
        assert!(!board.is_legal_move(Color::White, &mv));
    }

    #[test]
    fn test_format_round_trip() {
        let mv = Move::Amazons { from: Point::new(0, 6), to: Point::new(0, 4), arrow: Point::new(5, 4) };
        let text = AmazonsRules.format_move(&mv, 10, 10);
        assert_eq!(text, "A4-A6xF6");
        assert_eq!(AmazonsRules.parse_move(&text, 10, 10), Ok(mv));
        assert!(AmazonsRules.parse_move("A4-A6", 10, 10).is_err());
    }
}
