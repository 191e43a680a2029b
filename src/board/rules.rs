//! Game rules providers
//!
//! Each supported game implements [`GameRules`]. The board calls through this
//! trait exclusively and never special-cases a game by name.

use std::fmt;

use super::board::{Board, BoardChanges};
use super::go::GoData;
use super::{Cell, Color, Game, Move, Point, FULL_GRID_WIDTH};
use crate::error::Result;

/// Column labels skipping `I`, as is customary for Go
pub const GO_COLUMN_LABELS: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";
/// Column labels using the alphabet in order
pub const PLAIN_COLUMN_LABELS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXY";

/// Neighbor offsets in the bordered grid (orthogonal)
pub(crate) const ORTHOGONAL: [isize; 4] = [
    -(FULL_GRID_WIDTH as isize),
    -1,
    1,
    FULL_GRID_WIDTH as isize,
];

/// Neighbor offsets in the bordered grid (all eight directions)
pub(crate) const ALL_DIRECTIONS: [isize; 8] = [
    -(FULL_GRID_WIDTH as isize) - 1,
    -(FULL_GRID_WIDTH as isize),
    -(FULL_GRID_WIDTH as isize) + 1,
    -1,
    1,
    FULL_GRID_WIDTH as isize - 1,
    FULL_GRID_WIDTH as isize,
    FULL_GRID_WIDTH as isize + 1,
];

#[inline]
pub(crate) fn step(pos: usize, delta: isize) -> usize {
    pos.wrapping_add_signed(delta)
}

/// Game-specific board data reset together with the grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GameData {
    #[default]
    None,
    Go(GoData),
}

/// Per-game move semantics and sizing metadata.
///
/// Move application pushes whatever the game needs onto the board's move
/// stack; `undo` must pop exactly the same words back.
pub trait GameRules: Sync + fmt::Debug {
    fn game(&self) -> Game;

    /// Approximate number of move-stack words one move occupies
    fn stack_entry_size(&self) -> usize;

    /// Expected number of moves in a game, relative to the board area
    fn relative_num_moves_per_game(&self) -> f64;

    fn default_board_size(&self) -> u8;

    fn standard_board_sizes(&self) -> &'static [u8];

    /// Color that moves first when nothing says otherwise
    fn first_color_to_play(&self) -> Color;

    fn column_labels(&self) -> &'static [u8] {
        PLAIN_COLUMN_LABELS
    }

    fn reset_game_data(&self) -> GameData {
        GameData::None
    }

    fn is_legal_move(&self, board: &Board, color: Color, mv: &Move) -> bool;

    fn play_move(&self, board: &mut Board, color: Color, mv: &Move);

    /// Revert the most recent move pushed by `play_move`
    fn undo(&self, board: &mut Board);

    /// Batched stone placement/removal, undoable through the change stack
    fn apply_changes(&self, board: &mut Board, changes: &BoardChanges) {
        board.record_changes(changes);
    }

    fn add_dummy_move_entry(&self, board: &mut Board) {
        board.push_dummy_entry();
    }

    /// Color to play when the game record does not say. `handicap` is the
    /// `HA` value in effect, `-1` if unknown.
    fn default_color_to_play(&self, _board: &Board, _handicap: i32) -> Color {
        self.first_color_to_play()
    }

    /// Game-specific correction of the color to play (e.g. forced passes)
    fn adjust_color_to_play(&self, _board: &Board, color: Color) -> Color {
        color
    }

    /// Initial stone placement, if the game has one
    fn default_setup(&self, _width: u8, _height: u8) -> Option<BoardChanges> {
        None
    }

    /// Whether a cell value may appear inside the playable area
    fn is_valid_cell(&self, cell: Cell) -> bool {
        matches!(cell, Cell::Empty | Cell::Black | Cell::White)
    }

    fn validate_board(&self, board: &Board) -> bool {
        validate_grid(self, board)
    }

    fn format_move(&self, mv: &Move, width: u8, height: u8) -> String;

    fn parse_move(&self, text: &str, width: u8, height: u8) -> Result<Move>;

    fn format_point(&self, point: Point, height: u8) -> String {
        let column = self.column_labels()[point.x as usize] as char;
        format!("{}{}", column, height - point.y)
    }

    fn parse_point(&self, text: &str, width: u8, height: u8) -> Option<Point> {
        let text = text.trim();
        let mut chars = text.chars();
        let column = chars.next()?.to_ascii_uppercase();
        let x = self.column_labels().iter().position(|&c| c as char == column)?;
        let row: u8 = chars.as_str().parse().ok()?;

        if x >= width as usize || row == 0 || row > height {
            return None;
        }
        Some(Point::new(x as u8, height - row))
    }

    fn dump_board(&self, board: &Board) -> String {
        let mut out = String::from("   ");
        for x in 0..board.width() {
            out.push(' ');
            out.push(self.column_labels()[x as usize] as char);
        }
        out.push('\n');

        for y in 0..board.height() {
            out.push_str(&format!("{:>3}", board.height() - y));
            for x in 0..board.width() {
                out.push(' ');
                out.push(match board.get(x, y) {
                    Cell::Empty => '.',
                    Cell::Black => 'X',
                    Cell::White => 'O',
                    Cell::Arrow => '#',
                    Cell::OffGrid => '?',
                });
            }
            out.push('\n');
        }
        out
    }
}

/// Border must be intact and every playable cell must hold a valid value.
pub(crate) fn validate_grid<R: GameRules + ?Sized>(rules: &R, board: &Board) -> bool {
    board.grid().iter().enumerate().all(|(pos, &cell)| {
        if board.is_on_grid(pos) {
            rules.is_valid_cell(cell)
        } else {
            cell == Cell::OffGrid
        }
    })
}
