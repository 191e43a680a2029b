//! Board engine: per-game grids with move and change stacks

pub mod amazons;
pub mod board;
pub mod go;
pub mod othello;
pub mod position_list;
pub mod rules;

#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

// Re-exports
pub use board::{Board, BoardChanges};
pub use position_list::BoardPositionList;
pub use rules::{GameData, GameRules};

/// Smallest supported board dimension (per axis)
pub const BOARD_MIN_SIZE: u8 = 5;
/// Largest supported board dimension (per axis)
pub const BOARD_MAX_SIZE: u8 = 25;
/// Row stride of the bordered grid; one sentinel column on each side.
pub const FULL_GRID_WIDTH: usize = BOARD_MAX_SIZE as usize + 2;

/// Grid index of a point. The grid carries a one-cell `OffGrid` border, so
/// `(0, 0)` maps to the second cell of the second row.
#[inline]
pub const fn position(x: u8, y: u8) -> usize {
    (y as usize + 1) * FULL_GRID_WIDTH + (x as usize + 1)
}

/// Player colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Index for per-color arrays
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
        }
    }
}

/// Grid cell contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
    /// Burnt square (Amazons)
    Arrow,
    /// Border sentinel around the playable area
    OffGrid,
}

impl Cell {
    #[inline]
    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Black => Some(Color::Black),
            Cell::White => Some(Color::White),
            _ => None,
        }
    }

    #[inline]
    pub fn is_on_grid(self) -> bool {
        self != Cell::OffGrid
    }

    pub(crate) fn to_word(self) -> i32 {
        match self {
            Cell::Empty => 0,
            Cell::Black => 1,
            Cell::White => 2,
            Cell::Arrow => 3,
            Cell::OffGrid => 4,
        }
    }

    pub(crate) fn from_word(word: i32) -> Cell {
        match word {
            0 => Cell::Empty,
            1 => Cell::Black,
            2 => Cell::White,
            3 => Cell::Arrow,
            _ => Cell::OffGrid,
        }
    }
}

impl From<Color> for Cell {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Cell::Black,
            Color::White => Cell::White,
        }
    }
}

/// Point on the playable area, `(0, 0)` being the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u8,
    pub y: u8,
}

impl Point {
    #[inline]
    pub fn new(x: u8, y: u8) -> Self {
        debug_assert!(x < BOARD_MAX_SIZE && y < BOARD_MAX_SIZE);
        Self { x, y }
    }

    #[inline]
    pub fn to_position(self) -> usize {
        position(self.x, self.y)
    }

    #[inline]
    pub fn from_position(pos: usize) -> Self {
        Self {
            x: (pos % FULL_GRID_WIDTH - 1) as u8,
            y: (pos / FULL_GRID_WIDTH - 1) as u8,
        }
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_position().cmp(&other.to_position())
    }
}

/// A move in any supported game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Move {
    #[default]
    Pass,
    /// Stone placement (Go, Othello)
    Play(Point),
    /// Queen move followed by an arrow shot
    Amazons { from: Point, to: Point, arrow: Point },
}

impl Move {
    /// Point the move lands on; `None` for a pass
    pub fn point(&self) -> Option<Point> {
        match *self {
            Move::Pass => None,
            Move::Play(point) => Some(point),
            Move::Amazons { to, .. } => Some(to),
        }
    }

    #[inline]
    pub fn is_pass(&self) -> bool {
        matches!(self, Move::Pass)
    }
}

/// Supported games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Game {
    Go,
    Othello,
    Amazons,
}

impl Game {
    pub const ALL: [Game; 3] = [Game::Go, Game::Othello, Game::Amazons];

    /// Rules provider for this game
    pub fn rules(self) -> &'static dyn GameRules {
        match self {
            Game::Go => &go::GoRules,
            Game::Othello => &othello::OthelloRules,
            Game::Amazons => &amazons::AmazonsRules,
        }
    }

    /// `GM[]` value used in SGF files
    pub fn sgf_number(self) -> u32 {
        match self {
            Game::Go => 1,
            Game::Othello => 2,
            Game::Amazons => 18,
        }
    }

    pub fn from_sgf_number(number: u32) -> Option<Game> {
        Game::ALL.into_iter().find(|game| game.sgf_number() == number)
    }

    pub fn name(self) -> &'static str {
        match self {
            Game::Go => "Go",
            Game::Othello => "Othello",
            Game::Amazons => "Amazons",
        }
    }

    #[inline]
    pub fn is_valid_size(width: u8, height: u8) -> bool {
        (BOARD_MIN_SIZE..=BOARD_MAX_SIZE).contains(&width)
            && (BOARD_MIN_SIZE..=BOARD_MAX_SIZE).contains(&height)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Game {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "go" => Ok(Game::Go),
            "othello" | "reversi" => Ok(Game::Othello),
            "amazons" => Ok(Game::Amazons),
            _ => Err(Error::UnknownGame(s.to_string())),
        }
    }
}
