//! Go rules: captures, suicide and simple ko

use tracing::warn;

use super::board::{Board, PASS_WORD};
use super::rules::{step, validate_grid, GameData, GameRules, GO_COLUMN_LABELS, ORTHOGONAL};
use super::{Cell, Color, Game, Move};
use crate::error::{Error, Result};

/// Go-specific board data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoData {
    /// Point that may not be played immediately (simple ko)
    pub ko_master: Option<usize>,
    /// Stones captured by each color
    pub prisoners: [u32; 2],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GoRules;

/// Stones of the group at `pos` and its liberties
fn collect_group(board: &Board, pos: usize) -> (Vec<usize>, Vec<usize>) {
    let color = board.cell(pos);
    let mut visited = vec![false; board.grid().len()];
    let mut stones = Vec::new();
    let mut liberties = Vec::new();
    let mut stack = vec![pos];
    visited[pos] = true;

    while let Some(current) = stack.pop() {
        stones.push(current);
        for &delta in &ORTHOGONAL {
            let neighbor = step(current, delta);
            if visited[neighbor] {
                continue;
            }
            let cell = board.cell(neighbor);
            if cell == color {
                visited[neighbor] = true;
                stack.push(neighbor);
            } else if cell == Cell::Empty {
                visited[neighbor] = true;
                liberties.push(neighbor);
            }
        }
    }

    (stones, liberties)
}

fn go_data(board: &Board) -> GoData {
    match board.data() {
        GameData::Go(data) => data.clone(),
        GameData::None => GoData::default(),
    }
}

fn go_data_mut(board: &mut Board) -> &mut GoData {
    let data = board.data_mut();
    if !matches!(data, GameData::Go(_)) {
        *data = GameData::Go(GoData::default());
    }
    match data {
        GameData::Go(go) => go,
        GameData::None => unreachable!(),
    }
}

/// Remove the group at `pos`, pushing its stones on the move stack
fn remove_group(board: &mut Board, stones: &[usize]) {
    for &stone in stones {
        board.set_cell(stone, Cell::Empty);
        board.push_word(stone as i32);
    }
}

impl GameRules for GoRules {
    fn game(&self) -> Game {
        Game::Go
    }

    fn stack_entry_size(&self) -> usize {
        4
    }

    fn relative_num_moves_per_game(&self) -> f64 {
        1.0
    }

    fn default_board_size(&self) -> u8 {
        19
    }

    fn standard_board_sizes(&self) -> &'static [u8] {
        &[9, 13, 19]
    }

    fn first_color_to_play(&self) -> Color {
        Color::Black
    }

    fn column_labels(&self) -> &'static [u8] {
        GO_COLUMN_LABELS
    }

    fn reset_game_data(&self) -> GameData {
        GameData::Go(GoData::default())
    }

    fn is_legal_move(&self, board: &Board, color: Color, mv: &Move) -> bool {
        let point = match mv {
            Move::Pass => return true,
            Move::Play(point) => *point,
            Move::Amazons { .. } => return false,
        };
        let pos = point.to_position();
        if !board.is_on_grid(pos) || board.cell(pos) != Cell::Empty {
            return false;
        }
        if go_data(board).ko_master == Some(pos) {
            return false;
        }

        let own = Cell::from(color);
        let opponent = Cell::from(color.opponent());
        ORTHOGONAL.iter().any(|&delta| {
            let neighbor = step(pos, delta);
            match board.cell(neighbor) {
                Cell::Empty => true,
                cell if cell == own => collect_group(board, neighbor).1.len() > 1,
                cell if cell == opponent => collect_group(board, neighbor).1.len() == 1,
                _ => false,
            }
        })
    }

    fn play_move(&self, board: &mut Board, color: Color, mv: &Move) {
        let previous_ko = go_data(board).ko_master;
        let ko_word = previous_ko.map_or(PASS_WORD, |pos| pos as i32);

        let point = match mv {
            Move::Pass => {
                go_data_mut(board).ko_master = None;
                board.push_word(ko_word);
                board.push_word(PASS_WORD);
                board.push_word(color.index() as i32);
                return;
            }
            Move::Play(point) => *point,
            Move::Amazons { .. } => panic!("Amazons move played on a Go board"),
        };

        // Records may play onto occupied points; the stone is replaced and
        // restored on undo.
        let pos = point.to_position();
        let previous = board.cell(pos);
        if previous != Cell::Empty {
            warn!(pos, ?previous, "Go move on an occupied point");
        }
        board.set_cell(pos, Cell::from(color));

        let opponent = Cell::from(color.opponent());
        let mut num_captured = 0;
        let mut last_captured = None;
        for &delta in &ORTHOGONAL {
            let neighbor = step(pos, delta);
            if board.cell(neighbor) != opponent {
                continue;
            }
            let (stones, liberties) = collect_group(board, neighbor);
            if liberties.is_empty() {
                remove_group(board, &stones);
                num_captured += stones.len();
                last_captured = stones.last().copied();
            }
        }
        board.push_word(num_captured as i32);

        let (own_stones, own_liberties) = collect_group(board, pos);
        let num_suicided = if own_liberties.is_empty() {
            remove_group(board, &own_stones);
            own_stones.len()
        } else {
            0
        };
        board.push_word(num_suicided as i32);
        board.push_word(previous.to_word());

        let ko_master = if num_captured == 1 && own_stones.len() == 1 && own_liberties.len() == 1 {
            last_captured
        } else {
            None
        };

        let data = go_data_mut(board);
        data.ko_master = ko_master;
        data.prisoners[color.index()] += num_captured as u32;
        data.prisoners[color.opponent().index()] += num_suicided as u32;

        board.push_word(ko_word);
        board.push_word(pos as i32);
        board.push_word(color.index() as i32);
    }

    fn undo(&self, board: &mut Board) {
        let color = if board.pop_word() == 0 { Color::Black } else { Color::White };
        let pos_word = board.pop_word();
        let ko_word = board.pop_word();
        let previous_ko = (ko_word != PASS_WORD).then_some(ko_word as usize);

        if pos_word != PASS_WORD {
            let previous = Cell::from_word(board.pop_word());
            let num_suicided = board.pop_word() as usize;
            for _ in 0..num_suicided {
                let stone = board.pop_word() as usize;
                board.set_cell(stone, Cell::from(color));
            }

            let num_captured = board.pop_word() as usize;
            for _ in 0..num_captured {
                let stone = board.pop_word() as usize;
                board.set_cell(stone, Cell::from(color.opponent()));
            }

            board.set_cell(pos_word as usize, previous);

            let data = go_data_mut(board);
            data.prisoners[color.index()] -= num_captured as u32;
            data.prisoners[color.opponent().index()] -= num_suicided as u32;
        }

        go_data_mut(board).ko_master = previous_ko;
    }

    /// White moves first in handicap games once the handicap stones are down.
    fn default_color_to_play(&self, board: &Board, handicap: i32) -> Color {
        if handicap > 0 && board.count(Cell::Black) > 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    fn validate_board(&self, board: &Board) -> bool {
        if !validate_grid(self, board) {
            return false;
        }
        match go_data(board).ko_master {
            Some(pos) => board.cell(pos) == Cell::Empty,
            None => true,
        }
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
            .ok_or_else(|| Error::InvalidMoveNotation { game: "Go", text: text.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardChanges, BoardPositionList, Point};

    fn play(board: &mut Board, color: Color, x: u8, y: u8) {
        board.play_move(color, &Move::Play(Point::new(x, y)));
    }

    fn prisoners(board: &Board) -> [u32; 2] {
        go_data(board).prisoners
    }

    #[test]
    fn test_single_stone_capture_and_undo() {
        let mut board = Board::new(Game::Go, 9, 9);
        play(&mut board, Color::Black, 1, 0);
        play(&mut board, Color::White, 0, 0);
        play(&mut board, Color::Black, 0, 1);

        assert_eq!(board.get(0, 0), Cell::Empty);
        assert_eq!(prisoners(&board), [1, 0]);

        board.undo(1);
        assert_eq!(board.get(0, 0), Cell::White);
        assert_eq!(board.get(0, 1), Cell::Empty);
        assert_eq!(prisoners(&board), [0, 0]);
    }

    #[test]
    fn test_ko_forbids_immediate_recapture() {
        let mut board = Board::new(Game::Go, 9, 9);
        //   . X O .
        //   X O * O
        //   . X O .
        play(&mut board, Color::Black, 1, 0);
        play(&mut board, Color::White, 2, 0);
        play(&mut board, Color::Black, 0, 1);
        play(&mut board, Color::White, 1, 1);
        play(&mut board, Color::Black, 1, 2);
        play(&mut board, Color::White, 3, 1);
        play(&mut board, Color::Black, 8, 8);
        play(&mut board, Color::White, 2, 2);
        play(&mut board, Color::Black, 2, 1);

        assert_eq!(board.get(1, 1), Cell::Empty);
        assert_eq!(go_data(&board).ko_master, Some(Point::new(1, 1).to_position()));
        assert!(!board.is_legal_move(Color::White, &Move::Play(Point::new(1, 1))));

        board.undo(1);
        assert_eq!(board.get(1, 1), Cell::White);
        assert_eq!(go_data(&board).ko_master, None);
    }

    #[test]
    fn test_move_on_occupied_point_is_replayable() {
        let mut board = Board::new(Game::Go, 9, 9);
        board.apply_changes(&BoardChanges {
            black: BoardPositionList::from_points([Point::new(2, 2)]),
            ..Default::default()
        });
        assert!(!board.is_legal_move(Color::White, &Move::Play(Point::new(2, 2))));

        play(&mut board, Color::White, 2, 2);
        assert_eq!(board.get(2, 2), Cell::White);
        assert_eq!(board.count(Cell::Black), 0);

        board.undo(1);
        assert_eq!(board.get(2, 2), Cell::Black);
        assert_eq!(prisoners(&board), [0, 0]);
    }

    #[test]
    fn test_suicide_is_illegal_but_playable() {
        let mut board = Board::new(Game::Go, 9, 9);
        play(&mut board, Color::Black, 1, 0);
        play(&mut board, Color::Black, 0, 1);

        let suicide = Move::Play(Point::new(0, 0));
        assert!(!board.is_legal_move(Color::White, &suicide));

        board.play_move(Color::White, &suicide);
        assert_eq!(board.get(0, 0), Cell::Empty);
        assert_eq!(prisoners(&board), [1, 0]);

        board.undo(1);
        assert_eq!(board.get(0, 0), Cell::Empty);
        assert_eq!(prisoners(&board), [0, 0]);
    }

    #[test]
    fn test_occupied_point_is_illegal() {
        let mut board = Board::new(Game::Go, 9, 9);
        play(&mut board, Color::Black, 4, 4);
        assert!(!board.is_legal_move(Color::White, &Move::Play(Point::new(4, 4))));
        assert!(board.is_legal_move(Color::White, &Move::Pass));
    }

    #[test]
    fn test_handicap_gives_white_the_first_move() {
        let mut board = Board::new(Game::Go, 9, 9);
        assert_eq!(GoRules.default_color_to_play(&board, 2), Color::Black);

        board.apply_changes(&crate::board::BoardChanges {
            black: crate::board::BoardPositionList::from_points([Point::new(2, 6), Point::new(6, 2)]),
            ..Default::default()
        });
        assert_eq!(GoRules.default_color_to_play(&board, 2), Color::White);
        assert_eq!(GoRules.default_color_to_play(&board, 0), Color::Black);
        assert_eq!(GoRules.default_color_to_play(&board, -1), Color::Black);
    }

    #[test]
    fn test_notation_skips_i() {
        let rules = GoRules;
        assert_eq!(rules.format_move(&Move::Play(Point::new(8, 0)), 19, 19), "J19");
        assert_eq!(rules.format_move(&Move::Play(Point::new(3, 15)), 19, 19), "D4");
        assert_eq!(rules.parse_move("d4", 19, 19), Ok(Move::Play(Point::new(3, 15))));
        assert_eq!(rules.parse_move("PASS", 19, 19), Ok(Move::Pass));
        assert!(rules.parse_move("I5", 19, 19).is_err());
        assert!(rules.parse_move("A20", 19, 19).is_err());
    }
}
