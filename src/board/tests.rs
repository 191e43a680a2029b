use super::*;
use crate::config::{EngineConfig, ValidationLevel};
use pretty_assertions::assert_eq;

fn go_board(size: u8, validation: ValidationLevel) -> Board {
    Board::with_config(Game::Go, size, size, &EngineConfig::with_validation(validation))
}

#[test]
fn test_color_opponent() {
    assert_eq!(Color::Black.opponent(), Color::White);
    assert_eq!(Color::White.opponent(), Color::Black);
    assert_eq!(Cell::from(Color::White).color(), Some(Color::White));
    assert_eq!(Cell::Arrow.color(), None);
}

#[test]
fn test_position_conversion() {
    let point = Point::new(3, 3);
    assert_eq!(point.to_position(), 4 * FULL_GRID_WIDTH + 4);
    assert_eq!(Point::from_position(point.to_position()), point);

    assert!(Point::new(0, 0) < Point::new(1, 0));
    assert!(Point::new(24, 0) < Point::new(0, 1));
}

#[test]
fn test_new_board_has_border() {
    let board = Board::new(Game::Go, 5, 7);
    assert_eq!(board.count(Cell::Empty), 35);
    assert_eq!(board.cell(position(0, 0) - 1), Cell::OffGrid);
    assert_eq!(board.cell(position(4, 0) + 1), Cell::OffGrid);
    assert_eq!(board.cell(position(0, 0) - FULL_GRID_WIDTH), Cell::OffGrid);
    assert_eq!(board.cell(position(0, 6) + FULL_GRID_WIDTH), Cell::OffGrid);
    assert!(board.validate());
}

#[test]
#[should_panic(expected = "out of range")]
fn test_board_too_small() {
    Board::new(Game::Go, 4, 9);
}

#[test]
#[should_panic(expected = "out of range")]
fn test_board_too_large() {
    Board::new(Game::Othello, 8, 26);
}

#[test]
fn test_move_stack_grows_and_undo_restores_empty_grid() {
    let mut board = go_board(5, ValidationLevel::Basic);
    let initial_capacity = board.move_stack_capacity();

    let mut num_moves = 0;
    let mut color = Color::Black;
    for y in 0..5 {
        for x in 0..5 {
            if board.get(x, y) == Cell::Empty {
                board.play_move(color, &Move::Play(Point::new(x, y)));
            } else {
                board.play_move(color, &Move::Pass);
            }
            color = color.opponent();
            num_moves += 1;
        }
    }
    while num_moves < 30 {
        board.play_move(color, &Move::Pass);
        color = color.opponent();
        num_moves += 1;
    }

    assert!(board.move_stack_capacity() > initial_capacity);
    assert_eq!(board.num_undo_entries(), 30);

    board.undo(30);
    assert_eq!(board.count(Cell::Empty), 25);
    assert_eq!(board.num_undo_entries(), 0);
}

#[test]
#[should_panic(expected = "cannot undo")]
fn test_undo_more_than_recorded() {
    let mut board = go_board(9, ValidationLevel::None);
    board.play_move(Color::Black, &Move::Pass);
    board.undo(2);
}

#[test]
fn test_full_validation_snapshots() {
    let mut board = go_board(9, ValidationLevel::Full);
    board.play_move(Color::Black, &Move::Play(Point::new(2, 2)));
    board.play_move(Color::White, &Move::Play(Point::new(3, 2)));
    board.undo(2);
    assert_eq!(board.count(Cell::Empty), 81);
}

#[test]
fn test_changes_and_dummy_entries() {
    let mut board = go_board(9, ValidationLevel::Basic);
    board.play_move(Color::Black, &Move::Play(Point::new(4, 4)));

    board.apply_changes(&BoardChanges {
        black: BoardPositionList::from_points([Point::new(0, 0), Point::new(4, 4)]),
        white: BoardPositionList::from_points([Point::new(1, 1)]),
        ..Default::default()
    });
    board.add_dummy_move_entry();
    board.apply_changes(&BoardChanges {
        empty: BoardPositionList::from_points([Point::new(4, 4), Point::new(8, 8)]),
        ..Default::default()
    });

    assert_eq!(board.get(4, 4), Cell::Empty);
    assert_eq!(board.num_undo_entries(), 4);

    board.undo_changes(1);
    assert_eq!(board.get(4, 4), Cell::Black);

    board.undo(2);
    assert_eq!(board.get(0, 0), Cell::Empty);
    assert_eq!(board.get(1, 1), Cell::Empty);
    assert_eq!(board.get(4, 4), Cell::Black);

    board.undo(1);
    assert_eq!(board.count(Cell::Empty), 81);
}

#[test]
#[should_panic(expected = "not a change batch")]
fn test_undo_changes_on_move_entry() {
    let mut board = go_board(9, ValidationLevel::None);
    board.play_move(Color::Black, &Move::Pass);
    board.undo_changes(1);
}

#[test]
fn test_set_parameters() {
    let mut board = go_board(9, ValidationLevel::Basic);
    board.play_move(Color::Black, &Move::Play(Point::new(0, 0)));
    let capacity = board.move_stack_capacity();

    board.set_parameters(Game::Go, 9, 9);
    assert_eq!(board.count(Cell::Empty), 81);
    assert_eq!(board.num_undo_entries(), 0);
    assert_eq!(board.move_stack_capacity(), capacity);

    board.set_parameters(Game::Othello, 8, 8);
    assert_eq!(board.game(), Game::Othello);
    assert_eq!(board.count(Cell::Empty), 64);
    assert_eq!(board.data(), &GameData::None);
}

#[test]
fn test_dump() {
    let mut board = go_board(5, ValidationLevel::Basic);
    board.play_move(Color::Black, &Move::Play(Point::new(0, 0)));
    board.play_move(Color::White, &Move::Play(Point::new(4, 4)));

    let expected = "    A B C D E\n  5 X . . . .\n  4 . . . . .\n  3 . . . . .\n  2 . . . . .\n  1 . . . . O\n";
    assert_eq!(board.dump(), expected);
}

#[test]
fn test_game_lookup() {
    assert_eq!("reversi".parse::<Game>(), Ok(Game::Othello));
    assert_eq!(Game::from_sgf_number(18), Some(Game::Amazons));
    assert!("chess".parse::<Game>().is_err());
    for game in Game::ALL {
        let rules = game.rules();
        assert_eq!(rules.game(), game);
        assert!(rules.standard_board_sizes().contains(&rules.default_board_size()));
    }
}
