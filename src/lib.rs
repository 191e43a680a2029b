//! Quarry: SGF game trees with undo/redo and board synchronization
//!
//! Game records are kept as SGF trees of nodes and properties. Every edit goes
//! through an undo history, and a board attached to a tree always shows the
//! position at the tree's cursor. Go, Othello and Amazons are supported.
//!
//! # Architecture
//!
//! - [`board`]: Bordered grids with a move stack, and per-game rules
//! - [`sgf`]: Node storage, undoable editing, cursor and board state
//! - [`config`]: Runtime settings such as board self-validation
//! - [`error`]: Errors reported for malformed input
//!
//! # Quick Start
//!
//! ```
//! use quarry::{Board, Color, Game, GameTree, Move, Point};
//!
//! let mut tree = GameTree::new_with_root(Game::Go, 19, 19, true);
//! tree.add_undo_history();
//! tree.enter_tree(Board::new(Game::Go, 19, 19));
//!
//! tree.append_variation(Color::Black, Move::Play(Point::new(3, 3)));
//! assert_eq!(tree.board_state().color_to_play(), Some(Color::White));
//!
//! tree.undo();
//! assert_eq!(tree.current_node(), tree.root());
//! assert!(tree.can_redo());
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod sgf;

// Re-export commonly used types for convenience
pub use board::{Board, BoardChanges, BoardPositionList, Cell, Color, Game, Move, Point};
pub use config::{EngineConfig, ValidationLevel};
pub use error::{Error, Result};
pub use sgf::{Collection, GameTree, Node, NodeId, Notification, SgfType, SgfValue};
