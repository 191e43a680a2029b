//! SGF game trees: node storage, undo histories and board synchronization

pub mod collection;
pub mod edit;
pub mod game_info;
pub mod node;
pub mod property;
pub mod state;
pub mod store;
pub mod tree;
pub mod undo;


// Re-exports
pub use collection::{Collection, ModifiedCallback};
pub use game_info::{GameResult, WinBy};
pub use node::{MoveColor, Node, NodeId};
pub use property::{Category, FigureDescription, Label, Property, SgfType, SgfValue, ValueKind};
pub use state::{BoardState, VariationDirection};
pub use store::NodeStore;
pub use tree::{GameTree, NotificationCallback};
pub use undo::{ActionGuard, CustomUndoOperation, HistoryId, UndoHistory};

/// Events reported to a tree's notification callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    /// Node properties are about to change
    AboutToModifyMap,
    /// Tree structure is about to change
    AboutToModifyTree,
    AboutToChangeCurrentNode,
    CurrentNodeChanged,
    TreeModified,
    MapModified,
    GameTreeDeleted,
}
