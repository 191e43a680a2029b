//! Game trees

use std::fmt;
use std::rc::Rc;

use slotmap::SlotMap;
use tracing::debug;

use super::collection::ModificationTracker;
use super::node::{MoveColor, Node, NodeId};
use super::property::{SgfType, SgfValue};
use super::state::BoardState;
use super::store::NodeStore;
use super::undo::{ActionState, HistoryId, UndoHistory};
use super::Notification;
use crate::board::{Board, Game};

/// Callback receiving tree notifications
pub type NotificationCallback = Box<dyn FnMut(Notification)>;

/// One game: a node tree, its cursor and the board synchronized with it.
///
/// The board is owned by the tree while attached with
/// [`enter_tree`](GameTree::enter_tree); the cursor may move without one.
pub struct GameTree {
    game: Game,
    width: u8,
    height: u8,
    pub(crate) store: NodeStore,
    root: NodeId,
    pub(crate) current_node: NodeId,
    pub(crate) current_node_depth: usize,
    pub(crate) board: Option<Board>,
    pub(crate) state: BoardState,
    pub(crate) histories: SlotMap<HistoryId, UndoHistory>,
    pub(crate) current_history: Option<HistoryId>,
    pub(crate) action: ActionState,
    pub(crate) irreversibly_modified: bool,
    pub(crate) tracker: Option<Rc<ModificationTracker>>,
    notifier: Option<NotificationCallback>,
}

impl GameTree {
    /// Create a tree holding a single empty root node.
    ///
    /// # Panics
    /// If the board size is out of range.
    pub fn new(game: Game, width: u8, height: u8) -> Self {
        assert!(Game::is_valid_size(width, height), "board size {width}x{height} out of range");
        let mut store = NodeStore::new();
        let root = store.insert(Node::new());

        let mut tree = Self {
            game,
            width,
            height,
            store,
            root,
            current_node: root,
            current_node_depth: 0,
            board: None,
            state: BoardState::default(),
            histories: SlotMap::with_key(),
            current_history: None,
            action: ActionState::default(),
            irreversibly_modified: false,
            tracker: None,
            notifier: None,
        };
        tree.resync();
        tree
    }

    /// Like [`new`](Self::new), with a `GM` root property and optionally the
    /// game's standard starting position as root setup.
    pub fn new_with_root(game: Game, width: u8, height: u8, provide_default_setup: bool) -> Self {
        let mut tree = Self::new(game, width, height);
        let root = &mut tree.store[tree.root];
        root.set_property(SgfType::GameType, SgfValue::Number(game.sgf_number() as i32));

        if provide_default_setup {
            if let Some(setup) = game.rules().default_setup(width, height) {
                let lists = [
                    (SgfType::AddBlack, setup.black),
                    (SgfType::AddWhite, setup.white),
                    (SgfType::AddEmpty, setup.empty),
                    (SgfType::AddArrows, setup.arrows),
                ];
                for (ty, list) in lists {
                    if !list.is_empty() {
                        root.set_property(ty, SgfValue::Points(list));
                    }
                }
                root.move_color = MoveColor::Setup;
            }
        }

        tree.resync();
        tree
    }

    #[inline]
    pub fn game(&self) -> Game {
        self.game
    }

    #[inline]
    pub fn width(&self) -> u8 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn current_node(&self) -> NodeId {
        self.current_node
    }

    #[inline]
    pub fn current_node_depth(&self) -> usize {
        self.current_node_depth
    }

    #[inline]
    pub fn nodes(&self) -> &NodeStore {
        &self.store
    }

    /// # Panics
    /// If `id` does not belong to this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.store[id]
    }

    /// Nodes reachable from the root
    pub fn count_nodes(&self) -> usize {
        self.store.count_subtree(self.root)
    }

    pub fn set_notification_callback(&mut self, callback: Option<NotificationCallback>) {
        self.notifier = callback;
    }

    pub(crate) fn notify(&mut self, notification: Notification) {
        if let Some(callback) = self.notifier.as_mut() {
            callback(notification);
        }
    }

    /// Empty tree with the same game and board size
    pub fn duplicate(&self) -> GameTree {
        GameTree::new(self.game, self.width, self.height)
    }

    /// Deep copy of the reachable nodes. The copy has no board, no
    /// histories and no listener; its cursor is at the same place.
    pub fn duplicate_with_nodes(&self) -> GameTree {
        let mut copy = self.duplicate();
        let mut store = NodeStore::new();
        let root = self.store.duplicate_recursively(self.root, &mut store, None);
        copy.store = store;
        copy.root = root;

        // Follow the same child indices down to the cursor
        let mut node = root;
        let path = self.store.path_from_root(self.current_node);
        for pair in path.windows(2) {
            let index = self.store.children(pair[0]).position(|child| child == pair[1]);
            if let Some(child) = index.and_then(|index| copy.store.children(node).nth(index)) {
                node = child;
            }
        }
        copy.current_node = node;
        copy.current_node_depth = copy.store.depth(node);
        copy.resync();
        copy
    }
}

impl fmt::Debug for GameTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameTree")
            .field("game", &self.game)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("nodes", &self.store.len())
            .field("current_node_depth", &self.current_node_depth)
            .field("histories", &self.histories.len())
            .finish_non_exhaustive()
    }
}

impl Drop for GameTree {
    fn drop(&mut self) {
        debug!(game = %self.game, nodes = self.store.len(), "dropping game tree");
        self.notify(Notification::GameTreeDeleted);
    }
}
