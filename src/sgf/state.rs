//! Board state kept in sync with the tree cursor.
//!
//! Moving down replays node moves and setups on the attached board, moving
//! up unwinds them with [`Board::undo`] and recomputes what the board cannot
//! tell: the color to play, the last move, the cached game-info node and
//! time data. Arbitrary jumps re-walk the path from the root.

use tracing::{debug, trace};

use super::node::NodeId;
use super::property::SgfType;
use super::store::NodeStore;
use super::tree::GameTree;
use super::Notification;
use crate::board::{Board, Color, Game, Point};

/// A value together with the depth of the node it was read from
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sourced<T> {
    value: T,
    depth: usize,
}

const TIME_LEFT: [SgfType; 2] = [SgfType::BlackTimeLeft, SgfType::WhiteTimeLeft];
const MOVES_LEFT: [SgfType; 2] = [SgfType::BlackMovesLeft, SgfType::WhiteMovesLeft];

/// Facts derived from the cursor position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    color_to_play: Option<Color>,
    /// Color implied by the record (last move, `PL`), before defaults and
    /// game-specific adjustment
    sgf_color_to_play: Option<Color>,
    last_move: Option<Point>,
    last_move_node: Option<NodeId>,
    game_info_node: Option<NodeId>,
    game_info_node_depth: usize,
    last_main_variation_node: Option<NodeId>,
    last_main_variation_node_depth: usize,
    time_left: [Option<Sourced<f64>>; 2],
    moves_left: [Option<Sourced<i32>>; 2],
}

impl BoardState {
    /// Color to play at the cursor
    #[inline]
    pub fn color_to_play(&self) -> Option<Color> {
        self.color_to_play
    }

    #[inline]
    pub fn sgf_color_to_play(&self) -> Option<Color> {
        self.sgf_color_to_play
    }

    /// Landing point of the last move; `None` after a pass or a setup
    #[inline]
    pub fn last_move(&self) -> Option<Point> {
        self.last_move
    }

    /// Nearest move or setup node at or above the cursor
    #[inline]
    pub fn last_move_node(&self) -> Option<NodeId> {
        self.last_move_node
    }

    /// First node on the path carrying game information
    #[inline]
    pub fn game_info_node(&self) -> Option<NodeId> {
        self.game_info_node
    }

    #[inline]
    pub fn game_info_node_depth(&self) -> usize {
        self.game_info_node_depth
    }

    /// Deepest node of the path that still lies on the main variation
    #[inline]
    pub fn last_main_variation_node(&self) -> Option<NodeId> {
        self.last_main_variation_node
    }

    #[inline]
    pub fn last_main_variation_node_depth(&self) -> usize {
        self.last_main_variation_node_depth
    }

    pub fn time_left(&self, color: Color) -> Option<f64> {
        self.time_left[color.index()].map(|sourced| sourced.value)
    }

    pub fn moves_left(&self, color: Color) -> Option<i32> {
        self.moves_left[color.index()].map(|sourced| sourced.value)
    }

    /// Account for one node entered at `depth`, playing it on `board`.
    fn enter_node(&mut self, store: &NodeStore, board: Option<&mut Board>, id: NodeId, depth: usize) {
        let node = &store[id];

        if let Some((color, mv)) = node.move_data() {
            if let Some(board) = board {
                board.play_move(color, &mv);
            }
            self.last_move = mv.point();
            self.last_move_node = Some(id);
            self.sgf_color_to_play = Some(color.opponent());
        } else if node.is_setup() {
            if let Some(board) = board {
                board.apply_changes(&node.setup_changes());
            }
            self.last_move = None;
            self.last_move_node = Some(id);
            self.sgf_color_to_play = None;
        } else if let Some(board) = board {
            board.add_dummy_move_entry();
        }

        if node.to_play.is_some() {
            self.sgf_color_to_play = node.to_play;
        }

        if self.game_info_node.is_none() && node.has_game_info() {
            self.game_info_node = Some(id);
            self.game_info_node_depth = depth;
        }

        let on_main_variation = match node.parent {
            None => true,
            Some(parent) => {
                self.last_main_variation_node == Some(parent)
                    && self.last_main_variation_node_depth + 1 == depth
                    && store[parent].child == Some(id)
            }
        };
        if on_main_variation {
            self.last_main_variation_node = Some(id);
            self.last_main_variation_node_depth = depth;
        }

        for color in [Color::Black, Color::White] {
            let index = color.index();
            if let Some(value) = node.real(TIME_LEFT[index]) {
                self.time_left[index] = Some(Sourced { value, depth });
            }
            if let Some(value) = node.number(MOVES_LEFT[index]) {
                self.moves_left[index] = Some(Sourced { value, depth });
            }
        }
    }

    /// Recompute everything the board undo cannot restore after the cursor
    /// moved up to `id` at `depth`.
    fn leave_nodes_below(&mut self, store: &NodeStore, id: NodeId, depth: usize) {
        self.last_move = None;
        self.last_move_node = None;
        self.sgf_color_to_play = None;

        let mut to_play = None;
        for ancestor in store.ancestors(id) {
            let node = &store[ancestor];
            to_play = to_play.or(node.to_play);
            if let Some((color, mv)) = node.move_data() {
                self.last_move = mv.point();
                self.last_move_node = Some(ancestor);
                to_play = to_play.or(Some(color.opponent()));
                break;
            }
            if node.is_setup() {
                self.last_move_node = Some(ancestor);
                break;
            }
        }
        self.sgf_color_to_play = to_play;

        if self.game_info_node_depth > depth {
            self.game_info_node = None;
            self.game_info_node_depth = 0;
        }
        if self.last_main_variation_node_depth > depth {
            self.last_main_variation_node = Some(id);
            self.last_main_variation_node_depth = depth;
        }

        self.find_time_control_data(store, id, depth);
    }

    /// Drop time data read below `depth` and backfill it from the nearest
    /// ancestors that carry it. Fields already known to be absent on the
    /// path stay absent.
    fn find_time_control_data(&mut self, store: &NodeStore, id: NodeId, depth: usize) {
        let mut missing_time = [false; 2];
        let mut missing_moves = [false; 2];
        for index in 0..2 {
            if self.time_left[index].is_some_and(|sourced| sourced.depth > depth) {
                self.time_left[index] = None;
                missing_time[index] = true;
            }
            if self.moves_left[index].is_some_and(|sourced| sourced.depth > depth) {
                self.moves_left[index] = None;
                missing_moves[index] = true;
            }
        }

        let mut node_depth = depth;
        for ancestor in store.ancestors(id) {
            if !missing_time.contains(&true) && !missing_moves.contains(&true) {
                break;
            }
            let node = &store[ancestor];
            for index in 0..2 {
                if missing_time[index] {
                    if let Some(value) = node.real(TIME_LEFT[index]) {
                        self.time_left[index] = Some(Sourced { value, depth: node_depth });
                        missing_time[index] = false;
                    }
                }
                if missing_moves[index] {
                    if let Some(value) = node.number(MOVES_LEFT[index]) {
                        self.moves_left[index] = Some(Sourced { value, depth: node_depth });
                        missing_moves[index] = false;
                    }
                }
            }
            node_depth = node_depth.saturating_sub(1);
        }
    }

    /// Resolve the color to play: explicit or implied by the record, then
    /// the game's default, then the game's own adjustment on the board.
    fn determine_final_color_to_play(&mut self, store: &NodeStore, board: Option<&Board>, game: Game) {
        let rules = game.rules();
        let color = match (self.sgf_color_to_play, board) {
            (Some(color), _) => color,
            (None, Some(board)) => {
                let handicap = self.game_info_node.map_or(-1, |id| store[id].handicap());
                rules.default_color_to_play(board, handicap)
            }
            (None, None) => rules.first_color_to_play(),
        };

        self.color_to_play = Some(match board {
            Some(board) => rules.adjust_color_to_play(board, color),
            None => color,
        });
    }
}

/// Direction for [`GameTree::switch_to_variation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariationDirection {
    Previous,
    Next,
}

impl GameTree {
    /// Attach `board` and replay the path from the root to the cursor on it.
    /// The board is reconfigured for this tree's game and size.
    pub fn enter_tree(&mut self, mut board: Board) {
        board.set_parameters(self.game(), self.width(), self.height());
        self.board = Some(board);
        self.resync();
    }

    /// Detach and return the board
    pub fn leave_tree(&mut self) -> Option<Board> {
        self.board.take()
    }

    #[inline]
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    #[inline]
    pub fn board_state(&self) -> &BoardState {
        &self.state
    }

    /// Rebuild the board and board state from scratch for the cursor.
    pub(crate) fn resync(&mut self) {
        let (game, width, height) = (self.game(), self.width(), self.height());
        if let Some(board) = self.board.as_mut() {
            board.set_parameters(game, width, height);
        }

        let path = self.store.path_from_root(self.current_node);
        self.state = BoardState::default();
        for (depth, &id) in path.iter().enumerate() {
            self.state.enter_node(&self.store, self.board.as_mut(), id, depth);
        }
        self.current_node_depth = path.len() - 1;
        self.state.determine_final_color_to_play(&self.store, self.board.as_ref(), game);
        debug!(depth = self.current_node_depth, "board state resynchronized");
    }

    /// Advance along current variations by up to `num_nodes` nodes.
    /// Returns the number of nodes actually descended.
    pub fn descend(&mut self, num_nodes: usize) -> usize {
        if num_nodes == 0 || self.store[self.current_node].child.is_none() {
            return 0;
        }

        self.notify(Notification::AboutToChangeCurrentNode);
        let mut descended = 0;
        while descended < num_nodes {
            let current = &mut self.store[self.current_node];
            let Some(next) = current.current_variation.or(current.child) else {
                break;
            };
            current.current_variation = Some(next);

            self.current_node = next;
            self.current_node_depth += 1;
            self.state.enter_node(&self.store, self.board.as_mut(), next, self.current_node_depth);
            descended += 1;
        }
        let game = self.game();
        self.state.determine_final_color_to_play(&self.store, self.board.as_ref(), game);
        trace!(descended, depth = self.current_node_depth, "descended");
        self.notify(Notification::CurrentNodeChanged);

        descended
    }

    /// Move the cursor `num_nodes` nodes up.
    ///
    /// # Panics
    /// If the cursor is less than `num_nodes` deep.
    pub fn ascend(&mut self, num_nodes: usize) {
        assert!(
            num_nodes <= self.current_node_depth,
            "cannot ascend {num_nodes} nodes from depth {}",
            self.current_node_depth
        );
        if num_nodes == 0 {
            return;
        }

        self.notify(Notification::AboutToChangeCurrentNode);
        if let Some(board) = self.board.as_mut() {
            board.undo(num_nodes);
        }
        for _ in 0..num_nodes {
            if let Some(parent) = self.store[self.current_node].parent {
                self.current_node = parent;
            }
        }
        self.current_node_depth -= num_nodes;

        self.state.leave_nodes_below(&self.store, self.current_node, self.current_node_depth);
        let game = self.game();
        self.state.determine_final_color_to_play(&self.store, self.board.as_ref(), game);
        trace!(ascended = num_nodes, depth = self.current_node_depth, "ascended");
        self.notify(Notification::CurrentNodeChanged);
    }

    /// Jump to any node of the tree, making its path the current variation.
    ///
    /// # Panics
    /// If `node` is not reachable from the root.
    pub fn switch_to_given_node(&mut self, node: NodeId) {
        if node == self.current_node {
            return;
        }
        assert!(self.store.is_attached(node, self.root()), "node is not part of the tree");

        self.notify(Notification::AboutToChangeCurrentNode);
        let mut child = node;
        while let Some(parent) = self.store[child].parent {
            self.store[parent].current_variation = Some(child);
            child = parent;
        }
        self.current_node = node;
        self.resync();
        self.notify(Notification::CurrentNodeChanged);
    }

    /// Move the cursor to a sibling. Returns `false` if there is none.
    pub fn switch_to_variation(&mut self, direction: VariationDirection) -> bool {
        let sibling = match direction {
            VariationDirection::Previous => self.store.previous_sibling(self.current_node),
            VariationDirection::Next => self.store[self.current_node].next,
        };
        match sibling {
            Some(sibling) => {
                self.switch_to_given_node(sibling);
                true
            }
            None => false,
        }
    }

    /// Move the cursor to the next node in document order
    pub fn switch_to_next_node(&mut self) -> bool {
        match self.store.forward(self.current_node) {
            Some(node) => {
                self.switch_to_given_node(node);
                true
            }
            None => false,
        }
    }

    /// Move the cursor to the previous node in document order
    pub fn switch_to_previous_node(&mut self) -> bool {
        match self.store.backward(self.current_node) {
            Some(node) => {
                self.switch_to_given_node(node);
                true
            }
            None => false,
        }
    }

    /// Move the cursor after an undoable operation. One step down or up is
    /// done incrementally unless node contents changed; anything else, or
    /// staying on the same node, resynchronizes from the root.
    pub(crate) fn relocate(&mut self, node: NodeId, contents_changed: bool) {
        if !contents_changed {
            let current = &self.store[self.current_node];
            if self.store[node].parent == Some(self.current_node)
                && current.current_variation == Some(node)
            {
                self.descend(1);
                return;
            }
            if current.parent == Some(node) {
                self.ascend(1);
                return;
            }
        }

        if node == self.current_node {
            self.resync();
        } else {
            self.switch_to_given_node(node);
        }
    }
}
