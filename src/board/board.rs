//! Board structure with move and change stacks

use tracing::debug;

use super::position_list::BoardPositionList;
use super::rules::{GameData, GameRules};
use super::{position, Cell, Color, Game, Move, FULL_GRID_WIDTH};
use crate::config::{EngineConfig, ValidationLevel};
use crate::error::Result;

// Move-stack entry terminators. Everything below a terminator belongs to it.
const ENTRY_MOVE: i32 = -100;
const ENTRY_MOVE_WITH_SNAPSHOT: i32 = -101;
const ENTRY_DUMMY: i32 = -102;
const ENTRY_CHANGES: i32 = -103;

/// Word pushed on the move stack in place of a position for passes
pub(crate) const PASS_WORD: i32 = -1;

/// Stone placements and removals applied as one batch (setup positions)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardChanges {
    pub black: BoardPositionList,
    pub white: BoardPositionList,
    pub empty: BoardPositionList,
    pub arrows: BoardPositionList,
}

impl BoardChanges {
    pub fn is_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty() && self.empty.is_empty() && self.arrows.is_empty()
    }

    /// Target cell value for each list
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &BoardPositionList)> {
        [
            (Cell::Empty, &self.empty),
            (Cell::Black, &self.black),
            (Cell::White, &self.white),
            (Cell::Arrow, &self.arrows),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, Copy)]
struct ChangeStackEntry {
    pos: usize,
    previous: Cell,
}

/// Game board for one game and size.
///
/// The grid carries a one-cell `OffGrid` border so neighbor lookups never
/// need bounds checks. Every move, change batch and dummy entry counts as one
/// undoable entry.
#[derive(Debug, Clone)]
pub struct Board {
    game: Game,
    rules: &'static dyn GameRules,
    width: u8,
    height: u8,
    grid: Vec<Cell>,
    data: GameData,
    move_stack: Vec<i32>,
    move_stack_initial_capacity: usize,
    move_stack_growth: usize,
    change_stack: Vec<ChangeStackEntry>,
    num_undo_entries: usize,
    validation: ValidationLevel,
}

impl Board {
    /// Create a board with the default engine configuration.
    ///
    /// # Panics
    /// If either dimension is outside `BOARD_MIN_SIZE..=BOARD_MAX_SIZE`.
    pub fn new(game: Game, width: u8, height: u8) -> Self {
        Self::with_config(game, width, height, &EngineConfig::default())
    }

    pub fn with_config(game: Game, width: u8, height: u8, config: &EngineConfig) -> Self {
        assert!(
            Game::is_valid_size(width, height),
            "board size {width}x{height} out of range"
        );

        let rules = game.rules();
        let (initial, growth) = move_stack_sizing(rules, width, height);
        let mut board = Self {
            game,
            rules,
            width,
            height,
            grid: Vec::new(),
            data: rules.reset_game_data(),
            move_stack: Vec::with_capacity(initial),
            move_stack_initial_capacity: initial,
            move_stack_growth: growth,
            change_stack: Vec::with_capacity(width as usize * height as usize),
            num_undo_entries: 0,
            validation: config.validation,
        };
        board.clear_grid();
        board
    }

    /// Reconfigure in place. Buffers are reused when possible; both stacks are
    /// always emptied.
    pub fn set_parameters(&mut self, game: Game, width: u8, height: u8) {
        assert!(
            Game::is_valid_size(width, height),
            "board size {width}x{height} out of range"
        );

        if game != self.game || width != self.width || height != self.height {
            debug!(from = %self.game, to = %game, width, height, "reinitializing board");
            self.game = game;
            self.rules = game.rules();
            self.width = width;
            self.height = height;

            let (initial, growth) = move_stack_sizing(self.rules, width, height);
            if initial != self.move_stack_initial_capacity {
                self.move_stack = Vec::with_capacity(initial);
                self.move_stack_initial_capacity = initial;
                self.change_stack = Vec::with_capacity(width as usize * height as usize);
            }
            self.move_stack_growth = growth;
        }

        self.clear_grid();
        self.data = self.rules.reset_game_data();
        self.move_stack.clear();
        self.change_stack.clear();
        self.num_undo_entries = 0;
    }

    fn clear_grid(&mut self) {
        let len = FULL_GRID_WIDTH * (self.height as usize + 2);
        self.grid.clear();
        self.grid.resize(len, Cell::OffGrid);
        for y in 0..self.height {
            for x in 0..self.width {
                self.grid[position(x, y)] = Cell::Empty;
            }
        }
    }

    #[inline]
    pub fn game(&self) -> Game {
        self.game
    }

    #[inline]
    pub fn rules(&self) -> &'static dyn GameRules {
        self.rules
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
    pub fn validation(&self) -> ValidationLevel {
        self.validation
    }

    /// Raw bordered grid, indexed by [`position`]
    #[inline]
    pub fn grid(&self) -> &[Cell] {
        &self.grid
    }

    #[inline]
    pub fn cell(&self, pos: usize) -> Cell {
        self.grid[pos]
    }

    /// Get cell at point coordinates
    #[inline]
    pub fn get(&self, x: u8, y: u8) -> Cell {
        self.grid[position(x, y)]
    }

    #[inline]
    pub fn is_on_grid(&self, pos: usize) -> bool {
        let (row, column) = (pos / FULL_GRID_WIDTH, pos % FULL_GRID_WIDTH);
        (1..=self.height as usize).contains(&row) && (1..=self.width as usize).contains(&column)
    }

    #[inline]
    pub fn data(&self) -> &GameData {
        &self.data
    }

    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut GameData {
        &mut self.data
    }

    #[inline]
    pub(crate) fn set_cell(&mut self, pos: usize, cell: Cell) {
        debug_assert!(self.is_on_grid(pos));
        self.grid[pos] = cell;
    }

    /// Number of stones (or arrows) of the given kind on the board
    pub fn count(&self, cell: Cell) -> usize {
        self.grid.iter().filter(|&&c| c == cell).count()
    }

    #[inline]
    pub fn num_undo_entries(&self) -> usize {
        self.num_undo_entries
    }

    #[inline]
    pub fn move_stack_capacity(&self) -> usize {
        self.move_stack.capacity()
    }

    pub fn is_legal_move(&self, color: Color, mv: &Move) -> bool {
        self.rules.is_legal_move(self, color, mv)
    }

    /// Play a move. Legality is the caller's business.
    pub fn play_move(&mut self, color: Color, mv: &Move) {
        let rules = self.rules;
        let snapshot = self.validation == ValidationLevel::Full;

        if snapshot {
            for i in 0..self.grid.len() {
                self.push_word(self.grid[i].to_word());
            }
        }

        rules.play_move(self, color, mv);
        self.push_word(if snapshot { ENTRY_MOVE_WITH_SNAPSHOT } else { ENTRY_MOVE });
        self.num_undo_entries += 1;
        self.check_consistency();
    }

    /// Undo the last `num_undos` entries (moves, change batches or dummies).
    ///
    /// # Panics
    /// If fewer than `num_undos` entries are recorded.
    pub fn undo(&mut self, num_undos: usize) {
        assert!(
            num_undos <= self.num_undo_entries,
            "cannot undo {num_undos} entries, only {} recorded",
            self.num_undo_entries
        );

        let rules = self.rules;
        for _ in 0..num_undos {
            match self.pop_word() {
                ENTRY_DUMMY => {}
                ENTRY_CHANGES => self.undo_change_batch(),
                ENTRY_MOVE => rules.undo(self),
                ENTRY_MOVE_WITH_SNAPSHOT => {
                    rules.undo(self);
                    let start = self.move_stack.len() - self.grid.len();
                    let restored = self.move_stack[start..]
                        .iter()
                        .zip(&self.grid)
                        .all(|(&word, &cell)| Cell::from_word(word) == cell);
                    assert!(restored, "grid differs from its snapshot after undo");
                    self.move_stack.truncate(start);
                }
                other => panic!("corrupted move stack (terminator {other})"),
            }
            self.num_undo_entries -= 1;
        }

        self.check_consistency();
    }

    /// Apply a batch of cell changes not modeled as a move.
    pub fn apply_changes(&mut self, changes: &BoardChanges) {
        let rules = self.rules;
        rules.apply_changes(self, changes);
        self.check_consistency();
    }

    /// Undo the last `num_batches` change batches.
    ///
    /// # Panics
    /// If any of the topmost entries is not a change batch.
    pub fn undo_changes(&mut self, num_batches: usize) {
        assert!(num_batches <= self.num_undo_entries, "not enough change batches to undo");
        for _ in 0..num_batches {
            assert_eq!(self.pop_word(), ENTRY_CHANGES, "top entry is not a change batch");
            self.undo_change_batch();
            self.num_undo_entries -= 1;
        }
    }

    /// Push an entry that undoes to nothing.
    pub fn add_dummy_move_entry(&mut self) {
        let rules = self.rules;
        rules.add_dummy_move_entry(self);
    }

    pub fn format_move(&self, mv: &Move) -> String {
        self.rules.format_move(mv, self.width, self.height)
    }

    pub fn parse_move(&self, text: &str) -> Result<Move> {
        self.rules.parse_move(text, self.width, self.height)
    }

    pub fn validate(&self) -> bool {
        self.rules.validate_board(self)
    }

    pub fn dump(&self) -> String {
        self.rules.dump_board(self)
    }

    pub(crate) fn record_changes(&mut self, changes: &BoardChanges) {
        let mut num_changes = 0;
        for (cell, list) in changes.iter() {
            for &pos in list.positions() {
                assert!(self.is_on_grid(pos), "change outside the board at {pos}");
                let previous = self.grid[pos];
                if previous != cell {
                    if self.change_stack.len() == self.change_stack.capacity() {
                        self.change_stack.reserve_exact(self.width as usize * self.height as usize);
                    }
                    self.change_stack.push(ChangeStackEntry { pos, previous });
                    self.grid[pos] = cell;
                    num_changes += 1;
                }
            }
        }

        self.push_word(num_changes);
        self.push_word(ENTRY_CHANGES);
        self.num_undo_entries += 1;
    }

    fn undo_change_batch(&mut self) {
        let num_changes = self.pop_word();
        for _ in 0..num_changes {
            let entry = self.change_stack.pop().expect("change stack underflow");
            self.grid[entry.pos] = entry.previous;
        }
    }

    pub(crate) fn push_dummy_entry(&mut self) {
        self.push_word(ENTRY_DUMMY);
        self.num_undo_entries += 1;
    }

    pub(crate) fn push_word(&mut self, word: i32) {
        if self.move_stack.len() == self.move_stack.capacity() {
            self.move_stack.reserve_exact(self.move_stack_growth);
            debug!(
                capacity = self.move_stack.capacity(),
                game = %self.game,
                "move stack grown"
            );
        }
        self.move_stack.push(word);
    }

    pub(crate) fn pop_word(&mut self) -> i32 {
        self.move_stack.pop().expect("move stack underflow")
    }

    fn check_consistency(&self) {
        if self.validation >= ValidationLevel::Basic {
            assert!(self.validate(), "board failed validation:\n{}", self.dump());
        }
    }
}

/// Initial capacity and growth increment of the move stack, in words.
fn move_stack_sizing(rules: &dyn GameRules, width: u8, height: u8) -> (usize, usize) {
    let area = width as f64 * height as f64;
    let words = area * rules.relative_num_moves_per_game() * rules.stack_entry_size() as f64;
    let initial = words.ceil() as usize;
    let growth = ((words * 0.5).ceil() as usize).max(1);
    (initial, growth)
}
