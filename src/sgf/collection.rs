//! Collections of game trees with shared modification tracking

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use super::tree::GameTree;

/// Callback receiving the new modified state of a collection
pub type ModifiedCallback = Box<dyn FnMut(bool)>;

/// Counts modification units across the trees of a collection: every
/// undo history away from its unmodified point, and every tree edited
/// without a history.
#[derive(Default)]
pub(crate) struct ModificationTracker {
    num_units: Cell<usize>,
    callback: RefCell<Option<ModifiedCallback>>,
}

impl ModificationTracker {
    #[inline]
    fn is_modified(&self) -> bool {
        self.num_units.get() > 0
    }

    pub(crate) fn adjust(&self, delta: isize) {
        let was_modified = self.is_modified();
        let units = self.num_units.get().checked_add_signed(delta).expect("modification count underflow");
        self.num_units.set(units);

        let is_modified = self.is_modified();
        if was_modified != is_modified {
            debug!(is_modified, "collection modified state changed");
            if let Some(callback) = self.callback.borrow_mut().as_mut() {
                callback(is_modified);
            }
        }
    }
}

/// Ordered list of game trees, typically the games of one SGF file.
#[derive(Default)]
pub struct Collection {
    trees: Vec<GameTree>,
    tracker: Rc<ModificationTracker>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tree, taking over its modification state.
    pub fn add_tree(&mut self, mut tree: GameTree) -> usize {
        self.tracker.adjust(tree.modification_units() as isize);
        tree.tracker = Some(Rc::clone(&self.tracker));
        self.trees.push(tree);
        self.trees.len() - 1
    }

    /// Remove and return a tree.
    ///
    /// # Panics
    /// If `index` is out of bounds.
    pub fn remove_tree(&mut self, index: usize) -> GameTree {
        let mut tree = self.trees.remove(index);
        tree.tracker = None;
        self.tracker.adjust(-(tree.modification_units() as isize));
        tree
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn trees(&self) -> &[GameTree] {
        &self.trees
    }

    pub fn tree(&self, index: usize) -> Option<&GameTree> {
        self.trees.get(index)
    }

    pub fn tree_mut(&mut self, index: usize) -> Option<&mut GameTree> {
        self.trees.get_mut(index)
    }

    #[inline]
    pub fn is_modified(&self) -> bool {
        self.tracker.is_modified()
    }

    /// Treat the current state of every tree as saved.
    pub fn set_unmodified(&mut self) {
        for tree in &mut self.trees {
            tree.set_unmodified();
        }
        debug_assert!(!self.tracker.is_modified());
    }

    pub fn set_notification_callback(&mut self, callback: Option<ModifiedCallback>) {
        *self.tracker.callback.borrow_mut() = callback;
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("trees", &self.trees)
            .field("modified_units", &self.tracker.num_units.get())
            .finish()
    }
}
