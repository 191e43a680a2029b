//! Undo histories and the operations they record.
//!
//! Every mutation of a game tree goes through [`UndoOperation`]. With an undo
//! history attached, operations are appended to it and can be undone in
//! action-sized groups; without one, they are applied and forgotten and the
//! tree becomes irreversibly modified.

use std::fmt;
use std::ops::{Deref, DerefMut, Range};

use slotmap::new_key_type;
use tracing::{debug, trace};

use super::node::NodeId;
use super::property::{Property, SgfType, SgfValue};
use super::store::NodeStore;
use super::tree::GameTree;
use super::Notification;
use crate::board::Color;

new_key_type! {
    /// Handle of an undo history attached to a [`GameTree`]
    pub struct HistoryId;
}

/// Client-defined undoable operation.
///
/// `redo` is called once when the operation is applied, then `undo`/`redo`
/// alternate. `free_data` is called exactly once when the entry is dropped
/// from its history.
pub trait CustomUndoOperation: fmt::Debug {
    fn undo(&mut self, nodes: &mut NodeStore);

    fn redo(&mut self, nodes: &mut NodeStore);

    fn free_data(&mut self, _nodes: &mut NodeStore, _was_applied: bool) {}

    /// Structural changes are reported as tree modifications, the rest as
    /// map modifications.
    fn modifies_tree(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Tree,
    Map,
}

/// A primitive tree mutation.
///
/// An operation always holds the side of the change that is not currently
/// in the tree.
#[derive(Debug)]
pub(crate) enum UndoOperation {
    NewNode {
        node: NodeId,
        parent: NodeId,
        after: Option<NodeId>,
        variation: Option<NodeId>,
    },
    DeleteNode {
        node: NodeId,
        after: Option<NodeId>,
        variation: Option<NodeId>,
    },
    DeleteNodeChildren {
        node: NodeId,
        children: Option<NodeId>,
        variation: Option<NodeId>,
    },
    SwapNodes {
        first: NodeId,
        second: NodeId,
    },
    ChangeToPlayColor {
        node: NodeId,
        color: Option<Color>,
    },
    NewProperty {
        node: NodeId,
        ty: SgfType,
        property: Option<Property>,
    },
    DeleteProperty {
        node: NodeId,
        ty: SgfType,
        property: Option<Property>,
    },
    ChangeProperty {
        node: NodeId,
        ty: SgfType,
        value: SgfValue,
    },
    ChangeRealProperty {
        node: NodeId,
        ty: SgfType,
        value: f64,
    },
    Custom {
        operation: Box<dyn CustomUndoOperation>,
        node: Option<NodeId>,
    },
}

impl UndoOperation {
    pub(crate) fn new_node(node: NodeId, parent: NodeId, after: Option<NodeId>) -> Self {
        UndoOperation::NewNode { node, parent, after, variation: Some(node) }
    }

    pub(crate) fn delete_node(store: &NodeStore, node: NodeId) -> Self {
        let after = store.previous_sibling(node);
        UndoOperation::DeleteNode { node, after, variation: after.or(store[node].next) }
    }

    pub(crate) fn delete_node_children(node: NodeId) -> Self {
        UndoOperation::DeleteNodeChildren { node, children: None, variation: None }
    }

    fn change(&self) -> Change {
        match self {
            UndoOperation::NewNode { .. }
            | UndoOperation::DeleteNode { .. }
            | UndoOperation::DeleteNodeChildren { .. }
            | UndoOperation::SwapNodes { .. } => Change::Tree,
            UndoOperation::Custom { operation, .. } if operation.modifies_tree() => Change::Tree,
            _ => Change::Map,
        }
    }

    /// Apply, returning the node the cursor should move to
    fn redo(&mut self, store: &mut NodeStore) -> Option<NodeId> {
        match self {
            UndoOperation::NewNode { node, parent, after, variation } => {
                store.link(*node, *parent, *after);
                std::mem::swap(&mut store[*parent].current_variation, variation);
                Some(*node)
            }
            UndoOperation::DeleteNode { node, variation, .. } => {
                let parent = store[*node].parent.expect("root cannot be deleted");
                store.unlink(*node);
                std::mem::swap(&mut store[parent].current_variation, variation);
                Some(parent)
            }
            UndoOperation::DeleteNodeChildren { node, children, variation } => {
                let target = &mut store[*node];
                *children = target.child.take();
                std::mem::swap(&mut target.current_variation, variation);
                Some(*node)
            }
            UndoOperation::Custom { operation, node } => {
                operation.redo(store);
                *node
            }
            UndoOperation::NewProperty { node, property, .. } => {
                if let Some(property) = property.take() {
                    store[*node].insert_property(property);
                }
                Some(*node)
            }
            UndoOperation::DeleteProperty { node, ty, property } => {
                *property = store[*node].remove_property(*ty);
                Some(*node)
            }
            _ => self.swap_state(store),
        }
    }

    /// Revert, returning the node the cursor should move to
    fn undo(&mut self, store: &mut NodeStore) -> Option<NodeId> {
        match self {
            UndoOperation::NewNode { node, parent, variation, .. } => {
                store.unlink(*node);
                std::mem::swap(&mut store[*parent].current_variation, variation);
                Some(*parent)
            }
            UndoOperation::DeleteNode { node, after, variation } => {
                let parent = store[*node].parent.expect("deleted node lost its parent");
                store.link(*node, parent, *after);
                std::mem::swap(&mut store[parent].current_variation, variation);
                Some(*node)
            }
            UndoOperation::DeleteNodeChildren { node, children, variation } => {
                let target = &mut store[*node];
                target.child = children.take();
                std::mem::swap(&mut target.current_variation, variation);
                Some(*node)
            }
            UndoOperation::Custom { operation, node } => {
                operation.undo(store);
                *node
            }
            UndoOperation::NewProperty { node, ty, property } => {
                *property = store[*node].remove_property(*ty);
                Some(*node)
            }
            UndoOperation::DeleteProperty { node, property, .. } => {
                if let Some(property) = property.take() {
                    store[*node].insert_property(property);
                }
                Some(*node)
            }
            _ => self.swap_state(store),
        }
    }

    /// Apply and revert of the self-inverse operations
    fn swap_state(&mut self, store: &mut NodeStore) -> Option<NodeId> {
        match self {
            UndoOperation::SwapNodes { first, second } => {
                store.swap_siblings(*first, *second);
                None
            }
            UndoOperation::ChangeToPlayColor { node, color } => {
                std::mem::swap(&mut store[*node].to_play, color);
                Some(*node)
            }
            UndoOperation::ChangeProperty { node, ty, value } => {
                if let Some(current) = store[*node].value_mut(*ty) {
                    std::mem::swap(current, value);
                }
                Some(*node)
            }
            UndoOperation::ChangeRealProperty { node, ty, value } => {
                if let Some(SgfValue::Real(current)) = store[*node].value_mut(*ty) {
                    std::mem::swap(current, value);
                }
                Some(*node)
            }
            _ => unreachable!("not a self-inverse operation"),
        }
    }

    /// Release whatever the operation owns. Applied deletions own detached
    /// subtrees; unapplied insertions own their never-linked nodes.
    fn dispose(self, store: &mut NodeStore, was_applied: bool) {
        match self {
            UndoOperation::NewNode { node, .. } if !was_applied => store.delete_subtree(node),
            UndoOperation::DeleteNode { node, .. } if was_applied => store.delete_subtree(node),
            UndoOperation::DeleteNodeChildren { children, .. } if was_applied => {
                store.delete_chain(children)
            }
            UndoOperation::Custom { mut operation, .. } => operation.free_data(store, was_applied),
            _ => {}
        }
    }
}

#[derive(Debug)]
struct UndoEntry {
    operation: UndoOperation,
    is_last_in_action: bool,
}

/// Linear list of undo entries with an applied/unapplied boundary.
#[derive(Debug)]
pub struct UndoHistory {
    entries: Vec<UndoEntry>,
    num_applied: usize,
    /// Applied count at which the tree was last saved; `None` once that
    /// state has been discarded.
    unmodified_at: Option<usize>,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self { entries: Vec::new(), num_applied: 0, unmodified_at: Some(0) }
    }
}

impl UndoHistory {
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn num_applied(&self) -> usize {
        self.num_applied
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.num_applied > 0
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        self.num_applied < self.entries.len()
    }

    #[inline]
    pub fn is_modified(&self) -> bool {
        self.unmodified_at != Some(self.num_applied)
    }

    fn set_unmodified(&mut self) {
        self.unmodified_at = Some(self.num_applied);
    }

    /// Entries of the last applied action
    fn undo_range(&self) -> Range<usize> {
        let start = self.entries[..self.num_applied.saturating_sub(1)]
            .iter()
            .rposition(|entry| entry.is_last_in_action)
            .map_or(0, |index| index + 1);
        start..self.num_applied
    }

    /// Entries of the first unapplied action
    fn redo_range(&self) -> Range<usize> {
        let end = self.entries[self.num_applied..]
            .iter()
            .position(|entry| entry.is_last_in_action)
            .map_or(self.entries.len(), |index| self.num_applied + index + 1);
        self.num_applied..end
    }

    fn changes(&self, range: Range<usize>) -> (bool, bool) {
        self.entries[range].iter().fold((false, false), |(tree, map), entry| {
            match entry.operation.change() {
                Change::Tree => (true, map),
                Change::Map => (tree, true),
            }
        })
    }

    /// Drop the unapplied tail, returning it in recording order
    fn truncate(&mut self) -> Vec<UndoEntry> {
        if self.unmodified_at.is_some_and(|at| at > self.num_applied) {
            self.unmodified_at = None;
        }
        self.entries.split_off(self.num_applied)
    }

    fn dispose_all(self, store: &mut NodeStore) {
        let num_applied = self.num_applied;
        for (index, entry) in self.entries.into_iter().enumerate().rev() {
            entry.operation.dispose(store, index < num_applied);
        }
    }
}

/// Bookkeeping of the action in progress
#[derive(Debug, Default)]
pub(crate) struct ActionState {
    level: usize,
    entries_pushed: bool,
    tree_changing: bool,
    map_changing: bool,
}

/// Groups every operation applied through it into one undoable action.
/// The action ends when the guard is dropped; guards nest.
pub struct ActionGuard<'a> {
    tree: &'a mut GameTree,
}

impl Deref for ActionGuard<'_> {
    type Target = GameTree;

    fn deref(&self) -> &GameTree {
        &*self.tree
    }
}

impl DerefMut for ActionGuard<'_> {
    fn deref_mut(&mut self) -> &mut GameTree {
        &mut *self.tree
    }
}

impl Drop for ActionGuard<'_> {
    fn drop(&mut self) {
        self.tree.end_action();
    }
}

impl GameTree {
    /// Create an empty history. It becomes current if no history is.
    pub fn add_undo_history(&mut self) -> HistoryId {
        let id = self.histories.insert(UndoHistory::default());
        if self.current_history.is_none() {
            self.current_history = Some(id);
        }
        id
    }

    /// Select the history subsequent operations are recorded in.
    pub fn set_undo_history(&mut self, history: Option<HistoryId>) {
        assert_eq!(self.action.level, 0, "undo history switched inside an action");
        if let Some(id) = history {
            assert!(self.histories.contains_key(id), "unknown undo history");
        }
        let before = self.modification_units();
        self.current_history = history;
        self.units_moved_from(before);
    }

    #[inline]
    pub fn current_undo_history(&self) -> Option<HistoryId> {
        self.current_history
    }

    pub fn undo_history(&self, id: HistoryId) -> Option<&UndoHistory> {
        self.histories.get(id)
    }

    /// Delete a history, releasing nodes only its entries referenced.
    pub fn delete_undo_history(&mut self, id: HistoryId) {
        assert_eq!(self.action.level, 0, "undo history deleted inside an action");
        let before = self.modification_units();
        let Some(history) = self.histories.remove(id) else {
            return;
        };
        if self.current_history == Some(id) {
            self.current_history = None;
        }
        self.units_moved_from(before);
        debug!(entries = history.len(), "deleting undo history");
        history.dispose_all(&mut self.store);
    }

    /// Start an action. Everything applied until the returned guard drops
    /// is undone and redone as a whole.
    pub fn begin_action(&mut self) -> ActionGuard<'_> {
        self.action.level += 1;
        ActionGuard { tree: self }
    }

    fn end_action(&mut self) {
        self.action.level -= 1;
        if self.action.level > 0 {
            return;
        }

        let action = std::mem::take(&mut self.action);
        if action.entries_pushed {
            if let Some(history) = self.current_history.and_then(|id| self.histories.get_mut(id)) {
                let last = history.num_applied - 1;
                history.entries[last].is_last_in_action = true;
            }
        }

        if action.tree_changing {
            self.notify(Notification::TreeModified);
        }
        if action.map_changing {
            self.notify(Notification::MapModified);
        }
    }

    /// Apply an operation, recording it in the current history.
    pub(crate) fn apply_operation(&mut self, operation: UndoOperation) {
        let mut action = self.begin_action();
        action.apply_in_action(operation);
    }

    fn apply_in_action(&mut self, mut operation: UndoOperation) {
        let change = operation.change();
        match change {
            Change::Tree if !self.action.tree_changing => {
                self.action.tree_changing = true;
                self.notify(Notification::AboutToModifyTree);
            }
            Change::Map if !self.action.map_changing => {
                self.action.map_changing = true;
                self.notify(Notification::AboutToModifyMap);
            }
            _ => {}
        }

        let Some(id) = self.current_history else {
            let target = operation.redo(&mut self.store);
            // The cursor may sit on a node the operation is about to free.
            self.follow_operation(target, change);
            operation.dispose(&mut self.store, true);
            self.mark_irreversibly_modified();
            return;
        };

        let history = &mut self.histories[id];
        let was_modified = history.is_modified();
        let discarded = history.truncate();
        if !discarded.is_empty() {
            trace!(count = discarded.len(), "discarding redo entries");
        }
        for entry in discarded.into_iter().rev() {
            entry.operation.dispose(&mut self.store, false);
        }

        let target = operation.redo(&mut self.store);

        let history = &mut self.histories[id];
        history.entries.push(UndoEntry { operation, is_last_in_action: false });
        history.num_applied += 1;
        let is_modified = history.is_modified();
        self.action.entries_pushed = true;
        self.history_state_changed(was_modified, is_modified);
        self.follow_operation(target, change);
    }

    /// Later operations of the same action see the cursor on this node.
    fn follow_operation(&mut self, target: Option<NodeId>, change: Change) {
        if let Some(node) = target {
            self.relocate(node, change == Change::Map);
        }
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.current_history
            .and_then(|id| self.histories.get(id))
            .is_some_and(UndoHistory::can_undo)
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        self.current_history
            .and_then(|id| self.histories.get(id))
            .is_some_and(UndoHistory::can_redo)
    }

    /// Revert the last action of the current history.
    ///
    /// # Panics
    /// If there is nothing to undo or an action is in progress.
    pub fn undo(&mut self) {
        assert!(self.can_undo(), "nothing to undo");
        self.step_history(true);
    }

    /// Reapply the first unapplied action of the current history.
    ///
    /// # Panics
    /// If there is nothing to redo or an action is in progress.
    pub fn redo(&mut self) {
        assert!(self.can_redo(), "nothing to redo");
        self.step_history(false);
    }

    fn step_history(&mut self, backward: bool) {
        assert_eq!(self.action.level, 0, "undo or redo inside an action");
        let Some(id) = self.current_history else {
            return;
        };

        let history = &self.histories[id];
        let range = if backward { history.undo_range() } else { history.redo_range() };
        let (tree_changing, map_changing) = history.changes(range.clone());
        if tree_changing {
            self.notify(Notification::AboutToModifyTree);
        }
        if map_changing {
            self.notify(Notification::AboutToModifyMap);
        }

        let history = &mut self.histories[id];
        let was_modified = history.is_modified();
        let mut switch_to = None;
        if backward {
            for entry in history.entries[range.clone()].iter_mut().rev() {
                switch_to = entry.operation.undo(&mut self.store).or(switch_to);
            }
            history.num_applied = range.start;
        } else {
            for entry in &mut history.entries[range.clone()] {
                switch_to = entry.operation.redo(&mut self.store).or(switch_to);
            }
            history.num_applied = range.end;
        }
        let is_modified = history.is_modified();
        debug!(backward, entries = range.len(), "stepped undo history");
        self.history_state_changed(was_modified, is_modified);

        if let Some(node) = switch_to {
            self.relocate(node, map_changing);
        }
        if tree_changing {
            self.notify(Notification::TreeModified);
        }
        if map_changing {
            self.notify(Notification::MapModified);
        }
    }

    /// Whether the current history is away from its unmodified point, or
    /// the tree was changed without a history.
    pub fn is_modified(&self) -> bool {
        self.modification_units() > 0
    }

    /// Mark the current state of every history as the unmodified one.
    pub fn set_unmodified(&mut self) {
        let before = self.modification_units();
        for history in self.histories.values_mut() {
            history.set_unmodified();
        }
        self.irreversibly_modified = false;
        self.units_moved_from(before);
    }

    /// One if the current history is modified, plus one if irreversibly
    /// modified. Other histories do not count.
    pub(crate) fn modification_units(&self) -> usize {
        let current = self
            .current_history
            .and_then(|id| self.histories.get(id))
            .is_some_and(UndoHistory::is_modified);
        usize::from(current) + usize::from(self.irreversibly_modified)
    }

    fn units_moved_from(&mut self, before: usize) {
        let after = self.modification_units();
        self.modification_units_changed(after as isize - before as isize);
    }

    fn mark_irreversibly_modified(&mut self) {
        if !self.irreversibly_modified {
            self.irreversibly_modified = true;
            self.modification_units_changed(1);
        }
    }

    fn history_state_changed(&mut self, was_modified: bool, is_modified: bool) {
        match (was_modified, is_modified) {
            (false, true) => self.modification_units_changed(1),
            (true, false) => self.modification_units_changed(-1),
            _ => {}
        }
    }

    fn modification_units_changed(&mut self, delta: isize) {
        if delta != 0 {
            if let Some(tracker) = &self.tracker {
                tracker.adjust(delta);
            }
        }
    }
}
