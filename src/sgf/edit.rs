//! Undoable editing operations on a game tree

use tracing::trace;

use super::node::{MoveColor, Node, NodeId};
use super::property::{Property, SgfType, SgfValue, ValueKind};
use super::undo::{CustomUndoOperation, UndoOperation};
use super::tree::GameTree;
use crate::board::{BoardChanges, BoardPositionList, Cell, Color, Move};

/// Setup property holding positions set to `cell`
fn setup_type(cell: Cell) -> SgfType {
    match cell {
        Cell::Black => SgfType::AddBlack,
        Cell::White => SgfType::AddWhite,
        Cell::Empty => SgfType::AddEmpty,
        Cell::Arrow => SgfType::AddArrows,
        Cell::OffGrid => panic!("off-grid cells cannot be set up"),
    }
}

const SETUP_TYPES: [SgfType; 4] =
    [SgfType::AddBlack, SgfType::AddWhite, SgfType::AddEmpty, SgfType::AddArrows];

impl GameTree {
    /// Append a move node as the last child of the cursor and move there.
    pub fn append_variation(&mut self, color: Color, mv: Move) -> NodeId {
        self.append_node(Node::with_move(color, mv))
    }

    /// Append a node without move or setup and move there.
    pub fn append_empty_variation(&mut self) -> NodeId {
        self.append_node(Node::new())
    }

    /// Append a setup node applying `changes` and move there.
    pub fn append_setup_variation(&mut self, changes: BoardChanges) -> NodeId {
        let mut node = Node::new();
        let lists = [
            (SgfType::AddBlack, changes.black),
            (SgfType::AddWhite, changes.white),
            (SgfType::AddEmpty, changes.empty),
            (SgfType::AddArrows, changes.arrows),
        ];
        for (ty, list) in lists {
            if !list.is_empty() {
                node.set_property(ty, SgfValue::Points(list));
            }
        }
        node.move_color = MoveColor::Setup;
        self.append_node(node)
    }

    fn append_node(&mut self, node: Node) -> NodeId {
        let parent = self.current_node;
        let after = self.store.last_child(parent);
        let id = self.store.insert(node);
        self.apply_operation(UndoOperation::new_node(id, parent, after));
        id
    }

    /// Delete the cursor node with its subtree; the cursor moves to the
    /// parent.
    ///
    /// # Panics
    /// At the root.
    pub fn delete_current_node(&mut self) {
        assert!(self.current_node != self.root(), "the root node cannot be deleted");
        let operation = UndoOperation::delete_node(&self.store, self.current_node);
        self.apply_operation(operation);
    }

    /// Delete every child subtree of the cursor node. Returns `false` if
    /// there was nothing to delete.
    pub fn delete_current_node_children(&mut self) -> bool {
        if self.store[self.current_node].child.is_none() {
            return false;
        }
        self.apply_operation(UndoOperation::delete_node_children(self.current_node));
        true
    }

    /// Swap the cursor's variation with the previous sibling.
    pub fn move_current_variation_up(&mut self) -> bool {
        match self.store.previous_sibling(self.current_node) {
            Some(previous) => {
                self.apply_operation(UndoOperation::SwapNodes { first: previous, second: self.current_node });
                true
            }
            None => false,
        }
    }

    /// Swap the cursor's variation with the next sibling.
    pub fn move_current_variation_down(&mut self) -> bool {
        match self.store[self.current_node].next {
            Some(next) => {
                self.apply_operation(UndoOperation::SwapNodes { first: self.current_node, second: next });
                true
            }
            None => false,
        }
    }

    /// Add or overwrite a property. Setting the current value is a no-op.
    ///
    /// # Panics
    /// If the value kind does not match the property type.
    pub fn set_property(&mut self, node: NodeId, ty: SgfType, value: SgfValue) {
        let property = Property::new(ty, value);
        let operation = match self.store[node].value(ty) {
            Some(current) if *current == property.value => return,
            Some(_) => UndoOperation::ChangeProperty { node, ty, value: property.value },
            None => UndoOperation::NewProperty { node, ty, property: Some(property) },
        };
        self.apply_operation(operation);
    }

    /// Set a real-valued property (`BL`, `WL`, `TM`, `V`).
    pub fn set_real_property(&mut self, node: NodeId, ty: SgfType, value: f64) {
        assert_eq!(ty.value_kind(), ValueKind::Real, "{ty:?} is not a real property");
        let operation = match self.store[node].real(ty) {
            Some(current) if current == value => return,
            Some(_) => UndoOperation::ChangeRealProperty { node, ty, value },
            None => UndoOperation::NewProperty {
                node,
                ty,
                property: Some(Property::new(ty, SgfValue::Real(value))),
            },
        };
        self.apply_operation(operation);
    }

    /// Returns `false` if the property was absent.
    pub fn delete_property(&mut self, node: NodeId, ty: SgfType) -> bool {
        if !self.store[node].has_property(ty) {
            return false;
        }
        self.apply_operation(UndoOperation::DeleteProperty { node, ty, property: None });
        true
    }

    /// Set or clear the explicit player to move (`PL`).
    pub fn set_to_play_color(&mut self, node: NodeId, color: Option<Color>) {
        if self.store[node].to_play != color {
            self.apply_operation(UndoOperation::ChangeToPlayColor { node, color });
        }
    }

    /// View state only; not recorded in undo histories.
    pub fn set_node_is_collapsed(&mut self, node: NodeId, is_collapsed: bool) {
        self.store[node].is_collapsed = is_collapsed;
    }

    /// Set `positions` to `cell` in the setup properties of `node`,
    /// removing them from the other setup lists, as one action.
    pub fn add_setup_positions(&mut self, node: NodeId, cell: Cell, positions: &BoardPositionList) {
        let target = setup_type(cell);
        let mut action = self.begin_action();

        for ty in SETUP_TYPES {
            let current = action.store[node].points(ty).cloned().unwrap_or_default();
            let updated = if ty == target {
                current.union(positions)
            } else {
                current.difference(positions)
            };

            if updated.is_empty() {
                action.delete_property(node, ty);
            } else {
                action.set_property(node, ty, SgfValue::Points(updated));
            }
        }
        trace!(count = positions.len(), ?cell, "setup positions edited");
    }

    /// Run a client operation through the current history. The cursor moves
    /// to `node_to_switch_to` when given.
    pub fn apply_custom_operation(
        &mut self,
        operation: Box<dyn CustomUndoOperation>,
        node_to_switch_to: Option<NodeId>,
    ) {
        self.apply_operation(UndoOperation::Custom { operation, node: node_to_switch_to });
    }
}
