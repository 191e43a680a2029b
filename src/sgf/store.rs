//! Node arena and tree-shape primitives

use std::ops::{Index, IndexMut};

use slotmap::SlotMap;

use super::node::{MoveColor, Node, NodeId};
use crate::error::{Error, Result};

/// Arena owning every node of a game tree, including nodes detached by
/// operations that can still be undone.
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    nodes: SlotMap<NodeId, Node>,
}

/// Iterator over a sibling chain
pub struct Siblings<'a> {
    store: &'a NodeStore,
    next: Option<NodeId>,
}

impl Iterator for Siblings<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.store[current].next;
        Some(current)
    }
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node) -> NodeId {
        self.nodes.insert(node)
    }

    /// Insert `node` as the last child of `parent`. Edits made this way
    /// bypass undo histories; meant for building trees from parsed input.
    pub fn append_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.nodes.insert(node);
        self.link_last(id, parent);
        id
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes, detached ones included
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> Siblings<'_> {
        Siblings { store: self, next: self[id].child }
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last()
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self[id].parent?;
        let mut previous = None;
        for sibling in self.children(parent) {
            if sibling == id {
                return previous;
            }
            previous = Some(sibling);
        }
        None
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count() - 1
    }

    /// `id` followed by its ancestors up to the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&node| self[node].parent)
    }

    /// Whether `id` is reachable from `root` through child links. Detached
    /// nodes keep their parent pointer, so this checks every sibling chain.
    pub fn is_attached(&self, id: NodeId, root: NodeId) -> bool {
        let mut current = id;
        while let Some(parent) = self.get(current).and_then(|node| node.parent) {
            if !self.children(parent).any(|child| child == current) {
                return false;
            }
            current = parent;
        }
        current == root
    }

    /// Root-first path ending at `id`
    pub fn path_from_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path: Vec<NodeId> = self.ancestors(id).collect();
        path.reverse();
        path
    }

    /// Link `id` under `parent`, right after `after` or as the first child.
    pub(crate) fn link(&mut self, id: NodeId, parent: NodeId, after: Option<NodeId>) {
        let next = match after {
            Some(previous) => self[previous].next.replace(id),
            None => self[parent].child.replace(id),
        };
        let node = &mut self[id];
        node.parent = Some(parent);
        node.next = next;
    }

    pub(crate) fn link_last(&mut self, id: NodeId, parent: NodeId) {
        let after = self.last_child(parent);
        self.link(id, parent, after);
    }

    /// Detach `id` from its sibling chain. The parent pointer is kept so the
    /// node can be linked back on undo.
    pub(crate) fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self[id].parent else {
            return;
        };
        let next = self[id].next.take();
        match self.previous_sibling(id) {
            Some(previous) => self[previous].next = next,
            None => self[parent].child = next,
        }
    }

    /// Exchange the positions of two siblings
    pub(crate) fn swap_siblings(&mut self, first: NodeId, second: NodeId) {
        let parent = self[first].parent.expect("swapped node has no parent");
        assert_eq!(self[second].parent, Some(parent), "swapped nodes are not siblings");

        let mut chain: Vec<NodeId> = self.children(parent).collect();
        let a = chain.iter().position(|&id| id == first).expect("node missing from its parent");
        let b = chain.iter().position(|&id| id == second).expect("node missing from its parent");
        chain.swap(a, b);

        self[parent].child = chain.first().copied();
        for (index, &id) in chain.iter().enumerate() {
            self[id].next = chain.get(index + 1).copied();
        }
    }

    /// Free `id` and its whole subtree. Descends along first children
    /// iteratively; only sibling branches are recursed into.
    pub(crate) fn delete_subtree(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.remove(node_id) else {
                return;
            };
            let mut sibling = node.child.and_then(|child| self.get(child)).and_then(|c| c.next);
            while let Some(branch) = sibling {
                sibling = self.get(branch).and_then(|n| n.next);
                self.delete_subtree(branch);
            }
            current = node.child;
        }
    }

    /// Free a detached sibling chain starting at `first`
    pub(crate) fn delete_chain(&mut self, first: Option<NodeId>) {
        let mut current = first;
        while let Some(id) = current {
            current = self.get(id).and_then(|node| node.next);
            self.delete_subtree(id);
        }
    }

    /// Next node in document (pre-order) order
    pub fn forward(&self, id: NodeId) -> Option<NodeId> {
        if let Some(child) = self[id].child {
            return Some(child);
        }
        self.ancestors(id).find_map(|node| self[node].next)
    }

    /// Previous node in document order
    pub fn backward(&self, id: NodeId) -> Option<NodeId> {
        let Some(previous) = self.previous_sibling(id) else {
            return self[id].parent;
        };
        let mut current = previous;
        while let Some(last) = self.last_child(current) {
            current = last;
        }
        Some(current)
    }

    /// Number of nodes in the subtree rooted at `id`
    pub fn count_subtree(&self, id: NodeId) -> usize {
        let mut count = 0;
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(self.children(node));
        }
        count
    }

    /// Copy the subtree rooted at `id` into `target`, linking the copy as
    /// the last child of `parent` when given.
    pub fn duplicate_recursively(
        &self,
        id: NodeId,
        target: &mut NodeStore,
        parent: Option<NodeId>,
    ) -> NodeId {
        self.duplicate_to_given_depth(id, target, parent, usize::MAX)
    }

    /// Like [`duplicate_recursively`](Self::duplicate_recursively), copying
    /// only `depth` levels below `id`.
    pub fn duplicate_to_given_depth(
        &self,
        id: NodeId,
        target: &mut NodeStore,
        parent: Option<NodeId>,
        depth: usize,
    ) -> NodeId {
        let copy_root = target.insert(self[id].duplicate());
        if let Some(parent) = parent {
            target.link_last(copy_root, parent);
        }

        let mut stack = vec![(id, copy_root, depth)];
        while let Some((source, copy, remaining)) = stack.pop() {
            if remaining == 0 {
                continue;
            }
            let current_variation = self[source].current_variation;
            for child in self.children(source) {
                let child_copy = target.insert(self[child].duplicate());
                target.link_last(child_copy, copy);
                if current_variation == Some(child) {
                    target[copy].current_variation = Some(child_copy);
                }
                stack.push((child, child_copy, remaining - 1));
            }
        }

        copy_root
    }

    /// Move every property that is not root, game-info, setup or node name,
    /// along with the move itself, into a new sole child of `id`.
    pub fn split(&mut self, id: NodeId) -> Result<NodeId> {
        if self[id].child.is_some() {
            return Err(Error::NodeHasChildren);
        }

        let node = &mut self[id];
        let (kept, moved): (Vec<_>, Vec<_>) =
            node.properties.drain(..).partition(|property| property.ty.stays_on_split());
        node.properties = kept;

        let mut lower = Node { properties: moved, ..Node::default() };
        if node.move_color.color().is_some() {
            lower.move_color = node.move_color;
            lower.mv = std::mem::take(&mut node.mv);
            node.move_color = MoveColor::Empty;
        }
        if node.is_setup() {
            node.move_color = MoveColor::Setup;
        }

        let lower = self.insert(lower);
        self.link(lower, id, None);
        self[id].current_variation = Some(lower);
        Ok(lower)
    }
}

impl Index<NodeId> for NodeStore {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }
}

impl IndexMut<NodeId> for NodeStore {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }
}
