//! Navigation and editing cursor over a [`Tree`].
//!
//! The cursor tracks a focus node, a pointer into the focus node's children and a
//! per-depth history of pointer positions. `position == None` means the pointer
//! sits before the first child, which is where it starts in an empty node.
//! `history[pointer.depth] == pointer.position` holds between calls.

use crate::node::{Item, NodeId, Tree};
use crate::TreeError;

/// Where the cursor points: the focus depth and the child index within the focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pointer {
    pub depth: usize,
    pub position: Option<usize>,
}

/// Result of [`Cursor::down`].
#[derive(Debug, PartialEq)]
pub enum Down<'a, L> {
    /// The item was a node and is now the focus.
    Entered(NodeId),
    /// The item was a leaf; the focus did not move.
    Leaf(&'a L),
}

/// Edits and walks a borrowed [`Tree`] from a focus node.
pub struct Cursor<'t, L> {
    tree: &'t mut Tree<L>,
    focus: NodeId,
    pointer: Pointer,
    history: Vec<Option<usize>>,
}

impl<'t, L> Cursor<'t, L> {
    /// Start at the root, pointing at its last child.
    pub fn new(tree: &'t mut Tree<L>) -> Self {
        let focus = tree.root();
        let position = tree.children(focus).len().checked_sub(1);
        Self {
            tree,
            focus,
            pointer: Pointer { depth: 0, position },
            history: vec![position],
        }
    }

    pub fn tree(&self) -> &Tree<L> {
        self.tree
    }

    pub fn focus(&self) -> NodeId {
        self.focus
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    pub fn depth(&self) -> usize {
        self.pointer.depth
    }

    pub fn history(&self) -> &[Option<usize>] {
        &self.history
    }

    /// The item under the pointer, if any.
    pub fn current(&self) -> Option<&Item<L>> {
        self.pointer
            .position
            .and_then(|p| self.tree.children(self.focus).get(p))
    }

    /// Insert a leaf after the pointer and move onto it.
    pub fn add(&mut self, leaf: L) {
        let index = self.insert_index();
        self.tree.insert_leaf(self.focus, index, leaf);
        self.set_position(Some(index));
    }

    /// Insert a new node after the pointer and descend into it.
    pub fn nest(&mut self, name: impl Into<String>) -> NodeId {
        let index = self.insert_index();
        let id = self.tree.insert_node(self.focus, index, name.into());
        self.set_position(Some(index));
        self.focus = id;
        self.pointer = Pointer {
            depth: self.pointer.depth + 1,
            position: None,
        };
        self.history.push(None);
        id
    }

    /// Delete the item under the pointer and step back one position.
    pub fn remove(&mut self) -> Result<Item<L>, TreeError> {
        if self.tree.children(self.focus).is_empty() {
            return Err(TreeError::EmptyNode);
        }
        let index = self.pointer.position.ok_or(TreeError::OutOfBounds)?;
        let item = self.tree.remove(self.focus, index);
        self.set_position(index.checked_sub(1));
        Ok(item)
    }

    /// Move focus to the parent, restoring the pointer recorded for that depth.
    pub fn up(&mut self) -> Result<NodeId, TreeError> {
        let parent = self
            .tree
            .node(self.focus)
            .parent
            .ok_or(TreeError::NoParent)?;
        self.history.pop();
        let depth = self.pointer.depth - 1;
        self.focus = parent;
        self.pointer = Pointer {
            depth,
            position: self.history.get(depth).copied().flatten(),
        };
        Ok(parent)
    }

    /// Descend into the node under the pointer, or return the leaf there.
    pub fn down(&mut self) -> Result<Down<'_, L>, TreeError> {
        let id = match self.current() {
            None => return Err(TreeError::EmptyNode),
            Some(Item::Node(id)) => *id,
            Some(Item::Leaf(_)) => {
                return match self.current() {
                    Some(Item::Leaf(leaf)) => Ok(Down::Leaf(leaf)),
                    _ => Err(TreeError::EmptyNode),
                };
            }
        };
        let position = if self.tree.children(id).is_empty() {
            None
        } else {
            Some(0)
        };
        self.focus = id;
        self.pointer = Pointer {
            depth: self.pointer.depth + 1,
            position,
        };
        self.history.push(position);
        Ok(Down::Entered(id))
    }

    /// Move the pointer one child to the right.
    pub fn next(&mut self) -> Result<(), TreeError> {
        let len = self.tree.children(self.focus).len();
        let next = self.pointer.position.map_or(0, |p| p + 1);
        if next >= len {
            return Err(TreeError::OutOfBounds);
        }
        self.set_position(Some(next));
        Ok(())
    }

    /// Move the pointer one child to the left.
    pub fn previous(&mut self) -> Result<(), TreeError> {
        match self.pointer.position {
            Some(p) if p > 0 => {
                self.set_position(Some(p - 1));
                Ok(())
            }
            _ => Err(TreeError::OutOfBounds),
        }
    }

    fn insert_index(&self) -> usize {
        self.pointer.position.map_or(0, |p| p + 1)
    }

    fn set_position(&mut self, position: Option<usize>) {
        self.pointer.position = position;
        if let Some(entry) = self.history.get_mut(self.pointer.depth) {
            *entry = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn leaves(tree: &Tree<u32>, id: NodeId) -> Vec<u32> {
        tree.leaves(id).copied().collect()
    }

    #[test]
    fn test_add_appends_after_pointer() {
        let mut tree = Tree::new("root");
        let mut cursor = Cursor::new(&mut tree);
        cursor.add(1);
        cursor.add(2);
        cursor.previous().unwrap();
        cursor.add(3);
        assert_eq!(cursor.pointer(), Pointer { depth: 0, position: Some(1) });
        assert_eq!(cursor.history(), &[Some(1)]);
        let root = tree.root();
        assert_eq!(leaves(&tree, root), vec![1, 3, 2]);
    }

    #[test]
    fn test_nest_descends_into_new_node() {
        let mut tree: Tree<u32> = Tree::new("root");
        let mut cursor = Cursor::new(&mut tree);
        cursor.add(1);
        let a = cursor.nest("a");
        assert_eq!(cursor.focus(), a);
        assert_eq!(cursor.pointer(), Pointer { depth: 1, position: None });
        assert_eq!(cursor.history(), &[Some(1), None]);
        assert_eq!(cursor.tree().node(a).position, 1);
        assert_eq!(cursor.tree().node(a).depth, 1);
    }

    #[test]
    fn test_up_restores_parent_pointer() {
        let mut tree: Tree<u32> = Tree::new("root");
        let mut cursor = Cursor::new(&mut tree);
        cursor.nest("a");
        cursor.add(5);
        cursor.add(6);
        let root = cursor.up().unwrap();
        assert_eq!(cursor.focus(), root);
        assert_eq!(cursor.pointer(), Pointer { depth: 0, position: Some(0) });
        assert_eq!(cursor.history(), &[Some(0)]);
    }

    #[test]
    fn test_up_at_root() {
        let mut tree: Tree<u32> = Tree::new("root");
        let mut cursor = Cursor::new(&mut tree);
        assert_eq!(cursor.up(), Err(TreeError::NoParent));
    }

    #[test]
    fn test_down_into_node() {
        let mut tree: Tree<u32> = Tree::new("root");
        let mut cursor = Cursor::new(&mut tree);
        let a = cursor.nest("a");
        cursor.add(5);
        cursor.up().unwrap();
        assert_eq!(cursor.down(), Ok(Down::Entered(a)));
        assert_eq!(cursor.pointer(), Pointer { depth: 1, position: Some(0) });
        assert_eq!(cursor.history(), &[Some(0), Some(0)]);
    }

    #[test]
    fn test_down_into_empty_node() {
        let mut tree: Tree<u32> = Tree::new("root");
        let mut cursor = Cursor::new(&mut tree);
        cursor.nest("a");
        cursor.up().unwrap();
        cursor.down().unwrap();
        assert_eq!(cursor.pointer(), Pointer { depth: 1, position: None });
    }

    #[test]
    fn test_down_on_leaf_returns_it() {
        let mut tree: Tree<u32> = Tree::new("root");
        let mut cursor = Cursor::new(&mut tree);
        cursor.add(42);
        assert_eq!(cursor.down(), Ok(Down::Leaf(&42)));
        assert_eq!(cursor.depth(), 0);
    }

    #[test]
    fn test_down_with_nothing_under_pointer() {
        let mut tree: Tree<u32> = Tree::new("root");
        let mut cursor = Cursor::new(&mut tree);
        assert_eq!(cursor.down(), Err(TreeError::EmptyNode));
    }

    #[test]
    fn test_next_and_previous_bounds() {
        let mut tree: Tree<u32> = Tree::new("root");
        let mut cursor = Cursor::new(&mut tree);
        assert_eq!(cursor.next(), Err(TreeError::OutOfBounds));
        cursor.add(1);
        cursor.add(2);
        assert_eq!(cursor.next(), Err(TreeError::OutOfBounds));
        cursor.previous().unwrap();
        assert_eq!(cursor.previous(), Err(TreeError::OutOfBounds));
        cursor.next().unwrap();
        assert_eq!(cursor.pointer().position, Some(1));
        assert_eq!(cursor.history(), &[Some(1)]);
    }

    #[test]
    fn test_remove() {
        let mut tree: Tree<u32> = Tree::new("root");
        let mut cursor = Cursor::new(&mut tree);
        assert_eq!(cursor.remove(), Err(TreeError::EmptyNode));
        cursor.add(1);
        cursor.add(2);
        assert_eq!(cursor.remove(), Ok(Item::Leaf(2)));
        assert_eq!(cursor.pointer().position, Some(0));
        assert_eq!(cursor.remove(), Ok(Item::Leaf(1)));
        assert_eq!(cursor.pointer().position, None);
        assert_eq!(cursor.history(), &[None]);
    }

    #[test]
    fn test_remove_before_first_child() {
        let mut tree: Tree<u32> = Tree::new("root");
        let mut cursor = Cursor::new(&mut tree);
        cursor.add(1);
        cursor.add(2);
        cursor.previous().unwrap();
        cursor.remove().unwrap();
        assert_eq!(cursor.remove(), Err(TreeError::OutOfBounds));
    }

    #[test]
    fn test_new_cursor_on_populated_tree() {
        let mut tree: Tree<u32> = Tree::new("root");
        {
            let mut cursor = Cursor::new(&mut tree);
            cursor.add(1);
            cursor.add(2);
        }
        let mut cursor = Cursor::new(&mut tree);
        assert_eq!(cursor.pointer().position, Some(1));
        cursor.add(3);
        let root = tree.root();
        assert_eq!(leaves(&tree, root), vec![1, 2, 3]);
    }
}
