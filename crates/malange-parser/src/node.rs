//! Arena-backed tree of named nodes and leaf values.
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`]. A node owns its
//! children through its `children` list; the `parent` link is only an index used
//! for ascent.

use std::fmt;

/// Index of a node in its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A child slot: either a nested node or a leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Item<L> {
    Node(NodeId),
    Leaf(L),
}

impl<L> Item<L> {
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Item::Node(id) => Some(*id),
            Item::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&L> {
        match self {
            Item::Node(_) => None,
            Item::Leaf(leaf) => Some(leaf),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node<L> {
    pub name: String,
    pub children: Vec<Item<L>>,
    pub parent: Option<NodeId>,
    pub depth: usize,
    /// Index of this node in its parent's `children`.
    pub position: usize,
}

/// A rooted tree. The root has depth 0 and no parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree<L> {
    nodes: Vec<Node<L>>,
}

impl<L> Tree<L> {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node {
                name: root_name.into(),
                children: Vec::new(),
                parent: None,
                depth: 0,
                position: 0,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node<L> {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[Item<L>] {
        &self.nodes[id.0].children
    }

    /// Child nodes of `id`, skipping leaves.
    pub fn child_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).iter().filter_map(Item::as_node)
    }

    /// Leaves directly under `id`.
    pub fn leaves(&self, id: NodeId) -> impl Iterator<Item = &L> + '_ {
        self.children(id).iter().filter_map(Item::as_leaf)
    }

    pub(crate) fn insert_leaf(&mut self, parent: NodeId, index: usize, leaf: L) {
        self.nodes[parent.0].children.insert(index, Item::Leaf(leaf));
        self.reindex(parent, index + 1);
    }

    pub(crate) fn insert_node(&mut self, parent: NodeId, index: usize, name: String) -> NodeId {
        let id = NodeId(self.nodes.len());
        let depth = self.nodes[parent.0].depth + 1;
        self.nodes.push(Node {
            name,
            children: Vec::new(),
            parent: Some(parent),
            depth,
            position: index,
        });
        self.nodes[parent.0].children.insert(index, Item::Node(id));
        self.reindex(parent, index + 1);
        id
    }

    /// Detach the child at `index`. A detached node stays in the arena but is no
    /// longer reachable from the root.
    pub(crate) fn remove(&mut self, parent: NodeId, index: usize) -> Item<L> {
        let item = self.nodes[parent.0].children.remove(index);
        self.reindex(parent, index);
        item
    }

    /// Keep `position` of every node-typed child from `from` onward equal to its index.
    fn reindex(&mut self, parent: NodeId, from: usize) {
        for i in from..self.nodes[parent.0].children.len() {
            if let Item::Node(id) = self.nodes[parent.0].children[i] {
                self.nodes[id.0].position = i;
            }
        }
    }
}

impl<L: fmt::Display> Tree<L> {
    fn fmt_header(&self, f: &mut fmt::Formatter<'_>, id: NodeId, indent: usize) -> fmt::Result {
        let node = self.node(id);
        writeln!(
            f,
            "{:width$}{}({}, {}) {{",
            "",
            node.name,
            node.depth,
            node.position,
            width = indent * 2
        )
    }
}

impl<L: fmt::Display> fmt::Display for Tree<L> {
    /// Walks the tree with an explicit stack of `(node, next child)` frames, so
    /// depth is bounded by memory rather than the call stack.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.root();
        self.fmt_header(f, root, 0)?;
        let mut stack = vec![(root, 0usize)];
        while let Some(&(id, next)) = stack.last() {
            let indent = (stack.len() - 1) * 2;
            let Some(item) = self.children(id).get(next) else {
                writeln!(f, "{:indent$}}}", "")?;
                stack.pop();
                continue;
            };
            if let Some(frame) = stack.last_mut() {
                frame.1 += 1;
            }
            match item {
                Item::Node(child) => {
                    self.fmt_header(f, *child, stack.len())?;
                    stack.push((*child, 0));
                }
                Item::Leaf(leaf) => writeln!(f, "{:width$}{leaf}", "", width = indent + 2)?,
            }
        }
        Ok(())
    }
}
