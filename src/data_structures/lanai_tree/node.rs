//! Node implementation for the Lanai Tree.
//!
//! Nodes live in an arena owned by the tree and refer to each other by
//! [`NodeId`]. Child links own their targets; the parent link is a plain
//! back-reference used only while pruning.

/// Index of a node inside the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which of a node's three child links reaches a given child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// Alternative with a smaller character at the same key position.
    Smaller,
    /// Next character position of the key.
    Equal,
    /// Alternative with a bigger character at the same key position.
    Bigger,
}

/// A node in the Lanai Tree.
///
/// Each node holds one character of one or more keys. A final node terminates
/// a key and carries its payload.
#[derive(Debug, Clone)]
pub struct Node<V> {
    /// The character this node represents
    pub value: char,

    /// Payload of the key ending here, `Some` exactly when the node is final
    pub data: Option<V>,

    /// Back-reference used to walk upward when pruning
    pub parent: Option<NodeId>,

    /// Child with a smaller character at the same position
    pub smaller: Option<NodeId>,

    /// Child holding the next character of the key
    pub equal: Option<NodeId>,

    /// Child with a bigger character at the same position
    pub bigger: Option<NodeId>,
}

impl<V> Node<V> {
    /// Creates a new non-final, childless node.
    pub fn new(value: char, parent: Option<NodeId>) -> Self {
        Self {
            value,
            data: None,
            parent,
            smaller: None,
            equal: None,
            bigger: None,
        }
    }

    /// Whether some key terminates at this node.
    pub fn is_final(&self) -> bool {
        self.data.is_some()
    }

    /// Whether the node has no children at all.
    pub fn is_leaf(&self) -> bool {
        self.smaller.is_none() && self.equal.is_none() && self.bigger.is_none()
    }

    /// A childless node that terminates no key must not stay in the tree.
    pub fn is_dead(&self) -> bool {
        self.is_leaf() && !self.is_final()
    }

    /// Returns the child reached through `link`.
    pub fn child(&self, link: Link) -> Option<NodeId> {
        match link {
            Link::Smaller => self.smaller,
            Link::Equal => self.equal,
            Link::Bigger => self.bigger,
        }
    }

    /// Mutable access to the slot behind `link`.
    pub fn child_mut(&mut self, link: Link) -> &mut Option<NodeId> {
        match link {
            Link::Smaller => &mut self.smaller,
            Link::Equal => &mut self.equal,
            Link::Bigger => &mut self.bigger,
        }
    }

    /// Finds the link through which this node reaches `child`, if any.
    pub fn link_to(&self, child: NodeId) -> Option<Link> {
        [Link::Smaller, Link::Equal, Link::Bigger]
            .into_iter()
            .find(|&link| self.child(link) == Some(child))
    }
}
