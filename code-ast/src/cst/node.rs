//! Arena-backed node handles.

use compact_str::CompactString;
use smallvec::SmallVec;
use std::fmt;

use super::tree::Tree;
use crate::constants::ERROR_KIND;

/// Index of a node inside its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position of the node in the arena (pre-order).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Id of the arena slot at `index`, saturating past `u32::MAX`.
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A point in source code (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Point {
    /// Zero-indexed row number
    pub row: usize,
    /// Zero-indexed column (byte offset within line)
    pub column: usize,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl From<tree_sitter::Point> for Point {
    fn from(p: tree_sitter::Point) -> Self {
        Self {
            row: p.row,
            column: p.column,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.column)
    }
}

/// Byte and point extent of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start_byte: usize,
    /// End byte offset (exclusive)
    pub end_byte: usize,
    /// Start point (row, column)
    pub start: Point,
    /// End point (row, column)
    pub end: Point,
}

impl Span {
    /// Check if this span contains `other` entirely.
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        self.start_byte <= other.start_byte && other.end_byte <= self.end_byte
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end_byte.saturating_sub(self.start_byte)
    }

    /// Whether the span covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Arena slot for one node.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: CompactString,
    pub(crate) is_named: bool,
    pub(crate) span: Span,
    pub(crate) children: SmallVec<[NodeId; 4]>,
}

/// Borrowed handle to a node of a [`Tree`].
///
/// Handles are `Copy` and compare by identity: two handles are equal when
/// they point at the same slot of the same tree.
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl<'t> Node<'t> {
    pub(crate) fn new(tree: &'t Tree, id: NodeId) -> Self {
        Self { tree, id }
    }

    fn data(&self) -> &'t NodeData {
        self.tree.data(self.id)
    }

    /// Identity of this node within its tree.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The tree this node belongs to.
    #[must_use]
    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    /// Grammar type name, e.g. `identifier` or `binary_operator`.
    #[must_use]
    pub fn kind(&self) -> &'t str {
        self.data().kind.as_str()
    }

    /// Whether the grammar names this node (as opposed to punctuation tokens).
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.data().is_named
    }

    /// Whether this is a parser error-recovery node.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind() == ERROR_KIND
    }

    /// Byte and point extent.
    #[must_use]
    pub fn span(&self) -> Span {
        self.data().span
    }

    /// Start byte offset (inclusive).
    #[must_use]
    pub fn start_byte(&self) -> usize {
        self.data().span.start_byte
    }

    /// End byte offset (exclusive).
    #[must_use]
    pub fn end_byte(&self) -> usize {
        self.data().span.end_byte
    }

    /// Start point.
    #[must_use]
    pub fn start_point(&self) -> Point {
        self.data().span.start
    }

    /// End point.
    #[must_use]
    pub fn end_point(&self) -> Point {
        self.data().span.end
    }

    /// Original source text covered by this node.
    #[must_use]
    pub fn text(&self) -> &'t str {
        let span = self.span();
        &self.tree.source()[span.start_byte..span.end_byte]
    }

    /// Number of children (named and anonymous).
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    /// Child at `index`, in source order.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<Node<'t>> {
        self.data()
            .children
            .get(index)
            .map(|&id| Node::new(self.tree, id))
    }

    /// Ids of the children in source order.
    #[must_use]
    pub fn child_ids(&self) -> &'t [NodeId] {
        &self.data().children
    }

    /// Children in source order.
    pub fn children(&self) -> impl ExactSizeIterator<Item = Node<'t>> + 't {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&id| Node::new(tree, id))
    }

    /// Named children only.
    pub fn named_children(&self) -> impl Iterator<Item = Node<'t>> + 't {
        self.children().filter(Node::is_named)
    }

    /// Whether the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.data().children.is_empty()
    }

    /// Smallest node in this subtree covering `start..end`.
    #[must_use]
    pub fn find_smallest_covering(&self, start: usize, end: usize) -> Option<Node<'t>> {
        let span = self.span();
        if start < span.start_byte || end > span.end_byte {
            return None;
        }

        let mut current = *self;
        'descend: loop {
            for child in current.children() {
                if child.start_byte() <= start && child.end_byte() >= end {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    /// All nodes of `kind` in this subtree, in pre-order.
    #[must_use]
    pub fn find_by_kind(&self, kind: &str) -> Vec<Node<'t>> {
        let mut result = Vec::new();
        let mut stack = vec![*self];
        while let Some(node) = stack.pop() {
            if node.kind() == kind {
                result.push(node);
            }
            let children: SmallVec<[Node<'t>; 8]> = node.children().collect();
            stack.extend(children.into_iter().rev());
        }
        result
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} - {}",
            self.kind(),
            self.start_point(),
            self.end_point()
        )
    }
}
