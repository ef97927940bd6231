//! Incremental tree construction.
//!
//! Both the tree-sitter adapter and tests go through [`TreeBuilder`]; nodes
//! are appended in pre-order, so the root always ends up at index 0.

use compact_str::CompactString;
use smallvec::SmallVec;

use super::node::{NodeData, NodeId, Point, Span};
use super::tree::Tree;
use crate::error::{AstError, Result};

/// Builds a [`Tree`] node by node.
///
/// ```
/// use code_ast::cst::TreeBuilder;
///
/// let mut builder = TreeBuilder::new("a = 1", "demo");
/// let root = builder.open("assignment", true, 0);
/// builder.leaf("identifier", true, 0, 1);
/// builder.leaf("=", false, 2, 3);
/// builder.leaf("integer", true, 4, 5);
/// builder.close(root, 5);
/// let tree = builder.finish().expect("valid tree");
/// assert_eq!(tree.root().child_count(), 3);
/// ```
#[derive(Debug)]
pub struct TreeBuilder {
    source: String,
    language: CompactString,
    line_starts: Vec<usize>,
    nodes: Vec<NodeData>,
    open: Vec<NodeId>,
}

impl TreeBuilder {
    /// Starts a tree over `source` tagged with `language`.
    #[must_use]
    pub fn new(source: impl Into<String>, language: &str) -> Self {
        let source = source.into();
        let mut line_starts = vec![0];
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            source,
            language: CompactString::from(language),
            line_starts,
            nodes: Vec::new(),
            open: Vec::new(),
        }
    }

    fn point_at(&self, byte: usize) -> Point {
        let row = match self.line_starts.binary_search(&byte) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        Point::new(row, byte - self.line_starts[row])
    }

    pub(crate) fn push(&mut self, kind: &str, is_named: bool, span: Span) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        if let Some(&parent) = self.open.last() {
            self.nodes[parent.index()].children.push(id);
        }
        self.nodes.push(NodeData {
            kind: CompactString::from(kind),
            is_named,
            span,
            children: SmallVec::new(),
        });
        id
    }

    pub(crate) fn push_open(&mut self, kind: &str, is_named: bool, span: Span) -> NodeId {
        let id = self.push(kind, is_named, span);
        self.open.push(id);
        id
    }

    pub(crate) fn pop_open(&mut self) {
        self.open.pop();
    }

    /// Opens an inner node starting at `start_byte`; children added until
    /// the matching [`close`](Self::close) belong to it.
    pub fn open(&mut self, kind: &str, is_named: bool, start_byte: usize) -> NodeId {
        let start = self.point_at(start_byte);
        self.push_open(
            kind,
            is_named,
            Span {
                start_byte,
                end_byte: start_byte,
                start,
                end: start,
            },
        )
    }

    /// Closes `id`, which must be the innermost open node.
    pub fn close(&mut self, id: NodeId, end_byte: usize) {
        let end = self.point_at(end_byte);
        if let Some(data) = self.nodes.get_mut(id.index()) {
            data.span.end_byte = end_byte;
            data.span.end = end;
        }
        if self.open.last() == Some(&id) {
            self.open.pop();
        }
    }

    /// Adds a leaf covering `start_byte..end_byte`.
    pub fn leaf(&mut self, kind: &str, is_named: bool, start_byte: usize, end_byte: usize) -> NodeId {
        let span = Span {
            start_byte,
            end_byte,
            start: self.point_at(start_byte),
            end: self.point_at(end_byte),
        };
        self.push(kind, is_named, span)
    }

    /// Validates the span invariants and returns the tree.
    ///
    /// # Errors
    /// Returns [`AstError::MalformedTree`] when a node is still open, a span
    /// leaves the source, a child escapes its parent or siblings overlap.
    pub fn finish(self) -> Result<Tree> {
        if let Some(&id) = self.open.last() {
            return Err(AstError::MalformedTree {
                id,
                reason: "node was never closed".to_owned(),
            });
        }
        let tree = self.finish_unchecked()?;
        tree.validate()?;
        Ok(tree)
    }

    pub(crate) fn finish_unchecked(self) -> Result<Tree> {
        if self.nodes.is_empty() {
            return Err(AstError::MalformedTree {
                id: NodeId(0),
                reason: "tree has no root".to_owned(),
            });
        }
        Ok(Tree::from_parts(self.nodes, self.source, self.language))
    }
}
