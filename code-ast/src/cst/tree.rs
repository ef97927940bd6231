//! The parsed tree and its traversal entry points.

use compact_str::CompactString;

use super::node::{Node, NodeData, NodeId};
use crate::config::ParserConfig;
use crate::constants::ERROR_KIND;
use crate::error::{AstError, Result};
use crate::transform::{reconcile, EditMap, TransformCollector, Transformer};
use crate::visitor::{walk, Dispatcher, Visitor};

/// A parsed source file.
///
/// Owns the source text, the node arena and the language tag. Nodes are
/// immutable once the tree exists; visitors only read them.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<NodeData>,
    source: String,
    language: CompactString,
}

impl Tree {
    pub(crate) fn from_parts(nodes: Vec<NodeData>, source: String, language: CompactString) -> Self {
        Self {
            nodes,
            source,
            language,
        }
    }

    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    /// Root node of the tree.
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        Node::new(self, NodeId(0))
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        (id.index() < self.nodes.len()).then(|| Node::new(self, id))
    }

    /// Original source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Language tag the tree was parsed with.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty (never true for a constructed tree).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Source text covered by `node`.
    #[must_use]
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.text())
    }

    /// All nodes in pre-order.
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> {
        (0..self.nodes.len()).map(move |i| Node::new(self, NodeId::from_index(i)))
    }

    /// Whether any node is an `ERROR` node.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.nodes.iter().any(|n| n.kind == ERROR_KIND)
    }

    /// Statement nodes according to `config.statement_types`, in source order.
    #[must_use]
    pub fn statements(&self, config: &ParserConfig) -> Vec<Node<'_>> {
        let matcher = config.statement_matcher();
        self.nodes()
            .filter(|node| node.is_named() && matcher.is_match(node.kind()))
            .collect()
    }

    /// Walks the tree with `visitor`.
    ///
    /// # Errors
    /// Propagates handler failures and ambiguous handler registrations.
    pub fn visit<V: Visitor>(&self, visitor: &mut V) -> Result<()> {
        let mut dispatcher = Dispatcher::new(visitor);
        walk(self.root(), &mut dispatcher, |_, _| {})
    }

    /// Walks the tree with `visitor`, returning every value its leave
    /// handlers produced, in leave order.
    ///
    /// # Errors
    /// Propagates handler failures and ambiguous handler registrations.
    pub fn traverse<V: Visitor>(&self, visitor: &mut V) -> Result<Vec<(NodeId, V::Output)>> {
        let mut dispatcher = Dispatcher::new(visitor);
        let mut results = Vec::new();
        walk(self.root(), &mut dispatcher, |id, value| results.push((id, value)))?;
        Ok(results)
    }

    /// Collects the edits `transformer` emits without applying them.
    ///
    /// # Errors
    /// Propagates handler failures and ambiguous handler registrations.
    pub fn collect_edits<T: Transformer>(&self, transformer: &mut T) -> Result<EditMap> {
        let mut collector = TransformCollector::new(transformer);
        collector.run(self.root())?;
        Ok(collector.into_edits())
    }

    /// Runs `transformer` and reconciles its edits into new source text.
    ///
    /// # Errors
    /// Fails when a handler fails (no edit is applied) or when the edits
    /// reference each other cyclically.
    pub fn transform<T: Transformer>(&self, transformer: &mut T) -> Result<String> {
        let edits = self.collect_edits(transformer)?;
        self.reconcile(&edits)
    }

    /// Reconstructs the source with `edits` applied.
    ///
    /// # Errors
    /// Returns [`AstError::Cycle`] or [`AstError::UnknownNode`].
    pub fn reconcile(&self, edits: &EditMap) -> Result<String> {
        reconcile(self.root(), edits)
    }

    /// Checks that every child lies inside its parent and that siblings are
    /// ordered and disjoint.
    ///
    /// # Errors
    /// Returns [`AstError::MalformedTree`] for the first offending node.
    pub fn validate(&self) -> Result<()> {
        let root = self.data(NodeId(0));
        if root.span.end_byte > self.source.len() || root.span.start_byte > root.span.end_byte {
            return Err(AstError::MalformedTree {
                id: NodeId(0),
                reason: format!(
                    "span {}..{} outside source of length {}",
                    root.span.start_byte,
                    root.span.end_byte,
                    self.source.len()
                ),
            });
        }

        for (index, data) in self.nodes.iter().enumerate() {
            let id = NodeId::from_index(index);
            let mut cursor = data.span.start_byte;
            for &child in &data.children {
                let child_span = self.data(child).span;
                if child_span.start_byte > child_span.end_byte {
                    return Err(AstError::MalformedTree {
                        id: child,
                        reason: "span ends before it starts".to_owned(),
                    });
                }
                if !data.span.contains(&child_span) {
                    return Err(AstError::MalformedTree {
                        id: child,
                        reason: format!(
                            "span {}..{} escapes parent {id} ({}..{})",
                            child_span.start_byte,
                            child_span.end_byte,
                            data.span.start_byte,
                            data.span.end_byte
                        ),
                    });
                }
                if child_span.start_byte < cursor {
                    return Err(AstError::MalformedTree {
                        id: child,
                        reason: format!("overlaps previous sibling ending at byte {cursor}"),
                    });
                }
                cursor = child_span.end_byte;
            }
            if !self.source.is_char_boundary(data.span.start_byte)
                || !self.source.is_char_boundary(data.span.end_byte)
            {
                return Err(AstError::MalformedTree {
                    id,
                    reason: "span does not fall on a character boundary".to_owned(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::cst::TreeBuilder;

    #[test]
    fn test_text_and_lookup() {
        let mut builder = TreeBuilder::new("f(x)", "test");
        let root = builder.open("call", true, 0);
        let name = builder.leaf("identifier", true, 0, 1);
        let args = builder.open("arguments", true, 1);
        builder.leaf("(", false, 1, 2);
        builder.leaf("identifier", true, 2, 3);
        builder.leaf(")", false, 3, 4);
        builder.close(args, 4);
        builder.close(root, 4);
        let tree = builder.finish().unwrap();

        assert_eq!(tree.len(), 6);
        assert_eq!(tree.text(name), Some("f"));
        assert_eq!(tree.text(args), Some("(x)"));
        assert_eq!(tree.language(), "test");
        assert!(!tree.has_errors());
        assert_eq!(tree.nodes().filter(|n| n.kind() == "identifier").count(), 2);
    }
}
