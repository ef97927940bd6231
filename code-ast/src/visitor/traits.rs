//! Visitor trait definitions.

use crate::cst::{Node, NodeId, Tree};
use crate::error::{HandlerResult, Result};

use super::dispatch::Handlers;

/// Returned by enter hooks to control descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TraversalSignal {
    /// Visit the children, then leave this node.
    #[default]
    Continue,
    /// Do not descend; the leave hook of this node still runs, but no hook
    /// fires for any of its descendants.
    SkipChildren,
}

impl TraversalSignal {
    /// `SkipChildren` when `skip` is true.
    #[must_use]
    pub const fn skip_if(skip: bool) -> Self {
        if skip {
            Self::SkipChildren
        } else {
            Self::Continue
        }
    }
}

/// One open node on the walker's stack.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    pub(crate) id: NodeId,
    pub(crate) next_child: usize,
}

/// Lineage of the node currently being visited, root first in storage.
///
/// The current node itself is not part of its ancestors.
#[derive(Clone, Copy)]
pub struct Ancestors<'a, 't> {
    tree: &'t Tree,
    frames: &'a [Frame],
}

impl<'a, 't> Ancestors<'a, 't> {
    pub(crate) fn new(tree: &'t Tree, frames: &'a [Frame]) -> Self {
        Self { tree, frames }
    }

    fn at(&self, frame: &Frame) -> Node<'t> {
        Node::new(self.tree, frame.id)
    }

    /// The direct parent, `None` for the walk's starting node.
    #[must_use]
    pub fn parent(&self) -> Option<Node<'t>> {
        self.frames.last().map(|frame| self.at(frame))
    }

    /// Number of ancestors (zero at the starting node).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Whether there are no ancestors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Ancestors from the parent up to the starting node.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Node<'t>> + 'a
    where
        't: 'a,
    {
        let tree = self.tree;
        self.frames
            .iter()
            .rev()
            .map(move |frame| Node::new(tree, frame.id))
    }

    /// Nearest ancestor of the given type.
    #[must_use]
    pub fn nearest(&self, kind: &str) -> Option<Node<'t>> {
        self.frames
            .iter()
            .rev()
            .map(|frame| self.at(frame))
            .find(|node| node.kind() == kind)
    }

    /// Whether any ancestor has the given type.
    #[must_use]
    pub fn contains_kind(&self, kind: &str) -> bool {
        self.nearest(kind).is_some()
    }
}

/// A visitor with handlers selected by node type.
///
/// Handlers are registered through [`handlers`](Self::handlers) under the
/// names `enter_<type>` / `leave_<type>` (see [`crate::visitor::dispatch`]).
/// Nodes without a registered handler fall through to [`enter`](Self::enter)
/// and [`leave`](Self::leave), which do nothing by default.
///
/// ```
/// use code_ast::cst::{Node, TreeBuilder};
/// use code_ast::error::HandlerResult;
/// use code_ast::visitor::{Ancestors, Handlers, TraversalSignal, Visitor};
///
/// #[derive(Default)]
/// struct IdCounter {
///     count: usize,
/// }
///
/// impl IdCounter {
///     fn enter_identifier(&mut self, _: Node<'_>, _: Ancestors<'_, '_>) -> HandlerResult<TraversalSignal> {
///         self.count += 1;
///         Ok(TraversalSignal::Continue)
///     }
/// }
///
/// impl Visitor for IdCounter {
///     type Output = ();
///
///     fn handlers(&self) -> Handlers<Self> {
///         Handlers::new().enter("identifier", Self::enter_identifier)
///     }
/// }
///
/// let mut builder = TreeBuilder::new("a+b", "demo");
/// let root = builder.open("sum", true, 0);
/// builder.leaf("identifier", true, 0, 1);
/// builder.leaf("+", false, 1, 2);
/// builder.leaf("identifier", true, 2, 3);
/// builder.close(root, 3);
/// let tree = builder.finish().unwrap();
///
/// let mut counter = IdCounter::default();
/// tree.visit(&mut counter).unwrap();
/// assert_eq!(counter.count, 2);
/// ```
pub trait Visitor: Sized {
    /// Value produced by leave handlers (`()` for plain visitors).
    type Output;

    /// Type-specific handlers. Called once at the start of each traversal.
    fn handlers(&self) -> Handlers<Self> {
        Handlers::new()
    }

    /// Catch-all enter hook for nodes without a specific handler.
    fn enter(&mut self, _node: Node<'_>, _ancestors: Ancestors<'_, '_>) -> HandlerResult<TraversalSignal> {
        Ok(TraversalSignal::Continue)
    }

    /// Catch-all leave hook for nodes without a specific handler.
    fn leave(
        &mut self,
        _node: Node<'_>,
        _ancestors: Ancestors<'_, '_>,
    ) -> HandlerResult<Option<Self::Output>> {
        Ok(None)
    }
}

/// The hooks the walker drives. Object safe, so visitors can be composed.
///
/// Implemented by [`Dispatcher`](super::Dispatcher) for every [`Visitor`]
/// and by the compositions in [`super::compose`].
pub trait NodeVisitor {
    /// Value produced when leaving a node.
    type Output;

    /// Called before the children of `node`.
    ///
    /// # Errors
    /// Handler failures and dispatch configuration errors.
    fn on_enter(&mut self, node: Node<'_>, ancestors: Ancestors<'_, '_>) -> Result<TraversalSignal>;

    /// Called after the children of `node` (or right after `on_enter` when
    /// they were skipped).
    ///
    /// # Errors
    /// Handler failures and dispatch configuration errors.
    fn on_leave(&mut self, node: Node<'_>, ancestors: Ancestors<'_, '_>)
        -> Result<Option<Self::Output>>;
}
