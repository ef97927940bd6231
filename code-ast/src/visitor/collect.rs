//! Closure-based collection over a subtree.

use std::marker::PhantomData;

use super::dispatch::Dispatcher;
use super::traits::{Ancestors, TraversalSignal, Visitor};
use super::walk::walk;
use crate::cst::{Node, NodeId};
use crate::error::{HandlerResult, Result};

/// Visitor that maps every node through a closure and keeps the `Some`s.
pub struct CollectingVisitor<T, F> {
    map_fn: F,
    results: Vec<T>,
    _marker: PhantomData<fn() -> T>,
}

impl<T, F> CollectingVisitor<T, F>
where
    F: FnMut(Node<'_>) -> Option<T>,
{
    /// Wraps `map_fn`.
    pub fn new(map_fn: F) -> Self {
        Self {
            map_fn,
            results: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Values collected so far, in pre-order.
    #[must_use]
    pub fn results(&self) -> &[T] {
        &self.results
    }

    /// Consumes the visitor, returning the collected values.
    pub fn into_results(self) -> Vec<T> {
        self.results
    }
}

impl<T, F> Visitor for CollectingVisitor<T, F>
where
    F: FnMut(Node<'_>) -> Option<T>,
{
    type Output = ();

    fn enter(&mut self, node: Node<'_>, _: Ancestors<'_, '_>) -> HandlerResult<TraversalSignal> {
        if let Some(value) = (self.map_fn)(node) {
            self.results.push(value);
        }
        Ok(TraversalSignal::Continue)
    }
}

/// Maps every node under `root` (inclusive) through `map_fn`, in pre-order,
/// keeping the values it returns. Subtrees cannot be skipped; write a
/// [`Visitor`] for that.
///
/// # Errors
/// Only fails if the walk itself fails, which a closure cannot cause.
pub fn visit_tree<T, F>(root: Node<'_>, map_fn: F) -> Result<Vec<T>>
where
    F: FnMut(Node<'_>) -> Option<T>,
{
    let mut collector = CollectingVisitor::new(map_fn);
    walk(root, &mut Dispatcher::new(&mut collector), |_, _| {})?;
    Ok(collector.into_results())
}

/// Nodes under `root` (inclusive) for which `predicate` holds, in pre-order.
///
/// # Errors
/// See [`visit_tree`].
pub fn collect_nodes<'t, P>(root: Node<'t>, mut predicate: P) -> Result<Vec<Node<'t>>>
where
    P: FnMut(Node<'_>) -> bool,
{
    let ids: Vec<NodeId> = visit_tree(root, |node| predicate(node).then(|| node.id()))?;
    let tree = root.tree();
    Ok(ids.into_iter().filter_map(|id| tree.node(id)).collect())
}

/// Nodes of type `kind` under `root` (inclusive), in pre-order.
///
/// # Errors
/// See [`visit_tree`].
pub fn collect_kind<'t>(root: Node<'t>, kind: &str) -> Result<Vec<Node<'t>>> {
    collect_nodes(root, |node| node.kind() == kind)
}
