//! Visitor specialization that records edits.

use super::directive::{EditDirective, EditMap};
use crate::cst::Node;
use crate::error::Result;
use crate::visitor::{walk, Dispatcher, Visitor};

/// A visitor whose leave handlers return edit directives.
///
/// Returning `Some(directive)` from a leave handler replaces that node;
/// `None` leaves it alone.
pub trait Transformer: Visitor<Output = EditDirective> {}

impl<T: Visitor<Output = EditDirective>> Transformer for T {}

/// Runs a [`Transformer`] and accumulates its directives.
///
/// The collector only observes: the tree and its source are never touched.
pub struct TransformCollector<'v, T: Transformer> {
    dispatcher: Dispatcher<'v, T>,
    edits: EditMap,
}

impl<'v, T: Transformer> TransformCollector<'v, T> {
    /// Collector starting from an empty map.
    pub fn new(transformer: &'v mut T) -> Self {
        Self::with_edits(transformer, EditMap::new())
    }

    /// Collector adding to existing edits; later directives replace earlier
    /// ones for the same node.
    pub fn with_edits(transformer: &'v mut T, edits: EditMap) -> Self {
        Self {
            dispatcher: Dispatcher::new(transformer),
            edits,
        }
    }

    /// Walks the subtree at `root`, recording every directive in leave order.
    ///
    /// # Errors
    /// Aborts on the first handler failure; the caller should discard the
    /// collector since the map may then be partial.
    pub fn run(&mut self, root: Node<'_>) -> Result<()> {
        let edits = &mut self.edits;
        walk(root, &mut self.dispatcher, |id, directive| {
            edits.insert(id, directive);
        })
    }

    /// Edits collected so far.
    #[must_use]
    pub fn edits(&self) -> &EditMap {
        &self.edits
    }

    /// Hands the collected edits over.
    #[must_use]
    pub fn into_edits(self) -> EditMap {
        self.edits
    }
}
