//! Rebuilding source text from a tree and its edits.
//!
//! The output covers the root's span; reconciling from the tree's root also
//! keeps whatever the parser left outside it (leading blank lines, trailing
//! whitespace). Nodes without a directive reproduce their source byte for
//! byte, including the gaps between their children; literal directives
//! replace a node and drop everything below it; formatted directives
//! interpolate their slots, resolving node slots in turn.
//!
//! Work is driven by an explicit stack, so nesting depth is bounded by
//! memory rather than the call stack.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::directive::{EditDirective, EditMap, Slot};
use crate::cst::{Node, NodeId, Tree};
use crate::error::{AstError, Result};

/// Pending output, popped in order.
enum Work<'e> {
    Emit(NodeId),
    Copy { start: usize, end: usize },
    Text(&'e str),
    /// `id` finished resolving.
    Release(NodeId),
}

struct Reconciler<'t, 'e> {
    tree: &'t Tree,
    edits: &'e EditMap,
    /// Nodes on the current resolution chain.
    in_progress: FxHashSet<NodeId>,
    stack: Vec<Work<'e>>,
    out: String,
}

impl<'e> Reconciler<'_, 'e> {
    fn run(&mut self, root: NodeId) -> Result<()> {
        self.stack.push(Work::Emit(root));
        while let Some(work) = self.stack.pop() {
            match work {
                Work::Emit(id) => self.expand(id)?,
                Work::Copy { start, end } => self.out.push_str(&self.tree.source()[start..end]),
                Work::Text(text) => self.out.push_str(text),
                Work::Release(id) => {
                    self.in_progress.remove(&id);
                }
            }
        }
        Ok(())
    }

    /// Schedules the output of `id`.
    fn expand(&mut self, id: NodeId) -> Result<()> {
        let node = self.tree.node(id).ok_or(AstError::UnknownNode(id))?;
        if !self.in_progress.insert(id) {
            return Err(AstError::Cycle {
                id,
                kind: node.kind().to_owned(),
            });
        }
        self.stack.push(Work::Release(id));

        let edits = self.edits;
        let mut pending: SmallVec<[Work<'e>; 8]> = SmallVec::new();
        match edits.get(id) {
            None => source_work(node, &mut pending),
            Some(EditDirective::Literal(text)) => pending.push(Work::Text(text)),
            Some(EditDirective::Formatted(formatted)) => {
                let segments = formatted.segments();
                for (segment, slot) in segments.iter().zip(formatted.slots()) {
                    pending.push(Work::Text(segment));
                    pending.push(match slot {
                        Slot::Literal(text) => Work::Text(text),
                        Slot::Node(target) => Work::Emit(*target),
                    });
                }
                if let Some(tail) = segments.last() {
                    pending.push(Work::Text(tail));
                }
            }
        }
        self.stack.extend(pending.into_iter().rev());
        Ok(())
    }
}

/// Source of `node` with each child left to be reconciled in place.
fn source_work(node: Node<'_>, pending: &mut SmallVec<[Work<'_>; 8]>) {
    let mut cursor = node.start_byte();
    for child in node.children() {
        if child.start_byte() > cursor {
            pending.push(Work::Copy {
                start: cursor,
                end: child.start_byte(),
            });
        }
        pending.push(Work::Emit(child.id()));
        cursor = cursor.max(child.end_byte());
    }
    if node.end_byte() > cursor {
        pending.push(Work::Copy {
            start: cursor,
            end: node.end_byte(),
        });
    }
}

/// Reconciles the subtree at `root` with `edits` into new source text.
///
/// When `root` is the root of its tree, source before and after its span
/// is kept, so an empty map reproduces the whole source.
///
/// Directives on nodes that end up unreachable (inside a literal
/// replacement, or below a formatted one without being referenced by a
/// slot) have no effect.
///
/// # Errors
/// Returns [`AstError::Cycle`] when a slot chain leads back to a node that
/// is still being resolved, and [`AstError::UnknownNode`] for slot ids
/// outside the tree.
pub fn reconcile(root: Node<'_>, edits: &EditMap) -> Result<String> {
    let tree = root.tree();
    let source = tree.source();
    let whole = root.id() == tree.root().id();
    let mut reconciler = Reconciler {
        tree,
        edits,
        in_progress: FxHashSet::default(),
        stack: Vec::new(),
        out: String::with_capacity(if whole {
            source.len()
        } else {
            root.end_byte() - root.start_byte()
        }),
    };
    if whole {
        reconciler.out.push_str(&source[..root.start_byte()]);
    }
    reconciler.run(root.id())?;
    if whole {
        reconciler.out.push_str(&source[root.end_byte()..]);
    }
    Ok(reconciler.out)
}
