//! Depth-first traversal.
//!
//! - **Pre-order**: the enter hook runs before descending into children
//! - **Post-order**: the leave hook runs after all children were left
//! - **Source order**: children are visited left to right
//!
//! The walk keeps its own frame stack instead of recursing, so tree depth
//! is bounded by memory rather than by the call stack. The open frames are
//! what handlers see as [`Ancestors`].

use super::traits::{Ancestors, Frame, NodeVisitor, TraversalSignal};
use crate::cst::{Node, NodeId};
use crate::error::Result;

/// Walks the subtree rooted at `root`, handing every leave output to `sink`.
///
/// A failing hook aborts the walk immediately; no further hook runs.
///
/// # Errors
/// The first error returned by a hook.
pub fn walk<W, F>(root: Node<'_>, visitor: &mut W, mut sink: F) -> Result<()>
where
    W: NodeVisitor + ?Sized,
    F: FnMut(NodeId, W::Output),
{
    let tree = root.tree();
    let mut frames: Vec<Frame> = Vec::new();

    let mut pending = Some(root);
    loop {
        if let Some(node) = pending.take() {
            let signal = visitor.on_enter(node, Ancestors::new(tree, &frames))?;
            if signal == TraversalSignal::Continue && !node.is_leaf() {
                frames.push(Frame {
                    id: node.id(),
                    next_child: 0,
                });
            } else if let Some(output) = visitor.on_leave(node, Ancestors::new(tree, &frames))? {
                sink(node.id(), output);
            }
        }

        let Some(frame) = frames.last_mut() else {
            break;
        };
        let Some(parent) = tree.node(frame.id) else {
            break;
        };

        if let Some(child) = parent.child(frame.next_child) {
            frame.next_child += 1;
            pending = Some(child);
        } else {
            frames.pop();
            if let Some(output) = visitor.on_leave(parent, Ancestors::new(tree, &frames))? {
                sink(parent.id(), output);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{Tree, TreeBuilder};
    use crate::error::HandlerResult;
    use crate::visitor::{Dispatcher, Handlers, Visitor};

    fn sample() -> Tree {
        // (a (b c) d)
        let mut builder = TreeBuilder::new("bcd", "test");
        let a = builder.open("a", true, 0);
        let b = builder.open("b", true, 0);
        builder.leaf("c", true, 1, 2);
        builder.close(b, 2);
        builder.leaf("d", true, 2, 3);
        builder.close(a, 3);
        builder.finish().unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        skip: Option<&'static str>,
    }

    impl Visitor for Recorder {
        type Output = usize;

        fn enter(&mut self, node: Node<'_>, ancestors: Ancestors<'_, '_>) -> HandlerResult<TraversalSignal> {
            self.events
                .push(format!("enter {} @{}", node.kind(), ancestors.depth()));
            Ok(TraversalSignal::skip_if(self.skip == Some(node.kind())))
        }

        fn leave(&mut self, node: Node<'_>, _: Ancestors<'_, '_>) -> HandlerResult<Option<usize>> {
            self.events.push(format!("leave {}", node.kind()));
            Ok(Some(node.id().index()))
        }
    }

    #[test]
    fn test_pre_and_post_order() {
        let tree = sample();
        let mut recorder = Recorder::default();
        let mut left = Vec::new();
        walk(tree.root(), &mut Dispatcher::new(&mut recorder), |id, out| {
            assert_eq!(id.index(), out);
            left.push(out);
        })
        .unwrap();

        assert_eq!(
            recorder.events,
            [
                "enter a @0",
                "enter b @1",
                "enter c @2",
                "leave c",
                "leave b",
                "enter d @1",
                "leave d",
                "leave a"
            ]
        );
        assert_eq!(left, [2, 1, 3, 0]);
    }

    #[test]
    fn test_skip_children_still_leaves_node() {
        let tree = sample();
        let mut recorder = Recorder {
            skip: Some("b"),
            ..Recorder::default()
        };
        tree.visit(&mut recorder).unwrap();

        assert_eq!(
            recorder.events,
            [
                "enter a @0",
                "enter b @1",
                "leave b",
                "enter d @1",
                "leave d",
                "leave a"
            ]
        );
    }

    #[test]
    fn test_walk_from_inner_node() {
        let tree = sample();
        let b = tree.root().child(0).unwrap();
        let mut recorder = Recorder::default();
        walk(b, &mut Dispatcher::new(&mut recorder), |_, _| {}).unwrap();
        assert_eq!(recorder.events, ["enter b @0", "enter c @1", "leave c", "leave b"]);
    }

    struct Lineage {
        seen: Vec<String>,
    }

    impl Lineage {
        fn enter_c(&mut self, _: Node<'_>, ancestors: Ancestors<'_, '_>) -> HandlerResult<TraversalSignal> {
            self.seen = ancestors.iter().map(|n| n.kind().to_owned()).collect();
            Ok(TraversalSignal::Continue)
        }
    }

    impl Visitor for Lineage {
        type Output = ();

        fn handlers(&self) -> Handlers<Self> {
            Handlers::new().enter("c", Self::enter_c)
        }
    }

    #[test]
    fn test_ancestor_stack() {
        let tree = sample();
        let mut lineage = Lineage { seen: Vec::new() };
        tree.visit(&mut lineage).unwrap();
        assert_eq!(lineage.seen, ["b", "a"]);
    }

    struct Failing {
        entered: usize,
    }

    impl Failing {
        fn enter_c(&mut self, _: Node<'_>, _: Ancestors<'_, '_>) -> HandlerResult<TraversalSignal> {
            Err("boom".into())
        }
    }

    impl Visitor for Failing {
        type Output = ();

        fn handlers(&self) -> Handlers<Self> {
            Handlers::new().enter("c", Self::enter_c)
        }

        fn enter(&mut self, _: Node<'_>, _: Ancestors<'_, '_>) -> HandlerResult<TraversalSignal> {
            self.entered += 1;
            Ok(TraversalSignal::Continue)
        }
    }

    #[test]
    fn test_handler_error_aborts_walk() {
        let tree = sample();
        let mut failing = Failing { entered: 0 };
        let err = tree.visit(&mut failing).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        // a and b were entered, d never was
        assert_eq!(failing.entered, 2);
    }
}
