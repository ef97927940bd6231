//! Running several visitors in a single walk.

use super::dispatch::Dispatcher;
use super::traits::{Ancestors, NodeVisitor, TraversalSignal, Visitor};
use crate::cst::{Node, NodeId};
use crate::error::Result;

type Member<'v, O> = Box<dyn NodeVisitor<Output = O> + 'v>;

/// Visitors advanced in lock-step over one walk.
///
/// Every member sees every enter and leave. Children are skipped as soon as
/// any member asks for it, for all members alike. When several members
/// produce a value for the same node, the last one wins.
pub struct VisitorComposition<'v, O> {
    members: Vec<Member<'v, O>>,
}

impl<O> Default for VisitorComposition<'_, O> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
        }
    }
}

impl<'v, O: 'v> VisitorComposition<'v, O> {
    /// Empty composition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a visitor.
    #[must_use]
    pub fn with<V: Visitor<Output = O>>(mut self, visitor: &'v mut V) -> Self {
        self.members.push(Box::new(Dispatcher::new(visitor)));
        self
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<O> NodeVisitor for VisitorComposition<'_, O> {
    type Output = O;

    fn on_enter(&mut self, node: Node<'_>, ancestors: Ancestors<'_, '_>) -> Result<TraversalSignal> {
        let mut signal = TraversalSignal::Continue;
        for member in &mut self.members {
            if member.on_enter(node, ancestors)? == TraversalSignal::SkipChildren {
                signal = TraversalSignal::SkipChildren;
            }
        }
        Ok(signal)
    }

    fn on_leave(&mut self, node: Node<'_>, ancestors: Ancestors<'_, '_>) -> Result<Option<O>> {
        let mut last = None;
        for member in &mut self.members {
            if let Some(output) = member.on_leave(node, ancestors)? {
                last = Some(output);
            }
        }
        Ok(last)
    }
}

/// Visitors that skip subtrees independently of each other.
///
/// A member that skips a node is suspended until that node is left, while
/// the others keep descending. The walk only skips children once every
/// member is suspended. The result matches running the members one after
/// another.
pub struct ResumingVisitorComposition<'v, O> {
    members: Vec<Member<'v, O>>,
    suspended_at: Vec<Option<NodeId>>,
}

impl<O> Default for ResumingVisitorComposition<'_, O> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            suspended_at: Vec::new(),
        }
    }
}

impl<'v, O: 'v> ResumingVisitorComposition<'v, O> {
    /// Empty composition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a visitor.
    #[must_use]
    pub fn with<V: Visitor<Output = O>>(mut self, visitor: &'v mut V) -> Self {
        self.members.push(Box::new(Dispatcher::new(visitor)));
        self.suspended_at.push(None);
        self
    }
}

impl<O> NodeVisitor for ResumingVisitorComposition<'_, O> {
    type Output = O;

    fn on_enter(&mut self, node: Node<'_>, ancestors: Ancestors<'_, '_>) -> Result<TraversalSignal> {
        for (member, suspended) in self.members.iter_mut().zip(&mut self.suspended_at) {
            if suspended.is_some() {
                continue;
            }
            if member.on_enter(node, ancestors)? == TraversalSignal::SkipChildren {
                *suspended = Some(node.id());
            }
        }
        let all_suspended = self.suspended_at.iter().all(Option::is_some);
        Ok(TraversalSignal::skip_if(all_suspended))
    }

    fn on_leave(&mut self, node: Node<'_>, ancestors: Ancestors<'_, '_>) -> Result<Option<O>> {
        let mut last = None;
        for (member, suspended) in self.members.iter_mut().zip(&mut self.suspended_at) {
            match *suspended {
                Some(id) if id == node.id() => *suspended = None,
                Some(_) => continue,
                None => {}
            }
            if let Some(output) = member.on_leave(node, ancestors)? {
                last = Some(output);
            }
        }
        Ok(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{Tree, TreeBuilder};
    use crate::error::HandlerResult;
    use crate::visitor::walk;

    fn sample() -> Tree {
        // (root (skip x) y)
        let mut builder = TreeBuilder::new("xy", "test");
        let root = builder.open("root", true, 0);
        let skip = builder.open("skip", true, 0);
        builder.leaf("x", true, 0, 1);
        builder.close(skip, 1);
        builder.leaf("y", true, 1, 2);
        builder.close(root, 2);
        builder.finish().unwrap()
    }

    struct Log {
        skip: bool,
        entered: Vec<String>,
        left: Vec<String>,
    }

    impl Log {
        fn new(skip: bool) -> Self {
            Self {
                skip,
                entered: Vec::new(),
                left: Vec::new(),
            }
        }
    }

    impl Visitor for Log {
        type Output = ();

        fn enter(&mut self, node: Node<'_>, _: Ancestors<'_, '_>) -> HandlerResult<TraversalSignal> {
            self.entered.push(node.kind().to_owned());
            Ok(TraversalSignal::skip_if(self.skip && node.kind() == "skip"))
        }

        fn leave(&mut self, node: Node<'_>, _: Ancestors<'_, '_>) -> HandlerResult<Option<()>> {
            self.left.push(node.kind().to_owned());
            Ok(None)
        }
    }

    #[test]
    fn test_lockstep_composition_skips_for_everyone() {
        let tree = sample();
        let mut skipping = Log::new(true);
        let mut plain = Log::new(false);
        let mut composition = VisitorComposition::new().with(&mut skipping).with(&mut plain);
        assert_eq!(composition.len(), 2);
        walk(tree.root(), &mut composition, |_, _| {}).unwrap();
        drop(composition);

        assert_eq!(plain.entered, ["root", "skip", "y"]);
        assert_eq!(plain.left, ["skip", "y", "root"]);
        assert_eq!(skipping.entered, plain.entered);
    }

    #[test]
    fn test_resuming_composition_matches_sequential_runs() {
        let tree = sample();
        let mut skipping = Log::new(true);
        let mut plain = Log::new(false);
        let mut composition = ResumingVisitorComposition::new()
            .with(&mut skipping)
            .with(&mut plain);
        walk(tree.root(), &mut composition, |_, _| {}).unwrap();
        drop(composition);

        let mut skipping_alone = Log::new(true);
        tree.visit(&mut skipping_alone).unwrap();
        let mut plain_alone = Log::new(false);
        tree.visit(&mut plain_alone).unwrap();

        assert_eq!(skipping.entered, skipping_alone.entered);
        assert_eq!(skipping.left, skipping_alone.left);
        assert_eq!(plain.entered, plain_alone.entered);
        assert_eq!(plain.left, plain_alone.left);
        assert_eq!(plain.entered, ["root", "skip", "x", "y"]);
        assert_eq!(skipping.entered, ["root", "skip", "y"]);
    }
}
