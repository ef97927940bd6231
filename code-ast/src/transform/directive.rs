//! Replacement directives and the map that collects them.

use rustc_hash::FxHashMap;

use crate::cst::{Node, NodeId};
use crate::error::{AstError, Result};

/// One value interpolated into a [`FormattedReplacement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Text inserted as is.
    Literal(String),
    /// Another node, rendered through its own directive or its source text.
    Node(NodeId),
}

impl Slot {
    /// Literal slot.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Node slot.
    #[must_use]
    pub fn node(node: Node<'_>) -> Self {
        Self::Node(node.id())
    }
}

impl From<NodeId> for Slot {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<Node<'_>> for Slot {
    fn from(node: Node<'_>) -> Self {
        Self::Node(node.id())
    }
}

impl From<&str> for Slot {
    fn from(text: &str) -> Self {
        Self::Literal(text.to_owned())
    }
}

impl From<String> for Slot {
    fn from(text: String) -> Self {
        Self::Literal(text)
    }
}

/// Template with `%s` placeholders filled by ordered slots.
///
/// `%%` stands for a literal percent sign; any other `%` is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedReplacement {
    /// Literal text around the placeholders; one more entry than `slots`.
    segments: Vec<String>,
    slots: Vec<Slot>,
}

impl FormattedReplacement {
    /// Parses `template` and binds `slots` to its placeholders in order.
    ///
    /// # Errors
    /// Returns [`AstError::TemplateArity`] when the placeholder count and
    /// the slot count differ.
    pub fn new<I, S>(template: &str, slots: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Slot>,
    {
        let segments = split_template(template);
        let slots: Vec<Slot> = slots.into_iter().map(Into::into).collect();
        let placeholders = segments.len() - 1;
        if placeholders != slots.len() {
            return Err(AstError::TemplateArity {
                placeholders,
                slots: slots.len(),
            });
        }
        Ok(Self { segments, slots })
    }

    /// Literal text between placeholders.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Slots in placeholder order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Nodes referenced by the slots.
    pub fn referenced_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Node(id) => Some(*id),
            Slot::Literal(_) => None,
        })
    }
}

fn split_template(template: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            current.push(c);
            continue;
        }
        match chars.peek() {
            Some('s') => {
                chars.next();
                segments.push(std::mem::take(&mut current));
            }
            Some('%') => {
                chars.next();
                current.push('%');
            }
            _ => current.push('%'),
        }
    }
    segments.push(current);
    segments
}

/// Replacement rule for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditDirective {
    /// Replaces the node's source, discarding its whole subtree.
    Literal(String),
    /// Rebuilds the node from a template whose slots may reference nodes.
    Formatted(FormattedReplacement),
}

impl EditDirective {
    /// Literal replacement.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Removes the node's text entirely.
    #[must_use]
    pub fn delete() -> Self {
        Self::Literal(String::new())
    }

    /// Formatted replacement, see [`FormattedReplacement::new`].
    ///
    /// # Errors
    /// Returns [`AstError::TemplateArity`] on a placeholder/slot mismatch.
    pub fn formatted<I, S>(template: &str, slots: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Slot>,
    {
        FormattedReplacement::new(template, slots).map(Self::Formatted)
    }
}

impl From<FormattedReplacement> for EditDirective {
    fn from(formatted: FormattedReplacement) -> Self {
        Self::Formatted(formatted)
    }
}

/// Directives keyed by the node they replace. At most one per node.
#[derive(Debug, Clone, Default)]
pub struct EditMap {
    edits: FxHashMap<NodeId, EditDirective>,
}

impl EditMap {
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `directive` for `id`, returning the one it replaced.
    pub fn insert(&mut self, id: NodeId, directive: EditDirective) -> Option<EditDirective> {
        self.edits.insert(id, directive)
    }

    /// Directive registered for `id`.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&EditDirective> {
        self.edits.get(&id)
    }

    /// Drops the directive for `id`.
    pub fn remove(&mut self, id: NodeId) -> Option<EditDirective> {
        self.edits.remove(&id)
    }

    /// Whether `id` has a directive.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.edits.contains_key(&id)
    }

    /// Number of directives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Whether there are no directives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Directives in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &EditDirective)> {
        self.edits.iter().map(|(id, directive)| (*id, directive))
    }
}

impl Extend<(NodeId, EditDirective)> for EditMap {
    fn extend<I: IntoIterator<Item = (NodeId, EditDirective)>>(&mut self, iter: I) {
        self.edits.extend(iter);
    }
}
