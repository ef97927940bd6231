//! Node-type to handler dispatch.
//!
//! # Naming convention (version 1)
//!
//! A node of type `T` dispatches to the handler named
//! `enter_<normalize(T)>` before its children and `leave_<normalize(T)>`
//! after them. `normalize` keeps ASCII letters, digits and `_`, and maps
//! every other character to `_`, so `binary_operator` stays as is and
//! `not in` becomes `not_in`. Changing any part of this rule is a breaking
//! change and bumps [`HANDLER_NAMING_VERSION`].
//!
//! When two different node types met during one traversal normalize to the
//! same name and a handler is registered under that name, dispatch fails
//! with [`AstError::AmbiguousHandler`] instead of picking one.

use compact_str::CompactString;
use rustc_hash::FxHashMap;

use super::traits::{Ancestors, NodeVisitor, TraversalSignal, Visitor};
use crate::constants::{ENTER_PREFIX, HANDLER_SEPARATOR, LEAVE_PREFIX};
use crate::cst::Node;
use crate::error::{AstError, HandlerResult, Result};

/// Version of the handler naming convention.
pub const HANDLER_NAMING_VERSION: u32 = 1;

/// Enter handler: may ask the walker to skip the node's children.
pub type EnterFn<V> =
    for<'a, 't> fn(&mut V, Node<'t>, Ancestors<'a, 't>) -> HandlerResult<TraversalSignal>;

/// Leave handler: may produce a value for the node.
pub type LeaveFn<V> = for<'a, 't> fn(
    &mut V,
    Node<'t>,
    Ancestors<'a, 't>,
) -> HandlerResult<Option<<V as Visitor>::Output>>;

/// Maps a node type to the identifier-safe suffix of its handler names.
#[must_use]
pub fn normalize_kind(kind: &str) -> String {
    kind.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                HANDLER_SEPARATOR
            }
        })
        .collect()
}

/// Name of the enter handler for `kind`.
#[must_use]
pub fn enter_handler_name(kind: &str) -> String {
    format!("{ENTER_PREFIX}{HANDLER_SEPARATOR}{}", normalize_kind(kind))
}

/// Name of the leave handler for `kind`.
#[must_use]
pub fn leave_handler_name(kind: &str) -> String {
    format!("{LEAVE_PREFIX}{HANDLER_SEPARATOR}{}", normalize_kind(kind))
}

/// Handlers registered by a visitor, keyed by handler name.
pub struct Handlers<V: Visitor> {
    enter: FxHashMap<String, EnterFn<V>>,
    leave: FxHashMap<String, LeaveFn<V>>,
}

impl<V: Visitor> Default for Handlers<V> {
    fn default() -> Self {
        Self {
            enter: FxHashMap::default(),
            leave: FxHashMap::default(),
        }
    }
}

impl<V: Visitor> Handlers<V> {
    /// Empty handler set: every node goes to the catch-all hooks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the enter handler for nodes of type `kind`.
    #[must_use]
    pub fn enter(mut self, kind: &str, handler: EnterFn<V>) -> Self {
        self.enter.insert(enter_handler_name(kind), handler);
        self
    }

    /// Registers the leave handler for nodes of type `kind`.
    #[must_use]
    pub fn leave(mut self, kind: &str, handler: LeaveFn<V>) -> Self {
        self.leave.insert(leave_handler_name(kind), handler);
        self
    }

    /// Registers an enter handler under an explicit handler name such as
    /// `enter_identifier`.
    #[must_use]
    pub fn enter_named(mut self, name: impl Into<String>, handler: EnterFn<V>) -> Self {
        self.enter.insert(name.into(), handler);
        self
    }

    /// Registers a leave handler under an explicit handler name such as
    /// `leave_binary_operator`.
    #[must_use]
    pub fn leave_named(mut self, name: impl Into<String>, handler: LeaveFn<V>) -> Self {
        self.leave.insert(name.into(), handler);
        self
    }

    /// Whether a handler exists under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.enter.contains_key(name) || self.leave.contains_key(name)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.enter.len() + self.leave.len()
    }

    /// Whether no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handlers resolved for one node type.
struct Resolved<V: Visitor> {
    enter: Option<EnterFn<V>>,
    leave: Option<LeaveFn<V>>,
}

impl<V: Visitor> Clone for Resolved<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V: Visitor> Copy for Resolved<V> {}

impl<V: Visitor> std::fmt::Debug for Resolved<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolved")
            .field("enter", &self.enter.is_some())
            .field("leave", &self.leave.is_some())
            .finish()
    }
}

/// Per-traversal cache from node type to resolved handlers.
///
/// Each distinct type is resolved once; later lookups are a single hash
/// probe regardless of tree size.
pub struct DispatchTable<V: Visitor> {
    handlers: Handlers<V>,
    resolved: FxHashMap<CompactString, Resolved<V>>,
    claims: FxHashMap<String, CompactString>,
}

impl<V: Visitor> DispatchTable<V> {
    /// Builds a table over `handlers`.
    #[must_use]
    pub fn new(handlers: Handlers<V>) -> Self {
        Self {
            handlers,
            resolved: FxHashMap::default(),
            claims: FxHashMap::default(),
        }
    }

    fn resolve(&mut self, kind: &str) -> Result<Resolved<V>> {
        if let Some(resolved) = self.resolved.get(kind) {
            return Ok(*resolved);
        }

        let enter_name = enter_handler_name(kind);
        let leave_name = leave_handler_name(kind);
        let resolved = Resolved {
            enter: self.handlers.enter.get(&enter_name).copied(),
            leave: self.handlers.leave.get(&leave_name).copied(),
        };

        if resolved.enter.is_some() || resolved.leave.is_some() {
            let key = normalize_kind(kind);
            match self.claims.get(&key) {
                Some(first) if first.as_str() != kind => {
                    let handler = if resolved.enter.is_some() {
                        enter_name
                    } else {
                        leave_name
                    };
                    return Err(AstError::AmbiguousHandler {
                        handler,
                        first: first.to_string(),
                        second: kind.to_owned(),
                    });
                }
                Some(_) => {}
                None => {
                    self.claims.insert(key, CompactString::from(kind));
                }
            }
        }

        self.resolved.insert(CompactString::from(kind), resolved);
        Ok(resolved)
    }
}

/// Drives a [`Visitor`] through its dispatch table.
pub struct Dispatcher<'v, V: Visitor> {
    visitor: &'v mut V,
    table: DispatchTable<V>,
}

impl<'v, V: Visitor> Dispatcher<'v, V> {
    /// Collects the visitor's handlers and wraps it for the walker.
    pub fn new(visitor: &'v mut V) -> Self {
        let table = DispatchTable::new(visitor.handlers());
        Self { visitor, table }
    }

    /// The wrapped visitor.
    pub fn visitor(&mut self) -> &mut V {
        &mut *self.visitor
    }
}

impl<V: Visitor> NodeVisitor for Dispatcher<'_, V> {
    type Output = V::Output;

    fn on_enter(&mut self, node: Node<'_>, ancestors: Ancestors<'_, '_>) -> Result<TraversalSignal> {
        let resolved = self.table.resolve(node.kind())?;
        let signal = match resolved.enter {
            Some(handler) => handler(self.visitor, node, ancestors),
            None => self.visitor.enter(node, ancestors),
        };
        signal.map_err(AstError::Handler)
    }

    fn on_leave(
        &mut self,
        node: Node<'_>,
        ancestors: Ancestors<'_, '_>,
    ) -> Result<Option<Self::Output>> {
        let resolved = self.table.resolve(node.kind())?;
        let output = match resolved.leave {
            Some(handler) => handler(self.visitor, node, ancestors),
            None => self.visitor.leave(node, ancestors),
        };
        output.map_err(AstError::Handler)
    }
}
