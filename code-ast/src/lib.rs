//! Concrete syntax trees for source code, with visitors and transformers.
//!
//! Sources are parsed with tree-sitter into an immutable [`Tree`]. Code is
//! analyzed by [`Visitor`]s whose handlers are picked by node type, and
//! rewritten by [`Transformer`]s whose edits are reconciled into new
//! source text without touching the tree.

#![allow(clippy::similar_names, clippy::items_after_statements)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module containing the concrete syntax tree, its parser and builder.
pub mod cst;

/// Module containing the traversal engine and the visitor traits.
pub mod visitor;

/// Module containing edit directives and their reconciliation.
pub mod transform;

/// Module containing the crate-wide error type.
pub mod error;

/// Module for loading configuration.
pub mod config;

/// Module containing shared constants.
pub mod constants;

/// Module containing the syntax error policy and the `ast` entry point.
pub mod syntax;

/// Module defining the command-line interface arguments.
pub mod cli;

/// Module defining the entry point logic shared with the binary.
pub mod entry_point;

pub use config::{Config, ParserConfig, SyntaxErrorMode};
pub use cst::{parse, Node, NodeId, Tree, TreeBuilder};
pub use error::{AstError, HandlerError, HandlerResult, Result};
pub use syntax::{ast, check_syntax};
pub use transform::{EditDirective, EditMap, Slot, Transformer};
pub use visitor::{Ancestors, Handlers, TraversalSignal, Visitor};
