//! CST (Concrete Syntax Tree) module.
//!
//! Tree-sitter produces the raw tree; this module copies it into an arena
//! owned by [`Tree`] and hands out cheap [`Node`] handles:
//! - Precise byte ranges and (row, column) points for every node
//! - Anonymous tokens (punctuation, keywords) kept alongside named nodes
//! - Stable [`NodeId`]s that edits can refer to without borrowing the tree

mod builder;
mod node;
mod parser;
mod render;
mod tree;

pub use builder::TreeBuilder;
pub use node::{Node, NodeId, Point, Span};
pub use parser::{builtin_language, parse, CstParser};
pub use render::render_subtree;
pub use tree::Tree;
