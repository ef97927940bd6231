//! Visitor infrastructure for CST traversal.
//!
//! This module provides:
//! - [`Visitor`]: user-facing trait with handlers selected by node type
//! - [`dispatch`]: the `enter_<type>` / `leave_<type>` naming convention
//! - [`walk`]: the depth-first engine with skip-children control
//! - Compositions running several visitors in one walk
//! - [`visit_tree`]: closure-based collection helpers

mod collect;
mod compose;
pub mod dispatch;
mod traits;
mod walk;

pub use collect::{collect_kind, collect_nodes, visit_tree, CollectingVisitor};
pub use compose::{ResumingVisitorComposition, VisitorComposition};
pub use dispatch::{
    enter_handler_name, leave_handler_name, normalize_kind, DispatchTable, Dispatcher, EnterFn,
    Handlers, LeaveFn, HANDLER_NAMING_VERSION,
};
pub use traits::{Ancestors, NodeVisitor, TraversalSignal, Visitor};
pub use walk::walk;
