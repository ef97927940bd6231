//! Source transformation through node-level edits.
//!
//! A [`Transformer`] is a visitor whose leave handlers may return an
//! [`EditDirective`]. The [`TransformCollector`] gathers those into an
//! [`EditMap`] during one walk, and [`reconcile`] splices them back into
//! the original source.
//!
//! # Usage
//!
//! ```
//! use code_ast::cst::TreeBuilder;
//! use code_ast::transform::{EditDirective, EditMap};
//!
//! let mut builder = TreeBuilder::new("x + y", "demo");
//! let root = builder.open("binary", true, 0);
//! let x = builder.leaf("identifier", true, 0, 1);
//! builder.leaf("+", false, 2, 3);
//! let y = builder.leaf("identifier", true, 4, 5);
//! builder.close(root, 5);
//! let tree = builder.finish().expect("valid tree");
//!
//! let mut edits = EditMap::new();
//! edits.insert(root, EditDirective::formatted("%s + %s", [y, x]).expect("two slots"));
//! assert_eq!(tree.reconcile(&edits).expect("no cycles"), "y + x");
//! ```

mod collector;
mod directive;
mod reconcile;

pub use collector::{TransformCollector, Transformer};
pub use directive::{EditDirective, EditMap, FormattedReplacement, Slot};
pub use reconcile::reconcile;
