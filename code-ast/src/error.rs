//! Error type shared by parsing, traversal and reconciliation.

use crate::cst::NodeId;

/// Error raised by user-supplied handler code.
///
/// Handlers may fail with any error type; it travels through the walker
/// untouched and can be recovered with `downcast_ref`.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of a single handler invocation.
pub type HandlerResult<T> = std::result::Result<T, HandlerError>;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, AstError>;

/// Errors surfaced by `code-ast`.
#[derive(Debug, thiserror::Error)]
pub enum AstError {
    /// Two node types seen in one traversal normalize to the same registered handler.
    #[error("ambiguous handler `{handler}`: node types `{first}` and `{second}` both dispatch to it")]
    AmbiguousHandler {
        /// The derived handler name.
        handler: String,
        /// Node type that claimed the handler first.
        first: String,
        /// Node type that collided with it.
        second: String,
    },
    /// A visitor handler failed; the traversal was aborted.
    #[error(transparent)]
    Handler(HandlerError),
    /// A formatted replacement refers back to a node that is still being resolved.
    #[error("edit cycle detected at node {id} ({kind})")]
    Cycle {
        /// Node revisited within one resolution chain.
        id: NodeId,
        /// Its node type.
        kind: String,
    },
    /// No grammar is registered under the requested language tag.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    /// The grammar exists but could not be loaded into the parser.
    #[error("failed to load grammar for {lang}: {reason}")]
    LanguageLoad {
        /// Language tag.
        lang: String,
        /// Reason reported by tree-sitter.
        reason: String,
    },
    /// tree-sitter returned no tree.
    #[error("failed to parse source as {lang}")]
    ParseFailed {
        /// Language tag.
        lang: String,
    },
    /// The source contains nothing but whitespace.
    #[error("the code string is empty, cannot parse anything empty")]
    EmptySource,
    /// The parsed tree contains an `ERROR` node and the policy is `raise`.
    #[error("{message}")]
    Syntax {
        /// Human readable location of the problem.
        message: String,
    },
    /// Placeholder count of a formatted replacement does not match its slots.
    #[error("template has {placeholders} placeholder(s) but {slots} slot(s) were given")]
    TemplateArity {
        /// Number of `%s` placeholders in the template.
        placeholders: usize,
        /// Number of slots supplied.
        slots: usize,
    },
    /// A node id does not belong to the tree being reconciled.
    #[error("node {0} does not exist in this tree")]
    UnknownNode(NodeId),
    /// A hand-built tree violates the span invariants.
    #[error("malformed tree at node {id}: {reason}")]
    MalformedTree {
        /// Offending node.
        id: NodeId,
        /// What is wrong with it.
        reason: String,
    },
}

impl AstError {
    /// Returns the handler error if this error came from user code.
    #[must_use]
    pub fn handler_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Handler(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
