//! Syntax error policy and the configured parse entry point.

use crate::config::{ParserConfig, SyntaxErrorMode};
use crate::cst::{parse, Node, Tree};
use crate::error::{AstError, HandlerResult, Result};
use crate::visitor::{Ancestors, Handlers, TraversalSignal, Visitor};

/// Describes where an `ERROR` node sits.
///
/// Rows and columns are zero-based, as reported by the parser.
#[must_use]
pub fn syntax_error_message(node: Node<'_>) -> String {
    let start = node.start_point();
    let end = node.end_point();
    let position = if start.row == end.row {
        format!("in line {} [pos. {} - {}]", start.row, start.column, end.column)
    } else {
        format!(
            "inbetween line {} (start: {}) to line {} (end: {})",
            start.row, start.column, end.row, end.column
        )
    };
    format!("Problem while parsing given code snipet. Error occured {position}")
}

/// Collects a message for every `ERROR` node, outermost first.
#[derive(Debug, Default)]
pub struct ErrorVisitor {
    messages: Vec<String>,
}

impl ErrorVisitor {
    /// Messages gathered so far.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    #[allow(non_snake_case)]
    fn enter_ERROR(&mut self, node: Node<'_>, _: Ancestors<'_, '_>) -> HandlerResult<TraversalSignal> {
        self.messages.push(syntax_error_message(node));
        Ok(TraversalSignal::Continue)
    }
}

impl Visitor for ErrorVisitor {
    type Output = ();

    fn handlers(&self) -> Handlers<Self> {
        Handlers::new().enter(crate::constants::ERROR_KIND, Self::enter_ERROR)
    }
}

/// Applies `mode` to the `ERROR` nodes of `tree`.
///
/// # Errors
/// Under [`SyntaxErrorMode::Raise`], returns [`AstError::Syntax`] for the
/// first `ERROR` node in source order.
pub fn check_syntax(tree: &Tree, mode: SyntaxErrorMode) -> Result<()> {
    if mode == SyntaxErrorMode::Ignore || !tree.has_errors() {
        return Ok(());
    }

    let mut visitor = ErrorVisitor::default();
    tree.visit(&mut visitor)?;

    match mode {
        SyntaxErrorMode::Raise => match visitor.messages.into_iter().next() {
            Some(message) => Err(AstError::Syntax { message }),
            None => Ok(()),
        },
        SyntaxErrorMode::Warn => {
            for message in visitor.messages() {
                tracing::warn!("{message}");
            }
            Ok(())
        }
        SyntaxErrorMode::Ignore => Ok(()),
    }
}

/// Parses `source` according to `config`.
///
/// # Errors
/// Returns [`AstError::EmptySource`] for blank input, any parser error, and
/// [`AstError::Syntax`] when the policy is `raise` and the tree has errors.
///
/// # Example
///
/// ```
/// # #[cfg(feature = "python")]
/// # {
/// use code_ast::{ast, ParserConfig};
///
/// let tree = ast("x = 1\n", &ParserConfig::default()).expect("valid python");
/// assert_eq!(tree.root().kind(), "module");
/// # }
/// ```
pub fn ast(source: &str, config: &ParserConfig) -> Result<Tree> {
    if source.trim().is_empty() {
        return Err(AstError::EmptySource);
    }
    let tree = parse(source, &config.lang)?;
    check_syntax(&tree, config.syntax_error)?;
    Ok(tree)
}
