//! Tree-sitter based parser loader.
//!
//! Turns `(source, language tag)` into a [`Tree`]. Python ships built in
//! behind the `python` feature; any other grammar crate can be plugged in
//! with [`CstParser::with_language`].

use tree_sitter::{Language, Parser, TreeCursor};

use super::builder::TreeBuilder;
use super::node::Span;
use super::tree::Tree;
use crate::error::{AstError, Result};

/// Grammar for a built-in language tag, if compiled in.
#[must_use]
pub fn builtin_language(lang: &str) -> Option<Language> {
    match lang {
        #[cfg(feature = "python")]
        "python" => Some(tree_sitter_python::LANGUAGE.into()),
        _ => None,
    }
}

/// Tree-sitter based CST parser bound to one grammar.
pub struct CstParser {
    parser: Parser,
    lang: String,
}

impl CstParser {
    /// Create a parser for a built-in language tag.
    ///
    /// # Errors
    /// Returns [`AstError::UnsupportedLanguage`] when the tag is unknown.
    pub fn new(lang: &str) -> Result<Self> {
        let language =
            builtin_language(lang).ok_or_else(|| AstError::UnsupportedLanguage(lang.to_owned()))?;
        Self::with_language(lang, &language)
    }

    /// Create a parser from an externally supplied grammar.
    ///
    /// # Errors
    /// Returns [`AstError::LanguageLoad`] on an ABI mismatch.
    pub fn with_language(lang: &str, language: &Language) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|e| AstError::LanguageLoad {
                lang: lang.to_owned(),
                reason: e.to_string(),
            })?;
        tracing::debug!(lang, "created tree-sitter parser");
        Ok(Self {
            parser,
            lang: lang.to_owned(),
        })
    }

    /// Language tag this parser was created for.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.lang
    }

    /// Parse source code into a CST.
    ///
    /// Syntax errors do not fail the parse: tree-sitter recovers and the
    /// broken region shows up as `ERROR` nodes.
    ///
    /// # Errors
    /// Returns [`AstError::ParseFailed`] if tree-sitter produces no tree.
    pub fn parse(&mut self, source: &str) -> Result<Tree> {
        tracing::debug!(lang = %self.lang, bytes = source.len(), "parsing source");
        let ts_tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| AstError::ParseFailed {
                lang: self.lang.clone(),
            })?;

        let mut builder = TreeBuilder::new(source, &self.lang);
        copy_nodes(&mut ts_tree.walk(), &mut builder);
        builder.finish_unchecked()
    }
}

/// Copies the tree under `cursor` into `builder` in pre-order.
fn copy_nodes(cursor: &mut TreeCursor<'_>, builder: &mut TreeBuilder) {
    loop {
        let node = cursor.node();
        let span = Span {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start: node.start_position().into(),
            end: node.end_position().into(),
        };

        if cursor.goto_first_child() {
            builder.push_open(node.kind(), node.is_named(), span);
            continue;
        }
        builder.push(node.kind(), node.is_named(), span);

        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return;
            }
            builder.pop_open();
        }
    }
}

/// Parses `source` with the built-in grammar for `lang`.
///
/// # Errors
/// See [`CstParser::new`] and [`CstParser::parse`].
pub fn parse(source: &str, lang: &str) -> Result<Tree> {
    CstParser::new(lang)?.parse(source)
}
