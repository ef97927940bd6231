//! Shared names and defaults.

/// Project-level configuration file searched for by [`crate::config::Config`].
pub const CONFIG_FILENAME: &str = ".code-ast.toml";

/// Python project file whose `[tool.code-ast]` table is also honored.
pub const PYPROJECT_FILENAME: &str = "pyproject.toml";

/// Table name inside both configuration files.
pub const CONFIG_SECTION: &str = "code-ast";

/// Prefix of handlers run before a node's children.
pub const ENTER_PREFIX: &str = "enter";

/// Prefix of handlers run after a node's children.
pub const LEAVE_PREFIX: &str = "leave";

/// Joins a prefix to a normalized node type, and replaces characters
/// that cannot appear in a handler name.
pub const HANDLER_SEPARATOR: char = '_';

/// Node type tree-sitter uses for unparseable input.
pub const ERROR_KIND: &str = "ERROR";

/// Leaf types shown by the compact tree rendering.
pub const RENDERED_LEAF_KINDS: &[&str] = &["identifier", "integer", "float"];

/// Language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "python";

/// Node type globs treated as statements by default.
pub const DEFAULT_STATEMENT_TYPES: &[&str] = &["*_statement", "*_definition", "*_declaration"];
