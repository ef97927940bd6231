use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::constants::{
    CONFIG_FILENAME, DEFAULT_LANGUAGE, DEFAULT_STATEMENT_TYPES, PYPROJECT_FILENAME,
};

/// What to do when the parsed tree contains `ERROR` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxErrorMode {
    /// Fail with [`crate::error::AstError::Syntax`].
    #[default]
    Raise,
    /// Log a warning and return the tree.
    Warn,
    /// Return the tree silently.
    Ignore,
}

impl SyntaxErrorMode {
    /// Lowercase name as used in configuration files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raise => "raise",
            Self::Warn => "warn",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for SyntaxErrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyntaxErrorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raise" => Ok(Self::Raise),
            "warn" => Ok(Self::Warn),
            "ignore" => Ok(Self::Ignore),
            other => Err(format!(
                "unknown syntax error mode `{other}` (expected raise, warn or ignore)"
            )),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
/// Options controlling how sources are parsed.
pub struct ParserConfig {
    /// Language tag of the grammar to use.
    pub lang: String,
    /// Policy for trees containing `ERROR` nodes.
    pub syntax_error: SyntaxErrorMode,
    /// Node type globs (`*` matches any run of characters) counted as statements.
    pub statement_types: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANGUAGE.to_owned(),
            syntax_error: SyntaxErrorMode::default(),
            statement_types: DEFAULT_STATEMENT_TYPES
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        }
    }
}

impl ParserConfig {
    /// Config for `lang` with every other option at its default.
    pub fn for_language(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            ..Self::default()
        }
    }

    /// Sets the syntax error policy.
    #[must_use]
    pub fn with_syntax_error(mut self, mode: SyntaxErrorMode) -> Self {
        self.syntax_error = mode;
        self
    }

    /// Compiles `statement_types` into a matcher.
    #[must_use]
    pub fn statement_matcher(&self) -> StatementMatcher {
        StatementMatcher::new(&self.statement_types)
    }

    /// Whether `kind` matches one of the statement globs.
    #[must_use]
    pub fn is_statement_type(&self, kind: &str) -> bool {
        self.statement_matcher().is_match(kind)
    }
}

/// Precompiled `statement_types` globs.
#[derive(Debug, Clone)]
pub struct StatementMatcher {
    pattern: Option<Regex>,
}

impl StatementMatcher {
    fn new(globs: &[String]) -> Self {
        if globs.is_empty() {
            return Self { pattern: None };
        }
        let alternatives: Vec<String> = globs
            .iter()
            .map(|glob| {
                glob.split('*')
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(".*")
            })
            .collect();
        let source = format!("^(?:{})$", alternatives.join("|"));
        // Every literal part is escaped, so this only fails on size limits.
        let pattern = match Regex::new(&source) {
            Ok(re) => Some(re),
            Err(err) => {
                tracing::warn!("ignoring statement_types: {err}");
                None
            }
        };
        Self { pattern }
    }

    /// Whether `kind` matches any glob.
    #[must_use]
    pub fn is_match(&self, kind: &str) -> bool {
        self.pattern.as_ref().is_some_and(|re| re.is_match(kind))
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default, rename = "code-ast")]
    /// The `[code-ast]` section.
    pub code_ast: ParserConfig,
    /// The path to the configuration file this was loaded from.
    /// Set during `load_from_path`, `None` if using defaults or programmatic config.
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
struct PyProject {
    #[serde(default)]
    tool: Option<ToolConfig>,
}

#[derive(Debug, Deserialize, Clone)]
struct ToolConfig {
    #[serde(default, rename = "code-ast")]
    code_ast: Option<ParserConfig>,
}

impl Config {
    /// Loads configuration from default locations (.code-ast.toml or pyproject.toml in current dir).
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from a specific path and traversing up.
    ///
    /// Files that cannot be read or parsed are skipped with a warning.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            // 1. Try CONFIG_FILENAME
            let own_toml = current.join(CONFIG_FILENAME);
            if own_toml.exists() {
                if let Some(content) = read_config(&own_toml) {
                    match toml::from_str::<Config>(&content) {
                        Ok(mut config) => {
                            tracing::debug!(path = %own_toml.display(), "loaded configuration");
                            config.config_file_path = Some(own_toml);
                            return config;
                        }
                        Err(err) => {
                            tracing::warn!(path = %own_toml.display(), "invalid configuration: {err}");
                        }
                    }
                }
            }

            // 2. Try PYPROJECT_FILENAME
            let pyproject_toml = current.join(PYPROJECT_FILENAME);
            if pyproject_toml.exists() {
                if let Some(content) = read_config(&pyproject_toml) {
                    match toml::from_str::<PyProject>(&content) {
                        Ok(PyProject {
                            tool:
                                Some(ToolConfig {
                                    code_ast: Some(code_ast),
                                }),
                        }) => {
                            tracing::debug!(path = %pyproject_toml.display(), "loaded configuration");
                            return Config {
                                code_ast,
                                config_file_path: Some(pyproject_toml),
                            };
                        }
                        // No [tool.code-ast] table: keep looking.
                        Ok(_) => {}
                        Err(err) => {
                            tracing::warn!(path = %pyproject_toml.display(), "invalid configuration: {err}");
                        }
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        Config::default()
    }
}

fn read_config(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(err) => {
            tracing::warn!(path = %path.display(), "cannot read configuration: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ParserConfig::default();
        assert_eq!(config.lang, "python");
        assert_eq!(config.syntax_error, SyntaxErrorMode::Raise);
        assert_eq!(config.statement_types.len(), 3);
    }

    #[test]
    fn test_statement_globs() {
        let config = ParserConfig::default();
        assert!(config.is_statement_type("expression_statement"));
        assert!(config.is_statement_type("function_definition"));
        assert!(!config.is_statement_type("identifier"));
        assert!(!config.is_statement_type("statement_block_x"));

        let custom = ParserConfig {
            statement_types: vec!["block".to_owned(), "if_*".to_owned()],
            ..ParserConfig::default()
        };
        assert!(custom.is_statement_type("block"));
        assert!(custom.is_statement_type("if_statement"));
        assert!(!custom.is_statement_type("blocks"));
    }

    #[test]
    fn test_glob_escapes_regex_characters() {
        let config = ParserConfig {
            statement_types: vec!["a.b".to_owned()],
            ..ParserConfig::default()
        };
        assert!(config.is_statement_type("a.b"));
        assert!(!config.is_statement_type("axb"));
    }

    #[test]
    fn test_no_statement_types() {
        let config = ParserConfig {
            statement_types: Vec::new(),
            ..ParserConfig::default()
        };
        assert!(!config.is_statement_type("expression_statement"));
    }

    #[test]
    fn test_syntax_error_mode_from_str() {
        assert_eq!("WARN".parse::<SyntaxErrorMode>(), Ok(SyntaxErrorMode::Warn));
        assert_eq!("ignore".parse::<SyntaxErrorMode>(), Ok(SyntaxErrorMode::Ignore));
        assert!("loud".parse::<SyntaxErrorMode>().is_err());
        assert_eq!(SyntaxErrorMode::Raise.to_string(), "raise");
    }

    #[test]
    fn test_load_from_path_no_config() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from_path(dir.path());
        assert_eq!(config.code_ast, ParserConfig::default());
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_load_from_path_own_toml() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join(".code-ast.toml")).unwrap();
        writeln!(
            file,
            r#"[code-ast]
syntax_error = "warn"
statement_types = ["*_statement"]
"#
        )
        .unwrap();

        let config = Config::load_from_path(dir.path());
        assert_eq!(config.code_ast.syntax_error, SyntaxErrorMode::Warn);
        assert_eq!(config.code_ast.statement_types, ["*_statement"]);
        assert_eq!(config.code_ast.lang, "python");
        assert!(config.config_file_path.is_some());
    }

    #[test]
    fn test_load_from_path_pyproject_toml() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join("pyproject.toml")).unwrap();
        writeln!(
            file,
            r#"[project]
name = "demo"

[tool.code-ast]
syntax_error = "ignore"
"#
        )
        .unwrap();

        let config = Config::load_from_path(dir.path());
        assert_eq!(config.code_ast.syntax_error, SyntaxErrorMode::Ignore);
    }

    #[test]
    fn test_pyproject_without_section_is_skipped() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("pkg");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("pyproject.toml"), "[project]\nname = \"demo\"\n").unwrap();
        std::fs::write(
            dir.path().join(".code-ast.toml"),
            "[code-ast]\nsyntax_error = \"warn\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&nested);
        assert_eq!(config.code_ast.syntax_error, SyntaxErrorMode::Warn);
    }

    #[test]
    fn test_invalid_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".code-ast.toml"),
            "[code-ast]\nsyntax_error = \"loud\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(dir.path());
        assert_eq!(config.code_ast.syntax_error, SyntaxErrorMode::Raise);
    }

    #[test]
    fn test_load_from_path_traverses_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("src").join("lib");
        std::fs::create_dir_all(&nested).unwrap();

        let mut file = std::fs::File::create(dir.path().join(".code-ast.toml")).unwrap();
        writeln!(
            file,
            r#"[code-ast]
lang = "python"
syntax_error = "ignore"
"#
        )
        .unwrap();

        let config = Config::load_from_path(&nested);
        assert_eq!(config.code_ast.syntax_error, SyntaxErrorMode::Ignore);
    }

    #[test]
    fn test_load_from_file_path() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".code-ast.toml"),
            "[code-ast]\nsyntax_error = \"warn\"\n",
        )
        .unwrap();
        let py_file = dir.path().join("test.py");
        std::fs::write(&py_file, "x = 1").unwrap();

        let config = Config::load_from_path(&py_file);
        assert_eq!(config.code_ast.syntax_error, SyntaxErrorMode::Warn);
    }
}
