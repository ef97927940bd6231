use clap::{Args, Parser};
use std::path::PathBuf;

use crate::config::SyntaxErrorMode;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.code-ast.toml, or [tool.code-ast] in pyproject.toml):
  Looked up from the input file's directory upwards.

  [code-ast]
  lang = \"python\"            # Grammar used when --lang is not given
  syntax_error = \"raise\"     # raise | warn | ignore
  statement_types = [\"*_statement\", \"*_definition\", \"*_declaration\"]
";

/// Options for what gets printed.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputOptions {
    /// Print every node, including punctuation and keywords.
    #[arg(short, long, conflicts_with = "count")]
    pub all: bool,

    /// Print the number of nodes of this type instead of the tree.
    #[arg(short, long, value_name = "KIND")]
    pub count: Option<String>,

    /// Enable debug logging on stderr (overridden by `RUST_LOG`).
    #[arg(short, long)]
    pub verbose: bool,
}

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "code-ast - Parse source files into concrete syntax trees and print them",
    long_about = None,
    after_help = CONFIG_HELP
)]
pub struct Cli {
    /// Source file to parse.
    pub file: PathBuf,

    /// Language of the file (defaults to the configured language).
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Reaction to syntax errors (defaults to the configured mode).
    #[arg(long, value_enum)]
    pub syntax_error: Option<SyntaxErrorMode>,

    /// Output options.
    #[command(flatten)]
    pub output: OutputOptions,
}
