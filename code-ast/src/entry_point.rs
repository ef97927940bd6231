//! Shared implementation of the `code-ast` command.

use anyhow::Result;
use std::io::Write;

use crate::cli::Cli;
use crate::config::Config;
use crate::syntax::ast;
use crate::visitor::collect_kind;
use clap::Parser;

/// Installs the stderr log subscriber. `RUST_LOG` wins over `verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "code_ast=debug" } else { "code_ast=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second call in the same process keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run code-ast with the given arguments.
///
/// Returns the process exit code: 0 on success, 1 on usage errors,
/// unreadable input, or parse failures (including syntax errors under
/// the `raise` policy).
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run code-ast with the given arguments, writing output to the specified writer.
///
/// This is the testable version of `run_with_args` that allows output capture.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn run_with_args_to<W: Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["code-ast".to_owned()];
    program_args.extend(args);
    let cli_var = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                write!(writer, "{e}")?;
                writer.flush()?;
                return Ok(0);
            }
            _ => {
                eprint!("{e}");
                return Ok(1);
            }
        },
    };

    init_tracing(cli_var.output.verbose);

    if !cli_var.file.is_file() {
        eprintln!("Error: The file '{}' does not exist.", cli_var.file.display());
        return Ok(1);
    }
    let source = match std::fs::read_to_string(&cli_var.file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: cannot read '{}': {err}", cli_var.file.display());
            return Ok(1);
        }
    };

    let mut config = Config::load_from_path(&cli_var.file).code_ast;
    if let Some(lang) = cli_var.lang {
        config.lang = lang;
    }
    if let Some(mode) = cli_var.syntax_error {
        config.syntax_error = mode;
    }
    tracing::debug!(?config, file = %cli_var.file.display(), "effective configuration");

    let tree = match ast(&source, &config) {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("Error: {err}");
            return Ok(1);
        }
    };

    if let Some(kind) = &cli_var.output.count {
        let nodes = collect_kind(tree.root(), kind)?;
        writeln!(writer, "{}", nodes.len())?;
    } else if cli_var.output.all {
        writeln!(writer, "{}", tree.render_all())?;
    } else {
        writeln!(writer, "{tree}")?;
    }
    writer.flush()?;
    Ok(0)
}
