//! jsdoc: Check JSDoc comments and type expressions from the command line.
//!
//! Usage:
//!   jsdoc check [--config FILE] [--format pretty|json] FILE...
//!   jsdoc type '{?Array.<string>}'
//!   jsdoc ast FILE
//!
//! Exit status is 0 when nothing was reported, 1 when any diagnostic was
//! reported, and 2 when the command itself failed (unreadable file, bad
//! config).

mod commands;
mod config;
mod error;
mod report;

use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process;
use std::sync::Once;

use crate::error::CliError;

#[derive(ClapParser, Debug)]
#[command(name = "jsdoc", version, about = "Parse and check JSDoc comments and type expressions")]
struct Cli {
    /// JSON file with parser options, e.g. `{"maxNestingDepth": 64}`.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// How to print diagnostics.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse every doc comment in the given files and report problems.
    Check {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },
    /// Parse one type expression and print its canonical form.
    Type {
        #[arg(value_name = "EXPRESSION")]
        expression: String,
    },
    /// Print the parsed doc comments of a file as JSON.
    Ast {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Source snippets with labelled spans.
    Pretty,
    /// One JSON array of diagnostic records on stdout.
    Json,
}

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber, but only when `RUST_LOG` is set.
///
/// `RUST_LOG=jsdoc_parser=trace jsdoc check src/app.js`
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(clean) => process::exit(if clean { 0 } else { 1 }),
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            process::exit(2);
        }
    }
}

/// Run the selected command. `Ok(true)` means nothing was reported.
fn run(cli: &Cli) -> Result<bool, CliError> {
    let options = match &cli.config {
        Some(path) => config::load_options(path)?,
        None => Default::default(),
    };
    tracing::debug!(?options, format = ?cli.format, "starting");

    match &cli.command {
        Command::Check { files } => commands::check(files, &options, cli.format),
        Command::Type { expression } => commands::print_type(expression, &options, cli.format),
        Command::Ast { file } => commands::ast(file, &options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_with_global_flags() {
        let cli = Cli::try_parse_from(["jsdoc", "check", "a.js", "b.js", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Check { files } => assert_eq!(files, vec![PathBuf::from("a.js"), PathBuf::from("b.js")]),
            other => panic!("expected check, got {other:?}"),
        }
    }

    #[test]
    fn test_check_requires_files() {
        assert!(Cli::try_parse_from(["jsdoc", "check"]).is_err());
    }

    #[test]
    fn test_parse_type_command() {
        let cli = Cli::try_parse_from(["jsdoc", "--config", "opts.json", "type", "{number}"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("opts.json")));
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(matches!(cli.command, Command::Type { ref expression } if expression == "{number}"));
    }
}
