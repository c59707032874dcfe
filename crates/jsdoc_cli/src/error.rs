use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the command itself, as opposed to problems found in the input.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("failed to read '{}'", .path.display())]
    #[diagnostic(code(jsdoc::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}'", .path.display())]
    #[diagnostic(code(jsdoc::config), help("expected JSON such as {{\"maxNestingDepth\": 64}}"))]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write JSON output")]
    #[diagnostic(code(jsdoc::output))]
    Output(#[from] serde_json::Error),
}
