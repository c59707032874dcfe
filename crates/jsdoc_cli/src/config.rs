//! Loading `ParseOptions` from a JSON file.

use jsdoc_parser::ParseOptions;
use std::path::Path;

use crate::error::CliError;

pub fn load_options(path: &Path) -> Result<ParseOptions, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_options(&text).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_options(text: &str) -> Result<ParseOptions, serde_json::Error> {
    serde_json::from_str(text)
}
