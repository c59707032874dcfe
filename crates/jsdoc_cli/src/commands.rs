//! The `check`, `type` and `ast` subcommands.

use jsdoc_ast::DocComment;
use jsdoc_core::arena::DocArena;
use jsdoc_core::text::LineMap;
use jsdoc_diagnostics::Diagnostic;
use jsdoc_parser::{find_doc_comments, parse_doc_comment_with, parse_type_expression_with, ParseOptions};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::CliError;
use crate::report::{self, DiagnosticRecord, SourceReport};
use crate::OutputFormat;

fn read_source(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse every doc comment in `text` and return all diagnostics in offset
/// order.
pub fn check_source(text: &str, options: &ParseOptions) -> Vec<Diagnostic> {
    let arena = DocArena::new();
    let mut diagnostics = Vec::new();
    for range in find_doc_comments(text) {
        if let Some(result) = parse_doc_comment_with(options, arena.bump(), text, range.pos as usize, range.len() as usize) {
            diagnostics.extend(result.diagnostics.into_diagnostics());
        }
    }
    diagnostics
}

/// `jsdoc check FILE...`. Files are parsed in parallel, reported in the
/// order given.
pub fn check(files: &[PathBuf], options: &ParseOptions, format: OutputFormat) -> Result<bool, CliError> {
    let reports = files
        .par_iter()
        .map(|path| {
            let text = read_source(path)?;
            let diagnostics = check_source(&text, options);
            debug!(file = %path.display(), diagnostics = diagnostics.len(), "checked");
            Ok(SourceReport {
                name: path.display().to_string(),
                text,
                diagnostics,
            })
        })
        .collect::<Result<Vec<_>, CliError>>()?;

    let clean = reports.iter().all(|r| r.diagnostics.is_empty());
    match format {
        OutputFormat::Pretty => report::emit_pretty(&reports),
        OutputFormat::Json => report::emit_json(&reports)?,
    }
    Ok(clean)
}

/// Parse `expression` and return its canonical form, or the diagnostics.
pub fn format_type(expression: &str, options: &ParseOptions) -> Result<String, Vec<Diagnostic>> {
    let arena = DocArena::new();
    let result = parse_type_expression_with(options, arena.bump(), expression, 0);
    match result.type_expression {
        Some(node) if result.diagnostics.is_empty() => Ok(jsdoc_printer::print_type_expression(node)),
        _ => Err(result.diagnostics.into_diagnostics()),
    }
}

/// `jsdoc type EXPRESSION`
pub fn print_type(expression: &str, options: &ParseOptions, format: OutputFormat) -> Result<bool, CliError> {
    match format_type(expression, options) {
        Ok(printed) => {
            println!("{printed}");
            Ok(true)
        }
        Err(diagnostics) => {
            let reports = [SourceReport {
                name: "<expression>".to_string(),
                text: expression.to_string(),
                diagnostics,
            }];
            match format {
                OutputFormat::Pretty => report::emit_pretty(&reports),
                OutputFormat::Json => report::emit_json(&reports)?,
            }
            Ok(false)
        }
    }
}

#[derive(Serialize)]
struct CommentOutput<'a, 'r> {
    comment: &'a DocComment<'a>,
    diagnostics: Vec<DiagnosticRecord<'r>>,
}

/// `jsdoc ast FILE`: every comment's tree and its diagnostics as JSON.
pub fn ast(path: &Path, options: &ParseOptions) -> Result<bool, CliError> {
    let text = read_source(path)?;
    let arena = DocArena::new();
    let name = path.display().to_string();

    let parsed: Vec<_> = find_doc_comments(&text)
        .into_iter()
        .filter_map(|range| {
            parse_doc_comment_with(options, arena.bump(), &text, range.pos as usize, range.len() as usize)
        })
        .map(|result| (result.comment, result.diagnostics.into_diagnostics()))
        .collect();

    let line_map = LineMap::new(&text);
    let output: Vec<CommentOutput<'_, '_>> = parsed
        .iter()
        .map(|(comment, diagnostics)| CommentOutput {
            comment: *comment,
            diagnostics: report::records_with(&line_map, &name, diagnostics),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(parsed.iter().all(|(_, diagnostics)| diagnostics.is_empty()))
}
