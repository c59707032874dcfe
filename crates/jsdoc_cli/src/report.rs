//! Rendering diagnostics for humans (miette) and for tools (JSON).

use jsdoc_core::text::LineMap;
use jsdoc_diagnostics::{Diagnostic as ParseDiagnostic, DiagnosticCategory, DiagnosticKind};
use miette::{Diagnostic, LabeledSpan, NamedSource, Severity, SourceCode, SourceSpan};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The diagnostics found in one source, with the text they point into.
#[derive(Debug)]
pub struct SourceReport {
    pub name: String,
    pub text: String,
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// A parse diagnostic attached to its source for miette rendering.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SourceDiagnostic {
    message: String,
    code: u32,
    category: DiagnosticCategory,
    kind: DiagnosticKind,
    span: SourceSpan,
    src: NamedSource<String>,
}

impl SourceDiagnostic {
    pub fn new(report: &SourceReport, diagnostic: &ParseDiagnostic) -> Self {
        Self {
            message: diagnostic.message_text.clone(),
            code: diagnostic.code,
            category: diagnostic.category,
            kind: diagnostic.kind,
            span: SourceSpan::from((diagnostic.start() as usize, diagnostic.length() as usize)),
            src: NamedSource::new(&report.name, report.text.clone()),
        }
    }
}

impl Diagnostic for SourceDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("JSDOC{}", self.code)))
    }

    fn severity(&self) -> Option<Severity> {
        Some(match self.category {
            DiagnosticCategory::Error => Severity::Error,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self.kind {
            DiagnosticKind::UnsupportedSyntax => {
                Some(Box::new("this is TypeScript syntax; JSDoc type expressions do not support it"))
            }
            DiagnosticKind::Syntax | DiagnosticKind::Structural => None,
        }
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_with_span(Some(self.kind.to_string()), self.span);
        Some(Box::new(std::iter::once(label)))
    }
}

/// One diagnostic as printed by `--format json`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DiagnosticRecord<'r> {
    pub file: &'r str,
    /// 1-based.
    pub line: u32,
    /// 1-based, in characters.
    pub column: u32,
    pub start: u32,
    pub length: u32,
    pub code: u32,
    pub kind: &'static str,
    pub message: &'r str,
}

fn kind_name(kind: DiagnosticKind) -> &'static str {
    match kind {
        DiagnosticKind::Syntax => "syntax",
        DiagnosticKind::Structural => "structural",
        DiagnosticKind::UnsupportedSyntax => "unsupportedSyntax",
    }
}

pub fn records(report: &SourceReport) -> Vec<DiagnosticRecord<'_>> {
    records_with(&LineMap::new(&report.text), &report.name, &report.diagnostics)
}

pub fn records_with<'r>(
    line_map: &LineMap<'_>,
    file: &'r str,
    diagnostics: &'r [ParseDiagnostic],
) -> Vec<DiagnosticRecord<'r>> {
    diagnostics
        .iter()
        .map(|d| {
            let position = line_map.line_and_column_of(d.start());
            DiagnosticRecord {
                file,
                line: position.line + 1,
                column: position.character + 1,
                start: d.start(),
                length: d.length(),
                code: d.code,
                kind: kind_name(d.kind),
                message: &d.message_text,
            }
        })
        .collect()
}

/// Print every diagnostic of `reports` to stderr with source snippets.
pub fn emit_pretty(reports: &[SourceReport]) {
    let mut total = 0;
    for report in reports {
        for diagnostic in &report.diagnostics {
            eprintln!("{:?}", miette::Report::new(SourceDiagnostic::new(report, diagnostic)));
            total += 1;
        }
    }
    if total > 0 {
        eprintln!("Found {} problem{}.", total, if total == 1 { "" } else { "s" });
    }
}

/// Print all diagnostics of `reports` to stdout as one JSON array.
pub fn emit_json(reports: &[SourceReport]) -> Result<(), serde_json::Error> {
    let all: Vec<DiagnosticRecord<'_>> = reports.iter().flat_map(records).collect();
    println!("{}", serde_json::to_string_pretty(&all)?);
    Ok(())
}
