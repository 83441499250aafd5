//! Error adapter for converting SceneryError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When a [`scenery_parser::error::ParseError`] contains multiple diagnostics,
//! each diagnostic is rendered independently, against the scene file it came
//! from.

use std::{fmt, path::Path};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, NamedSource, SourceSpan};

use scenery::{SceneryError, Warning};
use scenery_parser::error::Diagnostic;

/// Adapter for a single scene diagnostic.
///
/// Wraps a [`Diagnostic`] together with the scene file it refers to and
/// implements [`MietteDiagnostic`] for rich error formatting.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    source: NamedSource<String>,
}

impl<'a> DiagnosticAdapter<'a> {
    pub fn new(diag: &'a Diagnostic, path: &Path, src: &str) -> Self {
        Self {
            diag,
            source: NamedSource::new(path.display().to_string(), src.to_string()),
        }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .field("source", &self.source.name())
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        if self.diag.severity().is_warning() {
            Some(miette::Severity::Warning)
        } else {
            Some(miette::Severity::Error)
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.source as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for non-diagnostic [`SceneryError`] variants.
///
/// This adapter handles errors that don't carry source locations, such as
/// I/O errors, configuration errors, cycles and cancellation.
pub struct ErrorAdapter<'a>(pub &'a SceneryError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            SceneryError::Io(_) => "scenery::io",
            SceneryError::Parse { .. } => return None,
            SceneryError::Cycle(_) => "scenery::cycle",
            SceneryError::Cancelled => "scenery::cancelled",
            SceneryError::Config(_) => "scenery::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            SceneryError::Cycle(_) => Some(Box::new(
                "scenes and declared members must form a tree; remove one edge of the cycle",
            )),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a single diagnostic or a non-diagnostic error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A rich diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<miette::Severity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a scenery [`Span`](scenery_parser::Span) to a miette [`SourceSpan`].
fn span_to_miette(span: scenery_parser::Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`SceneryError`] into a list of reportable errors.
///
/// For [`SceneryError::Parse`], this returns one [`Reportable`] for
/// each diagnostic in the error. For other error variants, this returns a
/// single [`Reportable`].
pub fn to_reportables(err: &SceneryError) -> Vec<Reportable<'_>> {
    match err {
        SceneryError::Parse {
            err: parse_err,
            src,
            path,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, path, src)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// Renders a generation warning, with a source snippet when it has one.
pub fn render_warning(warning: &Warning) -> String {
    match warning {
        Warning::Scene {
            path,
            src,
            diagnostic,
        } => {
            let adapter = DiagnosticAdapter::new(diagnostic, path, src);
            let mut writer = String::new();
            match miette::GraphicalReportHandler::new().render_report(&mut writer, &adapter) {
                Ok(()) => writer,
                Err(_) => warning.to_string(),
            }
        }
        _ => warning.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use scenery_parser::{
        Span,
        error::{ErrorCode, ParseError},
    };

    use super::*;

    #[test]
    fn test_single_diagnostic() {
        let diag = Diagnostic::error("unexpected token")
            .with_code(ErrorCode::E100)
            .with_label(Span::new(0..5), "here")
            .with_help("try this");
        let parse_err = ParseError::from(diag);
        let err = SceneryError::new_parse_error(parse_err, "hello", "World.tscn");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), "unexpected token");
                assert_eq!(d.code().map(|c| c.to_string()), Some("E100".to_string()));
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_multiple_diagnostics() {
        let diags = vec![
            Diagnostic::error("first error")
                .with_code(ErrorCode::E001)
                .with_label(Span::new(0..5), "first"),
            Diagnostic::error("second error")
                .with_code(ErrorCode::E002)
                .with_label(Span::new(10..15), "second")
                .with_help("help for second"),
            Diagnostic::error("third error").with_label(Span::new(20..25), "third"),
        ];
        let parse_err = ParseError::from(diags);
        let err = SceneryError::new_parse_error(parse_err, "source code here...", "A.tscn");

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 3);
        assert_eq!(reportables[0].to_string(), "first error");
        assert_eq!(reportables[1].to_string(), "second error");
        assert_eq!(reportables[2].to_string(), "third error");
    }

    #[test]
    fn test_non_parse_error() {
        let err = SceneryError::Cycle("World".to_string());

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Hierarchy cycle detected at `World`");
                assert_eq!(
                    e.code().map(|c| c.to_string()),
                    Some("scenery::cycle".to_string())
                );
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_all_labels_returned() {
        let diag = Diagnostic::error("error with labels")
            .with_label(Span::new(0..5), "primary label")
            .with_secondary_label(Span::new(10..15), "secondary label");

        let adapter = DiagnosticAdapter::new(&diag, Path::new("A.tscn"), "some source code");

        let labels: Vec<_> = adapter.labels().expect("labels").collect();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label(), Some("primary label"));
        assert!(labels[0].primary());
        assert_eq!(labels[1].label(), Some("secondary label"));
        assert!(!labels[1].primary());
    }

    #[test]
    fn test_warning_severity() {
        let diag = Diagnostic::warning("could not find parent node")
            .with_code(ErrorCode::E200)
            .with_label(Span::new(0..4), "here");

        let adapter = DiagnosticAdapter::new(&diag, Path::new("A.tscn"), "node");

        assert_eq!(adapter.severity(), Some(miette::Severity::Warning));
    }

    #[test]
    fn test_render_warning_plain() {
        let warning = Warning::MissingSceneRoot {
            path: PathBuf::from("Empty.tscn"),
        };

        assert_eq!(render_warning(&warning), "Empty.tscn: scene has no root node");
    }

    #[test]
    fn test_render_warning_with_source() {
        let warning = Warning::Scene {
            path: PathBuf::from("Lost.tscn"),
            src: "[node name=\"Lost\"]".to_string(),
            diagnostic: Diagnostic::warning("could not find parent node")
                .with_label(Span::new(1..5), "parent"),
        };

        let rendered = render_warning(&warning);

        assert!(rendered.contains("could not find parent node"));
        assert!(rendered.contains("Lost.tscn"));
    }
}
