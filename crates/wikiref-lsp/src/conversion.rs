//! Conversion between core types and LSP types

use serde::Serialize;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range, Url};
use wikiref_core::model::{Point, TextRange};
use wikiref_core::{LinkDiagnostic, ProjectListing, QuickFix, Severity};

pub const DIAGNOSTIC_SOURCE: &str = "wikiref";

/// Payload attached to each published diagnostic so a client can offer fixes
#[derive(Debug, Serialize)]
pub struct DiagnosticData<'a> {
    pub candidates: &'a [String],
    pub fixes: &'a [QuickFix],
}

/// Convert Core Point to LSP Position
/// Both count 0-based lines and UTF-16 columns
pub fn point_to_lsp_position(point: Point) -> Position {
    Position {
        line: point.line,
        character: point.col,
    }
}

/// Convert Core TextRange to LSP Range
pub fn text_range_to_lsp_range(range: TextRange) -> Range {
    Range {
        start: point_to_lsp_position(range.start),
        end: point_to_lsp_position(range.end),
    }
}

/// Convert a core link diagnostic to an LSP diagnostic
pub fn link_diagnostic_to_lsp(diag: &LinkDiagnostic) -> Diagnostic {
    let severity = match diag.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    };
    let data = DiagnosticData {
        candidates: &diag.resolution.candidates,
        fixes: &diag.fixes,
    };

    Diagnostic {
        range: text_range_to_lsp_range(diag.range),
        severity: Some(severity),
        code: None,
        code_description: None,
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: diag.message.clone(),
        related_information: None,
        tags: None,
        data: serde_json::to_value(&data).ok(),
    }
}

/// Project path of a document URI.
///
/// `None` for documents that are not files under the project root, which the
/// core treats as unsaved.
pub fn uri_to_document_path(uri: &Url, project: Option<&ProjectListing>) -> Option<String> {
    let path = uri.to_file_path().ok()?;
    project?.relative_path(&path)
}
