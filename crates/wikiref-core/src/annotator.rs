//! Diagnostics for the links of one document.

use serde::{Deserialize, Serialize};

use crate::config::LinkConfig;
use crate::error::Result;
use crate::index::CandidateFileIndex;
use crate::model::{LinkNode, LinkResolution, TextRange};
use crate::naming::wiki_ref_as_page_file_name;
use crate::parser::extract_links;
use crate::render::replacement_markup;
use crate::resolver::{LinkResolver, Resolution};
use crate::syntax::split_wiki_link;
use crate::utils::{parent_dir, relative_path};
use crate::vfs::{DocumentSource, ProjectFiles};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// Suggested edit attached to a diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuickFix {
    /// Point the link at another file
    ChangeTarget {
        /// Project path of the new target
        target: String,
        /// Markdown replacing the whole link
        replacement: String,
    },
    /// Create the missing page next to the document
    CreatePage { file_name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDiagnostic {
    pub range: TextRange,
    pub severity: Severity,
    pub message: String,
    pub link: LinkNode,
    pub resolution: Resolution,
    pub fixes: Vec<QuickFix>,
}

/// Check every link of `text` and report the ones that do not resolve to
/// exactly one reachable file.
pub fn annotate(
    text: &str,
    document: &dyn DocumentSource,
    files: &dyn ProjectFiles,
    config: &LinkConfig,
) -> Result<Vec<LinkDiagnostic>> {
    let resolver = LinkResolver::new(config);
    let doc_path = document.document_path();
    let mut diagnostics = Vec::new();

    for link in extract_links(text) {
        let resolution = resolver.resolve_node(&link, document, files)?;
        if let Some(diagnostic) = diagnose(link, resolution, doc_path.as_deref(), config) {
            diagnostics.push(diagnostic);
        }
    }

    log::debug!(
        "{:?}: {} link diagnostics",
        doc_path,
        diagnostics.len()
    );
    Ok(diagnostics)
}

fn diagnose(
    link: LinkNode,
    resolution: Resolution,
    doc_path: Option<&str>,
    config: &LinkConfig,
) -> Option<LinkDiagnostic> {
    let wiki = link.kind.is_wiki();

    let (severity, message) = match (&resolution.verdict, wiki) {
        (LinkResolution::ResolvedUnique(_), _) => return None,
        (LinkResolution::Unresolved, true) => {
            (Severity::Error, "Unresolved page reference".to_string())
        }
        (LinkResolution::Unresolved, false) => {
            (Severity::Error, "Unresolved link target".to_string())
        }
        (LinkResolution::ResolvedInaccessible(path), true) => (
            Severity::Error,
            format!("Page reference is not reachable from this document: {}", path),
        ),
        (LinkResolution::ResolvedInaccessible(path), false) => (
            Severity::Error,
            format!("Link target is outside this repository: {}", path),
        ),
        (LinkResolution::ResolvedAmbiguous(paths), _) => (
            Severity::Warning,
            format!("Ambiguous reference, {} files match", paths.len()),
        ),
    };

    let mut fixes = Vec::new();
    if wiki && resolution.verdict == LinkResolution::Unresolved {
        let page = split_wiki_link(&link.href, config.wiki_link_format()).page;
        if !page.is_empty() {
            fixes.push(QuickFix::CreatePage {
                file_name: wiki_ref_as_page_file_name(&page),
            });
        }
    }

    let ambiguous = matches!(resolution.verdict, LinkResolution::ResolvedAmbiguous(_));
    for candidate in &resolution.candidates {
        let new_target = if !wiki {
            let from = doc_path.map(parent_dir).unwrap_or("");
            relative_path(from, candidate)
        } else if ambiguous {
            CandidateFileIndex::wiki_path_ref(candidate, &resolution.candidates)
        } else {
            CandidateFileIndex::wiki_page_ref(candidate)
        };
        fixes.push(QuickFix::ChangeTarget {
            target: candidate.clone(),
            replacement: replacement_markup(&link, &new_target, config),
        });
    }

    Some(LinkDiagnostic {
        range: link.range,
        severity,
        message,
        link,
        resolution,
        fixes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileEntry;
    use pretty_assertions::assert_eq;

    fn files() -> Vec<FileEntry> {
        vec![
            FileEntry::new("docs/a.md"),
            FileEntry::new("docs/b.md"),
            FileEntry::new("guides/Set-Up.md"),
            FileEntry::new("notes/Set-Up.md"),
        ]
    }

    #[test]
    fn test_resolved_links_are_quiet() {
        let text = "[[b]] and [a](a.md) and <https://example.com>";
        let diagnostics = annotate(text, &"docs/index.md", &files(), &LinkConfig::default()).unwrap();

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unresolved_wiki_link_offers_create_and_change() {
        let text = "See [[Missing Page|here]].";
        let diagnostics = annotate(text, &"docs/index.md", &files(), &LinkConfig::default()).unwrap();

        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics[0];
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.message, "Unresolved page reference");
        assert_eq!(diagnostic.range.start.col, 4);
        assert_eq!(
            diagnostic.fixes[0],
            QuickFix::CreatePage {
                file_name: "Missing-Page.md".to_string()
            }
        );
        assert_eq!(
            diagnostic.fixes[1],
            QuickFix::ChangeTarget {
                target: "docs/a.md".to_string(),
                replacement: "[[a|here]]".to_string(),
            }
        );
        assert_eq!(diagnostic.fixes.len(), 5);
    }

    #[test]
    fn test_ambiguous_wiki_link_fixes_use_paths() {
        let text = "[[Set Up]]";
        let diagnostics = annotate(text, &"docs/index.md", &files(), &LinkConfig::default()).unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        let replacements: Vec<&str> = diagnostics[0]
            .fixes
            .iter()
            .map(|fix| match fix {
                QuickFix::ChangeTarget { replacement, .. } => replacement.as_str(),
                QuickFix::CreatePage { .. } => "",
            })
            .collect();
        assert_eq!(replacements, vec!["[[guides/Set Up]]", "[[notes/Set Up]]"]);
    }

    #[test]
    fn test_path_fix_resolves_uniquely() {
        let files = files();
        let config = LinkConfig::default();

        let diagnostics = annotate("[[guides/Set Up]]", &"docs/index.md", &files, &config).unwrap();

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_nested_same_name_fixes_are_unique() {
        let files = vec![
            FileEntry::new("docs/Set-Up.md"),
            FileEntry::new("old/docs/Set-Up.md"),
        ];
        let config = LinkConfig::default();

        let diagnostics = annotate("[[Set Up]]", &"index.md", &files, &config).unwrap();
        let replacements: Vec<String> = diagnostics[0]
            .fixes
            .iter()
            .filter_map(|fix| match fix {
                QuickFix::ChangeTarget { replacement, .. } => Some(replacement.clone()),
                QuickFix::CreatePage { .. } => None,
            })
            .collect();
        assert_eq!(replacements, vec!["[[/docs/Set Up]]", "[[old/docs/Set Up]]"]);

        for replacement in &replacements {
            let again = annotate(replacement, &"index.md", &files, &config).unwrap();
            assert!(again.is_empty(), "{} is still not unique", replacement);
        }
    }

    #[test]
    fn test_missing_relative_link_suggests_relative_path() {
        let text = "[guide](Set-Up.md)";
        let diagnostics = annotate(text, &"docs/index.md", &files(), &LinkConfig::default()).unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Unresolved link target");
        assert_eq!(
            diagnostics[0].fixes,
            vec![
                QuickFix::ChangeTarget {
                    target: "guides/Set-Up.md".to_string(),
                    replacement: "[guide](../guides/Set-Up.md)".to_string(),
                },
                QuickFix::ChangeTarget {
                    target: "notes/Set-Up.md".to_string(),
                    replacement: "[guide](../notes/Set-Up.md)".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_inaccessible_wiki_link() {
        let files = vec![
            FileEntry::in_repository("docs/a.md", "."),
            FileEntry::in_repository("vendor/Page.md", "vendor"),
        ];

        let diagnostics =
            annotate("[[Page]]", &"docs/a.md", &files, &LinkConfig::default()).unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Page reference is not reachable from this document: vendor/Page.md"
        );
        assert_eq!(
            diagnostics[0].fixes,
            vec![QuickFix::ChangeTarget {
                target: "docs/a.md".to_string(),
                replacement: "[[a]]".to_string(),
            }]
        );
    }

    #[test]
    fn test_decode_error_propagates() {
        let result = annotate("[x](bad%FF.md)", &"a.md", &files(), &LinkConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_quick_fix_serializes_with_kind_tag() {
        let fix = QuickFix::CreatePage {
            file_name: "Page.md".to_string(),
        };
        let value = serde_json::to_value(&fix).unwrap();

        assert_eq!(
            value,
            serde_json::json!({ "kind": "create_page", "file_name": "Page.md" })
        );
    }
}
