//! Resolution of link targets against a project listing.
//!
//! [`LinkResolver::resolve`] is a pure function of the href, the referencing
//! document and the listing. Unresolved, ambiguous and unreachable targets
//! are verdicts, not errors; the only error is an href whose percent-encoding
//! does not decode.

use serde::{Deserialize, Serialize};

use crate::config::LinkConfig;
use crate::error::{LinkError, Result};
use crate::index::{CandidateFileIndex, FileMatch, SearchFilters};
use crate::model::{FileEntry, LinkKind, LinkNode, LinkResolution};
use crate::path::PathInfo;
use crate::utils::{join_relative, normalize_path, parent_dir};
use crate::vfs::{DocumentSource, ProjectFiles};

mod target;


pub use target::{classify_href, normalize_wiki_link, HrefClass, NormalizedTarget};

/// Outcome of resolving one link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub verdict: LinkResolution,
    /// `./Page-Name.md` for wiki links, the project path for relative links,
    /// otherwise the href as written
    pub target: String,
    /// Files a fix could point the link at, for non-unique verdicts
    pub candidates: Vec<String>,
    /// Whether the listing was consulted
    pub validated: bool,
}

impl Resolution {
    fn unchecked(target: String, resolved: String) -> Self {
        Self {
            verdict: LinkResolution::ResolvedUnique(resolved),
            target,
            candidates: vec![],
            validated: false,
        }
    }

    fn checked(target: String, verdict: LinkResolution, candidates: Vec<String>) -> Self {
        Self {
            verdict,
            target,
            candidates,
            validated: true,
        }
    }
}

fn paths(matches: Vec<FileMatch>) -> Vec<String> {
    matches.into_iter().map(|m| m.path).collect()
}

pub struct LinkResolver<'a> {
    config: &'a LinkConfig,
}

impl<'a> LinkResolver<'a> {
    pub fn new(config: &'a LinkConfig) -> Self {
        Self { config }
    }

    pub fn resolve_node(
        &self,
        node: &LinkNode,
        document: &dyn DocumentSource,
        files: &dyn ProjectFiles,
    ) -> Result<Resolution> {
        self.resolve(&node.href, node.kind, document, files)
    }

    /// Resolve one href found in `document`.
    ///
    /// For wiki links `href` is the raw body between the brackets.
    pub fn resolve(
        &self,
        href: &str,
        kind: LinkKind,
        document: &dyn DocumentSource,
        files: &dyn ProjectFiles,
    ) -> Result<Resolution> {
        let doc_path = document.document_path();
        let index = CandidateFileIndex::new(files.candidate_files());

        let resolution = if kind.is_wiki() {
            self.resolve_wiki(href, kind, doc_path.as_deref(), &index)
        } else {
            self.resolve_href(href, kind, doc_path.as_deref(), &index)?
        };

        log::debug!(
            "resolve {:?} {:?} in {:?} -> {:?}",
            kind,
            href,
            doc_path,
            resolution.verdict
        );
        Ok(resolution)
    }

    fn resolve_wiki(
        &self,
        body: &str,
        kind: LinkKind,
        doc_path: Option<&str>,
        index: &CandidateFileIndex<'_>,
    ) -> Resolution {
        let target = normalize_wiki_link(body, self.config.wiki_link_format());

        let Some(page) = target.page.as_deref() else {
            return self_reference(target.href, doc_path);
        };
        if kind.is_image() || !self.config.validate_links {
            return Resolution::unchecked(target.href.clone(), target.href);
        }

        let filters = wiki_filters(doc_path);
        let matches = index.find_matches(Some(page), doc_path, filters);

        match matches.len() {
            1 => {
                let verdict = LinkResolution::ResolvedUnique(matches[0].path.clone());
                Resolution::checked(target.href, verdict, vec![])
            }
            0 => {
                let relaxed = index.find_matches(
                    Some(page),
                    doc_path,
                    filters | SearchFilters::ALLOW_INACCESSIBLE,
                );
                let verdict = match relaxed.into_iter().next() {
                    Some(first) => LinkResolution::ResolvedInaccessible(first.path),
                    None => LinkResolution::Unresolved,
                };
                let candidates = paths(index.find_matches(None, doc_path, filters));
                Resolution::checked(target.href, verdict, candidates)
            }
            _ => {
                let found = paths(matches);
                let verdict = LinkResolution::ResolvedAmbiguous(found.clone());
                Resolution::checked(target.href, verdict, found)
            }
        }
    }

    fn resolve_href(
        &self,
        href: &str,
        kind: LinkKind,
        doc_path: Option<&str>,
        index: &CandidateFileIndex<'_>,
    ) -> Result<Resolution> {
        let class = classify_href(href);
        match class {
            HrefClass::External | HrefClass::Mail | HrefClass::Absolute => {
                return Ok(Resolution::unchecked(href.to_string(), href.to_string()));
            }
            HrefClass::Anchor => return Ok(self_reference(href.to_string(), doc_path)),
            HrefClass::File(_) | HrefClass::Relative => {}
        }
        if kind.is_image() || !self.config.validate_links {
            return Ok(Resolution::unchecked(href.to_string(), href.to_string()));
        }

        if let HrefClass::File(path) = class {
            let wanted = normalize_path(&path);
            let verdict = match find_normalized(index, &wanted, true) {
                Some(entry) => LinkResolution::ResolvedUnique(entry.path.clone()),
                None => LinkResolution::Unresolved,
            };
            return Ok(Resolution::checked(href.to_string(), verdict, vec![]));
        }

        let path_part = strip_query_and_fragment(href);
        if path_part.is_empty() {
            return Ok(self_reference(href.to_string(), doc_path));
        }
        let decoded = urlencoding::decode(path_part).map_err(|source| LinkError::Decode {
            href: href.to_string(),
            source,
        })?;

        let base = doc_path.map(parent_dir).unwrap_or("");
        let wanted = join_relative(base, &decoded);
        let query = index.query(doc_path).repository_scope();

        let verdict = match find_normalized(index, &wanted, false) {
            Some(entry) => match query.check(entry) {
                Some(_) => LinkResolution::ResolvedUnique(entry.path.clone()),
                None => LinkResolution::ResolvedInaccessible(entry.path.clone()),
            },
            None => LinkResolution::Unresolved,
        };

        let candidates = if verdict.is_unique() {
            vec![]
        } else {
            let name = PathInfo::parse(&wanted).file_name().to_string();
            paths(query.find(Some(name.as_str())))
        };

        Ok(Resolution::checked(wanted, verdict, candidates))
    }
}

/// Documents linked from inside a wiki are scoped to wiki pages
fn wiki_filters(doc_path: Option<&str>) -> SearchFilters {
    match doc_path {
        Some(path) if PathInfo::parse(path).is_wiki_page() => SearchFilters::WIKI_PAGE_FILE,
        _ => SearchFilters::MARKDOWN_FILE,
    }
}

fn self_reference(target: String, doc_path: Option<&str>) -> Resolution {
    let resolved = doc_path.map(str::to_string).unwrap_or_else(|| target.clone());
    Resolution::unchecked(target, resolved)
}

fn strip_query_and_fragment(href: &str) -> &str {
    let end = href.find(|c| c == '#' || c == '?').unwrap_or(href.len());
    &href[..end]
}

/// Listed file whose normalized path equals `wanted`.
/// With `rooted`, a leading `/` on `wanted` is optional.
fn find_normalized<'a>(
    index: &CandidateFileIndex<'a>,
    wanted: &str,
    rooted: bool,
) -> Option<&'a FileEntry> {
    let bare = wanted.trim_start_matches('/');
    index.entries().iter().find(|entry| {
        let path = normalize_path(&entry.path);
        path == wanted || (rooted && path.trim_start_matches('/') == bare)
    })
}
