//! Queries over a project's file listing.
//!
//! A [`CandidateFileIndex`] borrows the listing for one query context; it
//! keeps no state between queries.

use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::model::FileEntry;
use crate::naming::file_name_as_wiki_ref;
use crate::path::PathInfo;


/// Combinable search restrictions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchFilters(u8);

impl SearchFilters {
    pub const NONE: SearchFilters = SearchFilters(0);
    /// Candidate must be a markdown file
    pub const MARKDOWN_FILE: SearchFilters = SearchFilters(1);
    /// Candidate must be a markdown file inside a wiki home
    pub const WIKI_PAGE_FILE: SearchFilters = SearchFilters(1 << 1);
    /// Keep candidates outside the referencing file's wiki home or repository
    pub const ALLOW_INACCESSIBLE: SearchFilters = SearchFilters(1 << 2);
    /// Candidate must share the referencing file's repository
    pub const SAME_REPOSITORY: SearchFilters = SearchFilters(1 << 3);

    pub fn contains(self, other: SearchFilters) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn union(self, other: SearchFilters) -> SearchFilters {
        SearchFilters(self.0 | other.0)
    }

    pub fn without(self, other: SearchFilters) -> SearchFilters {
        SearchFilters(self.0 & !other.0)
    }
}

impl BitOr for SearchFilters {
    type Output = SearchFilters;

    fn bitor(self, rhs: SearchFilters) -> SearchFilters {
        self.union(rhs)
    }
}

impl BitOrAssign for SearchFilters {
    fn bitor_assign(&mut self, rhs: SearchFilters) {
        *self = self.union(rhs);
    }
}

/// A listed file that satisfied a query
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileMatch {
    pub path: String,
    pub repository: Option<String>,
    /// Reachable from the referencing file without leaving its scope
    pub accessible: bool,
}

fn repository_of_entry(entry: &FileEntry, info: &PathInfo) -> Option<String> {
    entry
        .repository
        .clone()
        .or_else(|| info.location().repo_root.clone())
}

/// `./Page-Name` -> `Page Name`. A leading `/` is kept as an anchor.
fn target_as_wiki_ref(target: &str) -> String {
    let mut t = target;
    while let Some(rest) = t.strip_prefix("./") {
        t = rest;
    }
    let bare = file_name_as_wiki_ref(t.trim_start_matches('/'));
    if t.starts_with('/') {
        format!("/{}", bare)
    } else {
        bare
    }
}

/// `path` in wiki-ref spelling, with and without its extension
fn wiki_ref_forms(info: &PathInfo, path: &str) -> [String; 2] {
    let full = file_name_as_wiki_ref(path);
    let no_ext = full[..full.len() - info.extension().len()].to_string();
    [full, no_ext]
}

/// A target with a `/` matches by path suffix; an anchored target (`/...`)
/// must equal the path below the wiki home or below the project root.
fn matches_target(info: &PathInfo, target: &str) -> bool {
    if let Some(rooted) = target.strip_prefix('/') {
        let below_home = info.location().relative_path.trim_start_matches('/');
        let below_root = info.file_path().trim_start_matches('/');
        return [below_home, below_root]
            .iter()
            .flat_map(|path| wiki_ref_forms(info, path))
            .any(|c| c == rooted);
    }
    if target.contains('/') {
        let suffix = format!("/{}", target);
        return wiki_ref_forms(info, info.file_path())
            .iter()
            .any(|c| c == target || c.ends_with(&suffix));
    }
    info.file_name_as_wiki_ref() == target || info.file_name_no_ext_as_wiki_ref() == target
}

pub struct CandidateFileIndex<'a> {
    files: &'a [FileEntry],
}

impl<'a> CandidateFileIndex<'a> {
    pub fn new(files: &'a [FileEntry]) -> Self {
        Self { files }
    }

    pub fn entries(&self) -> &'a [FileEntry] {
        self.files
    }

    pub fn find_by_path(&self, path: &str) -> Option<&'a FileEntry> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Repository of a path, from the listing or from a `//` marker in it
    pub fn repository_of(&self, path: &str) -> Option<String> {
        match self.find_by_path(path) {
            Some(entry) => repository_of_entry(entry, &PathInfo::parse(path)),
            None => PathInfo::parse(path).location().repo_root.clone(),
        }
    }

    /// Start a query on behalf of `referencing` (`None` for an unsaved document)
    pub fn query(&self, referencing: Option<&str>) -> FileQuery<'a> {
        let referencing = referencing.map(|path| {
            let repository = self.repository_of(path);
            (PathInfo::parse(path), repository)
        });
        FileQuery {
            files: self.files,
            referencing,
            filters: SearchFilters::NONE,
            repository_scope: false,
        }
    }

    /// Files matching `target` (every file when `None`), sorted by path
    pub fn find_matches(
        &self,
        target: Option<&str>,
        referencing: Option<&str>,
        filters: SearchFilters,
    ) -> Vec<FileMatch> {
        self.query(referencing).filters(filters).find(target)
    }

    /// Text of a wiki link that reaches `path`
    pub fn wiki_page_ref(path: &str) -> String {
        PathInfo::parse(path).file_name_no_ext_as_wiki_ref()
    }

    /// Wiki reference that tells `path` apart from the other `matches`.
    ///
    /// Tries the path below the wiki home, then the same anchored with `/`,
    /// then the anchored project path with and without extension.
    pub fn wiki_path_ref(path: &str, matches: &[String]) -> String {
        let info = PathInfo::parse(path);
        let [below_home, below_home_no_ext] =
            wiki_ref_forms(&info, info.location().relative_path.trim_start_matches('/'));
        let [below_root, below_root_no_ext] =
            wiki_ref_forms(&info, info.file_path().trim_start_matches('/'));
        let tried = [
            below_home_no_ext.clone(),
            format!("/{}", below_home_no_ext),
            format!("/{}", below_root_no_ext),
            format!("/{}", below_root),
        ];

        let others: Vec<PathInfo> = matches
            .iter()
            .filter(|other| other.as_str() != path)
            .map(|other| PathInfo::parse(other))
            .collect();
        tried
            .into_iter()
            .find(|target| !others.iter().any(|other| matches_target(other, target)))
            .unwrap_or_else(|| format!("/{}", below_home))
    }
}

/// A query under construction.
///
/// Filters given in separate calls accumulate, so `filters(a | b).filters(c)`
/// finds the same files as `filters(a).filters(b | c)`.
pub struct FileQuery<'a> {
    files: &'a [FileEntry],
    referencing: Option<(PathInfo, Option<String>)>,
    filters: SearchFilters,
    repository_scope: bool,
}

impl<'a> FileQuery<'a> {
    pub fn filters(mut self, filters: SearchFilters) -> Self {
        self.filters |= filters;
        self
    }

    /// Judge accessibility by repository alone, even inside a wiki home.
    /// Relative links and images are scoped this way.
    pub fn repository_scope(mut self) -> Self {
        self.repository_scope = true;
        self
    }

    fn is_accessible(&self, info: &PathInfo, repository: Option<&str>) -> bool {
        let Some((doc, doc_repository)) = &self.referencing else {
            return true;
        };
        if doc.is_under_wiki_home() && !self.repository_scope {
            return doc.location().shares_wiki_home(info.location());
        }
        match (doc_repository.as_deref(), repository) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    fn same_repository(&self, repository: Option<&str>) -> bool {
        match &self.referencing {
            Some((_, Some(doc_repository))) => repository == Some(doc_repository.as_str()),
            _ => true,
        }
    }

    /// Apply the filters to a single listed file
    pub fn check(&self, entry: &FileEntry) -> Option<FileMatch> {
        self.check_target(entry, None)
    }

    fn check_target(&self, entry: &FileEntry, target: Option<&str>) -> Option<FileMatch> {
        let filters = self.filters;
        let info = PathInfo::parse(&entry.path);
        if filters.contains(SearchFilters::MARKDOWN_FILE) && !info.is_markdown() {
            return None;
        }
        if filters.contains(SearchFilters::WIKI_PAGE_FILE) && !info.is_wiki_page() {
            return None;
        }
        if let Some(t) = target {
            if !matches_target(&info, t) {
                return None;
            }
        }

        let repository = repository_of_entry(entry, &info);
        if filters.contains(SearchFilters::SAME_REPOSITORY)
            && !self.same_repository(repository.as_deref())
        {
            return None;
        }

        let accessible = self.is_accessible(&info, repository.as_deref());
        if !accessible && !filters.contains(SearchFilters::ALLOW_INACCESSIBLE) {
            return None;
        }

        Some(FileMatch {
            path: entry.path.clone(),
            repository,
            accessible,
        })
    }

    pub fn find(&self, target: Option<&str>) -> Vec<FileMatch> {
        let target = target.map(target_as_wiki_ref);

        let mut matches: Vec<FileMatch> = self
            .files
            .iter()
            .filter_map(|entry| self.check_target(entry, target.as_deref()))
            .collect();

        matches.sort();
        matches.dedup_by(|a, b| a.path == b.path);
        matches
    }
}
