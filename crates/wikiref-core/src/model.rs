use serde::{Deserialize, Serialize};

/// Core internal coordinate system (0-based, columns in UTF-16 code units)
/// Does not directly use LSP Position to avoid coupling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub line: u32,
    pub col: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkKind {
    WikiLink,         // [[page|text]]
    EmbeddedWikiLink, // ![[page]]
    Explicit,         // [text](target)
    Reference,        // [text][label]
    AutoLink,         // <https://example.com>
    MailLink,         // <someone@example.com>
    Image,            // ![alt](target)
}

impl LinkKind {
    pub fn is_wiki(self) -> bool {
        matches!(self, LinkKind::WikiLink | LinkKind::EmbeddedWikiLink)
    }

    pub fn is_image(self) -> bool {
        matches!(self, LinkKind::Image | LinkKind::EmbeddedWikiLink)
    }
}

/// A link as found in a markdown document.
///
/// For wiki links `href` holds the raw text between the brackets
/// (`page|text#anchor`), because the `|` order depends on configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkNode {
    pub href: String,
    pub text: String,
    pub kind: LinkKind,
    pub range: TextRange,
}

/// One file of the project listing
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    /// Root of the source-control repository holding the file, when known
    pub repository: Option<String>,
}

impl FileEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            repository: None,
        }
    }

    pub fn in_repository(path: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            repository: Some(repository.into()),
        }
    }
}

/// Verdict for a single link target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkResolution {
    Unresolved,
    ResolvedUnique(String),
    /// Matching files in lexicographic order
    ResolvedAmbiguous(Vec<String>),
    /// The file exists but is outside the referencing document's repository or wiki
    ResolvedInaccessible(String),
}

impl LinkResolution {
    pub fn is_unique(&self) -> bool {
        matches!(self, LinkResolution::ResolvedUnique(_))
    }

    /// Whether a rendered link should be marked as pointing nowhere
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            LinkResolution::Unresolved | LinkResolution::ResolvedInaccessible(_)
        )
    }

    pub fn files(&self) -> Vec<&str> {
        match self {
            LinkResolution::Unresolved => vec![],
            LinkResolution::ResolvedUnique(file) | LinkResolution::ResolvedInaccessible(file) => {
                vec![file.as_str()]
            }
            LinkResolution::ResolvedAmbiguous(files) => files.iter().map(String::as_str).collect(),
        }
    }
}
