//! Structural view of a raw path string.
//!
//! [`PathInfo`] never fails: an empty or odd string simply yields empty
//! components. Directory components keep their trailing `/` and are always
//! rooted (`path/to/file.md` has directory `/path/to/`).

use serde::{Deserialize, Serialize};

use crate::naming::file_name_as_wiki_ref;

mod wiki;


pub use wiki::{WikiLocation, WIKI_HOME_EXTENSION};

/// Extensions treated as markdown documents
pub const MARKDOWN_EXTENSIONS: &[&str] = &[".md", ".markdown", ".mdown", ".mkd", ".mkdn"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathInfo {
    raw: String,
    extension: String,
    file_name: String,
    file_name_no_ext: String,
    directory: String,
    full_path_no_ext: String,
    location: WikiLocation,
}

/// Extension of a file name including the dot.
///
/// One-character extensions do not count, so `a.c` has none. The `*_no_ext`
/// fields strip exactly this extension, so `a.c` keeps its whole name there.
fn extension_of(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(pos) if file_name[pos + 1..].chars().count() > 1 => &file_name[pos..],
        _ => "",
    }
}

impl PathInfo {
    pub fn parse(raw: &str) -> Self {
        let (dir_part, file_name) = match raw.rfind('/') {
            Some(pos) => (&raw[..=pos], &raw[pos + 1..]),
            None => ("", raw),
        };

        let directory = if dir_part.is_empty() || dir_part.starts_with('/') {
            dir_part.to_string()
        } else {
            format!("/{}", dir_part)
        };

        let extension = extension_of(file_name);
        let file_name_no_ext = &file_name[..file_name.len() - extension.len()];
        let location = WikiLocation::from_directory(&directory, file_name);

        Self {
            raw: raw.to_string(),
            extension: extension.to_string(),
            file_name: file_name.to_string(),
            file_name_no_ext: file_name_no_ext.to_string(),
            full_path_no_ext: format!("{}{}", directory, file_name_no_ext),
            directory,
            location,
        }
    }

    pub fn file_path(&self) -> &str {
        &self.raw
    }

    /// Extension with its leading dot, or empty
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_name_no_ext(&self) -> &str {
        &self.file_name_no_ext
    }

    /// Directory with leading and trailing `/`, or empty
    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn full_path_no_ext(&self) -> &str {
        &self.full_path_no_ext
    }

    pub fn location(&self) -> &WikiLocation {
        &self.location
    }

    /// Deepest enclosing `*.wiki` directory, or empty
    pub fn wiki_home(&self) -> &str {
        &self.location.wiki_home
    }

    pub fn is_wiki_home_directory(&self) -> bool {
        self.extension == WIKI_HOME_EXTENSION
    }

    pub fn is_under_wiki_home(&self) -> bool {
        format!("{}/", self.directory).contains(".wiki/")
    }

    pub fn has_wiki_page_ext(&self) -> bool {
        self.extension == ".md"
    }

    pub fn is_markdown(&self) -> bool {
        let ext = self.extension.to_lowercase();
        MARKDOWN_EXTENSIONS.contains(&ext.as_str())
    }

    /// A markdown file inside a wiki home
    pub fn is_wiki_page(&self) -> bool {
        self.is_markdown() && self.is_under_wiki_home()
    }

    pub fn contains_spaces(&self) -> bool {
        self.raw.contains(' ')
    }

    pub fn path_contains_spaces(&self) -> bool {
        self.directory.contains(' ')
    }

    pub fn file_name_contains_spaces(&self) -> bool {
        self.file_name.contains(' ')
    }

    pub fn file_path_as_wiki_ref(&self) -> String {
        file_name_as_wiki_ref(&self.raw)
    }

    pub fn full_path_no_ext_as_wiki_ref(&self) -> String {
        file_name_as_wiki_ref(&self.full_path_no_ext)
    }

    pub fn directory_as_wiki_ref(&self) -> String {
        file_name_as_wiki_ref(&self.directory)
    }

    pub fn file_name_as_wiki_ref(&self) -> String {
        file_name_as_wiki_ref(&self.file_name)
    }

    pub fn file_name_no_ext_as_wiki_ref(&self) -> String {
        file_name_as_wiki_ref(&self.file_name_no_ext)
    }

    pub fn wiki_home_as_wiki_ref(&self) -> String {
        file_name_as_wiki_ref(&self.location.wiki_home)
    }
}
