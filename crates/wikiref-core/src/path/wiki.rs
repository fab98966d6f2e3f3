use serde::{Deserialize, Serialize};

/// Suffix of a wiki home directory name
pub const WIKI_HOME_EXTENSION: &str = ".wiki";

const REPOSITORY_MARKER: &str = "//";

/// Where a path sits relative to a wiki home.
///
/// A doubled slash (`home.wiki//page.md`) marks the root of a wiki
/// repository; the part before it becomes `repo_root`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WikiLocation {
    /// Text before the `//` marker, if the path has one
    pub repo_root: Option<String>,
    /// Deepest enclosing `*.wiki` directory without trailing `/`, or empty
    pub wiki_home: String,
    /// Path below the wiki home, or the whole path when there is none
    pub relative_path: String,
}

impl WikiLocation {
    /// `directory` is the rooted directory form with trailing `/`
    pub(crate) fn from_directory(directory: &str, file_name: &str) -> Self {
        let repo_root = directory
            .find(REPOSITORY_MARKER)
            .filter(|&pos| pos > 0)
            .map(|pos| directory[..pos].to_string());

        let marker = format!("{}/", WIKI_HOME_EXTENSION);
        let home_end = directory
            .match_indices(marker.as_str())
            .map(|(pos, _)| pos + WIKI_HOME_EXTENSION.len())
            .last();

        match home_end {
            Some(end) => {
                let below = directory[end..].trim_start_matches('/');
                Self {
                    repo_root,
                    wiki_home: directory[..end].to_string(),
                    relative_path: format!("{}{}", below, file_name),
                }
            }
            None => Self {
                repo_root,
                wiki_home: String::new(),
                relative_path: format!("{}{}", directory, file_name),
            },
        }
    }

    pub fn is_in_wiki(&self) -> bool {
        !self.wiki_home.is_empty()
    }

    /// Both locations are inside the same wiki home
    pub fn shares_wiki_home(&self, other: &WikiLocation) -> bool {
        self.is_in_wiki() && self.wiki_home == other.wiki_home
    }
}
