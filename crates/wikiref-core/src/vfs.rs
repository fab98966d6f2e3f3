use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{LinkError, Result};
use crate::model::FileEntry;

/// Marker directory of a source-control repository root
pub const REPOSITORY_MARKER: &str = ".git";

/// Repository identity of the project root itself
pub const ROOT_REPOSITORY: &str = ".";

/// Abstract interface for file system operations.
pub trait FileSystem: Send + Sync {
    /// Read the entire contents of a file into a string.
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    /// List all files under the root directory, recursively.
    /// Directories whose name is in `ignore` are not entered.
    fn list_files(&self, root: &Path, ignore: &[String]) -> Vec<PathBuf>;

    /// Whether `dir` is the root of a source-control repository
    fn is_repository_root(&self, dir: &Path) -> bool;
}

/// Standard implementation of FileSystem using std::fs and walkdir.
pub struct PhysicalFileSystem;

impl FileSystem for PhysicalFileSystem {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn list_files(&self, root: &Path, ignore: &[String]) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !ignore
                        .iter()
                        .any(|name| entry.file_name().to_string_lossy() == name.as_str())
            })
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect();

        files.sort();
        files
    }

    fn is_repository_root(&self, dir: &Path) -> bool {
        dir.join(REPOSITORY_MARKER).exists()
    }
}

/// Read a file, keeping its path in the error
pub fn read_file(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    fs.read_to_string(path).map_err(|source| LinkError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Capability: the project's files, each tagged with its repository when known
pub trait ProjectFiles {
    fn candidate_files(&self) -> &[FileEntry];
}

impl ProjectFiles for Vec<FileEntry> {
    fn candidate_files(&self) -> &[FileEntry] {
        self
    }
}

/// Capability: the path of the document being checked
pub trait DocumentSource {
    /// Project-relative path with `/` separators, if the document has one
    fn document_path(&self) -> Option<String>;
}

impl DocumentSource for &str {
    fn document_path(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl DocumentSource for String {
    fn document_path(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl DocumentSource for PathBuf {
    fn document_path(&self) -> Option<String> {
        Some(path_to_slash(self))
    }
}

/// An unsaved document has no path
impl DocumentSource for Option<String> {
    fn document_path(&self) -> Option<String> {
        self.clone()
    }
}

fn path_to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Snapshot of every file below a project root.
///
/// Paths are relative to `root` with `/` separators. Each file is tagged
/// with the nearest enclosing repository root, also relative to `root`
/// (`"."` for the root itself).
#[derive(Debug, Clone, Default)]
pub struct ProjectListing {
    pub root: PathBuf,
    pub files: Vec<FileEntry>,
}

impl ProjectFiles for ProjectListing {
    fn candidate_files(&self) -> &[FileEntry] {
        &self.files
    }
}

impl ProjectListing {
    pub fn new(root: impl Into<PathBuf>, mut files: Vec<FileEntry>) -> Self {
        files.sort();
        files.dedup();
        Self {
            root: root.into(),
            files,
        }
    }

    /// Walk `root` and tag every file with its repository
    pub fn scan(fs: &dyn FileSystem, root: &Path, ignore: &[String]) -> Self {
        let paths = fs.list_files(root, ignore);
        let mut repos = RepositoryLookup::new(fs, root);

        let files = paths
            .iter()
            .filter_map(|path| {
                let relative = path.strip_prefix(root).ok()?;
                Some(FileEntry {
                    path: path_to_slash(relative),
                    repository: repos.repository_of(path),
                })
            })
            .collect();

        let listing = Self::new(root, files);
        log::info!(
            "Scanned {} files under {}",
            listing.files.len(),
            root.display()
        );
        listing
    }

    /// Project-relative form of an absolute path, if it lies under the root
    pub fn relative_path(&self, path: &Path) -> Option<String> {
        path.strip_prefix(&self.root).ok().map(path_to_slash)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.iter().any(|f| f.path == path)
    }

    /// Add a file created after the scan, or every file below a created
    /// directory. Paths under an ignored directory are skipped, as `scan`
    /// would skip them.
    pub fn insert(&mut self, fs: &dyn FileSystem, path: &Path, ignore: &[String]) {
        let mut repos = RepositoryLookup::new(fs, &self.root);
        for file in fs.list_files(path, ignore) {
            let Some(relative) = self.relative_path(&file) else {
                continue;
            };
            if is_ignored(&relative, ignore) || self.contains(&relative) {
                continue;
            }
            let repository = repos.repository_of(&file);
            let pos = self
                .files
                .partition_point(|f| f.path.as_str() < relative.as_str());
            self.files.insert(
                pos,
                FileEntry {
                    path: relative,
                    repository,
                },
            );
        }
    }

    /// Drop a deleted file, or everything below a deleted directory
    pub fn remove(&mut self, path: &Path) {
        if let Some(relative) = self.relative_path(path) {
            let below = format!("{}/", relative);
            self.files
                .retain(|f| f.path != relative && !f.path.starts_with(&below));
        }
    }
}

/// Whether a directory of the project path `relative` is in `ignore`
fn is_ignored(relative: &str, ignore: &[String]) -> bool {
    let mut segments: Vec<&str> = relative.split('/').collect();
    segments.pop();
    segments
        .iter()
        .any(|segment| ignore.iter().any(|name| name == segment))
}

/// Finds the nearest repository root of a file, remembering each directory
struct RepositoryLookup<'a> {
    fs: &'a dyn FileSystem,
    root: &'a Path,
    cache: HashMap<PathBuf, Option<String>>,
}

impl<'a> RepositoryLookup<'a> {
    fn new(fs: &'a dyn FileSystem, root: &'a Path) -> Self {
        Self {
            fs,
            root,
            cache: HashMap::new(),
        }
    }

    fn repository_of(&mut self, file: &Path) -> Option<String> {
        let dir = file.parent()?;
        self.repository_of_dir(dir)
    }

    fn repository_of_dir(&mut self, dir: &Path) -> Option<String> {
        if let Some(cached) = self.cache.get(dir) {
            return cached.clone();
        }

        let found = if !dir.starts_with(self.root) {
            None
        } else if self.fs.is_repository_root(dir) {
            let relative = dir.strip_prefix(self.root).ok().map(path_to_slash);
            match relative {
                Some(r) if r.is_empty() => Some(ROOT_REPOSITORY.to_string()),
                other => other,
            }
        } else if dir == self.root {
            None
        } else {
            match dir.parent() {
                Some(parent) => self.repository_of_dir(parent),
                None => None,
            }
        };

        self.cache.insert(dir.to_path_buf(), found.clone());
        found
    }
}
