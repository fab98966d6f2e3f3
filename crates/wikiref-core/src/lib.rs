//! Wikiref Core Library
//!
//! Link resolution and path classification for markdown projects: parses
//! path strings into their wiki-aware components, resolves wiki and relative
//! links against a project file listing, and reports links that do not land
//! on exactly one reachable file.
//!
//! The engine is pure. Host state is reached only through the
//! [`vfs::ProjectFiles`] and [`vfs::DocumentSource`] capabilities.

pub mod annotator;
pub mod config;
pub mod error;
pub mod index;
mod line_map;
pub mod model;
pub mod naming;
pub mod parser;
pub mod path;
pub mod render;
pub mod resolver;
pub mod syntax;
pub mod utils;
pub mod vfs;

pub use annotator::{annotate, LinkDiagnostic, QuickFix, Severity};
pub use config::LinkConfig;
pub use error::{LinkError, Result};
pub use index::{CandidateFileIndex, FileMatch, SearchFilters};
pub use model::{FileEntry, LinkKind, LinkNode, LinkResolution, Point, TextRange};
pub use naming::{convert, CaseStyle, NamingConvention, Separator};
pub use parser::extract_links;
pub use path::{PathInfo, WikiLocation};
pub use resolver::{LinkResolver, Resolution};
pub use utils::{join_relative, normalize_path, parent_dir, relative_path};
pub use vfs::{DocumentSource, FileSystem, PhysicalFileSystem, ProjectFiles, ProjectListing};
