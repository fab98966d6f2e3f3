use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for wikiref operations
///
/// Unresolved, ambiguous or unreachable links are not errors; they are
/// reported through [`crate::model::LinkResolution`].
#[derive(Debug, Error)]
pub enum LinkError {
    /// A percent-encoded link target that does not decode to UTF-8
    #[error("Link target '{href}' is not valid percent-encoded UTF-8")]
    Decode {
        href: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Config parse error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Settings parse error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for wikiref operations
pub type Result<T> = std::result::Result<T, LinkError>;
