use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;
use wikiref_core::{FileSystem, LinkConfig, ProjectListing};

/// Global state for LSP server
/// Must be Send + Sync
#[derive(Clone)]
pub struct GlobalState {
    /// Listing of the workspace root, `None` until `initialize` ran
    pub project: Arc<RwLock<Option<ProjectListing>>>,
    pub config: Arc<RwLock<LinkConfig>>,
    /// Text of open documents, keyed by URI
    pub document_cache: Arc<RwLock<HashMap<Url, String>>>,
    pub fs: Arc<dyn FileSystem>,
}

impl GlobalState {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            project: Arc::new(RwLock::new(None)),
            config: Arc::new(RwLock::new(LinkConfig::default())),
            document_cache: Arc::new(RwLock::new(HashMap::new())),
            fs,
        }
    }
}
