use crate::state::GlobalState;
use std::path::{Path, PathBuf};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;
use wikiref_core::vfs::read_file;
use wikiref_core::{FileSystem, LinkConfig, LinkError, ProjectListing};

/// Project settings file, looked up in the workspace root
pub const CONFIG_FILE_NAME: &str = ".wikiref.yml";

/// Handle "initialize" request
pub async fn handle_initialize(
    client: &Client,
    state: &GlobalState,
    params: InitializeParams,
) -> Result<InitializeResult> {
    match params.root_uri.and_then(|uri| uri.to_file_path().ok()) {
        Some(root_path) => {
            client
                .log_message(
                    MessageType::INFO,
                    format!("Initializing workspace at: {:?}", root_path),
                )
                .await;

            reload_config_file(client, state, &root_path).await;
            let ignore = state.config.read().await.ignore_patterns.clone();
            let listing = scan_project(state, root_path, ignore).await?;

            client
                .log_message(
                    MessageType::INFO,
                    format!("Found {} files", listing.files.len()),
                )
                .await;

            let mut project_lock = state.project.write().await;
            *project_lock = Some(listing);
        }
        None => {
            client
                .log_message(MessageType::WARNING, "No rootUri provided!")
                .await;
        }
    }

    Ok(InitializeResult {
        capabilities: ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(
                TextDocumentSyncKind::FULL,
            )),
            ..Default::default()
        },
        server_info: Some(ServerInfo {
            name: "wikiref".to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
    })
}

/// Walk the workspace root off the async runtime
pub async fn scan_project(
    state: &GlobalState,
    root: PathBuf,
    ignore: Vec<String>,
) -> Result<ProjectListing> {
    let fs = state.fs.clone();
    tokio::task::spawn_blocking(move || ProjectListing::scan(fs.as_ref(), &root, &ignore))
        .await
        .map_err(|e| tower_lsp::jsonrpc::Error {
            code: tower_lsp::jsonrpc::ErrorCode::InternalError,
            message: format!("Failed to scan workspace: {}", e).into(),
            data: None,
        })
}

/// Replace the configuration with the contents of the settings file.
/// A missing file leaves the current configuration alone; a broken one is
/// reported to the client and ignored.
pub async fn reload_config_file(client: &Client, state: &GlobalState, root: &Path) {
    match load_config(state.fs.as_ref(), root) {
        Ok(Some(config)) => {
            client
                .log_message(MessageType::INFO, format!("Loaded {}", CONFIG_FILE_NAME))
                .await;
            let mut config_lock = state.config.write().await;
            *config_lock = config;
        }
        Ok(None) => {}
        Err(e) => {
            log::warn!("Ignoring {}: {}", CONFIG_FILE_NAME, e);
            client
                .log_message(
                    MessageType::ERROR,
                    format!("Failed to load {}: {}", CONFIG_FILE_NAME, e),
                )
                .await;
        }
    }
}

fn load_config(fs: &dyn FileSystem, root: &Path) -> wikiref_core::Result<Option<LinkConfig>> {
    let content = match read_file(fs, &root.join(CONFIG_FILE_NAME)) {
        Ok(content) => content,
        Err(LinkError::FileRead { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            return Ok(None)
        }
        Err(e) => return Err(e),
    };
    LinkConfig::from_yaml(&content).map(Some)
}
