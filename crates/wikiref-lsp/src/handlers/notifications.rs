use crate::handlers::{
    publish_diagnostics, publish_open_documents, reload_config_file, CONFIG_FILE_NAME,
};
use crate::state::GlobalState;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;

/// Handle "textDocument/didOpen" notification
pub async fn handle_did_open(
    client: &Client,
    state: &GlobalState,
    params: DidOpenTextDocumentParams,
) {
    let uri = params.text_document.uri;

    // Update document cache
    {
        let mut cache = state.document_cache.write().await;
        cache.insert(uri.clone(), params.text_document.text);
    }

    publish_diagnostics(client, state, uri).await;
}

/// Handle "textDocument/didChange" notification
pub async fn handle_did_change(
    client: &Client,
    state: &GlobalState,
    params: DidChangeTextDocumentParams,
) {
    let uri = params.text_document.uri;

    // Full sync: the last change carries the whole text
    if let Some(last_change) = params.content_changes.into_iter().last() {
        {
            let mut cache = state.document_cache.write().await;
            cache.insert(uri.clone(), last_change.text);
        }

        publish_diagnostics(client, state, uri).await;
    }
}

/// Handle "textDocument/didClose" notification
pub async fn handle_did_close(
    client: &Client,
    state: &GlobalState,
    params: DidCloseTextDocumentParams,
) {
    let uri = params.text_document.uri;
    {
        let mut cache = state.document_cache.write().await;
        cache.remove(&uri);
    }
    client.publish_diagnostics(uri, Vec::new(), None).await;
}

/// Handle "workspace/didChangeWatchedFiles" notification
pub async fn handle_did_change_watched_files(
    client: &Client,
    state: &GlobalState,
    params: DidChangeWatchedFilesParams,
) {
    let mut config_changed = false;
    let ignore = state.config.read().await.ignore_patterns.clone();
    {
        let mut project_lock = state.project.write().await;
        let Some(listing) = &mut *project_lock else {
            return;
        };

        for change in params.changes {
            let Ok(path) = change.uri.to_file_path() else {
                continue;
            };
            if path.parent() == Some(listing.root.as_path())
                && path.file_name().is_some_and(|name| name == CONFIG_FILE_NAME)
            {
                config_changed = true;
            }
            match change.typ {
                FileChangeType::CREATED => listing.insert(state.fs.as_ref(), &path, &ignore),
                FileChangeType::DELETED => listing.remove(&path),
                _ => {}
            }
        }
    }

    if config_changed {
        let root = state.project.read().await.as_ref().map(|l| l.root.clone());
        if let Some(root) = root {
            reload_config_file(client, state, &root).await;
        }
    }

    publish_open_documents(client, state).await;
}
