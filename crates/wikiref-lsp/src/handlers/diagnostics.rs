use crate::conversion::{link_diagnostic_to_lsp, uri_to_document_path};
use crate::state::GlobalState;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;
use wikiref_core::model::FileEntry;
use wikiref_core::{annotate, LinkConfig, ProjectFiles};

/// Link diagnostics for one document, already in LSP form
pub fn compute_diagnostics(
    text: &str,
    document: Option<String>,
    files: &dyn ProjectFiles,
    config: &LinkConfig,
) -> wikiref_core::Result<Vec<Diagnostic>> {
    let diagnostics = annotate(text, &document, files, config)?;
    Ok(diagnostics.iter().map(link_diagnostic_to_lsp).collect())
}

/// Check the cached text of `uri` and publish the result
pub async fn publish_diagnostics(client: &Client, state: &GlobalState, uri: Url) {
    let Some(text) = state.document_cache.read().await.get(&uri).cloned() else {
        return;
    };

    let result = {
        let project = state.project.read().await;
        let config = state.config.read().await;
        let no_files: Vec<FileEntry> = Vec::new();
        let files: &dyn ProjectFiles = match project.as_ref() {
            Some(listing) => listing,
            None => &no_files,
        };
        let document = uri_to_document_path(&uri, project.as_ref());
        compute_diagnostics(&text, document, files, &config)
    };

    match result {
        Ok(diagnostics) => client.publish_diagnostics(uri, diagnostics, None).await,
        Err(e) => {
            log::warn!("Link check failed for {}: {}", uri, e);
            client
                .log_message(
                    MessageType::ERROR,
                    format!("Failed to check links in {}: {}", uri, e),
                )
                .await;
        }
    }
}

/// Re-check every open document, after the listing or the settings changed
pub async fn publish_open_documents(client: &Client, state: &GlobalState) {
    let uris: Vec<Url> = state.document_cache.read().await.keys().cloned().collect();
    for uri in uris {
        publish_diagnostics(client, state, uri).await;
    }
}
