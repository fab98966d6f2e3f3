//! Wikiref LSP Library
//!
//! LSP protocol layer: keeps the project listing and open documents, and
//! publishes the core's link diagnostics.

use std::sync::Arc;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LspService};
use wikiref_core::{FileSystem, PhysicalFileSystem};

use crate::state::GlobalState;

mod conversion;
mod handlers;
mod state;
#[cfg(test)]
mod tests;

/// LSP backend implementation
pub struct Backend {
    client: Client,
    state: GlobalState,
}

impl Backend {
    pub fn new(client: Client, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            client,
            state: GlobalState::new(fs),
        }
    }
}

#[tower_lsp::async_trait]
impl tower_lsp::LanguageServer for Backend {
    async fn initialize(
        &self,
        params: InitializeParams,
    ) -> tower_lsp::jsonrpc::Result<InitializeResult> {
        handlers::handle_initialize(&self.client, &self.state, params).await
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "wikiref server initialized")
            .await;
    }

    async fn shutdown(&self) -> tower_lsp::jsonrpc::Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        handlers::handle_did_open(&self.client, &self.state, params).await
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        handlers::handle_did_change(&self.client, &self.state, params).await
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        handlers::handle_did_close(&self.client, &self.state, params).await
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        handlers::handle_did_change_watched_files(&self.client, &self.state, params).await
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        handlers::handle_did_change_configuration(&self.client, &self.state, params).await
    }
}

/// Create LSP service backed by the physical file system
pub fn create_lsp_service() -> (LspService<Backend>, tower_lsp::ClientSocket) {
    LspService::new(|client| Backend::new(client, Arc::new(PhysicalFileSystem)))
}
