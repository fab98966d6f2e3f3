use crate::handlers::{publish_open_documents, scan_project};
use crate::state::GlobalState;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;
use wikiref_core::LinkConfig;

/// Key of this server's section in the client settings
pub const SETTINGS_SECTION: &str = "wikiref";

pub async fn handle_did_change_configuration(
    client: &Client,
    state: &GlobalState,
    params: DidChangeConfigurationParams,
) {
    let serde_json::Value::Object(map) = params.settings else {
        return;
    };
    let Some(settings) = map.get(SETTINGS_SECTION) else {
        return;
    };

    let new_config = match LinkConfig::from_json_value(settings.clone()) {
        Ok(config) => config,
        Err(e) => {
            client
                .log_message(
                    MessageType::ERROR,
                    format!("Failed to parse updated settings: {}", e),
                )
                .await;
            return;
        }
    };

    let ignore_changed = {
        let mut config_lock = state.config.write().await;
        let changed = config_lock.ignore_patterns != new_config.ignore_patterns;
        *config_lock = new_config;
        changed
    };
    client
        .log_message(MessageType::INFO, "Link settings updated")
        .await;

    // Ignored directories decide what the listing holds
    if ignore_changed {
        let root = state.project.read().await.as_ref().map(|l| l.root.clone());
        if let Some(root) = root {
            let ignore = state.config.read().await.ignore_patterns.clone();
            match scan_project(state, root, ignore).await {
                Ok(listing) => *state.project.write().await = Some(listing),
                Err(e) => log::error!("{}", e),
            }
        }
    }

    publish_open_documents(client, state).await;
}
