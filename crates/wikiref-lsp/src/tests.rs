use crate::conversion::{link_diagnostic_to_lsp, uri_to_document_path, DIAGNOSTIC_SOURCE};
use crate::handlers;
use crate::state::GlobalState;
use crate::Backend;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tower_lsp::lsp_types::*;
use tower_lsp::LspService;
use wikiref_core::model::FileEntry;
use wikiref_core::{annotate, LinkConfig, PhysicalFileSystem, ProjectListing};

async fn setup_test_context() -> (GlobalState, TempDir, tower_lsp::Client) {
    let fs = Arc::new(PhysicalFileSystem);
    let (service, _) = LspService::new(|client| Backend::new(client, fs.clone()));
    let client = service.inner().client.clone();
    let state = service.inner().state.clone();
    let temp_dir = TempDir::new().unwrap();

    (state, temp_dir, client)
}

#[allow(deprecated)]
fn create_initialize_params(root_uri: Url) -> InitializeParams {
    InitializeParams {
        process_id: None,
        root_path: None,
        root_uri: Some(root_uri),
        initialization_options: None,
        capabilities: ClientCapabilities::default(),
        trace: None,
        workspace_folders: None,
        client_info: None,
        locale: None,
    }
}

async fn initialize(state: &GlobalState, temp_dir: &TempDir, client: &tower_lsp::Client) {
    let params = create_initialize_params(Url::from_file_path(temp_dir.path()).unwrap());
    handlers::handle_initialize(client, state, params)
        .await
        .unwrap();
}

fn open_params(uri: Url, text: &str) -> DidOpenTextDocumentParams {
    DidOpenTextDocumentParams {
        text_document: TextDocumentItem {
            uri,
            language_id: "markdown".to_string(),
            version: 1,
            text: text.to_string(),
        },
    }
}

#[tokio::test]
async fn test_lsp_initialize_scans_project() {
    let (state, temp_dir, client) = setup_test_context().await;

    fs::create_dir_all(temp_dir.path().join("docs")).unwrap();
    fs::write(temp_dir.path().join("docs/a.md"), "[[b]]").unwrap();
    fs::write(temp_dir.path().join("docs/b.md"), "# B").unwrap();
    fs::create_dir_all(temp_dir.path().join("node_modules/pkg")).unwrap();
    fs::write(temp_dir.path().join("node_modules/pkg/readme.md"), "").unwrap();

    let params = create_initialize_params(Url::from_file_path(temp_dir.path()).unwrap());
    let result = handlers::handle_initialize(&client, &state, params)
        .await
        .unwrap();

    assert_eq!(
        result.capabilities.text_document_sync,
        Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL))
    );

    let project_lock = state.project.read().await;
    let listing = project_lock.as_ref().unwrap();
    let paths: Vec<&str> = listing.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["docs/a.md", "docs/b.md"]);
}

#[tokio::test]
async fn test_initialize_loads_config_file() {
    let (state, temp_dir, client) = setup_test_context().await;
    fs::write(
        temp_dir.path().join(handlers::CONFIG_FILE_NAME),
        "github_wiki_link_format: true\nmissing_target_class: broken\n",
    )
    .unwrap();

    initialize(&state, &temp_dir, &client).await;

    let config = state.config.read().await;
    assert!(config.github_wiki_link_format);
    assert_eq!(config.missing_target_class, "broken");
    assert!(config.validate_links);
}

#[tokio::test]
async fn test_broken_config_file_keeps_defaults() {
    let (state, temp_dir, client) = setup_test_context().await;
    fs::write(
        temp_dir.path().join(handlers::CONFIG_FILE_NAME),
        "validate_links: [not, a, bool]\n",
    )
    .unwrap();

    initialize(&state, &temp_dir, &client).await;

    assert_eq!(*state.config.read().await, LinkConfig::default());
    assert!(state.project.read().await.is_some());
}

#[tokio::test]
async fn test_did_open_and_close_track_documents() {
    let (state, temp_dir, client) = setup_test_context().await;
    let note_path = temp_dir.path().join("index.md");
    fs::write(&note_path, "[[Missing]]").unwrap();
    initialize(&state, &temp_dir, &client).await;

    let uri = Url::from_file_path(&note_path).unwrap();
    handlers::handle_did_open(&client, &state, open_params(uri.clone(), "[[Missing]]")).await;
    assert_eq!(
        state.document_cache.read().await.get(&uri).map(String::as_str),
        Some("[[Missing]]")
    );

    handlers::handle_did_change(
        &client,
        &state,
        DidChangeTextDocumentParams {
            text_document: VersionedTextDocumentIdentifier {
                uri: uri.clone(),
                version: 2,
            },
            content_changes: vec![TextDocumentContentChangeEvent {
                range: None,
                range_length: None,
                text: "[[index]]".to_string(),
            }],
        },
    )
    .await;
    assert_eq!(
        state.document_cache.read().await.get(&uri).map(String::as_str),
        Some("[[index]]")
    );

    handlers::handle_did_close(
        &client,
        &state,
        DidCloseTextDocumentParams {
            text_document: TextDocumentIdentifier { uri: uri.clone() },
        },
    )
    .await;
    assert!(state.document_cache.read().await.is_empty());
}

#[tokio::test]
async fn test_watched_files_update_listing() {
    let (state, temp_dir, client) = setup_test_context().await;
    let old_path = temp_dir.path().join("old.md");
    fs::write(&old_path, "").unwrap();
    initialize(&state, &temp_dir, &client).await;

    let new_path = temp_dir.path().join("new.md");
    fs::write(&new_path, "").unwrap();
    fs::remove_file(&old_path).unwrap();

    handlers::handle_did_change_watched_files(
        &client,
        &state,
        DidChangeWatchedFilesParams {
            changes: vec![
                FileEvent {
                    uri: Url::from_file_path(&new_path).unwrap(),
                    typ: FileChangeType::CREATED,
                },
                FileEvent {
                    uri: Url::from_file_path(&old_path).unwrap(),
                    typ: FileChangeType::DELETED,
                },
            ],
        },
    )
    .await;

    let project_lock = state.project.read().await;
    let listing = project_lock.as_ref().unwrap();
    assert!(listing.contains("new.md"));
    assert!(!listing.contains("old.md"));
}

#[tokio::test]
async fn test_watched_files_respect_ignore_patterns() {
    let (state, temp_dir, client) = setup_test_context().await;
    fs::write(temp_dir.path().join("a.md"), "").unwrap();
    initialize(&state, &temp_dir, &client).await;

    let ignored = temp_dir.path().join("node_modules/pkg/readme.md");
    fs::create_dir_all(ignored.parent().unwrap()).unwrap();
    fs::write(&ignored, "").unwrap();
    let new_dir = temp_dir.path().join("newdir");
    fs::create_dir_all(&new_dir).unwrap();
    fs::write(new_dir.join("b.md"), "").unwrap();

    handlers::handle_did_change_watched_files(
        &client,
        &state,
        DidChangeWatchedFilesParams {
            changes: vec![
                FileEvent {
                    uri: Url::from_file_path(&ignored).unwrap(),
                    typ: FileChangeType::CREATED,
                },
                FileEvent {
                    uri: Url::from_file_path(&new_dir).unwrap(),
                    typ: FileChangeType::CREATED,
                },
            ],
        },
    )
    .await;

    let project_lock = state.project.read().await;
    let paths: Vec<&str> = project_lock
        .as_ref()
        .unwrap()
        .files
        .iter()
        .map(|f| f.path.as_str())
        .collect();
    assert_eq!(paths, vec!["a.md", "newdir/b.md"]);
}

#[tokio::test]
async fn test_watched_config_file_is_reloaded() {
    let (state, temp_dir, client) = setup_test_context().await;
    initialize(&state, &temp_dir, &client).await;

    let config_path = temp_dir.path().join(handlers::CONFIG_FILE_NAME);
    fs::write(&config_path, "validate_links: false\n").unwrap();
    handlers::handle_did_change_watched_files(
        &client,
        &state,
        DidChangeWatchedFilesParams {
            changes: vec![FileEvent {
                uri: Url::from_file_path(&config_path).unwrap(),
                typ: FileChangeType::CREATED,
            }],
        },
    )
    .await;

    assert!(!state.config.read().await.validate_links);
}

#[tokio::test]
async fn test_configuration_change_replaces_config() {
    let (state, temp_dir, client) = setup_test_context().await;
    initialize(&state, &temp_dir, &client).await;

    handlers::handle_did_change_configuration(
        &client,
        &state,
        DidChangeConfigurationParams {
            settings: serde_json::json!({
                "wikiref": { "githubWikiLinkFormat": true, "validateLinks": false }
            }),
        },
    )
    .await;

    let config = state.config.read().await;
    assert!(config.github_wiki_link_format);
    assert!(!config.validate_links);
}

#[tokio::test]
async fn test_configuration_change_rescans_on_new_ignores() {
    let (state, temp_dir, client) = setup_test_context().await;
    fs::create_dir_all(temp_dir.path().join("drafts")).unwrap();
    fs::write(temp_dir.path().join("drafts/wip.md"), "").unwrap();
    fs::write(temp_dir.path().join("index.md"), "").unwrap();
    initialize(&state, &temp_dir, &client).await;
    assert!(state.project.read().await.as_ref().unwrap().contains("drafts/wip.md"));

    handlers::handle_did_change_configuration(
        &client,
        &state,
        DidChangeConfigurationParams {
            settings: serde_json::json!({ "wikiref": { "ignorePatterns": ["drafts"] } }),
        },
    )
    .await;

    let project_lock = state.project.read().await;
    let listing = project_lock.as_ref().unwrap();
    assert!(!listing.contains("drafts/wip.md"));
    assert!(listing.contains("index.md"));
}

#[tokio::test]
async fn test_unrelated_settings_are_ignored() {
    let (state, _temp_dir, client) = setup_test_context().await;

    handlers::handle_did_change_configuration(
        &client,
        &state,
        DidChangeConfigurationParams {
            settings: serde_json::json!({ "other": { "validateLinks": false } }),
        },
    )
    .await;

    assert!(state.config.read().await.validate_links);
}

#[test]
fn test_compute_diagnostics_reports_unresolved_link() {
    let files = vec![FileEntry::new("docs/a.md"), FileEntry::new("docs/b.md")];
    let config = LinkConfig::default();

    let diagnostics = handlers::compute_diagnostics(
        "ok [[b]]\nbad [[Missing]]",
        Some("docs/a.md".to_string()),
        &files,
        &config,
    )
    .unwrap();

    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.severity, Some(DiagnosticSeverity::ERROR));
    assert_eq!(diagnostic.source.as_deref(), Some(DIAGNOSTIC_SOURCE));
    assert_eq!(diagnostic.range.start, Position::new(1, 4));
    assert_eq!(diagnostic.range.end, Position::new(1, 15));

    let data = diagnostic.data.as_ref().unwrap();
    assert_eq!(data["fixes"][0]["kind"], "create_page");
    assert_eq!(data["fixes"][0]["file_name"], "Missing.md");
    assert_eq!(data["candidates"], serde_json::json!(["docs/a.md", "docs/b.md"]));
}

#[test]
fn test_ambiguous_link_is_a_warning() {
    let files = vec![
        FileEntry::new("guides/Setup.md"),
        FileEntry::new("notes/Setup.md"),
    ];
    let diagnostics =
        annotate("[[Setup]]", &"index.md", &files, &LinkConfig::default()).unwrap();

    let diagnostic = link_diagnostic_to_lsp(&diagnostics[0]);

    assert_eq!(diagnostic.severity, Some(DiagnosticSeverity::WARNING));
    assert_eq!(diagnostic.message, "Ambiguous reference, 2 files match");
}

#[test]
fn test_document_path_is_relative_to_root() {
    let temp_dir = TempDir::new().unwrap();
    let listing = ProjectListing::new(temp_dir.path(), vec![]);

    let inside = Url::from_file_path(temp_dir.path().join("docs/a.md")).unwrap();
    assert_eq!(
        uri_to_document_path(&inside, Some(&listing)).as_deref(),
        Some("docs/a.md")
    );

    let untitled = Url::parse("untitled:Untitled-1").unwrap();
    assert_eq!(uri_to_document_path(&untitled, Some(&listing)), None);
    assert_eq!(uri_to_document_path(&inside, None), None);
}
