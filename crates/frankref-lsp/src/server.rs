//! frankref Language Server
//!
//! Keeps the workspace registry in sync with open buffers and files on disk,
//! and publishes reference diagnostics for every open configuration file.
//!
//! # Usage
//!
//! ```bash
//! # Start the language server (typically called by an editor)
//! frankref-lsp
//!
//! # With debug logging
//! RUST_LOG=debug frankref-lsp
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    DidChangeTextDocumentParams, DidChangeWatchedFilesParams,
    DidChangeWatchedFilesRegistrationOptions, DidCloseTextDocumentParams,
    DidOpenTextDocumentParams, DidSaveTextDocumentParams, FileChangeType, FileSystemWatcher,
    GlobPattern, InitializeParams, InitializeResult, InitializedParams, MessageType,
    NumberOrString, Position, Range, Registration, ServerCapabilities, ServerInfo,
    TextDocumentSyncCapability, TextDocumentSyncKind, Url,
};
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity};
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, info, warn};

use frankref_core::diagnostics::{Diagnostic as FrankDiagnostic, Severity};
use frankref_core::{Document, DocumentId, LineIndex};

use crate::config::Settings;
use crate::session::{Session, ValidationPass};
use crate::validation::ValidationEngine;
use crate::workspace::{load_documents, DiskFiles, WorkspaceFiles};

/// Diagnostic source reported to the client
const SOURCE: &str = "frankref";

/// Registration id of the configuration file watcher
const WATCHER_ID: &str = "frankref-xml-watcher";

/// LSP Backend state
struct Backend {
    /// LSP client for sending notifications
    client: Client,
    /// Open documents, workspace index and registry
    session: Arc<Session>,
    /// Settings loaded from the workspace root
    settings: RwLock<Settings>,
    /// Workspace root, if the client sent one
    root: RwLock<Option<PathBuf>>,
    /// Serializes the currency check with the publish notification
    publish_lock: Mutex<()>,
}

impl Backend {
    /// Create a new backend instance
    fn new(client: Client) -> Self {
        Self {
            client,
            session: Arc::new(Session::default()),
            settings: RwLock::new(Settings::default()),
            root: RwLock::new(None),
            publish_lock: Mutex::new(()),
        }
    }

    /// Validate one open document and publish the result if still current
    async fn validate(&self, id: &DocumentId) {
        let Some(pass) = self.session.validate(id) else {
            return;
        };
        let Ok(uri) = Url::parse(id.as_str()) else {
            warn!("Cannot publish diagnostics for non-URI document {}", id);
            return;
        };

        let diagnostics = to_lsp_diagnostics(&pass);

        let _guard = self.publish_lock.lock().await;
        if !self.session.is_current(&pass) {
            debug!(
                "Dropping stale pass for {} (version {}, generation {})",
                id, pass.version, pass.generation
            );
            return;
        }
        debug!("Publishing {} diagnostics for {}", diagnostics.len(), uri);
        self.client
            .publish_diagnostics(uri, diagnostics, Some(pass.version))
            .await;
    }

    /// Revalidate every open document against the current registry
    async fn validate_open_documents(&self) {
        for id in self.session.open_documents() {
            self.validate(&id).await;
        }
    }

    /// Revalidate after an event on `id`
    async fn after_change(&self, id: &DocumentId, registry_changed: bool) {
        if registry_changed {
            self.validate_open_documents().await;
        } else {
            self.validate(id).await;
        }
    }

    /// Check whether a file on disk is part of the workspace
    async fn is_workspace_file(&self, path: &std::path::Path) -> bool {
        let Some(root) = self.root.read().await.clone() else {
            return false;
        };
        let settings = self.settings.read().await;
        match DiskFiles::from_settings(root, &settings.workspace).includes(path) {
            Ok(included) => included,
            Err(e) => {
                warn!("Invalid workspace patterns: {}", e);
                false
            }
        }
    }

    /// Read a workspace file from disk, if it still exists and belongs to the workspace
    async fn read_workspace_file(&self, uri: &Url) -> Option<Document> {
        let path = uri.to_file_path().ok()?;
        if !self.is_workspace_file(&path).await {
            return None;
        }
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Some(Document::new(uri.as_str(), text)),
            Err(e) => {
                debug!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Scan the workspace root and seed the index
    async fn index_workspace(&self) {
        let Some(root) = self.root.read().await.clone() else {
            info!("No workspace root; indexing open documents only");
            return;
        };
        let files = DiskFiles::from_settings(root, &self.settings.read().await.workspace);

        let loaded = tokio::task::spawn_blocking(move || {
            let files: &dyn WorkspaceFiles = &files;
            load_documents(files)
        })
        .await;

        let documents = match loaded {
            Ok(Ok(files)) => files.into_iter().map(|f| f.document).collect(),
            Ok(Err(e)) => {
                warn!("Workspace scan failed: {}", e);
                self.client
                    .log_message(MessageType::WARNING, format!("frankref: {e}"))
                    .await;
                return;
            }
            Err(e) => {
                warn!("Workspace scan task failed: {}", e);
                return;
            }
        };

        let generation = self.session.seed(documents);
        info!("Workspace indexed, registry generation {}", generation);
    }

    /// Ask the client to report changes to configuration files
    async fn register_file_watcher(&self) {
        let options = DidChangeWatchedFilesRegistrationOptions {
            watchers: vec![FileSystemWatcher {
                glob_pattern: GlobPattern::String("**/*.xml".to_string()),
                kind: None,
            }],
        };
        let register_options = match serde_json::to_value(options) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to encode watcher options: {}", e);
                return;
            }
        };

        let registration = Registration {
            id: WATCHER_ID.to_string(),
            method: "workspace/didChangeWatchedFiles".to_string(),
            register_options: Some(register_options),
        };
        if let Err(e) = self.client.register_capability(vec![registration]).await {
            warn!("Client refused file watcher registration: {}", e);
        }
    }
}

/// Root directory from the initialize request
fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
    let folder_uri = params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .map(|folder| &folder.uri);

    #[allow(deprecated)]
    let uri = folder_uri.or(params.root_uri.as_ref())?;
    uri.to_file_path().ok()
}

/// Convert a validation pass to LSP diagnostics
fn to_lsp_diagnostics(pass: &ValidationPass) -> Vec<Diagnostic> {
    let index = LineIndex::new(&pass.document.text);
    pass.diagnostics
        .iter()
        .map(|d| convert_diagnostic(d, &index))
        .collect()
}

/// Convert a frankref diagnostic to an LSP diagnostic
fn convert_diagnostic(diag: &FrankDiagnostic, index: &LineIndex<'_>) -> Diagnostic {
    let severity = match diag.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Info => DiagnosticSeverity::INFORMATION,
        Severity::Hint => DiagnosticSeverity::HINT,
    };

    let position = |offset| {
        let pos = index.position(offset);
        Position::new(pos.line as u32, pos.utf16_column as u32)
    };

    Diagnostic {
        range: Range {
            start: position(diag.range.start),
            end: position(diag.range.end),
        },
        severity: Some(severity),
        code: diag.code().map(|c| NumberOrString::String(c.to_string())),
        source: Some(SOURCE.to_string()),
        message: diag.message.clone(),
        ..Default::default()
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("frankref LSP server initializing");

        let root = workspace_root(&params);
        let settings = match &root {
            Some(root) => Settings::discover(root).unwrap_or_else(|e| {
                warn!("{}; using default settings", e);
                Settings::default()
            }),
            None => Settings::default(),
        };

        self.session
            .set_engine(ValidationEngine::with_settings(&settings.rules));
        *self.settings.write().await = settings;
        *self.root.write().await = root;

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "frankref-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("frankref LSP server initialized");
        self.index_workspace().await;
        self.register_file_watcher().await;
        self.validate_open_documents().await;
        self.client
            .log_message(MessageType::INFO, "frankref language server ready")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("frankref LSP server shutting down");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let item = params.text_document;
        debug!("Document opened: {}", item.uri);

        if !self
            .settings
            .read()
            .await
            .workspace
            .accepts_language(&item.language_id)
        {
            debug!("Ignoring {} document {}", item.language_id, item.uri);
            return;
        }

        let document = Document::new(item.uri.as_str(), item.text);
        let id = document.id.clone();
        if let Some(changed) = self.session.update(document, item.version) {
            self.after_change(&id, changed).await;
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        debug!("Document changed: {}", params.text_document.uri);
        let id = DocumentId::from(params.text_document.uri.as_str());
        if !self.session.is_open(&id) {
            return;
        }

        // Since we use FULL sync, the last change holds the entire content
        if let Some(change) = params.content_changes.into_iter().last() {
            let document = Document::new(id.clone(), change.text);
            if let Some(changed) = self
                .session
                .update(document, params.text_document.version)
            {
                self.after_change(&id, changed).await;
            }
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        debug!("Document saved: {}", params.text_document.uri);
        let id = DocumentId::from(params.text_document.uri.as_str());
        self.validate(&id).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        debug!("Document closed: {}", uri);
        let id = DocumentId::from(uri.as_str());
        if !self.session.is_open(&id) {
            return;
        }

        let on_disk = self.read_workspace_file(&uri).await;
        let changed = self.session.close(&id, on_disk);

        // Clear diagnostics for closed document
        {
            let _guard = self.publish_lock.lock().await;
            self.client.publish_diagnostics(uri, vec![], None).await;
        }

        if changed {
            self.validate_open_documents().await;
        }
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        let mut changed = false;

        for event in params.changes {
            let id = DocumentId::from(event.uri.as_str());
            if event.typ == FileChangeType::DELETED {
                debug!("Workspace file deleted: {}", event.uri);
                changed |= self.session.file_deleted(&id);
            } else if let Some(document) = self.read_workspace_file(&event.uri).await {
                debug!("Workspace file changed: {}", event.uri);
                changed |= self.session.file_changed(document);
            }
        }

        if changed {
            self.validate_open_documents().await;
        }
    }
}

/// Run the language server on stdin/stdout
pub async fn run_server() {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting frankref Language Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Create LSP service
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
