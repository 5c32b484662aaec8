//! Main shell state container
//!
//! The shell owns all state; the presentation layer is purely a
//! renderer. Each window maps to a session whose live tab collection is
//! held here and written back to storage after every mutation.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use url::Url;

use vellum_attestation::{
    check_connect_attestation, AttestationClient, AttestationSigner, ConnectAttestation,
};
use vellum_documents::Document;
use vellum_session::SessionManager;
use vellum_storage::Database;
use vellum_tabs::{
    handle_drag_end, handle_root_drop, reorder, CollectionHandle, DragEndEvent, DropPayload,
    DropPosition, Tab, ViewportBounds,
};

use crate::config::Config;
use crate::error::CoreError;
use crate::recent::RecentDocuments;
use crate::Result;

const MAX_RECENTLY_CLOSED: usize = 20;

#[derive(Debug, Clone)]
struct ClosedTab {
    session_id: String,
    token: String,
    index: usize,
}

/// Result of a connect attestation lookup.
#[derive(Debug, Clone)]
pub struct ConnectStatus {
    pub attestation: Option<ConnectAttestation>,
    pub valid: bool,
}

/// Main shell instance
///
/// Central state container for the whole application. All state flows
/// through here; windows render what it reports.
pub struct Shell {
    /// Configuration
    config: Config,
    /// Database
    db: Database,
    /// Session manager (persisted window tab sets)
    session_manager: SessionManager,
    /// Attestation adapter
    attestation_client: AttestationClient,
    /// Recently opened documents
    recent_documents: RecentDocuments,
    /// Live collections per session
    collections: Arc<RwLock<HashMap<String, CollectionHandle>>>,
    recently_closed_tabs: Arc<RwLock<Vec<ClosedTab>>>,
}

impl Shell {
    /// Initialize a new shell instance
    pub fn new(config: Config) -> Result<Self> {
        // Ensure data directories exist
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::create_dir_all(&config.documents_dir)?;

        // Open database
        let db = Database::open(&config.database_path)?;

        let endpoint = Url::parse(&config.attestation_endpoint)
            .map_err(|e| CoreError::Config(format!("Invalid attestation endpoint: {e}")))?;
        let attestation_client =
            AttestationClient::new(endpoint).with_schema(config.attestation_schema_uid.clone());

        let session_manager = SessionManager::new(db.clone());
        let recent_documents = RecentDocuments::new(db.clone());

        Ok(Self {
            config,
            db,
            session_manager,
            attestation_client,
            recent_documents,
            collections: Arc::new(RwLock::new(HashMap::new())),
            recently_closed_tabs: Arc::new(RwLock::new(Vec::new())),
        })
    }

    /// Initialize shell state (load or create the active session)
    pub fn initialize(&self) -> Result<()> {
        self.session_manager.initialize()?;

        tracing::info!("Shell initialized");

        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn session_manager(&self) -> &SessionManager {
        &self.session_manager
    }

    pub fn attestation_client(&self) -> &AttestationClient {
        &self.attestation_client
    }

    pub fn recent_documents(&self) -> &RecentDocuments {
        &self.recent_documents
    }

    // === Collection lifecycle ===

    /// The live collection for a session, restored from storage on first
    /// access.
    pub fn open_collection(&self, session_id: &str) -> Result<CollectionHandle> {
        {
            let collections = self.collections.read();
            if let Some(handle) = collections.get(session_id) {
                return Ok(handle.clone());
            }
        }

        let collection = self.session_manager.load_collection(session_id)?;
        let mut collections = self.collections.write();
        let handle = collections
            .entry(session_id.to_string())
            .or_insert_with(|| CollectionHandle::new(collection));

        Ok(handle.clone())
    }

    /// Persist and dispose a session's live collection (window closed).
    pub fn close_collection(&self, session_id: &str) -> Result<()> {
        let handle = self.collections.write().remove(session_id);

        if let Some(handle) = handle {
            self.session_manager
                .save_collection(session_id, &handle.snapshot())?;
            handle.dispose();
        }

        Ok(())
    }

    fn persist(&self, session_id: &str, handle: &CollectionHandle) -> Result<()> {
        Ok(self
            .session_manager
            .save_collection(session_id, &handle.snapshot())?)
    }

    // === Tab operations ===

    pub fn tabs(&self, session_id: &str) -> Result<Vec<Tab>> {
        let handle = self.open_collection(session_id)?;
        Ok(handle.read(|collection| collection.items().to_vec()))
    }

    pub fn selected_tab(&self, session_id: &str) -> Result<Option<String>> {
        let handle = self.open_collection(session_id)?;
        Ok(handle.read(|collection| collection.selected_tab().map(str::to_string)))
    }

    /// Create an empty editor tab.
    pub fn create_tab(&self, session_id: &str, name: &str) -> Result<Tab> {
        let handle = self.open_collection(session_id)?;

        let tab = Tab::new(name);
        handle.mutate(|collection| {
            collection.add_tab(tab.clone());
            collection.set_selected_tab(&tab.id);
        });
        self.persist(session_id, &handle)?;

        tracing::info!(tab_id = %tab.id, session_id = %session_id, "Created new tab");

        Ok(tab)
    }

    /// Add an already-built tab (host push, detach landing).
    pub fn add_tab(&self, session_id: &str, tab: Tab) -> Result<()> {
        let handle = self.open_collection(session_id)?;

        handle.mutate(|collection| collection.add_tab(tab));
        self.persist(session_id, &handle)
    }

    /// Close a tab, remembering it for restore.
    pub fn close_tab(&self, session_id: &str, tab_id: &str) -> Result<()> {
        let handle = self.open_collection(session_id)?;

        let closing = handle.read(|collection| {
            collection
                .items()
                .iter()
                .position(|tab| tab.id == tab_id)
                .map(|index| (collection.items()[index].clone(), index))
        });

        if let Some((tab, index)) = closing {
            let token = tab.to_token()?;
            let mut stack = self.recently_closed_tabs.write();
            stack.push(ClosedTab {
                session_id: session_id.to_string(),
                token,
                index,
            });

            if stack.len() > MAX_RECENTLY_CLOSED {
                let overflow = stack.len() - MAX_RECENTLY_CLOSED;
                stack.drain(0..overflow);
            }
        }

        handle.mutate(|collection| collection.remove([tab_id]));
        self.persist(session_id, &handle)?;

        tracing::info!(tab_id = %tab_id, session_id = %session_id, "Closed tab");

        Ok(())
    }

    /// Reopen the most recently closed tab of this session at its old
    /// position.
    pub fn restore_last_closed_tab(&self, session_id: &str) -> Result<Option<Tab>> {
        let entry = {
            let mut stack = self.recently_closed_tabs.write();
            stack
                .iter()
                .rposition(|closed| closed.session_id == session_id)
                .map(|index| stack.remove(index))
        };

        let Some(closed) = entry else {
            return Ok(None);
        };

        let tab = Tab::from_token(&closed.token)?;
        let handle = self.open_collection(session_id)?;

        handle.mutate(|collection| {
            collection.insert_tab(tab.clone(), closed.index);
            collection.set_selected_tab(&tab.id);
        });
        self.persist(session_id, &handle)?;

        Ok(Some(tab))
    }

    pub fn select_tab(&self, session_id: &str, tab_id: &str) -> Result<bool> {
        let handle = self.open_collection(session_id)?;

        let selected = handle
            .mutate(|collection| collection.set_selected_tab(tab_id))
            .unwrap_or(false);
        self.persist(session_id, &handle)?;

        Ok(selected)
    }

    /// Apply a reorder drop.
    pub fn reorder_tabs(
        &self,
        session_id: &str,
        target: &str,
        position: DropPosition,
        keys: &[String],
    ) -> Result<()> {
        let handle = self.open_collection(session_id)?;

        handle.mutate(|collection| reorder(collection, target, position, keys));
        self.persist(session_id, &handle)
    }

    /// Apply a drop onto the tab strip; returns the file/directory
    /// payloads left for the file-opening layer.
    pub fn root_drop(
        &self,
        session_id: &str,
        payloads: Vec<DropPayload>,
    ) -> Result<Vec<DropPayload>> {
        let handle = self.open_collection(session_id)?;

        let unhandled = handle
            .mutate(|collection| handle_root_drop(collection, payloads))
            .unwrap_or_default();
        self.persist(session_id, &handle)?;

        Ok(unhandled)
    }

    /// Apply a drag end; a drag released outside the viewport detaches
    /// the dragged tabs. Returns what was removed.
    pub fn drag_end(
        &self,
        session_id: &str,
        event: &DragEndEvent,
        viewport: ViewportBounds,
    ) -> Result<Vec<Tab>> {
        let handle = self.open_collection(session_id)?;
        self.remember_viewport(viewport)?;

        let removed = handle
            .mutate(|collection| handle_drag_end(collection, event, viewport))
            .unwrap_or_default();

        if !removed.is_empty() {
            self.persist(session_id, &handle)?;
        }

        Ok(removed)
    }

    /// Remember the window extent the presentation layer reported, for
    /// sizing the next launch.
    pub fn remember_viewport(&self, viewport: ViewportBounds) -> Result<()> {
        self.db.set_setting(
            "viewport",
            &format!("{}x{}", viewport.width, viewport.height),
        )?;
        Ok(())
    }

    /// The last reported window extent, if any.
    pub fn last_viewport(&self) -> Result<Option<ViewportBounds>> {
        let Some(value) = self.db.get_setting("viewport")? else {
            return Ok(None);
        };

        let parsed = value.split_once('x').and_then(|(width, height)| {
            Some(ViewportBounds::new(
                width.parse().ok()?,
                height.parse().ok()?,
            ))
        });

        if parsed.is_none() {
            tracing::warn!(value = %value, "Ignoring unreadable viewport setting");
        }

        Ok(parsed)
    }

    // === Document operations ===

    /// Load a document from disk and open it in a new selected tab.
    pub fn open_document(&self, session_id: &str, path: &Path) -> Result<Tab> {
        let document = vellum_documents::load_document(path)?;

        self.recent_documents.touch(
            &path.display().to_string(),
            &document.name,
            document.document_type.as_str(),
        )?;

        let tab = Tab::for_document(
            document.name.clone(),
            document.document_type.as_str(),
            Some(path.to_path_buf()),
        );

        let handle = self.open_collection(session_id)?;
        handle.mutate(|collection| {
            collection.add_tab(tab.clone());
            collection.set_selected_tab(&tab.id);
        });
        self.persist(session_id, &handle)?;

        tracing::info!(
            document_id = %document.id,
            tab_id = %tab.id,
            "Opened document"
        );

        Ok(tab)
    }

    /// Save a document through the codec its type names.
    pub fn save_document(&self, document: &Document, path: &Path) -> Result<()> {
        vellum_documents::save_document(document, path)?;

        self.recent_documents.touch(
            &path.display().to_string(),
            &document.name,
            document.document_type.as_str(),
        )?;

        Ok(())
    }

    // === Attestation operations ===

    /// Look up the connect attestation for an address/key pair and judge
    /// its validity.
    pub async fn connect_status(&self, address: &str, public_key: &str) -> Result<ConnectStatus> {
        let attestation = self
            .attestation_client
            .connect_attestation(address, public_key)
            .await?;

        let valid = attestation
            .as_ref()
            .map(|a| check_connect_attestation(a, public_key))
            .unwrap_or(false);

        Ok(ConnectStatus { attestation, valid })
    }

    /// Create a connect attestation through the wallet bridge.
    pub async fn attest_connect<S: AttestationSigner>(
        &self,
        signer: &S,
        public_key: &str,
    ) -> Result<String> {
        Ok(self
            .attestation_client
            .attest_connect(signer, public_key)
            .await?)
    }

    /// Revoke a connect attestation through the wallet bridge.
    pub async fn revoke_connect<S: AttestationSigner>(
        &self,
        signer: &S,
        uid: &str,
    ) -> Result<()> {
        Ok(self
            .attestation_client
            .revoke_connect_attestation(signer, uid)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_shell(dir: &Path) -> Shell {
        let mut config = Config::new(dir.to_path_buf());
        config.documents_dir = dir.join("Documents");
        let shell = Shell::new(config).unwrap();
        shell.initialize().unwrap();
        shell
    }

    #[test]
    fn test_create_and_close_tab() {
        let dir = tempfile::tempdir().unwrap();
        let shell = test_shell(dir.path());
        let session = shell.session_manager().active_session().unwrap();

        let a = shell.create_tab(&session.id, "A").unwrap();
        let b = shell.create_tab(&session.id, "B").unwrap();

        assert_eq!(shell.tabs(&session.id).unwrap().len(), 2);
        assert_eq!(shell.selected_tab(&session.id).unwrap(), Some(b.id.clone()));

        shell.close_tab(&session.id, &b.id).unwrap();
        assert_eq!(shell.tabs(&session.id).unwrap().len(), 1);
        assert_eq!(shell.selected_tab(&session.id).unwrap(), Some(a.id));
    }

    #[test]
    fn test_restore_last_closed_tab() {
        let dir = tempfile::tempdir().unwrap();
        let shell = test_shell(dir.path());
        let session = shell.session_manager().active_session().unwrap();

        shell.create_tab(&session.id, "A").unwrap();
        let b = shell.create_tab(&session.id, "B").unwrap();
        shell.create_tab(&session.id, "C").unwrap();

        shell.close_tab(&session.id, &b.id).unwrap();
        assert_eq!(shell.tabs(&session.id).unwrap().len(), 2);

        let restored = shell.restore_last_closed_tab(&session.id).unwrap().unwrap();
        assert_eq!(restored.id, b.id);

        // Back at its old position
        let tabs = shell.tabs(&session.id).unwrap();
        assert_eq!(tabs[1].id, b.id);
    }

    #[test]
    fn test_restore_with_nothing_closed() {
        let dir = tempfile::tempdir().unwrap();
        let shell = test_shell(dir.path());
        let session = shell.session_manager().active_session().unwrap();

        assert!(shell.restore_last_closed_tab(&session.id).unwrap().is_none());
    }

    #[test]
    fn test_collection_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let session_id;
        let tab_id;

        {
            let shell = test_shell(dir.path());
            let session = shell.session_manager().active_session().unwrap();
            session_id = session.id.clone();

            let tab = shell.create_tab(&session.id, "A").unwrap();
            tab_id = tab.id;
        }

        let shell = test_shell(dir.path());
        let tabs = shell.tabs(&session_id).unwrap();
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs[0].id, tab_id);
        assert_eq!(shell.selected_tab(&session_id).unwrap(), Some(tab_id));
    }

    #[test]
    fn test_drag_out_detaches() {
        let dir = tempfile::tempdir().unwrap();
        let shell = test_shell(dir.path());
        let session = shell.session_manager().active_session().unwrap();

        let a = shell.create_tab(&session.id, "A").unwrap();
        shell.create_tab(&session.id, "B").unwrap();

        let removed = shell
            .drag_end(
                &session.id,
                &DragEndEvent {
                    keys: vec![a.id.clone()],
                    x: -50.0,
                    y: 10.0,
                },
                ViewportBounds::new(1280.0, 800.0),
            )
            .unwrap();

        assert_eq!(removed.len(), 1);
        assert_eq!(shell.tabs(&session.id).unwrap().len(), 1);
    }

    #[test]
    fn test_viewport_remembered() {
        let dir = tempfile::tempdir().unwrap();
        let shell = test_shell(dir.path());
        let session = shell.session_manager().active_session().unwrap();

        assert!(shell.last_viewport().unwrap().is_none());

        shell
            .drag_end(
                &session.id,
                &DragEndEvent {
                    keys: vec![],
                    x: 10.0,
                    y: 10.0,
                },
                ViewportBounds::new(1440.0, 900.0),
            )
            .unwrap();

        let viewport = shell.last_viewport().unwrap().unwrap();
        assert_eq!(viewport.width, 1440.0);
        assert_eq!(viewport.height, 900.0);
    }

    #[test]
    fn test_root_drop_foreign_token() {
        let dir = tempfile::tempdir().unwrap();
        let shell = test_shell(dir.path());
        let session = shell.session_manager().active_session().unwrap();

        let foreign = Tab::new("From another window");
        let unhandled = shell
            .root_drop(
                &session.id,
                vec![DropPayload::Text(foreign.to_token().unwrap())],
            )
            .unwrap();

        assert!(unhandled.is_empty());
        assert!(shell
            .tabs(&session.id)
            .unwrap()
            .iter()
            .any(|tab| tab.id == foreign.id));
    }

    #[test]
    fn test_open_and_save_document() {
        let dir = tempfile::tempdir().unwrap();
        let shell = test_shell(dir.path());
        let session = shell.session_manager().active_session().unwrap();

        let mut document =
            Document::new("FY24 Budget", vellum_documents::DocumentType::BudgetStatement);
        document.state = serde_json::json!({"lineItems": []});

        let path = dir.path().join("fy24.phd");
        shell.save_document(&document, &path).unwrap();

        let tab = shell.open_document(&session.id, &path).unwrap();
        assert_eq!(tab.name, "FY24 Budget");
        assert_eq!(
            shell.selected_tab(&session.id).unwrap(),
            Some(tab.id.clone())
        );

        let recent = shell.recent_documents().list().unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].path, path.display().to_string());
    }
}
