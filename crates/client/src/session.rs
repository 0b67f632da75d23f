//! Persistent session storage and the shared session context.
//!
//! The store is a small JSON file holding the token, the operator name and
//! the theme choice. It is read once at startup into a [`SessionContext`];
//! every later change goes through the context, which writes it back.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::Mutex;

use rubberwatch_core::session::{Session, StoredState};
use rubberwatch_core::theme::ThemeMode;

use crate::error::ClientError;

/// JSON file backing the session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored state. A missing file is an empty state; an
    /// unreadable one is logged and treated as empty.
    pub async fn load(&self) -> Result<StoredState, ClientError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StoredState::default()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice(&raw) {
            Ok(state) => Ok(state),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring corrupt session file");
                Ok(StoredState::default())
            }
        }
    }

    /// Write `state`, replacing the file atomically.
    ///
    /// Each save goes through its own temporary file, so two saves never
    /// share a half-written file. Ordering between saves is up to the caller.
    pub async fn save(&self, state: &StoredState) -> Result<(), ClientError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let tmp = self
            .path
            .with_extension(format!("json.{}.tmp", uuid::Uuid::new_v4().simple()));
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(state)?).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

/// The single session shared by the router and the upstream client.
///
/// Reads are synchronous. Changes are serialised through `writes`, held from
/// the in-memory update until the file is written, so the file always ends
/// up holding the latest state.
#[derive(Debug, Clone)]
pub struct SessionContext {
    state: Arc<RwLock<StoredState>>,
    writes: Arc<Mutex<()>>,
    store: Option<SessionStore>,
}

impl SessionContext {
    /// Load the persisted session once.
    pub async fn open(store: SessionStore) -> Result<Self, ClientError> {
        let state = store.load().await?;
        tracing::info!(
            path = %store.path().display(),
            authenticated = state.session().is_some(),
            "Session loaded"
        );
        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            writes: Arc::new(Mutex::new(())),
            store: Some(store),
        })
    }

    /// A context that is never persisted.
    pub fn in_memory(state: StoredState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
            writes: Arc::new(Mutex::new(())),
            store: None,
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.read().session()
    }

    pub fn token(&self) -> Option<String> {
        self.current().map(|s| s.token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    pub fn theme(&self) -> ThemeMode {
        self.read().theme_mode
    }

    pub async fn sign_in(&self, session: &Session) -> Result<(), ClientError> {
        self.update(|state| state.sign_in(session)).await?;
        tracing::info!(user = %session.name, "Signed in");
        Ok(())
    }

    pub async fn sign_out(&self) -> Result<(), ClientError> {
        self.update(StoredState::sign_out).await?;
        tracing::info!("Signed out");
        Ok(())
    }

    pub async fn set_theme(&self, mode: ThemeMode) -> Result<ThemeMode, ClientError> {
        self.update(|state| state.theme_mode = mode).await?;
        Ok(mode)
    }

    pub async fn toggle_theme(&self) -> Result<ThemeMode, ClientError> {
        let state = self
            .update(|state| state.theme_mode = state.theme_mode.toggled())
            .await?;
        Ok(state.theme_mode)
    }

    /// Apply `change` and persist the result before the next change starts.
    async fn update<F>(&self, change: F) -> Result<StoredState, ClientError>
    where
        F: FnOnce(&mut StoredState),
    {
        let _writing = self.writes.lock().await;
        let snapshot = {
            let mut state = self.write();
            change(&mut *state);
            state.clone()
        };
        if let Some(store) = &self.store {
            store.save(&snapshot).await?;
        }
        Ok(snapshot)
    }

    // Writers only replace whole fields, so a poisoned state is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, StoredState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoredState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}
