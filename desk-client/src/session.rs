//! Session - current user and bearer token
//!
//! `SessionContext` is created once at start-up and cloned into every
//! consumer (HTTP wrapper, views). It owns the login / logout / expiry
//! lifecycle and broadcasts a [`SessionEvent`] on every transition so the UI
//! can react (e.g. route to the login screen on expiry) without the transport
//! layer knowing about navigation.

use serde::{Deserialize, Serialize};
use shared::models::User;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::ClientConfig;
use crate::error::{ClientError, ClientResult};

const EVENT_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Authenticated identity: the user plus the token every request carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "authToken")]
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(user: User, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}

/// Session lifecycle transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn(User),
    LoggedOut,
    /// A request was rejected with 401 and the session was dropped
    Expired,
}

// ============================================================================
// Persistence
// ============================================================================

/// Where `authToken` and `user` survive between runs
pub trait SessionStore: Send + Sync + fmt::Debug {
    fn load(&self) -> Result<Option<Session>, SessionError>;
    fn save(&self, session: &Session) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// Process-local store, nothing survives a restart
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// JSON file store: `{"authToken": "...", "user": {...}}`
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    file_path: PathBuf,
}

impl FileSessionStore {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        if !self.file_path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.file_path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        write_private(&self.file_path, content.as_bytes())?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.file_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The file carries a bearer token: owner read/write only on unix.
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        // mode() only applies on creation
        if path.exists() {
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }
    }
    let mut file = options.open(path)?;
    file.write_all(content)
}

// ============================================================================
// Context
// ============================================================================

struct SessionInner {
    current: RwLock<Option<Session>>,
    store: Box<dyn SessionStore>,
    events: broadcast::Sender<SessionEvent>,
}

/// Shared, cloneable handle to the session
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<SessionInner>,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .field("store", &self.inner.store)
            .finish()
    }
}

impl SessionContext {
    /// Create a context backed by `store`, restoring any persisted session.
    pub fn new(store: impl SessionStore + 'static) -> Self {
        let restored = match store.load() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Failed to restore session: {}", e);
                None
            }
        };
        if let Some(session) = &restored {
            tracing::info!(user_id = session.user.id, "Session restored");
        }

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(SessionInner {
                current: RwLock::new(restored),
                store: Box::new(store),
                events,
            }),
        }
    }

    /// In-memory context with no persisted state
    pub fn in_memory() -> Self {
        Self::new(MemorySessionStore::new())
    }

    /// File-backed when `config.session_file` is set, in-memory otherwise
    pub fn from_config(config: &ClientConfig) -> Self {
        match &config.session_file {
            Some(path) => Self::new(FileSessionStore::new(path)),
            None => Self::in_memory(),
        }
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Store user + token and announce the login.
    pub fn login(&self, user: User, token: impl Into<String>) {
        let session = Session::new(user.clone(), token);
        if let Err(e) = self.inner.store.save(&session) {
            tracing::warn!("Failed to persist session: {}", e);
        }
        *self.write() = Some(session);

        tracing::info!(user_id = user.id, role = %user.role, "Logged in");
        let _ = self.inner.events.send(SessionEvent::LoggedIn(user));
    }

    /// Clear the session on explicit user request.
    pub fn logout(&self) {
        self.clear();
        tracing::info!("Logged out");
        let _ = self.inner.events.send(SessionEvent::LoggedOut);
    }

    /// Drop the session after an authorization failure.
    ///
    /// Returns `false` if there was no session to drop; `Expired` is only
    /// broadcast once per session.
    pub fn invalidate(&self) -> bool {
        if self.clear().is_none() {
            return false;
        }
        tracing::warn!("Session invalidated by server");
        let _ = self.inner.events.send(SessionEvent::Expired);
        true
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    pub fn snapshot(&self) -> Option<Session> {
        self.read().clone()
    }

    /// Current user, or `InvalidState` when logged out.
    pub fn require_user(&self) -> ClientResult<User> {
        self.user()
            .ok_or_else(|| ClientError::InvalidState("Not authenticated".into()))
    }

    fn clear(&self) -> Option<Session> {
        let previous = self.write().take();
        if let Err(e) = self.inner.store.clear() {
            tracing::warn!("Failed to clear persisted session: {}", e);
        }
        previous
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Session>> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        self.inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::UserRole;

    fn agent() -> User {
        User {
            id: 42,
            email: "agent@desk.io".into(),
            first_name: "Ada".into(),
            last_name: "Agent".into(),
            role: UserRole::Agent,
            active: true,
        }
    }

    #[test]
    fn test_login_and_logout() {
        let ctx = SessionContext::in_memory();
        let mut events = ctx.subscribe();
        assert!(!ctx.is_authenticated());

        ctx.login(agent(), "tok-1");
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.token().as_deref(), Some("tok-1"));
        assert_eq!(ctx.user().map(|u| u.id), Some(42));
        assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedIn(agent()));

        ctx.logout();
        assert!(ctx.token().is_none());
        assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedOut);
        assert!(ctx.require_user().is_err());
    }

    #[test]
    fn test_invalidate_fires_once() {
        let ctx = SessionContext::in_memory();
        ctx.login(agent(), "tok-1");
        let mut events = ctx.subscribe();

        assert!(ctx.invalidate());
        assert!(!ctx.invalidate());
        assert_eq!(events.try_recv().unwrap(), SessionEvent::Expired);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_clones_share_state() {
        let ctx = SessionContext::in_memory();
        let other = ctx.clone();
        ctx.login(agent(), "tok-2");
        assert_eq!(other.token().as_deref(), Some("tok-2"));
        other.invalidate();
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn test_file_store_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let ctx = SessionContext::new(FileSessionStore::new(&path));
        ctx.login(agent(), "persisted");

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["authToken"], "persisted");
        assert_eq!(raw["user"]["email"], "agent@desk.io");

        let restored = SessionContext::new(FileSessionStore::new(&path));
        assert_eq!(restored.token().as_deref(), Some("persisted"));

        restored.invalidate();
        assert!(!path.exists());
        assert!(!SessionContext::new(FileSessionStore::new(&path)).is_authenticated());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let ctx = SessionContext::new(FileSessionStore::new(&path));
        ctx.login(agent(), "secret");

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_corrupt_file_starts_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let ctx = SessionContext::new(FileSessionStore::new(&path));
        assert!(!ctx.is_authenticated());
    }
}
