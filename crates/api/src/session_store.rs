//! Persistence of the signed-in session (token, user id and cached identity).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use portal_core::model::{Identity, Session};
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionStoreError {
    #[error("session storage is unavailable: {0}")]
    Io(String),
    #[error("stored session is corrupt: {0}")]
    Corrupt(String),
}

pub trait SessionStore: Send + Sync {
    /// Stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` when the store cannot be read.
    fn load(&self) -> Result<Option<Session>, SessionStoreError>;

    /// # Errors
    ///
    /// Returns `SessionStoreError` when the store cannot be written.
    fn save(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Forget everything stored.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` when the store cannot be cleared.
    fn clear(&self) -> Result<(), SessionStoreError>;

    /// Update the display identity of the stored session. Does nothing when signed out.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` when the store cannot be read or written.
    fn cache_identity(&self, identity: &Identity) -> Result<(), SessionStoreError> {
        match self.load()? {
            Some(session) => self.save(&session.with_identity(identity.clone())),
            None => Ok(()),
        }
    }
}

#[derive(Clone, Default)]
pub struct MemorySessionStore {
    session: Arc<Mutex<Option<Session>>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(Some(session))),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        let guard = self
            .session
            .lock()
            .map_err(|e| SessionStoreError::Io(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| SessionStoreError::Io(e.to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| SessionStoreError::Io(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// JSON file holding one session; the command-line stand-in for browser storage.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionStoreError::Io(e.to_string())),
        };
        let session: Session =
            serde_json::from_str(&raw).map_err(|e| SessionStoreError::Corrupt(e.to_string()))?;
        session
            .check()
            .map_err(|e| SessionStoreError::Corrupt(e.to_string()))?;
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SessionStoreError::Io(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(session)
            .map_err(|e| SessionStoreError::Io(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| SessionStoreError::Io(e.to_string()))
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionStoreError::Io(e.to_string())),
        }
    }
}
