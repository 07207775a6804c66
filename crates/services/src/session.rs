use std::sync::Arc;

use portal_api::SessionStore;
use portal_core::model::{Identity, Session};
use tracing::warn;

use crate::error::FetchError;

/// The one read/write surface for the signed-in session, handed to every service.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// The current session.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::AuthMissing` when nobody is signed in, and
    /// `FetchError::Network` when the store cannot be read.
    pub fn current(&self) -> Result<Session, FetchError> {
        let session = self.store.load()?.ok_or(FetchError::AuthMissing)?;
        session.check()?;
        Ok(session)
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.current().is_ok()
    }

    /// Cached display identity; empty when signed out.
    #[must_use]
    pub fn identity(&self) -> Identity {
        self.current()
            .map(|session| session.identity().clone())
            .unwrap_or_default()
    }

    /// # Errors
    ///
    /// Returns `FetchError` when the session cannot be stored.
    pub fn sign_in(&self, session: &Session) -> Result<(), FetchError> {
        self.store.save(session)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `FetchError` when stored data cannot be removed.
    pub fn sign_out(&self) -> Result<(), FetchError> {
        self.store.clear()?;
        Ok(())
    }

    /// Best-effort: a failure only costs the header its cached name.
    pub fn cache_identity(&self, identity: &Identity) {
        if let Err(error) = self.store.cache_identity(identity) {
            warn!(%error, "could not cache profile identity");
        }
    }
}
