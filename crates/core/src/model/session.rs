use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::UserId;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session token is empty")]
    EmptyToken,
    #[error("user id is missing")]
    MissingUserId,
}

/// Display identity cached alongside the session for headers and sidebars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub contact_no: String,
    #[serde(default)]
    pub picture_url: String,
}

/// The signed-in learner: an opaque backend token plus the numeric user id.
///
/// Passed explicitly to every service call instead of being read from ambient storage.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    token: String,
    user_id: UserId,
    #[serde(default)]
    identity: Identity,
}

impl Session {
    /// # Errors
    ///
    /// Returns `SessionError` when the token is blank or the user id is zero.
    pub fn new(token: impl Into<String>, user_id: UserId) -> Result<Self, SessionError> {
        let session = Self {
            token: token.into(),
            user_id,
            identity: Identity::default(),
        };
        session.check()?;
        Ok(session)
    }

    /// Re-check the invariants; sessions read back from disk may be hand-edited.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the token is blank or the user id is zero.
    pub fn check(&self) -> Result<(), SessionError> {
        if self.token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }
        if self.user_id.value() == 0 {
            return Err(SessionError::MissingUserId);
        }
        Ok(())
    }

    #[must_use]
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("identity", &self.identity)
            .finish()
    }
}
