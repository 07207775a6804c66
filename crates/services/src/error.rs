//! Shared error types for the services crate.

use thiserror::Error;

use portal_api::{ApiError, SessionStoreError};
use portal_core::ValidationError;
use portal_core::edit::EditStateError;
use portal_core::model::{RecordId, SessionError};

/// Why a view could not get its data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FetchError {
    /// No session token or user id; the view should send the user to sign in.
    #[error("authentication details not found, please sign in")]
    AuthMissing,
    /// Transport or parse failure; the user may retry.
    #[error("network error: {0}")]
    Network(String),
    /// The backend rejected the request; the message is shown verbatim.
    #[error("{0}")]
    Application(String),
}

impl FetchError {
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::AuthMissing)
    }
}

impl From<ApiError> for FetchError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unauthenticated => FetchError::AuthMissing,
            ApiError::Transport(message) | ApiError::Decode(message) => {
                FetchError::Network(message)
            }
            ApiError::Application { message, .. } => FetchError::Application(message),
            ApiError::NotFound => {
                FetchError::Application("The requested record was not found.".into())
            }
            other => FetchError::Network(other.to_string()),
        }
    }
}

impl From<SessionStoreError> for FetchError {
    fn from(error: SessionStoreError) -> Self {
        match error {
            SessionStoreError::Corrupt(_) => FetchError::AuthMissing,
            other => FetchError::Network(other.to_string()),
        }
    }
}

impl From<SessionError> for FetchError {
    fn from(_: SessionError) -> Self {
        FetchError::AuthMissing
    }
}

/// Errors emitted by `ProfileEditor`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileEditError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    State(#[from] EditStateError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The save went through but reloading the profile failed.
    #[error("saved, but reloading the profile failed: {0}")]
    Reload(FetchError),
    #[error("no record with id {0}")]
    UnknownRecord(RecordId),
}

/// Errors emitted by `FeedbackService`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FeedbackError {
    #[error("{0}")]
    Unavailable(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("backend returned an unusable session: {0}")]
    InvalidGrant(#[from] SessionError),
}

/// Errors emitted while assembling `AppServices`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error("backend client could not be built: {0}")]
    Backend(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_onto_the_fetch_taxonomy() {
        assert_eq!(FetchError::from(ApiError::Unauthenticated), FetchError::AuthMissing);
        assert_eq!(
            FetchError::from(ApiError::Decode("bad json".into())),
            FetchError::Network("bad json".into())
        );
        assert_eq!(
            FetchError::from(ApiError::Application {
                status: 409,
                message: "duplicate email".into()
            })
            .to_string(),
            "duplicate email"
        );
        assert!(!FetchError::AuthMissing.is_retryable());
        assert!(FetchError::Network(String::new()).is_retryable());
    }
}
