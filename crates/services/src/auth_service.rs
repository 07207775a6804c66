use std::sync::Arc;

use portal_api::{AuthRepository, LoginRequest};
use portal_core::error::RequiredFields;
use portal_core::model::{Identity, Session};
use tracing::{info, warn};

use crate::error::{AuthError, FetchError};
use crate::session::SessionContext;

/// OTP sign-in and sign-out.
#[derive(Clone)]
pub struct AuthService {
    session: SessionContext,
    auth: Arc<dyn AuthRepository>,
}

impl AuthService {
    #[must_use]
    pub fn new(session: SessionContext, auth: Arc<dyn AuthRepository>) -> Self {
        Self { session, auth }
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Exchange a mobile number (or email) and OTP for a session and persist it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` when either input is blank, `Fetch` with the
    /// backend message when the login is rejected, and `InvalidGrant` when the backend
    /// answers without a usable token or user id.
    pub async fn login(&self, identifier: &str, otp: &str) -> Result<Session, AuthError> {
        RequiredFields::new()
            .text("identifier", identifier)
            .text("otp", otp)
            .finish()?;

        let request = LoginRequest {
            identifier: identifier.trim().to_owned(),
            otp: otp.trim().to_owned(),
        };
        let grant = self.auth.login(&request).await.map_err(|e| {
            warn!(error = %e, "login rejected");
            AuthError::Fetch(e.into())
        })?;

        let session = Session::new(grant.token, grant.user_id)?.with_identity(Identity {
            first_name: grant.first_name,
            contact_no: request.identifier,
            picture_url: grant.picture_url,
        });
        self.session.sign_in(&session)?;
        info!(user_id = %session.user_id(), "signed in");
        Ok(session)
    }

    /// Forget the stored session and cached identity.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when the store cannot be cleared.
    pub fn logout(&self) -> Result<(), FetchError> {
        self.session.sign_out()?;
        info!("signed out");
        Ok(())
    }
}
