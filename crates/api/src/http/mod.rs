//! reqwest-backed implementation of every repository.
//!
//! All operations are `POST`s of a JSON body carrying the session token and a `required`
//! or `source` discriminator; responses are `{status, message?, data}` envelopes.

mod auth;
mod courses;
mod dto;
mod envelope;
mod feedback;
mod profile;
mod references;

use std::sync::Arc;

use portal_core::model::Session;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::ApiConfig;
use crate::repository::{
    ApiError, AuthRepository, CourseRepository, FeedbackRepository, Portal, ProfileRepository,
    ReferenceRepository,
};
use envelope::{Envelope, Success};

/// Backend paths, relative to the configured base URL.
pub(crate) mod paths {
    pub const PROFILE_READ: &str = "my_profile2";
    pub const PROFILE_WRITE: &str = "my_profile";
    pub const MASTER: &str = "master";
    pub const COURSES: &str = "my_courses";
    pub const PAYMENTS: &str = "student_course_payments";
    pub const CERTIFICATES: &str = "get_course_completed_students";
    pub const LOGIN: &str = "login";
}

/// How an operation is named in the request body.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Discriminator {
    Required(&'static str),
    Source(&'static str),
}

impl Discriminator {
    fn field(self) -> (&'static str, &'static str) {
        match self {
            Discriminator::Required(name) => ("required", name),
            Discriminator::Source(name) => ("source", name),
        }
    }
}

/// A request body under construction.
#[derive(Debug)]
pub(crate) struct Call {
    operation: &'static str,
    body: Map<String, Value>,
}

impl Call {
    pub(crate) fn new(discriminator: Discriminator) -> Self {
        let (key, operation) = discriminator.field();
        let mut body = Map::new();
        body.insert(key.to_owned(), Value::from(operation));
        Self { operation, body }
    }

    pub(crate) fn authed(discriminator: Discriminator, session: &Session) -> Self {
        Self::new(discriminator).with("token", session.token())
    }

    pub(crate) fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.body.insert(key.to_owned(), value.into());
        self
    }

    pub(crate) fn with_user(self, session: &Session) -> Self {
        self.with("user_id", session.user_id().value())
    }
}

#[derive(Clone)]
pub struct HttpPortal {
    client: Client,
    config: ApiConfig,
}

impl HttpPortal {
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// POST to `<base_url>/<path>`.
    pub(crate) async fn post(&self, path: &str, call: Call) -> Result<Success, ApiError> {
        let url = self.config.endpoint(path);
        self.post_url(&url, call).await
    }

    /// POST to an absolute URL and unwrap the envelope.
    pub(crate) async fn post_url(&self, url: &str, call: Call) -> Result<Success, ApiError> {
        debug!(operation = call.operation, url, "backend call");
        let response = self
            .client
            .post(url)
            .json(&Value::Object(call.body))
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ApiError::Unauthenticated);
            }
            StatusCode::NOT_FOUND => return Err(ApiError::NotFound),
            _ => {}
        }
        let status = response.status();
        let bytes = response.bytes().await?;
        match serde_json::from_slice::<Envelope>(&bytes) {
            Ok(envelope) => envelope.into_success(),
            Err(_) if !status.is_success() => Err(ApiError::Transport(format!(
                "request failed with status {status}"
            ))),
            Err(e) => Err(ApiError::Decode(e.to_string())),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Transport(error.to_string())
        }
    }
}

impl Portal {
    /// Build a portal talking to the real backend.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn http(config: ApiConfig) -> Result<Self, ApiError> {
        let http = HttpPortal::new(config)?;
        let profiles: Arc<dyn ProfileRepository> = Arc::new(http.clone());
        let references: Arc<dyn ReferenceRepository> = Arc::new(http.clone());
        let courses: Arc<dyn CourseRepository> = Arc::new(http.clone());
        let feedback: Arc<dyn FeedbackRepository> = Arc::new(http.clone());
        let auth: Arc<dyn AuthRepository> = Arc::new(http);
        Ok(Self {
            profiles,
            references,
            courses,
            feedback,
            auth,
        })
    }
}
