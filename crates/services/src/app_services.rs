use std::sync::Arc;

use portal_api::{ApiConfig, InMemoryPortal, Portal, SessionStore};
use portal_core::completion::Checklist;
use portal_core::entitlements::{EligibilityRules, EntitlementPolicy};
use url::Url;

use crate::Clock;
use crate::auth_service::AuthService;
use crate::course_service::CourseService;
use crate::error::{AppServicesError, FetchError};
use crate::feedback_service::FeedbackService;
use crate::profile_editor::{EditMode, ProfileEditor};
use crate::profile_service::ProfileAggregator;
use crate::session::SessionContext;

/// Knobs shared by the services that are not backend configuration.
#[derive(Debug, Clone)]
pub struct PortalSettings {
    pub clock: Clock,
    pub checklist: Checklist,
    pub edit_mode: EditMode,
    pub rules: EligibilityRules,
    pub policy: EntitlementPolicy,
    pub certificate_url: Url,
}

impl PortalSettings {
    #[must_use]
    pub fn new(certificate_url: Url) -> Self {
        Self {
            clock: Clock::default(),
            checklist: Checklist::default(),
            edit_mode: EditMode::default(),
            rules: EligibilityRules::default(),
            policy: EntitlementPolicy::default(),
            certificate_url,
        }
    }

    #[must_use]
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.certificate_url.clone())
    }
}

/// Assembles app-facing services over one backend and one session store.
#[derive(Clone)]
pub struct AppServices {
    portal: Portal,
    session: SessionContext,
    settings: PortalSettings,
    profiles: Arc<ProfileAggregator>,
    courses: Arc<CourseService>,
    feedback: Arc<FeedbackService>,
    auth: Arc<AuthService>,
}

impl AppServices {
    #[must_use]
    pub fn new(portal: Portal, store: Arc<dyn SessionStore>, settings: PortalSettings) -> Self {
        let session = SessionContext::new(store);
        let profiles = Arc::new(ProfileAggregator::new(
            session.clone(),
            Arc::clone(&portal.profiles),
            Arc::clone(&portal.references),
            settings.checklist.clone(),
        ));
        let courses = Arc::new(
            CourseService::new(
                settings.clock,
                session.clone(),
                Arc::clone(&portal.courses),
                settings.certificate_url.clone(),
            )
            .with_rules(settings.rules.clone())
            .with_policy(settings.policy.clone()),
        );
        let feedback = Arc::new(
            FeedbackService::new(session.clone(), Arc::clone(&portal.feedback))
                .with_rules(settings.rules.clone()),
        );
        let auth = Arc::new(AuthService::new(session.clone(), Arc::clone(&portal.auth)));

        Self {
            portal,
            session,
            settings,
            profiles,
            courses,
            feedback,
            auth,
        }
    }

    /// Build services backed by the HTTP API.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be built.
    pub fn http(config: ApiConfig, store: Arc<dyn SessionStore>) -> Result<Self, AppServicesError> {
        let settings = PortalSettings::from_config(&config);
        let portal = Portal::http(config)?;
        Ok(Self::new(portal, store, settings))
    }

    /// Build services over an in-memory backend.
    #[must_use]
    pub fn in_memory(
        portal: InMemoryPortal,
        store: Arc<dyn SessionStore>,
        settings: PortalSettings,
    ) -> Self {
        Self::new(Portal::in_memory(portal), store, settings)
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    #[must_use]
    pub fn settings(&self) -> &PortalSettings {
        &self.settings
    }

    #[must_use]
    pub fn profiles(&self) -> Arc<ProfileAggregator> {
        Arc::clone(&self.profiles)
    }

    #[must_use]
    pub fn courses(&self) -> Arc<CourseService> {
        Arc::clone(&self.courses)
    }

    #[must_use]
    pub fn feedback(&self) -> Arc<FeedbackService> {
        Arc::clone(&self.feedback)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    /// Load the profile and open an editor over it.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when the profile cannot be loaded.
    pub async fn profile_editor(&self) -> Result<ProfileEditor, FetchError> {
        ProfileEditor::load(
            self.profiles.as_ref().clone(),
            Arc::clone(&self.portal.profiles),
            self.settings.edit_mode,
        )
        .await
    }
}
