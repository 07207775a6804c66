use std::sync::Arc;

use services::{
    AppServices, AuthService, CourseService, FeedbackService, ProfileAggregator, SessionContext,
};

use crate::routes::Route;

pub trait UiApp: Send + Sync {
    fn session(&self) -> SessionContext;

    fn profiles(&self) -> Arc<ProfileAggregator>;
    fn courses(&self) -> Arc<CourseService>;
    fn feedback(&self) -> Arc<FeedbackService>;
    fn auth(&self) -> Arc<AuthService>;
}

impl UiApp for AppServices {
    fn session(&self) -> SessionContext {
        AppServices::session(self).clone()
    }

    fn profiles(&self) -> Arc<ProfileAggregator> {
        AppServices::profiles(self)
    }

    fn courses(&self) -> Arc<CourseService> {
        AppServices::courses(self)
    }

    fn feedback(&self) -> Arc<FeedbackService> {
        AppServices::feedback(self)
    }

    fn auth(&self) -> Arc<AuthService> {
        AppServices::auth(self)
    }
}

#[derive(Clone)]
pub struct AppContext {
    session: SessionContext,

    profiles: Arc<ProfileAggregator>,
    courses: Arc<CourseService>,
    feedback: Arc<FeedbackService>,
    auth: Arc<AuthService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            session: app.session(),
            profiles: app.profiles(),
            courses: app.courses(),
            feedback: app.feedback(),
            auth: app.auth(),
        }
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
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

    /// Resolve a path against the current session.
    #[must_use]
    pub fn navigate(&self, path: &str) -> Route {
        Route::parse(path).guard(self.session.is_signed_in())
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
